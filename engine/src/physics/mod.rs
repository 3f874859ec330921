//! Physics module
//!
//! Custom swept-ellipsoid collision implementation, built from scratch with
//! no external physics library dependencies (no Rapier).
//!
//! # Philosophy
//!
//! Study reference implementations, understand the algorithms, build our own.
//! This gives full control over the math and behavior near glancing contacts.
//!
//! # Unit System
//!
//! World space uses whatever unit convention the host picks; the config's
//! `units_per_meter` scales the convergence epsilon accordingly. All of the
//! collision math itself runs in *ellipsoid space*: world space scaled
//! per-axis by `1/radius` so the ellipsoidal collider becomes a unit sphere
//! and every test reduces to swept-unit-sphere vs. triangle.
//!
//! # Submodules
//!
//! - [`geometry`] - Triangles, planes, point-in-triangle and quadratic-root
//!   primitives
//! - [`swept`] - The collide-and-slide resolver (swept sphere, sliding
//!   planes, bounded recursion)

pub mod geometry;
pub mod swept;

pub use geometry::{Plane, Triangle};
pub use swept::{collide_and_slide, very_close_distance};
