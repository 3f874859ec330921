//! Input Module
//!
//! Platform-agnostic input primitives, decoupled from any specific windowing
//! system to allow for flexible integration.
//!
//! Only key codes and states live here; the input *system* that turns them
//! into broadcast messages is [`crate::system::input`].

pub mod keyboard;

pub use keyboard::{Key, KeyState};
