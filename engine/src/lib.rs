//! Mariner Engine Library
//!
//! A small message-driven game engine core. Gameplay behavior is decomposed
//! into independent systems (input, console, physics) that communicate
//! exclusively through typed binary messages on a broadcast bus, plus a
//! swept-ellipsoid collision resolver that slides moving entities along
//! arbitrary triangle meshes.
//!
//! # Modules
//!
//! - [`common`] - The stream buffer the message system is built on
//! - [`message`] - Message catalog and envelope encode/decode
//! - [`system`] - The system contract and the built-in systems
//! - [`engine`] - The broadcast router / engine tick loop
//! - [`physics`] - Swept-ellipsoid collide-and-slide math
//! - [`input`] - Platform-agnostic key codes
//! - [`config`] - Engine configuration
//! - [`error`] - Stream/protocol error taxonomy
//!
//! # Example
//!
//! ```ignore
//! use mariner_engine::config::Config;
//! use mariner_engine::engine::Engine;
//! use mariner_engine::physics::Triangle;
//! use mariner_engine::system::{Console, Input, PhysicsWorld};
//!
//! let mut engine = Engine::new(Config::default());
//! engine.add_system(Box::new(Input::new()));
//! engine.add_system(Box::new(Console::new()));
//! engine.add_system(Box::new(PhysicsWorld::new()));
//!
//! assert!(engine.start());
//!
//! // Seed collision geometry through the capability API.
//! let physics = engine.system_mut::<PhysicsWorld>().unwrap();
//! physics.add_triangle(Triangle::new(
//!     glam::Vec3::new(-10.0, 0.0, -10.0),
//!     glam::Vec3::new(0.0, 0.0, 10.0),
//!     glam::Vec3::new(10.0, 0.0, -10.0),
//! ));
//!
//! engine.run(1.0 / 60.0, 600);
//! engine.stop();
//! ```

pub mod common;
pub mod config;
pub mod engine;
pub mod error;
pub mod input;
pub mod message;
pub mod physics;
pub mod system;

// Re-export the types nearly every consumer touches.
pub use common::StreamBuffer;
pub use config::Config;
pub use engine::Engine;
pub use error::StreamError;
pub use input::{Key, KeyState};
pub use message::{MessageStream, MessageType};
pub use physics::Triangle;
pub use system::{Console, Input, PhysicsWorld, System};
