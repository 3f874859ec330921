//! System Abstraction
//!
//! A system is any set of related functionality that the engine updates once
//! per game tick. Systems never call each other for gameplay events; they
//! communicate through typed binary messages exchanged by the engine's
//! broadcast router (see [`crate::engine`]).
//!
//! A system may additionally expose a capability-specific API for callers
//! that need a synchronous return value, like the physics world's
//! [`collide_and_slide`](physics::PhysicsWorld::collide_and_slide) or the
//! input system's key injection. Those direct entry points coexist with the
//! message interface by design; they serve in-process collaborators
//! (scripting bindings, platform glue), while messages serve fire-and-forget
//! broadcast consumers.

pub mod console;
pub mod input;
pub mod physics;

pub use console::Console;
pub use input::Input;
pub use physics::PhysicsWorld;

use std::any::Any;

use crate::config::Config;
use crate::message::MessageStream;

/// Uniform contract every engine system implements.
///
/// Lifecycle: a system starts uninitialized, becomes initialized after a
/// successful [`System::initialize`], is updated once per tick (each update
/// preceded by delivery of the previous tick's messages), and ends with
/// [`System::shutdown`]. `initialize` returning `false` aborts engine
/// startup; there is no partial-running state.
pub trait System: Any {
    /// Performs any necessary initialization.
    ///
    /// Returns `false` if initialization fails, which aborts engine startup.
    fn initialize(&mut self, config: &Config) -> bool;

    /// Updates the system over the given timestep, in seconds.
    ///
    /// Queued inbound messages are expected to be processed here, not in
    /// [`System::post_messages`].
    fn update(&mut self, delta_time: f32);

    /// Performs any teardown.
    fn shutdown(&mut self);

    /// Delivers inbound messages.
    ///
    /// Appends the stream's unread content onto the system's private inbound
    /// buffer. Handling is deferred until the next [`System::update`] so
    /// every system observes the same combined stream before anyone reacts.
    fn post_messages(&mut self, messages: &MessageStream);

    /// Collects messages generated by this system since the last collection.
    ///
    /// Take-and-clear: after this returns, the system's outbound buffer is
    /// empty and ownership of the messages has moved to the caller. The
    /// router calls this exactly once per tick.
    fn collect_messages(&mut self) -> MessageStream;

    /// The system's name, unique within one engine instance.
    fn name(&self) -> &'static str;

    /// Downcast hook so collaborators holding the engine can reach a
    /// concrete system's capability API (see
    /// [`Engine::system_mut`](crate::engine::Engine::system_mut)).
    fn as_any_mut(&mut self) -> &mut dyn Any;
}
