//! Physics World system
//!
//! Owns the static collision geometry and drives the swept-ellipsoid
//! resolver. Move requests arrive two ways, and both are deliberate:
//!
//! - [`PhysicsMoveRequest`](crate::message::PhysicsMoveRequest) messages off
//!   the bus, answered with a broadcast
//!   [`PhysicsMoveResult`](crate::message::PhysicsMoveResult) next tick;
//! - direct [`PhysicsWorld::collide_and_slide`] calls from in-process
//!   collaborators (scripting bindings) that need the corrected position
//!   synchronously.

use glam::Vec3;

use crate::config::Config;
use crate::error::StreamError;
use crate::message::{
    self, MessageStream, MessageType, PhysicsMoveRequest, PhysicsMoveResult, SystemInit,
};
use crate::physics::{self, Triangle};
use crate::system::System;

/// Physics system: world triangle set plus the collide-and-slide entry
/// points.
#[derive(Default)]
pub struct PhysicsWorld {
    triangles: Vec<Triangle>,
    units_per_meter: f32,
    messages_generated: MessageStream,
    messages_received: MessageStream,
}

impl PhysicsWorld {
    pub fn new() -> Self {
        Self {
            units_per_meter: 1.0,
            ..Self::default()
        }
    }

    /// Replaces the static collision geometry.
    ///
    /// The triangle set is read-only during resolution; it is rebuilt here
    /// (geometry streaming is the terrain collaborator's concern), never
    /// mutated mid-call.
    pub fn set_triangles(&mut self, triangles: Vec<Triangle>) {
        self.triangles = triangles;
    }

    /// Appends one triangle to the collision geometry.
    pub fn add_triangle(&mut self, triangle: Triangle) {
        self.triangles.push(triangle);
    }

    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    /// Moves an ellipsoid through the world, resolving penetrations by
    /// sliding. Synchronous entry point for in-process callers.
    ///
    /// All three vectors are world space; returns the corrected final
    /// position.
    pub fn collide_and_slide(
        &self,
        position: Vec3,
        velocity: Vec3,
        ellipsoid_radius: Vec3,
    ) -> Vec3 {
        physics::collide_and_slide(
            &self.triangles,
            position,
            velocity,
            ellipsoid_radius,
            self.units_per_meter,
        )
    }

    fn process_events(&mut self) {
        let mut messages = self.messages_received.take();

        while !messages.is_empty() {
            if let Err(err) = self.dispatch(&mut messages) {
                // A bad header or truncated payload desynchronizes the whole
                // stream; discard the remainder rather than mis-reading it.
                log::error!("PhysicsWorld: discarding inbound stream: {err}");
                break;
            }
        }
    }

    fn dispatch(&mut self, messages: &mut MessageStream) -> Result<(), StreamError> {
        let header = message::extract_header(messages)?;

        match header.message_type {
            MessageType::PhysicsMoveRequest => {
                let request: PhysicsMoveRequest = message::extract_payload(messages, &header)?;

                let final_position = self.collide_and_slide(
                    request.position,
                    request.velocity,
                    request.ellipsoid_radius,
                );

                log::debug!(
                    "entity {} moved: position {:?} velocity {:?} ellipsoid radius {:?} -> {:?}",
                    request.entity,
                    request.position,
                    request.velocity,
                    request.ellipsoid_radius,
                    final_position
                );

                message::append_message(
                    &mut self.messages_generated,
                    MessageType::PhysicsMoveResult,
                    &PhysicsMoveResult {
                        entity: request.entity,
                        final_position,
                    },
                );
            }
            // Broadcast traffic this system does not act on.
            _ => message::skip_payload(messages, &header)?,
        }

        Ok(())
    }
}

impl System for PhysicsWorld {
    fn initialize(&mut self, config: &Config) -> bool {
        self.units_per_meter = config.units_per_meter;

        let name = message::pack_str(self.name());
        message::append_message(
            &mut self.messages_generated,
            MessageType::SystemInit,
            &SystemInit { name },
        );

        true
    }

    fn update(&mut self, _delta_time: f32) {
        self.process_events();
    }

    fn shutdown(&mut self) {
        self.triangles.clear();
    }

    fn post_messages(&mut self, messages: &MessageStream) {
        self.messages_received.append_stream(messages);
    }

    fn collect_messages(&mut self) -> MessageStream {
        self.messages_generated.take()
    }

    fn name(&self) -> &'static str {
        "PhysicsWorld"
    }

    fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
        self
    }
}
