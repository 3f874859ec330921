//! Physics demo
//!
//! Wires the built-in systems plus a small game-side mover system into one
//! engine and drops an entity onto a triangle floor. The mover requests
//! motion over the bus every tick and picks up the resolved position from
//! the broadcast result one tick later; input events are injected in place
//! of real platform glue.

use glam::Vec3;

use mariner_engine::config::Config;
use mariner_engine::engine::Engine;
use mariner_engine::input::{Key, KeyState};
use mariner_engine::message::{
    self, MessageStream, MessageType, PhysicsMoveRequest, PhysicsMoveResult, SystemInit,
};
use mariner_engine::physics::Triangle;
use mariner_engine::system::{Console, Input, PhysicsWorld, System};

const PLAYER_ENTITY: u32 = 1;
const GRAVITY: f32 = -9.81;
const TICK: f32 = 1.0 / 60.0;

/// Game-side system: one falling entity that moves via the physics bus.
#[derive(Default)]
struct Mover {
    position: Vec3,
    velocity: Vec3,
    ellipsoid_radius: Vec3,
    messages_generated: MessageStream,
    messages_received: MessageStream,
}

impl Mover {
    fn new() -> Self {
        Self {
            position: Vec3::new(0.0, 5.0, 0.0),
            velocity: Vec3::ZERO,
            ellipsoid_radius: Vec3::new(0.5, 1.0, 0.5),
            ..Self::default()
        }
    }
}

impl System for Mover {
    fn initialize(&mut self, _config: &Config) -> bool {
        let name = message::pack_str(self.name());
        message::append_message(
            &mut self.messages_generated,
            MessageType::SystemInit,
            &SystemInit { name },
        );
        true
    }

    fn update(&mut self, delta_time: f32) {
        // Pick up last tick's resolved position.
        let mut messages = self.messages_received.take();
        while !messages.is_empty() {
            let Ok(header) = message::extract_header(&mut messages) else {
                break;
            };
            match header.message_type {
                MessageType::PhysicsMoveResult => {
                    let Ok(result) =
                        message::extract_payload::<PhysicsMoveResult>(&mut messages, &header)
                    else {
                        break;
                    };
                    if result.entity == PLAYER_ENTITY {
                        // Landed if the resolver gave us less than the ask.
                        if (result.final_position.y - self.position.y).abs()
                            < (self.velocity.y * delta_time).abs() * 0.5
                        {
                            self.velocity.y = 0.0;
                        }
                        self.position = result.final_position;
                    }
                }
                _ => {
                    if message::skip_payload(&mut messages, &header).is_err() {
                        break;
                    }
                }
            }
        }

        // Ask for this tick's motion.
        self.velocity.y += GRAVITY * delta_time;
        message::append_message(
            &mut self.messages_generated,
            MessageType::PhysicsMoveRequest,
            &PhysicsMoveRequest {
                entity: PLAYER_ENTITY,
                position: self.position,
                velocity: self.velocity * delta_time,
                ellipsoid_radius: self.ellipsoid_radius,
            },
        );
    }

    fn shutdown(&mut self) {
        log::info!("mover final position: {:?}", self.position);
    }

    fn post_messages(&mut self, messages: &MessageStream) {
        self.messages_received.append_stream(messages);
    }

    fn collect_messages(&mut self) -> MessageStream {
        self.messages_generated.take()
    }

    fn name(&self) -> &'static str {
        "Mover"
    }

    fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
        self
    }
}

fn floor() -> Vec<Triangle> {
    vec![
        Triangle::new(
            Vec3::new(-20.0, 0.0, -20.0),
            Vec3::new(-20.0, 0.0, 20.0),
            Vec3::new(20.0, 0.0, 20.0),
        ),
        Triangle::new(
            Vec3::new(-20.0, 0.0, -20.0),
            Vec3::new(20.0, 0.0, 20.0),
            Vec3::new(20.0, 0.0, -20.0),
        ),
    ]
}

fn main() {
    env_logger::init();

    let mut engine = Engine::new(Config::default());
    engine.add_system(Box::new(Input::new()));
    engine.add_system(Box::new(Console::new()));
    engine.add_system(Box::new(PhysicsWorld::new()));
    engine.add_system(Box::new(Mover::new()));

    if !engine.start() {
        log::error!("engine failed to start");
        return;
    }

    {
        let physics = engine
            .system_mut::<PhysicsWorld>()
            .expect("physics system registered above");
        physics.set_triangles(floor());

        // The synchronous entry point, as a scripting binding would use it.
        let landed = physics.collide_and_slide(
            Vec3::new(0.0, 5.0, 0.0),
            Vec3::new(0.0, -10.0, 0.0),
            Vec3::ONE,
        );
        log::info!("direct collide_and_slide from y=5: {landed:?}");
    }

    if let Some(input) = engine.system_mut::<Input>() {
        input.bind_entity(PLAYER_ENTITY);
        // Scripted session: open the console, tap a movement key.
        input.inject_key(Key::Backquote, KeyState::Pressed, false, 0);
        input.inject_key(Key::W, KeyState::Pressed, false, 16);
        input.inject_key(Key::W, KeyState::Released, false, 120);
    }

    // Let the mover fall onto the floor and come to rest.
    engine.run(TICK, 300);

    // Ask the engine to quit through the bus, then give the event one tick
    // to circulate.
    if let Some(input) = engine.system_mut::<Input>() {
        input.inject_key(Key::Escape, KeyState::Pressed, false, 5000);
    }
    engine.run(TICK, 10);

    engine.stop();
}
