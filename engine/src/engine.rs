//! Engine loop and message router
//!
//! The engine holds a homogeneous collection of [`System`]s and runs them on
//! a broadcast topology: each tick, every system's outbound messages are
//! collected, concatenated in registration order, and re-delivered to every
//! system's inbound buffer (a system sees its own messages too), after which
//! every system updates in registration order.
//!
//! Messages generated in tick N are therefore visible to all systems at the
//! start of tick N+1 and never within tick N. With a fixed registration
//! order the whole exchange is deterministic.

use crate::config::Config;
use crate::message::{self, MessageStream, MessageType};
use crate::system::System;

/// Engine: system registry, message router and tick driver.
pub struct Engine {
    systems: Vec<Box<dyn System>>,
    config: Config,
    started: bool,
    running: bool,
}

impl Engine {
    pub fn new(config: Config) -> Self {
        Self {
            systems: Vec::new(),
            config,
            started: false,
            running: false,
        }
    }

    /// Registers a system. Registration order fixes both broadcast
    /// interleaving and update order for the life of the engine.
    pub fn add_system(&mut self, system: Box<dyn System>) {
        debug_assert!(
            !self.systems.iter().any(|s| s.name() == system.name()),
            "duplicate system name '{}'",
            system.name()
        );
        self.systems.push(system);
    }

    /// Initializes every system in registration order.
    ///
    /// Any system returning `false` aborts startup: already-initialized
    /// systems are shut down again and the engine stays stopped. There is no
    /// partial-running state and no retry.
    pub fn start(&mut self) -> bool {
        for index in 0..self.systems.len() {
            let ok = {
                let system = &mut self.systems[index];
                system.initialize(&self.config)
            };
            if !ok {
                log::error!(
                    "engine start aborted: system '{}' failed to initialize",
                    self.systems[index].name()
                );
                for system in self.systems[..index].iter_mut().rev() {
                    system.shutdown();
                }
                return false;
            }
            log::info!("system '{}' initialized", self.systems[index].name());
        }

        self.started = true;
        self.running = true;
        true
    }

    /// True until a quit event crosses the bus (or [`Engine::stop`] runs).
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// One broadcast tick: collect, fan out, update.
    pub fn tick(&mut self, delta_time: f32) {
        debug_assert!(self.started, "tick() before start()");

        // Collect every system's outbound stream, in registration order.
        let mut combined = MessageStream::new();
        for system in &mut self.systems {
            let outgoing = system.collect_messages();
            combined.append_stream(&outgoing);
        }

        // The engine itself watches for quit traffic.
        if Self::contains_quit(&combined) {
            self.running = false;
        }

        // Broadcast: every system sees every message, including its own.
        for system in &mut self.systems {
            system.post_messages(&combined);
        }

        for system in &mut self.systems {
            system.update(delta_time);
        }
    }

    /// Drives ticks until a quit event or `max_ticks`, whichever first.
    pub fn run(&mut self, delta_time: f32, max_ticks: u32) {
        for _ in 0..max_ticks {
            if !self.running {
                break;
            }
            self.tick(delta_time);
        }
    }

    /// Shuts every system down in reverse registration order.
    pub fn stop(&mut self) {
        for system in self.systems.iter_mut().rev() {
            system.shutdown();
        }
        self.running = false;
        self.started = false;
    }

    /// Mutable access to a registered system's concrete type.
    ///
    /// This is the seam for capability APIs that bypass the bus: platform
    /// glue injecting input events, scripting bindings calling
    /// `collide_and_slide` synchronously, tests seeding geometry.
    pub fn system_mut<S: System>(&mut self) -> Option<&mut S> {
        self.systems
            .iter_mut()
            .find_map(|system| system.as_any_mut().downcast_mut::<S>())
    }

    /// Scans a stream copy for a quit event without consuming the original.
    fn contains_quit(combined: &MessageStream) -> bool {
        let mut scan = combined.clone();
        while !scan.is_empty() {
            let Ok(header) = message::extract_header(&mut scan) else {
                // Malformed traffic is the consumers' problem to report;
                // the scan just stops early.
                return false;
            };
            if header.message_type == MessageType::QuitEvent {
                return true;
            }
            if message::skip_payload(&mut scan, &header).is_err() {
                return false;
            }
        }
        false
    }
}
