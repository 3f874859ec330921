//! Engine Tests - Broadcast Fan-Out, Ordering, and Lifecycle
//!
//! Tests for the message router: every system sees every message one tick
//! after it was produced, interleaved in registration order; collection is
//! take-and-clear; startup aborts on a failed initialize; a quit event on
//! the bus stops the run loop.

use std::cell::RefCell;
use std::rc::Rc;

use glam::Vec3;
use mariner_engine::config::Config;
use mariner_engine::engine::Engine;
use mariner_engine::message::{
    self, MessageStream, MessageType, MoveEntity, QuitEvent,
};
use mariner_engine::system::System;

/// Shared record of what a probe observed, readable from the test body.
type Seen = Rc<RefCell<Vec<u32>>>;

/// Test system that emits scripted MoveEntity messages on its first update
/// and records the entity id of every MoveEntity it receives.
struct Probe {
    name: &'static str,
    emit_entities: Vec<u32>,
    emitted: bool,
    seen: Seen,
    updates: u32,
    messages_generated: MessageStream,
    messages_received: MessageStream,
}

impl Probe {
    fn new(name: &'static str, emit_entities: Vec<u32>) -> (Self, Seen) {
        let seen: Seen = Rc::default();
        (
            Self {
                name,
                emit_entities,
                emitted: false,
                seen: Rc::clone(&seen),
                updates: 0,
                messages_generated: MessageStream::new(),
                messages_received: MessageStream::new(),
            },
            seen,
        )
    }
}

impl System for Probe {
    fn initialize(&mut self, _config: &Config) -> bool {
        true
    }

    fn update(&mut self, _delta_time: f32) {
        self.updates += 1;

        let mut messages = self.messages_received.take();
        while !messages.is_empty() {
            let header = message::extract_header(&mut messages).unwrap();
            match header.message_type {
                MessageType::MoveEntity => {
                    let mv: MoveEntity = message::extract_payload(&mut messages, &header).unwrap();
                    self.seen.borrow_mut().push(mv.entity);
                }
                _ => message::skip_payload(&mut messages, &header).unwrap(),
            }
        }

        if !self.emitted {
            self.emitted = true;
            for &entity in &self.emit_entities {
                message::append_message(
                    &mut self.messages_generated,
                    MessageType::MoveEntity,
                    &MoveEntity {
                        entity,
                        delta: Vec3::X,
                    },
                );
            }
        }
    }

    fn shutdown(&mut self) {}

    fn post_messages(&mut self, messages: &MessageStream) {
        self.messages_received.append_stream(messages);
    }

    fn collect_messages(&mut self) -> MessageStream {
        self.messages_generated.take()
    }

    fn name(&self) -> &'static str {
        self.name
    }

    fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
        self
    }
}

/// System whose initialize fails, plus a flag tracking whether shutdown ran.
struct Faulty;

impl System for Faulty {
    fn initialize(&mut self, _config: &Config) -> bool {
        false
    }
    fn update(&mut self, _delta_time: f32) {}
    fn shutdown(&mut self) {}
    fn post_messages(&mut self, _messages: &MessageStream) {}
    fn collect_messages(&mut self) -> MessageStream {
        MessageStream::new()
    }
    fn name(&self) -> &'static str {
        "Faulty"
    }
    fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
        self
    }
}

/// System that requests a quit on its first update.
struct Quitter {
    asked: bool,
    messages_generated: MessageStream,
}

impl System for Quitter {
    fn initialize(&mut self, _config: &Config) -> bool {
        true
    }
    fn update(&mut self, _delta_time: f32) {
        if !self.asked {
            self.asked = true;
            message::append_message(
                &mut self.messages_generated,
                MessageType::QuitEvent,
                &QuitEvent {},
            );
        }
    }
    fn shutdown(&mut self) {}
    fn post_messages(&mut self, _messages: &MessageStream) {}
    fn collect_messages(&mut self) -> MessageStream {
        self.messages_generated.take()
    }
    fn name(&self) -> &'static str {
        "Quitter"
    }
    fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
        self
    }
}

// ============================================================================
// Broadcast Fan-Out
// ============================================================================

#[test]
fn test_messages_reach_every_system_next_tick() {
    let (emitter, emitter_seen) = Probe::new("Emitter", vec![10, 11, 12]);
    let (listener, listener_seen) = Probe::new("Listener", vec![]);

    let mut engine = Engine::new(Config::default());
    engine.add_system(Box::new(emitter));
    engine.add_system(Box::new(listener));
    assert!(engine.start());

    // Tick 1: emitter produces, nothing has circulated yet.
    engine.tick(0.016);
    assert!(emitter_seen.borrow().is_empty());
    assert!(listener_seen.borrow().is_empty());

    // Tick 2: everyone, including the emitter itself, sees the batch.
    engine.tick(0.016);
    assert_eq!(*emitter_seen.borrow(), vec![10, 11, 12]);
    assert_eq!(*listener_seen.borrow(), vec![10, 11, 12]);

    // Tick 3: collection cleared the outbound buffer, nothing re-delivers.
    engine.tick(0.016);
    assert_eq!(*listener_seen.borrow(), vec![10, 11, 12]);
}

#[test]
fn test_broadcast_interleaves_in_registration_order() {
    let (first, _) = Probe::new("First", vec![1, 2]);
    let (second, _) = Probe::new("Second", vec![3]);
    let (watcher, watcher_seen) = Probe::new("Watcher", vec![]);

    let mut engine = Engine::new(Config::default());
    engine.add_system(Box::new(first));
    engine.add_system(Box::new(second));
    engine.add_system(Box::new(watcher));
    assert!(engine.start());

    engine.tick(0.016);
    engine.tick(0.016);

    // First's messages precede Second's because collection follows
    // registration order.
    assert_eq!(*watcher_seen.borrow(), vec![1, 2, 3]);
}

#[test]
fn test_collect_messages_is_take_and_clear() {
    let (probe, _) = Probe::new("Probe", vec![5]);
    let mut boxed: Box<dyn System> = Box::new(probe);

    assert!(boxed.initialize(&Config::default()));
    boxed.update(0.016);

    let first = boxed.collect_messages();
    assert!(first.available_bytes() > 0);

    // Immediately after collection the outbound buffer is empty.
    let second = boxed.collect_messages();
    assert_eq!(second.available_bytes(), 0);
}

// ============================================================================
// Lifecycle
// ============================================================================

#[test]
fn test_failed_initialize_aborts_startup() {
    let (probe, _) = Probe::new("Probe", vec![]);

    let mut engine = Engine::new(Config::default());
    engine.add_system(Box::new(probe));
    engine.add_system(Box::new(Faulty));

    assert!(!engine.start());
    assert!(!engine.is_running());
}

#[test]
fn test_quit_event_stops_run_loop() {
    let (probe, _) = Probe::new("Probe", vec![]);
    let mut engine = Engine::new(Config::default());
    engine.add_system(Box::new(Quitter {
        asked: false,
        messages_generated: MessageStream::new(),
    }));
    engine.add_system(Box::new(probe));
    assert!(engine.start());

    engine.run(0.016, 100);

    // Tick 1 emits the quit, tick 2's collection sees it; far fewer than the
    // 100 allowed ticks run.
    assert!(!engine.is_running());
    let probe = engine.system_mut::<Probe>().unwrap();
    assert!(probe.updates <= 2, "ran {} ticks after quit", probe.updates);
}

#[test]
fn test_system_mut_reaches_concrete_system() {
    let (probe, _) = Probe::new("Probe", vec![]);
    let mut engine = Engine::new(Config::default());
    engine.add_system(Box::new(probe));

    assert!(engine.system_mut::<Probe>().is_some());
    assert!(engine.system_mut::<Quitter>().is_none());
}
