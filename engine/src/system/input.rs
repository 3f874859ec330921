//! Input system
//!
//! Bridges platform input to the message bus. Windowing glue is an external
//! collaborator, so raw events are *injected* through the direct API
//! ([`Input::inject_key`], [`Input::inject_text`]); each update drains the
//! injected queue and broadcasts the corresponding messages:
//!
//! - every key change becomes a [`KeyboardEvent`](crate::message::KeyboardEvent);
//! - `Escape` pressed additionally emits a quit event;
//! - `` ` `` (backquote) pressed toggles the console;
//! - W/A/S/D presses emit [`MoveEntity`](crate::message::MoveEntity) deltas
//!   for the bound entity, if any.

use glam::Vec3;

use crate::config::Config;
use crate::input::{Key, KeyState};
use crate::message::{
    self, ConsoleToggle, KeyboardEvent, MessageStream, MessageType, MoveEntity, QuitEvent,
    SystemInit, TextInput,
};
use crate::system::System;

/// Input system: injected platform events in, broadcast messages out.
#[derive(Default)]
pub struct Input {
    pending_keys: Vec<KeyboardEvent>,
    pending_text: Vec<TextInput>,
    bound_entity: Option<u32>,
    move_step: f32,
    messages_generated: MessageStream,
    messages_received: MessageStream,
}

impl Input {
    pub fn new() -> Self {
        Self {
            move_step: 1.0,
            ..Self::default()
        }
    }

    /// Queues a key event from the platform layer. Broadcast on the next
    /// update.
    pub fn inject_key(&mut self, key: Key, state: KeyState, repeat: bool, timestamp: u32) {
        self.pending_keys.push(KeyboardEvent {
            key: key.into(),
            state: state.into(),
            repeat: repeat as u32,
            timestamp,
            window_id: 0,
        });
    }

    /// Queues a text input event from the platform layer.
    pub fn inject_text(&mut self, text: &str, timestamp: u32) {
        self.pending_text.push(TextInput {
            text: message::pack_str(text),
            timestamp,
            window_id: 0,
        });
    }

    /// Selects the entity W/A/S/D presses move.
    pub fn bind_entity(&mut self, entity: u32) {
        self.bound_entity = Some(entity);
    }

    fn movement_delta(key: Key) -> Option<Vec3> {
        match key {
            Key::W => Some(Vec3::NEG_Z),
            Key::S => Some(Vec3::Z),
            Key::A => Some(Vec3::NEG_X),
            Key::D => Some(Vec3::X),
            _ => None,
        }
    }

    fn drain_inbound(&mut self) {
        // This system only produces traffic, so every tag is skipped, but
        // the stream is still walked message by message so a malformed
        // header is noticed instead of vanishing with the block.
        let mut messages = self.messages_received.take();

        while !messages.is_empty() {
            let skipped = message::extract_header(&mut messages)
                .and_then(|header| message::skip_payload(&mut messages, &header));
            if let Err(err) = skipped {
                log::error!("Input: discarding inbound stream: {err}");
                break;
            }
        }
    }

    fn broadcast_pending(&mut self) {
        for event in std::mem::take(&mut self.pending_keys) {
            message::append_message(
                &mut self.messages_generated,
                MessageType::KeyboardEvent,
                &event,
            );

            // Key repeats only echo; fresh presses drive engine actions.
            if KeyState::from(event.state) != KeyState::Pressed || event.repeat != 0 {
                continue;
            }

            match Key::from(event.key) {
                Key::Escape => {
                    message::append_message(
                        &mut self.messages_generated,
                        MessageType::QuitEvent,
                        &QuitEvent {},
                    );
                }
                Key::Backquote => {
                    message::append_message(
                        &mut self.messages_generated,
                        MessageType::ConsoleToggle,
                        &ConsoleToggle {},
                    );
                }
                key => {
                    if let (Some(entity), Some(direction)) =
                        (self.bound_entity, Self::movement_delta(key))
                    {
                        message::append_message(
                            &mut self.messages_generated,
                            MessageType::MoveEntity,
                            &MoveEntity {
                                entity,
                                delta: direction * self.move_step,
                            },
                        );
                    }
                }
            }
        }

        for text in std::mem::take(&mut self.pending_text) {
            message::append_message(&mut self.messages_generated, MessageType::TextInput, &text);
        }
    }
}

impl System for Input {
    fn initialize(&mut self, config: &Config) -> bool {
        self.move_step = config.move_step;

        let name = message::pack_str(self.name());
        message::append_message(
            &mut self.messages_generated,
            MessageType::SystemInit,
            &SystemInit { name },
        );

        true
    }

    fn update(&mut self, _delta_time: f32) {
        self.drain_inbound();
        self.broadcast_pending();
    }

    fn shutdown(&mut self) {
        self.pending_keys.clear();
        self.pending_text.clear();
    }

    fn post_messages(&mut self, messages: &MessageStream) {
        self.messages_received.append_stream(messages);
    }

    fn collect_messages(&mut self) -> MessageStream {
        self.messages_generated.take()
    }

    fn name(&self) -> &'static str {
        "Input"
    }

    fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initialize_announces_itself() {
        let mut input = Input::new();
        assert!(input.initialize(&Config::default()));

        let mut outbound = input.collect_messages();
        let header = message::extract_header(&mut outbound).unwrap();
        assert_eq!(header.message_type, MessageType::SystemInit);
        let init: SystemInit = message::extract_payload(&mut outbound, &header).unwrap();
        assert_eq!(message::unpack_str(&init.name), "Input");
        assert!(outbound.is_empty());
    }

    #[test]
    fn inbound_broadcast_is_drained_message_by_message() {
        let mut input = Input::new();
        assert!(input.initialize(&Config::default()));
        let _ = input.collect_messages();

        let mut inbound = MessageStream::new();
        message::append_message(
            &mut inbound,
            MessageType::MoveEntity,
            &MoveEntity {
                entity: 7,
                delta: Vec3::X,
            },
        );
        message::append_message(&mut inbound, MessageType::QuitEvent, &QuitEvent {});
        input.post_messages(&inbound);

        input.inject_key(Key::Space, KeyState::Pressed, false, 1);
        input.update(0.016);

        // Inbound fully consumed, and draining it did not eat the injected
        // key's broadcast.
        assert!(input.messages_received.is_empty());
        let mut outbound = input.collect_messages();
        let header = message::extract_header(&mut outbound).unwrap();
        assert_eq!(header.message_type, MessageType::KeyboardEvent);
    }

    #[test]
    fn garbage_inbound_is_discarded_without_output() {
        let mut input = Input::new();
        assert!(input.initialize(&Config::default()));
        let _ = input.collect_messages();

        let mut inbound = MessageStream::new();
        inbound.append(&0xFFFF_u32.to_le_bytes());
        inbound.append(&4_u32.to_le_bytes());
        inbound.append(&[0u8; 4]);
        input.post_messages(&inbound);

        input.update(0.016);

        assert!(input.messages_received.is_empty());
        assert!(input.collect_messages().is_empty());
    }
}
