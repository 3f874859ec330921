//! Console system
//!
//! Human-readable observer of the message bus. Buffers output lines while
//! processing the tick's messages and flushes them to stdout at the end of
//! each update, so one tick's output appears as one contiguous block.

use std::io::Write;

use crate::config::Config;
use crate::error::StreamError;
use crate::input::{Key, KeyState};
use crate::message::{
    self, ConfigLoad, KeyboardEvent, MessageStream, MessageType, PhysicsMoveResult, SystemInit,
    TextInput,
};
use crate::system::System;

/// Console observer system.
#[derive(Default)]
pub struct Console {
    is_open: bool,
    buffer: String,
    messages_generated: MessageStream,
    messages_received: MessageStream,
}

impl Console {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the console is currently open (echoing input).
    pub fn is_open(&self) -> bool {
        self.is_open
    }

    fn flush(&mut self) {
        if self.buffer.is_empty() {
            return;
        }
        print!("{}", self.buffer);
        let _ = std::io::stdout().flush();
        self.buffer.clear();
    }

    fn out(&mut self, line: std::fmt::Arguments) {
        self.buffer.push_str("Console out: ");
        self.buffer.push_str(&line.to_string());
        self.buffer.push('\n');
    }

    fn process_events(&mut self) {
        let mut messages = self.messages_received.take();

        while !messages.is_empty() {
            if let Err(err) = self.dispatch(&mut messages) {
                log::error!("Console: discarding inbound stream: {err}");
                break;
            }
        }
    }

    fn dispatch(&mut self, messages: &mut MessageStream) -> Result<(), StreamError> {
        let header = message::extract_header(messages)?;

        match header.message_type {
            MessageType::SystemInit => {
                let init: SystemInit = message::extract_payload(messages, &header)?;
                self.out(format_args!(
                    "{} system initialized.",
                    message::unpack_str(&init.name)
                ));
            }
            MessageType::ConfigLoad => {
                let load: ConfigLoad = message::extract_payload(messages, &header)?;
                let path = message::unpack_str(&load.path);
                if load.loaded != 0 {
                    self.out(format_args!("Loaded config file: \"{path}\""));
                } else {
                    self.out(format_args!("Failed to load config file: \"{path}\""));
                }
            }
            MessageType::ConsoleToggle => {
                message::skip_payload(messages, &header)?;
                self.is_open = !self.is_open;
                self.out(format_args!(
                    "Console {}.",
                    if self.is_open { "opened" } else { "closed" }
                ));
            }
            MessageType::KeyboardEvent => {
                let event: KeyboardEvent = message::extract_payload(messages, &header)?;
                if self.is_open && KeyState::from(event.state) == KeyState::Pressed {
                    self.out(format_args!(
                        "Key pressed: '{}'.",
                        Key::from(event.key).label()
                    ));
                }
            }
            MessageType::TextInput => {
                let text: TextInput = message::extract_payload(messages, &header)?;
                if self.is_open {
                    self.out(format_args!("{}", message::unpack_str(&text.text)));
                }
            }
            MessageType::PhysicsMoveResult => {
                let result: PhysicsMoveResult = message::extract_payload(messages, &header)?;
                self.out(format_args!(
                    "Entity {} moved to {:?}.",
                    result.entity, result.final_position
                ));
            }
            MessageType::QuitEvent => {
                message::skip_payload(messages, &header)?;
                self.out(format_args!("Quit requested."));
            }
            // Observed under broadcast but not console-worthy.
            MessageType::MoveEntity | MessageType::PhysicsMoveRequest => {
                message::skip_payload(messages, &header)?;
            }
        }

        Ok(())
    }
}

impl System for Console {
    fn initialize(&mut self, config: &Config) -> bool {
        self.is_open = config.console_open;

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
        self.flush();
    }

    fn shutdown(&mut self) {
        self.flush();
    }

    fn post_messages(&mut self, messages: &MessageStream) {
        self.messages_received.append_stream(messages);
    }

    fn collect_messages(&mut self) -> MessageStream {
        self.messages_generated.take()
    }

    fn name(&self) -> &'static str {
        "Console"
    }

    fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
        self
    }
}
