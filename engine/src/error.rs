//! Error taxonomy for the message substrate.
//!
//! Collision resolution deliberately has no error type: degenerate geometry
//! or zero velocity yield "no movement", never a failure. Errors only arise
//! on the wire, where a desynchronized stream must be detected and discarded
//! rather than silently mis-read.

use thiserror::Error;

/// Errors produced while reading a message stream.
///
/// All variants are fatal for the affected stream only: the consumer logs,
/// discards the stream and carries on. They never abort the engine.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum StreamError {
    /// Tried to extract more bytes than remain unread. Indicates a truncated
    /// or desynchronized stream.
    #[error("stream underflow: requested {requested} bytes, {available} available")]
    Underflow { requested: usize, available: usize },

    /// Header declared a payload size that does not match the registered size
    /// for its tag.
    #[error("malformed header: tag {tag} declared {declared} bytes, registry expects {expected}")]
    MalformedHeader {
        tag: u32,
        declared: u32,
        expected: u32,
    },

    /// Header carried a tag outside the closed catalog; no consumer can
    /// handle it, and without a registry entry its payload cannot even be
    /// skipped over.
    #[error("unhandled message type: tag {tag}")]
    UnhandledMessageType { tag: u32 },
}
