//! Message Catalog
//!
//! A message stream is a buffer full of messages of different types and
//! sizes. A message is always inserted as a header followed by its payload
//! bytes; to read the stream back, extract a header, look up the payload
//! type for its tag, and extract exactly that many bytes into the matching
//! struct. Extracting the wrong size silently desynchronizes the stream, so
//! the tag→size registry ([`payload_size`]) is authoritative for both the
//! encode and decode paths.
//!
//! Every payload is a fixed-layout [`bytemuck::Pod`] struct: no pointers, no
//! heap data, entities referenced by opaque `u32` id. Strings travel as
//! NUL-padded fixed byte arrays (see [`pack_str`]/[`unpack_str`]). That keeps
//! payloads freely copyable and lets the wire path be a straight memcpy,
//! the same layout discipline the engine would need for GPU-visible structs.
//!
//! The catalog is closed and versionless: adding a tag means adding a struct
//! here, a registry entry, and a dispatch arm (or explicit skip) in every
//! system that can observe it.

pub mod helper;

use bytemuck::{Pod, Zeroable};
use glam::Vec3;
use static_assertions::const_assert_eq;

use crate::common::StreamBuffer;

pub use helper::{append_message, extract_header, extract_payload, skip_payload};

/// A stream of encoded messages. See the module docs for the framing rules.
pub type MessageStream = StreamBuffer;

/// Type of a message. Stable `u32` discriminants form the wire tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum MessageType {
    /// A system finished initializing.
    SystemInit = 0,
    /// A config load was attempted.
    ConfigLoad = 1,
    /// Toggle the console open/closed.
    ConsoleToggle = 2,
    /// Stop the engine at the end of this tick.
    QuitEvent = 3,
    /// A keyboard key changed state.
    KeyboardEvent = 4,
    /// Text was entered while the console is open.
    TextInput = 5,
    /// Move an entity by a world-space delta.
    MoveEntity = 6,
    /// Ask the physics world to move an entity under collision constraints.
    PhysicsMoveRequest = 7,
    /// Resolved result of a [`MessageType::PhysicsMoveRequest`].
    PhysicsMoveResult = 8,
}

impl TryFrom<u32> for MessageType {
    type Error = u32;

    fn try_from(raw: u32) -> Result<Self, u32> {
        Ok(match raw {
            0 => MessageType::SystemInit,
            1 => MessageType::ConfigLoad,
            2 => MessageType::ConsoleToggle,
            3 => MessageType::QuitEvent,
            4 => MessageType::KeyboardEvent,
            5 => MessageType::TextInput,
            6 => MessageType::MoveEntity,
            7 => MessageType::PhysicsMoveRequest,
            8 => MessageType::PhysicsMoveResult,
            _ => return Err(raw),
        })
    }
}

/// Decoded message header. The wire form is two little-endian `u32`s:
/// tag, then payload byte length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageHeader {
    pub message_type: MessageType,
    pub payload_size: u32,
}

/// Registered payload size in bytes for a tag.
///
/// Both `append_message` and `extract_header` consult this; a header whose
/// declared size disagrees is a malformed stream.
pub const fn payload_size(message_type: MessageType) -> u32 {
    let size = match message_type {
        MessageType::SystemInit => std::mem::size_of::<SystemInit>(),
        MessageType::ConfigLoad => std::mem::size_of::<ConfigLoad>(),
        MessageType::ConsoleToggle => std::mem::size_of::<ConsoleToggle>(),
        MessageType::QuitEvent => std::mem::size_of::<QuitEvent>(),
        MessageType::KeyboardEvent => std::mem::size_of::<KeyboardEvent>(),
        MessageType::TextInput => std::mem::size_of::<TextInput>(),
        MessageType::MoveEntity => std::mem::size_of::<MoveEntity>(),
        MessageType::PhysicsMoveRequest => std::mem::size_of::<PhysicsMoveRequest>(),
        MessageType::PhysicsMoveResult => std::mem::size_of::<PhysicsMoveResult>(),
    };
    size as u32
}

// ============================================================================
// Message payloads
// ============================================================================

/// Maximum length of a name/text field carried in a payload.
pub const NAME_LEN: usize = 32;
/// Maximum length of a path field carried in a payload.
pub const PATH_LEN: usize = 64;

/// Sent by every system once its `initialize` succeeds.
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct SystemInit {
    /// System name, NUL-padded.
    pub name: [u8; NAME_LEN],
}

/// Reports a config load attempt.
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct ConfigLoad {
    /// Config path, NUL-padded.
    pub path: [u8; PATH_LEN],
    /// 1 if the load succeeded, 0 otherwise.
    pub loaded: u32,
}

/// Toggle the console open/closed. No payload data.
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct ConsoleToggle {}

/// Stop the engine. No payload data.
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct QuitEvent {}

/// A key was pressed or released.
///
/// `key` and `state` are raw [`crate::input::Key`] / [`crate::input::KeyState`]
/// discriminants; enums cannot be `Pod` so the conversion happens at the edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Pod, Zeroable)]
#[repr(C)]
pub struct KeyboardEvent {
    /// Key that changed state ([`crate::input::Key`] as `u32`).
    pub key: u32,
    /// New state ([`crate::input::KeyState`] as `u32`).
    pub state: u32,
    /// 1 if this is a key repeat, 0 otherwise.
    pub repeat: u32,
    /// Time stamp of the key event, in milliseconds.
    pub timestamp: u32,
    /// ID of the window with focus (if any).
    pub window_id: u32,
}

/// Text produced while the console is open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Pod, Zeroable)]
#[repr(C)]
pub struct TextInput {
    /// Entered text, NUL-padded.
    pub text: [u8; NAME_LEN],
    /// Time stamp of the text input event, in milliseconds.
    pub timestamp: u32,
    /// ID of the window with focus (if any).
    pub window_id: u32,
}

/// Move an entity by a world-space delta.
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct MoveEntity {
    /// Entity to move.
    pub entity: u32,
    /// Amount and direction to move.
    pub delta: Vec3,
}

/// Ask the physics world to move an entity under collision constraints.
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct PhysicsMoveRequest {
    /// Entity to move.
    pub entity: u32,
    /// Current world-space position.
    pub position: Vec3,
    /// Desired world-space velocity for this tick.
    pub velocity: Vec3,
    /// Per-axis collider radius.
    pub ellipsoid_radius: Vec3,
}

/// Resolved position after collide-and-slide, broadcast next tick.
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct PhysicsMoveResult {
    /// Entity that was moved.
    pub entity: u32,
    /// Final world-space position after collision resolution.
    pub final_position: Vec3,
}

// Wire layout is load-bearing: decode reinterprets raw bytes by these sizes.
const_assert_eq!(std::mem::size_of::<SystemInit>(), 32);
const_assert_eq!(std::mem::size_of::<ConfigLoad>(), 68);
const_assert_eq!(std::mem::size_of::<ConsoleToggle>(), 0);
const_assert_eq!(std::mem::size_of::<QuitEvent>(), 0);
const_assert_eq!(std::mem::size_of::<KeyboardEvent>(), 20);
const_assert_eq!(std::mem::size_of::<TextInput>(), 40);
const_assert_eq!(std::mem::size_of::<MoveEntity>(), 16);
const_assert_eq!(std::mem::size_of::<PhysicsMoveRequest>(), 40);
const_assert_eq!(std::mem::size_of::<PhysicsMoveResult>(), 16);

// ============================================================================
// Fixed-buffer string packing
// ============================================================================

/// Packs a string into a NUL-padded fixed buffer, truncating at `N` bytes.
pub fn pack_str<const N: usize>(s: &str) -> [u8; N] {
    let mut buf = [0u8; N];
    let len = s.len().min(N);
    buf[..len].copy_from_slice(&s.as_bytes()[..len]);
    buf
}

/// Reads a NUL-padded fixed buffer back into a string slice.
///
/// Returns the bytes before the first NUL; non-UTF-8 content (possible only
/// if a packed string was truncated mid-codepoint) comes back empty.
pub fn unpack_str(bytes: &[u8]) -> &str {
    let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
    std::str::from_utf8(&bytes[..end]).unwrap_or("")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pack_unpack_str_round_trip() {
        let packed = pack_str::<NAME_LEN>("PhysicsWorld");
        assert_eq!(unpack_str(&packed), "PhysicsWorld");
    }

    #[test]
    fn pack_str_truncates_at_capacity() {
        let packed = pack_str::<4>("abcdef");
        assert_eq!(&packed, b"abcd");
        assert_eq!(unpack_str(&packed), "abcd");
    }

    #[test]
    fn message_type_tag_round_trip() {
        for raw in 0..=8u32 {
            let ty = MessageType::try_from(raw).unwrap();
            assert_eq!(ty as u32, raw);
        }
        assert_eq!(MessageType::try_from(9), Err(9));
    }
}
