//! Common utilities shared by every engine layer.

pub mod stream_buffer;

pub use stream_buffer::StreamBuffer;
