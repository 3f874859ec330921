//! Stream Buffer
//!
//! Growable byte buffer with a read cursor, the substrate of the message
//! system.  Appends always go to the tail and extraction always advances the
//! cursor forward: reads are FIFO, destructive and single-pass.  There is no
//! rewinding and no random access, which keeps ownership of in-flight
//! messages trivial to reason about.
//!
//! Buffers are moved between systems by value (see [`StreamBuffer::take`]);
//! backpressure is out of scope since the engine is single-threaded and a
//! buffer only lives for one tick.

use bytemuck::Pod;

use crate::error::StreamError;

/// Ordered byte sequence plus a read offset.
#[derive(Debug, Default, Clone)]
pub struct StreamBuffer {
    bytes: Vec<u8>,
    read_offset: usize,
}

impl StreamBuffer {
    /// Creates an empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends raw bytes to the tail. Never fails.
    pub fn append(&mut self, bytes: &[u8]) {
        self.bytes.extend_from_slice(bytes);
    }

    /// Appends the raw byte representation of a Pod value.
    pub fn append_value<T: Pod>(&mut self, value: &T) {
        self.append(bytemuck::bytes_of(value));
    }

    /// Returns exactly `count` bytes starting at the read offset and advances
    /// the offset past them.
    ///
    /// Fails with [`StreamError::Underflow`] if fewer than `count` unread
    /// bytes remain; the offset is untouched in that case so the caller can
    /// decide whether to discard the stream.
    pub fn extract(&mut self, count: usize) -> Result<&[u8], StreamError> {
        let available = self.available_bytes();
        if count > available {
            return Err(StreamError::Underflow {
                requested: count,
                available,
            });
        }

        let start = self.read_offset;
        self.read_offset += count;
        Ok(&self.bytes[start..self.read_offset])
    }

    /// Extracts `size_of::<T>()` bytes and reinterprets them as a `T`.
    pub fn extract_value<T: Pod>(&mut self) -> Result<T, StreamError> {
        let bytes = self.extract(std::mem::size_of::<T>())?;
        Ok(bytemuck::pod_read_unaligned(bytes))
    }

    /// Number of unread bytes (length minus read offset).
    pub fn available_bytes(&self) -> usize {
        self.bytes.len() - self.read_offset
    }

    /// The unread remainder as a slice, without consuming it.
    ///
    /// Used only for bulk hand-off ([`StreamBuffer::append_stream`]); message
    /// consumers must go through `extract` so the cursor stays in sync.
    pub fn unread(&self) -> &[u8] {
        &self.bytes[self.read_offset..]
    }

    /// Appends another buffer's unread remainder onto this buffer's tail.
    ///
    /// This is the router's concatenation primitive: collected streams are
    /// merged into one combined stream, and the combined stream is fanned out
    /// to every system's inbound buffer.
    pub fn append_stream(&mut self, other: &StreamBuffer) {
        self.append(other.unread());
    }

    /// Resets to empty with the read offset at zero.
    pub fn clear(&mut self) {
        self.bytes.clear();
        self.read_offset = 0;
    }

    /// Moves the buffer's contents out, leaving this buffer empty.
    ///
    /// This is the take-and-clear operation behind `collect_messages`:
    /// ownership of the produced messages transfers to the caller exactly
    /// once.
    pub fn take(&mut self) -> StreamBuffer {
        std::mem::take(self)
    }

    /// True if no unread bytes remain.
    pub fn is_empty(&self) -> bool {
        self.available_bytes() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_then_extract_is_fifo() {
        let mut buf = StreamBuffer::new();
        buf.append(&[1, 2, 3]);
        buf.append(&[4, 5]);

        assert_eq!(buf.available_bytes(), 5);
        assert_eq!(buf.extract(2).unwrap(), &[1, 2]);
        assert_eq!(buf.extract(3).unwrap(), &[3, 4, 5]);
        assert_eq!(buf.available_bytes(), 0);
    }

    #[test]
    fn extract_past_end_underflows_without_advancing() {
        let mut buf = StreamBuffer::new();
        buf.append(&[1, 2, 3]);

        let err = buf.extract(4).unwrap_err();
        assert!(matches!(
            err,
            StreamError::Underflow {
                requested: 4,
                available: 3
            }
        ));
        // Offset untouched, a valid extract still works.
        assert_eq!(buf.extract(3).unwrap(), &[1, 2, 3]);
    }

    #[test]
    fn pod_value_round_trip() {
        let mut buf = StreamBuffer::new();
        buf.append_value(&0xDEAD_BEEF_u32);
        buf.append_value(&7.5_f32);

        assert_eq!(buf.extract_value::<u32>().unwrap(), 0xDEAD_BEEF);
        assert_eq!(buf.extract_value::<f32>().unwrap(), 7.5);
    }

    #[test]
    fn append_stream_copies_only_unread_remainder() {
        let mut src = StreamBuffer::new();
        src.append(&[1, 2, 3, 4]);
        src.extract(2).unwrap();

        let mut dst = StreamBuffer::new();
        dst.append(&[9]);
        dst.append_stream(&src);

        assert_eq!(dst.extract(3).unwrap(), &[9, 3, 4]);
    }

    #[test]
    fn take_leaves_buffer_empty() {
        let mut buf = StreamBuffer::new();
        buf.append(&[1, 2, 3]);

        let mut taken = buf.take();
        assert_eq!(buf.available_bytes(), 0);
        assert_eq!(taken.extract(3).unwrap(), &[1, 2, 3]);
    }

    #[test]
    fn clear_resets_offset() {
        let mut buf = StreamBuffer::new();
        buf.append(&[1, 2, 3]);
        buf.extract(1).unwrap();
        buf.clear();

        assert_eq!(buf.available_bytes(), 0);
        buf.append(&[7]);
        assert_eq!(buf.extract(1).unwrap(), &[7]);
    }
}
