//! Message Helper
//!
//! Envelope encode/decode on top of [`StreamBuffer`]: header-then-payload
//! framing with the tag→size registry enforced on both sides.

use bytemuck::{Pod, Zeroable};

use crate::common::StreamBuffer;
use crate::error::StreamError;
use crate::message::{MessageHeader, MessageType, payload_size};

/// Header as it appears on the wire.
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
#[repr(C)]
struct RawHeader {
    tag: u32,
    payload_size: u32,
}

/// Encoded size of a message header in bytes.
pub const HEADER_SIZE: usize = std::mem::size_of::<RawHeader>();

/// Appends a header followed by the raw payload bytes.
///
/// The payload struct must be the one registered for `message_type`;
/// mismatched pairings are a programming error caught in debug builds.
pub fn append_message<T: Pod>(stream: &mut StreamBuffer, message_type: MessageType, payload: &T) {
    debug_assert_eq!(
        std::mem::size_of::<T>() as u32,
        payload_size(message_type),
        "payload struct does not match the registry entry for {message_type:?}"
    );

    stream.append_value(&RawHeader {
        tag: message_type as u32,
        payload_size: std::mem::size_of::<T>() as u32,
    });
    stream.append_value(payload);
}

/// Extracts and validates the next message header.
///
/// Fails with [`StreamError::Underflow`] on a truncated stream,
/// [`StreamError::UnhandledMessageType`] if the tag is outside the catalog,
/// and [`StreamError::MalformedHeader`] if the declared payload size
/// disagrees with the registry. Either way the stream is no longer
/// trustworthy and should be discarded by the caller.
pub fn extract_header(stream: &mut StreamBuffer) -> Result<MessageHeader, StreamError> {
    let raw: RawHeader = stream.extract_value()?;

    let message_type = MessageType::try_from(raw.tag)
        .map_err(|tag| StreamError::UnhandledMessageType { tag })?;

    let expected = payload_size(message_type);
    if raw.payload_size != expected {
        return Err(StreamError::MalformedHeader {
            tag: raw.tag,
            declared: raw.payload_size,
            expected,
        });
    }

    Ok(MessageHeader {
        message_type,
        payload_size: raw.payload_size,
    })
}

/// Extracts the payload described by `header` into the struct `T`.
///
/// `T` must be the struct registered for the header's tag; asking for a
/// different size is refused rather than silently desynchronizing the stream.
pub fn extract_payload<T: Pod>(
    stream: &mut StreamBuffer,
    header: &MessageHeader,
) -> Result<T, StreamError> {
    if header.payload_size as usize != std::mem::size_of::<T>() {
        return Err(StreamError::MalformedHeader {
            tag: header.message_type as u32,
            declared: header.payload_size,
            expected: std::mem::size_of::<T>() as u32,
        });
    }
    stream.extract_value()
}

/// Skips over the payload described by `header`.
///
/// The explicit opt-out for tags a system observes but does not care about;
/// under broadcast every system sees every message, so every dispatch loop
/// either handles a tag or skips it through here.
pub fn skip_payload(stream: &mut StreamBuffer, header: &MessageHeader) -> Result<(), StreamError> {
    stream.extract(header.payload_size as usize)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::{KeyboardEvent, QuitEvent, pack_str};

    #[test]
    fn header_then_payload_framing() {
        let mut stream = StreamBuffer::new();
        let event = KeyboardEvent {
            key: 3,
            state: 1,
            repeat: 0,
            timestamp: 1234,
            window_id: 1,
        };
        append_message(&mut stream, MessageType::KeyboardEvent, &event);

        assert_eq!(
            stream.available_bytes(),
            HEADER_SIZE + std::mem::size_of::<KeyboardEvent>()
        );

        let header = extract_header(&mut stream).unwrap();
        assert_eq!(header.message_type, MessageType::KeyboardEvent);
        let decoded: KeyboardEvent = extract_payload(&mut stream, &header).unwrap();
        assert_eq!(decoded, event);
        assert_eq!(stream.available_bytes(), 0);
    }

    #[test]
    fn zero_payload_messages_are_header_only() {
        let mut stream = StreamBuffer::new();
        append_message(&mut stream, MessageType::QuitEvent, &QuitEvent {});
        assert_eq!(stream.available_bytes(), HEADER_SIZE);

        let header = extract_header(&mut stream).unwrap();
        assert_eq!(header.message_type, MessageType::QuitEvent);
        assert_eq!(header.payload_size, 0);
        skip_payload(&mut stream, &header).unwrap();
        assert!(stream.is_empty());
    }

    #[test]
    fn unknown_tag_is_unhandled() {
        let mut stream = StreamBuffer::new();
        stream.append_value(&RawHeader {
            tag: 0xFFFF,
            payload_size: 4,
        });

        let err = extract_header(&mut stream).unwrap_err();
        assert_eq!(err, StreamError::UnhandledMessageType { tag: 0xFFFF });
    }

    #[test]
    fn size_mismatch_is_malformed() {
        let mut stream = StreamBuffer::new();
        stream.append_value(&RawHeader {
            tag: MessageType::QuitEvent as u32,
            payload_size: 12,
        });

        let err = extract_header(&mut stream).unwrap_err();
        assert!(matches!(
            err,
            StreamError::MalformedHeader {
                declared: 12,
                expected: 0,
                ..
            }
        ));
    }

    #[test]
    fn truncated_stream_underflows() {
        let mut stream = StreamBuffer::new();
        let init = crate::message::SystemInit {
            name: pack_str("Console"),
        };
        append_message(&mut stream, MessageType::SystemInit, &init);

        // Lose the tail of the payload.
        let mut truncated = StreamBuffer::new();
        truncated.append(&stream.unread()[..HEADER_SIZE + 4]);

        let header = extract_header(&mut truncated).unwrap();
        let err = extract_payload::<crate::message::SystemInit>(&mut truncated, &header);
        assert!(matches!(err, Err(StreamError::Underflow { .. })));
    }
}
