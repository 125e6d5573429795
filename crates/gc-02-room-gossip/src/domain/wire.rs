//! # Message Wire Codec
//!
//! Fixed-prefix binary layout for a single chat datagram.
//!
//! ```text
//! [topic:     32 bytes] offset 0-31   raw SHA-1 digest (20) + zero padding (12)
//! [id:         4 bytes] offset 32-35  big-endian u32
//! [author:    32 bytes] offset 36-67  UTF-8, zero-padded
//! [sent_at:    4 bytes] offset 68-71  big-endian u32, unix seconds
//! [text:      variable] offset 72+    base64(UTF-8 text), length = datagram - 72
//! ```
//!
//! The text is base64-encoded so arbitrary bytes (NUL included) never collide
//! with the zero padding of the fixed fields.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use shared_types::{Author, ChatMessage, Timestamp, TopicHash, TOPIC_HASH_LEN};

use crate::events::GossipError;

/// Width of the topic field.
pub const TOPIC_FIELD_LEN: usize = 32;
/// Width of the author field.
pub const AUTHOR_FIELD_LEN: usize = 32;
/// Length of the fixed prefix preceding the text payload.
pub const HEADER_LEN: usize = 72;

const ID_OFFSET: usize = TOPIC_FIELD_LEN;
const AUTHOR_OFFSET: usize = ID_OFFSET + 4;
const SENT_AT_OFFSET: usize = AUTHOR_OFFSET + AUTHOR_FIELD_LEN;

/// Encode a message into a datagram.
///
/// Infallible: `TopicHash` and `Author` are bounded by construction.
pub fn encode(message: &ChatMessage) -> Vec<u8> {
    let payload = STANDARD.encode(message.text.as_bytes());
    let mut data = Vec::with_capacity(HEADER_LEN + payload.len());

    let mut topic = [0u8; TOPIC_FIELD_LEN];
    topic[..TOPIC_HASH_LEN].copy_from_slice(message.topic.as_bytes());
    data.extend_from_slice(&topic);

    data.extend_from_slice(&message.id.to_be_bytes());

    let mut author = [0u8; AUTHOR_FIELD_LEN];
    let name = message.author.as_bytes();
    author[..name.len()].copy_from_slice(name);
    data.extend_from_slice(&author);

    data.extend_from_slice(&message.sent_at.as_secs().to_be_bytes());
    data.extend_from_slice(payload.as_bytes());

    data
}

/// Decode a datagram into a message.
///
/// # Errors
///
/// Returns `MalformedDatagram` if the buffer is shorter than the 72-byte
/// prefix, the topic padding is not zero, the author field is empty or not
/// UTF-8, or the payload is not base64-encoded UTF-8.
pub fn decode(buf: &[u8]) -> Result<ChatMessage, GossipError> {
    if buf.len() < HEADER_LEN {
        return Err(GossipError::malformed(format!(
            "datagram is {} bytes, prefix needs {HEADER_LEN}",
            buf.len()
        )));
    }

    let topic_field = &buf[..TOPIC_FIELD_LEN];
    if topic_field[TOPIC_HASH_LEN..].iter().any(|&b| b != 0) {
        return Err(GossipError::malformed("topic padding is not zero"));
    }
    let mut digest = [0u8; TOPIC_HASH_LEN];
    digest.copy_from_slice(&topic_field[..TOPIC_HASH_LEN]);
    let topic = TopicHash::from_bytes(digest);

    let id = read_u32(buf, ID_OFFSET);

    let author_field = trim_padding(&buf[AUTHOR_OFFSET..AUTHOR_OFFSET + AUTHOR_FIELD_LEN]);
    let name = std::str::from_utf8(author_field)
        .map_err(|_| GossipError::malformed("author is not UTF-8"))?;
    let author =
        Author::new(name).map_err(|e| GossipError::malformed(format!("author rejected: {e}")))?;

    let sent_at = Timestamp::new(read_u32(buf, SENT_AT_OFFSET));

    let raw_text = STANDARD
        .decode(&buf[HEADER_LEN..])
        .map_err(|e| GossipError::malformed(format!("payload is not base64: {e}")))?;
    let text =
        String::from_utf8(raw_text).map_err(|_| GossipError::malformed("text is not UTF-8"))?;

    Ok(ChatMessage {
        topic,
        id,
        author,
        sent_at,
        text,
    })
}

/// Datagram size for a text of `text_len` bytes.
pub fn encoded_len(text_len: usize) -> usize {
    HEADER_LEN + text_len.div_ceil(3) * 4
}

fn read_u32(buf: &[u8], offset: usize) -> u32 {
    let mut bytes = [0u8; 4];
    bytes.copy_from_slice(&buf[offset..offset + 4]);
    u32::from_be_bytes(bytes)
}

/// Strip trailing zero padding.
fn trim_padding(field: &[u8]) -> &[u8] {
    let end = field.iter().rposition(|&b| b != 0).map_or(0, |i| i + 1);
    &field[..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(author: &str, id: u32, text: &str) -> ChatMessage {
        ChatMessage::new(
            TopicHash::from_room_name("chatik"),
            id,
            Author::new(author).unwrap(),
            Timestamp::new(1_700_000_000),
            text,
        )
    }

    #[test]
    fn test_encode_layout() {
        let msg = message("deviceA", 1, "hi");
        let data = encode(&msg);

        assert_eq!(data.len(), HEADER_LEN + 4);
        assert_eq!(&data[..20], msg.topic.as_bytes());
        assert!(data[20..32].iter().all(|&b| b == 0));
        assert_eq!(&data[32..36], &[0, 0, 0, 1]);
        assert_eq!(&data[36..43], b"deviceA");
        assert!(data[43..68].iter().all(|&b| b == 0));
        assert_eq!(&data[68..72], &1_700_000_000u32.to_be_bytes());
        assert_eq!(&data[72..], b"aGk=");
    }

    #[test]
    fn test_decode_reproduces_message() {
        let msg = message("deviceA", 1, "hi");
        let decoded = decode(&encode(&msg)).unwrap();
        assert_eq!(decoded, msg);
        assert_eq!(decoded.author.as_str(), "deviceA");
        assert_eq!(decoded.text, "hi");
        assert_eq!(decoded.id, 1);
    }

    #[test]
    fn test_roundtrip_awkward_text() {
        for text in ["", "\0\0\0", "line\nbreak", "привет 👋", "a\0b\u{7f}\r\n"] {
            let msg = message("deviceA", 7, text);
            assert_eq!(decode(&encode(&msg)).unwrap(), msg, "text {text:?}");
        }
    }

    #[test]
    fn test_roundtrip_full_width_author() {
        let name = "a".repeat(AUTHOR_FIELD_LEN);
        let msg = message(&name, u32::MAX, "edge");
        assert_eq!(decode(&encode(&msg)).unwrap(), msg);
    }

    #[test]
    fn test_decode_too_short() {
        let data = vec![0u8; HEADER_LEN - 1];
        assert!(matches!(
            decode(&data),
            Err(GossipError::MalformedDatagram { .. })
        ));
    }

    #[test]
    fn test_decode_invalid_payload() {
        let mut data = encode(&message("deviceA", 1, "hi"));
        data.truncate(HEADER_LEN);
        data.extend_from_slice(b"!!not base64!!");
        assert!(matches!(
            decode(&data),
            Err(GossipError::MalformedDatagram { .. })
        ));
    }

    #[test]
    fn test_decode_rejects_empty_author() {
        let mut data = encode(&message("deviceA", 1, "hi"));
        data[AUTHOR_OFFSET..AUTHOR_OFFSET + AUTHOR_FIELD_LEN].fill(0);
        assert!(decode(&data).is_err());
    }

    #[test]
    fn test_decode_rejects_dirty_topic_padding() {
        let mut data = encode(&message("deviceA", 1, "hi"));
        data[25] = b'x';
        assert!(decode(&data).is_err());
    }

    #[test]
    fn test_encoded_len_matches_encode() {
        for text in ["", "h", "hi", "hey", "hello world"] {
            let msg = message("deviceA", 1, text);
            assert_eq!(encode(&msg).len(), encoded_len(text.len()));
        }
    }
}
