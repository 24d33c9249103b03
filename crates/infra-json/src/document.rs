// Queue Document Codec
// One JSON array of strings, four-space indentation, rewritten in full

use serde::Serializer as _;
use serde_json::ser::PrettyFormatter;
use timemachine_core::domain::Message;
use timemachine_core::error::Result;

const INDENT: &[u8] = b"    ";

/// Serialize the queue, head first
pub fn encode<'a, I>(messages: I) -> Result<Vec<u8>>
where
    I: IntoIterator<Item = &'a Message>,
{
    let mut buf = Vec::new();
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(INDENT));
    (&mut ser).collect_seq(messages)?;
    Ok(buf)
}

/// Parse a queue document
///
/// A literal `null` is read as an empty queue.
pub fn decode(bytes: &[u8]) -> std::result::Result<Vec<Message>, serde_json::Error> {
    let messages: Option<Vec<Message>> = serde_json::from_slice(bytes)?;
    Ok(messages.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_layout() {
        let messages = vec![Message::new("stretch"), Message::new("call mom")];
        let bytes = encode(&messages).unwrap();
        assert_eq!(
            String::from_utf8(bytes).unwrap(),
            "[\n    \"stretch\",\n    \"call mom\"\n]"
        );
    }

    #[test]
    fn test_encode_empty() {
        let bytes = encode(std::iter::empty::<&Message>()).unwrap();
        assert_eq!(bytes, b"[]");
    }

    #[test]
    fn test_decode_escapes_and_unicode() {
        let messages = decode("[\"line1\\nline2\", \"quote \\\" here\", \"مرحبا\"]".as_bytes()).unwrap();
        assert_eq!(
            messages,
            vec![
                Message::new("line1\nline2"),
                Message::new("quote \" here"),
                Message::new("مرحبا"),
            ]
        );
    }

    #[test]
    fn test_decode_null_is_empty() {
        assert!(decode(b"null").unwrap().is_empty());
    }

    #[test]
    fn test_decode_rejects_other_shapes() {
        assert!(decode(b"").is_err());
        assert!(decode(b"{\"messages\": []}").is_err());
        assert!(decode(b"[1, 2]").is_err());
        assert!(decode(b"[\"unterminated").is_err());
    }
}
