// Message Domain Model

use serde::{Deserialize, Serialize};
use std::fmt;

/// A queued reminder: opaque UTF-8 text with no identity beyond its content
///
/// Messages are never mutated once created; queue operations only move or
/// remove them. Serializes as a bare JSON string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Message(String);

impl Message {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }

    /// Length in bytes (for logging)
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// True when the message has no visible content
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for Message {
    fn from(text: String) -> Self {
        Self(text)
    }
}

impl From<&str> for Message {
    fn from(text: &str) -> Self {
        Self(text.to_string())
    }
}

impl AsRef<str> for Message {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_as_plain_string() {
        let message = Message::new("drink water");
        let json = serde_json::to_string(&message).unwrap();
        assert_eq!(json, "\"drink water\"");

        let back: Message = serde_json::from_str(&json).unwrap();
        assert_eq!(back, message);
    }

    #[test]
    fn test_blank_detection() {
        assert!(Message::new("").is_blank());
        assert!(Message::new("  \n\t").is_blank());
        assert!(!Message::new(" hi ").is_blank());
        // Whitespace-only is blank but not empty
        assert!(!Message::new(" ").is_empty());
    }
}
