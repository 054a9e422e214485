use serde::{Deserialize, Serialize};

use crate::conversation::SessionToken;
use crate::error::TransportError;

/// Internal application events delivered to the shell loop
#[derive(Debug)]
pub enum AppEvent {
    /// A transport call finished, successfully or not
    ReplyReady {
        token: SessionToken,
        result: Result<String, TransportError>,
    },
}

/// Who wrote a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Bot,
}

impl Sender {
    /// Speaker label used in exported transcripts
    pub fn speaker(&self) -> &'static str {
        match self {
            Sender::User => "You",
            Sender::Bot => "Relie",
        }
    }
}

/// A single chat message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub sender: Sender,
    pub text: String,
}

impl Message {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            sender: Sender::User,
            text: text.into(),
        }
    }

    pub fn bot(text: impl Into<String>) -> Self {
        Self {
            sender: Sender::Bot,
            text: text.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_serializes_with_lowercase_sender() {
        let json = serde_json::to_string(&Message::user("Hi")).unwrap();
        assert_eq!(json, r#"{"sender":"user","text":"Hi"}"#);

        let parsed: Message = serde_json::from_str(r#"{"sender":"bot","text":"Hello!"}"#).unwrap();
        assert_eq!(parsed, Message::bot("Hello!"));
    }
}
