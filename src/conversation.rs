//! In-memory state of the visible conversation

use uuid::Uuid;

use crate::events::Message;
use crate::storage::{find_entry, HistoryEntry};

/// Greeting shown on first launch, when no history exists yet
pub const WELCOME_GREETING: &str =
    "👋 Hi! I'm Relie, your emotional support assistant.\nI'm here to listen anytime 💙";

/// Greeting that replaces the conversation on reset
pub const RESET_GREETING: &str =
    "👋 Hi again! I'm here for you anytime. Feel free to talk to me 💙";

/// Identifies the conversation a pending reply was issued for.
///
/// A new token is minted whenever the conversation is replaced wholesale
/// (reset or history load), so replies issued before that point are stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionToken(u64);

/// Ordered messages of the active session
#[derive(Debug, Clone)]
pub struct Conversation {
    messages: Vec<Message>,
    token: SessionToken,
}

impl Default for Conversation {
    fn default() -> Self {
        Self::new()
    }
}

impl Conversation {
    pub fn new() -> Self {
        Self {
            messages: Vec::new(),
            token: SessionToken(0),
        }
    }

    /// Conversation seeded with a single bot greeting
    pub fn with_greeting(text: &str) -> Self {
        let mut conversation = Self::new();
        conversation.append_bot(text);
        conversation
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn token(&self) -> SessionToken {
        self.token
    }

    /// Append a user message. Blank input is rejected.
    pub fn append_user(&mut self, text: &str) -> Option<SessionToken> {
        if text.trim().is_empty() {
            return None;
        }
        self.messages.push(Message::user(text));
        Some(self.token)
    }

    pub fn append_bot(&mut self, text: &str) {
        self.messages.push(Message::bot(text));
    }

    /// Append a bot reply if it belongs to the current session
    pub fn accept_reply(&mut self, token: SessionToken, text: &str) -> bool {
        if token != self.token {
            return false;
        }
        self.append_bot(text);
        true
    }

    pub fn reset(&mut self) {
        self.replace(vec![Message::bot(RESET_GREETING)]);
    }

    /// Replace the conversation with a stored entry's messages.
    /// Unknown ids leave the conversation untouched.
    pub fn load_from(&mut self, id: &Uuid, entries: &[HistoryEntry]) -> bool {
        match find_entry(entries, id) {
            Some(entry) => {
                self.replace(entry.messages.clone());
                true
            }
            None => false,
        }
    }

    fn replace(&mut self, messages: Vec<Message>) {
        self.messages = messages;
        self.token = SessionToken(self.token.0 + 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::Sender;

    fn entry(messages: Vec<Message>) -> HistoryEntry {
        HistoryEntry {
            id: Uuid::new_v4(),
            timestamp: "1/2/2026, 9:00:00 AM".to_string(),
            messages,
        }
    }

    #[test]
    fn blank_input_is_rejected() {
        let mut conversation = Conversation::new();
        assert!(conversation.append_user("").is_none());
        assert!(conversation.append_user("   \t\n").is_none());
        assert!(conversation.messages().is_empty());
    }

    #[test]
    fn user_text_is_kept_untrimmed() {
        let mut conversation = Conversation::new();
        assert!(conversation.append_user("  Hello ").is_some());
        assert_eq!(conversation.messages(), &[Message::user("  Hello ")]);
    }

    #[test]
    fn reset_replaces_with_greeting() {
        let mut conversation = Conversation::new();
        conversation.append_user("Hello");
        conversation.append_bot("Hi there");
        conversation.reset();

        assert_eq!(conversation.messages().len(), 1);
        assert_eq!(conversation.messages()[0].sender, Sender::Bot);
        assert_eq!(conversation.messages()[0].text, RESET_GREETING);
    }

    #[test]
    fn load_from_known_entry_copies_messages() {
        let stored = entry(vec![Message::user("Hi"), Message::bot("Hello!")]);
        let entries = vec![stored.clone()];

        let mut conversation = Conversation::with_greeting(WELCOME_GREETING);
        assert!(conversation.load_from(&stored.id, &entries));
        assert_eq!(conversation.messages(), stored.messages.as_slice());
    }

    #[test]
    fn load_from_unknown_entry_is_noop() {
        let entries = vec![entry(vec![Message::user("Hi")])];
        let mut conversation = Conversation::new();
        conversation.append_user("keep me");
        let token = conversation.token();

        assert!(!conversation.load_from(&Uuid::new_v4(), &entries));
        assert_eq!(conversation.messages(), &[Message::user("keep me")]);
        assert_eq!(conversation.token(), token);
    }

    #[test]
    fn reply_after_reset_is_discarded() {
        let mut conversation = Conversation::new();
        let token = conversation.append_user("Hello").unwrap();
        conversation.reset();

        assert!(!conversation.accept_reply(token, "late reply"));
        assert_eq!(conversation.messages().len(), 1);

        let fresh = conversation.append_user("again").unwrap();
        assert!(conversation.accept_reply(fresh, "on time"));
        assert_eq!(conversation.messages().last(), Some(&Message::bot("on time")));
    }
}
