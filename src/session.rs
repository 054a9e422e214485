use anyhow::Result;
use std::sync::Arc;
use uuid::Uuid;

use crate::conversation::{Conversation, SessionToken, WELCOME_GREETING};
use crate::error::TransportError;
use crate::events::Message;
use crate::storage::{HistoryEntry, HistoryStore};
use crate::transport::{ChatTransport, CONNECT_ERROR_REPLY};

/// A message accepted into the conversation and waiting for its reply
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingSend {
    pub token: SessionToken,
    pub user_id: String,
    pub message: String,
}

/// Chat session: conversation state, persisted history and transport
pub struct ChatSession {
    user_id: String,
    conversation: Conversation,
    store: HistoryStore,
    history: Vec<HistoryEntry>,
    transport: Arc<dyn ChatTransport>,
}

impl ChatSession {
    /// Start a session with a fresh user id. First launch (no history)
    /// opens with the welcome greeting.
    pub fn new(store: HistoryStore, transport: Arc<dyn ChatTransport>) -> Self {
        let history = store.load();
        let conversation = if history.is_empty() {
            Conversation::with_greeting(WELCOME_GREETING)
        } else {
            Conversation::new()
        };
        let user_id = Uuid::new_v4().to_string();
        tracing::info!(%user_id, entries = history.len(), "chat session started");

        Self {
            user_id,
            conversation,
            store,
            history,
            transport,
        }
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn messages(&self) -> &[Message] {
        self.conversation.messages()
    }

    /// Stored entries, newest first
    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    pub fn transport(&self) -> Arc<dyn ChatTransport> {
        Arc::clone(&self.transport)
    }

    /// Optimistically append the user's message. Blank input yields `None`
    /// and must not reach the transport.
    pub fn begin_send(&mut self, text: &str) -> Option<PendingSend> {
        let token = self.conversation.append_user(text)?;
        Some(PendingSend {
            token,
            user_id: self.user_id.clone(),
            message: text.to_string(),
        })
    }

    /// Perform the transport call for a pending send
    pub async fn deliver(
        transport: Arc<dyn ChatTransport>,
        pending: &PendingSend,
    ) -> Result<String, TransportError> {
        transport.send(&pending.user_id, &pending.message).await
    }

    /// Record the outcome of a transport call.
    ///
    /// Failures become the fixed apology. Returns `false` when the reply
    /// belongs to a conversation that has since been reset or replaced; such
    /// replies are neither shown nor persisted.
    pub fn complete(
        &mut self,
        token: SessionToken,
        result: Result<String, TransportError>,
    ) -> Result<bool> {
        let reply = match result {
            Ok(reply) => reply,
            Err(e) => {
                tracing::warn!(error = %e, "chat request failed");
                CONNECT_ERROR_REPLY.to_string()
            }
        };

        if !self.conversation.accept_reply(token, &reply) {
            tracing::info!("discarding reply for a replaced conversation");
            return Ok(false);
        }

        self.history = self.store.append(self.conversation.messages())?;
        Ok(true)
    }

    /// Send a message and wait for its reply
    pub async fn send(&mut self, text: &str) -> Result<bool> {
        let Some(pending) = self.begin_send(text) else {
            return Ok(false);
        };
        let result = Self::deliver(self.transport(), &pending).await;
        self.complete(pending.token, result)
    }

    pub fn reset(&mut self) {
        self.conversation.reset();
    }

    /// Show a stored conversation. Unknown ids are ignored.
    pub fn load_from(&mut self, id: &Uuid) -> bool {
        self.conversation.load_from(id, &self.history)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversation::RESET_GREETING;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use tempfile::TempDir;

    /// Transport that records calls and answers from a script
    struct FakeTransport {
        reply: Option<&'static str>,
        calls: Mutex<Vec<(String, String)>>,
    }

    impl FakeTransport {
        fn replying(reply: &'static str) -> Arc<Self> {
            Arc::new(Self {
                reply: Some(reply),
                calls: Mutex::new(Vec::new()),
            })
        }

        fn failing() -> Arc<Self> {
            Arc::new(Self {
                reply: None,
                calls: Mutex::new(Vec::new()),
            })
        }

        fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl ChatTransport for FakeTransport {
        async fn send(&self, user_id: &str, message: &str) -> Result<String, TransportError> {
            self.calls
                .lock()
                .unwrap()
                .push((user_id.to_string(), message.to_string()));
            match self.reply {
                Some(reply) => Ok(reply.to_string()),
                None => Err(serde_json::from_str::<serde_json::Value>("not json")
                    .unwrap_err()
                    .into()),
            }
        }
    }

    fn session(dir: &TempDir, transport: Arc<FakeTransport>) -> ChatSession {
        let store = HistoryStore::new(dir.path().join("history.json"), None);
        ChatSession::new(store, transport)
    }

    #[test]
    fn first_launch_shows_welcome() {
        let dir = TempDir::new().unwrap();
        let session = session(&dir, FakeTransport::replying("Hi"));
        assert_eq!(session.messages(), &[Message::bot(WELCOME_GREETING)]);
    }

    #[tokio::test]
    async fn returning_user_starts_empty() {
        let dir = TempDir::new().unwrap();
        let mut first = session(&dir, FakeTransport::replying("Hi there"));
        first.send("Hello").await.unwrap();

        let second = session(&dir, FakeTransport::replying("Hi there"));
        assert!(second.messages().is_empty());
        assert_eq!(second.history().len(), 1);
        assert_ne!(first.user_id(), second.user_id());
    }

    #[tokio::test]
    async fn successful_send_appends_user_then_bot() {
        let dir = TempDir::new().unwrap();
        let transport = FakeTransport::replying("Hi there");
        let mut session = session(&dir, transport.clone());
        session.reset();

        let pending = session.begin_send("Hello").unwrap();
        assert_eq!(session.messages().last(), Some(&Message::user("Hello")));

        let result = ChatSession::deliver(session.transport(), &pending).await;
        assert!(session.complete(pending.token, result).unwrap());

        let tail = &session.messages()[1..];
        assert_eq!(tail, &[Message::user("Hello"), Message::bot("Hi there")]);
        assert_eq!(
            transport.calls.lock().unwrap()[0],
            (session.user_id().to_string(), "Hello".to_string())
        );
    }

    #[tokio::test]
    async fn failed_send_records_apology_and_persists_it() {
        let dir = TempDir::new().unwrap();
        let mut session = session(&dir, FakeTransport::failing());
        session.reset();

        assert!(session.send("Hello").await.unwrap());
        assert_eq!(
            session.messages().last(),
            Some(&Message::bot(CONNECT_ERROR_REPLY))
        );
        assert_eq!(session.history().len(), 1);
        assert_eq!(session.history()[0].messages, session.messages());
    }

    #[tokio::test]
    async fn blank_send_does_nothing() {
        let dir = TempDir::new().unwrap();
        let transport = FakeTransport::replying("Hi");
        let mut session = session(&dir, transport.clone());
        let before = session.messages().to_vec();

        assert!(!session.send("   ").await.unwrap());
        assert!(!session.send("").await.unwrap());
        assert_eq!(session.messages(), before.as_slice());
        assert_eq!(transport.call_count(), 0);
        assert!(session.history().is_empty());
    }

    #[tokio::test]
    async fn every_send_persists_a_snapshot() {
        let dir = TempDir::new().unwrap();
        let mut session = session(&dir, FakeTransport::replying("ok"));

        session.send("one").await.unwrap();
        session.send("two").await.unwrap();

        assert_eq!(session.history().len(), 2);
        assert_eq!(session.history()[0].messages, session.messages());
        assert_eq!(session.history()[1].messages.len(), session.messages().len() - 2);
    }

    #[tokio::test]
    async fn stale_reply_after_reset_is_dropped() {
        let dir = TempDir::new().unwrap();
        let mut session = session(&dir, FakeTransport::replying("late"));

        let pending = session.begin_send("Hello").unwrap();
        session.reset();
        let result = ChatSession::deliver(session.transport(), &pending).await;

        assert!(!session.complete(pending.token, result).unwrap());
        assert_eq!(session.messages(), &[Message::bot(RESET_GREETING)]);
        assert!(session.history().is_empty());
    }

    #[tokio::test]
    async fn load_from_replays_stored_conversation() {
        let dir = TempDir::new().unwrap();
        let mut session = session(&dir, FakeTransport::replying("Hello!"));
        session.reset();
        session.send("Hi").await.unwrap();
        let stored = session.history()[0].clone();

        session.reset();
        assert!(session.load_from(&stored.id));
        assert_eq!(session.messages(), stored.messages.as_slice());

        let before = session.messages().to_vec();
        assert!(!session.load_from(&Uuid::new_v4()));
        assert_eq!(session.messages(), before.as_slice());
    }
}
