//! Chat service - messages under `events/{eventId}/chat`

use std::sync::Arc;

use eventide_domain::constants::ANONYMOUS_SENDER;
use eventide_domain::{ChatMessage, Document, EventideError, FieldValue, OrderBy, Result};
use tracing::debug;

use crate::auth::AuthProvider;
use crate::document_ports::DocumentStore;
use crate::utils::{fields, paths};

/// Chat service
pub struct ChatService {
    auth: Arc<dyn AuthProvider>,
    documents: Arc<dyn DocumentStore>,
}

impl ChatService {
    pub fn new(auth: Arc<dyn AuthProvider>, documents: Arc<dyn DocumentStore>) -> Self {
        Self { auth, documents }
    }

    /// Post `text` to the event's room as the current user.
    ///
    /// Returns the new message id, or `None` when `text` is blank and nothing
    /// was sent.
    pub async fn send_message(&self, event_id: &str, text: &str) -> Result<Option<String>> {
        let user = self.auth.current_user().ok_or(EventideError::AuthenticationRequired)?;
        let text = text.trim();
        if text.is_empty() {
            return Ok(None);
        }

        let sender_name = user
            .display_name
            .clone()
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| ANONYMOUS_SENDER.to_string());
        let message = fields([
            ("senderId", FieldValue::from(user.uid.as_str())),
            ("senderName", sender_name.into()),
            ("message", text.into()),
            ("timestamp", FieldValue::ServerTimestamp),
        ]);

        let id = self.documents.add(&paths::chat(event_id)?, message).await?;
        debug!(event_id, message_id = %id, "Chat message sent");
        Ok(Some(id))
    }

    /// Messages in the event's room, oldest first.
    pub async fn list_messages(&self, event_id: &str) -> Result<Vec<ChatMessage>> {
        let documents =
            self.documents.list(&paths::chat(event_id)?, Some(OrderBy::asc("timestamp"))).await?;
        Ok(documents.iter().map(to_message).collect())
    }

    /// Whether `message` was sent by the signed-in user.
    pub fn is_own(&self, message: &ChatMessage) -> bool {
        self.auth.current_user().is_some_and(|user| user.uid == message.sender_id)
    }
}

fn to_message(doc: &Document) -> ChatMessage {
    let text = |field: &str| doc.get_str(field).unwrap_or_default().to_string();
    ChatMessage {
        id: doc.id.clone(),
        sender_id: text("senderId"),
        sender_name: doc
            .get_str("senderName")
            .map_or_else(|| ANONYMOUS_SENDER.to_string(), str::to_string),
        message: text("message"),
        timestamp: doc.get_timestamp("timestamp"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{InMemoryAuthProvider, InMemoryDocumentStore};

    fn service(auth: InMemoryAuthProvider, documents: &Arc<InMemoryDocumentStore>) -> ChatService {
        ChatService::new(Arc::new(auth), documents.clone())
    }

    #[tokio::test]
    async fn messages_list_in_send_order() {
        let documents = Arc::new(InMemoryDocumentStore::new());
        let alice = service(InMemoryAuthProvider::signed_in("alice", None), &documents);
        let bob = service(InMemoryAuthProvider::signed_in("bob", None), &documents);

        alice.send_message("evt-42", "first").await.unwrap();
        bob.send_message("evt-42", "  second  ").await.unwrap();

        let messages = alice.list_messages("evt-42").await.unwrap();
        let texts: Vec<_> = messages.iter().map(|m| m.message.as_str()).collect();
        assert_eq!(texts, ["first", "second"]);
        assert!(alice.is_own(&messages[0]));
        assert!(!alice.is_own(&messages[1]));
        assert_eq!(messages[1].sender_name, "Anonymous");
    }

    #[tokio::test]
    async fn blank_message_is_not_sent() {
        let documents = Arc::new(InMemoryDocumentStore::new());
        let chat = service(InMemoryAuthProvider::signed_in("alice", None), &documents);

        assert_eq!(chat.send_message("evt-42", "   ").await.unwrap(), None);
        assert!(documents.is_empty());
    }

    #[tokio::test]
    async fn sending_requires_session() {
        let documents = Arc::new(InMemoryDocumentStore::new());
        let chat = service(InMemoryAuthProvider::new(), &documents);

        assert_eq!(
            chat.send_message("evt-42", "hi").await,
            Err(EventideError::AuthenticationRequired)
        );
    }

    #[tokio::test]
    async fn display_name_labels_messages() {
        let documents = Arc::new(InMemoryDocumentStore::new());
        let chat = service(InMemoryAuthProvider::new(), &documents);
        let auth = InMemoryAuthProvider::new();
        auth.sign_in_with_id_token("google.com", "tok").await.unwrap();
        let google = service(auth, &documents);

        google.send_message("evt-42", "hello").await.unwrap();

        let messages = chat.list_messages("evt-42").await.unwrap();
        assert_eq!(messages[0].sender_name, "Google User");
        assert!(messages[0].timestamp.is_some());
        assert!(!chat.is_own(&messages[0]));
    }
}
