use std::{collections::HashMap, sync::Arc};

use tokio::sync::Mutex;

use super::dto::ChatMessage;

pub type Transcript = Arc<Mutex<Vec<ChatMessage>>>;

/// Per-user conversation history, kept in memory only.
///
/// Each transcript sits behind its own lock: holding it for the whole
/// request serializes concurrent calls for one user while different users
/// proceed independently. Nothing is evicted.
#[derive(Default)]
pub struct TranscriptStore {
    inner: Mutex<HashMap<i64, Transcript>>,
}

impl TranscriptStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the user's transcript, seeding it with `system_prompt` on first contact.
    pub async fn get_or_create(&self, user_id: i64, system_prompt: &str) -> Transcript {
        let mut map = self.inner.lock().await;
        map.entry(user_id)
            .or_insert_with(|| Arc::new(Mutex::new(vec![ChatMessage::system(system_prompt)])))
            .clone()
    }

    #[cfg(test)]
    pub async fn snapshot(&self, user_id: i64) -> Option<Vec<ChatMessage>> {
        let transcript = self.inner.lock().await.get(&user_id).cloned()?;
        let turns = transcript.lock().await;
        Some(turns.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::dto::Role;

    #[tokio::test]
    async fn first_contact_seeds_system_prompt_once() {
        let store = TranscriptStore::new();
        let t = store.get_or_create(1, "prompt").await;
        t.lock().await.push(ChatMessage::user("hello"));

        let again = store.get_or_create(1, "other prompt").await;
        let turns = again.lock().await;
        assert_eq!(turns.len(), 2);
        assert_eq!(turns[0].role, Role::System);
        assert_eq!(turns[0].content, "prompt");
    }

    #[tokio::test]
    async fn users_are_isolated() {
        let store = TranscriptStore::new();
        store
            .get_or_create(1, "p")
            .await
            .lock()
            .await
            .push(ChatMessage::user("from one"));
        store.get_or_create(2, "p").await;

        assert_eq!(store.snapshot(1).await.unwrap().len(), 2);
        assert_eq!(store.snapshot(2).await.unwrap().len(), 1);
        assert!(store.snapshot(3).await.is_none());
    }
}
