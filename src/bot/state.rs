use std::collections::HashMap;
use std::sync::Arc;

use teloxide::types::ChatId;
use tokio::sync::Mutex;

use crate::config::Category;

/// Which input the entry flow is waiting for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryStep {
    Category,
    Description,
    Amount,
}

/// Per-chat state of the three-step entry flow.
#[derive(Debug, Clone)]
pub struct EntryState {
    pub step: EntryStep,
    pub category: Option<Category>,
    pub description: Option<String>,
}

impl EntryState {
    /// Fresh state at the start of the flow.
    pub fn new() -> Self {
        Self {
            step: EntryStep::Category,
            category: None,
            description: None,
        }
    }
}

impl Default for EntryState {
    fn default() -> Self {
        Self::new()
    }
}

/// Process-wide store of per-chat conversation state.
///
/// No expiry and no per-chat locking: state is read before and written after
/// each storage round-trip, so rapid-fire input from one chat can interleave.
/// That mirrors the event-driven model this bot is built on; chats are
/// normally a single human typing.
#[derive(Clone, Default)]
pub struct StateStore {
    inner: Arc<Mutex<HashMap<ChatId, EntryState>>>,
}

impl StateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state for the chat, if an entry flow is in progress.
    pub async fn get(&self, chat: ChatId) -> Option<EntryState> {
        self.inner.lock().await.get(&chat).cloned()
    }

    pub async fn set(&self, chat: ChatId, state: EntryState) {
        self.inner.lock().await.insert(chat, state);
    }

    pub async fn clear(&self, chat: ChatId) {
        self.inner.lock().await.remove(&chat);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_get_set_clear() {
        let store = StateStore::new();
        let chat = ChatId(7);

        assert!(store.get(chat).await.is_none());

        store.set(chat, EntryState::new()).await;
        let state = store.get(chat).await.unwrap();
        assert_eq!(state.step, EntryStep::Category);

        store.clear(chat).await;
        assert!(store.get(chat).await.is_none());
    }

    #[tokio::test]
    async fn test_states_are_per_chat() {
        let store = StateStore::new();
        store.set(ChatId(1), EntryState::new()).await;

        assert!(store.get(ChatId(1)).await.is_some());
        assert!(store.get(ChatId(2)).await.is_none());
    }
}
