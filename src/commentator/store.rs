//! Per-conversation commentator storage.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use crate::config::CommentatorConfig;
use crate::llm::CompletionClient;

use super::Commentator;

/// Thread-safe map from conversation id to its [`Commentator`].
///
/// All commentators share one completion client and one configuration.
#[derive(Clone)]
pub struct CommentatorStore {
    inner: Arc<CommentatorStoreInner>,
}

struct CommentatorStoreInner {
    client: Arc<dyn CompletionClient>,
    config: CommentatorConfig,
    commentators: RwLock<HashMap<String, Arc<Commentator>>>,
}

impl std::fmt::Debug for CommentatorStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommentatorStore")
            .field("config", &self.inner.config)
            .field("len", &self.len())
            .finish()
    }
}

impl CommentatorStore {
    #[must_use]
    pub fn new(client: Arc<dyn CompletionClient>, config: CommentatorConfig) -> Self {
        Self {
            inner: Arc::new(CommentatorStoreInner {
                client,
                config,
                commentators: RwLock::new(HashMap::new()),
            }),
        }
    }

    /// Get the commentator for a conversation.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<Arc<Commentator>> {
        let guard = self
            .inner
            .commentators
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        guard.get(id).cloned()
    }

    /// Get the commentator for a conversation, creating it if it doesn't exist.
    #[must_use]
    pub fn get_or_create(&self, id: &str) -> Arc<Commentator> {
        if let Some(existing) = self.get(id) {
            return existing;
        }

        let mut guard = self
            .inner
            .commentators
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        // Another request may have inserted it between the two locks.
        Arc::clone(guard.entry(id.to_string()).or_insert_with(|| {
            tracing::debug!(conversation_id = %id, "Created commentator");
            Arc::new(Commentator::new(
                Arc::clone(&self.inner.client),
                &self.inner.config,
            ))
        }))
    }

    /// Remove a conversation's commentator.
    pub fn remove(&self, id: &str) -> Option<Arc<Commentator>> {
        self.inner
            .commentators
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.inner
            .commentators
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::{ChatCompletionRequest, CompletionError};

    struct NeverCalled;

    #[async_trait::async_trait]
    impl CompletionClient for NeverCalled {
        async fn complete(&self, _req: &ChatCompletionRequest) -> Result<String, CompletionError> {
            Err(CompletionError::MissingContent)
        }
    }

    #[test]
    fn test_commentator_store() {
        let store = CommentatorStore::new(Arc::new(NeverCalled), CommentatorConfig::default());
        assert!(store.is_empty());

        let a = store.get_or_create("conv-1");
        let again = store.get_or_create("conv-1");
        assert!(Arc::ptr_eq(&a, &again));
        assert_eq!(store.len(), 1);

        let b = store.get_or_create("conv-2");
        assert!(!Arc::ptr_eq(&a, &b));
        assert_eq!(store.len(), 2);

        assert!(store.remove("conv-1").is_some());
        assert!(store.get("conv-1").is_none());
        assert_eq!(store.len(), 1);
    }
}
