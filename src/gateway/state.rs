use std::sync::Arc;

use crate::history::ChatHistoryStore;
use crate::llm::ChatBackend;
use crate::retrieval::PassageStore;
use crate::search::AdaptiveSearcher;

/// Shared handler state: searcher, model backend and transcript store.
pub struct AppState<S, C> {
    pub searcher: Arc<AdaptiveSearcher<S>>,

    pub backend: Arc<C>,

    pub history: Arc<ChatHistoryStore>,

    /// Passages returned per question unless the request overrides it.
    pub top_k: usize,
}

impl<S, C> Clone for AppState<S, C> {
    fn clone(&self) -> Self {
        Self {
            searcher: Arc::clone(&self.searcher),
            backend: Arc::clone(&self.backend),
            history: Arc::clone(&self.history),
            top_k: self.top_k,
        }
    }
}

impl<S, C> AppState<S, C>
where
    S: PassageStore + 'static,
    C: ChatBackend + 'static,
{
    pub fn new(
        searcher: Arc<AdaptiveSearcher<S>>,
        backend: Arc<C>,
        history: Arc<ChatHistoryStore>,
        top_k: usize,
    ) -> Self {
        Self {
            searcher,
            backend,
            history,
            top_k,
        }
    }
}
