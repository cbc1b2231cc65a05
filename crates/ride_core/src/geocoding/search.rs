use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use serde::Serialize;

use super::{PlaceCandidate, PlaceSearch};
use crate::store::Store;
use crate::task::TaskHandle;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SearchState {
    pub query: String,
    pub candidates: Vec<PlaceCandidate>,
    pub is_searching: bool,
    /// Last failure; candidates are empty when set.
    pub error: Option<String>,
}

/// Place search that waits for typing to pause before calling the service.
///
/// Each call to [`query`](Self::query) cancels the pending one, so only the
/// last text entered within the debounce window reaches the service.
pub struct DebouncedSearch {
    search: Arc<dyn PlaceSearch>,
    delay: Duration,
    state: Store<SearchState>,
    pending: Mutex<Option<TaskHandle>>,
}

impl DebouncedSearch {
    pub const DEFAULT_DELAY: Duration = Duration::from_millis(300);

    pub fn new(search: Arc<dyn PlaceSearch>, delay: Duration) -> Self {
        Self {
            search,
            delay,
            state: Store::default(),
            pending: Mutex::new(None),
        }
    }

    pub fn state(&self) -> Store<SearchState> {
        self.state.clone()
    }

    fn pending(&self) -> MutexGuard<'_, Option<TaskHandle>> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Schedule a search for `text`. Must be called from within a tokio runtime.
    pub fn query(&self, text: &str) {
        let text = text.trim().to_string();
        let mut pending = self.pending();
        if let Some(mut previous) = pending.take() {
            previous.cancel();
        }

        if text.is_empty() {
            self.state.replace(SearchState::default());
            return;
        }

        self.state.update(|state| {
            state.query = text.clone();
            state.is_searching = true;
        });

        let search = Arc::clone(&self.search);
        let state = self.state.clone();
        let delay = self.delay;
        *pending = Some(TaskHandle::spawn(move |token| async move {
            tokio::select! {
                _ = token.cancelled() => return,
                _ = tokio::time::sleep(delay) => {}
            }

            let result = tokio::select! {
                _ = token.cancelled() => return,
                result = search.search(&text) => result,
            };

            state.update_if(|state| {
                if token.is_cancelled() || state.query != text {
                    return false;
                }
                state.is_searching = false;
                match result {
                    Ok(candidates) => {
                        state.candidates = candidates;
                        state.error = None;
                    }
                    Err(err) => {
                        geocoding_warn!("(query) place search failed: {}", err);
                        state.candidates.clear();
                        state.error = Some(err.to_string());
                    }
                }
                true
            });
        }));
    }

    /// Drop any pending search. Returns whether one was pending.
    pub fn cancel(&self) -> bool {
        let cancelled = match self.pending().take() {
            Some(mut handle) => handle.cancel(),
            None => false,
        };
        self.state.update_if(|state| std::mem::replace(&mut state.is_searching, false));
        cancelled
    }
}
