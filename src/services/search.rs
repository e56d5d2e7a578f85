use crate::core::config::SearchConfig;
use crate::core::model::Character;
use crate::services::api::ApiClient;
use crate::utils::time::sleep;
use log::debug;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Debounced name lookup behind the search box.
///
/// Every call to [`suggest`](Self::suggest) supersedes the ones still waiting,
/// so only the last keystroke in a burst reaches the API. Failures are not
/// reported: suggestions are optional and simply come back empty.
#[derive(Clone)]
pub struct SuggestionSearch {
    client: ApiClient,
    debounce: Duration,
    limit: usize,
    generation: Arc<AtomicU64>,
}

impl SuggestionSearch {
    pub fn new(client: ApiClient, config: &SearchConfig) -> Self {
        Self {
            client,
            debounce: Duration::from_millis(config.debounce_ms),
            limit: config.suggestion_limit,
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Returns `None` when a newer query (or `cancel`) arrived in the meantime.
    pub async fn suggest(&self, query: &str) -> Option<Vec<Character>> {
        let ticket = self.generation.fetch_add(1, Ordering::AcqRel) + 1;
        if query.trim().is_empty() {
            return Some(Vec::new());
        }

        sleep(self.debounce).await;
        if self.is_superseded(ticket) {
            return None;
        }

        let suggestions = match self.client.search_characters(query).await {
            Ok(mut found) => {
                found.truncate(self.limit);
                found
            }
            Err(e) => {
                debug!("No suggestions for {:?}: {:#}", query, e);
                Vec::new()
            }
        };

        if self.is_superseded(ticket) {
            return None;
        }
        Some(suggestions)
    }

    pub fn cancel(&self) {
        self.generation.fetch_add(1, Ordering::AcqRel);
    }

    fn is_superseded(&self, ticket: u64) -> bool {
        self.generation.load(Ordering::Acquire) != ticket
    }
}
