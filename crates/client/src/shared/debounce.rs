//! Debounce for search-as-you-type inputs.
//!
//! Every keystroke restarts a 300ms window; only the query that survives
//! the window is sent to the backend. A request that already went out is
//! not aborted — its outcome is delivered and the consumer reconciles.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::{mpsc, oneshot};

use crate::shared::error::ApiError;

/// Задержка между последним нажатием и запросом к backend
pub const DEBOUNCE_DELAY: Duration = Duration::from_millis(300);

/// Anything that can answer a free-text search query.
#[async_trait]
pub trait SearchSource: Send + Sync {
    type Item: Send;

    async fn search(&self, query: &str) -> Result<Vec<Self::Item>, ApiError>;
}

/// Result of one dispatched search, tagged with the query that produced it.
#[derive(Debug)]
pub struct SearchOutcome<T> {
    pub query: String,
    pub result: Result<Vec<T>, ApiError>,
}

/// Debounced front over a [`SearchSource`].
///
/// Call [`set_query`](Self::set_query) on every keystroke; outcomes arrive
/// on the receiver returned by [`new`](Self::new), in dispatch order.
pub struct DebouncedSearch<T> {
    source: Arc<dyn SearchSource<Item = T>>,
    cancel: Option<oneshot::Sender<()>>,
    outcomes: mpsc::UnboundedSender<SearchOutcome<T>>,
}

impl<T: Send + 'static> DebouncedSearch<T> {
    pub fn new(
        source: Arc<dyn SearchSource<Item = T>>,
    ) -> (Self, mpsc::UnboundedReceiver<SearchOutcome<T>>) {
        let (outcomes, receiver) = mpsc::unbounded_channel();
        (
            Self {
                source,
                cancel: None,
                outcomes,
            },
            receiver,
        )
    }

    /// Register a keystroke.
    ///
    /// Cancels the previous pending window and opens a new one. A blank
    /// query only cancels — nothing is dispatched for it.
    pub fn set_query(&mut self, query: &str) {
        // Отменяем предыдущий таймер если есть
        if let Some(cancel) = self.cancel.take() {
            let _ = cancel.send(());
        }

        let query = query.trim().to_string();
        if query.is_empty() {
            return;
        }

        let (cancel_tx, mut cancel_rx) = oneshot::channel();
        self.cancel = Some(cancel_tx);

        let source = Arc::clone(&self.source);
        let outcomes = self.outcomes.clone();
        tokio::spawn(async move {
            tokio::select! {
                // Отмена важнее истёкшего таймера
                biased;
                _ = &mut cancel_rx => return,
                _ = tokio::time::sleep(DEBOUNCE_DELAY) => {}
            }

            let result = source.search(&query).await;
            let _ = outcomes.send(SearchOutcome { query, result });
        });
    }

    /// Cancel the pending window, if any. A search already in flight is
    /// left alone.
    pub fn cancel(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            let _ = cancel.send(());
        }
    }
}
