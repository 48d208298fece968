use std::sync::Arc;
use tokio::sync::Mutex;

use crate::signal::ChangeSignal;

/// Which single title is "open". Re-selecting the open id closes it.
#[derive(Debug, Clone)]
pub struct SelectionController {
    selected: Arc<Mutex<Option<String>>>,
    signal: ChangeSignal,
}

impl SelectionController {
    pub fn new(signal: ChangeSignal) -> Self {
        Self {
            selected: Arc::new(Mutex::new(None)),
            signal,
        }
    }

    /// Toggle semantics. Returns the selection after the change: `Some` when
    /// a detail view should open, `None` when it closed.
    pub async fn select(&self, imdb_id: &str) -> Option<String> {
        let mut selected = self.selected.lock().await;
        if selected.as_deref() == Some(imdb_id) {
            *selected = None;
        } else {
            *selected = Some(imdb_id.to_string());
        }
        let result = selected.clone();
        drop(selected);
        self.signal.bump();
        result
    }

    pub async fn close(&self) {
        let mut selected = self.selected.lock().await;
        if selected.take().is_some() {
            drop(selected);
            self.signal.bump();
        }
    }

    pub async fn selected(&self) -> Option<String> {
        self.selected.lock().await.clone()
    }
}
