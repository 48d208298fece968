use tokio::sync::watch;

/// Monotonic change counter. Controllers bump it after every committed state
/// change; the interactive view subscribes and repaints on changes.
#[derive(Debug, Clone)]
pub struct ChangeSignal {
    tx: watch::Sender<u64>,
}

impl ChangeSignal {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(0);
        Self { tx }
    }

    pub fn bump(&self) {
        self.tx.send_modify(|v| *v += 1);
    }

    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.tx.subscribe()
    }
}

impl Default for ChangeSignal {
    fn default() -> Self {
        Self::new()
    }
}
