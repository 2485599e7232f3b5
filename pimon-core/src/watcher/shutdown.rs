use tokio::sync::watch;

/// Stop signal shared by the watcher and whoever owns the process.
#[derive(Clone, Debug)]
pub struct ShutdownHandle {
    tx: watch::Sender<bool>,
}

impl Default for ShutdownHandle {
    fn default() -> Self {
        Self::new()
    }
}

impl ShutdownHandle {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(false);
        Self { tx }
    }

    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.tx.subscribe()
    }

    pub fn trigger(&self) {
        if !self.tx.send_replace(true) {
            tracing::info!("shutdown signaled");
        }
    }

    pub fn is_triggered(&self) -> bool {
        *self.tx.borrow()
    }

    /// Trigger on the first Ctrl-C.
    pub async fn install_signal_handler(&self) -> anyhow::Result<()> {
        tokio::signal::ctrl_c().await?;
        tracing::info!("interrupt received");
        self.trigger();
        Ok(())
    }
}
