use std::time::Duration;

use tokio::sync::watch;

/// Display interval shared between the control surface and the slideshow loop.
///
/// Cloning yields another handle to the same value.
#[derive(Debug, Clone)]
pub struct SlideDelay {
    tx: watch::Sender<Duration>,
}

impl SlideDelay {
    pub fn new(initial: Duration) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self { tx }
    }

    pub fn get(&self) -> Duration {
        *self.tx.borrow()
    }

    pub fn set(&self, delay: Duration) {
        let previous = self.tx.send_replace(delay);
        tracing::info!(
            from = %humantime::format_duration(previous),
            to = %humantime::format_duration(delay),
            "slide delay changed"
        );
    }
}
