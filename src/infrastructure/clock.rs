use crate::domain::ports::Clock;
use async_trait::async_trait;
use std::time::Duration;

/// Waits on the tokio timer.
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioClock;

#[async_trait]
impl Clock for TokioClock {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Does not wait at all; only yields so other tasks get a chance to run.
#[derive(Debug, Default, Clone, Copy)]
pub struct InstantClock;

#[async_trait]
impl Clock for InstantClock {
    async fn sleep(&self, _duration: Duration) {
        tokio::task::yield_now().await;
    }
}
