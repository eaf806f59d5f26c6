use std::time::{Duration, Instant};

use async_trait::async_trait;
use rand::Rng;
use tokio::sync::Mutex;
use tracing::debug;

use crate::app::ports::PolitenessPort;

/// Waits a random time in `[min, max]` between consecutive remote calls.
///
/// Time already spent since the previous call counts toward the wait; the
/// first call never waits.
#[derive(Debug)]
pub struct RandomDelay {
    min: Duration,
    max: Duration,
    last_call: Mutex<Option<Instant>>,
}

impl RandomDelay {
    pub fn new(min: Duration, max: Duration) -> Self {
        let (min, max) = if min <= max { (min, max) } else { (max, min) };
        Self {
            min,
            max,
            last_call: Mutex::new(None),
        }
    }

    fn pick(&self) -> Duration {
        if self.min == self.max {
            return self.min;
        }
        rand::thread_rng().gen_range(self.min..=self.max)
    }
}

#[async_trait]
impl PolitenessPort for RandomDelay {
    async fn pause(&self) {
        let mut last = self.last_call.lock().await;
        if let Some(prev) = *last {
            let wait = self.pick().saturating_sub(prev.elapsed());
            if !wait.is_zero() {
                debug!("Politeness delay {} ms", wait.as_millis());
                tokio::time::sleep(wait).await;
            }
        }
        *last = Some(Instant::now());
    }
}

/// No delay; for tests and offline runs.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDelay;

#[async_trait]
impl PolitenessPort for NoDelay {
    async fn pause(&self) {}
}
