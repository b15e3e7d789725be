//! Wall-clock access, timed suspension and cooperative cancellation.
//!
//! Every wait in the workflow goes through a [`Clock`] so tests can run the
//! receipt margin and mirror polling without real delays.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use keyrotate_types::{RotationError, RotationResult};
use tokio::sync::watch;

#[async_trait]
pub trait Clock: Send + Sync {
    fn now(&self) -> SystemTime;

    /// Suspends the calling task without blocking the executor.
    async fn sleep(&self, duration: Duration);

    /// Milliseconds since the Unix epoch, negative before it.
    fn now_millis(&self) -> i64 {
        match self.now().duration_since(UNIX_EPOCH) {
            Ok(since) => since.as_millis() as i64,
            Err(before) => -(before.duration().as_millis() as i64),
        }
    }
}

/// Real time backed by the Tokio timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

#[async_trait]
impl Clock for SystemClock {
    fn now(&self) -> SystemTime {
        SystemTime::now()
    }

    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

#[derive(Debug)]
struct ManualState {
    now: SystemTime,
    sleeps: Vec<Duration>,
}

/// Virtual clock for tests: `sleep` returns immediately after advancing the
/// clock by the requested duration and recording it.
#[derive(Debug, Clone)]
pub struct ManualClock {
    state: Arc<Mutex<ManualState>>,
}

impl ManualClock {
    pub fn new(start: SystemTime) -> Self {
        Self {
            state: Arc::new(Mutex::new(ManualState {
                now: start,
                sleeps: Vec::new(),
            })),
        }
    }

    pub fn at_unix_millis(millis: u64) -> Self {
        Self::new(UNIX_EPOCH + Duration::from_millis(millis))
    }

    pub fn advance(&self, duration: Duration) {
        self.lock().now += duration;
    }

    /// Durations passed to `sleep`, in call order.
    pub fn sleeps(&self) -> Vec<Duration> {
        self.lock().sleeps.clone()
    }

    pub fn total_slept(&self) -> Duration {
        self.lock().sleeps.iter().sum()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, ManualState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl Clock for ManualClock {
    fn now(&self) -> SystemTime {
        self.lock().now
    }

    async fn sleep(&self, duration: Duration) {
        {
            let mut state = self.lock();
            state.now += duration;
            state.sleeps.push(duration);
        }
        tokio::task::yield_now().await;
    }
}

/// Requests cancellation of the operations holding the paired token.
#[derive(Debug)]
pub struct CancelHandle {
    tx: watch::Sender<bool>,
}

impl CancelHandle {
    pub fn cancel(&self) {
        let _ = self.tx.send(true);
    }
}

/// Observed at every suspension point of the workflow. Dropping the
/// [`CancelHandle`] without calling `cancel` leaves the token uncancelled.
#[derive(Debug, Clone)]
pub struct CancellationToken {
    rx: watch::Receiver<bool>,
}

impl CancellationToken {
    /// A token nobody can cancel.
    pub fn never() -> Self {
        cancellation_pair().1
    }

    pub fn is_cancelled(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolves once cancellation is requested; pends forever otherwise.
    pub async fn cancelled(&self) {
        let mut rx = self.rx.clone();
        loop {
            if *rx.borrow() {
                return;
            }
            if rx.changed().await.is_err() {
                std::future::pending::<()>().await;
            }
        }
    }
}

pub fn cancellation_pair() -> (CancelHandle, CancellationToken) {
    let (tx, rx) = watch::channel(false);
    (CancelHandle { tx }, CancellationToken { rx })
}

/// Sleeps on `clock` unless `cancel` fires first. `stage` names what was being
/// waited for in the resulting [`RotationError::Cancelled`].
pub async fn sleep_or_cancel(
    clock: &dyn Clock,
    duration: Duration,
    cancel: &CancellationToken,
    stage: &str,
) -> RotationResult<()> {
    if cancel.is_cancelled() {
        return Err(RotationError::Cancelled(stage.to_string()));
    }
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(RotationError::Cancelled(stage.to_string())),
        _ = clock.sleep(duration) => Ok(()),
    }
}
