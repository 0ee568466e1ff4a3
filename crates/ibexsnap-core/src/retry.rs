//! Fixed-delay retry policy and the injectable sleep used between attempts.

use std::future::Future;
use std::pin::Pin;
use std::sync::Mutex;
use std::time::Duration;

/// Attempts made per company before it is dropped from the snapshot.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Wait between two attempts on the same symbol.
pub const RETRY_DELAY: Duration = Duration::from_secs(2);

/// Retry budget for a single symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryConfig {
    /// Total attempts, first one included.
    pub max_attempts: u32,
    /// Fixed delay between attempts.
    pub delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            delay: RETRY_DELAY,
        }
    }
}

impl RetryConfig {
    pub fn fixed(delay: Duration, max_attempts: u32) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            delay,
        }
    }

    /// Whether another attempt is allowed after `attempt` (1-based) failed.
    pub fn has_attempts_after(&self, attempt: u32) -> bool {
        attempt < self.max_attempts.max(1)
    }
}

/// Source of blocking pauses; swapped for [`RecordingSleeper`] in tests.
pub trait Sleeper: Send + Sync {
    fn sleep<'a>(&'a self, duration: Duration) -> Pin<Box<dyn Future<Output = ()> + Send + 'a>>;
}

/// Real wall-clock sleep on the tokio timer.
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioSleeper;

impl Sleeper for TokioSleeper {
    fn sleep<'a>(&'a self, duration: Duration) -> Pin<Box<dyn Future<Output = ()> + Send + 'a>> {
        Box::pin(tokio::time::sleep(duration))
    }
}

/// Returns immediately and remembers every requested pause.
#[derive(Debug, Default)]
pub struct RecordingSleeper {
    pauses: Mutex<Vec<Duration>>,
}

impl RecordingSleeper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pauses(&self) -> Vec<Duration> {
        self.pauses
            .lock()
            .map(|pauses| pauses.clone())
            .unwrap_or_default()
    }
}

impl Sleeper for RecordingSleeper {
    fn sleep<'a>(&'a self, duration: Duration) -> Pin<Box<dyn Future<Output = ()> + Send + 'a>> {
        if let Ok(mut pauses) = self.pauses.lock() {
            pauses.push(duration);
        }
        Box::pin(async {})
    }
}
