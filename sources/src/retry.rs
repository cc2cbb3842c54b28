//! Retry policy for network faults.
//!
//! The policy is plain data, passed to the fetchers and loadable from the configuration file:
//!
//! ```hcl
//! retry {
//!   kind     = "fixed"
//!   attempts = 3
//!   delay    = 2
//! }
//! ```
//!
//! `delay` and `max_delay` are in seconds.  Only transient errors (see
//! `FetchError::is_transient()`) are retried, a bad status code is a final answer.
//!

use std::future::Future;
use std::thread;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::FetchError;

/// Default number of attempts, including the first one
pub const DEF_ATTEMPTS: u32 = 3;
/// Default delay between attempts
pub const DEF_DELAY: u64 = 2;

#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum RetryPolicy {
    /// Same delay between every attempt
    Fixed { attempts: u32, delay: u64 },
    /// Delay doubles after every attempt, capped by `max_delay`
    Exponential {
        attempts: u32,
        delay: u64,
        max_delay: u64,
    },
    /// One attempt only
    Never,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryPolicy::Fixed {
            attempts: DEF_ATTEMPTS,
            delay: DEF_DELAY,
        }
    }
}

impl RetryPolicy {
    /// Total number of attempts, always at least one.
    ///
    pub fn attempts(&self) -> u32 {
        match self {
            RetryPolicy::Fixed { attempts, .. } | RetryPolicy::Exponential { attempts, .. } => {
                (*attempts).max(1)
            }
            RetryPolicy::Never => 1,
        }
    }

    /// How long to wait after the failed attempt number `attempt` (starting at 1), `None`
    /// when we must give up.
    ///
    pub fn delay(&self, attempt: u32) -> Option<Duration> {
        if attempt >= self.attempts() {
            return None;
        }
        match self {
            RetryPolicy::Fixed { delay, .. } => Some(Duration::from_secs(*delay)),
            RetryPolicy::Exponential {
                delay, max_delay, ..
            } => {
                let d = delay.saturating_mul(1u64 << (attempt - 1).min(32));
                Some(Duration::from_secs(d.min(*max_delay)))
            }
            RetryPolicy::Never => None,
        }
    }

    /// Run `op` until it succeeds, fails for good or we run out of attempts.
    ///
    pub fn run<T, F>(&self, mut op: F) -> Result<T, FetchError>
    where
        F: FnMut() -> Result<T, FetchError>,
    {
        let mut attempt = 1;
        loop {
            match op() {
                Err(e) if e.is_transient() => match self.delay(attempt) {
                    Some(d) => {
                        warn!("attempt {attempt} failed: {e}, retrying in {d:?}");
                        thread::sleep(d);
                        attempt += 1;
                    }
                    None => return Err(self.exhausted(e)),
                },
                r => return r,
            }
        }
    }

    /// Async version of `run()`.
    ///
    pub async fn run_async<T, F, Fut>(&self, mut op: F) -> Result<T, FetchError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, FetchError>>,
    {
        let mut attempt = 1;
        loop {
            match op().await {
                Err(e) if e.is_transient() => match self.delay(attempt) {
                    Some(d) => {
                        warn!("attempt {attempt} failed: {e}, retrying in {d:?}");
                        tokio::time::sleep(d).await;
                        attempt += 1;
                    }
                    None => return Err(self.exhausted(e)),
                },
                r => return r,
            }
        }
    }

    fn exhausted(&self, e: FetchError) -> FetchError {
        debug!("no more attempts");
        FetchError::Exhausted {
            attempts: self.attempts(),
            last: e.to_string(),
        }
    }
}
