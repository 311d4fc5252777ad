//! Fixed-interval scheduler for the `watch` command.

use std::time::Duration;

use luna_search::CancellationToken;

/// Runs a cycle, then waits `interval`, until `count` cycles have run or the
/// token is cancelled. Sharing the token with a [`luna_search::SearchConfig`]
/// lets one cancel stop both the wait and a search in progress.
#[derive(Debug, Clone)]
pub struct Poller {
    interval: Duration,
    count: Option<usize>,
    token: CancellationToken,
}

impl Poller {
    /// Unbounded when `count` is `None`.
    pub fn new(interval: Duration, count: Option<usize>) -> Self {
        Self {
            interval,
            count,
            token: CancellationToken::new(),
        }
    }

    pub fn with_token(mut self, token: CancellationToken) -> Self {
        self.token = token;
        self
    }

    /// Run `cycle(index)` repeatedly. Returns the number of completed
    /// cycles. A cycle error stops the loop and is returned as is.
    pub fn run<F, E>(&self, mut cycle: F) -> Result<usize, E>
    where
        F: FnMut(usize) -> Result<(), E>,
    {
        let mut done = 0;
        loop {
            if self.count.is_some_and(|n| done >= n) || self.token.is_cancelled() {
                break;
            }
            cycle(done)?;
            done += 1;
            if self.count.is_some_and(|n| done >= n) {
                break;
            }
            tracing::debug!(cycle = done, wait_secs = self.interval.as_secs_f64(), "sleeping");
            if self.token.wait_timeout(self.interval) {
                tracing::info!(cycles = done, "watch cancelled");
                break;
            }
        }
        Ok(done)
    }
}
