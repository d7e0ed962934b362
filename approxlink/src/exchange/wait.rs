//! Wait discipline for flag polling.

use std::time::Duration;

/// Default interval between flag checks.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// How long a party keeps waiting for a flag.
///
/// The library imposes no timeout of its own: model latency varies too much.
/// Callers choose a budget here, or leave it unbounded.
///
/// ```
/// use approxlink::exchange::WaitPolicy;
/// use std::time::Duration;
///
/// let policy = WaitPolicy::new()
///     .with_poll_interval(Duration::from_millis(10))
///     .with_max_attempts(500);
///
/// assert_eq!(policy.max_attempts(), Some(500));
/// assert_eq!(policy.budget(), Some(Duration::from_secs(5)));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitPolicy {
    poll_interval: Duration,
    max_attempts: Option<u32>,
}

impl WaitPolicy {
    /// Unbounded wait with the default poll interval.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait forever, checking every `poll_interval`.
    pub fn unbounded(poll_interval: Duration) -> Self {
        Self::default()
            .with_poll_interval(poll_interval)
            .without_limit()
    }

    /// Set the interval between checks.
    ///
    /// A zero interval is raised to one millisecond so waiting never spins.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval.max(Duration::from_millis(1));
        self
    }

    /// Give up after `attempts` unsuccessful checks.
    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = Some(attempts);
        self
    }

    /// Remove the attempt limit.
    pub fn without_limit(mut self) -> Self {
        self.max_attempts = None;
        self
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    pub fn max_attempts(&self) -> Option<u32> {
        self.max_attempts
    }

    /// Upper bound on total wait time, if bounded.
    pub fn budget(&self) -> Option<Duration> {
        self.max_attempts.map(|n| self.poll_interval * n)
    }
}

impl Default for WaitPolicy {
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
            max_attempts: None,
        }
    }
}
