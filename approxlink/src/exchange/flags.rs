//! Marker-file flags and the wait primitive built on them.
//!
//! A flag is a zero-length file whose existence is its whole value. Nothing
//! is cached: every query goes to the filesystem, which is what makes a flag
//! set by another process visible immediately.
//!
//! When client and server run in one process they also share a
//! [`FlagNotifier`], so a waiter wakes as soon as the other side sets a flag
//! instead of sleeping out a full poll interval.

use std::fmt;
use std::fs;
use std::io;
use std::sync::{Arc, Condvar, Mutex};
use std::time::Duration;

use super::directory::ExchangeDirectory;
use super::error::ExchangeError;
use super::wait::WaitPolicy;
use crate::log::Logger;
use crate::{log_debug, log_warn};

/// The three flags of the exchange protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Flag {
    /// A request is in flight; set by the client, cleared by the client
    Busy,
    /// Input vector is complete and waiting to be served
    InputReady,
    /// Output vector is complete and waiting to be read
    OutputReady,
}

impl Flag {
    /// All flags, in protocol order.
    pub const ALL: [Flag; 3] = [Flag::Busy, Flag::InputReady, Flag::OutputReady];
}

impl fmt::Display for Flag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Flag::Busy => "busy",
            Flag::InputReady => "input-ready",
            Flag::OutputReady => "output-ready",
        };
        f.write_str(name)
    }
}

/// In-process wake-up channel for flag changes.
///
/// Holds a generation counter bumped on every set or clear. Waiters remember
/// the generation they saw before checking the filesystem, so a change that
/// lands between the check and the wait is never lost.
#[derive(Debug, Default)]
pub struct FlagNotifier {
    generation: Mutex<u64>,
    changed: Condvar,
}

impl FlagNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wake every waiter.
    pub fn notify(&self) {
        let mut generation = lock(&self.generation);
        *generation = generation.wrapping_add(1);
        self.changed.notify_all();
    }

    /// Current generation.
    pub fn generation(&self) -> u64 {
        *lock(&self.generation)
    }

    /// Block until the generation moves past `seen` or `timeout` elapses.
    pub fn wait_since(&self, seen: u64, timeout: Duration) -> u64 {
        let guard = lock(&self.generation);
        let (guard, _) = match self
            .changed
            .wait_timeout_while(guard, timeout, |generation| *generation == seen)
        {
            Ok(result) => result,
            Err(poisoned) => poisoned.into_inner(),
        };
        *guard
    }
}

fn lock(mutex: &Mutex<u64>) -> std::sync::MutexGuard<'_, u64> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

/// Presence of each flag at one moment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FlagSnapshot {
    pub busy: bool,
    pub input_ready: bool,
    pub output_ready: bool,
}

impl FlagSnapshot {
    /// True when no flag is set.
    pub fn is_idle(&self) -> bool {
        !self.busy && !self.input_ready && !self.output_ready
    }
}

/// Set, clear and query flags in an exchange directory.
///
/// All operations are idempotent: setting a set flag or clearing a clear
/// flag succeeds.
///
/// ```
/// use approxlink::exchange::{ExchangeDirectory, ExchangeFiles, Flag, FlagNotifier, FlagProtocol};
/// use approxlink::log::NoOpLogger;
/// use std::sync::Arc;
///
/// let temp = tempfile::TempDir::new().unwrap();
/// let dir = Arc::new(ExchangeDirectory::open(temp.path(), ExchangeFiles::default()).unwrap());
/// let flags = FlagProtocol::new(dir, Arc::new(FlagNotifier::new()), Arc::new(NoOpLogger));
///
/// flags.set(Flag::Busy).unwrap();
/// assert!(flags.is_set(Flag::Busy));
/// flags.clear(Flag::Busy).unwrap();
/// assert!(!flags.is_set(Flag::Busy));
/// ```
#[derive(Clone)]
pub struct FlagProtocol {
    directory: Arc<ExchangeDirectory>,
    notifier: Arc<FlagNotifier>,
    logger: Arc<dyn Logger>,
}

impl FlagProtocol {
    pub fn new(
        directory: Arc<ExchangeDirectory>,
        notifier: Arc<FlagNotifier>,
        logger: Arc<dyn Logger>,
    ) -> Self {
        Self {
            directory,
            notifier,
            logger,
        }
    }

    /// Create (or truncate) the flag's marker file.
    pub fn set(&self, flag: Flag) -> Result<(), ExchangeError> {
        let path = self.directory.flag_path(flag);
        fs::write(&path, b"").map_err(|e| ExchangeError::io(&path, e))?;
        log_debug!(self.logger, "flag {} set", flag);
        self.notifier.notify();
        Ok(())
    }

    /// Remove the flag's marker file if present.
    pub fn clear(&self, flag: Flag) -> Result<(), ExchangeError> {
        let path = self.directory.flag_path(flag);
        match fs::remove_file(&path) {
            Ok(()) => log_debug!(self.logger, "flag {} cleared", flag),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(ExchangeError::io(&path, e)),
        }
        self.notifier.notify();
        Ok(())
    }

    /// True iff the flag's marker file exists right now.
    pub fn is_set(&self, flag: Flag) -> bool {
        self.directory.flag_path(flag).exists()
    }

    /// Current state of all three flags.
    pub fn snapshot(&self) -> FlagSnapshot {
        FlagSnapshot {
            busy: self.is_set(Flag::Busy),
            input_ready: self.is_set(Flag::InputReady),
            output_ready: self.is_set(Flag::OutputReady),
        }
    }

    /// Clear every flag, returning the channel to idle.
    pub fn clear_all(&self) -> Result<(), ExchangeError> {
        for flag in Flag::ALL {
            self.clear(flag)?;
        }
        Ok(())
    }

    /// Wait until `flag` is set, within the budget of `policy`.
    ///
    /// Each round re-checks the marker file, then sleeps until either an
    /// in-process notification arrives or one poll interval passes.
    ///
    /// # Errors
    ///
    /// `Protocol` once `policy.max_attempts()` checks have failed.
    pub fn wait_for(&self, flag: Flag, policy: &WaitPolicy) -> Result<(), ExchangeError> {
        let mut attempts: u32 = 0;
        loop {
            let seen = self.notifier.generation();
            if self.is_set(flag) {
                return Ok(());
            }
            if policy.max_attempts().is_some_and(|max| attempts >= max) {
                log_warn!(
                    self.logger,
                    "gave up waiting for {} in {} after {} polls",
                    flag,
                    self.directory.root().display(),
                    attempts
                );
                return Err(ExchangeError::Protocol { flag, attempts });
            }
            attempts = attempts.saturating_add(1);
            self.notifier.wait_since(seen, policy.poll_interval());
        }
    }

    /// Single round of [`wait_for`](Self::wait_for): true if `flag` is set
    /// now or becomes set within `timeout`. Never an error, never logged.
    pub fn poll(&self, flag: Flag, timeout: Duration) -> bool {
        let seen = self.notifier.generation();
        if self.is_set(flag) {
            return true;
        }
        self.notifier.wait_since(seen, timeout);
        self.is_set(flag)
    }

    pub fn directory(&self) -> &ExchangeDirectory {
        &self.directory
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exchange::ExchangeFiles;
    use crate::log::NoOpLogger;
    use std::thread;
    use std::time::Instant;
    use tempfile::TempDir;

    fn create_flags() -> (TempDir, FlagProtocol) {
        let temp = TempDir::new().unwrap();
        let dir = ExchangeDirectory::open(temp.path(), ExchangeFiles::default()).unwrap();
        let flags = FlagProtocol::new(
            Arc::new(dir),
            Arc::new(FlagNotifier::new()),
            Arc::new(NoOpLogger),
        );
        (temp, flags)
    }

    #[test]
    fn test_set_then_is_set() {
        let (_temp, flags) = create_flags();
        flags.set(Flag::InputReady).unwrap();
        assert!(flags.is_set(Flag::InputReady));
        assert!(!flags.is_set(Flag::OutputReady));
    }

    #[test]
    fn test_clear_then_not_set() {
        let (_temp, flags) = create_flags();
        flags.set(Flag::Busy).unwrap();
        flags.clear(Flag::Busy).unwrap();
        assert!(!flags.is_set(Flag::Busy));
    }

    #[test]
    fn test_clear_absent_flag_is_ok() {
        let (_temp, flags) = create_flags();
        assert!(flags.clear(Flag::OutputReady).is_ok());
    }

    #[test]
    fn test_set_twice_is_ok() {
        let (_temp, flags) = create_flags();
        flags.set(Flag::Busy).unwrap();
        assert!(flags.set(Flag::Busy).is_ok());
        assert!(flags.is_set(Flag::Busy));
    }

    #[test]
    fn test_marker_file_is_empty() {
        let (_temp, flags) = create_flags();
        flags.set(Flag::OutputReady).unwrap();
        let path = flags.directory().flag_path(Flag::OutputReady);
        assert_eq!(fs::metadata(path).unwrap().len(), 0);
    }

    #[test]
    fn test_external_change_is_visible() {
        let (_temp, flags) = create_flags();
        // Another process creating the marker file directly
        fs::write(flags.directory().flag_path(Flag::InputReady), b"").unwrap();
        assert!(flags.is_set(Flag::InputReady));
    }

    #[test]
    fn test_snapshot_and_clear_all() {
        let (_temp, flags) = create_flags();
        flags.set(Flag::Busy).unwrap();
        flags.set(Flag::OutputReady).unwrap();

        let snapshot = flags.snapshot();
        assert!(snapshot.busy);
        assert!(!snapshot.input_ready);
        assert!(snapshot.output_ready);

        flags.clear_all().unwrap();
        assert!(flags.snapshot().is_idle());
    }

    #[test]
    fn test_wait_for_already_set_returns_immediately() {
        let (_temp, flags) = create_flags();
        flags.set(Flag::OutputReady).unwrap();
        let policy = WaitPolicy::new().with_max_attempts(0);
        assert!(flags.wait_for(Flag::OutputReady, &policy).is_ok());
    }

    #[test]
    fn test_wait_for_exhausts_budget() {
        let (_temp, flags) = create_flags();
        let policy = WaitPolicy::new()
            .with_poll_interval(Duration::from_millis(1))
            .with_max_attempts(3);

        let err = flags.wait_for(Flag::OutputReady, &policy).unwrap_err();

        assert!(matches!(
            err,
            ExchangeError::Protocol {
                flag: Flag::OutputReady,
                attempts: 3
            }
        ));
    }

    #[test]
    fn test_wait_for_wakes_on_in_process_set() {
        let (_temp, flags) = create_flags();
        let setter = flags.clone();
        // Long poll interval: only the notifier can make this fast
        let policy = WaitPolicy::new()
            .with_poll_interval(Duration::from_secs(30))
            .with_max_attempts(2);

        let started = Instant::now();
        let handle = thread::spawn(move || {
            thread::sleep(Duration::from_millis(20));
            setter.set(Flag::OutputReady).unwrap();
        });

        flags.wait_for(Flag::OutputReady, &policy).unwrap();
        handle.join().unwrap();
        assert!(started.elapsed() < Duration::from_secs(10));
    }

    #[test]
    fn test_wait_for_sees_cross_process_set_by_polling() {
        let (_temp, flags) = create_flags();
        let path = flags.directory().flag_path(Flag::InputReady);
        let policy = WaitPolicy::new()
            .with_poll_interval(Duration::from_millis(5))
            .with_max_attempts(2000);

        // No notifier involvement: file appears behind the protocol's back
        let handle = thread::spawn(move || {
            thread::sleep(Duration::from_millis(20));
            fs::write(path, b"").unwrap();
        });

        flags.wait_for(Flag::InputReady, &policy).unwrap();
        handle.join().unwrap();
    }

    #[test]
    fn test_poll_times_out_quietly() {
        let (_temp, flags) = create_flags();
        assert!(!flags.poll(Flag::InputReady, Duration::from_millis(2)));
        flags.set(Flag::InputReady).unwrap();
        assert!(flags.poll(Flag::InputReady, Duration::from_millis(2)));
    }

    #[test]
    fn test_notifier_generation_advances() {
        let notifier = FlagNotifier::new();
        let before = notifier.generation();
        notifier.notify();
        assert_eq!(notifier.wait_since(before, Duration::from_millis(1)), before + 1);
    }

    #[test]
    fn test_flag_display() {
        assert_eq!(Flag::Busy.to_string(), "busy");
        assert_eq!(Flag::InputReady.to_string(), "input-ready");
        assert_eq!(Flag::OutputReady.to_string(), "output-ready");
    }
}
