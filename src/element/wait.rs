use std::thread;
use std::time::{Duration, Instant};

use thiserror::Error;
use tracing::trace;

use crate::browser::error::BrowserError;

/// First delay between probes.
pub const INITIAL_BACKOFF: Duration = Duration::from_millis(50);
/// Upper bound for a single delay.
pub const MAX_BACKOFF: Duration = Duration::from_secs(1);

#[derive(Debug, Error)]
pub enum WaitError {
    #[error("timed out after {waited_ms}ms waiting for {condition}")]
    TimedOut { condition: String, waited_ms: u64 },

    #[error(transparent)]
    Browser(#[from] BrowserError),
}

impl From<WaitError> for BrowserError {
    fn from(e: WaitError) -> Self {
        match e {
            WaitError::TimedOut {
                condition,
                waited_ms,
            } => BrowserError::Timeout {
                condition,
                waited_ms,
            },
            WaitError::Browser(inner) => inner,
        }
    }
}

/// Time budgets for the different kinds of waits.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaitPolicy {
    /// Element presence / visibility / clickability.
    pub element: Duration,
    /// Document readiness after navigation or form submission.
    pub page_load: Duration,
    /// Rendering to settle after resize or scroll.
    pub settle: Duration,
    /// Quick "is the page there yet" checks such as load signals.
    pub probe: Duration,
}

impl Default for WaitPolicy {
    fn default() -> Self {
        Self {
            element: Duration::from_secs(10),
            page_load: Duration::from_secs(20),
            settle: Duration::from_secs(2),
            probe: Duration::from_secs(5),
        }
    }
}

impl WaitPolicy {
    /// Policy with every budget set to zero: each wait probes exactly once.
    pub fn immediate() -> Self {
        Self {
            element: Duration::ZERO,
            page_load: Duration::ZERO,
            settle: Duration::ZERO,
            probe: Duration::ZERO,
        }
    }
}

/// Exponential delay sequence: 50ms, 100ms, 200ms ... capped at 1s.
#[derive(Debug, Clone)]
pub struct Backoff {
    next: Duration,
    max: Duration,
}

impl Default for Backoff {
    fn default() -> Self {
        Self::new(INITIAL_BACKOFF, MAX_BACKOFF)
    }
}

impl Backoff {
    pub fn new(initial: Duration, max: Duration) -> Self {
        Self { next: initial, max }
    }

    pub fn next_delay(&mut self) -> Duration {
        let delay = self.next;
        self.next = (self.next * 2).min(self.max);
        delay
    }
}

/// Probe `condition` until it yields a value or `budget` runs out.
///
/// Lookup-class errors (missing or stale element) count as "not yet" and are
/// retried; any other browser error ends the wait immediately. The probe
/// always runs at least once, so a zero budget is a single check.
pub fn poll_until<T, F>(description: &str, budget: Duration, mut probe: F) -> Result<T, WaitError>
where
    F: FnMut() -> Result<Option<T>, BrowserError>,
{
    let start = Instant::now();
    let mut backoff = Backoff::default();
    let mut attempts = 0u32;

    loop {
        attempts += 1;
        match probe() {
            Ok(Some(value)) => return Ok(value),
            Ok(None) => {}
            Err(e) if e.is_lookup() => trace!("{}: transient error: {}", description, e),
            Err(e) => return Err(WaitError::Browser(e)),
        }

        let elapsed = start.elapsed();
        if elapsed >= budget {
            trace!("{}: gave up after {} attempts", description, attempts);
            return Err(WaitError::TimedOut {
                condition: description.to_string(),
                waited_ms: elapsed.as_millis() as u64,
            });
        }
        thread::sleep(backoff.next_delay().min(budget - elapsed));
    }
}
