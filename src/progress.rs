//! Progress counters and the background reporter.
//!
//! The search thread bumps plain atomic counters; a scoped reporter thread
//! reads them at a cadence of one tenth of the elapsed time and logs a line.
//! Reads may be slightly stale, which is fine for a progress display.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};

use tracing::info;

use crate::solver::Pass;

/// Lower bound on the reporting cadence.
const MIN_REPORT_INTERVAL: Duration = Duration::from_millis(100);

/// Monotonic counters shared between the search and the reporter.
#[derive(Debug, Default)]
pub struct ProgressCounters {
    axis_sets_counted: AtomicU64,
    axis_sets_traversed: AtomicU64,
    cube_identities: AtomicU64,
}

/// A point-in-time copy of [`ProgressCounters`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ProgressSnapshot {
    /// Axis solidification sets found by the counting pass.
    pub axis_sets_counted: u64,
    /// Axis solidification sets entered by the generation pass.
    pub axis_sets_traversed: u64,
    pub cube_identities: u64,
}

impl ProgressCounters {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub(crate) fn record_axis_set_counted(&self) {
        self.axis_sets_counted.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn record_axis_set_traversed(&self) {
        self.axis_sets_traversed.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn record_cube_identity(&self) {
        self.cube_identities.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> ProgressSnapshot {
        ProgressSnapshot {
            axis_sets_counted: self.axis_sets_counted.load(Ordering::Relaxed),
            axis_sets_traversed: self.axis_sets_traversed.load(Ordering::Relaxed),
            cube_identities: self.cube_identities.load(Ordering::Relaxed),
        }
    }
}

/// Runs `work` while a reporter thread logs `counters` for `pass`.
///
/// The reporter is stopped by dropping the channel sender once `work`
/// returns (or unwinds), and joined before this function returns.
pub(crate) fn with_reporter<T>(
    counters: &ProgressCounters,
    pass: Pass,
    enabled: bool,
    work: impl FnOnce() -> T,
) -> T {
    if !enabled {
        return work();
    }

    let started = Instant::now();
    let (stop, stopped) = mpsc::channel::<()>();

    thread::scope(|scope| {
        scope.spawn(move || report_until_stopped(counters, pass, started, stopped));
        let result = work();
        drop(stop);
        result
    })
}

fn report_until_stopped(counters: &ProgressCounters, pass: Pass, started: Instant, stopped: Receiver<()>) {
    loop {
        let interval = (started.elapsed() / 10).max(MIN_REPORT_INTERVAL);
        match stopped.recv_timeout(interval) {
            Err(RecvTimeoutError::Timeout) => log_progress(counters.snapshot(), pass, started.elapsed()),
            Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
        }
    }
}

fn log_progress(snapshot: ProgressSnapshot, pass: Pass, elapsed: Duration) {
    let elapsed = format_elapsed(elapsed);
    match pass {
        Pass::Counting => info!(
            axis_sets = snapshot.axis_sets_counted,
            %elapsed,
            "counting axis solidification sets"
        ),
        Pass::Generating => info!(
            cube_identities = snapshot.cube_identities,
            axis_sets = format!("{}/{}", snapshot.axis_sets_traversed, snapshot.axis_sets_counted),
            %elapsed,
            "generating magic hypercubes"
        ),
    }
}

/// Formats a duration as `MM:SS.mmm`.
pub fn format_elapsed(elapsed: Duration) -> String {
    let millis = elapsed.as_millis();
    let minutes = millis / 60_000;
    let seconds = (millis % 60_000) / 1000;
    format!("{:02}:{:02}.{:03}", minutes, seconds, millis % 1000)
}
