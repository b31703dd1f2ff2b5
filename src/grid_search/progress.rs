use std::fs::OpenOptions;
use std::io::Write as _;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Duration;

use crate::domain::Clock;

use super::types::RsiMacdBbTuple;

/// Emits a progress line either every `interval_tuples` evaluations
/// or every `interval` of wall-clock time, whichever comes first.
/// Lines go to stdout and, if configured, an append-only log file —
/// a write failure there is logged and otherwise ignored, never fatal
/// to the search.
pub struct ProgressReporter<'a> {
    clock: &'a dyn Clock,
    start: std::time::Instant,
    total: usize,
    interval_tuples: usize,
    interval: Duration,
    log_path: Option<PathBuf>,
    last_emitted_at: Mutex<std::time::Instant>,
}

impl<'a> ProgressReporter<'a> {
    pub fn new(clock: &'a dyn Clock, total: usize, interval_tuples: usize, interval: Duration, log_path: Option<PathBuf>) -> Self {
        Self {
            clock,
            start: std::time::Instant::now(),
            total,
            interval_tuples: interval_tuples.max(1),
            interval,
            log_path,
            last_emitted_at: Mutex::new(std::time::Instant::now()),
        }
    }

    /// Default cadence: every 5% of the total, or every 300 seconds.
    pub fn with_defaults(clock: &'a dyn Clock, total: usize, log_path: Option<PathBuf>) -> Self {
        let interval_tuples = ((total as f64 * 0.05).round() as usize).max(1);
        Self::new(clock, total, interval_tuples, Duration::from_secs(300), log_path)
    }

    /// Reports progress at `index` (0-based, completed count) if due.
    /// `best_so_far` is `(profit_percentage, tuple)` of the best result
    /// seen across all completed tuples so far.
    pub fn report_if_due(&self, index: usize, best_so_far: Option<(f64, &RsiMacdBbTuple)>) {
        let due_by_count = self.interval_tuples > 0 && index % self.interval_tuples == 0;
        let due_by_time = {
            let mut last = self.last_emitted_at.lock().unwrap();
            if last.elapsed() >= self.interval {
                *last = std::time::Instant::now();
                true
            } else {
                false
            }
        };
        if !due_by_count && !due_by_time && index != self.total {
            return;
        }

        let elapsed = self.start.elapsed();
        let percent = if self.total > 0 { index as f64 / self.total as f64 * 100.0 } else { 100.0 };
        let eta = if index > 0 {
            let per_tuple = elapsed.as_secs_f64() / index as f64;
            Duration::from_secs_f64(per_tuple * (self.total.saturating_sub(index)) as f64)
        } else {
            Duration::ZERO
        };

        let best_str = match best_so_far {
            Some((profit, tuple)) => format!("best={profit:.2}% rsi={} macd=({},{},{}) bb=({},{:.2})", tuple.rsi_period, tuple.macd_fast, tuple.macd_slow, tuple.macd_signal, tuple.bb_period, tuple.bb_std_dev),
            None => "best=none yet".to_string(),
        };

        let line = format!(
            "[{}] {}/{} ({percent:.1}%) elapsed={:.0}s eta={:.0}s {best_str}",
            self.clock.now().to_rfc3339(),
            index,
            self.total,
            elapsed.as_secs_f64(),
            eta.as_secs_f64(),
        );

        println!("{line}");

        if let Some(path) = &self.log_path {
            if let Err(e) = append_line(path, &line) {
                tracing::warn!(path = %path.display(), error = %e, "failed to append progress line to log file");
            }
        }
    }
}

fn append_line(path: &PathBuf, line: &str) -> std::io::Result<()> {
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    writeln!(file, "[{}] {line}", chrono::Utc::now().to_rfc3339())
}
