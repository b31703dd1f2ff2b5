//! Pluggable wall-clock source.
//!
//! Decision and order timestamps are always derived from the bar's
//! own timestamp (see simulation module), never from `now()` — that
//! is what makes two runs over the same inputs bit-identical. A clock
//! is only needed for externally-facing concerns that are genuinely
//! about wall-clock time: progress-telemetry elapsed/ETA figures and
//! CLI log lines. Tests substitute a fixed clock to keep those
//! outputs deterministic too.

use chrono::{DateTime, Utc};

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}
