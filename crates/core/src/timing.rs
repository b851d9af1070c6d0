//! Request clock and latency measurement
//!
//! Every signed broker request is bound to a Unix-millisecond timestamp
//! taken from [`millis`]. Latency is measured on the monotonic clock.

use chrono::{DateTime, Utc};
use std::time::{Instant, SystemTime, UNIX_EPOCH};

/// Current Unix time in milliseconds
#[inline]
pub fn millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default()
}

/// Current Unix milliseconds as plain base-10 digits, as sent in request headers
pub fn timestamp_ms_string() -> String {
    millis().to_string()
}

/// Render broker record times (Unix ms) for display
pub fn format_millis(ms: u64) -> String {
    i64::try_from(ms)
        .ok()
        .and_then(DateTime::<Utc>::from_timestamp_millis)
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| ms.to_string())
}

/// Wall time of one named operation
pub struct PerfTimer {
    started: Instant,
    name: String,
}

impl PerfTimer {
    pub fn start(name: impl Into<String>) -> Self {
        Self {
            started: Instant::now(),
            name: name.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn elapsed_micros(&self) -> u64 {
        self.started.elapsed().as_micros() as u64
    }

    /// Emit the elapsed time through `log_latency!`
    pub fn log_elapsed(&self) {
        let micros = self.elapsed_micros();
        crate::log_latency!(self.name, micros);
    }
}

/// Time a block and log its latency; evaluates to the block's value
#[macro_export]
macro_rules! time_it {
    ($name:expr, $code:block) => {{
        let timer = $crate::timing::PerfTimer::start($name);
        let result = $code;
        timer.log_elapsed();
        result
    }};
}
