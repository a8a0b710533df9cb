//! Wall-clock adapter

use chrono::{DateTime, Utc};
use pulse_application::ports::Clock;

/// Stamps synthesized runs with the current UTC time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
