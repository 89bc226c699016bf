//! Time source for cache timestamps

use chrono::{DateTime, Utc};

/// Supplies the "last viewed" timestamps written by the record cache
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
