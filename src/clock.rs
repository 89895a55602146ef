//! Time source for block timestamps.

use time::{format_description::well_known::Rfc3339, OffsetDateTime};

/// Supplies the current time as text, stored verbatim in `Block::timestamp`.
pub trait Clock: Send + Sync {
    fn now(&self) -> String;
}

/// Wall clock, RFC3339 in UTC.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> String {
        let now = OffsetDateTime::now_utc();
        // Rfc3339 only fails for years outside 0..=9999.
        now.format(&Rfc3339)
            .unwrap_or_else(|_| now.unix_timestamp().to_string())
    }
}

/// Always returns the same instant.
#[cfg(test)]
#[derive(Debug, Clone)]
pub struct FixedClock(pub String);

#[cfg(test)]
impl Clock for FixedClock {
    fn now(&self) -> String {
        self.0.clone()
    }
}
