//! Date-time providers consulted when stamping `created_at` / `updated_at`.

use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};

use chrono::{DateTime, FixedOffset, Offset, Utc};

/// A point in time together with the UTC offset it was observed at.
pub type Timestamp = DateTime<FixedOffset>;

/// Source of "now" for the auditing feature.
///
/// Implementations should be monotonically non-decreasing across calls made
/// within one logical transaction. The auditing handler does not enforce it.
pub trait DateTimeProvider: Send + Sync {
    /// Current timestamp, or `None` if the provider cannot tell.
    fn now(&self) -> Option<Timestamp>;
}

impl<T: DateTimeProvider + ?Sized> DateTimeProvider for Arc<T> {
    fn now(&self) -> Option<Timestamp> {
        (**self).now()
    }
}

/// East Africa Time, the clinic's local offset.
pub fn east_africa_time() -> FixedOffset {
    FixedOffset::east_opt(3 * 3600).unwrap_or_else(|| Utc.fix())
}

type UtcSource = dyn Fn() -> DateTime<Utc> + Send + Sync;

/// Wall clock rendered at a fixed UTC offset.
///
/// Never hands out a value earlier than one it already returned: if the
/// underlying source steps backwards, the previous value is repeated.
pub struct ZonedClock {
    offset: FixedOffset,
    source: Arc<UtcSource>,
    last_micros: AtomicI64,
}

impl ZonedClock {
    pub fn new(offset: FixedOffset) -> Self {
        Self::with_source(offset, Utc::now)
    }

    /// Build a clock over an arbitrary UTC source (tests, replays).
    pub fn with_source<F>(offset: FixedOffset, source: F) -> Self
    where
        F: Fn() -> DateTime<Utc> + Send + Sync + 'static,
    {
        Self {
            offset,
            source: Arc::new(source),
            last_micros: AtomicI64::new(i64::MIN),
        }
    }

    pub fn offset(&self) -> FixedOffset {
        self.offset
    }
}

impl Default for ZonedClock {
    fn default() -> Self {
        Self::new(east_africa_time())
    }
}

impl core::fmt::Debug for ZonedClock {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ZonedClock")
            .field("offset", &self.offset)
            .finish_non_exhaustive()
    }
}

impl DateTimeProvider for ZonedClock {
    fn now(&self) -> Option<Timestamp> {
        let observed = (self.source)().timestamp_micros();
        let previous = self.last_micros.fetch_max(observed, Ordering::AcqRel);
        let micros = previous.max(observed);

        DateTime::<Utc>::from_timestamp_micros(micros).map(|t| t.with_timezone(&self.offset))
    }
}

/// Always returns the same instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedDateTimeProvider(Timestamp);

impl FixedDateTimeProvider {
    pub fn new(at: Timestamp) -> Self {
        Self(at)
    }
}

impl DateTimeProvider for FixedDateTimeProvider {
    fn now(&self) -> Option<Timestamp> {
        Some(self.0)
    }
}
