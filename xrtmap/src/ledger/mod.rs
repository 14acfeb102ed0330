//! Point ledger: the ordered queue of live points.
//!
//! Points are appended in arrival order and expire in the same order, so the
//! queue is always sorted by observation time (oldest first). Expiry is a
//! prefix removal: peek the front, drop it while it is old enough, stop at the
//! first point that is still fresh.
//!
//! # Design
//!
//! - Backed by a `VecDeque`; the ledger is the single owner of every point
//! - Timestamps come from `tokio::time::Instant` so sweeps can be driven by a
//!   paused clock in tests
//! - The ledger never erases markers itself; the session pairs each
//!   [`dequeue_oldest`](PointLedger::dequeue_oldest) with an undraw

use std::collections::VecDeque;
use std::time::Duration;

use tokio::time::Instant;

/// A single observed coordinate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
    /// When this point arrived.
    pub observed_at: Instant,
}

impl Point {
    /// Create a point observed at the given instant.
    pub fn new(latitude: f64, longitude: f64, observed_at: Instant) -> Self {
        Self {
            latitude,
            longitude,
            observed_at,
        }
    }

    /// Age of the point relative to `now` (zero if `now` is earlier).
    pub fn age(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.observed_at)
    }

    /// Whether the point has reached `expire_after` at `now`.
    pub fn is_expired(&self, now: Instant, expire_after: Duration) -> bool {
        self.age(now) >= expire_after
    }
}

/// FIFO queue of timestamped points.
///
/// # Usage
///
/// ```ignore
/// let mut ledger = PointLedger::new();
/// ledger.enqueue(60.17, 24.94);
///
/// while let Some(point) = ledger.peek_oldest() {
///     if !point.is_expired(Instant::now(), expire_after) {
///         break;
///     }
///     // erase marker, then:
///     ledger.dequeue_oldest();
/// }
/// ```
#[derive(Debug, Default)]
pub struct PointLedger {
    /// Live points (oldest first).
    points: VecDeque<Point>,
}

impl PointLedger {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a point stamped with the current time.
    pub fn enqueue(&mut self, latitude: f64, longitude: f64) {
        self.enqueue_at(latitude, longitude, Instant::now());
    }

    /// Append a point with an explicit timestamp.
    ///
    /// The timestamp is clamped to the newest entry's so the ledger stays
    /// ordered even if a caller passes an earlier instant.
    pub fn enqueue_at(&mut self, latitude: f64, longitude: f64, observed_at: Instant) {
        let observed_at = match self.points.back() {
            Some(newest) if newest.observed_at > observed_at => newest.observed_at,
            _ => observed_at,
        };
        self.points
            .push_back(Point::new(latitude, longitude, observed_at));
    }

    /// The oldest live point, if any.
    pub fn peek_oldest(&self) -> Option<&Point> {
        self.points.front()
    }

    /// Remove and return the oldest point. No-op on an empty ledger.
    pub fn dequeue_oldest(&mut self) -> Option<Point> {
        self.points.pop_front()
    }

    /// Number of live points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the ledger holds no points.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Iterate over live points (oldest first).
    pub fn iter(&self) -> impl Iterator<Item = &Point> {
        self.points.iter()
    }

    /// When the oldest point will expire, if there is one.
    pub fn next_expiry(&self, expire_after: Duration) -> Option<Instant> {
        self.points.front().map(|p| p.observed_at + expire_after)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ledger_creation() {
        let ledger = PointLedger::new();
        assert!(ledger.is_empty());
        assert_eq!(ledger.len(), 0);
        assert!(ledger.peek_oldest().is_none());
    }

    #[test]
    fn test_enqueue_and_peek() {
        let mut ledger = PointLedger::new();
        ledger.enqueue(60.17, 24.94);
        ledger.enqueue(51.5, -0.12);

        assert_eq!(ledger.len(), 2);
        let oldest = ledger.peek_oldest().unwrap();
        assert_eq!(oldest.latitude, 60.17);
        assert_eq!(oldest.longitude, 24.94);

        // Peeking does not remove
        assert_eq!(ledger.len(), 2);
    }

    #[test]
    fn test_dequeue_in_arrival_order() {
        let mut ledger = PointLedger::new();
        let base = Instant::now();
        for i in 0..5 {
            ledger.enqueue_at(i as f64, 0.0, base + Duration::from_secs(i));
        }

        for i in 0..5 {
            let point = ledger.dequeue_oldest().unwrap();
            assert_eq!(point.latitude, i as f64);
        }
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_dequeue_empty_is_noop() {
        let mut ledger = PointLedger::new();
        assert!(ledger.dequeue_oldest().is_none());
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_enqueue_after_drain() {
        let mut ledger = PointLedger::new();
        ledger.enqueue(1.0, 1.0);
        ledger.dequeue_oldest();
        ledger.enqueue(2.0, 2.0);

        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger.peek_oldest().unwrap().latitude, 2.0);
    }

    #[test]
    fn test_enqueue_at_keeps_order() {
        let mut ledger = PointLedger::new();
        let base = Instant::now();
        ledger.enqueue_at(1.0, 1.0, base + Duration::from_secs(10));
        ledger.enqueue_at(2.0, 2.0, base);

        let stamps: Vec<_> = ledger.iter().map(|p| p.observed_at).collect();
        assert_eq!(stamps[0], stamps[1]);
    }

    #[test]
    fn test_point_expiry_boundary() {
        let base = Instant::now();
        let point = Point::new(0.0, 0.0, base);
        let expire_after = Duration::from_secs(30);

        assert!(!point.is_expired(base + Duration::from_secs(29), expire_after));
        assert!(point.is_expired(base + Duration::from_secs(30), expire_after));
        assert!(point.is_expired(base + Duration::from_secs(31), expire_after));
    }

    #[test]
    fn test_age_saturates() {
        let base = Instant::now();
        let point = Point::new(0.0, 0.0, base + Duration::from_secs(5));
        assert_eq!(point.age(base), Duration::ZERO);
    }

    #[test]
    fn test_next_expiry() {
        let mut ledger = PointLedger::new();
        let expire_after = Duration::from_secs(30);
        assert!(ledger.next_expiry(expire_after).is_none());

        let base = Instant::now();
        ledger.enqueue_at(0.0, 0.0, base);
        ledger.enqueue_at(0.0, 0.0, base + Duration::from_secs(3));
        assert_eq!(ledger.next_expiry(expire_after), Some(base + expire_after));
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn iteration_matches_arrival_order(
                coords in prop::collection::vec((-90.0f64..90.0, -180.0f64..180.0), 0..64),
            ) {
                let mut ledger = PointLedger::new();
                let base = Instant::now();
                for (i, (lat, lon)) in coords.iter().enumerate() {
                    ledger.enqueue_at(*lat, *lon, base + Duration::from_millis(i as u64));
                }

                let seen: Vec<(f64, f64)> =
                    ledger.iter().map(|p| (p.latitude, p.longitude)).collect();
                prop_assert_eq!(seen, coords);
            }

            #[test]
            fn timestamps_never_decrease(
                offsets in prop::collection::vec(0u64..10_000, 1..64),
            ) {
                let mut ledger = PointLedger::new();
                let base = Instant::now();
                for offset in offsets {
                    ledger.enqueue_at(0.0, 0.0, base + Duration::from_millis(offset));
                }

                let stamps: Vec<_> = ledger.iter().map(|p| p.observed_at).collect();
                prop_assert!(stamps.windows(2).all(|w| w[0] <= w[1]));
            }
        }
    }
}
