//! Capped minute-resolution history behind the snapshot chart

use alloc::vec::Vec;
use heapless::Deque;

use super::{AppendOutcome, SNAPSHOT_CAPACITY, SkipReason, SnapshotPoint, TrendStats};

/// Minute-resolution history of temperature and battery charge
///
/// Holds at most [`SNAPSHOT_CAPACITY`] points. Appends happen once per tick,
/// so a full buffer drops exactly its single oldest point per push.
#[derive(Debug, Default)]
pub struct SnapshotBuffer {
    points: Deque<SnapshotPoint, SNAPSHOT_CAPACITY>,
}

impl SnapshotBuffer {
    /// Create an empty snapshot buffer
    pub const fn new() -> Self {
        Self {
            points: Deque::new(),
        }
    }

    /// Append a point if both values are known
    pub fn append(
        &mut self,
        second: u32,
        temperature_c: Option<f32>,
        battery_percent: Option<f32>,
    ) -> AppendOutcome {
        let Some(temperature_c) = temperature_c else {
            return AppendOutcome::Skipped(SkipReason::MissingTemperature);
        };
        let Some(battery_percent) = battery_percent else {
            return AppendOutcome::Skipped(SkipReason::MissingBattery);
        };

        if let Some(newest) = self.points.back() {
            if second <= newest.second {
                return AppendOutcome::Skipped(SkipReason::NotAdvancing {
                    newest: newest.second,
                    offered: second,
                });
            }
        }

        // If buffer is full, remove oldest
        let mut evicted = 0;
        if self.points.is_full() {
            self.points.pop_front();
            evicted = 1;
        }
        let _ = self
            .points
            .push_back(SnapshotPoint::new(second, temperature_c, battery_percent));

        AppendOutcome::Appended { evicted }
    }

    /// Number of stored points
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether no point has been stored yet
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Whether the buffer is at capacity
    pub fn is_full(&self) -> bool {
        self.points.is_full()
    }

    /// Iterate points oldest to newest
    pub fn iter(&self) -> impl Iterator<Item = &SnapshotPoint> {
        self.points.iter()
    }

    /// Newest point, if any
    pub fn latest(&self) -> Option<&SnapshotPoint> {
        self.points.back()
    }

    /// Oldest point, if any
    pub fn oldest(&self) -> Option<&SnapshotPoint> {
        self.points.front()
    }

    /// Take an immutable copy of the current contents
    pub fn freeze(&self) -> FrozenSnapshot {
        FrozenSnapshot {
            points: self.points.iter().copied().collect(),
        }
    }
}

/// Point-in-time copy of a [`SnapshotBuffer`] used as the snapshot display source
///
/// Owned exclusively by the snapshot view mode; background appends to the
/// live buffer never reach it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrozenSnapshot {
    points: Vec<SnapshotPoint>,
}

impl FrozenSnapshot {
    /// Points oldest to newest
    pub fn points(&self) -> &[SnapshotPoint] {
        &self.points
    }

    /// Number of points in the copy
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the copy is empty
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// First and last second covered by the copy
    pub fn time_range(&self) -> Option<(u32, u32)> {
        match (self.points.first(), self.points.last()) {
            (Some(first), Some(last)) => Some((first.second, last.second)),
            _ => None,
        }
    }

    /// Temperature statistics over the whole copy
    pub fn temperature_stats(&self) -> TrendStats {
        TrendStats::from_values(self.points.iter().map(|p| p.temperature_c))
    }

    /// Battery statistics over the whole copy
    pub fn battery_stats(&self) -> TrendStats {
        TrendStats::from_values(self.points.iter().map(|p| p.battery_percent))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_battery_is_noop() {
        let mut buffer = SnapshotBuffer::new();
        buffer.append(60, Some(25.0), Some(80.0));

        let outcome = buffer.append(120, Some(25.0), None);
        assert_eq!(
            outcome,
            AppendOutcome::Skipped(SkipReason::MissingBattery)
        );
        assert_eq!(buffer.len(), 1);
    }

    #[test]
    fn test_missing_temperature_is_noop() {
        let mut buffer = SnapshotBuffer::new();
        let outcome = buffer.append(60, None, Some(80.0));
        assert!(!outcome.is_appended());
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_capacity_evicts_single_oldest() {
        let mut buffer = SnapshotBuffer::new();
        for i in 0..SNAPSHOT_CAPACITY as u32 {
            let outcome = buffer.append(i * 60, Some(25.0), Some(50.0));
            assert_eq!(outcome.evicted(), 0);
        }
        assert!(buffer.is_full());

        let outcome = buffer.append(SNAPSHOT_CAPACITY as u32 * 60, Some(26.0), Some(49.0));
        assert_eq!(outcome, AppendOutcome::Appended { evicted: 1 });
        assert_eq!(buffer.len(), SNAPSHOT_CAPACITY);
        assert_eq!(buffer.oldest().map(|p| p.second), Some(60));
        assert_eq!(
            buffer.latest().map(|p| p.second),
            Some(SNAPSHOT_CAPACITY as u32 * 60)
        );
    }

    #[test]
    fn test_4321_ticks_hold_4320_points() {
        let mut buffer = SnapshotBuffer::new();
        for tick in 1..=4321_u32 {
            buffer.append(tick * 60, Some(30.0), Some(75.0));
            assert!(buffer.len() <= SNAPSHOT_CAPACITY);
        }

        assert_eq!(buffer.len(), 4320);
        assert_eq!(buffer.oldest().map(|p| p.second), Some(2 * 60));
    }

    #[test]
    fn test_same_second_is_not_recorded_twice() {
        let mut buffer = SnapshotBuffer::new();
        buffer.append(42, Some(25.0), Some(60.0));
        let outcome = buffer.append(42, Some(25.5), Some(59.0));

        assert!(!outcome.is_appended());
        assert_eq!(buffer.len(), 1);
    }

    #[test]
    fn test_frozen_copy_range_and_stats() {
        let mut buffer = SnapshotBuffer::new();
        buffer.append(60, Some(20.0), Some(90.0));
        buffer.append(120, Some(30.0), Some(80.0));
        buffer.append(180, Some(25.0), Some(70.0));

        let frozen = buffer.freeze();
        buffer.append(240, Some(40.0), Some(60.0));

        assert_eq!(frozen.len(), 3);
        assert_eq!(frozen.time_range(), Some((60, 180)));

        let stats = frozen.temperature_stats();
        assert_eq!(stats.min, 20.0);
        assert_eq!(stats.max, 30.0);
        assert_eq!(stats.avg, 25.0);
        assert_eq!(frozen.battery_stats().count, 3);
    }
}
