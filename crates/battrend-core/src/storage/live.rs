//! Rolling 60-second buffer behind the live chart

use alloc::vec::Vec;
use heapless::Deque;

use super::{AppendOutcome, LIVE_CAPACITY, LIVE_WINDOW_SECS, LiveSample, SkipReason};

/// Ring buffer of per-second temperature samples
///
/// The window is anchored on the newest sample, not on wall-clock time: if
/// no new sample arrives the window simply stops moving.
#[derive(Debug, Default)]
pub struct LiveBuffer {
    samples: Deque<LiveSample, LIVE_CAPACITY>,
}

impl LiveBuffer {
    /// Create an empty live buffer
    pub const fn new() -> Self {
        Self {
            samples: Deque::new(),
        }
    }

    /// Append a sample and trim everything that fell out of the window
    ///
    /// An entry is kept while `newest - entry.second < 60`, so a run of
    /// consecutive seconds settles at exactly 60 entries. May evict any
    /// number of entries, which covers ticks that were missed.
    pub fn append(&mut self, second: u32, temperature_c: f32) -> AppendOutcome {
        if let Some(newest) = self.samples.back() {
            if second <= newest.second {
                return AppendOutcome::Skipped(SkipReason::NotAdvancing {
                    newest: newest.second,
                    offered: second,
                });
            }
        }

        let mut evicted = 0;
        if let Some(cutoff) = second.checked_sub(LIVE_WINDOW_SECS) {
            while self
                .samples
                .front()
                .is_some_and(|oldest| oldest.second <= cutoff)
            {
                self.samples.pop_front();
                evicted += 1;
            }
        }

        // Strictly increasing seconds inside the window guarantee room, but a
        // full deque must never reject the newest sample.
        if self.samples.is_full() {
            self.samples.pop_front();
            evicted += 1;
        }
        let _ = self
            .samples
            .push_back(LiveSample::new(second, temperature_c));

        AppendOutcome::Appended { evicted }
    }

    /// Number of stored samples
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Whether no sample has been stored yet
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Iterate samples oldest to newest
    pub fn iter(&self) -> impl Iterator<Item = &LiveSample> {
        self.samples.iter()
    }

    /// Newest sample, if any
    pub fn latest(&self) -> Option<&LiveSample> {
        self.samples.back()
    }

    /// Oldest sample, if any
    pub fn oldest(&self) -> Option<&LiveSample> {
        self.samples.front()
    }

    /// Seconds between the oldest and newest sample
    pub fn span_secs(&self) -> u32 {
        match (self.samples.front(), self.samples.back()) {
            (Some(oldest), Some(newest)) => newest.second - oldest.second,
            _ => 0,
        }
    }

    /// Take an immutable copy of the current contents
    pub fn freeze(&self) -> FrozenLive {
        FrozenLive {
            samples: self.samples.iter().copied().collect(),
        }
    }
}

/// Point-in-time copy of a [`LiveBuffer`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrozenLive {
    samples: Vec<LiveSample>,
}

impl FrozenLive {
    /// Samples oldest to newest
    pub fn samples(&self) -> &[LiveSample] {
        &self.samples
    }

    /// Number of samples in the copy
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Whether the copy is empty
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seconds(buffer: &LiveBuffer) -> Vec<u32> {
        buffer.iter().map(|s| s.second).collect()
    }

    #[test]
    fn test_sixty_one_ticks_keep_seconds_two_through_sixty_one() {
        let mut buffer = LiveBuffer::new();
        for second in 1..=61 {
            buffer.append(second, 30.0);
        }

        assert_eq!(buffer.len(), 60);
        assert_eq!(buffer.oldest().map(|s| s.second), Some(2));
        assert_eq!(buffer.latest().map(|s| s.second), Some(61));
    }

    #[test]
    fn test_span_never_exceeds_window() {
        let mut buffer = LiveBuffer::new();
        buffer.append(0, 20.0);
        for second in 1..500 {
            buffer.append(second, 20.0 + (second % 7) as f32);
            assert!(buffer.span_secs() <= LIVE_WINDOW_SECS);
            let secs = seconds(&buffer);
            assert!(secs.windows(2).all(|w| w[0] < w[1]));
        }
    }

    #[test]
    fn test_gap_evicts_many_at_once() {
        let mut buffer = LiveBuffer::new();
        for second in 0..30 {
            buffer.append(second, 25.0);
        }

        let outcome = buffer.append(200, 26.0);
        assert_eq!(outcome, AppendOutcome::Appended { evicted: 30 });
        assert_eq!(seconds(&buffer), [200]);
    }

    #[test]
    fn test_repeated_second_is_skipped() {
        let mut buffer = LiveBuffer::new();
        buffer.append(5, 25.0);

        let outcome = buffer.append(5, 27.0);
        assert_eq!(
            outcome,
            AppendOutcome::Skipped(SkipReason::NotAdvancing {
                newest: 5,
                offered: 5
            })
        );
        assert_eq!(buffer.len(), 1);
        assert_eq!(buffer.latest().map(|s| s.temperature_c), Some(25.0));
    }

    #[test]
    fn test_window_holds_when_no_new_samples_arrive() {
        let mut buffer = LiveBuffer::new();
        for second in 10..20 {
            buffer.append(second, 25.0);
        }
        // Nothing appended: nothing evicted, regardless of how long we wait
        assert_eq!(buffer.len(), 10);
        assert_eq!(buffer.span_secs(), 9);
    }

    #[test]
    fn test_freeze_is_detached() {
        let mut buffer = LiveBuffer::new();
        buffer.append(1, 25.0);
        let frozen = buffer.freeze();

        buffer.append(2, 26.0);
        assert_eq!(frozen.samples(), &[LiveSample::new(1, 25.0)]);
        assert_eq!(buffer.len(), 2);
    }
}
