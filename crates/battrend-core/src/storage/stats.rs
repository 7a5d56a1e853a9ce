//! Summary statistics over a frozen history copy

/// Statistics for a series of readings
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TrendStats {
    /// Average value
    pub avg: f32,
    /// Minimum value
    pub min: f32,
    /// Maximum value
    pub max: f32,
    /// Number of values
    pub count: usize,
}

impl TrendStats {
    /// Compute statistics over any sequence of values
    ///
    /// Returns the default (all zeros, `count == 0`) for an empty sequence.
    pub fn from_values(values: impl IntoIterator<Item = f32>) -> Self {
        let mut sum = 0.0_f64;
        let mut min = f32::MAX;
        let mut max = f32::MIN;
        let mut count = 0usize;

        for value in values {
            sum += value as f64;
            min = min.min(value);
            max = max.max(value);
            count += 1;
        }

        if count == 0 {
            return Self::default();
        }

        Self {
            avg: (sum / count as f64) as f32,
            min,
            max,
            count,
        }
    }

    /// Whether any value contributed
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_is_default() {
        let stats = TrendStats::from_values(core::iter::empty());
        assert!(stats.is_empty());
        assert_eq!(stats, TrendStats::default());
    }

    #[test]
    fn test_min_avg_max() {
        let stats = TrendStats::from_values([10.0, 20.0, 30.0]);
        assert_eq!(stats.count, 3);
        assert_eq!(stats.min, 10.0);
        assert_eq!(stats.max, 30.0);
        assert_eq!(stats.avg, 20.0);
    }
}
