//! Indicator trait definitions.

/// Trait for technical indicators computed over a value series.
///
/// Output is aligned index-for-index with the input: entry `i` is the
/// indicator value at input position `i`, or `None` while the window is
/// still warming up.
pub trait Indicator: Send + Sync {
    /// Calculate aligned indicator values for the given data.
    fn calculate(&self, data: &[f64]) -> Vec<Option<f64>>;

    /// Number of points needed before the first defined value.
    fn period(&self) -> usize;

    /// Get the name of the indicator.
    fn name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct RollingSum {
        period: usize,
    }

    impl Indicator for RollingSum {
        fn calculate(&self, data: &[f64]) -> Vec<Option<f64>> {
            (0..data.len())
                .map(|i| {
                    (i + 1 >= self.period).then(|| data[i + 1 - self.period..=i].iter().sum())
                })
                .collect()
        }

        fn period(&self) -> usize {
            self.period
        }

        fn name(&self) -> &str {
            "sum"
        }
    }

    #[test]
    fn test_indicator_alignment() {
        let indicator = RollingSum { period: 3 };
        let result = indicator.calculate(&[1.0, 2.0, 3.0, 4.0]);

        assert_eq!(result, vec![None, None, Some(6.0), Some(9.0)]);
    }
}
