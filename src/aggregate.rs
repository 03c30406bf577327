//! Age distribution
//!
//! Folds the store's grouped `(age, count)` pairs into four fixed buckets
//! with integer-rounded percentages.

use serde::Serialize;

/// Count and share of one bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BucketStat {
    /// Rows whose age falls in the bucket
    pub count: u64,
    /// `round(count / total * 100)`; 0 when the table is empty
    pub percent: u32,
}

/// Read-side summary over the persisted rows.
///
/// Percentages are rounded independently per bucket and are not adjusted to
/// sum to exactly 100 — a 99 or 101 total is expected behavior, not a defect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AgeDistribution {
    /// Total persisted rows
    pub total: u64,
    /// Ages below 20
    pub under_20: BucketStat,
    /// Ages 20 through 40, inclusive
    pub age_20_to_40: BucketStat,
    /// Ages 41 through 60, inclusive
    pub age_41_to_60: BucketStat,
    /// Ages above 60
    pub over_60: BucketStat,
}

impl AgeDistribution {
    /// Bucket a sequence of `(age, count)` pairs, as returned by the store's
    /// grouped count query.
    pub fn from_counts<I>(counts: I) -> Self
    where
        I: IntoIterator<Item = (i64, u64)>,
    {
        let mut total = 0u64;
        let mut buckets = [0u64; 4];

        for (age, count) in counts {
            total += count;
            let slot = match age {
                a if a < 20 => 0,
                a if a <= 40 => 1,
                a if a <= 60 => 2,
                _ => 3,
            };
            buckets[slot] += count;
        }

        let stat = |count: u64| BucketStat {
            count,
            percent: percent_of(count, total),
        };

        Self {
            total,
            under_20: stat(buckets[0]),
            age_20_to_40: stat(buckets[1]),
            age_41_to_60: stat(buckets[2]),
            over_60: stat(buckets[3]),
        }
    }
}

fn percent_of(count: u64, total: u64) -> u32 {
    if total == 0 {
        return 0;
    }
    ((count as f64 / total as f64) * 100.0).round() as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_buckets_and_percentages() {
        // three <20, one 20-40, one >60
        let dist = AgeDistribution::from_counts(vec![(10, 3), (30, 1), (70, 1)]);

        assert_eq!(dist.total, 5);
        assert_eq!(dist.under_20, BucketStat { count: 3, percent: 60 });
        assert_eq!(dist.age_20_to_40, BucketStat { count: 1, percent: 20 });
        assert_eq!(dist.age_41_to_60, BucketStat { count: 0, percent: 0 });
        assert_eq!(dist.over_60, BucketStat { count: 1, percent: 20 });
    }

    #[test]
    fn test_bucket_boundaries_inclusive() {
        let dist =
            AgeDistribution::from_counts(vec![(19, 1), (20, 1), (40, 1), (41, 1), (60, 1), (61, 1)]);

        assert_eq!(dist.under_20.count, 1);
        assert_eq!(dist.age_20_to_40.count, 2);
        assert_eq!(dist.age_41_to_60.count, 2);
        assert_eq!(dist.over_60.count, 1);
    }

    #[test]
    fn test_empty_table_yields_all_zero() {
        let dist = AgeDistribution::from_counts(Vec::new());
        assert_eq!(dist.total, 0);
        assert_eq!(dist.under_20.percent, 0);
        assert_eq!(dist.over_60.percent, 0);
    }

    #[test]
    fn test_percentages_may_not_sum_to_100() {
        // three equal thirds round to 33 each
        let dist = AgeDistribution::from_counts(vec![(10, 1), (30, 1), (50, 1)]);
        let sum = dist.under_20.percent
            + dist.age_20_to_40.percent
            + dist.age_41_to_60.percent
            + dist.over_60.percent;
        assert_eq!(sum, 99);
    }

    #[test]
    fn test_rounding_is_standard() {
        // 1 of 8 = 12.5% rounds to 13
        let dist = AgeDistribution::from_counts(vec![(10, 1), (30, 7)]);
        assert_eq!(dist.under_20.percent, 13);
        assert_eq!(dist.age_20_to_40.percent, 88);
    }

    #[test]
    fn test_negative_ages_land_under_20() {
        let dist = AgeDistribution::from_counts(vec![(-3, 2)]);
        assert_eq!(dist.under_20.count, 2);
        assert_eq!(dist.under_20.percent, 100);
    }
}
