//! The distribution of sale prices over ten fixed price ranges.
//!
//! The API returns a list of counts. The labels never come from the API:
//! the n-th count always belongs to the n-th [PriceRange].

use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// One of the ten fixed, non-overlapping price ranges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PriceRange {
    /// 0 to 100.
    UpTo100,
    /// 101 to 200.
    UpTo200,
    /// 201 to 300.
    UpTo300,
    /// 301 to 400.
    UpTo400,
    /// 401 to 500.
    UpTo500,
    /// 501 to 600.
    UpTo600,
    /// 601 to 700.
    UpTo700,
    /// 701 to 800.
    UpTo800,
    /// 801 to 900.
    UpTo900,
    /// 901 and above.
    Above900,
}

impl PriceRange {
    /// Every price range in ascending order.
    pub const ALL: [PriceRange; 10] = [
        PriceRange::UpTo100,
        PriceRange::UpTo200,
        PriceRange::UpTo300,
        PriceRange::UpTo400,
        PriceRange::UpTo500,
        PriceRange::UpTo600,
        PriceRange::UpTo700,
        PriceRange::UpTo800,
        PriceRange::UpTo900,
        PriceRange::Above900,
    ];

    /// The chart label for the range, e.g. "101-200".
    pub fn label(self) -> &'static str {
        match self {
            PriceRange::UpTo100 => "0-100",
            PriceRange::UpTo200 => "101-200",
            PriceRange::UpTo300 => "201-300",
            PriceRange::UpTo400 => "301-400",
            PriceRange::UpTo500 => "401-500",
            PriceRange::UpTo600 => "501-600",
            PriceRange::UpTo700 => "601-700",
            PriceRange::UpTo800 => "701-800",
            PriceRange::UpTo900 => "801-900",
            PriceRange::Above900 => "901-above",
        }
    }
}

impl Display for PriceRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// A single element of the bar chart response.
///
/// Any other fields the API sends, such as its own range label, are ignored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceBucket {
    /// The number of items in the range.
    #[serde(default)]
    pub count: u64,
}

/// The number of items in each price range, in [PriceRange::ALL] order.
///
/// Holds at most ten counts. A short response leaves the trailing ranges
/// without a bar.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PriceHistogram {
    counts: Vec<u64>,
}

impl PriceHistogram {
    /// Build a histogram from the buckets returned by the API.
    ///
    /// Buckets past the tenth are dropped.
    pub fn from_buckets(buckets: &[PriceBucket]) -> Self {
        let counts = buckets
            .iter()
            .take(PriceRange::ALL.len())
            .map(|bucket| bucket.count)
            .collect();

        Self { counts }
    }

    /// Whether there are no bars to draw.
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// The counts received, in price range order.
    pub fn counts(&self) -> &[u64] {
        &self.counts
    }

    /// Every price range paired with its count, `None` where the API sent no count.
    pub fn bars(&self) -> impl Iterator<Item = (PriceRange, Option<u64>)> + '_ {
        PriceRange::ALL
            .iter()
            .enumerate()
            .map(|(index, range)| (*range, self.counts.get(index).copied()))
    }
}

impl<'de> Deserialize<'de> for PriceHistogram {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let buckets = Vec::<PriceBucket>::deserialize(deserializer)?;
        Ok(Self::from_buckets(&buckets))
    }
}

#[cfg(test)]
mod tests {
    use super::{PriceHistogram, PriceRange};

    #[test]
    fn empty_response_has_no_bars() {
        let histogram: PriceHistogram = serde_json::from_str("[]").unwrap();

        assert!(histogram.is_empty());
    }

    #[test]
    fn counts_follow_fixed_label_order() {
        let json = r#"[
            {"range": "0-100", "count": 5},
            {"range": "101-200", "count": 10},
            {"range": "201-300", "count": 15},
            {"range": "301-400", "count": 7},
            {"range": "401-500", "count": 2},
            {"count": 0}, {"count": 0}, {"count": 0}, {"count": 0}, {"count": 0}
        ]"#;

        let histogram: PriceHistogram = serde_json::from_str(json).unwrap();
        let bars: Vec<_> = histogram.bars().collect();

        assert_eq!(histogram.counts(), &[5, 10, 15, 7, 2, 0, 0, 0, 0, 0]);
        assert_eq!(bars.len(), 10);
        assert_eq!(bars[0], (PriceRange::UpTo100, Some(5)));
        assert_eq!(bars[3], (PriceRange::UpTo400, Some(7)));
        assert_eq!(bars[9], (PriceRange::Above900, Some(0)));
    }

    #[test]
    fn labels_are_not_read_from_response() {
        let json = r#"[{"range": "901-above", "count": 3}]"#;

        let histogram: PriceHistogram = serde_json::from_str(json).unwrap();

        assert_eq!(histogram.bars().next(), Some((PriceRange::UpTo100, Some(3))));
    }

    #[test]
    fn short_response_leaves_trailing_ranges_empty() {
        let histogram: PriceHistogram =
            serde_json::from_str(r#"[{"count": 1}, {"count": 2}]"#).unwrap();

        let bars: Vec<_> = histogram.bars().collect();

        assert_eq!(bars[1], (PriceRange::UpTo200, Some(2)));
        assert_eq!(bars[2], (PriceRange::UpTo300, None));
        assert!(!histogram.is_empty());
    }

    #[test]
    fn extra_buckets_are_dropped() {
        let json = format!("[{}]", vec![r#"{"count": 1}"#; 12].join(","));

        let histogram: PriceHistogram = serde_json::from_str(&json).unwrap();

        assert_eq!(histogram.counts().len(), 10);
    }

    #[test]
    fn missing_count_reads_as_zero() {
        let histogram: PriceHistogram = serde_json::from_str(r#"[{"range": "0-100"}]"#).unwrap();

        assert_eq!(histogram.counts(), &[0]);
    }
}
