//! Detected features of a time-series

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// The kinds of feature the detectors can produce.
///
/// Serialized in UPPERCASE because rule tables key on these names.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum FeatureKind {
    Peak,
    Slope,
    Max,
    Min,
    Current,
    Last,
}

impl std::fmt::Display for FeatureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Peak => "PEAK",
            Self::Slope => "SLOPE",
            Self::Max => "MAX",
            Self::Min => "MIN",
            Self::Current => "CURRENT",
            Self::Last => "LAST",
        };
        f.write_str(name)
    }
}

/// A notable point or segment detected in a time-series.
///
/// Features are immutable once produced: construction helpers consume and
/// return the value, and there are no setters.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Feature {
    pub kind: FeatureKind,
    /// Date of the feature's defining point
    pub date: NaiveDate,
    /// The feature's numeric value (observed value, slope, ...)
    pub value: f64,
    /// Rank among sibling features of the same kind (1 = most prominent)
    pub rank: Option<u32>,
    /// Name of the metric the feature was detected on
    pub metric: Option<String>,
    /// Start of the feature's span, for segment-like features
    pub start: Option<NaiveDate>,
    /// End of the feature's span
    pub end: Option<NaiveDate>,
}

impl Feature {
    /// Creates a point feature
    pub fn new(kind: FeatureKind, date: NaiveDate, value: f64) -> Self {
        Self {
            kind,
            date,
            value,
            rank: None,
            metric: None,
            start: None,
            end: None,
        }
    }

    /// Attaches the metric name
    pub fn with_metric(mut self, metric: impl Into<String>) -> Self {
        self.metric = Some(metric.into());
        self
    }

    /// Attaches a prominence rank
    pub fn with_rank(mut self, rank: u32) -> Self {
        self.rank = Some(rank);
        self
    }

    /// Attaches a span, validating `start <= date <= end`
    pub fn with_span(mut self, start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if start > self.date || self.date > end {
            return Err(Error::InvalidSpan {
                start,
                date: self.date,
                end,
            });
        }
        self.start = Some(start);
        self.end = Some(end);
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2020, 1, d).unwrap()
    }

    #[test]
    fn test_span_validation() {
        let feature = Feature::new(FeatureKind::Peak, day(5), 42.0);
        let ok = feature.clone().with_span(day(3), day(8)).unwrap();
        assert_eq!(ok.start, Some(day(3)));
        assert_eq!(ok.end, Some(day(8)));

        let err = feature.with_span(day(6), day(8)).unwrap_err();
        assert!(matches!(err, Error::InvalidSpan { .. }));
    }

    #[test]
    fn test_kind_names_match_table_keys() {
        assert_eq!(FeatureKind::Peak.to_string(), "PEAK");
        let parsed: FeatureKind = serde_json::from_str("\"PEAK\"").unwrap();
        assert_eq!(parsed, FeatureKind::Peak);
    }
}
