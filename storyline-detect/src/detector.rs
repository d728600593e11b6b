//! Detector configuration and dispatch

use serde::{Deserialize, Serialize};
use storyline_core::{Feature, FeatureKind, TimeSeries};
use tracing::debug;

use crate::{detect_peaks, detect_slopes, Result};

/// The single-point feature at the most recent observation.
///
/// Unlike the scanning detectors, an empty series is an error here: there
/// is no current point to reference.
pub fn current(series: &TimeSeries, metric: &str) -> Result<Feature> {
    let point = series
        .last()
        .ok_or_else(|| storyline_core::Error::EmptySeries(series.name.clone()))?;
    Ok(Feature::new(FeatureKind::Current, point.date, point.y).with_metric(metric))
}

/// The single-point feature at an explicitly selected index
pub fn at_index(series: &TimeSeries, metric: &str, index: usize) -> Result<Feature> {
    let point = series
        .get(index)
        .ok_or(storyline_core::Error::IndexOutOfRange {
            index,
            len: series.len(),
        })?;
    Ok(Feature::new(FeatureKind::Last, point.date, point.y).with_metric(metric))
}

/// Which detector a story runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DetectorKind {
    Peaks,
    Slopes,
    Current,
}

/// A configured detector: kind, metric name, and window size
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detector {
    pub kind: DetectorKind,
    pub metric: String,
    #[serde(default = "default_window")]
    pub window: usize,
}

fn default_window() -> usize {
    10
}

impl Detector {
    /// Creates a detector configuration
    pub fn new(kind: DetectorKind, metric: impl Into<String>, window: usize) -> Self {
        Self {
            kind,
            metric: metric.into(),
            window,
        }
    }

    /// Runs the detector over `series`, producing features in date order
    pub fn run(&self, series: &TimeSeries) -> Result<Vec<Feature>> {
        let features = match self.kind {
            DetectorKind::Peaks => detect_peaks(series, &self.metric, self.window)?,
            DetectorKind::Slopes => detect_slopes(series, &self.metric, self.window)?,
            DetectorKind::Current => vec![current(series, &self.metric)?],
        };
        debug!(
            kind = ?self.kind,
            series = %series.name,
            count = features.len(),
            "detector run complete"
        );
        Ok(features)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use storyline_core::{Axis, TimeSeriesPoint};

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2020, 1, d).unwrap()
    }

    fn series(values: &[f64]) -> TimeSeries {
        let points = values
            .iter()
            .enumerate()
            .map(|(i, &y)| TimeSeriesPoint::new(day(i as u32 + 1), y))
            .collect();
        TimeSeries::new("cases", Axis::Left, points).unwrap()
    }

    #[test]
    fn test_current_references_most_recent_point() {
        let s = series(&[10.0, 50.0, 20.0]);
        let feature = current(&s, "Cases/day").unwrap();
        assert_eq!(feature.kind, FeatureKind::Current);
        assert_eq!(feature.date, day(3));
        assert_eq!(feature.value, 20.0);
        assert_eq!(feature.metric.as_deref(), Some("Cases/day"));
    }

    #[test]
    fn test_current_fails_on_empty_series() {
        let s = series(&[]);
        let err = current(&s, "Cases/day").unwrap_err();
        assert!(matches!(
            err,
            crate::Error::Core(storyline_core::Error::EmptySeries(_))
        ));
    }

    #[test]
    fn test_at_index_bounds() {
        let s = series(&[10.0, 50.0]);
        let feature = at_index(&s, "Cases/day", 0).unwrap();
        assert_eq!(feature.kind, FeatureKind::Last);
        assert_eq!(feature.date, day(1));

        let err = at_index(&s, "Cases/day", 5).unwrap_err();
        assert!(matches!(
            err,
            crate::Error::Core(storyline_core::Error::IndexOutOfRange { index: 5, len: 2 })
        ));
    }

    #[test]
    fn test_dispatch_by_kind() {
        let s = series(&[10.0, 50.0, 20.0, 60.0, 15.0]);
        let peaks = Detector::new(DetectorKind::Peaks, "Cases/day", 1)
            .run(&s)
            .unwrap();
        assert_eq!(peaks.len(), 2);

        let current = Detector::new(DetectorKind::Current, "Cases/day", 1)
            .run(&s)
            .unwrap();
        assert_eq!(current.len(), 1);
        assert_eq!(current[0].date, day(5));
    }
}
