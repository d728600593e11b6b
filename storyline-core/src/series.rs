//! Ordered time-series containers

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// A single observation in a time-series
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeSeriesPoint {
    /// Observation date
    pub date: NaiveDate,
    /// Observed value
    pub y: f64,
}

impl TimeSeriesPoint {
    /// Creates a new observation
    pub const fn new(date: NaiveDate, y: f64) -> Self {
        Self { date, y }
    }
}

/// Which vertical axis a series is plotted against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    #[default]
    Left,
    Right,
}

/// A named, date-ordered time-series with an axis assignment.
///
/// Points are kept private so the non-decreasing-date invariant holds for
/// the lifetime of the series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeSeries {
    pub name: String,
    pub axis: Axis,
    points: Vec<TimeSeriesPoint>,
}

impl TimeSeries {
    /// Creates a series, validating that dates are non-decreasing
    pub fn new(
        name: impl Into<String>,
        axis: Axis,
        points: Vec<TimeSeriesPoint>,
    ) -> Result<Self> {
        let name = name.into();
        if points.windows(2).any(|w| w[1].date < w[0].date) {
            return Err(Error::UnsortedSeries(name));
        }
        Ok(Self { name, axis, points })
    }

    /// Number of observations
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// True when the series has no observations
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// All observations, in date order
    pub fn points(&self) -> &[TimeSeriesPoint] {
        &self.points
    }

    /// Observation at `index`
    pub fn get(&self, index: usize) -> Option<&TimeSeriesPoint> {
        self.points.get(index)
    }

    /// The most recent observation
    pub fn last(&self) -> Option<&TimeSeriesPoint> {
        self.points.last()
    }

    /// Index of the observation exactly on `date`
    pub fn index_of_date(&self, date: NaiveDate) -> Option<usize> {
        self.points.iter().position(|p| p.date == date)
    }

    /// Index of the first observation at or after `date`.
    ///
    /// Playback uses this to advance the plotted range to an action's date
    /// even when the date falls between observations.
    pub fn nearest_index(&self, date: NaiveDate) -> Option<usize> {
        self.points.iter().position(|p| p.date >= date)
    }

    /// Largest observed value
    pub fn max_y(&self) -> Option<f64> {
        self.points
            .iter()
            .map(|p| p.y)
            .fold(None, |acc, y| match acc {
                Some(m) if m >= y => Some(m),
                _ => Some(y),
            })
    }

    /// First and last observation dates
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        match (self.points.first(), self.points.last()) {
            (Some(first), Some(last)) => Some((first.date, last.date)),
            _ => None,
        }
    }
}

/// The multi-series input of a plot. The series at index 0 is the primary
/// one: detectors run against it and playback animates its line.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SeriesCollection(Vec<TimeSeries>);

impl SeriesCollection {
    /// Creates a collection from already-validated series
    pub fn new(series: Vec<TimeSeries>) -> Self {
        Self(series)
    }

    /// All series
    pub fn series(&self) -> &[TimeSeries] {
        &self.0
    }

    /// The primary (animated) series
    pub fn primary(&self) -> Option<&TimeSeries> {
        self.0.first()
    }

    /// Number of series
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when the collection holds no series
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Largest value across every series plotted on `axis`
    pub fn max_y(&self, axis: Axis) -> Option<f64> {
        self.0
            .iter()
            .filter(|s| s.axis == axis)
            .filter_map(|s| s.max_y())
            .fold(None, |acc, y| match acc {
                Some(m) if m >= y => Some(m),
                _ => Some(y),
            })
    }

    /// Earliest and latest dates across all series
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        let mut range: Option<(NaiveDate, NaiveDate)> = None;
        for series in &self.0 {
            if let Some((first, last)) = series.date_range() {
                range = Some(match range {
                    Some((lo, hi)) => (lo.min(first), hi.max(last)),
                    None => (first, last),
                });
            }
        }
        range
    }
}
