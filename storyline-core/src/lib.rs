//! Storyline Core Library
//!
//! This library provides the data model shared across the storyline
//! pipeline: ordered time-series, detected features, and the coordinate
//! primitives the playback engine positions annotations with.

pub mod coordinate;
pub mod feature;
pub mod series;

pub use coordinate::{Coordinate, CoordinatePair};
pub use feature::{Feature, FeatureKind};
pub use series::{Axis, SeriesCollection, TimeSeries, TimeSeriesPoint};

use chrono::NaiveDate;

/// Result type for storyline-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for storyline-core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("series '{0}' has out-of-order dates")]
    UnsortedSeries(String),

    #[error("series '{0}' is empty")]
    EmptySeries(String),

    #[error("index {index} out of range for series of length {len}")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("date {date} not found in series '{series}'")]
    DateNotFound { date: NaiveDate, series: String },

    #[error("invalid feature span: {start} <= {date} <= {end} does not hold")]
    InvalidSpan {
        start: NaiveDate,
        date: NaiveDate,
        end: NaiveDate,
    },
}
