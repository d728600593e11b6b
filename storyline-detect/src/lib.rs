//! Storyline Detection Library
//!
//! Pure detectors that scan an ordered time-series and produce features:
//! windowed peak search, windowed slope estimation, and current/last point
//! selection. Detectors never mutate their input and always return features
//! in date order.

pub mod detector;
pub mod peaks;
pub mod slope;

pub use detector::{at_index, current, Detector, DetectorKind};
pub use peaks::detect_peaks;
pub use slope::detect_slopes;

/// Result type for storyline-detect operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for storyline-detect operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("storyline core error: {0}")]
    Core(#[from] storyline_core::Error),

    #[error("invalid detector window: {0}")]
    InvalidWindow(usize),
}
