//! Linear data-to-pixel scales
//!
//! Hosts implementing [`crate::Surface::locate`] need the usual chart
//! scale math: time on the x axis, value on y, ranges inset by margins.
//! Both scales are plain linear maps; axis "niceness" is a presentation
//! concern left to the host.

use chrono::NaiveDate;

/// Pixel inset between the canvas edge and the plotting area
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Margin {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Default for Margin {
    fn default() -> Self {
        Self {
            top: 50.0,
            right: 50.0,
            bottom: 60.0,
            left: 60.0,
        }
    }
}

/// Maps a date domain onto a pixel range
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeScale {
    d0: NaiveDate,
    d1: NaiveDate,
    r0: f64,
    r1: f64,
}

impl TimeScale {
    /// Creates a scale from a date domain and a pixel range
    pub fn new(domain: (NaiveDate, NaiveDate), range: (f64, f64)) -> Self {
        Self {
            d0: domain.0,
            d1: domain.1,
            r0: range.0,
            r1: range.1,
        }
    }

    /// Pixel position of `date`. A degenerate single-day domain maps to
    /// the start of the range.
    pub fn apply(&self, date: NaiveDate) -> f64 {
        let span = (self.d1 - self.d0).num_days() as f64;
        if span == 0.0 {
            return self.r0;
        }
        let t = (date - self.d0).num_days() as f64 / span;
        self.r0 + t * (self.r1 - self.r0)
    }

    /// True when `date` lies inside the domain
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.d0 <= date && date <= self.d1
    }

    /// Pixel midpoint of the range
    pub fn midpoint(&self) -> f64 {
        (self.r0 + self.r1) / 2.0
    }
}

/// Maps a value domain onto a pixel range (inverted for screen-space y)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    d0: f64,
    d1: f64,
    r0: f64,
    r1: f64,
}

impl LinearScale {
    /// Creates a scale from a value domain and a pixel range
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self {
            d0: domain.0,
            d1: domain.1,
            r0: range.0,
            r1: range.1,
        }
    }

    /// Pixel position of `value`
    pub fn apply(&self, value: f64) -> f64 {
        let span = self.d1 - self.d0;
        if span == 0.0 {
            return self.r0;
        }
        let t = (value - self.d0) / span;
        self.r0 + t * (self.r1 - self.r0)
    }
}
