//! Windowed slope estimation
//!
//! Fits a least-squares line through each consecutive window of points and
//! reports the slope in value units per day. Slopes are derived values, not
//! positional searches: the feature's date is the window midpoint and its
//! span is the window itself.

use storyline_core::{Feature, FeatureKind, TimeSeries, TimeSeriesPoint};

use crate::{Error, Result};

/// Estimates the slope of `series` over consecutive `window`-point chunks.
///
/// A window needs at least two points to define a slope; a series shorter
/// than the window yields zero features. A trailing partial window is
/// dropped.
pub fn detect_slopes(series: &TimeSeries, metric: &str, window: usize) -> Result<Vec<Feature>> {
    if window < 2 {
        return Err(Error::InvalidWindow(window));
    }

    let points = series.points();
    if points.len() < window {
        return Ok(Vec::new());
    }

    let mut features = Vec::with_capacity(points.len() / window);
    for chunk in points.chunks_exact(window) {
        let slope = least_squares_slope(chunk);
        let mid = &chunk[chunk.len() / 2];

        let feature = Feature::new(FeatureKind::Slope, mid.date, slope)
            .with_metric(metric)
            .with_span(chunk[0].date, chunk[chunk.len() - 1].date)?;
        features.push(feature);
    }

    Ok(features)
}

/// Least-squares slope of y against time-in-days. A window with no date
/// spread has no defined slope and reports 0.
fn least_squares_slope(points: &[TimeSeriesPoint]) -> f64 {
    let n = points.len() as f64;
    let t0 = points[0].date;

    let mut sum_t = 0.0;
    let mut sum_y = 0.0;
    let mut sum_tt = 0.0;
    let mut sum_ty = 0.0;
    for p in points {
        let t = (p.date - t0).num_days() as f64;
        sum_t += t;
        sum_y += p.y;
        sum_tt += t * t;
        sum_ty += t * p.y;
    }

    let denominator = n * sum_tt - sum_t * sum_t;
    if denominator == 0.0 {
        return 0.0;
    }
    (n * sum_ty - sum_t * sum_y) / denominator
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use storyline_core::Axis;

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
    fn test_rising_series_has_positive_slope() {
        let s = series(&[0.0, 10.0, 20.0, 30.0]);
        let slopes = detect_slopes(&s, "Cases/day", 4).unwrap();
        assert_eq!(slopes.len(), 1);
        assert!((slopes[0].value - 10.0).abs() < 1e-9);
        assert_eq!(slopes[0].kind, FeatureKind::Slope);
        assert_eq!(slopes[0].start, Some(day(1)));
        assert_eq!(slopes[0].end, Some(day(4)));
    }

    #[test]
    fn test_falling_series_has_negative_slope() {
        let s = series(&[30.0, 20.0, 10.0, 0.0]);
        let slopes = detect_slopes(&s, "Cases/day", 2).unwrap();
        assert_eq!(slopes.len(), 2);
        assert!(slopes.iter().all(|f| f.value < 0.0));
        assert!(slopes[0].date < slopes[1].date);
    }

    #[test]
    fn test_short_series_yields_nothing() {
        let s = series(&[1.0, 2.0]);
        assert!(detect_slopes(&s, "Cases/day", 3).unwrap().is_empty());
    }

    #[test]
    fn test_window_of_one_is_an_error() {
        let s = series(&[1.0, 2.0, 3.0]);
        assert!(matches!(
            detect_slopes(&s, "Cases/day", 1),
            Err(Error::InvalidWindow(1))
        ));
    }
}
