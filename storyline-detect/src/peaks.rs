//! Windowed peak search
//!
//! A point is a peak when it dominates every neighbour inside the window
//! clipped to the series bounds: strictly greater than all earlier values
//! and at least as large as all later ones, so the earliest index wins a
//! tie and no two peaks share an index. Each peak also records the
//! monotonic rise before it and fall after it as a start/end span, bounded
//! by the neighbouring peaks and the series edges.

use std::cmp::Ordering;

use storyline_core::{Feature, FeatureKind, TimeSeries, TimeSeriesPoint};

use crate::{Error, Result};

/// Detects local maxima of `series` within a `window`-point neighbourhood.
///
/// Degenerate input (a series of length <= 1, or a window spanning the
/// whole series) yields zero peaks rather than an error. A zero window is
/// a configuration mistake and fails.
pub fn detect_peaks(series: &TimeSeries, metric: &str, window: usize) -> Result<Vec<Feature>> {
    if window == 0 {
        return Err(Error::InvalidWindow(window));
    }

    let points = series.points();
    let n = points.len();
    if n <= 1 || window >= n {
        return Ok(Vec::new());
    }

    let mut peak_indices: Vec<usize> = Vec::new();
    for i in 0..n {
        let lo = i.saturating_sub(window);
        let hi = (i + window).min(n - 1);
        let y = points[i].y;

        let beats_earlier = (lo..i).all(|j| points[j].y < y);
        let beats_later = (i + 1..=hi).all(|j| points[j].y <= y);
        if beats_earlier && beats_later {
            peak_indices.push(i);
        }
    }

    let ranks = rank_by_value(points, &peak_indices);

    let mut features = Vec::with_capacity(peak_indices.len());
    for (k, &i) in peak_indices.iter().enumerate() {
        // span search is bounded by the neighbouring peaks
        let left_bound = if k > 0 { peak_indices[k - 1] + 1 } else { 0 };
        let right_bound = if k + 1 < peak_indices.len() {
            peak_indices[k + 1] - 1
        } else {
            n - 1
        };

        let start = rise_start(points, i, left_bound);
        let end = fall_end(points, i, right_bound);

        let feature = Feature::new(FeatureKind::Peak, points[i].date, points[i].y)
            .with_metric(metric)
            .with_rank(ranks[k])
            .with_span(points[start].date, points[end].date)?;
        features.push(feature);
    }

    Ok(features)
}

/// Ranks peaks by value, 1 = highest
fn rank_by_value(points: &[TimeSeriesPoint], peak_indices: &[usize]) -> Vec<u32> {
    let mut order: Vec<usize> = (0..peak_indices.len()).collect();
    order.sort_by(|&a, &b| {
        points[peak_indices[b]]
            .y
            .partial_cmp(&points[peak_indices[a]].y)
            .unwrap_or(Ordering::Equal)
    });

    let mut ranks = vec![0u32; peak_indices.len()];
    for (rank, &position) in order.iter().enumerate() {
        ranks[position] = rank as u32 + 1;
    }
    ranks
}

/// Walks left from the peak while values rise monotonically into it
fn rise_start(points: &[TimeSeriesPoint], peak: usize, bound: usize) -> usize {
    let mut i = peak;
    while i > bound && points[i - 1].y <= points[i].y {
        i -= 1;
    }
    i
}

/// Walks right from the peak while values fall monotonically away from it
fn fall_end(points: &[TimeSeriesPoint], peak: usize, bound: usize) -> usize {
    let mut i = peak;
    while i < bound && points[i + 1].y <= points[i].y {
        i += 1;
    }
    i
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
    fn test_two_peaks_in_date_order() {
        // [(d1,10),(d2,50),(d3,20),(d4,60),(d5,15)], window=1
        let s = series(&[10.0, 50.0, 20.0, 60.0, 15.0]);
        let peaks = detect_peaks(&s, "Cases/day", 1).unwrap();

        assert_eq!(peaks.len(), 2);
        assert_eq!(peaks[0].date, day(2));
        assert_eq!(peaks[0].value, 50.0);
        assert_eq!(peaks[1].date, day(4));
        assert_eq!(peaks[1].value, 60.0);
        assert!(peaks[0].date < peaks[1].date);

        // highest peak ranks first
        assert_eq!(peaks[0].rank, Some(2));
        assert_eq!(peaks[1].rank, Some(1));
    }

    #[test]
    fn test_empty_series_yields_no_peaks() {
        let s = series(&[]);
        assert!(detect_peaks(&s, "Cases/day", 3).unwrap().is_empty());
    }

    #[test]
    fn test_degenerate_window_yields_no_peaks() {
        let s = series(&[10.0, 50.0, 20.0]);
        assert!(detect_peaks(&s, "Cases/day", 3).unwrap().is_empty());
        assert!(detect_peaks(&s, "Cases/day", 99).unwrap().is_empty());
    }

    #[test]
    fn test_zero_window_is_an_error() {
        let s = series(&[10.0, 50.0, 20.0]);
        assert!(matches!(
            detect_peaks(&s, "Cases/day", 0),
            Err(Error::InvalidWindow(0))
        ));
    }

    #[test]
    fn test_plateau_tie_breaks_to_earliest_index() {
        let s = series(&[10.0, 50.0, 50.0, 10.0]);
        let peaks = detect_peaks(&s, "Cases/day", 1).unwrap();
        assert_eq!(peaks.len(), 1);
        assert_eq!(peaks[0].date, day(2));
    }

    #[test]
    fn test_spans_cover_rise_and_fall() {
        let s = series(&[10.0, 20.0, 50.0, 30.0, 15.0, 40.0, 5.0]);
        let peaks = detect_peaks(&s, "Cases/day", 1).unwrap();
        assert_eq!(peaks.len(), 2);

        // first peak at d3 rises from d1 and falls until d5
        assert_eq!(peaks[0].date, day(3));
        assert_eq!(peaks[0].start, Some(day(1)));
        assert_eq!(peaks[0].end, Some(day(5)));

        // second peak at d6 rises out of the d5 trough and falls to the edge
        assert_eq!(peaks[1].date, day(6));
        assert_eq!(peaks[1].start, Some(day(5)));
        assert_eq!(peaks[1].end, Some(day(7)));
    }

    #[test]
    fn test_no_duplicate_indices() {
        let s = series(&[1.0, 3.0, 2.0, 3.0, 1.0, 3.0, 2.0]);
        let peaks = detect_peaks(&s, "Cases/day", 2).unwrap();
        let mut dates: Vec<_> = peaks.iter().map(|p| p.date).collect();
        let before = dates.len();
        dates.dedup();
        assert_eq!(dates.len(), before);
    }
}
