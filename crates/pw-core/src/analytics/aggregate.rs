//! Descriptive statistics over a selection

use std::fmt;

use crate::record::{FieldId, RecordIdx, RecordSet, RecordStore};

/// Summary of one numeric field over a non-empty set of values
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AggregateSnapshot {
    /// Values that took part (NaN excluded)
    pub count: usize,
    pub mean: f64,
    pub min: f64,
    pub max: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub whisker_low: f64,
    pub whisker_high: f64,
    /// First record, in store order, holding `min`
    pub argmin: RecordIdx,
}

impl AggregateSnapshot {
    pub fn iqr(&self) -> f64 {
        self.q3 - self.q1
    }

    /// Outside the Tukey whiskers
    pub fn is_outlier(&self, value: f64) -> bool {
        value < self.whisker_low || value > self.whisker_high
    }
}

/// Result of [`summarize`]
///
/// `NoData` is a first-class absence: an empty input has no mean, and it
/// must never be shown as zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Aggregate {
    NoData,
    Snapshot(AggregateSnapshot),
}

impl Aggregate {
    pub fn snapshot(&self) -> Option<&AggregateSnapshot> {
        match self {
            Aggregate::NoData => None,
            Aggregate::Snapshot(snapshot) => Some(snapshot),
        }
    }

    pub fn mean(&self) -> Option<f64> {
        self.snapshot().map(|s| s.mean)
    }

    pub fn count(&self) -> usize {
        self.snapshot().map_or(0, |s| s.count)
    }

    pub fn is_no_data(&self) -> bool {
        matches!(self, Aggregate::NoData)
    }
}

impl fmt::Display for Aggregate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Aggregate::NoData => f.write_str("no data"),
            Aggregate::Snapshot(s) => write!(f, "{:.3}", s.mean),
        }
    }
}

/// Summarize `field` over `records`, skipping NaN values
pub fn summarize(store: &RecordStore, records: &RecordSet, field: FieldId) -> Aggregate {
    let mut values = Vec::with_capacity(records.len());
    let mut sum = 0.0;
    let mut lowest: Option<(RecordIdx, f64)> = None;

    for record in store.resolve(records) {
        let value = record.value(field);
        if value.is_nan() {
            continue;
        }
        sum += value;
        // Strictly lower only, so ties keep the earliest record
        match lowest {
            Some((_, current)) if value >= current => {}
            _ => lowest = Some((record.index(), value)),
        }
        values.push(value);
    }

    let Some((argmin, min)) = lowest else {
        return Aggregate::NoData;
    };

    values.sort_by(f64::total_cmp);
    let count = values.len();
    let max = values[count - 1];
    let q1 = quantile_sorted(&values, 0.25).unwrap_or(min);
    let median = quantile_sorted(&values, 0.5).unwrap_or(min);
    let q3 = quantile_sorted(&values, 0.75).unwrap_or(max);
    let iqr = q3 - q1;

    Aggregate::Snapshot(AggregateSnapshot {
        count,
        mean: sum / count as f64,
        min,
        max,
        q1,
        median,
        q3,
        whisker_low: min.max(q1 - 1.5 * iqr),
        whisker_high: max.min(q3 + 1.5 * iqr),
        argmin,
    })
}

/// Quantile of ascending `sorted` values with linear interpolation at `(n-1)·p`
pub fn quantile_sorted(sorted: &[f64], p: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }

    let idx = (sorted.len() - 1) as f64 * p.clamp(0.0, 1.0);
    let lower = idx.floor() as usize;
    let upper = idx.ceil() as usize;

    if lower == upper || upper >= sorted.len() {
        Some(sorted[lower])
    } else {
        let fraction = idx - lower as f64;
        Some(sorted[lower] * (1.0 - fraction) + sorted[upper] * fraction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{Record, TagId};

    fn store_of(times: &[f64]) -> RecordStore {
        RecordStore::from_records(
            times
                .iter()
                .map(|&t| Record::empty().with_value(FieldId::LapTime, t))
                .collect(),
        )
    }

    #[test]
    fn test_five_value_summary() {
        let store = store_of(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        let snapshot = *summarize(&store, &store.all(), FieldId::LapTime)
            .snapshot()
            .unwrap();
        assert_eq!(snapshot.count, 5);
        assert_eq!(snapshot.mean, 3.0);
        assert_eq!(snapshot.q1, 2.0);
        assert_eq!(snapshot.median, 3.0);
        assert_eq!(snapshot.q3, 4.0);
        assert_eq!(snapshot.whisker_low, 1.0);
        assert_eq!(snapshot.whisker_high, 5.0);
        assert_eq!(snapshot.min, 1.0);
        assert_eq!(snapshot.max, 5.0);
    }

    #[test]
    fn test_unsorted_input_interpolates() {
        let store = store_of(&[4.0, 1.0, 3.0, 2.0]);
        let snapshot = *summarize(&store, &store.all(), FieldId::LapTime)
            .snapshot()
            .unwrap();
        assert!((snapshot.q1 - 1.75).abs() < 1e-12);
        assert!((snapshot.median - 2.5).abs() < 1e-12);
        assert!((snapshot.q3 - 3.25).abs() < 1e-12);
    }

    #[test]
    fn test_whiskers_clip_to_fences() {
        let store = store_of(&[10.0, 11.0, 12.0, 13.0, 100.0]);
        let snapshot = *summarize(&store, &store.all(), FieldId::LapTime)
            .snapshot()
            .unwrap();
        // q1 = 11, q3 = 13, fence at 16
        assert_eq!(snapshot.whisker_high, 16.0);
        assert_eq!(snapshot.whisker_low, 10.0);
        assert!(snapshot.is_outlier(100.0));
        assert!(!snapshot.is_outlier(12.0));
    }

    #[test]
    fn test_argmin_keeps_first_occurrence() {
        let store = RecordStore::from_records(vec![
            Record::empty().with_value(FieldId::LapTime, 5.0).with_tag(TagId::Driver, "A"),
            Record::empty().with_value(FieldId::LapTime, 3.0).with_tag(TagId::Driver, "B"),
            Record::empty().with_value(FieldId::LapTime, 3.0).with_tag(TagId::Driver, "C"),
        ]);
        let snapshot = *summarize(&store, &store.all(), FieldId::LapTime)
            .snapshot()
            .unwrap();
        assert_eq!(snapshot.argmin, RecordIdx(1));
        assert_eq!(store.get(snapshot.argmin).unwrap().tag(TagId::Driver), "B");
    }

    #[test]
    fn test_empty_input_is_no_data() {
        let store = store_of(&[1.0, 2.0]);
        let aggregate = summarize(&store, &RecordSet::new(), FieldId::LapTime);
        assert_eq!(aggregate, Aggregate::NoData);
        assert_eq!(aggregate.mean(), None);
        assert_eq!(aggregate.to_string(), "no data");
    }

    #[test]
    fn test_nan_values_excluded() {
        let store = store_of(&[f64::NAN, 2.0, f64::NAN, 4.0]);
        let aggregate = summarize(&store, &store.all(), FieldId::LapTime);
        assert_eq!(aggregate.count(), 2);
        assert_eq!(aggregate.mean(), Some(3.0));
        assert_eq!(aggregate.snapshot().unwrap().argmin, RecordIdx(1));

        let all_nan = store_of(&[f64::NAN, f64::NAN]);
        assert!(summarize(&all_nan, &all_nan.all(), FieldId::LapTime).is_no_data());
    }

    #[test]
    fn test_single_value() {
        let store = store_of(&[7.5]);
        let snapshot = *summarize(&store, &store.all(), FieldId::LapTime)
            .snapshot()
            .unwrap();
        assert_eq!(snapshot.q1, 7.5);
        assert_eq!(snapshot.q3, 7.5);
        assert_eq!(snapshot.whisker_low, 7.5);
        assert_eq!(snapshot.whisker_high, 7.5);
    }

    #[test]
    fn test_quantile_bounds() {
        assert_eq!(quantile_sorted(&[], 0.5), None);
        assert_eq!(quantile_sorted(&[1.0, 9.0], 0.0), Some(1.0));
        assert_eq!(quantile_sorted(&[1.0, 9.0], 1.0), Some(9.0));
        assert_eq!(quantile_sorted(&[1.0, 9.0], 0.5), Some(5.0));
    }
}
