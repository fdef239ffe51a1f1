use std::cmp::Ordering;
use std::collections::HashMap;

use crate::feed::record::TrackRecord;

/// Distance-ordered view over the live set that avoids re-sorting on
/// noise-level jitter.
///
/// A re-sort happens only when the set of identities changes or some shared
/// contact moved by more than the hysteresis threshold since the last sweep.
/// Otherwise the previously computed order is reused unchanged, even though
/// individual distances may have drifted by up to the threshold.
pub struct OrderedView {
    threshold_nm: f64,
    previous: HashMap<String, f64>,
    ranked: Vec<TrackRecord>,
}

impl OrderedView {
    pub fn new(threshold_nm: f64) -> Self {
        Self {
            threshold_nm,
            previous: HashMap::new(),
            ranked: Vec::new(),
        }
    }

    /// Absorbs the latest live set, deciding whether the order must be
    /// recomputed.
    pub fn update(&mut self, records: &[TrackRecord]) {
        let mut resort = records.len() != self.previous.len();
        if !resort {
            for record in records {
                match self.previous.get(&record.hex) {
                    Some(prev_distance)
                        if (record.distance_nm - prev_distance).abs() <= self.threshold_nm => {}
                    _ => {
                        resort = true;
                        break;
                    }
                }
            }
        }

        self.previous = records
            .iter()
            .map(|record| (record.hex.clone(), record.distance_nm))
            .collect();

        if resort {
            let mut ranked = records.to_vec();
            ranked.sort_by(|a, b| {
                a.distance_nm
                    .partial_cmp(&b.distance_nm)
                    .unwrap_or(Ordering::Equal)
                    .then_with(|| a.hex.cmp(&b.hex))
            });
            self.ranked = ranked;
        }
    }

    /// Nearest-first prefix of the current order; `None` returns everything.
    /// Never mutates state.
    pub fn ranked(&self, max: Option<usize>) -> &[TrackRecord] {
        match max {
            Some(count) => &self.ranked[..count.min(self.ranked.len())],
            None => &self.ranked,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(hex: &str, distance_nm: f64) -> TrackRecord {
        TrackRecord {
            hex: hex.to_string(),
            callsign: hex.to_uppercase(),
            lat: 0.0,
            lon: 0.0,
            altitude_ft: 30000,
            ground_speed_kt: 400,
            track_deg: 90.0,
            distance_nm,
            bearing_deg: 45.0,
            military: false,
        }
    }

    fn hexes(view: &OrderedView, max: Option<usize>) -> Vec<String> {
        view.ranked(max).iter().map(|r| r.hex.clone()).collect()
    }

    #[test]
    fn first_update_sorts_by_distance() {
        let mut view = OrderedView::new(0.5);
        view.update(&[record("ccc", 30.0), record("aaa", 10.0), record("bbb", 20.0)]);
        assert_eq!(hexes(&view, None), ["aaa", "bbb", "ccc"]);
    }

    #[test]
    fn small_distance_shift_keeps_previous_order() {
        let mut view = OrderedView::new(0.5);
        view.update(&[record("aaa", 10.0), record("bbb", 10.2)]);

        // aaa drifts past bbb, but only by 0.3 NM: no re-sort.
        view.update(&[record("aaa", 10.3), record("bbb", 10.2)]);
        assert_eq!(hexes(&view, None), ["aaa", "bbb"]);
    }

    #[test]
    fn large_distance_shift_triggers_resort() {
        let mut view = OrderedView::new(0.5);
        view.update(&[record("aaa", 10.0), record("bbb", 10.2)]);

        view.update(&[record("aaa", 10.6), record("bbb", 10.2)]);
        assert_eq!(hexes(&view, None), ["bbb", "aaa"]);
    }

    #[test]
    fn membership_change_always_resorts() {
        let mut view = OrderedView::new(0.5);
        view.update(&[record("aaa", 10.0), record("bbb", 20.0)]);

        view.update(&[record("aaa", 10.0), record("bbb", 20.0), record("ccc", 5.0)]);
        assert_eq!(hexes(&view, None), ["ccc", "aaa", "bbb"]);

        view.update(&[record("aaa", 10.0), record("bbb", 20.0)]);
        assert_eq!(hexes(&view, None), ["aaa", "bbb"]);
    }

    #[test]
    fn replaced_identity_resorts_even_at_same_distance() {
        let mut view = OrderedView::new(0.5);
        view.update(&[record("aaa", 10.0), record("bbb", 20.0)]);

        view.update(&[record("aaa", 10.0), record("ddd", 20.0)]);
        assert_eq!(hexes(&view, None), ["aaa", "ddd"]);
    }

    #[test]
    fn equal_distances_break_ties_by_identity() {
        let mut view = OrderedView::new(0.5);
        view.update(&[record("bbb", 10.0), record("aaa", 10.0), record("ccc", 10.0)]);
        assert_eq!(hexes(&view, None), ["aaa", "bbb", "ccc"]);
    }

    #[test]
    fn ranked_slice_caps_at_max_count() {
        let mut view = OrderedView::new(0.5);
        view.update(&[record("aaa", 10.0), record("bbb", 20.0), record("ccc", 30.0)]);

        assert_eq!(hexes(&view, Some(2)), ["aaa", "bbb"]);
        assert_eq!(hexes(&view, Some(10)), ["aaa", "bbb", "ccc"]);
        assert_eq!(view.ranked(Some(0)).len(), 0);
    }

    #[test]
    fn hysteresis_is_relative_to_last_seen_distance() {
        let mut view = OrderedView::new(0.5);
        view.update(&[record("aaa", 10.0), record("bbb", 20.0)]);

        // Three drifts of 0.4 NM each: individually below threshold, so the
        // order never recomputes even though the total exceeds it.
        view.update(&[record("aaa", 10.4), record("bbb", 20.0)]);
        view.update(&[record("aaa", 10.8), record("bbb", 20.0)]);
        view.update(&[record("aaa", 11.2), record("bbb", 20.0)]);
        assert_eq!(view.ranked(None)[0].distance_nm, 10.0);
    }
}
