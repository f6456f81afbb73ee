use crate::data::{DataCollection, DatasetId, PolygonRoi, SubsetState};

/// Compute `n + 1` bin edges over `[x_min, x_max]`, equally spaced either
/// linearly or in log10 space.
///
/// Degenerate configurations (zero bins, reversed/equal/non-finite limits,
/// non-positive limits for log binning) yield an empty vector, which the
/// rest of the viewer treats as "nothing to draw, nothing to snap".
pub fn bin_edges(x_min: f64, x_max: f64, n: usize, log: bool) -> Vec<f64> {
    if n == 0 || !x_min.is_finite() || !x_max.is_finite() || x_min >= x_max {
        return Vec::new();
    }
    if log && x_min <= 0.0 {
        return Vec::new();
    }

    let edges: Vec<f64> = if log {
        let (lo, hi) = (x_min.log10(), x_max.log10());
        let dx = (hi - lo) / n as f64;
        (0..=n).map(|i| 10f64.powf(lo + i as f64 * dx)).collect()
    } else {
        let dx = (x_max - x_min) / n as f64;
        (0..=n).map(|i| x_min + i as f64 * dx).collect()
    };

    // Rounding can collapse neighbouring edges for extreme inputs; the
    // edge vector must be strictly increasing or empty.
    if edges.windows(2).any(|pair| pair[0] >= pair[1]) {
        return Vec::new();
    }
    edges
}

/// Expand a raw selection interval outward to the nearest enclosing bin
/// edges, so the selection covers only whole bins.
///
/// An endpoint that already lies outside the edge range is passed through
/// unchanged, as is the whole interval if there are no edges at all.
pub fn snap_to_bins(lo: f64, hi: f64, edges: &[f64]) -> (f64, f64) {
    let (Some(first), Some(last)) = (edges.first(), edges.last()) else {
        return (lo, hi);
    };

    let mut lo_snapped = lo;
    let mut hi_snapped = hi;
    if lo >= *first {
        if let Some(edge) = edges.iter().rev().find(|edge| **edge <= lo) {
            lo_snapped = *edge;
        }
    }
    if hi <= *last {
        if let Some(edge) = edges.iter().find(|edge| **edge >= hi) {
            hi_snapped = *edge;
        }
    }
    (lo_snapped, hi_snapped)
}

/// Count values per bin. The rightmost bin is closed on both sides, so a
/// value equal to the last edge still lands in it. NaN values and rows
/// rejected by the filter are skipped.
pub fn histogram_counts(
    values: &[f64],
    edges: &[f64],
    mut filter: impl FnMut(usize) -> bool,
) -> Vec<f64> {
    let n_bins = edges.len().saturating_sub(1);
    let mut counts = vec![0.0; n_bins];
    if n_bins == 0 {
        return counts;
    }

    for (row, value) in values.iter().enumerate() {
        if value.is_nan() || !filter(row) {
            continue;
        }
        if *value < edges[0] || *value > edges[n_bins] {
            continue;
        }
        let index = if *value == edges[n_bins] {
            n_bins - 1
        } else {
            edges.partition_point(|edge| edge <= value) - 1
        };
        counts[index] += 1.0;
    }
    counts
}

/// Apply cumulative/density scaling to raw counts, in place.
pub fn scale_counts(counts: &mut [f64], edges: &[f64], cumulative: bool, normalize: bool) {
    if counts.is_empty() {
        return;
    }

    if cumulative {
        let mut running = 0.0;
        for count in counts.iter_mut() {
            running += *count;
            *count = running;
        }
        let total = *counts.last().unwrap_or(&0.0);
        if normalize && total > 0.0 {
            for count in counts.iter_mut() {
                *count /= total;
            }
        }
    } else if normalize {
        let total: f64 = counts.iter().sum();
        if total > 0.0 {
            for (index, count) in counts.iter_mut().enumerate() {
                let width = edges[index + 1] - edges[index];
                *count /= total * width;
            }
        }
    }
}

impl super::Histogram {
    /// Snap the current raw selection to the bin edges and combine the
    /// resulting range condition into the editable subset, refocused onto
    /// the dataset the user interacted with.
    ///
    /// Runs synchronously on the UI thread when the drag gesture ends.
    pub(super) fn apply_selection(&mut self, data: &mut DataCollection, roi: &PolygonRoi) {
        let Some((lo, hi)) = roi.x_extent() else {
            return;
        };
        let Some(attribute) = self.state.x_att.clone() else {
            log::debug!("selection ignored, no x attribute chosen");
            return;
        };

        let (lo, hi) = snap_to_bins(lo, hi, self.edges());

        // Refocus onto the dataset the user interacted with: the topmost
        // visible dataset that carries the selected attribute.
        let focus: Option<DatasetId> = data
            .iter()
            .filter(|(_, dataset)| dataset.properties.visible)
            .find(|(_, dataset)| dataset.has_attribute(&attribute))
            .map(|(id, _)| id);
        let Some(focus) = focus else {
            log::debug!("selection ignored, no visible dataset has '{}'", attribute);
            return;
        };

        let new_state = SubsetState::range(&attribute, lo, hi);
        log::debug!("applying selection: {}", new_state.describe());
        self.edit_mode.apply(data, new_state, focus);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EDGES: [f64; 6] = [0.0, 1.0, 2.0, 3.0, 4.0, 5.0];

    #[test]
    fn snapping_expands_to_enclosing_edges() {
        assert_eq!(snap_to_bins(1.3, 3.7, &EDGES), (1.0, 4.0));
    }

    #[test]
    fn snapping_passes_endpoints_outside_the_edge_range_through() {
        // lo below the leftmost edge stays put, hi still snaps.
        assert_eq!(snap_to_bins(-1.0, 2.2, &EDGES), (-1.0, 3.0));
        // Symmetric for hi above the rightmost edge.
        assert_eq!(snap_to_bins(2.2, 7.5, &EDGES), (2.0, 7.5));
        // Both outside: nothing changes.
        assert_eq!(snap_to_bins(-3.0, 8.0, &EDGES), (-3.0, 8.0));
    }

    #[test]
    fn snapping_is_idempotent() {
        let (lo, hi) = snap_to_bins(1.3, 3.7, &EDGES);
        assert_eq!(snap_to_bins(lo, hi, &EDGES), (lo, hi));
        // A zero-width selection on an edge is preserved.
        assert_eq!(snap_to_bins(2.0, 2.0, &EDGES), (2.0, 2.0));
    }

    #[test]
    fn snapping_never_shrinks_the_selection() {
        let mut x = 0.05f64;
        while x < 5.0 {
            let (lo, hi) = (x, (x + 1.3).min(5.0));
            let (lo_s, hi_s) = snap_to_bins(lo, hi, &EDGES);
            assert!(lo_s <= lo && hi_s >= hi && lo_s <= hi_s);
            // Interior endpoints must land on edges.
            assert!(EDGES.contains(&lo_s));
            assert!(EDGES.contains(&hi_s));
            x += 0.17;
        }
    }

    #[test]
    fn snapping_without_edges_is_a_no_op() {
        assert_eq!(snap_to_bins(1.3, 3.7, &[]), (1.3, 3.7));
        // A single edge can still catch an endpoint on either side.
        assert_eq!(snap_to_bins(2.5, 3.7, &[2.0]), (2.0, 3.7));
        assert_eq!(snap_to_bins(1.3, 1.7, &[2.0]), (1.3, 2.0));
    }

    #[test]
    fn linear_edges_are_evenly_spaced() {
        let edges = bin_edges(0.0, 5.0, 5, false);
        assert_eq!(edges, vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0]);
    }

    #[test]
    fn log_edges_are_even_in_log_space() {
        let edges = bin_edges(1.0, 1000.0, 3, true);
        assert_eq!(edges.len(), 4);
        for (edge, expected) in edges.iter().zip([1.0, 10.0, 100.0, 1000.0]) {
            assert!((edge - expected).abs() < 1e-9 * expected);
        }
    }

    #[test]
    fn degenerate_binning_configs_yield_no_edges() {
        assert!(bin_edges(1.0, 1.0, 10, false).is_empty());
        assert!(bin_edges(2.0, 1.0, 10, false).is_empty());
        assert!(bin_edges(0.0, 1.0, 0, false).is_empty());
        assert!(bin_edges(f64::NAN, 1.0, 10, false).is_empty());
        // Log binning needs positive limits.
        assert!(bin_edges(-1.0, 10.0, 10, true).is_empty());
        assert!(bin_edges(0.0, 10.0, 10, true).is_empty());
    }

    #[test]
    fn counts_fill_bins_with_closed_right_edge() {
        let values = [0.5, 1.5, 1.7, 5.0, 5.1, -0.1, f64::NAN];
        let counts = histogram_counts(&values, &EDGES, |_| true);
        // 5.0 lands in the last bin, 5.1 and -0.1 are out of range.
        assert_eq!(counts, vec![1.0, 2.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn counts_respect_the_row_filter() {
        let values = [0.5, 1.5, 2.5, 3.5];
        let counts = histogram_counts(&values, &EDGES, |row| row % 2 == 0);
        assert_eq!(counts, vec![1.0, 0.0, 1.0, 0.0, 0.0]);
    }

    #[test]
    fn cumulative_and_normalized_scaling() {
        let edges = [0.0, 1.0, 2.0, 3.0, 4.0];
        let mut counts = vec![1.0, 3.0, 0.0, 4.0];
        scale_counts(&mut counts, &edges, true, false);
        assert_eq!(counts, vec![1.0, 4.0, 4.0, 8.0]);

        let mut counts = vec![1.0, 3.0, 0.0, 4.0];
        scale_counts(&mut counts, &edges, true, true);
        assert_eq!(counts, vec![0.125, 0.5, 0.5, 1.0]);

        // Density normalization: sums to one when weighted by bin width.
        let mut counts = vec![1.0, 3.0, 0.0, 4.0];
        scale_counts(&mut counts, &edges, false, true);
        let integral: f64 = counts
            .iter()
            .enumerate()
            .map(|(i, c)| c * (edges[i + 1] - edges[i]))
            .sum();
        assert!((integral - 1.0).abs() < 1e-12);
    }
}
