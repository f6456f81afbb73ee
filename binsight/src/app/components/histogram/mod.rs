mod logic;
mod ui;

pub use logic::{bin_edges, histogram_counts, scale_counts, snap_to_bins};
pub use ui::subset_color;

use serde::{Deserialize, Serialize};

use crate::data::{DataCollection, EditSubsetMode, PolygonRoi};

/// The histogram viewer: display state, cached bin edges and the
/// selection machinery.
pub struct Histogram {
    pub state: ViewerState,
    pub mode: HistogramMode,
    pub edit_mode: EditSubsetMode,
    /// Raw drag selection in plot coordinates, before snapping.
    current_selection: Option<PolygonRoi>,
    selection_active: bool,
    current_plot_bounds: [f64; 4],
    request_plot_bounds: Option<[f64; 4]>,
    /// Bin edges for the configuration in `last_bin_config`. Recomputed
    /// whenever the binning configuration changes.
    edges: Vec<f64>,
    last_bin_config: Option<BinConfig>,
}

/// Display state of the viewer, the part that goes into session storage.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ViewerState {
    pub x_att: Option<String>,
    pub hist_x_min: f64,
    pub hist_x_max: f64,
    pub hist_n_bin: usize,
    pub log_x: bool,
    pub log_y: bool,
    pub cumulative: bool,
    pub normalize: bool,
}

#[derive(Clone, PartialEq)]
struct BinConfig {
    x_min: f64,
    x_max: f64,
    n: usize,
    log: bool,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum HistogramMode {
    Display,
    Select,
}

impl HistogramMode {
    pub fn next(&self) -> Self {
        match self {
            HistogramMode::Display => HistogramMode::Select,
            HistogramMode::Select => HistogramMode::Display,
        }
    }
}

impl Histogram {
    pub fn new(default_n_bin: usize) -> Self {
        Self {
            state: ViewerState {
                x_att: None,
                hist_x_min: 0.0,
                hist_x_max: 1.0,
                hist_n_bin: default_n_bin,
                log_x: false,
                log_y: false,
                cumulative: false,
                normalize: false,
            },
            mode: HistogramMode::Display,
            edit_mode: EditSubsetMode::default(),
            current_selection: None,
            selection_active: false,
            current_plot_bounds: [0.0, 1.0, 0.0, 1.0],
            request_plot_bounds: None,
            edges: Vec::new(),
            last_bin_config: None,
        }
    }

    /// Select the attribute to histogram and reset the bin limits to the
    /// limits of the data.
    pub fn set_x_attribute(&mut self, attribute: &str, data: &DataCollection) {
        self.state.x_att = Some(attribute.to_string());
        let mut limits: Option<(f64, f64)> = None;
        for (_, dataset) in data.iter() {
            let Some(dataset_limits) = dataset
                .get_table()
                .and_then(|table| table.column_limits(attribute))
            else {
                continue;
            };
            limits = Some(match limits {
                Some((lo, hi)) => (lo.min(dataset_limits.0), hi.max(dataset_limits.1)),
                None => dataset_limits,
            });
        }
        if let Some((lo, hi)) = limits {
            self.state.hist_x_min = lo;
            self.state.hist_x_max = hi;
        }
        self.current_selection = None;
    }

    /// Recompute the bin edges if the binning configuration changed since
    /// the last frame.
    pub fn update_edges(&mut self) {
        let config = BinConfig {
            x_min: self.state.hist_x_min,
            x_max: self.state.hist_x_max,
            n: self.state.hist_n_bin,
            log: self.state.log_x,
        };
        if self.last_bin_config.as_ref() != Some(&config) {
            self.edges = bin_edges(config.x_min, config.x_max, config.n, config.log);
            log::debug!("recomputed {} bin edges", self.edges.len());
            self.last_bin_config = Some(config);
        }
    }

    pub fn edges(&self) -> &[f64] {
        &self.edges
    }

    pub fn clear_selection(&mut self) {
        self.current_selection = None;
        self.selection_active = false;
    }

    pub fn apply_bounds(&mut self, bounds: [f64; 4]) {
        self.request_plot_bounds = Some(bounds);
    }

    pub fn get_current_plot_bounds(&self) -> [f64; 4] {
        self.current_plot_bounds
    }

    /// Restore display state from session storage.
    pub fn restore(&mut self, state: ViewerState) {
        self.state = state;
        self.last_bin_config = None;
        self.clear_selection();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edges_are_cached_until_the_config_changes() {
        let mut histogram = Histogram::new(5);
        histogram.state.hist_x_min = 0.0;
        histogram.state.hist_x_max = 5.0;
        histogram.update_edges();
        assert_eq!(histogram.edges(), &[0.0, 1.0, 2.0, 3.0, 4.0, 5.0]);

        // Unrelated state changes do not touch the edges.
        histogram.state.cumulative = true;
        histogram.update_edges();
        assert_eq!(histogram.edges().len(), 6);

        histogram.state.hist_n_bin = 10;
        histogram.update_edges();
        assert_eq!(histogram.edges().len(), 11);
    }
}
