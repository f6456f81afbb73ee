mod data_panel;
mod histogram;

pub use data_panel::DataPanel;
pub use histogram::{Histogram, HistogramMode, ViewerState};
