mod table;

use std::path::{Path, PathBuf};

pub use table::DataTable;
use viewer_core::backend::BackendState;

/// State owned by the backend worker thread. File parsing happens here so
/// the UI thread never blocks on I/O.
pub struct BackendAppState {
    data_dir: PathBuf,
}

impl BackendState for BackendAppState {}

impl BackendAppState {
    pub fn new(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }

    pub fn set_data_dir(&mut self, path: &Path) {
        self.data_dir = path.to_path_buf();
    }

    /// Parse a delimited text file into a [`DataTable`]. Relative paths are
    /// resolved against the configured data directory.
    pub fn parse_table(&self, path: &Path) -> Result<DataTable, String> {
        let path = if path.is_relative() {
            self.data_dir.join(path)
        } else {
            path.to_path_buf()
        };
        DataTable::from_path(&path)
    }
}
