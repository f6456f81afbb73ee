mod roi;
mod subset;

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use viewer_core::{
    backend::{BackendEventLoop, BackendLink, LinkReceiver},
    frontend::UIParameter,
    BACKEND_HUNG_UP_MSG,
};

use crate::{backend_state::DataTable, BackendAppState, DynRequestSender};

pub use roi::{PolygonRoi, RangeRoi};
pub use subset::{CombineMode, EditSubsetMode, Subset, SubsetState};

#[derive(
    Clone, Copy, Debug, Default, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize,
)]
pub struct DatasetId(usize);

impl From<DatasetId> for i32 {
    fn from(val: DatasetId) -> Self {
        val.0 as i32
    }
}

impl DatasetId {
    pub(crate) fn next(self) -> Self {
        DatasetId(self.0 + 1)
    }
}

/// A dataset loaded from a file. The table resolves asynchronously once
/// the backend thread finished parsing.
#[derive(Debug)]
pub struct Dataset {
    pub table: UIParameter<Result<DataTable, String>>,
    pub path: PathBuf,
    pub properties: DatasetProperties,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DatasetProperties {
    pub label: String,
    pub visible: bool,
}

/// All datasets and subsets of the current session, plus the index of the
/// subset that selections currently edit.
#[derive(Debug, Default)]
pub struct DataCollection {
    pub registry: HashMap<DatasetId, Dataset>,
    pub order: Vec<DatasetId>,
    pub subsets: Vec<Subset>,
    edit_subset: Option<usize>,
    next_id: DatasetId,
}

impl Dataset {
    pub fn new(path: PathBuf, properties: DatasetProperties, request_tx: &mut DynRequestSender) -> Self {
        let mut table = UIParameter::new(Err("Data not loaded".to_string()));
        table.set_recv(parse_table(&path, request_tx));
        Dataset {
            table,
            path,
            properties,
        }
    }

    pub fn file_name(&self) -> &str {
        self.path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("unreadable filename")
    }

    /// Display label: the alias if set, the file name otherwise.
    pub fn label(&self) -> &str {
        if self.properties.label.is_empty() {
            self.file_name()
        } else {
            &self.properties.label
        }
    }

    pub fn get_table(&self) -> Option<&DataTable> {
        self.table.value().as_ref().ok()
    }

    pub fn has_attribute(&self, attribute: &str) -> bool {
        self.get_table()
            .is_some_and(|table| table.column(attribute).is_some())
    }
}

impl Default for DatasetProperties {
    fn default() -> Self {
        Self {
            label: String::new(),
            visible: true,
        }
    }
}

impl DataCollection {
    pub fn from_parts(
        registry: HashMap<DatasetId, Dataset>,
        order: Vec<DatasetId>,
        subsets: Vec<Subset>,
        edit_subset: Option<usize>,
        next_id: DatasetId,
    ) -> Self {
        let mut collection = Self {
            registry,
            order,
            subsets,
            edit_subset: None,
            next_id,
        };
        collection.set_edit_subset(edit_subset);
        collection
    }

    pub fn add_dataset(&mut self, path: &Path, request_tx: &mut DynRequestSender) -> DatasetId {
        let id = self.next_id;
        self.next_id = self.next_id.next();
        let dataset = Dataset::new(path.to_path_buf(), DatasetProperties::default(), request_tx);
        log::debug!("adding dataset {:?} with id {:?}", dataset.file_name(), id);
        self.registry.insert(id, dataset);
        self.order.push(id);
        id
    }

    pub fn remove_dataset(&mut self, id: DatasetId) {
        self.registry.remove(&id);
        self.order.retain(|other| *other != id);
        for subset in self.subsets.iter_mut() {
            if subset.focus == Some(id) {
                subset.focus = None;
            }
        }
    }

    /// Datasets in display order.
    pub fn iter(&self) -> impl Iterator<Item = (DatasetId, &Dataset)> {
        self.order
            .iter()
            .filter_map(|id| self.registry.get(id).map(|dataset| (*id, dataset)))
    }

    pub fn get_mut(&mut self, id: DatasetId) -> Option<&mut Dataset> {
        self.registry.get_mut(&id)
    }

    pub fn current_id(&self) -> DatasetId {
        self.next_id
    }

    /// Union of column names over all loaded datasets, in first-seen order.
    pub fn attributes(&self) -> Vec<String> {
        let mut attributes = Vec::new();
        for (_, dataset) in self.iter() {
            if let Some(table) = dataset.get_table() {
                for name in table.column_names() {
                    if !attributes.contains(name) {
                        attributes.push(name.clone());
                    }
                }
            }
        }
        attributes
    }

    pub fn edit_subset(&self) -> Option<usize> {
        self.edit_subset
    }

    /// The index is clamped to the subset list; out-of-range values clear
    /// the selection.
    pub fn set_edit_subset(&mut self, index: Option<usize>) {
        self.edit_subset = index.filter(|i| *i < self.subsets.len());
    }

    pub fn remove_subset(&mut self, index: usize) {
        if index >= self.subsets.len() {
            return;
        }
        self.subsets.remove(index);
        self.edit_subset = match self.edit_subset {
            Some(i) if i == index => None,
            Some(i) if i > index => Some(i - 1),
            other => other,
        };
    }

    /// Poll all pending table updates. Returns true if anything changed.
    pub fn try_update(&mut self) -> bool {
        let mut updated = false;
        for dataset in self.registry.values_mut() {
            updated |= dataset.table.try_update();
        }
        updated
    }
}

pub fn parse_table(
    path: &Path,
    request_tx: &mut DynRequestSender,
) -> LinkReceiver<Result<DataTable, String>> {
    let path = path.to_owned();
    let (rx, linker) = BackendLink::new(
        &format!("load table data from file {:?}", path),
        move |b: &mut BackendEventLoop<BackendAppState>| {
            b.state.parse_table(&path).map_err(|err| {
                log::error!("{}", err);
                err
            })
        },
    );
    request_tx
        .send(Box::new(linker))
        .expect(BACKEND_HUNG_UP_MSG);
    rx
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collection_with_subsets(n: usize) -> DataCollection {
        let mut collection = DataCollection::default();
        for i in 0..n {
            collection.subsets.push(Subset::new(
                format!("S{}", i + 1),
                SubsetState::range("x", 0.0, 1.0),
                None,
            ));
        }
        collection
    }

    #[test]
    fn edit_subset_index_is_kept_valid() {
        let mut collection = collection_with_subsets(2);
        collection.set_edit_subset(Some(5));
        assert_eq!(collection.edit_subset(), None);
        collection.set_edit_subset(Some(1));
        assert_eq!(collection.edit_subset(), Some(1));
    }

    #[test]
    fn removing_a_subset_shifts_the_edit_index() {
        let mut collection = collection_with_subsets(3);
        collection.set_edit_subset(Some(2));
        collection.remove_subset(0);
        assert_eq!(collection.edit_subset(), Some(1));
        collection.remove_subset(1);
        assert_eq!(collection.edit_subset(), None);
    }
}
