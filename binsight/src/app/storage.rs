use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use viewer_core::storage::Storage;

use crate::{
    data::{DataCollection, Dataset, DatasetId, DatasetProperties, Subset},
    DynRequestSender, ViewerApp,
};

use super::components::ViewerState;

#[derive(Clone, Serialize, Deserialize)]
struct BackendStorage {
    data_dir: PathBuf,
}

#[derive(Serialize, Deserialize)]
struct FrontendStorage {
    datasets: HashMap<DatasetId, DatasetStorage>,
    order: Vec<DatasetId>,
    subsets: Vec<Subset>,
    edit_subset: Option<usize>,
    next_id: DatasetId,
    viewer_state: ViewerState,
    plot_bounds: Option<[f64; 4]>,
}

// Serializing a dataset only stores where it came from and how it is
// displayed; the table itself is re-parsed on load.
#[derive(Serialize, Deserialize)]
struct DatasetStorage {
    path: PathBuf,
    properties: DatasetProperties,
}

pub fn save_json(app: &ViewerApp, path: Option<&Path>) -> Result<(), String> {
    let backend_storage = BackendStorage {
        data_dir: app.config.data_dir.clone(),
    };

    let frontend_storage = FrontendStorage {
        datasets: app
            .data
            .registry
            .iter()
            .map(|(id, dataset)| {
                (
                    *id,
                    DatasetStorage {
                        path: dataset.path.clone(),
                        properties: dataset.properties.clone(),
                    },
                )
            })
            .collect(),
        order: app.data.order.clone(),
        subsets: app.data.subsets.clone(),
        edit_subset: app.data.edit_subset(),
        next_id: app.data.current_id(),
        viewer_state: app.histogram.state.clone(),
        plot_bounds: Some(app.histogram.get_current_plot_bounds()),
    };
    let storage = Storage::new(backend_storage, frontend_storage);
    storage.save_json(path)
}

pub fn load_json(app: &mut ViewerApp, path: Option<&Path>) -> Result<(), String> {
    let Storage::<BackendStorage, FrontendStorage> {
        backend_storage,
        frontend_storage,
    } = Storage::load_json(path)?;

    app.set_data_dir(backend_storage.data_dir);
    if let Some(bounds) = frontend_storage.plot_bounds {
        app.histogram.apply_bounds(bounds);
    }
    app.histogram.restore(frontend_storage.viewer_state.clone());
    app.data = frontend_storage.into_data_collection(&mut app.request_tx);
    app.request_redraw();
    Ok(())
}

impl FrontendStorage {
    fn into_data_collection(self, request_tx: &mut DynRequestSender) -> DataCollection {
        let registry = self
            .datasets
            .into_iter()
            .map(|(id, dataset_storage)| {
                (
                    id,
                    Dataset::new(dataset_storage.path, dataset_storage.properties, request_tx),
                )
            })
            .collect();

        DataCollection::from_parts(
            registry,
            self.order,
            self.subsets,
            self.edit_subset,
            self.next_id,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::SubsetState;

    #[test]
    fn session_roundtrips_through_json() {
        let dir = std::env::temp_dir().join("binsight_storage_test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("session.json");

        let id = DatasetId::default();
        let next_id = id.next();
        let mut datasets = HashMap::new();
        datasets.insert(
            id,
            DatasetStorage {
                path: PathBuf::from("measurements/run1.csv"),
                properties: DatasetProperties {
                    label: "run 1".to_string(),
                    visible: false,
                },
            },
        );
        let storage = Storage::new(
            BackendStorage {
                data_dir: PathBuf::from("/tmp/data"),
            },
            FrontendStorage {
                datasets,
                order: vec![id],
                subsets: vec![Subset::new(
                    "S1".to_string(),
                    SubsetState::range("x", 1.0, 4.0),
                    Some(id),
                )],
                edit_subset: Some(0),
                next_id,
                viewer_state: ViewerState {
                    x_att: Some("x".to_string()),
                    hist_x_min: 0.0,
                    hist_x_max: 5.0,
                    hist_n_bin: 5,
                    log_x: false,
                    log_y: true,
                    cumulative: false,
                    normalize: true,
                },
                plot_bounds: Some([0.0, 5.0, 0.0, 10.0]),
            },
        );
        storage.save_json(Some(&path)).unwrap();

        let loaded = Storage::<BackendStorage, FrontendStorage>::load_json(Some(&path)).unwrap();
        assert_eq!(loaded.backend_storage.data_dir, PathBuf::from("/tmp/data"));

        // Dataset paths and display properties survive, keyed by the same id.
        let front = loaded.frontend_storage;
        assert_eq!(front.order, vec![id]);
        assert_eq!(front.datasets[&id].path, PathBuf::from("measurements/run1.csv"));
        assert_eq!(front.datasets[&id].properties.label, "run 1");
        assert!(!front.datasets[&id].properties.visible);
        assert_eq!(front.next_id, next_id);

        // Subset definitions and the editable-subset index survive.
        assert_eq!(front.subsets.len(), 1);
        assert_eq!(front.subsets[0].label, "S1");
        assert_eq!(front.subsets[0].state, SubsetState::range("x", 1.0, 4.0));
        assert_eq!(front.subsets[0].focus, Some(id));
        assert_eq!(front.edit_subset, Some(0));

        // Viewer display state and plot bounds survive.
        assert_eq!(front.viewer_state.x_att.as_deref(), Some("x"));
        assert_eq!(front.viewer_state.hist_n_bin, 5);
        assert!(front.viewer_state.log_y);
        assert!(front.viewer_state.normalize);
        assert_eq!(front.plot_bounds, Some([0.0, 5.0, 0.0, 10.0]));
    }
}
