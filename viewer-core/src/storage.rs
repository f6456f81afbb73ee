//! The `Storage` type collects frontend and backend state and stores/loads
//! it to/from a JSON file for session persistence.

use serde::{Deserialize, Serialize};
use serde_json::{from_reader, to_writer};
use std::path::Path;

use crate::string_error::ErrorStringExt;

const STORAGE_FILE: &str = "./.app_storage.json";

#[derive(Serialize, Deserialize)]
pub struct Storage<B, F> {
    pub backend_storage: B,
    pub frontend_storage: F,
}

impl<B, F> Storage<B, F>
where
    for<'a> B: Serialize + Deserialize<'a>,
    for<'a> F: Serialize + Deserialize<'a>,
{
    pub fn new(backend_storage: B, frontend_storage: F) -> Self {
        Self {
            backend_storage,
            frontend_storage,
        }
    }

    pub fn save_json(&self, input_path: Option<&Path>) -> Result<(), String> {
        let default_path = std::path::PathBuf::from(STORAGE_FILE);
        let output_path = input_path.unwrap_or(&default_path);
        let file =
            std::fs::File::create(output_path).err_to_string("could not create storage file")?;
        to_writer(file, &self).err_to_string("could not save app state to json")?;
        log::debug!("saved app state to file {:?}", output_path.canonicalize());
        Ok(())
    }

    pub fn load_json(input_path: Option<&Path>) -> Result<Storage<B, F>, String> {
        let default_path = std::path::PathBuf::from(STORAGE_FILE);
        let input_path = input_path.unwrap_or(&default_path);
        let file = std::fs::File::open(input_path).err_to_string("could not open storage file")?;
        let storage =
            from_reader(file).err_to_string("could not load app state from storage file")?;
        Ok(storage)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize, Deserialize)]
    struct Backend {
        data_dir: String,
    }

    #[derive(Serialize, Deserialize)]
    struct Frontend {
        n_bins: usize,
        log_x: bool,
    }

    #[test]
    fn storage_roundtrips_through_json() {
        let dir = std::env::temp_dir().join("viewer_core_storage_test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("storage.json");

        let storage = Storage::new(
            Backend {
                data_dir: "/tmp/data".to_string(),
            },
            Frontend {
                n_bins: 25,
                log_x: true,
            },
        );
        storage.save_json(Some(&path)).unwrap();

        let loaded = Storage::<Backend, Frontend>::load_json(Some(&path)).unwrap();
        assert_eq!(loaded.backend_storage.data_dir, "/tmp/data");
        assert_eq!(loaded.frontend_storage.n_bins, 25);
        assert!(loaded.frontend_storage.log_x);
    }
}
