use viewer_core::string_error::ErrorStringExt;

use std::{io::Read, path::PathBuf, str::FromStr};

#[derive(Debug, Clone)]
pub struct Config {
    pub data_dir: PathBuf,
    pub default_n_bins: usize,
    // Buffer for the preferences UI, applied through a SetDataDir event.
    data_dir_buffer: String,
}

impl Default for Config {
    fn default() -> Self {
        let data_dir = PathBuf::from("/tmp/");
        let default_n_bins = 25;

        Self {
            data_dir_buffer: data_dir.to_string_lossy().into_owned(),
            data_dir,
            default_n_bins,
        }
    }
}

impl Config {
    pub fn from_config_file() -> Result<Self, String> {
        let mut config = Self::default();
        #[allow(deprecated)]
        let Some(home) = std::env::home_dir() else {
            return Err("could not determine home directory to load config file".into());
        };
        let config_raw = {
            let path = home.join(PathBuf::from(".binsight"));
            let mut file = std::fs::File::open(path).err_to_string("could not open config file")?;
            let mut buf = String::new();
            file.read_to_string(&mut buf)
                .err_to_string("could not load config file")?;
            buf
        };
        config.apply_lines(&config_raw);
        Ok(config)
    }

    fn apply_lines(&mut self, config_raw: &str) {
        for line in config_raw.lines() {
            // Lines starting with "#" are considered comments.
            if line.starts_with('#') {
                continue;
            }
            let mut iter = line.split('=');
            let key = iter.next();
            let val = iter.next();
            match (key, val) {
                (Some("data_dir"), Some(path_str)) => match PathBuf::from_str(path_str) {
                    Ok(path) => {
                        self.data_dir_buffer = path.to_string_lossy().into_owned();
                        self.data_dir = path;
                    }
                    Err(_) => log::warn!("could not parse 'data_dir' as directory name"),
                },
                (Some("default_n_bins"), Some(n_str)) => {
                    if let Ok(n) = n_str.parse::<usize>() {
                        if n > 0 {
                            self.default_n_bins = n;
                        } else {
                            log::warn!("'default_n_bins' must be positive");
                        }
                    } else {
                        log::warn!("could not parse 'default_n_bins' as number")
                    }
                }
                _ => continue,
            }
        }
    }

    /// Preferences UI. Returns the new data directory if the user asked to
    /// apply one; the caller forwards it to the backend.
    pub fn render(&mut self, _ctx: &egui::Context, ui: &mut egui::Ui) -> Option<PathBuf> {
        let mut applied = None;

        ui.heading("Preferences");
        ui.separator();

        ui.label("Data directory (resolves relative dataset paths):");
        ui.horizontal(|ui| {
            ui.add(egui::TextEdit::singleline(&mut self.data_dir_buffer).desired_width(300.0));
            if ui.button("Apply").clicked() {
                applied = Some(PathBuf::from(&self.data_dir_buffer));
            }
        });

        ui.label("Default number of bins for new sessions:");
        ui.add(egui::DragValue::new(&mut self.default_n_bins).range(1..=10_000));

        applied
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_key_value_lines() {
        let mut config = Config::default();
        config.apply_lines(
            "# comment line\ndata_dir=/data/measurements\ndefault_n_bins=50\nunknown_key=1\n",
        );
        assert_eq!(config.data_dir, PathBuf::from("/data/measurements"));
        assert_eq!(config.data_dir_buffer, "/data/measurements");
        assert_eq!(config.default_n_bins, 50);
    }

    #[test]
    fn bad_values_keep_the_defaults() {
        let defaults = Config::default();

        let mut config = Config::default();
        config.apply_lines("default_n_bins=zero\n");
        assert_eq!(config.default_n_bins, defaults.default_n_bins);

        let mut config = Config::default();
        config.apply_lines("default_n_bins=0\n");
        assert_eq!(config.default_n_bins, defaults.default_n_bins);

        let mut config = Config::default();
        config.apply_lines("data_dir\n");
        assert_eq!(config.data_dir, defaults.data_dir);
    }
}
