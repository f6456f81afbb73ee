#![warn(clippy::all, rust_2018_idioms)]

use binsight::{BackendAppState, Config, ViewerApp};
use viewer_core::backend::BackendEventLoop;

const WINDOW_NAME: &str = "Binsight";
const WINDOW_WIDTH: f32 = 900.0;
const WINDOW_HEIGHT: f32 = 600.0;

fn main() -> eframe::Result {
    env_logger::init();

    // Start backend loop.
    let (request_tx, request_rx) = std::sync::mpsc::channel();
    let config = if let Ok(config) = Config::from_config_file() {
        config
    } else {
        log::warn!("unable to load config file \".binsight\" from home directory");
        Config::default()
    };
    let backend_state = BackendAppState::new(config.data_dir.clone());
    let eventloop_handle = BackendEventLoop::new(request_rx, backend_state).run();

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([WINDOW_WIDTH, WINDOW_HEIGHT])
            .with_min_inner_size([WINDOW_WIDTH / 2.0, WINDOW_HEIGHT / 2.0]),
        ..Default::default()
    };
    eframe::run_native(
        WINDOW_NAME,
        native_options,
        Box::new(|cc| {
            Ok(Box::new(ViewerApp::new(
                cc,
                config,
                request_tx,
                eventloop_handle,
            )))
        }),
    )
}
