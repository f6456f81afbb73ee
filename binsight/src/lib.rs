#![warn(clippy::all, rust_2018_idioms)]

mod app;
mod backend_state;
mod data;

pub use app::config::Config;
pub use app::storage;
pub use app::ViewerApp;
pub use backend_state::BackendAppState;

use viewer_core::backend::BackendRequest;

pub type DynRequestSender =
    std::sync::mpsc::Sender<Box<dyn BackendRequest<BackendAppState>>>;
