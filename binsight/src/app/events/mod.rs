use std::{path::PathBuf, thread::JoinHandle};

use derive_new::new;

use viewer_core::{
    backend::{BackendEventLoop, BackendLink, LinkReceiver},
    event::{AppEvent, EventState},
    BACKEND_HUNG_UP_MSG,
};

use crate::{
    app::storage::{load_json, save_json},
    data::DatasetId,
    BackendAppState,
};

use super::ViewerApp;

// ---------------------------------------------------------------------------
//
//
// EventQueue
//
//
// ---------------------------------------------------------------------------

/// The EventQueue stores events that are processed each iteration of the
/// application GUI event loop.
pub struct EventQueue<ViewerApp> {
    /// Stores events for later processing.
    queue: Vec<Box<dyn AppEvent<App = ViewerApp>>>,
    /// Temporarily stores events that have not yet finished running.
    tmp_backlog: Vec<Box<dyn AppEvent<App = ViewerApp>>>,
}

impl<ViewerApp> EventQueue<ViewerApp> {
    pub fn new() -> Self {
        Self {
            queue: Vec::new(),
            tmp_backlog: Vec::new(),
        }
    }

    pub fn queue_event(&mut self, event: Box<dyn AppEvent<App = ViewerApp>>) {
        self.queue.push(event);
    }

    pub fn discard_events(&mut self) {
        self.queue.drain(..);
        self.tmp_backlog.drain(..);
    }
}

impl ViewerApp {
    pub fn run_events(&mut self) {
        // Fully drain all queued events.
        while let Some(mut event) = self.event_queue.queue.pop() {
            match event.apply(self) {
                Ok(EventState::Finished) => {
                    self.request_redraw();
                }
                Ok(EventState::Busy) => {
                    // Add busy event to the backlog.
                    self.event_queue.tmp_backlog.push(event);
                }
                Err(err) => {
                    log::error!("event failed: {:?}", err)
                }
            }
        }

        // Put the backlog back in the queue by swapping the vectors.
        std::mem::swap(
            &mut self.event_queue.queue,
            &mut self.event_queue.tmp_backlog,
        );
    }
}

// ---------------------------------------------------------------------------
//
//
// Events
//
//
// ---------------------------------------------------------------------------

/// Handles both, saving and loading the app state, depending on whether
/// `should_save` is true or false.
#[derive(new)]
pub struct SaveLoadRequested {
    should_save: bool,
    thread_handle: Option<JoinHandle<Option<PathBuf>>>,
}

/// Add the data files picked in a file dialog as datasets.
#[derive(new)]
pub struct OpenFilesRequested {
    thread_handle: Option<JoinHandle<Option<Vec<PathBuf>>>>,
}

#[derive(new)]
pub struct RemoveDataset {
    id: DatasetId,
}

#[derive(new)]
pub struct RemoveSubset {
    index: usize,
}

/// Point the backend at a new data directory; stays busy until the
/// backend confirmed the change.
#[derive(new)]
pub struct SetDataDir {
    path: PathBuf,
    #[new(default)]
    pending: Option<LinkReceiver<bool>>,
}

// ---------------------------------------------------------------------------
//
//
// apply()
//
//
// ---------------------------------------------------------------------------

impl AppEvent for SaveLoadRequested {
    type App = ViewerApp;

    fn apply(&mut self, app: &mut Self::App) -> Result<EventState, String> {
        if let Some(handle) = self.thread_handle.take_if(|handle| handle.is_finished()) {
            match handle.join() {
                Ok(Some(path)) => {
                    if self.should_save {
                        if let Err(err) = save_json(app, Some(path.as_ref())) {
                            log::error!("error while trying to save to {:?}: {:?}", &path, err)
                        };
                    } else if let Err(err) = load_json(app, Some(path.as_ref())) {
                        log::error!("error while trying to load from {:?}: {:?}", &path, err)
                    };
                }
                Ok(None) => (),
                Err(err) => {
                    let msg = if self.should_save { "save" } else { "load" };
                    log::error!("unable to {} file: {:?}", msg, err)
                }
            };
            Ok(EventState::Finished)
        } else {
            Ok(EventState::Busy)
        }
    }
}

impl AppEvent for OpenFilesRequested {
    type App = ViewerApp;

    fn apply(&mut self, app: &mut Self::App) -> Result<EventState, String> {
        if let Some(handle) = self.thread_handle.take_if(|handle| handle.is_finished()) {
            match handle.join() {
                Ok(Some(paths)) => {
                    for path in paths {
                        app.data.add_dataset(&path, &mut app.request_tx);
                    }
                }
                Ok(None) => (),
                Err(err) => {
                    log::error!("unable to open data files: {:?}", err)
                }
            };
            Ok(EventState::Finished)
        } else {
            Ok(EventState::Busy)
        }
    }
}

impl AppEvent for RemoveDataset {
    type App = ViewerApp;

    fn apply(&mut self, app: &mut Self::App) -> Result<EventState, String> {
        app.data.remove_dataset(self.id);
        Ok(EventState::Finished)
    }
}

impl AppEvent for RemoveSubset {
    type App = ViewerApp;

    fn apply(&mut self, app: &mut Self::App) -> Result<EventState, String> {
        if self.index >= app.data.subsets.len() {
            return Err(format!(
                "cannot remove subset {}, only {} subsets defined",
                self.index,
                app.data.subsets.len()
            ));
        }
        app.data.remove_subset(self.index);
        Ok(EventState::Finished)
    }
}

impl AppEvent for SetDataDir {
    type App = ViewerApp;

    fn apply(&mut self, app: &mut Self::App) -> Result<EventState, String> {
        let Some(rx) = &self.pending else {
            let path = self.path.clone();
            let (rx, linker) = BackendLink::new(
                &format!("set data directory to {:?}", path),
                move |b: &mut BackendEventLoop<BackendAppState>| {
                    b.state.set_data_dir(&path);
                    true
                },
            );
            app.request_tx
                .send(Box::new(linker))
                .expect(BACKEND_HUNG_UP_MSG);
            self.pending = Some(rx);
            return Ok(EventState::Busy);
        };

        match rx.try_recv() {
            Ok(_) => {
                app.config.data_dir = self.path.clone();
                Ok(EventState::Finished)
            }
            Err(std::sync::mpsc::TryRecvError::Empty) => Ok(EventState::Busy),
            Err(std::sync::mpsc::TryRecvError::Disconnected) => {
                Err(BACKEND_HUNG_UP_MSG.to_string())
            }
        }
    }
}
