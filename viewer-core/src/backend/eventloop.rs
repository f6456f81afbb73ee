use std::sync::mpsc::{Receiver, Sender};
use std::thread::JoinHandle;

use log::{info, warn};

use crate::backend::{BackendLink, BackendRequest, BackendState};

/// Event loop which owns the backend state and runs on a worker thread.
///
/// Requests arrive over an mpsc channel and are handled in order; each
/// request replies over its own backchannel (see [`BackendLink`]).
pub struct BackendEventLoop<S>
where
    S: BackendState,
{
    pub state: S,
    request_rx: Receiver<Box<dyn BackendRequest<S>>>,
    should_stop: bool,
}

impl<S: BackendState + Send + 'static> BackendEventLoop<S> {
    pub fn new(request_rx: Receiver<Box<dyn BackendRequest<S>>>, state: S) -> Self {
        info!("creating backend event loop");
        Self {
            state,
            request_rx,
            should_stop: false,
        }
    }

    /// Drain all pending requests. Returns whether the loop should stop.
    pub fn update(&mut self) -> bool {
        while let Ok(request) = self.request_rx.try_recv() {
            info!("handling request '{}'", request.describe());
            request.run_on_backend(self);
        }
        self.should_stop
    }

    pub fn run(mut self) -> JoinHandle<()> {
        std::thread::spawn(move || loop {
            if self.update() {
                info!("stopping backend event loop");
                break;
            }
        })
    }

    pub fn signal_stop(&mut self) -> bool {
        self.should_stop = true;
        true
    }
}

/// Ask the backend event loop to stop and join its thread.
pub fn request_stop<S: BackendState + Send + 'static>(
    request_tx: &Sender<Box<dyn BackendRequest<S>>>,
    backend_thread_handle: JoinHandle<()>,
) {
    let (rx, stop_linker) = BackendLink::new("stop event loop", |b: &mut BackendEventLoop<S>| {
        b.signal_stop()
    });
    info!("sending stop signal to backend event loop");
    if request_tx.send(Box::new(stop_linker)).is_ok() {
        if let Err(e) = rx.recv_timeout(std::time::Duration::from_secs(10)) {
            warn!("no response to stop signal after 10 seconds: {e}");
        }
    }
    match backend_thread_handle.join() {
        Ok(_) => info!("backend event loop ended"),
        Err(e) => warn!("backend thread panicked on shutdown: {e:?}"),
    }
}
