#![warn(clippy::all, rust_2018_idioms)]

pub mod backend;
pub mod event;
pub mod frontend;
pub mod storage;
pub mod string_error;

/// Error message used by frontends when the backend thread disconnected
/// while a request was still pending.
pub const BACKEND_HUNG_UP_MSG: &str = "backend thread hung up unexpectedly";

#[cfg(test)]
mod tests {
    use std::time::Instant;

    use log::trace;

    use crate::backend::{request_stop, BackendEventLoop, BackendLink, BackendState};

    struct TestState {}
    impl BackendState for TestState {}

    #[test]
    fn cancelled_requests_are_not_run_on_the_backend() {
        let _ = env_logger::builder().is_test(true).try_init();

        let (request_tx, request_rx) = std::sync::mpsc::channel();
        let eventloop_handle = BackendEventLoop::new(request_rx, TestState {}).run();

        let tic = Instant::now();

        let (rx, linker) = BackendLink::new("sleep for one second", |_| {
            std::thread::sleep(std::time::Duration::from_millis(1000));
        });

        // Dropping the receiver cancels the request, so the backend must
        // skip the action (sleeping for 1 s) entirely ...
        drop(rx);
        trace!("receiver dropped");
        assert!(linker.is_cancelled());
        request_tx.send(Box::new(linker)).unwrap();
        // (this joins the event loop thread, so it blocks for as long as
        // the backend still has work to do)
        request_stop(&request_tx, eventloop_handle);
        let delta_time = (Instant::now() - tic).as_millis();
        // ... thus stopping should take far less than the sleep duration.
        assert!(delta_time < 50);
    }

    #[test]
    fn live_requests_reply_on_the_backchannel() {
        let _ = env_logger::builder().is_test(true).try_init();

        let (request_tx, request_rx) = std::sync::mpsc::channel();
        let eventloop_handle = BackendEventLoop::new(request_rx, TestState {}).run();

        let (rx, linker) = BackendLink::new("add numbers", |_| 40 + 2);
        request_tx.send(Box::new(linker)).unwrap();
        let answer = rx
            .recv_timeout(std::time::Duration::from_secs(5))
            .expect("backend did not answer in time");
        assert_eq!(answer, 42);

        request_stop(&request_tx, eventloop_handle);
    }
}
