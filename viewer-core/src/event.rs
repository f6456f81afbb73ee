/// An event applied to the frontend app state on the UI thread.
///
/// Events that wait on something (a file dialog thread, a pending backend
/// request) return [`EventState::Busy`] and are polled again next frame.
pub trait AppEvent {
    type App;
    fn apply(&mut self, app: &mut Self::App) -> Result<EventState, String>;
}

pub enum EventState {
    Finished,
    Busy,
}
