//! Helper to turn arbitrary errors into `String`s with a context message,
//! the error currency used at the app boundary.

pub trait ErrorStringExt<T> {
    fn err_to_string(self, context: &str) -> Result<T, String>;
}

impl<T, E: std::fmt::Debug> ErrorStringExt<T> for Result<T, E> {
    fn err_to_string(self, context: &str) -> Result<T, String> {
        self.map_err(|err| format!("{}: {:?}", context, err))
    }
}
