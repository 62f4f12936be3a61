//! Logger handle the middleware emits through.

use std::fmt;

use tracing::Dispatch;

/// Handle to a `tracing` dispatcher.
///
/// Cloning is cheap; every clone refers to the same subscriber. Records are
/// emitted with [`Logger::in_scope`], which makes the wrapped dispatcher the
/// current default for the duration of the closure, so the middleware can log
/// to a subscriber other than the process-wide one.
#[derive(Clone)]
pub struct Logger {
    dispatch: Dispatch,
}

impl Logger {
    /// Build a standalone logger writing human-readable lines to stderr at
    /// INFO. Debug records (successful requests with the default transformer)
    /// are filtered out.
    pub fn new() -> Self {
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::INFO)
            .with_writer(std::io::stderr)
            .finish();

        Self {
            dispatch: Dispatch::new(subscriber),
        }
    }

    /// Capture the dispatcher that is current on this thread, usually the
    /// global one installed by the host application.
    pub fn current() -> Self {
        Self {
            dispatch: tracing::dispatcher::get_default(Dispatch::clone),
        }
    }

    /// Run `f` with this logger's dispatcher as the default.
    pub fn in_scope<R>(&self, f: impl FnOnce() -> R) -> R {
        tracing::dispatcher::with_default(&self.dispatch, f)
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Dispatch> for Logger {
    fn from(dispatch: Dispatch) -> Self {
        Self { dispatch }
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger").finish_non_exhaustive()
    }
}
