//! Per-request key/value store and error list shared between the middleware
//! and the handlers it wraps.

use std::error::Error as StdError;
use std::fmt::{self, Write as _};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::params::Keys;

pub type BoxError = Box<dyn StdError + Send + Sync>;

/// Whether an attached error may be shown to the client. Only private errors
/// end up in the logged error message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Private,
    Public,
}

/// An error attached to a request while it was being handled.
#[derive(Debug, Clone)]
pub struct ContextError {
    error: Arc<dyn StdError + Send + Sync>,
    kind: ErrorKind,
}

impl ContextError {
    pub fn new(error: impl Into<BoxError>, kind: ErrorKind) -> Self {
        Self {
            error: Arc::from(error.into()),
            kind,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }
}

impl fmt::Display for ContextError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.error, f)
    }
}

/// Errors a handler returns alongside its response, via
/// `(Extension(RequestErrors(..)), body)`, instead of going through the
/// [`RequestContext`].
#[derive(Debug, Clone, Default)]
pub struct RequestErrors(pub Vec<ContextError>);

#[derive(Debug, Default)]
struct Inner {
    keys: Keys,
    errors: Vec<ContextError>,
}

/// Handle inserted into the request extensions by the logging middleware.
///
/// Handlers get it with `Extension<RequestContext>`. Clones share state, but
/// each request gets a fresh context.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    inner: Arc<Mutex<Inner>>,
}

impl RequestContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, key: impl Into<String>, value: impl Into<serde_json::Value>) {
        self.lock().keys.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<serde_json::Value> {
        self.lock().keys.get(key).cloned()
    }

    /// Copy of all keys as they are right now.
    pub fn keys(&self) -> Keys {
        self.lock().keys.clone()
    }

    /// Attach a private error.
    pub fn error(&self, error: impl Into<BoxError>) {
        self.error_with_kind(error, ErrorKind::Private);
    }

    pub fn error_with_kind(&self, error: impl Into<BoxError>, kind: ErrorKind) {
        self.lock().errors.push(ContextError::new(error, kind));
    }

    pub fn errors(&self) -> Vec<ContextError> {
        self.lock().errors.clone()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Join the private errors into one string, one `Error #NN: ...` line each.
pub fn private_error_message<'a>(errors: impl IntoIterator<Item = &'a ContextError>) -> String {
    let mut message = String::new();
    for (index, error) in errors
        .into_iter()
        .filter(|error| error.kind == ErrorKind::Private)
        .enumerate()
    {
        let _ = writeln!(message, "Error #{:02}: {}", index + 1, error);
    }
    message
}
