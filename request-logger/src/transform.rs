//! Turning a request snapshot into a log record.

use axum::http::StatusCode;
use tracing::field;
use tracing::Level;

use crate::params::FieldsParams;
use crate::Logger;

/// Prefix of every message the default transformer emits.
pub const MESSAGE_PREFIX: &str = "[request-logger]";

/// Target of the events the default transformer emits.
pub const TARGET: &str = "request_logger";

/// Strategy invoked once per logged request.
///
/// Implemented for any `Fn(&Logger, &FieldsParams<'_>)`, so a closure can be
/// passed directly:
///
/// ```
/// use request_logger::{FieldsParams, LoggerConfig, Logger};
///
/// let config = LoggerConfig::default().transformer(
///     |logger: &Logger, params: &FieldsParams<'_>| {
///         logger.in_scope(|| tracing::info!(path = %params.path, "request"));
///     },
/// );
/// ```
pub trait LogTransformer: Send + Sync + 'static {
    fn transform(&self, logger: &Logger, params: &FieldsParams<'_>);
}

impl<F> LogTransformer for F
where
    F: Fn(&Logger, &FieldsParams<'_>) + Send + Sync + 'static,
{
    fn transform(&self, logger: &Logger, params: &FieldsParams<'_>) {
        self(logger, params)
    }
}

/// Records latency, client IP, path and timestamp, plus whichever optional
/// request fields are selected, at a level derived from the status code.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultTransformer;

impl LogTransformer for DefaultTransformer {
    fn transform(&self, logger: &Logger, params: &FieldsParams<'_>) {
        let request = params.request;
        let option = params.option;

        // Unselected fields are `None` and are not recorded at all.
        let host = option.host.then(|| request.host());
        let header = option.header.then(|| field::debug(&request.headers));
        let user_agent = option.user_agent.then(|| request.user_agent());
        let referer = option.referer.then(|| request.referer());

        let code = params.status.as_u16();
        let reason = status_text(params.status);

        macro_rules! log_at {
            ($level:ident) => {
                tracing::$level!(
                    target: TARGET,
                    latency = ?params.latency,
                    client_ip = %params.client_ip,
                    path = %params.path,
                    timestamp = %params.timestamp.to_rfc3339(),
                    host,
                    header,
                    user_agent,
                    referer,
                    "{}{} {} {:>3}",
                    MESSAGE_PREFIX,
                    code,
                    params.method,
                    reason
                )
            };
        }

        logger.in_scope(|| match severity_for(params.status) {
            Level::DEBUG => log_at!(debug),
            Level::WARN => log_at!(warn),
            _ => log_at!(error),
        });
    }
}

/// `[200, 400)` is DEBUG, `[400, 500)` is WARN, everything else ERROR.
pub fn severity_for(status: StatusCode) -> Level {
    match status.as_u16() {
        200..=399 => Level::DEBUG,
        400..=499 => Level::WARN,
        _ => Level::ERROR,
    }
}

/// Standard reason phrase, empty for codes without one.
pub fn status_text(status: StatusCode) -> &'static str {
    status.canonical_reason().unwrap_or("")
}
