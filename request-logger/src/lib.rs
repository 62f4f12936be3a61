//! Request Logger
//!
//! Tower/axum middleware that times each request and emits one structured
//! `tracing` record per response, at DEBUG, WARN or ERROR depending on the
//! status code.
//!
//! ```no_run
//! use axum::{routing::get, Router};
//! use request_logger::{LoggerConfig, Logger, RequestLoggerLayer};
//!
//! let app: Router = Router::new()
//!     .route("/health", get(|| async { "ok" }))
//!     .layer(RequestLoggerLayer::with_config(
//!         LoggerConfig::default()
//!             .logger(Logger::current())
//!             .skip_path("/health"),
//!     ));
//! ```

pub mod client_ip;
pub mod config;
pub mod context;
pub mod logger;
pub mod middleware;
pub mod params;
pub mod test_util;
pub mod transform;

pub use client_ip::ClientIpSource;
pub use config::{LoggerConfig, LoggerSettings};
pub use context::{ContextError, ErrorKind, RequestContext, RequestErrors};
pub use logger::Logger;
pub use middleware::{request_logger, request_logger_with_config, RequestLogger, RequestLoggerLayer};
pub use params::{FieldsParams, Keys, OptionalFields, RequestInfo};
pub use transform::{severity_for, status_text, DefaultTransformer, LogTransformer};
