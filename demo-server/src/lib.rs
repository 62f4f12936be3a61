pub mod config;
pub mod error;
pub mod request_id;
pub mod routes;

pub use config::Config;
pub use error::{Error, Result};

use axum::{middleware, Router};
use request_logger::{Logger, LoggerConfig, RequestLoggerLayer};
use tower_http::cors::{Any, CorsLayer};

/// Build the application router, logging requests through the dispatcher
/// that is current when this is called.
pub fn app(config: &Config) -> Router {
    app_with_logger(config, Logger::current())
}

pub fn app_with_logger(config: &Config, logger: Logger) -> Router {
    let request_log = LoggerConfig::from(config.request_log.clone()).logger(logger);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .merge(routes::health::router())
        .merge(routes::items::router())
        .layer(middleware::from_fn(request_id::assign_request_id))
        .layer(cors)
        .layer(RequestLoggerLayer::with_config(request_log))
}
