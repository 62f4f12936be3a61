//! Tower layer that logs every request once its response is ready.

use std::collections::HashSet;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Instant;

use axum::http::{header, Request, Response};
use chrono::Utc;
use futures_util::future::BoxFuture;
use http_body::Body;
use tower::{Layer, Service};

use crate::client_ip::ClientIpSource;
use crate::config::LoggerConfig;
use crate::context::{private_error_message, RequestContext, RequestErrors};
use crate::params::{FieldsParams, OptionalFields, RequestInfo};
use crate::transform::{DefaultTransformer, LogTransformer};
use crate::Logger;

/// Request logger with default settings: stderr at INFO, default transformer,
/// nothing skipped, no optional fields.
pub fn request_logger() -> RequestLoggerLayer {
    RequestLoggerLayer::new()
}

pub fn request_logger_with_config(config: LoggerConfig) -> RequestLoggerLayer {
    RequestLoggerLayer::with_config(config)
}

struct Shared {
    logger: Logger,
    transformer: Arc<dyn LogTransformer>,
    skip: Option<HashSet<String>>,
    option: OptionalFields,
    client_ip: ClientIpSource,
}

impl Shared {
    fn skips(&self, path: &str) -> bool {
        self.skip.as_ref().is_some_and(|skip| skip.contains(path))
    }
}

/// Layer producing [`RequestLogger`] services. All services built from one
/// layer share its logger, transformer and skip set.
#[derive(Clone)]
pub struct RequestLoggerLayer {
    shared: Arc<Shared>,
}

impl RequestLoggerLayer {
    pub fn new() -> Self {
        Self::with_config(LoggerConfig::default())
    }

    pub fn with_config(config: LoggerConfig) -> Self {
        let skip = if config.skip_paths.is_empty() {
            None
        } else {
            Some(config.skip_paths.into_iter().collect())
        };

        Self {
            shared: Arc::new(Shared {
                logger: config.logger.unwrap_or_default(),
                transformer: config
                    .transformer
                    .unwrap_or_else(|| Arc::new(DefaultTransformer)),
                skip,
                option: config.option,
                client_ip: config.client_ip,
            }),
        }
    }
}

impl Default for RequestLoggerLayer {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> Layer<S> for RequestLoggerLayer {
    type Service = RequestLogger<S>;

    fn layer(&self, inner: S) -> Self::Service {
        RequestLogger {
            inner,
            shared: self.shared.clone(),
        }
    }
}

#[derive(Clone)]
pub struct RequestLogger<S> {
    inner: S,
    shared: Arc<Shared>,
}

impl<S, ReqBody, ResBody> Service<Request<ReqBody>> for RequestLogger<S>
where
    S: Service<Request<ReqBody>, Response = Response<ResBody>> + 'static,
    S::Future: Send + 'static,
    ReqBody: Send + 'static,
    ResBody: Body + Send + 'static,
{
    type Response = Response<ResBody>;
    type Error = S::Error;
    type Future = BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut request: Request<ReqBody>) -> Self::Future {
        let start = Instant::now();
        let context = RequestContext::new();
        request.extensions_mut().insert(context.clone());

        if self.shared.skips(request.uri().path()) {
            return Box::pin(self.inner.call(request));
        }

        let shared = self.shared.clone();
        let info = RequestInfo::from_request(&request);
        let client_ip = shared.client_ip.resolve(&request);

        let future = self.inner.call(request);

        Box::pin(async move {
            let response = future.await?;

            let timestamp = Utc::now();
            let latency = start.elapsed();

            let path = match info.raw_query() {
                Some(query) => format!("{}?{}", info.path(), query),
                None => info.path().to_string(),
            };

            let mut errors = context.errors();
            if let Some(RequestErrors(attached)) = response.extensions().get::<RequestErrors>() {
                errors.extend(attached.iter().cloned());
            }
            let keys = context.keys();

            let params = FieldsParams {
                request: &info,
                timestamp,
                status: response.status(),
                latency,
                client_ip,
                method: info.method.clone(),
                path,
                error_message: private_error_message(&errors),
                body_size: body_size(&response),
                keys: &keys,
                option: shared.option,
            };
            shared.transformer.transform(&shared.logger, &params);

            Ok(response)
        })
    }
}

fn body_size<B: Body>(response: &Response<B>) -> Option<u64> {
    response.body().size_hint().exact().or_else(|| {
        response
            .headers()
            .get(header::CONTENT_LENGTH)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.parse().ok())
    })
}
