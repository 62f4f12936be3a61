//! Snapshot types handed to a [`LogTransformer`](crate::LogTransformer).

use std::collections::HashMap;
use std::time::Duration;

use axum::http::{header, HeaderMap, Method, StatusCode, Uri};
use chrono::{DateTime, Utc};
use serde::Deserialize;

/// Values handlers stored on the request context.
pub type Keys = HashMap<String, serde_json::Value>;

/// Selects which request fields the default transformer records on top of
/// the fixed ones.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct OptionalFields {
    pub host: bool,
    pub header: bool,
    pub user_agent: bool,
    pub referer: bool,
}

impl OptionalFields {
    pub fn all() -> Self {
        Self {
            host: true,
            header: true,
            user_agent: true,
            referer: true,
        }
    }
}

/// The parts of the original request that outlive the call into the inner
/// service.
#[derive(Debug, Clone)]
pub struct RequestInfo {
    pub method: Method,
    pub uri: Uri,
    pub headers: HeaderMap,
}

impl RequestInfo {
    pub fn from_request<B>(request: &axum::http::Request<B>) -> Self {
        Self {
            method: request.method().clone(),
            uri: request.uri().clone(),
            headers: request.headers().clone(),
        }
    }

    pub fn path(&self) -> &str {
        self.uri.path()
    }

    pub fn raw_query(&self) -> Option<&str> {
        self.uri.query().filter(|query| !query.is_empty())
    }

    /// Host from the request target when absolute, otherwise the `Host` header.
    pub fn host(&self) -> &str {
        match self.uri.authority() {
            Some(authority) => authority.as_str(),
            None => self.header_str(header::HOST),
        }
    }

    pub fn user_agent(&self) -> &str {
        self.header_str(header::USER_AGENT)
    }

    pub fn referer(&self) -> &str {
        self.header_str(header::REFERER)
    }

    fn header_str(&self, name: header::HeaderName) -> &str {
        self.headers
            .get(name)
            .and_then(|value| value.to_str().ok())
            .unwrap_or("")
    }
}

/// Everything captured about one request once its response is available.
#[derive(Debug, Clone)]
pub struct FieldsParams<'a> {
    pub request: &'a RequestInfo,

    /// Time the response came back from the inner service.
    pub timestamp: DateTime<Utc>,
    pub status: StatusCode,
    /// Time spent in the inner service.
    pub latency: Duration,
    /// Empty when no address could be resolved.
    pub client_ip: String,
    pub method: Method,
    /// Request path, with `?query` appended when the request had one.
    pub path: String,
    /// Private errors attached while handling the request, empty if none.
    pub error_message: String,
    /// Response body length when known up front.
    pub body_size: Option<u64>,
    pub keys: &'a Keys,

    pub option: OptionalFields,
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn info(uri: &str, headers: &[(&str, &str)]) -> RequestInfo {
        let mut builder = Request::builder().uri(uri);
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        RequestInfo::from_request(&builder.body(()).unwrap())
    }

    #[test]
    fn test_host_prefers_absolute_uri() {
        let req = info("http://api.example.com/items", &[("host", "other")]);
        assert_eq!(req.host(), "api.example.com");

        let req = info("/items", &[("host", "localhost:8080")]);
        assert_eq!(req.host(), "localhost:8080");
    }

    #[test]
    fn test_missing_headers_are_empty() {
        let req = info("/items", &[]);
        assert_eq!(req.host(), "");
        assert_eq!(req.user_agent(), "");
        assert_eq!(req.referer(), "");
    }

    #[test]
    fn test_empty_query_is_none() {
        assert_eq!(info("/items?", &[]).raw_query(), None);
        assert_eq!(info("/items?id=5", &[]).raw_query(), Some("id=5"));
    }

    #[test]
    fn test_optional_fields_deserialize_partial() {
        let fields: OptionalFields = serde_json::from_str(r#"{"host": true}"#).unwrap();
        assert_eq!(
            fields,
            OptionalFields {
                host: true,
                ..OptionalFields::default()
            }
        );
    }
}
