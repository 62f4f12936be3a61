use std::fmt;
use std::sync::Arc;

use serde::Deserialize;

use crate::client_ip::ClientIpSource;
use crate::params::OptionalFields;
use crate::transform::LogTransformer;
use crate::Logger;

/// Options for [`RequestLoggerLayer`](crate::RequestLoggerLayer).
///
/// Every field may be left unset: the layer falls back to [`Logger::new`],
/// the [`DefaultTransformer`](crate::DefaultTransformer), no skipped paths and
/// no optional fields.
#[derive(Clone, Default)]
pub struct LoggerConfig {
    pub logger: Option<Logger>,
    pub transformer: Option<Arc<dyn LogTransformer>>,
    /// Paths (without query string) that are never logged. Matched exactly.
    pub skip_paths: Vec<String>,
    pub option: OptionalFields,
    pub client_ip: ClientIpSource,
}

impl LoggerConfig {
    pub fn logger(mut self, logger: Logger) -> Self {
        self.logger = Some(logger);
        self
    }

    pub fn transformer(mut self, transformer: impl LogTransformer) -> Self {
        self.transformer = Some(Arc::new(transformer));
        self
    }

    pub fn skip_path(mut self, path: impl Into<String>) -> Self {
        self.skip_paths.push(path.into());
        self
    }

    pub fn skip_paths<I, P>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<String>,
    {
        self.skip_paths.extend(paths.into_iter().map(Into::into));
        self
    }

    pub fn option(mut self, option: OptionalFields) -> Self {
        self.option = option;
        self
    }

    pub fn client_ip(mut self, client_ip: ClientIpSource) -> Self {
        self.client_ip = client_ip;
        self
    }
}

impl fmt::Debug for LoggerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoggerConfig")
            .field("logger", &self.logger)
            .field("custom_transformer", &self.transformer.is_some())
            .field("skip_paths", &self.skip_paths)
            .field("option", &self.option)
            .field("client_ip", &self.client_ip)
            .finish()
    }
}

/// The serializable part of [`LoggerConfig`], for embedding in an
/// application's own configuration file.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggerSettings {
    pub skip_paths: Vec<String>,
    pub fields: OptionalFields,
    pub trust_forwarded_headers: bool,
}

impl Default for LoggerSettings {
    fn default() -> Self {
        Self {
            skip_paths: Vec::new(),
            fields: OptionalFields::default(),
            trust_forwarded_headers: true,
        }
    }
}

impl From<LoggerSettings> for LoggerConfig {
    fn from(settings: LoggerSettings) -> Self {
        let client_ip = if settings.trust_forwarded_headers {
            ClientIpSource::ForwardedHeaders
        } else {
            ClientIpSource::PeerAddr
        };

        LoggerConfig::default()
            .skip_paths(settings.skip_paths)
            .option(settings.fields)
            .client_ip(client_ip)
    }
}
