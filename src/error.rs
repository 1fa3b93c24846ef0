use crate::transport::TransportError;
use crate::types::ErrorKind;
use thiserror::Error;

/// Structured error context for better error handling and debugging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorContext {
    /// Field path in the upstream payload or configuration (e.g., "query.pages", "endpoints.wikipedia")
    pub field_path: Option<String>,
    /// Additional context about the error (e.g., the title being resolved)
    pub details: Option<String>,
    /// Source of the error (e.g., "commons", "config")
    pub source: Option<String>,
}

impl ErrorContext {
    pub fn new() -> Self {
        Self {
            field_path: None,
            details: None,
            source: None,
        }
    }

    pub fn with_field_path(mut self, path: impl Into<String>) -> Self {
        self.field_path = Some(path.into());
        self
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
}

impl Default for ErrorContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Unified error type for the embed pipeline.
///
/// Only the fetch layer and the per-endpoint decoders raise these; resolvers
/// turn them into an error fragment before anything reaches the host page.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Unable to retrieve URL: {url} ({source})")]
    Fetch {
        url: String,
        #[source]
        source: TransportError,
    },

    #[error("Unable to decode {format} response from {url}: {message}")]
    Decode {
        url: String,
        format: &'static str,
        message: String,
        /// Raw response body, kept so callers can mine markup error pages.
        body: String,
    },

    #[error("{message}")]
    Upstream { message: String },

    #[error("{message}{}", format_context(.context))]
    MissingData {
        message: String,
        context: ErrorContext,
    },

    #[error("Configuration error: {message}{}", format_context(.context))]
    Configuration {
        message: String,
        context: ErrorContext,
    },

    #[error("Cache error: {message}")]
    Cache { message: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

// Helper function to format error context for display
fn format_context(ctx: &ErrorContext) -> String {
    let mut parts = Vec::new();
    if let Some(ref field) = ctx.field_path {
        parts.push(format!("field: {}", field));
    }
    if let Some(ref details) = ctx.details {
        parts.push(format!("details: {}", details));
    }
    if let Some(ref source) = ctx.source {
        parts.push(format!("source: {}", source));
    }
    if parts.is_empty() {
        String::new()
    } else {
        format!(" ({})", parts.join(", "))
    }
}

impl Error {
    pub fn fetch(url: impl Into<String>, source: TransportError) -> Self {
        Error::Fetch {
            url: url.into(),
            source,
        }
    }

    pub fn upstream(msg: impl Into<String>) -> Self {
        Error::Upstream {
            message: msg.into(),
        }
    }

    pub fn cache(msg: impl Into<String>) -> Self {
        Error::Cache {
            message: msg.into(),
        }
    }

    /// Create a missing-data error with structured context
    pub fn missing_with_context(msg: impl Into<String>, context: ErrorContext) -> Self {
        Error::MissingData {
            message: msg.into(),
            context,
        }
    }

    /// Create a new configuration error with structured context
    pub fn configuration_with_context(msg: impl Into<String>, context: ErrorContext) -> Self {
        Error::Configuration {
            message: msg.into(),
            context,
        }
    }

    /// Extract error context if available
    pub fn context(&self) -> Option<&ErrorContext> {
        match self {
            Error::MissingData { context, .. } | Error::Configuration { context, .. } => {
                Some(context)
            }
            _ => None,
        }
    }

    /// Coarse classification reported to the host alongside the message.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Upstream { .. } | Error::Decode { .. } => ErrorKind::Upstream,
            Error::MissingData { .. } => ErrorKind::MissingData,
            Error::Fetch { .. }
            | Error::Configuration { .. }
            | Error::Cache { .. }
            | Error::Serialization(_) => ErrorKind::Fetch,
        }
    }

    /// Response body attached to the failure, if the upstream sent one.
    pub fn body(&self) -> Option<&str> {
        match self {
            Error::Fetch {
                source: TransportError::Status { body, .. },
                ..
            } => Some(body.as_str()),
            Error::Decode { body, .. } => Some(body.as_str()),
            _ => None,
        }
    }

    /// Short message suitable for the inline error paragraph.
    pub fn user_message(&self) -> String {
        match self {
            Error::Fetch { url, .. } => format!("Unable to retrieve URL: {}", url),
            Error::Upstream { message } | Error::MissingData { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}
