//! Structured logging and attempt context

use uuid::Uuid;

use crate::config::LoggingConfig;
use crate::types::Path;

/// Initialize the tracing subscriber from configuration
///
/// Safe to call once per process; subsequent calls are ignored.
pub fn init_tracing(config: &LoggingConfig) {
    if !config.enable_tracing {
        return;
    }

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    if config.json {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .try_init();
    } else {
        let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
    }
}

/// Structured logger for submission events
#[derive(Debug, Clone)]
pub struct StructuredLogger {
    context_id: String,
}

impl StructuredLogger {
    pub fn new(context_id: String) -> Self {
        Self { context_id }
    }

    pub fn log_submission_started(&self, sender: &str) {
        tracing::info!(
            context_id = %self.context_id,
            sender = %sender,
            "Submission attempt started"
        );
    }

    pub fn log_path_selected(&self, path: Path, override_armed: bool) {
        tracing::info!(
            context_id = %self.context_id,
            path = %path,
            override_armed = %override_armed,
            "Submission path selected"
        );
    }

    pub fn log_signing_result(&self, success: bool) {
        tracing::debug!(
            context_id = %self.context_id,
            success = %success,
            "Signing completed"
        );
    }

    pub fn log_broadcast_success(&self, tx_id: &str, latency_ms: u64) {
        tracing::info!(
            context_id = %self.context_id,
            tx_id = %tx_id,
            latency_ms = %latency_ms,
            "Broadcast successful"
        );
    }

    pub fn log_broadcast_failure(&self, source: &str, error: &str, latency_ms: u64) {
        tracing::warn!(
            context_id = %self.context_id,
            source = %source,
            error = %error,
            latency_ms = %latency_ms,
            "Broadcast failed"
        );
    }

    pub fn log_finalized(&self, tx_id: &str) {
        tracing::info!(
            context_id = %self.context_id,
            tx_id = %tx_id,
            "Attempt finalized"
        );
    }

    pub fn warn(&self, message: &str) {
        tracing::warn!(
            context_id = %self.context_id,
            message = %message,
            "Warning"
        );
    }

    pub fn error(&self, message: &str) {
        tracing::error!(
            context_id = %self.context_id,
            message = %message,
            "Error"
        );
    }
}

/// Per-attempt execution context for log correlation
#[derive(Debug, Clone)]
pub struct AttemptContext {
    /// Unique request ID
    pub request_id: String,

    /// Trace ID for distributed tracing
    pub trace_id: String,

    /// Span ID
    pub span_id: String,

    /// Parent span ID (if any)
    pub parent_span_id: Option<String>,

    /// Operation name
    pub operation: String,

    /// Structured logger instance
    pub logger: StructuredLogger,
}

impl AttemptContext {
    /// Create a new attempt context
    pub fn new(operation: &str) -> Self {
        let request_id = Uuid::new_v4().to_string();

        Self {
            request_id: request_id.clone(),
            trace_id: Uuid::new_v4().to_string(),
            span_id: Uuid::new_v4().to_string(),
            parent_span_id: None,
            operation: operation.to_string(),
            logger: StructuredLogger::new(request_id),
        }
    }

    /// Create a child context
    pub fn child(&self, operation: &str) -> Self {
        Self {
            request_id: self.request_id.clone(),
            trace_id: self.trace_id.clone(),
            span_id: Uuid::new_v4().to_string(),
            parent_span_id: Some(self.span_id.clone()),
            operation: operation.to_string(),
            logger: self.logger.clone(),
        }
    }
}
