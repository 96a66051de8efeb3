//! Errors surfaced by Kilo Search.
//!
//! Each component keeps its own error type (`ConfigError`, `KiloTrieError`);
//! [`KiloError`] folds them together for the binary, which reports a failed
//! run once through the installed [`ErrorReporter`].

use once_cell::sync::OnceCell;
use std::fmt::{self, Display, Formatter};
use std::sync::Arc;
use thiserror::Error;
use tracing_error::SpanTrace;

use crate::data_structures::kilo_trie::KiloTrieError;

pub mod config;

/// Result alias for anything that can fail with a [`KiloError`].
pub type KiloResult<T> = Result<T, KiloError>;

/// Top-level error of a Kilo Search run.
#[derive(Error, Debug)]
pub enum KiloError {
    /// Loading or validating the configuration failed.
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// Building the trie or starting a search failed.
    #[error("Trie error: {0}")]
    Trie(#[from] KiloTrieError),

    /// Reading the word list or talking to the terminal failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// `query --json` could not encode its output.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("{0}")]
    Custom(String),
}

/// An error plus where it surfaced, as handed to an [`ErrorReporter`].
#[derive(Debug)]
pub struct ErrorContext {
    pub error: KiloError,

    /// Short name of the subsystem that gave up, e.g. `"dictionary"`.
    pub component: &'static str,

    pub details: Option<String>,

    /// Active `tracing` spans when the context was built. Only populated
    /// when the subscriber carries an `ErrorLayer`.
    pub span_trace: Option<SpanTrace>,
}

impl ErrorContext {
    pub fn new(error: KiloError, component: &'static str) -> Self {
        Self {
            error,
            component,
            details: None,
            span_trace: None,
        }
    }

    /// Attaches a free-form note shown after the error message.
    pub fn with_details<S: Into<String>>(mut self, details: S) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Records the spans entered at the call site.
    pub fn with_span_trace(mut self) -> Self {
        self.span_trace = Some(SpanTrace::capture());
        self
    }
}

impl Display for ErrorContext {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "Error in {}: {}", self.component, self.error)?;
        if let Some(details) = &self.details {
            write!(f, "\nDetails: {details}")?;
        }
        Ok(())
    }
}

/// Sink for errors that end a run.
pub trait ErrorReporter: Send + Sync + fmt::Debug {
    fn report(&self, context: ErrorContext);
}

/// Emits reported errors as one `tracing` event at `error` level.
#[derive(Default, Debug)]
pub struct TracingErrorReporter;

impl ErrorReporter for TracingErrorReporter {
    fn report(&self, context: ErrorContext) {
        let spans = context
            .span_trace
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_default();
        tracing::error!(
            error = %context.error,
            component = context.component,
            details = context.details.as_deref().unwrap_or("None"),
            spans = %spans,
            "Error reported"
        );
    }
}

static ERROR_REPORTER: OnceCell<Arc<dyn ErrorReporter>> = OnceCell::new();

/// Installs the process-wide reporter. The first call wins; later calls
/// return `false` and leave it in place.
pub fn set_error_reporter(reporter: Arc<dyn ErrorReporter>) -> bool {
    ERROR_REPORTER.set(reporter).is_ok()
}

/// Hands `context` to the installed reporter, or prints it to stderr when
/// logging was never set up (for example a config error during startup).
pub fn report_error(context: ErrorContext) {
    match ERROR_REPORTER.get() {
        Some(reporter) => reporter.report(context),
        None => eprintln!("{context}"),
    }
}
