//! Engine error taxonomy.
//!
//! Five kinds, matching how failures propagate:
//! - [`RouteError::Validation`]: malformed routing configuration or data
//!   shape; fatal at config-load time.
//! - [`RouteError::NotFound`]: no matching resource for a read/entry query;
//!   recoverable, the controller tries the next candidate context.
//! - [`RouteError::Parse`]: schema/shape mismatch on an external payload;
//!   fatal for the offending entity only.
//! - [`RouteError::Other`]: wrapped I/O or library failure.
//! - [`RouteError::Absurd`]: internal invariant violated; always a bug.

use std::fmt;

use thiserror::Error;

/// Boxed error cause for variants that wrap an external failure.
pub type Cause = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result alias used throughout the engine.
pub type RouteResult<T> = Result<T, RouteError>;

/// Routing/resolution engine errors
#[derive(Debug, Error)]
pub enum RouteError {
    #[error("{0}")]
    Validation(ValidationError),

    #[error("{context} not found")]
    NotFound { context: String },

    #[error("failed to parse {context}")]
    Parse {
        context: String,
        #[source]
        cause: Option<Cause>,
    },

    #[error("{message}")]
    Other {
        message: String,
        #[source]
        cause: Option<Cause>,
    },

    #[error("internal invariant violated: {0}")]
    Absurd(String),
}

impl RouteError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(ValidationError {
            message: message.into(),
            help: None,
        })
    }

    pub fn validation_with_help(message: impl Into<String>, help: impl Into<String>) -> Self {
        Self::Validation(ValidationError {
            message: message.into(),
            help: Some(help.into()),
        })
    }

    pub fn not_found(context: impl Into<String>) -> Self {
        Self::NotFound {
            context: context.into(),
        }
    }

    pub fn parse(context: impl Into<String>) -> Self {
        Self::Parse {
            context: context.into(),
            cause: None,
        }
    }

    pub fn parse_with_cause(context: impl Into<String>, cause: impl Into<Cause>) -> Self {
        Self::Parse {
            context: context.into(),
            cause: Some(cause.into()),
        }
    }

    pub fn other(message: impl Into<String>) -> Self {
        Self::Other {
            message: message.into(),
            cause: None,
        }
    }

    pub fn other_with_cause(message: impl Into<String>, cause: impl Into<Cause>) -> Self {
        Self::Other {
            message: message.into(),
            cause: Some(cause.into()),
        }
    }

    pub fn absurd(message: impl Into<String>) -> Self {
        Self::Absurd(message.into())
    }

    /// Check if this error is recoverable via router fallback.
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this error aborts config loading.
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

/// Validation failure with an optional human-readable fix hint
#[derive(Debug, Clone)]
pub struct ValidationError {
    pub message: String,
    pub help: Option<String>,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;
        if let Some(help) = &self.help {
            write!(f, "\n  hint: {help}")?;
        }
        Ok(())
    }
}
