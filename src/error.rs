//! Unified error types for fixture-verify.
//!
//! Every error in this module is a *fault*: a failure of the harness, the
//! schema or the collaborators, never a data mismatch. Mismatches are reported
//! as [`Difference`](crate::diff::Difference) trees and surface through
//! [`AssertionError::Mismatch`](crate::diff::AssertionError).

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for fixture-verify operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum FixtureError {
    /// Contract violations detected while traversing or looking up records
    #[error("Comparison fault: {context}")]
    Fault {
        context: String,
        #[source]
        source: FaultKind,
    },

    /// Malformed kind or relationship metadata
    #[error("Invalid schema: {context}")]
    Schema {
        context: String,
        #[source]
        source: SchemaErrorKind,
    },

    /// Errors during report rendering
    #[error("Report generation failed: {context}")]
    Report {
        context: String,
        #[source]
        source: ReportErrorKind,
    },

    /// IO errors with context
    #[error("IO error at {path:?}: {message}")]
    Io {
        path: Option<PathBuf>,
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Configuration errors
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Validation errors
    #[error("Validation failed: {0}")]
    Validation(String),
}

/// Specific fault kinds raised while comparing or reconciling records.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum FaultKind {
    #[error("Kind '{0}' is not registered in the schema")]
    UnknownKind(String),

    #[error("Record of kind '{kind}' holds undeclared field '{field}'")]
    UndeclaredField { kind: String, field: String },

    #[error("Kind '{kind}' declares no identifier field")]
    MissingIdentifierField { kind: String },

    #[error("Record of kind '{kind}' has no value for identifier field '{field}'")]
    UndefinedIdentifier { kind: String, field: String },

    #[error("Value {value} of kind '{kind}' cannot serve as a persistent identifier")]
    InvalidIdentifier { kind: String, value: String },

    #[error("Loading {kind}#{identifier} failed: {reason}")]
    UnresolvedReference {
        kind: String,
        identifier: String,
        reason: String,
    },

    #[error("Live lookup failed: {0}")]
    Lookup(String),
}

/// Specific schema error kinds.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum SchemaErrorKind {
    #[error("Kind '{0}' is registered twice")]
    DuplicateKind(String),

    #[error("Kind '{kind}' extends unknown kind '{parent}'")]
    UnknownParent { kind: String, parent: String },

    #[error("Inheritance cycle through kind '{0}'")]
    InheritanceCycle(String),

    #[error("Field '{field}' is declared more than once in the hierarchy of '{kind}'")]
    DuplicateField { kind: String, field: String },

    #[error("Identifier field '{field}' is not declared on kind '{kind}'")]
    UnknownIdentifierField { kind: String, field: String },

    #[error("Field '{kind}.{field}' targets unknown kind '{target}'")]
    UnknownTarget {
        kind: String,
        field: String,
        target: String,
    },

    #[error("Field '{kind}.{field}' names inverse '{target}.{inverse}' which does not exist{suggestion}")]
    UnknownInverse {
        kind: String,
        field: String,
        target: String,
        inverse: String,
        suggestion: String,
    },

    #[error("Inverse '{target}.{inverse}' of '{kind}.{field}' does not point back")]
    InverseMismatch {
        kind: String,
        field: String,
        target: String,
        inverse: String,
    },

    #[error("Arity of '{kind}.{field}' ({arity}) does not mirror '{target}.{inverse}' ({inverse_arity})")]
    ArityMismatch {
        kind: String,
        field: String,
        arity: String,
        target: String,
        inverse: String,
        inverse_arity: String,
    },

    #[error("Non-owning field '{kind}.{field}' does not name the field it mirrors")]
    MissingInverse { kind: String, field: String },

    #[error("Both '{kind}.{field}' and '{target}.{inverse}' are declared non-owning")]
    BothSidesNonOwning {
        kind: String,
        field: String,
        target: String,
        inverse: String,
    },

    #[error("Neither '{kind}.{field}' nor '{target}.{inverse}' claims ownership")]
    NeitherSideOwning {
        kind: String,
        field: String,
        target: String,
        inverse: String,
    },

    #[error("Both '{kind}.{field}' and '{target}.{inverse}' claim ownership")]
    BothSidesOwning {
        kind: String,
        field: String,
        target: String,
        inverse: String,
    },
}

/// Specific report error kinds
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ReportErrorKind {
    #[error("JSON serialization failed: {0}")]
    JsonSerializationError(String),

    #[error("Formatting failed: {0}")]
    FormatError(String),
}

// ============================================================================
// Result type alias
// ============================================================================

/// Convenient Result type for fixture-verify operations
pub type Result<T> = std::result::Result<T, FixtureError>;

// ============================================================================
// Error construction helpers
// ============================================================================

impl FixtureError {
    /// Create a fault with context
    pub fn fault(context: impl Into<String>, source: FaultKind) -> Self {
        Self::Fault {
            context: context.into(),
            source,
        }
    }

    /// Create a fault for a kind missing from the schema
    pub fn unknown_kind(kind: impl Into<String>) -> Self {
        Self::fault("schema lookup", FaultKind::UnknownKind(kind.into()))
    }

    /// Create a fault raised by a live-store collaborator
    pub fn lookup(message: impl Into<String>) -> Self {
        Self::fault("live lookup", FaultKind::Lookup(message.into()))
    }

    /// Create a schema error with context
    pub fn schema(context: impl Into<String>, source: SchemaErrorKind) -> Self {
        Self::Schema {
            context: context.into(),
            source,
        }
    }

    /// Create a report error
    pub fn report(context: impl Into<String>, source: ReportErrorKind) -> Self {
        Self::Report {
            context: context.into(),
            source,
        }
    }

    /// Create an IO error with path context
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        let message = format!("{source}");
        Self::Io {
            path: Some(path),
            message,
            source,
        }
    }

    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Get the fault kind if this is a comparison fault
    #[must_use]
    pub const fn fault_kind(&self) -> Option<&FaultKind> {
        match self {
            Self::Fault { source, .. } => Some(source),
            _ => None,
        }
    }
}

// ============================================================================
// Conversions from existing error types
// ============================================================================

impl From<serde_json::Error> for FixtureError {
    fn from(err: serde_json::Error) -> Self {
        Self::report(
            "JSON serialization",
            ReportErrorKind::JsonSerializationError(err.to_string()),
        )
    }
}

// ============================================================================
// Error context extension trait
// ============================================================================

/// Extension trait for adding context to errors.
///
/// The context string is prepended to the error's existing context, creating a
/// chain that shows the path through the code.
///
/// # Example
///
/// ```ignore
/// use fixture_verify::error::ErrorContext;
///
/// let identity = wrap(lookup, &record).context("wrapping setup records")?;
/// ```
pub trait ErrorContext<T> {
    /// Add context to an error.
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add context from a closure, evaluated only on error.
    fn with_context<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>;
}

impl<T, E: Into<FixtureError>> ErrorContext<T> for std::result::Result<T, E> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        let ctx: String = context.into();
        self.map_err(|e| add_context_to_error(e.into(), &ctx))
    }

    fn with_context<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>,
    {
        self.map_err(|e| {
            let ctx: String = f().into();
            add_context_to_error(e.into(), &ctx)
        })
    }
}

/// Add context to an error, chaining with any existing context.
fn add_context_to_error(err: FixtureError, new_ctx: &str) -> FixtureError {
    match err {
        FixtureError::Fault {
            context: existing,
            source,
        } => FixtureError::Fault {
            context: chain_context(new_ctx, &existing),
            source,
        },
        FixtureError::Schema {
            context: existing,
            source,
        } => FixtureError::Schema {
            context: chain_context(new_ctx, &existing),
            source,
        },
        FixtureError::Report {
            context: existing,
            source,
        } => FixtureError::Report {
            context: chain_context(new_ctx, &existing),
            source,
        },
        FixtureError::Io {
            path,
            message,
            source,
        } => FixtureError::Io {
            path,
            message: chain_context(new_ctx, &message),
            source,
        },
        FixtureError::Config(msg) => FixtureError::Config(chain_context(new_ctx, &msg)),
        FixtureError::Validation(msg) => FixtureError::Validation(chain_context(new_ctx, &msg)),
    }
}

/// Chain two context strings together as "`new`: `existing`".
fn chain_context(new: &str, existing: &str) -> String {
    if existing.is_empty() {
        new.to_string()
    } else {
        format!("{new}: {existing}")
    }
}
