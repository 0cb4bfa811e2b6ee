//! Analyzer error types
//!
//! Error codes:
//! - AERO_QUERY_UNSUPPORTED_SHAPE (REJECT)
//! - AERO_SEMANTIC_ANALYSIS (REJECT)
//! - AERO_PLAN_NOT_BUILT (ERROR)
//! - AERO_PLAN_ALREADY_EXTRACTED (ERROR)
//! - AERO_PASS_INDEX_OUT_OF_RANGE (ERROR)
//! - AERO_PIPELINE_BUILD_FAILED (ERROR)
//! - AERO_CONFIG_INVALID (REJECT)
//!
//! REJECT errors are caused by caller input. ERROR errors mean the
//! compilation sequence itself was driven in an illegal order.

use std::fmt;

use thiserror::Error;

/// Severity levels for analyzer errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Caller input rejected
    Reject,
    /// Internal ordering violation
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Reject => write!(f, "REJECT"),
            Severity::Error => write!(f, "ERROR"),
        }
    }
}

/// Kind of name or type resolution failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SemanticErrorKind {
    UnknownIdentifier,
    UnknownTable,
    UnknownFunction,
    TypeMismatch,
    InvalidArguments,
    UnsupportedExpression,
}

impl SemanticErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SemanticErrorKind::UnknownIdentifier => "UNKNOWN_IDENTIFIER",
            SemanticErrorKind::UnknownTable => "UNKNOWN_TABLE",
            SemanticErrorKind::UnknownFunction => "UNKNOWN_FUNCTION",
            SemanticErrorKind::TypeMismatch => "TYPE_MISMATCH",
            SemanticErrorKind::InvalidArguments => "INVALID_ARGUMENTS",
            SemanticErrorKind::UnsupportedExpression => "UNSUPPORTED_EXPRESSION",
        }
    }
}

/// Resolution failure reported by a query tree builder or a pass.
///
/// Propagated to the caller unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}: {message}", kind.as_str())]
pub struct SemanticError {
    pub kind: SemanticErrorKind,
    pub message: String,
}

impl SemanticError {
    pub fn new(kind: SemanticErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn unknown_identifier(name: &str) -> Self {
        Self::new(
            SemanticErrorKind::UnknownIdentifier,
            format!("Unknown identifier '{}'", name),
        )
    }

    pub fn unknown_table(name: &str) -> Self {
        Self::new(
            SemanticErrorKind::UnknownTable,
            format!("Table '{}' does not exist", name),
        )
    }

    pub fn unknown_function(name: &str) -> Self {
        Self::new(
            SemanticErrorKind::UnknownFunction,
            format!("Unknown function '{}'", name),
        )
    }

    pub fn type_mismatch(message: impl Into<String>) -> Self {
        Self::new(SemanticErrorKind::TypeMismatch, message)
    }

    pub fn invalid_arguments(message: impl Into<String>) -> Self {
        Self::new(SemanticErrorKind::InvalidArguments, message)
    }

    pub fn unsupported(message: impl Into<String>) -> Self {
        Self::new(SemanticErrorKind::UnsupportedExpression, message)
    }
}

/// Errors surfaced by query analysis and plan construction
#[derive(Debug, Clone, Error)]
pub enum AnalyzerError {
    /// Top level node is not a SELECT, SELECT ... UNION or subquery
    #[error("Expected SelectWithUnionQuery or SelectQuery. Actual {rendered}")]
    UnsupportedQueryShape { rendered: String },

    /// Name or type resolution failed
    #[error("Semantic analysis failed: {0}")]
    SemanticAnalysis(#[from] SemanticError),

    /// Plan accessed before it was built
    #[error("Query plan is not built")]
    PlanNotBuilt,

    /// Plan accessed after it was moved out
    #[error("Query plan was already extracted")]
    PlanAlreadyExtracted,

    /// Partial pass run requested beyond the registered passes
    #[error("Requested to run passes up to {requested} pass. There are only {available} passes")]
    PassIndexOutOfRange { requested: usize, available: usize },

    /// Logical to physical lowering failed
    #[error("Pipeline build failed: {0}")]
    Pipeline(String),

    /// Invalid engine configuration
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl AnalyzerError {
    pub fn unsupported_shape(rendered: impl Into<String>) -> Self {
        Self::UnsupportedQueryShape {
            rendered: rendered.into(),
        }
    }

    pub fn pipeline(msg: impl Into<String>) -> Self {
        Self::Pipeline(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Returns the stable error code
    pub fn code(&self) -> &'static str {
        match self {
            Self::UnsupportedQueryShape { .. } => "AERO_QUERY_UNSUPPORTED_SHAPE",
            Self::SemanticAnalysis(_) => "AERO_SEMANTIC_ANALYSIS",
            Self::PlanNotBuilt => "AERO_PLAN_NOT_BUILT",
            Self::PlanAlreadyExtracted => "AERO_PLAN_ALREADY_EXTRACTED",
            Self::PassIndexOutOfRange { .. } => "AERO_PASS_INDEX_OUT_OF_RANGE",
            Self::Pipeline(_) => "AERO_PIPELINE_BUILD_FAILED",
            Self::Config(_) => "AERO_CONFIG_INVALID",
        }
    }

    /// Returns the severity level
    pub fn severity(&self) -> Severity {
        match self {
            Self::UnsupportedQueryShape { .. } | Self::SemanticAnalysis(_) | Self::Config(_) => {
                Severity::Reject
            }
            _ => Severity::Error,
        }
    }

    /// Returns the semantic payload for resolution failures
    pub fn semantic(&self) -> Option<&SemanticError> {
        match self {
            Self::SemanticAnalysis(e) => Some(e),
            _ => None,
        }
    }
}

/// Result type for analyzer operations
pub type AnalyzerResult<T> = Result<T, AnalyzerError>;
