use thiserror::Error;

/// Structured error context for better error handling and debugging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorContext {
    /// Field path or configuration key that caused the error (e.g., "hardware.tokens_per_second", "models[2].context_length")
    pub field_path: Option<String>,
    /// Additional context about the error (e.g., expected range, actual value)
    pub details: Option<String>,
    /// Source of the error (e.g., "profile_catalog", "form_resolver")
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

/// Which kind of profile a lookup or construction concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProfileKind {
    Hardware,
    DataCenter,
    Model,
}

impl std::fmt::Display for ProfileKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ProfileKind::Hardware => "hardware",
            ProfileKind::DataCenter => "data center",
            ProfileKind::Model => "model",
        };
        f.write_str(s)
    }
}

/// Unified error type for the estimation engine.
///
/// Range violations are not errors here; they are collected in a
/// [`crate::emissions::ValidationReport`] instead of aborting the call.
#[derive(Debug, Error)]
pub enum Error {
    #[error("{kind} profile not found: {id}")]
    ProfileNotFound { kind: ProfileKind, id: String },

    #[error("Invalid {kind} profile '{id}': {reason}")]
    InvalidProfile {
        kind: ProfileKind,
        id: String,
        reason: String,
    },

    #[error("Configuration error: {message}{}", format_context(.context))]
    Configuration {
        message: String,
        context: ErrorContext,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("YAML syntax error: {0}")]
    Yaml(#[from] serde_yaml::Error),
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
    pub fn profile_not_found(kind: ProfileKind, id: impl Into<String>) -> Self {
        Error::ProfileNotFound {
            kind,
            id: id.into(),
        }
    }

    pub fn invalid_profile(
        kind: ProfileKind,
        id: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Error::InvalidProfile {
            kind,
            id: id.into(),
            reason: reason.into(),
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
            Error::Configuration { context, .. } => Some(context),
            _ => None,
        }
    }

    /// True for errors caused by missing or malformed profile configuration.
    pub fn is_profile_error(&self) -> bool {
        matches!(
            self,
            Error::ProfileNotFound { .. } | Error::InvalidProfile { .. }
        )
    }
}
