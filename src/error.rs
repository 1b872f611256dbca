use thiserror::Error;

/// Main error type for the Reelsmith library
#[derive(Error, Debug)]
pub enum ReelError {
    #[error("Assembly error: {0}")]
    Assembly(#[from] AssemblyError),

    #[error("Generation error: {0}")]
    Generation(#[from] GenerationError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Generic error: {0}")]
    Generic(String),
}

/// Errors raised while turning a shot list into an encoded cut.
///
/// Every variant names the operation that failed so a log line is enough to
/// locate the problem.
#[derive(Error, Debug)]
pub enum AssemblyError {
    #[error("{operation}: malformed input: {reason}")]
    MalformedInput { operation: String, reason: String },

    #[error("{operation}: timeline has no edit points")]
    EmptyTimeline { operation: String },

    #[error("{operation}: source clip not found: {path}")]
    MissingSourceClip { operation: String, path: String },

    #[error("{operation}: encoder failed ({status}): {diagnostics}")]
    EncodingFailed {
        operation: String,
        status: String,
        diagnostics: String,
    },
}

/// Errors from content generators (real services or stand-ins)
#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("{service} does not handle {requested} requests")]
    UnsupportedKind { service: String, requested: String },

    #[error("{service} request is missing {field}")]
    MissingField { service: String, field: String },

    #[error("{service} failed: {reason}")]
    ServiceFailed { service: String, reason: String },
}

/// Configuration-specific errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to parse configuration file: {path}: {reason}")]
    ParseFailed { path: String, reason: String },

    #[error("Invalid configuration value: {key} = {value}")]
    InvalidValue { key: String, value: String },

    #[error("Configuration file not found: {path}")]
    FileNotFound { path: String },
}

/// Stable classification of a [`ReelError`], mostly useful to callers that
/// branch on failure type without matching nested enums.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    MalformedInput,
    EmptyTimeline,
    MissingSourceClip,
    EncodingFailed,
    Generation,
    Config,
    Io,
    Other,
}

/// Convenience type alias for Results using ReelError
pub type Result<T> = std::result::Result<T, ReelError>;

impl ReelError {
    /// Create a generic error with a custom message
    pub fn generic<S: Into<String>>(message: S) -> Self {
        Self::Generic(message.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Assembly(AssemblyError::MalformedInput { .. }) => ErrorKind::MalformedInput,
            Self::Assembly(AssemblyError::EmptyTimeline { .. }) => ErrorKind::EmptyTimeline,
            Self::Assembly(AssemblyError::MissingSourceClip { .. }) => ErrorKind::MissingSourceClip,
            Self::Assembly(AssemblyError::EncodingFailed { .. }) => ErrorKind::EncodingFailed,
            Self::Generation(_) => ErrorKind::Generation,
            Self::Config(_) => ErrorKind::Config,
            Self::Io(_) => ErrorKind::Io,
            Self::Json(_) => ErrorKind::Other,
            Self::Generic(_) => ErrorKind::Other,
        }
    }

    /// Get a user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            Self::Assembly(AssemblyError::MissingSourceClip { path, .. }) => {
                format!("Source clip '{}' does not exist. Generate or copy the clip before assembling.", path)
            }
            Self::Assembly(AssemblyError::EmptyTimeline { .. }) => {
                "The shot list has no shots, so there is nothing to assemble.".to_string()
            }
            Self::Assembly(AssemblyError::EncodingFailed { operation, status, diagnostics }) => {
                format!("{} failed with {}. Encoder output:\n{}", operation, status, diagnostics.trim_end())
            }
            Self::Config(ConfigError::FileNotFound { path }) => {
                format!("Configuration file '{}' not found.", path)
            }
            _ => self.to_string(),
        }
    }
}

impl AssemblyError {
    pub fn malformed<O: Into<String>, R: Into<String>>(operation: O, reason: R) -> Self {
        Self::MalformedInput {
            operation: operation.into(),
            reason: reason.into(),
        }
    }
}
