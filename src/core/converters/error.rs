use std::path::PathBuf;

/// Failures raised by a single converter.
///
/// Converters know nothing about fields or environments; the resolver wraps
/// these into [`EnvError::Conversion`](crate::core::errors::EnvError) with that
/// context. Every message that is not a wrapped parser error quotes the raw
/// value it rejected.
#[derive(Debug, thiserror::Error)]
pub enum ConversionError {
    #[error("Cannot interpret '{value}' as a boolean value")]
    InvalidBoolean { value: String },

    #[error("invalid literal for an integer: '{value}'")]
    InvalidInteger { value: String },

    #[error("integer '{value}' does not fit in a signed 64-bit value")]
    IntegerOutOfRange { value: String },

    #[error("'{value}' is not a positive integer")]
    NegativeInteger { value: String },

    #[error("could not convert '{value}' to a float")]
    InvalidFloat { value: String },

    #[error("invalid decimal literal '{value}': {source}")]
    InvalidDecimal {
        value: String,
        #[source]
        source: bigdecimal::ParseBigDecimalError,
    },

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Cannot import '{path}': {reason}")]
    Import { path: String, reason: String },

    #[error("Cannot split key-value pair from '{pair}'")]
    KeyValueSplit { pair: String },

    #[error("Path '{}' does not exist", path.display())]
    PathNotFound { path: PathBuf },

    #[error("Cannot create directory '{}': {source}", path.display())]
    CreateDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid regular expression: {0}")]
    RegexCompile(#[from] regex::Error),

    #[error("'{value}' {message}")]
    Validation { value: String, message: String },

    #[error("{0}")]
    Custom(String),
}

impl ConversionError {
    pub(crate) fn validation(value: &str, message: impl Into<String>) -> Self {
        Self::Validation {
            value: value.to_string(),
            message: message.into(),
        }
    }
}
