use std::fmt;
use std::path::PathBuf;

use crate::core::converters::ConversionError;

/// Why a field could not be given a value.
///
/// The wording of each cause is part of the error message users grep for,
/// so it stays stable across releases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingCause {
    /// A dotenv mapping was consulted but had no entry for the field.
    NotInDotenv,
    /// Dotenv lookup is disabled and no default was declared.
    NoDotenvPath,
    /// Dotenv lookup is disabled and the process environment had no entry.
    NotInEnviron,
}

impl fmt::Display for MissingCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotInDotenv => {
                f.write_str("not defined in the .env file and value does not have a default")
            }
            Self::NoDotenvPath => f.write_str(
                "needs a default value since environment does not define a `dotenv_path`",
            ),
            Self::NotInEnviron => f.write_str(
                "not set in the process environment and value does not have a default",
            ),
        }
    }
}

/// All domain errors raised while building environment definitions.
///
/// Each variant carries the field and environment names so a failing
/// definition can be located without a debugger.
#[derive(Debug, thiserror::Error)]
pub enum EnvError {
    #[error("Value '{field}' in environment '{environment}' {cause}")]
    MissingValue {
        field: String,
        environment: String,
        cause: MissingCause,
    },

    #[error("Invalid value for '{field}' in environment '{environment}': {source}")]
    Conversion {
        field: String,
        environment: String,
        #[source]
        source: ConversionError,
    },

    #[error("Setup hook failed for environment '{environment}': {detail}")]
    Setup { environment: String, detail: String },

    #[error(
        "Failed to parse .env file {path}: {detail}\n\n  \
         Expected format: KEY=value (one per line).\n  \
         Comments (#) and blank lines are allowed."
    )]
    Dotenv { path: PathBuf, detail: String },

    #[error(
        "Environment '{name}' not found\n\n  \
         Available environments: {available}\n  \
         Check the [environments] table of the schema file."
    )]
    EnvironmentNotFound { name: String, available: String },

    #[error(
        "Environment inheritance loops back on itself: {chain}\n\n  \
         Every `inherits` chain has to end at an environment that inherits nothing.\n  \
         Remove one `inherits` key along the loop in the schema file."
    )]
    CircularInheritance { chain: String },

    #[error("Invalid schema: {detail}")]
    InvalidSchema { detail: String },

    #[error("{failed} environment(s) failed to resolve")]
    CheckFailed { failed: usize },

    #[error("Failed to serialize values: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl EnvError {
    /// Attach field and environment context to a converter failure.
    pub(crate) fn conversion(field: &str, environment: &str, source: ConversionError) -> Self {
        Self::Conversion {
            field: field.to_string(),
            environment: environment.to_string(),
            source,
        }
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, EnvError>;
