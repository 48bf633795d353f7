//! Typed configuration environments resolved from the process environment
//! and `.env` files.
//!
//! An [`Environment`] declares [`Field`]s, each with a converter that turns
//! the raw string found externally (or the declared default) into a typed
//! [`Value`]. Environments derive from a parent and replace single fields.
//!
//! ```no_run
//! use envclass::{Environment, Field};
//!
//! let common = Environment::builder("Common")
//!     .field("DEBUG", Field::boolean().default(false))
//!     .field("DATABASES", Field::database_url())
//!     .build()?;
//!
//! let test = Environment::builder("Test")
//!     .parent(common)
//!     .field("DEBUG", Field::boolean().default(true))
//!     .build()?;
//!
//! assert_eq!(test.get("DEBUG").and_then(|v| v.as_bool()), Some(true));
//! # Ok::<(), envclass::EnvError>(())
//! ```

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;

pub use adapters::imports::registry::ImportRegistry;
pub use adapters::parsers::dotenv_parser::DotenvParser;
pub use adapters::sources::dotenv_file::DotenvFileSource;
pub use adapters::sources::memory::{MapEnviron, StaticDotenv};
pub use adapters::sources::process::ProcessEnviron;
pub use config::schema::Schema;
pub use core::converters::{ConversionError, Converter};
pub use core::errors::{EnvError, MissingCause, Result};
pub use core::models::descriptors::{CacheSettings, DatabaseSettings};
pub use core::models::environment::Environment;
pub use core::models::field::{EnvKey, Field, FieldDefault};
pub use core::models::overrides::{Overrides, Values};
pub use core::models::value::Value;
pub use core::services::env_resolver::{EnvironmentBuilder, Sources};
pub use core::traits::dotenv_source::{DotenvMap, DotenvSource};
pub use core::traits::environ::Environ;
pub use core::traits::import_resolver::ImportResolver;
