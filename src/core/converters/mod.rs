//! The value coercion engine.
//!
//! A [`Converter`] turns one raw string into a typed [`Value`]. Converters
//! are stateless; collection converters delegate each element to a child
//! converter passed down as a function.

pub mod cache;
pub mod collections;
pub mod database;
mod error;
pub mod path;
pub mod scalar;
pub mod validators;

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

pub use error::ConversionError;

use crate::core::models::value::Value;
use crate::core::traits::import_resolver::ImportResolver;

/// Signature of a caller-supplied conversion function.
pub type ConvertFn = dyn Fn(&str) -> Result<Value, ConversionError> + Send + Sync;

pub const DEFAULT_ALIAS: &str = "default";

/// Which coercion applies to a field, with its options.
#[derive(Clone)]
pub enum Converter {
    String,
    Boolean,
    Integer,
    PositiveInteger,
    Float,
    Decimal,
    ImportString(Arc<dyn ImportResolver>),
    List(Option<Box<Converter>>),
    Tuple(Option<Box<Converter>>),
    Set(Option<Box<Converter>>),
    Dict(Option<Box<Converter>>),
    Json,
    Email,
    Url,
    Ip,
    Regex(String),
    Path {
        check_exists: bool,
        create_if_missing: bool,
    },
    DatabaseUrl {
        conn_max_age: u64,
        alias: String,
    },
    CacheUrl {
        alias: String,
    },
    Custom(Arc<ConvertFn>),
}

impl Converter {
    /// Convert a raw string into this converter's value type.
    pub fn convert(&self, raw: &str) -> Result<Value, ConversionError> {
        match self {
            Self::String => scalar::to_string(raw),
            Self::Boolean => scalar::to_bool(raw),
            Self::Integer => scalar::to_int(raw),
            Self::PositiveInteger => scalar::to_positive_int(raw),
            Self::Float => scalar::to_float(raw),
            Self::Decimal => scalar::to_decimal(raw),
            Self::ImportString(resolver) => validators::importable(raw, resolver.as_ref()),
            Self::List(child) => {
                collections::split_items(raw, |token| Self::child(child, token)).map(Value::List)
            }
            Self::Tuple(child) => {
                collections::split_items(raw, |token| Self::child(child, token)).map(Value::Tuple)
            }
            Self::Set(child) => {
                collections::split_unique(raw, |token| Self::child(child, token)).map(Value::Set)
            }
            Self::Dict(child) => {
                collections::split_pairs(raw, |token| Self::child(child, token)).map(Value::Dict)
            }
            Self::Json => validators::to_json(raw),
            Self::Email => validators::to_email(raw),
            Self::Url => validators::to_url(raw),
            Self::Ip => validators::to_ip(raw),
            Self::Regex(pattern) => validators::matching(raw, pattern),
            Self::Path {
                check_exists,
                create_if_missing,
            } => path::to_path(raw, *check_exists, *create_if_missing),
            Self::DatabaseUrl {
                conn_max_age,
                alias,
            } => database::to_databases(raw, *conn_max_age, alias),
            Self::CacheUrl { alias } => cache::to_caches(raw, alias),
            Self::Custom(f) => f(raw),
        }
    }

    /// Shape a structured default the way converted values are shaped.
    ///
    /// Only descriptor converters change anything: a single database or
    /// cache descriptor is keyed by the converter's alias. A plain mapping
    /// (`{"ENGINE": ..., "NAME": ...}`) is keyed the same way and kept as
    /// written, missing keys included.
    pub fn publish_default(&self, value: Value) -> Value {
        match (self, value) {
            (Self::DatabaseUrl { alias, .. }, Value::Database(settings)) => {
                Value::Databases(BTreeMap::from([(alias.clone(), settings)]))
            }
            (Self::CacheUrl { alias }, Value::Cache(settings)) => {
                Value::Caches(BTreeMap::from([(alias.clone(), settings)]))
            }
            (
                Self::DatabaseUrl { alias, .. } | Self::CacheUrl { alias },
                Value::Dict(mapping),
            ) => Value::Dict(BTreeMap::from([(alias.clone(), Value::Dict(mapping))])),
            (_, value) => value,
        }
    }

    /// Short name used in logs and schema files.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Boolean => "boolean",
            Self::Integer => "integer",
            Self::PositiveInteger => "positive_integer",
            Self::Float => "float",
            Self::Decimal => "decimal",
            Self::ImportString(_) => "import_string",
            Self::List(_) => "list",
            Self::Tuple(_) => "tuple",
            Self::Set(_) => "set",
            Self::Dict(_) => "dict",
            Self::Json => "json",
            Self::Email => "email",
            Self::Url => "url",
            Self::Ip => "ip",
            Self::Regex(_) => "regex",
            Self::Path { .. } => "path",
            Self::DatabaseUrl { .. } => "database_url",
            Self::CacheUrl { .. } => "cache_url",
            Self::Custom(_) => "custom",
        }
    }

    fn child(child: &Option<Box<Converter>>, token: &str) -> Result<Value, ConversionError> {
        match child {
            Some(converter) => converter.convert(token),
            None => scalar::to_string(token),
        }
    }
}

impl fmt::Debug for Converter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::List(child) | Self::Tuple(child) | Self::Set(child) | Self::Dict(child) => f
                .debug_tuple(self.kind())
                .field(&child.as_ref().map(|c| c.kind()).unwrap_or("string"))
                .finish(),
            Self::Regex(pattern) => f.debug_tuple("regex").field(pattern).finish(),
            Self::Path {
                check_exists,
                create_if_missing,
            } => f
                .debug_struct("path")
                .field("check_exists", check_exists)
                .field("create_if_missing", create_if_missing)
                .finish(),
            Self::DatabaseUrl {
                conn_max_age,
                alias,
            } => f
                .debug_struct("database_url")
                .field("conn_max_age", conn_max_age)
                .field("alias", alias)
                .finish(),
            Self::CacheUrl { alias } => f.debug_struct("cache_url").field("alias", alias).finish(),
            other => f.write_str(other.kind()),
        }
    }
}
