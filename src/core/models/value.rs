use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use bigdecimal::BigDecimal;
use serde::{Serialize, Serializer};

use super::descriptors::{CacheSettings, DatabaseSettings};

/// A resolved, typed configuration value.
///
/// Converters produce these from raw strings; structured defaults are
/// stored as-is. `Null` is a legitimate value (a `None` default), distinct
/// from a field that has no value at all.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Decimal(BigDecimal),
    String(String),
    Path(PathBuf),
    List(Vec<Value>),
    Tuple(Vec<Value>),
    /// Unordered collection without duplicates.
    Set(Vec<Value>),
    Dict(BTreeMap<String, Value>),
    Json(serde_json::Value),
    /// A single database descriptor, before it is keyed by alias.
    Database(DatabaseSettings),
    Databases(BTreeMap<String, DatabaseSettings>),
    /// A single cache descriptor, before it is keyed by alias.
    Cache(CacheSettings),
    Caches(BTreeMap<String, CacheSettings>),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Floats, and integers widened to floats.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Float(f) => Some(*f),
            Self::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_decimal(&self) -> Option<&BigDecimal> {
        match self {
            Self::Decimal(d) => Some(d),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_path(&self) -> Option<&Path> {
        match self {
            Self::Path(p) => Some(p),
            _ => None,
        }
    }

    /// Items of a list, tuple or set.
    pub fn as_slice(&self) -> Option<&[Value]> {
        match self {
            Self::List(items) | Self::Tuple(items) | Self::Set(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_dict(&self) -> Option<&BTreeMap<String, Value>> {
        match self {
            Self::Dict(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_json(&self) -> Option<&serde_json::Value> {
        match self {
            Self::Json(json) => Some(json),
            _ => None,
        }
    }

    pub fn as_databases(&self) -> Option<&BTreeMap<String, DatabaseSettings>> {
        match self {
            Self::Databases(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_caches(&self) -> Option<&BTreeMap<String, CacheSettings>> {
        match self {
            Self::Caches(map) => Some(map),
            _ => None,
        }
    }

    /// Convert into a plain JSON value, e.g. for printing.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Null => serializer.serialize_none(),
            Self::Bool(b) => serializer.serialize_bool(*b),
            Self::Int(i) => serializer.serialize_i64(*i),
            Self::Float(f) => serializer.serialize_f64(*f),
            Self::Decimal(d) => serializer.serialize_str(&d.to_string()),
            Self::String(s) => serializer.serialize_str(s),
            Self::Path(p) => serializer.serialize_str(&p.to_string_lossy()),
            Self::List(items) | Self::Tuple(items) | Self::Set(items) => items.serialize(serializer),
            Self::Dict(map) => map.serialize(serializer),
            Self::Json(json) => json.serialize(serializer),
            Self::Database(settings) => settings.serialize(serializer),
            Self::Databases(map) => map.serialize(serializer),
            Self::Cache(settings) => settings.serialize(serializer),
            Self::Caches(map) => map.serialize(serializer),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(s) => f.write_str(s),
            Self::Path(p) => write!(f, "{}", p.display()),
            Self::Decimal(d) => write!(f, "{d}"),
            other => write!(f, "{}", other.to_json()),
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<BigDecimal> for Value {
    fn from(value: BigDecimal) -> Self {
        Self::Decimal(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<PathBuf> for Value {
    fn from(value: PathBuf) -> Self {
        Self::Path(value)
    }
}

impl From<BTreeMap<String, Value>> for Value {
    fn from(value: BTreeMap<String, Value>) -> Self {
        Self::Dict(value)
    }
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        Self::Json(value)
    }
}

impl From<DatabaseSettings> for Value {
    fn from(value: DatabaseSettings) -> Self {
        Self::Database(value)
    }
}

impl From<CacheSettings> for Value {
    fn from(value: CacheSettings) -> Self {
        Self::Cache(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}
