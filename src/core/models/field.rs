use std::collections::BTreeMap;
use std::sync::Arc;

use super::descriptors::{CacheSettings, DatabaseSettings};
use super::value::Value;
use crate::core::converters::{ConversionError, Converter, DEFAULT_ALIAS};
use crate::core::traits::import_resolver::ImportResolver;

/// Which external key a field is looked up under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnvKey {
    /// The attribute name the field is declared under.
    Attribute,
    Named(String),
    /// No external lookup; only the default can satisfy the field.
    Disabled,
}

/// The declared default of a field.
///
/// A `Raw` default is converted like a looked-up string; a `Value` default
/// is published as-is.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum FieldDefault {
    #[default]
    Undefined,
    Raw(String),
    Value(Value),
}

impl From<&str> for FieldDefault {
    fn from(value: &str) -> Self {
        Self::Raw(value.to_string())
    }
}

impl From<String> for FieldDefault {
    fn from(value: String) -> Self {
        Self::Raw(value)
    }
}

impl From<Value> for FieldDefault {
    fn from(value: Value) -> Self {
        match value {
            Value::String(raw) => Self::Raw(raw),
            other => Self::Value(other),
        }
    }
}

macro_rules! structured_default {
    ($($ty:ty),*) => {
        $(impl From<$ty> for FieldDefault {
            fn from(value: $ty) -> Self {
                Self::Value(Value::from(value))
            }
        })*
    };
}

structured_default!(
    bool,
    i64,
    f64,
    serde_json::Value,
    BTreeMap<String, Value>,
    DatabaseSettings,
    CacheSettings
);

/// A declared configuration field: where to look, what to fall back to,
/// and how to convert.
#[derive(Debug, Clone)]
pub struct Field {
    env_key: EnvKey,
    default: FieldDefault,
    converter: Converter,
}

impl Field {
    pub fn new(converter: Converter) -> Self {
        Self {
            env_key: EnvKey::Attribute,
            default: FieldDefault::Undefined,
            converter,
        }
    }

    pub fn string() -> Self {
        Self::new(Converter::String)
    }

    pub fn boolean() -> Self {
        Self::new(Converter::Boolean)
    }

    pub fn integer() -> Self {
        Self::new(Converter::Integer)
    }

    pub fn positive_integer() -> Self {
        Self::new(Converter::PositiveInteger)
    }

    pub fn float() -> Self {
        Self::new(Converter::Float)
    }

    pub fn decimal() -> Self {
        Self::new(Converter::Decimal)
    }

    pub fn import_string(resolver: Arc<dyn ImportResolver>) -> Self {
        Self::new(Converter::ImportString(resolver))
    }

    pub fn list() -> Self {
        Self::new(Converter::List(None))
    }

    pub fn list_of(child: Converter) -> Self {
        Self::new(Converter::List(Some(Box::new(child))))
    }

    pub fn tuple() -> Self {
        Self::new(Converter::Tuple(None))
    }

    pub fn tuple_of(child: Converter) -> Self {
        Self::new(Converter::Tuple(Some(Box::new(child))))
    }

    pub fn set() -> Self {
        Self::new(Converter::Set(None))
    }

    pub fn set_of(child: Converter) -> Self {
        Self::new(Converter::Set(Some(Box::new(child))))
    }

    pub fn dict() -> Self {
        Self::new(Converter::Dict(None))
    }

    pub fn dict_of(child: Converter) -> Self {
        Self::new(Converter::Dict(Some(Box::new(child))))
    }

    pub fn json() -> Self {
        Self::new(Converter::Json)
    }

    pub fn email() -> Self {
        Self::new(Converter::Email)
    }

    pub fn url() -> Self {
        Self::new(Converter::Url)
    }

    pub fn ip() -> Self {
        Self::new(Converter::Ip)
    }

    pub fn regex(pattern: impl Into<String>) -> Self {
        Self::new(Converter::Regex(pattern.into()))
    }

    /// A filesystem path that must exist unless told otherwise.
    pub fn path() -> Self {
        Self::new(Converter::Path {
            check_exists: true,
            create_if_missing: false,
        })
    }

    /// Database URL field, looked up under `DATABASE_URL` by default.
    pub fn database_url() -> Self {
        Self::new(Converter::DatabaseUrl {
            conn_max_age: 0,
            alias: DEFAULT_ALIAS.to_string(),
        })
        .env_name("DATABASE_URL")
    }

    /// Cache URL field, looked up under `CACHE_URL` by default.
    pub fn cache_url() -> Self {
        Self::new(Converter::CacheUrl {
            alias: DEFAULT_ALIAS.to_string(),
        })
        .env_name("CACHE_URL")
    }

    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(&str) -> Result<Value, ConversionError> + Send + Sync + 'static,
    {
        Self::new(Converter::Custom(Arc::new(f)))
    }

    /// Look the field up under `name` instead of its attribute name.
    pub fn env_name(mut self, name: impl Into<String>) -> Self {
        self.env_key = EnvKey::Named(name.into());
        self
    }

    /// Disable external lookup; the field then needs a default.
    pub fn without_env_name(mut self) -> Self {
        self.env_key = EnvKey::Disabled;
        self
    }

    pub fn default(mut self, default: impl Into<FieldDefault>) -> Self {
        self.default = default.into();
        self
    }

    /// Default to [`Value::Null`].
    pub fn default_null(mut self) -> Self {
        self.default = FieldDefault::Value(Value::Null);
        self
    }

    /// Path fields only: whether a missing path is an error.
    pub fn check_exists(mut self, check: bool) -> Self {
        if let Converter::Path { check_exists, .. } = &mut self.converter {
            *check_exists = check;
        }
        self
    }

    /// Path fields only: create a missing directory instead of failing.
    pub fn create_if_missing(mut self, create: bool) -> Self {
        if let Converter::Path {
            create_if_missing, ..
        } = &mut self.converter
        {
            *create_if_missing = create;
        }
        self
    }

    /// Database fields only.
    pub fn conn_max_age(mut self, seconds: u64) -> Self {
        if let Converter::DatabaseUrl { conn_max_age, .. } = &mut self.converter {
            *conn_max_age = seconds;
        }
        self
    }

    /// Database and cache fields only: the key the descriptor is stored under.
    pub fn alias(mut self, name: impl Into<String>) -> Self {
        match &mut self.converter {
            Converter::DatabaseUrl { alias, .. } | Converter::CacheUrl { alias } => {
                *alias = name.into();
            }
            _ => {}
        }
        self
    }

    /// The external key for a field declared as `attribute`, if any.
    pub fn key_for<'a>(&'a self, attribute: &'a str) -> Option<&'a str> {
        match &self.env_key {
            EnvKey::Attribute => Some(attribute),
            EnvKey::Named(name) => Some(name),
            EnvKey::Disabled => None,
        }
    }

    pub fn env_key(&self) -> &EnvKey {
        &self.env_key
    }

    pub fn default_value(&self) -> &FieldDefault {
        &self.default
    }

    pub fn converter(&self) -> &Converter {
        &self.converter
    }
}
