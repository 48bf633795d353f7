use std::collections::BTreeMap;

use serde::{Serialize, Serializer};

/// Connection settings for one database alias.
///
/// Serializes to the upper-case mapping shape settings loaders expect
/// (`ENGINE`, `NAME`, `HOST`, ...). A missing port serializes as `""`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct DatabaseSettings {
    pub engine: String,
    pub name: String,
    pub user: String,
    pub password: String,
    pub host: String,
    #[serde(serialize_with = "port_or_empty")]
    pub port: Option<u16>,
    pub conn_max_age: u64,
    pub conn_health_checks: bool,
    pub disable_server_side_cursors: bool,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub options: BTreeMap<String, String>,
}

impl DatabaseSettings {
    /// Settings for `engine` with every other field at its fixed default.
    pub fn new(engine: impl Into<String>) -> Self {
        Self {
            engine: engine.into(),
            name: String::new(),
            user: String::new(),
            password: String::new(),
            host: String::new(),
            port: None,
            conn_max_age: 0,
            conn_health_checks: false,
            disable_server_side_cursors: false,
            options: BTreeMap::new(),
        }
    }
}

/// Backend settings for one cache alias.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct CacheSettings {
    pub backend: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub location: String,
}

impl CacheSettings {
    pub fn new(backend: impl Into<String>, location: impl Into<String>) -> Self {
        Self {
            backend: backend.into(),
            location: location.into(),
        }
    }
}

fn port_or_empty<S: Serializer>(port: &Option<u16>, serializer: S) -> Result<S::Ok, S::Error> {
    match port {
        Some(port) => serializer.serialize_u16(*port),
        None => serializer.serialize_str(""),
    }
}
