//! `scheme://[user[:password]@]host[:port]/name` database URLs.

use std::borrow::Cow;
use std::collections::BTreeMap;

use url::Url;

use super::error::ConversionError;
use crate::core::models::descriptors::DatabaseSettings;
use crate::core::models::value::Value;

/// Engine identifier for a URL scheme.
fn engine_for(scheme: &str) -> Option<&'static str> {
    let engine = match scheme {
        "postgres" | "postgresql" | "pgsql" => "django.db.backends.postgresql",
        "postgis" => "django.contrib.gis.db.backends.postgis",
        "mysql" => "django.db.backends.mysql",
        "mysqlgis" => "django.contrib.gis.db.backends.mysql",
        "oracle" => "django.db.backends.oracle",
        "sqlite" => "django.db.backends.sqlite3",
        "spatialite" => "django.contrib.gis.db.backends.spatialite",
        _ => return None,
    };
    Some(engine)
}

/// Parse `raw` and key the resulting settings by `alias`.
pub fn to_databases(raw: &str, conn_max_age: u64, alias: &str) -> Result<Value, ConversionError> {
    let settings = parse_database_url(raw, conn_max_age)?;
    Ok(Value::Databases(BTreeMap::from([(alias.to_string(), settings)])))
}

pub fn parse_database_url(raw: &str, conn_max_age: u64) -> Result<DatabaseSettings, ConversionError> {
    let (scheme, rest) = raw
        .split_once("://")
        .ok_or_else(|| ConversionError::validation(raw, "is not a database URL"))?;
    let engine = engine_for(scheme).ok_or_else(|| {
        ConversionError::validation(raw, format!("uses unsupported database scheme '{scheme}'"))
    })?;

    let mut settings = DatabaseSettings::new(engine);
    settings.conn_max_age = conn_max_age;

    if matches!(scheme, "sqlite" | "spatialite") {
        settings.name = file_database_name(rest);
        return Ok(settings);
    }

    let url = Url::parse(raw).map_err(|e| {
        ConversionError::validation(raw, format!("is not a valid database URL ({e})"))
    })?;
    let path = url.path();
    settings.name = decode(path.strip_prefix('/').unwrap_or(path));
    settings.user = decode(url.username());
    settings.password = url.password().map(decode).unwrap_or_default();
    settings.host = url.host_str().map(decode).unwrap_or_default();
    settings.port = url.port();
    settings.options = url
        .query_pairs()
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();

    Ok(settings)
}

/// File databases carry no host or credentials; the path is the name.
///
/// `sqlite:////abs/file.db` names `/abs/file.db`, `sqlite:///file.db` names
/// `file.db`, and an empty path means an in-memory database.
fn file_database_name(rest: &str) -> String {
    let path = rest.split_once('?').map_or(rest, |(path, _)| path);
    match path {
        "" | "/" | ":memory:" | "/:memory:" => ":memory:".to_string(),
        _ => decode(path.strip_prefix('/').unwrap_or(path)),
    }
}

fn decode(s: &str) -> String {
    urlencoding::decode(s)
        .map(Cow::into_owned)
        .unwrap_or_else(|_| s.to_string())
}
