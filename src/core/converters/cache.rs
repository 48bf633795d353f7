//! Cache backend URLs such as `redis://host:6379/1`.

use std::collections::BTreeMap;

use url::Url;

use super::error::ConversionError;
use crate::core::models::descriptors::CacheSettings;
use crate::core::models::value::Value;

const REDIS_BACKEND: &str = "django.core.cache.backends.redis.RedisCache";

fn backend_for(scheme: &str) -> Option<&'static str> {
    let backend = match scheme {
        "redis" | "rediss" => REDIS_BACKEND,
        "memcached" | "pymemcache" => "django.core.cache.backends.memcached.PyMemcacheCache",
        "locmem" => "django.core.cache.backends.locmem.LocMemCache",
        "dummy" => "django.core.cache.backends.dummy.DummyCache",
        "file" => "django.core.cache.backends.filebased.FileBasedCache",
        "db" => "django.core.cache.backends.db.DatabaseCache",
        _ => return None,
    };
    Some(backend)
}

pub fn to_caches(raw: &str, alias: &str) -> Result<Value, ConversionError> {
    let settings = parse_cache_url(raw)?;
    Ok(Value::Caches(BTreeMap::from([(alias.to_string(), settings)])))
}

pub fn parse_cache_url(raw: &str) -> Result<CacheSettings, ConversionError> {
    let mut url = Url::parse(raw)
        .map_err(|e| ConversionError::validation(raw, format!("is not a valid cache URL ({e})")))?;
    let backend = backend_for(url.scheme()).ok_or_else(|| {
        ConversionError::validation(
            raw,
            format!("uses unsupported cache scheme '{}'", url.scheme()),
        )
    })?;

    let host = url.host_str().unwrap_or_default().to_string();
    let location = match url.scheme() {
        "redis" | "rediss" => {
            // The database index defaults to 0 when the path does not name one.
            if matches!(url.path(), "" | "/") {
                url.set_path("/0");
            }
            url.to_string()
        }
        "memcached" | "pymemcache" => match url.port() {
            Some(port) => format!("{host}:{port}"),
            None => host,
        },
        "file" => url.path().to_string(),
        "dummy" => String::new(),
        _ => host,
    };

    Ok(CacheSettings::new(backend, location))
}
