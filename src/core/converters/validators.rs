//! Converters that validate a string without changing it.

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::sync::LazyLock;

use regex::Regex;

use super::error::ConversionError;
use crate::core::models::value::Value;
use crate::core::traits::import_resolver::ImportResolver;

const URL_SCHEMES: [&str; 4] = ["http", "https", "ftp", "ftps"];

/// Domains accepted in an email address without a dot.
const EMAIL_DOMAIN_ALLOWLIST: [&str; 1] = ["localhost"];

static EMAIL_USER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^[-!#$%&'*+/=?^_`{}|~0-9a-z]+(\.[-!#$%&'*+/=?^_`{}|~0-9a-z]+)*$")
        .expect("email user pattern is valid")
});

static EMAIL_DOMAIN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^((?:[a-z0-9](?:[a-z0-9-]{0,61}[a-z0-9])?\.)+)(?:[a-z0-9-]{2,63})$")
        .expect("email domain pattern is valid")
});

pub fn to_json(raw: &str) -> Result<Value, ConversionError> {
    Ok(Value::Json(serde_json::from_str(raw)?))
}

pub fn to_email(raw: &str) -> Result<Value, ConversionError> {
    let invalid = || ConversionError::validation(raw, "is not a valid email address");
    let (user, domain) = raw.rsplit_once('@').ok_or_else(invalid)?;
    if !EMAIL_USER.is_match(user) || !valid_email_domain(domain) {
        return Err(invalid());
    }
    Ok(Value::String(raw.to_string()))
}

/// A dotted host name, an allowlisted name, or an address literal such as
/// `[127.0.0.1]` or `[IPv6:::1]`.
fn valid_email_domain(domain: &str) -> bool {
    if EMAIL_DOMAIN_ALLOWLIST
        .iter()
        .any(|allowed| allowed.eq_ignore_ascii_case(domain))
    {
        return true;
    }
    if let Some(literal) = domain.strip_prefix('[').and_then(|d| d.strip_suffix(']')) {
        return match literal.strip_prefix("IPv6:") {
            Some(v6) => v6.parse::<Ipv6Addr>().is_ok(),
            None => literal.parse::<Ipv4Addr>().is_ok(),
        };
    }
    EMAIL_DOMAIN.is_match(domain)
}

/// Accept only absolute URLs with a supported scheme and a host.
pub fn to_url(raw: &str) -> Result<Value, ConversionError> {
    let invalid = || ConversionError::validation(raw, "is not a valid URL");
    let parsed = url::Url::parse(raw).map_err(|_| invalid())?;
    if !URL_SCHEMES.contains(&parsed.scheme()) || parsed.host_str().is_none_or(str::is_empty) {
        return Err(invalid());
    }
    Ok(Value::String(raw.to_string()))
}

pub fn to_ip(raw: &str) -> Result<Value, ConversionError> {
    raw.parse::<IpAddr>()
        .map_err(|_| ConversionError::validation(raw, "is not a valid IPv4 or IPv6 address"))?;
    Ok(Value::String(raw.to_string()))
}

/// Require `pattern` to match somewhere in `raw`.
///
/// The pattern is compiled on every call, so a malformed pattern surfaces
/// while the field is resolved rather than when it is declared.
pub fn matching(raw: &str, pattern: &str) -> Result<Value, ConversionError> {
    let regex = Regex::new(pattern)?;
    if !regex.is_match(raw) {
        return Err(ConversionError::validation(
            raw,
            format!("does not match the pattern '{pattern}'"),
        ));
    }
    Ok(Value::String(raw.to_string()))
}

pub fn importable(raw: &str, resolver: &dyn ImportResolver) -> Result<Value, ConversionError> {
    resolver
        .resolve(raw)
        .map_err(|reason| ConversionError::Import {
            path: raw.to_string(),
            reason,
        })?;
    Ok(Value::String(raw.to_string()))
}
