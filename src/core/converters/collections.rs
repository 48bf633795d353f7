//! Collection converters.
//!
//! Each function takes the converter for its elements as an argument, so a
//! list of integers is `split_items(raw, scalar::to_int)`.

use std::collections::BTreeMap;

use super::error::ConversionError;
use crate::core::models::value::Value;

const ITEM_SEPARATOR: char = ',';
const PAIR_SEPARATOR: char = ';';
const KEY_VALUE_SEPARATOR: char = '=';

/// Split `raw` on `,`, trim every token and convert it with `child`.
///
/// Empty input yields no items and a single trailing separator is ignored,
/// so `"a,b,"` and `"a,b"` are equivalent.
pub fn split_items<F>(raw: &str, child: F) -> Result<Vec<Value>, ConversionError>
where
    F: Fn(&str) -> Result<Value, ConversionError>,
{
    tokens(raw, ITEM_SEPARATOR)
        .into_iter()
        .map(|token| child(token))
        .collect()
}

/// Like [`split_items`], dropping duplicates after conversion.
pub fn split_unique<F>(raw: &str, child: F) -> Result<Vec<Value>, ConversionError>
where
    F: Fn(&str) -> Result<Value, ConversionError>,
{
    let mut unique: Vec<Value> = Vec::new();
    for item in split_items(raw, child)? {
        if !unique.contains(&item) {
            unique.push(item);
        }
    }
    Ok(unique)
}

/// Parse `k1=v1;k2=v2` into a map, converting each value with `child`.
///
/// Pairs split on the first `=`; keys and values are trimmed. A later
/// duplicate key replaces the earlier one.
pub fn split_pairs<F>(raw: &str, child: F) -> Result<BTreeMap<String, Value>, ConversionError>
where
    F: Fn(&str) -> Result<Value, ConversionError>,
{
    let mut map = BTreeMap::new();
    for pair in tokens(raw, PAIR_SEPARATOR) {
        let Some((key, value)) = pair.split_once(KEY_VALUE_SEPARATOR) else {
            return Err(ConversionError::KeyValueSplit {
                pair: pair.to_string(),
            });
        };
        map.insert(key.trim().to_string(), child(value.trim())?);
    }
    Ok(map)
}

fn tokens(raw: &str, separator: char) -> Vec<&str> {
    if raw.trim().is_empty() {
        return Vec::new();
    }
    let mut parts: Vec<&str> = raw.split(separator).map(str::trim).collect();
    if parts.len() > 1 && parts.last().is_some_and(|last| last.is_empty()) {
        parts.pop();
    }
    parts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::converters::scalar;

    fn strings(items: &[&str]) -> Vec<Value> {
        items.iter().map(|s| Value::from(*s)).collect()
    }

    #[test]
    fn items_are_trimmed() {
        let items = split_items("foo, bar, baz ", scalar::to_string).unwrap();
        assert_eq!(items, strings(&["foo", "bar", "baz"]));
    }

    #[test]
    fn trailing_separator_is_ignored() {
        let with = split_items("foo,bar,baz,", scalar::to_string).unwrap();
        let without = split_items("foo,bar,baz", scalar::to_string).unwrap();
        assert_eq!(with, without);
    }

    #[test]
    fn empty_input_is_empty_collection() {
        assert!(split_items("", scalar::to_string).unwrap().is_empty());
        assert!(split_pairs("", scalar::to_string).unwrap().is_empty());
    }

    #[test]
    fn single_item() {
        assert_eq!(
            split_items("foo", scalar::to_string).unwrap(),
            strings(&["foo"])
        );
    }

    #[test]
    fn items_use_child_converter() {
        let items = split_items("1,-2,300_000", scalar::to_int).unwrap();
        assert_eq!(items, vec![Value::Int(1), Value::Int(-2), Value::Int(300_000)]);
    }

    #[test]
    fn child_failure_propagates() {
        assert!(split_items("1,two", scalar::to_int).is_err());
    }

    #[test]
    fn unique_drops_duplicates() {
        let items = split_unique("a,b,a", scalar::to_string).unwrap();
        assert_eq!(items, strings(&["a", "b"]));
    }

    #[test]
    fn pairs_parse_and_trim() {
        let map = split_pairs("foo=1; bar = 2; baz=3 ", scalar::to_string).unwrap();
        assert_eq!(map.len(), 3);
        assert_eq!(map["bar"], Value::from("2"));
        assert_eq!(map["baz"], Value::from("3"));
    }

    #[test]
    fn pairs_allow_trailing_separator() {
        let map = split_pairs("foo=1;bar=2;baz=3;", scalar::to_string).unwrap();
        assert_eq!(map.len(), 3);
    }

    #[test]
    fn pairs_split_on_first_equals() {
        let map = split_pairs("url=a=b", scalar::to_string).unwrap();
        assert_eq!(map["url"], Value::from("a=b"));
    }

    #[test]
    fn pair_without_equals_fails() {
        let err = split_pairs("foo=1;bar2", scalar::to_string).unwrap_err();
        assert_eq!(err.to_string(), "Cannot split key-value pair from 'bar2'");
    }

    #[test]
    fn pairs_use_child_converter() {
        let map = split_pairs("foo=1;bar=-2;baz=300_000", scalar::to_int).unwrap();
        assert_eq!(map["baz"], Value::Int(300_000));
        assert_eq!(map["bar"], Value::Int(-2));
    }
}
