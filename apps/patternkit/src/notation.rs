//! # JSON Notation
//!
//! Decodes JSON documents into passables.
//!
//! Plain JSON maps directly: `null`, booleans, numbers, strings, arrays
//! (copyArray) and objects (copyRecord). An object with a single
//! `#`-prefixed property denotes any other value:
//!
//! | Notation                         | Value                      |
//! |----------------------------------|----------------------------|
//! | `{"#undefined": null}`           | `undefined`                |
//! | `{"#bigint": "123"}`             | `123n`                     |
//! | `{"#number": "NaN"}`             | `NaN`, `Infinity`, `-Infinity` |
//! | `{"#symbol": "name"}`            | passable symbol            |
//! | `{"#remotable": "iface"}`        | fresh remotable            |
//! | `{"#promise": null}`             | fresh promise              |
//! | `{"#error": "message"}`          | passable error             |
//! | `{"#set": [..]}`                 | copySet                    |
//! | `{"#bag": [[key, "count"], ..]}` | copyBag                    |
//! | `{"#map": [[key, value], ..]}`   | copyMap                    |
//!
//! `{"#tag": "...", "payload": ...}` denotes a tagged value, so matchers can
//! be written directly, e.g. `{"#tag": "match:kind", "payload": "string"}`.

use crate::CliError;
use num_bigint::BigInt;
use patternkit_core::{Passable, make_copy_bag, make_copy_map, make_copy_set};
use serde_json::{Map, Value};
use std::path::Path;

/// Maximum notation file size (16 MiB).
pub const MAX_NOTATION_FILE_SIZE: u64 = 16 * 1024 * 1024;

/// Read and decode a notation file.
pub fn read_file(path: &Path) -> Result<Passable, CliError> {
    let metadata = std::fs::metadata(path)
        .map_err(|e| CliError::Io(format!("Cannot read {}: {}", path.display(), e)))?;
    if !metadata.is_file() {
        return Err(CliError::Io(format!("{} is not a regular file", path.display())));
    }
    if metadata.len() > MAX_NOTATION_FILE_SIZE {
        return Err(CliError::Io(format!(
            "File size {} bytes exceeds maximum allowed {} bytes",
            metadata.len(),
            MAX_NOTATION_FILE_SIZE
        )));
    }
    let contents =
        std::fs::read(path).map_err(|e| CliError::Io(format!("Cannot read {}: {}", path.display(), e)))?;
    decode_slice(&contents)
}

/// Decode notation from JSON bytes.
pub fn decode_slice(bytes: &[u8]) -> Result<Passable, CliError> {
    let value: Value = serde_json::from_slice(bytes).map_err(|e| CliError::Notation(e.to_string()))?;
    decode(&value)
}

/// Decode one JSON value.
pub fn decode(value: &Value) -> Result<Passable, CliError> {
    match value {
        Value::Null => Ok(Passable::Null),
        Value::Bool(b) => Ok(Passable::Boolean(*b)),
        Value::Number(n) => n
            .as_f64()
            .map(Passable::number)
            .ok_or_else(|| CliError::Notation(format!("number out of range: {n}"))),
        Value::String(s) => Ok(Passable::string(s.as_str())),
        Value::Array(items) => Ok(Passable::array(decode_all(items)?)),
        Value::Object(map) => decode_object(map),
    }
}

fn decode_all(items: &[Value]) -> Result<Vec<Passable>, CliError> {
    items.iter().map(decode).collect()
}

fn decode_object(map: &Map<String, Value>) -> Result<Passable, CliError> {
    if let Some(tag) = map.get("#tag") {
        let (Some(tag), Some(payload), 2) = (tag.as_str(), map.get("payload"), map.len()) else {
            return Err(CliError::Notation(format!(
                "tagged notation needs a string \"#tag\" and a \"payload\": {}",
                Value::Object(map.clone())
            )));
        };
        return Ok(Passable::tagged(tag, decode(payload)?));
    }

    let mut entries = map.iter();
    if let (Some((name, body)), None) = (entries.next(), entries.next()) {
        if let Some(form) = name.strip_prefix('#') {
            return decode_form(form, body);
        }
    }

    let mut fields = Vec::with_capacity(map.len());
    for (name, value) in map {
        if name.starts_with('#') {
            return Err(CliError::Notation(format!("unexpected notation property {name:?} in record")));
        }
        fields.push((name.as_str(), decode(value)?));
    }
    Ok(Passable::record(fields))
}

fn decode_form(form: &str, body: &Value) -> Result<Passable, CliError> {
    match (form, body) {
        ("undefined", Value::Null) => Ok(Passable::Undefined),
        ("promise", Value::Null) => Ok(Passable::promise()),
        ("bigint", Value::String(digits)) => parse_bigint(digits).map(Passable::BigInt),
        ("number", Value::String(special)) => match special.as_str() {
            "NaN" => Ok(Passable::number(f64::NAN)),
            "Infinity" => Ok(Passable::number(f64::INFINITY)),
            "-Infinity" => Ok(Passable::number(f64::NEG_INFINITY)),
            other => Err(CliError::Notation(format!("unknown special number {other:?}"))),
        },
        ("symbol", Value::String(name)) => Ok(Passable::symbol(name.as_str())),
        ("remotable", Value::String(iface)) => Ok(Passable::remotable(iface.as_str())),
        ("error", Value::String(message)) => Ok(Passable::error(message.as_str())),
        ("set", Value::Array(items)) => Ok(make_copy_set(decode_all(items)?)?),
        ("bag", Value::Array(entries)) => {
            let pairs = entries
                .iter()
                .map(|entry| match pair(entry, "bag")? {
                    (key, Value::String(count)) => Ok((decode(key)?, parse_bigint(count)?)),
                    _ => Err(CliError::Notation(format!("bag count must be a digit string: {entry}"))),
                })
                .collect::<Result<Vec<_>, CliError>>()?;
            Ok(make_copy_bag(pairs)?)
        }
        ("map", Value::Array(entries)) => {
            let pairs = entries
                .iter()
                .map(|entry| {
                    let (key, value) = pair(entry, "map")?;
                    Ok((decode(key)?, decode(value)?))
                })
                .collect::<Result<Vec<_>, CliError>>()?;
            Ok(make_copy_map(pairs)?)
        }
        _ => Err(CliError::Notation(format!("unknown notation #{form}: {body}"))),
    }
}

/// A two-element JSON array.
fn pair<'a>(entry: &'a Value, what: &str) -> Result<(&'a Value, &'a Value), CliError> {
    match entry.as_array().map(Vec::as_slice) {
        Some([a, b]) => Ok((a, b)),
        _ => Err(CliError::Notation(format!("{what} entry must be a pair: {entry}"))),
    }
}

fn parse_bigint(digits: &str) -> Result<BigInt, CliError> {
    digits
        .parse()
        .map_err(|_| CliError::Notation(format!("not a bigint: {digits:?}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use patternkit_core::{Kind, PassStyle, PatternKit};
    use serde_json::json;

    fn kind(value: &Passable) -> Option<Kind> {
        patternkit_core::kind_of(value)
    }

    #[test]
    fn plain_json() {
        let value = decode(&json!({"a": [1, "x", true, null]})).expect("decode");
        assert_eq!(value.to_string(), "{\"a\":[1,\"x\",true,null]}");
    }

    #[test]
    fn special_forms() {
        assert!(decode(&json!({"#undefined": null})).expect("undefined").is_undefined());
        assert_eq!(decode(&json!({"#bigint": "-12"})).expect("bigint").to_string(), "-12n");
        assert_eq!(decode(&json!({"#number": "NaN"})).expect("nan").to_string(), "NaN");
        assert_eq!(decode(&json!({"#symbol": "s"})).expect("symbol").pass_style(), PassStyle::Symbol);
        assert_eq!(decode(&json!({"#promise": null})).expect("promise").pass_style(), PassStyle::Promise);
        assert_eq!(decode(&json!({"#remotable": "Foo"})).expect("remotable").pass_style(), PassStyle::Remotable);
        assert_eq!(decode(&json!({"#error": "boom"})).expect("error").pass_style(), PassStyle::Error);
    }

    #[test]
    fn collections() {
        let set = decode(&json!({"#set": ["b", "a"]})).expect("set");
        assert_eq!(kind(&set), Some(Kind::CopySet));
        let bag = decode(&json!({"#bag": [["a", "2"]]})).expect("bag");
        assert_eq!(kind(&bag), Some(Kind::CopyBag));
        let map = decode(&json!({"#map": [["k", 1]]})).expect("map");
        assert_eq!(kind(&map), Some(Kind::CopyMap));
        assert!(decode(&json!({"#set": ["a", "a"]})).is_err());
    }

    #[test]
    fn tagged_values_write_matchers() {
        let kit = PatternKit::default();
        let pattern = decode(&json!({"#tag": "match:kind", "payload": "string"})).expect("tagged");
        assert!(kit.is_pattern(&pattern));
        assert!(kit.matches(&Passable::from("x"), &pattern));
        assert!(decode(&json!({"#tag": "t"})).is_err());
    }

    #[test]
    fn malformed_notation() {
        assert!(decode(&json!({"#bigint": 3})).is_err());
        assert!(decode(&json!({"#frob": null})).is_err());
        assert!(decode(&json!({"#symbol": "s", "x": 1})).is_err());
        assert!(decode(&json!({"#bag": [["a"]]})).is_err());
        assert!(decode_slice(b"{").is_err());
    }
}
