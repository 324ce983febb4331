//! Purpose: Per-line record cleaning for line-oriented GeoJSON feature streams.
//! Exports: `LineDisposition`, `clean_line`, `clean_properties`, `is_truthy`.
//! Role: Pure record semantics shared by the stream transform; no I/O here.
//! Invariants: A line is a record iff it parses as JSON after trim + comma strip.
//! Invariants: Falsy property values never survive into a cleaned record.
//! Invariants: Newline stripping happens before entity decoding, so decoded
//! newlines (e.g. from numeric references) are preserved.
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

/// Parse JSON from a string slice.
fn json_from_str<T: DeserializeOwned>(s: &str) -> Result<T, serde_json::Error> {
    serde_json::from_str(s)
}

/// What the transform loop should do with one input line.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum LineDisposition {
    /// The line parsed as JSON; write this re-serialized record with comma
    /// placement applied.
    Record(String),
    /// The line is not a record (structural bracket, blank, junk); write the
    /// original bytes verbatim and leave the record counter alone.
    Passthrough,
}

/// Trim surrounding whitespace and strip at most one trailing comma.
///
/// Pretty-printed feature dumps terminate every record line with a comma; the
/// comma belongs to the stream, not the record.
pub fn strip_record_separator(line: &str) -> &str {
    let trimmed = line.trim();
    trimmed.strip_suffix(',').unwrap_or(trimmed)
}

/// Decide how one raw input line is emitted.
///
/// Records with an object-valued `properties` field get that mapping rebuilt:
/// falsy entries dropped, string values flattened and entity-decoded. Records
/// without one round-trip unchanged through the serializer.
pub fn clean_line(raw: &str) -> LineDisposition {
    let candidate = strip_record_separator(raw);
    let mut value: Value = match json_from_str(candidate) {
        Ok(value) => value,
        Err(_) => return LineDisposition::Passthrough,
    };

    if let Some(record) = value.as_object_mut() {
        let cleaned = record
            .get("properties")
            .and_then(Value::as_object)
            .map(clean_properties);
        if let Some(cleaned) = cleaned {
            record.insert("properties".to_string(), Value::Object(cleaned));
        }
    }

    serde_json::to_string(&value)
        .map(LineDisposition::Record)
        .unwrap_or(LineDisposition::Passthrough)
}

/// Rebuild a properties mapping, keeping only truthy entries.
pub fn clean_properties(properties: &Map<String, Value>) -> Map<String, Value> {
    let mut cleaned = Map::new();
    for (key, value) in properties {
        if !is_truthy(value) {
            continue;
        }
        cleaned.insert(key.clone(), decode_property(value));
    }
    cleaned
}

/// Truthiness matching the upstream feed's filtering: falsy is `null`, `false`,
/// the empty string, or numeric zero. Arrays and objects are always truthy,
/// empty or not.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().map(|n| n != 0.0).unwrap_or(true),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn decode_property(value: &Value) -> Value {
    match value.as_str() {
        Some(text) => {
            let flattened = strip_newlines(text);
            Value::String(html_escape::decode_html_entities(&flattened).into_owned())
        }
        None => value.clone(),
    }
}

fn strip_newlines(text: &str) -> String {
    text.chars().filter(|c| !matches!(c, '\r' | '\n')).collect()
}
