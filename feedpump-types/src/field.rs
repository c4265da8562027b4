//! Field accessors shared by the payload decoders and the stream decoders.

use feedpump_json::{JsonObject, JsonValue};

use crate::{parse_created_at, timestamp_from_millis_str, PayloadErr, PayloadResult, Timestamp};

/// The value of a key which must be present and not null.
pub fn required<'a>(value: &'a JsonValue, field: &'static str) -> PayloadResult<&'a JsonValue> {
    match value.get(field) {
        Some(JsonValue::Null) | None => Err(PayloadErr::MissingField(field)),
        Some(v) => Ok(v),
    }
}

pub fn require_object<'a>(value: &'a JsonValue, field: &'static str) -> PayloadResult<&'a JsonObject> {
    let v = required(value, field)?;
    v.as_object().ok_or_else(|| wrong_type(field, "object", v))
}

pub fn require_str<'a>(value: &'a JsonValue, field: &'static str) -> PayloadResult<&'a str> {
    let v = required(value, field)?;
    v.as_str().ok_or_else(|| wrong_type(field, "string", v))
}

/// An absent or null field is `None`; a field of another type is still an error.
pub fn optional_str<'a>(value: &'a JsonValue, field: &'static str) -> PayloadResult<Option<&'a str>> {
    match value.get(field) {
        Some(JsonValue::Null) | None => Ok(None),
        Some(v) => v
            .as_str()
            .map(Some)
            .ok_or_else(|| wrong_type(field, "string", v)),
    }
}

/// Integers are accepted in either form: a JSON integer or a string of digits.
pub fn require_i64(value: &JsonValue, field: &'static str) -> PayloadResult<i64> {
    to_i64(required(value, field)?, field)
}

pub fn optional_i64(value: &JsonValue, field: &'static str) -> PayloadResult<Option<i64>> {
    match value.get(field) {
        Some(JsonValue::Null) | None => Ok(None),
        Some(v) => to_i64(v, field).map(Some),
    }
}

pub fn to_i64(v: &JsonValue, field: &'static str) -> PayloadResult<i64> {
    match v {
        JsonValue::Number(_) => v.as_i64().ok_or_else(|| wrong_type(field, "integer", v)),
        JsonValue::String(s) => parse_i64(s, field),
        _ => Err(wrong_type(field, "integer", v)),
    }
}

pub fn parse_i64(s: &str, field: &'static str) -> PayloadResult<i64> {
    s.parse().map_err(|_| PayloadErr::BadNumber {
        field,
        value: s.to_owned(),
    })
}

/// Object ids are carried as `id`, with `id_str` as the precise fallback.
pub fn require_id(value: &JsonValue) -> PayloadResult<i64> {
    match value.get("id") {
        Some(JsonValue::Null) | None => match value.get("id_str") {
            Some(JsonValue::Null) | None => Err(PayloadErr::MissingField("id")),
            Some(v) => to_i64(v, "id_str"),
        },
        Some(v) => to_i64(v, "id"),
    }
}

/// `timestamp_ms` if present, otherwise now.
pub fn timestamp_ms_or_now(value: &JsonValue) -> PayloadResult<Timestamp> {
    match value.get("timestamp_ms") {
        Some(JsonValue::String(s)) => timestamp_from_millis_str(s),
        Some(JsonValue::Number(_)) => {
            let ms = to_i64(&value["timestamp_ms"], "timestamp_ms")?;
            timestamp_from_millis_str(&ms.to_string())
        }
        _ => Ok(Timestamp::now_utc()),
    }
}

/// `created_at` if present, otherwise now.
pub fn created_at_or_now(value: &JsonValue) -> PayloadResult<Timestamp> {
    match optional_str(value, "created_at")? {
        Some(s) => parse_created_at(s),
        None => Ok(Timestamp::now_utc()),
    }
}

pub fn wrong_type(field: &'static str, expected: &'static str, found: &JsonValue) -> PayloadErr {
    PayloadErr::WrongType {
        field,
        expected,
        found: found.type_name(),
    }
}
