//! Control messages every stream may carry, and the catch-all for unrecognised objects.

use feedpump_json::JsonValue;
use feedpump_types::{
    field::{
        optional_i64, require_i64, require_id, require_object, require_str, timestamp_ms_or_now,
        wrong_type,
    },
    DisconnectCode, PayloadErr, PayloadResult, StreamMessage, Timestamp,
};

/// Decode a top-level object that is neither a status nor a user stream element.
/// Objects of no known shape become [`StreamMessage::Unknown`].
pub fn decode_generic(value: JsonValue) -> PayloadResult<StreamMessage> {
    let Some(object) = value.as_object() else {
        return Err(wrong_type("line", "object", &value));
    };
    let message = if object.contains_key("disconnect") {
        let inner = element(&value, "disconnect")?;
        let code = require_i64(inner, "code")?;
        StreamMessage::Disconnect {
            code: DisconnectCode::try_from(code)?,
            stream_name: require_str(inner, "stream_name")?.to_owned(),
            reason: require_str(inner, "reason")?.to_owned(),
            timestamp: timestamp(inner, &value)?,
        }
    } else if object.contains_key("delete") {
        let inner = element(&value, "delete")?;
        let target = match inner.get("status") {
            Some(status) => status,
            None => element(inner, "direct_message")?,
        };
        StreamMessage::Delete {
            id: require_id(target)?,
            user_id: either_i64(target, "user_id", "user_id_str")?,
            timestamp: timestamp(inner, &value)?,
        }
    } else if object.contains_key("scrub_geo") {
        let inner = element(&value, "scrub_geo")?;
        StreamMessage::ScrubGeo {
            user_id: either_i64(inner, "user_id", "user_id_str")?,
            up_to_status_id: either_i64(inner, "up_to_status_id", "up_to_status_id_str")?,
            timestamp: timestamp(inner, &value)?,
        }
    } else if object.contains_key("limit") {
        let inner = element(&value, "limit")?;
        StreamMessage::Limit {
            undelivered: require_i64(inner, "track")?,
            timestamp: timestamp(inner, &value)?,
        }
    } else if object.contains_key("status_withheld") {
        let inner = element(&value, "status_withheld")?;
        StreamMessage::StatusWithheld {
            id: require_id(inner)?,
            user_id: either_i64(inner, "user_id", "user_id_str")?,
            countries: countries(inner)?,
            timestamp: timestamp(inner, &value)?,
        }
    } else if object.contains_key("user_withheld") {
        let inner = element(&value, "user_withheld")?;
        StreamMessage::UserWithheld {
            id: require_id(inner)?,
            countries: countries(inner)?,
            timestamp: timestamp(inner, &value)?,
        }
    } else if object.contains_key("warning") {
        let inner = element(&value, "warning")?;
        StreamMessage::StallWarning {
            code: require_str(inner, "code")?.to_owned(),
            message: require_str(inner, "message")?.to_owned(),
            percent_full: optional_i64(inner, "percent_full")?,
            timestamp: timestamp(inner, &value)?,
        }
    } else {
        return Ok(StreamMessage::Unknown(value));
    };
    Ok(message)
}

/// The object under `field`, wrapped back as a value so field accessors apply.
fn element<'a>(value: &'a JsonValue, field: &'static str) -> PayloadResult<&'a JsonValue> {
    require_object(value, field)?;
    Ok(&value[field])
}

fn either_i64(value: &JsonValue, field: &'static str, fallback: &'static str) -> PayloadResult<i64> {
    match require_i64(value, field) {
        Err(PayloadErr::MissingField(_)) => require_i64(value, fallback),
        res => res,
    }
}

fn countries(value: &JsonValue) -> PayloadResult<Vec<String>> {
    let field = "withheld_in_countries";
    match value.get(field) {
        Some(JsonValue::Array(list)) => list
            .iter()
            .map(|c| {
                c.as_str()
                    .map(ToOwned::to_owned)
                    .ok_or_else(|| wrong_type(field, "string", c))
            })
            .collect(),
        Some(JsonValue::Null) | None => Ok(Vec::new()),
        Some(v) => Err(wrong_type(field, "array", v)),
    }
}

/// `timestamp_ms` of the element, else of the enclosing object, else now.
fn timestamp(inner: &JsonValue, outer: &JsonValue) -> PayloadResult<Timestamp> {
    for value in [inner, outer] {
        if !value["timestamp_ms"].is_null() {
            return timestamp_ms_or_now(value);
        }
    }
    Ok(Timestamp::now_utc())
}
