use indexmap::IndexMap;
use std::ops::Index;

/// JSON object. Keys are unique and keep their insertion order.
pub type JsonObject = IndexMap<String, JsonValue>;

#[derive(Debug, Clone, PartialEq)]
/// A parsed JSON tree. One tree is built per line, and dropped after it has been dispatched.
pub enum JsonValue {
    Null,
    Bool(bool),
    Number(JsonNumber),
    String(String),
    Array(Vec<JsonValue>),
    Object(JsonObject),
}

#[derive(Debug, Clone, Copy, PartialEq)]
/// A number is `Float` if it was written with a fraction or an exponent, `Integer` otherwise.
pub enum JsonNumber {
    Integer(i64),
    Float(f64),
}

static NULL: JsonValue = JsonValue::Null;

impl JsonValue {
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<JsonNumber> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Only integers; a float is never truncated.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Number(JsonNumber::Integer(i)) => Some(*i),
            _ => None,
        }
    }

    /// Integers are widened.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(JsonNumber::Integer(i)) => Some(*i as f64),
            Self::Number(JsonNumber::Float(f)) => Some(*f),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[JsonValue]> {
        match self {
            Self::Array(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&JsonObject> {
        match self {
            Self::Object(o) => Some(o),
            _ => None,
        }
    }

    pub fn into_object(self) -> Option<JsonObject> {
        match self {
            Self::Object(o) => Some(o),
            _ => None,
        }
    }

    /// Look up a key, if this is an object.
    pub fn get(&self, key: &str) -> Option<&JsonValue> {
        self.as_object().and_then(|o| o.get(key))
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Name of the variant, for error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "boolean",
            Self::Number(JsonNumber::Integer(_)) => "integer",
            Self::Number(JsonNumber::Float(_)) => "float",
            Self::String(_) => "string",
            Self::Array(_) => "array",
            Self::Object(_) => "object",
        }
    }
}

/// Missing keys and non-objects index to `null`, like a lenient property access.
impl Index<&str> for JsonValue {
    type Output = JsonValue;

    fn index(&self, key: &str) -> &Self::Output {
        self.get(key).unwrap_or(&NULL)
    }
}

impl Index<usize> for JsonValue {
    type Output = JsonValue;

    fn index(&self, index: usize) -> &Self::Output {
        self.as_array().and_then(|a| a.get(index)).unwrap_or(&NULL)
    }
}

impl From<bool> for JsonValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for JsonValue {
    fn from(i: i64) -> Self {
        Self::Number(JsonNumber::Integer(i))
    }
}

impl From<f64> for JsonValue {
    fn from(f: f64) -> Self {
        Self::Number(JsonNumber::Float(f))
    }
}

impl From<&str> for JsonValue {
    fn from(s: &str) -> Self {
        Self::String(s.to_owned())
    }
}

impl From<String> for JsonValue {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<Vec<JsonValue>> for JsonValue {
    fn from(a: Vec<JsonValue>) -> Self {
        Self::Array(a)
    }
}

impl From<JsonObject> for JsonValue {
    fn from(o: JsonObject) -> Self {
        Self::Object(o)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_lenient_index() {
        let mut object = JsonObject::new();
        object.insert("a".to_owned(), JsonValue::from(vec![1i64.into(), "x".into()]));
        let value = JsonValue::Object(object);

        assert_eq!(value["a"][1].as_str(), Some("x"));
        assert!(value["a"][2].is_null());
        assert!(value["b"]["c"].is_null());
        assert!(value.contains_key("a"));
        assert!(!value["a"].contains_key("a"));
    }

    #[test]
    fn test_numbers() {
        let int = JsonValue::from(150i64);
        let float = JsonValue::from(150.0);
        assert_eq!(int.as_i64(), Some(150));
        assert_eq!(int.as_f64(), Some(150.0));
        assert_eq!(float.as_i64(), None);
        assert_ne!(int, float);
        assert_eq!(float.type_name(), "float");
    }
}
