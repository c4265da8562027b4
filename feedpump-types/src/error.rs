use feedpump_json::JsonError;
use thiserror::Error;

/// Type alias of the [`Result`] type returned by payload decoders.
pub type PayloadResult<T> = std::result::Result<T, PayloadErr>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
/// Errors that may happen when decoding a payload out of a well-formed JSON tree.
pub enum PayloadErr {
    #[error("Missing field `{0}`")]
    MissingField(&'static str),
    #[error("Field `{field}`: expected {expected}, found {found}")]
    WrongType {
        field: &'static str,
        expected: &'static str,
        found: &'static str,
    },
    #[error("Field `{field}`: `{value}` is not a valid number")]
    BadNumber { field: &'static str, value: String },
    #[error("Field `{field}`: `{value}` is not a valid timestamp")]
    BadTimestamp { field: &'static str, value: String },
    #[error("Field `{field}`: {value} is out of range")]
    OutOfRange { field: &'static str, value: i64 },
}

#[derive(Error, Debug, Clone, PartialEq)]
#[error("{message}")]
/// A failure isolated to one line. Handed to [`crate::StreamHandler::on_exception`]
/// together with the text that caused it; it never ends the stream.
pub struct StreamParseErr {
    message: String,
    raw: String,
    #[source]
    kind: FailureKind,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum FailureKind {
    /// The line is not valid JSON.
    #[error("Parse failure: {0}")]
    Parse(JsonError),
    /// The line is valid JSON, but a recognized shape could not be decoded.
    #[error("Dispatch failure: {0}")]
    Dispatch(PayloadErr),
    /// The line is valid JSON, but no shape of the protocol applies.
    #[error("Protocol failure: {0}")]
    Protocol(String),
}

impl StreamParseErr {
    pub fn new<M: Into<String>, R: Into<String>>(message: M, raw: R, kind: FailureKind) -> Self {
        Self {
            message: message.into(),
            raw: raw.into(),
            kind,
        }
    }

    pub fn parse<R: Into<String>>(raw: R, err: JsonError) -> Self {
        Self::new("JSON parse failed", raw, FailureKind::Parse(err))
    }

    pub fn dispatch<M: Into<String>, R: Into<String>>(message: M, raw: R, err: PayloadErr) -> Self {
        Self::new(message, raw, FailureKind::Dispatch(err))
    }

    pub fn protocol<R: Into<String>, S: Into<String>>(raw: R, reason: S) -> Self {
        Self::new(
            "Unsupported stream element",
            raw,
            FailureKind::Protocol(reason.into()),
        )
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// The text of the offending line (or sub-tree).
    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn kind(&self) -> &FailureKind {
        &self.kind
    }

    pub fn is_parse_failure(&self) -> bool {
        matches!(self.kind, FailureKind::Parse(_))
    }

    pub fn is_dispatch_failure(&self) -> bool {
        matches!(self.kind, FailureKind::Dispatch(_))
    }

    pub fn is_protocol_failure(&self) -> bool {
        matches!(self.kind, FailureKind::Protocol(_))
    }
}
