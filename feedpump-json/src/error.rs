use thiserror::Error;

/// Type alias of the [`Result`] type specific to `feedpump-json`.
pub type JsonResult<T> = std::result::Result<T, JsonError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{kind} (at position {position})")]
/// A parse failure, with the byte offset in the input where it was detected.
pub struct JsonError {
    position: usize,
    kind: JsonErrKind,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum JsonErrKind {
    #[error("JSON is empty")]
    Empty,
    #[error("unexpected end of input")]
    UnexpectedEnd,
    #[error("{0} is not closed")]
    Unclosed(&'static str),
    #[error("invalid token found: {0:?}")]
    InvalidToken(char),
    #[error("{expected:?} is expected in this place, but found {found:?}")]
    Expected {
        expected: char,
        found: Option<char>,
    },
    #[error("number is required after the {0}")]
    MissingDigits(&'static str),
    #[error("invalid number: {0}")]
    InvalidNumber(String),
    #[error("duplicated key detected: {0}")]
    DuplicateKey(String),
    #[error("invalid character is existed after the valid value: {0:?}")]
    TrailingCharacters(char),
    #[error("nesting is deeper than {0} levels")]
    TooDeep(usize),
}

impl JsonError {
    pub fn new(position: usize, kind: JsonErrKind) -> Self {
        Self { position, kind }
    }

    /// Byte offset of the failure.
    pub fn position(&self) -> usize {
        self.position
    }

    pub fn kind(&self) -> &JsonErrKind {
        &self.kind
    }
}
