use thiserror::Error;

/// What went wrong, without the position. One variant per failure class;
/// the exact wording is a convenience for callers, not part of the contract.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SliceErrorKind {
    // Path compilation
    #[error("path is empty")]
    EmptyPath,
    #[error("path must start with '$'")]
    RootExpected,
    #[error("unexpected character {0:?}")]
    BadChar(char),
    #[error("unexpected end of input")]
    UnexpectedEnd,
    #[error("unknown function")]
    UnknownFunction,
    #[error("unknown escape sequence")]
    UnknownEscape,
    #[error("unterminated string")]
    UnterminatedString,

    // Filter compilation and evaluation
    #[error("empty filter")]
    EmptyFilter,
    #[error("unrecognized filter token")]
    UnknownToken,
    #[error("malformed boolean literal")]
    BadBool,
    #[error("not enough operands")]
    NotEnoughArgs,
    #[error("arithmetic requires two numbers")]
    InvalidArithmetic,
    #[error("invalid regular expression")]
    InvalidRegex,
    #[error("mismatched operand types")]
    OperandTypes,
    #[error("strings are not ordered")]
    InvalidStringComparison,
    #[error("unknown operator")]
    UnknownOperator,

    // Document scanning
    #[error("unrecognized value literal")]
    UnrecognizedLiteral,
    #[error("object or array expected")]
    ObjectOrArrayExpected,
    #[error("':' expected")]
    ColonExpected,

    // Functions
    #[error("length is only defined for arrays and strings")]
    InvalidLength,

    // Writer surface
    #[error("write error: {0}")]
    Io(String),
}

/// Error carrying the byte offset at which it was detected. For compile
/// errors the offset is into the path string; for scan errors it is into
/// the buffer being scanned at the time.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} at position {position}")]
pub struct SliceError {
    pub kind: SliceErrorKind,
    pub position: usize,
}

impl SliceError {
    pub fn new(kind: SliceErrorKind, position: usize) -> Self {
        Self { kind, position }
    }
}
