use std::fmt;

#[derive(Debug, PartialEq, Eq, Clone)]
pub(crate) enum ErrorKind {
    LexError { message: String, offset: usize },
    ParseError { message: String, offset: usize },
    CompileError(String),
    ArithmeticFault(String),
    UnboundVariable(String),
    IoError(String),
}

pub(crate) type PResult<T> = Result<T, ErrorKind>;

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LexError { message, offset } => {
                write!(f, "lex error at position {offset}: {message}")
            }
            Self::ParseError { message, .. } => write!(f, "parse error: {message}"),
            Self::CompileError(message) => write!(f, "compile error: {message}"),
            Self::ArithmeticFault(message) => write!(f, "arithmetic fault: {message}"),
            Self::UnboundVariable(name) => write!(f, "Variable {name} is not set."),
            Self::IoError(message) => write!(f, "i/o error: {message}"),
        }
    }
}

impl std::error::Error for ErrorKind {}

impl From<std::io::Error> for ErrorKind {
    fn from(err: std::io::Error) -> Self {
        Self::IoError(err.to_string())
    }
}
