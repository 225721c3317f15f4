//! Errors raised while parsing or running a script.

use crate::value::Value;
use std::fmt;

/// Errors that can occur during script parsing and execution.
#[derive(Debug)]
pub enum Error {
    /// Syntax error during parsing
    SyntaxError {
        /// Description of the problem
        message: String,
        /// Byte offset in the source where the problem was found
        offset: usize,
    },
    /// Type error during execution
    TypeError(String),
    /// Reference error (undefined variable)
    ReferenceError(String),
    /// A value raised by a `throw` statement
    Thrown(Value),
    /// An error raised by a host function, carried unchanged
    Host(Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
    /// Create a syntax error at the given byte offset.
    pub fn syntax(message: impl Into<String>, offset: usize) -> Self {
        Self::SyntaxError {
            message: message.into(),
            offset,
        }
    }

    /// Create a type error.
    pub fn type_error(message: impl Into<String>) -> Self {
        Self::TypeError(message.into())
    }

    /// Wrap an error produced by host code.
    pub fn host(err: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::Host(err.into())
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::SyntaxError { message, offset } => {
                write!(f, "SyntaxError: {} (at offset {})", message, offset)
            }
            Error::TypeError(msg) => write!(f, "TypeError: {}", msg),
            Error::ReferenceError(msg) => write!(f, "ReferenceError: {}", msg),
            Error::Thrown(value) => write!(f, "Uncaught {}", value),
            Error::Host(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Host(err) => Some(err.as_ref()),
            _ => None,
        }
    }
}
