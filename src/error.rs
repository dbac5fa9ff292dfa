use thiserror::Error;

use crate::diagnostic::Position;
use crate::interpreter::{InterpreterError, SyntaxError};
use crate::lexer::LexError;

/// Any failure that ends a run. The first one raised anywhere in the pipeline wins.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error(transparent)]
    Lex(#[from] LexError),
    #[error(transparent)]
    Syntax(#[from] SyntaxError),
    #[error(transparent)]
    Runtime(#[from] InterpreterError),
}

impl Error {
    pub fn position(&self) -> Option<Position> {
        match self {
            Error::Lex(err) => Some(err.position()),
            Error::Syntax(err) => Some(err.position()),
            Error::Runtime(err) => err.position(),
        }
    }
}
