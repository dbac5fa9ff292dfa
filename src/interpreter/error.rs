use thiserror::Error;

use crate::diagnostic::Position;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum InterpreterError {
    #[error("Variable '{name}' not defined")]
    UndefinedVariable { name: String, position: Position },
    #[error("Function '{name}' not defined")]
    UndefinedFunction { name: String, position: Position },
    #[error("{message}")]
    TypeError { message: String, position: Position },
    #[error("return outside of a function")]
    ReturnOutsideFunction,
    #[error("maximum call depth of {limit} exceeded calling '{name}'")]
    CallDepthExceeded { name: String, limit: usize, position: Position },
    #[error("input closed while waiting for an answer to '{prompt}'")]
    InputClosed { prompt: String },
    #[error("console error: {message}")]
    Io { message: String },
}

impl InterpreterError {
    pub fn undefined_variable_at(name: impl Into<String>, position: Position) -> Self {
        Self::UndefinedVariable { name: name.into(), position }
    }

    pub fn undefined_function_at(name: impl Into<String>, position: Position) -> Self {
        Self::UndefinedFunction { name: name.into(), position }
    }

    pub fn type_error_at(message: impl Into<String>, position: Position) -> Self {
        Self::TypeError { message: message.into(), position }
    }

    pub fn position(&self) -> Option<Position> {
        match self {
            Self::UndefinedVariable { position, .. } => Some(*position),
            Self::UndefinedFunction { position, .. } => Some(*position),
            Self::TypeError { position, .. } => Some(*position),
            Self::CallDepthExceeded { position, .. } => Some(*position),
            Self::ReturnOutsideFunction | Self::InputClosed { .. } | Self::Io { .. } => None,
        }
    }
}

impl From<std::io::Error> for InterpreterError {
    fn from(err: std::io::Error) -> Self {
        Self::Io { message: err.to_string() }
    }
}
