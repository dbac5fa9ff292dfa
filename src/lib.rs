pub mod ast;
pub mod cli;
pub mod config;
pub mod convert;
pub mod diagnostic;
pub mod error;
pub mod interpreter;
pub mod lexer;
pub mod token;
pub mod value;

pub use ast::{Expr, ExprKind, Program, Stmt};
pub use error::Error;
pub use interpreter::{parse_and_run, BufferConsole, Console, Environment, StdConsole};
pub use token::{Token, TokenKind};
pub use value::Value;
