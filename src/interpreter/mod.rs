pub mod console;
pub mod control_flow;
pub mod environment;
pub mod error;
pub mod evaluator;
pub mod parser;

pub use console::{BufferConsole, Console, StdConsole};
pub use control_flow::ControlFlow;
pub use environment::Environment;
pub use error::InterpreterError;
pub use evaluator::{parse_and_run, Interpreter, MAX_CALL_DEPTH, MAX_REPEAT_LEN};
pub use parser::{parse, ParseResult, Parser, SyntaxError};
