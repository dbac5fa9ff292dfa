use crate::value::Value;

/// How a statement finished. `Return` unwinds every enclosing loop and block up to the
/// nearest function call.
#[derive(Debug, Clone, PartialEq)]
pub enum ControlFlow {
    Next,
    Return(Value),
}
