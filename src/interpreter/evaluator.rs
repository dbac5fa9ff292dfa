use std::rc::Rc;

use crate::ast::{BinaryOp, Expr, ExprKind, FunctionCall, Program, Stmt, UnaryOp};
use crate::diagnostic::Position;
use crate::error::Error;
use crate::value::Value;

use super::console::Console;
use super::control_flow::ControlFlow;
use super::environment::Environment;
use super::error::InterpreterError;
use super::parser::parse;

/// Nested calls allowed before a run is aborted.
pub const MAX_CALL_DEPTH: usize = 256;

/// Longest text or list `times` may build.
pub const MAX_REPEAT_LEN: usize = 1 << 24;

const STACK_RED_ZONE: usize = 64 * 1024;
const STACK_GROWTH: usize = 1024 * 1024;

type EvalResult<T> = Result<T, InterpreterError>;

pub struct Interpreter<'c> {
    env: Environment,
    console: &'c mut dyn Console,
    depth: usize,
}

impl<'c> Interpreter<'c> {
    pub fn new(console: &'c mut dyn Console) -> Self {
        Self {
            env: Environment::new(),
            console,
            depth: 0,
        }
    }

    pub fn environment(&self) -> &Environment {
        &self.env
    }

    pub fn into_environment(self) -> Environment {
        self.env
    }

    pub fn run(&mut self, program: &Program) -> EvalResult<()> {
        match self.execute_block(&program.statements)? {
            ControlFlow::Next => Ok(()),
            ControlFlow::Return(_) => Err(InterpreterError::ReturnOutsideFunction),
        }
    }

    /// Runs statements in order, stopping at the first `return`.
    fn execute_block(&mut self, statements: &[Stmt]) -> EvalResult<ControlFlow> {
        stacker::maybe_grow(STACK_RED_ZONE, STACK_GROWTH, || {
            for statement in statements {
                if let ControlFlow::Return(value) = self.execute_statement(statement)? {
                    return Ok(ControlFlow::Return(value));
                }
            }
            Ok(ControlFlow::Next)
        })
    }

    fn execute_statement(&mut self, statement: &Stmt) -> EvalResult<ControlFlow> {
        match statement {
            Stmt::Set { name, value } => {
                let value = self.evaluate(value)?;
                self.env.set(name.to_string(), value);
                Ok(ControlFlow::Next)
            }
            Stmt::Print(expr) => {
                let value = self.evaluate(expr)?;
                self.console.write_line(&value.to_string())?;
                Ok(ControlFlow::Next)
            }
            Stmt::Ask { prompt, name } => {
                let answer = self
                    .console
                    .prompt(&format!("{} ", prompt))?
                    .ok_or_else(|| InterpreterError::InputClosed {
                        prompt: prompt.clone(),
                    })?;
                self.env.set(name.to_string(), parse_answer(&answer));
                Ok(ControlFlow::Next)
            }
            Stmt::If {
                condition,
                then_branch,
                else_branch,
            } => {
                if self.evaluate(condition)?.is_truthy() {
                    self.execute_block(then_branch)
                } else if let Some(else_branch) = else_branch {
                    self.execute_block(else_branch)
                } else {
                    Ok(ControlFlow::Next)
                }
            }
            Stmt::RepeatWhile { condition, body } => {
                while self.evaluate(condition)?.is_truthy() {
                    if let flow @ ControlFlow::Return(_) = self.execute_block(body)? {
                        return Ok(flow);
                    }
                }
                Ok(ControlFlow::Next)
            }
            Stmt::RepeatTimes { count, body } => {
                let times = repeat_count(&self.evaluate(count)?, count.position)?;
                for _ in 0..times {
                    if let flow @ ControlFlow::Return(_) = self.execute_block(body)? {
                        return Ok(flow);
                    }
                }
                Ok(ControlFlow::Next)
            }
            Stmt::ForEach {
                item,
                iterable,
                body,
            } => {
                let items = match self.evaluate(iterable)? {
                    Value::List(items) => items,
                    single => Rc::new(vec![single]),
                };
                for value in items.iter() {
                    self.env.set(item.to_string(), value.clone());
                    if let flow @ ControlFlow::Return(_) = self.execute_block(body)? {
                        return Ok(flow);
                    }
                }
                Ok(ControlFlow::Next)
            }
            Stmt::FunctionDef(function) => {
                self.env.define_function(Rc::clone(function));
                Ok(ControlFlow::Next)
            }
            Stmt::Call(call) => {
                self.call_function(call)?;
                Ok(ControlFlow::Next)
            }
            Stmt::Return(value) => {
                let value = match value {
                    Some(expr) => self.evaluate(expr)?,
                    None => Value::Nothing,
                };
                Ok(ControlFlow::Return(value))
            }
        }
    }

    fn evaluate(&mut self, expr: &Expr) -> EvalResult<Value> {
        match &expr.kind {
            ExprKind::Literal(value) => Ok(value.clone()),

            ExprKind::List(items) => {
                let values = items
                    .iter()
                    .map(|item| self.evaluate(item))
                    .collect::<EvalResult<Vec<_>>>()?;
                Ok(Value::list(values))
            }

            ExprKind::Variable {
                name,
                literal_fallback,
            } => match self.env.get(name) {
                Some(value) => Ok(value.clone()),
                None if *literal_fallback => Ok(Value::string(name)),
                None => Err(InterpreterError::undefined_variable_at(
                    name.to_string(),
                    expr.position,
                )),
            },

            ExprKind::Binary { left, op, right } => {
                // Both sides always run, `and`/`or` included.
                let left = self.evaluate(left)?;
                let right = self.evaluate(right)?;
                apply_binary(*op, &left, &right, expr.position)
            }

            ExprKind::Unary { op, expr } => {
                let value = self.evaluate(expr)?;
                match op {
                    UnaryOp::Not => Ok(Value::Bool(!value.is_truthy())),
                }
            }

            ExprKind::Call(call) => self.call_function(call),
        }
    }

    /// Arguments are evaluated in the caller's scope, parameters are bound positionally,
    /// and the whole variable mapping is put back afterwards.
    fn call_function(&mut self, call: &FunctionCall) -> EvalResult<Value> {
        let function = self
            .env
            .function(&call.name)
            .ok_or_else(|| InterpreterError::undefined_function_at(call.name.to_string(), call.position))?;

        let args = call
            .args
            .iter()
            .map(|arg| self.evaluate(arg))
            .collect::<EvalResult<Vec<_>>>()?;

        if self.depth >= MAX_CALL_DEPTH {
            return Err(InterpreterError::CallDepthExceeded {
                name: call.name.to_string(),
                limit: MAX_CALL_DEPTH,
                position: call.position,
            });
        }

        let saved = self.env.snapshot();
        for (param, arg) in function.params.iter().zip(args) {
            self.env.set(param.to_string(), arg);
        }

        self.depth += 1;
        let outcome = self.execute_block(&function.body);
        self.depth -= 1;
        self.env.restore(saved);

        match outcome? {
            ControlFlow::Return(value) => Ok(value),
            ControlFlow::Next => Ok(Value::Nothing),
        }
    }
}

fn apply_binary(op: BinaryOp, left: &Value, right: &Value, position: Position) -> EvalResult<Value> {
    let mismatch = || {
        InterpreterError::type_error_at(
            format!(
                "cannot {} {} and {}",
                op.verb(),
                left.type_name(),
                right.type_name()
            ),
            position,
        )
    };

    match op {
        BinaryOp::Add => match (left, right) {
            (Value::String(a), Value::String(b)) => Ok(Value::string(format!("{}{}", a, b))),
            (Value::List(a), Value::List(b)) => {
                Ok(Value::list(a.iter().chain(b.iter()).cloned().collect()))
            }
            _ => numeric(left, right).map(|(a, b)| Value::Number(a + b)).ok_or_else(mismatch),
        },
        BinaryOp::Sub => numeric(left, right).map(|(a, b)| Value::Number(a - b)).ok_or_else(mismatch),
        BinaryOp::Mul => match (left, right) {
            (Value::String(text), count) | (count, Value::String(text)) => {
                let factor = whole_count(count).ok_or_else(mismatch)?;
                check_repeat_len(text.len(), factor, "text", count, position)?;
                Ok(Value::string(text.repeat(factor)))
            }
            (Value::List(items), count) | (count, Value::List(items)) => {
                let factor = whole_count(count).ok_or_else(mismatch)?;
                check_repeat_len(items.len(), factor, "list", count, position)?;
                let repeated = (0..factor).flat_map(|_| items.iter().cloned()).collect();
                Ok(Value::list(repeated))
            }
            _ => numeric(left, right).map(|(a, b)| Value::Number(a * b)).ok_or_else(mismatch),
        },
        BinaryOp::Div => {
            let (a, b) = numeric(left, right).ok_or_else(mismatch)?;
            Ok(Value::Number(if b == 0.0 { 0.0 } else { a / b }))
        }
        BinaryOp::Equals => Ok(Value::Bool(left.loosely_equals(right))),
        BinaryOp::Greater => left
            .compare(right)
            .map(|ordering| Value::Bool(ordering.is_gt()))
            .ok_or_else(mismatch),
        BinaryOp::Less => left
            .compare(right)
            .map(|ordering| Value::Bool(ordering.is_lt()))
            .ok_or_else(mismatch),
        BinaryOp::And => Ok(Value::Bool(left.is_truthy() && right.is_truthy())),
        BinaryOp::Or => Ok(Value::Bool(left.is_truthy() || right.is_truthy())),
    }
}

fn numeric(left: &Value, right: &Value) -> Option<(f64, f64)> {
    Some((left.as_numeric()?, right.as_numeric()?))
}

/// Repetition factor for `times` on text and lists: a whole number, negatives count as 0.
fn whole_count(value: &Value) -> Option<usize> {
    let count = value.as_numeric()?;
    if !count.is_finite() || count.fract() != 0.0 {
        return None;
    }
    Some(count.max(0.0) as usize)
}

fn check_repeat_len(
    len: usize,
    factor: usize,
    kind: &str,
    count: &Value,
    position: Position,
) -> EvalResult<()> {
    match len.checked_mul(factor) {
        Some(total) if total <= MAX_REPEAT_LEN => Ok(()),
        _ => Err(InterpreterError::type_error_at(
            format!("cannot repeat {} {} times", kind, count),
            position,
        )),
    }
}

fn repeat_count(value: &Value, position: Position) -> EvalResult<usize> {
    let count = match value {
        Value::String(text) => text.trim().parse::<f64>().ok(),
        other => other.as_numeric(),
    }
    .ok_or_else(|| {
        InterpreterError::type_error_at(
            format!("cannot repeat {} '{}' times", value.type_name(), value),
            position,
        )
    })?;

    if count.is_nan() || count <= 0.0 {
        Ok(0)
    } else {
        Ok(count.trunc() as usize)
    }
}

/// Integer first, then float, otherwise the raw text.
fn parse_answer(answer: &str) -> Value {
    let trimmed = answer.trim();
    if let Ok(integer) = trimmed.parse::<i64>() {
        return Value::Number(integer as f64);
    }
    if let Ok(float) = trimmed.parse::<f64>() {
        return Value::Number(float);
    }
    Value::string(answer)
}

/// Parses and runs `source` against `console`, returning the final environment.
pub fn parse_and_run(source: &str, console: &mut dyn Console) -> Result<Environment, Error> {
    let program = parse(source)?;
    let mut interpreter = Interpreter::new(console);
    interpreter.run(&program)?;
    Ok(interpreter.into_environment())
}
