use std::rc::Rc;

use thiserror::Error;

use crate::ast::{BinaryOp, Expr, ExprKind, FunctionCall, FunctionDef, Program, Stmt, UnaryOp};
use crate::diagnostic::Position;
use crate::error::Error;
use crate::lexer::Lexer;
use crate::token::{Token, TokenKind, TokenValue};
use crate::value::Value;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SyntaxError {
    #[error("expected {expected}, found {found} at {position}")]
    UnexpectedToken {
        expected: TokenKind,
        found: TokenKind,
        position: Position,
    },
    #[error("expected an expression, found {found} at {position}")]
    ExpectedExpression { found: TokenKind, position: Position },
    #[error("missing operand after {operator} at {position}")]
    MissingOperand { operator: TokenKind, position: Position },
    #[error("no left operand before {operator} at {position}")]
    MissingLeftOperand { operator: TokenKind, position: Position },
    #[error("unexpected {found} at start of statement at {position}")]
    UnexpectedStatement { found: TokenKind, position: Position },
    #[error("nothing to print at {position}")]
    EmptyPrint { position: Position },
    #[error("{found} after `end` does not match the block opened by {opener} at {position}")]
    MismatchedEnd {
        opener: TokenKind,
        found: TokenKind,
        position: Position,
    },
}

impl SyntaxError {
    pub fn position(&self) -> Position {
        match self {
            Self::UnexpectedToken { position, .. } => *position,
            Self::ExpectedExpression { position, .. } => *position,
            Self::MissingOperand { position, .. } => *position,
            Self::MissingLeftOperand { position, .. } => *position,
            Self::UnexpectedStatement { position, .. } => *position,
            Self::EmptyPrint { position } => *position,
            Self::MismatchedEnd { position, .. } => *position,
        }
    }
}

pub type ParseResult<T> = Result<T, Error>;

type Layer<'src> = fn(&mut Parser<'src>) -> ParseResult<Expr>;

const OR_OPS: &[(TokenKind, BinaryOp)] = &[(TokenKind::Or, BinaryOp::Or)];
const AND_OPS: &[(TokenKind, BinaryOp)] = &[(TokenKind::And, BinaryOp::And)];
const COMPARISON_OPS: &[(TokenKind, BinaryOp)] = &[
    (TokenKind::Equals, BinaryOp::Equals),
    (TokenKind::IsGreaterThan, BinaryOp::Greater),
    (TokenKind::IsLessThan, BinaryOp::Less),
];
const ADDITION_OPS: &[(TokenKind, BinaryOp)] = &[
    (TokenKind::Plus, BinaryOp::Add),
    (TokenKind::Minus, BinaryOp::Sub),
];
const MULTIPLICATION_OPS: &[(TokenKind, BinaryOp)] = &[
    (TokenKind::Times, BinaryOp::Mul),
    (TokenKind::DividedBy, BinaryOp::Div),
];

/// Recursive-descent parser with a single token of lookahead, pulling tokens from the
/// lexer as it goes.
pub struct Parser<'src> {
    lexer: Lexer<'src>,
    current: Token,
}

impl<'src> Parser<'src> {
    pub fn new(source: &'src str) -> ParseResult<Self> {
        let mut lexer = Lexer::new(source);
        let current = lexer.next_token()?;
        Ok(Self { lexer, current })
    }

    /// Moves to the next token and hands back the one that was current.
    fn advance(&mut self) -> ParseResult<Token> {
        let next = self.lexer.next_token()?;
        Ok(std::mem::replace(&mut self.current, next))
    }

    fn check(&self, kind: TokenKind) -> bool {
        self.current.is(kind)
    }

    fn eat(&mut self, expected: TokenKind) -> ParseResult<Token> {
        if self.check(expected) {
            return self.advance();
        }
        Err(SyntaxError::UnexpectedToken {
            expected,
            found: self.current.kind,
            position: self.current.position,
        }
        .into())
    }

    fn eat_if(&mut self, kind: TokenKind) -> ParseResult<bool> {
        if self.check(kind) {
            self.advance()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    fn eat_identifier(&mut self) -> ParseResult<Rc<str>> {
        let token = self.eat(TokenKind::Identifier)?;
        Ok(Rc::from(token.text()))
    }

    pub fn parse_program(&mut self) -> ParseResult<Program> {
        let mut statements = Vec::new();
        while !self.check(TokenKind::Eof) {
            statements.push(self.parse_statement()?);
        }
        Ok(Program { statements })
    }

    fn parse_statement(&mut self) -> ParseResult<Stmt> {
        match self.current.kind {
            TokenKind::Set => self.parse_set_statement(),
            TokenKind::Print | TokenKind::Write => self.parse_print_statement(),
            TokenKind::Ask => self.parse_ask_statement(),
            TokenKind::If => self.parse_if_statement(),
            TokenKind::Repeat => self.parse_repeat_statement(),
            TokenKind::For => self.parse_for_statement(),
            TokenKind::Define => self.parse_function_def(),
            TokenKind::Call => {
                let call = self.parse_function_call()?;
                self.eat(TokenKind::Period)?;
                Ok(Stmt::Call(call))
            }
            TokenKind::Return => self.parse_return_statement(),
            found => Err(SyntaxError::UnexpectedStatement {
                found,
                position: self.current.position,
            }
            .into()),
        }
    }

    /// Statements up to (not including) `end`, `otherwise` or end of input.
    fn parse_block(&mut self) -> ParseResult<Vec<Stmt>> {
        stacker::maybe_grow(64 * 1024, 1024 * 1024, || {
            let mut statements = Vec::new();
            while !matches!(
                self.current.kind,
                TokenKind::End | TokenKind::Otherwise | TokenKind::Eof
            ) {
                statements.push(self.parse_statement()?);
            }
            Ok(statements)
        })
    }

    /// `end.` or `end <opener>.`
    fn parse_block_end(&mut self, opener: TokenKind) -> ParseResult<()> {
        self.eat(TokenKind::End)?;
        if self.current.kind.opens_block() {
            if !self.check(opener) {
                return Err(SyntaxError::MismatchedEnd {
                    opener,
                    found: self.current.kind,
                    position: self.current.position,
                }
                .into());
            }
            self.advance()?;
        }
        self.eat(TokenKind::Period)?;
        Ok(())
    }

    fn parse_set_statement(&mut self) -> ParseResult<Stmt> {
        self.eat(TokenKind::Set)?;
        let name = self.eat_identifier()?;
        self.eat(TokenKind::To)?;
        let mut value = self.parse_list_expression()?;
        value.mark_literal_fallback();
        self.eat(TokenKind::Period)?;
        Ok(Stmt::Set { name, value })
    }

    /// `print` takes either a phrase of bare words or a flat arithmetic chain. Words are
    /// collected until an arithmetic operator shows up; from then on the first word is
    /// the left operand and operators apply strictly left to right.
    fn parse_print_statement(&mut self) -> ParseResult<Stmt> {
        let keyword = self.advance()?;
        let mut words: Vec<(String, Position)> = Vec::new();

        while !self.check(TokenKind::Period) && !self.check(TokenKind::Eof) {
            if self.current.kind.is_arithmetic() {
                let expr = self.parse_print_arithmetic(words)?;
                self.eat(TokenKind::Period)?;
                return Ok(Stmt::Print(expr));
            }
            let token = self.advance()?;
            let word = match token.kind {
                TokenKind::StoreIn => "and store in".to_string(),
                _ => token.text(),
            };
            words.push((word, token.position));
        }
        self.eat(TokenKind::Period)?;

        let expr = match words.len() {
            0 => {
                return Err(SyntaxError::EmptyPrint {
                    position: keyword.position,
                }
                .into())
            }
            1 => {
                let (word, position) = words.remove(0);
                Expr::variable(word, true, position)
            }
            _ => {
                let position = words[0].1;
                let phrase: Vec<String> = words.into_iter().map(|(word, _)| word).collect();
                Expr::literal(Value::string(phrase.join(" ")), position)
            }
        };
        Ok(Stmt::Print(expr))
    }

    fn parse_print_arithmetic(&mut self, words: Vec<(String, Position)>) -> ParseResult<Expr> {
        let (first, position) = match words.into_iter().next() {
            Some(word) => word,
            None => {
                return Err(SyntaxError::MissingLeftOperand {
                    operator: self.current.kind,
                    position: self.current.position,
                }
                .into())
            }
        };

        let mut left = match first.parse::<f64>() {
            Ok(number) if first.starts_with(|ch: char| ch.is_ascii_digit()) => {
                Expr::literal(Value::Number(number), position)
            }
            _ => Expr::variable(first, true, position),
        };

        while let Some(op) = arithmetic_op(self.current.kind) {
            let operator = self.advance()?;
            let right = match self.current.kind {
                TokenKind::Number => {
                    let token = self.advance()?;
                    literal_from(&token)
                }
                TokenKind::Identifier => {
                    let token = self.advance()?;
                    Expr::variable(token.text(), true, token.position)
                }
                _ => {
                    return Err(SyntaxError::MissingOperand {
                        operator: operator.kind,
                        position: self.current.position,
                    }
                    .into())
                }
            };
            left = Expr::binary(left, op, right);
        }
        Ok(left)
    }

    fn parse_ask_statement(&mut self) -> ParseResult<Stmt> {
        self.eat(TokenKind::Ask)?;
        let prompt = self.parse_string_phrase()?;
        self.eat(TokenKind::StoreIn)?;
        self.eat_if(TokenKind::In)?;
        let name = self.eat_identifier()?;
        self.eat(TokenKind::Period)?;
        Ok(Stmt::Ask { prompt, name })
    }

    fn parse_string_phrase(&mut self) -> ParseResult<String> {
        let mut words = Vec::new();
        while matches!(self.current.kind, TokenKind::Identifier | TokenKind::Number) {
            words.push(self.advance()?.text());
        }
        Ok(words.join(" "))
    }

    fn parse_if_statement(&mut self) -> ParseResult<Stmt> {
        self.eat(TokenKind::If)?;
        let condition = self.parse_expression()?;
        self.eat(TokenKind::Then)?;
        self.eat_if(TokenKind::Period)?;
        let then_branch = self.parse_block()?;

        let else_branch = if self.eat_if(TokenKind::Otherwise)? {
            self.eat_if(TokenKind::Period)?;
            Some(self.parse_block()?)
        } else {
            None
        };

        self.parse_block_end(TokenKind::If)?;
        Ok(Stmt::If {
            condition,
            then_branch,
            else_branch,
        })
    }

    fn parse_repeat_statement(&mut self) -> ParseResult<Stmt> {
        self.eat(TokenKind::Repeat)?;

        if self.eat_if(TokenKind::While)? {
            let condition = self.parse_expression()?;
            self.eat_if(TokenKind::Period)?;
            let body = self.parse_block()?;
            self.parse_block_end(TokenKind::Repeat)?;
            return Ok(Stmt::RepeatWhile { condition, body });
        }

        // Only a primary here: `times` is the loop marker, not multiplication.
        let count = self.parse_primary()?;
        self.eat(TokenKind::Times)?;
        self.eat_if(TokenKind::Period)?;
        let body = self.parse_block()?;
        self.parse_block_end(TokenKind::Repeat)?;
        Ok(Stmt::RepeatTimes { count, body })
    }

    fn parse_for_statement(&mut self) -> ParseResult<Stmt> {
        self.eat(TokenKind::For)?;
        self.eat(TokenKind::Each)?;
        let item = self.eat_identifier()?;
        self.eat(TokenKind::In)?;
        let iterable = self.parse_list_expression()?;
        self.eat_if(TokenKind::Period)?;
        let body = self.parse_block()?;
        self.parse_block_end(TokenKind::For)?;
        Ok(Stmt::ForEach { item, iterable, body })
    }

    fn parse_function_def(&mut self) -> ParseResult<Stmt> {
        self.eat(TokenKind::Define)?;
        let name = self.eat_identifier()?;

        let mut params = Vec::new();
        if self.eat_if(TokenKind::With)? {
            params.push(self.eat_identifier()?);
            while self.eat_if(TokenKind::Comma)? {
                params.push(self.eat_identifier()?);
            }
        }
        self.eat_if(TokenKind::Period)?;

        let body = self.parse_block()?;
        self.parse_block_end(TokenKind::Define)?;
        Ok(Stmt::FunctionDef(Rc::new(FunctionDef { name, params, body })))
    }

    fn parse_function_call(&mut self) -> ParseResult<FunctionCall> {
        let call = self.eat(TokenKind::Call)?;
        let name = self.eat_identifier()?;

        let mut args = Vec::new();
        if self.eat_if(TokenKind::With)? {
            args.push(self.parse_expression()?);
            while self.eat_if(TokenKind::Comma)? {
                args.push(self.parse_expression()?);
            }
        }
        Ok(FunctionCall {
            name,
            args,
            position: call.position,
        })
    }

    fn parse_return_statement(&mut self) -> ParseResult<Stmt> {
        self.eat(TokenKind::Return)?;
        let value = if self.check(TokenKind::Period) {
            None
        } else {
            Some(self.parse_expression()?)
        };
        self.eat(TokenKind::Period)?;
        Ok(Stmt::Return(value))
    }

    /// An expression, or several separated by commas forming a list.
    fn parse_list_expression(&mut self) -> ParseResult<Expr> {
        let first = self.parse_expression()?;
        if !self.check(TokenKind::Comma) {
            return Ok(first);
        }

        let position = first.position;
        let mut items = vec![first];
        while self.eat_if(TokenKind::Comma)? {
            items.push(self.parse_expression()?);
        }
        Ok(Expr::new(ExprKind::List(items), position))
    }

    pub fn parse_expression(&mut self) -> ParseResult<Expr> {
        self.parse_or()
    }

    fn parse_or(&mut self) -> ParseResult<Expr> {
        self.parse_binary_layer(Self::parse_and, OR_OPS)
    }

    fn parse_and(&mut self) -> ParseResult<Expr> {
        self.parse_binary_layer(Self::parse_comparison, AND_OPS)
    }

    fn parse_comparison(&mut self) -> ParseResult<Expr> {
        self.parse_binary_layer(Self::parse_addition, COMPARISON_OPS)
    }

    fn parse_addition(&mut self) -> ParseResult<Expr> {
        self.parse_binary_layer(Self::parse_multiplication, ADDITION_OPS)
    }

    fn parse_multiplication(&mut self) -> ParseResult<Expr> {
        self.parse_binary_layer(Self::parse_unary, MULTIPLICATION_OPS)
    }

    /// One left-associative precedence level.
    fn parse_binary_layer(
        &mut self,
        next: Layer<'src>,
        ops: &[(TokenKind, BinaryOp)],
    ) -> ParseResult<Expr> {
        let mut left = next(self)?;

        while let Some(&(_, op)) = ops.iter().find(|(kind, _)| self.check(*kind)) {
            let operator = self.advance()?;
            if !starts_expression(self.current.kind) {
                return Err(SyntaxError::MissingOperand {
                    operator: operator.kind,
                    position: self.current.position,
                }
                .into());
            }
            let right = next(self)?;
            left = Expr::binary(left, op, right);
        }
        Ok(left)
    }

    fn parse_unary(&mut self) -> ParseResult<Expr> {
        if self.check(TokenKind::Not) {
            let operator = self.advance()?;
            if !starts_expression(self.current.kind) {
                return Err(SyntaxError::MissingOperand {
                    operator: operator.kind,
                    position: self.current.position,
                }
                .into());
            }
            let expr = self.parse_unary()?;
            return Ok(Expr::new(
                ExprKind::Unary {
                    op: UnaryOp::Not,
                    expr: Box::new(expr),
                },
                operator.position,
            ));
        }
        self.parse_primary()
    }

    fn parse_primary(&mut self) -> ParseResult<Expr> {
        match self.current.kind {
            TokenKind::Number => {
                let token = self.advance()?;
                Ok(literal_from(&token))
            }
            TokenKind::Identifier => {
                let token = self.advance()?;
                Ok(Expr::variable(token.text(), false, token.position))
            }
            TokenKind::Call => {
                let call = self.parse_function_call()?;
                let position = call.position;
                Ok(Expr::new(ExprKind::Call(call), position))
            }
            found => Err(SyntaxError::ExpectedExpression {
                found,
                position: self.current.position,
            }
            .into()),
        }
    }
}

fn starts_expression(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Number | TokenKind::Identifier | TokenKind::Call | TokenKind::Not
    )
}

fn arithmetic_op(kind: TokenKind) -> Option<BinaryOp> {
    match kind {
        TokenKind::Plus => Some(BinaryOp::Add),
        TokenKind::Minus => Some(BinaryOp::Sub),
        TokenKind::Times => Some(BinaryOp::Mul),
        TokenKind::DividedBy => Some(BinaryOp::Div),
        _ => None,
    }
}

fn literal_from(token: &Token) -> Expr {
    let value = match &token.value {
        TokenValue::Number(number) => Value::Number(*number),
        TokenValue::Text(text) => Value::string(text),
    };
    Expr::literal(value, token.position)
}

/// Parses a whole program.
pub fn parse(source: &str) -> ParseResult<Program> {
    Parser::new(source)?.parse_program()
}
