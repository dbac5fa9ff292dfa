use std::fmt;

use crate::diagnostic::Position;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // Literals and identifiers
    Number,
    Identifier,

    // Statement keywords
    Set,
    To,
    Print,
    Write,
    Ask,
    /// `and store in`, or a bare `store`
    StoreIn,
    In,
    If,
    Then,
    Otherwise,
    End,
    Repeat,
    While,
    For,
    Each,
    Define,
    With,
    Call,
    Return,

    // Arithmetic operators
    Plus,
    Minus,
    /// Multiplication, and the loop marker in `repeat <n> times`
    Times,
    /// `divided by`
    DividedBy,

    // Comparison operators
    /// `equals` or `is equal to`
    Equals,
    /// `is greater than`
    IsGreaterThan,
    /// `is less than`
    IsLessThan,

    // Logical operators
    And,
    Or,
    Not,

    // Punctuation
    Comma,
    Period,

    Eof,
}

impl TokenKind {
    /// Resolves a lower-cased word against the keyword table.
    pub fn keyword(word: &str) -> Option<TokenKind> {
        let kind = match word {
            "set" => TokenKind::Set,
            "to" => TokenKind::To,
            "print" => TokenKind::Print,
            "write" => TokenKind::Write,
            "ask" => TokenKind::Ask,
            "store" => TokenKind::StoreIn,
            "in" => TokenKind::In,
            "if" => TokenKind::If,
            "then" => TokenKind::Then,
            "otherwise" => TokenKind::Otherwise,
            "end" => TokenKind::End,
            "repeat" => TokenKind::Repeat,
            "while" => TokenKind::While,
            "for" => TokenKind::For,
            "each" => TokenKind::Each,
            "define" => TokenKind::Define,
            "with" => TokenKind::With,
            "call" => TokenKind::Call,
            "return" => TokenKind::Return,
            "plus" => TokenKind::Plus,
            "minus" => TokenKind::Minus,
            "times" => TokenKind::Times,
            "equals" => TokenKind::Equals,
            "and" => TokenKind::And,
            "or" => TokenKind::Or,
            "not" => TokenKind::Not,
            _ => return None,
        };
        Some(kind)
    }

    pub fn is_arithmetic(self) -> bool {
        matches!(
            self,
            TokenKind::Plus | TokenKind::Minus | TokenKind::Times | TokenKind::DividedBy
        )
    }

    /// Keywords that open a block closed by `end <keyword>.`
    pub fn opens_block(self) -> bool {
        matches!(
            self,
            TokenKind::If | TokenKind::Repeat | TokenKind::For | TokenKind::Define
        )
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TokenKind::Number => "number",
            TokenKind::Identifier => "identifier",
            TokenKind::Set => "`set`",
            TokenKind::To => "`to`",
            TokenKind::Print => "`print`",
            TokenKind::Write => "`write`",
            TokenKind::Ask => "`ask`",
            TokenKind::StoreIn => "`and store in`",
            TokenKind::In => "`in`",
            TokenKind::If => "`if`",
            TokenKind::Then => "`then`",
            TokenKind::Otherwise => "`otherwise`",
            TokenKind::End => "`end`",
            TokenKind::Repeat => "`repeat`",
            TokenKind::While => "`while`",
            TokenKind::For => "`for`",
            TokenKind::Each => "`each`",
            TokenKind::Define => "`define`",
            TokenKind::With => "`with`",
            TokenKind::Call => "`call`",
            TokenKind::Return => "`return`",
            TokenKind::Plus => "`plus`",
            TokenKind::Minus => "`minus`",
            TokenKind::Times => "`times`",
            TokenKind::DividedBy => "`divided by`",
            TokenKind::Equals => "`equals`",
            TokenKind::IsGreaterThan => "`is greater than`",
            TokenKind::IsLessThan => "`is less than`",
            TokenKind::And => "`and`",
            TokenKind::Or => "`or`",
            TokenKind::Not => "`not`",
            TokenKind::Comma => "comma",
            TokenKind::Period => "period",
            TokenKind::Eof => "end of input",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TokenValue {
    Number(f64),
    Text(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub value: TokenValue,
    pub position: Position,
}

impl Token {
    pub fn new(kind: TokenKind, value: TokenValue, position: Position) -> Self {
        Self { kind, value, position }
    }

    pub fn eof(position: Position) -> Self {
        Self::new(TokenKind::Eof, TokenValue::Text(String::new()), position)
    }

    pub fn is(&self, kind: TokenKind) -> bool {
        self.kind == kind
    }

    /// The token as a word of text: numbers in display form, everything else as written.
    pub fn text(&self) -> String {
        match &self.value {
            TokenValue::Number(number) => crate::value::format_number(*number),
            TokenValue::Text(text) => text.clone(),
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}('{}') at {}", self.kind, self.text(), self.position)
    }
}
