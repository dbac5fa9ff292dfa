use thiserror::Error;

use crate::diagnostic::Position;
use crate::token::{Token, TokenKind, TokenValue};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum LexError {
    #[error("invalid character '{ch}' at {position}")]
    UnexpectedCharacter { ch: char, position: Position },
}

impl LexError {
    pub fn position(&self) -> Position {
        match self {
            Self::UnexpectedCharacter { position, .. } => *position,
        }
    }
}

/// Everything needed to resume scanning from an earlier point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Cursor {
    offset: usize,
    line: usize,
    column: usize,
}

/// Multi-word operators: the leading word, the words that must follow it, and the
/// resulting token. Alternatives sharing a leading word are tried in order.
const FUSED_OPERATORS: [(&str, &[&str], TokenKind, &str); 5] = [
    ("divided", &["by"], TokenKind::DividedBy, "divided by"),
    ("is", &["greater", "than"], TokenKind::IsGreaterThan, "is greater than"),
    ("is", &["less", "than"], TokenKind::IsLessThan, "is less than"),
    ("is", &["equal", "to"], TokenKind::Equals, "is equal to"),
    ("and", &["store", "in"], TokenKind::StoreIn, "and store in"),
];

/// Produces tokens on demand; nothing is buffered beyond the current cursor.
pub struct Lexer<'src> {
    source: &'src str,
    cursor: Cursor,
}

impl<'src> Lexer<'src> {
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            cursor: Cursor {
                offset: 0,
                line: 1,
                column: 1,
            },
        }
    }

    /// Returns the next token, or an `Eof` token once the input is exhausted.
    pub fn next_token(&mut self) -> Result<Token, LexError> {
        loop {
            let ch = match self.peek() {
                Some(ch) => ch,
                None => return Ok(Token::eof(self.position())),
            };

            if ch.is_whitespace() {
                self.skip_whitespace();
                continue;
            }
            if ch == '/' && self.peek_second() == Some('/') {
                self.skip_comment();
                continue;
            }
            if ch.is_ascii_digit() {
                return Ok(self.read_number());
            }
            if ch.is_alphabetic() || ch == '_' {
                return Ok(self.read_word());
            }

            let position = self.position();
            let kind = match ch {
                ',' => TokenKind::Comma,
                '.' => TokenKind::Period,
                _ => return Err(LexError::UnexpectedCharacter { ch, position }),
            };
            self.advance();
            return Ok(Token::new(kind, TokenValue::Text(ch.to_string()), position));
        }
    }

    fn position(&self) -> Position {
        Position::new(self.cursor.line, self.cursor.column)
    }

    fn peek(&self) -> Option<char> {
        self.source[self.cursor.offset..].chars().next()
    }

    fn peek_second(&self) -> Option<char> {
        let mut chars = self.source[self.cursor.offset..].chars();
        chars.next();
        chars.next()
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.cursor.offset += ch.len_utf8();
        if ch == '\n' {
            self.cursor.line += 1;
            self.cursor.column = 1;
        } else {
            self.cursor.column += 1;
        }
        Some(ch)
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(ch) if ch.is_whitespace()) {
            self.advance();
        }
    }

    fn skip_comment(&mut self) {
        while matches!(self.peek(), Some(ch) if ch != '\n') {
            self.advance();
        }
    }

    fn skip_digits(&mut self) {
        while matches!(self.peek(), Some(ch) if ch.is_ascii_digit()) {
            self.advance();
        }
    }

    fn read_number(&mut self) -> Token {
        let position = self.position();
        let start = self.cursor.offset;

        self.skip_digits();
        // A period is only a decimal point when a digit follows; otherwise it ends the statement.
        if self.peek() == Some('.') && matches!(self.peek_second(), Some(ch) if ch.is_ascii_digit()) {
            self.advance();
            self.skip_digits();
        }

        let text = &self.source[start..self.cursor.offset];
        // digits[.digits] always parses
        let number = text.parse::<f64>().unwrap_or_default();
        Token::new(TokenKind::Number, TokenValue::Number(number), position)
    }

    fn scan_word(&mut self) -> &'src str {
        let start = self.cursor.offset;
        while matches!(self.peek(), Some(ch) if ch.is_alphanumeric() || ch == '_') {
            self.advance();
        }
        &self.source[start..self.cursor.offset]
    }

    fn read_word(&mut self) -> Token {
        let position = self.position();
        let word = self.scan_word();
        let lowered = word.to_lowercase();

        for (lead, rest, kind, text) in FUSED_OPERATORS {
            if lowered == lead && self.try_fuse(rest) {
                return Token::new(kind, TokenValue::Text(text.to_string()), position);
            }
        }

        let kind = TokenKind::keyword(&lowered).unwrap_or(TokenKind::Identifier);
        Token::new(kind, TokenValue::Text(word.to_string()), position)
    }

    /// Consumes `words` if they come next, separated by whitespace and compared
    /// case-insensitively. On any mismatch the cursor is restored exactly.
    fn try_fuse(&mut self, words: &[&str]) -> bool {
        let checkpoint = self.cursor;
        for expected in words {
            self.skip_whitespace();
            if !self.scan_word().eq_ignore_ascii_case(expected) {
                self.cursor = checkpoint;
                return false;
            }
        }
        true
    }
}

/// Drains a lexer into a token list ending with the `Eof` token.
pub fn tokenize(source: &str) -> Result<Vec<Token>, LexError> {
    let mut lexer = Lexer::new(source);
    let mut tokens = Vec::new();
    loop {
        let token = lexer.next_token()?;
        let done = token.is(TokenKind::Eof);
        tokens.push(token);
        if done {
            return Ok(tokens);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        tokenize(source).unwrap().iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_keywords_are_case_insensitive() {
        assert_eq!(
            kinds("SET x To 5."),
            vec![
                TokenKind::Set,
                TokenKind::Identifier,
                TokenKind::To,
                TokenKind::Number,
                TokenKind::Period,
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn test_identifier_keeps_original_case() {
        let tokens = tokenize("print Hello.").unwrap();
        assert_eq!(tokens[1].value, TokenValue::Text("Hello".to_string()));
    }

    #[test]
    fn test_numbers() {
        let tokens = tokenize("42 3.25 7.").unwrap();
        assert_eq!(tokens[0].value, TokenValue::Number(42.0));
        assert_eq!(tokens[1].value, TokenValue::Number(3.25));
        assert_eq!(tokens[2].value, TokenValue::Number(7.0));
        assert_eq!(tokens[3].kind, TokenKind::Period);
        assert_eq!(tokens[4].kind, TokenKind::Eof);
    }

    #[test]
    fn test_comments_and_whitespace_are_skipped() {
        assert_eq!(
            kinds("// a comment\nprint x. // trailing\n\t"),
            vec![TokenKind::Print, TokenKind::Identifier, TokenKind::Period, TokenKind::Eof]
        );
    }

    #[test]
    fn test_divided_by_fuses() {
        let tokens = tokenize("10 divided   by 2").unwrap();
        assert_eq!(tokens[1].kind, TokenKind::DividedBy);
        assert_eq!(tokens[1].position, Position::new(1, 4));
        assert_eq!(tokens[2].value, TokenValue::Number(2.0));
    }

    #[test]
    fn test_bare_divided_backtracks_to_identifier() {
        let tokens = tokenize("set divided to 1.").unwrap();
        assert_eq!(tokens[1].kind, TokenKind::Identifier);
        assert_eq!(tokens[1].text(), "divided");
        assert_eq!(tokens[2].kind, TokenKind::To);
        assert_eq!(tokens[2].position, Position::new(1, 13));
    }

    #[test]
    fn test_backtrack_restores_line_tracking() {
        let tokens = tokenize("divided\nx").unwrap();
        assert_eq!(tokens[0].kind, TokenKind::Identifier);
        assert_eq!(tokens[1].position, Position::new(2, 1));
    }

    #[test]
    fn test_comparison_fusion() {
        assert_eq!(
            kinds("a is greater than b is less than c is equal to d"),
            vec![
                TokenKind::Identifier,
                TokenKind::IsGreaterThan,
                TokenKind::Identifier,
                TokenKind::IsLessThan,
                TokenKind::Identifier,
                TokenKind::Equals,
                TokenKind::Identifier,
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn test_partial_comparison_backtracks() {
        let tokens = tokenize("is greater pasta").unwrap();
        assert_eq!(tokens[0].kind, TokenKind::Identifier);
        assert_eq!(tokens[1].kind, TokenKind::Identifier);
        assert_eq!(tokens[1].text(), "greater");
        assert_eq!(tokens[1].position, Position::new(1, 4));
    }

    #[test]
    fn test_and_store_in_fuses() {
        assert_eq!(
            kinds("ask name and store in n."),
            vec![
                TokenKind::Ask,
                TokenKind::Identifier,
                TokenKind::StoreIn,
                TokenKind::Identifier,
                TokenKind::Period,
                TokenKind::Eof
            ]
        );
        assert_eq!(kinds("a and b")[1], TokenKind::And);
        assert_eq!(kinds("a or b")[1], TokenKind::Or);
    }

    #[test]
    fn test_times_is_one_kind() {
        assert_eq!(kinds("repeat 3 times")[2], TokenKind::Times);
        assert_eq!(kinds("3 times 4")[1], TokenKind::Times);
    }

    #[test]
    fn test_positions() {
        let tokens = tokenize("set x to 1.\n  print x.").unwrap();
        assert_eq!(tokens[0].position, Position::new(1, 1));
        assert_eq!(tokens[4].position, Position::new(1, 11));
        assert_eq!(tokens[5].position, Position::new(2, 3));
    }

    #[test]
    fn test_invalid_character() {
        let err = tokenize("set x to 5!").unwrap_err();
        assert_eq!(
            err,
            LexError::UnexpectedCharacter {
                ch: '!',
                position: Position::new(1, 11)
            }
        );
        assert_eq!(err.to_string(), "invalid character '!' at 1:11");
    }

    #[test]
    fn test_single_slash_is_invalid() {
        assert!(matches!(
            tokenize("10 / 2"),
            Err(LexError::UnexpectedCharacter { ch: '/', .. })
        ));
    }

    #[test]
    fn test_lexing_is_lazy() {
        let mut lexer = Lexer::new("print hi. ?");
        assert_eq!(lexer.next_token().unwrap().kind, TokenKind::Print);
        assert_eq!(lexer.next_token().unwrap().kind, TokenKind::Identifier);
        assert_eq!(lexer.next_token().unwrap().kind, TokenKind::Period);
        assert!(lexer.next_token().is_err());
    }

    #[test]
    fn test_eof_repeats() {
        let mut lexer = Lexer::new("");
        assert!(lexer.next_token().unwrap().is(TokenKind::Eof));
        assert!(lexer.next_token().unwrap().is(TokenKind::Eof));
    }
}
