//! The scanner that produces tokens from source text.

use super::{Span, Token, TokenKind};

/// A scanner that tokenizes script source code.
pub struct Scanner<'a> {
    source: &'a str,
    chars: std::iter::Peekable<std::str::CharIndices<'a>>,
    current_pos: usize,
}

impl<'a> Scanner<'a> {
    /// Creates a new scanner for the given source code.
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            chars: source.char_indices().peekable(),
            current_pos: 0,
        }
    }

    /// Returns the next token from the source.
    pub fn next_token(&mut self) -> Token {
        let newline_before = match self.skip_whitespace_and_comments() {
            Ok(newline) => newline,
            Err(message) => {
                let start = self.current_pos;
                return Token::new(
                    TokenKind::Invalid(message),
                    Span::new(start, self.source.len()),
                    false,
                );
            }
        };

        let start = self.current_pos;

        let Some((_pos, ch)) = self.advance() else {
            return Token::new(TokenKind::Eof, Span::new(start, start), newline_before);
        };

        let kind = match ch {
            '{' => TokenKind::LeftBrace,
            '}' => TokenKind::RightBrace,
            '(' => TokenKind::LeftParen,
            ')' => TokenKind::RightParen,
            '[' => TokenKind::LeftBracket,
            ']' => TokenKind::RightBracket,
            ';' => TokenKind::Semicolon,
            ',' => TokenKind::Comma,
            ':' => TokenKind::Colon,
            '-' => TokenKind::Minus,
            '*' => TokenKind::Star,
            '/' => TokenKind::Slash,
            '%' => TokenKind::Percent,

            '.' => match self.peek() {
                Some(c) if c.is_ascii_digit() => self.scan_number(ch),
                _ => TokenKind::Dot,
            },
            '+' => {
                if self.eat('=') {
                    TokenKind::PlusAssign
                } else {
                    TokenKind::Plus
                }
            }
            '=' => {
                if self.eat('=') {
                    if self.eat('=') {
                        TokenKind::StrictEqual
                    } else {
                        TokenKind::Equal
                    }
                } else {
                    TokenKind::Assign
                }
            }
            '!' => {
                if self.eat('=') {
                    if self.eat('=') {
                        TokenKind::StrictNotEqual
                    } else {
                        TokenKind::NotEqual
                    }
                } else {
                    TokenKind::Bang
                }
            }

            '"' | '\'' => self.scan_string(ch),
            '0'..='9' => self.scan_number(ch),
            _ if is_id_start(ch) => self.scan_identifier(ch),

            _ => TokenKind::Invalid(format!("Unexpected character '{}'", ch)),
        };

        Token::new(kind, Span::new(start, self.current_pos), newline_before)
    }

    fn advance(&mut self) -> Option<(usize, char)> {
        let result = self.chars.next();
        if let Some((pos, ch)) = result {
            self.current_pos = pos + ch.len_utf8();
        }
        result
    }

    fn peek(&mut self) -> Option<char> {
        self.chars.peek().map(|(_, ch)| *ch)
    }

    fn peek_next(&self) -> Option<char> {
        let mut iter = self.chars.clone();
        iter.next();
        iter.next().map(|(_, ch)| ch)
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Skips whitespace and comments, reporting whether a line break was seen.
    fn skip_whitespace_and_comments(&mut self) -> Result<bool, String> {
        let mut newline = false;
        loop {
            match self.peek() {
                Some('\n' | '\r') => {
                    newline = true;
                    self.advance();
                }
                Some(c) if c.is_whitespace() => {
                    self.advance();
                }
                Some('/') => match self.peek_next() {
                    Some('/') => {
                        while let Some(ch) = self.peek() {
                            if ch == '\n' || ch == '\r' {
                                break;
                            }
                            self.advance();
                        }
                    }
                    Some('*') => {
                        self.advance();
                        self.advance();
                        let mut closed = false;
                        while let Some((_, ch)) = self.advance() {
                            if ch == '\n' || ch == '\r' {
                                newline = true;
                            }
                            if ch == '*' && self.eat('/') {
                                closed = true;
                                break;
                            }
                        }
                        if !closed {
                            return Err("Unterminated comment".to_string());
                        }
                    }
                    _ => return Ok(newline),
                },
                _ => return Ok(newline),
            }
        }
    }

    fn scan_string(&mut self, quote: char) -> TokenKind {
        let mut value = String::new();
        loop {
            let Some((_, ch)) = self.advance() else {
                return TokenKind::Invalid("Unterminated string literal".to_string());
            };
            match ch {
                c if c == quote => return TokenKind::String(value),
                '\n' | '\r' => {
                    return TokenKind::Invalid("Unterminated string literal".to_string());
                }
                '\\' => {
                    let Some((_, escaped)) = self.advance() else {
                        return TokenKind::Invalid("Unterminated string literal".to_string());
                    };
                    value.push(match escaped {
                        'n' => '\n',
                        't' => '\t',
                        'r' => '\r',
                        '0' => '\0',
                        other => other,
                    });
                }
                c => value.push(c),
            }
        }
    }

    fn scan_number(&mut self, first: char) -> TokenKind {
        let start = self.current_pos - first.len_utf8();
        let mut seen_dot = first == '.';

        while let Some(ch) = self.peek() {
            if ch.is_ascii_digit() {
                self.advance();
            } else if ch == '.' && !seen_dot && self.peek_next().is_some_and(|c| c.is_ascii_digit())
            {
                seen_dot = true;
                self.advance();
            } else {
                break;
            }
        }

        let text = &self.source[start..self.current_pos];
        match text.parse::<f64>() {
            Ok(n) => TokenKind::Number(n),
            Err(_) => TokenKind::Invalid(format!("Invalid number literal '{}'", text)),
        }
    }

    fn scan_identifier(&mut self, first: char) -> TokenKind {
        let start = self.current_pos - first.len_utf8();
        while let Some(ch) = self.peek() {
            if is_id_continue(ch) {
                self.advance();
            } else {
                break;
            }
        }

        let word = &self.source[start..self.current_pos];
        TokenKind::keyword(word).unwrap_or_else(|| TokenKind::Identifier(word.to_string()))
    }
}

fn is_id_start(ch: char) -> bool {
    ch.is_alphabetic() || ch == '_' || ch == '$'
}

fn is_id_continue(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_' || ch == '$'
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        let mut scanner = Scanner::new(source);
        let mut kinds = Vec::new();
        loop {
            let token = scanner.next_token();
            if token.kind == TokenKind::Eof {
                break;
            }
            kinds.push(token.kind);
        }
        kinds
    }

    #[test]
    fn test_declaration_tokens() {
        assert_eq!(
            kinds("var x = require('./a');"),
            vec![
                TokenKind::Var,
                TokenKind::Identifier("x".to_string()),
                TokenKind::Assign,
                TokenKind::Identifier("require".to_string()),
                TokenKind::LeftParen,
                TokenKind::String("./a".to_string()),
                TokenKind::RightParen,
                TokenKind::Semicolon,
            ]
        );
    }

    #[test]
    fn test_equality_operators() {
        assert_eq!(
            kinds("== === != !== = += !"),
            vec![
                TokenKind::Equal,
                TokenKind::StrictEqual,
                TokenKind::NotEqual,
                TokenKind::StrictNotEqual,
                TokenKind::Assign,
                TokenKind::PlusAssign,
                TokenKind::Bang,
            ]
        );
    }

    #[test]
    fn test_numbers_and_strings() {
        assert_eq!(
            kinds("42 3.5 .25 \"a\\nb\""),
            vec![
                TokenKind::Number(42.0),
                TokenKind::Number(3.5),
                TokenKind::Number(0.25),
                TokenKind::String("a\nb".to_string()),
            ]
        );
    }

    #[test]
    fn test_comments_and_newlines() {
        let mut scanner = Scanner::new("a // trailing\n/* block */ b");
        let a = scanner.next_token();
        let b = scanner.next_token();
        assert_eq!(a.kind, TokenKind::Identifier("a".to_string()));
        assert!(!a.newline_before);
        assert_eq!(b.kind, TokenKind::Identifier("b".to_string()));
        assert!(b.newline_before);
    }

    #[test]
    fn test_unterminated_string() {
        assert!(matches!(kinds("'abc").as_slice(), [TokenKind::Invalid(_)]));
    }
}
