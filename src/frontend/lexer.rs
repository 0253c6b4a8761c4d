use std::{collections::BTreeMap, str::Chars};

use itertools::{PeekNth, peek_nth};
use once_cell::sync::Lazy;

use crate::frontend::{SourceFile, SyntaxError};

#[derive(Debug)]
pub struct Lexer<'source> {
    position: usize,
    chars: PeekNth<Chars<'source>>,
}

#[derive(Debug, Clone)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /* Words */
    Identifier, // x

    /* Literals */
    IntegerLiteral, // 20

    /* Delimiters */
    OpenParen,  // (
    CloseParen, // )

    /* Binary Ops */
    Plus,     // +
    Minus,    // -
    Asterisk, // *
    Divide,   // /
}

impl TokenKind {
    pub fn is_term_operator(&self) -> bool {
        matches!(self, Self::Plus | Self::Minus)
    }

    pub fn is_factor_operator(&self) -> bool {
        matches!(self, Self::Asterisk | Self::Divide)
    }
}

/// Table of single char tokens (every operator and delimiter in the
/// language is one)
static SINGLE_TOKENS: Lazy<BTreeMap<char, TokenKind>> = Lazy::new(|| {
    BTreeMap::from([
        ('(', TokenKind::OpenParen),
        (')', TokenKind::CloseParen),
        ('+', TokenKind::Plus),
        ('-', TokenKind::Minus),
        ('*', TokenKind::Asterisk),
        ('/', TokenKind::Divide),
    ])
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }
}

impl<'source> Lexer<'source> {
    /// Tokenizes the whole source up front, stopping at the first character
    /// that is not part of the language.
    pub fn tokenize(source: &'source SourceFile) -> Result<Vec<Token>, SyntaxError> {
        let mut lexer = Self {
            position: 0,
            chars: peek_nth(source.contents.chars()),
        };

        let mut tokens = Vec::new();

        while let Some(token) = lexer.next_token()? {
            tokens.push(token);
        }

        Ok(tokens)
    }

    fn next_token(&mut self) -> Result<Option<Token>, SyntaxError> {
        while let Some(c) = self.chars.peek().copied() {
            if !c.is_ascii() {
                return Err(SyntaxError::new(
                    Span::new(self.position, self.position + c.len_utf8()),
                    format!("unexpected non-ascii character `{c}`"),
                ));
            }

            let token = match c {
                // Ignore whitespace
                c if c.is_ascii_whitespace() => {
                    self.ignore_whitespace();
                    continue;
                }

                // Integer literals
                n if n.is_ascii_digit() => self.read_number(),

                // Variable names
                a if a.is_ascii_alphabetic() || a == '_' => self.read_word(),

                s if SINGLE_TOKENS.contains_key(&s) => {
                    self.read_single(*SINGLE_TOKENS.get(&s).unwrap())
                }

                c => {
                    return Err(SyntaxError::new(
                        Span::new(self.position, self.position + 1),
                        format!("unexpected character `{c}`"),
                    ));
                }
            };

            return Ok(Some(token));
        }

        Ok(None)
    }

    fn ignore_whitespace(&mut self) {
        while let Some(c) = self.chars.peek().copied() {
            if !c.is_ascii_whitespace() {
                break;
            }

            self.chars.next();
            self.position += 1;
        }
    }

    // A maximal run of digits. No sign and no decimal point exist in the
    // grammar, so this cannot produce anything but a non-negative integer.
    fn read_number(&mut self) -> Token {
        let start_position = self.position;

        while let Some(c) = self.chars.peek().copied() {
            if !c.is_ascii_digit() {
                break;
            }

            self.chars.next();
            self.position += 1;
        }

        Token {
            kind: TokenKind::IntegerLiteral,
            span: self.new_span(start_position),
        }
    }

    // Variable name: a letter or underscore, then letters, digits, or
    // underscores. The language has no keywords to carve out.
    fn read_word(&mut self) -> Token {
        let start_position = self.position;

        while let Some(c) = self.chars.peek().copied() {
            if !(c.is_ascii_alphanumeric() || c == '_') {
                break;
            }

            self.chars.next();
            self.position += 1;
        }

        Token {
            kind: TokenKind::Identifier,
            span: self.new_span(start_position),
        }
    }

    fn read_single(&mut self, kind: TokenKind) -> Token {
        let start_position = self.position;

        self.chars.next();
        self.position += 1;

        Token {
            kind,
            span: self.new_span(start_position),
        }
    }

    fn new_span(&self, start: usize) -> Span {
        Span {
            start,
            end: self.position,
        }
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────
