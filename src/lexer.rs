//! Lexer: turns C source text into a token stream.
//!
//! Lexing an upstream concern in principle, but needed here to make the
//! crate runnable end to end. Kept small, covering the token set a C
//! subset interpreter actually needs.

use crate::error::CError;

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    // literals
    IntConst(i64),
    CharConst(i64),
    RealConst(f64),
    StringLit(String),
    Ident(String),

    // type keywords
    Void,
    Char,
    Short,
    Int,
    Long,
    Float,
    Double,
    Signed,
    Unsigned,

    // control-flow / struct keywords
    Struct,
    If,
    Else,
    For,
    While,
    Do,
    Switch,
    Case,
    Default,
    Break,
    Continue,
    Return,

    // operators
    Plus,
    Minus,
    Asterisk,
    DivOp,
    ModOp,
    Ampersand,
    OrOp,
    XorOp,
    LeftOp,
    RightOp,
    LtOp,
    GtOp,
    LeOp,
    GeOp,
    EqOp,
    NeOp,
    LogAnd,
    LogOr,
    LogNeg,
    IncOp,
    DecOp,
    Assign,
    AddAssign,
    SubAssign,
    MulAssign,
    DivAssign,
    LeftAssign,
    RightAssign,
    AndAssign,
    OrAssign,
    XorAssign,
    Arrow,

    // punctuation
    LParen,
    RParen,
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    Semicolon,
    Comma,
    Dot,
    Colon,

    /// Synthetic token for `#include <name>` / `#include "name"`.
    IncludeLibrary(String),

    Eof,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub line: u32,
}

pub struct Lexer<'a> {
    bytes: &'a [u8],
    pos: usize,
    line: u32,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self { bytes: source.as_bytes(), pos: 0, line: 1 }
    }

    /// Tokenizes the whole source, ending with a single `Eof` token.
    pub fn tokenize(mut self) -> Result<Vec<Token>, CError> {
        let mut tokens = Vec::new();
        loop {
            let tok = self.next_token()?;
            let is_eof = tok.kind == TokenKind::Eof;
            tokens.push(tok);
            if is_eof {
                return Ok(tokens);
            }
        }
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<u8> {
        self.bytes.get(self.pos + offset).copied()
    }

    fn advance(&mut self) -> Option<u8> {
        let b = self.peek()?;
        self.pos += 1;
        if b == b'\n' {
            self.line += 1;
        }
        Some(b)
    }

    fn skip_trivia(&mut self) {
        loop {
            match self.peek() {
                Some(b) if b.is_ascii_whitespace() => {
                    self.advance();
                }
                Some(b'/') if self.peek_at(1) == Some(b'/') => {
                    while !matches!(self.peek(), None | Some(b'\n')) {
                        self.advance();
                    }
                }
                Some(b'/') if self.peek_at(1) == Some(b'*') => {
                    self.advance();
                    self.advance();
                    while !(self.peek() == Some(b'*') && self.peek_at(1) == Some(b'/')) {
                        if self.advance().is_none() {
                            break;
                        }
                    }
                    self.advance();
                    self.advance();
                }
                _ => break,
            }
        }
    }

    fn make(&self, kind: TokenKind, line: u32) -> Token {
        Token { kind, line }
    }

    fn two_char(&mut self, second: u8, then: TokenKind, otherwise: TokenKind) -> TokenKind {
        if self.peek() == Some(second) {
            self.advance();
            then
        } else {
            otherwise
        }
    }

    fn next_token(&mut self) -> Result<Token, CError> {
        self.skip_trivia();
        let line = self.line;
        let Some(b) = self.peek() else {
            return Ok(self.make(TokenKind::Eof, line));
        };

        if b == b'#' {
            return self.lex_include(line);
        }
        if b.is_ascii_digit() || (b == b'.' && self.peek_at(1).is_some_and(|n| n.is_ascii_digit())) {
            return self.lex_number(line);
        }
        if b.is_ascii_alphabetic() || b == b'_' {
            return self.lex_ident_or_keyword(line);
        }
        if b == b'\'' {
            return self.lex_char(line);
        }
        if b == b'"' {
            return self.lex_string(line);
        }

        self.advance();
        let kind = match b {
            b'+' => {
                if self.peek() == Some(b'+') {
                    self.advance();
                    TokenKind::IncOp
                } else if self.peek() == Some(b'=') {
                    self.advance();
                    TokenKind::AddAssign
                } else {
                    TokenKind::Plus
                }
            }
            b'-' => {
                if self.peek() == Some(b'-') {
                    self.advance();
                    TokenKind::DecOp
                } else if self.peek() == Some(b'>') {
                    self.advance();
                    TokenKind::Arrow
                } else if self.peek() == Some(b'=') {
                    self.advance();
                    TokenKind::SubAssign
                } else {
                    TokenKind::Minus
                }
            }
            b'*' => self.two_char(b'=', TokenKind::MulAssign, TokenKind::Asterisk),
            b'/' => self.two_char(b'=', TokenKind::DivAssign, TokenKind::DivOp),
            b'%' => TokenKind::ModOp,
            b'^' => self.two_char(b'=', TokenKind::XorAssign, TokenKind::XorOp),
            b'|' => {
                if self.peek() == Some(b'|') {
                    self.advance();
                    TokenKind::LogOr
                } else if self.peek() == Some(b'=') {
                    self.advance();
                    TokenKind::OrAssign
                } else {
                    TokenKind::OrOp
                }
            }
            b'&' => {
                if self.peek() == Some(b'&') {
                    self.advance();
                    TokenKind::LogAnd
                } else if self.peek() == Some(b'=') {
                    self.advance();
                    TokenKind::AndAssign
                } else {
                    TokenKind::Ampersand
                }
            }
            b'<' => {
                if self.peek() == Some(b'<') {
                    self.advance();
                    self.two_char(b'=', TokenKind::LeftAssign, TokenKind::LeftOp)
                } else if self.peek() == Some(b'=') {
                    self.advance();
                    TokenKind::LeOp
                } else {
                    TokenKind::LtOp
                }
            }
            b'>' => {
                if self.peek() == Some(b'>') {
                    self.advance();
                    self.two_char(b'=', TokenKind::RightAssign, TokenKind::RightOp)
                } else if self.peek() == Some(b'=') {
                    self.advance();
                    TokenKind::GeOp
                } else {
                    TokenKind::GtOp
                }
            }
            b'=' => self.two_char(b'=', TokenKind::EqOp, TokenKind::Assign),
            b'!' => self.two_char(b'=', TokenKind::NeOp, TokenKind::LogNeg),
            b'(' => TokenKind::LParen,
            b')' => TokenKind::RParen,
            b'{' => TokenKind::LBrace,
            b'}' => TokenKind::RBrace,
            b'[' => TokenKind::LBracket,
            b']' => TokenKind::RBracket,
            b';' => TokenKind::Semicolon,
            b',' => TokenKind::Comma,
            b'.' => TokenKind::Dot,
            b':' => TokenKind::Colon,
            other => return Err(CError::lex(format!("unexpected character '{}'", other as char), line)),
        };
        Ok(self.make(kind, line))
    }

    fn lex_include(&mut self, line: u32) -> Result<Token, CError> {
        self.advance(); // '#'
        while self.peek().is_some_and(|b| b.is_ascii_whitespace()) {
            self.advance();
        }
        let directive = self.take_ident_text();
        if directive != "include" {
            return Err(CError::lex(format!("unsupported preprocessor directive '{directive}'"), line));
        }
        while self.peek().is_some_and(|b| b.is_ascii_whitespace()) {
            self.advance();
        }
        let (open, close) = match self.peek() {
            Some(b'<') => (b'<', b'>'),
            Some(b'"') => (b'"', b'"'),
            _ => return Err(CError::lex("expected '<' or '\"' after #include", line)),
        };
        self.advance();
        let start = self.pos;
        while self.peek().is_some() && self.peek() != Some(close) {
            self.advance();
        }
        let name = String::from_utf8_lossy(&self.bytes[start..self.pos]).into_owned();
        if self.advance() != Some(close) {
            return Err(CError::lex(format!("unterminated #include, expected '{}'", open as char), line));
        }
        // `#include <name.h>` collapses to one synthetic token carrying the
        // library name; the parser only ever needs "here's a library name".
        Ok(self.make(TokenKind::IncludeLibrary(name), line))
    }

    fn take_ident_text(&mut self) -> String {
        let start = self.pos;
        while self.peek().is_some_and(|b| b.is_ascii_alphanumeric() || b == b'_') {
            self.advance();
        }
        String::from_utf8_lossy(&self.bytes[start..self.pos]).into_owned()
    }

    fn lex_number(&mut self, line: u32) -> Result<Token, CError> {
        let start = self.pos;
        let mut is_real = false;
        while self.peek().is_some_and(|b| b.is_ascii_digit()) {
            self.advance();
        }
        if self.peek() == Some(b'.') && self.peek_at(1).is_some_and(|b| b.is_ascii_digit()) {
            is_real = true;
            self.advance();
            while self.peek().is_some_and(|b| b.is_ascii_digit()) {
                self.advance();
            }
        }
        let text = std::str::from_utf8(&self.bytes[start..self.pos]).unwrap();
        let kind = if is_real {
            TokenKind::RealConst(text.parse().map_err(|_| CError::lex("malformed real literal", line))?)
        } else {
            TokenKind::IntConst(text.parse().map_err(|_| CError::lex("malformed integer literal", line))?)
        };
        Ok(self.make(kind, line))
    }

    fn lex_ident_or_keyword(&mut self, line: u32) -> Result<Token, CError> {
        let text = self.take_ident_text();
        let kind = match text.as_str() {
            "void" => TokenKind::Void,
            "char" => TokenKind::Char,
            "short" => TokenKind::Short,
            "int" => TokenKind::Int,
            "long" => TokenKind::Long,
            "float" => TokenKind::Float,
            "double" => TokenKind::Double,
            "signed" => TokenKind::Signed,
            "unsigned" => TokenKind::Unsigned,
            "struct" => TokenKind::Struct,
            "if" => TokenKind::If,
            "else" => TokenKind::Else,
            "for" => TokenKind::For,
            "while" => TokenKind::While,
            "do" => TokenKind::Do,
            "switch" => TokenKind::Switch,
            "case" => TokenKind::Case,
            "default" => TokenKind::Default,
            "break" => TokenKind::Break,
            "continue" => TokenKind::Continue,
            "return" => TokenKind::Return,
            _ => TokenKind::Ident(text),
        };
        Ok(self.make(kind, line))
    }

    fn lex_char(&mut self, line: u32) -> Result<Token, CError> {
        self.advance(); // opening quote
        let value = match self.advance() {
            Some(b'\\') => match self.advance() {
                Some(b'n') => b'\n' as i64,
                Some(b't') => b'\t' as i64,
                Some(b'0') => 0,
                Some(other) => other as i64,
                None => return Err(CError::lex("unterminated char literal", line)),
            },
            Some(b) => b as i64,
            None => return Err(CError::lex("unterminated char literal", line)),
        };
        if self.advance() != Some(b'\'') {
            return Err(CError::lex("expected closing '\\'' in char literal", line));
        }
        Ok(self.make(TokenKind::CharConst(value), line))
    }

    fn lex_string(&mut self, line: u32) -> Result<Token, CError> {
        self.advance(); // opening quote
        let mut text = String::new();
        loop {
            match self.advance() {
                Some(b'"') => break,
                Some(b'\\') => match self.advance() {
                    Some(b'n') => text.push('\n'),
                    Some(b't') => text.push('\t'),
                    Some(b'"') => text.push('"'),
                    Some(b'\\') => text.push('\\'),
                    Some(other) => text.push(other as char),
                    None => return Err(CError::lex("unterminated string literal", line)),
                },
                Some(b) => text.push(b as char),
                None => return Err(CError::lex("unterminated string literal", line)),
            }
        }
        Ok(self.make(TokenKind::StringLit(text), line))
    }
}
