use std::rc::Rc;

use tracing::{debug, trace};

use crate::{Position, Span, MK_TOKEN};

use super::tokens::{lookup_ident, Token, TokenKind};

/// Character-level scanner producing one token per call to [`Lexer::next_token`].
///
/// The lexer never fails: characters it does not recognise come back as
/// [`TokenKind::Illegal`] tokens and scanning carries on after them.
#[derive(Clone)]
pub struct Lexer {
    source: Vec<char>,
    /// Index of `ch`
    pos: usize,
    /// Index of the character after `ch`
    read_pos: usize,
    /// Character under examination, `None` once the input is exhausted
    ch: Option<char>,
    file: Rc<String>,
}

impl Lexer {
    pub fn new(source: String, file: Option<String>) -> Lexer {
        let file_name = if let Some(file) = file {
            Rc::new(file)
        } else {
            Rc::new(String::from("shell"))
        };

        let mut lexer = Lexer {
            source: source.chars().collect(),
            pos: 0,
            read_pos: 0,
            ch: None,
            file: file_name,
        };
        lexer.read_char();
        lexer
    }

    /// Produces the next token. Once the input is exhausted every call
    /// returns an `EOF` token without moving the cursor.
    pub fn next_token(&mut self) -> Token {
        self.skip_whitespace();

        let start = self.pos;
        let token = match self.ch {
            None => return self.make_token(TokenKind::EOF, String::new(), start),
            Some('=') => self.one_or_two(TokenKind::Assignment, '=', TokenKind::Equals),
            Some('!') => self.one_or_two(TokenKind::Not, '=', TokenKind::NotEquals),
            Some('+') => self.single(TokenKind::Plus),
            Some('-') => self.single(TokenKind::Dash),
            Some('*') => self.single(TokenKind::Star),
            Some('/') => self.single(TokenKind::Slash),
            Some('<') => self.single(TokenKind::Less),
            Some('>') => self.single(TokenKind::Greater),
            Some(',') => self.single(TokenKind::Comma),
            Some(';') => self.single(TokenKind::Semicolon),
            Some('(') => self.single(TokenKind::OpenParen),
            Some(')') => self.single(TokenKind::CloseParen),
            Some('{') => self.single(TokenKind::OpenCurly),
            Some('}') => self.single(TokenKind::CloseCurly),
            Some(c) if is_letter(c) => {
                let word = self.read_while(is_letter);
                self.make_token(lookup_ident(&word), word, start)
            }
            Some(c) if c.is_ascii_digit() => {
                let digits = self.read_while(|c| c.is_ascii_digit());
                self.make_token(TokenKind::Number, digits, start)
            }
            Some(c) => {
                debug!(character = %c, offset = start, "illegal character");
                self.single(TokenKind::Illegal)
            }
        };

        trace!(kind = %token.kind, literal = %token.literal, "token");
        token
    }

    /// Whether the whole input has been consumed.
    pub fn at_eof(&self) -> bool {
        self.ch.is_none()
    }

    fn read_char(&mut self) {
        self.ch = self.source.get(self.read_pos).copied();
        if self.read_pos <= self.source.len() {
            self.pos = self.read_pos;
            self.read_pos += 1;
        }
    }

    fn peek_char(&self) -> Option<char> {
        self.source.get(self.read_pos).copied()
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.ch, Some(' ' | '\t' | '\n' | '\r')) {
            self.read_char();
        }
    }

    fn read_while(&mut self, predicate: fn(char) -> bool) -> String {
        let start = self.pos;
        while self.ch.is_some_and(predicate) {
            self.read_char();
        }
        self.source[start..self.pos].iter().collect()
    }

    /// Consumes the current character as a token of `kind`.
    fn single(&mut self, kind: TokenKind) -> Token {
        let start = self.pos;
        let literal = self.ch.map(String::from).unwrap_or_default();
        self.read_char();
        self.make_token(kind, literal, start)
    }

    /// Emits `double` when the next character is `second`, `single` otherwise.
    fn one_or_two(&mut self, single: TokenKind, second: char, double: TokenKind) -> Token {
        if self.peek_char() != Some(second) {
            return self.single(single);
        }

        let start = self.pos;
        let mut literal = String::new();
        for _ in 0..2 {
            if let Some(c) = self.ch {
                literal.push(c);
            }
            self.read_char();
        }
        self.make_token(double, literal, start)
    }

    fn make_token(&self, kind: TokenKind, literal: String, start: usize) -> Token {
        MK_TOKEN!(
            kind,
            literal,
            Span {
                start: Position(start as u32, Rc::clone(&self.file)),
                end: Position(self.pos as u32, Rc::clone(&self.file)),
            }
        )
    }
}

fn is_letter(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

/// Drains a fresh lexer over `source`, returning every token up to and
/// including the terminating `EOF`.
#[tracing::instrument(skip_all, fields(source_len = source.len()))]
pub fn tokenize(source: String, file: Option<String>) -> Vec<Token> {
    let mut lex = Lexer::new(source, file);
    let mut tokens = vec![];

    loop {
        let token = lex.next_token();
        let done = token.is(TokenKind::EOF);
        tokens.push(token);
        if done {
            break;
        }
    }

    tokens
}
