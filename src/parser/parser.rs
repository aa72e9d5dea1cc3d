//! Parser implementation for building the Abstract Syntax Tree.
//!
//! This module contains the main Parser struct. The parser pulls tokens
//! from a [`Lexer`] on demand and keeps a two-token window (`current` and
//! `peek`). Expressions are parsed Pratt-style with NUD/LED handlers looked
//! up by token kind.
//!
//! It maintains lookup tables for:
//! - Statement handlers
//! - NUD (null denotation) handlers for prefix expressions
//! - LED (left denotation) handlers for infix expressions
//! - Binding powers for operator precedence
//!
//! Malformed input never aborts the parse. Each problem is recorded in the
//! parser's error list and parsing resumes with the following tokens.

use std::collections::HashMap;

use tracing::debug;

use crate::{
    ast::ast::Program,
    errors::errors::{Error, ErrorImpl},
    lexer::{
        lexer::Lexer,
        tokens::{Token, TokenKind},
    },
    Position,
};

use super::{
    lookups::{
        create_token_lookups, BPLookup, BindingPower, LEDHandler, LEDLookup, NUDHandler, NUDLookup,
        StmtHandler, StmtLookup,
    },
    stmt::parse_stmt,
};

/// Expression nesting allowed before the parser gives up on the input.
pub const DEFAULT_MAX_DEPTH: usize = 256;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParserConfig {
    /// Maximum number of expressions being parsed inside one another
    pub max_depth: usize,
}

impl Default for ParserConfig {
    fn default() -> Self {
        ParserConfig {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// The main parser structure that maintains parsing state.
pub struct Parser {
    /// Token source, advanced one token at a time
    lexer: Lexer,
    /// Token under examination
    current: Token,
    /// Token after `current`
    peek: Token,
    /// Diagnostics in the order they were recorded
    errors: Vec<Error>,
    /// Lookup table for statement parsing handlers
    stmt_lookup: StmtLookup,
    /// Lookup table for null denotation (prefix) expression handlers
    nud_lookup: NUDLookup,
    /// Lookup table for left denotation (infix) expression handlers
    led_lookup: LEDLookup,
    /// Lookup table for expression binding powers (precedence)
    binding_power_lookup: BPLookup,
    config: ParserConfig,
    /// Expressions currently being parsed
    depth: usize,
    /// Set once the nesting limit is hit; the remaining input is discarded
    halted: bool,
}

impl Parser {
    /// Creates a parser over `lexer` with the default configuration.
    pub fn new(lexer: Lexer) -> Self {
        Parser::with_config(lexer, ParserConfig::default())
    }

    /// Creates a parser over `lexer`, filling the token window and the
    /// lookup tables.
    pub fn with_config(mut lexer: Lexer, config: ParserConfig) -> Self {
        let current = lexer.next_token();
        let peek = lexer.next_token();

        let mut parser = Parser {
            lexer,
            current,
            peek,
            errors: vec![],
            stmt_lookup: HashMap::new(),
            nud_lookup: HashMap::new(),
            led_lookup: HashMap::new(),
            binding_power_lookup: HashMap::new(),
            config,
            depth: 0,
            halted: false,
        };
        create_token_lookups(&mut parser);
        parser
    }

    /// Parses statements until end of input.
    ///
    /// Always returns a `Program`; check [`Parser::errors`] to know whether
    /// it is complete.
    pub fn parse_program(&mut self) -> Program {
        let mut program = Program::default();

        while !self.current_is(TokenKind::EOF) {
            if let Some(stmt) = parse_stmt(self) {
                program.statements.push(stmt);
            }
            self.advance();
        }

        debug!(
            statements = program.statements.len(),
            errors = self.errors.len(),
            "parsed program"
        );
        program
    }

    /// Diagnostics recorded so far, in order.
    pub fn errors(&self) -> &[Error] {
        &self.errors
    }

    pub fn into_errors(self) -> Vec<Error> {
        self.errors
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Returns the current token without advancing.
    pub fn current_token(&self) -> &Token {
        &self.current
    }

    /// Returns the kind of the current token.
    pub fn current_token_kind(&self) -> TokenKind {
        self.current.kind
    }

    pub fn peek_token(&self) -> &Token {
        &self.peek
    }

    pub fn current_is(&self, kind: TokenKind) -> bool {
        self.current.kind == kind
    }

    pub fn peek_is(&self, kind: TokenKind) -> bool {
        self.peek.kind == kind
    }

    /// Shifts the token window forward by one token.
    pub fn advance(&mut self) {
        let next = self.lexer.next_token();
        self.current = std::mem::replace(&mut self.peek, next);
    }

    /// Advances if `peek` is of `expected_kind`, otherwise records an
    /// `UnexpectedToken` error and leaves the window untouched.
    pub fn expect_peek(&mut self, expected_kind: TokenKind) -> bool {
        if self.peek_is(expected_kind) {
            self.advance();
            true
        } else {
            self.peek_error(expected_kind);
            false
        }
    }

    pub fn peek_error(&mut self, expected_kind: TokenKind) {
        let position = self.peek.span.start.clone();
        self.push_error(
            ErrorImpl::UnexpectedToken {
                expected: expected_kind,
                found: self.peek.kind,
            },
            position,
        );
    }

    /// Binding power of `peek`, `Lowest` for tokens without one.
    pub fn peek_binding_power(&self) -> BindingPower {
        *self
            .binding_power_lookup
            .get(&self.peek.kind)
            .unwrap_or(&BindingPower::Lowest)
    }

    /// Binding power of `current`, `Lowest` for tokens without one.
    pub fn current_binding_power(&self) -> BindingPower {
        *self
            .binding_power_lookup
            .get(&self.current.kind)
            .unwrap_or(&BindingPower::Lowest)
    }

    /// Records a diagnostic. Ignored once the parser has halted.
    pub fn push_error(&mut self, error: ErrorImpl, position: Position) {
        if self.halted {
            return;
        }

        debug!(offset = position.0, "{}", error);
        self.errors.push(Error::new(error, position));
    }

    /// Returns the current position in the source file.
    pub fn get_position(&self) -> Position {
        self.current.span.start.clone()
    }

    /// Marks entry into one more nested expression.
    ///
    /// Returns `false` when the expression must not be parsed: either the
    /// parser has already halted, or this entry would exceed
    /// `config.max_depth`, in which case a `NestingTooDeep` error is recorded
    /// and the rest of the input is discarded.
    pub fn enter_expression(&mut self) -> bool {
        if self.halted {
            return false;
        }

        if self.depth >= self.config.max_depth {
            let position = self.get_position();
            self.push_error(
                ErrorImpl::NestingTooDeep {
                    limit: self.config.max_depth,
                },
                position,
            );
            self.halted = true;
            while !self.current_is(TokenKind::EOF) {
                self.advance();
            }
            return false;
        }

        self.depth += 1;
        true
    }

    /// Matches a successful [`Parser::enter_expression`].
    pub fn exit_expression(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    /// Returns a reference to the statement lookup table.
    pub fn get_stmt_lookup(&self) -> &StmtLookup {
        &self.stmt_lookup
    }

    /// Returns a reference to the NUD (null denotation) lookup table.
    pub fn get_nud_lookup(&self) -> &NUDLookup {
        &self.nud_lookup
    }

    /// Returns a reference to the LED (left denotation) lookup table.
    pub fn get_led_lookup(&self) -> &LEDLookup {
        &self.led_lookup
    }

    /// Registers a left denotation (infix) handler for a token.
    ///
    /// # Arguments
    ///
    /// * `kind` - The token kind to register
    /// * `binding_power` - The precedence/binding power for this operator
    /// * `led_fn` - The handler function for this infix operator
    pub fn led(&mut self, kind: TokenKind, binding_power: BindingPower, led_fn: LEDHandler) {
        self.binding_power_lookup.insert(kind, binding_power);
        self.led_lookup.insert(kind, led_fn);
    }

    /// Registers a null denotation (prefix) handler for a token.
    pub fn nud(&mut self, kind: TokenKind, nud_fn: NUDHandler) {
        self.nud_lookup.insert(kind, nud_fn);
    }

    /// Registers a statement handler for a token.
    pub fn stmt(&mut self, kind: TokenKind, stmt_fn: StmtHandler) {
        self.stmt_lookup.insert(kind, stmt_fn);
    }
}

/// Parses `source` into a `Program`.
///
/// This is the main entry point for parsing. It creates a lexer and a parser
/// instance and parses all statements until EOF.
///
/// # Returns
///
/// A tuple containing:
/// - The root `Program`, possibly with absent expression slots
/// - Every error recorded along the way; empty when the parse was clean
#[tracing::instrument(skip_all, fields(source_len = source.len()))]
pub fn parse(source: String, file: Option<String>) -> (Program, Vec<Error>) {
    let mut parser = Parser::new(Lexer::new(source, file));
    let program = parser.parse_program();

    (program, parser.into_errors())
}
