//! Lexical analysis module.
//!
//! This module contains the lexer (scanner) that converts source code
//! into a stream of tokens for parsing. It handles:
//!
//! - On-demand tokenization, one token per request
//! - Recognition of keywords, identifiers, integer literals and operators
//! - One character of lookahead for `==` and `!=`
//! - Token position tracking for error reporting

pub mod lexer;
pub mod tokens;
