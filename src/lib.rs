#![allow(clippy::module_inception)]

use std::rc::Rc;

use crate::errors::errors::{Error, ErrorTip};

pub mod ast;
pub mod errors;
pub mod lexer;
pub mod macros;
pub mod parser;

pub use ast::ast::{Expression, Node, Program, Statement};
pub use errors::errors::ErrorImpl;
pub use lexer::lexer::{tokenize, Lexer};
pub use parser::parser::{parse, Parser, ParserConfig, DEFAULT_MAX_DEPTH};

/// A character offset into a named source.
#[derive(Debug, Clone, PartialEq)]
pub struct Position(pub u32, pub Rc<String>);

impl Position {
    pub fn null() -> Self {
        Position(0, Rc::new(String::from("<null>")))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Span {
    pub start: Position,
    pub end: Position,
}

/// Locates the line containing the character at `position`.
///
/// Returns the 1-based line number, the line text (including its newline)
/// and the column of `position` within that line. An offset at the very end
/// of the source resolves to the end of the last line.
pub fn get_line_at_position(source: &str, position: u32) -> Option<(usize, String, usize)> {
    let pos = position as usize;
    let mut start = 0;
    let mut last = None;

    for (index, line) in source.split_inclusive('\n').enumerate() {
        let len = line.chars().count();
        let end = start + len;

        if (start..end).contains(&pos) {
            return Some((index + 1, line.to_string(), pos - start));
        }

        last = Some((index + 1, line.to_string(), len));
        start = end;
    }

    if pos == start {
        return Some(last.unwrap_or((1, String::new(), 0)));
    }

    None
}


/// Renders a caret diagnostic for `error` against the source it came from.
///
/// ```text
/// Error: UnexpectedToken: expected next token to be Identifier, got Assignment instead
/// -> main.mk
///   |
/// 1 | let = 5;
///   | ----^
/// ```
pub fn format_error(error: &Error, source: &str) -> String {
    let position = error.get_position();
    let mut out = String::new();

    match error.get_tip() {
        ErrorTip::None => out.push_str(&format!("Error: {}: {}\n", error.get_error_name(), error)),
        tip => out.push_str(&format!(
            "Error: {}: {} ({})\n",
            error.get_error_name(),
            error,
            tip
        )),
    }
    out.push_str(&format!("-> {}\n", position.1));

    let Some((line, line_text, line_pos)) = get_line_at_position(source, position.0) else {
        return out;
    };

    let line_string = line.to_string();
    let padding = line_string.len() + 2;

    out.push_str(&format!("{:>padding$}\n", "|"));

    let (line_text_removed, removed_whitespace) = remove_starting_whitespace(&line_text);
    out.push_str(&format!("{} | {}\n", line_string, line_text_removed.trim_end()));

    let arrows = line_pos.saturating_sub(removed_whitespace) + 1;
    out.push_str(&format!("{:>padding$} {:->arrows$}\n", "|", "^"));

    out
}

/// Prints [`format_error`] output to stderr.
pub fn display_error(error: &Error, source: &str) {
    eprint!("{}", format_error(error, source));
}

fn remove_starting_whitespace(string: &str) -> (String, usize) {
    let mut start = 0;
    for c in string.chars() {
        if c == ' ' || c == '\t' {
            start += 1;
        } else {
            break;
        }
    }

    (string.chars().skip(start).collect(), start)
}
