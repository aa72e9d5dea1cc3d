use tracing::trace;

use crate::{
    ast::{
        ast::Statement,
        expressions::Identifier,
        statements::{BlockStatement, ExpressionStatement, LetStatement, ReturnStatement},
    },
    errors::errors::ErrorImpl,
    lexer::tokens::TokenKind,
    parser::{expr::parse_expr, lookups::BindingPower},
};

use super::parser::Parser;

/// Parses one statement starting at `current`. `None` means the statement
/// was malformed and has been reported.
pub fn parse_stmt(parser: &mut Parser) -> Option<Statement> {
    trace!(kind = %parser.current_token_kind(), "statement");

    let handler = parser
        .get_stmt_lookup()
        .get(&parser.current_token_kind())
        .copied();
    if let Some(handler) = handler {
        return handler(parser);
    }

    Some(parse_expression_stmt(parser))
}

pub fn parse_let_stmt(parser: &mut Parser) -> Option<Statement> {
    let token = parser.current_token().clone();

    if !parser.expect_peek(TokenKind::Identifier) {
        return None;
    }

    let name_token = parser.current_token().clone();
    let name = Identifier {
        value: name_token.literal.clone(),
        token: name_token,
    };

    if !parser.expect_peek(TokenKind::Assignment) {
        return None;
    }

    parser.advance();
    let value = parse_expr(parser, BindingPower::Lowest);
    skip_semicolon(parser);

    Some(Statement::Let(LetStatement { token, name, value }))
}

pub fn parse_return_stmt(parser: &mut Parser) -> Option<Statement> {
    let token = parser.current_token().clone();
    parser.advance();

    let value = parse_expr(parser, BindingPower::Lowest);
    skip_semicolon(parser);

    Some(Statement::Return(ReturnStatement { token, value }))
}

pub fn parse_expression_stmt(parser: &mut Parser) -> Statement {
    let token = parser.current_token().clone();

    let expression = parse_expr(parser, BindingPower::Lowest);
    skip_semicolon(parser);

    Statement::Expression(ExpressionStatement { token, expression })
}

/// `current` is the opening `{`. Stops on the closing `}` (left in
/// `current`) or at end of input, which is reported as a missing `}`.
pub fn parse_block_stmt(parser: &mut Parser) -> BlockStatement {
    let token = parser.current_token().clone();
    let mut statements = Vec::new();

    parser.advance();

    while !parser.current_is(TokenKind::CloseCurly) && !parser.current_is(TokenKind::EOF) {
        if let Some(stmt) = parse_stmt(parser) {
            statements.push(stmt);
        }
        parser.advance();
    }

    if parser.current_is(TokenKind::EOF) {
        let position = parser.get_position();
        parser.push_error(
            ErrorImpl::UnexpectedToken {
                expected: TokenKind::CloseCurly,
                found: TokenKind::EOF,
            },
            position,
        );
    }

    BlockStatement { token, statements }
}

fn skip_semicolon(parser: &mut Parser) {
    if parser.peek_is(TokenKind::Semicolon) {
        parser.advance();
    }
}
