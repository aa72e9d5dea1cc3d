use crate::{
    ast::{
        ast::Expression,
        expressions::{
            BooleanLiteral, CallExpression, FunctionLiteral, Identifier, IfExpression,
            InfixExpression, IntegerLiteral, PrefixExpression,
        },
    },
    errors::errors::ErrorImpl,
    lexer::tokens::TokenKind,
};

use super::{lookups::BindingPower, parser::Parser, stmt::parse_block_stmt};

/// Parses an expression starting at `current`, consuming operators whose
/// binding power is strictly greater than `bp`. Leaves the last token of
/// the expression in `current`.
pub fn parse_expr(parser: &mut Parser, bp: BindingPower) -> Expression {
    if !parser.enter_expression() {
        return Expression::Absent;
    }

    let expr = parse_expr_within(parser, bp);
    parser.exit_expression();
    expr
}

fn parse_expr_within(parser: &mut Parser, bp: BindingPower) -> Expression {
    // First parse NUD
    let token_kind = parser.current_token_kind();
    let Some(nud) = parser.get_nud_lookup().get(&token_kind).copied() else {
        let literal = parser.current_token().literal.clone();
        let position = parser.get_position();
        parser.push_error(
            ErrorImpl::NoPrefixParseFn {
                kind: token_kind,
                literal,
            },
            position,
        );
        return Expression::Absent;
    };

    let mut left = nud(parser);

    // While the next operator binds tighter than `bp`, fold it into lhs
    while !parser.peek_is(TokenKind::Semicolon) && bp < parser.peek_binding_power() {
        let peek_kind = parser.peek_token().kind;
        let Some(led) = parser.get_led_lookup().get(&peek_kind).copied() else {
            return left;
        };

        parser.advance();
        left = led(parser, left);
    }

    left
}

pub fn parse_identifier_expr(parser: &mut Parser) -> Expression {
    Expression::Identifier(current_identifier(parser))
}

pub fn parse_integer_expr(parser: &mut Parser) -> Expression {
    let token = parser.current_token().clone();

    match token.literal.parse::<i64>() {
        Ok(value) => Expression::Integer(IntegerLiteral { token, value }),
        Err(_) => {
            parser.push_error(
                ErrorImpl::NumberParseError {
                    token: token.literal,
                },
                token.span.start,
            );
            Expression::Absent
        }
    }
}

pub fn parse_boolean_expr(parser: &mut Parser) -> Expression {
    Expression::Boolean(BooleanLiteral {
        token: parser.current_token().clone(),
        value: parser.current_is(TokenKind::True),
    })
}

pub fn parse_prefix_expr(parser: &mut Parser) -> Expression {
    let operator_token = parser.current_token().clone();
    parser.advance();

    let right = parse_expr(parser, BindingPower::Prefix);

    Expression::Prefix(PrefixExpression {
        operator: operator_token.literal.clone(),
        token: operator_token,
        right: Box::new(right),
    })
}

pub fn parse_infix_expr(parser: &mut Parser, left: Expression) -> Expression {
    let operator_token = parser.current_token().clone();
    let bp = parser.current_binding_power();
    parser.advance();

    // Same `bp` on the right keeps equal-precedence chains left-associative
    let right = parse_expr(parser, bp);

    Expression::Infix(InfixExpression {
        operator: operator_token.literal.clone(),
        token: operator_token,
        left: Box::new(left),
        right: Box::new(right),
    })
}

pub fn parse_grouping_expr(parser: &mut Parser) -> Expression {
    parser.advance();
    let expr = parse_expr(parser, BindingPower::Lowest);

    if !parser.expect_peek(TokenKind::CloseParen) {
        return Expression::Absent;
    }

    expr
}

pub fn parse_if_expr(parser: &mut Parser) -> Expression {
    let token = parser.current_token().clone();

    if !parser.expect_peek(TokenKind::OpenParen) {
        return Expression::Absent;
    }

    parser.advance();
    let condition = parse_expr(parser, BindingPower::Lowest);

    if !parser.expect_peek(TokenKind::CloseParen) || !parser.expect_peek(TokenKind::OpenCurly) {
        return Expression::Absent;
    }

    let consequence = parse_block_stmt(parser);

    let alternative = if parser.peek_is(TokenKind::Else) {
        parser.advance();

        if !parser.expect_peek(TokenKind::OpenCurly) {
            return Expression::Absent;
        }
        Some(parse_block_stmt(parser))
    } else {
        None
    };

    Expression::If(IfExpression {
        token,
        condition: Box::new(condition),
        consequence,
        alternative,
    })
}

pub fn parse_fn_literal_expr(parser: &mut Parser) -> Expression {
    let token = parser.current_token().clone();

    if !parser.expect_peek(TokenKind::OpenParen) {
        return Expression::Absent;
    }

    let Some(parameters) = parse_fn_parameters(parser) else {
        return Expression::Absent;
    };

    if !parser.expect_peek(TokenKind::OpenCurly) {
        return Expression::Absent;
    }

    let body = parse_block_stmt(parser);

    Expression::Function(FunctionLiteral {
        token,
        parameters,
        body,
    })
}

/// `current` is the opening `(`; leaves the closing `)` in `current`.
fn parse_fn_parameters(parser: &mut Parser) -> Option<Vec<Identifier>> {
    let mut parameters = vec![];

    if parser.peek_is(TokenKind::CloseParen) {
        parser.advance();
        return Some(parameters);
    }

    if !parser.expect_peek(TokenKind::Identifier) {
        return None;
    }
    parameters.push(current_identifier(parser));

    while parser.peek_is(TokenKind::Comma) {
        parser.advance();
        if !parser.expect_peek(TokenKind::Identifier) {
            return None;
        }
        parameters.push(current_identifier(parser));
    }

    if !parser.expect_peek(TokenKind::CloseParen) {
        return None;
    }

    Some(parameters)
}

pub fn parse_call_expr(parser: &mut Parser, callee: Expression) -> Expression {
    let token = parser.current_token().clone();

    let Some(arguments) = parse_call_arguments(parser) else {
        return Expression::Absent;
    };

    Expression::Call(CallExpression {
        token,
        callee: Box::new(callee),
        arguments,
    })
}

/// `current` is the opening `(`; leaves the closing `)` in `current`.
fn parse_call_arguments(parser: &mut Parser) -> Option<Vec<Expression>> {
    let mut args = vec![];

    if parser.peek_is(TokenKind::CloseParen) {
        parser.advance();
        return Some(args);
    }

    parser.advance();
    args.push(parse_expr(parser, BindingPower::Lowest));

    while parser.peek_is(TokenKind::Comma) {
        parser.advance();
        parser.advance();
        args.push(parse_expr(parser, BindingPower::Lowest));
    }

    if !parser.expect_peek(TokenKind::CloseParen) {
        return None;
    }

    Some(args)
}

fn current_identifier(parser: &Parser) -> Identifier {
    let token = parser.current_token().clone();
    Identifier {
        value: token.literal.clone(),
        token,
    }
}
