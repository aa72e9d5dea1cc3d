//! Unit tests for the parser module.
//!
//! This module contains tests for parsing the language constructs:
//! - `let` and `return` statements
//! - Literals and identifiers
//! - Prefix and infix operators, precedence and associativity
//! - `if` expressions, function literals and calls
//! - Error accumulation and the nesting limit

use crate::{
    ast::{
        ast::{Expression, Node, Program, Statement},
        expressions::{CallExpression, FunctionLiteral, IfExpression, InfixExpression},
    },
    errors::errors::ErrorImpl,
    lexer::{lexer::Lexer, tokens::TokenKind},
};

use super::parser::{parse, Parser, ParserConfig};

fn parse_ok(source: &str) -> Program {
    let (program, errors) = parse(source.to_string(), Some("test.mk".to_string()));
    assert!(errors.is_empty(), "unexpected errors for {:?}: {:?}", source, errors);
    program
}

fn error_messages(source: &str) -> Vec<String> {
    let (_, errors) = parse(source.to_string(), None);
    errors.iter().map(|e| e.to_string()).collect()
}

/// The single expression of a one-statement program.
fn single_expression(source: &str) -> Expression {
    let program = parse_ok(source);
    assert_eq!(program.statements.len(), 1, "source: {:?}", source);

    match program.statements.into_iter().next() {
        Some(Statement::Expression(stmt)) => stmt.expression,
        other => panic!("expected an expression statement, got {:?}", other),
    }
}

#[test]
fn test_parse_let_statements() {
    let program = parse_ok("let x = 5; let y = true; let foobar = y;");
    assert_eq!(program.statements.len(), 3);

    let expected = [("x", "5"), ("y", "true"), ("foobar", "y")];
    for (stmt, (name, value)) in program.iter().zip(expected) {
        let Statement::Let(stmt) = stmt else {
            panic!("expected a let statement, got {:?}", stmt);
        };
        assert_eq!(stmt.token_literal(), "let");
        assert_eq!(stmt.name.value, name);
        assert_eq!(stmt.name.token_literal(), name);
        assert_eq!(stmt.value.to_string(), value);
    }
}

#[test]
fn test_let_round_trip() {
    let program = parse_ok("let x = 5;");

    assert_eq!(program.statements[0].to_string(), "let x = 5;");
    assert_eq!(program.to_string(), "let x = 5;");
}

#[test]
fn test_let_binds_full_expression() {
    let program = parse_ok("let total = a + b * 2;");

    let Statement::Let(stmt) = &program.statements[0] else {
        panic!("expected a let statement");
    };
    assert!(matches!(stmt.value, Expression::Infix(_)));
    assert_eq!(stmt.value.to_string(), "(a + (b * 2))");
}

#[test]
fn test_parse_return_statements() {
    let program = parse_ok("return 5; return x; return add(1, 2);");
    assert_eq!(program.statements.len(), 3);

    let expected = ["5", "x", "add(1, 2)"];
    for (stmt, value) in program.iter().zip(expected) {
        let Statement::Return(stmt) = stmt else {
            panic!("expected a return statement, got {:?}", stmt);
        };
        assert_eq!(stmt.token_literal(), "return");
        assert_eq!(stmt.value.to_string(), value);
    }
}

#[test]
fn test_semicolon_is_optional() {
    let program = parse_ok("let x = 1\nreturn x\nx");

    assert_eq!(program.statements.len(), 3);
    assert_eq!(program.to_string(), "let x = 1;return x;x;");
}

#[test]
fn test_parse_identifier_expression() {
    let Expression::Identifier(ident) = single_expression("foobar;") else {
        panic!("expected an identifier");
    };
    assert_eq!(ident.value, "foobar");
    assert_eq!(ident.token_literal(), "foobar");
}

#[test]
fn test_parse_integer_literal() {
    let Expression::Integer(int) = single_expression("5;") else {
        panic!("expected an integer literal");
    };
    assert_eq!(int.value, 5);
    assert_eq!(int.token_literal(), "5");
}

#[test]
fn test_parse_integer_limits() {
    let Expression::Integer(int) = single_expression("9223372036854775807") else {
        panic!("expected an integer literal");
    };
    assert_eq!(int.value, i64::MAX);

    let (program, errors) = parse("9223372036854775808;".to_string(), None);
    assert_eq!(errors.len(), 1);
    assert_eq!(
        errors[0].get_kind(),
        &ErrorImpl::NumberParseError {
            token: "9223372036854775808".to_string()
        }
    );
    assert_eq!(
        errors[0].to_string(),
        "could not parse \"9223372036854775808\" as integer"
    );

    let Statement::Expression(stmt) = &program.statements[0] else {
        panic!("expected an expression statement");
    };
    assert!(stmt.expression.is_absent());
}

#[test]
fn test_parse_boolean_literals() {
    for (source, expected) in [("true;", true), ("false;", false)] {
        let Expression::Boolean(boolean) = single_expression(source) else {
            panic!("expected a boolean literal");
        };
        assert_eq!(boolean.value, expected);
    }
}

#[test]
fn test_parse_prefix_expressions() {
    let cases = [
        ("!5;", "!", "5"),
        ("-15;", "-", "15"),
        ("!foobar;", "!", "foobar"),
        ("-foobar;", "-", "foobar"),
        ("!true;", "!", "true"),
        ("!false;", "!", "false"),
    ];

    for (source, operator, operand) in cases {
        let Expression::Prefix(prefix) = single_expression(source) else {
            panic!("expected a prefix expression for {:?}", source);
        };
        assert_eq!(prefix.operator, operator);
        assert_eq!(prefix.right.to_string(), operand);
    }
}

#[test]
fn test_parse_infix_expressions() {
    let cases = [
        ("5 + 5;", "5", "+", "5"),
        ("5 - 5;", "5", "-", "5"),
        ("5 * 5;", "5", "*", "5"),
        ("5 / 5;", "5", "/", "5"),
        ("5 > 5;", "5", ">", "5"),
        ("5 < 5;", "5", "<", "5"),
        ("5 == 5;", "5", "==", "5"),
        ("5 != 5;", "5", "!=", "5"),
        ("foobar + barfoo;", "foobar", "+", "barfoo"),
        ("true == true", "true", "==", "true"),
        ("true != false", "true", "!=", "false"),
    ];

    for (source, left, operator, right) in cases {
        let Expression::Infix(InfixExpression {
            left: lhs,
            operator: op,
            right: rhs,
            ..
        }) = single_expression(source)
        else {
            panic!("expected an infix expression for {:?}", source);
        };
        assert_eq!(lhs.to_string(), left);
        assert_eq!(op, operator);
        assert_eq!(rhs.to_string(), right);
    }
}

#[test]
fn test_operator_precedence_parsing() {
    let cases = [
        ("-a * b", "((-a) * b);"),
        ("!-a", "(!(-a));"),
        ("a + b + c", "((a + b) + c);"),
        ("a + b - c", "((a + b) - c);"),
        ("a - b - c", "((a - b) - c);"),
        ("a * b * c", "((a * b) * c);"),
        ("a * b / c", "((a * b) / c);"),
        ("a + b / c", "(a + (b / c));"),
        ("a + b * c", "(a + (b * c));"),
        ("a + b * c + d / e - f", "(((a + (b * c)) + (d / e)) - f);"),
        ("3 + 4; -5 * 5", "(3 + 4);((-5) * 5);"),
        ("5 > 4 == 3 < 4", "((5 > 4) == (3 < 4));"),
        ("5 < 4 != 3 > 4", "((5 < 4) != (3 > 4));"),
        (
            "3 + 4 * 5 == 3 * 1 + 4 * 5",
            "((3 + (4 * 5)) == ((3 * 1) + (4 * 5)));",
        ),
        ("true", "true;"),
        ("3 > 5 == false", "((3 > 5) == false);"),
        ("3 < 5 == true", "((3 < 5) == true);"),
        ("1 + (2 + 3) + 4", "((1 + (2 + 3)) + 4);"),
        ("(5 + 5) * 2", "((5 + 5) * 2);"),
        ("(a + b) * c", "((a + b) * c);"),
        ("2 / (5 + 5)", "(2 / (5 + 5));"),
        ("-(5 + 5)", "(-(5 + 5));"),
        ("!(true == true)", "(!(true == true));"),
        ("a + add(b * c) + d", "((a + add((b * c))) + d);"),
        (
            "add(a, b, 1, 2 * 3, 4 + 5, add(6, 7 * 8))",
            "add(a, b, 1, (2 * 3), (4 + 5), add(6, (7 * 8)));",
        ),
        (
            "add(a + b + c * d / f + g)",
            "add((((a + b) + ((c * d) / f)) + g));",
        ),
    ];

    for (source, expected) in cases {
        let program = parse_ok(source);
        assert_eq!(program.to_string(), expected, "source: {:?}", source);
    }
}

#[test]
fn test_parse_if_expression() {
    let Expression::If(IfExpression {
        condition,
        consequence,
        alternative,
        ..
    }) = single_expression("if (x < y) { x }")
    else {
        panic!("expected an if expression");
    };

    assert_eq!(condition.to_string(), "(x < y)");
    assert_eq!(consequence.statements.len(), 1);
    assert_eq!(consequence.statements[0].to_string(), "x;");
    assert!(alternative.is_none());
}

#[test]
fn test_parse_if_else_expression() {
    let expr = single_expression("if (x < y) { x } else { y }");
    assert_eq!(expr.to_string(), "if ((x < y)) { x; } else { y; }");

    let Expression::If(IfExpression {
        consequence,
        alternative: Some(alternative),
        ..
    }) = expr
    else {
        panic!("expected an if expression with an alternative");
    };

    assert_eq!(consequence.len(), 1);
    assert_eq!(alternative.len(), 1);
    assert_eq!(alternative.statements[0].to_string(), "y;");
}

#[test]
fn test_parse_if_with_empty_block() {
    let expr = single_expression("if (true) {}");

    assert_eq!(expr.to_string(), "if (true) { }");
}

#[test]
fn test_parse_function_literal() {
    let Expression::Function(FunctionLiteral {
        parameters, body, ..
    }) = single_expression("fn(x, y) { x + y; }")
    else {
        panic!("expected a function literal");
    };

    let names: Vec<&str> = parameters.iter().map(|p| p.value.as_str()).collect();
    assert_eq!(names, vec!["x", "y"]);
    assert_eq!(body.statements.len(), 1);
    assert_eq!(body.statements[0].to_string(), "(x + y);");
}

#[test]
fn test_parse_function_parameters() {
    let cases: [(&str, &[&str]); 3] = [
        ("fn() {};", &[]),
        ("fn(x) {};", &["x"]),
        ("fn(x, y, z) {};", &["x", "y", "z"]),
    ];

    for (source, expected) in cases {
        let Expression::Function(function) = single_expression(source) else {
            panic!("expected a function literal for {:?}", source);
        };
        let names: Vec<&str> = function
            .parameters
            .iter()
            .map(|p| p.value.as_str())
            .collect();
        assert_eq!(names, expected);
    }
}

#[test]
fn test_function_literal_string() {
    let program = parse_ok("let add = fn(a, b) { return a + b; };");

    assert_eq!(program.to_string(), "let add = fn(a, b) { return (a + b); };");
}

#[test]
fn test_parse_call_expression() {
    let Expression::Call(CallExpression {
        callee, arguments, ..
    }) = single_expression("add(1, 2 * 3, 4 + 5);")
    else {
        panic!("expected a call expression");
    };

    assert_eq!(callee.to_string(), "add");
    assert_eq!(arguments.len(), 3);
    assert_eq!(arguments[0].to_string(), "1");
    assert_eq!(arguments[1].to_string(), "(2 * 3)");
    assert_eq!(arguments[2].to_string(), "(4 + 5)");
}

#[test]
fn test_call_without_arguments_and_chained_calls() {
    assert_eq!(single_expression("f()").to_string(), "f()");
    assert_eq!(single_expression("f(1)(2)").to_string(), "f(1)(2)");
    assert_eq!(
        single_expression("fn(x) { x }(5)").to_string(),
        "fn(x) { x; }(5)"
    );
}

#[test]
fn test_statement_order_is_preserved() {
    let program = parse_ok("let a = 1; a; return a; if (a) { 1; 2; 3 }");

    let literals: Vec<&str> = program.iter().map(|s| s.token_literal()).collect();
    assert_eq!(literals, vec!["let", "a", "return", "if"]);

    let Statement::Expression(stmt) = &program.statements[3] else {
        panic!("expected an expression statement");
    };
    let Expression::If(if_expr) = &stmt.expression else {
        panic!("expected an if expression");
    };
    let rendered: Vec<String> = if_expr.consequence.iter().map(|s| s.to_string()).collect();
    assert_eq!(rendered, vec!["1;", "2;", "3;"]);
}

#[test]
fn test_empty_program() {
    let program = parse_ok("");

    assert!(program.is_empty());
    assert_eq!(program.token_literal(), "");
}

#[test]
fn test_missing_let_identifier_keeps_parsing() {
    let (program, errors) = parse("let = 5; let y = 10;".to_string(), None);

    assert!(!errors.is_empty());
    assert_eq!(
        errors[0].get_kind(),
        &ErrorImpl::UnexpectedToken {
            expected: TokenKind::Identifier,
            found: TokenKind::Assignment,
        }
    );
    assert_eq!(
        errors[0].to_string(),
        "expected next token to be Identifier, got Assignment instead"
    );

    // The statement after the malformed one is still parsed
    let last = program.statements.last().expect("statements after the error");
    assert_eq!(last.to_string(), "let y = 10;");
}

#[test]
fn test_let_error_messages() {
    let messages = error_messages("let x 5; let = 10; let 838383;");

    assert_eq!(
        messages,
        vec![
            "expected next token to be Assignment, got Number instead",
            "expected next token to be Identifier, got Assignment instead",
            "no prefix parse function for Assignment found",
            "expected next token to be Identifier, got Number instead",
        ]
    );
}

#[test]
fn test_missing_prefix_parse_fn() {
    let (program, errors) = parse("+5;".to_string(), None);

    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].to_string(), "no prefix parse function for Plus found");
    assert_eq!(errors[0].get_position().0, 0);
    assert_eq!(program.statements.len(), 2);
}

#[test]
fn test_illegal_character_reported_by_parser() {
    let (_, errors) = parse("let x = @;".to_string(), None);

    assert_eq!(errors.len(), 1);
    assert_eq!(
        errors[0].get_kind(),
        &ErrorImpl::NoPrefixParseFn {
            kind: TokenKind::Illegal,
            literal: "@".to_string(),
        }
    );
    assert_eq!(errors[0].get_position().0, 8);
}

#[test]
fn test_missing_closing_paren() {
    let messages = error_messages("add(1, 2; (1 + 2");

    assert_eq!(
        messages,
        vec![
            "expected next token to be CloseParen, got Semicolon instead",
            "expected next token to be CloseParen, got EOF instead",
        ]
    );
}

#[test]
fn test_unterminated_block_is_reported() {
    let messages = error_messages("if (x) { x");

    assert_eq!(
        messages,
        vec!["expected next token to be CloseCurly, got EOF instead"]
    );
}

#[test]
fn test_bad_function_parameter() {
    let messages = error_messages("fn(1) {}");

    assert_eq!(
        messages[0],
        "expected next token to be Identifier, got Number instead"
    );
}

#[test]
fn test_nesting_limit() {
    let config = ParserConfig { max_depth: 3 };

    let mut parser = Parser::with_config(Lexer::new("((1))".to_string(), None), config);
    let program = parser.parse_program();
    assert!(parser.errors().is_empty());
    assert_eq!(program.to_string(), "1;");

    let mut parser = Parser::with_config(Lexer::new("(((1))); x".to_string(), None), config);
    let program = parser.parse_program();
    assert_eq!(parser.errors().len(), 1);
    assert_eq!(
        parser.errors()[0].get_kind(),
        &ErrorImpl::NestingTooDeep { limit: 3 }
    );
    // Everything after the limit is discarded
    assert_eq!(program.statements.len(), 1);
}

#[test]
fn test_deeply_nested_input_is_bounded() {
    let depth = 10_000;
    let source = format!("{}1{}", "(".repeat(depth), ")".repeat(depth));

    let (program, errors) = parse(source, None);
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].get_error_name(), "NestingTooDeep");
    assert_eq!(program.statements.len(), 1);
}

#[test]
fn test_parser_exposes_config() {
    let parser = Parser::new(Lexer::new(String::new(), None));

    assert_eq!(parser.config(), &ParserConfig::default());
    assert_eq!(parser.config().max_depth, super::parser::DEFAULT_MAX_DEPTH);
}
