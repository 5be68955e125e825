use rpncalc::{calculate, eval, format_postfix, postfix, CalcError, EvalError, EvalResult, ParseError};

fn number(expr: &str) -> f64 {
    match calculate(expr) {
        Ok(EvalResult::Number(v)) => v,
        other => panic!("{} evaluated to {:?}", expr, other),
    }
}

fn parse_err(expr: &str) -> ParseError {
    match calculate(expr) {
        Err(CalcError::Parse(e)) => e,
        other => panic!("{} did not fail to parse: {:?}", expr, other),
    }
}

fn eval_err(expr: &str) -> EvalError {
    match calculate(expr) {
        Err(CalcError::Eval(e)) => e,
        other => panic!("{} did not fail to evaluate: {:?}", expr, other),
    }
}

#[test]
fn precedence_and_brackets() {
    let cases: [(&str, f64); 12] = [
        ("2+3*4", 14.0),
        ("(2+3)*4", 20.0),
        ("[2+3]*4", 20.0),
        ("（2+3）*4", 20.0),
        (" 2 +\t3 * 4 ", 14.0),
        ("2^3^2", 64.0),
        ("-3+5", 2.0),
        ("5!", 120.0),
        ("10-2-3", 5.0),
        ("2*3!^2", 72.0),
        ("1+--3", 4.0),
        ("1---3", -2.0),
    ];
    for (expr, expected) in cases.iter() {
        assert_eq!(number(expr), *expected, "{}", expr);
    }
}

#[test]
fn functions() {
    assert_eq!(number("gcd(12,18)"), 6.0);
    assert_eq!(number("max(3,7)"), 7.0);
    assert_eq!(number("lcm(gcd(12,18),4)"), 12.0);
    assert_eq!(number("comb(5,2)*perm(3,3)"), 60.0);
    assert!((number("sin(pi/6)*2") - 1.0).abs() < 1e-12);
    assert!((number("-cos(PI)") - 1.0).abs() < 1e-12);
}

#[test]
fn bracket_mismatch() {
    assert_eq!(parse_err("(2+3"), ParseError::MissingCloseParen);
    assert_eq!(parse_err("2+3)"), ParseError::MissingOpenParen);
    assert_eq!(parse_err("((1)"), ParseError::MissingCloseParen);
    assert_eq!(parse_err("[1))"), ParseError::MissingOpenParen);
}

#[test]
fn failures() {
    assert_eq!(eval_err("3/0"), EvalError::DivisionByZero);
    assert_eq!(eval_err("3%0"), EvalError::ModuloByZero);
    assert_eq!(parse_err("2@3"), ParseError::UnknownOperator('@'));
    assert_eq!(parse_err("1.2.3+1"), ParseError::InvalidNumber("1.2.3".to_string()));
    assert_eq!(eval_err("foo(2)"), EvalError::UnknownFunction("foo".to_string()));
    assert_eq!(eval_err("(2-5)!"), EvalError::NegativeFactorial(-3));
    assert_eq!(eval_err("max(1)"), EvalError::MissingArgument("max".to_string()));
    assert_eq!(eval_err("frac(0.5)*2"), EvalError::NonTerminalPosition("frac".to_string()));
}

#[test]
fn terminal_results() {
    let cases: [(&str, &str); 5] = [
        ("pify(1.75*3.14159265358979)", "π + (3/4)π"),
        ("pify(-pi/2)", "-(1/2)π"),
        ("frac(1/8)", "1/8"),
        ("prime(7919)", "true"),
        ("factor(-90)", "-1 * 2 * [3^2] * 5"),
    ];
    for (expr, expected) in cases.iter() {
        assert_eq!(calculate(expr), Ok(EvalResult::Terminal(expected.to_string())), "{}", expr);
    }
}

#[test]
fn non_finite_display() {
    assert_eq!(calculate("(-8)^(1/3)").unwrap().to_string(), "NaN");
    assert_eq!(calculate("171!").unwrap().to_string(), "inf");
    assert_eq!(calculate("0-171!").unwrap().to_string(), "-inf");
}

#[test]
fn postfix_form() {
    let rpn = postfix("(1+2)*sin(pi)").unwrap();
    assert_eq!(format_postfix(&rpn), "[1.0, 2.0, +, π, sin, *]");
    let rpn = postfix("-gcd(4,6)!").unwrap();
    assert_eq!(format_postfix(&rpn), "[4.0, 6.0, gcd, ~, !]");
}

#[test]
fn same_postfix_same_result() {
    let rpn = postfix("ln(10)^2/sqrt(3)+comb(10,3)").unwrap();
    let first = eval(&rpn);
    let second = eval(&rpn);
    assert!(first.is_ok());
    assert_eq!(first, second);
}

#[test]
fn independent_threads() {
    let handles: Vec<_> = (1..=4)
        .map(|i| std::thread::spawn(move || calculate(&format!("{}!+{}", i, i))))
        .collect();
    let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert_eq!(
        results,
        vec![
            Ok(EvalResult::Number(2.0)),
            Ok(EvalResult::Number(4.0)),
            Ok(EvalResult::Number(9.0)),
            Ok(EvalResult::Number(28.0)),
        ]
    );
}
