use std::fmt;

use pest::Parser;
use tracing::debug;

use crate::errors::*;
use crate::symbols::{self, FACTORIAL, NEGATE};
use crate::value::format_f64;

#[derive(Parser)]
#[grammar = "calc.pest"]
pub struct CalcParser;

const CONST_PI: [&str; 2] = ["PI", "pi"];
const CONST_E: &str = "Eu";

/// Predefined constants
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Constant {
    Pi,
    E,
}

impl Constant {
    pub fn value(self) -> f64 {
        match self {
            Constant::Pi => std::f64::consts::PI,
            Constant::E => std::f64::consts::E,
        }
    }
}

/// A lexical unit of an expression. The same type is used for postfix
/// sequences, which never contain brackets
#[derive(Clone, Debug, PartialEq)]
pub enum Token {
    Number(f64),
    Variable(char),
    Constant(Constant),
    Operator(char),
    Function(String),
    LeftParen,
    RightParen,
}

impl Token {
    // true if the token completes an operand, so the next sign is binary
    fn ends_value(&self) -> bool {
        match self {
            Token::Number(..) | Token::Variable(..) | Token::Constant(..) | Token::RightParen => true,
            Token::Operator(op) => *op == FACTORIAL,
            Token::Function(..) | Token::LeftParen => false,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Token::Number(v) => write!(f, "{}", format_f64(*v)),
            Token::Variable(c) => write!(f, "{}", c),
            Token::Constant(Constant::Pi) => write!(f, "π"),
            Token::Constant(Constant::E) => write!(f, "e"),
            Token::Operator(op) => write!(f, "{}", op),
            Token::Function(name) => write!(f, "{}", name),
            Token::LeftParen => write!(f, "("),
            Token::RightParen => write!(f, ")"),
        }
    }
}

/// Removes whitespace and replaces alternative brackets with `(` and `)`
pub fn normalize(expr: &str) -> String {
    expr.chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| match c {
            '（' | '[' => '(',
            '）' | ']' => ')',
            _ => c,
        })
        .collect()
}

fn ident_token(name: &str) -> Token {
    if CONST_PI.contains(&name) {
        return Token::Constant(Constant::Pi);
    }
    if name == CONST_E {
        return Token::Constant(Constant::E);
    }
    let mut chars = name.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Token::Variable(c),
        _ => Token::Function(name.to_string()),
    }
}

/// Splits an expression into tokens.
///
/// A `-` that cannot be a binary operator (at the beginning of the expression,
/// after an opening bracket, an argument separator, or another operator) is
/// emitted as negation `~`. A `+` in the same position is dropped.
/// Argument separators do not produce tokens.
pub fn tokenize(expr: &str) -> ParseResult<Vec<Token>> {
    let expr = normalize(expr);
    let pairs = match CalcParser::parse(Rule::expr, &expr) {
        Ok(p) => p,
        Err(e) => return Err(ParseError::Grammar(e.to_string())),
    };

    let mut tokens: Vec<Token> = Vec::new();
    // false right after a comma even though the previous token ended a value
    let mut is_last_value = false;

    for pair in pairs {
        let rule = pair.as_rule();
        let val = pair.as_str();
        let token = match rule {
            Rule::number => match val.parse::<f64>() {
                Ok(v) => Token::Number(v),
                Err(..) => return Err(ParseError::InvalidNumber(val.to_string())),
            },
            Rule::ident => ident_token(val),
            Rule::open_b => Token::LeftParen,
            Rule::close_b => Token::RightParen,
            Rule::arg_sep => {
                is_last_value = false;
                continue;
            }
            Rule::operator => {
                // ANY matches exactly one char
                let op = val.chars().next().ok_or_else(|| ParseError::Grammar(val.to_string()))?;
                if !symbols::is_operator(op) {
                    return Err(ParseError::UnknownOperator(op));
                }
                match op {
                    '+' if !is_last_value => continue,
                    '-' if !is_last_value => Token::Operator(NEGATE),
                    _ => Token::Operator(op),
                }
            }
            Rule::EOI => break,
            _ => return Err(ParseError::Grammar(format!("unexpected rule {:?}", rule))),
        };
        is_last_value = token.ends_value();
        tokens.push(token);
    }

    debug!("tokenized '{}' into {} tokens", expr, tokens.len());
    Ok(tokens)
}
