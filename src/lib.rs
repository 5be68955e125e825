//! # Postfix expression calculator
//!
//! An expression is processed in three steps:
//! * the text is split into tokens: numbers, constants, one-letter variables,
//!   operators, function names, and brackets
//! * the tokens are reordered into postfix (Reverse Polish) notation with the
//!   shunting-yard algorithm
//! * the postfix sequence is evaluated on a stack of `f64` values
//!
//! Brackets can be written as `()`, `[]`, or full-width `（）`. Whitespace is
//! ignored. Function arguments are separated with commas: `gcd(12, 18)`.
//!
//! Operators (starting from highest priority):
//! * `~` - negation. A `-` at the beginning of an expression, after an opening
//!   bracket, a comma, or another operator is negation as well
//! * `!` - factorial (truncates its argument to an integer)
//! * `^` - power
//! * `*`, `/`, `%` - multiplication, division, integer remainder
//! * `+`, `-` - addition, subtraction
//!
//! All operators are left-associative, including power: `2^3^2` is `64`.
//!
//! Predefined constants:
//! * `PI` or `pi` - 3.14159...
//! * `Eu` - 2.71828...
//!
//! The list of supported functions:
//! * trigonometric functions: sin, cos, tan, sec, csc, cot, arcsin, arccos, arctan
//! * hyperbolic functions: sh, ch, th, and inverted ones arsh, arch, arth
//! * exponent and logarithms: exp, ln, lg (base 10), log(base, x)
//! * rounding: ceil, floor, round
//! * misc: sqrt, abs, max, min
//! * integer functions: gcd, lcm, perm, comb
//!
//! Functions that produce text end the calculation, so they must be the last
//! operation of an expression:
//! * `pify(x)` - `x` as a multiple of PI, e.g. `π + (3/4)π`
//! * `frac(x)` - `x` as a fraction, e.g. `3/4`
//! * `prime(x)` - `true` if `x` is a prime number
//! * `factor(x)` - prime factorization, e.g. `[2^3] * 3`
//!
//! ```
//! use rpncalc::{calculate, EvalResult};
//!
//! assert_eq!(calculate("2+3*4"), Ok(EvalResult::Number(14.0)));
//! assert_eq!(calculate("frac(0.75)"), Ok(EvalResult::Terminal("3/4".to_string())));
//! assert!(calculate("3/0").is_err());
//! ```

#[macro_use]
extern crate pest_derive;

pub mod errors;
pub mod eval;
pub mod math;
pub mod parse;
pub mod stack;
pub mod symbols;
pub mod value;

pub use errors::{CalcError, EvalError, MathError, ParseError};
pub use eval::{eval, Machine};
pub use parse::{tokenize, Constant, Token};
pub use stack::{format_postfix, to_postfix, Stack};
pub use value::EvalResult;

/// Converts an infix expression to a postfix token sequence
pub fn postfix(expr: &str) -> Result<Vec<Token>, ParseError> {
    to_postfix(tokenize(expr)?)
}

/// Evaluates an infix expression
pub fn calculate(expr: &str) -> Result<EvalResult, CalcError> {
    let rpn = postfix(expr)?;
    Ok(eval(&rpn)?)
}
