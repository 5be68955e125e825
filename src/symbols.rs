use std::collections::HashMap;

use lazy_static::lazy_static;

/// Level of a function name lying on the operator stack: above any operator
pub const FUNCTION_LEVEL: u8 = 7;
/// Level of an opening bracket lying on the operator stack
pub const BRACKET_LEVEL: u8 = 0;

/// Unary minus (prefix negation)
pub const NEGATE: char = '~';
/// Factorial (postfix)
pub const FACTORIAL: char = '!';

lazy_static! {
    static ref OP_LEVELS: HashMap<char, u8> = [
        ('(', BRACKET_LEVEL),
        ('+', 2),
        ('-', 2),
        ('*', 3),
        ('/', 3),
        ('%', 3),
        ('^', 4),
        (FACTORIAL, 5),
        (NEGATE, 6),
    ]
    .iter()
    .cloned()
    .collect();

    static ref FUNC_ARITY: HashMap<&'static str, usize> = [
        ("sh", 1),     // hyperbolic sine
        ("ch", 1),     // hyperbolic cosine
        ("th", 1),     // hyperbolic tangent
        ("lg", 1),     // decimal logarithm
        ("ln", 1),     // natural logarithm
        ("sin", 1),
        ("cos", 1),
        ("tan", 1),
        ("sec", 1),
        ("csc", 1),
        ("cot", 1),
        ("exp", 1),
        ("gcd", 2),
        ("lcm", 2),
        ("log", 2),    // log(base, x)
        ("abs", 1),
        ("max", 2),
        ("min", 2),
        ("perm", 2),
        ("comb", 2),
        ("pify", 1),   // as a multiple of PI
        ("frac", 1),   // as a fraction
        ("sqrt", 1),
        ("arsh", 1),
        ("arch", 1),
        ("arth", 1),
        ("ceil", 1),
        ("floor", 1),
        ("round", 1),
        ("prime", 1),
        ("arcsin", 1),
        ("arccos", 1),
        ("arctan", 1),
        ("factor", 1), // prime factorization
    ]
    .iter()
    .cloned()
    .collect();
}

/// Functions that produce the final result of an expression as a string
const TERMINAL_FUNCS: [&str; 4] = ["pify", "frac", "prime", "factor"];

/// Returns the precedence level of an operator (or of `(`)
pub fn precedence(op: char) -> Option<u8> {
    OP_LEVELS.get(&op).copied()
}

/// Returns true if the character is a known operator
pub fn is_operator(op: char) -> bool {
    op != '(' && OP_LEVELS.contains_key(&op)
}

/// Returns the number of arguments a function requires
pub fn arity(name: &str) -> Option<usize> {
    FUNC_ARITY.get(name).copied()
}

pub fn is_terminal(name: &str) -> bool {
    TERMINAL_FUNCS.contains(&name)
}
