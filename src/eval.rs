use num_bigint::BigInt;
use num_traits::ToPrimitive;
use tracing::debug;

use crate::errors::*;
use crate::math;
use crate::parse::Token;
use crate::symbols::{self, FACTORIAL, NEGATE};
use crate::value::EvalResult;

/// Largest n for which n! is a finite f64
const MAX_FACTORIAL: i64 = 170;
/// comb(n, k) >= 2^k when k <= n/2, so anything above overflows f64
const MAX_COMB_K: i64 = 1024;

/// Postfix stack machine. A new `Machine` starts with an empty value stack,
/// so independent evaluations never share state
#[derive(Default)]
pub struct Machine {
    values: Vec<f64>,
}

fn sec(x: f64) -> f64 {
    1.0 / x.cos()
}

fn csc(x: f64) -> f64 {
    1.0 / x.sin()
}

fn cot(x: f64) -> f64 {
    1.0 / x.tan()
}

// half-up rounding: -2.5 turns into -2
fn round_half_up(x: f64) -> f64 {
    (x + 0.5).floor()
}

fn big_to_f64(v: &BigInt) -> f64 {
    v.to_f64().unwrap_or(f64::INFINITY)
}

// truncates toward zero the same way an integer cast does
fn trunc_int(v: f64) -> i64 {
    v as i64
}

impl Machine {
    pub fn new() -> Self {
        Default::default()
    }

    fn pop_operand(&mut self, op: char) -> EvalStep<f64> {
        self.values.pop().ok_or(EvalError::MissingOperand(op))
    }

    // pops `count` arguments and returns them in declaration order
    fn pop_args(&mut self, name: &str, count: usize) -> EvalStep<Vec<f64>> {
        if self.values.len() < count {
            return Err(EvalError::MissingArgument(name.to_string()));
        }
        let args = self.values.split_off(self.values.len() - count);
        Ok(args)
    }

    fn process_operator(&mut self, op: char) -> StepResult {
        match op {
            NEGATE => {
                let v = self.pop_operand(op)?;
                self.values.push(-v);
            }
            FACTORIAL => {
                let n = trunc_int(self.pop_operand(op)?);
                let v = if n > MAX_FACTORIAL {
                    f64::INFINITY
                } else {
                    big_to_f64(&math::factorial(n)?)
                };
                self.values.push(v);
            }
            _ => {
                let right = self.pop_operand(op)?;
                let left = self.pop_operand(op)?;
                let v = Machine::binary(op, left, right)?;
                self.values.push(v);
            }
        }
        Ok(())
    }

    fn binary(op: char, left: f64, right: f64) -> EvalStep<f64> {
        let v = match op {
            '+' => left + right,
            '-' => left - right,
            '*' => left * right,
            '/' => {
                if right == 0.0 {
                    return Err(EvalError::DivisionByZero);
                }
                left / right
            }
            '%' => {
                let (l, r) = (trunc_int(left), trunc_int(right));
                if r == 0 {
                    return Err(EvalError::ModuloByZero);
                }
                l.wrapping_rem(r) as f64
            }
            '^' => left.powf(right),
            _ => return Err(EvalError::UnknownOperator(op)),
        };
        Ok(v)
    }

    fn numeric_function(name: &str, args: &[f64]) -> EvalStep<f64> {
        let x = args[0];
        // two-argument functions only
        let y = || args[1];
        let v = match name {
            "sh" => x.sinh(),
            "ch" => x.cosh(),
            "th" => x.tanh(),
            "lg" => x.log10(),
            "ln" => x.ln(),
            "sin" => x.sin(),
            "cos" => x.cos(),
            "tan" => x.tan(),
            "sec" => sec(x),
            "csc" => csc(x),
            "cot" => cot(x),
            "exp" => x.exp(),
            "gcd" => math::gcd(trunc_int(x), trunc_int(y())) as f64,
            "lcm" => big_to_f64(&math::lcm(trunc_int(x), trunc_int(y()))),
            // log(base, value)
            "log" => y().ln() / x.ln(),
            "abs" => x.abs(),
            "max" => x.max(y()),
            "min" => x.min(y()),
            "perm" => {
                let (n, k) = (trunc_int(x), trunc_int(y()));
                if k > MAX_FACTORIAL && k <= n {
                    f64::INFINITY
                } else {
                    big_to_f64(&math::permutation(n, k)?)
                }
            }
            "comb" => {
                let (n, k) = (trunc_int(x), trunc_int(y()));
                if k >= 0 && k <= n && k.min(n - k) > MAX_COMB_K {
                    f64::INFINITY
                } else {
                    big_to_f64(&math::combination(n, k)?)
                }
            }
            "sqrt" => x.sqrt(),
            "arsh" => math::arsh(x),
            "arch" => math::arch(x),
            "arth" => math::arth(x),
            "ceil" => x.ceil(),
            "floor" => x.floor(),
            "round" => round_half_up(x),
            "arcsin" => x.asin(),
            "arccos" => x.acos(),
            "arctan" => x.atan(),
            _ => return Err(EvalError::UnknownFunction(name.to_string())),
        };
        Ok(v)
    }

    fn terminal_function(name: &str, x: f64) -> EvalStep<String> {
        let s = match name {
            "pify" => math::pify(x),
            "frac" => math::fraction(x),
            "prime" => math::is_prime(trunc_int(x)).to_string(),
            "factor" => math::prime_factors(trunc_int(x)),
            _ => return Err(EvalError::UnknownFunction(name.to_string())),
        };
        Ok(s)
    }

    /// Evaluates a postfix sequence from a clean value stack.
    ///
    /// A string-valued function (`pify`, `frac`, `prime`, `factor`) ends the
    /// evaluation with `EvalResult::Terminal`; it must be the last item of the
    /// sequence. Values left below its argument are dropped.
    pub fn eval(&mut self, postfix: &[Token]) -> EvalStep<EvalResult> {
        self.values.clear();
        if postfix.is_empty() {
            return Err(EvalError::EmptyExpression);
        }

        for (idx, token) in postfix.iter().enumerate() {
            match token {
                Token::Number(v) => self.values.push(*v),
                Token::Constant(c) => self.values.push(c.value()),
                Token::Variable(c) => return Err(EvalError::UnboundVariable(*c)),
                Token::Operator(op) => self.process_operator(*op)?,
                Token::Function(name) => {
                    let argc = match symbols::arity(name) {
                        Some(n) => n,
                        None => return Err(EvalError::UnknownFunction(name.to_string())),
                    };
                    if symbols::is_terminal(name) && idx + 1 != postfix.len() {
                        return Err(EvalError::NonTerminalPosition(name.to_string()));
                    }
                    let args = self.pop_args(name, argc)?;
                    if symbols::is_terminal(name) {
                        let s = Machine::terminal_function(name, args[0])?;
                        debug!("{} returned '{}', {} values dropped", name, s, self.values.len());
                        self.values.clear();
                        return Ok(EvalResult::Terminal(s));
                    }
                    let v = Machine::numeric_function(name, &args)?;
                    self.values.push(v);
                }
                Token::LeftParen | Token::RightParen => {
                    return Err(EvalError::InvalidExpression(self.values.len()));
                }
            }
        }

        if self.values.len() != 1 {
            return Err(EvalError::InvalidExpression(self.values.len()));
        }
        // length is checked above
        match self.values.pop() {
            Some(v) => Ok(EvalResult::Number(v)),
            None => Err(EvalError::EmptyExpression),
        }
    }
}

/// Evaluates a postfix sequence on a fresh stack
pub fn eval(postfix: &[Token]) -> EvalStep<EvalResult> {
    let res = Machine::new().eval(postfix);
    debug!("result: {:?}", res);
    res
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::{tokenize, Constant};
    use crate::stack::to_postfix;

    fn calc(expr: &str) -> EvalStep<EvalResult> {
        eval(&to_postfix(tokenize(expr).unwrap()).unwrap())
    }

    fn num(expr: &str) -> f64 {
        match calc(expr) {
            Ok(EvalResult::Number(v)) => v,
            other => panic!("{} evaluated to {:?}", expr, other),
        }
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() <= 1e-9
    }

    #[test]
    fn test_stack_order() {
        let postfix = vec![Token::Number(7.0), Token::Number(2.0), Token::Operator('-')];
        assert_eq!(eval(&postfix), Ok(EvalResult::Number(5.0)));
        let postfix = vec![Token::Number(2.0), Token::Number(10.0), Token::Function("log".to_string())];
        assert!(close(eval(&postfix).unwrap().as_f64().unwrap(), 10.0f64.log2()));
    }

    #[test]
    fn test_operators() {
        assert_eq!(num("2+3*4"), 14.0);
        assert_eq!(num("(2+3)*4"), 20.0);
        assert_eq!(num("2^3^2"), 64.0);
        assert_eq!(num("-3+5"), 2.0);
        assert_eq!(num("5!"), 120.0);
        assert_eq!(num("0!"), 1.0);
        assert_eq!(num("3.9!"), 6.0);
        assert_eq!(num("7%3"), 1.0);
        assert_eq!(num("-7%3"), -1.0);
        assert_eq!(num("7.9%3.5"), 1.0);
        assert_eq!(num("1/4"), 0.25);
        assert_eq!(num("-3^2"), 9.0);
        assert!(num("(-8)^(1/3)").is_nan());
        assert_eq!(num("171!"), f64::INFINITY);
        assert_eq!(num("--3"), 3.0);
        assert_eq!(num("1+--3"), 4.0);
        assert_eq!(num("1---3"), -2.0);
    }

    #[test]
    fn test_constants() {
        assert_eq!(num("pi"), std::f64::consts::PI);
        assert_eq!(num("Eu"), std::f64::consts::E);
        let postfix = vec![Token::Constant(Constant::Pi), Token::Number(2.0), Token::Operator('/')];
        assert_eq!(eval(&postfix), Ok(EvalResult::Number(std::f64::consts::FRAC_PI_2)));
    }

    #[test]
    fn test_functions() {
        assert_eq!(num("gcd(12,18)"), 6.0);
        assert_eq!(num("lcm(4,6)"), 12.0);
        assert_eq!(num("max(3,7)"), 7.0);
        assert_eq!(num("min(3,7)"), 3.0);
        assert_eq!(num("perm(5,2)"), 20.0);
        assert_eq!(num("comb(5,2)"), 10.0);
        assert_eq!(num("comb(2,5)"), 0.0);
        assert_eq!(num("sqrt(16)+abs(-2)"), 6.0);
        assert_eq!(num("round(2.5)"), 3.0);
        assert_eq!(num("round(-2.5)"), -2.0);
        assert_eq!(num("ceil(1.2)+floor(1.8)"), 3.0);
        assert!(close(num("lg(1000)"), 3.0));
        assert!(close(num("ln(Eu)"), 1.0));
        assert!(close(num("log(2,8)"), 3.0));
        assert!(close(num("sec(0)"), 1.0));
        assert!(close(num("cot(pi/4)"), 1.0));
        assert!(close(num("sh(1)"), 1.0f64.sinh()));
        assert!(close(num("arsh(sh(2))"), 2.0));
        assert!(close(num("arcsin(1)"), std::f64::consts::FRAC_PI_2));
        assert!(close(num("2*sin(pi/2)+1"), 3.0));
        assert!(num("arch(0)").is_nan());
    }

    #[test]
    fn test_terminal() {
        assert_eq!(
            calc("pify(1.75*3.14159265358979)"),
            Ok(EvalResult::Terminal("π + (3/4)π".to_string()))
        );
        assert_eq!(calc("frac(0.75)"), Ok(EvalResult::Terminal("3/4".to_string())));
        assert_eq!(calc("prime(97)"), Ok(EvalResult::Terminal("true".to_string())));
        assert_eq!(calc("prime(2*3)"), Ok(EvalResult::Terminal("false".to_string())));
        assert_eq!(calc("factor(360)"), Ok(EvalResult::Terminal("[2^3] * [3^2] * 5".to_string())));
        // values below the argument are dropped
        assert_eq!(calc("1,frac(0.5)"), Ok(EvalResult::Terminal("1/2".to_string())));
    }

    #[test]
    fn test_terminal_position() {
        assert_eq!(calc("pify(pi)+1"), Err(EvalError::NonTerminalPosition("pify".to_string())));
        assert_eq!(calc("2*prime(3)"), Err(EvalError::NonTerminalPosition("prime".to_string())));
    }

    #[test]
    fn test_errors() {
        assert_eq!(calc("3/0"), Err(EvalError::DivisionByZero));
        assert_eq!(calc("3%0.5"), Err(EvalError::ModuloByZero));
        assert_eq!(calc("foo(2)"), Err(EvalError::UnknownFunction("foo".to_string())));
        assert_eq!(calc("(-3)!"), Err(EvalError::NegativeFactorial(-3)));
        assert_eq!(calc("x+1"), Err(EvalError::UnboundVariable('x')));
        assert_eq!(calc("2*"), Err(EvalError::MissingOperand('*')));
        assert_eq!(calc("-"), Err(EvalError::MissingOperand('~')));
        assert_eq!(calc("gcd(2)"), Err(EvalError::MissingArgument("gcd".to_string())));
        assert_eq!(calc("1,2"), Err(EvalError::InvalidExpression(2)));
        assert_eq!(calc(""), Err(EvalError::EmptyExpression));
        let postfix = vec![Token::Number(1.0), Token::Number(2.0), Token::Operator('#')];
        assert_eq!(eval(&postfix), Err(EvalError::UnknownOperator('#')));
        assert_eq!(calc("()"), Err(EvalError::EmptyExpression));
    }

    #[test]
    fn test_deterministic() {
        let postfix = to_postfix(tokenize("sqrt(2)*pi-3!/7").unwrap()).unwrap();
        let mut m = Machine::new();
        let first = m.eval(&postfix);
        let second = m.eval(&postfix);
        assert_eq!(first, second);
        assert_eq!(first, eval(&postfix));
    }

    #[test]
    fn test_failure_leaves_no_state() {
        let mut m = Machine::new();
        assert!(m.eval(&[Token::Number(1.0), Token::Number(2.0)]).is_err());
        assert_eq!(m.eval(&[Token::Number(4.0)]), Ok(EvalResult::Number(4.0)));
    }
}
