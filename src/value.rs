use std::fmt;
use std::str;

const F64_BUF_LEN: usize = 48;

/// Formats a float the shortest way that still reads back as the same value.
/// Integral values keep their `.0`
pub fn format_f64(g: f64) -> String {
    // dtoa writes the largest finite value for NaN and infinities
    if !g.is_finite() {
        return format!("{}", g);
    }
    let mut buf = [b'\0'; F64_BUF_LEN];
    match dtoa::write(&mut buf[..], g) {
        Ok(len) => match str::from_utf8(&buf[..len]) {
            Ok(s) => s.to_string(),
            Err(..) => format!("{}", g),
        },
        Err(..) => format!("{}", g),
    }
}

/// Outcome of a successful evaluation
#[derive(Clone, Debug, PartialEq)]
pub enum EvalResult {
    /// the single value left on the stack
    Number(f64),
    /// final answer produced by a string-valued function, e.g. `pify`
    Terminal(String),
}

impl EvalResult {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            EvalResult::Number(v) => Some(*v),
            EvalResult::Terminal(..) => None,
        }
    }
}

impl fmt::Display for EvalResult {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            EvalResult::Number(v) => write!(f, "{}", format_f64(*v)),
            EvalResult::Terminal(s) => write!(f, "{}", s),
        }
    }
}

impl From<f64> for EvalResult {
    fn from(v: f64) -> Self {
        EvalResult::Number(v)
    }
}
