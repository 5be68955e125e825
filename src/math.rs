//! Pure numeric helpers used by the evaluator: integer combinatorics, prime
//! numbers, inverse hyperbolic functions, and conversion of floats to
//! fractions and multiples of PI.

use std::f64::consts;

use num_bigint::BigInt;
use num_rational::Ratio;
use num_traits::{One, Zero};
use tracing::warn;

use crate::errors::MathError;

/// Largest denominator tried when approximating a float with a fraction
const MAX_DENOMINATOR: i64 = 1_000_000_000;
/// Approximation is exact enough when the error drops below this value
const FRACTION_EPSILON: f64 = 1e-15;

/// Greatest common divisor. Always non-negative
pub fn gcd(a: i64, b: i64) -> i64 {
    if a == 0 && b == 0 {
        warn!("gcd(0, 0) is undefined");
        return 0;
    }
    let (mut a, mut b) = (a.unsigned_abs(), b.unsigned_abs());
    while b != 0 {
        let m = a % b;
        a = b;
        b = m;
    }
    // gcd(i64::MIN, 0) does not fit i64
    i64::try_from(a).unwrap_or(i64::MAX)
}

/// Least common multiple. Always non-negative
pub fn lcm(a: i64, b: i64) -> BigInt {
    if a == 0 && b == 0 {
        warn!("lcm(0, 0) is undefined");
        return BigInt::zero();
    }
    let (va, vb) = (BigInt::from(a.unsigned_abs()), BigInt::from(b.unsigned_abs()));
    if a == 0 || b == 0 {
        return va.max(vb);
    }
    let g = BigInt::from(gcd(a, b));
    va / g * vb
}

/// n! for a non-negative `n`
pub fn factorial(n: i64) -> Result<BigInt, MathError> {
    if n < 0 {
        return Err(MathError::NegativeFactorial(n));
    }
    Ok(falling_factorial(n, n))
}

// n * (n-1) * ... * (n-k+1)
fn falling_factorial(n: i64, k: i64) -> BigInt {
    let mut res = BigInt::one();
    for i in (n - k + 1)..=n {
        res *= i;
    }
    res
}

/// Number of ordered selections of `k` items out of `n`: n! / (n-k)!
pub fn permutation(n: i64, k: i64) -> Result<BigInt, MathError> {
    if k < 0 {
        return Err(MathError::NegativeFactorial(k));
    }
    if k > n {
        return Ok(BigInt::zero());
    }
    Ok(falling_factorial(n, k))
}

/// Number of unordered selections of `k` items out of `n`: n! / (k! * (n-k)!)
pub fn combination(n: i64, k: i64) -> Result<BigInt, MathError> {
    if k < 0 {
        return Err(MathError::NegativeFactorial(k));
    }
    if k > n {
        return Ok(BigInt::zero());
    }
    if k == 0 || k == n {
        return Ok(BigInt::one());
    }
    let k = k.min(n - k);
    Ok(falling_factorial(n, k) / factorial(k)?)
}

/// Naive trial division
pub fn is_prime(n: i64) -> bool {
    if n < 2 {
        return false;
    }
    let mut i = 2i64;
    while i <= n / i {
        if n % i == 0 {
            return false;
        }
        i += 1;
    }
    true
}

/// Prime factorization in the form `[2^3] * 3 * 5`.
/// Negative numbers get `-1` as the first factor
pub fn prime_factors(n: i64) -> String {
    let mut factors: Vec<String> = Vec::new();
    if n < 0 {
        factors.push("-1".to_string());
    }
    let mut x = n.unsigned_abs();
    if x < 2 {
        factors.push(x.to_string());
        return factors.join(" * ");
    }

    let mut i = 2u64;
    while i <= x / i {
        if x % i == 0 {
            let mut power = 0;
            while x % i == 0 {
                x /= i;
                power += 1;
            }
            if power > 1 {
                factors.push(format!("[{}^{}]", i, power));
            } else {
                factors.push(i.to_string());
            }
        }
        i += 1;
    }
    if x > 1 {
        factors.push(x.to_string());
    }
    factors.join(" * ")
}

/// Best rational approximation of `x` with a denominator not exceeding
/// `MAX_DENOMINATOR`. Walks the continued fraction expansion of `x` and stops
/// as soon as a convergent is within `FRACTION_EPSILON`.
pub fn to_fraction(x: f64) -> Ratio<i64> {
    if !x.is_finite() {
        return Ratio::new_raw(0, 1);
    }

    // convergents h/k: (h[-1], k[-1]) = (1, 0), (h[-2], k[-2]) = (0, 1)
    let (mut h_prev, mut k_prev) = (0i64, 1i64);
    let (mut h, mut k) = (1i64, 0i64);
    let mut rest = x;
    let mut best = Ratio::new_raw(0, 1);

    for _ in 0..64 {
        let a = rest.floor();
        if a.abs() > MAX_DENOMINATOR as f64 {
            break;
        }
        let a = a as i64;
        let next = a
            .checked_mul(h)
            .and_then(|v| v.checked_add(h_prev))
            .zip(a.checked_mul(k).and_then(|v| v.checked_add(k_prev)));
        let (h_next, k_next) = match next {
            Some(hk) => hk,
            None => break,
        };
        if k_next > MAX_DENOMINATOR {
            // largest semiconvergent that still fits, if it beats the convergent
            let m = (MAX_DENOMINATOR - k_prev) / k;
            let semi = Ratio::new_raw(m * h + h_prev, m * k + k_prev);
            if m > 0 && fraction_error(x, &semi) < fraction_error(x, &best) {
                best = semi;
            }
            break;
        }
        h_prev = h;
        k_prev = k;
        h = h_next;
        k = k_next;
        best = Ratio::new_raw(h, k);

        let frac = rest - a as f64;
        if fraction_error(x, &best) < FRACTION_EPSILON || frac == 0.0 {
            break;
        }
        rest = 1.0 / frac;
    }
    best
}

fn fraction_error(x: f64, r: &Ratio<i64>) -> f64 {
    (x - *r.numer() as f64 / *r.denom() as f64).abs()
}

/// Fraction approximating `x` as a `p/q` string; the denominator is always
/// printed
pub fn fraction(x: f64) -> String {
    let r = to_fraction(x);
    format!("{}/{}", r.numer(), r.denom())
}

/// Presents `x` as a multiple of PI: `1.75 * PI` turns into `π + (3/4)π`
pub fn pify(x: f64) -> String {
    if x == 0.0 {
        return "0".to_string();
    }
    let negative = x < 0.0;
    let coef = x.abs() / consts::PI;
    let int_part = coef.floor();
    let frac_part = coef - int_part;

    let whole = if int_part == 1.0 { "π".to_string() } else { format!("{:.0}π", int_part) };
    let (sign, joint) = if negative { ("-", " - ") } else { ("", " + ") };

    if frac_part == 0.0 {
        return format!("{}{}", sign, whole);
    }
    let frac = format!("({})π", fraction(frac_part));
    if int_part == 0.0 {
        format!("{}{}", sign, frac)
    } else {
        format!("{}{}{}{}", sign, whole, joint, frac)
    }
}

/// Inverse hyperbolic sine: ln(x + sqrt(x^2 + 1))
pub fn arsh(x: f64) -> f64 {
    (x + (x * x + 1.0).sqrt()).ln()
}

/// Inverse hyperbolic cosine: ln(x + sqrt(x^2 - 1)). NaN for x < 1
pub fn arch(x: f64) -> f64 {
    (x + (x * x - 1.0).sqrt()).ln()
}

/// Inverse hyperbolic tangent: ln((1 + x) / (1 - x)) / 2. NaN for |x| > 1
pub fn arth(x: f64) -> f64 {
    0.5 * ((1.0 + x) / (1.0 - x)).ln()
}
