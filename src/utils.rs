//! Utility algorithms for canonicalizing keys.
//!
//! Most of the file is [`fmt_number`], which writes a float the same way ECMAScript's
//! `Number::toString` does, so that numeric keys coerce to the strings one would expect from a
//! dynamically typed map.

use crate::prelude::*;
use std::fmt::LowerExp;

/// A float that [`fmt_number`] can write.
///
/// Digits are taken from the float at its own width, so that `0.1_f32` is written `0.1` rather
/// than as the digits of the `f64` it widens to.
pub trait Float: Copy + LowerExp {
    /// The value as an `f64`, used to classify it.
    fn to_f64(self) -> f64;
}

impl Float for f64 {
    fn to_f64(self) -> f64 {
        self
    }
}

impl Float for f32 {
    fn to_f64(self) -> f64 {
        f64::from(self)
    }
}

/// Splits a finite, nonzero float into its shortest round-tripping decimal digits and the position
/// `n` of the decimal point, so that `|x| = 0.d₁d₂…dₖ × 10ⁿ`.
fn decimal_digits<F: Float>(x: F) -> (SmallVec<u8>, i32) {
    // `LowerExp` writes the shortest digits that round-trip, e.g. `-1.2345e-7`. The sign is
    // filtered out along with the point.
    let exp = format!("{x:e}");
    let (mantissa, exponent) = exp.split_once('e').unwrap_or((&exp, "0"));

    let digits = mantissa.bytes().filter(u8::is_ascii_digit).collect();
    let exponent: i32 = exponent.parse().unwrap_or_default();
    (digits, exponent + 1)
}

/// Pushes `count` copies of `'0'`.
fn push_zeros(str: &mut String, count: usize) {
    str.extend(std::iter::repeat('0').take(count));
}

/// Pushes ASCII digits.
fn push_digits(str: &mut String, digits: &[u8]) {
    str.extend(digits.iter().map(|&d| char::from(d)));
}

/// Writes a float the way ECMAScript's `Number::toString` does.
///
/// Both zeros are written as `0`, integral values have no fractional part, and exponential
/// notation (with an explicit sign on the exponent) is used only when the decimal point falls
/// outside of `(-6, 21]`.
#[must_use]
pub fn fmt_number<F: Float>(float: F) -> String {
    let x = float.to_f64();
    if x.is_nan() {
        return String::from("NaN");
    } else if x == 0.0 {
        return String::from("0");
    } else if x.is_infinite() {
        return String::from(if x > 0.0 { "Infinity" } else { "-Infinity" });
    }

    let mut str = String::new();
    if x < 0.0 {
        str.push('-');
    }

    let (digits, n) = decimal_digits(float);
    let k = digits.len();

    // Integer, possibly padded with zeros.
    if (1..=21).contains(&n) && k <= n.unsigned_abs() as usize {
        push_digits(&mut str, &digits);
        push_zeros(&mut str, n.unsigned_abs() as usize - k);
    }
    // Decimal point within the digits.
    else if (1..=21).contains(&n) {
        let (int, frac) = digits.split_at(n.unsigned_abs() as usize);
        push_digits(&mut str, int);
        str.push('.');
        push_digits(&mut str, frac);
    }
    // Small number with leading zeros.
    else if (-5..=0).contains(&n) {
        str.push_str("0.");
        push_zeros(&mut str, n.unsigned_abs() as usize);
        push_digits(&mut str, &digits);
    }
    // Exponential notation.
    else {
        let (fst, rest) = digits.split_at(1);
        push_digits(&mut str, fst);
        if !rest.is_empty() {
            str.push('.');
            push_digits(&mut str, rest);
        }

        let e = n - 1;
        str.push('e');
        str.push(if e < 0 { '-' } else { '+' });
        str.push_str(&e.unsigned_abs().to_string());
    }

    str
}

/// Widens an `f32` into the `f64` written with the same digits, so that both have the same
/// canonical form. Plain widening would turn `0.1_f32` into `0.10000000149011612`.
#[must_use]
pub fn widen(x: f32) -> f64 {
    // At most 9 significant digits, which any `f64` holds exactly.
    fmt_number(x).parse().unwrap_or_else(|_| f64::from(x))
}
