//! Numeric increments (`I` operations).
//!
//! Integer + integer stays an integer. As soon as a float is involved the sum
//! is a float.

use serde_json::Number;

/// Canonical equality of two numbers.
pub fn number_eq(a: &Number, b: &Number) -> bool {
    match (a.is_f64(), b.is_f64()) {
        (true, true) => a.as_f64().map(f64::to_bits) == b.as_f64().map(f64::to_bits),
        (false, false) => a == b,
        _ => false,
    }
}

/// `base + delta`, or `None` on integer overflow or a non-finite result.
pub fn add(base: &Number, delta: &Number) -> Option<Number> {
    if let (Some(x), Some(y)) = (as_integer(base), as_integer(delta)) {
        return integer(x.checked_add(y)?);
    }
    Number::from_f64(base.as_f64()? + delta.as_f64()?)
}

/// The delta `d` such that `add(from, d)` reproduces `to` exactly.
///
/// Returns `None` when no such delta exists, in which case the caller falls
/// back to replacing the value.
pub fn increment_between(from: &Number, to: &Number) -> Option<Number> {
    if !from.is_f64() && !to.is_f64() {
        return integer(as_integer(to)?.checked_sub(as_integer(from)?)?);
    }
    let delta = Number::from_f64(to.as_f64()? - from.as_f64()?)?;
    let reproduced = add(from, &delta)?;
    number_eq(&reproduced, to).then_some(delta)
}

fn as_integer(n: &Number) -> Option<i128> {
    if n.is_f64() {
        return None;
    }
    n.as_i64().map(i128::from).or_else(|| n.as_u64().map(i128::from))
}

fn integer(n: i128) -> Option<Number> {
    if let Ok(v) = i64::try_from(n) {
        return Some(Number::from(v));
    }
    u64::try_from(n).ok().map(Number::from)
}
