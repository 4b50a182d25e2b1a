//! Fixed-point basis-point arithmetic.
//!
//! Everything here is integer-only and saturating so that every node computes
//! the same result for the same inputs.

use alloy::primitives::U256;

/// A fraction scaled by 10000 (10000 bips = 1.0).
pub type Bips = i64;

pub const ONE_IN_BIPS: Bips = 10_000;

// terms of the Taylor series used by `approx_exp_basis_points`
const EXP_ACCURACY: u64 = 4;

pub const fn percent_to_bips(percent: i64) -> Bips {
    percent.saturating_mul(100)
}

/// Converts a plain quantity to basis points, saturating at `Bips::MAX`.
pub fn natural_to_bips(natural: i64) -> Bips {
    natural.saturating_mul(ONE_IN_BIPS)
}

/// Multiplies `value` by the fraction `bips / 10000`.
///
/// The whole and fractional parts of `value / 10000` are scaled separately,
/// so the result is exact until it saturates at `U256::MAX`. Negative
/// fractions yield zero since `value` is unsigned.
pub fn mul_by_bips(value: U256, bips: Bips) -> U256 {
    let Ok(factor) = u64::try_from(bips) else {
        return U256::ZERO;
    };
    let factor = U256::from(factor);
    let one = U256::from(ONE_IN_BIPS as u64);

    let whole = (value / one).saturating_mul(factor);
    // remainder < 10000 and factor < 2^63, so this cannot overflow
    let fraction = (value % one) * factor / one;
    whole.saturating_add(fraction)
}

/// Approximates `e^(value / 10000)` in basis points.
///
/// Evaluates the degree-4 Taylor polynomial with Horner's rule. The result is
/// exactly `ONE_IN_BIPS` at zero, non-decreasing in `value`, and saturates
/// instead of overflowing. Negative inputs return the reciprocal
/// of the positive approximation.
pub fn approx_exp_basis_points(value: Bips) -> Bips {
    let negative = value < 0;
    let x = value.unsigned_abs();
    let one = ONE_IN_BIPS as u64;

    let mut res = one.saturating_add(x / EXP_ACCURACY);
    for i in 1..EXP_ACCURACY {
        res = one.saturating_add(res.saturating_mul(x) / ((EXP_ACCURACY - i) * one));
    }

    if negative {
        // res >= one, so the quotient always fits
        return saturating_ucast_to_signed(one * one / res);
    }
    saturating_ucast_to_signed(res)
}

/// Clamps a signed quantity into the unsigned range, mapping negatives to 0.
pub fn saturating_ucast(value: i128) -> u64 {
    if value <= 0 {
        0
    } else {
        u64::try_from(value).unwrap_or(u64::MAX)
    }
}

pub fn saturating_ucast_to_signed(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

/// Applies a signed delta to an unsigned accumulator.
///
/// The sum is formed in `i128`, where it cannot overflow, and only clamped to
/// `[0, u64::MAX]` at the end.
pub fn apply_signed_delta(value: u64, delta: i64) -> u64 {
    saturating_ucast(i128::from(value) + i128::from(delta))
}

/// Negates an unsigned quantity, saturating at `i64::MIN`.
pub fn saturating_neg(value: u64) -> i64 {
    match i64::try_from(value) {
        Ok(v) => -v,
        Err(_) => i64::MIN,
    }
}
