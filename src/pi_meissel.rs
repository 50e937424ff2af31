use crate::engine_types::{CountError, PrimeResult};
use crate::p2;
use crate::phi_cache::phi;
use crate::sieve_math::{iroot3, isqrt};

// Legendre / Meissel / Lehmer の古典式。LMO の検算用リファレンスとして十分速い。

/// Legendre 法: π(x) = φ(x, a) + a − 1, a = π(√x)（再帰）。
pub fn pi_legendre(x: i64) -> PrimeResult<i64> {
    if x < 0 {
        return Err(CountError::InvalidArgument(format!(
            "pi_legendre: x={x} must be >= 0"
        )));
    }
    if x < 2 {
        return Ok(0);
    }

    let a = pi_legendre(isqrt(x))?;
    Ok(phi(x, a)? + a - 1)
}

/// Meissel 法: π(x) = φ(x, a) + a − 1 − P2(x, a), a = π(x^(1/3))。
/// 実行時間 O(x / (log x)^3)、空間 O(x^(1/2) / log x)。
pub fn pi_meissel(x: i64) -> PrimeResult<i64> {
    if x < 0 {
        return Err(CountError::InvalidArgument(format!(
            "pi_meissel: x={x} must be >= 0"
        )));
    }
    if x < 2 {
        return Ok(0);
    }

    let x13 = iroot3(x);
    let a = pi_legendre(x13)?;

    // (x13, p_{a+1}) に素数はないので、P2 の下限は x13 で一致する
    Ok(phi(x, a)? + a - 1 - p2::p2(x, x13)?)
}

/// Lehmer 法: π(x) = φ(x, a) + a − 1 − P2 − P3, a = π(x^(1/4))。
/// P3 の π 表が √x で足りるのは a >= π(x^(1/4)) のときに限る。
pub fn pi_lehmer(x: i64) -> PrimeResult<i64> {
    if x < 0 {
        return Err(CountError::InvalidArgument(format!(
            "pi_lehmer: x={x} must be >= 0"
        )));
    }
    if x < 2 {
        return Ok(0);
    }

    let x14 = isqrt(isqrt(x));
    let a = pi_legendre(x14)?;

    Ok(phi(x, a)? + a - 1 - p2::p2(x, x14)? - p2::p3(x, a)?)
}
