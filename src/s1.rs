use rayon::prelude::*;

use crate::engine_types::{CountError, PrimeResult};
use crate::phi_tiny::{self, phi_tiny};
use crate::sieve_math::PrimeInt;

// 通常リーフ S1 の計算。
//
// 最初の c 個の素数と互いに素な平方因子なしの n <= y について
// Σ μ(n) φ(x/n, c) を求める。平方因子なしの数を素数の積として
// 再帰的に列挙し、外側の素数添字で並列化する。

/// S1(x, y, c) を計算する。`primes` は y 以下の素数の 1 始まりの表。
///
/// 実行時間 O(y · log log y)。整数加算の可換性により結果は
/// スレッド数に依らない。
pub fn s1<P: PrimeInt>(x: i64, y: i64, c: i64, primes: &[P]) -> PrimeResult<i64> {
    if x < 0 || y < 0 {
        return Err(CountError::InvalidArgument(format!(
            "s1: x={x} and y={y} must be >= 0"
        )));
    }
    if !(0..=phi_tiny::MAX_A).contains(&c) {
        return Err(CountError::InvalidArgument(format!(
            "s1: c={c} must be in [0, {}]",
            phi_tiny::MAX_A
        )));
    }

    let pi_y = primes.len() as i64 - 1;
    let sum: i64 = (c + 1..=pi_y)
        .into_par_iter()
        .map(|b| {
            let p = primes[b as usize].as_i64();
            -phi_tiny(x / p, c) + s1_thread(x, y, b, c, p, primes, 1)
        })
        .sum();

    Ok(phi_tiny(x, c) + sum)
}

/// square_free に b より後ろの素数を掛けて y まで伸ばす再帰。
/// mu は現在の μ(square_free · primes[b+1] · …) の符号。
fn s1_thread<P: PrimeInt>(
    x: i64,
    y: i64,
    b: i64,
    c: i64,
    square_free: i64,
    primes: &[P],
    mu: i64,
) -> i64 {
    let mut s1 = 0;

    for b2 in (b + 1)..primes.len() as i64 {
        let Some(next) = square_free.checked_mul(primes[b2 as usize].as_i64()) else {
            break;
        };
        if next > y {
            break;
        }
        s1 += mu * phi_tiny(x / next, c);
        s1 += s1_thread(x, y, b2, c, next, primes, -mu);
    }

    s1
}
