use rayon::prelude::*;

use crate::engine_types::{CountError, PrimeResult};
use crate::phi_tiny::phi_tiny;
use crate::sieve_math::generate_primes;

// Gourdon 型アルゴリズムの Phi0。
//
// Phi0(x, y, z, k) = Σ μ(d) φ(x/d, k)
// （d は (p_k, y] の素数だけからなる平方因子なしの数で d <= z、d = 1 を含む）
//
// 通常リーフ S1 と同じ再帰列挙で、積の上限が y ではなく z になる。

const PRIMES_TINY_EXT: [i64; 9] = [0, 2, 3, 5, 7, 11, 13, 17, 19];

/// a <= 8 の φ(x, a)。a = 7, 8 は
/// φ(x, a) = φ(x, a-1) − φ(x / p_a, a-1) で a <= 6 の閉形式に落とす。
fn phi_small(x: i64, a: i64) -> i64 {
    if a <= 6 {
        phi_tiny(x, a)
    } else {
        phi_small(x, a - 1) - phi_small(x / PRIMES_TINY_EXT[a as usize], a - 1)
    }
}

/// Phi0(x, y, z, k) を計算する。k <= 8。
pub fn phi0(x: i64, y: i64, z: i64, k: i64) -> PrimeResult<i64> {
    if x < 0 || y < 0 || z < 0 {
        return Err(CountError::InvalidArgument(format!(
            "phi0: x={x}, y={y}, z={z} must be >= 0"
        )));
    }
    if !(0..=8).contains(&k) {
        return Err(CountError::InvalidArgument(format!(
            "phi0: k={k} must be in [0, 8]"
        )));
    }

    let primes = generate_primes::<i64>(y);
    let pi_y = primes.len() as i64 - 1;

    let sum: i64 = (k + 1..=pi_y)
        .into_par_iter()
        .map(|b| {
            let p = primes[b as usize];
            -phi_small(x / p, k) + phi0_thread(x, z, b, k, p, &primes, 1)
        })
        .sum();

    Ok(phi_small(x, k) + sum)
}

/// square_free に b より後ろの素数を掛けて z まで伸ばす再帰。
/// mu は次に掛けた積の μ の符号。
fn phi0_thread(x: i64, z: i64, b: i64, k: i64, square_free: i64, primes: &[i64], mu: i64) -> i64 {
    let mut phi0 = 0;

    for b2 in (b + 1)..primes.len() as i64 {
        let Some(next) = square_free.checked_mul(primes[b2 as usize]) else {
            break;
        };
        if next > z {
            break;
        }
        phi0 += mu * phi_small(x / next, k);
        phi0 += phi0_thread(x, z, b2, k, next, primes, -mu);
    }

    phi0
}
