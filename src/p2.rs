use bitvec::prelude::*;
use rayon::prelude::*;

use crate::engine_types::{CountError, PrimeResult};
use crate::sieve_math::{generate_primes, integer_sqrt, iroot3, isqrt, simple_sieve};

// 2 番目・3 番目の部分篩関数。
//
// P2(x, y) は x 以下で「y より大きい素因数ちょうど 2 個（重複込み）」を
// 持つ数の個数、P3(x, a) は同じく 3 個のもの。

/// P2(x, y) = Σ_{y < q <= √x} (π(x/q) − π(q) + 1)。
///
/// π(x/q) は q の大きい順（x/q の小さい順）に、昇順の区間篩を進めながら
/// 走査位置までの素数個数 pix を読み取って求める。篩の前進と素数の消費が
/// 互いに縛り合うため、この関数は逐次実装。
/// 空間計算量 O(√(x/y))。
pub fn p2(x: i64, y: i64) -> PrimeResult<i64> {
    if x < 0 || y < 0 {
        return Err(CountError::InvalidArgument(format!(
            "p2: x={x} and y={y} must be >= 0"
        )));
    }

    let sqrtx = isqrt(x);
    if y >= sqrtx {
        return Ok(0);
    }

    // (y, √x] の素数を昇順で列挙する。π(qs[j-1]) = pi_y + j
    let all = simple_sieve(sqrtx as u64);
    let pi_y = all.iter().take_while(|&&p| p <= y as u64).count() as i64;
    let qs: Vec<i64> = all
        .iter()
        .filter(|&&p| p > y as u64)
        .map(|&p| p as i64)
        .collect();
    if qs.is_empty() {
        return Ok(0);
    }

    let limit = x / qs[0];
    let small = simple_sieve(integer_sqrt(limit as u64));
    let segment_size = ((integer_sqrt(limit as u64) + 1).next_power_of_two() as i64).max(1 << 12);

    let mut sum = 0i64;
    let mut pix = 0i64; // 走査位置までの素数個数
    let mut j = qs.len(); // 次に消費する素数（降順）
    let mut seg = bitvec![1; segment_size as usize];

    let mut low = 2i64;
    while low <= limit && j > 0 {
        let high = (low + segment_size).min(limit + 1);
        seg.fill(true);

        for &p in &small {
            let p = p as i64;
            if p * p >= high {
                break;
            }
            // low 以上の最初の倍数（p² 未満は小さい素数で処理済み）
            let mut k = (((low + p - 1) / p) * p).max(p * p);
            while k < high {
                seg.set((k - low) as usize, false);
                k += p;
            }
        }

        // セグメント内を昇順に走査し、x/q の位置ごとに π を読む
        let mut target = x / qs[j - 1];
        for n in low..high {
            if seg[(n - low) as usize] {
                pix += 1;
            }
            while j > 0 && target == n {
                // π(x/q) − π(q) + 1 = pix − (pi_y + j) + 1
                sum += pix - (pi_y + j as i64) + 1;
                j -= 1;
                if j == 0 {
                    break;
                }
                target = x / qs[j - 1];
            }
        }

        low = high;
    }

    Ok(sum)
}

/// P3(x, a): x 以下で a 番目の素数より大きい素因数ちょうど 3 個を持つ数の
/// 個数。素数表に対する二分探索 π で二重和を評価し、外側を並列化する。
/// 空間計算量 O(π(√x))。
pub fn p3(x: i64, a: i64) -> PrimeResult<i64> {
    if x < 0 || a < 0 {
        return Err(CountError::InvalidArgument(format!(
            "p3: x={x} and a={a} must be >= 0"
        )));
    }

    let primes = generate_primes::<i64>(isqrt(x));
    let y = iroot3(x);
    let pi_y = pi_bsearch(&primes, y);

    let sum: i64 = (a + 1..=pi_y)
        .into_par_iter()
        .map(|i| {
            let xi = x / primes[i as usize];
            let bi = pi_bsearch(&primes, isqrt(xi));
            let mut s = 0i64;
            for j in i..=bi {
                s += pi_bsearch(&primes, xi / primes[j as usize]) - (j - 1);
            }
            s
        })
        .sum();

    Ok(sum)
}

/// 1 始まりの素数表に対する二分探索で π(n) を求める。
fn pi_bsearch(primes: &[i64], n: i64) -> i64 {
    primes[1..].partition_point(|&p| p <= n) as i64
}
