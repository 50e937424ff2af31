use crate::engine_types::{CountError, PrimeResult};
use crate::phi_tiny::get_c;
use crate::pi_table::PiTable;
use crate::sieve_math::{
    generate_lpf, generate_moebius, generate_primes, iroot3, iroot6, isqrt, PrimeInt,
};
use crate::{memory, p2, s1, s2};

// Lagarias–Miller–Odlyzko 法による π(x)。
//
//   π(x) = S1 + S2 + π(y) − 1 − P2(x, y),  y = α·x^(1/3), z = x/y
//
// S1 は通常リーフ、S2 は分割篩を要する特殊リーフ、P2 は素因数 2 個の補正。
// y が 32bit に収まる場合は素数表を u32 で持ち、本体はその型で単相化する。

/// y = α · x^(1/3) のチューニング係数。経験的な 3 次式で、どの値でも
/// 結果は変わらず速度だけが変わる。[1, x^(1/6)] にクランプする。
pub fn alpha_lmo(x: i64) -> f64 {
    let logx = (x.max(2) as f64).ln();
    let a = 0.0017154;
    let b = -0.0508992;
    let c = 0.483613;
    let d = 0.0672202;
    let alpha = a * logx.powi(3) + b * logx.powi(2) + c * logx + d;
    alpha.clamp(1.0, iroot6(x).max(1) as f64)
}

/// LMO 法で π(x) を計算する。α は自動。
pub fn pi_lmo(x: i64, threads: usize) -> PrimeResult<i64> {
    pi_lmo_alpha(x, threads, None)
}

/// α を指定して LMO 法で π(x) を計算する。α はどの値でも結果に影響しない
/// （配列サイズと境界の検証に使える）。
pub fn pi_lmo_alpha(x: i64, threads: usize, alpha: Option<f64>) -> PrimeResult<i64> {
    if x < 0 {
        return Err(CountError::InvalidArgument(format!(
            "pi_lmo: x={x} must be >= 0"
        )));
    }
    if x > 1 << 62 {
        return Err(CountError::PrecisionExceeded(format!(
            "pi_lmo: x={x} exceeds 2^62, the 64bit backend cannot hold the intermediates"
        )));
    }
    if x < 2 {
        return Ok(0);
    }

    let x13 = iroot3(x);
    let alpha = alpha
        .unwrap_or_else(|| alpha_lmo(x))
        .clamp(1.0, iroot6(x).max(1) as f64);
    let y = ((alpha * x13 as f64) as i64).clamp(x13.max(2), isqrt(x).max(2));
    let z = x / y;
    let c = get_c(y);
    let threads = memory::ideal_num_threads(threads, z);

    log::info!("pi_lmo: x = {x}, y = {y}, z = {z}, c = {c}, alpha = {alpha:.2}");

    let p2 = p2::p2(x, y)?;

    if y <= u32::MAX as i64 {
        pi_lmo_body::<u32>(x, y, z, c, p2, threads)
    } else {
        pi_lmo_body::<i64>(x, y, z, c, p2, threads)
    }
}

fn pi_lmo_body<P: PrimeInt>(
    x: i64,
    y: i64,
    z: i64,
    c: i64,
    p2: i64,
    threads: usize,
) -> PrimeResult<i64> {
    let primes = generate_primes::<P>(y);
    let lpf = generate_lpf(y);
    let mu = generate_moebius(y);
    let pi = PiTable::new(y);
    let pi_y = primes.len() as i64 - 1;

    let s1 = s1::s1(x, y, c, &primes)?;
    let s2_approx = s2_approx(x, pi_y, p2, s1);
    let s2 = s2::s2(x, y, z, c, s2_approx, &primes, &lpf, &mu, &pi, threads)?;

    Ok(s1 + s2 + pi_y - 1 - p2)
}

/// π(x) の初等近似 x / (ln x − 1)。進捗見積もりの種にするだけで、
/// 結果の数値には一切入らない。
fn pi_approx(x: i64) -> i64 {
    ((x as f64) / ((x as f64).ln() - 1.0)) as i64
}

/// S2 の近似値。LoadBalancer の進捗率の分母に使う。
fn s2_approx(x: i64, pi_y: i64, p2: i64, s1: i64) -> i128 {
    (pi_approx(x) as i128 - s1 as i128 - pi_y as i128 + 1 + p2 as i128).max(1)
}
