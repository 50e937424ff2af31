pub mod bit_sieve240;
pub mod config;
pub mod engine_types;
pub mod load_balancer;
pub mod memory;
pub mod p2;
pub mod phi0;
pub mod phi_cache;
pub mod phi_tiny;
pub mod pi_lmo;
pub mod pi_meissel;
pub mod pi_table;
pub mod s1;
pub mod s2;
pub mod sieve;
pub mod sieve_math;
pub mod status;

pub use engine_types::{CountError, PrimeResult};

/// π(x)（x 以下の素数の個数）を計算する。
///
/// 小さい x は単純な篩で直接数え、それ以外は LMO 法
/// （S1 + S2 + π(y) − 1 − P2）。スレッド数は自動。
pub fn pi(x: i64) -> PrimeResult<i64> {
    pi_with(x, &config::Config::default())
}

/// 設定を指定して π(x) を計算する。
pub fn pi_with(x: i64, cfg: &config::Config) -> PrimeResult<i64> {
    if x < 0 {
        return Err(CountError::InvalidArgument(format!(
            "pi: x={x} must be >= 0"
        )));
    }

    if x < cfg.direct_limit.max(2) {
        return Ok(sieve_math::simple_sieve(x.max(0) as u64).len() as i64);
    }

    let alpha = (cfg.alpha > 0.0).then_some(cfg.alpha);
    pi_lmo::pi_lmo_alpha(x, cfg.threads, alpha)
}
