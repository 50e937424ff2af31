use std::sync::Mutex;
use std::thread;
use std::time::Instant;

use crate::engine_types::{compute_eta, PrimeResult, Progress};
use crate::load_balancer::{LoadBalancer, Runtime, Work};
use crate::memory;
use crate::phi_cache::phi_vector;
use crate::pi_table::PiTable;
use crate::sieve::Sieve;
use crate::sieve_math::{isqrt, PrimeInt};
use crate::status::format_eta;

// ハード（特殊）リーフの寄与 S2 を計算するドライバ。
//
// 各ワーカーは LoadBalancer から (low, segments, segment_size) を受け取り、
// 自分専用の Sieve と φ 前置ベクトルだけでチャンクを処理して部分和を返す。
// チャンク先頭の φ 前置値は phi_vector(low−1, ·) で直接求めるため、
// 部分和は可換な加算で合成でき、ワーカーの完了順序は結果に影響しない。
// ブロックするのは LoadBalancer のロック取得だけで、その中では算術しか
// 行わない（ログはロックの外）。

/// S2(x, y, z, c) を threads 本のワーカーで計算する。
///
/// `primes` は y 以下の素数の 1 始まりの表、`lpf` / `mu` は y までの
/// 最小素因数とメビウス関数の表、`pi` は y を上限とする π 表。
/// s2_approx は進捗見積もりにだけ使い、結果の数値には入らない。
#[allow(clippy::too_many_arguments)]
pub fn s2<P: PrimeInt>(
    x: i64,
    y: i64,
    z: i64,
    c: i64,
    s2_approx: i128,
    primes: &[P],
    lpf: &[i64],
    mu: &[i32],
    pi: &PiTable,
    threads: usize,
) -> PrimeResult<i64> {
    let threads = threads.max(1);
    let time = Instant::now();
    let balancer = Mutex::new(LoadBalancer::new(x, y, z, s2_approx));

    {
        let max_segment = balancer.lock().unwrap().max_segment_size();
        let mem = memory::get_memory_info(max_segment as u64, threads);
        log::info!("S2: z = {z}, threads = {threads}");
        log::info!("{}", mem.format());
    }

    thread::scope(|scope| -> PrimeResult<()> {
        let mut handles = Vec::with_capacity(threads);
        for _ in 0..threads {
            let balancer = &balancer;
            handles.push(scope.spawn(move || -> PrimeResult<()> {
                let mut work = Work::default();
                let mut s2: i128 = 0;
                let mut runtime = Runtime::default();

                loop {
                    let more = balancer.lock().unwrap().get_work(&mut work, s2, &runtime);
                    if !more {
                        break;
                    }

                    let t0 = Instant::now();
                    let (sum, init) = s2_thread(x, y, z, c, &work, pi, primes, lpf, mu)?;
                    s2 = sum;
                    runtime = Runtime {
                        init,
                        secs: t0.elapsed().as_secs_f64(),
                    };

                    // 進捗はロックの外で、配布済みの位置からざっくり報告する
                    let progress = Progress {
                        processed: work.low.clamp(0, z) as u64,
                        total: z.max(1) as u64,
                        eta_secs: compute_eta(
                            work.low.clamp(0, z) as u64,
                            z.max(1) as u64,
                            time.elapsed().as_secs_f64(),
                        ),
                    };
                    log::debug!(
                        "S2 chunk: low = {}, segments = {}, secs = {:.3}, ETA {}",
                        work.low,
                        work.segments,
                        runtime.secs,
                        format_eta(progress.eta_secs)
                    );
                }
                Ok(())
            }));
        }
        for handle in handles {
            handle.join().expect("S2 worker panicked")?;
        }
        Ok(())
    })?;

    let s2_total = balancer.into_inner().unwrap().get_result() as i64;
    log::info!("S2 = {s2_total} ({:.3} sec)", time.elapsed().as_secs_f64());
    Ok(s2_total)
}

/// 1 チャンク分の S2 寄与を計算する。戻り値は (部分和, 初期化秒数)。
#[allow(clippy::too_many_arguments)]
fn s2_thread<P: PrimeInt>(
    x: i64,
    y: i64,
    z: i64,
    c: i64,
    work: &Work,
    pi: &PiTable,
    primes: &[P],
    lpf: &[i64],
    mu: &[i32],
) -> PrimeResult<(i128, f64)> {
    let t_init = Instant::now();
    let mut low = work.low;
    let limit = (low + work.segments * work.segment_size).min(z + 1);
    let chunk_low1 = low.max(1);

    // このチャンクで消し込みに使う素数は primes[c+1..=size-1]
    let max_prime = isqrt(x / chunk_low1).min(y);
    let size = pi.pi(max_prime) + 1;
    let pi_sqrty = pi.pi(isqrt(y));

    if c >= size - 1 {
        return Ok((0, 0.0));
    }

    // phi[b] = φ(low−1, b−1) = [1, low) で最初の b−1 個の素数と互いに素な
    // 数の個数。セグメントを進めるたびに増分を足し込む
    let mut phi = phi_vector(chunk_low1 - 1, size - 1, primes, pi);
    let mut sieve = Sieve::new(low as u64, work.segment_size as u64, (size - 1) as usize);
    let init_secs = t_init.elapsed().as_secs_f64();

    let mut s2: i128 = 0;

    while low < limit {
        // 現在のセグメント [low, high)
        let high = (low + work.segment_size).min(limit);
        let low1 = low.max(1);

        sieve.pre_sieve(primes, c as usize, low as u64, high as u64)?;

        // 最初の c 個の素数を除いた時点でのセグメント内の未篩個数。
        // b の消し込みごとに減らし、phi[b] の増分に使う
        let mut unsieved = sieve.count_range(0, (high - low - 1) as u64) as i64;
        let mut b = c + 1;

        'leaves: {
            // c < b <= π(√y): 素数 × 平方因子なしの数からなる特殊リーフ
            // low <= x / (primes[b]·m) < high
            let end = pi_sqrty.min(size - 1);
            while b <= end {
                let prime = primes[b as usize].as_i64();
                let min_m = (x / (prime * high)).max(y / prime);
                let max_m = (x / (prime * low1)).min(y);

                if prime >= max_m {
                    break 'leaves;
                }

                let mut m = max_m;
                while m > min_m {
                    if mu[m as usize] != 0 && prime < lpf[m as usize] {
                        // 特殊リーフ。φ(x/(primes[b]·m), b−1) は
                        // φ 前置値 + セグメント内の未篩個数
                        let xpm = x / (prime * m);
                        let stop = (xpm - low) as u64;
                        let phi_xpm = phi[b as usize] + sieve.count(stop) as i64;
                        s2 -= (mu[m as usize] as i64 * phi_xpm) as i128;
                    }
                    m -= 1;
                }

                phi[b as usize] += unsieved;
                unsieved -= sieve.cross_off_count(prime as u64, b as usize) as i64;
                b += 1;
            }

            // π(√y) < b < size: 素数 2 個の積からなるハードリーフ
            // low <= x / (primes[b]·q) < high, y/primes[b] < q <= y
            while b <= size - 1 {
                let prime = primes[b as usize].as_i64();
                let mut l = pi.pi((x / (prime * low1)).min(y));
                let min_hard = (x / (prime * high)).max(y / prime).max(prime);

                if prime >= primes[l as usize].as_i64() {
                    break 'leaves;
                }

                while primes[l as usize].as_i64() > min_hard {
                    let xpq = x / (prime * primes[l as usize].as_i64());
                    let stop = (xpq - low) as u64;
                    s2 += (phi[b as usize] + sieve.count(stop) as i64) as i128;
                    l -= 1;
                }

                phi[b as usize] += unsieved;
                unsieved -= sieve.cross_off_count(prime as u64, b as usize) as i64;
                b += 1;
            }
        }

        low += work.segment_size;
    }

    Ok((s2, init_secs))
}
