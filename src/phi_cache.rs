use rayon::prelude::*;

use crate::bit_sieve240::{UNSET_BIT, UNSET_LARGER};
use crate::engine_types::{CountError, PrimeResult};
use crate::phi_tiny::{self, get_c, is_phi_tiny, phi_tiny};
use crate::pi_table::PiTable;
use crate::sieve_math::{ceil_div, generate_n_primes, isqrt, PrimeInt};

/// φ(x, a) 再帰のワーカー別キャッシュ。
///
/// 漸化式 φ(x, a) = φ(x, a-1) − φ(x / primes[a], a-1) を符号付きで展開し、
/// 以下の近道で枝を刈る:
///
/// 1. x <= primes[a] なら互いに素なのは 1 だけ。
/// 2. a <= 6 は `phi_tiny` の閉形式。
/// 3. a >= π(√x) の範囲では φ(x, a) = π(x) − a + 1（π 表参照）。
/// 4. ビット篩キャッシュにヒットすればブロック累積 + popcount で O(1)。
///
/// キャッシュ本体は `rows[a][k]` に (累積個数, 240 個分のビット) を持ち、
/// rows[a] は「最初の a 個の素数を除いた残り」の篩結果。構築は遅延かつ単調で、
/// 行 a−1 から行 a を導出する。
pub struct PhiCache<'a, P: PrimeInt> {
    primes: &'a [P],
    pi: &'a PiTable,
    rows: Vec<Vec<CacheLine>>,
    max_x: u64,
    max_x_size: u64,
    max_a_cached: i64,
    max_a: i64,
}

#[derive(Clone, Copy)]
struct CacheLine {
    count: u32,
    bits: u64,
}

/// ワーカーあたりのキャッシュ上限（MiB）。
pub const DEFAULT_CACHE_MEGABYTES: u64 = 16;

impl<'a, P: PrimeInt> PhiCache<'a, P> {
    pub fn new(x: i64, a: i64, primes: &'a [P], pi: &'a PiTable) -> Self {
        Self::with_capacity(x, a, primes, pi, DEFAULT_CACHE_MEGABYTES)
    }

    /// キャッシュ容量を指定して構築する。容量・max_a の既定値はベンチマークで
    /// 決めた値で、変えると速度だけが変わり結果は変わらない。
    pub fn with_capacity(
        x: i64,
        a: i64,
        primes: &'a [P],
        pi: &'a PiTable,
        max_megabytes: u64,
    ) -> Self {
        let mut cache = PhiCache {
            primes,
            pi,
            rows: Vec::new(),
            max_x: 0,
            max_x_size: 0,
            max_a_cached: 0,
            max_a: 0,
        };

        // 頻繁に使われる小さい a だけをキャッシュする
        let a = a - a.min(30);
        let max_a = a.min(100);

        if max_a <= phi_tiny::MAX_A {
            return cache;
        }

        // x <= max_x = √x の範囲をキャッシュ対象にし、
        // 行数で割った容量からワード数の上限を逆算する
        let mut max_x = isqrt(x) as u64;
        let indexes = (max_a - phi_tiny::MAX_A) as u64;
        let max_bytes = max_megabytes << 20;
        let max_bytes_per_index = max_bytes / indexes;
        let numbers_per_byte = 240 / std::mem::size_of::<CacheLine>() as u64;
        max_x = max_x.min(max_bytes_per_index * numbers_per_byte);
        let max_x_size = ceil_div(max_x, 240);

        // ごく小さい計算ではキャッシュは割に合わない
        if max_x_size < 8 {
            return cache;
        }

        // 末尾ワードに未初期化ビットが残らないよう 240 の倍数に切り上げる
        cache.max_x = max_x_size * 240 - 1;
        cache.max_x_size = max_x_size;
        cache.max_a = max_a;
        cache
    }

    /// φ(x, a) · sign を返す。sign は ±1 で、再帰のたびに反転して
    /// 包除原理の符号を伝播する。
    pub fn phi(&mut self, x: i64, a: i64, sign: i64) -> i64 {
        debug_assert!(sign == 1 || sign == -1);

        if x <= self.primes[a as usize].as_i64() {
            return sign;
        } else if is_phi_tiny(a) {
            return phi_tiny(x, a) * sign;
        } else if self.is_pix(x, a) {
            return (self.pi.pi(x) - a + 1) * sign;
        }

        if self.max_a_cached < a.min(self.max_a) && (x as u64) <= self.max_x {
            self.init_cache(a.min(self.max_a));
        }
        if self.is_cached(x, a) {
            return self.phi_cache_at(x, a) * sign;
        }

        // 通常は φ(x, c) の閉形式から始めるが、より大きい c の行が
        // キャッシュ済みならそこから始めたほうが項数が減る
        let mut c = phi_tiny::MAX_A;
        let larger_c = self.max_a_cached.min(a).max(c);
        let mut sum = if self.is_cached(x, larger_c) {
            c = larger_c;
            self.phi_cache_at(x, c) * sign
        } else {
            phi_tiny(x, c) * sign
        };

        let sqrtx = isqrt(x);
        let mut i = c + 1;
        while i <= a {
            // primes[i] > √x 以降の項は全て φ(x / primes[i], i - 1) = 1
            if self.primes[i as usize].as_i64() > sqrtx {
                break;
            }
            let xp = x / self.primes[i as usize].as_i64();
            if self.is_pix(xp, i - 1) {
                sum += (self.pi.pi(xp) - i + 2) * -sign;
            } else if self.is_cached(xp, i - 1) {
                sum += self.phi_cache_at(xp, i - 1) * -sign;
            } else {
                sum += self.phi(xp, i - 1, -sign);
            }
            i += 1;
        }
        sum += (a + 1 - i) * -sign;

        sum
    }

    /// a >= π(√x) なら φ(x, a) = π(x) − a + 1 が成り立つ範囲かどうか。
    #[inline]
    fn is_pix(&self, x: i64, a: i64) -> bool {
        x <= self.pi.limit() && (a + 1) < self.primes.len() as i64 && {
            let p = self.primes[(a + 1) as usize].as_i64() as i128;
            (x as i128) < p * p
        }
    }

    #[inline]
    fn is_cached(&self, x: i64, a: i64) -> bool {
        (x as u64) <= self.max_x && a <= self.max_a_cached && a > phi_tiny::MAX_A
    }

    #[inline]
    fn phi_cache_at(&self, x: i64, a: i64) -> i64 {
        debug_assert!(self.is_cached(x, a));
        let line = self.rows[a as usize][(x / 240) as usize];
        line.count as i64 + (line.bits & UNSET_LARGER[(x % 240) as usize]).count_ones() as i64
    }

    /// x <= max_x, i <= a の範囲の φ(x, i) をまとめて篩い上げる。遅延かつ単調:
    /// すでに構築済みの行は再利用し、max_a_cached を a まで引き上げる。
    fn init_cache(&mut self, a: i64) {
        debug_assert!(a > phi_tiny::MAX_A && a <= self.max_a);

        if self.rows.is_empty() {
            self.rows = vec![Vec::new(); (self.max_a + 1) as usize];
            // 行 3 は「2・3・5 を除いた残り」= エンコーディング上の全ビット
            self.rows[3] = vec![
                CacheLine {
                    count: 0,
                    bits: !0u64,
                };
                self.max_x_size as usize
            ];
            self.max_a_cached = 3;
        }

        let start = self.max_a_cached + 1;
        debug_assert!(a >= start);
        self.max_a_cached = a;

        for i in start..=a {
            // φ(x, i) の初期値は φ(x, i-1)。a <= 6 の行はキャッシュとして
            // 参照されることがないため move で済ませる
            if i - 1 <= phi_tiny::MAX_A {
                self.rows[i as usize] = std::mem::take(&mut self.rows[(i - 1) as usize]);
            } else {
                let prev = self.rows[(i - 1) as usize].clone();
                self.rows[i as usize] = prev;
            }

            // primes[i] とその倍数を消す。偶数倍は表に存在しないので
            // 2p 刻みの奇数倍だけ辿り、3・5 の倍数は unset_bit が無操作で吸収する
            let prime = self.primes[i as usize].as_i64() as u64;
            let row = &mut self.rows[i as usize];
            if prime <= self.max_x {
                row[(prime / 240) as usize].bits &= UNSET_BIT[(prime % 240) as usize];
            }
            let mut n = prime * prime;
            while n <= self.max_x {
                row[(n / 240) as usize].bits &= UNSET_BIT[(n % 240) as usize];
                n += prime * 2;
            }

            if i > phi_tiny::MAX_A {
                // rows[i][k].count = k*240 未満の残存個数（前置和）
                let mut count = 0u64;
                for line in row.iter_mut() {
                    line.count = count as u32;
                    count += line.bits.count_ones() as u64;
                }
            }
        }
    }
}

/// phi[i] = φ(x, i-1)（1 <= i <= a）となる長さ a+1 のベクトルを返す。phi[0] = 0。
///
/// S2 ドライバが各チャンクの先頭で φ の前置値を初期化するのに使う。
pub fn phi_vector<P: PrimeInt>(x: i64, a: i64, primes: &[P], pi: &PiTable) -> Vec<i64> {
    let size = (a + 1) as usize;
    let mut phi = vec![0i64; size];

    if size > 1 {
        let mut a = a;
        if primes[a as usize].as_i64() > x {
            // この分岐では x < primes[a] <= π 表の上限が保証される
            a = pi.pi(x);
        }

        phi[1] = x;
        let sqrtx = isqrt(x);
        let mut cache = PhiCache::new(x, a, primes, pi);

        let mut i = 2i64;
        // 2 <= i <= π(√x) + 1
        while i <= a && primes[(i - 1) as usize].as_i64() <= sqrtx {
            let xp = x / primes[(i - 1) as usize].as_i64();
            phi[i as usize] = phi[(i - 1) as usize] + cache.phi(xp, i - 2, -1);
            i += 1;
        }
        // π(√x) + 1 < i <= a
        while i <= a {
            phi[i as usize] = phi[(i - 1) as usize] - (x > 0) as i64;
            i += 1;
        }
        // a < i < size
        for j in (a + 1).max(1) as usize..size {
            phi[j] = (x > 0) as i64;
        }
    }

    phi
}

/// φ(x, a) を単体で計算する。primes[i] <= √x の項だけ再帰が必要で、
/// その区間を rayon で並列化する（ワーカーごとに独立した PhiCache を持つ）。
///
/// 結果は整数加算の可換性によりスレッド数に依らず一致する。
pub fn phi(x: i64, a: i64) -> PrimeResult<i64> {
    if x < 0 {
        return Err(CountError::InvalidArgument(format!(
            "phi: x={x} must be >= 0"
        )));
    }
    if x < 1 {
        return Ok(0);
    }
    if a < 1 {
        return Ok(x);
    }
    if is_phi_tiny(a) {
        return Ok(phi_tiny(x, a));
    }

    let primes = generate_n_primes::<i64>((a + 1) as usize);
    if primes[a as usize] >= x {
        return Ok(1);
    }

    let sqrtx = isqrt(x);
    let pi = PiTable::new(sqrtx.max(primes[(a + 1) as usize]));
    let c = get_c(sqrtx);
    debug_assert!(c <= a);

    let mut i = c + 1;
    while i <= a && primes[i as usize] <= sqrtx {
        i += 1;
    }

    let sum: i64 = (c + 1..i)
        .into_par_iter()
        .map_init(
            || PhiCache::new(x, a, &primes, &pi),
            |cache, j| cache.phi(x / primes[j as usize], j - 1, -1),
        )
        .sum();

    // primes[i] > √x の残りの項は全て φ(x / primes[i], i - 1) = 1
    Ok(phi_tiny(x, c) + sum - (a + 1 - i))
}
