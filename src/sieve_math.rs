use bitvec::prelude::*;

// 整数演算ヘルパーと小規模な素数表・数論テーブルの生成。
// ここにあるのは補助的な前処理だけで、ホットな篩本体は `sieve.rs` 側にある。

/// `n` 以下の最大の整数平方根を 2 分探索で求める。
pub fn integer_sqrt(n: u64) -> u64 {
    let mut low = 0u64;
    let mut high = n;
    while low <= high {
        let mid = (low + high) >> 1;
        match mid.checked_mul(mid) {
            Some(val) if val == n => return mid,
            Some(val) if val < n => low = mid + 1,
            _ => {
                if mid == 0 {
                    return 0;
                }
                high = mid - 1;
            }
        }
    }
    high
}

/// `integer_sqrt` の i64 版。負値は 0 として扱う。
#[inline]
pub fn isqrt(n: i64) -> i64 {
    if n <= 0 {
        0
    } else {
        integer_sqrt(n as u64) as i64
    }
}

/// `n` 以下の最大の整数立方根。
pub fn iroot3(n: i64) -> i64 {
    if n <= 0 {
        return 0;
    }
    let n = n as u64;
    let mut low = 0u64;
    let mut high = 2_642_246u64.min(n); // 2642246^3 > u64::MAX / 4 の手前
    while low <= high {
        let mid = (low + high) >> 1;
        match mid.checked_mul(mid).and_then(|m| m.checked_mul(mid)) {
            Some(val) if val == n => return mid as i64,
            Some(val) if val < n => low = mid + 1,
            _ => {
                if mid == 0 {
                    return 0;
                }
                high = mid - 1;
            }
        }
    }
    high as i64
}

/// `n` 以下の最大の整数 6 乗根。floor(x^(1/6)) = floor(sqrt(floor(cbrt(x)))) を利用。
#[inline]
pub fn iroot6(n: i64) -> i64 {
    isqrt(iroot3(n))
}

/// 自然対数の床（整数）。サイズ見積もりのヒューリスティック専用。
#[inline]
pub fn ilog(n: i64) -> i64 {
    if n <= 1 {
        0
    } else {
        (n as f64).ln() as i64
    }
}

/// 切り上げ除算。
#[inline]
pub fn ceil_div(a: u64, b: u64) -> u64 {
    a.div_ceil(b)
}

/// 素数表の要素型。y が 32bit に収まる場合は `u32` 格納でメモリを半減できるため、
/// 表を使う側（φ 再帰・S2 ドライバ）はこのトレイトで単相化する。
pub trait PrimeInt: Copy + Send + Sync {
    fn from_u64(v: u64) -> Self;
    fn as_i64(self) -> i64;
}

impl PrimeInt for u32 {
    #[inline]
    fn from_u64(v: u64) -> Self {
        v as u32
    }
    #[inline]
    fn as_i64(self) -> i64 {
        self as i64
    }
}

impl PrimeInt for i64 {
    #[inline]
    fn from_u64(v: u64) -> Self {
        v as i64
    }
    #[inline]
    fn as_i64(self) -> i64 {
        self
    }
}

/// 単純なエラトステネスの篩で `[2, limit]` の素数を列挙する。
pub fn simple_sieve(limit: u64) -> Vec<u64> {
    if limit < 2 {
        return Vec::new();
    }

    let size = (limit + 1) as usize;
    let mut is_prime = bitvec![1; size];
    is_prime.set(0, false);
    is_prime.set(1, false);

    let lim_sqrt = integer_sqrt(limit) as usize;
    for i in 2..=lim_sqrt {
        if is_prime[i] {
            let mut j = i * i;
            while j < size {
                is_prime.set(j, false);
                j += i;
            }
        }
    }

    let mut primes = Vec::new();
    for (i, bit) in is_prime.iter().by_vals().enumerate() {
        if bit {
            primes.push(i as u64);
        }
    }
    primes
}

/// `limit` 以下の素数を 1 始まりの表として生成する。
///
/// 添字 0 は番兵 0 で、`primes[i]` が i 番目の素数（primes[1] = 2）。
pub fn generate_primes<P: PrimeInt>(limit: i64) -> Vec<P> {
    let mut primes = vec![P::from_u64(0)];
    if limit >= 2 {
        primes.extend(simple_sieve(limit as u64).into_iter().map(P::from_u64));
    }
    primes
}

/// 先頭から n 個の素数を 1 始まりの表として生成する。
pub fn generate_n_primes<P: PrimeInt>(n: usize) -> Vec<P> {
    if n == 0 {
        return vec![P::from_u64(0)];
    }

    // p_n < n (ln n + ln ln n) （n >= 6）。小さい n は固定の余裕で吸収する。
    let nf = n as f64;
    let mut bound = 64u64.max((nf * (nf.ln() + nf.ln().ln().max(0.0))) as u64 + 16);

    loop {
        let sieved = simple_sieve(bound);
        if sieved.len() >= n {
            let mut primes = vec![P::from_u64(0)];
            primes.extend(sieved.into_iter().take(n).map(P::from_u64));
            return primes;
        }
        bound *= 2;
    }
}

/// メビウス関数 μ(n) の表を `[0, limit]` で生成する。
pub fn generate_moebius(limit: i64) -> Vec<i32> {
    let size = (limit.max(0) + 1) as usize;
    let mut mu = vec![1i32; size];
    if size > 0 {
        mu[0] = 0;
    }

    // 符号の反転と平方因子の消去を素数ごとに行う
    let mut is_prime = bitvec![1; size.max(2)];
    for p in 2..size {
        if is_prime[p] {
            let mut m = 2 * p;
            while m < size {
                is_prime.set(m, false);
                m += p;
            }
            let mut m = p;
            while m < size {
                mu[m] = -mu[m];
                m += p;
            }
            if let Some(p2) = p.checked_mul(p) {
                let mut m = p2;
                while m < size {
                    mu[m] = 0;
                    m += p2;
                }
            }
        }
    }

    mu
}

/// 最小素因数 lpf(n) の表を `[0, limit]` で生成する。
///
/// lpf[1] は番兵として i64::MAX を入れ、「prime < lpf[m]」の判定が
/// m = 1 でも常に成り立つようにする。
pub fn generate_lpf(limit: i64) -> Vec<i64> {
    let size = (limit.max(0) + 1) as usize;
    let mut lpf = vec![0i64; size];
    if size > 1 {
        lpf[1] = i64::MAX;
    }

    for p in 2..size {
        if lpf[p] == 0 {
            let mut m = p;
            while m < size {
                if lpf[m] == 0 {
                    lpf[m] = p as i64;
                }
                m += p;
            }
        }
    }

    lpf
}
