use std::sync::LazyLock;

// φ(x, a)（x 以下で最初の a 個の素数と互いに素な数の個数）の a <= 6 閉形式。
//
// φ(x, a) は prime_products[a] = Π primes_tiny[1..=a] を周期として周期的に増え、
// 1 周期あたり totients[a] 個。よって
//   φ(x, a) = (x / prime_products[a]) * totients[a] + phi_cache[a][x mod prime_products[a]]
// が O(1) で成り立つ。

pub const MAX_A: i64 = 6;

const PRIMES_TINY: [i64; 7] = [0, 2, 3, 5, 7, 11, 13];

/// prime_products[a] = Π_{i=1..a} primes_tiny[i]
const PRIME_PRODUCTS: [i64; 7] = [1, 2, 6, 30, 210, 2310, 30030];

/// totients[a] = Π_{i=1..a} (primes_tiny[i] - 1)
const TOTIENTS: [i64; 7] = [1, 1, 2, 8, 48, 480, 5760];

struct PhiTiny {
    cache: [Vec<i16>; 7],
}

impl PhiTiny {
    fn new() -> PhiTiny {
        let mut cache: [Vec<i16>; 7] = Default::default();
        cache[0] = vec![0];

        for a in 1..=MAX_A as usize {
            let pp = PRIME_PRODUCTS[a];
            let mut row = Vec::with_capacity(pp as usize);
            for x in 0..pp {
                let v = Self::phi_with(&cache, x, a - 1)
                    - Self::phi_with(&cache, x / PRIMES_TINY[a], a - 1);
                row.push(v as i16);
            }
            cache[a] = row;
        }

        PhiTiny { cache }
    }

    fn phi_with(cache: &[Vec<i16>; 7], x: i64, a: usize) -> i64 {
        if a == 0 {
            x
        } else {
            (x / PRIME_PRODUCTS[a]) * TOTIENTS[a]
                + cache[a][(x % PRIME_PRODUCTS[a]) as usize] as i64
        }
    }

    #[inline]
    fn phi(&self, x: i64, a: i64) -> i64 {
        Self::phi_with(&self.cache, x, a as usize)
    }
}

static PHI_TINY: LazyLock<PhiTiny> = LazyLock::new(PhiTiny::new);

/// φ(x, a)。`0 <= a <= 6` と `x >= 0` が呼び出し側の契約。
#[inline]
pub fn phi_tiny(x: i64, a: i64) -> i64 {
    debug_assert!((0..=MAX_A).contains(&a), "phi_tiny: a={a} out of range");
    debug_assert!(x >= 0, "phi_tiny: x={x} must be non-negative");
    PHI_TINY.phi(x, a)
}

#[inline]
pub fn is_phi_tiny(a: i64) -> bool {
    a <= MAX_A
}

/// y 以下に収まる primes_tiny の個数（最大 6）。
/// LMO 系アルゴリズムの事前篩パラメータ c の既定値。
pub fn get_c(y: i64) -> i64 {
    if y >= 13 {
        MAX_A
    } else {
        PRIMES_TINY[1..].iter().filter(|&&p| p <= y).count() as i64
    }
}
