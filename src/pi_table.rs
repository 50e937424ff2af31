use bitvec::prelude::*;

use crate::bit_sieve240::{MOD30_TO_INDEX, UNSET_LARGER};
use crate::sieve_math::integer_sqrt;

/// π(n) のコンパクトな参照表。
///
/// 2・3・5 と互いに素な整数 1 個につき 1 ビットを持ち、240 個（u64 1 ワード）
/// ごとに累積素数個数を併置する。問い合わせは
/// `counts[n/240] + popcnt(bits[n/240] & unset_larger[n%240])` に
/// 表へ載らない 2, 3, 5 の 3 個を足すだけの O(1)。
///
/// 範囲外の問い合わせは呼び出し側のバグであり、debug ビルドでのみ検査する。
pub struct PiTable {
    counts: Vec<u64>,
    bits: Vec<u64>,
    limit: i64,
}

/// π(0) 〜 π(6)。
const SMALL_PI: [i64; 7] = [0, 0, 1, 2, 2, 3, 3];

impl PiTable {
    pub fn new(limit: i64) -> PiTable {
        let limit = limit.max(0);
        let words = (limit as u64 / 240 + 1) as usize;
        let mut bits = vec![0u64; words];

        // 通常の篩で素数を求め、7 以上の素数だけをビット表へ写す
        let size = (limit + 1).max(2) as usize;
        let mut is_prime = bitvec![1; size];
        is_prime.set(0, false);
        is_prime.set(1, false);
        let lim_sqrt = integer_sqrt(limit as u64) as usize;
        for i in 2..=lim_sqrt {
            if is_prime[i] {
                let mut j = i * i;
                while j < size {
                    is_prime.set(j, false);
                    j += i;
                }
            }
        }

        for p in 7..size {
            if is_prime[p] {
                let idx = MOD30_TO_INDEX[p % 30];
                debug_assert!(idx != 255, "prime {p} not on the mod 30 wheel");
                bits[p / 240] |= 1u64 << ((p % 240) / 30 * 8 + idx as usize);
            }
        }

        let mut counts = vec![0u64; words];
        let mut total = 0u64;
        for (i, &w) in bits.iter().enumerate() {
            counts[i] = total;
            total += w.count_ones() as u64;
        }

        PiTable {
            counts,
            bits,
            limit,
        }
    }

    #[inline]
    pub fn limit(&self) -> i64 {
        self.limit
    }

    /// π(x)。`0 <= x <= limit` が呼び出し側の契約。
    #[inline]
    pub fn pi(&self, x: i64) -> i64 {
        debug_assert!(
            (0..=self.limit).contains(&x),
            "PiTable query out of range: x={x}, limit={}",
            self.limit
        );
        if x < 7 {
            return SMALL_PI[x.clamp(0, 6) as usize];
        }
        let n = x as u64;
        let q = (n / 240) as usize;
        let r = (n % 240) as usize;
        3 + self.counts[q] as i64 + (self.bits[q] & UNSET_LARGER[r]).count_ones() as i64
    }
}
