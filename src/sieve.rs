use crate::bit_sieve240::{NEXT_WHEEL, UNSET_BIT, UNSET_LARGER, UNSET_SMALLER, WHEEL_DIST};
use crate::engine_types::{CountError, PrimeResult};
use crate::sieve_math::{ceil_div, integer_sqrt, PrimeInt};

/// ハードリーフ計算用の分割篩。
///
/// 30 個の整数を 1 バイト（240 個を u64 1 ワード）に詰めたエラトステネスの
/// 篩で、普通の素数篩と違い「素数そのもの」も倍数と一緒に消していく。
/// 同時に、任意の接頭辞に残っている未篩要素の個数を償却 O(1) で答えるための
/// ブロック別 counter と単調カーソル（`count`）を保持する。
///
/// 位置はすべてセグメント先頭からのオフセットで扱う（オフセット 0 が `low`、
/// `low` は 240 の倍数であること）。
pub struct Sieve {
    words: Vec<u64>,
    start: u64,
    span: u64,
    total_count: u64,
    prev_stop: u64,
    count: u64,
    wheel: Vec<WheelEntry>,
    counter: Counter,
}

/// 素数 1 個分の「次に消す倍数」。オフセットとホイール位置の組で、
/// セグメントをまたいで引き継がれる。
#[derive(Clone, Copy)]
struct WheelEntry {
    /// セグメント先頭からのオフセット。
    multiple: u64,
    /// 倍数の商の mod 30 ホイール位置（0..8）。
    index: u32,
}

/// ブロック別未篩個数とその走査カーソル。
///
/// 不変条件: sum = Σ_{k<i} counts[k]、stop = (i + 1) · dist。
struct Counter {
    stop: u64,
    dist: u64,
    sum: u64,
    i: usize,
    counts: Vec<u32>,
}

impl Sieve {
    /// `segment_size` は `get_segment_size` で 240 の倍数に正規化される。
    /// `low` は 240 の倍数であること。`wheel_size` は消し込みに使う素数の
    /// 個数の見込みで、容量の予約にだけ使う。
    pub fn new(low: u64, segment_size: u64, wheel_size: usize) -> Sieve {
        debug_assert!(low % 240 == 0, "low={low} must be a multiple of 240");
        let segment_size = Self::get_segment_size(segment_size);

        // counter のブロック幅: √segment_size 以上の最小の 2 冪を
        // 240 の倍数に切り上げたもの
        let dist = ceil_div(integer_sqrt(segment_size).next_power_of_two(), 240) * 240;
        let blocks = ceil_div(segment_size, dist) as usize;

        let mut wheel = Vec::with_capacity(wheel_size + 1);
        // 添字 0..=3（番兵と 2, 3, 5）は使わない
        wheel.resize(4, WheelEntry { multiple: 0, index: 0 });

        Sieve {
            words: vec![0; (segment_size / 240) as usize],
            start: low,
            span: 0,
            total_count: 0,
            prev_stop: 0,
            count: 0,
            wheel,
            counter: Counter {
                stop: dist,
                dist,
                sum: 0,
                i: 0,
                counts: vec![0; blocks],
            },
        }
    }

    /// n 以上で最小の有効なセグメントサイズ（240 の倍数、最低 240）。
    pub fn get_segment_size(n: u64) -> u64 {
        ceil_div(n.max(240), 240) * 240
    }

    #[inline]
    pub fn segment_size(&self) -> u64 {
        self.words.len() as u64 * 240
    }

    /// `cross_off_count` でこれまでに消した要素の累計。構築からの通算で、
    /// セグメントを進めてもリセットされない（単調非減少）。
    #[inline]
    pub fn total_count(&self) -> u64 {
        self.total_count
    }

    /// セグメント [low, high) を篩い直す: 全ビットを立て、primes[4..=c] の
    /// 倍数を消し（total_count は更新しない）、counter を初期化する。
    ///
    /// 完了後の立っているビットは、[low, high) のうち 2・3・5 と
    /// primes[4..=c] のいずれでも割り切れない整数に一致する。
    pub fn pre_sieve<P: PrimeInt>(
        &mut self,
        primes: &[P],
        c: usize,
        low: u64,
        high: u64,
    ) -> PrimeResult<()> {
        if c >= primes.len() {
            return Err(CountError::InvalidArgument(format!(
                "pre_sieve: c={c} is out of the prime table (len={})",
                primes.len()
            )));
        }

        self.reset_sieve(low, high);
        for i in 4..=c {
            self.cross_off(primes[i].as_i64() as u64, i);
        }
        self.init_counter();
        Ok(())
    }

    fn reset_sieve(&mut self, low: u64, high: u64) {
        debug_assert!(low % 240 == 0);
        debug_assert!(high > low);
        debug_assert!(high - low <= self.segment_size());

        self.start = low;
        self.span = high - low;

        let used = ceil_div(self.span, 240) as usize;
        self.words[..used].fill(!0u64);
        self.words[used..].fill(0);
        // 末尾ワードの範囲外オフセットを表すビットを落とす
        self.words[used - 1] &= UNSET_LARGER[((self.span - 1) % 240) as usize];
    }

    /// prime の倍数をこのセグメントから消す。wheel[i] の指す倍数から始めて
    /// 商のホイールを回し、セグメント末尾を越えた位置を次セグメント向けに
    /// wheel[i] へ書き戻す。total_count は更新しない。
    pub fn cross_off(&mut self, prime: u64, i: usize) {
        if i >= self.wheel.len() {
            debug_assert_eq!(i, self.wheel.len(), "wheel entries are added in order");
            self.add(prime);
        }

        let WheelEntry {
            mut multiple,
            mut index,
        } = self.wheel[i];
        let span = self.span;

        while multiple < span {
            self.words[(multiple / 240) as usize] &= UNSET_BIT[(multiple % 240) as usize];
            multiple += prime * WHEEL_DIST[index as usize];
            index = (index + 1) & 7;
        }

        self.wheel[i] = WheelEntry {
            multiple: multiple - span,
            index,
        };
    }

    /// `cross_off` と同じ消し込みを行いつつ、初めて 0 になったビット 1 個
    /// につき total_count を増やし、該当ブロックの counter を減らす。
    /// このセグメントで新たに消えた個数を返す。
    ///
    /// ビットマップが変わるので走査カーソルはリセットされる。
    pub fn cross_off_count(&mut self, prime: u64, i: usize) -> u64 {
        if i >= self.wheel.len() {
            debug_assert_eq!(i, self.wheel.len(), "wheel entries are added in order");
            self.add(prime);
        }

        let WheelEntry {
            mut multiple,
            mut index,
        } = self.wheel[i];
        let span = self.span;
        let dist = self.counter.dist;
        let mut removed = 0u64;

        while multiple < span {
            let word = &mut self.words[(multiple / 240) as usize];
            let mask = UNSET_BIT[(multiple % 240) as usize];
            if *word & !mask != 0 {
                *word &= mask;
                removed += 1;
                self.counter.counts[(multiple / dist) as usize] -= 1;
            }
            multiple += prime * WHEEL_DIST[index as usize];
            index = (index + 1) & 7;
        }

        self.wheel[i] = WheelEntry {
            multiple: multiple - span,
            index,
        };
        self.total_count += removed;
        self.reset_counter_cursor();
        removed
    }

    /// start 以上で、商が 2・3・5 と互いに素になる prime の最小の倍数を
    /// 求めて wheel に追加する。
    fn add(&mut self, prime: u64) {
        debug_assert!(prime % 2 != 0 && prime % 3 != 0 && prime % 5 != 0);
        let mut quotient = ceil_div(self.start, prime);
        let (delta, index) = NEXT_WHEEL[(quotient % 30) as usize];
        quotient += delta;
        self.wheel.push(WheelEntry {
            multiple: prime * quotient - self.start,
            index,
        });
    }

    /// ブロックごとの未篩個数を数え直し、走査カーソルをリセットする。
    fn init_counter(&mut self) {
        let dist = self.counter.dist;
        for k in 0..self.counter.counts.len() {
            let lo = k as u64 * dist;
            let cnt = if lo >= self.span {
                0
            } else {
                let hi = ((k as u64 + 1) * dist).min(self.span) - 1;
                self.count_range(lo, hi) as u32
            };
            self.counter.counts[k] = cnt;
        }
        self.reset_counter_cursor();
    }

    fn reset_counter_cursor(&mut self) {
        self.prev_stop = 0;
        self.count = 0;
        self.counter.sum = 0;
        self.counter.i = 0;
        self.counter.stop = self.counter.dist;
    }

    /// オフセット [0, stop] の未篩要素数。同一セグメント内では stop を
    /// 単調非減少で呼ぶこと（前回位置からの差分だけを数える）。
    ///
    /// stop まで丸ごと消化できるブロックは counter の加算で飛ばし、
    /// 残りの dist 未満の距離だけビットマップを数える。
    #[inline]
    pub fn count(&mut self, stop: u64) -> u64 {
        debug_assert!(stop >= self.prev_stop, "count(stop) must be monotone");
        debug_assert!(stop < self.span);

        let mut start = self.prev_stop + 1;
        self.prev_stop = stop;

        while self.counter.stop <= stop {
            start = self.counter.stop;
            self.counter.stop += self.counter.dist;
            self.counter.sum += self.counter.counts[self.counter.i] as u64;
            self.counter.i += 1;
            self.count = self.counter.sum;
        }

        self.count += self.count_range(start, stop);
        self.count
    }

    /// オフセット [start, stop]（両端含む）の未篩要素数。状態を持たない。
    #[inline]
    pub fn count_range(&self, start: u64, stop: u64) -> u64 {
        if start > stop {
            return 0;
        }
        debug_assert!(stop < self.span);

        let start_idx = (start / 240) as usize;
        let stop_idx = (stop / 240) as usize;
        let m1 = UNSET_SMALLER[(start % 240) as usize];
        let m2 = UNSET_LARGER[(stop % 240) as usize];

        if start_idx == stop_idx {
            (self.words[start_idx] & m1 & m2).count_ones() as u64
        } else {
            let mut cnt = (self.words[start_idx] & m1).count_ones() as u64
                + (self.words[stop_idx] & m2).count_ones() as u64;
            cnt += popcnt_words(&self.words[start_idx + 1..stop_idx]);
            cnt
        }
    }
}

/// 8 ワード単位で展開した popcount。x86-64 / AArch64 の双方で自動ベクトル化が
/// 効く、安定版コンパイラで使える移植可能パス。
pub fn popcnt_words(words: &[u64]) -> u64 {
    let mut chunks = words.chunks_exact(8);
    let mut cnt = 0u64;
    for c in &mut chunks {
        let sum = c[0].count_ones()
            + c[1].count_ones()
            + c[2].count_ones()
            + c[3].count_ones()
            + c[4].count_ones()
            + c[5].count_ones()
            + c[6].count_ones()
            + c[7].count_ones();
        cnt += sum as u64;
    }
    for &w in chunks.remainder() {
        cnt += w.count_ones() as u64;
    }
    cnt
}

/// 素朴な popcount。`popcnt_words` の検証用リファレンス。
pub fn popcnt_words_scalar(words: &[u64]) -> u64 {
    words.iter().map(|w| w.count_ones() as u64).sum()
}
