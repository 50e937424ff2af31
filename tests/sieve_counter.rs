use sosu_keisu::bit_sieve240::{MOD30_PATTERN, MOD30_TO_INDEX, UNSET_BIT, UNSET_LARGER, UNSET_SMALLER};
use sosu_keisu::sieve::{popcnt_words, popcnt_words_scalar, Sieve};
use sosu_keisu::sieve_math::generate_primes;

/// n がホイールエンコーディング上で残り得る値か
/// （2・3・5 と primes[4..=c] のどれでも割り切れないか）。
fn survives(n: u64, primes: &[i64], c: usize) -> bool {
    if MOD30_TO_INDEX[(n % 30) as usize] == 255 {
        return false;
    }
    (4..=c).all(|i| n % primes[i] as u64 != 0)
}

/// 3 つのマスク表が同じビット順序を共有していることを確認する。
#[test]
fn mask_tables_share_one_bit_ordering() {
    for r in 0..240usize {
        let idx = MOD30_TO_INDEX[r % 30];
        if idx == 255 {
            // 候補でない剰余: unset_bit は無操作
            assert_eq!(UNSET_BIT[r], !0u64, "unset_bit[{r}]");
            continue;
        }
        let pos = (r / 30) * 8 + idx as usize;
        assert_eq!(MOD30_PATTERN[idx as usize], (r % 30) as u64);
        assert_eq!(UNSET_BIT[r], !(1u64 << pos), "unset_bit[{r}]");
        // r 自身のビットは smaller / larger の両マスクに残る
        assert_eq!(UNSET_SMALLER[r] & UNSET_LARGER[r], 1u64 << pos, "masks at {r}");
    }
    // 全候補を残すマスクは全ビット 1
    assert_eq!(UNSET_SMALLER[0], !0u64);
    assert_eq!(UNSET_LARGER[239], !0u64);
}

/// pre_sieve 後の立っているビットが期待集合と一致する（セグメント位置・
/// サイズ・c を変えて確認）。
#[test]
fn pre_sieve_marks_exactly_the_surviving_positions() {
    let primes = generate_primes::<i64>(1_000);

    for &(low, size, c) in &[
        (0u64, 1_200u64, 6usize),
        (240, 480, 4),
        (2_400, 960, 8),
        (0, 240, 3),
        (7_200, 2_160, 6),
    ] {
        let mut sieve = Sieve::new(low, size, c + 1);
        let high = low + size;
        sieve.pre_sieve(&primes, c, low, high).expect("pre_sieve failed");

        for n in low..high {
            let expected = survives(n, &primes, c);
            let got = sieve.count_range(n - low, n - low) == 1;
            assert_eq!(got, expected, "bit for {n} (low={low}, c={c})");
        }
    }
}

/// wheel の状態がセグメントをまたいで正しく引き継がれることを確認する。
#[test]
fn wheel_state_carries_across_segments() {
    let primes = generate_primes::<i64>(1_000);
    let c = 6usize;
    let size = 480u64;
    let mut sieve = Sieve::new(0, size, 12);

    for seg in 0..4u64 {
        let (low, high) = (seg * size, (seg + 1) * size);
        sieve.pre_sieve(&primes, c, low, high).expect("pre_sieve failed");
        // 17 と 19（primes[7], primes[8]）も数えながら消す
        sieve.cross_off_count(17, 7);
        sieve.cross_off_count(19, 8);

        for n in low..high {
            let expected = survives(n, &primes, 8);
            let got = sieve.count_range(n - low, n - low) == 1;
            assert_eq!(got, expected, "bit for {n} in segment {seg}");
        }
    }
}

/// 単調な count(stop) が count_range(0, stop) と常に一致する。
#[test]
fn stateful_count_matches_count_range() {
    let primes = generate_primes::<i64>(1_000);
    let size = 4_800u64;
    let mut sieve = Sieve::new(0, size, 10);
    sieve.pre_sieve(&primes, 6, 0, size).expect("pre_sieve failed");

    let stops = [0u64, 1, 7, 100, 101, 240, 777, 1_199, 1_200, 2_399, 3_000, 4_799];
    for &s in &stops {
        let got = sieve.count(s);
        assert_eq!(got, sieve.count_range(0, s), "count({s})");
    }

    // 消し込み後もカーソルはリセットされ、同じ性質が保たれる
    sieve.cross_off_count(17, 7);
    for &s in &stops {
        let got = sieve.count(s);
        assert_eq!(got, sieve.count_range(0, s), "count({s}) after cross_off");
    }
}

/// total_count が「消えたビット数」と厳密に一致する（重複打ちは数えない）。
#[test]
fn total_count_tracks_removed_bits() {
    let primes = generate_primes::<i64>(1_000);
    let size = 4_800u64;
    let mut sieve = Sieve::new(0, size, 16);
    sieve.pre_sieve(&primes, 6, 0, size).expect("pre_sieve failed");

    let initial = sieve.count_range(0, size - 1);
    let mut removed_sum = 0u64;
    // 17·19 = 323 は両方の消し込みに現れるが、2 回目は数えられない
    for (i, p) in [(7usize, 17u64), (8, 19), (9, 23), (10, 29)] {
        removed_sum += sieve.cross_off_count(p, i);
    }
    let current = sieve.count_range(0, size - 1);

    assert_eq!(sieve.total_count(), initial - current);
    assert_eq!(removed_sum, initial - current);
}

/// 展開版 popcount がスカラ版と全入力で一致する。
#[test]
fn unrolled_popcount_matches_scalar() {
    // 依存を増やさないための決定的な xorshift
    let mut state = 0x9E37_79B9_7F4A_7C15u64;
    let mut next = move || {
        state ^= state << 13;
        state ^= state >> 7;
        state ^= state << 17;
        state
    };

    for len in [0usize, 1, 2, 7, 8, 9, 15, 16, 17, 63, 64, 65, 100, 256] {
        let words: Vec<u64> = (0..len).map(|_| next()).collect();
        assert_eq!(
            popcnt_words(&words),
            popcnt_words_scalar(&words),
            "popcount mismatch at len={len}"
        );
    }

    // 全 0 / 全 1 の端
    assert_eq!(popcnt_words(&vec![0u64; 33]), 0);
    assert_eq!(popcnt_words(&vec![!0u64; 33]), 33 * 64);
}

/// get_segment_size は 240 の倍数へ切り上げる。
#[test]
fn segment_size_is_rounded_to_240() {
    assert_eq!(Sieve::get_segment_size(0), 240);
    assert_eq!(Sieve::get_segment_size(1), 240);
    assert_eq!(Sieve::get_segment_size(240), 240);
    assert_eq!(Sieve::get_segment_size(241), 480);
    assert_eq!(Sieve::get_segment_size(1_000), 1_200);
}
