// mod 240 ホイールのビットマスクテーブル。
//
// 2・3・5 と互いに素な整数は 30 個ごとに 8 個の剰余 {1,7,11,13,17,19,23,29}
// に現れる。1 バイトで 30 個、u64 1 ワードで 240 個の整数を表し、
// 剰余 r (mod 240) のビット位置は (r/30)*8 + index8(r mod 30)。
// この並びは篩のバイトレイアウトと 3 つのマスク表すべてで共通の契約。

/// mod 30 ホイールの候補パターン（ビット順）。
pub const MOD30_PATTERN: [u64; 8] = [1, 7, 11, 13, 17, 19, 23, 29];

/// mod 30 での余りからビット位置へのマッピング。候補でない数は 255。
pub const MOD30_TO_INDEX: [u8; 30] = [
    255, 0, 255, 255, 255, 255, 255, 1, // 0-7
    255, 255, 255, 2, 255, 3, 255, 255, // 8-15
    255, 4, 255, 5, 255, 255, 255, 6, // 16-23
    255, 255, 255, 255, 255, 7, // 24-29
];

/// 候補剰余 i 番目から次の候補剰余までの距離（29 の次は 31 ≡ 1）。
pub const WHEEL_DIST: [u64; 8] = [6, 4, 2, 4, 2, 4, 6, 2];

const fn build_unset_bit() -> [u64; 240] {
    let mut table = [!0u64; 240];
    let mut r = 0;
    while r < 240 {
        let idx = MOD30_TO_INDEX[r % 30];
        if idx != 255 {
            let pos = (r / 30) * 8 + idx as usize;
            table[r] = !(1u64 << pos);
        }
        r += 1;
    }
    table
}

const fn build_unset_smaller() -> [u64; 240] {
    let mut table = [0u64; 240];
    let mut r = 0;
    while r < 240 {
        let mut mask = 0u64;
        let mut s = r;
        while s < 240 {
            let idx = MOD30_TO_INDEX[s % 30];
            if idx != 255 {
                mask |= 1u64 << ((s / 30) * 8 + idx as usize);
            }
            s += 1;
        }
        table[r] = mask;
        r += 1;
    }
    table
}

const fn build_unset_larger() -> [u64; 240] {
    let mut table = [0u64; 240];
    let mut r = 0;
    while r < 240 {
        let mut mask = 0u64;
        let mut s = 0;
        while s <= r {
            let idx = MOD30_TO_INDEX[s % 30];
            if idx != 255 {
                mask |= 1u64 << ((s / 30) * 8 + idx as usize);
            }
            s += 1;
        }
        table[r] = mask;
        r += 1;
    }
    table
}

/// 剰余 r のビットだけを落とすマスク。候補でない r では全ビット 1（無操作）。
pub const UNSET_BIT: [u64; 240] = build_unset_bit();

/// 剰余 r より小さい候補のビットを全て落とすマスク（r 自身は残る）。
pub const UNSET_SMALLER: [u64; 240] = build_unset_smaller();

/// 剰余 r より大きい候補のビットを全て落とすマスク（r 自身は残る）。
pub const UNSET_LARGER: [u64; 240] = build_unset_larger();

/// 剰余 r (mod 30) が次の候補剰余に到達するまでの距離と、その候補のビット位置。
///
/// 篩の wheel エントリ初期化（`Sieve::add`）で、商を 2・3・5 と互いに素な
/// 値まで進めるのに使う。
pub const fn next_wheel(r: u64) -> (u64, u32) {
    let mut d = 0u64;
    loop {
        let idx = MOD30_TO_INDEX[((r + d) % 30) as usize];
        if idx != 255 {
            return (d, idx as u32);
        }
        d += 1;
    }
}

const fn build_next_wheel() -> [(u64, u32); 30] {
    let mut table = [(0u64, 0u32); 30];
    let mut r = 0;
    while r < 30 {
        table[r] = next_wheel(r as u64);
        r += 1;
    }
    table
}

/// `next_wheel` の 30 エントリ展開表。
pub const NEXT_WHEEL: [(u64, u32); 30] = build_next_wheel();
