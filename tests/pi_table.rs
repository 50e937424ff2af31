use sosu_keisu::pi_table::PiTable;

/// 素朴な篩と全点比較する。
#[test]
fn pi_table_matches_naive_sieve() {
    let limit = 10_000usize;
    let table = PiTable::new(limit as i64);
    assert_eq!(table.limit(), limit as i64);

    let mut is_prime = vec![true; limit + 1];
    is_prime[0] = false;
    is_prime[1] = false;
    let mut p = 2;
    while p * p <= limit {
        if is_prime[p] {
            let mut m = p * p;
            while m <= limit {
                is_prime[m] = false;
                m += p;
            }
        }
        p += 1;
    }

    let mut count = 0i64;
    for n in 0..=limit {
        if is_prime[n] {
            count += 1;
        }
        assert_eq!(table.pi(n as i64), count, "pi({n})");
    }
}

/// ごく小さい上限でも壊れない。
#[test]
fn pi_table_tiny_limits() {
    for limit in 0..=7i64 {
        let table = PiTable::new(limit);
        let expected: &[i64] = &[0, 0, 1, 2, 2, 3, 3, 4];
        for n in 0..=limit {
            assert_eq!(table.pi(n), expected[n as usize], "pi({n}) with limit={limit}");
        }
    }
}

/// 240 境界の前後（ワードの継ぎ目）を重点的に確認する。
#[test]
fn pi_table_word_boundaries() {
    let table = PiTable::new(2_000);
    // 239, 240, 241 = 素数表の継ぎ目。π(239) = 52, 239 は素数
    assert_eq!(table.pi(238), 51);
    assert_eq!(table.pi(239), 52);
    assert_eq!(table.pi(240), 52);
    assert_eq!(table.pi(241), 53);
    assert_eq!(table.pi(479), 92);
    assert_eq!(table.pi(480), 92);
}
