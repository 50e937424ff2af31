use sosu_keisu::pi;
use sosu_keisu::pi_lmo::{pi_lmo, pi_lmo_alpha};
use sosu_keisu::pi_meissel::{pi_legendre, pi_lehmer, pi_meissel};
use sosu_keisu::sieve_math::iroot6;

/// 小さい x に対して、既知の π(x) の値と一致することを確認する。
#[test]
fn prime_pi_small_values_match_known_results() {
    // 出典: 標準的な素数表 / OEIS A006880 など
    let cases: &[(i64, i64)] = &[
        (0, 0),
        (1, 0),
        (2, 1),
        (3, 2),
        (10, 4),
        (100, 25),
        (1_000, 168),
        (10_000, 1_229),
        (100_000, 9_592),
        (1_000_000, 78_498),
        (10_000_000, 664_579),
    ];

    for &(x, expected) in cases {
        let pi_x = pi(x).expect("pi failed");
        assert_eq!(pi_x, expected, "pi({x}) should be {expected}, got {pi_x}");
    }
}

/// 素朴なエラトステネスの篩実装と比較し、ある程度の範囲で一致することを確認する。
#[test]
fn prime_pi_matches_naive_sieve_up_to_1e6() {
    let test_points: &[i64] = &[10, 100, 1_000, 9_999, 10_000, 10_001, 65_537, 1_000_000];

    for &x in test_points {
        let expected = prime_pi_naive(x as usize) as i64;
        let pi_x = pi(x).expect("pi failed");
        assert_eq!(pi_x, expected, "pi({x}) should equal naive sieve result");
    }
}

/// LMO 本体を（小さい x の篩迂回なしに）直接検証する。
#[test]
fn pi_lmo_matches_naive_for_small_x() {
    let test_points: &[i64] = &[
        2, 3, 4, 7, 8, 9, 25, 27, 100, 169, 1_000, 4_096, 9_973, 10_000, 65_536, 100_000,
    ];

    for &x in test_points {
        let expected = prime_pi_naive(x as usize) as i64;
        let pi_x = pi_lmo(x, 2).expect("pi_lmo failed");
        assert_eq!(pi_x, expected, "pi_lmo({x}) should equal naive sieve result");
    }
}

/// α を振っても結果が変わらないこと（配列サイズと境界の検証）。
#[test]
fn pi_lmo_alpha_sweep_is_stable() {
    let test_points: &[i64] = &[100, 317, 1_000, 123_456, 1_000_003];

    for &x in test_points {
        let expected = prime_pi_naive(x as usize) as i64;
        for alpha in 1..=iroot6(x).min(8) {
            let pi_x = pi_lmo_alpha(x, 2, Some(alpha as f64)).expect("pi_lmo failed");
            assert_eq!(pi_x, expected, "pi_lmo({x}) with alpha={alpha}");
        }
    }
}

/// Legendre / Meissel / Lehmer / LMO の 4 法が一致することを確認する。
#[test]
fn classic_formulas_and_lmo_agree() {
    let test_points: &[i64] = &[10_000, 100_000, 777_777, 1_000_000, 5_000_000];

    for &x in test_points {
        let legendre = pi_legendre(x).expect("pi_legendre failed");
        let meissel = pi_meissel(x).expect("pi_meissel failed");
        let lehmer = pi_lehmer(x).expect("pi_lehmer failed");
        let lmo = pi_lmo(x, 4).expect("pi_lmo failed");
        assert_eq!(legendre, meissel, "pi_legendre({x}) != pi_meissel({x})");
        assert_eq!(meissel, lehmer, "pi_meissel({x}) != pi_lehmer({x})");
        assert_eq!(lehmer, lmo, "pi_lehmer({x}) != pi_lmo({x})");
    }
}

/// 分割篩・φ キャッシュ・ロードバランサの 3 部品を通しで使う代表値。
#[test]
fn prime_pi_1e10_matches_reference() {
    let x = 10_000_000_000_i64;
    let expected = 455_052_511_i64;
    let pi_x = pi(x).expect("pi failed");
    assert_eq!(pi_x, expected, "pi({x}) should match known reference value");
}

/// 実行時間が比較的長くなるため、デフォルトでは無視しておき、
/// 必要なときに `cargo test -- --ignored` で明示的に回す想定。
#[test]
#[ignore]
fn prime_pi_1e11_matches_reference() {
    let x = 100_000_000_000_i64;
    let expected = 4_118_054_813_i64;
    let pi_x = pi(x).expect("pi failed");
    assert_eq!(pi_x, expected, "pi({x}) should match known reference value");
}

/// 負の x は InvalidArgument、2^62 超は PrecisionExceeded を返す。
#[test]
fn out_of_domain_inputs_are_rejected() {
    assert!(pi(-1).is_err());
    assert!(pi_lmo(-5, 1).is_err());
    assert!(pi_lmo((1 << 62) + 1, 1).is_err());
}

/// 単純なエラトステネスの篩による π(x) 実装（テスト専用）。
fn prime_pi_naive(limit: usize) -> usize {
    if limit < 2 {
        return 0;
    }

    let mut is_prime = vec![true; limit + 1];
    is_prime[0] = false;
    is_prime[1] = false;

    let mut p = 2usize;
    while p * p <= limit {
        if is_prime[p] {
            let mut multiple = p * p;
            while multiple <= limit {
                is_prime[multiple] = false;
                multiple += p;
            }
        }
        p += 1;
    }

    is_prime.iter().take(limit + 1).filter(|&&b| b).count()
}
