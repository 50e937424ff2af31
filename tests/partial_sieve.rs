use sosu_keisu::p2::{p2, p3};
use sosu_keisu::s1::s1;
use sosu_keisu::sieve_math::{generate_primes, isqrt};

/// n の素因数（重複込み）がちょうど k 個で、全てが y より大きいか。
fn is_pk(mut n: i64, y: i64, k: usize) -> bool {
    let mut factors = Vec::new();
    let mut d = 2i64;
    while d * d <= n {
        while n % d == 0 {
            factors.push(d);
            n /= d;
        }
        d += 1;
    }
    if n > 1 {
        factors.push(n);
    }
    factors.len() == k && factors.iter().all(|&f| f > y)
}

fn naive_pk(x: i64, y: i64, k: usize) -> i64 {
    (2..=x).filter(|&n| is_pk(n, y, k)).count() as i64
}

/// P2 が素朴な素因数分解による数え上げと一致することを確認する。
#[test]
fn p2_matches_naive_factorization() {
    for &x in &[30i64, 100, 1_000, 20_000] {
        for &y in &[2i64, 3, 5, 10, 31, isqrt(x)] {
            let expected = naive_pk(x, y, 2);
            let got = p2(x, y).expect("p2 failed");
            assert_eq!(got, expected, "p2({x}, {y})");
        }
    }
}

/// P3 が素朴な数え上げと一致することを確認する（a >= π(x^(1/4))）。
#[test]
fn p3_matches_naive_factorization() {
    for &x in &[1_000i64, 10_000, 50_000] {
        let x14 = isqrt(isqrt(x));
        let primes = generate_primes::<i64>(x14.max(2));
        let a = primes.len() as i64 - 1; // π(x^(1/4))
        let y = primes[a as usize];

        let expected = naive_pk(x, y, 3);
        let got = p3(x, a).expect("p3 failed");
        assert_eq!(got, expected, "p3({x}, {a})");
    }
}

/// S1 が定義どおりの直接和と一致することを確認する。
#[test]
fn s1_matches_direct_sum() {
    let x = 10_000i64;
    let y = 30i64;
    let c = 3i64;
    let primes = generate_primes::<i64>(y);

    // Σ μ(n) φ(x/n, c): n は平方因子なし、素因数は全て primes[c] より大きい
    let mut expected = 0i64;
    for n in 1..=y {
        let (mu, lpf) = mu_lpf(n);
        if mu != 0 && (n == 1 || lpf > 5) {
            expected += mu * naive_phi(x / n, &[2, 3, 5]);
        }
    }

    let got = s1(x, y, c, &primes).expect("s1 failed");
    assert_eq!(got, expected);
}

/// (μ(n), lpf(n)) を素朴に求める。
fn mu_lpf(mut n: i64) -> (i64, i64) {
    let mut mu = 1i64;
    let mut lpf = i64::MAX;
    let mut d = 2i64;
    while d * d <= n {
        if n % d == 0 {
            n /= d;
            if n % d == 0 {
                return (0, d.min(lpf));
            }
            mu = -mu;
            lpf = lpf.min(d);
        }
        d += 1;
    }
    if n > 1 {
        mu = -mu;
        lpf = lpf.min(n);
    }
    (mu, lpf)
}

fn naive_phi(x: i64, primes: &[i64]) -> i64 {
    (1..=x)
        .filter(|&n| primes.iter().all(|&p| n % p != 0))
        .count() as i64
}
