use sosu_keisu::load_balancer::{LoadBalancer, Runtime, Work};

/// 単一ワーカーで回したとき、割り当てが [0, z] を隙間なく重複なく覆う。
#[test]
fn assignments_tile_the_interval_exactly() {
    let x = 1_000_000_000_000i64;
    let y = 10_000i64;
    let z = x / y;
    let mut lb = LoadBalancer::new(x, y, z, 1_000_000);

    let mut work = Work::default();
    let runtime = Runtime {
        init: 0.0005,
        secs: 0.02,
    };

    let mut expected_low = 0i64;
    let mut rounds = 0u64;
    while lb.get_work(&mut work, 1, &runtime) {
        assert_eq!(work.low, expected_low, "gap or overlap at assignment");
        assert!(work.segments >= 1);
        assert!(work.segment_size >= 240 && work.segment_size % 240 == 0);
        expected_low = work.low + work.segments * work.segment_size;
        rounds += 1;
        assert!(rounds < 1_000_000, "balancer failed to make progress");
    }

    // false を返した時点で次の low は z を越えている
    assert_eq!(work.low, expected_low);
    assert!(work.low > z, "interval [0, z] not fully covered");
}

/// 2 ワーカーが交互に引いても被覆は厳密（完了順序に依存しない）。
#[test]
fn interleaved_workers_cover_without_overlap() {
    let x = 10_000_000_000i64;
    let y = 5_000i64;
    let z = x / y;
    let mut lb = LoadBalancer::new(x, y, z, 500_000);

    let mut works = [Work::default(), Work::default()];
    let runtimes = [
        Runtime {
            init: 0.0001,
            secs: 0.004,
        },
        Runtime {
            init: 0.0002,
            secs: 0.05,
        },
    ];

    let mut intervals: Vec<(i64, i64)> = Vec::new();
    let mut active = [true, true];
    let mut calls = 0i128;
    let mut turn = 0usize;

    while active[0] || active[1] {
        if !active[turn] {
            turn = 1 - turn;
            continue;
        }
        calls += 1;
        if lb.get_work(&mut works[turn], 3, &runtimes[turn]) {
            let w = works[turn];
            intervals.push((w.low, w.low + w.segments * w.segment_size));
        } else {
            active[turn] = false;
        }
        turn = 1 - turn;
    }

    // 部分和は呼び出しごとに可換に加算される
    assert_eq!(lb.get_result(), 3 * calls);

    // 区間は昇順で配られ、隙間も重複もない
    intervals.sort();
    let mut cursor = 0i64;
    for &(lo, hi) in &intervals {
        assert_eq!(lo, cursor, "gap or overlap at {lo}");
        assert!(hi > lo);
        cursor = hi;
    }
    assert!(cursor > z, "interval [0, z] not fully covered");
}

/// セグメントサイズは上限まで単調に成長し、上限を越えない。
#[test]
fn segment_size_grows_monotonically_to_its_cap() {
    let x = 100_000_000_000i64;
    let y = 20_000i64;
    let z = x / y;
    let mut lb = LoadBalancer::new(x, y, z, 1_000_000);

    let mut work = Work::default();
    let runtime = Runtime {
        init: 0.001,
        secs: 0.1,
    };

    let mut prev_size = 0i64;
    let mut max_seen = 0i64;
    while lb.get_work(&mut work, 0, &runtime) {
        assert!(
            work.segment_size >= prev_size,
            "segment_size shrank: {} -> {}",
            prev_size,
            work.segment_size
        );
        prev_size = work.segment_size;
        max_seen = max_seen.max(work.segment_size);
    }
    assert_eq!(max_seen, lb.max_segment_size());
}
