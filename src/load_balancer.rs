use std::time::Instant;

use crate::sieve::Sieve;
use crate::sieve_math::{ilog, iroot3, iroot6, isqrt};
use crate::status;

// S2 ワーカーへ篩区間を配る動的ロードバランサ。
//
// 特殊リーフの分布は激しく偏っていて、大半が最初の数セグメントにある。
// 区間 [0, z] をスレッド数で等分するだけでは全くスケールしないため、
// ごく小さなセグメントから始めて、残り時間の見積もりに応じて
// セグメントサイズ（上限あり）とセグメント数を増減する。

/// ワーカーが直前のチャンク処理に要した時間。
#[derive(Clone, Copy, Debug, Default)]
pub struct Runtime {
    /// チャンク先頭の初期化（φ 前置値の計算と篩の確保）の秒数。
    pub init: f64,
    /// チャンク全体の処理秒数。
    pub secs: f64,
}

/// ワーカーに渡す作業単位。処理すべき区間は
/// [low, low + segments · segment_size) ∩ [0, z]。
#[derive(Clone, Copy, Debug, Default)]
pub struct Work {
    pub low: i64,
    pub segments: i64,
    pub segment_size: i64,
}

pub struct LoadBalancer {
    low: i64,
    max_low: i64,
    z: i64,
    segments: i64,
    segment_size: i64,
    max_size: i64,
    s2_total: i128,
    s2_approx: i128,
    smallest_hard_leaf: i64,
    start_time: Instant,
}

impl LoadBalancer {
    pub fn new(x: i64, y: i64, z: i64, s2_approx: i128) -> LoadBalancer {
        let mut lb = LoadBalancer {
            low: 0,
            max_low: 0,
            z,
            segments: 1,
            segment_size: 0,
            max_size: 0,
            s2_total: 0,
            s2_approx,
            smallest_hard_leaf: 0,
            start_time: Instant::now(),
        };
        lb.init_size();

        // ハードリーフの大半は x / (y·√α·x^(1/6)) の直後に集中する。
        // α は y の導出に使われた値を y 自身から復元し、基準を揃える
        let x16 = iroot6(x).max(1);
        let alpha = (y as f64 / iroot3(x).max(1) as f64).max(1.0);
        lb.smallest_hard_leaf = (x as f64 / (y as f64 * alpha.sqrt() * x16 as f64)) as i64;
        lb
    }

    fn init_size(&mut self) {
        // 最初の数セグメントに特殊リーフが集中するので、全スレッドに
        // 均等に仕事が回るよう小さなセグメントから始める
        let sqrtz = isqrt(self.z);
        let log = ilog(sqrtz).max(1);
        let segment_size = (sqrtz / log).max(1 << 9);
        self.segment_size = Sieve::get_segment_size(segment_size as u64) as i64;

        // L1 データキャッシュに収まるサイズを上限の目安にする
        let l1_dcache_size: i64 = 1 << 15;
        let max_size = (l1_dcache_size * 30).max(sqrtz);
        self.max_size = Sieve::get_segment_size(max_size as u64) as i64;
    }

    /// これまでに集まった S2 の合計。
    pub fn get_result(&self) -> i128 {
        self.s2_total
    }

    /// 調整後のセグメントサイズの上限。メモリ見積もりに使う。
    pub fn max_segment_size(&self) -> i64 {
        self.max_size
    }

    /// 完了した寄与 s2 を合算し、次の作業範囲を work へ書き込む。
    /// false を返したら区間 [0, z] は配り終えている。
    ///
    /// 呼び出し側が Mutex で直列化する前提。ロック中に済ませるのは
    /// 算術とフィールド更新だけで、アロケーションもログ出力もしない。
    pub fn get_work(&mut self, work: &mut Work, s2: i128, runtime: &Runtime) -> bool {
        self.s2_total += s2;

        self.update(work, runtime);

        work.low = self.low;
        work.segments = self.segments;
        work.segment_size = self.segment_size;
        self.low += self.segments * self.segment_size;

        work.low <= self.z
    }

    fn update(&mut self, last: &Work, runtime: &Runtime) {
        if last.low > self.max_low {
            self.max_low = last.low;
            self.segments = last.segments;

            if self.segment_size < self.max_size {
                self.segment_size = (self.segment_size * 2).min(self.max_size);
            } else {
                self.update_segments(runtime);
            }
        }

        // ハードリーフの山を 1 スレッドに丸ごと割り当てないよう、
        // smallest_hard_leaf を跨ぐ区間ではセグメント数を最小にする
        let high = self.low + self.segments * self.segment_size;
        if self.smallest_hard_leaf >= self.low && self.smallest_hard_leaf <= high {
            self.segments = 1;
        }
    }

    /// 残り時間の見積もりに応じてセグメント数を増減する。終盤は 1 回の
    /// 割り当てを短くし、全スレッドがほぼ同時に終わるようにする。
    fn update_segments(&mut self, runtime: &Runtime) {
        // 1 回の割り当ての目安は残り時間の 1/4。ただし各スレッドは
        // 初期化時間の 10 倍以上は走らせる
        let threshold = (self.remaining_secs() / 4.0)
            .max(runtime.init * 10.0)
            .max(0.01);

        let divider = runtime.secs.max(0.001);
        let factor = (threshold / divider).clamp(0.5, 2.0);
        self.segments = ((self.segments as f64 * factor).round() as i64).max(1);
    }

    /// 完了までの推定残り秒数。進捗率の下限 10% がゼロ割りを防ぐ。
    fn remaining_secs(&self) -> f64 {
        let percent =
            status::percent(self.low, self.z, self.s2_total, self.s2_approx).clamp(10.0, 100.0);
        let total_secs = self.start_time.elapsed().as_secs_f64();
        total_secs * (100.0 / percent) - total_secs
    }
}
