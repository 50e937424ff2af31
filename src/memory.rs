use sysinfo::System;

use crate::phi_cache::DEFAULT_CACHE_MEGABYTES;

/// システムの物理メモリ総量を取得（バイト単位）
pub fn get_total_memory() -> u64 {
    let mut sys = System::new_all();
    sys.refresh_memory();
    sys.total_memory()
}

/// 実際に使うワーカースレッド数を決める。threads = 0 は自動（論理コア数）。
/// 仕事量（篩区間の長さ）が小さいときはスレッドを減らし、
/// 起動と初期化のコストが計算本体を上回るのを避ける。
pub fn ideal_num_threads(threads: usize, work: i64) -> usize {
    let max_threads = if threads > 0 {
        threads
    } else {
        std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1)
    };

    let thread_threshold: i64 = 100_000;
    (work / thread_threshold).clamp(1, max_threads as i64) as usize
}

/// ワーカー 1 本あたりのメモリ使用量を推定（バイト単位）
/// segment_size: 篩セグメントに含まれる整数の個数
pub fn estimate_worker_memory(segment_size: u64) -> u64 {
    // 篩ビットマップ: segment_size / 30 バイト
    // + wheel / counter 等のオーバーヘッドを見て 1.2 倍
    let sieve_bytes = (segment_size / 30).max(1);
    let phi_cache_bytes = DEFAULT_CACHE_MEGABYTES << 20;
    (sieve_bytes as f64 * 1.2) as u64 + phi_cache_bytes
}

/// メモリ使用量の情報を表示用に取得
pub fn get_memory_info(segment_size: u64, num_threads: usize) -> MemoryInfo {
    let total_memory = get_total_memory();
    let worker_memory = estimate_worker_memory(segment_size);
    let estimated_total = worker_memory * num_threads as u64;
    let usage_percent = if total_memory > 0 {
        (estimated_total as f64 / total_memory as f64) * 100.0
    } else {
        0.0
    };

    MemoryInfo {
        total_memory,
        worker_memory,
        estimated_total,
        usage_percent,
    }
}

#[derive(Debug, Clone)]
pub struct MemoryInfo {
    pub total_memory: u64,
    pub worker_memory: u64,
    pub estimated_total: u64,
    pub usage_percent: f64,
}

impl MemoryInfo {
    pub fn format(&self) -> String {
        format!(
            "メモリ: システム {:.1}GB, ワーカーあたり {:.1}MB, 推定使用量 {:.1}MB ({:.1}%)",
            self.total_memory as f64 / (1024.0 * 1024.0 * 1024.0),
            self.worker_memory as f64 / (1024.0 * 1024.0),
            self.estimated_total as f64 / (1024.0 * 1024.0),
            self.usage_percent
        )
    }
}
