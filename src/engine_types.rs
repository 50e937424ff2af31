use std::error::Error;
use std::fmt;

// エンジン各層（篩・φ 再帰・ドライバ）で共有するエラー型と進捗情報の定義。
//
// - `InvalidArgument` / `PrecisionExceeded` は API 境界で呼び出し側に返すエラー。
// - 範囲外アクセスや counter 不変条件の破れは「プログラムのバグ」であり、
//   エラーとしては表現せず debug ビルドの assert でのみ検査する。

/// エンジン共通の結果型。
pub type PrimeResult<T> = Result<T, CountError>;

/// π(x) 計算 API が呼び出し側に返す構造化エラー。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CountError {
    /// 引数が契約を満たしていない（x < 0、c が素数表の範囲外など）。
    InvalidArgument(String),
    /// 64bit の中間演算で表現できない大きさの x が渡された。
    PrecisionExceeded(String),
}

impl fmt::Display for CountError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CountError::InvalidArgument(msg) => write!(f, "invalid argument: {msg}"),
            CountError::PrecisionExceeded(msg) => write!(f, "precision exceeded: {msg}"),
        }
    }
}

impl Error for CountError {}

/// 長時間計算の進捗情報。
///
/// - `processed` と `total` は単調に増加する（逆戻りしない）こと
/// - `processed <= total` を維持すること（ETA 計算で使用）
/// - `eta_secs` が `None` の場合は「まだ計算できない」ことを意味する
#[derive(Clone, Copy, Debug)]
pub struct Progress {
    /// これまでに処理した区間の長さ。
    pub processed: u64,
    /// 全体として処理する予定の区間の長さ。
    pub total: u64,
    /// 推定残り時間（秒）。まだ計算できない場合は None。
    pub eta_secs: Option<u64>,
}

/// 現在の進捗と経過時間から ETA（残り時間の秒数）を推定するユーティリティ。
///
/// - 進捗 0% の間は `None` を返し、ある程度進んでから ETA を表示する前提。
pub fn compute_eta(processed: u64, total: u64, elapsed_secs: f64) -> Option<u64> {
    if total == 0 {
        return None;
    }
    let progress = processed.min(total) as f64 / total as f64;
    if progress > 0.0 {
        let total_time = elapsed_secs / progress;
        Some(((total_time - elapsed_secs).max(0.0)).round() as u64)
    } else {
        None
    }
}
