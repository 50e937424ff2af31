// S2 計算の進捗率と ETA 表示のヘルパー。
//
// ここの浮動小数点はスケジューリングのヒューリスティック専用で、
// 計算結果の数値には一切入らない。

/// S2 の進捗率（%）を見積もる。
///
/// 仕事量はセグメントの先頭側に強く偏るため、位置 low/z の線形比は進捗を
/// 過小評価する。位置ベースは平方根で持ち上げ、寄与の合計 s2/s2_approx の
/// 線形比との大きい方を採用する。
pub fn percent(low: i64, z: i64, s2: i128, s2_approx: i128) -> f64 {
    let p_low = if z > 0 {
        100.0 * (low.clamp(0, z) as f64 / z as f64).sqrt()
    } else {
        100.0
    };
    let p_sum = if s2_approx > 0 {
        (100.0 * s2.max(0) as f64 / s2_approx as f64).min(100.0)
    } else {
        0.0
    };
    p_low.max(p_sum).clamp(0.0, 100.0)
}

/// ETA（残り時間の秒数）を人間が読みやすい文字列にする。
///
/// - `None` は「まだ統計が安定していない」ことを表す。
/// - 例: `None` → `"Calculating..."`、`Some(125)` → `"2 min 5 sec"`
pub fn format_eta(eta_secs: Option<u64>) -> String {
    match eta_secs {
        None => "Calculating...".to_string(),
        Some(secs) => {
            if secs < 60 {
                format!("{secs} sec")
            } else if secs < 3600 {
                let minutes = secs / 60;
                let seconds = secs % 60;
                if seconds == 0 {
                    format!("{minutes} min")
                } else {
                    format!("{minutes} min {seconds} sec")
                }
            } else {
                let hours = secs / 3600;
                let minutes = (secs % 3600) / 60;
                if minutes == 0 {
                    format!("{hours} h")
                } else {
                    format!("{hours} h {minutes} min")
                }
            }
        }
    }
}
