use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::Path;

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Config {
    /// ワーカースレッド数。0 で論理コア数に合わせる。
    #[serde(default)]
    pub threads: usize,
    /// y = α·x^(1/3) のチューニング係数。0.0 で自動。
    /// どの値でも結果は変わらず、速度だけが変わる。
    #[serde(default)]
    pub alpha: f64,
    /// 小さい x をここまで単純な篩で直接数える。
    #[serde(default = "default_direct_limit")]
    pub direct_limit: i64,
}

fn default_direct_limit() -> i64 {
    10_000
}

impl Default for Config {
    fn default() -> Self {
        Self {
            threads: 0,
            alpha: 0.0,
            direct_limit: default_direct_limit(),
        }
    }
}

const SETTINGS_FILE: &str = "settings.toml";

pub fn load_or_create_config() -> Result<Config, Box<dyn std::error::Error + Send + Sync>> {
    if Path::new(SETTINGS_FILE).exists() {
        let mut file = File::open(SETTINGS_FILE)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;
        let cfg = toml::from_str(&contents)?;
        Ok(cfg)
    } else {
        let cfg = Config::default();
        save_config(&cfg)?;
        Ok(cfg)
    }
}

pub fn save_config(cfg: &Config) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let toml_str = toml::to_string_pretty(cfg)?;
    let file = File::create(SETTINGS_FILE)?;
    let mut writer = BufWriter::new(file);
    writer.write_all(toml_str.as_bytes())?;
    Ok(())
}
