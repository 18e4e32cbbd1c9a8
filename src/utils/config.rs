use once_cell::sync::Lazy;
use std::env;

pub static CONFIG: Lazy<Config> = Lazy::new(Config::new);

pub struct Config {
    // 未設定の場合はインメモリストアで起動する
    pub supabase_url: Option<String>,
    pub supabase_key: Option<String>,
    pub jwt_secret: String,
    // フェーズの長さ（秒）
    pub phase_seconds: i64,
}

impl Config {
    fn new() -> Self {
        Self {
            supabase_url: env::var("SUPABASE_URL").ok(),
            supabase_key: env::var("SUPABASE_KEY").ok(),
            jwt_secret: env::var("JWT_SECRET").expect("JWT_SECRET must be set"),
            phase_seconds: env::var("PHASE_SECONDS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(35),
        }
    }
}
