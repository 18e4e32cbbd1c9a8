use std::net::SocketAddr;
use std::sync::Arc;

use axum::http::{self, HeaderValue, Method};
use dotenvy::dotenv;
use env_logger::Builder;
use log::LevelFilter;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use mafia_server::app::create_app;
use mafia_server::state::AppState;
use mafia_server::store::{GameStore, MemoryStore, SupabaseStore};
use mafia_server::utils::config::CONFIG;

// ログ設定
fn init_logger() {
    let mut builder = Builder::new();
    builder
        .filter_level(LevelFilter::Info)
        .filter_module("tower_http", LevelFilter::Debug)
        .filter_module("mafia_server", LevelFilter::Debug)
        .format_timestamp(Some(env_logger::TimestampPrecision::Millis))
        .format_target(true)
        .init();
}

fn build_store() -> Arc<dyn GameStore> {
    match (&CONFIG.supabase_url, &CONFIG.supabase_key) {
        (Some(url), Some(key)) => {
            log::info!("Supabaseストアを使用します: {}", url);
            Arc::new(SupabaseStore::new(url.clone(), key.clone()))
        }
        _ => {
            log::warn!("SUPABASE_URL/SUPABASE_KEYが未設定のためインメモリストアを使用します");
            Arc::new(MemoryStore::new())
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 環境変数をロード
    if let Err(e) = dotenv() {
        eprintln!("Warning: .envファイルの読み込みに失敗しました: {}", e);
    }

    init_logger();

    let state = AppState::with_store(build_store());

    // CORSレイヤーの設定
    let origins = ["http://localhost:3000".parse::<HeaderValue>()?];
    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([http::header::CONTENT_TYPE, http::header::AUTHORIZATION]);

    // ルーティングの設定
    let app = create_app(state).layer(cors).layer(
        TraceLayer::new_for_http().make_span_with(|request: &http::Request<_>| {
            tracing::info_span!(
                "HTTP request",
                method = %request.method(),
                uri = %request.uri(),
            )
        }),
    );

    // サーバーの起動
    let addr = SocketAddr::from(([127, 0, 0, 1], 8080));
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    log::info!("サーバーを起動しました: http://{}", addr);
    axum::serve(listener, app).await?;
    Ok(())
}
