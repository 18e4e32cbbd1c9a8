use axum::{
    extract::Request,
    http::{header, StatusCode},
    middleware::Next,
    response::Response,
    Json,
};
use serde_json::json;

use crate::utils::auth::verify_token;

/// Bearerトークンから行動者のニックネームを取り出し、リクエスト
/// 拡張に載せる。エンジン側はセッションを一切参照しない
pub async fn auth_middleware(
    mut request: Request,
    next: Next,
) -> Result<Response, (StatusCode, Json<serde_json::Value>)> {
    // ヘッダーからトークンを取得
    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|header| header.to_str().ok())
        .and_then(|auth_value| {
            auth_value
                .strip_prefix("Bearer ")
                .map(|token| token.to_owned())
        });

    let token = match auth_header {
        Some(token) => token,
        None => {
            return Err((
                StatusCode::UNAUTHORIZED,
                Json(json!({ "error": "認証が必要です" })),
            ));
        }
    };

    // トークンを検証
    let claims = match verify_token(&token) {
        Ok(claims) => claims,
        Err(_) => {
            return Err((
                StatusCode::UNAUTHORIZED,
                Json(json!({ "error": "無効なトークンです" })),
            ));
        }
    };

    // 行動者のニックネームをリクエスト拡張に設定
    request.extensions_mut().insert(claims.sub);

    Ok(next.run(request).await)
}
