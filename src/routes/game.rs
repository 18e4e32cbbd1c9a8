use axum::{
    extract::{Path, State},
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::models::{action::ActionType, game::GamePhase, role::Role};
use crate::routes::auth_middleware::auth_middleware;
use crate::services::game_service::GameServiceError;
use crate::services::{action_service, game_service};
use crate::state::AppState;

#[derive(Debug, Serialize, Deserialize)]
pub struct NightActionRequest {
    pub game_code: String,
    pub target: String,
    pub role: Role,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct VoteRequest {
    pub game_code: String,
    pub target: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GenericActionRequest {
    pub action_type: ActionType,
    pub target: String,
    pub phase: GamePhase,
}

pub fn routes(state: AppState) -> Router {
    // 行動者の特定が必要なエンドポイント
    let authed = Router::new()
        .route("/start/:lobby_code", post(start_game_handler))
        .route("/night-action", post(night_action_handler))
        .route("/vote", post(vote_handler))
        .route("/:game_code/actions", post(generic_action_handler))
        .route_layer(middleware::from_fn(auth_middleware));

    Router::new()
        // フェーズ取得（ポーリング起点。遅延遷移はここで発火する）
        .route("/:game_code/phase", get(game_phase_handler))
        // 匿名化イベントフィード
        .route("/:game_code/results", get(game_results_handler))
        // ゲーム全体のスナップショット
        .route("/:game_code", get(game_snapshot_handler))
        .merge(authed)
        .with_state(state)
}

// エラーハンドリング
impl IntoResponse for GameServiceError {
    fn into_response(self) -> Response {
        let status = match &self {
            GameServiceError::GameNotFound | GameServiceError::LobbyNotFound => {
                StatusCode::NOT_FOUND
            }
            GameServiceError::Unauthorized => StatusCode::UNAUTHORIZED,
            GameServiceError::NotHost
            | GameServiceError::DeadVoterForbidden
            | GameServiceError::DeadActorForbidden => StatusCode::FORBIDDEN,
            GameServiceError::InvalidRole | GameServiceError::RoleAssignment(_) => {
                StatusCode::BAD_REQUEST
            }
            GameServiceError::Storage(e) => {
                log::error!("ストア操作に失敗しました: {}", e);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

async fn start_game_handler(
    State(state): State<AppState>,
    Extension(actor): Extension<String>,
    Path(lobby_code): Path<String>,
) -> Result<impl IntoResponse, GameServiceError> {
    let game_code = game_service::start_game(state, &lobby_code, &actor).await?;
    Ok((
        StatusCode::OK,
        Json(json!({ "status": "ok", "game_code": game_code })),
    ))
}

async fn game_phase_handler(
    State(state): State<AppState>,
    Path(game_code): Path<String>,
) -> Result<impl IntoResponse, GameServiceError> {
    let view = game_service::get_phase(state, &game_code).await?;
    Ok((StatusCode::OK, Json(view)))
}

async fn game_snapshot_handler(
    State(state): State<AppState>,
    Path(game_code): Path<String>,
) -> Result<impl IntoResponse, GameServiceError> {
    let snapshot = game_service::get_snapshot(state, &game_code).await?;
    Ok((StatusCode::OK, Json(snapshot)))
}

async fn game_results_handler(
    State(state): State<AppState>,
    Path(game_code): Path<String>,
) -> Result<impl IntoResponse, GameServiceError> {
    let results = game_service::get_results(state, &game_code).await?;
    Ok((StatusCode::OK, Json(results)))
}

async fn night_action_handler(
    State(state): State<AppState>,
    Extension(actor): Extension<String>,
    Json(req): Json<NightActionRequest>,
) -> Result<impl IntoResponse, GameServiceError> {
    action_service::record_night_action(state, &req.game_code, &actor, &req.target, req.role)
        .await?;
    Ok((StatusCode::OK, Json(json!({ "status": "ok" }))))
}

async fn vote_handler(
    State(state): State<AppState>,
    Extension(actor): Extension<String>,
    Json(req): Json<VoteRequest>,
) -> Result<impl IntoResponse, GameServiceError> {
    action_service::record_vote(state, &req.game_code, &actor, &req.target).await?;
    Ok((StatusCode::OK, Json(json!({ "status": "ok" }))))
}

async fn generic_action_handler(
    State(state): State<AppState>,
    Extension(actor): Extension<String>,
    Path(game_code): Path<String>,
    Json(req): Json<GenericActionRequest>,
) -> Result<impl IntoResponse, GameServiceError> {
    action_service::record_generic_action(
        state,
        &game_code,
        &actor,
        req.action_type,
        req.phase,
        &req.target,
    )
    .await?;
    Ok((StatusCode::OK, Json(json!({ "status": "ok" }))))
}
