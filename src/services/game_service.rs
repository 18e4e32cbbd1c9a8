use chrono::Utc;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::models::{
    action::ActionType,
    game::{Game, GamePhase, PhaseView},
    player::GamePlayer,
    role::{self, RoleAssignmentError},
};
use crate::services::phase_service;
use crate::state::AppState;
use crate::store::{GameStore as _, StoreError};

#[derive(Debug, thiserror::Error)]
pub enum GameServiceError {
    #[error("ゲームが見つかりません")]
    GameNotFound,
    #[error("ロビーが見つかりません")]
    LobbyNotFound,
    #[error("ホストのみがゲームを開始できます")]
    NotHost,
    #[error(transparent)]
    RoleAssignment(#[from] RoleAssignmentError),
    #[error("無効な役職です")]
    InvalidRole,
    #[error("死亡したプレイヤーは投票できません")]
    DeadVoterForbidden,
    #[error("死亡したプレイヤーは行動できません")]
    DeadActorForbidden,
    #[error("認証が必要です")]
    Unauthorized,
    #[error("ストアエラー: {0}")]
    Storage(#[from] StoreError),
}

const GAME_CODE_LEN: usize = 6;
const CODE_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

fn generate_code<R: Rng + ?Sized>(rng: &mut R, len: usize) -> String {
    (0..len)
        .map(|_| CODE_ALPHABET[rng.gen_range(0..CODE_ALPHABET.len())] as char)
        .collect()
}

/// ロビーのロスターから新しいゲームを作る。ホストのみ実行可能。
/// 役職を割り当て、夜フェーズから開始する
pub async fn start_game(
    state: AppState,
    lobby_code: &str,
    actor: &str,
) -> Result<String, GameServiceError> {
    let lobby = state
        .store
        .get_lobby(lobby_code)
        .await?
        .ok_or(GameServiceError::LobbyNotFound)?;

    if lobby.host != actor {
        return Err(GameServiceError::NotHost);
    }

    let roster: Vec<String> = state
        .store
        .lobby_players(lobby_code)
        .await?
        .into_iter()
        .map(|p| p.nickname)
        .collect();

    // ThreadRngはawaitをまたげないためStdRngを使う
    let mut rng = StdRng::from_entropy();
    let assignments = role::assign_roles(&roster, &mut rng)?;

    // 衝突しないゲームコードを引くまで生成し直す
    let game_code = loop {
        let code = generate_code(&mut rng, GAME_CODE_LEN);
        if state.store.get_game(&code).await?.is_none() {
            break code;
        }
    };

    let now = Utc::now();
    let game = Game::new(
        game_code.clone(),
        lobby_code.to_string(),
        now,
        phase_service::phase_window(),
    );
    state.store.insert_game(game).await?;

    for (nickname, role) in assignments {
        state
            .store
            .insert_player(GamePlayer::new(game_code.clone(), nickname, role))
            .await?;
    }

    log::info!(
        "ゲーム {} を開始しました（ロビー {}、{}人）",
        game_code,
        lobby_code,
        roster.len()
    );
    Ok(game_code)
}

/// 現在のフェーズ情報を返す。フェーズ終了条件を満たしていれば
/// その場で解決して次のフェーズへ進める（遅延遷移）。
/// ゲームごとのロックを取るため、同時ポーリングでも解決は一度だけ走る
pub async fn get_phase(state: AppState, game_code: &str) -> Result<PhaseView, GameServiceError> {
    if state.store.get_game(game_code).await?.is_none() {
        return Err(GameServiceError::GameNotFound);
    }

    let lock = state.game_lock(game_code).await;
    let _guard = lock.lock().await;

    // ロック獲得までの間に他のポーリングが解決済みの可能性があるため読み直す
    let game = state
        .store
        .get_game(game_code)
        .await?
        .ok_or(GameServiceError::GameNotFound)?;

    phase_service::evaluate(&state, game).await
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum GameSnapshot {
    Ok { players: Vec<GamePlayer> },
    Ended { redirect: String },
}

/// ゲームの現在の全プレイヤー状態。終了済み・存在しないゲームは
/// ダッシュボードへのリダイレクト指示を返す
pub async fn get_snapshot(
    state: AppState,
    game_code: &str,
) -> Result<GameSnapshot, GameServiceError> {
    let game = state.store.get_game(game_code).await?;
    let active = game.map(|g| g.is_active).unwrap_or(false);
    if !active {
        return Ok(GameSnapshot::Ended {
            redirect: "/dashboard".to_string(),
        });
    }

    let players = state.store.players_for_game(game_code).await?;
    Ok(GameSnapshot::Ok { players })
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ResultsView {
    pub events: Vec<String>,
    pub phase: GamePhase,
}

/// 現在フェーズのアクションを匿名化したイベントとして返す。
/// 実行者・対象は伏せ、アクション種別だけを開示する
pub async fn get_results(
    state: AppState,
    game_code: &str,
) -> Result<ResultsView, GameServiceError> {
    let game = state
        .store
        .get_game(game_code)
        .await?
        .ok_or(GameServiceError::GameNotFound)?;

    let actions = state
        .store
        .actions_for_phase(game_code, game.phase)
        .await?;

    let events = actions
        .iter()
        .map(|a| match a.action_type {
            ActionType::Heal => "誰かがプレイヤーを治療しました".to_string(),
            ActionType::Check => "誰かがプレイヤーの役職を確認しました".to_string(),
            _ => format!("誰かがアクションを実行しました: {}", a.action_type),
        })
        .collect();

    Ok(ResultsView {
        events,
        phase: game.phase,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_code_alphabet() {
        let mut rng = rand::thread_rng();
        for _ in 0..100 {
            let code = generate_code(&mut rng, GAME_CODE_LEN);
            assert_eq!(code.len(), GAME_CODE_LEN);
            assert!(code
                .chars()
                .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()));
        }
    }
}
