use chrono::{DateTime, Duration, Utc};

use crate::models::{
    action::GameAction,
    game::{self, Game, GamePhase, PhaseView},
};
use crate::services::action_service;
use crate::services::game_service::GameServiceError;
use crate::state::AppState;
use crate::store::GameStore as _;
use crate::utils::config::CONFIG;

pub fn phase_window() -> Duration {
    Duration::seconds(CONFIG.phase_seconds)
}

/// フェーズ終了条件を評価し、満たしていれば解決して次フェーズへ進める。
/// 満たしていなければ現在のフェーズ情報をそのまま返す（この分岐では
/// 一切書き込みを行わない）。呼び出し元がゲームごとのロックを保持
/// していることが前提
pub async fn evaluate(state: &AppState, game: Game) -> Result<PhaseView, GameServiceError> {
    let now = Utc::now();

    let players = state.store.players_for_game(&game.game_code).await?;
    let alive_count = players.iter().filter(|p| p.alive).count();
    let actions = state
        .store
        .actions_for_phase(&game.game_code, game.phase)
        .await?;

    if !game::phase_finished(&game, actions.len(), alive_count, now) {
        return Ok(PhaseView::from(&game));
    }

    resolve(state, game, actions, now).await
}

/// フェーズの解決本体。脱落者を確定し、フェーズを反転して
/// 解決済みフェーズのアクションを消す
async fn resolve(
    state: &AppState,
    game: Game,
    actions: Vec<GameAction>,
    now: DateTime<Utc>,
) -> Result<PhaseView, GameServiceError> {
    let victim = match game.phase {
        GamePhase::Night => game::night_victim(&actions),
        GamePhase::Day => game::day_victim(&actions),
    };

    if let Some(target) = &victim {
        state
            .store
            .set_player_alive(&game.game_code, target, false)
            .await?;
        log::info!(
            "ゲーム {}: {} フェーズで {} が脱落しました",
            game.game_code,
            game.phase,
            target
        );
    }

    let next_phase = game.phase.next();
    let phase_end = now + phase_window();
    state
        .store
        .update_game_phase(&game.game_code, next_phase, now, phase_end)
        .await?;
    action_service::clear_phase_actions(state, &game.game_code, game.phase).await?;

    log::debug!(
        "ゲーム {}: フェーズを {} から {} へ進めました",
        game.game_code,
        game.phase,
        next_phase
    );

    // 勝利条件は外部フックに委ねる。設定されていなければ何もしない
    if let Some(condition) = &state.win_condition {
        let players = state.store.players_for_game(&game.game_code).await?;
        if condition.finished(&players) {
            state
                .store
                .update_game_active(&game.game_code, false)
                .await?;
            log::info!("ゲーム {}: 勝利条件を満たしたため終了します", game.game_code);
        }
    }

    Ok(PhaseView {
        phase: next_phase,
        phase_start: now,
        phase_end,
    })
}
