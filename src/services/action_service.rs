use crate::models::{
    action::{ActionType, GameAction, GameVote},
    game::GamePhase,
    role::Role,
};
use crate::services::game_service::GameServiceError;
use crate::state::AppState;
use crate::store::GameStore as _;

/// 夜アクションの記録。役職ホワイトリスト（マフィア・ドン・警視・
/// 外科医・ホームレス）で検証し、役職に対応するアクション種別へ
/// 変換する。死亡チェックは行わない
pub async fn record_night_action(
    state: AppState,
    game_code: &str,
    actor: &str,
    target: &str,
    role: Role,
) -> Result<(), GameServiceError> {
    let action_type = role.night_action().ok_or(GameServiceError::InvalidRole)?;

    let game = state
        .store
        .get_game(game_code)
        .await?
        .ok_or(GameServiceError::GameNotFound)?;

    record_action(&state, game_code, game.phase, actor, action_type, target).await
}

/// 汎用アクションの記録。死亡チェックは行うが役職は検証しない。
/// フェーズはクライアント申告の値をそのまま使う
pub async fn record_generic_action(
    state: AppState,
    game_code: &str,
    actor: &str,
    action_type: ActionType,
    phase: GamePhase,
    target: &str,
) -> Result<(), GameServiceError> {
    let player = state.store.get_player(game_code, actor).await?;
    if !player.map(|p| p.alive).unwrap_or(false) {
        return Err(GameServiceError::DeadActorForbidden);
    }

    record_action(&state, game_code, phase, actor, action_type, target).await
}

/// 投票の記録。死亡した投票者は拒否。投票者ごとに常に1件へ上書き
pub async fn record_vote(
    state: AppState,
    game_code: &str,
    voter: &str,
    target: &str,
) -> Result<(), GameServiceError> {
    let player = state.store.get_player(game_code, voter).await?;
    if !player.map(|p| p.alive).unwrap_or(false) {
        return Err(GameServiceError::DeadVoterForbidden);
    }

    let lock = state.game_lock(game_code).await;
    let _guard = lock.lock().await;

    state.store.delete_vote_by_voter(game_code, voter).await?;
    state
        .store
        .insert_vote(GameVote {
            game_code: game_code.to_string(),
            voter: voter.to_string(),
            target: target.to_string(),
        })
        .await?;
    Ok(())
}

/// フェーズ解決時に一度だけ呼ばれ、解決済みフェーズの
/// アクションを一括削除する
pub async fn clear_phase_actions(
    state: &AppState,
    game_code: &str,
    phase: GamePhase,
) -> Result<(), GameServiceError> {
    state
        .store
        .delete_actions_for_phase(game_code, phase)
        .await?;
    Ok(())
}

/// delete-then-insertによる上書き記録。actorごとに生きている
/// アクションは常に1件だけになる
async fn record_action(
    state: &AppState,
    game_code: &str,
    phase: GamePhase,
    actor: &str,
    action_type: ActionType,
    target: &str,
) -> Result<(), GameServiceError> {
    let lock = state.game_lock(game_code).await;
    let _guard = lock.lock().await;

    state.store.delete_actions_by_actor(game_code, actor).await?;
    state
        .store
        .insert_action(GameAction {
            game_code: game_code.to_string(),
            phase,
            actor: actor.to_string(),
            action_type,
            target: target.to_string(),
        })
        .await?;

    log::debug!(
        "ゲーム {}: {} が {} を記録しました",
        game_code,
        actor,
        action_type
    );
    Ok(())
}
