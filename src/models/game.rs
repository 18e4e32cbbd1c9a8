use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::action::{ActionType, GameAction};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GamePhase {
    Night, // 夜フェーズ
    Day,   // 昼フェーズ
}

impl GamePhase {
    pub fn next(self) -> Self {
        match self {
            GamePhase::Night => GamePhase::Day,
            GamePhase::Day => GamePhase::Night,
        }
    }
}

impl fmt::Display for GamePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GamePhase::Night => write!(f, "night"),
            GamePhase::Day => write!(f, "day"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Game {
    pub game_code: String,
    pub lobby_code: String,
    pub phase: GamePhase,
    pub phase_start: DateTime<Utc>,
    pub phase_end: DateTime<Utc>,
    pub is_active: bool,
}

impl Game {
    /// ゲームは夜フェーズから始まる
    pub fn new(game_code: String, lobby_code: String, now: DateTime<Utc>, window: Duration) -> Self {
        Self {
            game_code,
            lobby_code,
            phase: GamePhase::Night,
            phase_start: now,
            phase_end: now + window,
            is_active: true,
        }
    }
}

/// クライアントへ返すフェーズ情報
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseView {
    pub phase: GamePhase,
    pub phase_start: DateTime<Utc>,
    pub phase_end: DateTime<Utc>,
}

impl From<&Game> for PhaseView {
    fn from(game: &Game) -> Self {
        Self {
            phase: game.phase,
            phase_start: game.phase_start,
            phase_end: game.phase_end,
        }
    }
}

/// フェーズ終了判定: タイマー切れ、または行動数が生存者数に達したとき。
/// 行動数は行単位で数える（actor単位ではない）
pub fn phase_finished(
    game: &Game,
    action_count: usize,
    alive_count: usize,
    now: DateTime<Utc>,
) -> bool {
    now >= game.phase_end || action_count >= alive_count
}

/// 夜の解決。記録順に走査し、同系統のアクションは後勝ち。
/// 襲撃対象が治療対象と一致した場合は誰も死なない
pub fn night_victim(actions: &[GameAction]) -> Option<String> {
    let mut mafia_target: Option<&str> = None;
    let mut heal_target: Option<&str> = None;

    for action in actions {
        if action.action_type.is_mafia_kill() {
            mafia_target = Some(action.target.as_str());
        } else if action.action_type == ActionType::Heal {
            heal_target = Some(action.target.as_str());
        }
    }

    match (mafia_target, heal_target) {
        (Some(killed), Some(healed)) if killed == healed => None,
        (Some(killed), _) => Some(killed.to_string()),
        (None, _) => None,
    }
}

/// 昼の解決。投票を対象ごとに集計し、最多得票者が一人だけなら追放。
/// 同票の場合は誰も追放されない
pub fn day_victim(actions: &[GameAction]) -> Option<String> {
    let mut tally: HashMap<&str, usize> = HashMap::new();
    for action in actions {
        if action.action_type == ActionType::Vote {
            *tally.entry(action.target.as_str()).or_insert(0) += 1;
        }
    }

    let max_votes = tally.values().copied().max()?;
    let mut top = tally
        .iter()
        .filter(|(_, count)| **count == max_votes)
        .map(|(target, _)| *target);

    let kicked = top.next()?;
    if top.next().is_some() {
        None
    } else {
        Some(kicked.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn action(action_type: ActionType, target: &str) -> GameAction {
        GameAction {
            game_code: "TEST01".to_string(),
            phase: GamePhase::Night,
            actor: format!("actor-{}", target),
            action_type,
            target: target.to_string(),
        }
    }

    #[test]
    fn test_night_kill_without_heal() {
        let actions = vec![action(ActionType::Kill, "bob")];
        assert_eq!(night_victim(&actions), Some("bob".to_string()));
    }

    #[test]
    fn test_night_heal_cancels_kill() {
        let actions = vec![
            action(ActionType::Kill, "bob"),
            action(ActionType::Heal, "bob"),
        ];
        assert_eq!(night_victim(&actions), None);
    }

    #[test]
    fn test_night_last_kill_wins() {
        // 同系統のアクションは記録順で後のものが有効
        let actions = vec![
            action(ActionType::Kill, "bob"),
            action(ActionType::VoteKill, "carol"),
            action(ActionType::Heal, "bob"),
        ];
        assert_eq!(night_victim(&actions), Some("carol".to_string()));
    }

    #[test]
    fn test_night_no_kill() {
        let actions = vec![action(ActionType::Heal, "bob")];
        assert_eq!(night_victim(&actions), None);
    }

    #[test]
    fn test_day_unique_majority() {
        let actions = vec![
            action(ActionType::Vote, "bob"),
            action(ActionType::Vote, "bob"),
            action(ActionType::Vote, "carol"),
        ];
        assert_eq!(day_victim(&actions), Some("bob".to_string()));
    }

    #[test]
    fn test_day_tie_kicks_nobody() {
        let actions = vec![
            action(ActionType::Vote, "bob"),
            action(ActionType::Vote, "bob"),
            action(ActionType::Vote, "carol"),
            action(ActionType::Vote, "carol"),
        ];
        assert_eq!(day_victim(&actions), None);
    }

    #[test]
    fn test_day_without_votes() {
        let actions = vec![action(ActionType::Check, "bob")];
        assert_eq!(day_victim(&actions), None);
    }

    #[test]
    fn test_phase_finished_by_quorum_counts_rows() {
        let now = Utc::now();
        let game = Game::new(
            "TEST01".to_string(),
            "LOBBY".to_string(),
            now,
            Duration::seconds(35),
        );
        assert!(!phase_finished(&game, 2, 3, now));
        // 行数ベースの判定なので、同一actorの重複行でも定足数に達する
        assert!(phase_finished(&game, 3, 3, now));
    }

    #[test]
    fn test_phase_finished_by_deadline() {
        let now = Utc::now();
        let game = Game::new(
            "TEST01".to_string(),
            "LOBBY".to_string(),
            now,
            Duration::seconds(35),
        );
        assert!(phase_finished(&game, 0, 4, now + Duration::seconds(35)));
    }
}
