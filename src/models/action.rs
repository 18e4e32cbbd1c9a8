use std::fmt;

use serde::{Deserialize, Serialize};

use super::game::GamePhase;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionType {
    Kill,     // マフィアの襲撃
    VoteKill, // ドンの襲撃
    Heal,     // 外科医の治療
    Check,    // 警視の調査
    Shoot,    // ホームレスの銃撃
    Vote,     // 昼の投票
}

impl fmt::Display for ActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionType::Kill => write!(f, "kill"),
            ActionType::VoteKill => write!(f, "vote_kill"),
            ActionType::Heal => write!(f, "heal"),
            ActionType::Check => write!(f, "check"),
            ActionType::Shoot => write!(f, "shoot"),
            ActionType::Vote => write!(f, "vote"),
        }
    }
}

impl ActionType {
    /// 夜の解決でマフィア系の襲撃として扱われる種別
    pub fn is_mafia_kill(&self) -> bool {
        matches!(self, ActionType::Kill | ActionType::VoteKill)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameAction {
    pub game_code: String,
    pub phase: GamePhase,
    pub actor: String,
    pub action_type: ActionType,
    pub target: String,
}

/// 昼フェーズ専用の投票レコード。投票者ごとに常に1件のみ
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameVote {
    pub game_code: String,
    pub voter: String,
    pub target: String,
}
