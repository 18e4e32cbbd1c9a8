use std::fmt;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::action::ActionType;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Mafia,    // マフィア
    Don,      // ドン
    Civilian, // 市民
    Commisar, // 警視
    Surgeon,  // 外科医
    Homeless, // ホームレス
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Mafia => write!(f, "mafia"),
            Role::Don => write!(f, "don"),
            Role::Civilian => write!(f, "civilian"),
            Role::Commisar => write!(f, "commisar"),
            Role::Surgeon => write!(f, "surgeon"),
            Role::Homeless => write!(f, "homeless"),
        }
    }
}

impl Role {
    /// 夜に実行できるアクション種別。市民は夜の行動を持たない
    pub fn night_action(&self) -> Option<ActionType> {
        match self {
            Role::Mafia => Some(ActionType::Kill),
            Role::Don => Some(ActionType::VoteKill),
            Role::Commisar => Some(ActionType::Check),
            Role::Surgeon => Some(ActionType::Heal),
            Role::Homeless => Some(ActionType::Shoot),
            Role::Civilian => None,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RoleAssignmentError {
    #[error("ゲーム開始には最低4人のプレイヤーが必要です")]
    InsufficientPlayers(usize),
    #[error("{0}人のゲームには対応していません")]
    UnsupportedPlayerCount(usize),
}

/// プレイヤー数に応じた役職プール
pub fn role_pool<R: Rng + ?Sized>(
    count: usize,
    rng: &mut R,
) -> Result<Vec<Role>, RoleAssignmentError> {
    use Role::*;
    match count {
        n if n < 4 => Err(RoleAssignmentError::InsufficientPlayers(n)),
        4 => Ok(vec![Mafia, Civilian, Civilian, Commisar]),
        5 => {
            // 5人構成では特殊役職が警視か外科医のどちらかになる
            let special = if rng.gen_bool(0.5) { Commisar } else { Surgeon };
            Ok(vec![Mafia, Civilian, Civilian, Civilian, special])
        }
        6 => Ok(vec![Don, Mafia, Civilian, Civilian, Commisar, Surgeon]),
        7 => Ok(vec![Mafia, Don, Civilian, Civilian, Commisar, Surgeon, Homeless]),
        n => Err(RoleAssignmentError::UnsupportedPlayerCount(n)),
    }
}

/// プールをシャッフルしてロスター順に割り当てる
pub fn assign_roles<R: Rng + ?Sized>(
    roster: &[String],
    rng: &mut R,
) -> Result<Vec<(String, Role)>, RoleAssignmentError> {
    let mut pool = role_pool(roster.len(), rng)?;
    pool.shuffle(rng);
    Ok(roster.iter().cloned().zip(pool).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn names(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("player{}", i)).collect()
    }

    #[test]
    fn test_assignment_covers_all_players() {
        let mut rng = StdRng::seed_from_u64(7);
        for n in 4..=7 {
            let assigned = assign_roles(&names(n), &mut rng).unwrap();
            assert_eq!(assigned.len(), n);
            for (i, (name, _)) in assigned.iter().enumerate() {
                assert_eq!(name, &format!("player{}", i));
            }
        }
    }

    #[test]
    fn test_too_few_players() {
        let mut rng = StdRng::seed_from_u64(7);
        assert!(matches!(
            assign_roles(&names(3), &mut rng),
            Err(RoleAssignmentError::InsufficientPlayers(3))
        ));
    }

    #[test]
    fn test_too_many_players() {
        let mut rng = StdRng::seed_from_u64(7);
        assert!(matches!(
            assign_roles(&names(8), &mut rng),
            Err(RoleAssignmentError::UnsupportedPlayerCount(8))
        ));
    }

    #[test]
    fn test_night_action_mapping() {
        assert_eq!(Role::Mafia.night_action(), Some(ActionType::Kill));
        assert_eq!(Role::Don.night_action(), Some(ActionType::VoteKill));
        assert_eq!(Role::Surgeon.night_action(), Some(ActionType::Heal));
        assert_eq!(Role::Commisar.night_action(), Some(ActionType::Check));
        assert_eq!(Role::Homeless.night_action(), Some(ActionType::Shoot));
        assert_eq!(Role::Civilian.night_action(), None);
    }
}
