use serde::{Deserialize, Serialize};

use super::role::Role;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GamePlayer {
    pub game_code: String,
    pub nickname: String,
    pub role: Role,
    pub alive: bool,
}

impl GamePlayer {
    pub fn new(game_code: String, nickname: String, role: Role) -> Self {
        Self {
            game_code,
            nickname,
            role,
            alive: true,
        }
    }
}
