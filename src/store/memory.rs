use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;

use crate::models::{
    action::{GameAction, GameVote},
    game::{Game, GamePhase},
    lobby::{Lobby, LobbyPlayer},
    player::GamePlayer,
};

use super::{GameStore, StoreError};

/// インメモリのストア実装。開発とテストのデフォルト。
/// アクションはVecで保持し、挿入順をそのまま走査順とする
#[derive(Default)]
pub struct MemoryStore {
    lobbies: Mutex<HashMap<String, Lobby>>,
    lobby_players: Mutex<Vec<LobbyPlayer>>,
    games: Mutex<HashMap<String, Game>>,
    players: Mutex<Vec<GamePlayer>>,
    actions: Mutex<Vec<GameAction>>,
    votes: Mutex<Vec<GameVote>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl GameStore for MemoryStore {
    async fn get_lobby(&self, code: &str) -> Result<Option<Lobby>, StoreError> {
        Ok(self.lobbies.lock().await.get(code).cloned())
    }

    async fn insert_lobby(&self, lobby: Lobby) -> Result<(), StoreError> {
        self.lobbies.lock().await.insert(lobby.code.clone(), lobby);
        Ok(())
    }

    async fn lobby_players(&self, code: &str) -> Result<Vec<LobbyPlayer>, StoreError> {
        Ok(self
            .lobby_players
            .lock()
            .await
            .iter()
            .filter(|p| p.lobby_code == code)
            .cloned()
            .collect())
    }

    async fn insert_lobby_player(&self, player: LobbyPlayer) -> Result<(), StoreError> {
        self.lobby_players.lock().await.push(player);
        Ok(())
    }

    async fn get_game(&self, game_code: &str) -> Result<Option<Game>, StoreError> {
        Ok(self.games.lock().await.get(game_code).cloned())
    }

    async fn insert_game(&self, game: Game) -> Result<(), StoreError> {
        self.games.lock().await.insert(game.game_code.clone(), game);
        Ok(())
    }

    async fn update_game_phase(
        &self,
        game_code: &str,
        phase: GamePhase,
        phase_start: DateTime<Utc>,
        phase_end: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        if let Some(game) = self.games.lock().await.get_mut(game_code) {
            game.phase = phase;
            game.phase_start = phase_start;
            game.phase_end = phase_end;
        }
        Ok(())
    }

    async fn update_game_active(&self, game_code: &str, is_active: bool) -> Result<(), StoreError> {
        if let Some(game) = self.games.lock().await.get_mut(game_code) {
            game.is_active = is_active;
        }
        Ok(())
    }

    async fn insert_player(&self, player: GamePlayer) -> Result<(), StoreError> {
        self.players.lock().await.push(player);
        Ok(())
    }

    async fn get_player(
        &self,
        game_code: &str,
        nickname: &str,
    ) -> Result<Option<GamePlayer>, StoreError> {
        Ok(self
            .players
            .lock()
            .await
            .iter()
            .find(|p| p.game_code == game_code && p.nickname == nickname)
            .cloned())
    }

    async fn players_for_game(&self, game_code: &str) -> Result<Vec<GamePlayer>, StoreError> {
        Ok(self
            .players
            .lock()
            .await
            .iter()
            .filter(|p| p.game_code == game_code)
            .cloned()
            .collect())
    }

    async fn set_player_alive(
        &self,
        game_code: &str,
        nickname: &str,
        alive: bool,
    ) -> Result<(), StoreError> {
        if let Some(player) = self
            .players
            .lock()
            .await
            .iter_mut()
            .find(|p| p.game_code == game_code && p.nickname == nickname)
        {
            player.alive = alive;
        }
        Ok(())
    }

    async fn insert_action(&self, action: GameAction) -> Result<(), StoreError> {
        self.actions.lock().await.push(action);
        Ok(())
    }

    async fn delete_actions_by_actor(
        &self,
        game_code: &str,
        actor: &str,
    ) -> Result<(), StoreError> {
        self.actions
            .lock()
            .await
            .retain(|a| !(a.game_code == game_code && a.actor == actor));
        Ok(())
    }

    async fn actions_for_phase(
        &self,
        game_code: &str,
        phase: GamePhase,
    ) -> Result<Vec<GameAction>, StoreError> {
        Ok(self
            .actions
            .lock()
            .await
            .iter()
            .filter(|a| a.game_code == game_code && a.phase == phase)
            .cloned()
            .collect())
    }

    async fn delete_actions_for_phase(
        &self,
        game_code: &str,
        phase: GamePhase,
    ) -> Result<(), StoreError> {
        self.actions
            .lock()
            .await
            .retain(|a| !(a.game_code == game_code && a.phase == phase));
        Ok(())
    }

    async fn insert_vote(&self, vote: GameVote) -> Result<(), StoreError> {
        self.votes.lock().await.push(vote);
        Ok(())
    }

    async fn delete_vote_by_voter(&self, game_code: &str, voter: &str) -> Result<(), StoreError> {
        self.votes
            .lock()
            .await
            .retain(|v| !(v.game_code == game_code && v.voter == voter));
        Ok(())
    }

    async fn votes_for_game(&self, game_code: &str) -> Result<Vec<GameVote>, StoreError> {
        Ok(self
            .votes
            .lock()
            .await
            .iter()
            .filter(|v| v.game_code == game_code)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::action::ActionType;

    fn kill_action(actor: &str, target: &str) -> GameAction {
        GameAction {
            game_code: "G00001".to_string(),
            phase: GamePhase::Night,
            actor: actor.to_string(),
            action_type: ActionType::Kill,
            target: target.to_string(),
        }
    }

    #[tokio::test]
    async fn test_actions_keep_insertion_order() {
        let store = MemoryStore::new();
        store.insert_action(kill_action("a", "x")).await.unwrap();
        store.insert_action(kill_action("b", "y")).await.unwrap();
        store.insert_action(kill_action("c", "z")).await.unwrap();

        let actions = store
            .actions_for_phase("G00001", GamePhase::Night)
            .await
            .unwrap();
        let actors: Vec<_> = actions.iter().map(|a| a.actor.as_str()).collect();
        assert_eq!(actors, vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn test_delete_by_actor_is_scoped_to_game() {
        let store = MemoryStore::new();
        store.insert_action(kill_action("a", "x")).await.unwrap();
        let mut other = kill_action("a", "x");
        other.game_code = "G00002".to_string();
        store.insert_action(other).await.unwrap();

        store.delete_actions_by_actor("G00001", "a").await.unwrap();

        assert!(store
            .actions_for_phase("G00001", GamePhase::Night)
            .await
            .unwrap()
            .is_empty());
        assert_eq!(
            store
                .actions_for_phase("G00002", GamePhase::Night)
                .await
                .unwrap()
                .len(),
            1
        );
    }
}
