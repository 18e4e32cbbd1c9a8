use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::json;

use crate::models::{
    action::{GameAction, GameVote},
    game::{Game, GamePhase},
    lobby::{Lobby, LobbyPlayer},
    player::GamePlayer,
};

use super::{GameStore, StoreError};

/// Supabase REST API を使う本番向けストア
#[derive(Clone)]
pub struct SupabaseStore {
    client: Client,
    supabase_url: String,
    supabase_key: String,
}

impl SupabaseStore {
    pub fn new(supabase_url: String, supabase_key: String) -> Self {
        Self {
            client: Client::new(),
            supabase_url,
            supabase_key,
        }
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.supabase_url, table)
    }

    async fn select<T: DeserializeOwned>(
        &self,
        table: &str,
        query: &[(&str, String)],
    ) -> Result<Vec<T>, StoreError> {
        let response = self
            .client
            .get(self.table_url(table))
            .header("apikey", &self.supabase_key)
            .header("Authorization", format!("Bearer {}", self.supabase_key))
            .query(query)
            .send()
            .await
            .map_err(|e| StoreError::RequestFailed(e.to_string()))?
            .error_for_status()
            .map_err(|e| StoreError::RequestFailed(e.to_string()))?;

        response
            .json()
            .await
            .map_err(|e| StoreError::InvalidResponse(e.to_string()))
    }

    async fn insert_row<T: Serialize>(&self, table: &str, row: &T) -> Result<(), StoreError> {
        self.client
            .post(self.table_url(table))
            .header("apikey", &self.supabase_key)
            .header("Authorization", format!("Bearer {}", self.supabase_key))
            .header("Content-Type", "application/json")
            .header("Prefer", "return=minimal")
            .json(row)
            .send()
            .await
            .map_err(|e| StoreError::RequestFailed(e.to_string()))?
            .error_for_status()
            .map_err(|e| StoreError::RequestFailed(e.to_string()))?;
        Ok(())
    }

    async fn patch_rows(
        &self,
        table: &str,
        query: &[(&str, String)],
        body: serde_json::Value,
    ) -> Result<(), StoreError> {
        self.client
            .patch(self.table_url(table))
            .header("apikey", &self.supabase_key)
            .header("Authorization", format!("Bearer {}", self.supabase_key))
            .header("Content-Type", "application/json")
            .header("Prefer", "return=minimal")
            .query(query)
            .json(&body)
            .send()
            .await
            .map_err(|e| StoreError::RequestFailed(e.to_string()))?
            .error_for_status()
            .map_err(|e| StoreError::RequestFailed(e.to_string()))?;
        Ok(())
    }

    async fn delete_rows(&self, table: &str, query: &[(&str, String)]) -> Result<(), StoreError> {
        self.client
            .delete(self.table_url(table))
            .header("apikey", &self.supabase_key)
            .header("Authorization", format!("Bearer {}", self.supabase_key))
            .query(query)
            .send()
            .await
            .map_err(|e| StoreError::RequestFailed(e.to_string()))?
            .error_for_status()
            .map_err(|e| StoreError::RequestFailed(e.to_string()))?;
        Ok(())
    }
}

fn eq(value: impl std::fmt::Display) -> String {
    format!("eq.{}", value)
}

#[async_trait]
impl GameStore for SupabaseStore {
    async fn get_lobby(&self, code: &str) -> Result<Option<Lobby>, StoreError> {
        let rows: Vec<Lobby> = self.select("lobbies", &[("code", eq(code))]).await?;
        Ok(rows.into_iter().next())
    }

    async fn insert_lobby(&self, lobby: Lobby) -> Result<(), StoreError> {
        self.insert_row("lobbies", &lobby).await
    }

    async fn lobby_players(&self, code: &str) -> Result<Vec<LobbyPlayer>, StoreError> {
        self.select("lobby_players", &[("lobby_code", eq(code))])
            .await
    }

    async fn insert_lobby_player(&self, player: LobbyPlayer) -> Result<(), StoreError> {
        self.insert_row("lobby_players", &player).await
    }

    async fn get_game(&self, game_code: &str) -> Result<Option<Game>, StoreError> {
        let rows: Vec<Game> = self.select("games", &[("game_code", eq(game_code))]).await?;
        Ok(rows.into_iter().next())
    }

    async fn insert_game(&self, game: Game) -> Result<(), StoreError> {
        self.insert_row("games", &game).await
    }

    async fn update_game_phase(
        &self,
        game_code: &str,
        phase: GamePhase,
        phase_start: DateTime<Utc>,
        phase_end: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        self.patch_rows(
            "games",
            &[("game_code", eq(game_code))],
            json!({
                "phase": phase,
                "phase_start": phase_start,
                "phase_end": phase_end,
            }),
        )
        .await
    }

    async fn update_game_active(&self, game_code: &str, is_active: bool) -> Result<(), StoreError> {
        self.patch_rows(
            "games",
            &[("game_code", eq(game_code))],
            json!({ "is_active": is_active }),
        )
        .await
    }

    async fn insert_player(&self, player: GamePlayer) -> Result<(), StoreError> {
        self.insert_row("game_players", &player).await
    }

    async fn get_player(
        &self,
        game_code: &str,
        nickname: &str,
    ) -> Result<Option<GamePlayer>, StoreError> {
        let rows: Vec<GamePlayer> = self
            .select(
                "game_players",
                &[("game_code", eq(game_code)), ("nickname", eq(nickname))],
            )
            .await?;
        Ok(rows.into_iter().next())
    }

    async fn players_for_game(&self, game_code: &str) -> Result<Vec<GamePlayer>, StoreError> {
        self.select("game_players", &[("game_code", eq(game_code))])
            .await
    }

    async fn set_player_alive(
        &self,
        game_code: &str,
        nickname: &str,
        alive: bool,
    ) -> Result<(), StoreError> {
        self.patch_rows(
            "game_players",
            &[("game_code", eq(game_code)), ("nickname", eq(nickname))],
            json!({ "alive": alive }),
        )
        .await
    }

    async fn insert_action(&self, action: GameAction) -> Result<(), StoreError> {
        self.insert_row("game_actions", &action).await
    }

    async fn delete_actions_by_actor(
        &self,
        game_code: &str,
        actor: &str,
    ) -> Result<(), StoreError> {
        self.delete_rows(
            "game_actions",
            &[("game_code", eq(game_code)), ("actor", eq(actor))],
        )
        .await
    }

    async fn actions_for_phase(
        &self,
        game_code: &str,
        phase: GamePhase,
    ) -> Result<Vec<GameAction>, StoreError> {
        // 挿入順で返す契約なので主キー昇順で取得する
        self.select(
            "game_actions",
            &[
                ("game_code", eq(game_code)),
                ("phase", eq(phase)),
                ("order", "id.asc".to_string()),
            ],
        )
        .await
    }

    async fn delete_actions_for_phase(
        &self,
        game_code: &str,
        phase: GamePhase,
    ) -> Result<(), StoreError> {
        self.delete_rows(
            "game_actions",
            &[("game_code", eq(game_code)), ("phase", eq(phase))],
        )
        .await
    }

    async fn insert_vote(&self, vote: GameVote) -> Result<(), StoreError> {
        self.insert_row("game_votes", &vote).await
    }

    async fn delete_vote_by_voter(&self, game_code: &str, voter: &str) -> Result<(), StoreError> {
        self.delete_rows(
            "game_votes",
            &[("game_code", eq(game_code)), ("voter", eq(voter))],
        )
        .await
    }

    async fn votes_for_game(&self, game_code: &str) -> Result<Vec<GameVote>, StoreError> {
        self.select("game_votes", &[("game_code", eq(game_code))])
            .await
    }
}
