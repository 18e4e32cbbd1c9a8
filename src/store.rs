use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::models::{
    action::{GameAction, GameVote},
    game::{Game, GamePhase},
    lobby::{Lobby, LobbyPlayer},
    player::GamePlayer,
};

pub mod memory;
pub mod supabase;

pub use memory::MemoryStore;
pub use supabase::SupabaseStore;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("ストアへのリクエストに失敗しました: {0}")]
    RequestFailed(String),
    #[error("ストアの応答を解析できませんでした: {0}")]
    InvalidResponse(String),
}

/// 永続化レイヤーの契約。ゲームエンジンはこのトレイト越しにしか
/// データに触れない。`actions_for_phase` は挿入順を保証すること
/// （夜の解決が「後勝ち」の走査順に依存するため）
#[async_trait]
pub trait GameStore: Send + Sync {
    // --- lobbies (読み取り側の契約のみ) ---
    async fn get_lobby(&self, code: &str) -> Result<Option<Lobby>, StoreError>;
    async fn insert_lobby(&self, lobby: Lobby) -> Result<(), StoreError>;
    async fn lobby_players(&self, code: &str) -> Result<Vec<LobbyPlayer>, StoreError>;
    async fn insert_lobby_player(&self, player: LobbyPlayer) -> Result<(), StoreError>;

    // --- games ---
    async fn get_game(&self, game_code: &str) -> Result<Option<Game>, StoreError>;
    async fn insert_game(&self, game: Game) -> Result<(), StoreError>;
    async fn update_game_phase(
        &self,
        game_code: &str,
        phase: GamePhase,
        phase_start: DateTime<Utc>,
        phase_end: DateTime<Utc>,
    ) -> Result<(), StoreError>;
    async fn update_game_active(&self, game_code: &str, is_active: bool) -> Result<(), StoreError>;

    // --- game players ---
    async fn insert_player(&self, player: GamePlayer) -> Result<(), StoreError>;
    async fn get_player(
        &self,
        game_code: &str,
        nickname: &str,
    ) -> Result<Option<GamePlayer>, StoreError>;
    async fn players_for_game(&self, game_code: &str) -> Result<Vec<GamePlayer>, StoreError>;
    async fn set_player_alive(
        &self,
        game_code: &str,
        nickname: &str,
        alive: bool,
    ) -> Result<(), StoreError>;

    // --- game actions ---
    async fn insert_action(&self, action: GameAction) -> Result<(), StoreError>;
    async fn delete_actions_by_actor(&self, game_code: &str, actor: &str)
        -> Result<(), StoreError>;
    async fn actions_for_phase(
        &self,
        game_code: &str,
        phase: GamePhase,
    ) -> Result<Vec<GameAction>, StoreError>;
    async fn delete_actions_for_phase(
        &self,
        game_code: &str,
        phase: GamePhase,
    ) -> Result<(), StoreError>;

    // --- game votes ---
    async fn insert_vote(&self, vote: GameVote) -> Result<(), StoreError>;
    async fn delete_vote_by_voter(&self, game_code: &str, voter: &str) -> Result<(), StoreError>;
    async fn votes_for_game(&self, game_code: &str) -> Result<Vec<GameVote>, StoreError>;
}
