use std::{collections::HashMap, sync::Arc};

use tokio::sync::Mutex;

use crate::models::player::GamePlayer;
use crate::store::{GameStore, MemoryStore};

/// 勝利条件のフック。エンジン自体は勝敗を判定しない。
/// 設定されている場合、フェーズ解決のたびに呼ばれ、trueを返すと
/// ゲームは非アクティブになる
pub trait WinCondition: Send + Sync {
    fn finished(&self, players: &[GamePlayer]) -> bool;
}

impl<F> WinCondition for F
where
    F: Fn(&[GamePlayer]) -> bool + Send + Sync,
{
    fn finished(&self, players: &[GamePlayer]) -> bool {
        self(players)
    }
}

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn GameStore>,
    // ゲームコードごとの解決クリティカルセクション用ロック
    game_locks: Arc<Mutex<HashMap<String, Arc<Mutex<()>>>>>,
    pub win_condition: Option<Arc<dyn WinCondition>>,
}

impl AppState {
    pub fn new() -> Self {
        Self::with_store(Arc::new(MemoryStore::new()))
    }

    pub fn with_store(store: Arc<dyn GameStore>) -> Self {
        AppState {
            store,
            game_locks: Arc::new(Mutex::new(HashMap::new())),
            win_condition: None,
        }
    }

    pub fn with_win_condition(mut self, condition: Arc<dyn WinCondition>) -> Self {
        self.win_condition = Some(condition);
        self
    }

    /// ゲームコードに対応するロックを取得（なければ作成）。
    /// 別ゲームの操作同士は並行に進む
    pub async fn game_lock(&self, game_code: &str) -> Arc<Mutex<()>> {
        let mut locks = self.game_locks.lock().await;
        locks
            .entry(game_code.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
