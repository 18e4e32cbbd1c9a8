use serde::{Deserialize, Serialize};

// ロビーの作成・参加はこのサーバーの管轄外。ゲーム開始時に
// ホスト確認とロスター取得のために読み取るだけ
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lobby {
    pub code: String,
    pub host: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LobbyPlayer {
    pub lobby_code: String,
    pub nickname: String,
}
