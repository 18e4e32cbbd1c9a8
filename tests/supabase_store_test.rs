use chrono::{TimeZone, Utc};
use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use mafia_server::models::action::{ActionType, GameAction};
use mafia_server::models::game::GamePhase;
use mafia_server::store::{GameStore, StoreError, SupabaseStore};

fn store_for(server: &MockServer) -> SupabaseStore {
    SupabaseStore::new(server.uri(), "test-key".to_string())
}

#[tokio::test]
async fn test_get_game_parses_supabase_row() {
    let server = MockServer::start().await;

    // Supabaseは主キーなど余分なカラムも返すが、無視して読めること
    Mock::given(method("GET"))
        .and(path("/rest/v1/games"))
        .and(query_param("game_code", "eq.ABC123"))
        .and(header("apikey", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "id": 42,
            "created_at": "2026-08-07T12:00:00Z",
            "game_code": "ABC123",
            "lobby_code": "LOBBY",
            "phase": "night",
            "phase_start": "2026-08-07T12:00:00Z",
            "phase_end": "2026-08-07T12:00:35Z",
            "is_active": true
        }])))
        .mount(&server)
        .await;

    let store = store_for(&server);
    let game = store.get_game("ABC123").await.unwrap().unwrap();

    assert_eq!(game.game_code, "ABC123");
    assert_eq!(game.phase, GamePhase::Night);
    assert!(game.is_active);
    assert_eq!(
        game.phase_start,
        Utc.with_ymd_and_hms(2026, 8, 7, 12, 0, 0).unwrap()
    );
}

#[tokio::test]
async fn test_get_game_missing_returns_none() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/games"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let store = store_for(&server);
    assert!(store.get_game("NOPE01").await.unwrap().is_none());
}

#[tokio::test]
async fn test_insert_action_posts_to_game_actions() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/game_actions"))
        .and(header("apikey", "test-key"))
        .and(header("Prefer", "return=minimal"))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    let store = store_for(&server);
    store
        .insert_action(GameAction {
            game_code: "ABC123".to_string(),
            phase: GamePhase::Night,
            actor: "alice".to_string(),
            action_type: ActionType::Kill,
            target: "bob".to_string(),
        })
        .await
        .unwrap();
}

#[tokio::test]
async fn test_actions_for_phase_requests_insertion_order() {
    let server = MockServer::start().await;

    // 走査順の契約を守るため、主キー昇順で要求すること
    Mock::given(method("GET"))
        .and(path("/rest/v1/game_actions"))
        .and(query_param("game_code", "eq.ABC123"))
        .and(query_param("phase", "eq.night"))
        .and(query_param("order", "id.asc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "id": 1,
                "game_code": "ABC123",
                "phase": "night",
                "actor": "alice",
                "action_type": "kill",
                "target": "bob"
            },
            {
                "id": 2,
                "game_code": "ABC123",
                "phase": "night",
                "actor": "carol",
                "action_type": "heal",
                "target": "bob"
            }
        ])))
        .mount(&server)
        .await;

    let store = store_for(&server);
    let actions = store
        .actions_for_phase("ABC123", GamePhase::Night)
        .await
        .unwrap();

    assert_eq!(actions.len(), 2);
    assert_eq!(actions[0].action_type, ActionType::Kill);
    assert_eq!(actions[1].action_type, ActionType::Heal);
}

#[tokio::test]
async fn test_delete_actions_by_actor_filters_rows() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/rest/v1/game_actions"))
        .and(query_param("game_code", "eq.ABC123"))
        .and(query_param("actor", "eq.alice"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let store = store_for(&server);
    store
        .delete_actions_by_actor("ABC123", "alice")
        .await
        .unwrap();
}

#[tokio::test]
async fn test_server_error_becomes_store_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/games"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let store = store_for(&server);
    let result = store.get_game("ABC123").await;
    assert!(matches!(result, Err(StoreError::RequestFailed(_))));
}
