use axum::{body::Bytes, extract::State, http::StatusCode, Json};

use crate::{
    error::{AppError, Result},
    models::{Action, ActionRequest, GameState},
};

use super::AppState;

/// GET /api/game
/// Returns the current board, initializing it on first access.
pub async fn get_game(State(state): State<AppState>) -> Result<Json<GameState>> {
    let game = state.game.load().await?;
    Ok(Json(game))
}

/// POST /api/game
/// Applies one action and returns the persisted board.
pub async fn post_action(State(state): State<AppState>, body: Bytes) -> Result<Json<GameState>> {
    let request = parse_action_request(&body)?;
    let action = Action::try_from(request)?;
    tracing::debug!("Dispatching game action={}", action.name());
    let game = state.game.apply(action).await?;
    Ok(Json(game))
}

/// OPTIONS /api/game
pub async fn preflight() -> StatusCode {
    StatusCode::OK
}

/// Any other method on /api/game.
pub async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}

// Internal helper that decodes the POST body; an empty body carries no action.
fn parse_action_request(body: &[u8]) -> Result<ActionRequest> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(ActionRequest::default());
    }
    serde_json::from_slice(body)
        .map_err(|e| AppError::validation(format!("Invalid request body: {}", e)))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::config::tests::sample_config;
    use crate::services::shuffle::tests::ScriptedRandom;
    use crate::services::GameService;
    use crate::store::memory::FailingStore;
    use crate::store::{GameStore, MemoryStore};
    use axum::response::{IntoResponse, Response};
    use serde_json::{json, Value};
    use std::sync::Arc;

    pub(crate) fn memory_state() -> (AppState, MemoryStore) {
        let config = sample_config();
        let store = MemoryStore::new();
        let game = GameService::new(
            Arc::new(store.clone()),
            Box::new(ScriptedRandom::new(vec![], vec![false])),
            config.game_state_key.clone(),
        );
        (AppState { game, config }, store)
    }

    async fn into_json(response: Response) -> (StatusCode, Value) {
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body readable");
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("json body")
        };
        (status, value)
    }

    async fn post(state: &AppState, body: Value) -> (StatusCode, Value) {
        let bytes = Bytes::from(body.to_string());
        let response = post_action(State(state.clone()), bytes).await.into_response();
        into_json(response).await
    }

    async fn get(state: &AppState) -> (StatusCode, Value) {
        into_json(get_game(State(state.clone())).await.into_response()).await
    }

    #[tokio::test]
    async fn initial_get_returns_default_board() {
        let (state, store) = memory_state();
        let (status, body) = get(&state).await;

        assert_eq!(status, StatusCode::OK);
        let squares = body["squares"].as_array().expect("squares array");
        assert_eq!(squares.len(), 100);
        assert!(squares.iter().all(Value::is_null));
        assert_eq!(body["team1Name"], "Patriots");
        assert_eq!(body["team2Name"], "Seahawks");
        assert_eq!(body["pricePerSquare"], 2.0);
        assert_eq!(body["numbersAssigned"], false);
        assert!(store.raw(&state.config.game_state_key).await.is_some());
    }

    #[tokio::test]
    async fn claim_then_duplicate_claim_scenario() {
        let (state, _store) = memory_state();

        let (status, body) = post(&state, json!({ "action": "claim", "index": 5, "initials": "AB" })).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["squares"][5], "AB");

        let (status, body) = post(&state, json!({ "action": "claim", "index": 5, "initials": "CD" })).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "error": "Square already claimed" }));

        let (_, body) = get(&state).await;
        assert_eq!(body["squares"][5], "AB");
    }

    #[tokio::test]
    async fn update_price_twice_is_idempotent() {
        let (state, _store) = memory_state();
        for _ in 0..2 {
            let (status, body) = post(&state, json!({ "action": "update-price", "price": 3 })).await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(body["pricePerSquare"], 3.0);
        }
    }

    #[tokio::test]
    async fn set_score_accepts_numeric_scores() {
        let (state, _store) = memory_state();
        let (status, body) = post(
            &state,
            json!({ "action": "set-score", "quarter": 2, "team1Score": 10, "team2Score": "7" }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["quarterScores"][2], json!({ "team1": "10", "team2": "7" }));
        assert_eq!(body["quarterScores"][1], json!({ "team1": "", "team2": "" }));
    }

    #[tokio::test]
    async fn unknown_action_and_bad_body_are_client_errors() {
        let (state, store) = memory_state();

        let (status, body) = post(&state, json!({ "action": "double-down" })).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Invalid action");

        let response = post_action(State(state.clone()), Bytes::from_static(b"{oops"))
            .await
            .into_response();
        let (status, body) = into_json(response).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"]
            .as_str()
            .unwrap_or_default()
            .starts_with("Invalid request body"));

        let response = post_action(State(state.clone()), Bytes::new()).await.into_response();
        let (status, body) = into_json(response).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Invalid action");

        // Shape errors are caught before the store is read.
        assert!(store.raw(&state.config.game_state_key).await.is_none());
    }

    #[tokio::test]
    async fn assign_numbers_before_full_board_is_rejected() {
        let (state, _store) = memory_state();
        let (status, body) = post(&state, json!({ "action": "assign-numbers" })).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body["error"],
            "All squares must be claimed before assigning numbers"
        );
    }

    #[tokio::test]
    async fn reset_then_get_keeps_teams_and_price() {
        let (state, _store) = memory_state();
        post(&state, json!({ "action": "claim", "index": 0, "initials": "jk" })).await;
        post(&state, json!({ "action": "update-teams", "team1Name": "Chiefs", "team2Name": "" })).await;
        post(&state, json!({ "action": "update-price", "price": 10 })).await;
        post(&state, json!({ "action": "set-score", "quarter": 0, "team1Score": "3", "team2Score": "0" })).await;

        let (status, _) = post(&state, json!({ "action": "reset" })).await;
        assert_eq!(status, StatusCode::OK);

        let (_, body) = get(&state).await;
        assert!(body["squares"].as_array().expect("array").iter().all(Value::is_null));
        assert_eq!(body["numbersAssigned"], false);
        assert_eq!(body["team1Name"], "Chiefs");
        assert_eq!(body["team2Name"], "Seahawks");
        assert_eq!(body["pricePerSquare"], 10.0);
        assert_eq!(body["quarterScores"][0], json!({ "team1": "", "team2": "" }));
    }

    #[tokio::test]
    async fn corrupt_store_document_is_a_server_error() {
        let (state, store) = memory_state();
        store.insert_raw(&state.config.game_state_key, "42").await;

        let (status, body) = get(&state).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Internal server error");
        assert!(body["message"].is_string());
    }

    #[tokio::test]
    async fn store_write_failure_is_a_server_error() {
        let (mut state, _store) = memory_state();
        let key = state.config.game_state_key.clone();
        state.game = GameService::new(
            Arc::new(FailingStore::on_set(&key, "READONLY replica")),
            Box::new(ScriptedRandom::new(vec![], vec![])),
            key,
        );

        let (status, body) = post(&state, json!({ "action": "claim", "index": 5, "initials": "AB" })).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Internal server error");
        assert!(body["message"]
            .as_str()
            .unwrap_or_default()
            .contains("READONLY replica"));
    }

    #[tokio::test]
    async fn store_read_failure_is_a_server_error() {
        let (mut state, _store) = memory_state();
        let key = state.config.game_state_key.clone();
        state.game = GameService::new(
            Arc::new(FailingStore::on_get("connection refused")),
            Box::new(ScriptedRandom::new(vec![], vec![])),
            key,
        );

        let (status, body) = get(&state).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Internal server error");
        assert!(body["message"]
            .as_str()
            .unwrap_or_default()
            .contains("connection refused"));

        let (status, _) = post(&state, json!({ "action": "clear-board" })).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn erase_and_clear_board_through_handler() {
        let (state, store) = memory_state();
        post(&state, json!({ "action": "claim", "index": 1, "initials": "aa" })).await;
        post(&state, json!({ "action": "claim", "index": 2, "initials": "bb" })).await;

        let (status, body) = post(&state, json!({ "action": "erase", "index": 1 })).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["squares"][1].is_null());
        assert_eq!(body["squares"][2], "BB");

        let (status, body) = post(&state, json!({ "action": "erase", "index": -1 })).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Invalid square index");

        let (status, body) = post(&state, json!({ "action": "clear-board" })).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["squares"][2].is_null());

        let persisted = store
            .get(&state.config.game_state_key)
            .await
            .expect("read ok")
            .expect("present");
        assert_eq!(persisted.claimed_count(), 0);
    }

    #[tokio::test]
    async fn options_and_unsupported_methods() {
        let response = preflight().await.into_response();
        let (status, body) = into_json(response).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, Value::Null);

        let (status, body) = into_json(method_not_allowed().await.into_response()).await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(body, json!({ "error": "Method not allowed" }));
    }
}
