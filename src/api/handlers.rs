use axum::Json;
use axum::extract::{Query, State};

use crate::variant::{Category, VariantRules, chess960, validate_fen};

use super::errors::ApiError;
use super::models::*;
use super::state::SharedState;

/// Category named by the request, else the configured default.
fn resolve_category(state: &SharedState, requested: Option<&str>) -> Category {
    requested.map_or_else(|| state.config.default_category.clone(), Category::from)
}

// =========================================================================
// Health
// =========================================================================

/// GET /health
pub async fn health(State(state): State<SharedState>) -> Json<HealthResponse> {
    let uptime = state.start_time.elapsed().as_secs();
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        language: "rust".to_string(),
        engine: "fics-variants".to_string(),
        uptime,
    })
}

// =========================================================================
// Validate FEN
// =========================================================================

/// POST /api/fen/validate
pub async fn validate(
    State(state): State<SharedState>,
    Json(input): Json<ValidateRequest>,
) -> Json<ValidateResponse> {
    let category = resolve_category(&state, input.category.as_deref());
    let error = validate_fen(&input.fen, &category)
        .err()
        .map(|e| e.to_string());
    Json(ValidateResponse {
        valid: error.is_none(),
        error,
    })
}

// =========================================================================
// Make Move
// =========================================================================

/// POST /api/moves
pub async fn make_move(
    State(state): State<SharedState>,
    Json(input): Json<MoveRequest>,
) -> Result<Json<MoveResponse>, ApiError> {
    let category = resolve_category(&state, input.category.as_deref());
    category.ensure_supported()?;
    let start_fen = input.start_fen.as_deref().unwrap_or(&input.fen);
    let holdings = input
        .holdings
        .as_ref()
        .map(HoldingsField::to_holdings)
        .transpose()?;
    let mv = input.mv.to_input()?;

    let rules = VariantRules::from_start_fen(category, start_fen)?;
    let (fen, played) = rules.interpret_fen(&input.fen, &mv, holdings.as_ref())?;
    tracing::debug!(category = %rules.category(), san = %played.san, "move played");

    let holdings = holdings.map(|h| h.after_move(&played, rules.category()).to_string());
    Ok(Json(MoveResponse {
        fen,
        mv: move_info(&played),
        holdings,
    }))
}

// =========================================================================
// Destinations
// =========================================================================

/// POST /api/destinations
pub async fn destinations(
    State(state): State<SharedState>,
    Json(input): Json<DestinationsRequest>,
) -> Result<Json<DestinationsResponse>, ApiError> {
    let category = resolve_category(&state, input.category.as_deref());
    category.ensure_supported()?;
    let start_fen = input.start_fen.as_deref().unwrap_or(&input.fen);
    let holdings = input
        .holdings
        .as_ref()
        .map(HoldingsField::to_holdings)
        .transpose()?;

    let rules = VariantRules::from_start_fen(category, start_fen)?;
    let dests = rules.destinations_fen(&input.fen, holdings.as_ref())?;
    Ok(Json(DestinationsResponse {
        dests: dests_to_api(&dests),
    }))
}

// =========================================================================
// Chess960
// =========================================================================

/// GET /api/chess960?idn=518
pub async fn chess960_start(Query(query): Query<Chess960Query>) -> Json<Chess960Response> {
    let start = chess960::generate(query.idn);
    Json(Chess960Response {
        idn: start.idn,
        fen: start.fen,
    })
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::router::create_router;
    use crate::api::state::AppState;
    use crate::config::AppConfig;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    fn test_state() -> SharedState {
        AppState::new(AppConfig::default())
    }

    async fn body_json(response: axum::http::Response<Body>) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn post_json(
        state: SharedState,
        uri: &str,
        body: serde_json::Value,
    ) -> axum::http::Response<Body> {
        create_router(state)
            .oneshot(
                Request::post(uri)
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap()
    }

    const START: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

    // --- Health ---

    #[tokio::test]
    async fn health_returns_200() {
        let app = create_router(test_state());
        let resp = app
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let json = body_json(resp).await;
        assert_eq!(json["status"], "ok");
        assert_eq!(json["engine"], "fics-variants");
    }

    #[tokio::test]
    async fn not_found_returns_404() {
        let app = create_router(test_state());
        let resp = app
            .oneshot(Request::get("/nonexistent").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn cors_preflight() {
        let app = create_router(test_state());
        let resp = app
            .oneshot(
                Request::builder()
                    .method("OPTIONS")
                    .uri("/api/moves")
                    .header("Origin", "http://localhost:3001")
                    .header("Access-Control-Request-Method", "POST")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert!(resp.headers().get("access-control-allow-origin").is_some());
    }

    // --- Validate ---

    #[tokio::test]
    async fn validate_accepts_start_position() {
        let resp = post_json(test_state(), "/api/fen/validate", serde_json::json!({ "fen": START })).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let json = body_json(resp).await;
        assert_eq!(json["valid"], true);
        assert!(json.get("error").is_none());
    }

    #[tokio::test]
    async fn validate_reports_first_problem() {
        let resp = post_json(
            test_state(),
            "/api/fen/validate",
            serde_json::json!({ "fen": "8/8/8/8/8/8/8/4K3 w - - 0 1", "category": "crazyhouse" }),
        )
        .await;
        let json = body_json(resp).await;
        assert_eq!(json["valid"], false);
        assert_eq!(json["error"], "Missing king.");
    }

    // --- Moves ---

    #[tokio::test]
    async fn move_from_text() {
        let resp = post_json(
            test_state(),
            "/api/moves",
            serde_json::json!({ "fen": START, "move": "e2-e4" }),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);
        let json = body_json(resp).await;
        assert_eq!(
            json["fen"],
            "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1"
        );
        assert_eq!(json["move"]["san"], "e4");
        assert_eq!(json["move"]["coordinate"], "e2-e4");
        assert_eq!(json["move"]["piece"], "pawn");
        assert_eq!(json["move"]["flags"], "b");
        assert!(json.get("holdings").is_none());
    }

    #[tokio::test]
    async fn move_from_fields() {
        let resp = post_json(
            test_state(),
            "/api/moves",
            serde_json::json!({ "fen": START, "move": { "from": "g1", "to": "f3" } }),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);
        let json = body_json(resp).await;
        assert_eq!(json["move"]["san"], "Nf3");
        assert_eq!(json["move"]["color"], "white");
    }

    #[tokio::test]
    async fn crazyhouse_drop_updates_holdings() {
        let resp = post_json(
            test_state(),
            "/api/moves",
            serde_json::json!({
                "fen": "4k3/8/8/8/8/8/8/4K3 w - - 0 20",
                "category": "crazyhouse",
                "move": { "piece": "N", "to": "e4" },
                "holdings": "NNp",
            }),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);
        let json = body_json(resp).await;
        assert_eq!(json["fen"], "4k3/8/8/8/4N3/8/8/4K3 b - - 0 20");
        assert_eq!(json["move"]["san"], "N@e4");
        assert_eq!(json["move"]["coordinate"], "N@e4");
        assert_eq!(json["move"]["flags"], "d");
        assert_eq!(json["holdings"], "Np");
    }

    #[tokio::test]
    async fn illegal_move_is_rejected() {
        let resp = post_json(
            test_state(),
            "/api/moves",
            serde_json::json!({ "fen": START, "move": "e2e5" }),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let json = body_json(resp).await;
        assert_eq!(json["error"]["code"], "INVALID_MOVE");
    }

    #[tokio::test]
    async fn unsupported_category_is_rejected() {
        let resp = post_json(
            test_state(),
            "/api/moves",
            serde_json::json!({ "fen": START, "move": "e2e4", "category": "atomic" }),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let json = body_json(resp).await;
        assert_eq!(json["error"]["code"], "UNSUPPORTED_CATEGORY");
    }

    #[tokio::test]
    async fn bad_holdings_are_rejected() {
        let resp = post_json(
            test_state(),
            "/api/moves",
            serde_json::json!({
                "fen": START,
                "category": "bughouse",
                "move": "e2e4",
                "holdings": "PX",
            }),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let json = body_json(resp).await;
        assert_eq!(json["error"]["code"], "INVALID_REQUEST");
    }

    #[tokio::test]
    async fn fr_castling_uses_start_fen() {
        let resp = post_json(
            test_state(),
            "/api/moves",
            serde_json::json!({
                "fen": "1k6/8/8/8/8/8/8/RK4R1 w KQ - 0 1",
                "startFen": "1k6/8/8/8/8/8/8/RK4R1 w KQ - 0 1",
                "category": "wild/fr",
                "move": { "from": "b1", "to": "g1" },
            }),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);
        let json = body_json(resp).await;
        assert_eq!(json["fen"], "1k6/8/8/8/8/8/8/R4RK1 b - - 1 1");
        assert_eq!(json["move"]["coordinate"], "O-O");
        assert_eq!(json["move"]["flags"], "k");
    }

    // --- Destinations ---

    #[tokio::test]
    async fn losers_destinations() {
        let resp = post_json(
            test_state(),
            "/api/destinations",
            serde_json::json!({
                "fen": "4k3/8/8/3p4/4P3/8/8/4K3 w - - 0 1",
                "category": "losers",
            }),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);
        let json = body_json(resp).await;
        assert_eq!(json["dests"], serde_json::json!({ "e4": ["d5"] }));
    }

    #[tokio::test]
    async fn destinations_with_bad_fen() {
        let resp = post_json(
            test_state(),
            "/api/destinations",
            serde_json::json!({ "fen": "nonsense" }),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let json = body_json(resp).await;
        assert_eq!(json["error"]["code"], "INVALID_FEN");
    }

    // --- Chess960 ---

    #[tokio::test]
    async fn chess960_by_id() {
        let app = create_router(test_state());
        let resp = app
            .oneshot(
                Request::get("/api/chess960?idn=518")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let json = body_json(resp).await;
        assert_eq!(json["idn"], 518);
        assert_eq!(json["fen"], START);
    }

    #[tokio::test]
    async fn chess960_random() {
        let app = create_router(test_state());
        let resp = app
            .oneshot(Request::get("/api/chess960").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let json = body_json(resp).await;
        assert!(json["idn"].as_u64().unwrap() < 960);
        assert!(json["fen"].as_str().unwrap().ends_with(" w KQkq - 0 1"));
    }
}
