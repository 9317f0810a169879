use super::*;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

const START_FEN: &str = "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq - 0 1";

async fn spawn_stub(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

fn config(base_url: String) -> RecommenderConfig {
    RecommenderConfig {
        base_url,
        timeout_ms: 2_000,
        max_attempts: 1,
        retry_backoff_ms: 10,
        time_limit: None,
    }
}

#[test]
fn test_payload_omits_missing_time_limit() {
    let payload = BestMovePayload {
        fen: START_FEN.to_string(),
        time_limit: None,
    };
    assert_eq!(serde_json::to_value(&payload).unwrap(), json!({ "fen": START_FEN }));
}

#[tokio::test]
async fn test_best_move_round_trip() {
    let app = Router::new().route(
        "/get_best_move",
        post(|Json(payload): Json<BestMovePayload>| async move {
            Json(json!({ "best_move": "e7e5", "board": payload.fen }))
        }),
    );
    let url = spawn_stub(app).await;

    let recommender = HttpRecommender::new(&config(format!("{url}/"))).unwrap();
    assert_eq!(recommender.base_url(), url);
    assert_eq!(recommender.best_move(START_FEN).await, Ok("e7e5".to_string()));
}

#[tokio::test]
async fn test_time_limit_forwarded() {
    let app = Router::new().route(
        "/get_best_move",
        post(|Json(payload): Json<BestMovePayload>| async move {
            let best_move = if payload.time_limit == Some(1.5) { "e7e5" } else { "" };
            Json(json!({ "best_move": best_move }))
        }),
    );
    let url = spawn_stub(app).await;

    let mut cfg = config(url);
    cfg.time_limit = Some(1.5);
    let recommender = HttpRecommender::new(&cfg).unwrap();
    assert_eq!(recommender.best_move(START_FEN).await, Ok("e7e5".to_string()));
}

#[tokio::test]
async fn test_error_status() {
    let app = Router::new().route(
        "/get_best_move",
        post(|| async { (StatusCode::BAD_REQUEST, Json(json!({ "error": "bad fen" }))) }),
    );
    let url = spawn_stub(app).await;

    let recommender = HttpRecommender::new(&config(url)).unwrap();
    assert_eq!(
        recommender.best_move(START_FEN).await,
        Err(RecommenderError::Status(400))
    );
}

#[tokio::test]
async fn test_malformed_body() {
    let app = Router::new().route(
        "/get_best_move",
        post(|| async { Json(json!({ "move": "e7e5" })) }),
    );
    let url = spawn_stub(app).await;

    let recommender = HttpRecommender::new(&config(url)).unwrap();
    assert!(matches!(
        recommender.best_move(START_FEN).await,
        Err(RecommenderError::MalformedBody(_))
    ));
}

#[tokio::test]
async fn test_connection_refused() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);

    let recommender = HttpRecommender::new(&config(url)).unwrap();
    assert!(matches!(
        recommender.best_move(START_FEN).await,
        Err(RecommenderError::Transport(_))
    ));
}

#[tokio::test]
async fn test_bounded_retry() {
    let hits = Arc::new(AtomicU32::new(0));
    let counter = hits.clone();
    let app = Router::new().route(
        "/get_best_move",
        post(move || {
            let counter = counter.clone();
            async move {
                if counter.fetch_add(1, Ordering::SeqCst) == 0 {
                    StatusCode::SERVICE_UNAVAILABLE.into_response()
                } else {
                    Json(json!({ "best_move": "c7c5" })).into_response()
                }
            }
        }),
    );
    let url = spawn_stub(app).await;

    let single = HttpRecommender::new(&config(url.clone())).unwrap();
    assert_eq!(
        single.best_move(START_FEN).await,
        Err(RecommenderError::Status(503))
    );

    hits.store(0, Ordering::SeqCst);
    let mut cfg = config(url);
    cfg.max_attempts = 3;
    let retrying = HttpRecommender::new(&cfg).unwrap();
    assert_eq!(retrying.best_move(START_FEN).await, Ok("c7c5".to_string()));
    assert_eq!(hits.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_health() {
    let app = Router::new().route(
        "/health",
        get(|| async {
            Json(json!({ "status": "healthy", "message": "Chess server is running" }))
        }),
    );
    let url = spawn_stub(app).await;

    let recommender = HttpRecommender::new(&config(url)).unwrap();
    let reply = recommender.health().await.unwrap();
    assert_eq!(reply.status, "healthy");
}

struct Scripted(&'static str);

#[async_trait]
impl Recommender for Scripted {
    async fn best_move(&self, _fen: &str) -> Result<String, RecommenderError> {
        Ok(self.0.to_string())
    }
}

#[tokio::test]
async fn test_resolve_wraps_outcome() {
    let request = BestMoveRequest {
        id: 7,
        fen: START_FEN.to_string(),
    };
    let event = resolve(&Scripted("e7e5"), request).await;
    assert_eq!(
        event,
        Event::BestMove {
            request: 7,
            outcome: Ok("e7e5".to_string()),
        }
    );
}
