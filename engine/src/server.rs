//! HTTP API for the Fridge Chef backend

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::feedback::{is_valid_feedback, ConversationRecord, FeedbackLog};
use crate::rag::FridgeChef;
use crate::recipe::RecipeField;
use crate::search::{Boosts, SearchConfig};

/// Application state shared across handlers
pub struct AppState {
    pub chef: FridgeChef,
    pub log: FeedbackLog,
}

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
struct QuestionRequest {
    question: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct QuestionResponse {
    pub conversation_id: String,
    pub question: String,
    pub answer: String,
}

#[derive(Debug, Deserialize)]
struct FeedbackRequest {
    conversation_id: String,
    feedback: i64,
}

#[derive(Debug, Deserialize)]
struct SearchRequest {
    query: String,
    limit: Option<usize>,
    #[serde(default)]
    boosts: Boosts,
    #[serde(default)]
    filters: BTreeMap<RecipeField, String>,
    min_score: Option<f32>,
}

#[derive(Debug, Serialize)]
struct SearchResult {
    dish_name: String,
    cuisine: String,
    diet: String,
    score: f32,
}

#[derive(Debug, Serialize)]
struct SearchResponse {
    results: Vec<SearchResult>,
    query: String,
    total_hits: usize,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: String,
    indexed_docs: usize,
}

type ApiError = (StatusCode, String);

// ============================================================================
// Handlers
// ============================================================================

/// Health check endpoint
async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "healthy".to_string(),
        indexed_docs: state.chef.index().len(),
    })
}

/// Answer a question with retrieved recipes
async fn question(
    State(state): State<Arc<AppState>>,
    Json(req): Json<QuestionRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let question = req.question.trim();
    if question.is_empty() {
        return Err((StatusCode::BAD_REQUEST, "No question provided".to_string()));
    }

    let started = Instant::now();
    let answer = state
        .chef
        .answer(question)
        .await
        .map_err(|e| (StatusCode::BAD_GATEWAY, e.to_string()))?;
    let elapsed = started.elapsed().as_secs_f64();

    let conversation_id = uuid::Uuid::new_v4().to_string();
    tracing::info!(
        "Answered {} in {:.2}s from {} recipes",
        conversation_id,
        elapsed,
        answer.dishes.len()
    );

    state
        .log
        .record_conversation(&ConversationRecord {
            conversation_id: conversation_id.clone(),
            question: question.to_string(),
            answer: answer.answer.clone(),
            model: state.chef.model().to_string(),
            response_time_secs: elapsed,
            timestamp: Utc::now(),
        })
        .await
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;

    Ok(Json(QuestionResponse {
        conversation_id,
        question: question.to_string(),
        answer: answer.answer,
    }))
}

/// Record thumbs up / down for a conversation
async fn feedback(
    State(state): State<Arc<AppState>>,
    Json(req): Json<FeedbackRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if !is_valid_feedback(req.feedback) {
        return Err((
            StatusCode::BAD_REQUEST,
            "Feedback must be 1 or -1".to_string(),
        ));
    }
    if !state.log.is_known(&req.conversation_id).await {
        return Err((
            StatusCode::NOT_FOUND,
            format!("Unknown conversation {}", req.conversation_id),
        ));
    }

    state
        .log
        .record_feedback(&req.conversation_id, req.feedback as i8)
        .await
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;

    Ok(Json(serde_json::json!({
        "message": format!(
            "Feedback received for conversation {}: {}",
            req.conversation_id, req.feedback
        )
    })))
}

/// Raw retrieval, without the LLM
async fn search_recipes(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SearchRequest>,
) -> impl IntoResponse {
    let config = SearchConfig {
        limit: req.limit.unwrap_or(SearchConfig::interactive().limit),
        boosts: req.boosts,
        filters: req.filters,
        min_score: req.min_score,
    };

    let hits = state.chef.index().search(&req.query, &config);

    let results: Vec<SearchResult> = hits
        .iter()
        .map(|hit| SearchResult {
            dish_name: hit.recipe.dish_name.clone(),
            cuisine: hit.recipe.cuisine.clone(),
            diet: hit.recipe.diet.clone(),
            score: hit.score,
        })
        .collect();
    let total = results.len();

    Json(SearchResponse {
        results,
        query: req.query,
        total_hits: total,
    })
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/question", post(question))
        .route("/feedback", post(feedback))
        .route("/search", post(search_recipes))
        .layer(CorsLayer::new().allow_origin(Any).allow_methods(Any))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::{IndexConfig, RecipeIndex};
    use crate::rag::tests::{sample_index, StubModel};
    use crate::recipe::Recipe;
    use axum::body::Body;
    use axum::http::Request;
    use serde_json::{json, Value};
    use tempfile::TempDir;
    use tower::ServiceExt;

    async fn test_app(temp_dir: &TempDir) -> Router {
        let chef = FridgeChef::new(sample_index(), Arc::new(StubModel::new("Make spinach dal.")));
        let log = FeedbackLog::open(temp_dir.path()).await.unwrap();
        router(Arc::new(AppState { chef, log }))
    }

    async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json");
        let request = match body {
            Some(body) => request.body(Body::from(body.to_string())).unwrap(),
            None => request.body(Body::empty()).unwrap(),
        };

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    #[tokio::test]
    async fn test_health() {
        let temp_dir = TempDir::new().unwrap();
        let app = test_app(&temp_dir).await;

        let (status, body) = send(&app, "GET", "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["indexed_docs"], 2);
    }

    #[tokio::test]
    async fn test_question_then_feedback() {
        let temp_dir = TempDir::new().unwrap();
        let app = test_app(&temp_dir).await;

        let (status, body) = send(
            &app,
            "POST",
            "/question",
            Some(json!({"question": "What can I cook with spinach?"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["answer"], "Make spinach dal.");
        let conversation_id = body["conversation_id"].as_str().unwrap().to_string();

        let (status, body) = send(
            &app,
            "POST",
            "/feedback",
            Some(json!({"conversation_id": conversation_id, "feedback": 1})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["message"].as_str().unwrap().contains(&conversation_id));

        let feedback = std::fs::read_to_string(temp_dir.path().join("feedback.jsonl")).unwrap();
        assert_eq!(feedback.lines().count(), 1);
    }

    #[tokio::test]
    async fn test_rejects_bad_requests() {
        let temp_dir = TempDir::new().unwrap();
        let app = test_app(&temp_dir).await;

        let (status, _) = send(&app, "POST", "/question", Some(json!({"question": "  "}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = send(
            &app,
            "POST",
            "/feedback",
            Some(json!({"conversation_id": "nope", "feedback": 1})),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = send(
            &app,
            "POST",
            "/feedback",
            Some(json!({"conversation_id": "nope", "feedback": 3})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_search_endpoint() {
        let temp_dir = TempDir::new().unwrap();
        let app = test_app(&temp_dir).await;

        let (status, body) = send(
            &app,
            "POST",
            "/search",
            Some(json!({"query": "tofu noodles", "boosts": {"main_ingredients": 2.0}})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total_hits"], 1);
        assert_eq!(body["results"][0]["dish_name"], "Vegetable Pad Thai");
    }

    #[tokio::test]
    async fn test_search_endpoint_applies_keyword_filter() {
        let temp_dir = TempDir::new().unwrap();
        let recipes = vec![
            Recipe {
                dish_name: "Paneer Tikka".to_string(),
                diet: "vegetarian".to_string(),
                main_ingredients: "paneer peppers".to_string(),
                ..Recipe::default()
            },
            Recipe {
                dish_name: "Stuffed Peppers".to_string(),
                diet: "vegan".to_string(),
                main_ingredients: "peppers rice beans".to_string(),
                ..Recipe::default()
            },
        ];
        let index = RecipeIndex::fit(
            recipes,
            IndexConfig {
                text_fields: RecipeField::ALL.to_vec(),
                keyword_fields: vec![RecipeField::Diet],
            },
        );
        let chef = FridgeChef::new(Arc::new(index), Arc::new(StubModel::new("unused")));
        let log = FeedbackLog::open(temp_dir.path()).await.unwrap();
        let app = router(Arc::new(AppState { chef, log }));

        let (_, body) = send(&app, "POST", "/search", Some(json!({"query": "peppers"}))).await;
        assert_eq!(body["total_hits"], 2);

        let (status, body) = send(
            &app,
            "POST",
            "/search",
            Some(json!({"query": "peppers", "filters": {"diet": "vegan"}})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total_hits"], 1);
        assert_eq!(body["results"][0]["dish_name"], "Stuffed Peppers");
    }

    #[tokio::test]
    async fn test_search_endpoint_min_score() {
        let temp_dir = TempDir::new().unwrap();
        let app = test_app(&temp_dir).await;

        let (_, body) = send(
            &app,
            "POST",
            "/search",
            Some(json!({"query": "tofu noodles", "min_score": 1000.0})),
        )
        .await;
        assert_eq!(body["total_hits"], 0);
    }
}
