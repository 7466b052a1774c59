//! HTTP routes. Handlers stay thin: parse leniently, check the session, call
//! the scorer.

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use automark_core::content::{QUESTION_TEXT, TARGET_WORDS, TEMPLATE_TEXT};
use automark_core::{
    clamp_chars, mark as score, Rubric, WorkflowEvidence, MAX_ANSWER_CHARS, MAX_GUIDE_CHARS,
};
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, HeaderMap};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Utc;
use serde_json::{json, Value};
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::config::ServerConfig;
use crate::error::ApiError;
use crate::session::SessionGate;

#[derive(Debug)]
pub struct AppState {
    pub rubric: Rubric,
    pub gate: SessionGate,
    pub course_back_url: String,
    pub next_lesson_url: String,
}

impl AppState {
    pub fn from_config(cfg: &ServerConfig) -> Self {
        Self {
            rubric: cfg.rubric.clone(),
            gate: SessionGate::new(
                &cfg.cookie_secret,
                &cfg.access_code,
                cfg.session_minutes,
                cfg.secure_cookies,
            ),
            course_back_url: cfg.course_back_url.clone(),
            next_lesson_url: cfg.next_lesson_url.clone(),
        }
    }
}

pub fn router(state: Arc<AppState>, static_dir: Option<&Path>) -> Router {
    let api = Router::new()
        .route("/api/config", get(config))
        .route("/api/unlock", post(unlock))
        .route("/api/mark", post(mark))
        .route("/api/logout", post(logout))
        .route("/health", get(health))
        .with_state(state);

    let app = match static_dir {
        Some(dir) => api.fallback_service(ServeDir::new(dir)),
        None => api,
    };

    app.layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

pub async fn serve(cfg: ServerConfig) -> anyhow::Result<()> {
    let state = Arc::new(AppState::from_config(&cfg));
    let app = router(state, cfg.static_dir.as_deref());

    let listener = tokio::net::TcpListener::bind(cfg.addr)
        .await
        .with_context(|| format!("failed to bind {}", cfg.addr))?;
    tracing::info!(addr = %cfg.addr, "automarker listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;
    tracing::info!("automarker stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
}

/// Malformed bodies read as an empty object.
fn lenient_json(body: &[u8]) -> Value {
    serde_json::from_slice(body).unwrap_or_else(|_| json!({}))
}

/// Non-string and missing fields read as "".
fn string_field<'a>(body: &'a Value, key: &str) -> &'a str {
    body.get(key).and_then(Value::as_str).unwrap_or_default()
}

async fn config(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(json!({
        "ok": true,
        "courseBackUrl": state.course_back_url,
        "nextLessonUrl": state.next_lesson_url,
        "questionText": QUESTION_TEXT,
        "templateText": TEMPLATE_TEXT,
        "targetWords": TARGET_WORDS,
        "minWordsGate": state.rubric.min_words,
    }))
}

async fn unlock(State(state): State<Arc<AppState>>, body: Bytes) -> Result<Response, ApiError> {
    let body = lenient_json(&body);
    let code = string_field(&body, "code").trim();
    if code.is_empty() {
        return Err(ApiError::MissingCode);
    }
    if !state.gate.check_access_code(code) {
        tracing::warn!("unlock rejected: incorrect access code");
        return Err(ApiError::IncorrectCode);
    }

    tracing::info!("session unlocked");
    let cookie = state.gate.set_cookie(Utc::now());
    Ok(([(header::SET_COOKIE, cookie)], Json(json!({ "ok": true }))).into_response())
}

async fn mark(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<Value>, ApiError> {
    if !state.gate.is_authorized(&headers, Utc::now()) {
        return Err(ApiError::Locked);
    }

    let body = lenient_json(&body);
    let answer = clamp_chars(string_field(&body, "answerText"), MAX_ANSWER_CHARS);
    let guide = clamp_chars(string_field(&body, "finalGuideText"), MAX_GUIDE_CHARS);
    let evidence = body
        .get("workflowEvidence")
        .and_then(WorkflowEvidence::from_json);

    let result = score(&state.rubric, answer, guide, evidence.as_ref());
    tracing::info!(
        word_count = result.answer.word_count,
        gated = result.answer.gated,
        score = ?result.answer.score,
        band = ?result.answer.band,
        evidence = evidence.is_some(),
        guide_gated = result.guide.guide_gated,
        guide_score = ?result.guide.guide_score,
        "marked submission"
    );

    Ok(Json(json!({ "ok": true, "result": result })))
}

async fn logout(State(state): State<Arc<AppState>>) -> Response {
    (
        [(header::SET_COOKIE, state.gate.clear_cookie())],
        Json(json!({ "ok": true })),
    )
        .into_response()
}

async fn health() -> &'static str {
    "ok"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lenient_parsing_coerces_to_empty() {
        let v = lenient_json(b"{not json");
        assert_eq!(v, json!({}));
        let v = lenient_json(br#"{"answerText": 42, "code": "abc"}"#);
        assert_eq!(string_field(&v, "answerText"), "");
        assert_eq!(string_field(&v, "code"), "abc");
        assert_eq!(string_field(&json!(null), "code"), "");
    }
}
