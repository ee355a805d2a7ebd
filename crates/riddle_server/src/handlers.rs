//! HTTP handlers for the riddle server

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use chrono::NaiveDate;
use std::sync::Arc;
use std::time::Duration;
use tracing::Instrument;
use uuid::Uuid;

use crate::types::{parse_letters, ErrorResponse};
use riddle::{
    Insert, NewLongPrompt, NewShortPrompt, PromptSelector, PromptStore, RiddleError,
    SelectorConfig,
};

/// Shared server state
pub struct AppState {
    pub store: Arc<dyn PromptStore>,
    pub selector: PromptSelector<dyn PromptStore>,
    /// Upper bound on one whole selection run
    pub run_timeout: Option<Duration>,
}

impl AppState {
    pub fn new(store: Arc<dyn PromptStore>, config: SelectorConfig) -> Self {
        let selector = PromptSelector::new(Arc::clone(&store), config);
        Self {
            store,
            selector,
            run_timeout: None,
        }
    }

    pub fn with_run_timeout(mut self, timeout: Duration) -> Self {
        self.run_timeout = Some(timeout);
        self
    }
}

fn error_response(status: StatusCode, message: impl Into<String>, kind: &str) -> Response {
    (status, Json(ErrorResponse::new(message, kind))).into_response()
}

/// Map a library error to a response, logging store failures apart from empty pools
fn riddle_error_response(err: RiddleError) -> Response {
    let status = match &err {
        RiddleError::InvalidInput(_) => StatusCode::UNPROCESSABLE_ENTITY,
        RiddleError::ExhaustedPool { .. } => {
            tracing::warn!("Selection failed: {}", err);
            StatusCode::INTERNAL_SERVER_ERROR
        }
        _ => {
            tracing::error!("Store error: {}", err);
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    error_response(status, err.to_string(), err.kind())
}

/// Handler for GET /
pub async fn greeting() -> &'static str {
    "Hello"
}

/// Handler for GET /spL/{letters}
pub async fn select_prompts(
    State(state): State<Arc<AppState>>,
    Path(letters): Path<String>,
) -> Response {
    let request_id = Uuid::new_v4();
    let span = tracing::info_span!("select", %request_id, letters = %letters);

    async move {
        let letters = parse_letters(&letters);
        let run = state.selector.select_shuffled(&letters);

        let result = match state.run_timeout {
            Some(limit) => match tokio::time::timeout(limit, run).await {
                Ok(result) => result,
                Err(_) => {
                    tracing::warn!("Selection timed out after {:?}", limit);
                    return error_response(
                        StatusCode::GATEWAY_TIMEOUT,
                        format!("Selection timed out after {:?}", limit),
                        "timeout",
                    );
                }
            },
            None => run.await,
        };

        match result {
            Ok(selection) => {
                tracing::info!("Selected {} prompts", selection.len());
                (StatusCode::CREATED, Json(selection)).into_response()
            }
            Err(e) => riddle_error_response(e),
        }
    }
    .instrument(span)
    .await
}

/// Handler for POST /longPrompts
pub async fn create_long_prompt(
    State(state): State<Arc<AppState>>,
    Json(req): Json<NewLongPrompt>,
) -> Response {
    let text = req.text.clone();
    match state.store.insert_long_prompt(req).await {
        Ok(Insert::Created(prompt)) => (StatusCode::CREATED, Json(prompt)).into_response(),
        Ok(Insert::AlreadyExists) => error_response(
            StatusCode::BAD_REQUEST,
            format!("{} already exists", text),
            "already_exists",
        ),
        Err(e) => riddle_error_response(e),
    }
}

/// Handler for POST /shortPrompts
pub async fn create_short_prompt(
    State(state): State<Arc<AppState>>,
    Json(req): Json<NewShortPrompt>,
) -> Response {
    let text = req.text.clone();
    match state.store.insert_short_prompt(req).await {
        Ok(Insert::Created(prompt)) => (StatusCode::CREATED, Json(prompt)).into_response(),
        Ok(Insert::AlreadyExists) => error_response(
            StatusCode::BAD_REQUEST,
            format!("{} already exists", text),
            "already_exists",
        ),
        Err(e) => riddle_error_response(e),
    }
}

/// Handler for GET /longPrompts/{date}
pub async fn get_long_prompt_for_date(
    State(state): State<Arc<AppState>>,
    Path(raw): Path<String>,
) -> Response {
    let Ok(date) = NaiveDate::parse_from_str(&raw, "%Y-%m-%d") else {
        return error_response(
            StatusCode::BAD_REQUEST,
            format!("Invalid date '{}', expected YYYY-MM-DD", raw),
            "invalid_request",
        );
    };
    match state.store.long_prompt_for_date(date).await {
        Ok(Some(prompt)) => (StatusCode::CREATED, Json(prompt)).into_response(),
        Ok(None) => error_response(
            StatusCode::NOT_FOUND,
            format!("No long prompt for {}", date),
            "not_found",
        ),
        Err(e) => riddle_error_response(e),
    }
}
