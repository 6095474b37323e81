use axum::{
    Json,
    extract::State,
    http::{HeaderMap, HeaderValue},
    response::{IntoResponse, Response},
};
use tracing::warn;

use super::STRATEGY_HEADER;
use super::error::GatewayError;
use super::payload::{AskRequest, AskResponse, SessionsResponse};
use super::state::AppState;
use crate::history::{ChatHistoryStore, ChatMessage};
use crate::llm::ChatBackend;
use crate::retrieval::PassageStore;
use crate::search::SearchError;

/// Answer returned when the vector index cannot be queried.
const NO_INFORMATION: &str = "Tôi không tìm thấy thông tin về điều này trong tài liệu.";

/// Strategy header value for the index-unavailable case.
const STRATEGY_RETRIEVAL_UNAVAILABLE: &str = "RETRIEVAL_UNAVAILABLE";

/// `POST /v1/ask`: retrieve passages, generate a grounded answer, persist the
/// conversation turn.
#[tracing::instrument(skip_all)]
pub async fn ask_handler<S, C>(
    State(state): State<AppState<S, C>>,
    Json(request): Json<AskRequest>,
) -> Result<Response, GatewayError>
where
    S: PassageStore + 'static,
    C: ChatBackend + 'static,
{
    let question = request.question.trim();
    if question.is_empty() {
        return Err(GatewayError::InvalidRequest(
            "question must not be empty".to_string(),
        ));
    }

    let session_id = request
        .session_id
        .unwrap_or_else(ChatHistoryStore::new_session_id);
    let k = request.top_k.unwrap_or(state.top_k);

    // A broken index degrades to the no-information answer; the model backend
    // is not consulted without grounding context.
    let (passages, strategy, index_healthy) = match state.searcher.search(question, k).await {
        Ok(outcome) => (outcome.passages, outcome.strategy.as_str(), true),
        Err(SearchError::Retrieval(e)) => {
            warn!(error = %e, "Vector index unavailable");
            (vec![], STRATEGY_RETRIEVAL_UNAVAILABLE, false)
        }
    };

    let mut messages = state.history.load(&session_id)?;

    let answer = if index_healthy {
        let context: Vec<&str> = passages.iter().map(|p| p.content.as_str()).collect();
        state
            .backend
            .generate(&context.join("\n\n"), question, &messages)
            .await?
    } else {
        NO_INFORMATION.to_string()
    };

    messages.push(ChatMessage::user(question));
    messages.push(ChatMessage::assistant(&answer));
    state.history.save(&session_id, &messages)?;

    let mut headers = HeaderMap::new();
    headers.insert(
        STRATEGY_HEADER,
        HeaderValue::from_str(strategy).unwrap_or(HeaderValue::from_static("ERROR")),
    );

    let body = AskResponse {
        answer,
        session_id,
        strategy: strategy.to_string(),
        passages: passages.into_iter().map(Into::into).collect(),
    };

    Ok((headers, Json(body)).into_response())
}

/// `GET /v1/sessions`: stored conversations, newest first.
pub async fn sessions_handler<S, C>(
    State(state): State<AppState<S, C>>,
) -> Result<Json<SessionsResponse>, GatewayError>
where
    S: PassageStore + 'static,
    C: ChatBackend + 'static,
{
    let sessions = state.history.list_sessions()?;
    Ok(Json(SessionsResponse { sessions }))
}
