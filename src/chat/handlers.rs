use axum::{
    extract::{rejection::JsonRejection, State},
    middleware,
    routing::post,
    Json, Router,
};
use tracing::instrument;

use super::dto::{ChatRequest, ChatResponse};
use crate::{
    auth::{require_auth, AuthUser},
    error::AppError,
    state::AppState,
};

pub fn chat_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/chat/", post(chat))
        .route_layer(middleware::from_fn_with_state(state, require_auth))
}

#[instrument(skip(state, payload))]
pub async fn chat(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, AppError> {
    let Json(payload) = payload?;
    let messages = state.chat.chat(user_id, &payload.message).await?;
    Ok(Json(ChatResponse { messages }))
}
