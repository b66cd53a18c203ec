use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    middleware,
    routing::{get, post},
    Json, Router,
};
use tracing::instrument;

use super::{
    dto::{InfoResponse, LoginRequest, RegisterRequest, TokenResponse},
    extractors::{require_auth, AuthUser},
    services,
};
use crate::{error::AppError, state::AppState};

pub fn user_routes(state: AppState) -> Router<AppState> {
    let public = Router::new()
        .route("/user/register", post(register))
        .route("/user/login", post(login));

    let private = Router::new()
        .route("/user/info", get(info))
        .route_layer(middleware::from_fn_with_state(state, require_auth));

    public.merge(private)
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<StatusCode, AppError> {
    let Json(payload) = payload?;
    services::register(&state, payload).await?;
    Ok(StatusCode::CREATED)
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<TokenResponse>, AppError> {
    let Json(payload) = payload?;
    let token = services::login(&state, payload).await?;
    Ok(Json(TokenResponse { token }))
}

#[instrument(skip(state))]
pub async fn info(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<InfoResponse>, AppError> {
    let user = services::info(&state, user_id).await?;
    Ok(Json(InfoResponse {
        username: user.username,
        email: user.email,
    }))
}
