use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::instrument;

use super::{
    dto::{ByIdsRequest, CreatedGameResponse, GameInput},
    repo_types::Game,
    services,
};
use crate::{auth::AuthUser, error::AppError, state::AppState};

/// Catalog reads are public; catalog management takes `AuthUser`, which
/// rejects the call before the body is read.
pub fn game_routes() -> Router<AppState> {
    Router::new()
        .route("/games/", get(list_games).post(create_game))
        .route("/games/by-ids", post(get_games_by_ids))
        .route(
            "/games/:id",
            get(get_game).put(update_game).delete(delete_game),
        )
}

pub(crate) fn parse_id(path: Result<Path<i64>, PathRejection>) -> Result<i64, AppError> {
    let Path(id) = path?;
    if id <= 0 {
        return Err(AppError::validation("id must be a positive integer"));
    }
    Ok(id)
}

#[instrument(skip(state))]
pub async fn list_games(State(state): State<AppState>) -> Result<Json<Vec<Game>>, AppError> {
    Ok(Json(services::list(&state).await?))
}

#[instrument(skip(state))]
pub async fn get_game(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<Game>, AppError> {
    let id = parse_id(id)?;
    Ok(Json(services::get(&state, id).await?))
}

#[instrument(skip(state, payload))]
pub async fn get_games_by_ids(
    State(state): State<AppState>,
    payload: Result<Json<ByIdsRequest>, JsonRejection>,
) -> Result<Json<Vec<Game>>, AppError> {
    let Json(payload) = payload?;
    Ok(Json(services::get_by_ids(&state, &payload.ids).await?))
}

#[instrument(skip(state, payload))]
pub async fn create_game(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    payload: Result<Json<GameInput>, JsonRejection>,
) -> Result<(StatusCode, Json<CreatedGameResponse>), AppError> {
    let Json(payload) = payload?;
    let id = services::create(&state, payload).await?;
    Ok((StatusCode::CREATED, Json(CreatedGameResponse { id })))
}

#[instrument(skip(state, payload))]
pub async fn update_game(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<GameInput>, JsonRejection>,
) -> Result<StatusCode, AppError> {
    let id = parse_id(id)?;
    let Json(payload) = payload?;
    services::update(&state, id, payload).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(state))]
pub async fn delete_game(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    id: Result<Path<i64>, PathRejection>,
) -> Result<StatusCode, AppError> {
    let id = parse_id(id)?;
    services::delete(&state, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
