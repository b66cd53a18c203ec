use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    middleware,
    routing::{get, post},
    Json, Router,
};
use tracing::instrument;

use super::{
    dto::{CreateCollectionRequest, UpdateCollectionRequest},
    repo_types::Collection,
    services,
};
use crate::{
    auth::{require_auth, AuthUser},
    error::AppError,
    games::handlers::parse_id,
    state::AppState,
};

pub fn collection_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/collections/", get(list_collections).post(create_collection))
        .route(
            "/collections/:id",
            get(get_collection)
                .put(update_collection)
                .delete(delete_collection),
        )
        .route(
            "/collections/:id/games/:game_id",
            post(add_game).delete(remove_game),
        )
        .route_layer(middleware::from_fn_with_state(state, require_auth))
}

fn parse_pair(path: Result<Path<(i64, i64)>, PathRejection>) -> Result<(i64, i64), AppError> {
    let Path((id, game_id)) = path?;
    if id <= 0 || game_id <= 0 {
        return Err(AppError::validation("ids must be positive integers"));
    }
    Ok((id, game_id))
}

#[instrument(skip(state))]
pub async fn list_collections(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<Vec<Collection>>, AppError> {
    Ok(Json(services::list(&state, user_id).await?))
}

#[instrument(skip(state))]
pub async fn get_collection(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<Collection>, AppError> {
    let id = parse_id(id)?;
    Ok(Json(services::get(&state, id, user_id).await?))
}

#[instrument(skip(state, payload))]
pub async fn create_collection(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    payload: Result<Json<CreateCollectionRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Collection>), AppError> {
    let Json(payload) = payload?;
    let collection = services::create(&state, user_id, &payload.name, payload.pinned).await?;
    Ok((StatusCode::CREATED, Json(collection)))
}

#[instrument(skip(state, payload))]
pub async fn update_collection(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<UpdateCollectionRequest>, JsonRejection>,
) -> Result<Json<Collection>, AppError> {
    let id = parse_id(id)?;
    let Json(payload) = payload?;
    let collection = services::update(&state, id, user_id, &payload.name, payload.pinned).await?;
    Ok(Json(collection))
}

#[instrument(skip(state))]
pub async fn delete_collection(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    id: Result<Path<i64>, PathRejection>,
) -> Result<StatusCode, AppError> {
    let id = parse_id(id)?;
    services::delete(&state, id, user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(state))]
pub async fn add_game(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    ids: Result<Path<(i64, i64)>, PathRejection>,
) -> Result<StatusCode, AppError> {
    let (id, game_id) = parse_pair(ids)?;
    services::add_game(&state, id, game_id, user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(state))]
pub async fn remove_game(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    ids: Result<Path<(i64, i64)>, PathRejection>,
) -> Result<StatusCode, AppError> {
    let (id, game_id) = parse_pair(ids)?;
    services::remove_game(&state, id, game_id, user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
