use tracing::{info, warn};

use super::repo_types::Collection;
use crate::{error::AppError, games, state::AppState};

fn validate_name(name: &str) -> Result<&str, AppError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::validation("collection name cannot be empty"));
    }
    Ok(name)
}

pub async fn list(st: &AppState, user_id: i64) -> Result<Vec<Collection>, AppError> {
    st.collections.list(user_id).await
}

pub async fn get(st: &AppState, id: i64, user_id: i64) -> Result<Collection, AppError> {
    st.collections
        .get(id, user_id)
        .await?
        .ok_or(AppError::NotFound("collection"))
}

pub async fn create(
    st: &AppState,
    user_id: i64,
    name: &str,
    pinned: bool,
) -> Result<Collection, AppError> {
    let name = validate_name(name)?;
    let collection = st.collections.create(user_id, name, pinned).await?;
    info!(user_id, collection_id = collection.id, "collection created");
    Ok(collection)
}

pub async fn update(
    st: &AppState,
    id: i64,
    user_id: i64,
    name: &str,
    pinned: bool,
) -> Result<Collection, AppError> {
    let name = validate_name(name)?;
    st.collections
        .update(id, user_id, name, pinned)
        .await?
        .ok_or(AppError::NotFound("collection"))
}

pub async fn delete(st: &AppState, id: i64, user_id: i64) -> Result<(), AppError> {
    if !st.collections.delete(id, user_id).await? {
        return Err(AppError::NotFound("collection"));
    }
    info!(user_id, collection_id = id, "collection deleted");
    Ok(())
}

/// Non-owners get `Forbidden` whether or not the game exists; owners get
/// `NotFound` for a game missing from the catalog.
pub async fn add_game(
    st: &AppState,
    id: i64,
    game_id: i64,
    user_id: i64,
) -> Result<(), AppError> {
    if !st.collections.is_owner(id, user_id).await? {
        warn!(user_id, collection_id = id, "add_game on foreign collection");
        return Err(AppError::Forbidden);
    }
    games::services::get(st, game_id).await?;

    // The membership statement re-checks ownership atomically.
    if !st.collections.add_game(id, game_id, user_id).await? {
        return Err(AppError::Forbidden);
    }
    Ok(())
}

pub async fn remove_game(
    st: &AppState,
    id: i64,
    game_id: i64,
    user_id: i64,
) -> Result<(), AppError> {
    if !st.collections.remove_game(id, game_id, user_id).await? {
        warn!(user_id, collection_id = id, "remove_game on foreign collection");
        return Err(AppError::Forbidden);
    }
    Ok(())
}
