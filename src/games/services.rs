use tracing::info;

use super::{dto::GameInput, repo_types::Game};
use crate::{error::AppError, state::AppState};

pub async fn list(st: &AppState) -> Result<Vec<Game>, AppError> {
    st.games.list().await
}

pub async fn get(st: &AppState, id: i64) -> Result<Game, AppError> {
    st.games.get(id).await?.ok_or(AppError::NotFound("game"))
}

/// Fetches every existing game among `ids`; unknown ids are skipped, but
/// zero matches is `NotFound`.
pub async fn get_by_ids(st: &AppState, ids: &[i64]) -> Result<Vec<Game>, AppError> {
    if ids.is_empty() {
        return Err(AppError::validation("ids must not be empty"));
    }
    let mut ids = ids.to_vec();
    ids.sort_unstable();
    ids.dedup();

    let games = st.games.get_many(&ids).await?;
    if games.is_empty() {
        return Err(AppError::NotFound("game"));
    }
    Ok(games)
}

fn validate(input: &GameInput) -> Result<(), AppError> {
    if input.title.trim().is_empty() {
        return Err(AppError::validation("title must not be empty"));
    }
    Ok(())
}

pub async fn create(st: &AppState, input: GameInput) -> Result<i64, AppError> {
    validate(&input)?;
    let id = st.games.create(&input).await?;
    info!(game_id = id, title = %input.title, "game created");
    Ok(id)
}

pub async fn update(st: &AppState, id: i64, input: GameInput) -> Result<(), AppError> {
    validate(&input)?;
    if !st.games.update(id, &input).await? {
        return Err(AppError::NotFound("game"));
    }
    Ok(())
}

pub async fn delete(st: &AppState, id: i64) -> Result<(), AppError> {
    if !st.games.delete(id).await? {
        return Err(AppError::NotFound("game"));
    }
    info!(game_id = id, "game deleted");
    Ok(())
}
