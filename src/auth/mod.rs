use crate::state::AppState;
use axum::Router;

mod claims;
mod dto;
pub(crate) mod extractors;
pub mod handlers;
pub mod jwt;
pub mod password;
pub mod repo;
pub mod repo_types;
pub mod services;

pub use extractors::{require_auth, AuthUser};

pub fn router(state: AppState) -> Router<AppState> {
    handlers::user_routes(state)
}
