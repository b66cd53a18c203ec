pub mod client;
pub mod dto;
pub mod handlers;
pub mod services;
pub mod transcript;

pub use client::{ChatProvider, OpenRouterClient};
pub use services::ChatService;

use crate::state::AppState;
use axum::Router;

pub fn router(state: AppState) -> Router<AppState> {
    handlers::chat_routes(state)
}
