use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Catalog entry. `difficulty` is exposed as `complexity` in JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Game {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub genre: String,
    pub age: String,
    pub person: String,
    pub avg_time: String,
    #[serde(rename = "complexity")]
    pub difficulty: String,
    pub image: String,
    pub rules: String,
}
