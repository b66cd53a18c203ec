use serde::{Deserialize, Serialize};

/// Body of `POST /games/` and `PUT /games/:id`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GameInput {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub genre: String,
    #[serde(default)]
    pub age: String,
    #[serde(default)]
    pub person: String,
    #[serde(default)]
    pub avg_time: String,
    #[serde(default, rename = "complexity")]
    pub difficulty: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub rules: String,
}

#[derive(Debug, Deserialize)]
pub struct ByIdsRequest {
    pub ids: Vec<i64>,
}

#[derive(Debug, Serialize)]
pub struct CreatedGameResponse {
    pub id: i64,
}
