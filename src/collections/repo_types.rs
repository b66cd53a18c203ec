use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow)]
pub struct CollectionRow {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    pub pinned: bool,
}

/// A user-owned collection together with its member game ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Collection {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    pub pinned: bool,
    pub game_ids: Vec<i64>,
}

impl Collection {
    pub fn from_row(r: CollectionRow, game_ids: Vec<i64>) -> Self {
        Self {
            id: r.id,
            user_id: r.user_id,
            name: r.name,
            pinned: r.pinned,
            game_ids,
        }
    }
}
