use async_trait::async_trait;
use sqlx::PgPool;

use super::{dto::GameInput, repo_types::Game};
use crate::error::AppError;

#[async_trait]
pub trait GameRepo: Send + Sync {
    /// All games ordered by title ascending.
    async fn list(&self) -> Result<Vec<Game>, AppError>;
    async fn get(&self, id: i64) -> Result<Option<Game>, AppError>;
    async fn get_many(&self, ids: &[i64]) -> Result<Vec<Game>, AppError>;
    async fn create(&self, game: &GameInput) -> Result<i64, AppError>;
    /// Returns false when no row has this id.
    async fn update(&self, id: i64, game: &GameInput) -> Result<bool, AppError>;
    /// Returns false when no row has this id.
    async fn delete(&self, id: i64) -> Result<bool, AppError>;
}

#[derive(Clone)]
pub struct PgGameRepo {
    db: PgPool,
}

impl PgGameRepo {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl GameRepo for PgGameRepo {
    async fn list(&self) -> Result<Vec<Game>, AppError> {
        let rows = sqlx::query_as::<_, Game>(
            r#"
            SELECT id, title, description, genre, age, person, avg_time, difficulty, image, rules
            FROM games
            ORDER BY title ASC
            "#,
        )
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }

    async fn get(&self, id: i64) -> Result<Option<Game>, AppError> {
        let row = sqlx::query_as::<_, Game>(
            r#"
            SELECT id, title, description, genre, age, person, avg_time, difficulty, image, rules
            FROM games
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?;
        Ok(row)
    }

    async fn get_many(&self, ids: &[i64]) -> Result<Vec<Game>, AppError> {
        let rows = sqlx::query_as::<_, Game>(
            r#"
            SELECT id, title, description, genre, age, person, avg_time, difficulty, image, rules
            FROM games
            WHERE id = ANY($1)
            ORDER BY title ASC
            "#,
        )
        .bind(ids)
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }

    async fn create(&self, game: &GameInput) -> Result<i64, AppError> {
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO games (title, description, genre, age, person, avg_time, difficulty, image, rules)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING id
            "#,
        )
        .bind(&game.title)
        .bind(&game.description)
        .bind(&game.genre)
        .bind(&game.age)
        .bind(&game.person)
        .bind(&game.avg_time)
        .bind(&game.difficulty)
        .bind(&game.image)
        .bind(&game.rules)
        .fetch_one(&self.db)
        .await?;
        Ok(id)
    }

    async fn update(&self, id: i64, game: &GameInput) -> Result<bool, AppError> {
        let result = sqlx::query(
            r#"
            UPDATE games
               SET title = $2, description = $3, genre = $4, age = $5, person = $6,
                   avg_time = $7, difficulty = $8, image = $9, rules = $10,
                   updated_at = NOW()
             WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(&game.title)
        .bind(&game.description)
        .bind(&game.genre)
        .bind(&game.age)
        .bind(&game.person)
        .bind(&game.avg_time)
        .bind(&game.difficulty)
        .bind(&game.image)
        .bind(&game.rules)
        .execute(&self.db)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM games WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
