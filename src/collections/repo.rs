use anyhow::Context;
use async_trait::async_trait;
use sqlx::PgPool;

use super::repo_types::{Collection, CollectionRow};
use crate::error::{is_foreign_key_violation, AppError};

/// Every lookup and mutation is scoped by `(collection id, owner id)`; a
/// collection owned by someone else behaves exactly like a missing one.
#[async_trait]
pub trait CollectionRepo: Send + Sync {
    /// Pinned first, then by name.
    async fn list(&self, user_id: i64) -> Result<Vec<Collection>, AppError>;
    async fn get(&self, id: i64, user_id: i64) -> Result<Option<Collection>, AppError>;
    async fn create(&self, user_id: i64, name: &str, pinned: bool) -> Result<Collection, AppError>;
    async fn update(
        &self,
        id: i64,
        user_id: i64,
        name: &str,
        pinned: bool,
    ) -> Result<Option<Collection>, AppError>;
    /// Returns false when nothing matched the ownership predicate.
    async fn delete(&self, id: i64, user_id: i64) -> Result<bool, AppError>;
    async fn is_owner(&self, id: i64, user_id: i64) -> Result<bool, AppError>;
    /// Inserts the membership if `user_id` owns the collection; a duplicate
    /// is absorbed. Returns false when the caller does not own it.
    async fn add_game(&self, id: i64, game_id: i64, user_id: i64) -> Result<bool, AppError>;
    /// Deletes the membership if present. Returns false when the caller
    /// does not own the collection.
    async fn remove_game(&self, id: i64, game_id: i64, user_id: i64) -> Result<bool, AppError>;
}

#[derive(Clone)]
pub struct PgCollectionRepo {
    db: PgPool,
}

impl PgCollectionRepo {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    async fn game_ids(&self, collection_id: i64) -> Result<Vec<i64>, AppError> {
        let ids = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT game_id
              FROM collection_games
             WHERE collection_id = $1
             ORDER BY game_id ASC
            "#,
        )
        .bind(collection_id)
        .fetch_all(&self.db)
        .await?;
        Ok(ids)
    }
}

#[async_trait]
impl CollectionRepo for PgCollectionRepo {
    async fn list(&self, user_id: i64) -> Result<Vec<Collection>, AppError> {
        let rows = sqlx::query_as::<_, CollectionRow>(
            r#"
            SELECT id, user_id, name, pinned
              FROM collections
             WHERE user_id = $1
             ORDER BY pinned DESC, name ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.db)
        .await?;

        // One membership query per collection (N+1); fine for per-user lists.
        let mut out = Vec::with_capacity(rows.len());
        for row in rows {
            let ids = self.game_ids(row.id).await?;
            out.push(Collection::from_row(row, ids));
        }
        Ok(out)
    }

    async fn get(&self, id: i64, user_id: i64) -> Result<Option<Collection>, AppError> {
        let row = sqlx::query_as::<_, CollectionRow>(
            r#"
            SELECT id, user_id, name, pinned
              FROM collections
             WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.db)
        .await?;

        match row {
            Some(row) => {
                let ids = self.game_ids(row.id).await?;
                Ok(Some(Collection::from_row(row, ids)))
            }
            None => Ok(None),
        }
    }

    async fn create(&self, user_id: i64, name: &str, pinned: bool) -> Result<Collection, AppError> {
        // Dropping `tx` on an early return rolls the insert back.
        let mut tx = self.db.begin().await.context("begin tx")?;
        let row = sqlx::query_as::<_, CollectionRow>(
            r#"
            INSERT INTO collections (user_id, name, pinned)
            VALUES ($1, $2, $3)
            RETURNING id, user_id, name, pinned
            "#,
        )
        .bind(user_id)
        .bind(name)
        .bind(pinned)
        .fetch_one(&mut *tx)
        .await?;
        tx.commit().await.context("commit tx")?;

        Ok(Collection::from_row(row, Vec::new()))
    }

    async fn update(
        &self,
        id: i64,
        user_id: i64,
        name: &str,
        pinned: bool,
    ) -> Result<Option<Collection>, AppError> {
        let row = sqlx::query_as::<_, CollectionRow>(
            r#"
            UPDATE collections
               SET name = $3, pinned = $4, updated_at = NOW()
             WHERE id = $1 AND user_id = $2
            RETURNING id, user_id, name, pinned
            "#,
        )
        .bind(id)
        .bind(user_id)
        .bind(name)
        .bind(pinned)
        .fetch_optional(&self.db)
        .await?;

        match row {
            Some(row) => {
                let ids = self.game_ids(row.id).await?;
                Ok(Some(Collection::from_row(row, ids)))
            }
            None => Ok(None),
        }
    }

    async fn delete(&self, id: i64, user_id: i64) -> Result<bool, AppError> {
        // Membership rows go with it (ON DELETE CASCADE).
        let result = sqlx::query("DELETE FROM collections WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&self.db)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn is_owner(&self, id: i64, user_id: i64) -> Result<bool, AppError> {
        let owned: bool = sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM collections WHERE id = $1 AND user_id = $2)",
        )
        .bind(id)
        .bind(user_id)
        .fetch_one(&self.db)
        .await?;
        Ok(owned)
    }

    async fn add_game(&self, id: i64, game_id: i64, user_id: i64) -> Result<bool, AppError> {
        // Ownership check and insert in one statement; the row lock keeps a
        // concurrent delete of the collection from interleaving.
        sqlx::query_scalar::<_, bool>(
            r#"
            WITH owned AS (
                SELECT id FROM collections
                 WHERE id = $1 AND user_id = $3
                   FOR UPDATE
            ), inserted AS (
                INSERT INTO collection_games (collection_id, game_id)
                SELECT id, $2 FROM owned
                ON CONFLICT DO NOTHING
                RETURNING collection_id
            )
            SELECT EXISTS (SELECT 1 FROM owned)
            "#,
        )
        .bind(id)
        .bind(game_id)
        .bind(user_id)
        .fetch_one(&self.db)
        .await
        .map_err(|e| {
            if is_foreign_key_violation(&e) {
                AppError::NotFound("game")
            } else {
                e.into()
            }
        })
    }

    async fn remove_game(&self, id: i64, game_id: i64, user_id: i64) -> Result<bool, AppError> {
        let owned = sqlx::query_scalar::<_, bool>(
            r#"
            WITH owned AS (
                SELECT id FROM collections
                 WHERE id = $1 AND user_id = $3
                   FOR UPDATE
            ), removed AS (
                DELETE FROM collection_games cg
                 USING owned
                 WHERE cg.collection_id = owned.id AND cg.game_id = $2
                RETURNING cg.game_id
            )
            SELECT EXISTS (SELECT 1 FROM owned)
            "#,
        )
        .bind(id)
        .bind(game_id)
        .bind(user_id)
        .fetch_one(&self.db)
        .await?;
        Ok(owned)
    }
}
