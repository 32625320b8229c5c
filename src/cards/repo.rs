use rand::seq::SliceRandom;
use sqlx::SqlitePool;
use tracing::debug;

use crate::cards::repo_types::{is_blank, Card};
use crate::error::{AppError, AppResult};

impl Card {
    /// Insert a single card and return its id.
    pub async fn insert_one(db: &SqlitePool, content: &str) -> AppResult<i64> {
        if is_blank(content) {
            return Err(AppError::Validation("card content must not be empty".into()));
        }
        let id = sqlx::query("INSERT INTO cards (content) VALUES (?)")
            .bind(content)
            .execute(db)
            .await?
            .last_insert_rowid();
        debug!(id, "card inserted");
        Ok(id)
    }

    /// Insert every non-blank entry in one transaction. Blank entries are
    /// skipped, the rest are kept.
    pub async fn insert_many<S: AsRef<str>>(db: &SqlitePool, contents: &[S]) -> AppResult<u64> {
        let valid: Vec<&str> = contents
            .iter()
            .map(AsRef::<str>::as_ref)
            .filter(|c| !is_blank(c))
            .collect();
        if valid.is_empty() {
            return Ok(0);
        }

        let mut tx = db.begin().await?;
        let mut inserted = 0u64;
        for content in &valid {
            inserted += sqlx::query("INSERT INTO cards (content) VALUES (?)")
                .bind(*content)
                .execute(&mut *tx)
                .await?
                .rows_affected();
        }
        tx.commit().await?;

        debug!(inserted, skipped = contents.len() - valid.len(), "cards inserted in batch");
        Ok(inserted)
    }

    /// Newest first; equal timestamps fall back to the higher id.
    pub async fn list_all_by_recency(db: &SqlitePool) -> AppResult<Vec<Card>> {
        let rows = sqlx::query_as::<_, Card>(
            r#"
            SELECT id, content, created_at
            FROM cards
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    /// Every card in a fresh uniformly random order.
    pub async fn list_all_shuffled(db: &SqlitePool) -> AppResult<Vec<Card>> {
        let mut rows = sqlx::query_as::<_, Card>("SELECT id, content, created_at FROM cards")
            .fetch_all(db)
            .await?;
        rows.shuffle(&mut rand::thread_rng());
        Ok(rows)
    }

    pub async fn delete_one(db: &SqlitePool, id: i64) -> AppResult<()> {
        let res = sqlx::query("DELETE FROM cards WHERE id = ?")
            .bind(id)
            .execute(db)
            .await?;
        if res.rows_affected() == 0 {
            return Err(AppError::NotFound(id));
        }
        debug!(id, "card deleted");
        Ok(())
    }

    /// Remove every card. Safe to call on an empty table.
    pub async fn delete_all(db: &SqlitePool) -> AppResult<u64> {
        let mut tx = db.begin().await?;
        let removed = sqlx::query("DELETE FROM cards")
            .execute(&mut *tx)
            .await?
            .rows_affected();
        tx.commit().await?;
        debug!(removed, "all cards deleted");
        Ok(removed)
    }
}
