use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;

/// One stored card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Card {
    pub id: i64,          // assigned by the store, never reused
    pub content: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime, // set once on insert
}

/// True when `content` has something other than whitespace in it.
pub fn is_blank(content: &str) -> bool {
    content.trim().is_empty()
}
