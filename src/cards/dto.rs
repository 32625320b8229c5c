use serde::{Deserialize, Serialize};

use crate::cards::repo_types::Card;

#[derive(Debug, Deserialize)]
pub struct CreateCardRequest {
    pub content: String,
}

#[derive(Debug, Serialize)]
pub struct CreatedCardResponse {
    pub id: i64,
}

#[derive(Debug, Serialize)]
pub struct CardList {
    pub total: usize,
    pub cards: Vec<Card>,
}

/// Outcome of `DELETE /cards`. The first call only arms the confirmation.
#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DeleteAllResponse {
    ConfirmationRequired { message: &'static str },
    Deleted { removed: u64 },
}
