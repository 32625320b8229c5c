use serde::Serialize;
use time::OffsetDateTime;

use crate::cards::repo_types::Card;

/// Background/text colour pair a card is drawn with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Palette {
    pub bg: &'static str,
    pub text: &'static str,
}

const PALETTES: [Palette; 6] = [
    Palette { bg: "#E6F3FF", text: "#003366" },
    Palette { bg: "#FFE6E6", text: "#660000" },
    Palette { bg: "#E6FFE6", text: "#006600" },
    Palette { bg: "#FFE6FF", text: "#660066" },
    Palette { bg: "#FFF3E6", text: "#663300" },
    Palette { bg: "#E6FFFF", text: "#006666" },
];

/// Same card, same colours, every time.
pub fn palette_for(card_id: i64) -> Palette {
    PALETTES[card_id.rem_euclid(PALETTES.len() as i64) as usize]
}

#[derive(Debug, Serialize)]
pub struct CurrentCard {
    pub id: i64,
    pub content: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    pub palette: Palette,
}

impl From<&Card> for CurrentCard {
    fn from(card: &Card) -> Self {
        Self {
            id: card.id,
            content: card.content.clone(),
            created_at: card.created_at,
            palette: palette_for(card.id),
        }
    }
}

/// The "one card at a time" view. `card` is absent when there is nothing
/// to show.
#[derive(Debug, Serialize)]
pub struct DeckView {
    pub card: Option<CurrentCard>,
    pub position: usize,
    pub total: usize,
}
