//! Per-session browsing state over a snapshot of shuffled cards.
//!
//! Paging wraps around in both directions: `advance` past the last card
//! lands on the first, `retreat` before the first lands on the last.

mod dto;
pub mod handlers;

use crate::cards::repo_types::Card;
use crate::state::AppState;
use axum::Router;

pub fn router() -> Router<AppState> {
    handlers::deck_routes()
}

#[derive(Debug, Default, Clone)]
pub struct Deck {
    cards: Vec<Card>,
    cursor: usize,
}

impl Deck {
    /// Replace the snapshot with an already shuffled batch.
    pub fn reshuffle(&mut self, cards: Vec<Card>) {
        self.cards = cards;
        self.cursor = 0;
    }

    pub fn advance(&mut self) {
        let len = self.cards.len();
        if len == 0 {
            return;
        }
        self.clamp();
        self.cursor = (self.cursor + 1) % len;
    }

    pub fn retreat(&mut self) {
        let len = self.cards.len();
        if len == 0 {
            return;
        }
        self.clamp();
        self.cursor = (self.cursor + len - 1) % len;
    }

    pub fn current(&mut self) -> Option<&Card> {
        self.clamp();
        self.cards.get(self.cursor)
    }

    /// 1-based position of the current card and the deck size.
    pub fn position(&mut self) -> Option<(usize, usize)> {
        self.clamp();
        if self.cards.is_empty() {
            None
        } else {
            Some((self.cursor + 1, self.cards.len()))
        }
    }

    /// Drop a card this session deleted so it stops showing up.
    pub fn forget(&mut self, id: i64) {
        if let Some(idx) = self.cards.iter().position(|c| c.id == id) {
            self.cards.remove(idx);
            if idx < self.cursor {
                self.cursor -= 1;
            }
        }
        self.clamp();
    }

    pub fn clear(&mut self) {
        self.reshuffle(Vec::new());
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    fn clamp(&mut self) {
        self.cursor = self.cursor.min(self.cards.len().saturating_sub(1));
    }
}

#[cfg(test)]
mod tests {
    use time::OffsetDateTime;

    use super::*;

    fn card(id: i64) -> Card {
        Card {
            id,
            content: format!("card {id}"),
            created_at: OffsetDateTime::UNIX_EPOCH,
        }
    }

    fn deck_of(ids: &[i64]) -> Deck {
        let mut deck = Deck::default();
        deck.reshuffle(ids.iter().copied().map(card).collect());
        deck
    }

    fn current_id(deck: &mut Deck) -> Option<i64> {
        deck.current().map(|c| c.id)
    }

    #[test]
    fn empty_deck_has_no_card() {
        let mut deck = Deck::default();
        assert_eq!(current_id(&mut deck), None);
        deck.advance();
        deck.retreat();
        assert_eq!(current_id(&mut deck), None);
        assert_eq!(deck.position(), None);
    }

    #[test]
    fn retreat_from_start_wraps_to_last() {
        let mut deck = deck_of(&[10, 20, 30]);
        deck.retreat();
        assert_eq!(current_id(&mut deck), Some(30));
        assert_eq!(deck.position(), Some((3, 3)));
    }

    #[test]
    fn advance_from_end_wraps_to_first() {
        let mut deck = deck_of(&[10, 20, 30]);
        deck.advance();
        deck.advance();
        assert_eq!(current_id(&mut deck), Some(30));
        deck.advance();
        assert_eq!(current_id(&mut deck), Some(10));
    }

    #[test]
    fn reshuffle_resets_cursor() {
        let mut deck = deck_of(&[1, 2, 3]);
        deck.advance();
        deck.reshuffle(vec![card(7), card(8)]);
        assert_eq!(current_id(&mut deck), Some(7));

        deck.reshuffle(Vec::new());
        assert!(deck.is_empty());
        assert_eq!(current_id(&mut deck), None);
    }

    #[test]
    fn forget_last_card_clamps_cursor() {
        let mut deck = deck_of(&[1, 2, 3]);
        deck.retreat();
        deck.forget(3);
        assert_eq!(current_id(&mut deck), Some(2));
        assert_eq!(deck.position(), Some((2, 2)));
    }

    #[test]
    fn forget_before_cursor_keeps_current_card() {
        let mut deck = deck_of(&[1, 2, 3]);
        deck.advance();
        deck.advance();
        deck.forget(1);
        assert_eq!(current_id(&mut deck), Some(3));
        deck.forget(99);
        assert_eq!(current_id(&mut deck), Some(3));
    }
}
