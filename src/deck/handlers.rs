use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use tracing::{debug, instrument};

use super::{
    dto::{CurrentCard, DeckView},
    Deck,
};
use crate::{
    auth::extractors::SessionGuard, cards::repo_types::Card, error::AppResult, state::AppState,
};

pub fn deck_routes() -> Router<AppState> {
    Router::new()
        .route("/deck", get(show))
        .route("/deck/shuffle", post(shuffle))
        .route("/deck/next", post(next))
        .route("/deck/prev", post(prev))
}

fn view(deck: &mut Deck) -> DeckView {
    let (position, total) = deck.position().unwrap_or((0, 0));
    DeckView {
        card: deck.current().map(CurrentCard::from),
        position,
        total,
    }
}

/// Current card; an empty deck is refilled from the store first.
#[instrument(skip_all, fields(session_id = %session.id))]
pub async fn show(
    State(state): State<AppState>,
    mut session: SessionGuard,
) -> AppResult<Json<DeckView>> {
    if session.deck.is_empty() {
        let cards = Card::list_all_shuffled(&state.db).await?;
        debug!(count = cards.len(), "deck loaded");
        session.deck.reshuffle(cards);
    }
    Ok(Json(view(&mut session.deck)))
}

#[instrument(skip_all, fields(session_id = %session.id))]
pub async fn shuffle(
    State(state): State<AppState>,
    mut session: SessionGuard,
) -> AppResult<Json<DeckView>> {
    let cards = Card::list_all_shuffled(&state.db).await?;
    debug!(count = cards.len(), "deck reshuffled");
    session.deck.reshuffle(cards);
    Ok(Json(view(&mut session.deck)))
}

#[instrument(skip_all, fields(session_id = %session.id))]
pub async fn next(mut session: SessionGuard) -> Json<DeckView> {
    session.deck.advance();
    Json(view(&mut session.deck))
}

#[instrument(skip_all, fields(session_id = %session.id))]
pub async fn prev(mut session: SessionGuard) -> Json<DeckView> {
    session.deck.retreat();
    Json(view(&mut session.deck))
}

#[cfg(test)]
mod tests {
    use time::OffsetDateTime;

    use super::*;
    use crate::deck::dto::palette_for;

    #[test]
    fn empty_view_has_no_card() {
        let mut deck = Deck::default();
        let v = view(&mut deck);
        assert!(v.card.is_none());
        assert_eq!((v.position, v.total), (0, 0));
    }

    #[test]
    fn view_carries_position_and_palette() {
        let mut deck = Deck::default();
        deck.reshuffle(vec![
            Card { id: 7, content: "seven".into(), created_at: OffsetDateTime::UNIX_EPOCH },
            Card { id: 8, content: "eight".into(), created_at: OffsetDateTime::UNIX_EPOCH },
        ]);
        deck.advance();
        let v = view(&mut deck);
        let card = v.card.expect("card");
        assert_eq!(card.id, 8);
        assert_eq!(card.palette, palette_for(8));
        assert_eq!((v.position, v.total), (2, 2));
    }

    #[test]
    fn palette_cycles_by_id() {
        assert_eq!(palette_for(0), palette_for(6));
        assert_ne!(palette_for(1), palette_for(2));
    }
}
