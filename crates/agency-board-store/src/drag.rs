//! Pointer-level drag state, independent of any UI toolkit.
//!
//! A [`DragSession`] remembers what is being dragged and where it started.
//! Dropping it resolves the target against the current [`PlacementView`] and
//! yields a [`DropOutcome`], which [`BoardCardStore::commit_drop`] turns into a
//! store mutation.

use agency_board_core::{BoardError, BoardResult, IdentityProvider};
use agency_board_domain::{BoardId, Card, CardId, NewCard, PlacementKey, PlacementView, SideEffects};

use crate::store::BoardCardStore;
use crate::traits::CardPersistence;

#[derive(Debug, Clone, PartialEq)]
pub enum DragSubject {
    Card {
        card_id: CardId,
        origin: PlacementKey,
        origin_index: usize,
    },
    NewCard {
        board_id: BoardId,
        fields: NewCard,
    },
}

/// Where the pointer was released: a bucket, and the card the dragged item
/// lands in front of. `before: None` means the end of the bucket.
#[derive(Debug, Clone, PartialEq)]
pub struct DropTarget {
    pub key: PlacementKey,
    pub before: Option<CardId>,
}

impl DropTarget {
    pub fn at_end(key: PlacementKey) -> Self {
        Self { key, before: None }
    }

    pub fn before(key: PlacementKey, card_id: CardId) -> Self {
        Self {
            key,
            before: Some(card_id),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DropOutcome {
    Cancelled,
    Move {
        card_id: CardId,
        destination: PlacementKey,
        destination_index: usize,
    },
    Create {
        board_id: BoardId,
        destination: PlacementKey,
        fields: NewCard,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum DropResult {
    Cancelled,
    Moved(SideEffects),
    Created(Card),
}

#[derive(Debug, Clone)]
pub struct DragSession {
    subject: DragSubject,
    hovering: Option<PlacementKey>,
}

impl DragSession {
    /// Start dragging a card that is currently rendered in `view`.
    pub fn pick_up(card_id: CardId, view: &PlacementView) -> BoardResult<Self> {
        let (origin, origin_index) = view
            .locate(card_id)
            .ok_or_else(|| BoardError::NotFound(format!("card {} is not on the board", card_id)))?;
        tracing::debug!("Picked up card {} from {:?}", card_id, origin);
        Ok(Self {
            subject: DragSubject::Card {
                card_id,
                origin: origin.clone(),
                origin_index,
            },
            hovering: Some(origin.clone()),
        })
    }

    /// Start dragging a card that does not exist yet, e.g. from a palette.
    pub fn new_card(board_id: BoardId, fields: NewCard) -> Self {
        Self {
            subject: DragSubject::NewCard { board_id, fields },
            hovering: None,
        }
    }

    pub fn subject(&self) -> &DragSubject {
        &self.subject
    }

    pub fn hover(&mut self, key: Option<PlacementKey>) {
        self.hovering = key;
    }

    pub fn hovering(&self) -> Option<&PlacementKey> {
        self.hovering.as_ref()
    }

    /// Resolve the release point. Dropping outside any bucket, on a bucket the
    /// view doesn't render, or back onto the exact starting slot cancels.
    pub fn drop(self, target: Option<DropTarget>, view: &PlacementView) -> DropOutcome {
        let Some(target) = target else {
            return DropOutcome::Cancelled;
        };
        let Some(bucket) = view.get(&target.key) else {
            tracing::debug!("Drop on unrendered bucket {:?} cancelled", target.key);
            return DropOutcome::Cancelled;
        };

        let dragged = match &self.subject {
            DragSubject::Card { card_id, .. } => Some(*card_id),
            DragSubject::NewCard { .. } => None,
        };
        let remaining: Vec<CardId> = bucket
            .iter()
            .map(|c| c.id)
            .filter(|id| Some(*id) != dragged)
            .collect();
        // Released on the dragged card's own placeholder: it stays put.
        let index = match target.before {
            Some(before) if Some(before) == dragged => bucket
                .iter()
                .position(|c| c.id == before)
                .unwrap_or(remaining.len()),
            Some(before) => remaining
                .iter()
                .position(|id| *id == before)
                .unwrap_or(remaining.len()),
            None => remaining.len(),
        };

        match self.subject {
            DragSubject::Card {
                card_id,
                origin,
                origin_index,
            } => {
                if origin == target.key && origin_index == index {
                    return DropOutcome::Cancelled;
                }
                DropOutcome::Move {
                    card_id,
                    destination: target.key,
                    destination_index: index,
                }
            }
            DragSubject::NewCard { board_id, fields } => DropOutcome::Create {
                board_id,
                destination: target.key,
                fields,
            },
        }
    }
}

impl BoardCardStore {
    /// Carry out a resolved drop as the acting identity.
    pub async fn commit_drop<P>(
        &mut self,
        outcome: DropOutcome,
        identity: &dyn IdentityProvider,
        persistence: &P,
    ) -> BoardResult<DropResult>
    where
        P: CardPersistence + ?Sized,
    {
        let role = identity.current_role();
        match outcome {
            DropOutcome::Cancelled => Ok(DropResult::Cancelled),
            DropOutcome::Move {
                card_id,
                destination,
                destination_index,
            } => self
                .move_card(persistence, card_id, destination, destination_index, role)
                .await
                .map(DropResult::Moved),
            DropOutcome::Create {
                board_id,
                destination,
                fields,
            } => self
                .create_card(persistence, board_id, destination, fields, role)
                .await
                .map(DropResult::Created),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agency_board_domain::{Board, BoardKind, Column};

    struct Fixture {
        view: PlacementView,
        todo: PlacementKey,
        doing: PlacementKey,
        cards: Vec<Card>,
        board_id: BoardId,
    }

    fn fixture() -> Fixture {
        let board = Board::new("Ops".to_string(), BoardKind::Simple);
        let todo_col = Column::new(board.id, "Todo".to_string(), 0);
        let doing_col = Column::new(board.id, "Doing".to_string(), 1);
        let todo = PlacementKey::simple(todo_col.id);
        let doing = PlacementKey::simple(doing_col.id);
        let cards: Vec<Card> = (0..3)
            .map(|i| {
                Card::new(
                    board.id,
                    &todo,
                    NewCard::titled(format!("card {}", i)),
                    1024 * (i + 1),
                )
            })
            .collect();
        let view = PlacementView::build(&board, &[todo_col, doing_col], &cards);
        Fixture {
            view,
            todo,
            doing,
            cards,
            board_id: board.id,
        }
    }

    #[test]
    fn test_drop_outside_cancels() {
        let f = fixture();
        let session = DragSession::pick_up(f.cards[0].id, &f.view).unwrap();
        assert_eq!(session.drop(None, &f.view), DropOutcome::Cancelled);
    }

    #[test]
    fn test_drop_on_origin_slot_cancels() {
        let f = fixture();
        let session = DragSession::pick_up(f.cards[1].id, &f.view).unwrap();
        let target = DropTarget::before(f.todo.clone(), f.cards[2].id);
        assert_eq!(session.drop(Some(target), &f.view), DropOutcome::Cancelled);
    }

    #[test]
    fn test_drop_on_own_placeholder_cancels() {
        let f = fixture();
        for (index, card) in f.cards.iter().enumerate() {
            let session = DragSession::pick_up(card.id, &f.view).unwrap();
            let target = DropTarget::before(f.todo.clone(), card.id);
            assert_eq!(
                session.drop(Some(target), &f.view),
                DropOutcome::Cancelled,
                "card at index {}",
                index
            );
        }
    }

    #[test]
    fn test_drop_before_card_excludes_dragged_card() {
        let f = fixture();
        let session = DragSession::pick_up(f.cards[0].id, &f.view).unwrap();
        let target = DropTarget::at_end(f.todo.clone());

        assert_eq!(
            session.drop(Some(target), &f.view),
            DropOutcome::Move {
                card_id: f.cards[0].id,
                destination: f.todo.clone(),
                destination_index: 2,
            }
        );
    }

    #[test]
    fn test_drop_into_other_bucket() {
        let f = fixture();
        let mut session = DragSession::pick_up(f.cards[2].id, &f.view).unwrap();
        assert_eq!(session.hovering(), Some(&f.todo));
        session.hover(Some(f.doing.clone()));

        let outcome = session.drop(Some(DropTarget::at_end(f.doing.clone())), &f.view);
        assert_eq!(
            outcome,
            DropOutcome::Move {
                card_id: f.cards[2].id,
                destination: f.doing.clone(),
                destination_index: 0,
            }
        );
    }

    #[test]
    fn test_drop_on_unknown_bucket_cancels() {
        let f = fixture();
        let session = DragSession::pick_up(f.cards[0].id, &f.view).unwrap();
        let stray = PlacementKey::simple(uuid::Uuid::new_v4());
        assert_eq!(
            session.drop(Some(DropTarget::at_end(stray)), &f.view),
            DropOutcome::Cancelled
        );
    }

    #[test]
    fn test_pick_up_unknown_card_fails() {
        let f = fixture();
        let result = DragSession::pick_up(uuid::Uuid::new_v4(), &f.view);
        assert!(matches!(result, Err(BoardError::NotFound(_))));
    }

    #[test]
    fn test_new_card_drop_creates() {
        let f = fixture();
        let session = DragSession::new_card(f.board_id, NewCard::titled("fresh"));
        let outcome = session.drop(
            Some(DropTarget::before(f.todo.clone(), f.cards[0].id)),
            &f.view,
        );
        assert_eq!(
            outcome,
            DropOutcome::Create {
                board_id: f.board_id,
                destination: f.todo.clone(),
                fields: NewCard::titled("fresh"),
            }
        );
    }
}
