//! The single authority on whether a card move is legal.
//!
//! Decisions are pure: the same board, card, role and keys always produce the
//! same answer, and nothing here mutates state.

use agency_board_core::{ActorRole, BoardAction, BoardError, BoardResult};
use serde::{Deserialize, Serialize};

use crate::board::Board;
use crate::card::Card;
use crate::card_lifecycle::is_done_placement;
use crate::column::Column;
use crate::placement::PlacementKey;
use crate::policy::{policy_for, BoardPolicy};

/// Signals computed alongside an ALLOW. None of them change what the store
/// does with positions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SideEffects {
    /// The card just reached a "done" bucket.
    pub celebrate: bool,
    /// The card's lifecycle is automated elsewhere; the local move is advisory.
    pub automation_handoff: bool,
    /// Same bucket, same index. Nothing to apply or persist.
    pub noop: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionDecision {
    Allow(SideEffects),
    Deny { action: BoardAction, role: ActorRole },
}

impl TransitionDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allow(_))
    }

    pub fn into_result(self) -> BoardResult<SideEffects> {
        match self {
            Self::Allow(effects) => Ok(effects),
            Self::Deny { action, role } => Err(BoardError::PermissionDenied { action, role }),
        }
    }
}

/// A proposed move, with the card's current bucket and index already read
/// from the store.
#[derive(Debug, Clone, Copy)]
pub struct MoveProposal<'a> {
    pub role: ActorRole,
    pub card: &'a Card,
    pub source: &'a PlacementKey,
    pub source_index: usize,
    pub destination: &'a PlacementKey,
    pub destination_index: usize,
}

impl MoveProposal<'_> {
    pub fn is_noop(&self) -> bool {
        self.source == self.destination && self.source_index == self.destination_index
    }
}

pub struct TransitionPolicy<'a> {
    board: &'a Board,
    columns: &'a [Column],
    rules: &'static dyn BoardPolicy,
}

impl<'a> TransitionPolicy<'a> {
    pub fn new(board: &'a Board, columns: &'a [Column]) -> Self {
        Self {
            board,
            columns,
            rules: policy_for(board.kind()),
        }
    }

    pub fn rules(&self) -> &'static dyn BoardPolicy {
        self.rules
    }

    /// Role gate for actions that don't carry a move.
    pub fn authorize(&self, action: BoardAction, role: ActorRole) -> TransitionDecision {
        if self.rules.permits(action, role) {
            TransitionDecision::Allow(SideEffects::default())
        } else {
            TransitionDecision::Deny { action, role }
        }
    }

    pub fn decide_move(&self, proposal: &MoveProposal<'_>) -> TransitionDecision {
        if !self.rules.can_move(proposal.role) {
            tracing::debug!(
                "Denying move of card {} for role {} on {:?} board",
                proposal.card.id,
                proposal.role,
                self.board.kind()
            );
            return TransitionDecision::Deny {
                action: BoardAction::Move,
                role: proposal.role,
            };
        }

        if proposal.is_noop() {
            return TransitionDecision::Allow(SideEffects {
                noop: true,
                ..SideEffects::default()
            });
        }

        let was_done = is_done_placement(self.board, self.columns, proposal.source);
        let is_done = is_done_placement(self.board, self.columns, proposal.destination);

        TransitionDecision::Allow(SideEffects {
            celebrate: is_done && !was_done,
            automation_handoff: proposal.card.origin.is_automated(),
            noop: false,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BoardKind, CardOrigin, NewCard};

    struct Fixture {
        board: Board,
        columns: Vec<Column>,
    }

    impl Fixture {
        fn simple() -> Self {
            let board = Board::new("Ops".to_string(), BoardKind::Simple);
            let columns = ["todo", "doing", "done"]
                .iter()
                .enumerate()
                .map(|(i, n)| Column::new(board.id, n.to_string(), i as i32))
                .collect();
            Self { board, columns }
        }

        fn design() -> Self {
            let board = Board::new("Design".to_string(), BoardKind::Design);
            let columns = vec![Column::for_assignee(board.id, "Ana", 0)];
            Self { board, columns }
        }

        fn policy(&self) -> TransitionPolicy<'_> {
            TransitionPolicy::new(&self.board, &self.columns)
        }

        fn card(&self, key: &PlacementKey) -> Card {
            Card::new(self.board.id, key, NewCard::titled("card"), 0)
        }
    }

    fn propose<'a>(
        role: ActorRole,
        card: &'a Card,
        source: &'a PlacementKey,
        destination: &'a PlacementKey,
    ) -> MoveProposal<'a> {
        MoveProposal {
            role,
            card,
            source,
            source_index: 0,
            destination,
            destination_index: 0,
        }
    }

    #[test]
    fn test_moving_into_done_column_celebrates() {
        let fx = Fixture::simple();
        let todo = PlacementKey::simple(fx.columns[0].id);
        let done = PlacementKey::simple(fx.columns[2].id);
        let card = fx.card(&todo);

        let effects = fx
            .policy()
            .decide_move(&propose(ActorRole::Admin, &card, &todo, &done))
            .into_result()
            .unwrap();
        assert!(effects.celebrate);
        assert!(!effects.automation_handoff);
        assert!(!effects.noop);
    }

    #[test]
    fn test_reorder_within_done_does_not_celebrate() {
        let fx = Fixture::simple();
        let done = PlacementKey::simple(fx.columns[2].id);
        let card = fx.card(&done);
        let mut proposal = propose(ActorRole::Admin, &card, &done, &done);
        proposal.destination_index = 3;

        let effects = fx.policy().decide_move(&proposal).into_result().unwrap();
        assert!(!effects.celebrate);
        assert!(!effects.noop);
    }

    #[test]
    fn test_approving_design_card_celebrates_for_designer() {
        let fx = Fixture::design();
        let from = PlacementKey::compound(fx.columns[0].id, "a_fazer");
        let to = PlacementKey::compound(fx.columns[0].id, "aprovado");
        let card = fx.card(&from);

        let decision = fx
            .policy()
            .decide_move(&propose(ActorRole::Designer, &card, &from, &to));
        assert_eq!(
            decision,
            TransitionDecision::Allow(SideEffects {
                celebrate: true,
                automation_handoff: false,
                noop: false,
            })
        );
    }

    #[test]
    fn test_viewer_is_denied() {
        let fx = Fixture::design();
        let from = PlacementKey::compound(fx.columns[0].id, "a_fazer");
        let to = PlacementKey::compound(fx.columns[0].id, "aprovado");
        let card = fx.card(&from);

        let err = fx
            .policy()
            .decide_move(&propose(ActorRole::Viewer, &card, &from, &to))
            .into_result()
            .unwrap_err();
        assert!(matches!(
            err,
            BoardError::PermissionDenied {
                action: BoardAction::Move,
                role: ActorRole::Viewer
            }
        ));
    }

    #[test]
    fn test_same_key_same_index_is_noop() {
        let fx = Fixture::simple();
        let todo = PlacementKey::simple(fx.columns[0].id);
        let card = fx.card(&todo);

        let effects = fx
            .policy()
            .decide_move(&propose(ActorRole::Manager, &card, &todo, &todo))
            .into_result()
            .unwrap();
        assert!(effects.noop);
        assert!(!effects.celebrate);
    }

    #[test]
    fn test_onboarding_cards_hand_off() {
        let fx = Fixture::simple();
        let todo = PlacementKey::simple(fx.columns[0].id);
        let doing = PlacementKey::simple(fx.columns[1].id);
        let mut card = fx.card(&todo);
        card.origin = CardOrigin::Onboarding;

        let effects = fx
            .policy()
            .decide_move(&propose(ActorRole::AccountManager, &card, &todo, &doing))
            .into_result()
            .unwrap();
        assert!(effects.automation_handoff);
    }

    #[test]
    fn test_authorize_uses_board_rules() {
        let fx = Fixture::design();
        assert!(fx
            .policy()
            .authorize(BoardAction::Create, ActorRole::AccountManager)
            .is_allowed());
        assert!(!fx
            .policy()
            .authorize(BoardAction::Archive, ActorRole::Designer)
            .is_allowed());
    }
}
