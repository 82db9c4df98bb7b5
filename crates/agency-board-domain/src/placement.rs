//! Compound addressing of where a card lives on a board.

use agency_board_core::{BoardError, BoardResult};
use serde::{Deserialize, Serialize};

use crate::board::{Board, BoardVariant};
use crate::card::Card;
use crate::card_lifecycle::sorted_board_columns;
use crate::column::{Column, ColumnId};
use crate::status::StatusId;

/// A placement bucket. Simple boards address by column, compound boards by
/// column × status. The owning board is implied by the store holding the key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PlacementKey {
    Simple {
        column_id: ColumnId,
    },
    Compound {
        column_id: ColumnId,
        status: StatusId,
    },
}

impl PlacementKey {
    pub fn simple(column_id: ColumnId) -> Self {
        Self::Simple { column_id }
    }

    pub fn compound(column_id: ColumnId, status: impl Into<StatusId>) -> Self {
        Self::Compound {
            column_id,
            status: status.into(),
        }
    }

    pub fn column_id(&self) -> ColumnId {
        match self {
            Self::Simple { column_id } | Self::Compound { column_id, .. } => *column_id,
        }
    }

    pub fn status(&self) -> Option<&StatusId> {
        match self {
            Self::Simple { .. } => None,
            Self::Compound { status, .. } => Some(status),
        }
    }

    pub fn variant(&self) -> BoardVariant {
        match self {
            Self::Simple { .. } => BoardVariant::Simple,
            Self::Compound { .. } => BoardVariant::Compound,
        }
    }

    /// Bucket a card is displayed in. On compound boards an absent or
    /// unrecognized stored status resolves to the default status.
    pub fn of_card(board: &Board, card: &Card) -> Self {
        match board.kind().status_catalog() {
            None => Self::simple(card.column_id),
            Some(catalog) => Self::Compound {
                column_id: card.column_id,
                status: catalog.resolve(card.status.as_deref()),
            },
        }
    }

    /// Default bucket of a column: the column itself, or its first status.
    pub fn default_for_column(board: &Board, column_id: ColumnId) -> Self {
        match board.kind().status_catalog() {
            None => Self::simple(column_id),
            Some(catalog) => Self::Compound {
                column_id,
                status: catalog.default_status(),
            },
        }
    }

    /// Checks the key is well formed for this board: right variant, a column
    /// of this board, and a status from the board's enumeration.
    pub fn validate(&self, board: &Board, columns: &[Column]) -> BoardResult<()> {
        if self.variant() != board.variant() {
            return Err(BoardError::InvalidPlacement(format!(
                "{:?} key used on a {:?} board",
                self.variant(),
                board.variant()
            )));
        }

        let column_id = self.column_id();
        if !columns
            .iter()
            .any(|c| c.id == column_id && c.board_id == board.id)
        {
            return Err(BoardError::InvalidPlacement(format!(
                "column {} is not on board {}",
                column_id, board.id
            )));
        }

        if let (Some(status), Some(catalog)) = (self.status(), board.kind().status_catalog()) {
            if !catalog.contains(status.as_str()) {
                return Err(BoardError::InvalidPlacement(format!(
                    "status '{}' is not a {:?} board status",
                    status,
                    board.kind()
                )));
            }
        }

        Ok(())
    }

    /// Every bucket of the board in display order: columns by position, then
    /// statuses in enumeration order.
    pub fn all_for_board(board: &Board, columns: &[Column]) -> Vec<Self> {
        let sorted = sorted_board_columns(board.id, columns);
        match board.kind().status_catalog() {
            None => sorted.iter().map(|c| Self::simple(c.id)).collect(),
            Some(catalog) => sorted
                .iter()
                .flat_map(|c| {
                    catalog.statuses().map(move |status| Self::Compound {
                        column_id: c.id,
                        status,
                    })
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::BoardKind;
    use crate::card::NewCard;

    fn design_board() -> (Board, Vec<Column>) {
        let board = Board::new("Design".to_string(), BoardKind::Design);
        let columns = vec![
            Column::for_assignee(board.id, "Ana", 0),
            Column::for_assignee(board.id, "Bruno", 1),
        ];
        (board, columns)
    }

    #[test]
    fn test_of_card_remaps_unknown_status_without_touching_card() {
        let (board, columns) = design_board();
        let key = PlacementKey::compound(columns[0].id, "fazendo");
        let mut card = Card::new(board.id, &key, NewCard::titled("Logo"), 0);
        card.status = Some("legacy_status".to_string());

        let resolved = PlacementKey::of_card(&board, &card);
        assert_eq!(resolved, PlacementKey::compound(columns[0].id, "a_fazer"));
        assert_eq!(card.status.as_deref(), Some("legacy_status"));
    }

    #[test]
    fn test_validate_rejects_wrong_variant() {
        let (board, columns) = design_board();
        let err = PlacementKey::simple(columns[0].id)
            .validate(&board, &columns)
            .unwrap_err();
        assert!(matches!(err, BoardError::InvalidPlacement(_)));
    }

    #[test]
    fn test_validate_rejects_unknown_status_and_foreign_column() {
        let (board, columns) = design_board();
        assert!(PlacementKey::compound(columns[0].id, "entregue")
            .validate(&board, &columns)
            .is_err());
        assert!(PlacementKey::compound(uuid::Uuid::new_v4(), "a_fazer")
            .validate(&board, &columns)
            .is_err());
        assert!(PlacementKey::compound(columns[1].id, "aprovado")
            .validate(&board, &columns)
            .is_ok());
    }

    #[test]
    fn test_all_for_board_is_column_major() {
        let (board, columns) = design_board();
        let keys = PlacementKey::all_for_board(&board, &columns);
        assert_eq!(keys.len(), 10);
        assert_eq!(keys[0], PlacementKey::compound(columns[0].id, "a_fazer"));
        assert_eq!(keys[4], PlacementKey::compound(columns[0].id, "aprovado"));
        assert_eq!(keys[5], PlacementKey::compound(columns[1].id, "a_fazer"));
    }

    #[test]
    fn test_simple_board_keys() {
        let board = Board::new("Ops".to_string(), BoardKind::Simple);
        let columns = vec![
            Column::new(board.id, "Doing".to_string(), 1),
            Column::new(board.id, "Todo".to_string(), 0),
        ];
        let keys = PlacementKey::all_for_board(&board, &columns);
        assert_eq!(
            keys,
            vec![
                PlacementKey::simple(columns[1].id),
                PlacementKey::simple(columns[0].id)
            ]
        );
    }
}
