use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::column::{Column, ColumnId};
use crate::status::StatusCatalog;

pub type BoardId = Uuid;

/// How cards on a board are addressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoardVariant {
    /// Column only.
    Simple,
    /// Column × sub-status.
    Compound,
}

/// The concrete kind of board. Compound kinds each carry their own status
/// enumeration and permission rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoardKind {
    Simple,
    Design,
    Video,
    Dev,
    Produtora,
}

impl BoardKind {
    pub fn variant(self) -> BoardVariant {
        match self {
            Self::Simple => BoardVariant::Simple,
            Self::Design | Self::Video | Self::Dev | Self::Produtora => BoardVariant::Compound,
        }
    }

    /// Status enumeration for compound kinds, `None` for simple boards.
    pub fn status_catalog(self) -> Option<&'static StatusCatalog> {
        StatusCatalog::for_kind(self)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Board {
    pub id: BoardId,
    pub name: String,
    kind: BoardKind,
    #[serde(default)]
    pub completion_column_id: Option<ColumnId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Board {
    pub fn new(name: String, kind: BoardKind) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name,
            kind,
            completion_column_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn kind(&self) -> BoardKind {
        self.kind
    }

    pub fn variant(&self) -> BoardVariant {
        self.kind.variant()
    }

    pub fn is_compound(&self) -> bool {
        self.variant() == BoardVariant::Compound
    }

    pub fn update_name(&mut self, name: String) {
        self.name = name;
        self.updated_at = Utc::now();
    }

    pub fn update_completion_column_id(&mut self, column_id: Option<ColumnId>) {
        self.completion_column_id = column_id;
        self.updated_at = Utc::now();
    }

    /// The column that means "done" on a simple board: the explicit one if it
    /// still belongs to this board, otherwise the last column by position.
    pub fn resolve_completion_column(&self, columns: &[Column]) -> Option<ColumnId> {
        if let Some(explicit) = self.completion_column_id {
            if columns
                .iter()
                .any(|c| c.id == explicit && c.board_id == self.id)
            {
                return Some(explicit);
            }
        }
        columns
            .iter()
            .filter(|c| c.board_id == self.id)
            .max_by_key(|c| c.position)
            .map(|c| c.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variant_follows_kind() {
        assert_eq!(BoardKind::Simple.variant(), BoardVariant::Simple);
        for kind in [
            BoardKind::Design,
            BoardKind::Video,
            BoardKind::Dev,
            BoardKind::Produtora,
        ] {
            assert_eq!(kind.variant(), BoardVariant::Compound);
            assert!(kind.status_catalog().is_some());
        }
        assert!(BoardKind::Simple.status_catalog().is_none());
    }

    #[test]
    fn test_completion_column_defaults_to_last() {
        let board = Board::new("Ops".to_string(), BoardKind::Simple);
        let cols = vec![
            Column::new(board.id, "Todo".to_string(), 0),
            Column::new(board.id, "Done".to_string(), 2),
            Column::new(board.id, "Doing".to_string(), 1),
        ];
        assert_eq!(board.resolve_completion_column(&cols), Some(cols[1].id));
    }

    #[test]
    fn test_explicit_completion_column_wins() {
        let mut board = Board::new("Ops".to_string(), BoardKind::Simple);
        let cols = vec![
            Column::new(board.id, "Todo".to_string(), 0),
            Column::new(board.id, "Shipped".to_string(), 1),
            Column::new(board.id, "Graveyard".to_string(), 2),
        ];
        board.update_completion_column_id(Some(cols[1].id));
        assert_eq!(board.resolve_completion_column(&cols), Some(cols[1].id));
    }

    #[test]
    fn test_stale_completion_column_falls_back() {
        let mut board = Board::new("Ops".to_string(), BoardKind::Simple);
        let cols = vec![
            Column::new(board.id, "Todo".to_string(), 0),
            Column::new(board.id, "Done".to_string(), 1),
        ];
        board.update_completion_column_id(Some(Uuid::new_v4()));
        assert_eq!(board.resolve_completion_column(&cols), Some(cols[1].id));
    }

    #[test]
    fn test_kind_survives_serialization() {
        let board = Board::new("Design".to_string(), BoardKind::Design);
        let json = serde_json::to_string(&board).unwrap();
        assert!(json.contains("\"kind\":\"design\""));
        let restored: Board = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.kind(), BoardKind::Design);
    }
}
