//! Point-in-time capture of one board.
//!
//! A `BoardSnapshot` is what the persistence layer hands over when a board is
//! opened, and what a store can export for the presentation layer.

use agency_board_core::{BoardError, BoardResult};
use serde::{Deserialize, Serialize};

use crate::{Board, Card, Column};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoardSnapshot {
    pub board: Board,

    #[serde(default)]
    pub columns: Vec<Column>,

    /// Active and archived cards alike.
    #[serde(default)]
    pub cards: Vec<Card>,
}

impl BoardSnapshot {
    pub fn new(board: Board) -> Self {
        Self {
            board,
            columns: Vec::new(),
            cards: Vec::new(),
        }
    }

    pub fn from_data(board: Board, columns: Vec<Column>, cards: Vec<Card>) -> Self {
        Self {
            board,
            columns,
            cards,
        }
    }

    /// Drops columns and cards that belong to other boards.
    pub fn retain_own(mut self) -> Self {
        let board_id = self.board.id;
        self.columns.retain(|c| c.board_id == board_id);
        self.cards.retain(|c| c.board_id == board_id);
        self
    }

    pub fn to_json(&self) -> BoardResult<Vec<u8>> {
        serde_json::to_vec(self).map_err(|e| BoardError::Serialization(e.to_string()))
    }

    pub fn from_json(bytes: &[u8]) -> BoardResult<Self> {
        serde_json::from_slice(bytes).map_err(|e| BoardError::Serialization(e.to_string()))
    }
}
