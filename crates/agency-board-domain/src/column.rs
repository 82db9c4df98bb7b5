use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::board::BoardId;

pub type ColumnId = Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub id: ColumnId,
    pub board_id: BoardId,
    pub name: String,
    pub position: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Column {
    pub fn new(board_id: BoardId, name: String, position: i32) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            board_id,
            name,
            position,
            created_at: now,
            updated_at: now,
        }
    }

    /// Assignee column on a compound board, titled "BY <name>".
    pub fn for_assignee(board_id: BoardId, assignee: &str, position: i32) -> Self {
        Self::new(board_id, format!("BY {}", assignee), position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assignee_column_keeps_name_case() {
        let board_id = Uuid::new_v4();
        let col = Column::for_assignee(board_id, "Ana", 2);
        assert_eq!(col.name, "BY Ana");
        assert_eq!(col.board_id, board_id);
        assert_eq!(col.position, 2);
    }
}
