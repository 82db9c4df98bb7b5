//! Card lifecycle business rules.
//!
//! Pure functions relating columns, statuses and completion state, plus the
//! field checks applied before a card is created or edited.

use agency_board_core::{BoardError, BoardResult};
use uuid::Uuid;

use crate::{Board, Card, CardPriority, CardUpdate, Column, NewCard, PlacementKey};

/// Get a board's columns sorted by position.
pub fn sorted_board_columns(board_id: Uuid, columns: &[Column]) -> Vec<&Column> {
    let mut cols: Vec<_> = columns.iter().filter(|c| c.board_id == board_id).collect();
    cols.sort_by_key(|c| (c.position, c.id));
    cols
}

/// Whether a bucket represents finished work: the kind's done status on
/// compound boards, the completion column on simple boards.
pub fn is_done_placement(board: &Board, columns: &[Column], key: &PlacementKey) -> bool {
    match (board.kind().status_catalog(), key.status()) {
        (Some(catalog), Some(status)) => catalog.is_done(status),
        (Some(_), None) => false,
        (None, _) => board.resolve_completion_column(columns) == Some(key.column_id()),
    }
}

/// Resolve the bucket an archived card goes back to.
///
/// If its column still exists the card returns to the bucket it was shown in.
/// Otherwise it falls back to the default bucket of the board's first column.
/// Returns `None` if the board has no columns.
pub fn resolve_restore_placement(
    board: &Board,
    columns: &[Column],
    card: &Card,
) -> Option<PlacementKey> {
    let board_cols = sorted_board_columns(board.id, columns);
    if board_cols.iter().any(|c| c.id == card.column_id) {
        Some(PlacementKey::of_card(board, card))
    } else {
        board_cols
            .first()
            .map(|c| PlacementKey::default_for_column(board, c.id))
    }
}

fn check_priority(board: &Board, priority: CardPriority) -> BoardResult<()> {
    if priority.is_allowed_on(board.variant()) {
        Ok(())
    } else {
        Err(BoardError::Validation(format!(
            "priority {:?} is not available on {:?} boards",
            priority,
            board.variant()
        )))
    }
}

fn check_title(title: &str) -> BoardResult<()> {
    if title.trim().is_empty() {
        return Err(BoardError::Validation("card title is empty".to_string()));
    }
    Ok(())
}

pub fn validate_new_card(board: &Board, fields: &NewCard) -> BoardResult<()> {
    check_title(&fields.title)?;
    if let Some(priority) = fields.priority {
        check_priority(board, priority)?;
    }
    Ok(())
}

pub fn validate_card_update(board: &Board, updates: &CardUpdate) -> BoardResult<()> {
    if let Some(title) = &updates.title {
        check_title(title)?;
    }
    if let Some(priority) = updates.priority {
        check_priority(board, priority)?;
    }
    Ok(())
}
