use thiserror::Error;

use crate::role::ActorRole;

/// Action names used when reporting a permission denial.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardAction {
    Create,
    Move,
    Edit,
    Archive,
    Unarchive,
    Delete,
}

impl std::fmt::Display for BoardAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Create => "create",
            Self::Move => "move",
            Self::Edit => "edit",
            Self::Archive => "archive",
            Self::Unarchive => "unarchive",
            Self::Delete => "delete",
        };
        f.write_str(name)
    }
}

#[derive(Error, Debug)]
pub enum BoardError {
    #[error("Permission denied: {role} may not {action} cards on this board")]
    PermissionDenied { action: BoardAction, role: ActorRole },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid placement: {0}")]
    InvalidPlacement(String),

    #[error("Persistence failure: {0}")]
    PersistenceFailure(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl BoardError {
    /// True for errors raised after an optimistic change was already applied.
    pub fn requires_rollback(&self) -> bool {
        matches!(self, Self::PersistenceFailure(_))
    }

    /// Short text for the acting user. Denials and save failures read
    /// differently even though the card snaps back either way.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::PermissionDenied { .. } => "You don't have permission to do that on this board.",
            Self::NotFound(_) => "That card no longer exists.",
            Self::InvalidPlacement(_) => "The card can't be placed there.",
            Self::PersistenceFailure(_) => "Could not save your change. It has been reverted.",
            Self::Validation(_) => "Some card fields are not valid for this board.",
            Self::Io(_) | Self::Serialization(_) | Self::Internal(_) => "Something went wrong.",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn denial_and_save_failure_have_distinct_messages() {
        let denied = BoardError::PermissionDenied {
            action: BoardAction::Move,
            role: ActorRole::Viewer,
        };
        let failed = BoardError::PersistenceFailure("timeout".to_string());

        assert_ne!(denied.user_message(), failed.user_message());
        assert!(!denied.requires_rollback());
        assert!(failed.requires_rollback());
    }

    #[test]
    fn permission_denied_display_names_role_and_action() {
        let err = BoardError::PermissionDenied {
            action: BoardAction::Archive,
            role: ActorRole::Designer,
        };
        assert_eq!(
            err.to_string(),
            "Permission denied: designer may not archive cards on this board"
        );
    }
}
