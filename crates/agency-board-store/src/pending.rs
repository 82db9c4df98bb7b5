use agency_board_domain::{Card, CardId, SideEffects};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Move,
    Create,
    Edit,
    Archive,
    Unarchive,
    Delete,
}

impl std::fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Move => "move",
            Self::Create => "create",
            Self::Edit => "edit",
            Self::Archive => "archive",
            Self::Unarchive => "unarchive",
            Self::Delete => "delete",
        };
        f.write_str(name)
    }
}

/// An optimistic change that has been applied locally but not yet confirmed.
///
/// Holds every card the change touched exactly as it was before, so a
/// rollback can put them back verbatim.
#[derive(Debug, Clone)]
#[must_use = "a pending change must be confirmed or rolled back"]
pub struct PendingChange {
    pub(crate) kind: ChangeKind,
    pub(crate) card_id: CardId,
    pub(crate) prior: Vec<Card>,
    pub(crate) inserted: Option<CardId>,
    pub(crate) destination_index: Option<usize>,
    pub(crate) effects: SideEffects,
}

impl PendingChange {
    pub(crate) fn new(kind: ChangeKind, card_id: CardId) -> Self {
        Self {
            kind,
            card_id,
            prior: Vec::new(),
            inserted: None,
            destination_index: None,
            effects: SideEffects::default(),
        }
    }

    pub(crate) fn noop(kind: ChangeKind, card_id: CardId, effects: SideEffects) -> Self {
        Self {
            effects: SideEffects {
                noop: true,
                ..effects
            },
            ..Self::new(kind, card_id)
        }
    }

    pub fn kind(&self) -> ChangeKind {
        self.kind
    }

    pub fn card_id(&self) -> CardId {
        self.card_id
    }

    /// Index the card was placed at within its destination bucket, after
    /// clamping. Only set for moves.
    pub fn destination_index(&self) -> Option<usize> {
        self.destination_index
    }

    pub fn effects(&self) -> SideEffects {
        self.effects
    }

    /// Nothing was applied, so there is nothing to persist.
    pub fn is_noop(&self) -> bool {
        self.effects.noop
    }

    /// Ids of every card whose stored state the change altered.
    pub fn touched(&self) -> Vec<CardId> {
        let mut ids: Vec<CardId> = self.prior.iter().map(|c| c.id).collect();
        if let Some(id) = self.inserted {
            ids.push(id);
        }
        ids
    }
}
