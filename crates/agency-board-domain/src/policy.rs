//! Role gating per board kind.
//!
//! Each compound kind carries its own create/move/archive predicates; simple
//! boards use one "moves freely" predicate for everything. The transition
//! policy picks the strategy from the board's kind via [`policy_for`].

use agency_board_core::{ActorRole, BoardAction};

use crate::board::BoardKind;

pub trait BoardPolicy: Send + Sync {
    fn kind(&self) -> BoardKind;
    fn can_create(&self, role: ActorRole) -> bool;
    fn can_move(&self, role: ActorRole) -> bool;
    fn can_archive(&self, role: ActorRole) -> bool;

    fn can_edit(&self, role: ActorRole) -> bool {
        self.can_move(role)
    }

    fn can_delete(&self, role: ActorRole) -> bool {
        self.can_archive(role)
    }

    /// Restoring an archived card re-admits it to the board.
    fn can_unarchive(&self, role: ActorRole) -> bool {
        self.can_create(role)
    }

    fn permits(&self, action: BoardAction, role: ActorRole) -> bool {
        match action {
            BoardAction::Create => self.can_create(role),
            BoardAction::Move => self.can_move(role),
            BoardAction::Edit => self.can_edit(role),
            BoardAction::Archive => self.can_archive(role),
            BoardAction::Unarchive => self.can_unarchive(role),
            BoardAction::Delete => self.can_delete(role),
        }
    }
}

pub struct SimplePolicy;

impl SimplePolicy {
    pub fn moves_freely(role: ActorRole) -> bool {
        !role.is_read_only()
    }
}

impl BoardPolicy for SimplePolicy {
    fn kind(&self) -> BoardKind {
        BoardKind::Simple
    }

    fn can_create(&self, role: ActorRole) -> bool {
        Self::moves_freely(role)
    }

    fn can_move(&self, role: ActorRole) -> bool {
        Self::moves_freely(role)
    }

    fn can_archive(&self, role: ActorRole) -> bool {
        Self::moves_freely(role)
    }
}

pub struct DesignPolicy;

impl BoardPolicy for DesignPolicy {
    fn kind(&self) -> BoardKind {
        BoardKind::Design
    }

    fn can_create(&self, role: ActorRole) -> bool {
        role.is_privileged() || matches!(role, ActorRole::AccountManager | ActorRole::Designer)
    }

    fn can_move(&self, role: ActorRole) -> bool {
        role.is_privileged() || role == ActorRole::Designer
    }

    fn can_archive(&self, role: ActorRole) -> bool {
        role.is_privileged()
    }
}

pub struct VideoPolicy;

impl BoardPolicy for VideoPolicy {
    fn kind(&self) -> BoardKind {
        BoardKind::Video
    }

    fn can_create(&self, role: ActorRole) -> bool {
        role.is_privileged() || matches!(role, ActorRole::AccountManager | ActorRole::VideoMaker)
    }

    fn can_move(&self, role: ActorRole) -> bool {
        role.is_privileged() || role == ActorRole::VideoMaker
    }

    fn can_archive(&self, role: ActorRole) -> bool {
        role.is_privileged()
    }
}

/// Developers own their board end to end.
pub struct DevPolicy;

impl BoardPolicy for DevPolicy {
    fn kind(&self) -> BoardKind {
        BoardKind::Dev
    }

    fn can_create(&self, role: ActorRole) -> bool {
        role.is_privileged() || role == ActorRole::Developer
    }

    fn can_move(&self, role: ActorRole) -> bool {
        self.can_create(role)
    }

    fn can_archive(&self, role: ActorRole) -> bool {
        self.can_create(role)
    }
}

pub struct ProdutoraPolicy;

impl BoardPolicy for ProdutoraPolicy {
    fn kind(&self) -> BoardKind {
        BoardKind::Produtora
    }

    fn can_create(&self, role: ActorRole) -> bool {
        role.is_privileged() || matches!(role, ActorRole::AccountManager | ActorRole::Producer)
    }

    fn can_move(&self, role: ActorRole) -> bool {
        role.is_privileged() || role == ActorRole::Producer
    }

    fn can_archive(&self, role: ActorRole) -> bool {
        self.can_move(role)
    }
}

static SIMPLE: SimplePolicy = SimplePolicy;
static DESIGN: DesignPolicy = DesignPolicy;
static VIDEO: VideoPolicy = VideoPolicy;
static DEV: DevPolicy = DevPolicy;
static PRODUTORA: ProdutoraPolicy = ProdutoraPolicy;

pub fn policy_for(kind: BoardKind) -> &'static dyn BoardPolicy {
    match kind {
        BoardKind::Simple => &SIMPLE,
        BoardKind::Design => &DESIGN,
        BoardKind::Video => &VIDEO,
        BoardKind::Dev => &DEV,
        BoardKind::Produtora => &PRODUTORA,
    }
}
