//! Sub-status enumerations for compound boards.
//!
//! Each compound board kind has a small closed set of workflow statuses. The
//! first one is the default bucket for cards whose stored status is missing
//! or unknown; one of them marks the work as done.

use serde::{Deserialize, Serialize};

use crate::board::BoardKind;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StatusId(String);

impl StatusId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for StatusId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for StatusId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

#[derive(Debug)]
pub struct StatusCatalog {
    kind: BoardKind,
    statuses: &'static [&'static str],
    done: &'static str,
}

static DESIGN: StatusCatalog = StatusCatalog {
    kind: BoardKind::Design,
    statuses: &["a_fazer", "fazendo", "arrumar", "para_aprovacao", "aprovado"],
    done: "aprovado",
};

static VIDEO: StatusCatalog = StatusCatalog {
    kind: BoardKind::Video,
    statuses: &[
        "a_fazer",
        "roteiro",
        "gravacao",
        "edicao",
        "para_aprovacao",
        "aprovado",
    ],
    done: "aprovado",
};

static DEV: StatusCatalog = StatusCatalog {
    kind: BoardKind::Dev,
    statuses: &[
        "backlog",
        "a_fazer",
        "fazendo",
        "code_review",
        "testes",
        "concluido",
    ],
    done: "concluido",
};

static PRODUTORA: StatusCatalog = StatusCatalog {
    kind: BoardKind::Produtora,
    statuses: &[
        "a_fazer",
        "pre_producao",
        "producao",
        "pos_producao",
        "entregue",
    ],
    done: "entregue",
};

impl StatusCatalog {
    pub fn for_kind(kind: BoardKind) -> Option<&'static StatusCatalog> {
        match kind {
            BoardKind::Simple => None,
            BoardKind::Design => Some(&DESIGN),
            BoardKind::Video => Some(&VIDEO),
            BoardKind::Dev => Some(&DEV),
            BoardKind::Produtora => Some(&PRODUTORA),
        }
    }

    pub fn kind(&self) -> BoardKind {
        self.kind
    }

    pub fn statuses(&self) -> impl Iterator<Item = StatusId> + '_ {
        self.statuses.iter().map(|s| StatusId::new(*s))
    }

    pub fn len(&self) -> usize {
        self.statuses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statuses.is_empty()
    }

    pub fn default_status(&self) -> StatusId {
        StatusId::new(self.statuses[0])
    }

    pub fn done_status(&self) -> StatusId {
        StatusId::new(self.done)
    }

    pub fn contains(&self, raw: &str) -> bool {
        self.statuses.contains(&raw)
    }

    pub fn ordinal(&self, status: &StatusId) -> Option<usize> {
        self.statuses.iter().position(|s| *s == status.as_str())
    }

    pub fn is_done(&self, status: &StatusId) -> bool {
        status.as_str() == self.done
    }

    /// Bucket a stored status is displayed under. Missing or unrecognized
    /// values map to the default status; the stored value is left alone.
    pub fn resolve(&self, stored: Option<&str>) -> StatusId {
        match stored {
            Some(raw) if self.contains(raw) => StatusId::new(raw),
            _ => self.default_status(),
        }
    }
}
