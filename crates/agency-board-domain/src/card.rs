use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::board::{BoardId, BoardVariant};
use crate::column::ColumnId;
use crate::field_update::FieldUpdate;
use crate::placement::PlacementKey;

pub type CardId = Uuid;

/// Simple boards use low/medium/high/urgent; compound boards use normal/urgent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardPriority {
    Low,
    Medium,
    High,
    Urgent,
    Normal,
}

impl CardPriority {
    pub fn default_for(variant: BoardVariant) -> Self {
        match variant {
            BoardVariant::Simple => Self::Medium,
            BoardVariant::Compound => Self::Normal,
        }
    }

    pub fn is_allowed_on(self, variant: BoardVariant) -> bool {
        match variant {
            BoardVariant::Simple => !matches!(self, Self::Normal),
            BoardVariant::Compound => matches!(self, Self::Normal | Self::Urgent),
        }
    }
}

/// Where a card's lifecycle is driven from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardOrigin {
    #[default]
    Manual,
    /// Client onboarding task; its placement is owned by the onboarding automation.
    Onboarding,
}

impl CardOrigin {
    pub fn is_automated(self) -> bool {
        matches!(self, Self::Onboarding)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    pub id: CardId,
    pub board_id: BoardId,
    pub column_id: ColumnId,
    /// Raw stored sub-status. Kept verbatim even when the board doesn't
    /// recognize it.
    #[serde(default)]
    pub status: Option<String>,
    pub title: String,
    pub description: Option<String>,
    pub priority: CardPriority,
    pub due_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub position: i64,
    #[serde(default)]
    pub archived: bool,
    #[serde(default)]
    pub archived_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub justification: Option<String>,
    #[serde(default)]
    pub origin: CardOrigin,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Content supplied when creating a card.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewCard {
    pub title: String,
    pub description: Option<String>,
    pub priority: Option<CardPriority>,
    pub due_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub origin: CardOrigin,
}

impl NewCard {
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }
}

/// Partial update of a card's content fields.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CardUpdate {
    pub title: Option<String>,
    pub description: FieldUpdate<String>,
    pub priority: Option<CardPriority>,
    pub due_date: FieldUpdate<DateTime<Utc>>,
    pub tags: Option<Vec<String>>,
    pub justification: FieldUpdate<String>,
}

impl CardUpdate {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && !self.description.is_change()
            && self.priority.is_none()
            && !self.due_date.is_change()
            && self.tags.is_none()
            && !self.justification.is_change()
    }
}

impl Card {
    pub fn new(board_id: BoardId, placement: &PlacementKey, fields: NewCard, position: i64) -> Self {
        let now = Utc::now();
        let status = placement.status().map(|s| s.as_str().to_string());
        Self {
            id: Uuid::new_v4(),
            board_id,
            column_id: placement.column_id(),
            status,
            title: fields.title,
            description: fields.description,
            priority: fields
                .priority
                .unwrap_or_else(|| CardPriority::default_for(placement.variant())),
            due_date: fields.due_date,
            tags: fields.tags,
            position,
            archived: false,
            archived_at: None,
            justification: None,
            origin: fields.origin,
            created_at: now,
            updated_at: now,
        }
    }

    /// Atomically changes placement and position. A simple key leaves the
    /// stored status as it was.
    pub fn move_to(&mut self, placement: &PlacementKey, position: i64) {
        self.column_id = placement.column_id();
        if let Some(status) = placement.status() {
            self.status = Some(status.as_str().to_string());
        }
        self.position = position;
        self.updated_at = Utc::now();
    }

    pub fn update_position(&mut self, position: i64) {
        self.position = position;
        self.updated_at = Utc::now();
    }

    pub fn archive(&mut self) {
        self.archived = true;
        self.archived_at = Some(Utc::now());
        self.updated_at = Utc::now();
    }

    /// Clears the archived flag in place. Callers relocate the card with
    /// `move_to` when its old placement no longer exists.
    pub fn unarchive(&mut self, position: i64) {
        self.archived = false;
        self.archived_at = None;
        self.update_position(position);
    }

    pub fn update(&mut self, updates: CardUpdate) {
        if let Some(title) = updates.title {
            self.title = title;
        }
        updates.description.apply_to(&mut self.description);
        if let Some(priority) = updates.priority {
            self.priority = priority;
        }
        updates.due_date.apply_to(&mut self.due_date);
        if let Some(tags) = updates.tags {
            self.tags = tags;
        }
        updates.justification.apply_to(&mut self.justification);
        self.updated_at = Utc::now();
    }

    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        !self.archived && self.due_date.is_some_and(|due| due < now)
    }

    /// Overdue cards are expected to carry a justification.
    pub fn needs_justification(&self, now: DateTime<Utc>) -> bool {
        self.is_overdue(now)
            && !self
                .justification
                .as_deref()
                .is_some_and(|text| !text.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::StatusId;
    use chrono::Duration;

    fn compound_key() -> PlacementKey {
        PlacementKey::Compound {
            column_id: Uuid::new_v4(),
            status: StatusId::from("fazendo"),
        }
    }

    #[test]
    fn test_new_card_takes_placement() {
        let key = compound_key();
        let card = Card::new(Uuid::new_v4(), &key, NewCard::titled("Post"), 1024);

        assert_eq!(card.column_id, key.column_id());
        assert_eq!(card.status.as_deref(), Some("fazendo"));
        assert_eq!(card.position, 1024);
        assert!(!card.archived);
    }

    #[test]
    fn test_simple_move_keeps_stored_status() {
        let mut card = Card::new(Uuid::new_v4(), &compound_key(), NewCard::titled("A"), 0);
        let target = PlacementKey::Simple {
            column_id: Uuid::new_v4(),
        };
        card.move_to(&target, 5);

        assert_eq!(card.column_id, target.column_id());
        assert_eq!(card.status.as_deref(), Some("fazendo"));
        assert_eq!(card.position, 5);
    }

    #[test]
    fn test_priority_variants() {
        assert!(CardPriority::Urgent.is_allowed_on(BoardVariant::Simple));
        assert!(CardPriority::Urgent.is_allowed_on(BoardVariant::Compound));
        assert!(!CardPriority::Normal.is_allowed_on(BoardVariant::Simple));
        assert!(!CardPriority::Low.is_allowed_on(BoardVariant::Compound));
        assert_eq!(
            CardPriority::default_for(BoardVariant::Compound),
            CardPriority::Normal
        );
    }

    #[test]
    fn test_update_applies_three_state_fields() {
        let mut card = Card::new(Uuid::new_v4(), &compound_key(), NewCard::titled("A"), 0);
        card.description = Some("old".to_string());

        card.update(CardUpdate {
            title: Some("B".to_string()),
            description: FieldUpdate::Clear,
            justification: FieldUpdate::Set("client was late".to_string()),
            ..CardUpdate::default()
        });

        assert_eq!(card.title, "B");
        assert_eq!(card.description, None);
        assert_eq!(card.justification.as_deref(), Some("client was late"));
    }

    #[test]
    fn test_overdue_needs_justification() {
        let now = Utc::now();
        let mut card = Card::new(Uuid::new_v4(), &compound_key(), NewCard::titled("A"), 0);
        card.due_date = Some(now - Duration::days(1));

        assert!(card.is_overdue(now));
        assert!(card.needs_justification(now));

        card.justification = Some("   ".to_string());
        assert!(card.needs_justification(now));

        card.justification = Some("waiting on assets".to_string());
        assert!(!card.needs_justification(now));

        card.archive();
        assert!(!card.is_overdue(now));
    }

    #[test]
    fn test_empty_update() {
        assert!(CardUpdate::default().is_empty());
        let update = CardUpdate {
            due_date: FieldUpdate::Clear,
            ..CardUpdate::default()
        };
        assert!(!update.is_empty());
    }
}
