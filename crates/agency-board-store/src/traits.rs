use agency_board_core::BoardResult;
use agency_board_domain::{BoardId, Card, CardId, NewCard, PlacementKey};
use async_trait::async_trait;

/// Write side of the persistence layer.
///
/// The store calls these after it has already applied the change locally and
/// rolls its local state back when a call fails or times out.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CardPersistence: Send + Sync {
    async fn persist_move(
        &self,
        card_id: CardId,
        destination: &PlacementKey,
        destination_index: usize,
    ) -> BoardResult<()>;

    /// Returns the card as stored, which replaces the local provisional one.
    async fn persist_create(
        &self,
        board_id: BoardId,
        destination: &PlacementKey,
        fields: &NewCard,
    ) -> BoardResult<Card>;

    async fn persist_update(&self, card: &Card) -> BoardResult<()>;

    async fn persist_archive(&self, card_id: CardId) -> BoardResult<()>;

    async fn persist_unarchive(&self, card_id: CardId, destination: &PlacementKey)
        -> BoardResult<()>;

    async fn persist_delete(&self, card_id: CardId) -> BoardResult<()>;
}

/// Authoritative change pushed by another actor or by an automation.
#[derive(Debug, Clone, PartialEq)]
pub enum RemoteUpdate {
    Upserted(Card),
    Removed(CardId),
}
