//! Read-only projection of a board's active cards grouped by bucket.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::board::Board;
use crate::card::{Card, CardId};
use crate::column::Column;
use crate::placement::PlacementKey;
use crate::position::PositionIndex;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bucket {
    pub key: PlacementKey,
    pub cards: Vec<Card>,
}

/// Buckets in display order, each with its cards in position order.
///
/// Every bucket of the board is present, even when empty. Cards whose column
/// has been removed still show up, in trailing buckets of their own, so that
/// every active card appears exactly once.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlacementView {
    buckets: Vec<Bucket>,
}

impl PlacementView {
    pub fn build(board: &Board, columns: &[Column], cards: &[Card]) -> Self {
        let keys = PlacementKey::all_for_board(board, columns);
        let mut slots: HashMap<PlacementKey, Vec<&Card>> = HashMap::new();
        let mut order = keys;

        for card in cards.iter().filter(|c| c.board_id == board.id && !c.archived) {
            let key = PlacementKey::of_card(board, card);
            if !slots.contains_key(&key) && !order.contains(&key) {
                order.push(key.clone());
            }
            slots.entry(key).or_default().push(card);
        }

        let buckets = order
            .into_iter()
            .map(|key| {
                let mut members = slots.remove(&key).unwrap_or_default();
                PositionIndex::sort_cards(&mut members);
                Bucket {
                    key,
                    cards: members.into_iter().cloned().collect(),
                }
            })
            .collect();

        Self { buckets }
    }

    pub fn buckets(&self) -> &[Bucket] {
        &self.buckets
    }

    pub fn get(&self, key: &PlacementKey) -> Option<&[Card]> {
        self.buckets
            .iter()
            .find(|b| &b.key == key)
            .map(|b| b.cards.as_slice())
    }

    pub fn card_ids(&self, key: &PlacementKey) -> Vec<CardId> {
        self.get(key)
            .map(|cards| cards.iter().map(|c| c.id).collect())
            .unwrap_or_default()
    }

    /// Bucket and index a card is currently rendered at.
    pub fn locate(&self, card_id: CardId) -> Option<(&PlacementKey, usize)> {
        self.buckets.iter().find_map(|bucket| {
            bucket
                .cards
                .iter()
                .position(|c| c.id == card_id)
                .map(|index| (&bucket.key, index))
        })
    }

    pub fn card_count(&self) -> usize {
        self.buckets.iter().map(|b| b.cards.len()).sum()
    }

    pub fn to_json(&self) -> agency_board_core::BoardResult<String> {
        serde_json::to_string(self)
            .map_err(|e| agency_board_core::BoardError::Serialization(e.to_string()))
    }
}
