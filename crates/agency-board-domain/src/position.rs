//! Ordering of cards inside one placement bucket.
//!
//! Positions are sparse integers. New positions go halfway between the
//! neighbours of the insertion point, so a single insert never touches other
//! cards. Only when two neighbours are adjacent integers (or the i64 range is
//! exhausted at an end) is the bucket re-spaced evenly.

use agency_board_core::BoardConfig;

use crate::card::{Card, CardId};

/// Result of computing an insertion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Insertion {
    /// Position for the inserted card.
    pub position: i64,
    /// New positions for the existing entries, index-aligned with the input
    /// slice, when the bucket had to be re-spaced.
    pub respaced: Option<Vec<i64>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionIndex {
    step: i64,
}

impl Default for PositionIndex {
    fn default() -> Self {
        Self { step: 1024 }
    }
}

impl PositionIndex {
    pub fn new(step: i64) -> Self {
        Self { step: step.max(2) }
    }

    pub fn from_config(config: &BoardConfig) -> Self {
        Self::new(config.position_step)
    }

    pub fn step(&self) -> i64 {
        self.step
    }

    /// Sort cards ascending by position, ties broken by id so equal positions
    /// never swap between renders.
    pub fn sort_cards(cards: &mut [&Card]) {
        cards.sort_by(|a, b| a.position.cmp(&b.position).then_with(|| a.id.cmp(&b.id)));
    }

    pub fn positions_for<'a>(cards: impl IntoIterator<Item = &'a Card>) -> Vec<(CardId, i64)> {
        let mut ordered: Vec<&Card> = cards.into_iter().collect();
        Self::sort_cards(&mut ordered);
        ordered.iter().map(|c| (c.id, c.position)).collect()
    }

    /// Position for a card inserted at `index` into a bucket whose existing
    /// positions are `ordered` (ascending). An index past the end appends.
    pub fn insert_at(&self, ordered: &[i64], index: usize) -> Insertion {
        debug_assert!(ordered.windows(2).all(|w| w[0] <= w[1]));
        let index = index.min(ordered.len());

        let candidate = if ordered.is_empty() {
            Some(self.step)
        } else if index == 0 {
            ordered[0].checked_sub(self.step)
        } else if index == ordered.len() {
            ordered[ordered.len() - 1].checked_add(self.step)
        } else {
            Self::midpoint(ordered[index - 1], ordered[index])
        };

        match candidate {
            Some(position) => Insertion {
                position,
                respaced: None,
            },
            None => self.respace(ordered.len(), index),
        }
    }

    /// Position for appending to the tail of a bucket.
    pub fn tail(&self, ordered: &[i64]) -> Insertion {
        self.insert_at(ordered, ordered.len())
    }

    fn midpoint(low: i64, high: i64) -> Option<i64> {
        let gap = high as i128 - low as i128;
        if gap < 2 {
            return None;
        }
        Some((low as i128 + gap / 2) as i64)
    }

    fn respace(&self, len: usize, index: usize) -> Insertion {
        let slot = |i: usize| self.step.saturating_mul(i as i64 + 1);
        let respaced = (0..len)
            .map(|i| if i < index { slot(i) } else { slot(i + 1) })
            .collect();
        tracing::debug!("Re-spacing bucket of {} cards (insert at {})", len, index);
        Insertion {
            position: slot(index),
            respaced: Some(respaced),
        }
    }
}
