use std::collections::HashSet;
use std::future::Future;
use std::time::Duration;

use agency_board_core::{
    ActorRole, BoardAction, BoardConfig, BoardError, BoardResult, LogEntry, LogLevel, Loggable,
};
use agency_board_domain::card_lifecycle::{
    resolve_restore_placement, validate_card_update, validate_new_card,
};
use agency_board_domain::{
    Board, BoardId, BoardSnapshot, Card, CardId, CardUpdate, Column, Insertion, MoveProposal,
    NewCard, PlacementKey, PlacementView, PositionIndex, SideEffects, TransitionPolicy,
};
use chrono::{DateTime, Utc};

use crate::pending::{ChangeKind, PendingChange};
use crate::traits::{CardPersistence, RemoteUpdate};

/// Where a card lands in a bucket, and the re-spacing of its neighbours
/// when there was no room.
struct Slot {
    neighbours: Vec<CardId>,
    insertion: Insertion,
}

struct MovePlan {
    card_id: CardId,
    destination: PlacementKey,
    index: usize,
    slot: Slot,
    effects: SideEffects,
}

/// In-memory projection of one board's cards and the only place placement
/// and position are mutated.
///
/// Every mutation comes in two forms. `begin_*` validates, applies the change
/// optimistically and returns a [`PendingChange`]; the caller then either
/// `confirm`s or `rollback`s it. The async `*_card` methods wrap both phases
/// around the matching [`CardPersistence`] call.
///
/// Validation, permission and placement errors are raised before anything is
/// applied. Persistence failures (including timeouts) restore every touched
/// card to its pre-change state before the error is returned.
pub struct BoardCardStore {
    board: Board,
    columns: Vec<Column>,
    cards: Vec<Card>,
    positions: PositionIndex,
    persistence_timeout: Duration,
    pending_handoffs: HashSet<CardId>,
    logs: Vec<LogEntry>,
    log_limit: usize,
}

async fn guarded<T>(
    timeout: Duration,
    call: impl Future<Output = BoardResult<T>>,
) -> BoardResult<T> {
    match tokio::time::timeout(timeout, call).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(BoardError::PersistenceFailure(msg))) => Err(BoardError::PersistenceFailure(msg)),
        Ok(Err(e)) => Err(BoardError::PersistenceFailure(e.to_string())),
        Err(_) => Err(BoardError::PersistenceFailure(format!(
            "timed out after {} ms",
            timeout.as_millis()
        ))),
    }
}

impl BoardCardStore {
    pub fn new(board: Board, columns: Vec<Column>, cards: Vec<Card>, config: &BoardConfig) -> Self {
        Self::from_snapshot(BoardSnapshot::from_data(board, columns, cards), config)
    }

    pub fn from_snapshot(snapshot: BoardSnapshot, config: &BoardConfig) -> Self {
        let snapshot = snapshot.retain_own();
        tracing::debug!(
            "Loaded board {} ({:?}) with {} columns and {} cards",
            snapshot.board.id,
            snapshot.board.kind(),
            snapshot.columns.len(),
            snapshot.cards.len()
        );
        Self {
            board: snapshot.board,
            columns: snapshot.columns,
            cards: snapshot.cards,
            positions: PositionIndex::from_config(config),
            persistence_timeout: config.persistence_timeout(),
            pending_handoffs: HashSet::new(),
            logs: Vec::new(),
            log_limit: config.activity_log_limit,
        }
    }

    pub fn snapshot(&self) -> BoardSnapshot {
        BoardSnapshot::from_data(
            self.board.clone(),
            self.columns.clone(),
            self.cards.clone(),
        )
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn card(&self, card_id: CardId) -> Option<&Card> {
        self.cards.iter().find(|c| c.id == card_id)
    }

    pub fn policy(&self) -> TransitionPolicy<'_> {
        TransitionPolicy::new(&self.board, &self.columns)
    }

    /// Active cards grouped by bucket. Rebuilt from the flat collection on
    /// every call; callers get an owned, read-only copy.
    pub fn cards_by_placement(&self) -> PlacementView {
        PlacementView::build(&self.board, &self.columns, &self.cards)
    }

    /// Archived cards, most recently archived first.
    pub fn archived_cards(&self) -> Vec<&Card> {
        let mut archived: Vec<&Card> = self.cards.iter().filter(|c| c.archived).collect();
        archived.sort_by(|a, b| b.archived_at.cmp(&a.archived_at).then(a.id.cmp(&b.id)));
        archived
    }

    /// Active cards past their due date, earliest due first.
    pub fn overdue_cards(&self, now: DateTime<Utc>) -> Vec<&Card> {
        let mut overdue: Vec<&Card> = self.cards.iter().filter(|c| c.is_overdue(now)).collect();
        overdue.sort_by_key(|c| (c.due_date, c.id));
        overdue
    }

    /// True while an automated card's local move waits for the authoritative
    /// placement to arrive through [`apply_remote`](Self::apply_remote).
    pub fn has_pending_handoff(&self, card_id: CardId) -> bool {
        self.pending_handoffs.contains(&card_id)
    }

    fn index_of(&self, card_id: CardId) -> Option<usize> {
        self.cards.iter().position(|c| c.id == card_id)
    }

    fn active_index(&self, card_id: CardId) -> BoardResult<usize> {
        match self.index_of(card_id) {
            Some(i) if !self.cards[i].archived => Ok(i),
            Some(_) => Err(BoardError::NotFound(format!(
                "card {} is archived",
                card_id
            ))),
            None => Err(BoardError::NotFound(format!("card {}", card_id))),
        }
    }

    fn reject(&mut self, err: BoardError) -> BoardError {
        tracing::warn!("Board {}: {}", self.board.id, err);
        self.add_log(LogEntry::with_level(
            LogLevel::Warning,
            format!("{} ({})", err.user_message(), err),
        ));
        err
    }

    /// Slot at `index` among the bucket's other cards (`moving` excluded).
    fn plan_slot(
        &self,
        view: &PlacementView,
        key: &PlacementKey,
        moving: Option<CardId>,
        index: Option<usize>,
    ) -> Slot {
        let others: Vec<&Card> = view
            .get(key)
            .unwrap_or_default()
            .iter()
            .filter(|c| Some(c.id) != moving)
            .collect();
        let ordered: Vec<i64> = others.iter().map(|c| c.position).collect();
        let insertion = match index {
            Some(index) => self.positions.insert_at(&ordered, index),
            None => self.positions.tail(&ordered),
        };
        Slot {
            neighbours: others.iter().map(|c| c.id).collect(),
            insertion,
        }
    }

    fn apply_respace(&mut self, pending: &mut PendingChange, slot: &Slot) {
        if let Some(respaced) = &slot.insertion.respaced {
            for (card_id, position) in slot.neighbours.iter().zip(respaced) {
                if let Some(i) = self.index_of(*card_id) {
                    pending.prior.push(self.cards[i].clone());
                    self.cards[i].update_position(*position);
                }
            }
        }
    }

    // --- move ---

    fn plan_move(
        &self,
        card_id: CardId,
        destination: &PlacementKey,
        destination_index: usize,
        role: ActorRole,
    ) -> BoardResult<MovePlan> {
        let idx = self.active_index(card_id)?;
        destination.validate(&self.board, &self.columns)?;

        let view = self.cards_by_placement();
        let (source, source_index) = view
            .locate(card_id)
            .map(|(key, index)| (key.clone(), index))
            .ok_or_else(|| BoardError::Internal(format!("card {} has no bucket", card_id)))?;

        let bucket_len = view
            .get(destination)
            .unwrap_or_default()
            .iter()
            .filter(|c| c.id != card_id)
            .count();
        let index = destination_index.min(bucket_len);

        let effects = self
            .policy()
            .decide_move(&MoveProposal {
                role,
                card: &self.cards[idx],
                source: &source,
                source_index,
                destination,
                destination_index: index,
            })
            .into_result()?;

        let slot = if effects.noop {
            Slot {
                neighbours: Vec::new(),
                insertion: Insertion {
                    position: self.cards[idx].position,
                    respaced: None,
                },
            }
        } else {
            self.plan_slot(&view, destination, Some(card_id), Some(index))
        };

        Ok(MovePlan {
            card_id,
            destination: destination.clone(),
            index,
            slot,
            effects,
        })
    }

    pub fn begin_move(
        &mut self,
        card_id: CardId,
        destination: &PlacementKey,
        destination_index: usize,
        role: ActorRole,
    ) -> BoardResult<PendingChange> {
        let plan = match self.plan_move(card_id, destination, destination_index, role) {
            Ok(plan) => plan,
            Err(e) => return Err(self.reject(e)),
        };

        if plan.effects.noop {
            tracing::debug!("Move of card {} is a no-op", card_id);
            return Ok(PendingChange::noop(ChangeKind::Move, card_id, plan.effects));
        }

        let mut pending = PendingChange::new(ChangeKind::Move, card_id);
        pending.effects = plan.effects;
        pending.destination_index = Some(plan.index);
        self.apply_respace(&mut pending, &plan.slot);
        if let Some(i) = self.index_of(plan.card_id) {
            pending.prior.push(self.cards[i].clone());
            self.cards[i].move_to(&plan.destination, plan.slot.insertion.position);
        }
        if plan.effects.automation_handoff {
            self.pending_handoffs.insert(card_id);
        }

        tracing::debug!(
            "Moved card {} to {:?} at position {}",
            card_id,
            plan.destination,
            plan.slot.insertion.position
        );
        Ok(pending)
    }

    pub async fn move_card<P>(
        &mut self,
        persistence: &P,
        card_id: CardId,
        destination: PlacementKey,
        destination_index: usize,
        role: ActorRole,
    ) -> BoardResult<SideEffects>
    where
        P: CardPersistence + ?Sized,
    {
        let pending = self.begin_move(card_id, &destination, destination_index, role)?;
        if pending.is_noop() {
            return Ok(pending.effects());
        }
        let index = pending.destination_index().unwrap_or(destination_index);
        let outcome = guarded(
            self.persistence_timeout,
            persistence.persist_move(card_id, &destination, index),
        )
        .await;
        self.settle(pending, outcome)
    }

    // --- create ---

    fn plan_create(
        &self,
        board_id: BoardId,
        destination: &PlacementKey,
        fields: &NewCard,
        role: ActorRole,
    ) -> BoardResult<(Card, Slot)> {
        if board_id != self.board.id {
            return Err(BoardError::NotFound(format!("board {}", board_id)));
        }
        destination.validate(&self.board, &self.columns)?;
        self.policy()
            .authorize(BoardAction::Create, role)
            .into_result()?;
        validate_new_card(&self.board, fields)?;

        let slot = self.plan_slot(&self.cards_by_placement(), destination, None, None);
        let card = Card::new(
            board_id,
            destination,
            fields.clone(),
            slot.insertion.position,
        );
        Ok((card, slot))
    }

    pub fn begin_create(
        &mut self,
        board_id: BoardId,
        destination: &PlacementKey,
        fields: &NewCard,
        role: ActorRole,
    ) -> BoardResult<PendingChange> {
        let (card, slot) = match self.plan_create(board_id, destination, fields, role) {
            Ok(planned) => planned,
            Err(e) => return Err(self.reject(e)),
        };

        let mut pending = PendingChange::new(ChangeKind::Create, card.id);
        self.apply_respace(&mut pending, &slot);
        pending.inserted = Some(card.id);
        tracing::debug!("Created provisional card {} '{}'", card.id, card.title);
        self.cards.push(card);
        Ok(pending)
    }

    /// Swap the provisional card for the one the persistence layer stored.
    pub fn confirm_create(&mut self, pending: PendingChange, stored: Card) -> Card {
        if let Some(provisional) = pending.inserted {
            self.cards.retain(|c| c.id != provisional);
        }
        match self.index_of(stored.id) {
            Some(i) => self.cards[i] = stored.clone(),
            None => self.cards.push(stored.clone()),
        }
        tracing::info!("Created card {} '{}'", stored.id, stored.title);
        self.add_log(LogEntry::new(format!("Created card '{}'", stored.title)));
        stored
    }

    pub async fn create_card<P>(
        &mut self,
        persistence: &P,
        board_id: BoardId,
        destination: PlacementKey,
        fields: NewCard,
        role: ActorRole,
    ) -> BoardResult<Card>
    where
        P: CardPersistence + ?Sized,
    {
        let pending = self.begin_create(board_id, &destination, &fields, role)?;
        let outcome = guarded(
            self.persistence_timeout,
            persistence.persist_create(board_id, &destination, &fields),
        )
        .await;
        match outcome {
            Ok(stored) => Ok(self.confirm_create(pending, stored)),
            Err(e) => {
                self.rollback(pending);
                Err(self.reject(e))
            }
        }
    }

    // --- edit ---

    pub fn begin_edit(
        &mut self,
        card_id: CardId,
        updates: CardUpdate,
        role: ActorRole,
    ) -> BoardResult<PendingChange> {
        let checked = self
            .index_of(card_id)
            .ok_or_else(|| BoardError::NotFound(format!("card {}", card_id)))
            .and_then(|i| {
                self.policy()
                    .authorize(BoardAction::Edit, role)
                    .into_result()?;
                validate_card_update(&self.board, &updates)?;
                Ok(i)
            });
        let idx = match checked {
            Ok(i) => i,
            Err(e) => return Err(self.reject(e)),
        };

        if updates.is_empty() {
            return Ok(PendingChange::noop(
                ChangeKind::Edit,
                card_id,
                SideEffects::default(),
            ));
        }

        let mut pending = PendingChange::new(ChangeKind::Edit, card_id);
        pending.prior.push(self.cards[idx].clone());
        self.cards[idx].update(updates);
        Ok(pending)
    }

    pub async fn edit_card<P>(
        &mut self,
        persistence: &P,
        card_id: CardId,
        updates: CardUpdate,
        role: ActorRole,
    ) -> BoardResult<Card>
    where
        P: CardPersistence + ?Sized,
    {
        let pending = self.begin_edit(card_id, updates, role)?;
        let edited = self
            .card(card_id)
            .cloned()
            .ok_or_else(|| BoardError::Internal(format!("card {} vanished", card_id)))?;
        if pending.is_noop() {
            return Ok(edited);
        }
        let outcome = guarded(self.persistence_timeout, persistence.persist_update(&edited)).await;
        self.settle(pending, outcome)?;
        Ok(edited)
    }

    // --- archive / unarchive ---

    pub fn begin_archive(&mut self, card_id: CardId, role: ActorRole) -> BoardResult<PendingChange> {
        let checked = self.active_index(card_id).and_then(|i| {
            self.policy()
                .authorize(BoardAction::Archive, role)
                .into_result()?;
            Ok(i)
        });
        let idx = match checked {
            Ok(i) => i,
            Err(e) => return Err(self.reject(e)),
        };

        let mut pending = PendingChange::new(ChangeKind::Archive, card_id);
        pending.prior.push(self.cards[idx].clone());
        self.cards[idx].archive();
        tracing::debug!("Archived card {}", card_id);
        Ok(pending)
    }

    pub async fn archive_card<P>(
        &mut self,
        persistence: &P,
        card_id: CardId,
        role: ActorRole,
    ) -> BoardResult<()>
    where
        P: CardPersistence + ?Sized,
    {
        let pending = self.begin_archive(card_id, role)?;
        let outcome = guarded(self.persistence_timeout, persistence.persist_archive(card_id)).await;
        self.settle(pending, outcome).map(|_| ())
    }

    fn plan_unarchive(
        &self,
        card_id: CardId,
        role: ActorRole,
    ) -> BoardResult<(usize, PlacementKey, Slot)> {
        let idx = match self.index_of(card_id) {
            Some(i) if self.cards[i].archived => i,
            _ => return Err(BoardError::NotFound(format!("archived card {}", card_id))),
        };
        self.policy()
            .authorize(BoardAction::Unarchive, role)
            .into_result()?;

        let key = resolve_restore_placement(&self.board, &self.columns, &self.cards[idx])
            .ok_or_else(|| {
                BoardError::InvalidPlacement(format!("board {} has no columns", self.board.id))
            })?;
        let slot = self.plan_slot(&self.cards_by_placement(), &key, Some(card_id), None);
        Ok((idx, key, slot))
    }

    /// Returns the card to the tail of the bucket it last occupied.
    pub fn begin_unarchive(
        &mut self,
        card_id: CardId,
        role: ActorRole,
    ) -> BoardResult<(PendingChange, PlacementKey)> {
        let (idx, key, slot) = match self.plan_unarchive(card_id, role) {
            Ok(planned) => planned,
            Err(e) => return Err(self.reject(e)),
        };

        let mut pending = PendingChange::new(ChangeKind::Unarchive, card_id);
        pending.prior.push(self.cards[idx].clone());
        self.apply_respace(&mut pending, &slot);

        let position = slot.insertion.position;
        let card = &mut self.cards[idx];
        card.unarchive(position);
        if PlacementKey::of_card(&self.board, card) != key {
            card.move_to(&key, position);
        }
        tracing::debug!("Unarchived card {} into {:?}", card_id, key);
        Ok((pending, key))
    }

    pub async fn unarchive_card<P>(
        &mut self,
        persistence: &P,
        card_id: CardId,
        role: ActorRole,
    ) -> BoardResult<PlacementKey>
    where
        P: CardPersistence + ?Sized,
    {
        let (pending, key) = self.begin_unarchive(card_id, role)?;
        let outcome = guarded(
            self.persistence_timeout,
            persistence.persist_unarchive(card_id, &key),
        )
        .await;
        self.settle(pending, outcome)?;
        Ok(key)
    }

    // --- delete ---

    /// Removes an active or archived card for good.
    pub fn begin_delete(&mut self, card_id: CardId, role: ActorRole) -> BoardResult<PendingChange> {
        let checked = self
            .index_of(card_id)
            .ok_or_else(|| BoardError::NotFound(format!("card {}", card_id)))
            .and_then(|i| {
                self.policy()
                    .authorize(BoardAction::Delete, role)
                    .into_result()?;
                Ok(i)
            });
        let idx = match checked {
            Ok(i) => i,
            Err(e) => return Err(self.reject(e)),
        };

        let mut pending = PendingChange::new(ChangeKind::Delete, card_id);
        pending.prior.push(self.cards.remove(idx));
        self.pending_handoffs.remove(&card_id);
        tracing::debug!("Deleted card {}", card_id);
        Ok(pending)
    }

    pub async fn delete_card<P>(
        &mut self,
        persistence: &P,
        card_id: CardId,
        role: ActorRole,
    ) -> BoardResult<()>
    where
        P: CardPersistence + ?Sized,
    {
        let pending = self.begin_delete(card_id, role)?;
        let outcome = guarded(self.persistence_timeout, persistence.persist_delete(card_id)).await;
        self.settle(pending, outcome).map(|_| ())
    }

    // --- settlement ---

    pub fn confirm(&mut self, pending: PendingChange) -> SideEffects {
        let effects = pending.effects();
        if pending.is_noop() {
            return effects;
        }
        tracing::info!("Confirmed {} of card {}", pending.kind(), pending.card_id());
        self.add_log(LogEntry::new(format!(
            "Confirmed {} of card {}",
            pending.kind(),
            pending.card_id()
        )));
        if effects.celebrate {
            self.add_log(LogEntry::with_level(
                LogLevel::Notice,
                format!("Card {} is done", pending.card_id()),
            ));
        }
        effects
    }

    /// Put every card the change touched back exactly as it was.
    pub fn rollback(&mut self, pending: PendingChange) {
        if pending.is_noop() {
            return;
        }
        tracing::warn!(
            "Rolling back {} of card {} ({} cards)",
            pending.kind(),
            pending.card_id(),
            pending.touched().len()
        );
        if let Some(inserted) = pending.inserted {
            self.cards.retain(|c| c.id != inserted);
        }
        for prior in pending.prior {
            match self.index_of(prior.id) {
                Some(i) => self.cards[i] = prior,
                None => self.cards.push(prior),
            }
        }
        if pending.kind == ChangeKind::Move {
            self.pending_handoffs.remove(&pending.card_id);
        }
    }

    fn settle(
        &mut self,
        pending: PendingChange,
        outcome: BoardResult<()>,
    ) -> BoardResult<SideEffects> {
        match outcome {
            Ok(()) => Ok(self.confirm(pending)),
            Err(e) => {
                self.rollback(pending);
                Err(self.reject(e))
            }
        }
    }

    // --- remote updates ---

    /// Apply authoritative state verbatim, replacing whatever the store
    /// guessed locally.
    pub fn apply_remote(&mut self, update: RemoteUpdate) -> BoardResult<()> {
        match update {
            RemoteUpdate::Upserted(card) => {
                if card.board_id != self.board.id {
                    let err = BoardError::Validation(format!(
                        "remote card {} belongs to board {}",
                        card.id, card.board_id
                    ));
                    return Err(self.reject(err));
                }
                self.pending_handoffs.remove(&card.id);
                match self.index_of(card.id) {
                    Some(i) => {
                        if self.cards[i] != card {
                            tracing::warn!("Remote update overrides local state of card {}", card.id);
                        }
                        self.cards[i] = card;
                    }
                    None => {
                        tracing::debug!("Remote update adds card {}", card.id);
                        self.cards.push(card);
                    }
                }
            }
            RemoteUpdate::Removed(card_id) => {
                self.pending_handoffs.remove(&card_id);
                self.cards.retain(|c| c.id != card_id);
                tracing::debug!("Remote update removed card {}", card_id);
            }
        }
        Ok(())
    }
}

impl Loggable for BoardCardStore {
    fn add_log(&mut self, entry: LogEntry) {
        self.logs.push(entry);
        if self.logs.len() > self.log_limit {
            let excess = self.logs.len() - self.log_limit;
            self.logs.drain(..excess);
        }
    }

    fn get_logs(&self) -> &[LogEntry] {
        &self.logs
    }
}
