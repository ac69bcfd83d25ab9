//! Authoritative store state and the registry that owns it.

use silk_road_core::{BoardCoord, Position, StoreId, StoreKind, StoreSnapshot};

/// Number of consecutive positions an autonomous store inspects when opening.
const RELOCATION_WINDOW: u32 = 5;

/// State of a store stored inside the road.
#[derive(Clone, Debug)]
pub(crate) struct StoreState {
    /// Identifier allocated by the road for the store.
    pub(crate) id: StoreId,
    /// Behaviour attached to the store.
    pub(crate) kind: StoreKind,
    /// Position the store occupies.
    pub(crate) position: Position,
    /// Funds currently held.
    pub(crate) funds: u32,
    /// Funds restored on resupply.
    pub(crate) initial_funds: u32,
    /// Number of times the balance was fully taken.
    pub(crate) times_emptied: u32,
}

impl StoreState {
    fn new(id: StoreId, kind: StoreKind, position: Position, funds: u32) -> Self {
        Self {
            id,
            kind,
            position,
            funds,
            initial_funds: funds,
            times_emptied: 0,
        }
    }

    /// Takes the whole balance. An already empty store yields zero and is not
    /// counted as emptied again.
    pub(crate) fn empty_once(&mut self) -> u32 {
        if self.funds == 0 {
            return 0;
        }
        let collected = self.funds;
        self.funds = 0;
        self.times_emptied = self.times_emptied.saturating_add(1);
        collected
    }

    /// Restores the funds the store opened with.
    pub(crate) fn resupply(&mut self) {
        self.funds = self.initial_funds;
    }

    /// Fighter stores only pay requesters whose earnings strictly exceed the
    /// current balance.
    fn refuses(&self, requester_earnings: u64) -> bool {
        matches!(self.kind, StoreKind::Fighter) && requester_earnings <= u64::from(self.funds)
    }

    /// Pays out the whole balance to a robot that asks directly, honouring the
    /// store's kind. A refused request leaves the store untouched.
    pub(crate) fn authorize_withdrawal(&mut self, requester_earnings: u64) -> u32 {
        if self.refuses(requester_earnings) {
            return 0;
        }
        self.empty_once()
    }

    /// Takes half of the balance, rounded down, and leaves the rest in the store.
    ///
    /// The same authorization as [`Self::authorize_withdrawal`] applies first.
    pub(crate) fn collect_half(&mut self, requester_earnings: u64) -> u32 {
        if self.refuses(requester_earnings) {
            return 0;
        }
        let half = self.funds / 2;
        self.funds -= half;
        half
    }

    pub(crate) fn snapshot(&self, cell: BoardCoord) -> StoreSnapshot {
        StoreSnapshot {
            id: self.id,
            kind: self.kind,
            position: self.position,
            funds: self.funds,
            initial_funds: self.initial_funds,
            times_emptied: self.times_emptied,
            cell,
        }
    }
}

/// Position an opening store settles on.
///
/// Autonomous stores scan `[requested, requested + 4]`, clipped to the route,
/// and take the first position `is_free` accepts. Other kinds, and autonomous
/// stores that find nothing, stay where they were asked to open.
pub(crate) fn settle_position<F>(
    kind: StoreKind,
    requested: Position,
    route_size: u32,
    is_free: F,
) -> Position
where
    F: Fn(Position) -> bool,
{
    match kind {
        StoreKind::Autonomous => {
            let end = requested
                .get()
                .saturating_add(RELOCATION_WINDOW)
                .min(route_size);
            (requested.get()..end)
                .map(Position::new)
                .find(|candidate| is_free(*candidate))
                .unwrap_or(requested)
        }
        StoreKind::Normal | StoreKind::Fighter => requested,
    }
}

/// Registry that stores the road's stores in placement order and allocates identifiers.
#[derive(Debug)]
pub(crate) struct StoreRegistry {
    entries: Vec<StoreState>,
    next_store_id: StoreId,
}

impl StoreRegistry {
    /// Creates an empty store registry with a reset identifier counter.
    pub(crate) fn new() -> Self {
        Self {
            entries: Vec::new(),
            next_store_id: StoreId::new(0),
        }
    }

    pub(crate) fn is_free(&self, position: Position) -> bool {
        self.entries.iter().all(|store| store.position != position)
    }

    pub(crate) fn insert(
        &mut self,
        kind: StoreKind,
        position: Position,
        funds: u32,
    ) -> &StoreState {
        let id = self.next_store_id;
        self.next_store_id = StoreId::new(id.get().saturating_add(1));
        self.entries.push(StoreState::new(id, kind, position, funds));
        &self.entries[self.entries.len() - 1]
    }

    /// Removes the first store located at `position`.
    pub(crate) fn remove_at(&mut self, position: Position) -> Option<StoreState> {
        let index = self.index_at(position)?;
        Some(self.entries.remove(index))
    }

    pub(crate) fn index_at(&self, position: Position) -> Option<usize> {
        self.entries
            .iter()
            .position(|store| store.position == position)
    }

    /// Index of the first store at `position` that still holds funds.
    pub(crate) fn stocked_index_at(&self, position: Position) -> Option<usize> {
        self.entries
            .iter()
            .position(|store| store.position == position && store.funds > 0)
    }

    pub(crate) fn get(&self, index: usize) -> &StoreState {
        &self.entries[index]
    }

    pub(crate) fn get_mut(&mut self, index: usize) -> &mut StoreState {
        &mut self.entries[index]
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &StoreState> {
        self.entries.iter()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut StoreState> {
        self.entries.iter_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store(kind: StoreKind, funds: u32) -> StoreState {
        StoreState::new(StoreId::new(0), kind, Position::new(3), funds)
    }

    #[test]
    fn registry_starts_empty_with_zero_identifier() {
        let registry = StoreRegistry::new();
        assert_eq!(registry.iter().count(), 0);
        assert_eq!(registry.next_store_id.get(), 0);
    }

    #[test]
    fn registry_allocates_increasing_identifiers() {
        let mut registry = StoreRegistry::new();
        let first = registry.insert(StoreKind::Normal, Position::new(1), 10).id;
        let second = registry.insert(StoreKind::Fighter, Position::new(2), 10).id;
        assert!(first < second);
        assert!(!registry.is_free(Position::new(2)));
        assert!(registry.is_free(Position::new(3)));
    }

    #[test]
    fn emptying_counts_only_non_empty_collections() {
        let mut state = store(StoreKind::Normal, 40);
        assert_eq!(state.empty_once(), 40);
        assert_eq!(state.empty_once(), 0);
        assert_eq!(state.times_emptied, 1);

        state.resupply();
        assert_eq!(state.funds, 40);
    }

    #[test]
    fn fighter_refuses_poorer_requesters() {
        let mut state = store(StoreKind::Fighter, 30);
        assert_eq!(state.authorize_withdrawal(20), 0);
        assert_eq!(state.authorize_withdrawal(30), 0);
        assert_eq!(state.funds, 30);
        assert_eq!(state.times_emptied, 0);

        assert_eq!(state.authorize_withdrawal(40), 30);
        assert_eq!(state.funds, 0);
        assert_eq!(state.times_emptied, 1);
    }

    #[test]
    fn plain_stores_pay_anyone() {
        let mut state = store(StoreKind::Normal, 30);
        assert_eq!(state.authorize_withdrawal(0), 30);

        let mut state = store(StoreKind::Autonomous, 12);
        assert_eq!(state.authorize_withdrawal(0), 12);
    }

    #[test]
    fn half_collection_rounds_down_and_leaves_the_rest() {
        let mut state = store(StoreKind::Normal, 7);
        assert_eq!(state.collect_half(0), 3);
        assert_eq!(state.funds, 4);

        let mut state = store(StoreKind::Normal, 100);
        assert_eq!(state.collect_half(0), 50);
        assert_eq!(state.funds, 50);

        let mut state = store(StoreKind::Normal, 0);
        assert_eq!(state.collect_half(0), 0);
        assert_eq!(state.funds, 0);
    }

    #[test]
    fn fighter_refuses_half_collection_from_poorer_requesters() {
        let mut state = store(StoreKind::Fighter, 30);
        assert_eq!(state.collect_half(0), 0);
        assert_eq!(state.collect_half(30), 0);
        assert_eq!(state.funds, 30);

        assert_eq!(state.collect_half(31), 15);
        assert_eq!(state.funds, 15);
    }

    #[test]
    fn autonomous_store_takes_first_free_position_in_window() {
        let occupied = [Position::new(5), Position::new(6)];
        let settled = settle_position(StoreKind::Autonomous, Position::new(5), 20, |candidate| {
            !occupied.contains(&candidate)
        });
        assert_eq!(settled, Position::new(7));
    }

    #[test]
    fn autonomous_store_stays_when_window_is_full() {
        let settled = settle_position(StoreKind::Autonomous, Position::new(5), 20, |_| false);
        assert_eq!(settled, Position::new(5));
    }

    #[test]
    fn autonomous_window_is_clipped_to_the_route() {
        let settled = settle_position(StoreKind::Autonomous, Position::new(5), 7, |candidate| {
            candidate.get() >= 7
        });
        assert_eq!(settled, Position::new(5));
    }

    #[test]
    fn other_kinds_never_relocate() {
        let settled = settle_position(StoreKind::Fighter, Position::new(5), 20, |_| false);
        assert_eq!(settled, Position::new(5));
    }
}
