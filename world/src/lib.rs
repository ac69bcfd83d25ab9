#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative road state management for the Silk Road.
//!
//! The [`Road`] owns the board, the store and robot registries, the running
//! profit and the tracked leader. Every mutation goes through [`apply`], which
//! either completes fully and reports what happened as [`Event`] values, or
//! rejects the command with a [`RoadError`] before touching any state.

pub mod grid;
mod robots;
mod stores;

use serde::{Deserialize, Serialize};
use silk_road_core::{
    Command, Event, Position, RoadError, RobotId, RobotKind, StoreKind, WELCOME_BANNER,
};
use tracing::{debug, info};

use crate::{grid::Board, robots::RobotRegistry, stores::StoreRegistry};

const DEFAULT_ROAD_LENGTH: u32 = 20;

/// Settings used to open a new road.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoadConfig {
    /// Number of logical positions visible before any command runs.
    pub initial_length: u32,
}

impl Default for RoadConfig {
    fn default() -> Self {
        Self {
            initial_length: DEFAULT_ROAD_LENGTH,
        }
    }
}

/// Represents the authoritative Silk Road state.
#[derive(Debug)]
pub struct Road {
    banner: &'static str,
    board: Board,
    stores: StoreRegistry,
    robots: RobotRegistry,
    profit: u64,
    leader: Option<RobotId>,
}

impl Road {
    /// Opens a road whose first `initial_length` positions are visible.
    #[must_use]
    pub fn new(initial_length: u32) -> Self {
        Self {
            banner: WELCOME_BANNER,
            board: Board::new(initial_length),
            stores: StoreRegistry::new(),
            robots: RobotRegistry::new(),
            profit: 0,
            leader: None,
        }
    }

    /// Opens a road described by the provided configuration.
    #[must_use]
    pub fn from_config(config: &RoadConfig) -> Self {
        Self::new(config.initial_length)
    }

    fn fit(&mut self, position: Position, out_events: &mut Vec<Event>) {
        let change = self.board.fit(position);
        if change.extended {
            out_events.push(Event::RoadExtended {
                visible_target: self.board.visible_target(),
            });
        }
        if change.resized {
            let extent = self.board.extent();
            debug!(
                rows = extent.rows(),
                columns = extent.columns(),
                "board grew"
            );
            out_events.push(Event::BoardResized {
                rows: extent.rows(),
                columns: extent.columns(),
                origin_row: extent.origin().row(),
                origin_column: extent.origin().column(),
            });
        }
    }

    fn place_store(
        &mut self,
        position: Position,
        kind: StoreKind,
        funds: u32,
        out_events: &mut Vec<Event>,
    ) -> Result<(), RoadError> {
        ensure_on_road(position)?;
        if !self.stores.is_free(position) {
            return Err(RoadError::StoreOccupied { position });
        }

        self.fit(position, out_events);
        let registry = &self.stores;
        let settled =
            stores::settle_position(kind, position, self.board.route_size(), |candidate| {
                registry.is_free(candidate)
            });
        self.fit(settled, out_events);

        let store = self.stores.insert(kind, settled, funds);
        let cell = self.board.placed_cell(settled);
        info!(
            store = store.id.get(),
            kind = kind.label(),
            position = settled.get(),
            funds,
            "store placed"
        );
        out_events.push(Event::StorePlaced {
            store: store.id,
            kind,
            requested: position,
            position: settled,
            cell,
            funds,
        });
        Ok(())
    }

    fn place_robot(
        &mut self,
        position: Position,
        kind: RobotKind,
        out_events: &mut Vec<Event>,
    ) -> Result<(), RoadError> {
        ensure_on_road(position)?;
        self.fit(position, out_events);
        let robot = self.robots.insert(kind, position);
        let cell = self.board.placed_cell(position);
        info!(
            robot = robot.id.get(),
            kind = kind.label(),
            position = position.get(),
            "robot placed"
        );
        out_events.push(Event::RobotPlaced {
            robot: robot.id,
            kind,
            position,
            cell,
        });
        Ok(())
    }

    fn remove_store(
        &mut self,
        position: Position,
        out_events: &mut Vec<Event>,
    ) -> Result<(), RoadError> {
        let store = self
            .stores
            .remove_at(position)
            .ok_or(RoadError::NoStoreAt { position })?;
        out_events.push(Event::StoreRemoved {
            store: store.id,
            position,
            cell: self.board.placed_cell(position),
        });
        Ok(())
    }

    fn remove_robot(
        &mut self,
        starting_position: Position,
        out_events: &mut Vec<Event>,
    ) -> Result<(), RoadError> {
        let robot = self
            .robots
            .remove_started_at(starting_position)
            .ok_or(RoadError::MissingRobot { starting_position })?;
        out_events.push(Event::RobotRemoved {
            robot: robot.id,
            position: robot.position,
            cell: self.board.placed_cell(robot.position),
        });
        if self.leader == Some(robot.id) {
            self.refresh_leader(out_events);
        }
        Ok(())
    }

    fn move_robot(
        &mut self,
        from: Position,
        meters: i64,
        out_events: &mut Vec<Event>,
    ) -> Result<(), RoadError> {
        let robot_index = self
            .robots
            .index_at(from)
            .ok_or(RoadError::NoRobotAt { position: from })?;
        let destination = from
            .offset(meters)
            .ok_or(RoadError::BeforeRoadStart { from, meters })?;
        if !self.robots.get(robot_index).kind.permits_displacement(meters) {
            return Err(RoadError::BacktrackRefused { from, meters });
        }
        ensure_on_road(destination)?;

        self.fit(destination, out_events);
        self.relocate_robot(robot_index, destination, out_events);
        if let Some(store_index) = self.stores.stocked_index_at(destination) {
            self.collect(robot_index, store_index, meters.unsigned_abs(), out_events);
        }
        Ok(())
    }

    fn auto_move_robot(&mut self, out_events: &mut Vec<Event>) -> Result<(), RoadError> {
        let mut best: Option<(usize, usize, i64)> = None;
        for (robot_index, robot) in self.robots.iter().enumerate() {
            for (store_index, store) in self.stores.iter().enumerate() {
                if store.funds == 0 {
                    continue;
                }
                let gain =
                    i64::from(store.funds) - i64::from(robot.position.distance(store.position));
                if best.map_or(true, |(_, _, best_gain)| gain > best_gain) {
                    best = Some((robot_index, store_index, gain));
                }
            }
        }

        let Some((robot_index, store_index, _)) = best.filter(|(_, _, gain)| *gain > 0) else {
            return Err(RoadError::NoProfitableMove);
        };

        let from = self.robots.get(robot_index).position;
        let destination = self.stores.get(store_index).position;
        self.fit(destination, out_events);
        self.relocate_robot(robot_index, destination, out_events);
        self.collect(
            robot_index,
            store_index,
            u64::from(from.distance(destination)),
            out_events,
        );
        Ok(())
    }

    fn request_funds(
        &mut self,
        robot_position: Position,
        store_position: Position,
        out_events: &mut Vec<Event>,
    ) -> Result<(), RoadError> {
        let robot_index = self.robots.index_at(robot_position).ok_or(RoadError::NoRobotAt {
            position: robot_position,
        })?;
        let store_index = self.stores.index_at(store_position).ok_or(RoadError::NoStoreAt {
            position: store_position,
        })?;

        let robot = self.robots.get(robot_index);
        let (robot_id, kind, earnings) = (robot.id, robot.kind, robot.earnings);
        let store = self.stores.get_mut(store_index);
        let granted = match kind {
            RobotKind::Tender => store.collect_half(earnings),
            RobotKind::Normal | RobotKind::NeverBack => store.authorize_withdrawal(earnings),
        };
        if granted == 0 {
            debug!(
                robot = robot_id.get(),
                store = store.id.get(),
                "funds request granted nothing"
            );
            return Ok(());
        }

        out_events.push(Event::FundsCollected {
            robot: robot_id,
            store: store.id,
            collected: granted,
            gain: i64::from(granted),
        });
        self.credit(robot_index, i64::from(granted), out_events);
        Ok(())
    }

    fn resupply_stores(&mut self, out_events: &mut Vec<Event>) {
        for store in self.stores.iter_mut() {
            store.resupply();
        }
        out_events.push(Event::StoresResupplied);
    }

    fn return_robots(&mut self, out_events: &mut Vec<Event>) {
        let board = &self.board;
        for robot in self.robots.iter_mut() {
            let from = robot.position;
            robot.reset();
            if from != robot.position {
                out_events.push(Event::RobotMoved {
                    robot: robot.id,
                    from,
                    to: robot.position,
                    cell: board.placed_cell(robot.position),
                });
            }
        }
        out_events.push(Event::RobotsReturned);
        self.refresh_leader(out_events);
    }

    fn reboot(&mut self, out_events: &mut Vec<Event>) {
        self.resupply_stores(out_events);
        self.return_robots(out_events);
        self.profit = 0;
        info!("road rebooted");
        out_events.push(Event::ProfitChanged { profit: 0 });
    }

    fn relocate_robot(
        &mut self,
        robot_index: usize,
        destination: Position,
        out_events: &mut Vec<Event>,
    ) {
        let cell = self.board.placed_cell(destination);
        let robot = self.robots.get_mut(robot_index);
        let from = robot.position;
        robot.relocate(destination);
        debug!(
            robot = robot.id.get(),
            from = from.get(),
            to = destination.get(),
            "robot moved"
        );
        out_events.push(Event::RobotMoved {
            robot: robot.id,
            from,
            to: destination,
            cell,
        });
    }

    /// Empties the store into the robot; the travelled distance is the cost of the trip.
    fn collect(
        &mut self,
        robot_index: usize,
        store_index: usize,
        travelled: u64,
        out_events: &mut Vec<Event>,
    ) {
        let store = self.stores.get_mut(store_index);
        let store_id = store.id;
        let collected = store.empty_once();
        let gain = i64::from(collected) - i64::try_from(travelled).unwrap_or(i64::MAX);
        out_events.push(Event::FundsCollected {
            robot: self.robots.get(robot_index).id,
            store: store_id,
            collected,
            gain,
        });
        self.credit(robot_index, gain, out_events);
    }

    fn credit(&mut self, robot_index: usize, amount: i64, out_events: &mut Vec<Event>) {
        if !self.robots.get_mut(robot_index).add_earnings(amount) {
            return;
        }
        self.profit = self.profit.saturating_add(amount.unsigned_abs());
        info!(profit = self.profit, "profit changed");
        out_events.push(Event::ProfitChanged {
            profit: self.profit,
        });
        self.refresh_leader(out_events);
    }

    fn refresh_leader(&mut self, out_events: &mut Vec<Event>) {
        let current = self.robots.richest().map(|robot| robot.id);
        if current != self.leader {
            out_events.push(Event::LeaderChanged {
                previous: self.leader,
                current,
            });
            self.leader = current;
        }
    }
}

fn ensure_on_road(position: Position) -> Result<(), RoadError> {
    if position.is_on_road() {
        Ok(())
    } else {
        Err(RoadError::BeyondRoadEnd { position })
    }
}

impl Default for Road {
    fn default() -> Self {
        Self::new(DEFAULT_ROAD_LENGTH)
    }
}

/// Applies the provided command to the road, mutating state deterministically.
///
/// Rejected commands leave the road untouched, push a single
/// [`Event::CommandRejected`] and return the reason.
pub fn apply(
    road: &mut Road,
    command: Command,
    out_events: &mut Vec<Event>,
) -> Result<(), RoadError> {
    let outcome = match command {
        Command::PlaceStore {
            position,
            kind,
            funds,
        } => road.place_store(position, kind, funds, out_events),
        Command::PlaceRobot { position, kind } => road.place_robot(position, kind, out_events),
        Command::RemoveStore { position } => road.remove_store(position, out_events),
        Command::RemoveRobot { starting_position } => {
            road.remove_robot(starting_position, out_events)
        }
        Command::MoveRobot { from, meters } => road.move_robot(from, meters, out_events),
        Command::AutoMoveRobot => road.auto_move_robot(out_events),
        Command::RequestFunds { robot, store } => road.request_funds(robot, store, out_events),
        Command::ResupplyStores => {
            road.resupply_stores(out_events);
            Ok(())
        }
        Command::ReturnRobots => {
            road.return_robots(out_events);
            Ok(())
        }
        Command::Reboot => {
            road.reboot(out_events);
            Ok(())
        }
    };

    if let Err(reason) = outcome {
        debug!(%reason, "command rejected");
        out_events.push(Event::CommandRejected { reason });
    }
    outcome
}

/// Query functions that provide read-only access to the road state.
pub mod query {
    use super::Road;
    use crate::grid::{GridExtent, VisibilityMask};
    use silk_road_core::{
        BoardCoord, Position, RobotId, RobotSnapshot, RobotView, StoreSnapshot, StoreView,
    };

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(road: &Road) -> &'static str {
        road.banner
    }

    /// Number of logical positions the road currently shows, never below one.
    #[must_use]
    pub fn route_size(road: &Road) -> u32 {
        road.board.route_size()
    }

    /// Smallest length the board must currently contain.
    #[must_use]
    pub fn visible_target(road: &Road) -> u32 {
        road.board.visible_target()
    }

    /// Profit accumulated since the road opened or last rebooted.
    #[must_use]
    pub fn profit(road: &Road) -> u64 {
        road.profit
    }

    /// Robot currently tracked as leader; `None` until the first leader refresh.
    #[must_use]
    pub fn leader(road: &Road) -> Option<RobotId> {
        road.leader
    }

    /// Richest robot on the road; ties go to the robot placed first.
    #[must_use]
    pub fn richest_robot(road: &Road) -> Option<RobotSnapshot> {
        road.robots
            .richest()
            .map(|robot| robot.snapshot(road.board.placed_cell(robot.position)))
    }

    /// Captures a read-only view of the robots on the road.
    #[must_use]
    pub fn robot_view(road: &Road) -> RobotView {
        let snapshots = road
            .robots
            .iter()
            .map(|robot| robot.snapshot(road.board.placed_cell(robot.position)))
            .collect();
        RobotView::from_snapshots(snapshots)
    }

    /// Captures a read-only view of the stores along the road.
    #[must_use]
    pub fn store_view(road: &Road) -> StoreView {
        let snapshots: Vec<StoreSnapshot> = road
            .stores
            .iter()
            .map(|store| store.snapshot(road.board.placed_cell(store.position)))
            .collect();
        StoreView::from_snapshots(snapshots)
    }

    /// Board cell that displays the position, if the board covers it.
    #[must_use]
    pub fn cell_for(road: &Road, position: Position) -> Option<BoardCoord> {
        road.board.cell_for(position)
    }

    /// Exposes a read-only view of the board.
    #[must_use]
    pub fn board_view(road: &Road) -> BoardView<'_> {
        BoardView {
            extent: road.board.extent(),
            mask: road.board.mask(),
        }
    }

    /// Read-only view into the board extent and its visibility mask.
    #[derive(Clone, Copy, Debug)]
    pub struct BoardView<'a> {
        extent: &'a GridExtent,
        mask: &'a VisibilityMask,
    }

    impl<'a> BoardView<'a> {
        /// Extent covered by the board.
        #[must_use]
        pub fn extent(&self) -> &'a GridExtent {
            self.extent
        }

        /// Visibility flags laid over the extent.
        #[must_use]
        pub fn mask(&self) -> &'a VisibilityMask {
            self.mask
        }

        /// Provides the dimensions of the board as `(rows, columns)`.
        #[must_use]
        pub fn dimensions(&self) -> (u32, u32) {
            (self.extent.rows(), self.extent.columns())
        }

        /// Reports whether the cell displays part of the visible road.
        #[must_use]
        pub fn is_visible(&self, cell: BoardCoord) -> bool {
            self.mask.is_visible(cell)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use silk_road_core::{BoardCoord, RobotView};

    fn run(road: &mut Road, command: Command) -> (Result<(), RoadError>, Vec<Event>) {
        let mut events = Vec::new();
        let outcome = apply(road, command, &mut events);
        (outcome, events)
    }

    fn place_robot(road: &mut Road, position: u32) {
        let (outcome, _) = run(
            road,
            Command::PlaceRobot {
                position: Position::new(position),
                kind: RobotKind::Normal,
            },
        );
        assert_eq!(outcome, Ok(()));
    }

    fn place_store(road: &mut Road, position: u32, funds: u32) {
        let (outcome, _) = run(
            road,
            Command::PlaceStore {
                position: Position::new(position),
                kind: StoreKind::Normal,
                funds,
            },
        );
        assert_eq!(outcome, Ok(()));
    }

    fn robots(road: &Road) -> RobotView {
        query::robot_view(road)
    }

    #[test]
    fn new_road_shows_its_initial_length() {
        let road = Road::default();
        assert_eq!(query::route_size(&road), 20);
        assert_eq!(query::profit(&road), 0);
        assert!(query::richest_robot(&road).is_none());
        assert_eq!(query::welcome_banner(&road), WELCOME_BANNER);
    }

    #[test]
    fn road_opens_from_config() {
        let road = Road::from_config(&RoadConfig { initial_length: 7 });
        assert_eq!(query::route_size(&road), 7);
    }

    #[test]
    fn duplicate_store_is_rejected_without_events_besides_rejection() {
        let mut road = Road::new(10);
        place_store(&mut road, 3, 10);

        let (outcome, events) = run(
            &mut road,
            Command::PlaceStore {
                position: Position::new(3),
                kind: StoreKind::Fighter,
                funds: 50,
            },
        );

        let reason = RoadError::StoreOccupied {
            position: Position::new(3),
        };
        assert_eq!(outcome, Err(reason));
        assert_eq!(events, vec![Event::CommandRejected { reason }]);
        assert_eq!(query::store_view(&road).len(), 1);
    }

    #[test]
    fn placing_beyond_the_road_extends_it() {
        let mut road = Road::new(5);
        let (_, events) = run(
            &mut road,
            Command::PlaceRobot {
                position: Position::new(12),
                kind: RobotKind::Normal,
            },
        );

        assert_eq!(query::route_size(&road), 13);
        assert!(events.contains(&Event::RoadExtended { visible_target: 13 }));
        assert!(events
            .iter()
            .any(|event| matches!(event, Event::BoardResized { .. })));
    }

    #[test]
    fn negative_growth_reprojects_existing_entities() {
        let mut road = Road::new(1);
        place_store(&mut road, 0, 5);
        assert_eq!(
            query::store_view(&road).into_vec()[0].cell,
            BoardCoord::new(0, 0)
        );

        place_robot(&mut road, 4);

        let store = query::store_view(&road).into_vec()[0];
        assert_eq!(store.cell, BoardCoord::new(0, 1));
        assert_eq!(
            query::cell_for(&road, Position::new(4)),
            Some(BoardCoord::new(1, 0))
        );
        assert_eq!(query::board_view(&road).dimensions(), (2, 3));
    }

    #[test]
    fn manual_move_without_robot_is_rejected() {
        let mut road = Road::new(10);
        let (outcome, _) = run(
            &mut road,
            Command::MoveRobot {
                from: Position::new(2),
                meters: 3,
            },
        );
        assert_eq!(
            outcome,
            Err(RoadError::NoRobotAt {
                position: Position::new(2)
            })
        );
    }

    #[test]
    fn manual_move_before_the_start_is_rejected() {
        let mut road = Road::new(10);
        place_robot(&mut road, 2);

        let (outcome, _) = run(
            &mut road,
            Command::MoveRobot {
                from: Position::new(2),
                meters: -3,
            },
        );

        assert_eq!(
            outcome,
            Err(RoadError::BeforeRoadStart {
                from: Position::new(2),
                meters: -3
            })
        );
        assert_eq!(robots(&road).into_vec()[0].position, Position::new(2));
    }

    #[test]
    fn never_back_robot_refuses_backward_manual_move() {
        let mut road = Road::new(10);
        let _ = run(
            &mut road,
            Command::PlaceRobot {
                position: Position::new(6),
                kind: RobotKind::NeverBack,
            },
        );

        let (outcome, events) = run(
            &mut road,
            Command::MoveRobot {
                from: Position::new(6),
                meters: -2,
            },
        );

        assert!(matches!(outcome, Err(RoadError::BacktrackRefused { .. })));
        assert_eq!(events.len(), 1);
        assert_eq!(robots(&road).into_vec()[0].position, Position::new(6));

        let (outcome, _) = run(
            &mut road,
            Command::MoveRobot {
                from: Position::new(6),
                meters: 2,
            },
        );
        assert_eq!(outcome, Ok(()));
        assert_eq!(robots(&road).into_vec()[0].position, Position::new(8));
    }

    #[test]
    fn unprofitable_arrival_still_empties_the_store() {
        let mut road = Road::new(20);
        place_robot(&mut road, 0);
        place_store(&mut road, 10, 4);

        let (outcome, events) = run(
            &mut road,
            Command::MoveRobot {
                from: Position::new(0),
                meters: 10,
            },
        );

        assert_eq!(outcome, Ok(()));
        assert!(events.iter().any(|event| matches!(
            event,
            Event::FundsCollected {
                collected: 4,
                gain: -6,
                ..
            }
        )));
        assert!(!events
            .iter()
            .any(|event| matches!(event, Event::ProfitChanged { .. })));
        assert_eq!(query::profit(&road), 0);
        assert_eq!(robots(&road).into_vec()[0].earnings, 0);
        let store = query::store_view(&road).into_vec()[0];
        assert_eq!(store.funds, 0);
        assert_eq!(store.times_emptied, 1);
    }

    #[test]
    fn auto_move_without_stocked_store_is_a_no_op() {
        let mut road = Road::new(20);
        place_robot(&mut road, 0);
        place_store(&mut road, 15, 10);

        let (outcome, events) = run(&mut road, Command::AutoMoveRobot);

        assert_eq!(outcome, Err(RoadError::NoProfitableMove));
        assert_eq!(
            events,
            vec![Event::CommandRejected {
                reason: RoadError::NoProfitableMove
            }]
        );
        assert_eq!(robots(&road).into_vec()[0].position, Position::new(0));
        assert_eq!(query::store_view(&road).into_vec()[0].funds, 10);
    }

    #[test]
    fn leader_changes_are_announced_once() {
        let mut road = Road::new(30);
        place_robot(&mut road, 0);
        place_robot(&mut road, 20);
        place_store(&mut road, 22, 50);
        place_store(&mut road, 2, 10);

        let (_, first) = run(&mut road, Command::AutoMoveRobot);
        let robot_ids: Vec<RobotId> = robots(&road).iter().map(|robot| robot.id).collect();
        assert!(first.contains(&Event::LeaderChanged {
            previous: None,
            current: Some(robot_ids[1]),
        }));

        let (_, second) = run(&mut road, Command::AutoMoveRobot);
        assert!(!second
            .iter()
            .any(|event| matches!(event, Event::LeaderChanged { .. })));
        assert_eq!(query::leader(&road), Some(robot_ids[1]));
    }

    #[test]
    fn removing_the_leader_hands_over_leadership() {
        let mut road = Road::new(30);
        place_robot(&mut road, 0);
        place_robot(&mut road, 10);
        place_store(&mut road, 12, 40);
        let _ = run(&mut road, Command::AutoMoveRobot);
        let ids: Vec<RobotId> = robots(&road).iter().map(|robot| robot.id).collect();
        assert_eq!(query::leader(&road), Some(ids[1]));

        let (outcome, events) = run(
            &mut road,
            Command::RemoveRobot {
                starting_position: Position::new(10),
            },
        );

        assert_eq!(outcome, Ok(()));
        assert!(events.contains(&Event::LeaderChanged {
            previous: Some(ids[1]),
            current: Some(ids[0]),
        }));
    }

    #[test]
    fn removing_unknown_entities_is_rejected() {
        let mut road = Road::new(10);
        let (outcome, _) = run(
            &mut road,
            Command::RemoveStore {
                position: Position::new(1),
            },
        );
        assert_eq!(
            outcome,
            Err(RoadError::NoStoreAt {
                position: Position::new(1)
            })
        );

        let (outcome, _) = run(
            &mut road,
            Command::RemoveRobot {
                starting_position: Position::new(1),
            },
        );
        assert_eq!(
            outcome,
            Err(RoadError::MissingRobot {
                starting_position: Position::new(1)
            })
        );
    }
}
