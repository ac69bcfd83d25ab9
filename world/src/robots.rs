//! Authoritative robot state and the registry that owns it.

use silk_road_core::{BoardCoord, Position, RobotId, RobotKind, RobotSnapshot};

/// State of a robot stored inside the road.
#[derive(Clone, Debug)]
pub(crate) struct RobotState {
    pub(crate) id: RobotId,
    pub(crate) kind: RobotKind,
    pub(crate) position: Position,
    pub(crate) starting_position: Position,
    pub(crate) earnings: u64,
}

impl RobotState {
    fn new(id: RobotId, kind: RobotKind, position: Position) -> Self {
        Self {
            id,
            kind,
            position,
            starting_position: position,
            earnings: 0,
        }
    }

    /// Credits a positive amount. Zero and negative amounts are ignored and
    /// reported as `false`.
    pub(crate) fn add_earnings(&mut self, amount: i64) -> bool {
        if amount <= 0 {
            return false;
        }
        self.earnings = self.earnings.saturating_add(amount.unsigned_abs());
        true
    }

    pub(crate) fn relocate(&mut self, destination: Position) {
        self.position = destination;
    }

    /// Sends the robot back to where it started and clears its earnings.
    pub(crate) fn reset(&mut self) {
        self.position = self.starting_position;
        self.earnings = 0;
    }

    pub(crate) fn snapshot(&self, cell: BoardCoord) -> RobotSnapshot {
        RobotSnapshot {
            id: self.id,
            kind: self.kind,
            position: self.position,
            starting_position: self.starting_position,
            earnings: self.earnings,
            cell,
        }
    }
}

/// Registry that stores the road's robots in placement order and allocates identifiers.
#[derive(Debug)]
pub(crate) struct RobotRegistry {
    entries: Vec<RobotState>,
    next_robot_id: RobotId,
}

impl RobotRegistry {
    pub(crate) fn new() -> Self {
        Self {
            entries: Vec::new(),
            next_robot_id: RobotId::new(0),
        }
    }

    pub(crate) fn insert(&mut self, kind: RobotKind, position: Position) -> &RobotState {
        let id = self.next_robot_id;
        self.next_robot_id = RobotId::new(id.get().saturating_add(1));
        self.entries.push(RobotState::new(id, kind, position));
        &self.entries[self.entries.len() - 1]
    }

    /// Removes the first robot that started at `starting_position`.
    pub(crate) fn remove_started_at(&mut self, starting_position: Position) -> Option<RobotState> {
        let index = self
            .entries
            .iter()
            .position(|robot| robot.starting_position == starting_position)?;
        Some(self.entries.remove(index))
    }

    /// Index of the first robot currently standing at `position`.
    pub(crate) fn index_at(&self, position: Position) -> Option<usize> {
        self.entries
            .iter()
            .position(|robot| robot.position == position)
    }

    pub(crate) fn get(&self, index: usize) -> &RobotState {
        &self.entries[index]
    }

    pub(crate) fn get_mut(&mut self, index: usize) -> &mut RobotState {
        &mut self.entries[index]
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &RobotState> {
        self.entries.iter()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut RobotState> {
        self.entries.iter_mut()
    }

    /// Richest robot; ties go to the robot placed first.
    pub(crate) fn richest(&self) -> Option<&RobotState> {
        let mut robots = self.entries.iter();
        let first = robots.next()?;
        Some(robots.fold(first, |leader, robot| {
            if robot.earnings > leader.earnings {
                robot
            } else {
                leader
            }
        }))
    }
}
