#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Silk Road engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative road, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the road executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values that presenters
//! react to. Rejected commands surface as [`RoadError`] values so callers can
//! branch on the outcome without inspecting the event stream.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod spiral;

pub use spiral::{coords_for, Spiral};

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to the Silk Road.";

/// Longest road the board can lay out; valid positions lie below this length.
pub const MAX_ROUTE_LENGTH: u32 = 1 << 20;

/// Commands that express all permissible road mutations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    /// Requests placement of a store at the provided position.
    PlaceStore {
        /// Logical position along the road where the store should open.
        position: Position,
        /// Behaviour attached to the store.
        kind: StoreKind,
        /// Funds the store starts with and returns to on resupply.
        funds: u32,
    },
    /// Requests placement of a robot at the provided position.
    PlaceRobot {
        /// Logical position the robot starts from.
        position: Position,
        /// Behaviour attached to the robot.
        kind: RobotKind,
    },
    /// Requests removal of the first store located at the provided position.
    RemoveStore {
        /// Position of the store targeted for removal.
        position: Position,
    },
    /// Requests removal of the first robot that started at the provided position.
    RemoveRobot {
        /// Starting position of the robot targeted for removal.
        starting_position: Position,
    },
    /// Moves the first robot standing at `from` by `meters` along the road.
    MoveRobot {
        /// Position currently occupied by the robot.
        from: Position,
        /// Signed distance to travel; negative values move towards the start.
        meters: i64,
    },
    /// Sends the robot with the best reachable gain to the matching store.
    AutoMoveRobot,
    /// Lets a robot ask a store for funds without travelling.
    RequestFunds {
        /// Position currently occupied by the requesting robot.
        robot: Position,
        /// Position of the store being asked.
        store: Position,
    },
    /// Restores every store to its initial funds.
    ResupplyStores,
    /// Sends every robot back to its starting position and clears its earnings.
    ReturnRobots,
    /// Resupplies stores, returns robots and clears the accumulated profit.
    Reboot,
}

/// Events broadcast by the road after processing commands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Event {
    /// Announces that the road now extends to a longer visible length.
    RoadExtended {
        /// Number of logical positions that must remain visible.
        visible_target: u32,
    },
    /// Announces that the board grew. Every board coordinate handed out before
    /// this event must be re-derived from the new origin.
    BoardResized {
        /// Number of rows in the grown board.
        rows: u32,
        /// Number of columns in the grown board.
        columns: u32,
        /// Board row that holds logical position zero.
        origin_row: u32,
        /// Board column that holds logical position zero.
        origin_column: u32,
    },
    /// Confirms that a store opened on the road.
    StorePlaced {
        /// Identifier assigned to the store.
        store: StoreId,
        /// Behaviour attached to the store.
        kind: StoreKind,
        /// Position named in the placement request.
        requested: Position,
        /// Position the store settled on.
        position: Position,
        /// Board cell that displays the store.
        cell: BoardCoord,
        /// Funds the store opened with.
        funds: u32,
    },
    /// Confirms that a store closed.
    StoreRemoved {
        /// Identifier of the removed store.
        store: StoreId,
        /// Position the store occupied.
        position: Position,
        /// Board cell that displayed the store.
        cell: BoardCoord,
    },
    /// Confirms that a robot joined the road.
    RobotPlaced {
        /// Identifier assigned to the robot.
        robot: RobotId,
        /// Behaviour attached to the robot.
        kind: RobotKind,
        /// Position the robot starts from.
        position: Position,
        /// Board cell that displays the robot.
        cell: BoardCoord,
    },
    /// Confirms that a robot left the road.
    RobotRemoved {
        /// Identifier of the removed robot.
        robot: RobotId,
        /// Position the robot occupied when removed.
        position: Position,
        /// Board cell that displayed the robot.
        cell: BoardCoord,
    },
    /// Confirms that a robot changed position.
    RobotMoved {
        /// Identifier of the robot that moved.
        robot: RobotId,
        /// Position the robot occupied before moving.
        from: Position,
        /// Position the robot occupies after moving.
        to: Position,
        /// Board cell that now displays the robot.
        cell: BoardCoord,
    },
    /// Reports that a robot took funds from a store.
    FundsCollected {
        /// Robot that collected.
        robot: RobotId,
        /// Store that paid out.
        store: StoreId,
        /// Amount removed from the store.
        collected: u32,
        /// Collected amount minus travel cost; only positive gains are credited.
        gain: i64,
    },
    /// Confirms that every store was restored to its initial funds.
    StoresResupplied,
    /// Confirms that every robot was sent back to its starting position.
    RobotsReturned,
    /// Reports the new value of the accumulated profit.
    ProfitChanged {
        /// Profit accumulated since the last reboot.
        profit: u64,
    },
    /// Reports that the richest robot changed.
    LeaderChanged {
        /// Robot that led before, if any.
        previous: Option<RobotId>,
        /// Robot that leads now, if any remain.
        current: Option<RobotId>,
    },
    /// Reports that a command was rejected without mutating the road.
    CommandRejected {
        /// Specific reason the command failed.
        reason: RoadError,
    },
}

/// Reasons a command may be rejected by the road.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Error)]
pub enum RoadError {
    /// A store already occupies the requested position.
    #[error("a store already occupies position {position}")]
    StoreOccupied {
        /// Position named in the placement request.
        position: Position,
    },
    /// No robot currently stands at the provided position.
    #[error("no robot stands at position {position}")]
    NoRobotAt {
        /// Position that was searched.
        position: Position,
    },
    /// No store is located at the provided position.
    #[error("no store stands at position {position}")]
    NoStoreAt {
        /// Position that was searched.
        position: Position,
    },
    /// No robot started at the provided position.
    #[error("no robot started at position {starting_position}")]
    MissingRobot {
        /// Starting position that was searched.
        starting_position: Position,
    },
    /// The requested move would end before the start of the road.
    #[error("moving {meters} meters from position {from} leaves the road")]
    BeforeRoadStart {
        /// Position the robot occupied.
        from: Position,
        /// Requested displacement.
        meters: i64,
    },
    /// The robot's own movement rule forbids the requested direction.
    #[error("robot at position {from} refuses to move {meters} meters backwards")]
    BacktrackRefused {
        /// Position the robot occupied.
        from: Position,
        /// Requested displacement.
        meters: i64,
    },
    /// No robot can reach a stocked store at a positive gain.
    #[error("no robot can reach a store at a profit")]
    NoProfitableMove,
    /// The position lies past the longest road the board can lay out.
    #[error("position {position} lies beyond the longest supported road")]
    BeyondRoadEnd {
        /// Position named in the command.
        position: Position,
    },
}

/// Logical distance along the road measured from its start.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Position(u32);

impl Position {
    /// Start of the road.
    pub const START: Self = Self(0);

    /// Creates a new position with the provided distance from the start.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the distance from the start of the road.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }

    /// Position reached after travelling `meters`, or `None` when the move
    /// would leave the road.
    #[must_use]
    pub fn offset(self, meters: i64) -> Option<Self> {
        let target = i64::from(self.0).checked_add(meters)?;
        u32::try_from(target).ok().map(Self)
    }

    /// Number of meters separating two positions.
    #[must_use]
    pub const fn distance(self, other: Position) -> u32 {
        self.0.abs_diff(other.0)
    }

    /// Whether the position fits within [`MAX_ROUTE_LENGTH`].
    #[must_use]
    pub const fn is_on_road(self) -> bool {
        self.0 < MAX_ROUTE_LENGTH
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Cardinal directions the spiral turns through.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Movement toward decreasing row indices.
    North,
    /// Movement toward increasing column indices.
    East,
    /// Movement toward increasing row indices.
    South,
    /// Movement toward decreasing column indices.
    West,
}

impl Direction {
    /// Direction obtained after a quarter turn clockwise.
    #[must_use]
    pub const fn clockwise(self) -> Self {
        match self {
            Self::North => Self::East,
            Self::East => Self::South,
            Self::South => Self::West,
            Self::West => Self::North,
        }
    }
}

/// Location on the unbounded spiral plane, relative to position zero.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SpiralCoord {
    row: i32,
    column: i32,
}

impl SpiralCoord {
    /// Coordinate of the start of the road.
    pub const ORIGIN: Self = Self::new(0, 0);

    /// Creates a new spiral coordinate.
    #[must_use]
    pub const fn new(row: i32, column: i32) -> Self {
        Self { row, column }
    }

    /// Signed row offset from the start of the road.
    #[must_use]
    pub const fn row(&self) -> i32 {
        self.row
    }

    /// Signed column offset from the start of the road.
    #[must_use]
    pub const fn column(&self) -> i32 {
        self.column
    }

    /// Neighbouring coordinate one unit away in the provided direction.
    #[must_use]
    pub const fn step(self, direction: Direction) -> Self {
        match direction {
            Direction::North => Self::new(self.row - 1, self.column),
            Direction::East => Self::new(self.row, self.column + 1),
            Direction::South => Self::new(self.row + 1, self.column),
            Direction::West => Self::new(self.row, self.column - 1),
        }
    }

    /// Computes the Manhattan distance between two spiral coordinates.
    #[must_use]
    pub const fn manhattan_distance(self, other: SpiralCoord) -> u32 {
        self.row.abs_diff(other.row) + self.column.abs_diff(other.column)
    }
}

/// Location of a single board cell expressed as row and column indices.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct BoardCoord {
    row: u32,
    column: u32,
}

impl BoardCoord {
    /// Creates a new board cell coordinate.
    #[must_use]
    pub const fn new(row: u32, column: u32) -> Self {
        Self { row, column }
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }
}

/// Unique identifier assigned to a store.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StoreId(u32);

impl StoreId {
    /// Creates a new store identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a robot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RobotId(u32);

impl RobotId {
    /// Creates a new robot identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Behaviours a store can be opened with.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreKind {
    /// Plain store that pays out to anyone.
    #[default]
    Normal,
    /// Store that looks for a free spot near its requested position when opened.
    Autonomous,
    /// Store that only pays robots richer than itself.
    Fighter,
}

impl StoreKind {
    /// Lower-case label used in logs and scenario files.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Autonomous => "autonomous",
            Self::Fighter => "fighter",
        }
    }
}

/// Behaviours a robot can be placed with.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RobotKind {
    /// Plain robot that travels in both directions.
    #[default]
    Normal,
    /// Robot that never moves towards the start of the road.
    NeverBack,
    /// Robot that only takes half of a store's funds when asking directly.
    Tender,
}

impl RobotKind {
    /// Lower-case label used in logs and scenario files.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::NeverBack => "neverback",
            Self::Tender => "tender",
        }
    }

    /// Reports whether a robot of this kind accepts the signed displacement.
    #[must_use]
    pub const fn permits_displacement(self, meters: i64) -> bool {
        match self {
            Self::NeverBack => meters >= 0,
            Self::Normal | Self::Tender => true,
        }
    }
}

/// Immutable representation of a single store's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct StoreSnapshot {
    /// Identifier allocated to the store by the road.
    pub id: StoreId,
    /// Behaviour attached to the store.
    pub kind: StoreKind,
    /// Position the store occupies.
    pub position: Position,
    /// Funds currently held by the store.
    pub funds: u32,
    /// Funds restored on resupply.
    pub initial_funds: u32,
    /// Number of times the store was emptied.
    pub times_emptied: u32,
    /// Board cell that displays the store.
    pub cell: BoardCoord,
}

/// Read-only snapshot describing all stores along the road.
#[derive(Clone, Debug, Default)]
pub struct StoreView {
    snapshots: Vec<StoreSnapshot>,
}

impl StoreView {
    /// Creates a new store view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<StoreSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured store snapshots in placement order.
    pub fn iter(&self) -> impl Iterator<Item = &StoreSnapshot> {
        self.snapshots.iter()
    }

    /// First store located at the provided position, if any.
    #[must_use]
    pub fn at(&self, position: Position) -> Option<&StoreSnapshot> {
        self.snapshots
            .iter()
            .find(|snapshot| snapshot.position == position)
    }

    /// Number of stores captured by the view.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether the view captured no stores.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<StoreSnapshot> {
        self.snapshots
    }
}

/// Immutable representation of a single robot's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct RobotSnapshot {
    /// Identifier allocated to the robot by the road.
    pub id: RobotId,
    /// Behaviour attached to the robot.
    pub kind: RobotKind,
    /// Position the robot currently occupies.
    pub position: Position,
    /// Position the robot returns to on reset.
    pub starting_position: Position,
    /// Earnings accumulated since the last reset.
    pub earnings: u64,
    /// Board cell that displays the robot.
    pub cell: BoardCoord,
}

/// Read-only snapshot describing all robots on the road.
#[derive(Clone, Debug, Default)]
pub struct RobotView {
    snapshots: Vec<RobotSnapshot>,
}

impl RobotView {
    /// Creates a new robot view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<RobotSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured robot snapshots in placement order.
    pub fn iter(&self) -> impl Iterator<Item = &RobotSnapshot> {
        self.snapshots.iter()
    }

    /// First robot currently standing at the provided position, if any.
    #[must_use]
    pub fn at(&self, position: Position) -> Option<&RobotSnapshot> {
        self.snapshots
            .iter()
            .find(|snapshot| snapshot.position == position)
    }

    /// Number of robots captured by the view.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether the view captured no robots.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<RobotSnapshot> {
        self.snapshots
    }
}
