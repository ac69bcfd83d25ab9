#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Silk Road adapters.
//!
//! The [`Presenter`] reacts to road events the way a visual front end would:
//! it tracks which robot blinks as the leader, keeps the profit bar current
//! and reports profit only when the value actually changed. [`Scene`] values
//! are composed from road views and handed to a [`RenderingBackend`].

mod text;

pub use text::TextBackend;

use anyhow::Result as AnyResult;
use serde::{Deserialize, Serialize};
use silk_road_core::{
    BoardCoord, Event, Position, RobotId, RobotKind, RobotView, StoreId, StoreKind, StoreView,
};
use std::{error::Error, fmt};
use tracing::info;

/// Settings that shape the presenter's output.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PresenterConfig {
    /// Profit that fills the bar completely.
    pub max_profit: u64,
    /// Height of a completely filled bar.
    pub bar_height: u32,
}

impl Default for PresenterConfig {
    fn default() -> Self {
        Self {
            max_profit: 1000,
            bar_height: 200,
        }
    }
}

/// Vertical bar whose fill tracks the accumulated profit.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ProfitBar {
    /// Filled portion of the bar.
    pub fill: u32,
    /// Height of a completely filled bar.
    pub height: u32,
}

impl ProfitBar {
    /// Computes the bar for the provided profit, clamped to the bar height.
    #[must_use]
    pub fn for_profit(profit: u64, config: &PresenterConfig) -> Self {
        let height = config.bar_height;
        if config.max_profit == 0 {
            let fill = if profit > 0 { height } else { 0 };
            return Self { fill, height };
        }

        let scaled = u128::from(profit) * u128::from(height) / u128::from(config.max_profit);
        let fill = u32::try_from(scaled).unwrap_or(u32::MAX).min(height);
        Self { fill, height }
    }
}

/// Notifications a front end should act upon after the presenter consumed events.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Notice {
    /// Leadership moved; stop blinking `off` and start blinking `on`.
    LeaderBlink {
        /// Robot that stops blinking, if any.
        off: Option<RobotId>,
        /// Robot that starts blinking, if any.
        on: Option<RobotId>,
    },
    /// Profit differs from the last reported value.
    Profit {
        /// New profit value.
        profit: u64,
        /// Bar reflecting the new profit.
        bar: ProfitBar,
    },
}

/// Event-driven presenter that keeps display state in sync with the road.
#[derive(Debug)]
pub struct Presenter {
    config: PresenterConfig,
    blinking: Option<RobotId>,
    profit: u64,
    last_reported_profit: Option<u64>,
}

impl Presenter {
    /// Creates a presenter that has not observed any events yet.
    #[must_use]
    pub fn new(config: PresenterConfig) -> Self {
        Self {
            config,
            blinking: None,
            profit: 0,
            last_reported_profit: None,
        }
    }

    /// Robot that currently blinks as the leader.
    #[must_use]
    pub fn blinking(&self) -> Option<RobotId> {
        self.blinking
    }

    /// Latest profit observed.
    #[must_use]
    pub fn profit(&self) -> u64 {
        self.profit
    }

    /// Bar reflecting the latest profit observed.
    #[must_use]
    pub fn profit_bar(&self) -> ProfitBar {
        ProfitBar::for_profit(self.profit, &self.config)
    }

    /// Consumes road events and emits the notices a front end should act upon.
    pub fn handle(&mut self, events: &[Event], out: &mut Vec<Notice>) {
        for event in events {
            match *event {
                Event::LeaderChanged { previous, current } => {
                    if current != self.blinking {
                        out.push(Notice::LeaderBlink {
                            off: previous.or(self.blinking),
                            on: current,
                        });
                        self.blinking = current;
                    }
                }
                Event::ProfitChanged { profit } => {
                    self.profit = profit;
                    if self.last_reported_profit != Some(profit) {
                        let bar = self.profit_bar();
                        info!(profit, fill = bar.fill, "profit changed");
                        out.push(Notice::Profit { profit, bar });
                        self.last_reported_profit = Some(profit);
                    }
                }
                Event::RobotRemoved { robot, .. } if Some(robot) == self.blinking => {
                    self.blinking = None;
                }
                _ => {}
            }
        }
    }

    /// Composes a scene from the board shape and the current road views.
    pub fn compose(
        &self,
        board: BoardShape<'_>,
        stores: &StoreView,
        robots: &RobotView,
    ) -> Result<Scene, RenderingError> {
        let stores = stores
            .iter()
            .map(|store| SceneStore {
                id: store.id,
                kind: store.kind,
                position: store.position,
                cell: store.cell,
                funds: store.funds,
            })
            .collect();
        let robots = robots
            .iter()
            .map(|robot| SceneRobot {
                id: robot.id,
                kind: robot.kind,
                position: robot.position,
                cell: robot.cell,
                earnings: robot.earnings,
                blinking: Some(robot.id) == self.blinking,
            })
            .collect();
        Scene::new(board, stores, robots, self.profit, self.profit_bar())
    }
}

/// Board dimensions plus the row-major visibility flags of every cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BoardShape<'a> {
    /// Number of board rows.
    pub rows: u32,
    /// Number of board columns.
    pub columns: u32,
    /// Row-major flags marking the cells of the visible road.
    pub visible: &'a [bool],
}

/// Store drawn within the scene.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct SceneStore {
    /// Identifier allocated to the store by the road.
    pub id: StoreId,
    /// Behaviour attached to the store.
    pub kind: StoreKind,
    /// Position the store occupies.
    pub position: Position,
    /// Board cell that displays the store.
    pub cell: BoardCoord,
    /// Funds currently held.
    pub funds: u32,
}

/// Robot drawn within the scene.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct SceneRobot {
    /// Identifier allocated to the robot by the road.
    pub id: RobotId,
    /// Behaviour attached to the robot.
    pub kind: RobotKind,
    /// Position the robot occupies.
    pub position: Position,
    /// Board cell that displays the robot.
    pub cell: BoardCoord,
    /// Earnings accumulated since the last reset.
    pub earnings: u64,
    /// Whether the robot blinks as the current leader.
    pub blinking: bool,
}

/// What a single board cell shows.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CellGlyph {
    /// Cell outside the visible road.
    Hidden,
    /// Empty cell of the visible road.
    Road,
    /// Cell holding a store.
    Store,
    /// Cell holding a robot.
    Robot,
    /// Cell holding the blinking leader.
    Leader,
}

impl CellGlyph {
    /// Character used by text frames.
    #[must_use]
    pub const fn symbol(self) -> char {
        match self {
            Self::Hidden => '.',
            Self::Road => '#',
            Self::Store => 'S',
            Self::Robot => 'R',
            Self::Leader => '*',
        }
    }
}

/// Scene description combining the board, its inhabitants and the profit bar.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Scene {
    rows: u32,
    columns: u32,
    #[serde(skip)]
    visible: Vec<bool>,
    /// Stores drawn on the board.
    pub stores: Vec<SceneStore>,
    /// Robots drawn on the board.
    pub robots: Vec<SceneRobot>,
    /// Profit accumulated on the road.
    pub profit: u64,
    /// Bar reflecting the profit.
    pub profit_bar: ProfitBar,
}

impl Scene {
    /// Creates a new scene descriptor, validating that every entity sits on the board.
    pub fn new(
        board: BoardShape<'_>,
        stores: Vec<SceneStore>,
        robots: Vec<SceneRobot>,
        profit: u64,
        profit_bar: ProfitBar,
    ) -> Result<Self, RenderingError> {
        let expected = u64::from(board.rows) * u64::from(board.columns);
        if board.visible.len() as u64 != expected {
            return Err(RenderingError::MaskShape {
                expected,
                actual: board.visible.len(),
            });
        }

        let cells = stores
            .iter()
            .map(|store| store.cell)
            .chain(robots.iter().map(|robot| robot.cell));
        for cell in cells {
            if cell.row() >= board.rows || cell.column() >= board.columns {
                return Err(RenderingError::CellOutOfBounds {
                    cell,
                    rows: board.rows,
                    columns: board.columns,
                });
            }
        }

        Ok(Self {
            rows: board.rows,
            columns: board.columns,
            visible: board.visible.to_vec(),
            stores,
            robots,
            profit,
            profit_bar,
        })
    }

    /// Provides the dimensions of the board as `(rows, columns)`.
    #[must_use]
    pub const fn dimensions(&self) -> (u32, u32) {
        (self.rows, self.columns)
    }

    /// Robot drawn as the blinking leader, if any.
    #[must_use]
    pub fn leader(&self) -> Option<&SceneRobot> {
        self.robots.iter().find(|robot| robot.blinking)
    }

    /// Resolves what the cell shows; robots are drawn above stores.
    #[must_use]
    pub fn glyph_at(&self, cell: BoardCoord) -> CellGlyph {
        let mut robots = self.robots.iter().filter(|robot| robot.cell == cell);
        if let Some(first) = robots.next() {
            if first.blinking || robots.any(|robot| robot.blinking) {
                return CellGlyph::Leader;
            }
            return CellGlyph::Robot;
        }
        if self.stores.iter().any(|store| store.cell == cell) {
            return CellGlyph::Store;
        }
        if self.is_visible(cell) {
            CellGlyph::Road
        } else {
            CellGlyph::Hidden
        }
    }

    /// Renders the board as text, one line per row.
    #[must_use]
    pub fn board_lines(&self) -> Vec<String> {
        (0..self.rows)
            .map(|row| {
                (0..self.columns)
                    .map(|column| self.glyph_at(BoardCoord::new(row, column)).symbol())
                    .collect()
            })
            .collect()
    }

    fn is_visible(&self, cell: BoardCoord) -> bool {
        let index = u64::from(cell.row()) * u64::from(self.columns) + u64::from(cell.column());
        usize::try_from(index)
            .ok()
            .and_then(|index| self.visible.get(index).copied())
            .unwrap_or(false)
    }
}

/// Presentation descriptor consumed by rendering backends.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Presentation {
    /// Heading printed above the scene.
    pub title: String,
    /// Scene content that should be displayed.
    pub scene: Scene,
}

impl Presentation {
    /// Constructs a new presentation descriptor.
    #[must_use]
    pub fn new<T>(title: T, scene: Scene) -> Self
    where
        T: Into<String>,
    {
        Self {
            title: title.into(),
            scene,
        }
    }
}

/// Rendering backend capable of presenting Silk Road scenes.
pub trait RenderingBackend {
    /// Presents a single frame.
    fn present(&mut self, presentation: &Presentation) -> AnyResult<()>;
}

/// Errors that can occur when constructing rendering descriptors.
#[derive(Debug, PartialEq, Eq)]
pub enum RenderingError {
    /// The visibility flags do not cover the board exactly once.
    MaskShape {
        /// Number of cells on the board.
        expected: u64,
        /// Number of flags provided.
        actual: usize,
    },
    /// An entity sits on a cell outside the board.
    CellOutOfBounds {
        /// Offending cell.
        cell: BoardCoord,
        /// Number of board rows.
        rows: u32,
        /// Number of board columns.
        columns: u32,
    },
}

impl fmt::Display for RenderingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MaskShape { expected, actual } => write!(
                f,
                "visibility mask holds {actual} cells but the board has {expected}"
            ),
            Self::CellOutOfBounds {
                cell,
                rows,
                columns,
            } => write!(
                f,
                "cell ({}, {}) lies outside the {rows}x{columns} board",
                cell.row(),
                cell.column()
            ),
        }
    }
}

impl Error for RenderingError {}
