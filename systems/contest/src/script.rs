//! Day actions and the numeric rows they are scripted with.

use serde::Deserialize;
use silk_road_core::{Command, Position, RobotKind, StoreKind};
use thiserror::Error;

/// Reasons a scripted day cannot be turned into an action.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum ContestError {
    /// The leading code names no known action.
    #[error("unknown day action code {code}")]
    UnknownAction {
        /// Code found in the script.
        code: i64,
    },
    /// The row does not carry an action code and a position, plus optional funds.
    #[error("a day needs an action code, a position and optional funds, got {fields} values")]
    MalformedDay {
        /// Number of values found in the row.
        fields: usize,
    },
    /// A position or amount does not fit the road.
    #[error("value {value} is not a valid position or amount")]
    OutOfRange {
        /// Offending value.
        value: i64,
    },
}

/// Placement performed at the start of a contest day.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "Vec<i64>")]
pub enum DayAction {
    /// Places a normal robot. Scripted as code `1`.
    PlaceRobot {
        /// Position the robot starts from.
        position: Position,
    },
    /// Opens a normal store. Scripted as code `2`.
    PlaceStore {
        /// Position the store opens at.
        position: Position,
        /// Funds the store opens with.
        funds: u32,
    },
    /// Places a tender robot. Scripted as code `3`.
    PlaceTender {
        /// Position the robot starts from.
        position: Position,
    },
    /// Places a robot that never moves backwards. Scripted as code `4`.
    PlaceNeverBack {
        /// Position the robot starts from.
        position: Position,
    },
}

impl DayAction {
    /// Decodes a scripted row `[code, position]` or `[code, position, funds]`.
    ///
    /// Funds default to zero when omitted and are ignored by robot placements.
    pub fn from_row(row: &[i64]) -> Result<Self, ContestError> {
        let (code, position, funds) = match *row {
            [code, position] => (code, position, 0),
            [code, position, funds] => (code, position, funds),
            _ => return Err(ContestError::MalformedDay { fields: row.len() }),
        };
        let position = Position::new(to_u32(position)?);

        match code {
            1 => Ok(Self::PlaceRobot { position }),
            2 => Ok(Self::PlaceStore {
                position,
                funds: to_u32(funds)?,
            }),
            3 => Ok(Self::PlaceTender { position }),
            4 => Ok(Self::PlaceNeverBack { position }),
            code => Err(ContestError::UnknownAction { code }),
        }
    }

    /// Numeric code the action is scripted with.
    #[must_use]
    pub const fn code(&self) -> u8 {
        match self {
            Self::PlaceRobot { .. } => 1,
            Self::PlaceStore { .. } => 2,
            Self::PlaceTender { .. } => 3,
            Self::PlaceNeverBack { .. } => 4,
        }
    }

    /// Road command that performs the placement.
    #[must_use]
    pub const fn command(&self) -> Command {
        match *self {
            Self::PlaceRobot { position } => Command::PlaceRobot {
                position,
                kind: RobotKind::Normal,
            },
            Self::PlaceStore { position, funds } => Command::PlaceStore {
                position,
                kind: StoreKind::Normal,
                funds,
            },
            Self::PlaceTender { position } => Command::PlaceRobot {
                position,
                kind: RobotKind::Tender,
            },
            Self::PlaceNeverBack { position } => Command::PlaceRobot {
                position,
                kind: RobotKind::NeverBack,
            },
        }
    }
}

impl TryFrom<Vec<i64>> for DayAction {
    type Error = ContestError;

    fn try_from(row: Vec<i64>) -> Result<Self, Self::Error> {
        Self::from_row(&row)
    }
}

fn to_u32(value: i64) -> Result<u32, ContestError> {
    u32::try_from(value).map_err(|_| ContestError::OutOfRange { value })
}
