#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Day-by-day contest driver for the Silk Road.
//!
//! Every contest day performs one scripted placement and then lets the road
//! send its most profitable robot to a store. The driver records the running
//! profit and the richest robot at the end of each day.

mod generator;
mod script;

pub use generator::{random_days, GeneratorConfig};
pub use script::{ContestError, DayAction};

use serde::Serialize;
use silk_road_core::{Command, Event, RoadError, RobotSnapshot};
use silk_road_world::{self as world, query, Road, RoadConfig};
use tracing::{debug, info, warn};

/// Summary recorded at the end of a contest day.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct DayReport {
    /// One-based day number.
    pub day: u32,
    /// Profit accumulated on the road so far.
    pub profit: u64,
    /// Richest robot at the end of the day, if any robot was placed.
    pub leader: Option<RobotSnapshot>,
}

/// Pure system that turns a day action into the commands the road executes.
#[derive(Debug, Default)]
pub struct Contest {
    days_played: u32,
}

impl Contest {
    /// Creates a contest that has not played any day yet.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of days played so far.
    #[must_use]
    pub fn days_played(&self) -> u32 {
        self.days_played
    }

    /// Emits the commands that make up a single contest day.
    pub fn handle(&self, action: DayAction, out: &mut Vec<Command>) {
        out.push(action.command());
        out.push(Command::AutoMoveRobot);
    }

    /// Plays one day on the road, appending every broadcast event to `out_events`.
    pub fn play_day(
        &mut self,
        road: &mut Road,
        action: DayAction,
        out_events: &mut Vec<Event>,
    ) -> DayReport {
        self.days_played = self.days_played.saturating_add(1);
        let day = self.days_played;

        let mut commands = Vec::new();
        self.handle(action, &mut commands);
        for command in commands {
            match world::apply(road, command, out_events) {
                Ok(()) => {}
                Err(RoadError::NoProfitableMove) => {
                    debug!(day, "no robot could reach a store at a profit");
                }
                Err(reason) => warn!(day, %reason, "contest command rejected"),
            }
        }

        let report = DayReport {
            day,
            profit: query::profit(road),
            leader: query::richest_robot(road),
        };
        info!(
            day,
            action = action.code(),
            profit = report.profit,
            leader = report.leader.map(|robot| robot.id.get()),
            "day finished"
        );
        report
    }
}

/// Plays every day on a fresh road and returns one report per day.
#[must_use]
pub fn run(config: &RoadConfig, days: &[DayAction]) -> Vec<DayReport> {
    let mut road = Road::from_config(config);
    let mut contest = Contest::new();
    let mut events = Vec::new();
    days.iter()
        .map(|action| {
            events.clear();
            contest.play_day(&mut road, *action, &mut events)
        })
        .collect()
}

/// Profit accumulated after each day on a default road.
#[must_use]
pub fn daily_profits(days: &[DayAction]) -> Vec<u64> {
    run(&RoadConfig::default(), days)
        .into_iter()
        .map(|report| report.profit)
        .collect()
}
