//! Plays a scenario day by day and reports the outcome.

use std::io::Write;

use anyhow::{Context, Result};
use serde::Serialize;
use silk_road_core::{RobotSnapshot, WELCOME_BANNER};
use silk_road_rendering::{
    BoardShape, Notice, Presentation, Presenter, RenderingBackend, Scene, TextBackend,
};
use silk_road_system_contest::Contest;
use silk_road_world::{query, Road};

use crate::scenario::Scenario;

/// How day reports are written.
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub(crate) enum OutputFormat {
    /// Human-readable frames.
    Text,
    /// A single JSON document listing every day.
    Json,
}

/// Day summary written in JSON mode.
#[derive(Debug, Serialize)]
struct DayOutcome {
    day: u32,
    profit: u64,
    leader: Option<RobotSnapshot>,
    #[serde(skip_serializing_if = "Option::is_none")]
    scene: Option<Scene>,
}

/// Whole-run summary written in JSON mode.
#[derive(Debug, Serialize)]
struct RunOutcome {
    days: Vec<DayOutcome>,
    profit: u64,
}

/// Plays every day of the scenario and writes the reports to `out`.
pub(crate) fn play<W: Write>(
    scenario: &Scenario,
    format: OutputFormat,
    show_board: bool,
    out: W,
) -> Result<()> {
    let mut road = Road::from_config(&scenario.road);
    let mut contest = Contest::new();
    let mut presenter = Presenter::new(scenario.presenter);
    let mut backend = TextBackend::new(out, show_board);
    let mut outcomes = Vec::with_capacity(scenario.days.len());
    let mut events = Vec::new();
    let mut notices = Vec::new();

    if format == OutputFormat::Text {
        writeln!(backend.writer_mut(), "{WELCOME_BANNER}")
            .context("failed to write banner")?;
    }

    for action in &scenario.days {
        events.clear();
        notices.clear();
        let report = contest.play_day(&mut road, *action, &mut events);
        presenter.handle(&events, &mut notices);
        let scene = compose_scene(&presenter, &road)
            .with_context(|| format!("failed to compose the scene of day {}", report.day))?;

        match format {
            OutputFormat::Text => {
                for notice in &notices {
                    if let Notice::LeaderBlink { on: Some(robot), .. } = notice {
                        writeln!(backend.writer_mut(), "leader is now robot {}", robot.get())
                            .context("failed to write leader notice")?;
                    }
                }
                backend.present(&Presentation::new(format!("day {}", report.day), scene))?;
            }
            OutputFormat::Json => outcomes.push(DayOutcome {
                day: report.day,
                profit: report.profit,
                leader: report.leader,
                scene: show_board.then_some(scene),
            }),
        }
    }

    let profit = query::profit(&road);
    match format {
        OutputFormat::Text => writeln!(backend.writer_mut(), "final profit {profit}")
            .context("failed to write final profit"),
        OutputFormat::Json => {
            let outcome = RunOutcome {
                days: outcomes,
                profit,
            };
            let mut writer = backend.into_inner();
            serde_json::to_writer_pretty(&mut writer, &outcome)
                .context("failed to serialize run outcome")?;
            writeln!(writer).context("failed to terminate json output")
        }
    }
}

fn compose_scene(presenter: &Presenter, road: &Road) -> Result<Scene> {
    let board = query::board_view(road);
    let (rows, columns) = board.dimensions();
    let scene = presenter.compose(
        BoardShape {
            rows,
            columns,
            visible: board.mask().cells(),
        },
        &query::store_view(road),
        &query::robot_view(road),
    )?;
    Ok(scene)
}
