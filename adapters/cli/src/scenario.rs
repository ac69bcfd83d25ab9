//! Scenario files describing a contest run.

use std::{fs, path::Path};

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use silk_road_rendering::PresenterConfig;
use silk_road_system_contest::{random_days, DayAction, GeneratorConfig};
use silk_road_world::RoadConfig;

/// Road settings, presenter settings and the scripted days of a contest.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct Scenario {
    #[serde(default)]
    pub(crate) road: RoadConfig,
    #[serde(default)]
    pub(crate) presenter: PresenterConfig,
    pub(crate) days: Vec<DayAction>,
}

impl Scenario {
    /// Reads and validates the scenario stored at `path`.
    pub(crate) fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read scenario file {}", path.display()))?;
        Self::parse(&contents)
            .with_context(|| format!("invalid scenario file {}", path.display()))
    }

    pub(crate) fn parse(contents: &str) -> Result<Self> {
        let scenario: Self =
            toml::from_str(contents).context("failed to parse scenario toml contents")?;
        if scenario.days.is_empty() {
            bail!("scenario lists no days to play");
        }
        Ok(scenario)
    }

    /// Builds a scenario from seeded random days on a default road.
    pub(crate) fn generated(seed: u64, generator: &GeneratorConfig) -> Self {
        Self {
            road: RoadConfig::default(),
            presenter: PresenterConfig::default(),
            days: random_days(seed, generator),
        }
    }
}
