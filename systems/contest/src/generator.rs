//! Seeded generator of random contest scripts.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Deserialize;
use silk_road_core::Position;

use crate::DayAction;

/// Bounds used when generating a random contest script.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Number of days to generate.
    pub days: usize,
    /// Largest position an entity may be placed at.
    pub max_position: u32,
    /// Largest amount a generated store opens with.
    pub max_funds: u32,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            days: 10,
            max_position: 40,
            max_funds: 100,
        }
    }
}

/// Produces a reproducible list of day actions for the provided seed.
#[must_use]
pub fn random_days(seed: u64, config: &GeneratorConfig) -> Vec<DayAction> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..config.days)
        .map(|_| {
            let position = Position::new(rng.gen_range(0..=config.max_position));
            match rng.gen_range(1u8..=4) {
                1 => DayAction::PlaceRobot { position },
                2 => DayAction::PlaceStore {
                    position,
                    funds: rng.gen_range(1..=config.max_funds.max(1)),
                },
                3 => DayAction::PlaceTender { position },
                _ => DayAction::PlaceNeverBack { position },
            }
        })
        .collect()
}
