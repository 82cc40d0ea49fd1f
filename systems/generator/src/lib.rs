#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Procedural world generation for Railway Tycoon.
//!
//! The generator samples a coherent noise field over the grid. The field
//! doubles as the static energy map read by accumulators, and its extremes
//! decide where markets and mines appear. Cells near the base stay clear so
//! the player always has room to start.

use std::{sync::Arc, time::Duration};

use fastnoise_lite::{FastNoiseLite, NoiseType};
use rand::Rng;
use railway_tycoon_core::{CellCoord, Tuning, TuningConfig};
use railway_tycoon_world::{Base, Blueprint, Market, Mine, World};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Knobs steering the layout and the starting reserves of a generated world.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Frequency of the noise field sampled at integer cell coordinates.
    pub noise_frequency: f32,
    /// Noise values below this place a market.
    pub market_threshold: f32,
    /// Noise values above this place a mine.
    pub mine_threshold: f32,
    /// Gold reserve of every generated mine.
    pub mine_reserve: f64,
    /// Cells kept free of mines and markets around the base.
    pub safe_margin: u32,
    /// Side length of the square base.
    pub base_size: u32,
    /// Starting energy reserve.
    pub initial_energy: f64,
    /// Starting gold reserve.
    pub initial_golds: f64,
    /// Wall-clock milliseconds per tick.
    pub tick_refresh_rate_ms: u64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            noise_frequency: 1.0,
            market_threshold: -0.8,
            mine_threshold: 0.5,
            mine_reserve: 10_000.0,
            safe_margin: 2,
            base_size: 2,
            initial_energy: 1000.0,
            initial_golds: 250.0,
            tick_refresh_rate_ms: 500,
        }
    }
}

/// Builds fresh worlds from a layout configuration and the economy tables.
#[derive(Clone, Debug)]
pub struct Generator {
    config: GeneratorConfig,
    tuning: Tuning,
}

impl Generator {
    /// Creates a generator, expanding the tuning curves once up front.
    #[must_use]
    pub fn new(config: GeneratorConfig, tuning: &TuningConfig) -> Self {
        Self {
            config,
            tuning: tuning.build(),
        }
    }

    /// Layout configuration in use.
    #[must_use]
    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Tables handed to every generated world.
    #[must_use]
    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    /// Generates a `columns` x `rows` world at tick zero.
    ///
    /// The noise seed is drawn from `rng`, so a seeded source reproduces the
    /// same layout.
    pub fn generate<R>(&self, columns: u32, rows: u32, difficulty: u32, rng: &mut R) -> Arc<World>
    where
        R: Rng + ?Sized,
    {
        let seed: i32 = rng.gen();
        let mut noise = FastNoiseLite::with_seed(seed);
        noise.set_noise_type(Some(NoiseType::OpenSimplex2));
        noise.set_frequency(Some(self.config.noise_frequency));

        let mut blueprint = Blueprint::new(columns, rows);
        blueprint.difficulty = difficulty;
        blueprint.tick_refresh_rate = Duration::from_millis(self.config.tick_refresh_rate_ms);
        blueprint.energy = self.config.initial_energy;
        blueprint.golds = self.config.initial_golds;
        blueprint.tuning = self.tuning.clone();
        blueprint.base = Base::centered(columns, rows, self.config.base_size);

        let safe_area = blueprint.base.area;
        blueprint.energy_map = Vec::with_capacity(blueprint.energy_map.len());
        for row in 0..rows {
            for column in 0..columns {
                let sample = noise.get_noise_2d(column as f32, row as f32);
                blueprint.energy_map.push(energy_from_noise(sample));

                let cell = CellCoord::new(column, row);
                if safe_area.contains_with_margin(cell, self.config.safe_margin) {
                    continue;
                }
                if sample < self.config.market_threshold {
                    blueprint.markets.push(Market::new(cell));
                } else if sample > self.config.mine_threshold {
                    blueprint
                        .mines
                        .push(Mine::new(cell, self.config.mine_reserve));
                }
            }
        }

        debug!(
            seed,
            columns,
            rows,
            difficulty,
            mines = blueprint.mines.len(),
            markets = blueprint.markets.len(),
            "world generated"
        );
        World::from_blueprint(blueprint)
    }
}

impl Default for Generator {
    fn default() -> Self {
        Self::new(GeneratorConfig::default(), &TuningConfig::default())
    }
}

/// Maps a noise sample in `[-1, 1]` to an energy byte, squaring to favour
/// peaks.
#[must_use]
pub fn energy_from_noise(sample: f32) -> u8 {
    let normalized = f64::from(((1.0 + sample) / 2.0).clamp(0.0, 1.0));
    let scaled = (256.0 * normalized * normalized).floor();
    scaled.min(255.0) as u8
}
