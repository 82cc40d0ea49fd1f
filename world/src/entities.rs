//! Entities stored inside the world snapshot.

use railway_tycoon_core::{
    AccumulatorStats, BaseStats, CellCoord, CellRect, CellRectSize, Direction, MarketStats,
    MineId, MinerStats, TrackId, TrackKind, TrainStats, Tuning,
};

/// A single track cell.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Track {
    /// Cell occupied by the track.
    pub cell: CellCoord,
    /// Shape of the track.
    pub kind: TrackKind,
}

impl Track {
    /// Creates a track of `kind` at `cell`.
    #[must_use]
    pub const fn new(cell: CellCoord, kind: TrackKind) -> Self {
        Self { cell, kind }
    }
}

/// A train riding the track network.
#[derive(Clone, Debug, PartialEq)]
pub struct Train {
    /// Track currently occupied. May dangle after track removal.
    pub track: TrackId,
    /// Direction of travel.
    pub direction: Direction,
    /// Golds carried.
    pub golds: f64,
    /// Energy carried.
    pub energy: f64,
    /// Level index per stat.
    pub levels: TrainStats<usize>,
    /// Paused trains are skipped by the tick.
    pub paused: bool,
}

impl Train {
    /// Creates an empty level zero train.
    #[must_use]
    pub fn new(track: TrackId, direction: Direction) -> Self {
        Self {
            track,
            direction,
            golds: 0.0,
            energy: 0.0,
            levels: TrainStats::default(),
            paused: false,
        }
    }

    /// Stat values for the train's current levels.
    #[must_use]
    pub fn stats(&self, tuning: &Tuning) -> TrainStats<f64> {
        self.levels.values_in(&tuning.levels.train)
    }
}

/// A finite gold deposit.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Mine {
    /// Cell occupied by the mine.
    pub cell: CellCoord,
    /// Remaining reserve. Over-extraction can drive it below zero.
    pub golds: f64,
}

impl Mine {
    /// Creates a mine holding `golds`.
    #[must_use]
    pub const fn new(cell: CellCoord, golds: f64) -> Self {
        Self { cell, golds }
    }
}

/// Extractor attached to a mine.
#[derive(Clone, Debug, PartialEq)]
pub struct Miner {
    /// Mine being worked. May dangle.
    pub mine: MineId,
    /// Golds extracted and waiting for pickup.
    pub golds: f64,
    /// Level index per stat.
    pub levels: MinerStats<usize>,
    /// Paused miners are skipped by the tick.
    pub paused: bool,
}

impl Miner {
    /// Creates an empty level zero miner.
    #[must_use]
    pub fn new(mine: MineId) -> Self {
        Self {
            mine,
            golds: 0.0,
            levels: MinerStats::default(),
            paused: false,
        }
    }

    /// Stat values for the miner's current levels.
    #[must_use]
    pub fn stats(&self, tuning: &Tuning) -> MinerStats<f64> {
        self.levels.values_in(&tuning.levels.miner)
    }
}

/// Battery charging from the energy field under it.
#[derive(Clone, Debug, PartialEq)]
pub struct Accumulator {
    /// Cell occupied by the accumulator.
    pub cell: CellCoord,
    /// Stored energy.
    pub energy: f64,
    /// Level index per stat.
    pub levels: AccumulatorStats<usize>,
}

impl Accumulator {
    /// Creates an empty level zero accumulator.
    #[must_use]
    pub fn new(cell: CellCoord) -> Self {
        Self {
            cell,
            energy: 0.0,
            levels: AccumulatorStats::default(),
        }
    }

    /// Stat values for the accumulator's current levels.
    #[must_use]
    pub fn stats(&self, tuning: &Tuning) -> AccumulatorStats<f64> {
        self.levels.values_in(&tuning.levels.accumulator)
    }
}

/// Exchange point that stocks currency for passing trains.
#[derive(Clone, Debug, PartialEq)]
pub struct Market {
    /// Cell occupied by the market.
    pub cell: CellCoord,
    /// Golds in stock.
    pub golds: f64,
    /// Energy in stock.
    pub energy: f64,
    /// Level index per stat.
    pub levels: MarketStats<usize>,
}

impl Market {
    /// Creates an empty level zero market.
    #[must_use]
    pub fn new(cell: CellCoord) -> Self {
        Self {
            cell,
            golds: 0.0,
            energy: 0.0,
            levels: MarketStats::default(),
        }
    }

    /// Stat values for the market's current levels.
    #[must_use]
    pub fn stats(&self, tuning: &Tuning) -> MarketStats<f64> {
        self.levels.values_in(&tuning.levels.market)
    }
}

/// The player's base. Track cells inside it are collection points.
#[derive(Clone, Debug, PartialEq)]
pub struct Base {
    /// Cells covered by the base.
    pub area: CellRect,
    /// Level index per stat.
    pub levels: BaseStats<usize>,
}

impl Base {
    /// Creates a level zero base covering `area`.
    #[must_use]
    pub fn new(area: CellRect) -> Self {
        Self {
            area,
            levels: BaseStats::default(),
        }
    }

    /// Square base of `size` cells anchored at the grid centre.
    #[must_use]
    pub fn centered(columns: u32, rows: u32, size: u32) -> Self {
        let origin = CellCoord::new(columns.saturating_sub(1) / 2, rows.saturating_sub(1) / 2);
        Self::new(CellRect::from_origin_and_size(
            origin,
            CellRectSize::new(size, size),
        ))
    }

    /// Stat values for the base's current levels.
    #[must_use]
    pub fn stats(&self, tuning: &Tuning) -> BaseStats<f64> {
        self.levels.values_in(&tuning.levels.base)
    }
}
