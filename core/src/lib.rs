#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Railway Tycoon engine.
//!
//! This crate defines the vocabulary that connects the input layer, the
//! authoritative world and the systems around it. Input adapters translate
//! device events into [`Command`] values, the world applies those commands to
//! an immutable snapshot, and renderers read the resulting snapshot through
//! the grid types declared here.

pub mod stats;
pub mod tuning;

use serde::{Deserialize, Serialize};

pub use stats::{
    AccumulatorStat, AccumulatorStats, BaseStat, BaseStats, MarketStat, MarketStats, MinerStat,
    MinerStats, PurchaseKind, PurchaseTable, TrainStat, TrainStats,
};
pub use tuning::{
    AttackConfig, AttackLevel, EconomyRates, EntityLevels, Level, LevelCurve, LevelTable,
    PurchaseCost, Tuning, TuningConfig,
};

/// Commands that express every input the simulation accepts.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Command {
    /// Advances the simulation by exactly one tick.
    Tick,
    /// The pointer was pressed over a grid cell.
    MouseDown {
        /// Cell under the pointer.
        cell: CellCoord,
    },
    /// The pointer moved; `None` when it is outside the playable grid.
    MouseMove {
        /// Cell now under the pointer.
        cell: Option<CellCoord>,
    },
    /// The pointer was released.
    MouseUp,
    /// The pointer left the playable area.
    MouseLeave,
    /// Selects the placement tool driving click interpretation.
    SetCreateMode {
        /// Tool to activate, or `None` to disarm.
        mode: Option<CreateMode>,
    },
    /// Opens an inspector panel.
    Open {
        /// Panel to show.
        panel: Panel,
    },
    /// Closes the inspector panel and the action menu.
    Close,
    /// Opens the action menu.
    OpenActionMenu,
    /// Closes the action menu.
    CloseActionMenu,
    /// Buys the next level of an entity stat.
    Upgrade {
        /// Entity and stat to upgrade.
        target: UpgradeTarget,
    },
    /// Converts player currency into the opposite currency held by a market.
    TradeMarket {
        /// Market receiving the trade.
        market: MarketId,
        /// Currency the player spends.
        currency: Currency,
        /// Amount the player offers to spend.
        amount: f64,
    },
    /// Pauses or resumes a train or a miner.
    SetPaused {
        /// Entity to pause or resume.
        target: PauseTarget,
        /// Desired paused flag.
        paused: bool,
    },
    /// Discards the world and generates a fresh one.
    Restart,
}

/// Placement or demolition tool currently armed by the player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CreateMode {
    /// Lays tracks on click and drag.
    Track,
    /// Removes tracks on click and drag.
    DestroyTrack,
    /// Attaches a train to the clicked track.
    Train,
    /// Attaches a miner to the clicked mine.
    Miner,
    /// Places an accumulator on the clicked cell.
    Accumulator,
}

/// Inspector panel descriptor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Panel {
    /// Inspects a train.
    Train(TrainId),
    /// Inspects a market.
    Market(MarketId),
    /// Inspects an accumulator.
    Accumulator(AccumulatorId),
    /// Inspects a miner.
    Miner(MinerId),
    /// Inspects a mine without a miner.
    Mine(MineId),
    /// Inspects the base.
    Base,
}

/// Global currencies held by the player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Currency {
    /// Gold reserve.
    Golds,
    /// Energy reserve.
    Energy,
}

impl Currency {
    /// The currency received in exchange for this one.
    #[must_use]
    pub const fn other(self) -> Self {
        match self {
            Self::Golds => Self::Energy,
            Self::Energy => Self::Golds,
        }
    }
}

/// Entity stat addressed by an upgrade.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UpgradeTarget {
    /// A train stat.
    Train {
        /// Train to upgrade.
        train: TrainId,
        /// Stat to raise.
        stat: TrainStat,
    },
    /// A miner stat.
    Miner {
        /// Miner to upgrade.
        miner: MinerId,
        /// Stat to raise.
        stat: MinerStat,
    },
    /// An accumulator stat.
    Accumulator {
        /// Accumulator to upgrade.
        accumulator: AccumulatorId,
        /// Stat to raise.
        stat: AccumulatorStat,
    },
    /// A market stat.
    Market {
        /// Market to upgrade.
        market: MarketId,
        /// Stat to raise.
        stat: MarketStat,
    },
    /// A base stat.
    Base {
        /// Stat to raise.
        stat: BaseStat,
    },
}

/// Entity that can be paused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PauseTarget {
    /// A train.
    Train(TrainId),
    /// A miner.
    Miner(MinerId),
}

/// Cardinal directions available to trains, in routing order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Movement toward increasing column indices.
    East,
    /// Movement toward increasing row indices.
    South,
    /// Movement toward decreasing column indices.
    West,
    /// Movement toward decreasing row indices.
    North,
}

impl Direction {
    /// Every direction in routing order.
    pub const ALL: [Direction; 4] = [Self::East, Self::South, Self::West, Self::North];

    /// Direction pointing the opposite way.
    #[must_use]
    pub const fn reverse(self) -> Self {
        match self {
            Self::East => Self::West,
            Self::South => Self::North,
            Self::West => Self::East,
            Self::North => Self::South,
        }
    }

    /// Reports whether the direction runs along the column axis.
    #[must_use]
    pub const fn is_horizontal(self) -> bool {
        matches!(self, Self::East | Self::West)
    }
}

/// Shape of a track cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TrackKind {
    /// Straight track joining east and west.
    Horizontal,
    /// Straight track joining north and south.
    Vertical,
    /// Crossing that accepts every direction.
    Junction,
}

impl TrackKind {
    /// Straight track kind aligned with `direction`.
    #[must_use]
    pub const fn along(direction: Direction) -> Self {
        if direction.is_horizontal() {
            Self::Horizontal
        } else {
            Self::Vertical
        }
    }

    /// Reports whether a train travelling in `direction` may enter this track.
    #[must_use]
    pub const fn accepts(self, direction: Direction) -> bool {
        match self {
            Self::Junction => true,
            Self::Horizontal => direction.is_horizontal(),
            Self::Vertical => !direction.is_horizontal(),
        }
    }

    /// Next kind in the click cycle horizontal, vertical, junction.
    #[must_use]
    pub const fn cycled(self) -> Self {
        match self {
            Self::Horizontal => Self::Vertical,
            Self::Vertical => Self::Junction,
            Self::Junction => Self::Horizontal,
        }
    }
}

macro_rules! index_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        ///
        /// The handle is a position in the owning collection and may dangle once
        /// that collection shrinks; consumers must check liveness before use.
        #[derive(
            Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        pub struct $name(u32);

        impl $name {
            /// Creates a new handle with the provided position.
            #[must_use]
            pub const fn new(value: u32) -> Self {
                Self(value)
            }

            /// Retrieves the numeric representation of the handle.
            #[must_use]
            pub const fn get(&self) -> u32 {
                self.0
            }

            /// Position of the referenced entity in its collection.
            #[must_use]
            pub const fn index(&self) -> usize {
                self.0 as usize
            }

            /// Handle for the entity stored at `index`.
            #[must_use]
            pub fn from_index(index: usize) -> Self {
                Self(u32::try_from(index).unwrap_or(u32::MAX))
            }
        }
    };
}

index_id!(
    /// Handle of a track.
    TrackId
);
index_id!(
    /// Handle of a train.
    TrainId
);
index_id!(
    /// Handle of a mine.
    MineId
);
index_id!(
    /// Handle of a miner.
    MinerId
);
index_id!(
    /// Handle of a market.
    MarketId
);
index_id!(
    /// Handle of an accumulator.
    AccumulatorId
);

/// Location of a single grid cell expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Adjacent cell in `direction`, or `None` past the zero edge.
    #[must_use]
    pub fn step(self, direction: Direction) -> Option<CellCoord> {
        let (column, row) = match direction {
            Direction::East => (self.column.checked_add(1)?, self.row),
            Direction::South => (self.column, self.row.checked_add(1)?),
            Direction::West => (self.column.checked_sub(1)?, self.row),
            Direction::North => (self.column, self.row.checked_sub(1)?),
        };
        Some(CellCoord::new(column, row))
    }

    /// Direction leading from `self` to an edge-adjacent `other`.
    #[must_use]
    pub fn direction_to(self, other: CellCoord) -> Option<Direction> {
        Direction::ALL
            .into_iter()
            .find(|direction| self.step(*direction) == Some(other))
    }
}

/// Axis-aligned rectangle expressed in cell coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellRect {
    origin: CellCoord,
    size: CellRectSize,
}

impl CellRect {
    /// Constructs a rectangle from an origin cell and size.
    #[must_use]
    pub const fn from_origin_and_size(origin: CellCoord, size: CellRectSize) -> Self {
        Self { origin, size }
    }

    /// Upper-left cell that anchors the rectangle.
    #[must_use]
    pub const fn origin(&self) -> CellCoord {
        self.origin
    }

    /// Dimensions of the rectangle measured in whole cells.
    #[must_use]
    pub const fn size(&self) -> CellRectSize {
        self.size
    }

    /// Reports whether `cell` lies inside the rectangle.
    #[must_use]
    pub fn contains(&self, cell: CellCoord) -> bool {
        self.contains_with_margin(cell, 0)
    }

    /// Reports whether `cell` lies inside the rectangle grown by `margin` cells
    /// on every side.
    #[must_use]
    pub fn contains_with_margin(&self, cell: CellCoord, margin: u32) -> bool {
        let (column, row) = (u64::from(cell.column()), u64::from(cell.row()));
        let margin = u64::from(margin);
        let left = u64::from(self.origin.column());
        let top = u64::from(self.origin.row());
        column + margin >= left
            && column < left + u64::from(self.size.width()) + margin
            && row + margin >= top
            && row < top + u64::from(self.size.height()) + margin
    }
}

/// Size of a [`CellRect`] measured in whole cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellRectSize {
    width: u32,
    height: u32,
}

impl CellRectSize {
    /// Creates a new size descriptor with explicit dimensions.
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Width of the rectangle in cells.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Height of the rectangle in cells.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }
}
