#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Railway Tycoon.
//!
//! A [`World`] is an immutable snapshot shared behind an [`Arc`]. Every
//! operation takes the current snapshot and returns the next one; rejected
//! operations hand back the very same `Arc`, so callers detect no-ops with
//! [`Arc::ptr_eq`]. Collections are shared between snapshots and cloned only
//! when an operation writes to them.

mod economy;
mod entities;
mod grid;
mod input;
mod placement;
pub mod query;
mod tick;

use std::{sync::Arc, time::Duration};

use rand::Rng;
use railway_tycoon_core::{AttackLevel, CellCoord, Command, CreateMode, Panel, Tuning};

pub use economy::{
    affordable, cost, cost_if_affordable, set_paused, trade_market, upgrade, upgrade_cost,
};
pub use entities::{Accumulator, Base, Market, Mine, Miner, Track, Train};
pub use input::{
    close, close_action_menu, mouse_down, mouse_leave, mouse_move, mouse_up, open,
    open_action_menu, set_create_mode,
};
pub use tick::tick;

/// Lifecycle of a game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GameStatus {
    /// The simulation advances on every tick.
    Running,
    /// Energy ran out; ticks are no-ops until a restart.
    GameOver,
}

/// Everything needed to assemble the first snapshot of a game.
#[derive(Clone, Debug)]
pub struct Blueprint {
    /// Number of grid columns.
    pub columns: u32,
    /// Number of grid rows.
    pub rows: u32,
    /// Shift applied to the attack damage curve.
    pub difficulty: u32,
    /// Row-major energy field, one byte per cell.
    pub energy_map: Vec<u8>,
    /// Wall-clock duration of one tick.
    pub tick_refresh_rate: Duration,
    /// Starting energy reserve.
    pub energy: f64,
    /// Starting gold reserve.
    pub golds: f64,
    /// Tables governing the economy for the lifetime of the game.
    pub tuning: Tuning,
    /// The player's base.
    pub base: Base,
    /// Initial tracks.
    pub tracks: Vec<Track>,
    /// Initial trains.
    pub trains: Vec<Train>,
    /// Initial accumulators.
    pub accumulators: Vec<Accumulator>,
    /// Gold deposits.
    pub mines: Vec<Mine>,
    /// Initial miners.
    pub miners: Vec<Miner>,
    /// Exchange points.
    pub markets: Vec<Market>,
}

impl Blueprint {
    /// Empty `columns` x `rows` map with a centred 2x2 base, default tuning
    /// and the standard starting reserves.
    #[must_use]
    pub fn new(columns: u32, rows: u32) -> Self {
        let cells = usize::try_from(u64::from(columns) * u64::from(rows)).unwrap_or(0);
        Self {
            columns,
            rows,
            difficulty: 0,
            energy_map: vec![0; cells],
            tick_refresh_rate: Duration::from_millis(500),
            energy: 1000.0,
            golds: 250.0,
            tuning: Tuning::default(),
            base: Base::centered(columns, rows, 2),
            tracks: Vec::new(),
            trains: Vec::new(),
            accumulators: Vec::new(),
            mines: Vec::new(),
            miners: Vec::new(),
            markets: Vec::new(),
        }
    }
}

/// Represents the authoritative Railway Tycoon world state.
#[derive(Clone, Debug, PartialEq)]
pub struct World {
    pub(crate) columns: u32,
    pub(crate) rows: u32,
    pub(crate) difficulty: u32,
    pub(crate) energy_map: Arc<[u8]>,
    pub(crate) tick_index: u64,
    pub(crate) tick_refresh_rate: Duration,
    pub(crate) energy: f64,
    pub(crate) golds: f64,
    pub(crate) attack: AttackLevel,
    pub(crate) status: GameStatus,
    pub(crate) create_mode: Option<CreateMode>,
    pub(crate) opened: Option<Panel>,
    pub(crate) action_menu_opened: bool,
    pub(crate) hover_cell: Option<CellCoord>,
    pub(crate) down_at: Option<CellCoord>,
    pub(crate) tuning: Arc<Tuning>,
    pub(crate) base: Base,
    pub(crate) tracks: Arc<Vec<Track>>,
    pub(crate) trains: Arc<Vec<Train>>,
    pub(crate) accumulators: Arc<Vec<Accumulator>>,
    pub(crate) mines: Arc<Vec<Mine>>,
    pub(crate) miners: Arc<Vec<Miner>>,
    pub(crate) markets: Arc<Vec<Market>>,
}

impl World {
    /// Assembles the first snapshot of a game at tick zero.
    ///
    /// The energy map is padded with zeros or truncated to exactly one byte
    /// per cell.
    #[must_use]
    pub fn from_blueprint(blueprint: Blueprint) -> Arc<World> {
        let Blueprint {
            columns,
            rows,
            difficulty,
            mut energy_map,
            tick_refresh_rate,
            energy,
            golds,
            tuning,
            base,
            tracks,
            trains,
            accumulators,
            mines,
            miners,
            markets,
        } = blueprint;

        let cells = usize::try_from(u64::from(columns) * u64::from(rows)).unwrap_or(0);
        energy_map.resize(cells, 0);
        let attack = tuning.attack.schedule(0, 0, difficulty);

        Arc::new(World {
            columns,
            rows,
            difficulty,
            energy_map: energy_map.into(),
            tick_index: 0,
            tick_refresh_rate,
            energy,
            golds,
            attack,
            status: GameStatus::Running,
            create_mode: None,
            opened: None,
            action_menu_opened: false,
            hover_cell: None,
            down_at: None,
            tuning: Arc::new(tuning),
            base,
            tracks: Arc::new(tracks),
            trains: Arc::new(trains),
            accumulators: Arc::new(accumulators),
            mines: Arc::new(mines),
            miners: Arc::new(miners),
            markets: Arc::new(markets),
        })
    }

    pub(crate) fn contains(&self, cell: CellCoord) -> bool {
        cell.column() < self.columns && cell.row() < self.rows
    }
}

/// Applies the provided command to the world, returning the next snapshot.
///
/// [`Command::Restart`] needs the generator and is left to the session that
/// owns the world; here it returns the snapshot unchanged.
pub fn apply<R>(world: &Arc<World>, command: Command, rng: &mut R) -> Arc<World>
where
    R: Rng + ?Sized,
{
    match command {
        Command::Tick => tick(world, rng),
        Command::MouseDown { cell } => mouse_down(world, cell),
        Command::MouseMove { cell } => mouse_move(world, cell),
        Command::MouseUp => mouse_up(world),
        Command::MouseLeave => mouse_leave(world),
        Command::SetCreateMode { mode } => set_create_mode(world, mode),
        Command::Open { panel } => open(world, panel),
        Command::Close => close(world),
        Command::OpenActionMenu => open_action_menu(world),
        Command::CloseActionMenu => close_action_menu(world),
        Command::Upgrade { target } => upgrade(world, target),
        Command::TradeMarket {
            market,
            currency,
            amount,
        } => trade_market(world, market, currency, amount),
        Command::SetPaused { target, paused } => set_paused(world, target, paused),
        Command::Restart => Arc::clone(world),
    }
}
