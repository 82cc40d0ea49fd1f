//! Read-only accessors over a [`World`] snapshot.

use std::time::Duration;

use railway_tycoon_core::{
    AccumulatorId, AttackLevel, CellCoord, CreateMode, Direction, MarketId, MineId, MinerId,
    Panel, TrackId, TrackKind, TrainId, Tuning,
};

use crate::{
    grid::{cell_index, CellGrid},
    Accumulator, Base, GameStatus, Market, Mine, Miner, Track, Train, World,
};

/// Grid dimensions as `(columns, rows)`.
#[must_use]
pub fn dimensions(world: &World) -> (u32, u32) {
    (world.columns, world.rows)
}

/// Difficulty the world was generated with.
#[must_use]
pub fn difficulty(world: &World) -> u32 {
    world.difficulty
}

/// Row-major energy field, one byte per cell.
#[must_use]
pub fn energy_map(world: &World) -> &[u8] {
    &world.energy_map
}

/// Energy field strength at `cell`, zero outside the grid.
#[must_use]
pub fn energy_at(world: &World, cell: CellCoord) -> u8 {
    cell_index(world.columns, world.rows, cell)
        .and_then(|index| world.energy_map.get(index).copied())
        .unwrap_or(0)
}

/// Number of ticks simulated so far.
#[must_use]
pub fn tick_index(world: &World) -> u64 {
    world.tick_index
}

/// Wall-clock duration of one tick.
#[must_use]
pub fn tick_refresh_rate(world: &World) -> Duration {
    world.tick_refresh_rate
}

/// Global energy reserve.
#[must_use]
pub fn energy(world: &World) -> f64 {
    world.energy
}

/// Global gold reserve.
#[must_use]
pub fn golds(world: &World) -> f64 {
    world.golds
}

/// The next scheduled attack.
#[must_use]
pub fn attack(world: &World) -> AttackLevel {
    world.attack
}

/// Whether the game is still running.
#[must_use]
pub fn status(world: &World) -> GameStatus {
    world.status
}

/// Tool currently armed by the player.
#[must_use]
pub fn create_mode(world: &World) -> Option<CreateMode> {
    world.create_mode
}

/// Inspector panel currently shown.
#[must_use]
pub fn opened(world: &World) -> Option<Panel> {
    world.opened
}

/// Reports whether the action menu is shown.
#[must_use]
pub fn action_menu_opened(world: &World) -> bool {
    world.action_menu_opened
}

/// Cell under the pointer.
#[must_use]
pub fn hover_cell(world: &World) -> Option<CellCoord> {
    world.hover_cell
}

/// Cell where the current gesture started.
#[must_use]
pub fn down_at(world: &World) -> Option<CellCoord> {
    world.down_at
}

/// Tables governing the economy.
#[must_use]
pub fn tuning(world: &World) -> &Tuning {
    &world.tuning
}

/// The player's base.
#[must_use]
pub fn base(world: &World) -> &Base {
    &world.base
}

/// Every track, indexed by [`TrackId`].
#[must_use]
pub fn tracks(world: &World) -> &[Track] {
    &world.tracks
}

/// Every train, indexed by [`TrainId`].
#[must_use]
pub fn trains(world: &World) -> &[Train] {
    &world.trains
}

/// Every accumulator, indexed by [`AccumulatorId`].
#[must_use]
pub fn accumulators(world: &World) -> &[Accumulator] {
    &world.accumulators
}

/// Every mine, indexed by [`MineId`].
#[must_use]
pub fn mines(world: &World) -> &[Mine] {
    &world.mines
}

/// Every miner, indexed by [`MinerId`].
#[must_use]
pub fn miners(world: &World) -> &[Miner] {
    &world.miners
}

/// Every market, indexed by [`MarketId`].
#[must_use]
pub fn markets(world: &World) -> &[Market] {
    &world.markets
}

/// Track laid on `cell`.
#[must_use]
pub fn track_at(world: &World, cell: CellCoord) -> Option<TrackId> {
    world
        .tracks
        .iter()
        .position(|track| track.cell == cell)
        .map(TrackId::from_index)
}

/// Mine on `cell`.
#[must_use]
pub fn mine_at(world: &World, cell: CellCoord) -> Option<MineId> {
    world
        .mines
        .iter()
        .position(|mine| mine.cell == cell)
        .map(MineId::from_index)
}

/// Market on `cell`.
#[must_use]
pub fn market_at(world: &World, cell: CellCoord) -> Option<MarketId> {
    world
        .markets
        .iter()
        .position(|market| market.cell == cell)
        .map(MarketId::from_index)
}

/// Accumulator on `cell`.
#[must_use]
pub fn accumulator_at(world: &World, cell: CellCoord) -> Option<AccumulatorId> {
    world
        .accumulators
        .iter()
        .position(|accumulator| accumulator.cell == cell)
        .map(AccumulatorId::from_index)
}

/// Miner working `mine`.
#[must_use]
pub fn miner_of(world: &World, mine: MineId) -> Option<MinerId> {
    world
        .miners
        .iter()
        .position(|miner| miner.mine == mine)
        .map(MinerId::from_index)
}

/// Train currently standing on `track`.
#[must_use]
pub fn train_on(world: &World, track: TrackId) -> Option<TrainId> {
    if track.index() >= world.tracks.len() {
        return None;
    }
    world
        .trains
        .iter()
        .position(|train| train.track == track)
        .map(TrainId::from_index)
}

/// Trains whose track no longer exists.
#[must_use]
pub fn zombie_trains(world: &World) -> Vec<TrainId> {
    world
        .trains
        .iter()
        .enumerate()
        .filter(|(_, train)| train.track.index() >= world.tracks.len())
        .map(|(index, _)| TrainId::from_index(index))
        .collect()
}

/// Track drawn in a cell, with the neighbours it links to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TrackSnapshot {
    /// Handle of the track.
    pub id: TrackId,
    /// Shape of the track.
    pub kind: TrackKind,
    /// Linked neighbours, ordered like [`Direction::ALL`].
    pub connections: [bool; 4],
}

impl TrackSnapshot {
    /// Reports whether the track links to its neighbour in `direction`.
    #[must_use]
    pub fn connects(&self, direction: Direction) -> bool {
        Direction::ALL
            .iter()
            .position(|candidate| *candidate == direction)
            .and_then(|index| self.connections.get(index).copied())
            .unwrap_or(false)
    }
}

/// Non-track object occupying a cell.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum CellObject {
    /// An unworked gold deposit.
    Mine {
        /// Handle of the mine.
        mine: MineId,
        /// Gold left in the deposit.
        golds: f64,
    },
    /// A gold deposit with a miner attached.
    Miner {
        /// Handle of the miner.
        miner: MinerId,
        /// Gold held by the miner.
        golds: f64,
        /// Whether the miner is paused.
        paused: bool,
    },
    /// An exchange point.
    Market {
        /// Handle of the market.
        market: MarketId,
    },
    /// An energy accumulator.
    Accumulator {
        /// Handle of the accumulator.
        accumulator: AccumulatorId,
        /// Stored energy.
        energy: f64,
        /// Storage limit at the current level.
        capacity: f64,
    },
}

/// Everything a renderer needs to draw one cell.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CellSnapshot {
    /// Location of the cell.
    pub cell: CellCoord,
    /// Energy field strength.
    pub energy: u8,
    /// Track laid on the cell.
    pub track: Option<TrackSnapshot>,
    /// Object sitting on the cell.
    pub object: Option<CellObject>,
    /// Heading of the train on the cell.
    pub train: Option<Direction>,
    /// Whether the cell belongs to the base.
    pub in_base: bool,
    /// Whether the pointer is over the cell.
    pub hovered: bool,
}

/// Row-major render facts for every cell of the grid.
#[must_use]
pub fn cells(world: &World) -> Vec<CellSnapshot> {
    let tracks = CellGrid::from_entries(
        world.columns,
        world.rows,
        world
            .tracks
            .iter()
            .enumerate()
            .map(|(index, track)| (track.cell, (TrackId::from_index(index), track.kind))),
    );
    let objects = CellGrid::from_entries(world.columns, world.rows, object_entries(world));
    let trains = CellGrid::from_entries(
        world.columns,
        world.rows,
        world.trains.iter().filter_map(|train| {
            world
                .tracks
                .get(train.track.index())
                .map(|track| (track.cell, train.direction))
        }),
    );

    let mut snapshots = Vec::with_capacity(world.energy_map.len());
    for row in 0..world.rows {
        for column in 0..world.columns {
            let cell = CellCoord::new(column, row);
            let track = tracks.get(cell).map(|(id, kind)| TrackSnapshot {
                id,
                kind,
                connections: Direction::ALL.map(|direction| {
                    kind.accepts(direction)
                        && cell
                            .step(direction)
                            .and_then(|neighbour| tracks.get(neighbour))
                            .is_some_and(|(_, neighbour)| neighbour.accepts(direction))
                }),
            });
            snapshots.push(CellSnapshot {
                cell,
                energy: energy_at(world, cell),
                track,
                object: objects.get(cell),
                train: trains.get(cell),
                in_base: world.base.area.contains(cell),
                hovered: world.hover_cell == Some(cell),
            });
        }
    }
    snapshots
}

fn object_entries(world: &World) -> impl Iterator<Item = (CellCoord, CellObject)> + '_ {
    let miners = world.miners.iter().enumerate().filter_map(|(index, miner)| {
        world.mines.get(miner.mine.index()).map(|mine| {
            (
                mine.cell,
                CellObject::Miner {
                    miner: MinerId::from_index(index),
                    golds: miner.golds,
                    paused: miner.paused,
                },
            )
        })
    });
    let mines = world.mines.iter().enumerate().map(|(index, mine)| {
        (
            mine.cell,
            CellObject::Mine {
                mine: MineId::from_index(index),
                golds: mine.golds,
            },
        )
    });
    let markets = world.markets.iter().enumerate().map(|(index, market)| {
        (
            market.cell,
            CellObject::Market {
                market: MarketId::from_index(index),
            },
        )
    });
    let accumulators = world
        .accumulators
        .iter()
        .enumerate()
        .map(|(index, accumulator)| {
            (
                accumulator.cell,
                CellObject::Accumulator {
                    accumulator: AccumulatorId::from_index(index),
                    energy: accumulator.energy,
                    capacity: accumulator.stats(&world.tuning).capacity,
                },
            )
        });
    miners.chain(mines).chain(markets).chain(accumulators)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Blueprint;

    fn world() -> std::sync::Arc<World> {
        let mut blueprint = Blueprint::new(6, 6);
        blueprint.energy_map = (0..36).map(|value| value as u8).collect();
        blueprint.tracks = vec![
            Track::new(CellCoord::new(0, 0), TrackKind::Horizontal),
            Track::new(CellCoord::new(1, 0), TrackKind::Junction),
            Track::new(CellCoord::new(1, 1), TrackKind::Horizontal),
        ];
        blueprint.trains.push(Train::new(TrackId::new(1), Direction::South));
        blueprint.trains.push(Train::new(TrackId::new(7), Direction::East));
        blueprint.mines.push(Mine::new(CellCoord::new(4, 0), 500.0));
        blueprint.mines.push(Mine::new(CellCoord::new(5, 0), 900.0));
        blueprint.miners.push(Miner::new(MineId::new(1)));
        blueprint.markets.push(Market::new(CellCoord::new(0, 5)));
        World::from_blueprint(blueprint)
    }

    #[test]
    fn lookups_resolve_by_cell() {
        let world = world();
        assert_eq!(track_at(&world, CellCoord::new(1, 1)), Some(TrackId::new(2)));
        assert_eq!(track_at(&world, CellCoord::new(3, 3)), None);
        assert_eq!(mine_at(&world, CellCoord::new(5, 0)), Some(MineId::new(1)));
        assert_eq!(miner_of(&world, MineId::new(1)), Some(MinerId::new(0)));
        assert_eq!(miner_of(&world, MineId::new(0)), None);
        assert_eq!(market_at(&world, CellCoord::new(0, 5)), Some(MarketId::new(0)));
        assert_eq!(train_on(&world, TrackId::new(1)), Some(TrainId::new(0)));
        assert_eq!(train_on(&world, TrackId::new(7)), None);
        assert_eq!(zombie_trains(&world), vec![TrainId::new(1)]);
        assert_eq!(energy_at(&world, CellCoord::new(2, 3)), 20);
    }

    #[test]
    fn cells_report_connectivity_and_objects() {
        let world = world();
        let cells = cells(&world);
        assert_eq!(cells.len(), 36);

        let straight = cells[0].track.expect("track at origin");
        assert!(straight.connects(Direction::East));
        assert!(!straight.connects(Direction::South));

        let junction = cells[1].track.expect("junction");
        assert!(junction.connects(Direction::West));
        assert!(!junction.connects(Direction::South));
        assert_eq!(cells[1].train, Some(Direction::South));

        assert!(matches!(cells[4].object, Some(CellObject::Mine { golds, .. }) if golds == 500.0));
        assert!(matches!(cells[5].object, Some(CellObject::Miner { .. })));
        assert!(matches!(cells[30].object, Some(CellObject::Market { .. })));
        assert_eq!(cells[9].energy, 9);
        assert!(cells[14].in_base);
        assert!(!cells[0].in_base);
    }
}
