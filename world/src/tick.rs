//! One step of the simulation.

use std::sync::Arc;

use rand::{seq::SliceRandom, Rng};
use railway_tycoon_core::{CellCoord, Direction, TrackId, TrackKind};
use tracing::{debug, info, trace};

use crate::{grid::CellGrid, query, GameStatus, World};

/// Advances the world by exactly one tick.
///
/// A finished game makes the tick a no-op that returns the same snapshot. A
/// running game found with an empty reserve ends without advancing the tick
/// index. Otherwise the tick lands any due attack,
/// applies the passive economy, then updates miners, accumulators and trains
/// in that order. Junction routing draws from `rng`; nothing else does.
#[must_use]
pub fn tick<R>(world: &Arc<World>, rng: &mut R) -> Arc<World>
where
    R: Rng + ?Sized,
{
    if world.status == GameStatus::GameOver {
        return Arc::clone(world);
    }
    if world.energy <= 0.0 {
        let mut next = World::clone(world);
        end_game(&mut next);
        return Arc::new(next);
    }

    let mut next = World::clone(world);
    next.tick_index += 1;
    land_attack(&mut next);
    next.golds += next.tuning.economy.golds_increase;
    next.energy -= next.tuning.economy.energy_decrease;
    run_miners(&mut next);
    charge_accumulators(&mut next);
    run_trains(&mut next, rng);

    if next.energy <= 0.0 {
        end_game(&mut next);
    }
    Arc::new(next)
}

fn end_game(world: &mut World) {
    world.energy = 0.0;
    world.status = GameStatus::GameOver;
    info!(tick = world.tick_index, golds = world.golds, "game over");
}

fn land_attack(world: &mut World) {
    let landed = world.attack;
    if world.tick_index != landed.lands_at() {
        return;
    }
    world.energy -= landed.damage;
    world.attack = world.tuning.attack.schedule(
        world.tick_index,
        landed.level.saturating_add(1),
        world.difficulty,
    );
    debug!(
        tick = world.tick_index,
        level = landed.level,
        damage = landed.damage,
        "attack landed"
    );
}

/// Miners extract up to their speed, limited by their own capacity only.
fn run_miners(world: &mut World) {
    let tuning = Arc::clone(&world.tuning);
    for index in 0..world.miners.len() {
        let Some(miner) = world.miners.get(index) else {
            continue;
        };
        if miner.paused || miner.mine.index() >= world.mines.len() {
            continue;
        }
        let mine = miner.mine.index();
        let stats = miner.stats(&tuning);
        let mined = stats.speed.min(stats.capacity - miner.golds);
        if mined == 0.0 {
            continue;
        }

        if let Some(miner) = Arc::make_mut(&mut world.miners).get_mut(index) {
            miner.golds += mined;
        }
        if let Some(mine) = Arc::make_mut(&mut world.mines).get_mut(mine) {
            mine.golds -= mined;
        }
        if mined > 0.0 {
            world.energy -= mined * stats.consumption;
        }
    }
}

fn charge_accumulators(world: &mut World) {
    let rate = world.tuning.economy.accumulator_charge_rate;
    for index in 0..world.accumulators.len() {
        let Some(accumulator) = world.accumulators.get(index) else {
            continue;
        };
        let field = f64::from(query::energy_at(world, accumulator.cell));
        let headroom = accumulator.stats(&world.tuning).capacity - accumulator.energy;
        let gain = (rate * field).min(headroom);
        if gain == 0.0 {
            continue;
        }
        if let Some(accumulator) = Arc::make_mut(&mut world.accumulators).get_mut(index) {
            accumulator.energy += gain;
        }
    }
}

/// Cell lookups shared by every train during one tick. Positions do not
/// change while trains move, only the amounts stored at them.
struct Surroundings {
    tracks: CellGrid<(TrackId, TrackKind)>,
    accumulators: CellGrid<usize>,
    markets: CellGrid<usize>,
    miners: CellGrid<usize>,
}

impl Surroundings {
    fn new(world: &World) -> Self {
        let (columns, rows) = (world.columns, world.rows);
        Self {
            tracks: CellGrid::from_entries(
                columns,
                rows,
                world
                    .tracks
                    .iter()
                    .enumerate()
                    .map(|(index, track)| (track.cell, (TrackId::from_index(index), track.kind))),
            ),
            accumulators: CellGrid::from_entries(
                columns,
                rows,
                world
                    .accumulators
                    .iter()
                    .enumerate()
                    .map(|(index, accumulator)| (accumulator.cell, index)),
            ),
            markets: CellGrid::from_entries(
                columns,
                rows,
                world
                    .markets
                    .iter()
                    .enumerate()
                    .map(|(index, market)| (market.cell, index)),
            ),
            miners: CellGrid::from_entries(
                columns,
                rows,
                world.miners.iter().enumerate().filter_map(|(index, miner)| {
                    world
                        .mines
                        .get(miner.mine.index())
                        .map(|mine| (mine.cell, index))
                }),
            ),
        }
    }

    fn neighbours(cell: CellCoord) -> impl Iterator<Item = CellCoord> {
        Direction::ALL
            .into_iter()
            .filter_map(move |direction| cell.step(direction))
    }

    /// Track a train heading `direction` from `cell` may enter.
    fn entry(&self, cell: CellCoord, direction: Direction) -> Option<TrackId> {
        let (id, kind) = self.tracks.get(cell.step(direction)?)?;
        kind.accepts(direction).then_some(id)
    }
}

fn run_trains<R>(world: &mut World, rng: &mut R)
where
    R: Rng + ?Sized,
{
    let tuning = Arc::clone(&world.tuning);
    let surroundings = Surroundings::new(world);

    for index in 0..world.trains.len() {
        let Some(current) = world.trains.get(index) else {
            continue;
        };
        if current.paused {
            continue;
        }
        let Some(track) = world.tracks.get(current.track.index()).copied() else {
            continue;
        };
        let mut train = current.clone();
        let stats = train.stats(&tuning);

        if world.base.area.contains(track.cell) {
            let capacity = world.base.stats(&tuning).capacity;
            let delivered = train.energy.min(capacity - world.energy).max(0.0);
            world.energy += delivered;
            train.energy -= delivered;
            world.golds += train.golds;
            train.golds = 0.0;
        }

        if let Some(slot) = surroundings.accumulators.get(track.cell) {
            if let Some(accumulator) = Arc::make_mut(&mut world.accumulators).get_mut(slot) {
                let drawn = accumulator
                    .energy
                    .min(stats.energy_capacity - train.energy)
                    .max(0.0);
                accumulator.energy -= drawn;
                train.energy += drawn;
            }
        }

        for cell in Surroundings::neighbours(track.cell) {
            let Some(slot) = surroundings.markets.get(cell) else {
                continue;
            };
            if let Some(market) = Arc::make_mut(&mut world.markets).get_mut(slot) {
                let golds = market.golds.min(stats.gold_capacity - train.golds).max(0.0);
                let energy = market
                    .energy
                    .min(stats.energy_capacity - train.energy)
                    .max(0.0);
                market.golds -= golds;
                market.energy -= energy;
                train.golds += golds;
                train.energy += energy;
            }
        }

        for cell in Surroundings::neighbours(track.cell) {
            let Some(slot) = surroundings.miners.get(cell) else {
                continue;
            };
            let Some(available) = world.miners.get(slot).map(|miner| miner.golds) else {
                continue;
            };
            let collected = available.min(stats.gold_capacity - train.golds);
            if collected <= 0.0 {
                continue;
            }
            if let Some(miner) = Arc::make_mut(&mut world.miners).get_mut(slot) {
                miner.golds -= collected;
                train.golds += collected;
            }
        }

        let route = match track.kind {
            TrackKind::Junction => {
                let candidates: Vec<(Direction, TrackId)> = Direction::ALL
                    .into_iter()
                    .filter(|direction| *direction != train.direction.reverse())
                    .filter_map(|direction| {
                        surroundings
                            .entry(track.cell, direction)
                            .map(|id| (direction, id))
                    })
                    .collect();
                candidates.choose(rng).copied()
            }
            TrackKind::Horizontal | TrackKind::Vertical => surroundings
                .entry(track.cell, train.direction)
                .map(|id| (train.direction, id)),
        };

        match route {
            Some((direction, id)) => {
                train.track = id;
                train.direction = direction;
                world.energy -= stats.consumption;
            }
            None => {
                train.direction = train.direction.reverse();
                trace!(
                    train = index,
                    column = track.cell.column(),
                    row = track.cell.row(),
                    "train bounced"
                );
            }
        }

        if let Some(slot) = Arc::make_mut(&mut world.trains).get_mut(index) {
            *slot = train;
        }
    }
}
