//! Purchase-gated placement of tracks, trains, miners and accumulators.
//!
//! Each helper works on an owned copy and returns `None` when the placement is
//! rejected, leaving the caller's snapshot untouched.

use std::sync::Arc;

use railway_tycoon_core::{CellCoord, Direction, PurchaseKind, TrackId, TrackKind};
use tracing::debug;

use crate::{cost_if_affordable, query, Accumulator, Miner, Track, Train, World};

/// Lays a track at `cell` unless a track, mine or market already sits there.
pub(crate) fn add_track(world: &World, cell: CellCoord, kind: TrackKind) -> Option<World> {
    if !world.contains(cell)
        || query::track_at(world, cell).is_some()
        || query::mine_at(world, cell).is_some()
        || query::market_at(world, cell).is_some()
    {
        return None;
    }
    let price = cost_if_affordable(world, PurchaseKind::Track)?;

    let mut next = world.clone();
    Arc::make_mut(&mut next.tracks).push(Track::new(cell, kind));
    next.golds -= price;
    debug!(column = cell.column(), row = cell.row(), ?kind, price, "track placed");
    Some(next)
}

/// Puts a train on `track`, reviving a zombie train when one exists.
///
/// A zombie keeps its cargo and levels but is charged like a new purchase.
pub(crate) fn add_train(world: &World, track: Option<TrackId>) -> Option<World> {
    let price = cost_if_affordable(world, PurchaseKind::Train)?;
    let track_id = track?;
    let placed_on = world.tracks.get(track_id.index())?;
    let direction = match placed_on.kind {
        TrackKind::Horizontal => Direction::East,
        TrackKind::Vertical | TrackKind::Junction => Direction::South,
    };

    let mut next = world.clone();
    let zombie = world
        .trains
        .iter()
        .position(|train| world.tracks.get(train.track.index()).is_none());
    let trains = Arc::make_mut(&mut next.trains);
    match zombie.and_then(|index| trains.get_mut(index)) {
        Some(revived) => {
            revived.track = track_id;
            revived.direction = direction;
            debug!(track = track_id.get(), price, "zombie train revived");
        }
        None => {
            trains.push(Train::new(track_id, direction));
            debug!(track = track_id.get(), price, "train placed");
        }
    }
    next.golds -= price;
    Some(next)
}

/// Places an accumulator at `cell` unless an accumulator, mine or market
/// already sits there. Accumulators may share a cell with a track.
pub(crate) fn add_accumulator(world: &World, cell: CellCoord) -> Option<World> {
    if !world.contains(cell)
        || query::accumulator_at(world, cell).is_some()
        || query::mine_at(world, cell).is_some()
        || query::market_at(world, cell).is_some()
    {
        return None;
    }
    let price = cost_if_affordable(world, PurchaseKind::Accumulator)?;

    let mut next = world.clone();
    Arc::make_mut(&mut next.accumulators).push(Accumulator::new(cell));
    next.golds -= price;
    debug!(column = cell.column(), row = cell.row(), price, "accumulator placed");
    Some(next)
}

/// Attaches a miner to the mine at `cell` when that mine has none yet.
pub(crate) fn add_miner(world: &World, cell: CellCoord) -> Option<World> {
    let mine = query::mine_at(world, cell)?;
    if query::miner_of(world, mine).is_some() {
        return None;
    }
    let price = cost_if_affordable(world, PurchaseKind::Miner)?;

    let mut next = world.clone();
    Arc::make_mut(&mut next.miners).push(Miner::new(mine));
    next.golds -= price;
    debug!(mine = mine.get(), price, "miner placed");
    Some(next)
}

/// Removes the track at `cell`, shifting the handles of later tracks.
pub(crate) fn remove_track_at(world: &mut World, cell: CellCoord) {
    if let Some(track) = query::track_at(world, cell) {
        let _ = Arc::make_mut(&mut world.tracks).remove(track.index());
        debug!(column = cell.column(), row = cell.row(), "track removed");
    }
}
