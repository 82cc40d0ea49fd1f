//! Pointer gestures and UI panel flags.

use std::sync::Arc;

use railway_tycoon_core::{CellCoord, CreateMode, Panel, TrackKind};

use crate::{
    placement::{add_accumulator, add_miner, add_track, add_train, remove_track_at},
    query, World,
};

/// Pointer pressed over `cell`.
///
/// With the track tool armed, a junction is laid on an empty cell when
/// affordable. The press is always recorded as the start of a gesture and
/// closes the action menu.
#[must_use]
pub fn mouse_down(world: &Arc<World>, cell: CellCoord) -> Arc<World> {
    let laid = match world.create_mode {
        Some(CreateMode::Track) if query::track_at(world, cell).is_none() => {
            add_track(world, cell, TrackKind::Junction)
        }
        _ => None,
    };
    let mut next = laid.unwrap_or_else(|| World::clone(world));
    next.down_at = Some(cell);
    next.action_menu_opened = false;
    next.hover_cell = Some(cell);
    Arc::new(next)
}

/// Pointer moved over `cell`; `None` and an unchanged cell are no-ops.
///
/// While a gesture is in progress the armed tool acts on the crossed cells:
/// the track tool lays straight tracks along the drag and turns corners into
/// junctions, the accumulator tool places on the cell being left, and the
/// demolition tool removes the track under the pointer.
#[must_use]
pub fn mouse_move(world: &Arc<World>, cell: Option<CellCoord>) -> Arc<World> {
    let Some(cell) = cell else {
        return Arc::clone(world);
    };
    if world.hover_cell == Some(cell) {
        return Arc::clone(world);
    }

    let mut next = World::clone(world);
    if world.down_at.is_some() {
        match world.create_mode {
            Some(CreateMode::Track) => drag_track(&mut next, world.hover_cell, cell),
            Some(CreateMode::Accumulator) => {
                if let Some(placed) = world
                    .hover_cell
                    .and_then(|previous| add_accumulator(&next, previous))
                {
                    next = placed;
                }
            }
            Some(CreateMode::DestroyTrack) => remove_track_at(&mut next, cell),
            Some(CreateMode::Train | CreateMode::Miner) | None => {}
        }
    }
    next.hover_cell = Some(cell);
    Arc::new(next)
}

fn drag_track(world: &mut World, previous: Option<CellCoord>, cell: CellCoord) {
    let previous_track = previous.and_then(|previous| query::track_at(world, previous));
    let (from, to_kind) = match query::track_at(world, cell) {
        None => {
            let kind = previous
                .and_then(|previous| previous.direction_to(cell))
                .map_or(TrackKind::Junction, TrackKind::along);
            match add_track(world, cell, kind) {
                Some(placed) => {
                    *world = placed;
                    (previous_track, Some(kind))
                }
                None => (None, None),
            }
        }
        Some(existing) => (
            Some(existing),
            previous_track
                .and_then(|track| world.tracks.get(track.index()))
                .map(|track| track.kind),
        ),
    };

    let (Some(from), Some(to_kind)) = (from, to_kind) else {
        return;
    };
    let Some(from_kind) = world.tracks.get(from.index()).map(|track| track.kind) else {
        return;
    };
    if from_kind != to_kind && from_kind != TrackKind::Junction {
        if let Some(track) = Arc::make_mut(&mut world.tracks).get_mut(from.index()) {
            track.kind = TrackKind::Junction;
        }
    }
}

/// Pointer released. Only a release over the pressed cell counts as a click.
///
/// A click is interpreted in priority order: the demolition tool removes the
/// track; the accumulator, miner and train tools place and disarm on success;
/// otherwise an entity under the pointer opens its inspector, a click in the
/// base opens the base panel, a click on a bare track cycles its kind, and a
/// click on empty ground outside the base closes the open panel.
#[must_use]
pub fn mouse_up(world: &Arc<World>) -> Arc<World> {
    if world.down_at.is_none() {
        return Arc::clone(world);
    }
    let mut next = World::clone(world);
    if let (Some(down), Some(hover)) = (world.down_at, world.hover_cell) {
        if down == hover {
            click(&mut next, hover);
        }
    }
    next.down_at = None;
    Arc::new(next)
}

fn click(world: &mut World, cell: CellCoord) {
    let track = query::track_at(world, cell);
    match world.create_mode {
        Some(CreateMode::DestroyTrack) => remove_track_at(world, cell),
        Some(CreateMode::Accumulator) => place_and_disarm(world, |w| add_accumulator(w, cell)),
        Some(CreateMode::Miner) => place_and_disarm(world, |w| add_miner(w, cell)),
        Some(CreateMode::Train) => place_and_disarm(world, |w| add_train(w, track)),
        Some(CreateMode::Track) | None => inspect_or_cycle(world, cell),
    }
}

fn place_and_disarm<F>(world: &mut World, place: F)
where
    F: FnOnce(&World) -> Option<World>,
{
    if let Some(mut placed) = place(world) {
        placed.create_mode = None;
        *world = placed;
    }
}

fn inspect_or_cycle(world: &mut World, cell: CellCoord) {
    let track = query::track_at(world, cell);
    let mine = query::mine_at(world, cell);
    let panel = track
        .and_then(|track| query::train_on(world, track))
        .map(Panel::Train)
        .or_else(|| query::market_at(world, cell).map(Panel::Market))
        .or_else(|| query::accumulator_at(world, cell).map(Panel::Accumulator))
        .or_else(|| mine.and_then(|mine| query::miner_of(world, mine)).map(Panel::Miner))
        .or_else(|| mine.map(Panel::Mine));
    let in_base = world.base.area.contains(cell);

    if let Some(panel) = panel {
        world.create_mode = None;
        world.opened = Some(panel);
    } else if in_base && world.opened != Some(Panel::Base) {
        world.opened = Some(Panel::Base);
    } else if let Some(track) = track {
        if let Some(entry) = Arc::make_mut(&mut world.tracks).get_mut(track.index()) {
            entry.kind = entry.kind.cycled();
        }
    } else if !in_base {
        world.opened = None;
    }
}

/// Pointer left the playable area; ends any gesture.
#[must_use]
pub fn mouse_leave(world: &Arc<World>) -> Arc<World> {
    update_ui(world, |next| {
        next.down_at = None;
        next.hover_cell = None;
    })
}

/// Arms `mode`, or disarms with `None`.
#[must_use]
pub fn set_create_mode(world: &Arc<World>, mode: Option<CreateMode>) -> Arc<World> {
    update_ui(world, |next| next.create_mode = mode)
}

/// Opens `panel`, disarming the current tool and closing the action menu.
#[must_use]
pub fn open(world: &Arc<World>, panel: Panel) -> Arc<World> {
    update_ui(world, |next| {
        next.create_mode = None;
        next.action_menu_opened = false;
        next.opened = Some(panel);
    })
}

/// Closes the inspector panel and the action menu.
#[must_use]
pub fn close(world: &Arc<World>) -> Arc<World> {
    update_ui(world, |next| {
        next.opened = None;
        next.action_menu_opened = false;
    })
}

/// Opens the action menu, closing panels and disarming the tool.
#[must_use]
pub fn open_action_menu(world: &Arc<World>) -> Arc<World> {
    update_ui(world, |next| {
        next.opened = None;
        next.create_mode = None;
        next.action_menu_opened = true;
    })
}

/// Closes the action menu, closing panels and disarming the tool.
#[must_use]
pub fn close_action_menu(world: &Arc<World>) -> Arc<World> {
    update_ui(world, |next| {
        next.opened = None;
        next.create_mode = None;
        next.action_menu_opened = false;
    })
}

type UiFlags = (
    Option<CreateMode>,
    Option<Panel>,
    bool,
    Option<CellCoord>,
    Option<CellCoord>,
);

fn ui_flags(world: &World) -> UiFlags {
    (
        world.create_mode,
        world.opened,
        world.action_menu_opened,
        world.hover_cell,
        world.down_at,
    )
}

/// Applies an edit that only touches UI flags, keeping the snapshot when the
/// flags end up unchanged.
fn update_ui<F>(world: &Arc<World>, edit: F) -> Arc<World>
where
    F: FnOnce(&mut World),
{
    let mut next = World::clone(world);
    edit(&mut next);
    if ui_flags(&next) == ui_flags(world) {
        Arc::clone(world)
    } else {
        Arc::new(next)
    }
}
