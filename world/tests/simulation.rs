use std::sync::Arc;

use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use railway_tycoon_core::{
    CellCoord, Command, CreateMode, Direction, MineId, PurchaseKind, TrackId, TrackKind,
};
use railway_tycoon_world::{
    self as world, query, Accumulator, Blueprint, GameStatus, Market, Mine, Miner, Track, Train,
    World,
};

fn cell(column: u32, row: u32) -> CellCoord {
    CellCoord::new(column, row)
}

#[test]
fn idle_world_runs_down_to_game_over() {
    let mut world = World::from_blueprint(Blueprint::new(12, 12));
    let mut rng = ChaCha8Rng::seed_from_u64(0);
    let mut previous = query::energy(&world);
    let mut game_over_at = None;

    for _ in 0..2000 {
        world = world::tick(&world, &mut rng);
        let energy = query::energy(&world);
        if game_over_at.is_none() {
            assert!(energy < previous, "energy must strictly fall");
            if query::status(&world) == GameStatus::GameOver {
                game_over_at = Some(query::tick_index(&world));
            }
        }
        previous = energy;
    }

    let game_over_at = game_over_at.expect("idle world runs out of energy");
    assert_eq!(query::energy(&world), 0.0);
    assert_eq!(query::tick_index(&world), game_over_at);

    let frozen = world::tick(&world, &mut rng);
    assert!(Arc::ptr_eq(&world, &frozen));
}

#[test]
fn straight_routing_ignores_the_random_source() {
    let mut blueprint = Blueprint::new(12, 12);
    blueprint.tracks = (0..8)
        .map(|column| Track::new(cell(column, 2), TrackKind::Horizontal))
        .collect();
    blueprint.trains.push(Train::new(TrackId::new(0), Direction::East));
    let start = World::from_blueprint(blueprint);

    let run = |seed: u64| {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut world = Arc::clone(&start);
        let mut visited = Vec::new();
        for _ in 0..30 {
            world = world::tick(&world, &mut rng);
            visited.push(query::trains(&world)[0].track);
        }
        visited
    };
    assert_eq!(run(1), run(2));
    assert_eq!(run(1)[..7], (1..8).map(TrackId::new).collect::<Vec<_>>()[..]);
}

#[test]
fn junction_routing_replays_under_a_seeded_source() {
    let mut blueprint = Blueprint::new(12, 12);
    blueprint.tracks = vec![
        Track::new(cell(2, 2), TrackKind::Junction),
        Track::new(cell(3, 2), TrackKind::Junction),
        Track::new(cell(3, 3), TrackKind::Junction),
        Track::new(cell(2, 3), TrackKind::Junction),
    ];
    blueprint.trains.push(Train::new(TrackId::new(0), Direction::East));
    let start = World::from_blueprint(blueprint);

    let run = |seed: u64| {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut world = Arc::clone(&start);
        for _ in 0..50 {
            world = world::tick(&world, &mut rng);
        }
        world
    };
    assert_eq!(*run(5), *run(5));
}

#[test]
fn energy_is_conserved_apart_from_decay_and_consumption() {
    let mut blueprint = Blueprint::new(12, 12);
    blueprint.tracks = vec![
        Track::new(cell(1, 1), TrackKind::Horizontal),
        Track::new(cell(2, 1), TrackKind::Horizontal),
    ];
    let mut train = Train::new(TrackId::new(0), Direction::East);
    train.energy = 3.0;
    blueprint.trains.push(train);
    let mut accumulator = Accumulator::new(cell(1, 1));
    accumulator.energy = 5.0;
    blueprint.accumulators.push(accumulator);
    let mut market = Market::new(cell(1, 0));
    market.energy = 9.0;
    blueprint.markets.push(market);
    let world = World::from_blueprint(blueprint);

    let total = |world: &World| {
        query::energy(world)
            + query::trains(world).iter().map(|train| train.energy).sum::<f64>()
            + query::accumulators(world)
                .iter()
                .map(|accumulator| accumulator.energy)
                .sum::<f64>()
            + query::markets(world).iter().map(|market| market.energy).sum::<f64>()
    };

    let next = world::tick(&world, &mut ChaCha8Rng::seed_from_u64(3));
    let decay = query::tuning(&world).economy.energy_decrease;
    let consumption = query::trains(&world)[0]
        .stats(query::tuning(&world))
        .consumption;
    assert!((total(&world) - decay - consumption - total(&next)).abs() < 1e-9);
    assert_eq!(query::trains(&next)[0].energy, 10.0);
}

#[test]
fn miner_feeds_an_adjacent_train_over_several_ticks() {
    let mut blueprint = Blueprint::new(12, 12);
    blueprint.mines.push(Mine::new(cell(0, 0), 10_000.0));
    blueprint.miners.push(Miner::new(MineId::new(0)));
    blueprint.tracks = vec![Track::new(cell(1, 0), TrackKind::Junction)];
    blueprint.trains.push(Train::new(TrackId::new(0), Direction::East));
    let mut world = World::from_blueprint(blueprint);
    let mut rng = ChaCha8Rng::seed_from_u64(9);

    for _ in 0..5 {
        world = world::tick(&world, &mut rng);
    }
    assert_eq!(query::trains(&world)[0].golds, 5.0);
    assert_eq!(query::miners(&world)[0].golds, 0.0);
    assert_eq!(query::mines(&world)[0].golds, 9_995.0);
}

fn gesture() -> impl Strategy<Value = Command> {
    let cell = (0u32..8, 0u32..8).prop_map(|(column, row)| CellCoord::new(column, row));
    let mode = prop_oneof![
        Just(None),
        Just(Some(CreateMode::Track)),
        Just(Some(CreateMode::DestroyTrack)),
        Just(Some(CreateMode::Accumulator)),
        Just(Some(CreateMode::Train)),
        Just(Some(CreateMode::Miner)),
    ];
    prop_oneof![
        cell.clone().prop_map(|cell| Command::MouseDown { cell }),
        proptest::option::of(cell).prop_map(|cell| Command::MouseMove { cell }),
        Just(Command::MouseUp),
        Just(Command::MouseLeave),
        Just(Command::Tick),
        mode.prop_map(|mode| Command::SetCreateMode { mode }),
    ]
}

fn gesture_world() -> Arc<World> {
    let mut blueprint = Blueprint::new(8, 8);
    blueprint.golds = 5_000.0;
    blueprint.mines.push(Mine::new(cell(0, 0), 10_000.0));
    blueprint.mines.push(Mine::new(cell(7, 1), 10_000.0));
    blueprint.markets.push(Market::new(cell(6, 6)));
    World::from_blueprint(blueprint)
}

proptest! {
    #[test]
    fn cells_never_hold_conflicting_entities(
        commands in proptest::collection::vec(gesture(), 1..120),
        seed in any::<u64>(),
    ) {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut world = gesture_world();
        for command in commands {
            world = world::apply(&world, command, &mut rng);

            let tracks = query::tracks(&world);
            for (index, track) in tracks.iter().enumerate() {
                prop_assert!(tracks[index + 1..].iter().all(|other| other.cell != track.cell));
                prop_assert!(query::mine_at(&world, track.cell).is_none());
                prop_assert!(query::market_at(&world, track.cell).is_none());
            }
            let accumulators = query::accumulators(&world);
            for (index, accumulator) in accumulators.iter().enumerate() {
                prop_assert!(accumulators[index + 1..]
                    .iter()
                    .all(|other| other.cell != accumulator.cell));
                prop_assert!(query::mine_at(&world, accumulator.cell).is_none());
                prop_assert!(query::market_at(&world, accumulator.cell).is_none());
            }
            let miners = query::miners(&world);
            for (index, miner) in miners.iter().enumerate() {
                prop_assert!(miners[index + 1..].iter().all(|other| other.mine != miner.mine));
            }
            prop_assert!(query::golds(&world) >= 0.0);
        }
    }

    #[test]
    fn purchase_cost_never_falls_with_ownership(owned in 0usize..12) {
        let mut blueprint = Blueprint::new(16, 16);
        blueprint.tracks = (0..owned)
            .map(|column| Track::new(cell(column as u32, 0), TrackKind::Horizontal))
            .collect();
        blueprint.accumulators = (0..owned)
            .map(|column| Accumulator::new(cell(column as u32, 1)))
            .collect();
        let fewer = World::from_blueprint(blueprint.clone());
        blueprint.tracks.push(Track::new(cell(15, 15), TrackKind::Junction));
        blueprint.accumulators.push(Accumulator::new(cell(15, 14)));
        let more = World::from_blueprint(blueprint);

        for kind in [PurchaseKind::Track, PurchaseKind::Accumulator] {
            prop_assert!(world::cost(&more, kind) >= world::cost(&fewer, kind));
        }
        prop_assert!(
            world::cost(&more, PurchaseKind::Accumulator)
                > world::cost(&fewer, PurchaseKind::Accumulator)
        );
    }

    #[test]
    fn finished_games_stay_frozen(extra in 1usize..50, seed in any::<u64>()) {
        let mut blueprint = Blueprint::new(12, 12);
        blueprint.energy = 1.0;
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut world = World::from_blueprint(blueprint);
        for _ in 0..3 {
            world = world::tick(&world, &mut rng);
        }
        prop_assert_eq!(query::status(&world), GameStatus::GameOver);
        for _ in 0..extra {
            let next = world::tick(&world, &mut rng);
            prop_assert!(Arc::ptr_eq(&world, &next));
        }
    }
}
