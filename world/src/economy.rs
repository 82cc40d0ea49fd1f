//! Purchase pricing, upgrades, market trades and pausing.

use std::sync::Arc;

use railway_tycoon_core::{Currency, MarketId, PauseTarget, PurchaseKind, UpgradeTarget};
use tracing::debug;

use crate::World;

/// Price of the next instance of `kind`, growing with the instances owned.
#[must_use]
pub fn cost(world: &World, kind: PurchaseKind) -> f64 {
    let owned = match kind {
        PurchaseKind::Track => world.tracks.len(),
        PurchaseKind::Train => world.trains.len(),
        PurchaseKind::Miner => world.miners.len(),
        PurchaseKind::Accumulator => world.accumulators.len(),
    };
    world.tuning.purchase_cost(kind, owned)
}

/// Reports whether the gold reserve covers `cost`.
#[must_use]
pub fn affordable(world: &World, cost: f64) -> bool {
    cost <= world.golds
}

/// Price of the next instance of `kind` when the player can pay for it.
#[must_use]
pub fn cost_if_affordable(world: &World, kind: PurchaseKind) -> Option<f64> {
    let price = cost(world, kind);
    affordable(world, price).then_some(price)
}

/// Price of the next level of `target`, or `None` at MAX or for a stale id.
#[must_use]
pub fn upgrade_cost(world: &World, target: UpgradeTarget) -> Option<f64> {
    let levels = &world.tuning.levels;
    match target {
        UpgradeTarget::Train { train, stat } => world
            .trains
            .get(train.index())?
            .levels
            .upgrade_cost_in(&levels.train, stat),
        UpgradeTarget::Miner { miner, stat } => world
            .miners
            .get(miner.index())?
            .levels
            .upgrade_cost_in(&levels.miner, stat),
        UpgradeTarget::Accumulator { accumulator, stat } => world
            .accumulators
            .get(accumulator.index())?
            .levels
            .upgrade_cost_in(&levels.accumulator, stat),
        UpgradeTarget::Market { market, stat } => world
            .markets
            .get(market.index())?
            .levels
            .upgrade_cost_in(&levels.market, stat),
        UpgradeTarget::Base { stat } => world.base.levels.upgrade_cost_in(&levels.base, stat),
    }
}

/// Buys the next level of `target` when it exists and is affordable.
#[must_use]
pub fn upgrade(world: &Arc<World>, target: UpgradeTarget) -> Arc<World> {
    let Some(price) =
        upgrade_cost(world, target).filter(|price| *price > 0.0 && affordable(world, *price))
    else {
        return Arc::clone(world);
    };

    let mut next = World::clone(world);
    next.golds -= price;
    match target {
        UpgradeTarget::Train { train, stat } => {
            if let Some(entry) = Arc::make_mut(&mut next.trains).get_mut(train.index()) {
                *entry.levels.get_mut(stat) += 1;
            }
        }
        UpgradeTarget::Miner { miner, stat } => {
            if let Some(entry) = Arc::make_mut(&mut next.miners).get_mut(miner.index()) {
                *entry.levels.get_mut(stat) += 1;
            }
        }
        UpgradeTarget::Accumulator { accumulator, stat } => {
            if let Some(entry) = Arc::make_mut(&mut next.accumulators).get_mut(accumulator.index())
            {
                *entry.levels.get_mut(stat) += 1;
            }
        }
        UpgradeTarget::Market { market, stat } => {
            if let Some(entry) = Arc::make_mut(&mut next.markets).get_mut(market.index()) {
                *entry.levels.get_mut(stat) += 1;
            }
        }
        UpgradeTarget::Base { stat } => *next.base.levels.get_mut(stat) += 1,
    }
    debug!(?target, price, "upgrade purchased");
    Arc::new(next)
}

/// Spends up to `amount` of `currency` to stock the market with the other
/// currency at the market's trading rate.
///
/// The spend is clipped to what the market can still hold and rounded down;
/// only the clipped value is charged. Requests the reserve cannot cover,
/// stale market ids and trades that would move nothing are rejected, as are
/// energy trades that would empty the energy reserve.
#[must_use]
pub fn trade_market(
    world: &Arc<World>,
    market: MarketId,
    currency: Currency,
    amount: f64,
) -> Arc<World> {
    if !(amount.is_finite() && amount > 0.0) || reserve(world, currency) < amount {
        return Arc::clone(world);
    }
    let Some(entry) = world.markets.get(market.index()) else {
        return Arc::clone(world);
    };

    let stats = entry.stats(&world.tuning);
    let headroom = match currency.other() {
        Currency::Golds => stats.gold_capacity - entry.golds,
        Currency::Energy => stats.energy_capacity - entry.energy,
    };
    let value = amount.min(headroom / stats.trading).floor();
    if value.is_nan() || value <= 0.0 {
        return Arc::clone(world);
    }
    if currency == Currency::Energy && world.energy - value <= 0.0 {
        return Arc::clone(world);
    }

    let mut next = World::clone(world);
    *reserve_mut(&mut next, currency) -= value;
    if let Some(entry) = Arc::make_mut(&mut next.markets).get_mut(market.index()) {
        let credited = value * stats.trading;
        match currency.other() {
            Currency::Golds => entry.golds += credited,
            Currency::Energy => entry.energy += credited,
        }
    }
    debug!(market = market.get(), ?currency, value, "market trade");
    Arc::new(next)
}

/// Pauses or resumes a train or miner. Stale ids and unchanged flags are
/// no-ops.
#[must_use]
pub fn set_paused(world: &Arc<World>, target: PauseTarget, paused: bool) -> Arc<World> {
    let current = match target {
        PauseTarget::Train(train) => world.trains.get(train.index()).map(|entry| entry.paused),
        PauseTarget::Miner(miner) => world.miners.get(miner.index()).map(|entry| entry.paused),
    };
    if current != Some(!paused) {
        return Arc::clone(world);
    }

    let mut next = World::clone(world);
    match target {
        PauseTarget::Train(train) => {
            if let Some(entry) = Arc::make_mut(&mut next.trains).get_mut(train.index()) {
                entry.paused = paused;
            }
        }
        PauseTarget::Miner(miner) => {
            if let Some(entry) = Arc::make_mut(&mut next.miners).get_mut(miner.index()) {
                entry.paused = paused;
            }
        }
    }
    Arc::new(next)
}

fn reserve(world: &World, currency: Currency) -> f64 {
    match currency {
        Currency::Golds => world.golds,
        Currency::Energy => world.energy,
    }
}

fn reserve_mut(world: &mut World, currency: Currency) -> &mut f64 {
    match currency {
        Currency::Golds => &mut world.golds,
        Currency::Energy => &mut world.energy,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{query, Blueprint, Market, Train, Track};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use railway_tycoon_core::{
        BaseStat, CellCoord, Direction, MarketStat, TrackId, TrackKind, TrainId, TrainStat,
    };

    fn world_with_market(golds: f64, market_energy: f64) -> Arc<World> {
        let mut blueprint = Blueprint::new(12, 12);
        blueprint.golds = golds;
        let mut market = Market::new(CellCoord::new(0, 0));
        market.energy = market_energy;
        blueprint.markets.push(market);
        World::from_blueprint(blueprint)
    }

    #[test]
    fn cost_grows_with_owned_tracks() {
        let mut blueprint = Blueprint::new(12, 12);
        let first = {
            let world = World::from_blueprint(blueprint.clone());
            cost(&world, PurchaseKind::Track)
        };
        blueprint.tracks = (0..5)
            .map(|column| Track::new(CellCoord::new(column, 0), TrackKind::Horizontal))
            .collect();
        let world = World::from_blueprint(blueprint);
        assert_eq!(first, 2.0);
        assert_eq!(cost(&world, PurchaseKind::Track), 5.0);
    }

    #[test]
    fn cost_if_affordable_respects_reserve() {
        let world = world_with_market(99.0, 0.0);
        assert_eq!(cost_if_affordable(&world, PurchaseKind::Train), None);
        assert_eq!(cost_if_affordable(&world, PurchaseKind::Miner), Some(50.0));
        assert!(affordable(&world, 99.0));
        assert!(!affordable(&world, 99.5));
    }

    #[test]
    fn upgrade_base_charges_and_raises_level() {
        let world = world_with_market(250.0, 0.0);
        let next = upgrade(&world, UpgradeTarget::Base {
            stat: BaseStat::Capacity,
        });
        assert!(!Arc::ptr_eq(&world, &next));
        assert_eq!(query::golds(&next), 50.0);
        assert_eq!(query::base(&next).levels.capacity, 1);
        assert_eq!(query::base(&world).levels.capacity, 0);
    }

    #[test]
    fn upgrade_without_funds_returns_same_snapshot() {
        let world = world_with_market(199.0, 0.0);
        let next = upgrade(&world, UpgradeTarget::Base {
            stat: BaseStat::Capacity,
        });
        assert!(Arc::ptr_eq(&world, &next));
    }

    #[test]
    fn upgrade_of_stale_id_returns_same_snapshot() {
        let world = world_with_market(10_000.0, 0.0);
        let next = upgrade(&world, UpgradeTarget::Train {
            train: TrainId::new(3),
            stat: TrainStat::Consumption,
        });
        assert!(Arc::ptr_eq(&world, &next));
    }

    #[test]
    fn upgrade_stops_at_max_level() {
        let mut blueprint = Blueprint::new(12, 12);
        blueprint.golds = 1.0e9;
        blueprint.tracks.push(Track::new(CellCoord::new(0, 0), TrackKind::Horizontal));
        let mut train = Train::new(TrackId::new(0), Direction::East);
        train.levels.energy_capacity = 4;
        blueprint.trains.push(train);
        let world = World::from_blueprint(blueprint);
        let target = UpgradeTarget::Train {
            train: TrainId::new(0),
            stat: TrainStat::EnergyCapacity,
        };
        assert_eq!(upgrade_cost(&world, target), None);
        assert!(Arc::ptr_eq(&world, &upgrade(&world, target)));
    }

    #[test]
    fn market_upgrade_shares_untouched_collections() {
        let world = world_with_market(1_000.0, 0.0);
        let next = upgrade(&world, UpgradeTarget::Market {
            market: MarketId::new(0),
            stat: MarketStat::Trading,
        });
        assert_eq!(query::markets(&next)[0].levels.trading, 1);
        assert_eq!(query::golds(&next), 900.0);
        assert_eq!(query::markets(&world)[0].levels.trading, 0);
        assert!(std::ptr::eq(query::mines(&world), query::mines(&next)));
    }

    #[test]
    fn trade_charges_clipped_value() {
        let world = world_with_market(250.0, 96.0);
        let next = trade_market(&world, MarketId::new(0), Currency::Golds, 100.0);
        assert_eq!(query::golds(&next), 210.0);
        assert_eq!(query::energy(&next), query::energy(&world));
        assert!((query::markets(&next)[0].energy - 100.0).abs() < 1e-9);
    }

    #[test]
    fn trade_within_headroom_charges_full_amount() {
        let world = world_with_market(250.0, 0.0);
        let next = trade_market(&world, MarketId::new(0), Currency::Golds, 100.0);
        assert_eq!(query::golds(&next), 150.0);
        assert!((query::markets(&next)[0].energy - 10.0).abs() < 1e-9);
    }

    #[test]
    fn trade_rejections_return_same_snapshot() {
        let world = world_with_market(50.0, 0.0);
        let market = MarketId::new(0);
        let over_budget = trade_market(&world, market, Currency::Golds, 100.0);
        let stale = trade_market(&world, MarketId::new(4), Currency::Golds, 10.0);
        let negative = trade_market(&world, market, Currency::Golds, -5.0);
        assert!(Arc::ptr_eq(&world, &over_budget));
        assert!(Arc::ptr_eq(&world, &stale));
        assert!(Arc::ptr_eq(&world, &negative));

        let full = world_with_market(50.0, 100.0);
        let saturated = trade_market(&full, market, Currency::Golds, 10.0);
        assert!(Arc::ptr_eq(&full, &saturated));
    }

    #[test]
    fn energy_trade_stocks_market_golds() {
        let world = world_with_market(0.0, 0.0);
        let next = trade_market(&world, MarketId::new(0), Currency::Energy, 20.0);
        assert_eq!(query::energy(&next), 980.0);
        assert!((query::markets(&next)[0].golds - 2.0).abs() < 1e-9);
    }

    #[test]
    fn energy_trade_never_empties_the_reserve() {
        let with_energy = |energy: f64| {
            let mut blueprint = Blueprint::new(12, 12);
            blueprint.energy = energy;
            blueprint.markets.push(Market::new(CellCoord::new(0, 0)));
            World::from_blueprint(blueprint)
        };
        let market = MarketId::new(0);

        let world = with_energy(50.0);
        let drained = trade_market(&world, market, Currency::Energy, 50.0);
        assert!(Arc::ptr_eq(&world, &drained));

        let next = trade_market(&with_energy(50.3), market, Currency::Energy, 50.0);
        assert!((query::energy(&next) - 0.3).abs() < 1e-9);
        let ticked = crate::tick(&next, &mut ChaCha8Rng::seed_from_u64(1));
        assert_eq!(query::status(&ticked), crate::GameStatus::GameOver);
        assert_eq!(query::energy(&ticked), 0.0);
    }

    #[test]
    fn pause_toggles_only_on_change() {
        let mut blueprint = Blueprint::new(12, 12);
        blueprint.tracks.push(Track::new(CellCoord::new(0, 0), TrackKind::Horizontal));
        blueprint.trains.push(Train::new(TrackId::new(0), Direction::East));
        let world = World::from_blueprint(blueprint);
        let target = PauseTarget::Train(TrainId::new(0));

        assert!(Arc::ptr_eq(&world, &set_paused(&world, target, false)));
        let paused = set_paused(&world, target, true);
        assert!(query::trains(&paused)[0].paused);
        assert!(Arc::ptr_eq(
            &paused,
            &set_paused(&paused, PauseTarget::Train(TrainId::new(9)), true)
        ));
    }
}
