//! Static tuning tables shared by the generator and the simulation.

use serde::{Deserialize, Serialize};

use crate::stats::{
    AccumulatorStats, BaseStats, MarketStats, MinerStats, PurchaseKind, PurchaseTable, TrainStats,
};

/// Geometric progression describing how a stat and its upgrade price grow.
///
/// Level `i` holds `value_i` and, unless it is the last level, the price of
/// moving to level `i + 1`. Both sequences follow `x = x * multiplier + add`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LevelCurve {
    /// Number of levels generated, including the final MAX level.
    pub count: usize,
    /// Value of level zero.
    pub initial_value: f64,
    /// Factor applied to the value between levels.
    pub value_multiplier: f64,
    /// Offset added to the value between levels.
    pub value_add: f64,
    /// Price of the first upgrade.
    pub initial_cost: f64,
    /// Factor applied to the price between levels.
    pub cost_multiplier: f64,
    /// Offset added to the price between levels.
    pub cost_add: f64,
}

impl LevelCurve {
    /// Creates a curve from its seven parameters.
    #[must_use]
    pub const fn new(
        count: usize,
        initial_value: f64,
        value_multiplier: f64,
        value_add: f64,
        initial_cost: f64,
        cost_multiplier: f64,
        cost_add: f64,
    ) -> Self {
        Self {
            count,
            initial_value,
            value_multiplier,
            value_add,
            initial_cost,
            cost_multiplier,
            cost_add,
        }
    }

    /// Expands the curve into a concrete level table.
    #[must_use]
    pub fn generate(&self) -> LevelTable {
        let mut levels = Vec::with_capacity(self.count);
        let mut value = self.initial_value;
        let mut cost = self.initial_cost;
        for index in 0..self.count {
            let upgrade = (index + 1 < self.count).then(|| cost.round());
            levels.push(Level {
                value: round_by_magnitude(value),
                upgrade,
            });
            value = value * self.value_multiplier + self.value_add;
            cost = cost * self.cost_multiplier + self.cost_add;
        }
        LevelTable { levels }
    }
}

/// Rounds small values finely and large values to whole units.
fn round_by_magnitude(value: f64) -> f64 {
    if value < 1.0 {
        (value * 1000.0).round() / 1000.0
    } else if value < 10.0 {
        (value * 10.0).round() / 10.0
    } else {
        value.round()
    }
}

/// A single entry of a [`LevelTable`].
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Level {
    /// Stat value while the entity sits at this level.
    pub value: f64,
    /// Price of the next level, absent at MAX.
    pub upgrade: Option<f64>,
}

/// Ordered progression of levels for one stat; the index is the level.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LevelTable {
    levels: Vec<Level>,
}

impl LevelTable {
    /// Wraps an explicit list of levels.
    #[must_use]
    pub fn from_levels(levels: Vec<Level>) -> Self {
        Self { levels }
    }

    /// All levels in ascending order.
    #[must_use]
    pub fn levels(&self) -> &[Level] {
        &self.levels
    }

    /// Number of levels in the table.
    #[must_use]
    pub fn len(&self) -> usize {
        self.levels.len()
    }

    /// Reports whether the table holds no levels.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Stat value at `level`. Levels past the end read as the last level.
    #[must_use]
    pub fn value(&self, level: usize) -> f64 {
        self.levels
            .get(level)
            .or_else(|| self.levels.last())
            .map_or(0.0, |entry| entry.value)
    }

    /// Price of leaving `level`, or `None` at MAX.
    #[must_use]
    pub fn upgrade_cost(&self, level: usize) -> Option<f64> {
        self.levels.get(level).and_then(|entry| entry.upgrade)
    }
}

/// Purchase price that grows with the number of owned instances.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PurchaseCost {
    /// Price of the first instance.
    pub base: f64,
    /// Factor applied per instance already owned.
    pub growth: f64,
}

impl PurchaseCost {
    /// Creates a new purchase price descriptor.
    #[must_use]
    pub const fn new(base: f64, growth: f64) -> Self {
        Self { base, growth }
    }

    /// Price of the next instance when `owned` instances already exist.
    #[must_use]
    pub fn for_owned(&self, owned: usize) -> f64 {
        (self.base * self.growth.powf(owned as f64)).round()
    }
}

/// Passive per-tick economy.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EconomyRates {
    /// Golds credited to the reserve every tick.
    pub golds_increase: f64,
    /// Energy removed from the reserve every tick.
    pub energy_decrease: f64,
    /// Energy gained per tick by an accumulator for each unit of field strength.
    pub accumulator_charge_rate: f64,
}

impl Default for EconomyRates {
    fn default() -> Self {
        Self {
            golds_increase: 0.2,
            energy_decrease: 0.5,
            accumulator_charge_rate: 0.05,
        }
    }
}

/// Parameters of the escalating energy attacks.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AttackConfig {
    /// Ticks between two consecutive attacks.
    pub duration: u64,
    /// Damage of the level zero attack.
    pub base_damage: f64,
    /// Damage factor applied per level.
    pub damage_growth: f64,
}

impl Default for AttackConfig {
    fn default() -> Self {
        Self {
            duration: 60,
            base_damage: 100.0,
            damage_growth: 1.1,
        }
    }
}

impl AttackConfig {
    /// Schedules the attack of `level`, starting its countdown at `start_tick`.
    ///
    /// `difficulty` shifts the damage curve by that many levels.
    #[must_use]
    pub fn schedule(&self, start_tick: u64, level: u32, difficulty: u32) -> AttackLevel {
        let exponent = f64::from(level) + f64::from(difficulty);
        AttackLevel {
            level,
            start_tick,
            duration: self.duration,
            damage: (self.base_damage * self.damage_growth.powf(exponent)).floor(),
        }
    }
}

/// The next scheduled energy attack.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct AttackLevel {
    /// Number of attacks that landed before this one.
    pub level: u32,
    /// Tick at which the countdown started.
    pub start_tick: u64,
    /// Ticks between the start and the hit.
    pub duration: u64,
    /// Energy removed from the reserve when the attack lands.
    pub damage: f64,
}

impl AttackLevel {
    /// Tick index at which the attack lands.
    #[must_use]
    pub const fn lands_at(&self) -> u64 {
        self.start_tick.saturating_add(self.duration)
    }
}

/// Per-entity stat payloads grouped by entity kind.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EntityLevels<L> {
    /// Train stats.
    #[serde(default)]
    pub train: TrainStats<L>,
    /// Miner stats.
    #[serde(default)]
    pub miner: MinerStats<L>,
    /// Accumulator stats.
    #[serde(default)]
    pub accumulator: AccumulatorStats<L>,
    /// Market stats.
    #[serde(default)]
    pub market: MarketStats<L>,
    /// Base stats.
    #[serde(default)]
    pub base: BaseStats<L>,
}

impl<L> EntityLevels<L> {
    /// Builds a grouping of the same shape by transforming every payload.
    #[must_use]
    pub fn map<U, F>(&self, mut f: F) -> EntityLevels<U>
    where
        F: FnMut(&L) -> U,
    {
        EntityLevels {
            train: self.train.map(&mut f),
            miner: self.miner.map(&mut f),
            accumulator: self.accumulator.map(&mut f),
            market: self.market.map(&mut f),
            base: self.base.map(&mut f),
        }
    }

    /// Replaces every payload for which `overrides` holds a value.
    #[must_use]
    pub fn overlaid(self, overrides: EntityLevels<Option<L>>) -> Self {
        EntityLevels {
            train: self.train.overlaid(overrides.train),
            miner: self.miner.overlaid(overrides.miner),
            accumulator: self.accumulator.overlaid(overrides.accumulator),
            market: self.market.overlaid(overrides.market),
            base: self.base.overlaid(overrides.base),
        }
    }
}

impl<L> Default for EntityLevels<Option<L>> {
    fn default() -> Self {
        Self {
            train: TrainStats::default(),
            miner: MinerStats::default(),
            accumulator: AccumulatorStats::default(),
            market: MarketStats::default(),
            base: BaseStats::default(),
        }
    }
}

impl Default for EntityLevels<LevelCurve> {
    fn default() -> Self {
        Self {
            train: TrainStats {
                consumption: LevelCurve::new(10, 1.0, 0.9, -0.04, 40.0, 1.25, 20.0),
                gold_capacity: LevelCurve::new(10, 10.0, 1.2, 5.0, 20.0, 1.5, 10.0),
                energy_capacity: LevelCurve::new(5, 10.0, 2.0, 10.0, 20.0, 2.5, 50.0),
            },
            miner: MinerStats {
                speed: LevelCurve::new(10, 1.0, 1.4, 0.0, 20.0, 1.6, 5.0),
                capacity: LevelCurve::new(10, 20.0, 1.5, 10.0, 20.0, 1.2, 12.0),
                consumption: LevelCurve::new(10, 1.0, 0.9, -0.04, 40.0, 1.25, 20.0),
            },
            accumulator: AccumulatorStats {
                capacity: LevelCurve::new(5, 20.0, 2.0, 10.0, 20.0, 3.0, 40.0),
            },
            market: MarketStats {
                trading: LevelCurve::new(10, 0.1, 1.1, 0.01, 100.0, 1.6, 0.0),
                gold_capacity: LevelCurve::new(10, 100.0, 2.0, 0.0, 20.0, 2.0, 50.0),
                energy_capacity: LevelCurve::new(5, 100.0, 2.0, 0.0, 20.0, 2.0, 50.0),
            },
            base: BaseStats {
                capacity: LevelCurve::new(20, 1000.0, 1.4, 200.0, 200.0, 1.2, 200.0),
            },
        }
    }
}

fn default_purchases() -> PurchaseTable<PurchaseCost> {
    PurchaseTable {
        track: PurchaseCost::new(2.0, 1.2),
        train: PurchaseCost::new(100.0, 1.8),
        miner: PurchaseCost::new(50.0, 2.0),
        accumulator: PurchaseCost::new(50.0, 1.4),
    }
}

/// Designer-facing description of every tuning knob.
///
/// A configuration file may override any subset of the tables, down to a
/// single purchase price or a single level curve; everything it omits keeps
/// the shipped value.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "TuningOverrides")]
pub struct TuningConfig {
    /// Passive per-tick income and decay.
    pub economy: EconomyRates,
    /// Energy attack schedule.
    pub attack: AttackConfig,
    /// Purchase prices by entity kind.
    pub purchases: PurchaseTable<PurchaseCost>,
    /// Level curves by entity kind and stat.
    pub curves: EntityLevels<LevelCurve>,
}

impl Default for TuningConfig {
    fn default() -> Self {
        Self {
            economy: EconomyRates::default(),
            attack: AttackConfig::default(),
            purchases: default_purchases(),
            curves: EntityLevels::default(),
        }
    }
}

/// Shape of a partially written tuning table as found in a file.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct TuningOverrides {
    economy: EconomyRates,
    attack: AttackConfig,
    purchases: PurchaseTable<Option<PurchaseCost>>,
    curves: EntityLevels<Option<LevelCurve>>,
}

impl From<TuningOverrides> for TuningConfig {
    fn from(overrides: TuningOverrides) -> Self {
        let defaults = Self::default();
        Self {
            economy: overrides.economy,
            attack: overrides.attack,
            purchases: defaults.purchases.overlaid(overrides.purchases),
            curves: defaults.curves.overlaid(overrides.curves),
        }
    }
}

impl TuningConfig {
    /// Expands every curve into its level table.
    #[must_use]
    pub fn build(&self) -> Tuning {
        Tuning {
            economy: self.economy,
            attack: self.attack,
            purchases: self.purchases,
            levels: self.curves.map(LevelCurve::generate),
        }
    }
}

/// Immutable tables consumed by the simulation for the lifetime of a game.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Tuning {
    /// Passive per-tick income and decay.
    pub economy: EconomyRates,
    /// Energy attack schedule.
    pub attack: AttackConfig,
    /// Purchase prices by entity kind.
    pub purchases: PurchaseTable<PurchaseCost>,
    /// Generated level tables by entity kind and stat.
    pub levels: EntityLevels<LevelTable>,
}

impl Tuning {
    /// Purchase price of `kind` when `owned` instances already exist.
    #[must_use]
    pub fn purchase_cost(&self, kind: PurchaseKind, owned: usize) -> f64 {
        self.purchases.get(kind).for_owned(owned)
    }
}

impl Default for Tuning {
    fn default() -> Self {
        TuningConfig::default().build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_table_omits_upgrade_at_max() {
        let table = LevelCurve::new(3, 10.0, 2.0, 0.0, 5.0, 2.0, 0.0).generate();
        assert_eq!(table.len(), 3);
        assert_eq!(table.upgrade_cost(0), Some(5.0));
        assert_eq!(table.upgrade_cost(1), Some(10.0));
        assert_eq!(table.upgrade_cost(2), None);
        assert_eq!(table.value(2), 40.0);
    }

    #[test]
    fn values_round_by_magnitude() {
        let table = LevelCurve::new(10, 1.0, 0.9, -0.04, 40.0, 1.25, 20.0).generate();
        assert_eq!(table.value(0), 1.0);
        assert_eq!(table.value(1), 0.86);
        assert_eq!(table.value(2), 0.734);
        assert_eq!(table.upgrade_cost(1), Some(70.0));
    }

    #[test]
    fn mid_range_values_keep_one_decimal() {
        let table = LevelCurve::new(3, 1.0, 1.4, 0.0, 20.0, 1.6, 5.0).generate();
        assert_eq!(table.value(1), 1.4);
        assert_eq!(table.value(2), 2.0);
        assert_eq!(table.upgrade_cost(1), Some(37.0));
    }

    #[test]
    fn value_past_the_end_reads_last_level() {
        let table = LevelCurve::new(2, 10.0, 2.0, 0.0, 1.0, 1.0, 0.0).generate();
        assert_eq!(table.value(7), 20.0);
        assert_eq!(LevelTable::default().value(0), 0.0);
    }

    #[test]
    fn attack_damage_grows_exponentially() {
        let attack = AttackConfig::default();
        assert_eq!(attack.schedule(0, 0, 0).damage, 100.0);
        assert_eq!(attack.schedule(60, 1, 0).damage, 110.0);
        assert_eq!(attack.schedule(120, 2, 0).damage, 121.0);
        assert_eq!(attack.schedule(0, 0, 2).damage, 121.0);
        assert_eq!(attack.schedule(60, 1, 0).lands_at(), 120);
    }

    #[test]
    fn default_tuning_matches_base_capacity_curve() {
        let tuning = Tuning::default();
        assert_eq!(tuning.levels.base.capacity.len(), 20);
        assert_eq!(tuning.levels.base.capacity.value(0), 1000.0);
        assert_eq!(tuning.levels.base.capacity.value(1), 1600.0);
        assert_eq!(tuning.levels.train.energy_capacity.len(), 5);
    }

    #[test]
    fn purchase_cost_rounds_growth() {
        let tuning = Tuning::default();
        assert_eq!(tuning.purchase_cost(PurchaseKind::Track, 0), 2.0);
        assert_eq!(tuning.purchase_cost(PurchaseKind::Track, 3), 3.0);
        assert_eq!(tuning.purchase_cost(PurchaseKind::Train, 1), 180.0);
        assert_eq!(tuning.purchase_cost(PurchaseKind::Accumulator, 2), 98.0);
    }
}
