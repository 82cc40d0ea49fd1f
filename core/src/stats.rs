//! Per-entity stat records.
//!
//! Each upgradable entity kind owns a small fixed set of stats. The same record
//! type carries level indices on an entity, level curves in configuration, and
//! generated level tables in the tuning, so every consumer addresses a stat
//! through the same enum.

use serde::{Deserialize, Serialize};

use crate::tuning::LevelTable;

macro_rules! stat_record {
    (
        $(#[$record_meta:meta])*
        record $record:ident;
        $(#[$stat_meta:meta])*
        stat $stat:ident {
            $(
                $(#[$field_meta:meta])*
                $field:ident => $variant:ident,
            )+
        }
    ) => {
        $(#[$stat_meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $stat {
            $(
                $(#[$field_meta])*
                $variant,
            )+
        }

        impl $stat {
            /// Every stat of this kind in declaration order.
            pub const ALL: &'static [$stat] = &[$($stat::$variant),+];
        }

        $(#[$record_meta])*
        #[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
        pub struct $record<T> {
            $(
                $(#[$field_meta])*
                #[serde(default)]
                pub $field: T,
            )+
        }

        impl<T> $record<T> {
            /// Borrows the entry stored for `stat`.
            #[must_use]
            pub fn get(&self, stat: $stat) -> &T {
                match stat {
                    $($stat::$variant => &self.$field,)+
                }
            }

            /// Mutably borrows the entry stored for `stat`.
            pub fn get_mut(&mut self, stat: $stat) -> &mut T {
                match stat {
                    $($stat::$variant => &mut self.$field,)+
                }
            }

            /// Builds a record of the same shape by transforming every entry.
            #[must_use]
            pub fn map<U, F>(&self, mut f: F) -> $record<U>
            where
                F: FnMut(&T) -> U,
            {
                $record {
                    $($field: f(&self.$field),)+
                }
            }

            /// Replaces every entry for which `overrides` holds a value.
            #[must_use]
            pub fn overlaid(mut self, overrides: $record<Option<T>>) -> Self {
                $(
                    if let Some(value) = overrides.$field {
                        self.$field = value;
                    }
                )+
                self
            }
        }

        impl $record<usize> {
            /// Resolves every level index against `tables`.
            #[must_use]
            pub fn values_in(&self, tables: &$record<LevelTable>) -> $record<f64> {
                $record {
                    $($field: tables.$field.value(self.$field),)+
                }
            }

            /// Price of raising `stat` by one level, or `None` at MAX.
            #[must_use]
            pub fn upgrade_cost_in(&self, tables: &$record<LevelTable>, stat: $stat) -> Option<f64> {
                tables.get(stat).upgrade_cost(*self.get(stat))
            }
        }
    };
}

stat_record! {
    /// Stat record attached to trains.
    record TrainStats;
    /// Upgradable train stats.
    stat TrainStat {
        /// Energy drained from the reserve for every track advanced.
        consumption => Consumption,
        /// Maximum golds a train can carry.
        gold_capacity => GoldCapacity,
        /// Maximum energy a train can carry.
        energy_capacity => EnergyCapacity,
    }
}

stat_record! {
    /// Stat record attached to miners.
    record MinerStats;
    /// Upgradable miner stats.
    stat MinerStat {
        /// Golds extracted per tick.
        speed => Speed,
        /// Maximum golds buffered by the miner.
        capacity => Capacity,
        /// Energy drained per gold extracted.
        consumption => Consumption,
    }
}

stat_record! {
    /// Stat record attached to accumulators.
    record AccumulatorStats;
    /// Upgradable accumulator stats.
    stat AccumulatorStat {
        /// Maximum energy stored by the accumulator.
        capacity => Capacity,
    }
}

stat_record! {
    /// Stat record attached to markets.
    record MarketStats;
    /// Upgradable market stats.
    stat MarketStat {
        /// Exchange rate applied when the player trades at the market.
        trading => Trading,
        /// Maximum golds the market can hold.
        gold_capacity => GoldCapacity,
        /// Maximum energy the market can hold.
        energy_capacity => EnergyCapacity,
    }
}

stat_record! {
    /// Stat record attached to the base.
    record BaseStats;
    /// Upgradable base stats.
    stat BaseStat {
        /// Ceiling of the global energy reserve that trains can refill.
        capacity => Capacity,
    }
}

stat_record! {
    /// Record keyed by purchasable entity kind.
    record PurchaseTable;
    /// Entity kinds the player can buy.
    stat PurchaseKind {
        /// A single track cell.
        track => Track,
        /// A train attached to a track.
        train => Train,
        /// A miner attached to a mine.
        miner => Miner,
        /// An accumulator placed on a free cell.
        accumulator => Accumulator,
    }
}
