#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Single owner of a running Railway Tycoon game.
//!
//! A [`Session`] holds the current world snapshot together with the seeded
//! random source, the fixed-cadence clock and the configuration used to
//! regenerate the world on restart. Hosts forward input as [`Command`] values
//! and frame time through [`Session::advance`]; renderers read
//! [`Session::world`].

mod config;

use std::{path::Path, sync::Arc, time::Duration};

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use railway_tycoon_core::Command;
use railway_tycoon_system_clock::TickClock;
use railway_tycoon_system_generator::Generator;
use railway_tycoon_world::{self as world, query, World};
use tracing::info;

pub use config::{ConfigError, SessionConfig};

/// A running game and everything needed to drive it.
#[derive(Debug)]
pub struct Session {
    config: SessionConfig,
    generator: Generator,
    rng: ChaCha8Rng,
    clock: TickClock,
    world: Arc<World>,
}

impl Session {
    /// Starts a game from `config`, seeding the random source from it.
    ///
    /// The configuration is validated first, so a grid that cannot hold the
    /// base never reaches the generator.
    pub fn new(config: SessionConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let generator = Generator::new(config.generator.clone(), &config.tuning);
        let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
        let world = generator.generate(config.width, config.height, config.difficulty, &mut rng);
        info!(
            width = config.width,
            height = config.height,
            difficulty = config.difficulty,
            seed = config.seed,
            "session started"
        );
        Ok(Self {
            config,
            generator,
            rng,
            clock: TickClock::new(),
            world,
        })
    }

    /// Loads the configuration file at `path` and starts a game from it.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        SessionConfig::load(path).and_then(Self::new)
    }

    /// Configuration the session was started with.
    #[must_use]
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Current world snapshot.
    #[must_use]
    pub fn world(&self) -> &Arc<World> {
        &self.world
    }

    /// Applies `command` to the current snapshot.
    ///
    /// Returns whether the snapshot was replaced. [`Command::Restart`] always
    /// replaces it with a freshly generated world.
    pub fn dispatch(&mut self, command: Command) -> bool {
        if matches!(command, Command::Restart) {
            self.restart();
            return true;
        }
        let next = world::apply(&self.world, command, &mut self.rng);
        if Arc::ptr_eq(&next, &self.world) {
            return false;
        }
        self.world = next;
        true
    }

    /// Credits one frame of wall-clock time and runs every tick that became
    /// due. Returns the number of ticks run.
    pub fn advance(&mut self, elapsed: Duration) -> u32 {
        let owed = self
            .clock
            .advance(elapsed, query::tick_refresh_rate(&self.world));
        for _ in 0..owed {
            self.world = world::tick(&self.world, &mut self.rng);
        }
        owed
    }

    /// Discards the current game and generates a new one with the same
    /// dimensions and difficulty.
    pub fn restart(&mut self) {
        let (width, height) = query::dimensions(&self.world);
        let difficulty = query::difficulty(&self.world);
        self.world = self
            .generator
            .generate(width, height, difficulty, &mut self.rng);
        self.clock.reset();
        info!(width, height, difficulty, "session restarted");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejected_command_keeps_snapshot() {
        let mut session =
            Session::new(SessionConfig::default()).expect("default config is valid");
        let before = Arc::clone(session.world());
        assert!(!session.dispatch(Command::MouseUp));
        assert!(!session.dispatch(Command::Close));
        assert!(!session.dispatch(Command::MouseMove { cell: None }));
        assert!(Arc::ptr_eq(&before, session.world()));
    }

    #[test]
    fn invalid_config_is_rejected_before_generation() {
        let config = SessionConfig {
            width: 0,
            height: 0,
            ..SessionConfig::default()
        };
        let error = Session::new(config).expect_err("empty grid");
        assert!(matches!(
            error,
            ConfigError::InvalidDimensions {
                width: 0,
                height: 0,
                ..
            }
        ));
    }

    #[test]
    fn restart_resets_progress() {
        let mut session =
            Session::new(SessionConfig::default()).expect("default config is valid");
        for _ in 0..20 {
            assert!(session.dispatch(Command::Tick));
        }
        assert_eq!(query::tick_index(session.world()), 20);
        assert!(session.dispatch(Command::Restart));
        assert_eq!(query::tick_index(session.world()), 0);
        assert_eq!(query::dimensions(session.world()), (12, 12));
    }
}
