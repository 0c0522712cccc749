#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic wave director responsible for emitting spawn and wave
//! completion commands.

use path_defence_core::{Command, Event, StatusSnapshot, WavePhase};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Configuration parameters required to construct the wave director.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    spawn_probability: f32,
    rng_seed: u64,
}

impl Config {
    /// Creates a new configuration using the provided per-tick spawn chance
    /// and seed.
    #[must_use]
    pub const fn new(spawn_probability: f32, rng_seed: u64) -> Self {
        Self {
            spawn_probability,
            rng_seed,
        }
    }
}

/// Pure system that rolls enemy spawns and closes out cleared waves.
#[derive(Debug)]
pub struct WaveDirector {
    spawn_probability: f32,
    rng_seed: u64,
    rng: ChaCha8Rng,
}

impl WaveDirector {
    /// Creates a new wave director using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            spawn_probability: config.spawn_probability,
            rng_seed: config.rng_seed,
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
        }
    }

    /// Rewinds the generator so a restarted run replays the same draws.
    pub fn reset(&mut self) {
        self.rng = ChaCha8Rng::seed_from_u64(self.rng_seed);
    }

    /// Consumes events and the current wave counters to emit commands.
    ///
    /// One spawn draw is made per `TimeAdvanced` event while the wave is
    /// spawning and below quota. A clearing wave with no live enemies left
    /// is closed out with `CompleteWave`.
    pub fn handle(
        &mut self,
        events: &[Event],
        status: &StatusSnapshot,
        live_enemies: usize,
        out: &mut Vec<Command>,
    ) {
        if status.game_over || status.paused {
            return;
        }

        match status.phase {
            WavePhase::Idle => {}
            WavePhase::Spawning => {
                let mut remaining = status.quota.saturating_sub(status.spawned);
                for event in events {
                    if remaining == 0 {
                        break;
                    }
                    if matches!(event, Event::TimeAdvanced { .. }) && self.roll_spawn() {
                        out.push(Command::SpawnEnemy);
                        remaining -= 1;
                    }
                }
            }
            WavePhase::Clearing => {
                if live_enemies == 0 && status.spawned >= status.quota {
                    out.push(Command::CompleteWave);
                }
            }
        }
    }

    fn roll_spawn(&mut self) -> bool {
        self.rng.gen::<f32>() < self.spawn_probability
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_probability_never_spawns() {
        let mut director = WaveDirector::new(Config::new(0.0, 11));
        assert!((0..1_000).all(|_| !director.roll_spawn()));
    }

    #[test]
    fn certain_probability_always_spawns() {
        let mut director = WaveDirector::new(Config::new(1.0, 11));
        assert!((0..1_000).all(|_| director.roll_spawn()));
    }
}
