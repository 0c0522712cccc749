//! Resting state of the wave machine.

use path_defence_core::WavePhase;

use crate::config::WaveConfig;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct WaveState {
    pub(crate) number: u32,
    pub(crate) phase: WavePhase,
    pub(crate) spawned: u32,
    pub(crate) quota: u32,
}

impl WaveState {
    pub(crate) fn new(config: &WaveConfig) -> Self {
        Self {
            number: 1,
            phase: WavePhase::Idle,
            spawned: 0,
            quota: config.quota_for(1),
        }
    }

    pub(crate) fn can_spawn(&self) -> bool {
        self.phase == WavePhase::Spawning && self.spawned < self.quota
    }

    /// The wave may close once spawning is over and nobody is left alive.
    pub(crate) fn can_complete(&self, live_enemies: usize) -> bool {
        self.phase == WavePhase::Clearing && self.spawned >= self.quota && live_enemies == 0
    }
}
