#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Frame driver that wires the world and its pure systems into a fixed
//! per-tick order.
//!
//! Each [`Simulation::tick`] runs: time advance, wave director spawns,
//! targeting and firing, enemy movement, projectile resolution, then wave
//! completion. Player requests made between ticks go through the builder
//! system and are applied immediately.

use path_defence_core::{
    Command, Event, GameOutcome, PathError, StatusSnapshot, TowerId, TowerTarget,
};
use path_defence_system_builder::{Builder, BuilderInput, Selection, SELECT_RADIUS};
use path_defence_system_tower_combat::TowerCombat;
use path_defence_system_tower_targeting::TowerTargeting;
use path_defence_system_wave_director::{Config as WaveDirectorConfig, WaveDirector};
use path_defence_world::{self as world, query, GameConfig, World};
use tracing::{debug, info};

/// Everything that changed during a single frame.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameReport {
    /// Events broadcast by the world, in the order they happened.
    pub events: Vec<Event>,
    /// Counters after the frame completed.
    pub status: StatusSnapshot,
    /// Final result once the run has ended.
    pub outcome: Option<GameOutcome>,
}

/// Owns the world and every system that drives it.
#[derive(Debug)]
pub struct Simulation {
    world: World,
    wave_director: WaveDirector,
    tower_targeting: TowerTargeting,
    tower_combat: TowerCombat,
    builder: Builder,
    targets: Vec<TowerTarget>,
    commands: Vec<Command>,
}

impl Simulation {
    /// Creates a simulation for a fresh run.
    pub fn new(config: GameConfig) -> Result<Self, PathError> {
        let wave_director =
            WaveDirector::new(WaveDirectorConfig::new(config.waves.spawn_probability, config.seed));
        let world = World::new(config)?;
        info!(banner = query::welcome_banner(&world), "simulation ready");
        Ok(Self {
            world,
            wave_director,
            tower_targeting: TowerTargeting::new(),
            tower_combat: TowerCombat::new(),
            builder: Builder::new(),
            targets: Vec::new(),
            commands: Vec::new(),
        })
    }

    /// Read-only access to the authoritative world.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Counters mirrored by the HUD.
    #[must_use]
    pub fn status(&self) -> StatusSnapshot {
        query::status(&self.world)
    }

    /// Final result once the last life was lost.
    #[must_use]
    pub fn outcome(&self) -> Option<GameOutcome> {
        query::outcome(&self.world)
    }

    /// Current player selection.
    #[must_use]
    pub fn selection(&self) -> Selection {
        self.builder.selection()
    }

    /// Tower currently selected by the player, if any.
    #[must_use]
    pub fn selected_tower(&self) -> Option<TowerId> {
        self.builder.selected_tower()
    }

    /// Advances the simulation by one frame.
    ///
    /// A paused or finished run is left untouched and reports no events.
    pub fn tick(&mut self) -> FrameReport {
        let mut events = Vec::new();
        let status = self.status();
        if status.paused || status.game_over {
            return self.report(events);
        }

        world::apply(&mut self.world, Command::Tick, &mut events);

        self.wave_director.handle(
            &events,
            &query::status(&self.world),
            query::live_enemy_count(&self.world),
            &mut self.commands,
        );
        self.flush_commands(&mut events);

        self.tower_targeting.handle(
            &query::tower_view(&self.world),
            &query::enemy_view(&self.world),
            &mut self.targets,
        );
        self.tower_combat.handle(
            query::tower_cooldowns(&self.world),
            &self.targets,
            &mut self.commands,
        );
        self.flush_commands(&mut events);

        world::apply(&mut self.world, Command::AdvanceEnemies, &mut events);
        world::apply(&mut self.world, Command::ResolveProjectiles, &mut events);

        self.wave_director.handle(
            &[],
            &query::status(&self.world),
            query::live_enemy_count(&self.world),
            &mut self.commands,
        );
        self.flush_commands(&mut events);

        self.builder.observe(&events);
        self.report(events)
    }

    /// Routes a frame of player input through the builder and applies the
    /// resulting commands immediately.
    pub fn handle_input(&mut self, input: BuilderInput) -> Vec<Event> {
        let world = &self.world;
        self.builder.handle(
            &[],
            input,
            |point| query::tower_at(world, point, SELECT_RADIUS),
            &mut self.commands,
        );

        let mut events = Vec::new();
        self.flush_commands(&mut events);
        self.builder.observe(&events);
        events
    }

    /// Starts the next wave if the previous one is over.
    pub fn start_wave(&mut self) -> Vec<Event> {
        self.submit(Command::StartWave)
    }

    /// Pauses or resumes the simulation.
    pub fn set_paused(&mut self, paused: bool) -> Vec<Event> {
        self.submit(Command::SetPaused { paused })
    }

    /// Flips the pause flag.
    pub fn toggle_pause(&mut self) -> Vec<Event> {
        let paused = self.status().paused;
        self.set_paused(!paused)
    }

    /// Tears the run down and restores the initial state, replaying the same
    /// random draws as the first run.
    pub fn restart(&mut self) -> Vec<Event> {
        self.wave_director.reset();
        self.targets.clear();
        self.submit(Command::ResetRun)
    }

    fn submit(&mut self, command: Command) -> Vec<Event> {
        let mut events = Vec::new();
        world::apply(&mut self.world, command, &mut events);
        self.builder.observe(&events);
        events
    }

    fn flush_commands(&mut self, events: &mut Vec<Event>) {
        for command in self.commands.drain(..) {
            debug!(?command, "applying command");
            world::apply(&mut self.world, command, events);
        }
    }

    fn report(&self, events: Vec<Event>) -> FrameReport {
        FrameReport {
            events,
            status: self.status(),
            outcome: self.outcome(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use path_defence_core::{Point, TowerKind, WavePhase};

    #[test]
    fn new_simulation_is_idle() {
        let simulation = Simulation::new(GameConfig::default()).expect("default path is valid");
        let status = simulation.status();
        assert_eq!(status.phase, WavePhase::Idle);
        assert_eq!(status.tick, 0);
        assert_eq!(simulation.selection(), Selection::None);
        assert!(simulation.outcome().is_none());
    }

    #[test]
    fn invalid_path_is_reported() {
        let config = GameConfig {
            path: Vec::new(),
            ..GameConfig::default()
        };
        assert!(Simulation::new(config).is_err());
    }

    #[test]
    fn idle_tick_only_advances_time() {
        let mut simulation = Simulation::new(GameConfig::default()).expect("default path is valid");
        let report = simulation.tick();
        assert_eq!(report.events, vec![Event::TimeAdvanced { tick: 1 }]);
        assert_eq!(report.status.tick, 1);
    }

    #[test]
    fn toggle_pause_flips_the_flag() {
        let mut simulation = Simulation::new(GameConfig::default()).expect("default path is valid");
        assert_eq!(
            simulation.toggle_pause(),
            vec![Event::PauseChanged { paused: true }]
        );
        assert_eq!(
            simulation.toggle_pause(),
            vec![Event::PauseChanged { paused: false }]
        );
    }

    #[test]
    fn input_is_applied_immediately() {
        let mut simulation = Simulation::new(GameConfig::default()).expect("default path is valid");
        let events = simulation.handle_input(BuilderInput {
            select_kind: Some(TowerKind::Basic),
            click: Some(Point::new(60.0, 300.0)),
            ..BuilderInput::default()
        });
        assert!(matches!(events.as_slice(), [Event::TowerPlaced { .. }]));
        assert_eq!(simulation.selection(), Selection::None);
        assert_eq!(simulation.status().currency, 100);
    }
}
