//! Scripted autoplay used for soak runs without a window.

use path_defence_core::{
    Event, GameOutcome, Point, StatusSnapshot, TowerKind, UpgradeCategory, WavePhase,
};
use path_defence_simulation::Simulation;
use path_defence_system_builder::{BuilderInput, Selection, SELECT_RADIUS};
use path_defence_world::query;
use tracing::{debug, info};

/// Tower layout built along the classic route, in purchase order.
pub const CLASSIC_LAYOUT: [(TowerKind, f32, f32); 6] = [
    (TowerKind::Basic, 100.0, 200.0),
    (TowerKind::Basic, 225.0, 200.0),
    (TowerKind::Rapid, 400.0, 300.0),
    (TowerKind::Sniper, 575.0, 200.0),
    (TowerKind::Freeze, 400.0, 250.0),
    (TowerKind::Basic, 730.0, 200.0),
];

/// Limits of a headless run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HeadlessOptions {
    /// Frames to simulate before stopping.
    pub max_ticks: u64,
    /// Completed waves after which the run stops.
    pub max_waves: u32,
}

impl Default for HeadlessOptions {
    fn default() -> Self {
        Self {
            max_ticks: 36_000,
            max_waves: 10,
        }
    }
}

/// Totals gathered while a headless run played out.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HeadlessSummary {
    /// Frames simulated.
    pub ticks: u64,
    /// Waves fully cleared.
    pub waves_completed: u32,
    /// Towers constructed by the autopilot.
    pub towers_built: u32,
    /// Upgrades purchased by the autopilot.
    pub upgrades_bought: u32,
    /// Enemies destroyed.
    pub kills: u32,
    /// Enemies that reached the exit.
    pub leaks: u32,
    /// Counters when the run stopped.
    pub status: StatusSnapshot,
    /// Final result if the run was lost.
    pub outcome: Option<GameOutcome>,
}

impl HeadlessSummary {
    fn new(status: StatusSnapshot) -> Self {
        Self {
            ticks: 0,
            waves_completed: 0,
            towers_built: 0,
            upgrades_bought: 0,
            kills: 0,
            leaks: 0,
            status,
            outcome: None,
        }
    }

    fn tally(&mut self, events: &[Event]) {
        for event in events {
            match event {
                Event::WaveCompleted { .. } => self.waves_completed += 1,
                Event::TowerPlaced { .. } => self.towers_built += 1,
                Event::TowerUpgraded { .. } => self.upgrades_bought += 1,
                Event::EnemyKilled { .. } => self.kills += 1,
                Event::EnemyLeaked { .. } => self.leaks += 1,
                _ => {}
            }
        }
    }
}

/// Player stand-in that builds a fixed layout, then buys damage upgrades
/// round-robin, and starts every wave as soon as the previous one is over.
#[derive(Clone, Debug)]
pub struct Autopilot {
    layout: Vec<(TowerKind, Point)>,
    next_slot: usize,
    built: Vec<Point>,
    next_upgrade: usize,
}

impl Autopilot {
    /// Creates an autopilot that builds `layout` in order.
    #[must_use]
    pub fn new(layout: Vec<(TowerKind, Point)>) -> Self {
        Self {
            layout,
            next_slot: 0,
            built: Vec::new(),
            next_upgrade: 0,
        }
    }

    /// Autopilot building [`CLASSIC_LAYOUT`].
    #[must_use]
    pub fn classic() -> Self {
        Self::new(
            CLASSIC_LAYOUT
                .iter()
                .map(|&(kind, x, y)| (kind, Point::new(x, y)))
                .collect(),
        )
    }

    /// Issues this frame's player actions and returns the resulting events.
    pub fn act(&mut self, simulation: &mut Simulation) -> Vec<Event> {
        let mut events = Vec::new();
        let status = simulation.status();
        if status.game_over {
            return events;
        }

        if status.phase == WavePhase::Idle {
            events.extend(simulation.start_wave());
        }

        if let Some(&(kind, position)) = self.layout.get(self.next_slot) {
            if status.currency >= kind.cost() {
                events.extend(self.build(simulation, kind, position));
            }
        } else {
            events.extend(self.upgrade(simulation, status.currency));
        }

        events
    }

    fn build(
        &mut self,
        simulation: &mut Simulation,
        kind: TowerKind,
        position: Point,
    ) -> Vec<Event> {
        let select_kind = if simulation.selection() == Selection::Kind(kind) {
            None
        } else {
            Some(kind)
        };
        let events = simulation.handle_input(BuilderInput {
            select_kind,
            click: Some(position),
            ..BuilderInput::default()
        });

        for event in &events {
            match event {
                Event::TowerPlaced { .. } => {
                    self.built.push(position);
                    self.next_slot += 1;
                }
                Event::TowerPlacementRejected { reason, .. } => {
                    debug!(?kind, ?reason, "skipping unbuildable layout slot");
                    self.next_slot += 1;
                }
                _ => {}
            }
        }
        events
    }

    fn upgrade(&mut self, simulation: &mut Simulation, currency: u32) -> Vec<Event> {
        if self.built.is_empty() {
            return Vec::new();
        }
        let position = self.built[self.next_upgrade % self.built.len()];
        let world = simulation.world();
        let Some(tower) = query::tower_at(world, position, SELECT_RADIUS) else {
            self.next_upgrade += 1;
            return Vec::new();
        };
        let affordable = query::upgrade_cost(world, tower, UpgradeCategory::Damage)
            .is_some_and(|cost| cost <= currency);
        if !affordable {
            return Vec::new();
        }

        self.next_upgrade += 1;
        simulation.handle_input(BuilderInput {
            click: Some(position),
            upgrade: Some(UpgradeCategory::Damage),
            ..BuilderInput::default()
        })
    }
}

/// Plays `simulation` with `autopilot` until a limit is hit or the run is lost.
pub fn run(
    simulation: &mut Simulation,
    autopilot: &mut Autopilot,
    options: HeadlessOptions,
) -> HeadlessSummary {
    let mut summary = HeadlessSummary::new(simulation.status());

    while summary.ticks < options.max_ticks && summary.waves_completed < options.max_waves {
        if simulation.status().game_over {
            break;
        }
        let events = autopilot.act(simulation);
        summary.tally(&events);

        let report = simulation.tick();
        summary.tally(&report.events);
        summary.ticks += 1;
    }

    summary.status = simulation.status();
    summary.outcome = simulation.outcome();

    info!(
        ticks = summary.ticks,
        waves = summary.waves_completed,
        towers = summary.towers_built,
        upgrades = summary.upgrades_bought,
        kills = summary.kills,
        leaks = summary.leaks,
        score = summary.status.score,
        lives = summary.status.lives,
        game_over = summary.status.game_over,
        "headless run finished"
    );
    summary
}
