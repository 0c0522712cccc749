#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Path Defence.

mod config;
mod economy;
mod effects;
mod enemies;
mod projectiles;
mod towers;
mod waves;

pub use config::{
    CombatConfig, EconomyConfig, FieldConfig, GameConfig, PlacementConfig, UpgradeConfig,
    WaveConfig,
};

use path_defence_core::{
    Command, EnemyId, EnemyStats, Event, GameOutcome, Path, PathError, PlacementError, Point,
    SaleError, TowerId, TowerKind, TowerSpecial, UpgradeCategory, UpgradeError, WavePhase,
    WELCOME_BANNER,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info};

use economy::Economy;
use effects::EffectPool;
use enemies::{EnemyFate, EnemyRegistry};
use projectiles::{Launch, ProjectileRegistry};
use towers::TowerRegistry;
use waves::WaveState;

/// Stream reserved for status-effect rolls so they never share draws with
/// other consumers of the run seed.
const STATUS_ROLL_STREAM: u64 = 7;

/// Represents the authoritative Path Defence world state.
#[derive(Debug)]
pub struct World {
    banner: &'static str,
    config: GameConfig,
    path: Path,
    towers: TowerRegistry,
    enemies: EnemyRegistry,
    projectiles: ProjectileRegistry,
    effects: EffectPool,
    economy: Economy,
    wave: WaveState,
    paused: bool,
    outcome: Option<GameOutcome>,
    tick_index: u64,
    rng: ChaCha8Rng,
}

impl World {
    /// Creates a world for a fresh run using the provided rules.
    ///
    /// Fails when the configured path cannot be traversed.
    pub fn new(config: GameConfig) -> Result<Self, PathError> {
        let path = Path::new(config.path.clone())?;
        Ok(Self {
            banner: WELCOME_BANNER,
            towers: TowerRegistry::new(),
            enemies: EnemyRegistry::new(),
            projectiles: ProjectileRegistry::new(),
            effects: EffectPool::default(),
            economy: Economy::new(&config.economy),
            wave: WaveState::new(&config.waves),
            paused: false,
            outcome: None,
            tick_index: 0,
            rng: status_rng(config.seed),
            path,
            config,
        })
    }

    fn reset(&mut self) {
        self.towers = TowerRegistry::new();
        self.enemies = EnemyRegistry::new();
        self.projectiles = ProjectileRegistry::new();
        self.effects.clear();
        self.economy = Economy::new(&self.config.economy);
        self.wave = WaveState::new(&self.config.waves);
        self.paused = false;
        self.outcome = None;
        self.tick_index = 0;
        self.rng = status_rng(self.config.seed);
    }

    /// Tick-driven commands are ignored while paused or after the run ended.
    fn is_frozen(&self) -> bool {
        self.paused || self.outcome.is_some()
    }

    fn in_field(&self, position: Point) -> bool {
        let field = &self.config.field;
        position.x().is_finite()
            && position.y().is_finite()
            && (0.0..=field.width).contains(&position.x())
            && (0.0..=field.height).contains(&position.y())
    }

    fn placement_error(&self, kind: TowerKind, position: Point) -> Option<PlacementError> {
        let placement = &self.config.placement;
        if self.outcome.is_some() {
            Some(PlacementError::GameOver)
        } else if !self.in_field(position) {
            Some(PlacementError::OutOfBounds)
        } else if self.economy.currency < kind.cost() {
            Some(PlacementError::InsufficientFunds)
        } else if self.path.is_on_path(position, placement.path_buffer) {
            Some(PlacementError::OnPath)
        } else if self
            .towers
            .iter()
            .any(|tower| tower.position.distance(position) < placement.tower_spacing)
        {
            Some(PlacementError::Overlapping)
        } else {
            None
        }
    }

    fn place_tower(&mut self, kind: TowerKind, position: Point, out_events: &mut Vec<Event>) {
        if let Some(reason) = self.placement_error(kind, position) {
            debug!(?kind, ?position, %reason, "tower placement rejected");
            out_events.push(Event::TowerPlacementRejected {
                kind,
                position,
                reason,
            });
            return;
        }

        let cost = kind.cost();
        self.economy.debit(cost);
        let tower = self.towers.insert(kind, position);
        debug!(tower = tower.get(), ?kind, cost, "tower placed");
        out_events.push(Event::TowerPlaced {
            tower,
            kind,
            position,
            cost,
        });
    }

    fn upgrade_tower(
        &mut self,
        tower: TowerId,
        category: UpgradeCategory,
        out_events: &mut Vec<Event>,
    ) {
        let reject = |reason: UpgradeError, out_events: &mut Vec<Event>| {
            debug!(tower = tower.get(), ?category, %reason, "tower upgrade rejected");
            out_events.push(Event::TowerUpgradeRejected {
                tower,
                category,
                reason,
            });
        };

        if self.outcome.is_some() {
            reject(UpgradeError::GameOver, out_events);
            return;
        }
        let Some(level) = self.towers.get(tower).map(|state| state.level) else {
            reject(UpgradeError::MissingTower, out_events);
            return;
        };

        let cost = economy::upgrade_cost(&self.config.upgrades, category, level);
        if !self.economy.try_debit(cost) {
            reject(UpgradeError::InsufficientFunds, out_events);
            return;
        }

        if let Some(state) = self.towers.get_mut(tower) {
            state.apply_upgrade(category, cost);
            out_events.push(Event::TowerUpgraded {
                tower,
                category,
                level: state.level,
                cost,
            });
        }
    }

    fn sell_tower(&mut self, tower: TowerId, out_events: &mut Vec<Event>) {
        let reason = if self.outcome.is_some() {
            SaleError::GameOver
        } else if let Some(state) = self.towers.remove(tower) {
            let refund = economy::sell_value(
                &self.config.upgrades,
                state.kind,
                state.level,
                state.invested,
            );
            self.economy.credit(refund);
            debug!(tower = tower.get(), refund, "tower sold");
            out_events.push(Event::TowerSold { tower, refund });
            return;
        } else {
            SaleError::MissingTower
        };

        debug!(tower = tower.get(), %reason, "tower sale rejected");
        out_events.push(Event::TowerSaleRejected { tower, reason });
    }

    fn start_wave(&mut self, out_events: &mut Vec<Event>) {
        if self.outcome.is_some() || self.wave.phase != WavePhase::Idle {
            debug!(phase = ?self.wave.phase, "start wave ignored");
            return;
        }

        self.wave.quota = self.config.waves.quota_for(self.wave.number);
        self.wave.spawned = 0;
        self.wave.phase = WavePhase::Spawning;
        info!(wave = self.wave.number, quota = self.wave.quota, "wave started");
        out_events.push(Event::WaveStarted {
            wave: self.wave.number,
            quota: self.wave.quota,
        });
    }

    fn spawn_enemy(&mut self, out_events: &mut Vec<Event>) {
        if self.is_frozen() || !self.wave.can_spawn() {
            return;
        }

        let stats = EnemyStats::for_wave(self.wave.number);
        let enemy = self.enemies.spawn(stats, self.path.start());
        self.wave.spawned = self.wave.spawned.saturating_add(1);
        out_events.push(Event::EnemySpawned {
            enemy,
            tier: stats.tier,
            spawned: self.wave.spawned,
            quota: self.wave.quota,
        });

        if self.wave.spawned >= self.wave.quota {
            self.wave.phase = WavePhase::Clearing;
            debug!(wave = self.wave.number, "wave finished spawning");
            out_events.push(Event::WaveSpawningFinished {
                wave: self.wave.number,
            });
        }
    }

    fn complete_wave(&mut self, out_events: &mut Vec<Event>) {
        if self.outcome.is_some() || !self.wave.can_complete(self.enemies.live_count()) {
            return;
        }

        let completed = self.wave.number;
        self.wave.number = completed.saturating_add(1);
        let bonus = self
            .wave
            .number
            .saturating_mul(self.config.economy.wave_bonus_per_wave);
        self.economy.credit(bonus);
        self.wave.phase = WavePhase::Idle;
        self.wave.spawned = 0;
        self.wave.quota = self.config.waves.quota_for(self.wave.number);
        info!(wave = completed, bonus, "wave completed");
        out_events.push(Event::WaveCompleted {
            wave: completed,
            bonus,
            next_quota: self.wave.quota,
        });
    }

    fn fire_projectile(
        &mut self,
        tower: TowerId,
        target: EnemyId,
        out_events: &mut Vec<Event>,
    ) {
        if self.is_frozen() {
            return;
        }

        let Some(enemy_position) = self
            .enemies
            .get(target)
            .filter(|enemy| enemy.is_alive())
            .map(|enemy| enemy.position)
        else {
            debug!(tower = tower.get(), enemy = target.get(), "fire ignored: target gone");
            return;
        };
        let Some(state) = self.towers.get_mut(tower) else {
            return;
        };
        if state.cooldown_ticks > 0 || !state.in_range(enemy_position) {
            debug!(tower = tower.get(), enemy = target.get(), "fire ignored: not ready");
            return;
        }

        state.cooldown_ticks = state.fire_rate_ticks;
        let projectile = self.projectiles.launch(Launch {
            owner: tower,
            kind: state.kind,
            target,
            origin: state.position,
            damage: state.damage,
            speed: self.config.combat.projectile_speed,
        });
        out_events.push(Event::ProjectileFired {
            projectile,
            tower,
            target,
        });
    }

    fn advance_enemies(&mut self, out_events: &mut Vec<Event>) {
        if self.is_frozen() {
            return;
        }

        let slow_factor = self.config.combat.slow_factor;
        for enemy in self.enemies.iter_mut() {
            if !enemy.is_alive() {
                continue;
            }
            if enemy.freeze_ticks > 0 {
                enemy.freeze_ticks -= 1;
                continue;
            }

            let mut speed = enemy.speed;
            if enemy.slow_ticks > 0 {
                speed *= slow_factor;
                enemy.slow_ticks -= 1;
            }

            let advance = self.path.advance(enemy.path_position, speed);
            enemy.path_position = advance.position;
            enemy.progress += advance.travelled;
            enemy.position = self.path.point_at(advance.position);
            if !advance.finished {
                continue;
            }

            enemy.fate = EnemyFate::Leaked;
            let lives_remaining = self.economy.lose_life();
            out_events.push(Event::EnemyLeaked {
                enemy: enemy.id,
                lives_remaining,
            });

            if lives_remaining == 0 {
                let outcome = GameOutcome {
                    final_score: self.economy.score,
                    wave: self.wave.number,
                };
                info!(score = outcome.final_score, wave = outcome.wave, "game over");
                self.outcome = Some(outcome);
                out_events.push(Event::GameOver { outcome });
                break;
            }
        }

        self.enemies.compact();
    }

    fn resolve_projectiles(&mut self, out_events: &mut Vec<Event>) {
        if self.is_frozen() {
            return;
        }

        let combat = &self.config.combat;
        for projectile in self.projectiles.iter_mut() {
            let Some(enemy) = self
                .enemies
                .get_mut(projectile.target)
                .filter(|enemy| enemy.is_alive())
            else {
                projectile.spent = true;
                out_events.push(Event::ProjectileExpired {
                    projectile: projectile.id,
                });
                continue;
            };

            if projectile.position.distance(enemy.position) >= combat.contact_radius {
                projectile.position = projectile
                    .position
                    .step_toward(enemy.position, projectile.speed);
                continue;
            }

            projectile.spent = true;
            let lethal = enemy.take_damage(projectile.damage);
            let mut slowed = false;
            let mut frozen = false;
            if projectile.kind.special() == Some(TowerSpecial::Freeze) {
                enemy.slow_ticks = combat.slow_ticks;
                slowed = true;
                if self.rng.gen::<f32>() < combat.freeze_chance {
                    enemy.freeze_ticks = combat.freeze_ticks;
                    frozen = true;
                }
            }
            self.effects.spawn(enemy.position, combat.hit_effect_ticks);
            out_events.push(Event::EnemyHit {
                enemy: enemy.id,
                projectile: projectile.id,
                damage: projectile.damage,
                remaining_hp: enemy.hp,
                slowed,
                frozen,
            });

            if lethal {
                enemy.fate = EnemyFate::Killed;
                let score = self.economy.award_kill(enemy.reward);
                let credited = self.towers.get_mut(projectile.owner).map(|tower| {
                    tower.kills = tower.kills.saturating_add(1);
                    tower.id
                });
                out_events.push(Event::EnemyKilled {
                    enemy: enemy.id,
                    tower: credited,
                    reward: enemy.reward,
                    score,
                });
            }
        }

        self.projectiles.compact();
        self.enemies.compact();
    }
}

fn status_rng(seed: u64) -> ChaCha8Rng {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    rng.set_stream(STATUS_ROLL_STREAM);
    rng
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::Tick => {
            if world.is_frozen() {
                return;
            }
            world.tick_index = world.tick_index.saturating_add(1);
            for tower in world.towers.iter_mut() {
                tower.cooldown_ticks = tower.cooldown_ticks.saturating_sub(1);
            }
            world.effects.age();
            out_events.push(Event::TimeAdvanced {
                tick: world.tick_index,
            });
        }
        Command::SetPaused { paused } => {
            if world.outcome.is_some() || world.paused == paused {
                return;
            }
            world.paused = paused;
            info!(paused, "pause toggled");
            out_events.push(Event::PauseChanged { paused });
        }
        Command::StartWave => world.start_wave(out_events),
        Command::SpawnEnemy => world.spawn_enemy(out_events),
        Command::CompleteWave => world.complete_wave(out_events),
        Command::PlaceTower { kind, position } => world.place_tower(kind, position, out_events),
        Command::UpgradeTower { tower, category } => {
            world.upgrade_tower(tower, category, out_events);
        }
        Command::SellTower { tower } => world.sell_tower(tower, out_events),
        Command::FireProjectile { tower, target } => {
            world.fire_projectile(tower, target, out_events);
        }
        Command::AdvanceEnemies => world.advance_enemies(out_events),
        Command::ResolveProjectiles => world.resolve_projectiles(out_events),
        Command::ResetRun => {
            world.reset();
            info!("run reset");
            out_events.push(Event::RunReset);
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use path_defence_core::{
        EffectSnapshot, EnemyView, GameOutcome, Path, Point, ProjectileSnapshot, StatusSnapshot,
        TowerCooldownSnapshot, TowerCooldownView, TowerId, TowerSnapshot, TowerView,
        UpgradeCategory,
    };

    use super::{economy, towers::TowerState, GameConfig, World};

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Rules the world was constructed with.
    #[must_use]
    pub fn config(world: &World) -> &GameConfig {
        &world.config
    }

    /// Route enemies follow.
    #[must_use]
    pub fn path(world: &World) -> &Path {
        &world.path
    }

    /// Counters mirrored by the HUD.
    #[must_use]
    pub fn status(world: &World) -> StatusSnapshot {
        StatusSnapshot {
            currency: world.economy.currency,
            lives: world.economy.lives,
            score: world.economy.score,
            wave: world.wave.number,
            phase: world.wave.phase,
            spawned: world.wave.spawned,
            quota: world.wave.quota,
            paused: world.paused,
            game_over: world.outcome.is_some(),
            tick: world.tick_index,
        }
    }

    /// Final result of the run once the last life was lost.
    #[must_use]
    pub fn outcome(world: &World) -> Option<GameOutcome> {
        world.outcome
    }

    fn tower_snapshot(world: &World, tower: &TowerState) -> TowerSnapshot {
        tower.snapshot(economy::sell_value(
            &world.config.upgrades,
            tower.kind,
            tower.level,
            tower.invested,
        ))
    }

    /// Captures a read-only view of every tower.
    #[must_use]
    pub fn tower_view(world: &World) -> TowerView {
        TowerView::from_snapshots(
            world
                .towers
                .iter()
                .map(|tower| tower_snapshot(world, tower))
                .collect(),
        )
    }

    /// Snapshot of a single tower, if it exists.
    #[must_use]
    pub fn tower(world: &World, tower: TowerId) -> Option<TowerSnapshot> {
        world
            .towers
            .get(tower)
            .map(|state| tower_snapshot(world, state))
    }

    /// Nearest tower whose centre lies within `radius` of `point`.
    #[must_use]
    pub fn tower_at(world: &World, point: Point, radius: f32) -> Option<TowerId> {
        world.towers.nearest_within(point, radius)
    }

    /// Price of the next upgrade in `category` for the provided tower.
    #[must_use]
    pub fn upgrade_cost(world: &World, tower: TowerId, category: UpgradeCategory) -> Option<u32> {
        world
            .towers
            .get(tower)
            .map(|state| economy::upgrade_cost(&world.config.upgrades, category, state.level))
    }

    /// Weapon readiness of every tower.
    #[must_use]
    pub fn tower_cooldowns(world: &World) -> TowerCooldownView {
        TowerCooldownView::from_snapshots(
            world
                .towers
                .iter()
                .map(|tower| TowerCooldownSnapshot {
                    tower: tower.id,
                    ready_in_ticks: tower.cooldown_ticks,
                })
                .collect(),
        )
    }

    /// Captures a read-only view of the live enemies.
    #[must_use]
    pub fn enemy_view(world: &World) -> EnemyView {
        EnemyView::from_snapshots(
            world
                .enemies
                .iter()
                .filter(|enemy| enemy.is_alive())
                .map(|enemy| enemy.snapshot())
                .collect(),
        )
    }

    /// Number of enemies still on the path.
    #[must_use]
    pub fn live_enemy_count(world: &World) -> usize {
        world.enemies.live_count()
    }

    /// Projectiles currently in flight, in launch order.
    #[must_use]
    pub fn projectiles(world: &World) -> Vec<ProjectileSnapshot> {
        world
            .projectiles
            .iter()
            .map(|projectile| projectile.snapshot())
            .collect()
    }

    /// Hit flashes that are still visible.
    #[must_use]
    pub fn effects(world: &World) -> Vec<EffectSnapshot> {
        world.effects.snapshots()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use path_defence_core::EnemyTier;

    fn world_with(config: GameConfig) -> World {
        World::new(config).expect("valid configuration")
    }

    fn rich_config() -> GameConfig {
        GameConfig {
            economy: EconomyConfig {
                starting_currency: 10_000,
                ..EconomyConfig::default()
            },
            ..GameConfig::default()
        }
    }

    fn place(world: &mut World, kind: TowerKind, x: f32, y: f32) -> Vec<Event> {
        let mut events = Vec::new();
        apply(
            world,
            Command::PlaceTower {
                kind,
                position: Point::new(x, y),
            },
            &mut events,
        );
        events
    }

    fn run(world: &mut World, commands: &[Command]) -> Vec<Event> {
        let mut events = Vec::new();
        for command in commands {
            apply(world, command.clone(), &mut events);
        }
        events
    }

    #[test]
    fn new_world_reports_starting_status() {
        let world = world_with(GameConfig::default());
        let status = query::status(&world);
        assert_eq!(status.currency, 150);
        assert_eq!(status.lives, 20);
        assert_eq!(status.score, 0);
        assert_eq!(status.wave, 1);
        assert_eq!(status.phase, WavePhase::Idle);
        assert!(!status.game_over);
        assert_eq!(query::welcome_banner(&world), WELCOME_BANNER);
    }

    #[test]
    fn invalid_path_is_rejected() {
        let config = GameConfig {
            path: vec![Point::new(0.0, 0.0)],
            ..GameConfig::default()
        };
        assert!(matches!(
            World::new(config),
            Err(PathError::TooFewWaypoints { count: 1 })
        ));
    }

    #[test]
    fn placement_debits_cost() {
        let mut world = world_with(GameConfig::default());
        let events = place(&mut world, TowerKind::Basic, 60.0, 300.0);
        assert_eq!(
            events,
            vec![Event::TowerPlaced {
                tower: TowerId::new(0),
                kind: TowerKind::Basic,
                position: Point::new(60.0, 300.0),
                cost: 50,
            }]
        );
        assert_eq!(query::status(&world).currency, 100);
    }

    #[test]
    fn placement_on_path_is_rejected_without_state_change() {
        let mut world = world_with(GameConfig::default());
        let events = place(&mut world, TowerKind::Basic, 100.0, 260.0);
        assert!(matches!(
            events.as_slice(),
            [Event::TowerPlacementRejected {
                reason: PlacementError::OnPath,
                ..
            }]
        ));
        assert_eq!(query::status(&world).currency, 150);
        assert_eq!(query::tower_view(&world).iter().count(), 0);
    }

    #[test]
    fn placement_rejections_cover_funds_bounds_and_overlap() {
        let mut world = world_with(GameConfig::default());
        let reason = |events: Vec<Event>| match events.as_slice() {
            [Event::TowerPlacementRejected { reason, .. }] => Some(*reason),
            _ => None,
        };

        assert_eq!(
            reason(place(&mut world, TowerKind::Basic, -5.0, 300.0)),
            Some(PlacementError::OutOfBounds)
        );
        assert_eq!(reason(place(&mut world, TowerKind::Basic, 60.0, 300.0)), None);
        assert_eq!(
            reason(place(&mut world, TowerKind::Basic, 70.0, 300.0)),
            Some(PlacementError::Overlapping)
        );
        assert_eq!(
            reason(place(&mut world, TowerKind::Freeze, 60.0, 400.0)),
            Some(PlacementError::InsufficientFunds)
        );
        assert_eq!(query::status(&world).currency, 100);
        assert_eq!(query::tower_view(&world).iter().count(), 1);
    }

    #[test]
    fn upgrades_apply_after_debit() {
        let mut world = world_with(rich_config());
        let _ = place(&mut world, TowerKind::Basic, 60.0, 300.0);
        let tower = TowerId::new(0);

        let events = run(
            &mut world,
            &[
                Command::UpgradeTower {
                    tower,
                    category: UpgradeCategory::Damage,
                },
                Command::UpgradeTower {
                    tower,
                    category: UpgradeCategory::Range,
                },
            ],
        );
        assert_eq!(
            events,
            vec![
                Event::TowerUpgraded {
                    tower,
                    category: UpgradeCategory::Damage,
                    level: 2,
                    cost: 30,
                },
                Event::TowerUpgraded {
                    tower,
                    category: UpgradeCategory::Range,
                    level: 3,
                    cost: 35,
                },
            ]
        );
        let snapshot = query::tower(&world, tower).expect("tower exists");
        assert!((snapshot.damage - 1.5).abs() < f32::EPSILON);
        assert!((snapshot.range - 120.0).abs() < f32::EPSILON);
        assert_eq!(snapshot.invested, 115);
        assert_eq!(query::status(&world).currency, 10_000 - 50 - 30 - 35);
    }

    #[test]
    fn unaffordable_upgrade_changes_nothing() {
        let mut world = world_with(GameConfig::default());
        let _ = place(&mut world, TowerKind::Sniper, 60.0, 300.0);
        let tower = TowerId::new(0);
        let _ = run(
            &mut world,
            &[Command::UpgradeTower {
                tower,
                category: UpgradeCategory::Damage,
            }],
        );
        let events = run(
            &mut world,
            &[Command::UpgradeTower {
                tower,
                category: UpgradeCategory::FireRate,
            }],
        );
        assert!(matches!(
            events.as_slice(),
            [Event::TowerUpgradeRejected {
                reason: UpgradeError::InsufficientFunds,
                ..
            }]
        ));
        let snapshot = query::tower(&world, tower).expect("tower exists");
        assert_eq!(snapshot.fire_rate_ticks, 120);
        assert_eq!(snapshot.level, 2);
        assert_eq!(query::status(&world).currency, 20);
    }

    #[test]
    fn selling_refunds_and_removes_tower() {
        let mut world = world_with(GameConfig::default());
        let _ = place(&mut world, TowerKind::Basic, 60.0, 300.0);
        let tower = TowerId::new(0);
        let events = run(&mut world, &[Command::SellTower { tower }]);
        assert_eq!(events, vec![Event::TowerSold { tower, refund: 35 }]);
        assert_eq!(query::status(&world).currency, 135);

        let events = run(&mut world, &[Command::SellTower { tower }]);
        assert_eq!(
            events,
            vec![Event::TowerSaleRejected {
                tower,
                reason: SaleError::MissingTower,
            }]
        );
    }

    #[test]
    fn wave_runs_from_start_to_clearing() {
        let config = GameConfig {
            waves: WaveConfig {
                initial_quota: 2,
                ..WaveConfig::default()
            },
            ..GameConfig::default()
        };
        let mut world = world_with(config);
        let events = run(
            &mut world,
            &[
                Command::SpawnEnemy,
                Command::StartWave,
                Command::StartWave,
                Command::SpawnEnemy,
                Command::SpawnEnemy,
                Command::SpawnEnemy,
            ],
        );
        assert_eq!(
            events,
            vec![
                Event::WaveStarted { wave: 1, quota: 2 },
                Event::EnemySpawned {
                    enemy: EnemyId::new(0),
                    tier: EnemyTier::Grunt,
                    spawned: 1,
                    quota: 2,
                },
                Event::EnemySpawned {
                    enemy: EnemyId::new(1),
                    tier: EnemyTier::Grunt,
                    spawned: 2,
                    quota: 2,
                },
                Event::WaveSpawningFinished { wave: 1 },
            ]
        );
        assert_eq!(query::status(&world).phase, WavePhase::Clearing);
        assert_eq!(query::live_enemy_count(&world), 2);
    }

    #[test]
    fn wave_completion_waits_for_empty_field() {
        let config = GameConfig {
            waves: WaveConfig {
                initial_quota: 1,
                ..WaveConfig::default()
            },
            ..GameConfig::default()
        };
        let mut world = world_with(config);
        let _ = run(
            &mut world,
            &[Command::StartWave, Command::SpawnEnemy, Command::CompleteWave],
        );
        assert_eq!(query::status(&world).phase, WavePhase::Clearing);

        let mut leaked = false;
        for _ in 0..2_000 {
            let events = run(&mut world, &[Command::Tick, Command::AdvanceEnemies]);
            if events
                .iter()
                .any(|event| matches!(event, Event::EnemyLeaked { .. }))
            {
                leaked = true;
                break;
            }
        }
        assert!(leaked);

        let events = run(&mut world, &[Command::CompleteWave]);
        assert_eq!(
            events,
            vec![Event::WaveCompleted {
                wave: 1,
                bonus: 20,
                next_quota: 3,
            }]
        );
        let status = query::status(&world);
        assert_eq!(status.wave, 2);
        assert_eq!(status.phase, WavePhase::Idle);
        assert_eq!(status.currency, 170);
        assert_eq!(status.lives, 19);
    }

    #[test]
    fn leaking_the_last_life_ends_the_run_once() {
        let config = GameConfig {
            economy: EconomyConfig {
                starting_lives: 1,
                ..EconomyConfig::default()
            },
            waves: WaveConfig {
                initial_quota: 2,
                ..WaveConfig::default()
            },
            ..GameConfig::default()
        };
        let mut world = world_with(config);
        let _ = run(
            &mut world,
            &[Command::StartWave, Command::SpawnEnemy, Command::SpawnEnemy],
        );

        let mut game_overs = 0;
        for _ in 0..2_000 {
            let events = run(&mut world, &[Command::Tick, Command::AdvanceEnemies]);
            game_overs += events
                .iter()
                .filter(|event| matches!(event, Event::GameOver { .. }))
                .count();
        }
        assert_eq!(game_overs, 1);
        assert_eq!(
            query::outcome(&world),
            Some(GameOutcome {
                final_score: 0,
                wave: 1
            })
        );
        let events = place(&mut world, TowerKind::Basic, 60.0, 300.0);
        assert!(matches!(
            events.as_slice(),
            [Event::TowerPlacementRejected {
                reason: PlacementError::GameOver,
                ..
            }]
        ));
    }

    #[test]
    fn paused_world_ignores_tick_commands() {
        let mut world = world_with(GameConfig::default());
        let _ = run(&mut world, &[Command::StartWave, Command::SpawnEnemy]);
        let before = query::enemy_view(&world).into_vec();

        let events = run(
            &mut world,
            &[
                Command::SetPaused { paused: true },
                Command::Tick,
                Command::AdvanceEnemies,
                Command::SpawnEnemy,
            ],
        );
        assert_eq!(events, vec![Event::PauseChanged { paused: true }]);
        assert_eq!(query::enemy_view(&world).into_vec(), before);
        assert_eq!(query::status(&world).tick, 0);
    }

    #[test]
    fn tick_decrements_cooldowns() {
        let mut world = world_with(GameConfig::default());
        let _ = place(&mut world, TowerKind::Basic, 60.0, 290.0);
        let _ = run(&mut world, &[Command::StartWave, Command::SpawnEnemy]);
        let tower = TowerId::new(0);
        let events = run(
            &mut world,
            &[Command::FireProjectile {
                tower,
                target: EnemyId::new(0),
            }],
        );
        assert!(matches!(events.as_slice(), [Event::ProjectileFired { .. }]));

        let again = run(
            &mut world,
            &[
                Command::Tick,
                Command::FireProjectile {
                    tower,
                    target: EnemyId::new(0),
                },
            ],
        );
        assert_eq!(again, vec![Event::TimeAdvanced { tick: 1 }]);
        let cooldown = query::tower_cooldowns(&world)
            .iter()
            .next()
            .map(|snapshot| snapshot.ready_in_ticks);
        assert_eq!(cooldown, Some(59));
    }

    #[test]
    fn projectile_kill_credits_owner() {
        let mut world = world_with(GameConfig::default());
        let _ = place(&mut world, TowerKind::Basic, 60.0, 290.0);
        let _ = run(&mut world, &[Command::StartWave, Command::SpawnEnemy]);
        let tower = TowerId::new(0);
        let enemy = EnemyId::new(0);

        let mut killed = None;
        for _ in 0..400 {
            let mut commands = vec![Command::Tick];
            if query::tower_cooldowns(&world)
                .iter()
                .all(|snapshot| snapshot.ready_in_ticks == 0)
            {
                commands.push(Command::FireProjectile {
                    tower,
                    target: enemy,
                });
            }
            commands.push(Command::AdvanceEnemies);
            commands.push(Command::ResolveProjectiles);
            let events = run(&mut world, &commands);
            killed = events.into_iter().find_map(|event| match event {
                Event::EnemyKilled {
                    tower,
                    reward,
                    score,
                    ..
                } => Some((tower, reward, score)),
                _ => None,
            });
            if killed.is_some() {
                break;
            }
        }

        assert_eq!(killed, Some((Some(tower), 17, 34)));
        let status = query::status(&world);
        assert_eq!(status.currency, 100 + 17);
        assert_eq!(status.score, 34);
        assert_eq!(query::tower(&world, tower).map(|t| t.kills), Some(1));
        assert!(query::enemy_view(&world).is_empty());
        assert!(!query::effects(&world).is_empty());
    }

    #[test]
    fn projectiles_expire_when_target_vanishes() {
        let mut world = world_with(rich_config());
        let _ = place(&mut world, TowerKind::Sniper, 60.0, 290.0);
        let _ = place(&mut world, TowerKind::Sniper, 60.0, 330.0);
        let _ = run(
            &mut world,
            &[Command::StartWave, Command::SpawnEnemy, Command::SpawnEnemy],
        );
        let target = EnemyId::new(0);
        let survivor = EnemyId::new(1);
        let survivor_hp = |world: &World| {
            query::enemy_view(world)
                .iter()
                .find(|enemy| enemy.id == survivor)
                .map(|enemy| enemy.hp)
        };
        let starting_hp = survivor_hp(&world);
        assert!(starting_hp.is_some());
        let _ = run(
            &mut world,
            &[
                Command::FireProjectile {
                    tower: TowerId::new(0),
                    target,
                },
                Command::FireProjectile {
                    tower: TowerId::new(1),
                    target,
                },
            ],
        );

        let mut kills = 0;
        let mut expired = 0;
        for _ in 0..100 {
            let events = run(
                &mut world,
                &[
                    Command::Tick,
                    Command::AdvanceEnemies,
                    Command::ResolveProjectiles,
                ],
            );
            for event in events {
                match event {
                    Event::EnemyKilled { .. } => kills += 1,
                    Event::ProjectileExpired { .. } => expired += 1,
                    _ => {}
                }
            }
        }
        assert_eq!((kills, expired), (1, 1));
        assert!(query::projectiles(&world).is_empty());
        assert_eq!(survivor_hp(&world), starting_hp);
    }

    #[test]
    fn reset_restores_initial_state() {
        let mut world = world_with(GameConfig::default());
        let _ = place(&mut world, TowerKind::Sniper, 60.0, 290.0);
        let _ = run(&mut world, &[Command::StartWave, Command::SpawnEnemy]);
        let _ = run(
            &mut world,
            &[Command::FireProjectile {
                tower: TowerId::new(0),
                target: EnemyId::new(0),
            }],
        );
        assert_eq!(query::projectiles(&world).len(), 1);

        let _ = run(&mut world, &[Command::ResetRun]);
        assert!(query::projectiles(&world).is_empty());
        assert_eq!(query::status(&world), {
            let fresh = world_with(GameConfig::default());
            query::status(&fresh)
        });
    }

    #[test]
    fn freeze_hits_always_slow() {
        let mut world = world_with(rich_config());
        let _ = place(&mut world, TowerKind::Freeze, 60.0, 290.0);
        let _ = run(&mut world, &[Command::StartWave, Command::SpawnEnemy]);
        let _ = run(
            &mut world,
            &[Command::FireProjectile {
                tower: TowerId::new(0),
                target: EnemyId::new(0),
            }],
        );

        let mut hit = None;
        for _ in 0..100 {
            let events = run(
                &mut world,
                &[
                    Command::Tick,
                    Command::AdvanceEnemies,
                    Command::ResolveProjectiles,
                ],
            );
            hit = events.into_iter().find_map(|event| match event {
                Event::EnemyHit { slowed, .. } => Some(slowed),
                _ => None,
            });
            if hit.is_some() {
                break;
            }
        }
        assert_eq!(hit, Some(true));
        let enemy = query::enemy_view(&world)
            .into_vec()
            .into_iter()
            .next()
            .expect("grunt survives a half-damage hit");
        assert!(enemy.slowed);
        assert!((enemy.hp - 1.5).abs() < f32::EPSILON);
    }
}
