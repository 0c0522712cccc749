#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Path Defence engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters and systems submit
//! [`Command`] values describing desired mutations, the world executes those
//! commands via its `apply` entry point, and then broadcasts [`Event`] values
//! describing what actually happened. Every command is re-validated by the
//! world, so a rejected request never mutates state.

mod path;

pub use path::{Path, PathAdvance, PathError, PathPosition, Point};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Path Defence.";

/// Damage added by a single damage upgrade.
pub const DAMAGE_UPGRADE_STEP: f32 = 0.5;

/// Range added by a single range upgrade.
pub const RANGE_UPGRADE_STEP: f32 = 20.0;

/// Ticks removed from the fire-rate cooldown by a single fire-rate upgrade.
pub const FIRE_RATE_UPGRADE_STEP: u32 = 10;

/// Fire-rate upgrades never push the cooldown below this many ticks.
pub const MIN_FIRE_RATE_TICKS: u32 = 10;

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Advances the simulation by a single frame.
    Tick,
    /// Pauses or resumes the simulation.
    SetPaused {
        /// Whether the simulation should be paused.
        paused: bool,
    },
    /// Requests that the next wave begins spawning.
    StartWave,
    /// Requests that a single enemy of the current wave enters the path.
    SpawnEnemy,
    /// Requests that the current wave is closed out and its bonus paid.
    CompleteWave,
    /// Requests construction of a tower at the provided position.
    PlaceTower {
        /// Type of tower to construct.
        kind: TowerKind,
        /// Centre of the tower in world units.
        position: Point,
    },
    /// Requests an upgrade purchase for an existing tower.
    UpgradeTower {
        /// Identifier of the tower to upgrade.
        tower: TowerId,
        /// Stat that the upgrade improves.
        category: UpgradeCategory,
    },
    /// Requests that an existing tower is sold back for a partial refund.
    SellTower {
        /// Identifier of the tower to sell.
        tower: TowerId,
    },
    /// Requests that a tower launches a projectile at an enemy.
    FireProjectile {
        /// Tower that fires.
        tower: TowerId,
        /// Enemy the projectile homes in on.
        target: EnemyId,
    },
    /// Moves every enemy along the path and resolves leaks.
    AdvanceEnemies,
    /// Moves every projectile and resolves hits.
    ResolveProjectiles,
    /// Tears the current run down and restores the initial state.
    ResetRun,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Indicates that the simulation advanced by one frame.
    TimeAdvanced {
        /// Index of the frame that was just started.
        tick: u64,
    },
    /// Announces that the simulation was paused or resumed.
    PauseChanged {
        /// Whether the simulation is now paused.
        paused: bool,
    },
    /// Announces that a wave began spawning enemies.
    WaveStarted {
        /// Number of the wave that started.
        wave: u32,
        /// Number of enemies the wave will spawn.
        quota: u32,
    },
    /// Confirms that an enemy entered the path.
    EnemySpawned {
        /// Identifier assigned to the enemy.
        enemy: EnemyId,
        /// Tier the enemy was drawn from.
        tier: EnemyTier,
        /// Enemies spawned so far in the current wave, including this one.
        spawned: u32,
        /// Total enemies the wave will spawn.
        quota: u32,
    },
    /// Announces that the wave quota was reached and the wave is clearing.
    WaveSpawningFinished {
        /// Number of the wave that finished spawning.
        wave: u32,
    },
    /// Announces that every enemy of a wave was killed or leaked.
    WaveCompleted {
        /// Number of the wave that was completed.
        wave: u32,
        /// Currency bonus granted for the completion.
        bonus: u32,
        /// Quota of the next wave.
        next_quota: u32,
    },
    /// Confirms that a tower was placed.
    TowerPlaced {
        /// Identifier assigned to the tower.
        tower: TowerId,
        /// Type of tower that was placed.
        kind: TowerKind,
        /// Centre of the tower in world units.
        position: Point,
        /// Currency debited for the construction.
        cost: u32,
    },
    /// Reports that a placement request was rejected.
    TowerPlacementRejected {
        /// Type of tower requested.
        kind: TowerKind,
        /// Position requested.
        position: Point,
        /// Reason the placement failed.
        reason: PlacementError,
    },
    /// Confirms that a tower upgrade was purchased.
    TowerUpgraded {
        /// Identifier of the upgraded tower.
        tower: TowerId,
        /// Stat that was improved.
        category: UpgradeCategory,
        /// Level reached after the upgrade.
        level: u32,
        /// Currency debited for the upgrade.
        cost: u32,
    },
    /// Reports that an upgrade request was rejected.
    TowerUpgradeRejected {
        /// Identifier of the tower targeted for upgrade.
        tower: TowerId,
        /// Stat that was requested.
        category: UpgradeCategory,
        /// Reason the upgrade failed.
        reason: UpgradeError,
    },
    /// Confirms that a tower was sold and removed.
    TowerSold {
        /// Identifier of the removed tower.
        tower: TowerId,
        /// Currency refunded to the player.
        refund: u32,
    },
    /// Reports that a sale request was rejected.
    TowerSaleRejected {
        /// Identifier of the tower targeted for sale.
        tower: TowerId,
        /// Reason the sale failed.
        reason: SaleError,
    },
    /// Confirms that a tower launched a projectile.
    ProjectileFired {
        /// Identifier assigned to the projectile.
        projectile: ProjectileId,
        /// Tower that fired.
        tower: TowerId,
        /// Enemy the projectile homes in on.
        target: EnemyId,
    },
    /// Reports that a projectile was discarded because its target vanished.
    ProjectileExpired {
        /// Identifier of the discarded projectile.
        projectile: ProjectileId,
    },
    /// Reports that a projectile struck its target.
    EnemyHit {
        /// Enemy that was struck.
        enemy: EnemyId,
        /// Projectile that struck it.
        projectile: ProjectileId,
        /// Damage dealt by the hit.
        damage: f32,
        /// Hit points left after the hit.
        remaining_hp: f32,
        /// Whether the hit applied a slow status.
        slowed: bool,
        /// Whether the hit applied a full freeze.
        frozen: bool,
    },
    /// Reports that an enemy was destroyed by a projectile.
    EnemyKilled {
        /// Enemy that was destroyed.
        enemy: EnemyId,
        /// Tower credited with the kill, if it still stands.
        tower: Option<TowerId>,
        /// Currency granted for the kill.
        reward: u32,
        /// Score granted for the kill.
        score: u64,
    },
    /// Reports that an enemy reached the end of the path.
    EnemyLeaked {
        /// Enemy that escaped.
        enemy: EnemyId,
        /// Lives left after the leak.
        lives_remaining: u32,
    },
    /// Announces that the last life was lost and the run is over.
    GameOver {
        /// Outcome of the finished run.
        outcome: GameOutcome,
    },
    /// Announces that the run was reset to its initial state.
    RunReset,
}

/// Types of towers that can be constructed along the path.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TowerKind {
    /// Cheap all-rounder.
    Basic,
    /// Long range, heavy hits, slow reload.
    Sniper,
    /// Short range, fast reload.
    Rapid,
    /// Weak hits that slow and occasionally freeze enemies.
    Freeze,
}

impl TowerKind {
    /// Every constructible tower kind in menu order.
    pub const ALL: [TowerKind; 4] = [
        TowerKind::Basic,
        TowerKind::Sniper,
        TowerKind::Rapid,
        TowerKind::Freeze,
    ];

    /// Currency required to construct the tower.
    #[must_use]
    pub const fn cost(self) -> u32 {
        match self {
            Self::Basic => 50,
            Self::Sniper => 100,
            Self::Rapid => 80,
            Self::Freeze => 120,
        }
    }

    /// Damage carried by each projectile at level one.
    #[must_use]
    pub const fn damage(self) -> f32 {
        match self {
            Self::Basic | Self::Rapid => 1.0,
            Self::Sniper => 3.0,
            Self::Freeze => 0.5,
        }
    }

    /// Targeting radius in world units at level one.
    #[must_use]
    pub const fn range(self) -> f32 {
        match self {
            Self::Basic => 100.0,
            Self::Sniper => 200.0,
            Self::Rapid => 80.0,
            Self::Freeze => 90.0,
        }
    }

    /// Number of ticks the tower waits between shots at level one.
    #[must_use]
    pub const fn fire_rate_ticks(self) -> u32 {
        match self {
            Self::Basic => 60,
            Self::Sniper => 120,
            Self::Rapid => 20,
            Self::Freeze => 90,
        }
    }

    /// Additional effect applied by the tower's projectiles.
    #[must_use]
    pub const fn special(self) -> Option<TowerSpecial> {
        match self {
            Self::Freeze => Some(TowerSpecial::Freeze),
            Self::Basic | Self::Sniper | Self::Rapid => None,
        }
    }
}

/// Status effects that projectiles may carry in addition to damage.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TowerSpecial {
    /// Slows the target and occasionally halts it completely.
    Freeze,
}

/// Stats that an upgrade purchase can improve.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UpgradeCategory {
    /// Adds [`DAMAGE_UPGRADE_STEP`] to the tower's damage.
    Damage,
    /// Adds [`RANGE_UPGRADE_STEP`] to the tower's range.
    Range,
    /// Removes [`FIRE_RATE_UPGRADE_STEP`] ticks from the reload time.
    FireRate,
}

impl UpgradeCategory {
    /// Price of the first upgrade of this category; later levels add a
    /// configurable surcharge.
    #[must_use]
    pub const fn base_cost(self) -> u32 {
        match self {
            Self::Damage => 30,
            Self::Range => 25,
            Self::FireRate => 35,
        }
    }
}

/// Enemy archetypes, unlocked as waves progress.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EnemyTier {
    /// Fragile and quick.
    Grunt,
    /// Slightly tougher.
    Soldier,
    /// Durable and slow.
    Brute,
    /// Very durable and very slow.
    Tank,
}

impl EnemyTier {
    /// Selects the tier used for the provided wave number.
    #[must_use]
    pub const fn for_wave(wave: u32) -> Self {
        match wave / 2 {
            0 => Self::Grunt,
            1 => Self::Soldier,
            2 => Self::Brute,
            _ => Self::Tank,
        }
    }

    /// Hit points before wave scaling.
    #[must_use]
    pub const fn base_hp(self) -> u32 {
        match self {
            Self::Grunt => 2,
            Self::Soldier => 4,
            Self::Brute => 8,
            Self::Tank => 15,
        }
    }

    /// Distance covered per tick while unimpeded.
    #[must_use]
    pub const fn speed(self) -> f32 {
        match self {
            Self::Grunt => 1.0,
            Self::Soldier => 0.8,
            Self::Brute => 0.6,
            Self::Tank => 0.4,
        }
    }

    /// Kill reward before wave scaling.
    #[must_use]
    pub const fn base_reward(self) -> u32 {
        match self {
            Self::Grunt => 15,
            Self::Soldier => 25,
            Self::Brute => 40,
            Self::Tank => 60,
        }
    }
}

/// Stats rolled for an enemy spawned during a specific wave.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnemyStats {
    /// Tier the stats derive from.
    pub tier: EnemyTier,
    /// Starting and maximum hit points.
    pub max_hp: f32,
    /// Unimpeded movement speed per tick.
    pub speed: f32,
    /// Currency granted on kill; the score grant is twice this value.
    pub reward: u32,
}

impl EnemyStats {
    /// Scales the wave's tier with the wave number.
    #[must_use]
    pub fn for_wave(wave: u32) -> Self {
        let tier = EnemyTier::for_wave(wave);
        Self {
            tier,
            max_hp: tier.base_hp().saturating_add(wave / 2) as f32,
            speed: tier.speed(),
            reward: tier.base_reward().saturating_add(wave.saturating_mul(2)),
        }
    }
}

/// Resting phases of the wave state machine.
///
/// Completion is not a resting phase: the `CompleteWave` transition pays the
/// bonus and immediately returns to [`WavePhase::Idle`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WavePhase {
    /// Waiting for the player to start the next wave.
    Idle,
    /// Enemies are still being spawned towards the quota.
    Spawning,
    /// The quota was reached; waiting for the last enemies to die or leak.
    Clearing,
}

/// Unique identifier assigned to a tower.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TowerId(u32);

impl TowerId {
    /// Creates a new tower identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the tower identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to an enemy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EnemyId(u32);

impl EnemyId {
    /// Creates a new enemy identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a projectile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProjectileId(u32);

impl ProjectileId {
    /// Creates a new projectile identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Reasons a tower placement request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Error)]
pub enum PlacementError {
    /// The run has ended.
    #[error("the run is over")]
    GameOver,
    /// The position lies outside the playing field.
    #[error("position lies outside the playing field")]
    OutOfBounds,
    /// The player cannot afford the tower.
    #[error("not enough currency to build this tower")]
    InsufficientFunds,
    /// The position is within the buffer distance of the path.
    #[error("position is too close to the enemy path")]
    OnPath,
    /// The position is too close to an existing tower.
    #[error("position overlaps an existing tower")]
    Overlapping,
}

/// Reasons an upgrade purchase may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Error)]
pub enum UpgradeError {
    /// The run has ended.
    #[error("the run is over")]
    GameOver,
    /// No tower with the provided identifier exists.
    #[error("no such tower")]
    MissingTower,
    /// The player cannot afford the upgrade.
    #[error("not enough currency for this upgrade")]
    InsufficientFunds,
}

/// Reasons a sale may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Error)]
pub enum SaleError {
    /// The run has ended.
    #[error("the run is over")]
    GameOver,
    /// No tower with the provided identifier exists.
    #[error("no such tower")]
    MissingTower,
}

/// Final result of a run that ran out of lives.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GameOutcome {
    /// Score accumulated over the run.
    pub final_score: u64,
    /// Wave that was in progress when the last life was lost.
    pub wave: u32,
}

/// Counters the UI layer mirrors every frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StatusSnapshot {
    /// Currency available for construction and upgrades.
    pub currency: u32,
    /// Lives left before the run ends.
    pub lives: u32,
    /// Score accumulated so far.
    pub score: u64,
    /// Current wave number, starting at one.
    pub wave: u32,
    /// Phase of the wave state machine.
    pub phase: WavePhase,
    /// Enemies spawned in the current wave.
    pub spawned: u32,
    /// Enemies the current wave will spawn.
    pub quota: u32,
    /// Whether the simulation is paused.
    pub paused: bool,
    /// Whether the run has ended.
    pub game_over: bool,
    /// Number of frames simulated so far.
    pub tick: u64,
}

/// Immutable representation of a single tower's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TowerSnapshot {
    /// Identifier allocated to the tower by the world.
    pub id: TowerId,
    /// Kind of tower that was constructed.
    pub kind: TowerKind,
    /// Centre of the tower in world units.
    pub position: Point,
    /// Damage carried by each projectile.
    pub damage: f32,
    /// Targeting radius in world units.
    pub range: f32,
    /// Ticks between consecutive shots.
    pub fire_rate_ticks: u32,
    /// Ticks until the tower may fire again.
    pub cooldown_ticks: u32,
    /// Upgrade level, starting at one.
    pub level: u32,
    /// Enemies destroyed by the tower's projectiles.
    pub kills: u32,
    /// Currency spent on construction and upgrades.
    pub invested: u32,
    /// Currency the tower would refund if sold now.
    pub sell_value: u32,
}

/// Read-only snapshot describing all towers along the path.
#[derive(Clone, Debug, Default)]
pub struct TowerView {
    snapshots: Vec<TowerSnapshot>,
}

impl TowerView {
    /// Creates a new tower view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<TowerSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured tower snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &TowerSnapshot> {
        self.snapshots.iter()
    }

    /// Looks up the snapshot of a single tower.
    #[must_use]
    pub fn get(&self, tower: TowerId) -> Option<&TowerSnapshot> {
        self.snapshots
            .binary_search_by_key(&tower, |snapshot| snapshot.id)
            .ok()
            .map(|index| &self.snapshots[index])
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<TowerSnapshot> {
        self.snapshots
    }
}

/// Immutable representation of a single enemy's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnemySnapshot {
    /// Unique identifier assigned to the enemy.
    pub id: EnemyId,
    /// Tier the enemy was drawn from.
    pub tier: EnemyTier,
    /// Current location in world units.
    pub position: Point,
    /// Remaining hit points.
    pub hp: f32,
    /// Hit points at spawn.
    pub max_hp: f32,
    /// Cumulative distance travelled along the path.
    pub progress: f32,
    /// Currency granted when the enemy is killed.
    pub reward: u32,
    /// Whether a slow status is active.
    pub slowed: bool,
    /// Whether a freeze status is active.
    pub frozen: bool,
}

/// Read-only snapshot describing all live enemies.
#[derive(Clone, Debug, Default)]
pub struct EnemyView {
    snapshots: Vec<EnemySnapshot>,
}

impl EnemyView {
    /// Creates a new enemy view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<EnemySnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured enemy snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &EnemySnapshot> {
        self.snapshots.iter()
    }

    /// Number of live enemies.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether no enemy is alive.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<EnemySnapshot> {
        self.snapshots
    }
}

/// Immutable representation of a projectile in flight.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProjectileSnapshot {
    /// Identifier assigned to the projectile.
    pub id: ProjectileId,
    /// Tower that fired the projectile.
    pub owner: TowerId,
    /// Kind of the firing tower, which determines presentation.
    pub kind: TowerKind,
    /// Enemy the projectile homes in on.
    pub target: EnemyId,
    /// Current location in world units.
    pub position: Point,
}

/// Immutable representation of a short-lived hit flash.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EffectSnapshot {
    /// Impact location in world units.
    pub position: Point,
    /// Ticks elapsed since the impact.
    pub age_ticks: u32,
    /// Total ticks the effect lives.
    pub lifetime_ticks: u32,
}

impl EffectSnapshot {
    /// Fraction of the lifetime still remaining, in `0.0..=1.0`.
    #[must_use]
    pub fn remaining_fraction(&self) -> f32 {
        if self.lifetime_ticks == 0 {
            return 0.0;
        }
        let remaining = self.lifetime_ticks.saturating_sub(self.age_ticks);
        remaining as f32 / self.lifetime_ticks as f32
    }
}

/// Readiness of a single tower's weapon.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TowerCooldownSnapshot {
    /// Tower described by the snapshot.
    pub tower: TowerId,
    /// Ticks until the tower may fire; zero means ready.
    pub ready_in_ticks: u32,
}

/// Read-only snapshot of every tower's weapon readiness.
#[derive(Clone, Debug, Default)]
pub struct TowerCooldownView {
    snapshots: Vec<TowerCooldownSnapshot>,
}

impl TowerCooldownView {
    /// Creates a new cooldown view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<TowerCooldownSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.tower);
        Self { snapshots }
    }

    /// Iterator over the captured snapshots in tower order.
    pub fn iter(&self) -> impl Iterator<Item = &TowerCooldownSnapshot> {
        self.snapshots.iter()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<TowerCooldownSnapshot> {
        self.snapshots
    }
}

/// Target chosen for a ready tower during the current tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TowerTarget {
    /// Tower that will fire.
    pub tower: TowerId,
    /// Enemy selected as the target.
    pub enemy: EnemyId,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{de::DeserializeOwned, Serialize};

    fn assert_round_trip<T>(value: &T)
    where
        T: Serialize + DeserializeOwned + PartialEq + std::fmt::Debug,
    {
        let bytes = bincode::serialize(value).expect("serialize");
        let restored: T = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(&restored, value);
    }

    #[test]
    fn tower_kind_round_trips_through_bincode() {
        assert_round_trip(&TowerKind::Freeze);
    }

    #[test]
    fn placement_error_round_trips_through_bincode() {
        assert_round_trip(&PlacementError::OnPath);
    }

    #[test]
    fn game_outcome_round_trips_through_bincode() {
        assert_round_trip(&GameOutcome {
            final_score: 340,
            wave: 4,
        });
    }

    #[test]
    fn only_freeze_towers_carry_a_special() {
        for kind in TowerKind::ALL {
            let expected = matches!(kind, TowerKind::Freeze);
            assert_eq!(kind.special().is_some(), expected, "{kind:?}");
        }
    }

    #[test]
    fn enemy_tier_advances_every_two_waves_and_caps() {
        assert_eq!(EnemyTier::for_wave(1), EnemyTier::Grunt);
        assert_eq!(EnemyTier::for_wave(2), EnemyTier::Soldier);
        assert_eq!(EnemyTier::for_wave(5), EnemyTier::Brute);
        assert_eq!(EnemyTier::for_wave(6), EnemyTier::Tank);
        assert_eq!(EnemyTier::for_wave(40), EnemyTier::Tank);
    }

    #[test]
    fn enemy_stats_scale_with_wave() {
        let first = EnemyStats::for_wave(1);
        assert_eq!(first.tier, EnemyTier::Grunt);
        assert!((first.max_hp - 2.0).abs() < f32::EPSILON);
        assert_eq!(first.reward, 17);

        let fourth = EnemyStats::for_wave(4);
        assert_eq!(fourth.tier, EnemyTier::Brute);
        assert!((fourth.max_hp - 10.0).abs() < f32::EPSILON);
        assert_eq!(fourth.reward, 48);
    }

    #[test]
    fn tower_view_lookup_uses_sorted_identifiers() {
        let snapshot = |id: u32| TowerSnapshot {
            id: TowerId::new(id),
            kind: TowerKind::Basic,
            position: Point::new(0.0, 0.0),
            damage: 1.0,
            range: 100.0,
            fire_rate_ticks: 60,
            cooldown_ticks: 0,
            level: 1,
            kills: 0,
            invested: 50,
            sell_value: 35,
        };
        let view = TowerView::from_snapshots(vec![snapshot(9), snapshot(2), snapshot(5)]);
        let ids: Vec<u32> = view.iter().map(|tower| tower.id.get()).collect();
        assert_eq!(ids, vec![2, 5, 9]);
        assert!(view.get(TowerId::new(5)).is_some());
        assert!(view.get(TowerId::new(3)).is_none());
    }

    #[test]
    fn effect_fraction_counts_down() {
        let effect = EffectSnapshot {
            position: Point::new(0.0, 0.0),
            age_ticks: 5,
            lifetime_ticks: 20,
        };
        assert!((effect.remaining_fraction() - 0.75).abs() < f32::EPSILON);
    }
}
