//! Tunable rules of a run, deserialisable from configuration files.

use path_defence_core::Point;
use serde::{Deserialize, Serialize};

/// Complete rule set used to construct a [`World`](crate::World).
///
/// Every section falls back to the classic tuning when omitted, so a
/// configuration file only needs to mention the values it changes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Seed for every random draw made during a run.
    pub seed: u64,
    /// Waypoints of the route enemies follow.
    pub path: Vec<Point>,
    /// Dimensions of the playing field.
    pub field: FieldConfig,
    /// Starting resources and wave bonuses.
    pub economy: EconomyConfig,
    /// Wave quotas and spawn cadence.
    pub waves: WaveConfig,
    /// Projectile and status-effect tuning.
    pub combat: CombatConfig,
    /// Tower placement constraints.
    pub placement: PlacementConfig,
    /// Upgrade pricing and sell refunds.
    pub upgrades: UpgradeConfig,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            seed: 0x5eed_7043_9a1d_2b6f,
            path: classic_route(),
            field: FieldConfig::default(),
            economy: EconomyConfig::default(),
            waves: WaveConfig::default(),
            combat: CombatConfig::default(),
            placement: PlacementConfig::default(),
            upgrades: UpgradeConfig::default(),
        }
    }
}

/// Bounds of the area in which towers may be built.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldConfig {
    /// Width of the field in world units.
    pub width: f32,
    /// Height of the field in world units.
    pub height: f32,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 450.0,
        }
    }
}

/// Starting resources and the per-wave completion bonus.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EconomyConfig {
    /// Currency available when a run starts.
    pub starting_currency: u32,
    /// Lives available when a run starts.
    pub starting_lives: u32,
    /// Bonus paid per wave number when a wave completes.
    pub wave_bonus_per_wave: u32,
}

impl Default for EconomyConfig {
    fn default() -> Self {
        Self {
            starting_currency: 150,
            starting_lives: 20,
            wave_bonus_per_wave: 10,
        }
    }
}

/// Wave quota growth and spawn probability.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaveConfig {
    /// Enemies spawned by the first wave.
    pub initial_quota: u32,
    /// Additional enemies spawned by each subsequent wave. Values below one
    /// are treated as one so quotas always grow.
    pub quota_growth: u32,
    /// Chance, per tick, that a spawning wave emits its next enemy.
    pub spawn_probability: f32,
}

impl WaveConfig {
    /// Enemies spawned by the provided wave.
    #[must_use]
    pub fn quota_for(&self, wave: u32) -> u32 {
        let growth = self.quota_growth.max(1);
        self.initial_quota
            .max(1)
            .saturating_add(wave.saturating_sub(1).saturating_mul(growth))
    }
}

impl Default for WaveConfig {
    fn default() -> Self {
        Self {
            initial_quota: 5,
            quota_growth: 2,
            spawn_probability: 0.02,
        }
    }
}

/// Projectile ballistics and status-effect durations.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatConfig {
    /// Distance a projectile covers per tick.
    pub projectile_speed: f32,
    /// Distance under which a projectile counts as having struck its target.
    pub contact_radius: f32,
    /// Ticks a slow status lasts.
    pub slow_ticks: u32,
    /// Speed multiplier applied while slowed.
    pub slow_factor: f32,
    /// Ticks a freeze status lasts.
    pub freeze_ticks: u32,
    /// Chance that a freeze-tower hit also freezes its target.
    pub freeze_chance: f32,
    /// Ticks a hit flash stays visible.
    pub hit_effect_ticks: u32,
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self {
            projectile_speed: 6.0,
            contact_radius: 8.0,
            slow_ticks: 60,
            slow_factor: 0.5,
            freeze_ticks: 30,
            freeze_chance: 0.3,
            hit_effect_ticks: 20,
        }
    }
}

/// Constraints on where towers may stand.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlacementConfig {
    /// Minimum distance between a tower and any path segment.
    pub path_buffer: f32,
    /// Minimum distance between two towers.
    pub tower_spacing: f32,
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            path_buffer: 30.0,
            tower_spacing: 20.0,
        }
    }
}

/// Upgrade pricing and the sell-back heuristic.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UpgradeConfig {
    /// Surcharge added to an upgrade's base price per level already gained.
    pub cost_step_per_level: u32,
    /// Fraction of the tower's base cost refunded on sale.
    pub sell_fraction: f32,
    /// Flat refund added per level gained through upgrades.
    pub sell_bonus_per_level: u32,
}

impl Default for UpgradeConfig {
    fn default() -> Self {
        Self {
            cost_step_per_level: 10,
            sell_fraction: 0.7,
            sell_bonus_per_level: 15,
        }
    }
}

fn classic_route() -> Vec<Point> {
    [
        (-20.0, 250.0),
        (150.0, 250.0),
        (150.0, 150.0),
        (300.0, 150.0),
        (300.0, 350.0),
        (500.0, 350.0),
        (500.0, 100.0),
        (650.0, 100.0),
        (650.0, 250.0),
        (820.0, 250.0),
    ]
    .into_iter()
    .map(|(x, y)| Point::new(x, y))
    .collect()
}
