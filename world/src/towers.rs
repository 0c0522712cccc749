//! Authoritative tower state management utilities.

use std::collections::BTreeMap;

use path_defence_core::{
    Point, TowerId, TowerKind, TowerSnapshot, UpgradeCategory, DAMAGE_UPGRADE_STEP,
    FIRE_RATE_UPGRADE_STEP, MIN_FIRE_RATE_TICKS, RANGE_UPGRADE_STEP,
};

/// Tower stored inside the world.
#[derive(Clone, Debug)]
pub(crate) struct TowerState {
    /// Identifier allocated by the world for the tower.
    pub(crate) id: TowerId,
    /// Kind of tower that was constructed.
    pub(crate) kind: TowerKind,
    /// Centre of the tower in world units.
    pub(crate) position: Point,
    pub(crate) damage: f32,
    pub(crate) range: f32,
    pub(crate) fire_rate_ticks: u32,
    /// Ticks until the weapon is ready; zero means ready.
    pub(crate) cooldown_ticks: u32,
    pub(crate) level: u32,
    pub(crate) kills: u32,
    /// Construction cost plus every upgrade purchased.
    pub(crate) invested: u32,
}

impl TowerState {
    fn new(id: TowerId, kind: TowerKind, position: Point) -> Self {
        Self {
            id,
            kind,
            position,
            damage: kind.damage(),
            range: kind.range(),
            fire_rate_ticks: kind.fire_rate_ticks(),
            cooldown_ticks: 0,
            level: 1,
            kills: 0,
            invested: kind.cost(),
        }
    }

    /// Applies the stat delta of a purchased upgrade and records the spend.
    pub(crate) fn apply_upgrade(&mut self, category: UpgradeCategory, cost: u32) {
        match category {
            UpgradeCategory::Damage => self.damage += DAMAGE_UPGRADE_STEP,
            UpgradeCategory::Range => self.range += RANGE_UPGRADE_STEP,
            UpgradeCategory::FireRate => {
                self.fire_rate_ticks = self
                    .fire_rate_ticks
                    .saturating_sub(FIRE_RATE_UPGRADE_STEP)
                    .max(MIN_FIRE_RATE_TICKS);
            }
        }
        self.level = self.level.saturating_add(1);
        self.invested = self.invested.saturating_add(cost);
    }

    pub(crate) fn in_range(&self, point: Point) -> bool {
        self.position.distance(point) <= self.range
    }

    pub(crate) fn snapshot(&self, sell_value: u32) -> TowerSnapshot {
        TowerSnapshot {
            id: self.id,
            kind: self.kind,
            position: self.position,
            damage: self.damage,
            range: self.range,
            fire_rate_ticks: self.fire_rate_ticks,
            cooldown_ticks: self.cooldown_ticks,
            level: self.level,
            kills: self.kills,
            invested: self.invested,
            sell_value,
        }
    }
}

/// Registry that stores towers and manages identifier allocation.
#[derive(Debug)]
pub(crate) struct TowerRegistry {
    entries: BTreeMap<TowerId, TowerState>,
    next_tower_id: TowerId,
}

impl TowerRegistry {
    /// Creates an empty tower registry with a reset identifier counter.
    pub(crate) fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
            next_tower_id: TowerId::new(0),
        }
    }

    pub(crate) fn insert(&mut self, kind: TowerKind, position: Point) -> TowerId {
        let id = self.next_tower_id;
        self.next_tower_id = TowerId::new(id.get().wrapping_add(1));
        let _ = self.entries.insert(id, TowerState::new(id, kind, position));
        id
    }

    pub(crate) fn get(&self, tower: TowerId) -> Option<&TowerState> {
        self.entries.get(&tower)
    }

    pub(crate) fn get_mut(&mut self, tower: TowerId) -> Option<&mut TowerState> {
        self.entries.get_mut(&tower)
    }

    pub(crate) fn remove(&mut self, tower: TowerId) -> Option<TowerState> {
        self.entries.remove(&tower)
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &TowerState> {
        self.entries.values()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut TowerState> {
        self.entries.values_mut()
    }

    /// Nearest tower whose centre lies within `radius` of `point`.
    pub(crate) fn nearest_within(&self, point: Point, radius: f32) -> Option<TowerId> {
        self.entries
            .values()
            .map(|tower| (tower.id, tower.position.distance(point)))
            .filter(|(_, distance)| *distance <= radius)
            .min_by(|left, right| left.1.total_cmp(&right.1))
            .map(|(id, _)| id)
    }
}
