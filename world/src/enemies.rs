//! Enemy registry with mark-and-compact removal.

use path_defence_core::{EnemyId, EnemySnapshot, EnemyStats, EnemyTier, PathPosition, Point};

/// Lifecycle marker; anything other than `Alive` is compacted away at the end
/// of the phase that set it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum EnemyFate {
    Alive,
    Killed,
    Leaked,
}

#[derive(Clone, Debug)]
pub(crate) struct EnemyState {
    pub(crate) id: EnemyId,
    pub(crate) tier: EnemyTier,
    pub(crate) position: Point,
    pub(crate) path_position: PathPosition,
    /// Cumulative distance travelled; the targeting priority metric.
    pub(crate) progress: f32,
    pub(crate) hp: f32,
    pub(crate) max_hp: f32,
    pub(crate) speed: f32,
    pub(crate) reward: u32,
    pub(crate) slow_ticks: u32,
    pub(crate) freeze_ticks: u32,
    pub(crate) fate: EnemyFate,
}

impl EnemyState {
    pub(crate) fn is_alive(&self) -> bool {
        self.fate == EnemyFate::Alive
    }

    /// Removes hit points, clamping at zero. Returns `true` when the hit was
    /// lethal.
    pub(crate) fn take_damage(&mut self, damage: f32) -> bool {
        self.hp = (self.hp - damage.max(0.0)).max(0.0);
        self.hp <= 0.0
    }

    pub(crate) fn snapshot(&self) -> EnemySnapshot {
        EnemySnapshot {
            id: self.id,
            tier: self.tier,
            position: self.position,
            hp: self.hp,
            max_hp: self.max_hp,
            progress: self.progress,
            reward: self.reward,
            slowed: self.slow_ticks > 0,
            frozen: self.freeze_ticks > 0,
        }
    }
}

/// Enemies stored in spawn order, which is also identifier order.
#[derive(Debug)]
pub(crate) struct EnemyRegistry {
    entries: Vec<EnemyState>,
    next_enemy_id: EnemyId,
}

impl EnemyRegistry {
    pub(crate) fn new() -> Self {
        Self {
            entries: Vec::new(),
            next_enemy_id: EnemyId::new(0),
        }
    }

    pub(crate) fn spawn(&mut self, stats: EnemyStats, start: Point) -> EnemyId {
        let id = self.next_enemy_id;
        self.next_enemy_id = EnemyId::new(id.get().wrapping_add(1));
        self.entries.push(EnemyState {
            id,
            tier: stats.tier,
            position: start,
            path_position: PathPosition::START,
            progress: 0.0,
            hp: stats.max_hp,
            max_hp: stats.max_hp,
            speed: stats.speed,
            reward: stats.reward,
            slow_ticks: 0,
            freeze_ticks: 0,
            fate: EnemyFate::Alive,
        });
        id
    }

    pub(crate) fn get(&self, enemy: EnemyId) -> Option<&EnemyState> {
        self.entries
            .binary_search_by_key(&enemy, |state| state.id)
            .ok()
            .map(|index| &self.entries[index])
    }

    pub(crate) fn get_mut(&mut self, enemy: EnemyId) -> Option<&mut EnemyState> {
        self.entries
            .binary_search_by_key(&enemy, |state| state.id)
            .ok()
            .map(move |index| &mut self.entries[index])
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &EnemyState> {
        self.entries.iter()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut EnemyState> {
        self.entries.iter_mut()
    }

    pub(crate) fn live_count(&self) -> usize {
        self.entries.iter().filter(|enemy| enemy.is_alive()).count()
    }

    /// Drops every enemy that was killed or leaked, preserving spawn order.
    pub(crate) fn compact(&mut self) {
        self.entries.retain(EnemyState::is_alive);
    }
}
