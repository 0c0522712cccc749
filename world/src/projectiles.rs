//! Homing projectiles in flight.

use path_defence_core::{EnemyId, Point, ProjectileId, ProjectileSnapshot, TowerId, TowerKind};

#[derive(Clone, Debug)]
pub(crate) struct ProjectileState {
    pub(crate) id: ProjectileId,
    /// Tower credited with any kill, looked up again on impact.
    pub(crate) owner: TowerId,
    pub(crate) kind: TowerKind,
    pub(crate) target: EnemyId,
    pub(crate) position: Point,
    pub(crate) damage: f32,
    pub(crate) speed: f32,
    pub(crate) spent: bool,
}

impl ProjectileState {
    pub(crate) fn snapshot(&self) -> ProjectileSnapshot {
        ProjectileSnapshot {
            id: self.id,
            owner: self.owner,
            kind: self.kind,
            target: self.target,
            position: self.position,
        }
    }
}

/// Parameters of a projectile about to be launched.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Launch {
    pub(crate) owner: TowerId,
    pub(crate) kind: TowerKind,
    pub(crate) target: EnemyId,
    pub(crate) origin: Point,
    pub(crate) damage: f32,
    pub(crate) speed: f32,
}

#[derive(Debug)]
pub(crate) struct ProjectileRegistry {
    entries: Vec<ProjectileState>,
    next_projectile_id: ProjectileId,
}

impl ProjectileRegistry {
    pub(crate) fn new() -> Self {
        Self {
            entries: Vec::new(),
            next_projectile_id: ProjectileId::new(0),
        }
    }

    pub(crate) fn launch(&mut self, launch: Launch) -> ProjectileId {
        let id = self.next_projectile_id;
        self.next_projectile_id = ProjectileId::new(id.get().wrapping_add(1));
        self.entries.push(ProjectileState {
            id,
            owner: launch.owner,
            kind: launch.kind,
            target: launch.target,
            position: launch.origin,
            damage: launch.damage,
            speed: launch.speed,
            spent: false,
        });
        id
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &ProjectileState> {
        self.entries.iter()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut ProjectileState> {
        self.entries.iter_mut()
    }

    pub(crate) fn compact(&mut self) {
        self.entries.retain(|projectile| !projectile.spent);
    }
}
