#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that computes deterministic tower targets from world snapshots.

use path_defence_core::{EnemyId, EnemyView, Point, TowerId, TowerTarget, TowerView};

/// Tower targeting system that reuses scratch buffers to avoid repeated allocations.
#[derive(Debug, Default)]
pub struct TowerTargeting {
    tower_workspace: Vec<TowerWorkspace>,
    enemy_workspace: Vec<EnemyCandidate>,
}

impl TowerTargeting {
    /// Creates a new tower targeting system with empty scratch buffers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Computes targets for every tower whose weapon is ready.
    ///
    /// Each ready tower picks the enemy within range that has travelled the
    /// furthest along the path; equal progress falls back to the earliest
    /// spawned enemy. The output buffer is cleared before populating it.
    pub fn handle(&mut self, towers: &TowerView, enemies: &EnemyView, out: &mut Vec<TowerTarget>) {
        out.clear();

        if enemies.is_empty() {
            return;
        }

        self.prepare_tower_workspace(towers);
        if self.tower_workspace.is_empty() {
            return;
        }

        self.prepare_enemy_workspace(enemies);

        for tower in &self.tower_workspace {
            let max_distance_sq = tower.range * tower.range;
            let mut best: Option<&EnemyCandidate> = None;

            for candidate in &self.enemy_workspace {
                if tower.position.distance_squared(candidate.position) > max_distance_sq {
                    continue;
                }

                if best.map_or(true, |existing| candidate.precedes(existing)) {
                    best = Some(candidate);
                }
            }

            if let Some(chosen) = best {
                out.push(TowerTarget {
                    tower: tower.id,
                    enemy: chosen.id,
                });
            }
        }
    }

    fn prepare_tower_workspace(&mut self, towers: &TowerView) {
        self.tower_workspace.clear();
        self.tower_workspace.extend(
            towers
                .iter()
                .filter(|snapshot| snapshot.cooldown_ticks == 0 && snapshot.range > 0.0)
                .map(|snapshot| TowerWorkspace {
                    id: snapshot.id,
                    position: snapshot.position,
                    range: snapshot.range,
                }),
        );
    }

    fn prepare_enemy_workspace(&mut self, enemies: &EnemyView) {
        self.enemy_workspace.clear();
        self.enemy_workspace.extend(
            enemies
                .iter()
                .filter(|snapshot| snapshot.hp > 0.0)
                .map(|snapshot| EnemyCandidate {
                    id: snapshot.id,
                    position: snapshot.position,
                    progress: snapshot.progress,
                }),
        );
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct TowerWorkspace {
    id: TowerId,
    position: Point,
    range: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct EnemyCandidate {
    id: EnemyId,
    position: Point,
    progress: f32,
}

impl EnemyCandidate {
    fn precedes(&self, other: &Self) -> bool {
        if self.progress != other.progress {
            return self.progress > other.progress;
        }

        self.id < other.id
    }
}
