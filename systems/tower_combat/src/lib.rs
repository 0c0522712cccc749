#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that turns targeting decisions into firing commands.

use path_defence_core::{Command, TowerCooldownSnapshot, TowerCooldownView, TowerId, TowerTarget};

/// Tower combat system that queues firing commands for ready towers.
#[derive(Debug, Default)]
pub struct TowerCombat {
    scratch: Vec<Command>,
}

impl TowerCombat {
    /// Creates a new tower combat system with empty scratch buffers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Emits `Command::FireProjectile` for every targeted tower whose weapon
    /// is ready. Towers missing from the cooldown view are skipped.
    pub fn handle(
        &mut self,
        tower_cooldowns: TowerCooldownView,
        tower_targets: &[TowerTarget],
        out: &mut Vec<Command>,
    ) {
        if tower_targets.is_empty() {
            return;
        }

        let cooldowns = tower_cooldowns.into_vec();
        self.scratch.clear();
        self.scratch.extend(
            tower_targets
                .iter()
                .filter(|target| {
                    find_cooldown(&cooldowns, target.tower)
                        .is_some_and(|snapshot| snapshot.ready_in_ticks == 0)
                })
                .map(|target| Command::FireProjectile {
                    tower: target.tower,
                    target: target.enemy,
                }),
        );

        out.append(&mut self.scratch);
    }
}

fn find_cooldown(
    cooldowns: &[TowerCooldownSnapshot],
    tower: TowerId,
) -> Option<&TowerCooldownSnapshot> {
    cooldowns
        .binary_search_by_key(&tower, |snapshot| snapshot.tower)
        .ok()
        .map(|index| &cooldowns[index])
}
