//! Short-lived hit flashes kept purely for presentation.

use path_defence_core::{EffectSnapshot, Point};

#[derive(Clone, Copy, Debug)]
struct HitFlash {
    position: Point,
    age_ticks: u32,
    lifetime_ticks: u32,
}

#[derive(Debug, Default)]
pub(crate) struct EffectPool {
    flashes: Vec<HitFlash>,
}

impl EffectPool {
    pub(crate) fn spawn(&mut self, position: Point, lifetime_ticks: u32) {
        if lifetime_ticks == 0 {
            return;
        }
        self.flashes.push(HitFlash {
            position,
            age_ticks: 0,
            lifetime_ticks,
        });
    }

    /// Ages every flash by one tick and drops the expired ones.
    pub(crate) fn age(&mut self) {
        for flash in &mut self.flashes {
            flash.age_ticks = flash.age_ticks.saturating_add(1);
        }
        self.flashes
            .retain(|flash| flash.age_ticks < flash.lifetime_ticks);
    }

    pub(crate) fn clear(&mut self) {
        self.flashes.clear();
    }

    pub(crate) fn snapshots(&self) -> Vec<EffectSnapshot> {
        self.flashes
            .iter()
            .map(|flash| EffectSnapshot {
                position: flash.position,
                age_ticks: flash.age_ticks,
                lifetime_ticks: flash.lifetime_ticks,
            })
            .collect()
    }
}
