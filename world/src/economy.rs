//! Currency, score, lives and the pricing rules built on top of them.

use path_defence_core::{TowerKind, UpgradeCategory};

use crate::config::{EconomyConfig, UpgradeConfig};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Economy {
    pub(crate) currency: u32,
    pub(crate) score: u64,
    pub(crate) lives: u32,
}

impl Economy {
    pub(crate) fn new(config: &EconomyConfig) -> Self {
        Self {
            currency: config.starting_currency,
            score: 0,
            lives: config.starting_lives,
        }
    }

    /// Debits `amount` when affordable. Returns `false` and leaves the
    /// balance untouched otherwise.
    pub(crate) fn try_debit(&mut self, amount: u32) -> bool {
        match self.currency.checked_sub(amount) {
            Some(remaining) => {
                self.currency = remaining;
                true
            }
            None => false,
        }
    }

    /// Debits an amount the caller has already checked against the balance.
    pub(crate) fn debit(&mut self, amount: u32) {
        self.currency = self.currency.saturating_sub(amount);
    }

    pub(crate) fn credit(&mut self, amount: u32) {
        self.currency = self.currency.saturating_add(amount);
    }

    /// Grants the kill reward and twice its value in score.
    pub(crate) fn award_kill(&mut self, reward: u32) -> u64 {
        let score = u64::from(reward) * 2;
        self.credit(reward);
        self.score = self.score.saturating_add(score);
        score
    }

    /// Removes a life, returning the lives left.
    pub(crate) fn lose_life(&mut self) -> u32 {
        self.lives = self.lives.saturating_sub(1);
        self.lives
    }
}

/// Price of the next upgrade in `category` for a tower at `level`.
pub(crate) fn upgrade_cost(config: &UpgradeConfig, category: UpgradeCategory, level: u32) -> u32 {
    category.base_cost().saturating_add(
        level
            .saturating_sub(1)
            .saturating_mul(config.cost_step_per_level),
    )
}

/// Refund granted when a tower is sold. Always strictly below the currency
/// invested in the tower.
pub(crate) fn sell_value(
    config: &UpgradeConfig,
    kind: TowerKind,
    level: u32,
    invested: u32,
) -> u32 {
    let heuristic = kind.cost() as f32 * config.sell_fraction.max(0.0)
        + level.saturating_sub(1) as f32 * config.sell_bonus_per_level as f32;
    (heuristic.floor() as u32).min(invested.saturating_sub(1))
}
