#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure player-interaction system that turns selections and clicks into
//! placement, upgrade and sale commands.

use path_defence_core::{Command, Event, Point, TowerId, TowerKind, UpgradeCategory};

/// Distance from a tower centre within which a click selects that tower.
pub const SELECT_RADIUS: f32 = 15.0;

/// What the player currently has selected.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Selection {
    /// Nothing is selected.
    #[default]
    None,
    /// A tower kind is armed for placement.
    Kind(TowerKind),
    /// An existing tower is selected for upgrades or sale.
    Tower(TowerId),
}

/// Input snapshot distilled from adapter-provided frame input data.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BuilderInput {
    /// Tower kind picked from the menu on this frame.
    pub select_kind: Option<TowerKind>,
    /// World-space location the player clicked on this frame.
    pub click: Option<Point>,
    /// Upgrade requested for the selected tower on this frame.
    pub upgrade: Option<UpgradeCategory>,
    /// Indicates whether the player asked to sell the selected tower.
    pub sell: bool,
}

/// Player-interaction system holding the current selection.
#[derive(Debug, Clone, Default)]
pub struct Builder {
    selection: Selection,
}

impl Builder {
    /// Creates a new builder system with nothing selected.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            selection: Selection::None,
        }
    }

    /// Current selection.
    #[must_use]
    pub const fn selection(&self) -> Selection {
        self.selection
    }

    /// Tower currently selected, if any.
    #[must_use]
    pub const fn selected_tower(&self) -> Option<TowerId> {
        match self.selection {
            Selection::Tower(tower) => Some(tower),
            Selection::None | Selection::Kind(_) => None,
        }
    }

    /// Updates the selection from world events.
    ///
    /// A successful placement disarms the selected kind; selling the selected
    /// tower or resetting the run clears the selection.
    pub fn observe(&mut self, events: &[Event]) {
        for event in events {
            match event {
                Event::TowerPlaced { .. } => {
                    if matches!(self.selection, Selection::Kind(_)) {
                        self.selection = Selection::None;
                    }
                }
                Event::TowerSold { tower, .. } => {
                    if self.selection == Selection::Tower(*tower) {
                        self.selection = Selection::None;
                    }
                }
                Event::RunReset => self.selection = Selection::None,
                _ => {}
            }
        }
    }

    /// Consumes world events and adapter-derived input to emit builder commands.
    ///
    /// The `tower_at` closure should mirror the semantics of the world's
    /// `query::tower_at` helper queried with [`SELECT_RADIUS`].
    pub fn handle<F>(
        &mut self,
        events: &[Event],
        input: BuilderInput,
        mut tower_at: F,
        out: &mut Vec<Command>,
    ) where
        F: FnMut(Point) -> Option<TowerId>,
    {
        self.observe(events);

        if let Some(kind) = input.select_kind {
            self.selection = if self.selection == Selection::Kind(kind) {
                Selection::None
            } else {
                Selection::Kind(kind)
            };
        }

        if let Some(position) = input.click {
            if let Some(tower) = tower_at(position) {
                self.selection = Selection::Tower(tower);
            } else {
                match self.selection {
                    Selection::Kind(kind) => out.push(Command::PlaceTower { kind, position }),
                    Selection::Tower(_) => self.selection = Selection::None,
                    Selection::None => {}
                }
            }
        }

        let Some(tower) = self.selected_tower() else {
            return;
        };
        if let Some(category) = input.upgrade {
            out.push(Command::UpgradeTower { tower, category });
        }
        if input.sell {
            out.push(Command::SellTower { tower });
        }
    }
}
