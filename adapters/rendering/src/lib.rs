#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Path Defence adapters.

use anyhow::Result as AnyResult;
use glam::Vec2;
use path_defence_core::{
    EnemyId, EnemyTier, GameOutcome, Point, StatusSnapshot, TowerId, TowerKind, TowerSnapshot,
    UpgradeCategory,
};
use std::{error::Error, fmt, time::Duration};

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }

    /// Returns the same color with its alpha channel replaced.
    #[must_use]
    pub const fn with_alpha(self, alpha: f32) -> Self {
        Self { alpha, ..self }
    }

    /// Returns a new color lightened towards white by the provided amount.
    #[must_use]
    pub fn lighten(self, amount: f32) -> Self {
        let amount = amount.clamp(0.0, 1.0);

        Self {
            red: lighten_channel(self.red, amount),
            green: lighten_channel(self.green, amount),
            blue: lighten_channel(self.blue, amount),
            alpha: self.alpha,
        }
    }
}

fn lighten_channel(channel: f32, amount: f32) -> f32 {
    channel + (1.0 - channel) * amount
}

/// Fill colour and body radius of a tower kind.
#[must_use]
pub const fn tower_style(kind: TowerKind) -> (Color, f32) {
    match kind {
        TowerKind::Basic => (Color::from_rgb_u8(0x4a, 0x9e, 0xff), 12.0),
        TowerKind::Sniper => (Color::from_rgb_u8(0xff, 0x6b, 0x6b), 10.0),
        TowerKind::Rapid => (Color::from_rgb_u8(0xff, 0xd9, 0x3d), 8.0),
        TowerKind::Freeze => (Color::from_rgb_u8(0x6b, 0xcf, 0x7f), 14.0),
    }
}

/// Fill colour and body radius of an enemy tier.
#[must_use]
pub const fn enemy_style(tier: EnemyTier) -> (Color, f32) {
    match tier {
        EnemyTier::Grunt => (Color::from_rgb_u8(0xff, 0x47, 0x57), 8.0),
        EnemyTier::Soldier => (Color::from_rgb_u8(0xff, 0x63, 0x48), 10.0),
        EnemyTier::Brute => (Color::from_rgb_u8(0xff, 0x38, 0x38), 12.0),
        EnemyTier::Tank => (Color::from_rgb_u8(0xc4, 0x45, 0x69), 14.0),
    }
}

/// Converts a world point into the vector type used by presentations.
#[must_use]
pub fn to_vec2(point: Point) -> Vec2 {
    Vec2::new(point.x(), point.y())
}

/// Converts a presentation vector back into a world point.
#[must_use]
pub fn to_point(vector: Vec2) -> Point {
    Point::new(vector.x, vector.y)
}

/// Input snapshot gathered by adapters before updating the scene.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct FrameInput {
    /// Cursor position expressed in world units when it lies over the field.
    pub cursor_world_space: Option<Vec2>,
    /// Whether the primary button was pressed over the field on this frame.
    pub click: bool,
    /// Tower kind picked from the menu on this frame.
    pub select_kind: Option<TowerKind>,
    /// Whether the player asked for the next wave on this frame.
    pub start_wave: bool,
    /// Whether the player toggled pause on this frame.
    pub toggle_pause: bool,
    /// Upgrade requested for the selected tower on this frame.
    pub upgrade: Option<UpgradeCategory>,
    /// Whether the player asked to sell the selected tower on this frame.
    pub sell: bool,
    /// Whether the player asked to restart the run on this frame.
    pub restart: bool,
}

impl FrameInput {
    /// World-space click location, if a click happened over the field.
    #[must_use]
    pub fn click_position(&self) -> Option<Vec2> {
        if self.click {
            self.cursor_world_space
        } else {
            None
        }
    }
}

/// Playing field dimensions and background.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FieldPresentation {
    /// Width of the field in world units.
    pub width: f32,
    /// Height of the field in world units.
    pub height: f32,
    /// Colour used to fill the field.
    pub background: Color,
}

impl FieldPresentation {
    /// Creates a new field descriptor.
    ///
    /// Returns an error when either dimension is not a positive finite value.
    pub fn new(width: f32, height: f32, background: Color) -> Result<Self, RenderingError> {
        if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
            return Err(RenderingError::InvalidFieldSize { width, height });
        }

        Ok(Self {
            width,
            height,
            background,
        })
    }

    /// Reports whether a world position lies on the field.
    #[must_use]
    pub fn contains(&self, position: Vec2) -> bool {
        (0.0..=self.width).contains(&position.x) && (0.0..=self.height).contains(&position.y)
    }
}

/// Polyline enemies walk along.
#[derive(Clone, Debug, PartialEq)]
pub struct PathPresentation {
    /// Ordered waypoints in world units.
    pub waypoints: Vec<Vec2>,
    /// Stroke width of the drawn road.
    pub width: f32,
    /// Road colour.
    pub color: Color,
}

/// Tower drawn on the field.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TowerPresentation {
    /// Identifier of the tower.
    pub id: TowerId,
    /// Kind of the tower.
    pub kind: TowerKind,
    /// Centre in world units.
    pub position: Vec2,
    /// Body radius.
    pub radius: f32,
    /// Targeting radius, drawn as a ring when selected.
    pub range: f32,
    /// Upgrade level printed on the body.
    pub level: u32,
    /// Body colour.
    pub color: Color,
    /// Whether the player has the tower selected.
    pub selected: bool,
}

impl TowerPresentation {
    /// Builds the presentation of a tower snapshot.
    #[must_use]
    pub fn from_snapshot(snapshot: &TowerSnapshot, selected: bool) -> Self {
        let (color, radius) = tower_style(snapshot.kind);
        Self {
            id: snapshot.id,
            kind: snapshot.kind,
            position: to_vec2(snapshot.position),
            radius,
            range: snapshot.range,
            level: snapshot.level,
            color,
            selected,
        }
    }
}

/// Enemy drawn on the path.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnemyPresentation {
    /// Identifier of the enemy.
    pub id: EnemyId,
    /// Centre in world units.
    pub position: Vec2,
    /// Body radius.
    pub radius: f32,
    /// Remaining health as a fraction of the maximum.
    pub health_fraction: f32,
    /// Body colour.
    pub color: Color,
    /// Whether a slow status is active.
    pub slowed: bool,
    /// Whether a freeze status is active.
    pub frozen: bool,
}

/// Projectile in flight.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProjectilePresentation {
    /// Centre in world units.
    pub position: Vec2,
    /// Colour matching the firing tower.
    pub color: Color,
}

/// Expanding ring left behind by a hit.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EffectPresentation {
    /// Centre in world units.
    pub position: Vec2,
    /// Current ring radius.
    pub radius: f32,
    /// Ring colour, fading with age.
    pub color: Color,
}

/// Selected tower details shown next to its upgrade buttons.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SelectedTowerPresentation {
    /// Current tower statistics, including its sale value.
    pub snapshot: TowerSnapshot,
    /// Price of the next upgrade in each category.
    pub upgrade_costs: [(UpgradeCategory, u32); 3],
}

/// Heads-up display contents.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HudPresentation {
    /// Counters of the current run.
    pub status: StatusSnapshot,
    /// Tower kind armed for placement.
    pub selected_kind: Option<TowerKind>,
    /// Tower selected for upgrades or sale.
    pub selected_tower: Option<SelectedTowerPresentation>,
    /// Final result once the run ended.
    pub outcome: Option<GameOutcome>,
}

/// Scene description combining the field, the path and its inhabitants.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// Playing field dimensions.
    pub field: FieldPresentation,
    /// Route enemies follow.
    pub path: PathPresentation,
    /// Towers currently standing.
    pub towers: Vec<TowerPresentation>,
    /// Enemies currently on the path.
    pub enemies: Vec<EnemyPresentation>,
    /// Projectiles in flight.
    pub projectiles: Vec<ProjectilePresentation>,
    /// Hit flashes still visible.
    pub effects: Vec<EffectPresentation>,
    /// Heads-up display contents.
    pub hud: HudPresentation,
}

impl Scene {
    /// Creates a scene with the static layout and no inhabitants.
    #[must_use]
    pub fn new(field: FieldPresentation, path: PathPresentation, hud: HudPresentation) -> Self {
        Self {
            field,
            path,
            towers: Vec::new(),
            enemies: Vec::new(),
            projectiles: Vec::new(),
            effects: Vec::new(),
            hud,
        }
    }
}

/// Presentation descriptor consumed by rendering backends.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Title used by the created window.
    pub window_title: String,
    /// Solid color used to clear each frame.
    pub clear_color: Color,
    /// Scene content that should be displayed.
    pub scene: Scene,
}

impl Presentation {
    /// Constructs a new presentation descriptor.
    #[must_use]
    pub fn new<T>(window_title: T, clear_color: Color, scene: Scene) -> Self
    where
        T: Into<String>,
    {
        Self {
            window_title: window_title.into(),
            clear_color,
            scene,
        }
    }
}

/// Rendering backend capable of presenting Path Defence scenes.
pub trait RenderingBackend {
    /// Runs the rendering backend until it is requested to exit.
    ///
    /// The provided `update_scene` closure receives the frame delta, per-frame
    /// input captured by the adapter, and may mutate the scene before it is
    /// rendered.
    fn run<F>(self, presentation: Presentation, update_scene: F) -> AnyResult<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) + 'static;
}

/// Errors that can occur when constructing rendering descriptors.
#[derive(Debug, PartialEq)]
pub enum RenderingError {
    /// Field dimensions must be positive and finite.
    InvalidFieldSize {
        /// Provided width.
        width: f32,
        /// Provided height.
        height: f32,
    },
}

impl fmt::Display for RenderingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidFieldSize { width, height } => {
                write!(
                    f,
                    "field dimensions must be positive (received {width}x{height})"
                )
            }
        }
    }
}

impl Error for RenderingError {}
