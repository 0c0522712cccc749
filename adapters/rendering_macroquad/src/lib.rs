#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Macroquad-backed rendering adapter for Path Defence.
//!
//! Macroquad's optional audio stack depends on native ALSA development
//! libraries, which are unavailable in the containerised CI environment.
//! To keep `cargo test` usable everywhere we depend on macroquad without its
//! default `audio` feature.
//!
//! All `macroquad::ui` calls live inside the local `ui` module so the rest of
//! the adapter stays free of immediate-mode UI types.

mod ui;

use self::ui::{draw_control_panel_ui, ControlPanelUiContext};
use anyhow::Result;
use glam::Vec2;
use macroquad::{
    color::BLACK,
    input::{is_key_pressed, is_mouse_button_pressed, mouse_position, KeyCode, MouseButton},
    math::Vec2 as MacroquadVec2,
};
use path_defence_core::{GameOutcome, TowerKind, UpgradeCategory};
use path_defence_rendering::{
    Color, EffectPresentation, EnemyPresentation, FrameInput, Presentation,
    ProjectilePresentation, RenderingBackend, Scene, TowerPresentation,
};
use std::time::Duration;
use tracing::info;

/// Width of the control panel docked to the right of the field, in pixels.
pub const CONTROL_PANEL_WIDTH: f32 = 240.0;

const RANGE_RING: Color = Color::from_rgb_u8(74, 158, 255).with_alpha(0.3);
const SLOW_RING: Color = Color::from_rgb_u8(0x00, 0x66, 0xff);
const FREEZE_RING: Color = Color::from_rgb_u8(0x00, 0xff, 0xff);
const HEALTH_BACKGROUND: Color = Color::from_rgb_u8(0xff, 0x00, 0x00);
const HEALTH_FILL: Color = Color::from_rgb_u8(0x00, 0xff, 0x00).with_alpha(0.7);
const PROJECTILE_RADIUS: f32 = 3.0;

/// Button press raised by the control panel.
#[doc(hidden)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ControlPanelAction {
    /// A tower kind button was pressed.
    SelectKind(TowerKind),
    /// The start wave button was pressed.
    StartWave,
    /// The pause button was pressed.
    TogglePause,
    /// An upgrade button was pressed.
    Upgrade(UpgradeCategory),
    /// The sell button was pressed.
    Sell,
    /// The restart button was pressed.
    Restart,
}

/// Tracks UI-sourced interactions so they can be merged with physical input on the next frame.
#[doc(hidden)]
#[derive(Clone, Copy, Debug, Default)]
pub struct ControlPanelInputState {
    select_kind: Option<TowerKind>,
    start_wave: bool,
    toggle_pause: bool,
    upgrade: Option<UpgradeCategory>,
    sell: bool,
    restart: bool,
}

impl ControlPanelInputState {
    /// Records a control-panel button press.
    pub fn register(&mut self, action: ControlPanelAction) {
        match action {
            ControlPanelAction::SelectKind(kind) => self.select_kind = Some(kind),
            ControlPanelAction::StartWave => self.start_wave = true,
            ControlPanelAction::TogglePause => self.toggle_pause = true,
            ControlPanelAction::Upgrade(category) => self.upgrade = Some(category),
            ControlPanelAction::Sell => self.sell = true,
            ControlPanelAction::Restart => self.restart = true,
        }
    }

    /// Merges latched presses into `input` and clears the latches so each
    /// press fires once. Keyboard requests already present in `input` win.
    pub fn merge_into(&mut self, input: &mut FrameInput) {
        let latched = std::mem::take(self);
        input.select_kind = input.select_kind.or(latched.select_kind);
        input.start_wave |= latched.start_wave;
        input.toggle_pause |= latched.toggle_pause;
        input.upgrade = input.upgrade.or(latched.upgrade);
        input.sell |= latched.sell;
        input.restart |= latched.restart;
    }
}

/// Snapshot of edge-triggered keyboard shortcuts observed during a single frame.
#[derive(Clone, Copy, Debug, Default)]
struct KeyboardShortcuts {
    /// `Q` or `Escape` to quit the game loop.
    quit_requested: bool,
    /// `1` to `4` arm a tower kind.
    select_kind: Option<TowerKind>,
    /// `Space` starts the next wave.
    start_wave: bool,
    /// `P` toggles pause.
    toggle_pause: bool,
    /// `D`, `R` and `F` upgrade damage, range and fire rate.
    upgrade: Option<UpgradeCategory>,
    /// `X` sells the selected tower.
    sell: bool,
    /// `N` starts a new run.
    restart: bool,
}

impl KeyboardShortcuts {
    fn poll() -> Self {
        let select_kind = [KeyCode::Key1, KeyCode::Key2, KeyCode::Key3, KeyCode::Key4]
            .into_iter()
            .zip(TowerKind::ALL)
            .find(|(key, _)| is_key_pressed(*key))
            .map(|(_, kind)| kind);
        let upgrade = [
            (KeyCode::D, UpgradeCategory::Damage),
            (KeyCode::R, UpgradeCategory::Range),
            (KeyCode::F, UpgradeCategory::FireRate),
        ]
        .into_iter()
        .find(|(key, _)| is_key_pressed(*key))
        .map(|(_, category)| category);

        Self {
            quit_requested: is_key_pressed(KeyCode::Escape) || is_key_pressed(KeyCode::Q),
            select_kind,
            start_wave: is_key_pressed(KeyCode::Space),
            toggle_pause: is_key_pressed(KeyCode::P),
            upgrade,
            sell: is_key_pressed(KeyCode::X),
            restart: is_key_pressed(KeyCode::N),
        }
    }
}

/// Rendering backend implemented on top of macroquad.
#[derive(Debug, Default)]
pub struct MacroquadBackend {
    swap_interval: Option<i32>,
    show_fps: bool,
}

impl MacroquadBackend {
    /// Returns a backend that requests the platform's default swap interval.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the backend to either synchronise presentation with the display refresh rate
    /// or render as fast as possible.
    #[must_use]
    pub fn with_vsync(mut self, enabled: bool) -> Self {
        self.swap_interval = Some(i32::from(enabled));
        self
    }

    /// Configures whether the backend logs the frame rate once per second.
    #[must_use]
    pub fn with_show_fps(mut self, show: bool) -> Self {
        self.show_fps = show;
        self
    }
}

#[derive(Debug, Default)]
struct FpsCounter {
    elapsed: Duration,
    frames: u32,
}

impl FpsCounter {
    fn record_frame(&mut self, dt: Duration) -> Option<f32> {
        self.elapsed += dt;
        self.frames = self.frames.saturating_add(1);
        if self.elapsed < Duration::from_secs(1) {
            return None;
        }

        let per_second = self.frames as f32 / self.elapsed.as_secs_f32();
        self.elapsed = Duration::ZERO;
        self.frames = 0;
        Some(per_second)
    }
}

impl RenderingBackend for MacroquadBackend {
    fn run<F>(self, presentation: Presentation, mut update_scene: F) -> Result<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) + 'static,
    {
        let Self {
            swap_interval,
            show_fps,
        } = self;

        let Presentation {
            window_title,
            clear_color,
            scene,
        } = presentation;

        let mut config = macroquad::window::Conf {
            window_title,
            window_width: (scene.field.width + CONTROL_PANEL_WIDTH).round() as i32,
            window_height: scene.field.height.round() as i32,
            ..macroquad::window::Conf::default()
        };
        if let Some(swap_interval) = swap_interval {
            config.platform.swap_interval = Some(swap_interval);
        }

        macroquad::Window::from_config(config, async move {
            let mut scene = scene;
            let background = to_macroquad_color(clear_color);
            let mut fps_counter = FpsCounter::default();
            let mut control_panel_input = ControlPanelInputState::default();

            loop {
                let keyboard = KeyboardShortcuts::poll();
                if keyboard.quit_requested {
                    break;
                }

                macroquad::window::clear_background(background);

                let screen_width = macroquad::window::screen_width();
                let screen_height = macroquad::window::screen_height();
                let dt_seconds = macroquad::time::get_frame_time();
                let frame_dt = Duration::from_secs_f32(dt_seconds.max(0.0));

                let metrics_before = SceneMetrics::from_scene(&scene, screen_width, screen_height);
                let (cursor_x, cursor_y) = mouse_position();
                let frame_input = gather_frame_input_from_observations(
                    &scene,
                    &metrics_before,
                    Vec2::new(cursor_x, cursor_y),
                    is_mouse_button_pressed(MouseButton::Left),
                    keyboard,
                    &mut control_panel_input,
                );
                let cursor_world_space = frame_input.cursor_world_space;

                update_scene(frame_dt, frame_input, &mut scene);

                let metrics = SceneMetrics::from_scene(&scene, screen_width, screen_height);
                draw_field(&scene, &metrics);
                draw_path(&scene, &metrics);
                draw_range_rings(&scene, cursor_world_space, &metrics);
                draw_towers(&scene.towers, &metrics);
                draw_enemies(&scene.enemies, &metrics);
                draw_projectiles(&scene.projectiles, &metrics);
                draw_effects(&scene.effects, &metrics);
                if let Some(outcome) = scene.hud.outcome {
                    draw_game_over_banner(outcome, &metrics);
                }

                let panel_left = (screen_width - CONTROL_PANEL_WIDTH).max(0.0);
                let mut control_panel_ui = macroquad::ui::root_ui();
                draw_control_panel_ui(
                    &mut control_panel_ui,
                    ControlPanelUiContext {
                        origin: MacroquadVec2::new(panel_left, 0.0),
                        size: MacroquadVec2::new(CONTROL_PANEL_WIDTH, screen_height),
                        background: to_macroquad_color(clear_color.lighten(0.1)),
                        hud: scene.hud,
                    },
                    &mut control_panel_input,
                );

                if show_fps {
                    if let Some(per_second) = fps_counter.record_frame(frame_dt) {
                        info!(fps = per_second, "frame rate");
                    }
                }

                macroquad::window::next_frame().await;
            }
        });

        Ok(())
    }
}

/// Maps world units onto the screen area left of the control panel.
#[derive(Clone, Copy, Debug)]
struct SceneMetrics {
    scale: f32,
    offset_x: f32,
    offset_y: f32,
    field_width_scaled: f32,
    field_height_scaled: f32,
}

impl SceneMetrics {
    fn from_scene(scene: &Scene, screen_width: f32, screen_height: f32) -> Self {
        let world_width = scene.field.width;
        let world_height = scene.field.height;
        let available_width = (screen_width - CONTROL_PANEL_WIDTH).max(0.0);
        let scale = if world_width <= 0.0 || world_height <= 0.0 {
            1.0
        } else {
            (available_width / world_width).min(screen_height / world_height)
        };

        let field_width_scaled = world_width * scale;
        let field_height_scaled = world_height * scale;

        Self {
            scale,
            offset_x: ((available_width - field_width_scaled) * 0.5).max(0.0),
            offset_y: ((screen_height - field_height_scaled) * 0.5).max(0.0),
            field_width_scaled,
            field_height_scaled,
        }
    }

    fn to_screen(&self, world: Vec2) -> Vec2 {
        Vec2::new(
            self.offset_x + world.x * self.scale,
            self.offset_y + world.y * self.scale,
        )
    }

    /// World position under a screen position; `None` while the field is collapsed.
    fn to_world(&self, screen: Vec2) -> Option<Vec2> {
        if self.scale <= f32::EPSILON {
            return None;
        }
        Some(Vec2::new(
            (screen.x - self.offset_x) / self.scale,
            (screen.y - self.offset_y) / self.scale,
        ))
    }
}

fn gather_frame_input_from_observations(
    scene: &Scene,
    metrics: &SceneMetrics,
    cursor_position: Vec2,
    primary_click: bool,
    keyboard: KeyboardShortcuts,
    control_panel: &mut ControlPanelInputState,
) -> FrameInput {
    let cursor_world_space = metrics
        .to_world(cursor_position)
        .filter(|world| scene.field.contains(*world));

    let mut input = FrameInput {
        cursor_world_space,
        click: primary_click && cursor_world_space.is_some(),
        select_kind: keyboard.select_kind,
        start_wave: keyboard.start_wave,
        toggle_pause: keyboard.toggle_pause,
        upgrade: keyboard.upgrade,
        sell: keyboard.sell,
        restart: keyboard.restart,
    };
    control_panel.merge_into(&mut input);
    input
}

fn draw_field(scene: &Scene, metrics: &SceneMetrics) {
    macroquad::shapes::draw_rectangle(
        metrics.offset_x,
        metrics.offset_y,
        metrics.field_width_scaled,
        metrics.field_height_scaled,
        to_macroquad_color(scene.field.background),
    );
}

fn draw_path(scene: &Scene, metrics: &SceneMetrics) {
    let path = &scene.path;
    let color = to_macroquad_color(path.color);
    let thickness = path.width * metrics.scale;

    for pair in path.waypoints.windows(2) {
        let start = metrics.to_screen(pair[0]);
        let end = metrics.to_screen(pair[1]);
        macroquad::shapes::draw_line(start.x, start.y, end.x, end.y, thickness, color);
    }
    // Round joints so consecutive segments meet without notches.
    for waypoint in path.waypoints.iter().skip(1).take(path.waypoints.len().saturating_sub(2)) {
        let centre = metrics.to_screen(*waypoint);
        macroquad::shapes::draw_circle(centre.x, centre.y, thickness * 0.5, color);
    }
}

fn draw_range_rings(scene: &Scene, cursor_world_space: Option<Vec2>, metrics: &SceneMetrics) {
    let color = to_macroquad_color(RANGE_RING);

    if let Some(tower) = scene.towers.iter().find(|tower| tower.selected) {
        let centre = metrics.to_screen(tower.position);
        macroquad::shapes::draw_circle(centre.x, centre.y, tower.range * metrics.scale, color);
    }

    if let (Some(kind), Some(cursor)) = (scene.hud.selected_kind, cursor_world_space) {
        let centre = metrics.to_screen(cursor);
        macroquad::shapes::draw_circle_lines(
            centre.x,
            centre.y,
            kind.range() * metrics.scale,
            1.0,
            to_macroquad_color(RANGE_RING.with_alpha(0.8)),
        );
    }
}

fn draw_towers(towers: &[TowerPresentation], metrics: &SceneMetrics) {
    for tower in towers {
        let centre = metrics.to_screen(tower.position);
        let radius = tower.radius * metrics.scale;
        macroquad::shapes::draw_circle(centre.x, centre.y, radius, to_macroquad_color(tower.color));
        let outline = if tower.selected {
            macroquad::color::WHITE
        } else {
            BLACK
        };
        macroquad::shapes::draw_circle_lines(centre.x, centre.y, radius, 2.0, outline);

        if tower.level > 1 {
            let label = tower.level.to_string();
            let _ = macroquad::text::draw_text(
                &label,
                centre.x - 4.0,
                centre.y + 4.0,
                14.0,
                BLACK,
            );
        }
    }
}

fn draw_enemies(enemies: &[EnemyPresentation], metrics: &SceneMetrics) {
    let bar_height = 4.0 * metrics.scale;

    for enemy in enemies {
        let centre = metrics.to_screen(enemy.position);
        let radius = enemy.radius * metrics.scale;
        macroquad::shapes::draw_circle(centre.x, centre.y, radius, to_macroquad_color(enemy.color));

        if enemy.slowed {
            macroquad::shapes::draw_circle_lines(
                centre.x,
                centre.y,
                radius + 2.0 * metrics.scale,
                2.0,
                to_macroquad_color(SLOW_RING),
            );
        }
        if enemy.frozen {
            macroquad::shapes::draw_circle_lines(
                centre.x,
                centre.y,
                radius + 3.0 * metrics.scale,
                3.0,
                to_macroquad_color(FREEZE_RING),
            );
        }

        let bar_width = radius * 2.0;
        let bar_left = centre.x - radius;
        let bar_top = centre.y - radius - 8.0 * metrics.scale;
        macroquad::shapes::draw_rectangle(
            bar_left,
            bar_top,
            bar_width,
            bar_height,
            to_macroquad_color(HEALTH_BACKGROUND),
        );
        let fill_width = bar_width * enemy.health_fraction.clamp(0.0, 1.0);
        if fill_width > f32::EPSILON {
            macroquad::shapes::draw_rectangle(
                bar_left,
                bar_top,
                fill_width,
                bar_height,
                to_macroquad_color(HEALTH_FILL),
            );
        }
    }
}

fn draw_projectiles(projectiles: &[ProjectilePresentation], metrics: &SceneMetrics) {
    for projectile in projectiles {
        let centre = metrics.to_screen(projectile.position);
        macroquad::shapes::draw_circle(
            centre.x,
            centre.y,
            PROJECTILE_RADIUS * metrics.scale,
            to_macroquad_color(projectile.color),
        );
    }
}

fn draw_effects(effects: &[EffectPresentation], metrics: &SceneMetrics) {
    for effect in effects {
        let centre = metrics.to_screen(effect.position);
        macroquad::shapes::draw_circle_lines(
            centre.x,
            centre.y,
            effect.radius * metrics.scale,
            2.0,
            to_macroquad_color(effect.color),
        );
    }
}

fn draw_game_over_banner(outcome: GameOutcome, metrics: &SceneMetrics) {
    macroquad::shapes::draw_rectangle(
        metrics.offset_x,
        metrics.offset_y,
        metrics.field_width_scaled,
        metrics.field_height_scaled,
        macroquad::color::Color::new(0.0, 0.0, 0.0, 0.6),
    );

    let centre = metrics.to_screen(Vec2::ZERO)
        + Vec2::new(metrics.field_width_scaled, metrics.field_height_scaled) * 0.5;
    let _ = macroquad::text::draw_text(
        "GAME OVER",
        centre.x - 110.0,
        centre.y - 10.0,
        48.0,
        macroquad::color::WHITE,
    );
    let summary = format!(
        "Final score: {}  Wave: {}  (N to restart)",
        outcome.final_score, outcome.wave
    );
    let _ = macroquad::text::draw_text(
        &summary,
        centre.x - 150.0,
        centre.y + 24.0,
        20.0,
        macroquad::color::WHITE,
    );
}

fn to_macroquad_color(color: Color) -> macroquad::color::Color {
    macroquad::color::Color::new(color.red, color.green, color.blue, color.alpha)
}

#[cfg(test)]
mod tests {
    use super::*;
    use path_defence_core::{StatusSnapshot, WavePhase};
    use path_defence_rendering::{FieldPresentation, HudPresentation, PathPresentation};

    fn base_scene() -> Scene {
        let field = FieldPresentation::new(800.0, 450.0, Color::from_rgb_u8(20, 24, 32))
            .expect("valid field");
        let path = PathPresentation {
            waypoints: vec![Vec2::new(0.0, 300.0), Vec2::new(800.0, 300.0)],
            width: 20.0,
            color: Color::from_rgb_u8(100, 100, 100).with_alpha(0.5),
        };
        let hud = HudPresentation {
            status: StatusSnapshot {
                currency: 150,
                lives: 20,
                score: 0,
                wave: 1,
                phase: WavePhase::Idle,
                spawned: 0,
                quota: 5,
                paused: false,
                game_over: false,
                tick: 0,
            },
            selected_kind: None,
            selected_tower: None,
            outcome: None,
        };
        Scene::new(field, path, hud)
    }

    #[test]
    fn scene_metrics_fit_field_left_of_panel() {
        let scene = base_scene();
        let metrics = SceneMetrics::from_scene(&scene, 800.0 + CONTROL_PANEL_WIDTH, 450.0);
        assert!((metrics.scale - 1.0).abs() <= f32::EPSILON);
        assert_eq!(metrics.to_screen(Vec2::new(10.0, 20.0)), Vec2::new(10.0, 20.0));

        let doubled = SceneMetrics::from_scene(&scene, 1600.0 + CONTROL_PANEL_WIDTH, 1200.0);
        assert!((doubled.scale - 2.0).abs() <= f32::EPSILON);
        assert!(doubled.offset_y > 0.0);
    }

    #[test]
    fn clicks_outside_the_field_are_dropped() {
        let scene = base_scene();
        let metrics = SceneMetrics::from_scene(&scene, 800.0 + CONTROL_PANEL_WIDTH, 450.0);
        let mut panel = ControlPanelInputState::default();

        let inside = gather_frame_input_from_observations(
            &scene,
            &metrics,
            Vec2::new(120.0, 80.0),
            true,
            KeyboardShortcuts::default(),
            &mut panel,
        );
        assert!(inside.click);
        assert_eq!(inside.click_position(), Some(Vec2::new(120.0, 80.0)));

        let over_panel = gather_frame_input_from_observations(
            &scene,
            &metrics,
            Vec2::new(900.0, 80.0),
            true,
            KeyboardShortcuts::default(),
            &mut panel,
        );
        assert!(!over_panel.click);
        assert!(over_panel.cursor_world_space.is_none());

        let letterboxed = SceneMetrics::from_scene(&scene, 1600.0 + CONTROL_PANEL_WIDTH, 1200.0);
        let above_field = gather_frame_input_from_observations(
            &scene,
            &letterboxed,
            Vec2::new(10.0, 10.0),
            true,
            KeyboardShortcuts::default(),
            &mut panel,
        );
        assert!(!above_field.click);
        assert!(above_field.cursor_world_space.is_none());
    }

    #[test]
    fn keyboard_and_panel_requests_are_merged() {
        let scene = base_scene();
        let metrics = SceneMetrics::from_scene(&scene, 800.0 + CONTROL_PANEL_WIDTH, 450.0);
        let mut panel = ControlPanelInputState::default();
        panel.register(ControlPanelAction::Sell);
        panel.register(ControlPanelAction::SelectKind(TowerKind::Rapid));

        let keyboard = KeyboardShortcuts {
            select_kind: Some(TowerKind::Sniper),
            start_wave: true,
            ..KeyboardShortcuts::default()
        };
        let input = gather_frame_input_from_observations(
            &scene,
            &metrics,
            Vec2::ZERO,
            false,
            keyboard,
            &mut panel,
        );

        assert_eq!(input.select_kind, Some(TowerKind::Sniper));
        assert!(input.start_wave);
        assert!(input.sell);
        assert!(!input.toggle_pause);
    }

    #[test]
    fn vsync_selects_the_swap_interval() {
        assert_eq!(MacroquadBackend::new().swap_interval, None);
        assert_eq!(MacroquadBackend::new().with_vsync(true).swap_interval, Some(1));
        assert_eq!(MacroquadBackend::new().with_vsync(false).swap_interval, Some(0));
    }

    #[test]
    fn fps_counter_reports_once_per_second() {
        let mut counter = FpsCounter::default();
        assert_eq!(counter.record_frame(Duration::from_millis(500)), None);
        let reported = counter
            .record_frame(Duration::from_millis(500))
            .expect("one second elapsed");
        assert!((reported - 2.0).abs() <= 1e-5);
        assert_eq!(counter.record_frame(Duration::from_millis(10)), None);
    }
}
