//! Immediate-mode UI helpers for the Macroquad rendering backend.
//!
//! This module hosts all uses of `macroquad::ui` so the rest of the adapter can
//! remain agnostic of Macroquad's UI types.

use crate::{ControlPanelAction, ControlPanelInputState};
use macroquad::{
    color::{Color, WHITE},
    math::{RectOffset, Vec2},
    ui::{hash, Ui},
};
use path_defence_core::{TowerKind, UpgradeCategory, WavePhase};
use path_defence_rendering::HudPresentation;

/// Snapshot of the control panel's UI layout and data for the current frame.
#[derive(Clone, Copy, Debug)]
pub(crate) struct ControlPanelUiContext {
    /// Top-left corner of the panel in screen coordinates.
    pub(crate) origin: Vec2,
    /// Panel dimensions in screen space.
    pub(crate) size: Vec2,
    /// Background colour applied to the window skin.
    pub(crate) background: Color,
    /// Counters and selection mirrored from the simulation.
    pub(crate) hud: HudPresentation,
}

/// Renders the control panel and latches any button presses for the next frame.
pub(crate) fn draw_control_panel_ui(
    ui: &mut Ui,
    context: ControlPanelUiContext,
    input: &mut ControlPanelInputState,
) {
    let mut skin = ui.default_skin();
    skin.margin = 0.0;

    let window_style = ui
        .style_builder()
        .color(context.background)
        .color_hovered(context.background)
        .color_clicked(context.background)
        .color_selected(context.background)
        .color_selected_hovered(context.background)
        .color_inactive(context.background)
        .text_color(WHITE)
        .margin(RectOffset::new(12.0, 12.0, 12.0, 12.0))
        .build();
    skin.window_style = window_style;

    let label_style = ui
        .style_builder()
        .text_color(WHITE)
        .margin(RectOffset::new(0.0, 0.0, 2.0, 2.0))
        .build();
    skin.label_style = label_style;

    let button_style = ui
        .style_builder()
        .text_color(WHITE)
        .text_color_hovered(WHITE)
        .text_color_clicked(WHITE)
        .color(Color::from_rgba(70, 70, 70, 255))
        .color_hovered(Color::from_rgba(96, 96, 96, 255))
        .color_clicked(Color::from_rgba(56, 56, 56, 255))
        .margin(RectOffset::new(4.0, 4.0, 4.0, 4.0))
        .build();
    skin.button_style = button_style;

    ui.push_skin(&skin);

    let hud = context.hud;
    let mut pressed = Vec::new();
    let _ = ui.window(hash!("control_panel"), context.origin, context.size, |ui| {
        let status = hud.status;
        ui.label(
            None,
            &format!(
                "Wave {} - Enemies: {}/{}",
                status.wave, status.spawned, status.quota
            ),
        );
        ui.label(None, &format!("Money: {}", status.currency));
        ui.label(None, &format!("Lives: {}", status.lives));
        ui.label(None, &format!("Score: {}", status.score));
        ui.label(None, phase_label(status.phase, status.paused));
        ui.separator();

        for (index, kind) in TowerKind::ALL.into_iter().enumerate() {
            let marker = if hud.selected_kind == Some(kind) { ">" } else { " " };
            let text = format!(
                "{marker}[{}] {} ({})",
                index + 1,
                kind_label(kind),
                kind.cost()
            );
            if ui.button(None, text.as_str()) {
                pressed.push(ControlPanelAction::SelectKind(kind));
            }
        }
        ui.separator();

        if status.phase == WavePhase::Idle && ui.button(None, "Start wave [Space]") {
            pressed.push(ControlPanelAction::StartWave);
        }
        let pause_text = if status.paused {
            "Resume [P]"
        } else {
            "Pause [P]"
        };
        if ui.button(None, pause_text) {
            pressed.push(ControlPanelAction::TogglePause);
        }
        if ui.button(None, "New run [N]") {
            pressed.push(ControlPanelAction::Restart);
        }

        if let Some(selected) = hud.selected_tower {
            let tower = selected.snapshot;
            ui.separator();
            ui.label(
                None,
                &format!("{} tower, level {}", kind_label(tower.kind), tower.level),
            );
            ui.label(None, &format!("Damage: {:.1}", tower.damage));
            ui.label(None, &format!("Range: {:.0}", tower.range));
            ui.label(None, &format!("Fire rate: {} ticks", tower.fire_rate_ticks));
            ui.label(None, &format!("Kills: {}", tower.kills));

            for (category, cost) in selected.upgrade_costs {
                let text = format!("{} ({cost})", upgrade_label(category));
                if ui.button(None, text.as_str()) {
                    pressed.push(ControlPanelAction::Upgrade(category));
                }
            }
            if ui.button(None, format!("Sell [X] ({})", tower.sell_value).as_str()) {
                pressed.push(ControlPanelAction::Sell);
            }
        }
    });

    ui.pop_skin();

    for action in pressed {
        input.register(action);
    }
}

fn phase_label(phase: WavePhase, paused: bool) -> &'static str {
    if paused {
        return "Paused";
    }
    match phase {
        WavePhase::Idle => "Waiting for next wave",
        WavePhase::Spawning => "Wave incoming",
        WavePhase::Clearing => "Clearing the path",
    }
}

fn kind_label(kind: TowerKind) -> &'static str {
    match kind {
        TowerKind::Basic => "Basic",
        TowerKind::Sniper => "Sniper",
        TowerKind::Rapid => "Rapid",
        TowerKind::Freeze => "Freeze",
    }
}

fn upgrade_label(category: UpgradeCategory) -> &'static str {
    match category {
        UpgradeCategory::Damage => "Damage [D]",
        UpgradeCategory::Range => "Range [R]",
        UpgradeCategory::FireRate => "Fire rate [F]",
    }
}
