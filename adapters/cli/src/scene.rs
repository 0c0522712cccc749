//! Populates rendering scenes from the simulation state.

use path_defence_core::UpgradeCategory;
use path_defence_rendering::{
    enemy_style, to_vec2, tower_style, Color, EffectPresentation, EnemyPresentation,
    FieldPresentation, HudPresentation, PathPresentation, ProjectilePresentation, RenderingError,
    Scene, SelectedTowerPresentation, TowerPresentation,
};
use path_defence_simulation::Simulation;
use path_defence_system_builder::Selection;
use path_defence_world::query;

/// Colour used to clear the window around the field.
pub const CLEAR_COLOR: Color = Color::from_rgb_u8(16, 18, 24);

const FIELD_BACKGROUND: Color = Color::from_rgb_u8(28, 36, 30);
const PATH_COLOR: Color = Color::from_rgb_u8(100, 100, 100).with_alpha(0.5);
const PATH_WIDTH: f32 = 20.0;
const HIT_EFFECT_COLOR: Color = Color::from_rgb_u8(0xff, 0xff, 0x00);
const HIT_EFFECT_GROWTH: f32 = 2.0;

const UPGRADE_ORDER: [UpgradeCategory; 3] = [
    UpgradeCategory::Damage,
    UpgradeCategory::Range,
    UpgradeCategory::FireRate,
];

/// Builds the scene for the simulation's current state.
pub fn build_scene(simulation: &Simulation) -> Result<Scene, RenderingError> {
    let world = simulation.world();
    let config = query::config(world);
    let field = FieldPresentation::new(config.field.width, config.field.height, FIELD_BACKGROUND)?;
    let path = PathPresentation {
        waypoints: query::path(world)
            .waypoints()
            .iter()
            .copied()
            .map(to_vec2)
            .collect(),
        width: PATH_WIDTH,
        color: PATH_COLOR,
    };

    let mut scene = Scene::new(field, path, hud(simulation));
    populate_scene(simulation, &mut scene);
    Ok(scene)
}

/// Refreshes every dynamic part of `scene` from the simulation.
///
/// The field and path are left untouched; they only change when a new
/// configuration is loaded.
pub fn populate_scene(simulation: &Simulation, scene: &mut Scene) {
    let world = simulation.world();
    let selected = simulation.selected_tower();

    scene.towers.clear();
    scene.towers.extend(
        query::tower_view(world)
            .iter()
            .map(|tower| TowerPresentation::from_snapshot(tower, selected == Some(tower.id))),
    );

    scene.enemies.clear();
    scene.enemies.extend(query::enemy_view(world).iter().map(|enemy| {
        let (color, radius) = enemy_style(enemy.tier);
        let health_fraction = if enemy.max_hp > 0.0 {
            (enemy.hp / enemy.max_hp).clamp(0.0, 1.0)
        } else {
            0.0
        };
        EnemyPresentation {
            id: enemy.id,
            position: to_vec2(enemy.position),
            radius,
            health_fraction,
            color,
            slowed: enemy.slowed,
            frozen: enemy.frozen,
        }
    }));

    scene.projectiles.clear();
    scene.projectiles.extend(
        query::projectiles(world)
            .into_iter()
            .map(|projectile| ProjectilePresentation {
                position: to_vec2(projectile.position),
                color: tower_style(projectile.kind).0,
            }),
    );

    scene.effects.clear();
    scene
        .effects
        .extend(query::effects(world).into_iter().map(|effect| EffectPresentation {
            position: to_vec2(effect.position),
            radius: effect.age_ticks as f32 * HIT_EFFECT_GROWTH,
            color: HIT_EFFECT_COLOR.with_alpha(effect.remaining_fraction()),
        }));

    scene.hud = hud(simulation);
}

fn hud(simulation: &Simulation) -> HudPresentation {
    let world = simulation.world();
    let selected_kind = match simulation.selection() {
        Selection::Kind(kind) => Some(kind),
        Selection::None | Selection::Tower(_) => None,
    };
    let selected_tower = simulation.selected_tower().and_then(|id| {
        let snapshot = query::tower(world, id)?;
        let mut upgrade_costs = [(UpgradeCategory::Damage, 0); 3];
        for (slot, category) in upgrade_costs.iter_mut().zip(UPGRADE_ORDER) {
            *slot = (category, query::upgrade_cost(world, id, category)?);
        }
        Some(SelectedTowerPresentation {
            snapshot,
            upgrade_costs,
        })
    });

    HudPresentation {
        status: simulation.status(),
        selected_kind,
        selected_tower,
        outcome: simulation.outcome(),
    }
}
