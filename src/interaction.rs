//! Placement input handling.
//!
//! This module contains the systems that read the pointer and keyboard,
//! pick the surface under the cursor, feed the placement session and apply
//! undo requests.

use bevy::gizmos::config::{DefaultGizmoConfigGroup, GizmoConfigStore};
use bevy::input::mouse::MouseButton;
use bevy::input::ButtonInput;
use bevy::math::Ray3d;
use bevy::prelude::*;
use bevy::window::PrimaryWindow;

use crate::catalog::{PlacementCatalog, PrefabRef};
use crate::ecs_host::{EcsPlacementHost, Obstacle, PlacementWorld};
use crate::history::PlacementHistory;
use crate::math::ray_plane_intersection;
use crate::session::PlacementSession;
use crate::types::{
    PlaceableCollider, PlacementCamera, PlacementInput, PlacementKeys, PlacementSettings,
    PlacementStyle, PlacementSurface, StepDirection, TickOutcome,
};

/// The placement session driven by the plugin's systems.
///
/// Select prefabs, toggle building and assign the parent through this
/// resource:
///
/// ```ignore
/// fn start_building(mut placement: ResMut<ActivePlacement>, town: Query<Entity, With<Town>>) {
///     placement.set_parent(town.iter().next());
///     placement.select(0);
///     placement.set_building(true);
/// }
/// ```
#[derive(Resource, Default, Deref, DerefMut)]
pub struct ActivePlacement(pub PlacementSession<PrefabRef, Entity>);

/// Nearest hit of `ray` with any placement surface.
pub fn pick_surface<'a>(
    ray: &Ray3d,
    surfaces: impl IntoIterator<Item = (&'a GlobalTransform, &'a PlacementSurface)>,
) -> Option<Vec3> {
    let mut best: Option<(f32, Vec3)> = None;

    for (transform, surface) in surfaces {
        let origin = transform.translation();
        let normal = transform.up();
        let Some((t, point)) = ray_plane_intersection(ray, origin, *normal) else {
            continue;
        };

        if let Some(half_size) = surface.half_size {
            let local = point - origin;
            let u = local.dot(*transform.right());
            let v = local.dot(*transform.back());
            let (scale, _, _) = transform.to_scale_rotation_translation();
            if u.abs() > half_size.x * scale.x.abs() || v.abs() > half_size.y * scale.z.abs() {
                continue;
            }
        }

        if best.is_none_or(|(best_t, _)| t < best_t) {
            best = Some((t, point));
        }
    }

    best.map(|(_, point)| point)
}

/// Map a pair of keys to a step direction for this frame.
fn step_input(
    keyboard: &ButtonInput<KeyCode>,
    increase: KeyCode,
    decrease: KeyCode,
) -> Option<StepDirection> {
    if keyboard.just_pressed(increase) {
        Some(StepDirection::Increase)
    } else if keyboard.just_pressed(decrease) {
        Some(StepDirection::Decrease)
    } else {
        None
    }
}

/// Gather this frame's placement input.
pub fn read_input(
    keys: &PlacementKeys,
    keyboard: &ButtonInput<KeyCode>,
    buttons: &ButtonInput<MouseButton>,
) -> PlacementInput {
    let blocked = keyboard.any_pressed(keys.commit_blockers.iter().copied());
    PlacementInput {
        rotate: step_input(keyboard, keys.rotate_increase, keys.rotate_decrease),
        rescale: step_input(keyboard, keys.scale_increase, keys.scale_decrease),
        commit: buttons.just_pressed(keys.commit) && !blocked,
    }
}

/// Apply the overlay style to the default gizmo group.
pub fn configure_gizmos(mut config_store: ResMut<GizmoConfigStore>, style: Res<PlacementStyle>) {
    let (config, _) = config_store.config_mut::<DefaultGizmoConfigGroup>();
    config.line.width = style.line_width;
    config.depth_bias = style.depth_bias;
}

/// Rebuild the session's catalog after a tab switch or rescan.
pub fn refresh_catalog(
    mut catalog: ResMut<PlacementCatalog>,
    mut placement: ResMut<ActivePlacement>,
    asset_server: Res<AssetServer>,
) {
    if let Some(prefabs) = catalog.reload(|path| asset_server.load(path)) {
        placement.set_catalog(prefabs);
    }
}

/// Run one tick of the placement session.
#[allow(clippy::too_many_arguments)]
pub fn placement_tick(
    mut commands: Commands,
    mut placement: ResMut<ActivePlacement>,
    mut placement_world: ResMut<PlacementWorld>,
    mut history: ResMut<PlacementHistory>,
    settings: Res<PlacementSettings>,
    keys: Res<PlacementKeys>,
    keyboard: Res<ButtonInput<KeyCode>>,
    buttons: Res<ButtonInput<MouseButton>>,
    asset_server: Res<AssetServer>,
    cameras: Query<(&Camera, &GlobalTransform), With<PlacementCamera>>,
    windows: Query<&Window, With<PrimaryWindow>>,
    surfaces: Query<(&GlobalTransform, &PlacementSurface)>,
    colliders: Query<(Entity, &GlobalTransform, &PlaceableCollider)>,
    globals: Query<&GlobalTransform>,
) {
    if settings.is_changed() {
        placement.set_settings(settings.clone());
    }

    // A despawned parent counts as cleared.
    let parent = placement
        .parent()
        .and_then(|parent| globals.get(parent).ok().map(|global| (parent, *global)));
    if parent.is_none() && placement.parent().is_some() {
        info!("[PrefabPlacement] Parent is gone, building disabled");
        placement.set_parent(None);
    }

    let contact = cursor_ray(&cameras, &windows).and_then(|ray| pick_surface(&ray, &surfaces));
    let obstacles = colliders
        .iter()
        .map(|(entity, global, collider)| Obstacle::from_collider(entity, global, collider))
        .collect();
    let input = read_input(&keys, &keyboard, &buttons);

    let mut host = EcsPlacementHost::new(
        &mut commands,
        &asset_server,
        &mut placement_world,
        &mut history,
    )
    .with_contact(contact)
    .with_obstacles(obstacles)
    .with_parent_transform(parent);

    match placement.tick(&input, &mut host) {
        TickOutcome::RejectedOverlap(count) => {
            debug!("[PrefabPlacement] Placement rejected ({count} overlaps)");
        }
        TickOutcome::Accepted(entity) => {
            debug!("[PrefabPlacement] Placement accepted as {entity:?}");
        }
        _ => {}
    }
}

/// Undo the most recent placement on Ctrl + the undo key.
pub fn undo_last_placement(
    mut commands: Commands,
    mut history: ResMut<PlacementHistory>,
    keys: Res<PlacementKeys>,
    keyboard: Res<ButtonInput<KeyCode>>,
) {
    let ctrl = keyboard.any_pressed([KeyCode::ControlLeft, KeyCode::ControlRight]);
    if !ctrl || !keyboard.just_pressed(keys.undo) {
        return;
    }
    if history.undo_last(&mut commands).is_none() {
        info!("[PrefabPlacement] Nothing to undo");
    }
}

fn cursor_ray(
    cameras: &Query<(&Camera, &GlobalTransform), With<PlacementCamera>>,
    windows: &Query<&Window, With<PrimaryWindow>>,
) -> Option<Ray3d> {
    let (camera, camera_transform) = cameras.iter().next()?;
    let window = windows.iter().next()?;
    let cursor_pos = window.cursor_position()?;
    camera.viewport_to_world(camera_transform, cursor_pos).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ground() -> GlobalTransform {
        GlobalTransform::IDENTITY
    }

    #[test]
    fn nearest_surface_wins() {
        let ray = Ray3d::new(Vec3::new(0.0, 10.0, 0.0), Dir3::NEG_Y);
        let roof = GlobalTransform::from(Transform::from_xyz(0.0, 3.0, 0.0));
        let ground = ground();
        let infinite = PlacementSurface::infinite();

        let hit = pick_surface(&ray, [(&ground, &infinite), (&roof, &infinite)]);
        assert_eq!(hit, Some(Vec3::new(0.0, 3.0, 0.0)));
    }

    #[test]
    fn bounded_surface_ignores_hits_outside_its_rectangle() {
        let ray = Ray3d::new(Vec3::new(6.0, 10.0, 0.0), Dir3::NEG_Y);
        let ground = ground();
        let small = PlacementSurface::rectangle(Vec2::splat(5.0));

        assert_eq!(pick_surface(&ray, [(&ground, &small)]), None);

        let scaled = GlobalTransform::from(Transform::from_scale(Vec3::splat(2.0)));
        assert_eq!(
            pick_surface(&ray, [(&scaled, &small)]),
            Some(Vec3::new(6.0, 0.0, 0.0))
        );
    }

    #[test]
    fn keys_map_to_steps_and_alt_blocks_commit() {
        let keys = PlacementKeys::default();
        let mut keyboard = ButtonInput::<KeyCode>::default();
        let mut buttons = ButtonInput::<MouseButton>::default();

        keyboard.press(KeyCode::KeyD);
        keyboard.press(KeyCode::KeyS);
        buttons.press(MouseButton::Left);
        let input = read_input(&keys, &keyboard, &buttons);
        assert_eq!(input.rotate, Some(StepDirection::Increase));
        assert_eq!(input.rescale, Some(StepDirection::Decrease));
        assert!(input.commit);

        keyboard.press(KeyCode::AltLeft);
        assert!(!read_input(&keys, &keyboard, &buttons).commit);
    }

    #[test]
    fn held_keys_do_not_repeat() {
        let keys = PlacementKeys::default();
        let mut keyboard = ButtonInput::<KeyCode>::default();
        let buttons = ButtonInput::<MouseButton>::default();

        keyboard.press(KeyCode::KeyA);
        keyboard.clear();
        let input = read_input(&keys, &keyboard, &buttons);
        assert_eq!(input, PlacementInput::default());
    }
}
