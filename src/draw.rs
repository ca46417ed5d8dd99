//! Preview overlay rendering.
//!
//! Draws the overlap volume of the live preview with Bevy's `Gizmos` API so
//! the user sees exactly what the commit test will check.

use bevy::prelude::*;

use crate::ecs_host::PlacementWorld;
use crate::interaction::ActivePlacement;
use crate::types::PlacementStyle;

/// Transform of a unit cuboid covering `center ± half_extents`.
fn bounds_transform(center: Vec3, half_extents: Vec3) -> Transform {
    Transform::from_translation(center).with_scale(half_extents * 2.0)
}

/// Draw the preview's axis-aligned overlap volume.
pub fn draw_preview_bounds(
    mut gizmos: Gizmos,
    style: Res<PlacementStyle>,
    placement: Res<ActivePlacement>,
    placement_world: Res<PlacementWorld>,
) {
    if !style.show_preview_bounds || !placement.is_building() {
        return;
    }
    let Some(preview) = placement.preview() else {
        return;
    };
    let Some(half_extents) = placement_world.half_extents(preview.handle) else {
        return;
    };

    gizmos.cube(
        bounds_transform(preview.translation, half_extents),
        style.preview_bounds_color,
    );
}
