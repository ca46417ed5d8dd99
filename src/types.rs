//! Core types for the prefab placement plugin.
//!
//! This module contains the public configuration resources, marker
//! components and outcome types shared by the placement session and the
//! Bevy systems that drive it.

use bevy::prelude::*;
use std::fmt;

/// Direction of a discrete rotate/rescale step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepDirection {
    /// Add the configured step.
    Increase,
    /// Subtract the configured step.
    Decrease,
}

impl fmt::Display for StepDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StepDirection::Increase => f.write_str("Increase"),
            StepDirection::Decrease => f.write_str("Decrease"),
        }
    }
}

/// Bit mask of collision layers.
///
/// Bit `n` set means layer `n` is included. Obstacles carry the layers they
/// live on, overlap queries carry the layers they test against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LayerMask(pub u32);

impl LayerMask {
    /// No layers.
    pub const NONE: Self = Self(0);
    /// Every layer.
    pub const ALL: Self = Self(u32::MAX);

    /// Mask with only layer `layer` set.
    pub const fn layer(layer: u32) -> Self {
        Self(1 << layer)
    }

    /// Whether the two masks share at least one layer.
    pub fn intersects(self, other: LayerMask) -> bool {
        self.0 & other.0 != 0
    }
}

impl Default for LayerMask {
    fn default() -> Self {
        Self::layer(0)
    }
}

/// Per-tick input consumed by the placement session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlacementInput {
    /// Rotate the preview about the vertical axis this tick.
    pub rotate: Option<StepDirection>,
    /// Rescale the preview this tick.
    pub rescale: Option<StepDirection>,
    /// Primary button pressed without the modifier key.
    pub commit: bool,
}

/// Result of a commit attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitOutcome<H> {
    /// The preview became a placed object and ownership moved to the scene.
    Accepted(H),
    /// Other placeable geometry overlaps the preview. Holds the total
    /// collider count, the probe included.
    RejectedOverlap(usize),
    /// The pointer ray did not hit a surface.
    NoContact,
    /// There is no preview to commit, either because the selection is out
    /// of the catalog's range or because no parent is assigned.
    InvalidSelection,
}

/// Result of one placement tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome<H> {
    /// Building is switched off.
    Inactive,
    /// The pointer ray did not hit a surface; nothing was processed.
    NoContact,
    /// The selected index does not address a catalog entry.
    InvalidSelection,
    /// A preview follows the pointer, no commit was requested.
    Previewing,
    /// A commit was requested and accepted.
    Accepted(H),
    /// A commit was requested and rejected.
    RejectedOverlap(usize),
}

impl<H> From<CommitOutcome<H>> for TickOutcome<H> {
    fn from(outcome: CommitOutcome<H>) -> Self {
        match outcome {
            CommitOutcome::Accepted(handle) => TickOutcome::Accepted(handle),
            CommitOutcome::RejectedOverlap(count) => TickOutcome::RejectedOverlap(count),
            CommitOutcome::NoContact => TickOutcome::NoContact,
            CommitOutcome::InvalidSelection => TickOutcome::InvalidSelection,
        }
    }
}

/// Label used for undo entries of placed objects.
pub const DEFAULT_UNDO_LABEL: &str = "Create Building";

/// Tunable parameters of the placement session.
///
/// Modify this resource at runtime; the session picks up changes on the
/// next tick.
#[derive(Resource, Clone, Debug, PartialEq)]
pub struct PlacementSettings {
    /// Euler angles (degrees) added per rotate step.
    pub rotation_step: Vec3,
    /// Scale added per rescale step.
    pub scale_step: Vec3,
    /// Scale applied to the first preview of a session.
    pub initial_scale: Vec3,
    /// Layers the overlap test considers when validating a placement.
    pub placeable_layers: LayerMask,
    /// Layer the probe attached to a committed preview lives on.
    pub probe_layers: LayerMask,
    /// Label placed objects are registered under in the undo history.
    pub undo_label: String,
}

impl Default for PlacementSettings {
    fn default() -> Self {
        Self {
            rotation_step: Vec3::new(0.0, 10.0, 0.0),
            scale_step: Vec3::ONE,
            initial_scale: Vec3::ONE,
            placeable_layers: LayerMask(7),
            probe_layers: LayerMask::default(),
            undo_label: DEFAULT_UNDO_LABEL.to_string(),
        }
    }
}

/// Key and button bindings for interactive placement.
#[derive(Resource, Clone, Debug)]
pub struct PlacementKeys {
    /// Rotates the preview by `+rotation_step`.
    pub rotate_increase: KeyCode,
    /// Rotates the preview by `-rotation_step`.
    pub rotate_decrease: KeyCode,
    /// Grows the preview by `scale_step`.
    pub scale_increase: KeyCode,
    /// Shrinks the preview by `scale_step`.
    pub scale_decrease: KeyCode,
    /// Button that commits the preview.
    pub commit: MouseButton,
    /// Holding any of these suppresses commits (camera orbiting).
    pub commit_blockers: Vec<KeyCode>,
    /// Combined with either control key, undoes the last placement.
    pub undo: KeyCode,
}

impl Default for PlacementKeys {
    fn default() -> Self {
        Self {
            rotate_increase: KeyCode::KeyD,
            rotate_decrease: KeyCode::KeyA,
            scale_increase: KeyCode::KeyW,
            scale_decrease: KeyCode::KeyS,
            commit: MouseButton::Left,
            commit_blockers: vec![KeyCode::AltLeft, KeyCode::AltRight],
            undo: KeyCode::KeyZ,
        }
    }
}

/// Visual style of the preview overlay.
#[derive(Resource, Clone, Debug)]
pub struct PlacementStyle {
    /// Whether to draw the preview's overlap volume.
    pub show_preview_bounds: bool,
    /// Color of the preview's overlap volume.
    pub preview_bounds_color: Color,
    /// Line width for gizmo rendering (in pixels).
    pub line_width: f32,
    /// Depth bias to draw gizmos on top of regular geometry.
    pub depth_bias: f32,
}

impl Default for PlacementStyle {
    fn default() -> Self {
        Self {
            show_preview_bounds: true,
            preview_bounds_color: Color::srgb(1.0, 0.0, 0.0),
            line_width: 2.0,
            depth_bias: -0.5,
        }
    }
}

/// Marker component for cameras used for placement picking.
///
/// # Example
///
/// ```ignore
/// commands.spawn((
///     Camera3d::default(),
///     Transform::from_xyz(0.0, 10.0, 15.0).looking_at(Vec3::ZERO, Vec3::Y),
///     PlacementCamera,
/// ));
/// ```
#[derive(Component)]
pub struct PlacementCamera;

/// A surface the pointer ray can hit.
///
/// The surface is the plane through the entity's origin whose normal is the
/// entity's local `+Y`. With `half_size` set, hits are limited to the
/// rectangle of that half size in the entity's local XZ plane.
#[derive(Component, Clone, Copy, Debug, Default)]
pub struct PlacementSurface {
    /// Half extents of the surface rectangle, or `None` for an infinite plane.
    pub half_size: Option<Vec2>,
}

impl PlacementSurface {
    /// A bounded rectangular surface.
    pub fn rectangle(half_size: Vec2) -> Self {
        Self {
            half_size: Some(half_size),
        }
    }

    /// An unbounded plane.
    pub fn infinite() -> Self {
        Self { half_size: None }
    }
}

/// Bounding volume that blocks placements.
///
/// Placed objects receive one automatically; add it to any pre-existing
/// scene geometry that previews should not overlap.
#[derive(Component, Clone, Copy, Debug)]
pub struct PlaceableCollider {
    /// Half extents in local space, before scale.
    pub half_extents: Vec3,
    /// Layers the collider lives on.
    pub layers: LayerMask,
}

impl PlaceableCollider {
    /// Collider on the default layer.
    pub fn new(half_extents: Vec3) -> Self {
        Self {
            half_extents,
            layers: LayerMask::default(),
        }
    }

    /// Moves the collider to other layers.
    pub fn with_layers(mut self, layers: LayerMask) -> Self {
        self.layers = layers;
        self
    }
}

/// Marks the live preview entity.
#[derive(Component)]
pub struct PlacementPreview;

/// Marks an entity created by a committed placement.
#[derive(Component)]
pub struct PlacedPrefab;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layer_masks_intersect_on_shared_bits() {
        assert!(LayerMask(7).intersects(LayerMask::default()));
        assert!(LayerMask(7).intersects(LayerMask::layer(2)));
        assert!(!LayerMask(7).intersects(LayerMask::layer(3)));
        assert!(!LayerMask::NONE.intersects(LayerMask::ALL));
    }

    #[test]
    fn commit_outcomes_map_onto_tick_outcomes() {
        assert_eq!(
            TickOutcome::from(CommitOutcome::Accepted(3u32)),
            TickOutcome::Accepted(3)
        );
        assert_eq!(
            TickOutcome::<u32>::from(CommitOutcome::RejectedOverlap(4)),
            TickOutcome::RejectedOverlap(4)
        );
    }

    #[test]
    fn default_settings_rotate_about_the_vertical_axis() {
        let settings = PlacementSettings::default();
        assert_eq!(settings.rotation_step.x, 0.0);
        assert_eq!(settings.rotation_step.z, 0.0);
        assert_eq!(settings.rotation_step.y, 10.0);
        assert_eq!(settings.undo_label, "Create Building");
    }
}
