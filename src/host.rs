//! Collaborator interfaces the placement session is written against.
//!
//! The session never touches the engine directly. Everything it needs from
//! the scene (picking, overlap tests, object lifetime, undo registration) is
//! reached through these traits, so it can be driven by the ECS host in
//! [`crate::ecs_host`] or by a test double.

use bevy::prelude::*;

use crate::types::LayerMask;

/// Ray-surface intersection for the current pointer position.
pub trait SceneQuery {
    /// Contact point of the pointer ray with the scene, if it hits anything.
    fn raycast_from_pointer(&self) -> Option<Vec3>;
}

/// Bounding-volume intersection against existing scene geometry.
pub trait OverlapQuery {
    /// Handle of a collider reported by [`OverlapQuery::query_overlaps`].
    type Collider;

    /// All colliders on `layers` intersecting the box at `center` with
    /// `half_extents`, oriented by `rotation`.
    fn query_overlaps(
        &self,
        center: Vec3,
        half_extents: Vec3,
        rotation: Quat,
        layers: LayerMask,
    ) -> Vec<Self::Collider>;
}

/// Host-managed reversible command log.
pub trait CommandLog {
    /// Handle of a scene object the log can record.
    type Object;

    /// Record the creation of `object` so the host can undo it.
    fn register_created_object(&mut self, object: Self::Object, label: &str);
}

/// Lifetime and transform management for preview objects.
pub trait PrefabScene {
    /// Catalog entry an object can be instantiated from.
    type Prefab;
    /// Handle of a live scene object.
    type Handle: Copy + PartialEq + std::fmt::Debug;

    /// Create a new, unparented instance of `prefab`.
    fn instantiate(&mut self, prefab: &Self::Prefab) -> Self::Handle;

    /// Remove an instance from the scene immediately.
    fn destroy(&mut self, handle: Self::Handle);

    /// Replace the local transform of an instance.
    fn set_transform(&mut self, handle: Self::Handle, transform: &Transform);

    /// Attach a probe volume matching the instance's bounds on `layers`.
    fn attach_probe(&mut self, handle: Self::Handle, layers: LayerMask);

    /// Remove the probe attached by [`PrefabScene::attach_probe`].
    fn remove_probe(&mut self, handle: Self::Handle);

    /// Move an instance under `parent`, keeping its world placement.
    fn set_parent(&mut self, handle: Self::Handle, parent: Self::Handle);

    /// World-space half extents of the instance's rendered bounds.
    fn render_half_extents(&self, handle: Self::Handle) -> Vec3;
}
