//! ECS implementation of the placement collaborators.
//!
//! [`EcsPlacementHost`] is built fresh every frame by the placement system
//! from `Commands`, a snapshot of the obstacle colliders and the pointer
//! contact. State that must outlive a frame (bounds and transforms of the
//! preview, pending probes) lives in the [`PlacementWorld`] resource, since
//! components inserted through `Commands` are not visible to queries until
//! the commands are applied.
//!
//! A preview starts out with the fallback bounds of its [`PrefabRef`].
//! [`measure_preview_bounds`] replaces them with the union of the mesh
//! bounds of the spawned scene once every mesh has loaded.

use std::collections::HashMap;

use bevy::camera::primitives::Aabb;
use bevy::prelude::*;

use crate::catalog::PrefabRef;
use crate::history::PlacementHistory;
use crate::host::{CommandLog, OverlapQuery, PrefabScene, SceneQuery};
use crate::math::{bounds_overlap, rotated_half_extents, transformed_bounds};
use crate::types::{LayerMask, PlaceableCollider, PlacedPrefab, PlacementPreview};

/// World-space bounds of an obstacle collider.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Obstacle {
    /// Entity carrying the collider.
    pub entity: Entity,
    /// World-space center.
    pub center: Vec3,
    /// World-space half extents of the enclosing axis-aligned box.
    pub half_extents: Vec3,
    /// Layers the collider lives on.
    pub layers: LayerMask,
}

impl Obstacle {
    /// Axis-aligned world bounds of `collider` placed at `transform`.
    pub fn from_collider(
        entity: Entity,
        transform: &GlobalTransform,
        collider: &PlaceableCollider,
    ) -> Self {
        let (scale, rotation, translation) = transform.to_scale_rotation_translation();
        Self {
            entity,
            center: translation,
            half_extents: rotated_half_extents(rotation, collider.half_extents * scale.abs()),
            layers: collider.layers,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct TrackedPreview {
    local_half_extents: Vec3,
    measured: bool,
    transform: Transform,
    probe: Option<LayerMask>,
}

impl TrackedPreview {
    fn world_half_extents(&self) -> Vec3 {
        rotated_half_extents(
            self.transform.rotation,
            self.local_half_extents * self.transform.scale.abs(),
        )
    }
}

/// Preview bookkeeping that persists across frames.
#[derive(Resource, Default, Debug)]
pub struct PlacementWorld {
    tracked: HashMap<Entity, TrackedPreview>,
}

impl PlacementWorld {
    /// World-space half extents of a tracked preview.
    pub fn half_extents(&self, entity: Entity) -> Option<Vec3> {
        self.tracked.get(&entity).map(TrackedPreview::world_half_extents)
    }

    /// Whether the preview's bounds come from its loaded meshes rather than
    /// the catalog fallback.
    pub fn is_measured(&self, entity: Entity) -> bool {
        self.tracked.get(&entity).is_some_and(|tracked| tracked.measured)
    }
}

/// Half extents, in the space of `root`, of the union of the mesh bounds
/// below `root`.
///
/// Returns `None` while the scene has no meshes yet or any mesh is still
/// missing its bounds.
fn scene_half_extents(
    root: Entity,
    root_transform: &GlobalTransform,
    children: &Query<&Children>,
    parts: &Query<(Option<&Aabb>, &GlobalTransform), With<Mesh3d>>,
) -> Option<Vec3> {
    let to_root = root_transform.affine().inverse();
    let mut bounds: Option<(Vec3, Vec3)> = None;

    for part in children.iter_descendants(root) {
        let Ok((aabb, part_transform)) = parts.get(part) else {
            continue;
        };
        let aabb = aabb?;
        let (min, max) = transformed_bounds(
            to_root * part_transform.affine(),
            aabb.center.into(),
            aabb.half_extents.into(),
        );
        bounds = Some(match bounds {
            Some((lo, hi)) => (lo.min(min), hi.max(max)),
            None => (min, max),
        });
    }

    bounds.map(|(min, max)| 0.5 * (max - min))
}

/// Replace the fallback bounds of each preview with the bounds of its
/// meshes, retrying on later frames until the scene has loaded.
pub fn measure_preview_bounds(
    mut placement_world: ResMut<PlacementWorld>,
    previews: Query<&GlobalTransform, With<PlacementPreview>>,
    children: Query<&Children>,
    parts: Query<(Option<&Aabb>, &GlobalTransform), With<Mesh3d>>,
) {
    for (entity, tracked) in placement_world.tracked.iter_mut() {
        if tracked.measured {
            continue;
        }
        let Ok(root_transform) = previews.get(*entity) else {
            continue;
        };
        // A zero-scale preview cannot be mapped back into its own space.
        if root_transform.affine().matrix3.determinant().abs() <= f32::EPSILON {
            continue;
        }
        let Some(half_extents) = scene_half_extents(*entity, root_transform, &children, &parts)
        else {
            continue;
        };

        tracked.local_half_extents = half_extents;
        tracked.measured = true;
        debug!("[PrefabPlacement] Measured preview {entity:?}: half extents {half_extents}");
    }
}

/// Placement collaborators backed by the ECS.
pub struct EcsPlacementHost<'a, 'w, 's> {
    commands: &'a mut Commands<'w, 's>,
    asset_server: &'a AssetServer,
    world: &'a mut PlacementWorld,
    history: &'a mut PlacementHistory,
    contact: Option<Vec3>,
    obstacles: Vec<Obstacle>,
    parent_transform: Option<(Entity, GlobalTransform)>,
}

impl<'a, 'w, 's> EcsPlacementHost<'a, 'w, 's> {
    /// Host for one frame. Contact, obstacles and parent default to none.
    pub fn new(
        commands: &'a mut Commands<'w, 's>,
        asset_server: &'a AssetServer,
        world: &'a mut PlacementWorld,
        history: &'a mut PlacementHistory,
    ) -> Self {
        Self {
            commands,
            asset_server,
            world,
            history,
            contact: None,
            obstacles: Vec::new(),
            parent_transform: None,
        }
    }

    /// Surface contact of the pointer ray this frame.
    pub fn with_contact(mut self, contact: Option<Vec3>) -> Self {
        self.contact = contact;
        self
    }

    /// Colliders already applied to the world.
    pub fn with_obstacles(mut self, obstacles: Vec<Obstacle>) -> Self {
        self.obstacles = obstacles;
        self
    }

    /// Global transform of the placement parent, used to keep placed
    /// objects where they were previewed.
    pub fn with_parent_transform(mut self, parent: Option<(Entity, GlobalTransform)>) -> Self {
        self.parent_transform = parent;
        self
    }
}

impl SceneQuery for EcsPlacementHost<'_, '_, '_> {
    fn raycast_from_pointer(&self) -> Option<Vec3> {
        self.contact
    }
}

impl OverlapQuery for EcsPlacementHost<'_, '_, '_> {
    type Collider = Entity;

    fn query_overlaps(
        &self,
        center: Vec3,
        half_extents: Vec3,
        rotation: Quat,
        layers: LayerMask,
    ) -> Vec<Entity> {
        let query_half = rotated_half_extents(rotation, half_extents);

        let mut hits: Vec<Entity> = self
            .obstacles
            .iter()
            .filter(|o| {
                o.layers.intersects(layers)
                    && bounds_overlap(center, query_half, o.center, o.half_extents)
            })
            .map(|o| o.entity)
            .collect();

        // Probes attached this frame are not in the obstacle snapshot yet.
        for (entity, tracked) in self.world.tracked.iter() {
            let Some(probe_layers) = tracked.probe else {
                continue;
            };
            if hits.contains(entity) || !probe_layers.intersects(layers) {
                continue;
            }
            if bounds_overlap(
                center,
                query_half,
                tracked.transform.translation,
                tracked.world_half_extents(),
            ) {
                hits.push(*entity);
            }
        }

        hits
    }
}

impl CommandLog for EcsPlacementHost<'_, '_, '_> {
    type Object = Entity;

    fn register_created_object(&mut self, object: Entity, label: &str) {
        self.history.register_created_object(object, label);
    }
}

impl PrefabScene for EcsPlacementHost<'_, '_, '_> {
    type Prefab = PrefabRef;
    type Handle = Entity;

    fn instantiate(&mut self, prefab: &PrefabRef) -> Entity {
        let scene = self
            .asset_server
            .load(GltfAssetLabel::Scene(0).from_asset(prefab.asset_path.clone()));
        let entity = self
            .commands
            .spawn((
                SceneRoot(scene),
                Transform::default(),
                PlacementPreview,
                Name::new(format!("Preview: {}", prefab.name)),
            ))
            .id();
        self.world.tracked.insert(
            entity,
            TrackedPreview {
                local_half_extents: prefab.half_extents,
                measured: false,
                transform: Transform::default(),
                probe: None,
            },
        );
        debug!("[PrefabPlacement] Spawned preview {entity:?} for '{}'", prefab.name);
        entity
    }

    fn destroy(&mut self, handle: Entity) {
        self.world.tracked.remove(&handle);
        self.commands.entity(handle).despawn();
    }

    fn set_transform(&mut self, handle: Entity, transform: &Transform) {
        if let Some(tracked) = self.world.tracked.get_mut(&handle) {
            tracked.transform = *transform;
        }
        self.commands.entity(handle).insert(*transform);
    }

    fn attach_probe(&mut self, handle: Entity, layers: LayerMask) {
        let Some(tracked) = self.world.tracked.get_mut(&handle) else {
            return;
        };
        tracked.probe = Some(layers);
        self.commands.entity(handle).insert(
            PlaceableCollider::new(tracked.local_half_extents).with_layers(layers),
        );
    }

    fn remove_probe(&mut self, handle: Entity) {
        if let Some(tracked) = self.world.tracked.get_mut(&handle) {
            tracked.probe = None;
        }
        self.commands.entity(handle).remove::<PlaceableCollider>();
    }

    fn set_parent(&mut self, handle: Entity, parent: Entity) {
        // Ownership moves to the scene; the probe stays as an obstacle.
        let Some(tracked) = self.world.tracked.remove(&handle) else {
            return;
        };
        let local = match self.parent_transform {
            Some((entity, parent_global)) if entity == parent => {
                GlobalTransform::from(tracked.transform).reparented_to(&parent_global)
            }
            _ => tracked.transform,
        };
        self.commands
            .entity(handle)
            .remove::<PlacementPreview>()
            .insert((local, ChildOf(parent), PlacedPrefab));
    }

    fn render_half_extents(&self, handle: Entity) -> Vec3 {
        self.world.half_extents(handle).unwrap_or(Vec3::ZERO)
    }
}
