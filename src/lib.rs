//! Interactive prefab placement for Bevy level editors.
//!
//! This crate lets a user drop prefab "buildings" into a scene: a preview
//! instance follows the pointer over placement surfaces, keys rotate and
//! rescale it in discrete steps, and a click commits it when no other
//! placeable geometry overlaps. Every committed placement can be undone.
//!
//! # Quick Start
//!
//! ```ignore
//! use bevy::prelude::*;
//! use bevy_prefab_placer::{
//!     ActivePlacement, PlaceableCollider, PlacementCamera, PlacementSurface,
//!     PrefabPlacementPlugin,
//! };
//!
//! fn main() {
//!     App::new()
//!         .add_plugins(DefaultPlugins)
//!         .add_plugins(PrefabPlacementPlugin::default())
//!         .add_systems(Startup, setup)
//!         .run();
//! }
//!
//! fn setup(mut commands: Commands, mut placement: ResMut<ActivePlacement>) {
//!     commands.spawn((
//!         Camera3d::default(),
//!         Transform::from_xyz(0.0, 10.0, 15.0).looking_at(Vec3::ZERO, Vec3::Y),
//!         PlacementCamera,
//!     ));
//!
//!     // Ground the pointer ray can hit
//!     commands.spawn((Transform::default(), PlacementSurface::rectangle(Vec2::splat(50.0))));
//!
//!     // Placed buildings become children of this entity
//!     let town = commands.spawn((Transform::default(), Visibility::default())).id();
//!     placement.set_parent(Some(town));
//!     placement.set_building(true);
//! }
//! ```
//!
//! # Controls
//!
//! With the default [`PlacementKeys`]:
//!
//! - **D / A**: rotate the preview by `±rotation_step`
//! - **W / S**: rescale the preview by `±scale_step`
//! - **Left click**: commit (ignored while Alt is held)
//! - **Ctrl+Z**: undo the last placement
//!
//! # Configuration
//!
//! - [`PlacementSettings`]: rotation/scale steps, layers and the undo label
//! - [`PlacementKeys`]: key and button bindings
//! - [`PlacementStyle`]: preview overlay appearance
//! - [`PlacementCatalog`]: category tabs and the prefabs of the active tab
//!
//! # Bounds
//!
//! The overlap test uses the bounds of the preview's meshes once its glTF
//! scene has loaded. Until then the preview uses
//! [`PrefabPlacementPlugin::fallback_half_extents`].

#![warn(missing_docs)]

use std::path::PathBuf;

use bevy::prelude::*;

pub mod catalog;
mod draw;
pub mod ecs_host;
pub mod history;
pub mod host;
mod interaction;
pub mod layout;
pub mod math;
pub mod session;
mod types;

pub use catalog::{
    Catalog, CatalogError, CatalogProvider, Category, DirectoryCatalog, PlacementCatalog,
    PrefabRef,
};
pub use ecs_host::{measure_preview_bounds, EcsPlacementHost, Obstacle, PlacementWorld};
pub use history::{PlacementHistory, PlacementRecord};
pub use host::{CommandLog, OverlapQuery, PrefabScene, SceneQuery};
pub use interaction::{pick_surface, read_input, ActivePlacement};
pub use layout::GridLayout;
pub use session::{PlacementSession, Preview};
pub use types::{
    CommitOutcome, LayerMask, PlaceableCollider, PlacedPrefab, PlacementCamera, PlacementInput,
    PlacementKeys, PlacementPreview, PlacementSettings, PlacementStyle, PlacementSurface,
    StepDirection, TickOutcome, DEFAULT_UNDO_LABEL,
};

use crate::draw::draw_preview_bounds;
use crate::interaction::{configure_gizmos, placement_tick, refresh_catalog, undo_last_placement};

/// Plugin that enables interactive prefab placement.
///
/// Prefabs are read from the category folders below `catalog_root`. Both
/// paths are filesystem paths; `asset_root` must be the directory the
/// `AssetServer` loads from so prefab and thumbnail paths can be made
/// relative to it.
///
/// # Example
///
/// ```ignore
/// use bevy::prelude::*;
/// use bevy_prefab_placer::PrefabPlacementPlugin;
///
/// App::new()
///     .add_plugins(DefaultPlugins)
///     .add_plugins(PrefabPlacementPlugin {
///         catalog_root: "assets/buildings".into(),
///         asset_root: "assets".into(),
///         ..default()
///     })
///     .run();
/// ```
pub struct PrefabPlacementPlugin {
    /// Directory whose subdirectories are the catalog categories.
    pub catalog_root: PathBuf,
    /// Directory the asset server resolves asset paths against.
    pub asset_root: PathBuf,
    /// Half extents a preview uses until its meshes have loaded.
    pub fallback_half_extents: Vec3,
}

impl Default for PrefabPlacementPlugin {
    fn default() -> Self {
        Self {
            catalog_root: PathBuf::from("assets/editor_resources"),
            asset_root: PathBuf::from("assets"),
            fallback_half_extents: Vec3::splat(0.5),
        }
    }
}

impl Plugin for PrefabPlacementPlugin {
    fn build(&self, app: &mut App) {
        let provider = DirectoryCatalog::new(self.asset_root.clone())
            .with_half_extents(self.fallback_half_extents);
        app.init_resource::<PlacementSettings>()
            .init_resource::<PlacementKeys>()
            .init_resource::<PlacementStyle>()
            .init_resource::<PlacementHistory>()
            .init_resource::<PlacementWorld>()
            .init_resource::<ActivePlacement>()
            .insert_resource(PlacementCatalog::new(provider, self.catalog_root.clone()))
            .add_systems(Startup, configure_gizmos)
            .add_systems(
                Update,
                (
                    refresh_catalog,
                    measure_preview_bounds,
                    placement_tick,
                    undo_last_placement,
                    draw_preview_bounds,
                )
                    .chain(),
            );
    }
}
