//! Building placement example.
//!
//! Place prefabs from `assets/editor_resources/<category>/*.glb` on the
//! ground. Thumbnails (`<prefab>.png` next to each prefab) are shown in the
//! panel on the right.
//!
//! Controls:
//! - B: Toggle building
//! - Tab: Next category
//! - 1-9 or click a thumbnail: Select prefab
//! - F5: Rescan the category folders
//! - D/A: Rotate, W/S: Rescale
//! - Left click: Place (hold Alt to suppress)
//! - Ctrl+Z: Undo

use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use bevy_prefab_placer::{
    ActivePlacement, GridLayout, PlaceableCollider, PlacementCamera, PlacementCatalog,
    PlacementHistory, PlacementSurface, PrefabPlacementPlugin,
};

const PANEL_WIDTH: f32 = 220.0;
const PANEL_MARGIN: f32 = 10.0;

const DIGIT_KEYS: [KeyCode; 9] = [
    KeyCode::Digit1,
    KeyCode::Digit2,
    KeyCode::Digit3,
    KeyCode::Digit4,
    KeyCode::Digit5,
    KeyCode::Digit6,
    KeyCode::Digit7,
    KeyCode::Digit8,
    KeyCode::Digit9,
];

#[derive(Component)]
struct Hud;

#[derive(Component)]
struct ThumbnailPanel;

#[derive(Component)]
struct Town;

/// Layout of the thumbnails currently shown in the panel.
#[derive(Resource, Default)]
struct ThumbnailGrid(Option<GridLayout>);

fn main() {
    App::new()
        .add_plugins(DefaultPlugins)
        .add_plugins(PrefabPlacementPlugin::default())
        .init_resource::<ThumbnailGrid>()
        .add_systems(Startup, setup)
        .add_systems(PreUpdate, suspend_over_panel)
        .add_systems(
            Update,
            (
                keyboard_controls,
                select_thumbnail,
                rebuild_thumbnails,
                update_hud,
            ),
        )
        .run();
}

fn setup(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut placement: ResMut<ActivePlacement>,
) {
    // Camera
    commands.spawn((
        Camera3d::default(),
        Transform::from_xyz(0.0, 14.0, 18.0).looking_at(Vec3::ZERO, Vec3::Y),
        PlacementCamera,
    ));

    // Light
    commands.spawn((
        DirectionalLight {
            shadows_enabled: true,
            ..default()
        },
        Transform::from_xyz(10.0, 15.0, 10.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));

    // Ground
    commands.spawn((
        Mesh3d(meshes.add(Plane3d::new(Vec3::Y, Vec2::splat(15.0)))),
        MeshMaterial3d(materials.add(Color::srgb(0.2, 0.35, 0.18))),
        PlacementSurface::rectangle(Vec2::splat(15.0)),
    ));

    // Rocks that buildings may not overlap
    let rock = meshes.add(Cuboid::from_length(1.5));
    let rock_material = materials.add(Color::srgb(0.45, 0.42, 0.4));
    for pos in [
        Vec3::new(-5.0, 0.75, -3.0),
        Vec3::new(4.0, 0.75, 2.0),
        Vec3::new(0.0, 0.75, 6.0),
    ] {
        commands.spawn((
            Mesh3d(rock.clone()),
            MeshMaterial3d(rock_material.clone()),
            Transform::from_translation(pos),
            PlaceableCollider::new(Vec3::splat(0.75)),
        ));
    }

    // Placed buildings are parented here
    let town = commands
        .spawn((Name::new("Town"), Transform::default(), Visibility::default(), Town))
        .id();
    placement.set_parent(Some(town));
    placement.set_building(true);

    // Thumbnail panel
    commands.spawn((
        Node {
            position_type: PositionType::Absolute,
            top: Val::Px(PANEL_MARGIN),
            right: Val::Px(PANEL_MARGIN),
            width: Val::Px(PANEL_WIDTH),
            ..default()
        },
        BackgroundColor(Color::srgba(0.0, 0.0, 0.0, 0.5)),
        ThumbnailPanel,
    ));

    // HUD
    commands
        .spawn((
            Node {
                position_type: PositionType::Absolute,
                top: Val::Px(PANEL_MARGIN),
                left: Val::Px(PANEL_MARGIN),
                ..default()
            },
            BackgroundColor(Color::srgba(0.0, 0.0, 0.0, 0.7)),
        ))
        .with_children(|p| {
            p.spawn((
                Text::new(""),
                TextFont {
                    font_size: 14.0,
                    ..default()
                },
                TextColor(Color::WHITE),
                Hud,
            ));
        });
}

/// Cursor position relative to the thumbnail grid, if it is over the panel.
fn cursor_over_panel(window: &Window, grid: &GridLayout) -> Option<Vec2> {
    let cursor = window.cursor_position()?;
    let origin = Vec2::new(window.width() - PANEL_MARGIN - PANEL_WIDTH, PANEL_MARGIN);
    let point = cursor - origin;
    let size = Vec2::new(PANEL_WIDTH, grid.size().y as f32);
    (point.cmpge(Vec2::ZERO).all() && point.cmplt(size).all()).then_some(point)
}

/// Pause building while the cursor is over the panel so a thumbnail click
/// does not also place the preview.
fn suspend_over_panel(
    windows: Query<&Window, With<PrimaryWindow>>,
    grid: Res<ThumbnailGrid>,
    mut placement: ResMut<ActivePlacement>,
    mut suspended: Local<bool>,
) {
    let over_panel = windows
        .single()
        .ok()
        .zip(grid.0.as_ref())
        .and_then(|(window, grid)| cursor_over_panel(window, grid))
        .is_some();

    if over_panel && placement.is_building() {
        placement.set_building(false);
        *suspended = true;
    } else if !over_panel && *suspended {
        *suspended = false;
        placement.set_building(true);
    }
}

fn select_thumbnail(
    mouse: Res<ButtonInput<MouseButton>>,
    windows: Query<&Window, With<PrimaryWindow>>,
    grid: Res<ThumbnailGrid>,
    mut placement: ResMut<ActivePlacement>,
) {
    if !mouse.just_pressed(MouseButton::Left) {
        return;
    }
    let Ok(window) = windows.single() else { return };
    let Some(grid) = grid.0.as_ref() else { return };

    if let Some(index) = cursor_over_panel(window, grid).and_then(|point| grid.cell_at(point)) {
        placement.select(index);
    }
}

fn keyboard_controls(
    keys: Res<ButtonInput<KeyCode>>,
    mut placement: ResMut<ActivePlacement>,
    mut catalog: ResMut<PlacementCatalog>,
) {
    if keys.just_pressed(KeyCode::KeyB) {
        let building = !placement.is_building();
        if !placement.set_building(building) && building {
            warn!("Assign a parent before building");
        }
    }
    if keys.just_pressed(KeyCode::Tab) && !catalog.categories().is_empty() {
        let next = (catalog.active_tab() + 1) % catalog.categories().len();
        catalog.select_tab(next);
    }
    if keys.just_pressed(KeyCode::F5) {
        catalog.rescan();
    }
    for (index, key) in DIGIT_KEYS.into_iter().enumerate() {
        if keys.just_pressed(key) {
            placement.select(index);
        }
    }
}

fn rebuild_thumbnails(
    mut commands: Commands,
    catalog: Res<PlacementCatalog>,
    images: Res<Assets<Image>>,
    panel: Query<Entity, With<ThumbnailPanel>>,
    mut grid: ResMut<ThumbnailGrid>,
    mut shown: Local<Vec<Option<Handle<Image>>>>,
) {
    let Ok(panel) = panel.single() else { return };
    if shown.as_slice() == catalog.thumbnails() {
        return;
    }
    *shown = catalog.thumbnails().to_vec();

    let icon_size = catalog
        .thumbnails()
        .first()
        .and_then(Option::as_ref)
        .and_then(|handle| images.get(handle))
        .map(|image| image.size());
    let layout = GridLayout::new(PANEL_WIDTH, icon_size, catalog.thumbnails().len());
    grid.0 = Some(layout);

    commands.entity(panel).despawn_related::<Children>();
    commands.entity(panel).insert(Node {
        position_type: PositionType::Absolute,
        top: Val::Px(PANEL_MARGIN),
        right: Val::Px(PANEL_MARGIN),
        width: Val::Px(PANEL_WIDTH),
        height: Val::Px(layout.size().y as f32),
        ..default()
    });
    commands.entity(panel).with_children(|p| {
        for (index, thumbnail) in catalog.thumbnails().iter().enumerate() {
            let Some(rect) = layout.cell_rect(index) else { continue };
            let cell = Node {
                position_type: PositionType::Absolute,
                left: Val::Px(rect.min.x),
                top: Val::Px(rect.min.y),
                width: Val::Px(rect.width()),
                height: Val::Px(rect.height()),
                ..default()
            };
            match thumbnail {
                Some(image) => {
                    p.spawn((cell, ImageNode::new(image.clone())));
                }
                None => {
                    let name = catalog.prefab_names().get(index).cloned().unwrap_or_default();
                    p.spawn((
                        cell,
                        Text::new(name),
                        TextFont {
                            font_size: 12.0,
                            ..default()
                        },
                        TextColor(Color::WHITE),
                    ));
                }
            }
        }
    });
}

fn update_hud(
    placement: Res<ActivePlacement>,
    catalog: Res<PlacementCatalog>,
    history: Res<PlacementHistory>,
    windows: Query<&Window, With<PrimaryWindow>>,
    mut query: Query<&mut Text, With<Hud>>,
) {
    let Ok(mut text) = query.single_mut() else { return };

    let category = catalog
        .active_category()
        .map_or("<none>", |category| category.name.as_str());
    let selected = catalog
        .prefab_names()
        .get(placement.selected_index())
        .map_or("<none>", String::as_str);
    let rotation = placement
        .preview()
        .map(|preview| preview.euler_degrees.y)
        .unwrap_or_default();
    let cursor = windows
        .single()
        .ok()
        .and_then(Window::cursor_position)
        .map_or_else(|| "-".to_string(), |pos| format!("{:.0}, {:.0}", pos.x, pos.y));
    let last_placed = history
        .last()
        .map_or_else(|| "-".to_string(), |record| format!("{:?}", record.entity));

    text.0 = format!(
        "Building: {} | Category: {} | Prefab: {}\n\
         Rotation: {:.0} | Scale: {:.2} | Placed: {} (last {}) | Cursor: {}\n\n\
         [B] Toggle building [Tab] Category [1-9/Click] Prefab [F5] Rescan\n\
         [D/A] Rotate [W/S] Scale [Click] Place [Ctrl+Z] Undo",
        placement.is_building(),
        category,
        selected,
        rotation,
        placement.accumulated_scale(),
        history.len(),
        last_placed,
        cursor,
    );
}
