//! The placement session.
//!
//! A [`PlacementSession`] turns pointer samples and key presses into a live
//! preview object, and decides whether the preview may be committed as a
//! placed object. It owns no engine state: the scene, the overlap test and
//! the undo log are supplied on every call through the traits in
//! [`crate::host`].

use bevy::prelude::*;

use crate::catalog::Catalog;
use crate::host::{CommandLog, OverlapQuery, PrefabScene, SceneQuery};
use crate::math::euler_degrees_to_quat;
use crate::types::{CommitOutcome, PlacementInput, PlacementSettings, StepDirection, TickOutcome};

/// The live, uncommitted preview instance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Preview<H> {
    /// Scene handle of the preview instance.
    pub handle: H,
    /// Catalog index the preview was instantiated from.
    pub catalog_index: usize,
    /// Position of the last surface contact.
    pub translation: Vec3,
    /// Accumulated local Euler angles in degrees, not normalized.
    pub euler_degrees: Vec3,
    /// Local scale.
    pub scale: Vec3,
    catalog_generation: u64,
}

impl<H> Preview<H> {
    /// Local transform of the preview.
    pub fn transform(&self) -> Transform {
        Transform {
            translation: self.translation,
            rotation: euler_degrees_to_quat(self.euler_degrees),
            scale: self.scale,
        }
    }
}

/// Transient state of one interactive placement session.
///
/// `P` is the catalog entry type, `H` the scene handle type.
#[derive(Debug, Clone)]
pub struct PlacementSession<P, H> {
    settings: PlacementSettings,
    catalog: Catalog<P>,
    catalog_generation: u64,
    selected_index: usize,
    building: bool,
    parent: Option<H>,
    preview: Option<Preview<H>>,
    accumulated_scale: Vec3,
}

impl<P, H> PlacementSession<P, H>
where
    H: Copy + PartialEq + std::fmt::Debug,
{
    /// An idle session with an empty catalog and no parent.
    pub fn new(settings: PlacementSettings) -> Self {
        Self {
            accumulated_scale: settings.initial_scale,
            settings,
            catalog: Catalog::default(),
            catalog_generation: 0,
            selected_index: 0,
            building: false,
            parent: None,
            preview: None,
        }
    }

    /// Current settings.
    pub fn settings(&self) -> &PlacementSettings {
        &self.settings
    }

    /// Replace the settings. The accumulated scale is kept.
    pub fn set_settings(&mut self, settings: PlacementSettings) {
        self.settings = settings;
    }

    /// Catalog previews are instantiated from.
    pub fn catalog(&self) -> &Catalog<P> {
        &self.catalog
    }

    /// Install the catalog of a newly selected category.
    ///
    /// A live preview belongs to the previous catalog and is rebuilt on the
    /// next refresh.
    pub fn set_catalog(&mut self, catalog: Catalog<P>) {
        self.catalog = catalog;
        self.catalog_generation = self.catalog_generation.wrapping_add(1);
    }

    /// Index of the selected catalog entry.
    pub fn selected_index(&self) -> usize {
        self.selected_index
    }

    /// Select a catalog entry. The index is bounds-checked when the preview
    /// is rebuilt, not here.
    pub fn select(&mut self, index: usize) {
        self.selected_index = index;
    }

    /// Whether building mode is on.
    pub fn is_building(&self) -> bool {
        self.building
    }

    /// Request building on or off. Building can only be switched on while a
    /// parent is assigned; returns the resulting state.
    ///
    /// Switching off takes effect on the next tick, which destroys the
    /// preview; use [`PlacementSession::deactivate`] to destroy it at once.
    pub fn set_building(&mut self, enabled: bool) -> bool {
        self.building = enabled && self.parent.is_some();
        self.building
    }

    /// Object placed prefabs are parented under.
    pub fn parent(&self) -> Option<H> {
        self.parent
    }

    /// Assign the object placed prefabs are parented under. Clearing the
    /// parent forces building off.
    pub fn set_parent(&mut self, parent: Option<H>) {
        self.parent = parent;
        if parent.is_none() {
            self.building = false;
        }
    }

    /// The live preview, if any.
    pub fn preview(&self) -> Option<&Preview<H>> {
        self.preview.as_ref()
    }

    /// Scale the next preview starts from.
    pub fn accumulated_scale(&self) -> Vec3 {
        self.accumulated_scale
    }

    /// Switch building off and destroy the preview without committing it.
    pub fn deactivate<S>(&mut self, scene: &mut S)
    where
        S: PrefabScene<Prefab = P, Handle = H>,
    {
        self.building = false;
        self.destroy_preview(scene);
    }

    /// Tear the session down: building off, preview destroyed, scale back
    /// to its initial value. Parent, catalog and selection are kept.
    pub fn reset<S>(&mut self, scene: &mut S)
    where
        S: PrefabScene<Prefab = P, Handle = H>,
    {
        self.deactivate(scene);
        self.accumulated_scale = self.settings.initial_scale;
    }

    fn destroy_preview<S>(&mut self, scene: &mut S)
    where
        S: PrefabScene<Prefab = P, Handle = H>,
    {
        if let Some(preview) = self.preview.take() {
            scene.destroy(preview.handle);
        }
    }

    fn preview_is_stale(&self) -> bool {
        match &self.preview {
            None => true,
            Some(preview) => {
                preview.catalog_index != self.selected_index
                    || preview.catalog_generation != self.catalog_generation
            }
        }
    }

    /// Bring the preview to `contact`, rebuilding it first when there is
    /// none or the selection changed since it was built.
    ///
    /// Returns `false` when the selection addresses no catalog entry; no
    /// preview exists afterwards in that case.
    pub fn refresh_preview<S>(&mut self, contact: Vec3, scene: &mut S) -> bool
    where
        S: PrefabScene<Prefab = P, Handle = H>,
    {
        if self.preview_is_stale() {
            self.destroy_preview(scene);

            let Some(prefab) = self.catalog.get(self.selected_index) else {
                return false;
            };
            let handle = scene.instantiate(prefab);
            self.preview = Some(Preview {
                handle,
                catalog_index: self.selected_index,
                translation: contact,
                euler_degrees: Vec3::ZERO,
                scale: self.accumulated_scale,
                catalog_generation: self.catalog_generation,
            });
        }

        let Some(preview) = self.preview.as_mut() else {
            return false;
        };
        preview.translation = contact;
        scene.set_transform(preview.handle, &preview.transform());
        true
    }

    /// Rotate the preview by one rotation step. Returns `false` without a
    /// preview.
    pub fn rotate<S>(&mut self, direction: StepDirection, scene: &mut S) -> bool
    where
        S: PrefabScene<Prefab = P, Handle = H>,
    {
        let Some(preview) = self.preview.as_mut() else {
            return false;
        };
        match direction {
            StepDirection::Increase => preview.euler_degrees += self.settings.rotation_step,
            StepDirection::Decrease => preview.euler_degrees -= self.settings.rotation_step,
        }
        scene.set_transform(preview.handle, &preview.transform());
        true
    }

    /// Rescale the preview by one scale step and remember the result for
    /// later previews. Returns `false` without a preview.
    ///
    /// A step that drives any axis below zero resets the whole scale to
    /// zero.
    pub fn rescale<S>(&mut self, direction: StepDirection, scene: &mut S) -> bool
    where
        S: PrefabScene<Prefab = P, Handle = H>,
    {
        let Some(preview) = self.preview.as_mut() else {
            return false;
        };
        let mut scale = match direction {
            StepDirection::Increase => preview.scale + self.settings.scale_step,
            StepDirection::Decrease => preview.scale - self.settings.scale_step,
        };
        if scale.cmplt(Vec3::ZERO).any() {
            scale = Vec3::ZERO;
        }
        preview.scale = scale;
        self.accumulated_scale = scale;
        scene.set_transform(preview.handle, &preview.transform());
        true
    }

    /// Try to turn the preview into a placed object.
    ///
    /// A probe is attached to the preview and the scene is queried for
    /// placeable colliders inside the preview's axis-aligned bounds. The
    /// probe itself is always among the results, so the placement is
    /// accepted when at most one collider is found. On acceptance the
    /// preview is parented, registered with the command log and handed over
    /// to the scene. On rejection the probe is removed and the preview stays
    /// live.
    pub fn try_commit<S>(&mut self, scene: &mut S) -> CommitOutcome<H>
    where
        S: PrefabScene<Prefab = P, Handle = H> + OverlapQuery + CommandLog<Object = H>,
    {
        let Some(preview) = self.preview else {
            return CommitOutcome::InvalidSelection;
        };
        let Some(parent) = self.parent else {
            debug!("[PrefabPlacement] Commit ignored, no parent assigned");
            return CommitOutcome::InvalidSelection;
        };

        scene.attach_probe(preview.handle, self.settings.probe_layers);
        let half_extents = scene.render_half_extents(preview.handle);
        let overlaps = scene
            .query_overlaps(
                preview.translation,
                half_extents,
                Quat::IDENTITY,
                self.settings.placeable_layers,
            )
            .len();

        if overlaps <= 1 {
            scene.set_parent(preview.handle, parent);
            scene.register_created_object(preview.handle, &self.settings.undo_label);
            self.preview = None;
            info!(
                "[PrefabPlacement] Placed {:?} at {:?}",
                preview.handle, preview.translation
            );
            CommitOutcome::Accepted(preview.handle)
        } else {
            info!("[PrefabPlacement] Cannot be placed, {overlaps} colliders nearby");
            scene.remove_probe(preview.handle);
            CommitOutcome::RejectedOverlap(overlaps)
        }
    }

    /// Run one interaction tick.
    ///
    /// Order: parent gate, building gate, surface pick, preview refresh,
    /// rotate, rescale, commit. A tick without a surface contact processes
    /// no input.
    pub fn tick<S>(&mut self, input: &PlacementInput, host: &mut S) -> TickOutcome<H>
    where
        S: SceneQuery
            + PrefabScene<Prefab = P, Handle = H>
            + OverlapQuery
            + CommandLog<Object = H>,
    {
        if self.parent.is_none() {
            self.building = false;
        }
        if !self.building {
            self.destroy_preview(host);
            return TickOutcome::Inactive;
        }

        let Some(contact) = host.raycast_from_pointer() else {
            return TickOutcome::NoContact;
        };

        if !self.refresh_preview(contact, host) {
            return TickOutcome::InvalidSelection;
        }

        if let Some(direction) = input.rotate {
            self.rotate(direction, host);
        }
        if let Some(direction) = input.rescale {
            self.rescale(direction, host);
        }

        if input.commit {
            self.try_commit(host).into()
        } else {
            TickOutcome::Previewing
        }
    }
}

impl<P, H> Default for PlacementSession<P, H>
where
    H: Copy + PartialEq + std::fmt::Debug,
{
    fn default() -> Self {
        Self::new(PlacementSettings::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::LayerMask;
    use std::cell::Cell;
    use std::collections::HashMap;

    const PARENT: u32 = 1000;

    type OverlapCall = (Vec3, Vec3, Quat, LayerMask);

    /// Scene double recording every call the session makes.
    #[derive(Default)]
    struct RecordingHost {
        contact: Option<Vec3>,
        overlap_count: usize,
        next_handle: u32,
        instantiated: Vec<(u32, &'static str)>,
        destroyed: Vec<u32>,
        transforms: HashMap<u32, Transform>,
        probes: Vec<(u32, LayerMask)>,
        removed_probes: Vec<u32>,
        parents: Vec<(u32, u32)>,
        registrations: Vec<(u32, String)>,
        last_query: Cell<Option<OverlapCall>>,
    }

    impl RecordingHost {
        fn hitting(contact: Vec3) -> Self {
            Self {
                contact: Some(contact),
                overlap_count: 1,
                ..Default::default()
            }
        }
    }

    impl SceneQuery for RecordingHost {
        fn raycast_from_pointer(&self) -> Option<Vec3> {
            self.contact
        }
    }

    impl OverlapQuery for RecordingHost {
        type Collider = u32;

        fn query_overlaps(
            &self,
            center: Vec3,
            half_extents: Vec3,
            rotation: Quat,
            layers: LayerMask,
        ) -> Vec<u32> {
            self.last_query.set(Some((center, half_extents, rotation, layers)));
            (0..self.overlap_count as u32).collect()
        }
    }

    impl CommandLog for RecordingHost {
        type Object = u32;

        fn register_created_object(&mut self, object: u32, label: &str) {
            self.registrations.push((object, label.to_string()));
        }
    }

    impl PrefabScene for RecordingHost {
        type Prefab = &'static str;
        type Handle = u32;

        fn instantiate(&mut self, prefab: &&'static str) -> u32 {
            self.next_handle += 1;
            self.instantiated.push((self.next_handle, *prefab));
            self.next_handle
        }

        fn destroy(&mut self, handle: u32) {
            self.destroyed.push(handle);
        }

        fn set_transform(&mut self, handle: u32, transform: &Transform) {
            self.transforms.insert(handle, *transform);
        }

        fn attach_probe(&mut self, handle: u32, layers: LayerMask) {
            self.probes.push((handle, layers));
        }

        fn remove_probe(&mut self, handle: u32) {
            self.removed_probes.push(handle);
        }

        fn set_parent(&mut self, handle: u32, parent: u32) {
            self.parents.push((handle, parent));
        }

        fn render_half_extents(&self, handle: u32) -> Vec3 {
            self.transforms
                .get(&handle)
                .map(|t| t.scale * 0.5)
                .unwrap_or(Vec3::ZERO)
        }
    }

    fn building_session() -> PlacementSession<&'static str, u32> {
        let mut session = PlacementSession::default();
        session.set_catalog(Catalog::new(vec!["house", "tower"]));
        session.set_parent(Some(PARENT));
        assert!(session.set_building(true));
        session
    }

    fn idle() -> PlacementInput {
        PlacementInput::default()
    }

    #[test]
    fn out_of_range_selection_creates_no_preview() {
        for index in [2, 3, 100, usize::MAX] {
            let mut session = building_session();
            let mut host = RecordingHost::hitting(Vec3::ZERO);
            session.select(index);

            assert!(!session.refresh_preview(Vec3::ZERO, &mut host));
            assert!(session.preview().is_none());
            assert!(host.instantiated.is_empty());
            assert_eq!(
                session.tick(&idle(), &mut host),
                TickOutcome::InvalidSelection
            );
        }
    }

    #[test]
    fn empty_catalog_creates_no_preview() {
        let mut session = building_session();
        session.set_catalog(Catalog::default());
        let mut host = RecordingHost::hitting(Vec3::ZERO);

        assert_eq!(
            session.tick(&idle(), &mut host),
            TickOutcome::InvalidSelection
        );
        assert!(session.preview().is_none());
        assert!(host.instantiated.is_empty());
    }

    #[test]
    fn preview_follows_contact_without_rebuilding() {
        let mut session = building_session();
        let mut host = RecordingHost::hitting(Vec3::new(1.0, 0.0, 2.0));

        assert_eq!(session.tick(&idle(), &mut host), TickOutcome::Previewing);
        host.contact = Some(Vec3::new(4.0, 0.0, 5.0));
        assert_eq!(session.tick(&idle(), &mut host), TickOutcome::Previewing);

        assert_eq!(host.instantiated, [(1, "house")]);
        assert!(host.destroyed.is_empty());
        assert_eq!(host.transforms[&1].translation, Vec3::new(4.0, 0.0, 5.0));
        assert_eq!(host.transforms[&1].scale, Vec3::ONE);
    }

    #[test]
    fn missing_contact_skips_all_processing() {
        let mut session = building_session();
        let mut host = RecordingHost::default();
        let input = PlacementInput {
            rotate: Some(StepDirection::Increase),
            rescale: Some(StepDirection::Increase),
            commit: true,
        };

        assert_eq!(session.tick(&input, &mut host), TickOutcome::NoContact);
        assert!(host.instantiated.is_empty());
        assert_eq!(session.accumulated_scale(), Vec3::ONE);
        assert!(host.registrations.is_empty());
    }

    #[test]
    fn decreasing_past_zero_resets_every_axis() {
        let mut settings = PlacementSettings::default();
        settings.scale_step = Vec3::new(0.25, 1.0, 0.125);
        let mut session = building_session();
        session.set_settings(settings);
        let mut host = RecordingHost::hitting(Vec3::ZERO);
        session.refresh_preview(Vec3::ZERO, &mut host);

        // y hits exactly zero: still allowed.
        assert!(session.rescale(StepDirection::Decrease, &mut host));
        assert_eq!(session.accumulated_scale(), Vec3::new(0.75, 0.0, 0.875));

        // y would go negative while x and z stay positive.
        session.rescale(StepDirection::Decrease, &mut host);
        assert_eq!(session.accumulated_scale(), Vec3::ZERO);
        assert_eq!(host.transforms[&1].scale, Vec3::ZERO);

        for _ in 0..3 {
            session.rescale(StepDirection::Decrease, &mut host);
            assert_eq!(session.accumulated_scale(), Vec3::ZERO);
        }
    }

    #[test]
    fn accumulated_scale_carries_into_the_next_preview() {
        let mut session = building_session();
        let mut host = RecordingHost::hitting(Vec3::ZERO);
        session.refresh_preview(Vec3::ZERO, &mut host);
        session.rescale(StepDirection::Increase, &mut host);
        assert_eq!(session.accumulated_scale(), Vec3::splat(2.0));

        session.select(1);
        session.refresh_preview(Vec3::ZERO, &mut host);
        assert_eq!(host.instantiated, [(1, "house"), (2, "tower")]);
        assert_eq!(host.transforms[&2].scale, Vec3::splat(2.0));
    }

    #[test]
    fn rotate_pair_cancels_exactly() {
        let mut session = building_session();
        let mut host = RecordingHost::hitting(Vec3::ZERO);
        session.refresh_preview(Vec3::ZERO, &mut host);
        session.rotate(StepDirection::Increase, &mut host);
        session.rotate(StepDirection::Increase, &mut host);
        let before = session.preview().unwrap().euler_degrees;
        assert_eq!(before, Vec3::new(0.0, 20.0, 0.0));

        session.rotate(StepDirection::Increase, &mut host);
        session.rotate(StepDirection::Decrease, &mut host);
        assert_eq!(session.preview().unwrap().euler_degrees, before);
    }

    #[test]
    fn rotation_accumulates_past_a_full_turn() {
        let mut session = building_session();
        let mut host = RecordingHost::hitting(Vec3::ZERO);
        session.refresh_preview(Vec3::ZERO, &mut host);
        for _ in 0..40 {
            session.rotate(StepDirection::Increase, &mut host);
        }
        assert_eq!(session.preview().unwrap().euler_degrees.y, 400.0);
    }

    #[test]
    fn adjustments_without_preview_do_nothing() {
        let mut session: PlacementSession<&'static str, u32> = PlacementSession::default();
        let mut host = RecordingHost::default();
        assert!(!session.rotate(StepDirection::Increase, &mut host));
        assert!(!session.rescale(StepDirection::Decrease, &mut host));
        assert_eq!(session.accumulated_scale(), Vec3::ONE);
        assert_eq!(
            session.try_commit(&mut host),
            CommitOutcome::InvalidSelection
        );
    }

    #[test]
    fn commit_with_only_the_probe_is_accepted() {
        let mut session = building_session();
        let mut host = RecordingHost::hitting(Vec3::new(3.0, 0.0, -1.0));
        session.tick(&idle(), &mut host);

        let outcome = session.try_commit(&mut host);

        assert_eq!(outcome, CommitOutcome::Accepted(1));
        assert!(session.preview().is_none());
        assert_eq!(host.parents, [(1, PARENT)]);
        assert_eq!(host.registrations, [(1, "Create Building".to_string())]);
        assert_eq!(host.probes, [(1, LayerMask::default())]);
        assert!(host.removed_probes.is_empty());
        assert!(host.destroyed.is_empty());
    }

    #[test]
    fn overlap_query_is_axis_aligned_at_the_preview() {
        let mut session = building_session();
        let mut host = RecordingHost::hitting(Vec3::new(3.0, 0.0, -1.0));
        session.tick(
            &PlacementInput {
                rotate: Some(StepDirection::Increase),
                ..idle()
            },
            &mut host,
        );
        session.try_commit(&mut host);

        let (center, half_extents, rotation, layers) = host.last_query.get().unwrap();
        assert_eq!(center, Vec3::new(3.0, 0.0, -1.0));
        assert_eq!(half_extents, Vec3::splat(0.5));
        assert_eq!(rotation, Quat::IDENTITY);
        assert_eq!(layers, LayerMask(7));
    }

    #[test]
    fn commit_with_other_colliders_is_rejected() {
        for count in [2, 3, 10] {
            let mut session = building_session();
            let mut host = RecordingHost::hitting(Vec3::ZERO);
            host.overlap_count = count;
            session.tick(&idle(), &mut host);

            let outcome = session.try_commit(&mut host);

            assert_eq!(outcome, CommitOutcome::RejectedOverlap(count));
            assert_eq!(session.preview().map(|p| p.handle), Some(1));
            assert_eq!(host.removed_probes, [1]);
            assert!(host.registrations.is_empty());
            assert!(host.parents.is_empty());
            assert!(host.destroyed.is_empty());
        }
    }

    #[test]
    fn rejected_preview_can_be_moved_and_retried() {
        let mut session = building_session();
        let mut host = RecordingHost::hitting(Vec3::ZERO);
        host.overlap_count = 2;
        let commit = PlacementInput {
            commit: true,
            ..idle()
        };
        assert_eq!(
            session.tick(&commit, &mut host),
            TickOutcome::RejectedOverlap(2)
        );

        host.contact = Some(Vec3::new(10.0, 0.0, 0.0));
        host.overlap_count = 1;
        assert_eq!(session.tick(&commit, &mut host), TickOutcome::Accepted(1));
        assert_eq!(host.instantiated.len(), 1);
        assert_eq!(host.registrations.len(), 1);
    }

    #[test]
    fn next_tick_after_commit_starts_a_fresh_preview() {
        let mut session = building_session();
        let mut host = RecordingHost::hitting(Vec3::ZERO);
        let commit = PlacementInput {
            commit: true,
            ..idle()
        };
        assert_eq!(session.tick(&commit, &mut host), TickOutcome::Accepted(1));
        assert_eq!(session.tick(&idle(), &mut host), TickOutcome::Previewing);
        assert_eq!(host.instantiated, [(1, "house"), (2, "house")]);
        assert!(host.destroyed.is_empty());
    }

    #[test]
    fn building_off_destroys_preview_without_registration() {
        let mut session = building_session();
        let mut host = RecordingHost::hitting(Vec3::ZERO);
        session.tick(&idle(), &mut host);

        session.set_building(false);
        assert_eq!(session.tick(&idle(), &mut host), TickOutcome::Inactive);

        assert_eq!(host.destroyed, [1]);
        assert!(session.preview().is_none());
        assert!(host.registrations.is_empty());
        assert!(host.parents.is_empty());
    }

    #[test]
    fn clearing_parent_forces_building_off_before_anything_else() {
        let mut session = building_session();
        let mut host = RecordingHost::hitting(Vec3::ZERO);
        session.tick(&idle(), &mut host);

        session.set_parent(None);
        let commit = PlacementInput {
            commit: true,
            ..idle()
        };
        assert_eq!(session.tick(&commit, &mut host), TickOutcome::Inactive);

        assert!(!session.is_building());
        assert_eq!(host.destroyed, [1]);
        assert!(host.registrations.is_empty());
        assert!(!session.set_building(true));
    }

    #[test]
    fn selection_change_rebuilds_exactly_once() {
        let mut session = building_session();
        let mut host = RecordingHost::hitting(Vec3::ZERO);
        session.tick(&idle(), &mut host);

        session.select(1);
        session.tick(&idle(), &mut host);
        session.tick(&idle(), &mut host);

        assert_eq!(host.destroyed, [1]);
        assert_eq!(host.instantiated, [(1, "house"), (2, "tower")]);
        assert_eq!(session.preview().unwrap().catalog_index, 1);
    }

    #[test]
    fn new_catalog_rebuilds_preview_at_same_index() {
        let mut session = building_session();
        let mut host = RecordingHost::hitting(Vec3::ZERO);
        session.tick(&idle(), &mut host);

        session.set_catalog(Catalog::new(vec!["oak"]));
        session.tick(&idle(), &mut host);

        assert_eq!(host.destroyed, [1]);
        assert_eq!(host.instantiated, [(1, "house"), (2, "oak")]);
    }

    #[test]
    fn reset_tears_down_and_restores_initial_scale() {
        let mut session = building_session();
        let mut host = RecordingHost::hitting(Vec3::ZERO);
        session.tick(
            &PlacementInput {
                rescale: Some(StepDirection::Increase),
                ..idle()
            },
            &mut host,
        );
        assert_eq!(session.accumulated_scale(), Vec3::splat(2.0));

        session.reset(&mut host);

        assert!(!session.is_building());
        assert!(session.preview().is_none());
        assert_eq!(host.destroyed, [1]);
        assert_eq!(session.accumulated_scale(), Vec3::ONE);
        assert_eq!(session.parent(), Some(PARENT));
    }
}
