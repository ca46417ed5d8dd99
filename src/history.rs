//! Undo history for placed objects.

use bevy::prelude::*;

use crate::host::CommandLog;

/// Maximum number of placements kept for undo.
const MAX_UNDO_HISTORY: usize = 100;

/// A placement recorded for undo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacementRecord {
    /// The placed entity.
    pub entity: Entity,
    /// Undo label the placement was registered under.
    pub label: String,
}

/// Reversible log of placed objects.
///
/// Placements register here when committed. Undoing a placement despawns
/// the placed entity; placements older than the history limit are
/// forgotten and can no longer be undone.
#[derive(Resource, Default, Debug)]
pub struct PlacementHistory {
    records: Vec<PlacementRecord>,
}

impl PlacementHistory {
    /// Record a placement, dropping the oldest entry when the history is full.
    pub fn push(&mut self, record: PlacementRecord) {
        self.records.push(record);
        if self.records.len() > MAX_UNDO_HISTORY {
            self.records.remove(0);
        }
    }

    /// Remove and return the most recent placement.
    pub fn pop(&mut self) -> Option<PlacementRecord> {
        self.records.pop()
    }

    /// The most recent placement.
    pub fn last(&self) -> Option<&PlacementRecord> {
        self.records.last()
    }

    /// Number of placements that can be undone.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether there is nothing to undo.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Undo the most recent placement by despawning its entity.
    pub fn undo_last(&mut self, commands: &mut Commands) -> Option<PlacementRecord> {
        let record = self.pop()?;
        commands.entity(record.entity).despawn();
        info!(
            "[PrefabPlacement] Undid '{}' (despawned {:?}), {} steps remaining",
            record.label,
            record.entity,
            self.len()
        );
        Some(record)
    }
}

impl CommandLog for PlacementHistory {
    type Object = Entity;

    fn register_created_object(&mut self, object: Entity, label: &str) {
        self.push(PlacementRecord {
            entity: object,
            label: label.to_string(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registrations_pop_in_reverse_order() {
        let mut world = World::new();
        let first = world.spawn_empty().id();
        let second = world.spawn_empty().id();

        let mut history = PlacementHistory::default();
        history.register_created_object(first, "Create Building");
        history.register_created_object(second, "Create Building");

        assert_eq!(history.len(), 2);
        assert_eq!(history.pop().map(|r| r.entity), Some(second));
        assert_eq!(history.pop().map(|r| r.entity), Some(first));
        assert!(history.pop().is_none());
    }

    #[test]
    fn history_is_bounded() {
        let mut world = World::new();
        let mut history = PlacementHistory::default();
        let entities: Vec<Entity> = (0..MAX_UNDO_HISTORY + 5)
            .map(|_| world.spawn_empty().id())
            .collect();
        for entity in &entities {
            history.register_created_object(*entity, "Create Building");
        }

        assert_eq!(history.len(), MAX_UNDO_HISTORY);
        assert_eq!(history.last().map(|r| r.entity), entities.last().copied());
    }

    #[test]
    fn undo_despawns_the_last_placement() {
        let mut world = World::new();
        let kept = world.spawn_empty().id();
        let placed = world.spawn_empty().id();

        let mut history = PlacementHistory::default();
        history.register_created_object(kept, "Create Building");
        history.register_created_object(placed, "Create Building");

        let undone = {
            let mut commands = world.commands();
            history.undo_last(&mut commands)
        };
        world.flush();

        assert_eq!(undone.map(|r| r.entity), Some(placed));
        assert!(world.get_entity(placed).is_err());
        assert!(world.get_entity(kept).is_ok());
        assert_eq!(history.len(), 1);
    }
}
