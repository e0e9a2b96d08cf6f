//! In-memory world implementing every collaborator trait
//!
//! Used by the CLI, the Lua host and the tests. Path-graph updates and
//! `update()` calls are recorded so callers can inspect what the manager did.

use cgmath::InnerSpace;
use indexmap::IndexMap;
use tracing::trace;

use super::{PathGraph, Region, SpatialQuery, WorldObjects};
use crate::objects::{
    translation, EventMask, Flags, ObjectClass, ObjectId, RuntimeClass, Transform, Vec3,
};

/// A simulated world object
#[derive(Debug, Clone, PartialEq)]
pub struct WorldObject {
    pub id: ObjectId,
    pub class: ObjectClass,
    pub flags: Flags,
    pub event_mask: EventMask,
    pub transform: Transform,
    pub clipping_radius: f64,
    pub affects_path_graph: bool,
    /// Number of `update()` calls received
    pub updates: u32,
}

impl WorldObject {
    /// Create an object at `position` with no flags set
    pub fn new(id: ObjectId, class: ObjectClass, position: Vec3) -> Self {
        Self {
            id,
            class,
            flags: 0,
            event_mask: 0,
            transform: Transform::from_translation(position),
            clipping_radius: 1.0,
            affects_path_graph: false,
            updates: 0,
        }
    }

    /// Set the initial flags and event mask
    pub fn with_state(mut self, flags: Flags, event_mask: EventMask) -> Self {
        self.flags = flags;
        self.event_mask = event_mask;
        self
    }

    /// Set the clipping radius
    pub fn with_radius(mut self, radius: f64) -> Self {
        self.clipping_radius = radius;
        self
    }

    /// Mark the object as part of the path-planning surface
    pub fn affecting_path_graph(mut self) -> Self {
        self.affects_path_graph = true;
        self
    }

    /// Current world position
    pub fn position(&self) -> Vec3 {
        translation(&self.transform)
    }
}

/// Insertion-ordered collection of world objects
#[derive(Debug, Default)]
pub struct MemoryWorld {
    objects: IndexMap<ObjectId, WorldObject>,
    path_graph_updates: Vec<Region>,
}

impl MemoryWorld {
    /// Create an empty world
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an object, replacing any object with the same id
    pub fn spawn(&mut self, object: WorldObject) -> ObjectId {
        let id = object.id;
        self.objects.insert(id, object);
        id
    }

    /// Remove an object from the world, as the simulation would on despawn
    pub fn destroy(&mut self, id: ObjectId) -> Option<WorldObject> {
        self.objects.shift_remove(&id)
    }

    /// Get an object
    pub fn get(&self, id: ObjectId) -> Option<&WorldObject> {
        self.objects.get(&id)
    }

    /// Iterate objects in spawn order
    pub fn iter(&self) -> impl Iterator<Item = &WorldObject> {
        self.objects.values()
    }

    /// Number of objects
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// True when the world has no objects
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Path-graph regions requested so far
    pub fn path_graph_updates(&self) -> &[Region] {
        &self.path_graph_updates
    }

    /// Forget recorded path-graph regions
    pub fn clear_path_graph_updates(&mut self) {
        self.path_graph_updates.clear();
    }

    fn query<F>(&self, mut inside: F) -> Vec<ObjectId>
    where
        F: FnMut(Vec3) -> bool,
    {
        self.objects
            .values()
            .filter(|obj| inside(obj.position()))
            .map(|obj| obj.id)
            .collect()
    }
}

impl WorldObjects for MemoryWorld {
    fn contains(&self, id: ObjectId) -> bool {
        self.objects.contains_key(&id)
    }

    fn class_of(&self, id: ObjectId) -> Option<ObjectClass> {
        self.objects.get(&id).map(|obj| obj.class.clone())
    }

    fn flags(&self, id: ObjectId) -> Option<Flags> {
        self.objects.get(&id).map(|obj| obj.flags)
    }

    fn set_flags(&mut self, id: ObjectId, flags: Flags, _immediate: bool) {
        if let Some(obj) = self.objects.get_mut(&id) {
            obj.flags |= flags;
        }
    }

    fn clear_flags(&mut self, id: ObjectId, flags: Flags, _immediate: bool) {
        if let Some(obj) = self.objects.get_mut(&id) {
            obj.flags &= !flags;
        }
    }

    fn event_mask(&self, id: ObjectId) -> Option<EventMask> {
        self.objects.get(&id).map(|obj| obj.event_mask)
    }

    fn set_event_mask(&mut self, id: ObjectId, mask: EventMask) {
        if let Some(obj) = self.objects.get_mut(&id) {
            obj.event_mask |= mask;
        }
    }

    fn clear_event_mask(&mut self, id: ObjectId, mask: EventMask) {
        if let Some(obj) = self.objects.get_mut(&id) {
            obj.event_mask &= !mask;
        }
    }

    fn transform(&self, id: ObjectId) -> Option<Transform> {
        self.objects.get(&id).map(|obj| obj.transform)
    }

    fn set_transform(&mut self, id: ObjectId, transform: Transform) {
        if let Some(obj) = self.objects.get_mut(&id) {
            obj.transform = transform;
        }
    }

    fn position(&self, id: ObjectId) -> Option<Vec3> {
        self.objects.get(&id).map(WorldObject::position)
    }

    fn clipping_radius(&self, id: ObjectId) -> Option<f64> {
        self.objects.get(&id).map(|obj| obj.clipping_radius)
    }

    fn can_affect_path_graph(&self, id: ObjectId) -> bool {
        self.objects
            .get(&id)
            .is_some_and(|obj| obj.affects_path_graph && obj.class.runtime != RuntimeClass::Entity)
    }

    fn update(&mut self, id: ObjectId) {
        if let Some(obj) = self.objects.get_mut(&id) {
            obj.updates += 1;
        }
    }
}

impl SpatialQuery for MemoryWorld {
    fn objects_at_position(&self, center: Vec3, radius: f64) -> Vec<ObjectId> {
        let radius2 = radius * radius;
        self.query(|pos| {
            let dx = pos.x - center.x;
            let dz = pos.z - center.z;
            dx * dx + dz * dz <= radius2
        })
    }

    fn objects_at_position_3d(&self, center: Vec3, radius: f64) -> Vec<ObjectId> {
        let radius2 = radius * radius;
        self.query(|pos| (pos - center).magnitude2() <= radius2)
    }
}

impl PathGraph for MemoryWorld {
    fn update_region(&mut self, min: Vec3, max: Vec3) {
        trace!(?min, ?max, "path graph region update");
        self.path_graph_updates.push(Region { min, max });
    }
}
