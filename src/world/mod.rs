//! Simulation collaborators
//!
//! The object manager never owns world objects. It reaches them through
//! these traits, which a host engine implements over its own storage:
//! - [`WorldObjects`]: per-object flag, mask, transform and classification primitives
//! - [`SpatialQuery`]: candidate lookup around a point
//! - [`PathGraph`]: path-planning surface invalidation

mod memory;
mod scene;

pub use memory::{MemoryWorld, WorldObject};
pub use scene::{ClassEntry, Scene, SceneError, SceneObject};

use crate::objects::{EventMask, Flags, ObjectClass, ObjectId, Transform, Vec3};

/// Per-object primitives provided by the simulation runtime.
///
/// Getters return `None` once the referent no longer exists. Mutators on an
/// unknown object do nothing.
pub trait WorldObjects {
    /// Whether the object still exists
    fn contains(&self, id: ObjectId) -> bool;

    /// Classification data
    fn class_of(&self, id: ObjectId) -> Option<ObjectClass>;

    fn flags(&self, id: ObjectId) -> Option<Flags>;

    /// OR `flags` into the object's flags
    fn set_flags(&mut self, id: ObjectId, flags: Flags, immediate: bool);

    /// Clear `flags` from the object's flags
    fn clear_flags(&mut self, id: ObjectId, flags: Flags, immediate: bool);

    fn event_mask(&self, id: ObjectId) -> Option<EventMask>;

    /// OR `mask` into the object's event mask
    fn set_event_mask(&mut self, id: ObjectId, mask: EventMask);

    /// Clear `mask` from the object's event mask
    fn clear_event_mask(&mut self, id: ObjectId, mask: EventMask);

    fn transform(&self, id: ObjectId) -> Option<Transform>;

    fn set_transform(&mut self, id: ObjectId, transform: Transform);

    /// World position (translation of the transform)
    fn position(&self, id: ObjectId) -> Option<Vec3>;

    /// Bounding sphere radius used for clipping
    fn clipping_radius(&self, id: ObjectId) -> Option<f64>;

    /// Whether the object contributes to the path-planning surface
    fn can_affect_path_graph(&self, id: ObjectId) -> bool;

    /// Push pending transform and flag changes to rendering and physics
    fn update(&mut self, id: ObjectId);
}

/// Spatial candidate lookup
pub trait SpatialQuery {
    /// Objects within `radius` of `center` on the horizontal plane (infinite cylinder)
    fn objects_at_position(&self, center: Vec3, radius: f64) -> Vec<ObjectId>;

    /// Objects within `radius` of `center` in 3D (sphere)
    fn objects_at_position_3d(&self, center: Vec3, radius: f64) -> Vec<ObjectId>;
}

/// Path-planning surface
pub trait PathGraph {
    /// Request recomputation over an axis-aligned box
    fn update_region(&mut self, min: Vec3, max: Vec3);
}

/// Everything the object manager needs from the simulation
pub trait World: WorldObjects + SpatialQuery + PathGraph {}

impl<T: WorldObjects + SpatialQuery + PathGraph + ?Sized> World for T {}

/// Axis-aligned box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Region {
    pub min: Vec3,
    pub max: Vec3,
}

impl Region {
    /// Cube of half-extent `radius` centered on `center`
    pub fn around(center: Vec3, radius: f64) -> Self {
        let extent = Vec3::new(radius, radius, radius);
        Self {
            min: center - extent,
            max: center + extent,
        }
    }

    /// Center of the box
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) / 2.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_region_around() {
        let region = Region::around(Vec3::new(100.0, 5.0, -20.0), 4.0);
        assert_eq!(region.min, Vec3::new(96.0, 1.0, -24.0));
        assert_eq!(region.max, Vec3::new(104.0, 9.0, -16.0));
        assert_eq!(region.center(), Vec3::new(100.0, 5.0, -20.0));
    }
}
