//! Single-object hide/unhide

use tracing::{debug, warn};

use super::ObjectManager;
use crate::objects::{
    splat, translated, translation, with_translation, ObjectId, RuntimeClass, Transform, Vec3,
    HOUSE_CLASS,
};
use crate::world::{Region, World, WorldObjects};

impl ObjectManager {
    /// Check if an object is part of the baked map content.
    ///
    /// True for objects placed in the terrain without a config class, for
    /// anything whose config class inherits from `house`, and for trees and
    /// bushes. Unknown objects are never map objects.
    pub fn is_map_object<W>(&self, world: &W, id: ObjectId) -> bool
    where
        W: WorldObjects + ?Sized,
    {
        let Some(class) = world.class_of(id) else {
            return false;
        };

        (class.is_untyped() && class.runtime == RuntimeClass::Object)
            || self.classes.is_a(&class.config_type, HOUSE_CLASS)
            || matches!(class.runtime, RuntimeClass::Tree | RuntimeClass::Bush)
    }

    /// Hide a static map object visually and physically.
    ///
    /// Returns the object, or `None` if it is not a map object or already hidden.
    pub fn hide_map_object<W>(
        &mut self,
        world: &mut W,
        id: ObjectId,
        update_path_graph: bool,
    ) -> Option<ObjectId>
    where
        W: World + ?Sized,
    {
        if !self.is_map_object(&*world, id) || self.registry.is_hidden(id) {
            return None;
        }

        // Read everything up front so a vanished object fails before any mutation
        let original_position = world.position(id)?;
        let transform = world.transform(id)?;
        let flags = world.flags(id)?;
        let event_mask = world.event_mask(id)?;

        let link = self.registry.register(id, flags, event_mask);
        link.hidden = true;
        link.origin = Some(translation(&transform));
        let (saved_flags, saved_mask) = (link.flags, link.event_mask);

        world.clear_flags(id, saved_flags, true);
        world.clear_event_mask(id, saved_mask);
        world.set_transform(id, translated(&transform, -self.hide_offset()));
        world.update(id);

        if update_path_graph && world.can_affect_path_graph(id) {
            invalidate_path_graph(world, id, original_position);
        }

        debug!(object = %id, flags = saved_flags, event_mask = saved_mask, "hid map object");
        Some(id)
    }

    /// Restore a hidden map object and drop its link.
    ///
    /// Returns the object, or `None` if it is not currently hidden. An object
    /// that is registered but visible is left registered.
    pub fn unhide_map_object<W>(
        &mut self,
        world: &mut W,
        id: ObjectId,
        update_path_graph: bool,
    ) -> Option<ObjectId>
    where
        W: World + ?Sized,
    {
        if !self.registry.is_hidden(id) {
            return None;
        }
        let link = self.registry.unregister(id)?;

        let Some(transform) = world.transform(id) else {
            warn!(object = %id, "hidden object no longer exists, dropped its link");
            return None;
        };

        world.set_transform(id, self.restored_transform(&transform, link.origin));
        world.set_flags(id, link.flags, true);
        world.set_event_mask(id, link.event_mask);
        world.update(id);

        if update_path_graph && world.can_affect_path_graph(id) {
            if let Some(position) = world.position(id) {
                invalidate_path_graph(world, id, position);
            }
        }

        debug!(object = %id, flags = link.flags, event_mask = link.event_mask, "unhid map object");
        Some(id)
    }

    /// Displacement applied to hidden objects
    pub fn hide_offset(&self) -> Vec3 {
        splat(self.config.hide_offset)
    }

    /// Transform that undoes the hide displacement.
    ///
    /// `x - offset + offset` is not exact in floating point, so an object
    /// still sitting where hiding put it gets its saved translation back.
    /// An object moved while hidden is shifted back by the offset instead.
    fn restored_transform(&self, transform: &Transform, origin: Option<Vec3>) -> Transform {
        match origin {
            Some(origin) if translation(transform) == origin - self.hide_offset() => {
                with_translation(transform, origin)
            }
            _ => translated(transform, self.hide_offset()),
        }
    }
}

fn invalidate_path_graph<W>(world: &mut W, id: ObjectId, center: Vec3)
where
    W: World + ?Sized,
{
    let radius = world.clipping_radius(id).unwrap_or(0.0);
    let region = Region::around(center, radius);
    world.update_region(region.min, region.max);
}
