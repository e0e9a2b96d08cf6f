//! Map object manager
//!
//! Hides static map content (buildings, wrecks, trees, bushes) without
//! removing it from the simulation: flags and event mask are cleared and the
//! object is displaced far outside the playable area. The state captured at
//! registration is enough to put the object back exactly where it was.
//!
//! The manager is an explicit context object. The host creates one, passes
//! its world collaborators into each call, and tears it down with
//! [`ObjectManager::shutdown`].

mod batch;
mod visibility;

use tracing::{debug, info, warn};

use crate::config::Config;
use crate::objects::{ClassRegistry, ObjectId, ObjectLink, ObjectRegistry};
use crate::world::WorldObjects;

/// Registry of hidden and registered map objects
#[derive(Debug)]
pub struct ObjectManager {
    config: Config,
    classes: ClassRegistry,
    registry: ObjectRegistry,
}

impl Default for ObjectManager {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl ObjectManager {
    /// Create a manager with the base config classes
    pub fn new(config: Config) -> Self {
        Self::with_classes(config, ClassRegistry::new())
    }

    /// Create a manager with a prepared class registry
    pub fn with_classes(config: Config, classes: ClassRegistry) -> Self {
        Self {
            config,
            classes,
            registry: ObjectRegistry::new(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn classes(&self) -> &ClassRegistry {
        &self.classes
    }

    pub fn classes_mut(&mut self) -> &mut ClassRegistry {
        &mut self.classes
    }

    /// Read-only view of the link registry
    pub fn registry(&self) -> &ObjectRegistry {
        &self.registry
    }

    /// Register an object in its current state.
    ///
    /// Returns the existing link if the object is already registered, and
    /// `None` if the object does not exist. The object itself is not touched.
    pub fn register_object<W>(&mut self, world: &W, id: ObjectId) -> Option<&ObjectLink>
    where
        W: WorldObjects + ?Sized,
    {
        if !self.registry.contains(id) {
            let flags = world.flags(id)?;
            let event_mask = world.event_mask(id)?;
            self.registry.register(id, flags, event_mask);
            debug!(object = %id, flags, event_mask, "registered object");
        }
        self.registry.get(id)
    }

    /// Drop an object's link without restoring anything.
    ///
    /// Unregistering a hidden object leaves it displaced; the returned link
    /// carries the captured state should the caller want to restore it.
    pub fn unregister_object(&mut self, id: ObjectId) -> Option<ObjectLink> {
        let link = self.registry.unregister(id)?;
        debug!(object = %id, hidden = link.hidden, "unregistered object");
        Some(link)
    }

    pub fn is_object_registered(&self, id: ObjectId) -> bool {
        self.registry.contains(id)
    }

    pub fn is_map_object_hidden(&self, id: ObjectId) -> bool {
        self.registry.is_hidden(id)
    }

    /// Link recorded for an object
    pub fn link(&self, id: ObjectId) -> Option<&ObjectLink> {
        self.registry.get(id)
    }

    /// Hidden objects, in registration order
    pub fn get_hidden_map_objects(&self) -> Vec<ObjectId> {
        self.registry.hidden_objects()
    }

    /// Registered objects regardless of hidden state, in registration order
    pub fn get_registered_objects(&self) -> Vec<ObjectId> {
        self.registry.objects()
    }

    /// Destruction callback for the host's despawn path.
    ///
    /// The object is gone, so there is nothing to restore; its link is dropped.
    pub fn object_destroyed(&mut self, id: ObjectId) -> Option<ObjectLink> {
        let link = self.registry.unregister(id)?;
        if link.hidden {
            warn!(object = %id, "hidden object destroyed by the simulation");
        } else {
            debug!(object = %id, "registered object destroyed");
        }
        Some(link)
    }

    /// Drop every link whose object no longer exists in `world`
    pub fn sweep_stale_links<W>(&mut self, world: &W) -> Vec<ObjectLink>
    where
        W: WorldObjects + ?Sized,
    {
        let stale = self.registry.remove_where(|link| !world.contains(link.object));
        for link in &stale {
            warn!(object = %link.object, hidden = link.hidden, "dropped stale link");
        }
        if !stale.is_empty() {
            info!(count = stale.len(), "swept stale links");
        }
        stale
    }

    /// Release all registry state, returning the number of links dropped.
    ///
    /// Hidden objects stay where they are; call
    /// [`unhide_all_map_objects`](Self::unhide_all_map_objects) first to
    /// restore them.
    pub fn shutdown(mut self) -> usize {
        let hidden = self.registry.hidden_objects().len();
        let dropped = self.registry.clear();
        info!(dropped, hidden, "object manager shut down");
        dropped
    }
}
