//! Link registry - auxiliary state attached to externally owned objects
//!
//! Links live in a single insertion-ordered map: keyed lookup and ordered
//! scans read the same storage, so the two views can never disagree.

use indexmap::IndexMap;
use serde::Serialize;

use super::object::{EventMask, Flags, ObjectId, Vec3};

/// State recorded for a registered object
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ObjectLink {
    /// The linked object
    pub object: ObjectId,
    /// Simulation flags captured at registration
    pub flags: Flags,
    /// Event mask captured at registration
    pub event_mask: EventMask,
    /// Whether the object is currently displaced
    pub hidden: bool,
    /// Translation the object had before it was displaced
    #[serde(skip)]
    pub origin: Option<Vec3>,
}

impl ObjectLink {
    /// Create a visible link from captured state
    pub fn new(object: ObjectId, flags: Flags, event_mask: EventMask) -> Self {
        Self {
            object,
            flags,
            event_mask,
            hidden: false,
            origin: None,
        }
    }
}

/// Registry of object links in registration order
#[derive(Debug, Default)]
pub struct ObjectRegistry {
    links: IndexMap<ObjectId, ObjectLink>,
}

impl ObjectRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an object with its current flags and event mask.
    ///
    /// Registering a known object is a no-op: the existing link, with the
    /// state captured the first time, is returned unchanged.
    pub fn register(&mut self, object: ObjectId, flags: Flags, event_mask: EventMask) -> &mut ObjectLink {
        self.links
            .entry(object)
            .or_insert_with(|| ObjectLink::new(object, flags, event_mask))
    }

    /// Remove an object's link, returning it. The object itself is untouched.
    pub fn unregister(&mut self, object: ObjectId) -> Option<ObjectLink> {
        self.links.shift_remove(&object)
    }

    /// Look up a link
    pub fn get(&self, object: ObjectId) -> Option<&ObjectLink> {
        self.links.get(&object)
    }

    /// Look up a link mutably
    pub fn get_mut(&mut self, object: ObjectId) -> Option<&mut ObjectLink> {
        self.links.get_mut(&object)
    }

    /// Check if an object is registered
    pub fn contains(&self, object: ObjectId) -> bool {
        self.links.contains_key(&object)
    }

    /// Check if an object is registered and hidden
    pub fn is_hidden(&self, object: ObjectId) -> bool {
        self.links.get(&object).is_some_and(|link| link.hidden)
    }

    /// Iterate links in registration order
    pub fn iter(&self) -> impl Iterator<Item = &ObjectLink> {
        self.links.values()
    }

    /// Snapshot of every registered object, in registration order
    pub fn objects(&self) -> Vec<ObjectId> {
        self.links.keys().copied().collect()
    }

    /// Snapshot of hidden objects, in registration order
    pub fn hidden_objects(&self) -> Vec<ObjectId> {
        self.iter()
            .filter(|link| link.hidden)
            .map(|link| link.object)
            .collect()
    }

    /// Remove every link matching `remove`, returning the removed links in order
    pub fn remove_where<F>(&mut self, mut remove: F) -> Vec<ObjectLink>
    where
        F: FnMut(&ObjectLink) -> bool,
    {
        let mut removed = Vec::new();
        self.links.retain(|_, link| {
            if remove(link) {
                removed.push(*link);
                false
            } else {
                true
            }
        });
        removed
    }

    /// Number of registered objects
    pub fn len(&self) -> usize {
        self.links.len()
    }

    /// True when nothing is registered
    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    /// Drop every link, returning how many were dropped
    pub fn clear(&mut self) -> usize {
        let count = self.links.len();
        self.links.clear();
        count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(raw: u64) -> ObjectId {
        ObjectId(raw)
    }

    #[test]
    fn test_register_captures_state() {
        let mut registry = ObjectRegistry::new();
        let link = registry.register(id(1), 0x10, 0x2);

        assert_eq!(link.object, id(1));
        assert_eq!(link.flags, 0x10);
        assert_eq!(link.event_mask, 0x2);
        assert!(!link.hidden);
        assert!(registry.contains(id(1)));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_register_is_idempotent() {
        let mut registry = ObjectRegistry::new();
        registry.register(id(1), 0x10, 0x2).hidden = true;

        // Second registration keeps the original capture
        let link = registry.register(id(1), 0xff, 0xff);
        assert_eq!(link.flags, 0x10);
        assert_eq!(link.event_mask, 0x2);
        assert!(link.hidden);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_unregister() {
        let mut registry = ObjectRegistry::new();
        registry.register(id(1), 1, 1);

        let link = registry.unregister(id(1)).unwrap();
        assert_eq!(link.object, id(1));
        assert!(!registry.contains(id(1)));
        assert!(registry.is_empty());

        // Absent object
        assert!(registry.unregister(id(1)).is_none());
    }

    #[test]
    fn test_order_survives_removal() {
        let mut registry = ObjectRegistry::new();
        for raw in [5, 3, 9, 1] {
            registry.register(id(raw), 0, 0);
        }
        registry.unregister(id(3));
        registry.register(id(3), 0, 0);

        assert_eq!(registry.objects(), vec![id(5), id(9), id(1), id(3)]);
    }

    #[test]
    fn test_hidden_objects() {
        let mut registry = ObjectRegistry::new();
        registry.register(id(1), 0, 0).hidden = true;
        registry.register(id(2), 0, 0);
        registry.register(id(3), 0, 0).hidden = true;

        assert_eq!(registry.hidden_objects(), vec![id(1), id(3)]);
        assert!(registry.is_hidden(id(1)));
        assert!(!registry.is_hidden(id(2)));
        assert!(!registry.is_hidden(id(4)));
    }

    #[test]
    fn test_remove_where() {
        let mut registry = ObjectRegistry::new();
        for raw in 1..=4 {
            registry.register(id(raw), 0, 0);
        }

        let removed = registry.remove_where(|link| link.object.0 % 2 == 0);
        let removed: Vec<ObjectId> = removed.iter().map(|link| link.object).collect();
        assert_eq!(removed, vec![id(2), id(4)]);
        assert_eq!(registry.objects(), vec![id(1), id(3)]);
    }

    #[test]
    fn test_clear() {
        let mut registry = ObjectRegistry::new();
        registry.register(id(1), 0, 0);
        registry.register(id(2), 0, 0);

        assert_eq!(registry.clear(), 2);
        assert!(registry.is_empty());
        assert_eq!(registry.clear(), 0);
    }
}
