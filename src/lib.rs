//! objmgr - map object manager
//!
//! Hides static map objects (buildings, vegetation, wrecks) visually,
//! physically and from event processing without removing them from the
//! simulation, and restores them exactly on request.
//!
//! The host simulation supplies the [`world`] collaborators; the
//! [`ObjectManager`] keeps the links needed to undo every hide.

pub mod config;
pub mod lua;
pub mod manager;
pub mod objects;
pub mod world;

pub use config::{Config, ConfigError};
pub use manager::ObjectManager;
pub use objects::{ObjectId, ObjectLink};

use serde::Serialize;

use world::{MemoryWorld, Region};

/// Summary of a manager session, as printed by the CLI
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub hidden: Vec<ObjectId>,
    pub registered: Vec<ObjectId>,
    pub links: Vec<ObjectLink>,
    /// Path-graph regions requested, as `[min, max]` corner triples
    pub path_graph_updates: Vec<[[f64; 3]; 2]>,
}

impl Report {
    /// Capture the current state of a manager and its in-memory world
    pub fn capture(manager: &ObjectManager, world: &MemoryWorld) -> Self {
        Self {
            hidden: manager.get_hidden_map_objects(),
            registered: manager.get_registered_objects(),
            links: manager.registry().iter().copied().collect(),
            path_graph_updates: world
                .path_graph_updates()
                .iter()
                .map(|region: &Region| {
                    [
                        [region.min.x, region.min.y, region.min.z],
                        [region.max.x, region.max.y, region.max.z],
                    ]
                })
                .collect(),
        }
    }
}
