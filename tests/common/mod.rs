//! Common test utilities - scene fixtures and world builders

#![allow(dead_code)]

use std::io::Write;

use objmgr::objects::{ClassRegistry, ObjectClass, ObjectId, RuntimeClass, Vec3};
use objmgr::world::{MemoryWorld, Scene, WorldObject};
use tempfile::NamedTempFile;

/// A small village: two houses, trees, a baked rock, a wreck and some loot
pub const VILLAGE_SCENE: &str = r#"
[[classes]]
name = "Land_Barn"
parent = "building"

[[classes]]
name = "Land_Wreck_Bus"
parent = "wreck"

[[objects]]
id = 1
type = "Land_Barn"
runtime = "building"
position = [100.0, 2.0, 200.0]
flags = 16
event_mask = 2
clipping_radius = 8.0
affects_path_graph = true

[[objects]]
id = 2
runtime = "tree"
position = [104.0, 0.0, 202.0]
flags = 1
event_mask = 1

[[objects]]
id = 3
type = "Apple"
runtime = "entity"
position = [101.0, 0.0, 201.0]
flags = 1
event_mask = 4

[[objects]]
id = 4
position = [96.0, 0.0, 198.0]
flags = 3
event_mask = 0

[[objects]]
id = 5
type = "Land_Wreck_Bus"
runtime = "building"
position = [400.0, 0.0, 400.0]
flags = 16
event_mask = 2
clipping_radius = 6.0
affects_path_graph = true

[[objects]]
id = 6
runtime = "bush"
position = [102.0, 50.0, 200.0]
flags = 1
event_mask = 0
"#;

/// Parse and instantiate the village scene
pub fn village() -> (ClassRegistry, MemoryWorld) {
    Scene::from_toml_str(VILLAGE_SCENE)
        .expect("village scene should parse")
        .instantiate()
        .expect("village scene should instantiate")
}

/// Write `contents` to a temporary file with the given suffix
pub fn temp_file(suffix: &str, contents: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(suffix)
        .tempfile()
        .expect("failed to create temp file");
    file.write_all(contents.as_bytes())
        .expect("failed to write temp file");
    file
}

/// Spawn a tree with the given flags and event mask
pub fn spawn_tree(world: &mut MemoryWorld, raw: u64, position: Vec3, flags: u32, event_mask: u32) -> ObjectId {
    world.spawn(
        WorldObject::new(ObjectId(raw), ObjectClass::new("", RuntimeClass::Tree), position)
            .with_state(flags, event_mask),
    )
}

pub fn ids(raw: &[u64]) -> Vec<ObjectId> {
    raw.iter().copied().map(ObjectId).collect()
}
