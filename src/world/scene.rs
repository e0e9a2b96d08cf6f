//! Scene files - TOML descriptions of config classes and placed objects
//!
//! ```toml
//! [[classes]]
//! name = "Land_Barn"
//! parent = "building"
//!
//! [[objects]]
//! id = 1
//! type = "Land_Barn"
//! runtime = "building"
//! position = [1200.0, 8.0, 3400.0]
//! flags = 16
//! event_mask = 2
//! clipping_radius = 12.0
//! affects_path_graph = true
//! ```

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use figment::providers::{Format, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::memory::{MemoryWorld, WorldObject};
use crate::objects::{
    ClassDef, ClassRegistry, EventMask, Flags, ObjectClass, ObjectId, RuntimeClass, Vec3,
};

/// Errors that can occur while loading a scene
#[derive(Debug, Error)]
pub enum SceneError {
    #[error("scene file not found: {0}")]
    NotFound(PathBuf),

    #[error("invalid scene: {0}")]
    Parse(#[from] figment::Error),

    #[error("duplicate object id {0}")]
    DuplicateObject(ObjectId),

    #[error("class '{class}' inherits from unknown class '{parent}'")]
    UnknownParentClass { class: String, parent: String },
}

/// A config class declared by the scene
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassEntry {
    pub name: String,
    pub parent: String,
}

fn default_radius() -> f64 {
    1.0
}

/// A placed object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneObject {
    pub id: ObjectId,
    /// Config class name; omitted for baked terrain objects
    #[serde(rename = "type", default)]
    pub config_type: String,
    #[serde(default)]
    pub runtime: RuntimeClass,
    pub position: [f64; 3],
    #[serde(default)]
    pub flags: Flags,
    #[serde(default)]
    pub event_mask: EventMask,
    #[serde(default = "default_radius")]
    pub clipping_radius: f64,
    #[serde(default)]
    pub affects_path_graph: bool,
}

impl SceneObject {
    fn to_world_object(&self) -> WorldObject {
        let [x, y, z] = self.position;
        let mut object = WorldObject::new(
            self.id,
            ObjectClass::new(&self.config_type, self.runtime),
            Vec3::new(x, y, z),
        )
        .with_state(self.flags, self.event_mask)
        .with_radius(self.clipping_radius);
        object.affects_path_graph = self.affects_path_graph;
        object
    }
}

/// Parsed scene file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    #[serde(default)]
    pub classes: Vec<ClassEntry>,
    #[serde(default)]
    pub objects: Vec<SceneObject>,
}

impl Scene {
    /// Load a scene from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, SceneError> {
        if !path.is_file() {
            return Err(SceneError::NotFound(path.to_path_buf()));
        }
        Ok(Figment::from(Toml::file(path)).extract()?)
    }

    /// Parse a scene from TOML source
    pub fn from_toml_str(source: &str) -> Result<Self, SceneError> {
        Ok(Figment::from(Toml::string(source)).extract()?)
    }

    /// Validate the scene and build its class registry and world
    pub fn instantiate(&self) -> Result<(ClassRegistry, MemoryWorld), SceneError> {
        let mut classes = ClassRegistry::new();
        let declared: HashSet<String> = self
            .classes
            .iter()
            .map(|entry| entry.name.to_lowercase())
            .collect();

        for entry in &self.classes {
            if !classes.exists(&entry.parent) && !declared.contains(&entry.parent.to_lowercase()) {
                return Err(SceneError::UnknownParentClass {
                    class: entry.name.clone(),
                    parent: entry.parent.clone(),
                });
            }
        }
        for entry in &self.classes {
            classes.register(ClassDef::new(&entry.name, Some(&entry.parent)));
        }

        let mut world = MemoryWorld::new();
        for object in &self.objects {
            if world.get(object.id).is_some() {
                return Err(SceneError::DuplicateObject(object.id));
            }
            world.spawn(object.to_world_object());
        }

        Ok((classes, world))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::WorldObjects;

    const SCENE: &str = r#"
        [[classes]]
        name = "Land_Barn"
        parent = "building"

        [[objects]]
        id = 1
        type = "Land_Barn"
        runtime = "building"
        position = [100.0, 2.0, 200.0]
        flags = 16
        event_mask = 2
        clipping_radius = 12.0
        affects_path_graph = true

        [[objects]]
        id = 2
        runtime = "tree"
        position = [110.0, 0.0, 205.0]
    "#;

    #[test]
    fn test_parse_scene() {
        let scene = Scene::from_toml_str(SCENE).unwrap();

        assert_eq!(scene.classes.len(), 1);
        assert_eq!(scene.objects.len(), 2);

        let barn = &scene.objects[0];
        assert_eq!(barn.id, ObjectId(1));
        assert_eq!(barn.config_type, "Land_Barn");
        assert_eq!(barn.runtime, RuntimeClass::Building);
        assert_eq!(barn.flags, 16);
        assert!(barn.affects_path_graph);

        let tree = &scene.objects[1];
        assert!(tree.config_type.is_empty());
        assert_eq!(tree.clipping_radius, 1.0);
        assert_eq!(tree.flags, 0);
        assert!(!tree.affects_path_graph);
    }

    #[test]
    fn test_instantiate() {
        let scene = Scene::from_toml_str(SCENE).unwrap();
        let (classes, world) = scene.instantiate().unwrap();

        assert!(classes.is_a("land_barn", "house"));
        assert_eq!(world.len(), 2);
        assert_eq!(world.position(ObjectId(1)), Some(Vec3::new(100.0, 2.0, 200.0)));
        assert_eq!(world.event_mask(ObjectId(1)), Some(2));
        assert_eq!(world.clipping_radius(ObjectId(1)), Some(12.0));
    }

    #[test]
    fn test_duplicate_object() {
        let scene = Scene::from_toml_str(
            r#"
            [[objects]]
            id = 7
            position = [0.0, 0.0, 0.0]

            [[objects]]
            id = 7
            position = [1.0, 0.0, 0.0]
            "#,
        )
        .unwrap();

        assert!(matches!(
            scene.instantiate(),
            Err(SceneError::DuplicateObject(ObjectId(7)))
        ));
    }

    #[test]
    fn test_unknown_parent() {
        let scene = Scene::from_toml_str(
            r#"
            [[classes]]
            name = "Land_Tower"
            parent = "tower_base"
            "#,
        )
        .unwrap();

        match scene.instantiate() {
            Err(SceneError::UnknownParentClass { class, parent }) => {
                assert_eq!(class, "Land_Tower");
                assert_eq!(parent, "tower_base");
            }
            other => panic!("expected unknown parent error, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_parent_declared_later_in_scene() {
        let scene = Scene::from_toml_str(
            r#"
            [[classes]]
            name = "Land_Tower_Tall"
            parent = "Land_Tower"

            [[classes]]
            name = "Land_Tower"
            parent = "building"
            "#,
        )
        .unwrap();

        let (classes, _) = scene.instantiate().unwrap();
        assert!(classes.is_a("land_tower_tall", "house"));
    }

    #[test]
    fn test_missing_file() {
        let err = Scene::from_file(Path::new("/nonexistent/scene.toml")).unwrap_err();
        assert!(matches!(err, SceneError::NotFound(_)));
    }

    #[test]
    fn test_missing_position_is_rejected() {
        let result = Scene::from_toml_str(
            r#"
            [[objects]]
            id = 3
            "#,
        );
        assert!(matches!(result, Err(SceneError::Parse(_))));
    }
}
