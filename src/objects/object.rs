//! Object identity, classification and geometry types

use cgmath::{Matrix4, Vector3};
use serde::{Deserialize, Serialize};
use std::fmt;

/// World-space vector (X east, Y up, Z north)
pub type Vec3 = Vector3<f64>;

/// Object transform; the `w` column holds the translation
pub type Transform = Matrix4<f64>;

/// Simulation flag bitmask
pub type Flags = u32;

/// Event subscription bitmask
pub type EventMask = u32;

/// Non-owning handle to a world object.
///
/// The simulation owns the object itself; an `ObjectId` only names it, so the
/// referent may disappear while the id is still held somewhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectId(pub u64);

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<u64> for ObjectId {
    fn from(raw: u64) -> Self {
        Self(raw)
    }
}

/// Engine-side runtime class of an object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuntimeClass {
    /// Generic base object, e.g. a model placed in the terrain with no config
    #[default]
    Object,
    /// Building-derived runtime class
    Building,
    /// Tree
    Tree,
    /// Bush
    Bush,
    /// Dynamic entity (items, creatures, vehicles, ...)
    Entity,
}

/// Classification data the engine exposes for an object
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ObjectClass {
    /// Config class name; empty when the object has no config entry
    pub config_type: String,
    /// Runtime class
    pub runtime: RuntimeClass,
}

impl ObjectClass {
    /// Create a classification
    pub fn new(config_type: &str, runtime: RuntimeClass) -> Self {
        Self {
            config_type: config_type.to_string(),
            runtime,
        }
    }

    /// Object baked into the terrain with no config class
    pub fn baked() -> Self {
        Self::new("", RuntimeClass::Object)
    }

    /// True when the object has no config type string
    pub fn is_untyped(&self) -> bool {
        self.config_type.is_empty()
    }
}

/// Vector with the same value on every axis
pub fn splat(value: f64) -> Vec3 {
    Vec3::new(value, value, value)
}

/// Translation part of a transform
pub fn translation(tm: &Transform) -> Vec3 {
    Vec3::new(tm.w.x, tm.w.y, tm.w.z)
}

/// Return `tm` moved by `delta`, leaving rotation and scale untouched
pub fn translated(tm: &Transform, delta: Vec3) -> Transform {
    let mut out = *tm;
    out.w.x += delta.x;
    out.w.y += delta.y;
    out.w.z += delta.z;
    out
}

/// Return `tm` with its translation replaced by `position`
pub fn with_translation(tm: &Transform, position: Vec3) -> Transform {
    let mut out = *tm;
    out.w.x = position.x;
    out.w.y = position.y;
    out.w.z = position.z;
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_id_display() {
        assert_eq!(ObjectId(42).to_string(), "#42");
        assert_eq!(ObjectId::from(7), ObjectId(7));
    }

    #[test]
    fn test_baked_class() {
        let class = ObjectClass::baked();
        assert!(class.is_untyped());
        assert_eq!(class.runtime, RuntimeClass::Object);

        let house = ObjectClass::new("Land_House_1W01", RuntimeClass::Building);
        assert!(!house.is_untyped());
    }

    #[test]
    fn test_translation_roundtrip() {
        let tm = Transform::from_translation(Vec3::new(1250.5, 12.25, -300.75));
        assert_eq!(translation(&tm), Vec3::new(1250.5, 12.25, -300.75));

        let moved = translated(&tm, -splat(10000.0));
        assert_eq!(translation(&moved), Vec3::new(-8749.5, -9987.75, -10300.75));

        let back = translated(&moved, splat(10000.0));
        assert_eq!(back, tm);
    }

    #[test]
    fn test_with_translation() {
        let tm = Transform::from_angle_y(cgmath::Deg(30.0));
        let placed = with_translation(&tm, Vec3::new(1234.567, 0.1, 7.3));
        assert_eq!(translation(&placed), Vec3::new(1234.567, 0.1, 7.3));
        assert_eq!(placed.x, tm.x);
    }

    #[test]
    fn test_translated_keeps_rotation() {
        let tm = Transform::from_angle_y(cgmath::Deg(90.0)) * Transform::from_scale(2.0);
        let moved = translated(&tm, Vec3::new(5.0, 0.0, 0.0));
        assert_eq!(moved.x, tm.x);
        assert_eq!(moved.y, tm.y);
        assert_eq!(moved.z, tm.z);
        assert_eq!(moved.w.x, tm.w.x + 5.0);
    }
}
