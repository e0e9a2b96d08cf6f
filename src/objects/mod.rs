//! Object system - identity, config classes and the link registry

mod class;
mod object;
mod registry;

pub use class::{ClassDef, ClassRegistry, HOUSE_CLASS, ROOT_CLASS};
pub use object::{
    splat, translated, translation, with_translation, EventMask, Flags, ObjectClass, ObjectId, RuntimeClass,
    Transform, Vec3,
};
pub use registry::{ObjectLink, ObjectRegistry};
