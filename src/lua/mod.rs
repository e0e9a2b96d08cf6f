//! Lua scripting - the object manager's script surface

mod api;
mod host;

pub use api::{ObjectsApi, Session, SharedSession};
pub use host::{ScriptError, ScriptHost};
