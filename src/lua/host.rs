//! Script host - a restricted Lua state bound to one manager session

use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use mlua::{Lua, LuaOptions, Result as LuaResult, StdLib, Value, Variadic};
use thiserror::Error;
use tracing::{debug, info};

use super::api::{ObjectsApi, Session, SharedSession};
use crate::manager::ObjectManager;
use crate::world::{MemoryWorld, World};

/// Errors that can occur while running scripts
#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("failed to read script {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Lua error: {0}")]
    Lua(#[from] mlua::Error),

    #[error("session is still referenced by the Lua state")]
    SessionInUse,
}

/// Globals removed from every script state
const BLOCKED_GLOBALS: [&str; 10] = [
    "os",
    "io",
    "loadfile",
    "dofile",
    "load",
    "loadstring",
    "require",
    "package",
    "debug",
    "collectgarbage",
];

/// A Lua state exposing the object manager to scripts
pub struct ScriptHost<W> {
    lua: Lua,
    api: ObjectsApi<W>,
    session: SharedSession<W>,
}

impl<W: World + 'static> ScriptHost<W> {
    /// Create a host driving `manager` against `world`
    pub fn new(manager: ObjectManager, world: W) -> Result<Self, ScriptError> {
        let lua = Lua::new_with(
            StdLib::STRING | StdLib::TABLE | StdLib::MATH | StdLib::UTF8,
            LuaOptions::default(),
        )?;
        Self::remove_blocked_globals(&lua)?;
        Self::add_print(&lua)?;

        let session = Rc::new(RefCell::new(Session { manager, world }));
        let api = ObjectsApi::new(session.clone());
        api.register(&lua)?;

        Ok(Self { lua, api, session })
    }

    fn remove_blocked_globals(lua: &Lua) -> LuaResult<()> {
        let globals = lua.globals();
        for name in BLOCKED_GLOBALS {
            globals.set(name, Value::Nil)?;
        }
        Ok(())
    }

    /// Route `print` to the log
    fn add_print(lua: &Lua) -> LuaResult<()> {
        let print = lua.create_function(|_, args: Variadic<Value>| {
            let line = args
                .iter()
                .map(display_value)
                .collect::<Vec<_>>()
                .join("\t");
            info!(target: "objmgr::script", "{}", line);
            Ok(())
        })?;
        lua.globals().set("print", print)
    }

    /// Run a chunk of Lua source
    pub fn exec(&self, name: &str, source: &str) -> Result<(), ScriptError> {
        debug!(script = name, "running script");
        self.lua.load(source).set_name(name).exec()?;
        Ok(())
    }

    /// Evaluate an expression or chunk and convert its result
    pub fn eval<R>(&self, source: &str) -> Result<R, ScriptError>
    where
        R: mlua::FromLuaMulti,
    {
        Ok(self.lua.load(source).eval()?)
    }

    /// Run a script file
    pub fn run_file(&self, path: &Path) -> Result<(), ScriptError> {
        let source = std::fs::read_to_string(path).map_err(|source| ScriptError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        self.exec(&path.display().to_string(), &source)
    }

    /// Check if a global is set
    pub fn global_exists(&self, name: &str) -> bool {
        self.lua
            .globals()
            .get::<Value>(name)
            .map(|v| !matches!(v, Value::Nil))
            .unwrap_or(false)
    }

    /// Shared session, for inspecting state between scripts
    pub fn session(&self) -> &SharedSession<W> {
        &self.session
    }

    /// Tear down the Lua state and hand back the manager and world
    pub fn into_parts(self) -> Result<(ObjectManager, W), ScriptError> {
        let Self { lua, api, session } = self;
        drop(api);
        drop(lua);
        let session = Rc::try_unwrap(session).map_err(|_| ScriptError::SessionInUse)?;
        let Session { manager, world } = session.into_inner();
        Ok((manager, world))
    }
}

impl ScriptHost<MemoryWorld> {
    /// Host over an in-memory world, with `world.destroy(id)` available to scripts
    pub fn with_memory_world(manager: ObjectManager, world: MemoryWorld) -> Result<Self, ScriptError> {
        let host = Self::new(manager, world)?;
        host.api.register_destroy(&host.lua)?;
        Ok(host)
    }
}

fn display_value(value: &Value) -> String {
    match value {
        Value::Nil => "nil".to_string(),
        Value::Boolean(b) => b.to_string(),
        Value::Integer(i) => i.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.to_string_lossy().to_string(),
        other => other.type_name().to_string(),
    }
}
