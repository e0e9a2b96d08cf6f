//! Object manager API exposed to Lua scripts

use std::cell::RefCell;
use std::rc::Rc;

use mlua::{FromLua, IntoLua, Lua, LuaSerdeExt, Result as LuaResult, Table, Value};

use crate::manager::ObjectManager;
use crate::objects::{ObjectId, Vec3};
use crate::world::{MemoryWorld, World};

/// Manager and world driven together by one script host
#[derive(Debug)]
pub struct Session<W> {
    pub manager: ObjectManager,
    pub world: W,
}

/// Session shared between the host and every registered Lua function
pub type SharedSession<W> = Rc<RefCell<Session<W>>>;

impl FromLua for ObjectId {
    fn from_lua(value: Value, lua: &Lua) -> LuaResult<Self> {
        u64::from_lua(value, lua).map(ObjectId)
    }
}

impl IntoLua for ObjectId {
    fn into_lua(self, lua: &Lua) -> LuaResult<Value> {
        self.0.into_lua(lua)
    }
}

/// Object argument passed by a script.
///
/// Anything that is not a non-negative integer reads as `None`, so bad ids
/// fail like unknown ones instead of raising.
struct ObjectArg(Option<ObjectId>);

impl FromLua for ObjectArg {
    fn from_lua(value: Value, _lua: &Lua) -> LuaResult<Self> {
        let id = match value {
            Value::Integer(i) => u64::try_from(i).ok().map(ObjectId),
            Value::Number(n) if n.fract() == 0.0 && n >= 0.0 && n < u64::MAX as f64 => {
                Some(ObjectId(n as u64))
            }
            _ => None,
        };
        Ok(ObjectArg(id))
    }
}

fn valid_ids(args: Vec<ObjectArg>) -> impl Iterator<Item = ObjectId> {
    args.into_iter().filter_map(|ObjectArg(id)| id)
}

/// The `objects` and `world` tables
pub struct ObjectsApi<W> {
    session: SharedSession<W>,
}

impl<W: World + 'static> ObjectsApi<W> {
    pub fn new(session: SharedSession<W>) -> Self {
        Self { session }
    }

    /// Register the API in a Lua state
    pub fn register(&self, lua: &Lua) -> LuaResult<()> {
        let globals = lua.globals();

        let objects = lua.create_table()?;
        self.register_registry_functions(lua, &objects)?;
        self.register_visibility_functions(lua, &objects)?;
        self.register_batch_functions(lua, &objects)?;
        self.register_query_functions(lua, &objects)?;
        globals.set("objects", objects)?;

        let world = lua.create_table()?;
        self.register_world_functions(lua, &world)?;
        globals.set("world", world)?;

        Ok(())
    }

    fn default_update(&self) -> bool {
        self.session.borrow().manager.config().update_path_graph
    }

    fn register_registry_functions(&self, lua: &Lua, objects: &Table) -> LuaResult<()> {
        // objects.register_object(id) -> id | nil
        let session = self.session.clone();
        let register_object = lua.create_function(move |_, ObjectArg(id): ObjectArg| {
            let Some(id) = id else { return Ok(None) };
            let mut session = session.borrow_mut();
            let Session { manager, world } = &mut *session;
            Ok(manager.register_object(&*world, id).map(|link| link.object))
        })?;
        objects.set("register_object", register_object)?;

        // objects.unregister_object(id) -> bool
        let session = self.session.clone();
        let unregister_object = lua.create_function(move |_, ObjectArg(id): ObjectArg| {
            let Some(id) = id else { return Ok(false) };
            Ok(session.borrow_mut().manager.unregister_object(id).is_some())
        })?;
        objects.set("unregister_object", unregister_object)?;

        // objects.is_object_registered(id) -> bool
        let session = self.session.clone();
        let is_object_registered = lua.create_function(move |_, ObjectArg(id): ObjectArg| {
            Ok(id.is_some_and(|id| session.borrow().manager.is_object_registered(id)))
        })?;
        objects.set("is_object_registered", is_object_registered)?;

        // objects.sweep_stale_links() -> { id, ... }
        let session = self.session.clone();
        let sweep_stale_links = lua.create_function(move |_, ()| {
            let mut session = session.borrow_mut();
            let Session { manager, world } = &mut *session;
            let stale: Vec<ObjectId> = manager
                .sweep_stale_links(&*world)
                .into_iter()
                .map(|link| link.object)
                .collect();
            Ok(stale)
        })?;
        objects.set("sweep_stale_links", sweep_stale_links)?;

        Ok(())
    }

    fn register_visibility_functions(&self, lua: &Lua, objects: &Table) -> LuaResult<()> {
        let default_update = self.default_update();

        // objects.is_map_object(id) -> bool
        let session = self.session.clone();
        let is_map_object = lua.create_function(move |_, ObjectArg(id): ObjectArg| {
            let session = session.borrow();
            Ok(id.is_some_and(|id| session.manager.is_map_object(&session.world, id)))
        })?;
        objects.set("is_map_object", is_map_object)?;

        // objects.hide_map_object(id, update_path_graph?) -> id | nil
        let session = self.session.clone();
        let hide_map_object = lua.create_function(move |_, (ObjectArg(id), update): (ObjectArg, Option<bool>)| {
            let Some(id) = id else { return Ok(None) };
            let mut session = session.borrow_mut();
            let Session { manager, world } = &mut *session;
            Ok(manager.hide_map_object(world, id, update.unwrap_or(default_update)))
        })?;
        objects.set("hide_map_object", hide_map_object)?;

        // objects.unhide_map_object(id, update_path_graph?) -> id | nil
        let session = self.session.clone();
        let unhide_map_object = lua.create_function(move |_, (ObjectArg(id), update): (ObjectArg, Option<bool>)| {
            let Some(id) = id else { return Ok(None) };
            let mut session = session.borrow_mut();
            let Session { manager, world } = &mut *session;
            Ok(manager.unhide_map_object(world, id, update.unwrap_or(default_update)))
        })?;
        objects.set("unhide_map_object", unhide_map_object)?;

        Ok(())
    }

    fn register_batch_functions(&self, lua: &Lua, objects: &Table) -> LuaResult<()> {
        let default_update = self.default_update();

        // objects.hide_map_objects({ id, ... }, update_path_graph?) -> { id, ... }
        let session = self.session.clone();
        let hide_map_objects = lua.create_function(move |_, (ids, update): (Vec<ObjectArg>, Option<bool>)| {
            let mut session = session.borrow_mut();
            let Session { manager, world } = &mut *session;
            Ok(manager.hide_map_objects(world, valid_ids(ids), update.unwrap_or(default_update)))
        })?;
        objects.set("hide_map_objects", hide_map_objects)?;

        // objects.hide_map_objects_in_radius(center, radius, limit_height?, update_path_graph?)
        let session = self.session.clone();
        let hide_map_objects_in_radius = lua.create_function(
            move |_, (center, radius, limit_height, update): (Table, f64, Option<bool>, Option<bool>)| {
                let center = vec3_from_table(&center)?;
                let mut session = session.borrow_mut();
                let Session { manager, world } = &mut *session;
                Ok(manager.hide_map_objects_in_radius(
                    world,
                    center,
                    radius,
                    limit_height.unwrap_or(false),
                    update.unwrap_or(default_update),
                ))
            },
        )?;
        objects.set("hide_map_objects_in_radius", hide_map_objects_in_radius)?;

        // objects.unhide_map_objects({ id, ... }, update_path_graph?) -> { id, ... }
        let session = self.session.clone();
        let unhide_map_objects = lua.create_function(move |_, (ids, update): (Vec<ObjectArg>, Option<bool>)| {
            let mut session = session.borrow_mut();
            let Session { manager, world } = &mut *session;
            Ok(manager.unhide_map_objects(world, valid_ids(ids), update.unwrap_or(default_update)))
        })?;
        objects.set("unhide_map_objects", unhide_map_objects)?;

        // objects.unhide_map_objects_in_radius(center, radius, limit_height?, update_path_graph?)
        let session = self.session.clone();
        let unhide_map_objects_in_radius = lua.create_function(
            move |_, (center, radius, limit_height, update): (Table, f64, Option<bool>, Option<bool>)| {
                let center = vec3_from_table(&center)?;
                let mut session = session.borrow_mut();
                let Session { manager, world } = &mut *session;
                Ok(manager.unhide_map_objects_in_radius(
                    world,
                    center,
                    radius,
                    limit_height.unwrap_or(false),
                    update.unwrap_or(default_update),
                ))
            },
        )?;
        objects.set("unhide_map_objects_in_radius", unhide_map_objects_in_radius)?;

        // objects.unhide_all_map_objects(update_path_graph?) -> { id, ... }
        let session = self.session.clone();
        let unhide_all_map_objects = lua.create_function(move |_, update: Option<bool>| {
            let mut session = session.borrow_mut();
            let Session { manager, world } = &mut *session;
            Ok(manager.unhide_all_map_objects(world, update.unwrap_or(default_update)))
        })?;
        objects.set("unhide_all_map_objects", unhide_all_map_objects)?;

        Ok(())
    }

    fn register_query_functions(&self, lua: &Lua, objects: &Table) -> LuaResult<()> {
        // objects.is_map_object_hidden(id) -> bool
        let session = self.session.clone();
        let is_map_object_hidden = lua.create_function(move |_, ObjectArg(id): ObjectArg| {
            Ok(id.is_some_and(|id| session.borrow().manager.is_map_object_hidden(id)))
        })?;
        objects.set("is_map_object_hidden", is_map_object_hidden)?;

        // objects.get_hidden_map_objects() -> { id, ... }
        let session = self.session.clone();
        let get_hidden_map_objects =
            lua.create_function(move |_, ()| Ok(session.borrow().manager.get_hidden_map_objects()))?;
        objects.set("get_hidden_map_objects", get_hidden_map_objects)?;

        // objects.get_registered_objects() -> { id, ... }
        let session = self.session.clone();
        let get_registered_objects =
            lua.create_function(move |_, ()| Ok(session.borrow().manager.get_registered_objects()))?;
        objects.set("get_registered_objects", get_registered_objects)?;

        // objects.get_link(id) -> { object, flags, event_mask, hidden } | nil
        let session = self.session.clone();
        let get_link = lua.create_function(move |lua, ObjectArg(id): ObjectArg| {
            let link = id.and_then(|id| session.borrow().manager.link(id).copied());
            match link {
                Some(link) => lua.to_value(&link),
                None => Ok(Value::Nil),
            }
        })?;
        objects.set("get_link", get_link)?;

        Ok(())
    }

    fn register_world_functions(&self, lua: &Lua, world: &Table) -> LuaResult<()> {
        // world.exists(id) -> bool
        let session = self.session.clone();
        let exists = lua.create_function(move |_, ObjectArg(id): ObjectArg| {
            Ok(id.is_some_and(|id| session.borrow().world.contains(id)))
        })?;
        world.set("exists", exists)?;

        // world.position(id) -> { x, y, z } | nil
        let session = self.session.clone();
        let position = lua.create_function(move |lua, ObjectArg(id): ObjectArg| {
            match id.and_then(|id| session.borrow().world.position(id)) {
                Some(pos) => vec3_to_table(lua, pos).map(Value::Table),
                None => Ok(Value::Nil),
            }
        })?;
        world.set("position", position)?;

        // world.flags(id) -> flags, event_mask | nil
        let session = self.session.clone();
        let flags = lua.create_function(move |_, ObjectArg(id): ObjectArg| {
            let session = session.borrow();
            Ok(id.map_or((None, None), |id| (session.world.flags(id), session.world.event_mask(id))))
        })?;
        world.set("flags", flags)?;

        Ok(())
    }
}

impl ObjectsApi<MemoryWorld> {
    /// Add `world.destroy(id)`, which removes an object behind the manager's back
    pub fn register_destroy(&self, lua: &Lua) -> LuaResult<()> {
        let world: Table = lua.globals().get("world")?;
        let session = self.session.clone();
        let destroy = lua.create_function(move |_, ObjectArg(id): ObjectArg| {
            Ok(id.is_some_and(|id| session.borrow_mut().world.destroy(id).is_some()))
        })?;
        world.set("destroy", destroy)
    }
}

/// Read `{ x, y, z }` or `{ x = .., y = .., z = .. }`
fn vec3_from_table(table: &Table) -> LuaResult<Vec3> {
    let axis = |name: &str, index: i64| -> LuaResult<f64> {
        match table.get::<Option<f64>>(name)? {
            Some(value) => Ok(value),
            None => table
                .get::<Option<f64>>(index)?
                .ok_or_else(|| mlua::Error::RuntimeError(format!("position is missing '{}'", name))),
        }
    };
    Ok(Vec3::new(axis("x", 1)?, axis("y", 2)?, axis("z", 3)?))
}

fn vec3_to_table(lua: &Lua, pos: Vec3) -> LuaResult<Table> {
    let table = lua.create_table()?;
    table.set("x", pos.x)?;
    table.set("y", pos.y)?;
    table.set("z", pos.z)?;
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec3_from_table() {
        let lua = Lua::new();

        let named: Table = lua.load("return { x = 1.5, y = 2, z = -3 }").eval().unwrap();
        assert_eq!(vec3_from_table(&named).unwrap(), Vec3::new(1.5, 2.0, -3.0));

        let array: Table = lua.load("return { 4, 5, 6 }").eval().unwrap();
        assert_eq!(vec3_from_table(&array).unwrap(), Vec3::new(4.0, 5.0, 6.0));

        let partial: Table = lua.load("return { x = 1 }").eval().unwrap();
        assert!(vec3_from_table(&partial).is_err());
    }

    #[test]
    fn test_object_id_conversion() {
        let lua = Lua::new();

        let value = ObjectId(42).into_lua(&lua).unwrap();
        assert_eq!(ObjectId::from_lua(value, &lua).unwrap(), ObjectId(42));
        assert!(ObjectId::from_lua(Value::Nil, &lua).is_err());
    }

    #[test]
    fn test_object_arg_accepts_only_valid_ids() {
        let lua = Lua::new();
        let arg = |source: &str| -> Option<ObjectId> {
            let value: Value = lua.load(source).eval().unwrap();
            ObjectArg::from_lua(value, &lua).unwrap().0
        };

        assert_eq!(arg("return 7"), Some(ObjectId(7)));
        assert_eq!(arg("return 7.0"), Some(ObjectId(7)));
        assert_eq!(arg("return -1"), None);
        assert_eq!(arg("return 1.5"), None);
        assert_eq!(arg("return 0/0"), None);
        assert_eq!(arg("return math.huge"), None);
        assert_eq!(arg("return 'barn'"), None);
        assert_eq!(arg("return nil"), None);
    }
}
