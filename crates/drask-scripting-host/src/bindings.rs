//! Host functions and types exposed to scripts.

use std::sync::Weak;

use mlua::{Function, Lua, MetaMethod, UserData, UserDataMethods, Value};
use tracing::{error, info};

use drask_events::{EntryId, HookArg, ObjectKind, ObjectRef, GLOBAL_ENTRY};

use crate::engine::ScriptEngine;

type Installer = fn(&Lua, &Weak<ScriptEngine>) -> mlua::Result<Function>;

/// Everything scripts can see, paired with its installer. Built once at
/// engine initialization and never mutated afterwards.
const EXPORTS: &[(&str, Installer)] = &[("Register", install_register), ("Log", install_log)];

/// Install the scripting API into the runtime's global namespace.
pub(crate) fn install(lua: &Lua, engine: &Weak<ScriptEngine>) -> mlua::Result<()> {
    let globals = lua.globals();
    for (name, installer) in EXPORTS {
        globals.set(*name, installer(lua, engine)?)?;
    }
    Ok(())
}

/// `Register(eventName, callback[, entryId])` — attach a callback to a hook,
/// globally or scoped to one entry. Rejections are logged, never raised into
/// the calling script.
fn install_register(lua: &Lua, engine: &Weak<ScriptEngine>) -> mlua::Result<Function> {
    let engine = engine.clone();
    lua.create_function(
        move |lua, (name, callback, entry_id): (String, Value, Option<EntryId>)| {
            let Some(engine) = engine.upgrade() else {
                return Ok(());
            };
            let entry_id = entry_id.unwrap_or(GLOBAL_ENTRY);
            if let Err(err) = engine.register_hook(lua, &name, callback, entry_id) {
                error!(
                    target: "scripting",
                    "Register('{name}', entry {entry_id}) rejected: {err}"
                );
            }
            Ok(())
        },
    )
}

/// `Log(message)` — write a line through the host's logging stack.
fn install_log(lua: &Lua, _engine: &Weak<ScriptEngine>) -> mlua::Result<Function> {
    lua.create_function(|_, message: String| {
        info!(target: "script", "{message}");
        Ok(())
    })
}

/// Map one canonical argument onto its Lua value.
pub(crate) fn to_lua(lua: &Lua, arg: &HookArg) -> mlua::Result<Value> {
    Ok(match arg {
        HookArg::Nil => Value::Nil,
        HookArg::Bool(v) => Value::Boolean(*v),
        HookArg::Int(v) => Value::Integer(*v),
        HookArg::Uint(v) => Value::Integer(i64::from(*v)),
        HookArg::Float(v) => Value::Number(*v),
        HookArg::Str(v) => Value::String(lua.create_string(v)?),
        HookArg::Object(obj) => Value::UserData(lua.create_userdata(ScriptObject(obj.clone()))?),
    })
}

/// Userdata handing scripts read-only access to a world object.
struct ScriptObject(ObjectRef);

impl UserData for ScriptObject {
    fn add_methods<M: UserDataMethods<Self>>(methods: &mut M) {
        methods.add_method("GetGuid", |_, this, ()| Ok(this.0.guid));
        methods.add_method("GetEntry", |_, this, ()| Ok(this.0.entry));
        methods.add_method("GetName", |_, this, ()| Ok(this.0.name.clone()));
        methods.add_method("IsPlayer", |_, this, ()| {
            Ok(this.0.kind == ObjectKind::Player)
        });
        methods.add_method("IsCreature", |_, this, ()| {
            Ok(this.0.kind == ObjectKind::Creature)
        });
        methods.add_method("IsGameObject", |_, this, ()| {
            Ok(this.0.kind == ObjectKind::GameObject)
        });
        methods.add_meta_method(MetaMethod::ToString, |_, this, ()| {
            Ok(format!(
                "{:?}({}, entry {})",
                this.0.kind, this.0.name, this.0.entry
            ))
        });
    }
}
