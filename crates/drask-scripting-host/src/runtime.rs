//! The embedded Lua state and the calls that cross into it.

use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Arc;

use mlua::{Function, Lua, MultiValue, RegistryKey, Value, Variadic};
use parking_lot::Mutex;
use tracing::warn;

use drask_events::HookArg;

use crate::bindings::to_lua;
use crate::error::ScriptError;

/// Call-context token shared between the dispatch path and the registration
/// binding.
///
/// Mutations happen only while the runtime lock is held, and the binding
/// reads it from under that same lock, so relaxed atomics are sufficient;
/// the atomics exist to make the token shareable, not to synchronize.
#[derive(Debug, Default)]
pub(crate) struct CallState {
    dispatch_depth: AtomicU32,
    exec_active: AtomicBool,
}

impl CallState {
    /// True while a dispatched callback is on the current runtime call stack.
    pub(crate) fn in_dispatch(&self) -> bool {
        self.dispatch_depth.load(Ordering::Relaxed) > 0
    }

    /// True while an ad-hoc execution owns the runtime.
    pub(crate) fn in_exec(&self) -> bool {
        self.exec_active.load(Ordering::Relaxed)
    }
}

/// Marks a callback invocation in progress for the duration of a call.
struct DispatchScope<'a>(&'a CallState);

impl<'a> DispatchScope<'a> {
    fn enter(state: &'a CallState) -> Self {
        state.dispatch_depth.fetch_add(1, Ordering::Relaxed);
        Self(state)
    }
}

impl Drop for DispatchScope<'_> {
    fn drop(&mut self) {
        self.0.dispatch_depth.fetch_sub(1, Ordering::Relaxed);
    }
}

/// Marks an ad-hoc execution in progress.
struct ExecScope<'a>(&'a CallState);

impl<'a> ExecScope<'a> {
    fn enter(state: &'a CallState) -> Self {
        state.exec_active.store(true, Ordering::Relaxed);
        Self(state)
    }
}

impl Drop for ExecScope<'_> {
    fn drop(&mut self) {
        self.0.exec_active.store(false, Ordering::Relaxed);
    }
}

/// Wrapper around the embedded Lua state.
///
/// The engine keeps exactly one of these behind a mutex; holding that mutex
/// is what the rest of the crate means by owning the runtime. Nothing here
/// locks anything itself.
pub(crate) struct ScriptRuntime {
    lua: Lua,
    call_state: Arc<CallState>,
}

impl ScriptRuntime {
    pub(crate) fn new(call_state: Arc<CallState>) -> Self {
        Self {
            lua: Lua::new(),
            call_state,
        }
    }

    pub(crate) fn lua(&self) -> &Lua {
        &self.lua
    }

    /// Invoke one registered callback with the converted argument list.
    pub(crate) fn invoke(&self, key: &RegistryKey, args: &[HookArg]) -> Result<(), ScriptError> {
        let callback: Function = self
            .lua
            .registry_value(key)
            .map_err(ScriptError::classify)?;
        let mut values = Vec::with_capacity(args.len());
        for arg in args {
            values.push(to_lua(&self.lua, arg).map_err(ScriptError::classify)?);
        }
        let _scope = DispatchScope::enter(&self.call_state);
        callback
            .call::<()>(MultiValue::from_iter(values))
            .map_err(ScriptError::classify)
    }

    /// Execute ad-hoc code against the shared globals, returning whatever
    /// `print` produced while it ran.
    pub(crate) fn eval(&self, code: &str) -> Result<String, ScriptError> {
        let _scope = ExecScope::enter(&self.call_state);
        let capture = OutputCapture::install(&self.lua).map_err(ScriptError::classify)?;
        let result = self.lua.load(code).set_name("=exec").exec();
        let output = capture.restore(&self.lua);
        match result {
            Ok(()) => Ok(if output.is_empty() {
                "Execution completed successfully".to_string()
            } else {
                output
            }),
            Err(err) => Err(ScriptError::classify(err)),
        }
    }

    /// Execute one script file in the shared globals. The chunk is named
    /// after the file so tracebacks point at the right source.
    pub(crate) fn exec_file(&self, path: &Path) -> Result<(), ScriptError> {
        let source = std::fs::read_to_string(path)
            .map_err(|err| ScriptError::Host(format!("{}: {err}", path.display())))?;
        self.lua
            .load(&source)
            .set_name(format!("@{}", path.display()))
            .exec()
            .map_err(ScriptError::classify)
    }

    /// Release registry values dropped since the last pass and run a
    /// collection cycle.
    pub(crate) fn reclaim(&self) {
        self.lua.expire_registry_values();
        if let Err(err) = self.lua.gc_collect() {
            warn!(target: "scripting", "Garbage collection failed: {err}");
        }
    }
}

/// Redirects the global `print` into a buffer for the duration of an eval.
///
/// The original `print` is restored on every exit path; a failed restore is
/// logged rather than propagated so the captured output still reaches the
/// caller.
struct OutputCapture {
    saved_print: Value,
    buffer: Arc<Mutex<String>>,
}

impl OutputCapture {
    fn install(lua: &Lua) -> mlua::Result<Self> {
        let buffer = Arc::new(Mutex::new(String::new()));
        let sink = Arc::clone(&buffer);
        let saved_print: Value = lua.globals().get("print")?;
        let capture = lua.create_function(move |_, values: Variadic<Value>| {
            let mut out = sink.lock();
            for (i, value) in values.iter().enumerate() {
                if i > 0 {
                    out.push('\t');
                }
                let text = value
                    .to_string()
                    .unwrap_or_else(|_| format!("<{}>", value.type_name()));
                out.push_str(&text);
            }
            out.push('\n');
            Ok(())
        })?;
        lua.globals().set("print", capture)?;
        Ok(Self {
            saved_print,
            buffer,
        })
    }

    fn restore(self, lua: &Lua) -> String {
        if let Err(err) = lua.globals().set("print", self.saved_print) {
            warn!(target: "scripting", "Failed to restore print after execution: {err}");
        }
        let output = self.buffer.lock();
        output.trim_end_matches('\n').to_string()
    }
}
