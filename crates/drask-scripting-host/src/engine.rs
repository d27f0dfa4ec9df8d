//! The dispatch engine: owns the callback table, the runtime lock, and the
//! lifecycle flags.

use std::collections::HashMap;
use std::mem;
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use mlua::{Lua, RegistryKey, Value};
use parking_lot::{Mutex, RwLock};
use tracing::{debug, error, info};

use drask_events::{EntryId, Hook, HookArg, HookEvent, GLOBAL_ENTRY};

use crate::bindings;
use crate::config::ScriptingConfig;
use crate::error::ScriptError;
use crate::loader;
use crate::runtime::{CallState, ScriptRuntime};

/// Callbacks per entry id, in registration order.
type EntryCallbacks = HashMap<EntryId, Vec<RegistryKey>>;

/// The shared callback table: hook -> entry -> callbacks.
type CallbackStore = HashMap<Hook, EntryCallbacks>;

/// Snapshot of the engine flags for an administrative status query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineStatus {
    pub enabled: bool,
    pub busy: bool,
    pub reloading: bool,
}

/// Bridges host events to script-registered callbacks.
///
/// Many worker threads call [`trigger`](Self::trigger) concurrently; one
/// administrative path at a time registers, clears, reloads, or executes
/// ad-hoc code. A read-write lock over the callback table arbitrates the
/// two, and a separate mutex over the runtime serializes every actual call
/// into Lua.
pub struct ScriptEngine {
    config: ScriptingConfig,
    initialized: AtomicBool,
    enabled: AtomicBool,
    reloading: AtomicBool,
    hooks: RwLock<CallbackStore>,
    /// The exclusive execution guard: every call into the Lua runtime goes
    /// through this lock. It protects the runtime; `hooks` protects the
    /// table.
    runtime: Mutex<ScriptRuntime>,
    call_state: Arc<CallState>,
}

impl ScriptEngine {
    /// Create an engine for the given configuration. The engine starts
    /// disabled; call [`initialize`](Self::initialize) before dispatching.
    pub fn new(config: ScriptingConfig) -> Arc<Self> {
        let call_state = Arc::new(CallState::default());
        Arc::new(Self {
            config,
            initialized: AtomicBool::new(false),
            enabled: AtomicBool::new(false),
            reloading: AtomicBool::new(false),
            hooks: RwLock::new(CallbackStore::new()),
            runtime: Mutex::new(ScriptRuntime::new(Arc::clone(&call_state))),
            call_state,
        })
    }

    /// Install the scripting API and enable dispatch.
    ///
    /// Does nothing when called a second time. On failure the engine stays
    /// disabled and every operation remains a no-op.
    pub fn initialize(self: &Arc<Self>) {
        if self.initialized.swap(true, Ordering::AcqRel) {
            return;
        }
        if !self.config.enabled {
            info!(target: "scripting", "Script engine is disabled in config");
            return;
        }
        info!(target: "scripting", "Initializing script engine");
        let runtime = self.runtime.lock();
        match bindings::install(runtime.lua(), &Arc::downgrade(self)) {
            Ok(()) => {
                drop(runtime);
                // Initialization writes must be visible before any thread
                // observes the engine as enabled.
                self.enabled.store(true, Ordering::Release);
                info!(target: "scripting", "Script engine initialized");
            }
            Err(err) => {
                error!(target: "scripting", "Script engine initialization failed: {err}");
            }
        }
    }

    /// Disable the engine and drop every callback.
    ///
    /// Safe to call any number of times, including when `initialize` never
    /// ran. Also invoked from `Drop` for abnormal teardown orders.
    pub fn shutdown(&self) {
        if !self.initialized.load(Ordering::Acquire) {
            return;
        }
        if !self.enabled.swap(false, Ordering::AcqRel) {
            return;
        }
        info!(target: "scripting", "Shutting down script engine");
        self.clear_hooks();
        info!(target: "scripting", "Script engine shutdown complete");
    }

    /// The configuration the engine was created with. Console layers read
    /// the output-formatting limits from here.
    pub fn config(&self) -> &ScriptingConfig {
        &self.config
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Acquire)
    }

    pub fn is_reloading(&self) -> bool {
        self.reloading.load(Ordering::Acquire)
    }

    /// True while another path holds the callback table.
    pub fn is_busy(&self) -> bool {
        self.hooks.try_write().is_none()
    }

    pub fn status(&self) -> EngineStatus {
        EngineStatus {
            enabled: self.is_enabled(),
            busy: self.is_busy(),
            reloading: self.is_reloading(),
        }
    }

    /// Mark a reload as started. Returns false when one is already running,
    /// in which case the caller must not proceed with the reload sequence.
    pub fn begin_reload(&self) -> bool {
        self.reloading
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    /// Clear the reload flag, regardless of how the reload went.
    pub fn end_reload(&self) {
        self.reloading.store(false, Ordering::Release);
    }

    /// Drop every registered callback.
    pub fn clear_hooks(&self) {
        let mut store = self.hooks.write();
        let dropped: usize = store
            .values()
            .map(|entries| entries.values().map(Vec::len).sum::<usize>())
            .sum();
        let old = mem::take(&mut *store);
        // Reclaim while still holding the table so no dispatch can observe a
        // half-cleared generation.
        let runtime = self.runtime.lock();
        drop(old);
        runtime.reclaim();
        debug!(target: "scripting", "Cleared {dropped} registered callback(s)");
    }

    /// Append a script callback for `event_name`, scoped to `entry_id`
    /// (0 = fire for every entry).
    ///
    /// Called from the `Register` binding while the runtime lock is held.
    /// A disabled engine and an empty name are silent no-ops; everything
    /// else that goes wrong is reported to the binding, which logs it.
    pub(crate) fn register_hook(
        &self,
        lua: &Lua,
        event_name: &str,
        callback: Value,
        entry_id: EntryId,
    ) -> Result<(), ScriptError> {
        if !self.is_enabled() || event_name.is_empty() {
            return Ok(());
        }
        let Value::Function(callback) = callback else {
            return Err(ScriptError::NotCallable(event_name.to_string()));
        };
        let hook = Hook::from_str(event_name)
            .map_err(|_| ScriptError::UnknownEvent(event_name.to_string()))?;
        // A dispatched callback runs while its trigger holds the table
        // shared; taking the exclusive lock from that same call stack would
        // never return.
        if self.call_state.in_dispatch() {
            return Err(ScriptError::ReentrantRegistration);
        }
        // Ad-hoc execution already holds the table exclusively.
        if self.call_state.in_exec() {
            return Err(ScriptError::Busy);
        }
        let key = lua
            .create_registry_value(callback)
            .map_err(ScriptError::classify)?;
        let mut store = self.hooks.write();
        store
            .entry(hook)
            .or_default()
            .entry(entry_id)
            .or_default()
            .push(key);
        debug!(target: "scripting", "Registered hook '{hook}' (entry {entry_id})");
        Ok(())
    }

    /// Broadcast one event occurrence to its registered callbacks.
    ///
    /// Global (entry 0) callbacks run first, then — for a nonzero
    /// `entry_id` — the callbacks registered under exactly that entry; each
    /// group in registration order. A failing callback is logged and
    /// skipped; the rest of the list still runs.
    pub fn trigger(&self, event: &HookEvent, entry_id: EntryId) {
        if !self.is_enabled() || self.is_reloading() {
            return;
        }
        let store = self.hooks.read();
        // A reload may have flipped the flag between the fast check and the
        // lock acquisition.
        if self.reloading.load(Ordering::Acquire) {
            return;
        }
        let hook = event.hook();
        let Some(entries) = store.get(&hook) else {
            return;
        };
        let args = event.args();
        if let Some(callbacks) = entries.get(&GLOBAL_ENTRY) {
            self.run_callbacks(hook, callbacks, &args);
        }
        if entry_id != GLOBAL_ENTRY {
            if let Some(callbacks) = entries.get(&entry_id) {
                self.run_callbacks(hook, callbacks, &args);
            }
        }
    }

    fn run_callbacks(&self, hook: Hook, callbacks: &[RegistryKey], args: &[HookArg]) {
        for key in callbacks {
            // The runtime is locked per invocation, so unrelated runtime
            // work only ever waits behind a single callback.
            let runtime = self.runtime.lock();
            if let Err(err) = runtime.invoke(key, args) {
                error!(target: "scripting", "Hook '{hook}' callback failed: {err}");
            }
        }
    }

    /// Execute ad-hoc code against the shared global namespace.
    ///
    /// Never blocks: both the table and the runtime are try-acquired, and
    /// contention reports [`ScriptError::Busy`] immediately. On success the
    /// captured `print` output is returned.
    pub fn execute_code(&self, code: &str) -> Result<String, ScriptError> {
        if !self.is_enabled() {
            return Err(ScriptError::Disabled);
        }
        let Some(_table) = self.hooks.try_write() else {
            return Err(ScriptError::Busy);
        };
        let Some(runtime) = self.runtime.try_lock() else {
            return Err(ScriptError::Busy);
        };
        runtime.eval(code)
    }

    /// Execute every script under the configured directory against the
    /// shared global namespace, returning how many loaded.
    ///
    /// Scripts only execute while dispatch is quiescent: at startup, or
    /// inside a reload window after [`clear_hooks`](Self::clear_hooks) has
    /// drained in-flight triggers.
    pub fn load_scripts(&self) -> usize {
        if !self.is_enabled() {
            return 0;
        }
        let dir = self.config.script_dir();
        let started = Instant::now();
        info!(target: "scripting", "Loading scripts from {}", dir.display());
        let runtime = self.runtime.lock();
        let count = loader::run_directory(&runtime, &dir);
        info!(
            target: "scripting",
            "Loaded {count} script(s) in {} ms",
            started.elapsed().as_millis()
        );
        count
    }

    /// Drop the current script generation and load fresh sources: the full
    /// begin-reload, clear, load, end-reload sequence.
    pub fn reload_scripts(&self) -> Result<usize, ScriptError> {
        if !self.is_enabled() {
            return Err(ScriptError::Disabled);
        }
        if !self.begin_reload() {
            return Err(ScriptError::Busy);
        }
        info!(target: "scripting", "Reloading scripts");
        self.clear_hooks();
        let count = self.load_scripts();
        self.end_reload();
        Ok(count)
    }
}

impl Drop for ScriptEngine {
    fn drop(&mut self) {
        // Hosts call shutdown() explicitly; this covers abnormal teardown.
        self.shutdown();
    }
}
