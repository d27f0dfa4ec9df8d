//! Host runtime for loading and dispatching Lua scripts.
//!
//! This crate embeds a Lua runtime into the game server and bridges host
//! events to script-registered callbacks. Worker threads raise events
//! through [`ScriptEngine::trigger`]; an administrative path registers,
//! reloads, and executes ad-hoc code. Scripts see a small global API
//! (`Register`, `Log`) installed at engine initialization.

pub mod config;
pub mod engine;
pub mod error;
pub mod reload;
pub mod util;

mod bindings;
mod loader;
mod runtime;

pub use config::ScriptingConfig;
pub use engine::{EngineStatus, ScriptEngine};
pub use error::ScriptError;
pub use reload::setup_reload_signal_handler;

// Re-export the event types callers need at every trigger site.
pub use drask_events::{EntryId, Hook, HookArg, HookEvent, ObjectKind, ObjectRef, GLOBAL_ENTRY};
