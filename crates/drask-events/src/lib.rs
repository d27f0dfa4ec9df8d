//! Event types for the drask scripting engine.
//!
//! This crate provides the closed set of hook kinds the host can raise, the
//! per-hook payload structures handed to script callbacks, and the
//! lightweight world-object handles forwarded into the runtime. It carries
//! no runtime dependency so host crates can raise events without pulling in
//! the scripting stack.

pub mod hook_events;
pub mod hooks;
pub mod object;

pub use hook_events::{HookArg, HookEvent};
pub use hooks::{EntryId, Hook, GLOBAL_ENTRY};
pub use object::{ObjectKind, ObjectRef};
