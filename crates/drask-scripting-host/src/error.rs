//! Failure taxonomy and classification for the scripting engine.

/// Failure kinds surfaced by engine operations.
///
/// Dispatch and registration failures are logged and swallowed inside the
/// engine; only administrative calls (`execute_code`, `reload_scripts`)
/// return these to the caller.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ScriptError {
    /// The engine is disabled by config or shut down.
    #[error("script engine is disabled")]
    Disabled,
    /// Lock or flag contention on a fail-fast path.
    #[error("script engine is busy")]
    Busy,
    #[error("unknown event hook '{0}'")]
    UnknownEvent(String),
    #[error("hook '{0}' was given a non-callable value")]
    NotCallable(String),
    /// Registration attempted from inside a dispatched callback.
    #[error("hook registration inside an event handler is forbidden")]
    ReentrantRegistration,
    /// Failure raised inside the Lua runtime, carrying its diagnostic.
    #[error("Lua error:\n{0}")]
    Runtime(String),
    /// Native failure outside the runtime.
    #[error("host error: {0}")]
    Host(String),
    #[error("unknown script engine error")]
    Unknown,
}

impl ScriptError {
    /// Classify a runtime failure into the most specific kind available.
    ///
    /// Errors raised by Lua itself become [`ScriptError::Runtime`] with the
    /// interpreter's diagnostic (traceback included when one exists); errors
    /// originating in host code crossing the boundary become
    /// [`ScriptError::Host`]; anything else degrades to
    /// [`ScriptError::Unknown`].
    pub fn classify(err: mlua::Error) -> Self {
        match err {
            mlua::Error::SyntaxError { message, .. } => ScriptError::Runtime(message),
            mlua::Error::RuntimeError(message) => ScriptError::Runtime(message),
            mlua::Error::MemoryError(message) => ScriptError::Runtime(message),
            mlua::Error::CallbackError { traceback, cause } => match cause.as_ref() {
                mlua::Error::ExternalError(inner) => ScriptError::Host(inner.to_string()),
                inner => ScriptError::Runtime(format!("{inner}\n{traceback}")),
            },
            mlua::Error::ExternalError(inner) => ScriptError::Host(inner.to_string()),
            err @ mlua::Error::ToLuaConversionError { .. } => ScriptError::Host(err.to_string()),
            err @ mlua::Error::FromLuaConversionError { .. } => ScriptError::Host(err.to_string()),
            _ => ScriptError::Unknown,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lua_failures_classify_as_runtime() {
        let err = ScriptError::classify(mlua::Error::RuntimeError("boom".to_string()));
        assert!(matches!(err, ScriptError::Runtime(msg) if msg.contains("boom")));

        let err = ScriptError::classify(mlua::Error::SyntaxError {
            message: "unexpected symbol".to_string(),
            incomplete_input: false,
        });
        assert!(matches!(err, ScriptError::Runtime(_)));
    }

    #[test]
    fn test_host_failures_classify_as_host() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err = ScriptError::classify(mlua::Error::external(io));
        assert!(matches!(err, ScriptError::Host(msg) if msg.contains("missing")));
    }
}
