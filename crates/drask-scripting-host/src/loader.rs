//! Script discovery and execution.

use std::path::Path;

use tracing::{debug, error, warn};
use walkdir::WalkDir;

use crate::runtime::ScriptRuntime;

const SCRIPT_EXTENSION: &str = "lua";

/// Execute every script file under `dir`, recursively, in file-name order so
/// registration order is stable across runs. A failing file is logged and
/// skipped; the rest of the batch still runs. Returns how many executed
/// cleanly.
pub(crate) fn run_directory(runtime: &ScriptRuntime, dir: &Path) -> usize {
    if !dir.exists() {
        error!(target: "scripting", "Script directory not found: {}", dir.display());
        return 0;
    }

    let mut count = 0;
    for entry in WalkDir::new(dir).follow_links(false).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                warn!(target: "scripting", "Skipping unreadable directory entry: {err}");
                continue;
            }
        };
        let path = entry.path();
        if !entry.file_type().is_file()
            || path.extension().and_then(|ext| ext.to_str()) != Some(SCRIPT_EXTENSION)
        {
            continue;
        }

        debug!(target: "scripting", "Executing script: {}", path.display());
        match runtime.exec_file(path) {
            Ok(()) => count += 1,
            Err(err) => {
                error!(
                    target: "scripting",
                    "Failed to execute script {}: {err}",
                    path.display()
                );
            }
        }
    }

    count
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::CallState;
    use std::fs;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn runtime() -> ScriptRuntime {
        ScriptRuntime::new(Arc::new(CallState::default()))
    }

    #[test]
    fn test_missing_directory_loads_nothing() {
        let rt = runtime();
        assert_eq!(
            run_directory(&rt, Path::new("/tmp/this_does_not_exist_drask")),
            0
        );
    }

    #[test]
    fn test_loads_only_lua_files_recursively() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.lua"), "a_loaded = true").unwrap();
        fs::write(dir.path().join("notes.txt"), "not a script").unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        fs::write(dir.path().join("sub/b.lua"), "b_loaded = true").unwrap();

        let rt = runtime();
        assert_eq!(run_directory(&rt, dir.path()), 2);
        assert_eq!(rt.eval("print(a_loaded, b_loaded)").unwrap(), "true\ttrue");
    }

    #[test]
    fn test_a_failing_script_does_not_abort_the_batch() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a_broken.lua"), "this is not lua").unwrap();
        fs::write(dir.path().join("b_fine.lua"), "fine = true").unwrap();

        let rt = runtime();
        assert_eq!(run_directory(&rt, dir.path()), 1);
        assert_eq!(rt.eval("print(fine)").unwrap(), "true");
    }

    #[test]
    fn test_scripts_execute_in_file_name_order() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("b.lua"), "order = (order or '') .. 'b'").unwrap();
        fs::write(dir.path().join("a.lua"), "order = (order or '') .. 'a'").unwrap();
        fs::write(dir.path().join("c.lua"), "order = (order or '') .. 'c'").unwrap();

        let rt = runtime();
        assert_eq!(run_directory(&rt, dir.path()), 3);
        assert_eq!(rt.eval("print(order)").unwrap(), "abc");
    }
}
