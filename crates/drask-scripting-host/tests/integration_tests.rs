// Integration tests for the dispatch path: registration through scripts,
// trigger ordering, entry scoping, failure isolation, ad-hoc execution.

use std::fs;
use std::sync::Arc;

use drask_scripting_host::{HookEvent, ObjectRef, ScriptEngine, ScriptError, ScriptingConfig};
use tempfile::TempDir;

/// Build an enabled engine whose script directory contains the given files,
/// then load them.
fn engine_with_scripts(scripts: &[(&str, &str)]) -> (Arc<ScriptEngine>, TempDir) {
    let dir = TempDir::new().unwrap();
    for (name, body) in scripts {
        fs::write(dir.path().join(name), body).unwrap();
    }
    let config = ScriptingConfig {
        script_dir: Some(dir.path().to_path_buf()),
        ..Default::default()
    };
    let engine = ScriptEngine::new(config);
    engine.initialize();
    engine.load_scripts();
    (engine, dir)
}

fn player() -> ObjectRef {
    ObjectRef::player(7, "Nerissa")
}

fn creature(entry: u32) -> ObjectRef {
    ObjectRef::creature(100, entry, "Boar")
}

#[test]
fn test_login_callback_fires_once_with_the_player() {
    let (engine, _dir) = engine_with_scripts(&[(
        "login.lua",
        r#"
            Register("PLAYER_LOGIN", function(p)
                hits = (hits or 0) + 1
                last_name = p:GetName()
            end)
        "#,
    )]);

    engine.trigger(&HookEvent::PlayerLogin { player: player() }, 0);

    assert_eq!(engine.execute_code("print(hits)").unwrap(), "1");
    assert_eq!(engine.execute_code("print(last_name)").unwrap(), "Nerissa");
}

#[test]
fn test_global_callbacks_run_before_entry_callbacks() {
    let (engine, _dir) = engine_with_scripts(&[(
        "order.lua",
        r#"
            calls = {}
            Register("CREATURE_ADD_WORLD", function(c) table.insert(calls, "g1") end)
            Register("CREATURE_ADD_WORLD", function(c) table.insert(calls, "g2") end)
            Register("CREATURE_ADD_WORLD", function(c) table.insert(calls, "e1") end, 42)
        "#,
    )]);

    engine.trigger(
        &HookEvent::CreatureAddWorld {
            creature: creature(42),
        },
        42,
    );

    let out = engine
        .execute_code("print(table.concat(calls, \",\"))")
        .unwrap();
    assert_eq!(out, "g1,g2,e1");
}

#[test]
fn test_entry_zero_trigger_skips_entry_callbacks() {
    let (engine, _dir) = engine_with_scripts(&[(
        "order.lua",
        r#"
            calls = {}
            Register("CREATURE_ADD_WORLD", function(c) table.insert(calls, "global") end)
            Register("CREATURE_ADD_WORLD", function(c) table.insert(calls, "scoped") end, 42)
        "#,
    )]);

    engine.trigger(
        &HookEvent::CreatureAddWorld {
            creature: creature(42),
        },
        0,
    );

    let out = engine
        .execute_code("print(table.concat(calls, \",\"))")
        .unwrap();
    assert_eq!(out, "global");
}

#[test]
fn test_entry_scoped_callback_requires_exact_match() {
    let (engine, _dir) = engine_with_scripts(&[(
        "scoped.lua",
        r#"
            Register("CREATURE_ADD_WORLD", function(c) hits = (hits or 0) + 1 end, 1234)
        "#,
    )]);

    engine.trigger(
        &HookEvent::CreatureAddWorld {
            creature: creature(5678),
        },
        5678,
    );

    assert_eq!(engine.execute_code("print(hits or 0)").unwrap(), "0");
}

#[test]
fn test_non_callable_registration_never_dispatches() {
    let (engine, _dir) = engine_with_scripts(&[(
        "bad.lua",
        r#"
            Register("PLAYER_LOGIN", "not a function")
            Register("PLAYER_LOGIN", function(p) hits = (hits or 0) + 1 end)
        "#,
    )]);

    engine.trigger(&HookEvent::PlayerLogin { player: player() }, 0);

    assert_eq!(engine.execute_code("print(hits)").unwrap(), "1");
}

#[test]
fn test_unknown_event_registration_is_rejected() {
    let (engine, _dir) = engine_with_scripts(&[(
        "unknown.lua",
        r#"
            Register("PLAYER_TELEPORTED", function() end)
            Register("PLAYER_LOGIN", function(p) hits = (hits or 0) + 1 end)
        "#,
    )]);

    engine.trigger(&HookEvent::PlayerLogin { player: player() }, 0);

    assert_eq!(engine.execute_code("print(hits)").unwrap(), "1");
}

#[test]
fn test_a_failing_callback_does_not_stop_its_siblings() {
    let (engine, _dir) = engine_with_scripts(&[(
        "fail.lua",
        r#"
            calls = {}
            Register("PLAYER_LOGIN", function(p) table.insert(calls, "first") end)
            Register("PLAYER_LOGIN", function(p) error("broken handler") end)
            Register("PLAYER_LOGIN", function(p) table.insert(calls, "third") end)
            Register("PLAYER_LOGIN", function(p) table.insert(calls, "scoped") end, 3)
        "#,
    )]);

    engine.trigger(&HookEvent::PlayerLogin { player: player() }, 3);

    let out = engine
        .execute_code("print(table.concat(calls, \",\"))")
        .unwrap();
    assert_eq!(out, "first,third,scoped");
}

#[test]
fn test_registration_inside_a_callback_is_rejected_without_deadlock() {
    let (engine, _dir) = engine_with_scripts(&[(
        "reentrant.lua",
        r#"
            Register("PLAYER_LOGIN", function(p)
                Register("PLAYER_LOGOUT", function(q) logout_fired = true end)
                login_done = true
            end)
        "#,
    )]);

    engine.trigger(&HookEvent::PlayerLogin { player: player() }, 0);
    // The rejected registration must not take the rest of the callback down.
    assert_eq!(engine.execute_code("print(login_done)").unwrap(), "true");

    engine.trigger(&HookEvent::PlayerLogout { player: player() }, 0);
    assert_eq!(engine.execute_code("print(logout_fired)").unwrap(), "nil");
}

#[test]
fn test_gameobject_removal_dispatches_on_the_gameobject_hook() {
    let (engine, _dir) = engine_with_scripts(&[(
        "objects.lua",
        r#"
            Register("GAMEOBJECT_REMOVE_WORLD", function(o) go_removed = (go_removed or 0) + 1 end)
            Register("CREATURE_REMOVE_WORLD", function(c) creature_removed = (creature_removed or 0) + 1 end)
        "#,
    )]);

    engine.trigger(
        &HookEvent::GameObjectRemoveWorld {
            object: ObjectRef::game_object(5, 800, "Chest"),
        },
        800,
    );

    assert_eq!(engine.execute_code("print(go_removed)").unwrap(), "1");
    assert_eq!(
        engine.execute_code("print(creature_removed)").unwrap(),
        "nil"
    );
}

#[test]
fn test_gossip_select_forwards_every_argument() {
    let (engine, _dir) = engine_with_scripts(&[(
        "gossip.lua",
        r#"
            Register("CREATURE_GOSSIP_SELECT", function(player, creature, sender, action)
                gossip = string.format("%s:%d:%d:%d", player:GetName(), creature:GetEntry(), sender, action)
            end, 77)
        "#,
    )]);

    engine.trigger(
        &HookEvent::CreatureGossipSelect {
            player: player(),
            creature: creature(77),
            sender: 2,
            action: 3,
        },
        77,
    );

    assert_eq!(
        engine.execute_code("print(gossip)").unwrap(),
        "Nerissa:77:2:3"
    );
}

#[test]
fn test_execute_code_captures_output() {
    let (engine, _dir) = engine_with_scripts(&[]);
    assert_eq!(engine.execute_code("print('hi')").unwrap(), "hi");
}

#[test]
fn test_execute_code_without_output_reports_completion() {
    let (engine, _dir) = engine_with_scripts(&[]);
    assert_eq!(
        engine.execute_code("local x = 2 + 2").unwrap(),
        "Execution completed successfully"
    );
}

#[test]
fn test_execute_code_classifies_runtime_failures() {
    let (engine, _dir) = engine_with_scripts(&[]);

    let err = engine.execute_code("error('kaboom')").unwrap_err();
    assert!(matches!(err, ScriptError::Runtime(ref msg) if msg.contains("kaboom")));

    let err = engine.execute_code("this is not lua").unwrap_err();
    assert!(matches!(err, ScriptError::Runtime(_)));
}

#[test]
fn test_execution_output_formats_within_the_configured_limits() {
    use drask_scripting_host::util;

    let (engine, _dir) = engine_with_scripts(&[]);
    let output = engine
        .execute_code("for i = 1, 12 do print(string.rep('x', 300)) end")
        .unwrap();

    let limits = engine.config();
    let lines = util::split_lines(&output, limits.max_line_length);
    assert_eq!(lines.len(), 12);
    assert!(lines.iter().all(|line| line.chars().count() == 250));
    assert!(lines[0].ends_with("..."));

    let (shown, dropped) = util::clip_lines(&lines, limits.max_output_lines);
    assert_eq!(shown.len(), 10);
    assert_eq!(dropped, 2);
}

#[test]
fn test_execute_code_shares_the_script_namespace() {
    let (engine, _dir) = engine_with_scripts(&[("state.lua", "greeting = 'hello'")]);
    assert_eq!(
        engine.execute_code("print(greeting .. ' world')").unwrap(),
        "hello world"
    );
}
