// Integration tests enforcing the --json stdout contract.
//
// These tests guarantee that stdout from --json commands is:
//   1. Valid JSON
//   2. Exactly one JSON value (no extra lines, no banners)
//   3. The correct shape for its command type
//
// Run with: cargo test -p lorecraft-cli --test json_contract_tests -- --nocapture

use std::process::Command;

use tempfile::TempDir;

fn lore() -> Command {
    Command::new(env!("CARGO_BIN_EXE_lore"))
}

/// Assert stdout is a single, parseable JSON value with no extra lines.
fn assert_single_json(stdout: &str) -> serde_json::Value {
    let trimmed = stdout.trim();
    assert!(!trimmed.is_empty(), "stdout should not be empty");

    let val: serde_json::Value = serde_json::from_str(trimmed).unwrap_or_else(|e| {
        panic!("stdout must be valid JSON.\nParse error: {}\nstdout:\n{}", e, trimmed)
    });

    assert_eq!(
        trimmed.lines().count(),
        1,
        "stdout must be exactly one line of JSON:\n{trimmed}"
    );

    val
}

// ===========================================================================
// lore resolve --json
// ===========================================================================

#[test]
fn resolve_json_empty_store_returns_global_default() {
    let dir = TempDir::new().unwrap();
    let store = dir.path().join("prefs.json");

    let output = lore()
        .args(["resolve", "--category", "palette", "--json"])
        .args(["--store", store.to_str().unwrap()])
        .output()
        .expect("lore resolve --json");

    assert!(
        output.status.success(),
        "exit: {:?}\nstderr: {}",
        output.status,
        String::from_utf8_lossy(&output.stderr)
    );

    let stdout = String::from_utf8_lossy(&output.stdout);
    let val = assert_single_json(&stdout);

    let obj = val.as_object().expect("should be JSON object");
    assert_eq!(obj["category"], serde_json::json!("palette"));
    assert_eq!(
        obj["value"],
        serde_json::json!({"type": "palette", "value": "light-default"})
    );
}

#[test]
fn resolve_json_includes_the_context() {
    let dir = TempDir::new().unwrap();
    let store = dir.path().join("prefs.json");

    let output = lore()
        .args(["resolve", "--category", "node-style", "--folder", "maps", "--json"])
        .args(["--store", store.to_str().unwrap()])
        .output()
        .expect("lore resolve --json");

    let stdout = String::from_utf8_lossy(&output.stdout);
    let val = assert_single_json(&stdout);
    assert_eq!(val["context"], serde_json::json!({"folder": "maps"}));
    assert_eq!(val["value"]["type"], serde_json::json!("node-style"));
}

// ===========================================================================
// lore list --json
// ===========================================================================

#[test]
fn list_json_shows_seeded_globals() {
    let dir = TempDir::new().unwrap();
    let store = dir.path().join("prefs.json");

    let output = lore()
        .args(["list", "--json"])
        .args(["--store", store.to_str().unwrap()])
        .output()
        .expect("lore list --json");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let val = assert_single_json(&stdout);

    let entries = val["entries"].as_array().expect("entries must be array");
    // One seeded global per category
    assert_eq!(entries.len(), 2);
    for entry in entries {
        assert_eq!(entry["level"], serde_json::json!("global"));
        assert_eq!(entry["key"], serde_json::json!("global"));
    }
}

#[test]
fn list_json_reflects_sets() {
    let dir = TempDir::new().unwrap();
    let store = dir.path().join("prefs.json");
    let store_arg = store.to_str().unwrap();

    let set = lore()
        .args(["set", "--level", "project", "--key", "story-7", "--category", "palette", "dark-forest"])
        .args(["--store", store_arg, "-q"])
        .output()
        .expect("lore set");
    assert!(set.status.success(), "stderr: {}", String::from_utf8_lossy(&set.stderr));

    let output = lore()
        .args(["list", "--json"])
        .args(["--store", store_arg])
        .output()
        .expect("lore list --json");

    let stdout = String::from_utf8_lossy(&output.stdout);
    let val = assert_single_json(&stdout);
    let entries = val["entries"].as_array().unwrap();

    assert!(entries.iter().any(|e| {
        e["level"] == serde_json::json!("project")
            && e["key"] == serde_json::json!("story-7")
            && e["value"] == serde_json::json!({"type": "palette", "value": "dark-forest"})
    }));
}

// ===========================================================================
// lore palettes --json
// ===========================================================================

#[test]
fn palettes_json_lists_builtins() {
    let output = lore().args(["palettes", "--json"]).output().expect("lore palettes --json");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let val = assert_single_json(&stdout);

    let palettes = val["palettes"].as_array().expect("palettes must be array");
    for id in ["light-default", "dark-forest", "sepia"] {
        assert!(
            palettes
                .iter()
                .any(|p| p["id"] == serde_json::json!(id) && p["builtin"] == serde_json::json!(true)),
            "missing builtin palette '{id}'"
        );
    }
}
