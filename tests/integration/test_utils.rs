//! Shared test utilities for integration tests

use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tempfile::TempDir;

/// Serializes tests that change process environment variables.
static ENV_MUTEX: Mutex<()> = Mutex::new(());

/// Run `f` with `XDG_CONFIG_HOME` pointing at an empty temp directory so the
/// developer's global config never leaks into a test.
pub fn with_isolated_config_home<F, R>(f: F) -> R
where
    F: FnOnce(&Path) -> R,
{
    let _guard = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    let original = std::env::var("XDG_CONFIG_HOME").ok();
    let temp = TempDir::new().unwrap();
    std::env::set_var("XDG_CONFIG_HOME", temp.path());

    let result = f(temp.path());

    match original {
        Some(value) => std::env::set_var("XDG_CONFIG_HOME", value),
        None => std::env::remove_var("XDG_CONFIG_HOME"),
    }
    result
}

/// Write `config/autotitle.toml` under a workspace root.
pub fn write_workspace_config(workspace: &Path, contents: &str) -> PathBuf {
    let dir = workspace.join("config");
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("autotitle.toml");
    std::fs::write(&path, contents).unwrap();
    path
}

pub const ARTICLE_CONFIG: &str = r#"
[bundles.node.article]
status = 1
pattern = "Article [node:id]"

[bundles.node.page]
status = 2
pattern = ""

[bundles.node.event]
status = 0
pattern = "Event [node:id]"

[labels.bundles.node]
page = "Basic page"
"#;
