//! Common test utilities for integration tests

use std::fs;
use std::path::PathBuf;

use gofcm::ConfigLoader;
use tempfile::TempDir;

/// Create a temporary directory for test isolation
pub fn temp_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

/// Write `content` to `name` inside `dir`, returning the path.
pub fn write_config(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).expect("Failed to write config file");
    path
}

/// Loader that only searches `dirs` and reads variables under `prefix`.
pub fn isolated_loader(dirs: &[&TempDir], prefix: &str) -> ConfigLoader {
    ConfigLoader::new()
        .with_search_paths(dirs.iter().map(|dir| dir.path().to_path_buf()).collect())
        .with_env_prefix(prefix)
}

/// Environment lookup that never finds anything.
pub fn no_env(_: &str) -> Option<String> {
    None
}

/// Setup test logging
#[allow(dead_code)]
pub fn setup_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}
