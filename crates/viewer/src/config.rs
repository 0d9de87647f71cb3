//! Viewer configuration (window, start state, tree parameters). Loaded from
//! tinsel.ron at startup.

use engine_core::Formation;
use procgen::TreeConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const CONFIG_FILE: &str = "tinsel.ron";

/// Persistent viewer settings. Every field is optional in the file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewerConfig {
    /// Window width in logical pixels.
    #[serde(default = "default_window_width")]
    pub window_width: u32,
    /// Window height in logical pixels.
    #[serde(default = "default_window_height")]
    pub window_height: u32,
    /// Enable vsync (recommended to avoid tearing).
    #[serde(default = "default_true")]
    pub vsync: bool,
    /// Formation shown on the first frame.
    #[serde(default)]
    pub start_formation: Formation,
    /// Fixed generation seed; random when absent.
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub tree: TreeConfig,
}

fn default_window_width() -> u32 {
    1280
}
fn default_window_height() -> u32 {
    720
}
fn default_true() -> bool {
    true
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            window_width: default_window_width(),
            window_height: default_window_height(),
            vsync: default_true(),
            start_formation: Formation::default(),
            seed: None,
            tree: TreeConfig::default(),
        }
    }
}

impl ViewerConfig {
    /// Load from `tinsel.ron` in the current directory.
    pub fn load() -> Self {
        Self::load_from(&config_path())
    }

    /// Missing file means defaults; an unreadable one logs a warning and
    /// also falls back to defaults.
    pub fn load_from(path: &Path) -> Self {
        if let Ok(data) = std::fs::read_to_string(path) {
            match ron::from_str(&data) {
                Ok(c) => return c,
                Err(e) => log::warn!("Invalid config at {:?}: {}, using defaults", path, e),
            }
        }
        Self::default()
    }
}

fn config_path() -> PathBuf {
    std::env::current_dir()
        .unwrap_or_else(|_| PathBuf::from("."))
        .join(CONFIG_FILE)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_file(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("tinsel-{}-{}", std::process::id(), name));
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let config: ViewerConfig = ron::from_str(
            "(window_width: 1920, start_formation: TreeShape, tree: (foliage_count: 900))",
        )
        .unwrap();
        assert_eq!(config.window_width, 1920);
        assert_eq!(config.window_height, 720);
        assert!(config.vsync);
        assert_eq!(config.start_formation, Formation::TreeShape);
        assert_eq!(config.tree.foliage_count, 900);
        assert_eq!(config.tree.ornament_count, 1200);
        assert_eq!(config.tree.starfield.count, 5000);
    }

    #[test]
    fn starfield_section_overrides_individual_fields() {
        let config: ViewerConfig =
            ron::from_str("(tree: (starfield: (count: 0, depth: 10.0)))").unwrap();
        assert_eq!(config.tree.starfield.count, 0);
        assert_eq!(config.tree.starfield.depth, 10.0);
        assert_eq!(config.tree.starfield.radius, 100.0);
        assert_eq!(config.tree.validate(), Ok(()));
    }

    #[test]
    fn missing_file_gives_defaults() {
        let path = std::env::temp_dir().join("tinsel-definitely-missing.ron");
        assert_eq!(ViewerConfig::load_from(&path), ViewerConfig::default());
    }

    #[test]
    fn invalid_file_falls_back_to_defaults() {
        let path = temp_file("invalid.ron", "(window_width: \"wide\")");
        assert_eq!(ViewerConfig::load_from(&path), ViewerConfig::default());
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn valid_file_is_read() {
        let path = temp_file("valid.ron", "(seed: Some(7), vsync: false)");
        let config = ViewerConfig::load_from(&path);
        assert_eq!(config.seed, Some(7));
        assert!(!config.vsync);
        std::fs::remove_file(path).ok();
    }
}
