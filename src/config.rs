use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::time::Duration;

/// Interaction tuning and application settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Cooldown after a connection gesture during which canvas double-clicks
    /// do not create nodes
    pub suppress_click_ms: u64,

    /// Width of the band inside a node's edge where a press starts a
    /// connection instead of a move
    pub border_hit_width: f32,

    pub viewport_width: f32,
    pub viewport_height: f32,

    pub show_grid: bool,

    /// `env_logger` filter used when `RUST_LOG` is unset
    pub log_filter: String,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            suppress_click_ms: 100,
            border_hit_width: 8.0,
            viewport_width: 1280.0,
            viewport_height: 800.0,
            show_grid: true,
            log_filter: "info".to_string(),
        }
    }
}

impl EditorConfig {
    pub fn suppress_window(&self) -> Duration {
        Duration::from_millis(self.suppress_click_ms)
    }

    /// Load config from a JSON file; missing fields take their defaults
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("Failed to open config file: {}", path.display()))?;
        let reader = BufReader::new(file);
        serde_json::from_reader(reader)
            .with_context(|| format!("Failed to parse config from: {}", path.display()))
    }

    /// Load from `path` if given, otherwise use defaults
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    /// Initialise `env_logger`, honouring `RUST_LOG` over `log_filter`
    pub fn init_logging(&self) {
        let env = env_logger::Env::default().default_filter_or(self.log_filter.as_str());
        // A second init (e.g. from tests) is harmless
        let _ = env_logger::Builder::from_env(env).try_init();
    }
}
