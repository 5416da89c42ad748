use crate::error::ConfigError;
use crate::model::Size;
use serde::Deserialize;
use std::fs;
use std::time::Duration;

/// Whether an output port may feed more than one connection.
///
/// Input ports always accept a single inbound connection. For outputs the
/// editor historically rejected a second wire, while bundled sample flows fan
/// out from one port. The policy is explicit so callers choose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFanOut {
    #[default]
    Single,
    Multiple,
}

/// Tunables for an [`Editor`](crate::editor::Editor).
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EditorConfig {
    /// Maximum number of undo snapshots. `None` keeps everything.
    pub history_limit: Option<usize>,
    pub output_fan_out: OutputFanOut,
    pub autosave_interval_secs: u64,
    pub save_debounce_ms: u64,
    pub log_capacity: usize,
    pub grid_snap: f64,
    pub min_node_width: f64,
    pub min_node_height: f64,
    pub default_node_size: Size,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            history_limit: None,
            output_fan_out: OutputFanOut::Single,
            autosave_interval_secs: 300,
            save_debounce_ms: 1000,
            log_capacity: 200,
            grid_snap: 10.0,
            min_node_width: 100.0,
            min_node_height: 50.0,
            default_node_size: Size::default(),
        }
    }
}

impl EditorConfig {
    /// Loads a config from a JSON file. Missing fields take their defaults.
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_string(),
            source,
        })?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn with_history_limit(mut self, limit: usize) -> Self {
        self.history_limit = Some(limit);
        self
    }

    pub fn with_output_fan_out(mut self, policy: OutputFanOut) -> Self {
        self.output_fan_out = policy;
        self
    }

    pub fn with_grid_snap(mut self, snap: f64) -> Self {
        self.grid_snap = snap;
        self
    }

    pub fn with_log_capacity(mut self, capacity: usize) -> Self {
        self.log_capacity = capacity;
        self
    }

    pub fn autosave_interval(&self) -> Duration {
        Duration::from_secs(self.autosave_interval_secs)
    }

    pub fn save_debounce(&self) -> Duration {
        Duration::from_millis(self.save_debounce_ms)
    }
}
