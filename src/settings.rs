use crate::graph::index::BuildOptions;
use crate::graph::interaction::{SessionConfig, ROOT_NODE_ID};
use crate::graph::layout::LayoutConfig;
use crate::graph::link::DEFAULT_ROUTING_PREFIX;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// How documents are folded into the content graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphSettings {
    /// Prefixes stripped from link targets before they are matched to ids.
    #[serde(default = "default_routing_prefixes")]
    pub routing_prefixes: Vec<String>,
    #[serde(default = "default_true")]
    pub sort_children: bool,
    /// Id of the node every session starts focused on. Added as a synthetic
    /// folder when no document has this id.
    #[serde(default = "default_root_id")]
    pub root_id: String,
    #[serde(default = "default_root_label")]
    pub root_label: String,
    /// Base URL used when printing feed locations.
    #[serde(default)]
    pub site_url: Option<String>,
}

impl Default for GraphSettings {
    fn default() -> Self {
        Self {
            routing_prefixes: default_routing_prefixes(),
            sort_children: true,
            root_id: default_root_id(),
            root_label: default_root_label(),
            site_url: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewSettings {
    #[serde(default = "default_window_size")]
    pub window_size: (f32, f32),
    #[serde(default = "default_true")]
    pub show_labels: bool,
    /// Labels are hidden below this zoom level.
    #[serde(default = "default_label_zoom_threshold")]
    pub label_zoom_threshold: f32,
    #[serde(default = "default_transition_ms")]
    pub focus_transition_ms: u64,
    #[serde(default = "default_transition_ms")]
    pub reset_transition_ms: u64,
}

impl Default for ViewSettings {
    fn default() -> Self {
        Self {
            window_size: default_window_size(),
            show_labels: true,
            label_zoom_threshold: default_label_zoom_threshold(),
            focus_transition_ms: default_transition_ms(),
            reset_transition_ms: default_transition_ms(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub graph: GraphSettings,
    #[serde(default)]
    pub layout: LayoutConfig,
    #[serde(default)]
    pub view: ViewSettings,
    /// When enabled the application initialises the logger at debug level.
    /// Defaults to `false` when the field is missing in the settings file.
    #[serde(default)]
    pub debug_logging: bool,
    /// Optional log file written in addition to stderr.
    #[serde(default)]
    pub log_file: Option<String>,
}

fn default_true() -> bool {
    true
}

fn default_routing_prefixes() -> Vec<String> {
    vec![DEFAULT_ROUTING_PREFIX.to_string()]
}

fn default_root_id() -> String {
    ROOT_NODE_ID.to_string()
}

fn default_root_label() -> String {
    "Root".to_string()
}

fn default_window_size() -> (f32, f32) {
    (960.0, 720.0)
}

fn default_label_zoom_threshold() -> f32 {
    0.6
}

fn default_transition_ms() -> u64 {
    750
}

impl Settings {
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path).unwrap_or_default();
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_json::from_str(&content)?)
    }

    pub fn save(&self, path: &str) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    pub fn build_options(&self) -> BuildOptions {
        BuildOptions {
            routing_prefixes: self.graph.routing_prefixes.clone(),
            sort_children: self.graph.sort_children,
        }
    }

    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            root_id: self.graph.root_id.clone(),
            root_label: self.graph.root_label.clone(),
            layout: self.layout,
            focus_transition: Duration::from_millis(self.view.focus_transition_ms),
            reset_transition: Duration::from_millis(self.view.reset_transition_ms),
        }
    }
}
