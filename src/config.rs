//! Application configuration.
//!
//! [`AppConfig`] is built in code with `with_*` builders or loaded from YAML.
//! Missing YAML keys fall back to the defaults.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::state::DEFAULT_MAX_HISTORY;

/// Errors from loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Parse(#[from] serde_yaml::Error),
}

// ---------------------------------------------------------------------------
// PageConfig
// ---------------------------------------------------------------------------

/// Settings for the host HTML page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageConfig {
    /// Overrides the application name as the page title.
    pub title: Option<String>,
    pub lang: String,
    pub vue_js: String,
    pub element_plus_js: String,
    pub element_plus_css: String,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            title: None,
            lang: "en".to_owned(),
            vue_js: "https://unpkg.com/vue@3.3.0/dist/vue.global.js".to_owned(),
            element_plus_js: "https://unpkg.com/element-plus@2.4.0/dist/index.full.js".to_owned(),
            element_plus_css: "https://unpkg.com/element-plus@2.4.0/dist/index.css".to_owned(),
        }
    }
}

// ---------------------------------------------------------------------------
// AppConfig
// ---------------------------------------------------------------------------

/// Configuration for the application shell and its server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Application name, used as the default page title.
    pub name: String,
    /// Debug mode: diagnostic error pages, handler errors surfaced as 500s.
    pub debug: bool,
    pub host: String,
    pub port: u16,
    /// State undo history capacity.
    pub max_history: usize,
    /// Fail the render when two nodes share an id.
    pub strict_ids: bool,
    pub page: PageConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            name: "Trellis App".to_owned(),
            debug: false,
            host: "127.0.0.1".to_owned(),
            port: 5000,
            max_history: DEFAULT_MAX_HISTORY,
            strict_ids: true,
            page: PageConfig::default(),
        }
    }
}

impl AppConfig {
    /// Create a new default config.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the application name (builder).
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Set debug mode (builder).
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Set the bind host (builder).
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    /// Set the bind port (builder).
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Set the undo history capacity (builder).
    pub fn with_max_history(mut self, max_history: usize) -> Self {
        self.max_history = max_history;
        self
    }

    /// Set duplicate-id strictness (builder).
    pub fn with_strict_ids(mut self, strict: bool) -> Self {
        self.strict_ids = strict;
        self
    }

    /// Replace the page settings (builder).
    pub fn with_page(mut self, page: PageConfig) -> Self {
        self.page = page;
        self
    }

    /// `host:port`.
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Parse YAML. An empty document yields the defaults.
    pub fn from_yaml_str(text: &str) -> Result<Self, ConfigError> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(text)?)
    }

    /// Load YAML from a file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_yaml_str(&text)
    }

    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }
}
