//! Recorder configuration.
//!
//! Loaded from a TOML file; every key is optional.
//!
//! ```toml
//! kind = "graphviz"
//! output = "log.dot"
//! rankdir = "TB"
//! summary = "log.json"
//! ```

use crate::error::{RecorderError, Result};
use crate::infrastructure::GraphOptions;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Recorder strategy, chosen once per session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum RecorderKind {
    /// Graphviz data-flow graph
    #[default]
    Graphviz,
    /// Line-per-event text log
    Text,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecorderConfig {
    pub kind: RecorderKind,
    pub output: PathBuf,
    pub graph_name: Option<String>,
    pub rankdir: Option<String>,
    /// Indent emitted lines by grouping depth
    pub indent: bool,
    /// JSON summary written at teardown (graphviz only)
    pub summary: Option<PathBuf>,
}

impl Default for RecorderConfig {
    fn default() -> Self {
        Self {
            kind: RecorderKind::Graphviz,
            output: PathBuf::from("log.dot"),
            graph_name: None,
            rankdir: None,
            indent: true,
            summary: None,
        }
    }
}

impl RecorderConfig {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|source| RecorderError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn graph_options(&self) -> GraphOptions {
        GraphOptions {
            name: self.graph_name.clone(),
            rankdir: self.rankdir.clone(),
            indent: self.indent,
        }
    }
}
