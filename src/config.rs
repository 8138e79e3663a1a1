//! Project configuration.
//!
//! Everything that appears in an external command line (input paths,
//! output paths, hyperparameters, the interpreter) lives in
//! [`ProjectConfig`]. Defaults match the conventional assistant project
//! layout (`data/stories.md`, `domain.yml`, `models/dialogue`, ...), so a
//! project without a `dojo.toml` behaves exactly like the stock setup.
//! Paths stay relative; they are resolved by the child process against the
//! project directory, never rewritten by the runner.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::{dlog_debug, Error, Result};

/// Default port the dialogue server listens on.
pub const DEFAULT_SERVER_PORT: u16 = 5005;

/// Default number of training epochs for the dialogue model.
pub const DEFAULT_EPOCHS: u32 = 100;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ProjectConfig {
    /// Interpreter used to launch the framework modules.
    pub python: String,
    /// Training stories for the dialogue model.
    pub stories: String,
    /// Domain file (intents, entities, actions, slots).
    pub domain: String,
    /// Endpoint configuration handed to the server and interactive trainer.
    pub endpoints: String,
    /// NLU pipeline configuration.
    pub nlu_config: String,
    /// NLU training data.
    pub nlu_data: String,
    /// Output directory for the trained dialogue model.
    pub dialogue_model_dir: String,
    /// Output directory the NLU trainer writes projects into.
    pub nlu_output_dir: String,
    /// Fixed name for the trained NLU model.
    pub nlu_model_name: String,
    /// NLU project name under the output directory.
    pub nlu_project: String,
    /// Directory containing custom action code.
    pub actions_dir: String,
    /// Output path for the rendered story graph.
    pub graph_output: String,
    /// Training epochs for the dialogue model.
    pub epochs: u32,
    /// Port the dialogue server listens on.
    pub port: u16,
    /// Pass `--debug` to the trainer and the dialogue server.
    pub tool_debug: bool,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            python: "python".to_string(),
            stories: "data/stories.md".to_string(),
            domain: "domain.yml".to_string(),
            endpoints: "endpoints.yml".to_string(),
            nlu_config: "nlu_tensorflow.yml".to_string(),
            nlu_data: "data/nlu_data.md".to_string(),
            dialogue_model_dir: "models/dialogue".to_string(),
            nlu_output_dir: "models".to_string(),
            nlu_model_name: "current".to_string(),
            nlu_project: "nlu".to_string(),
            actions_dir: "actions".to_string(),
            graph_output: "story_graph.png".to_string(),
            epochs: DEFAULT_EPOCHS,
            port: DEFAULT_SERVER_PORT,
            tool_debug: true,
        }
    }
}

impl ProjectConfig {
    /// Directory for the runner's own state (currently just the log file).
    pub fn dojo_dir() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".dojo"))
    }

    /// Load the config from `path`, falling back to defaults when the file
    /// does not exist. A file that exists but fails to parse is an error.
    pub fn load_from(path: &Path) -> Result<Self> {
        dlog_debug!("ProjectConfig::load_from path={}", path.display());
        if !path.exists() {
            dlog_debug!("Config file not found, using defaults");
            return Ok(Self::default());
        }
        let config: Self = toml::from_str(&fs::read_to_string(path)?)?;
        config.validate()?;
        dlog_debug!(
            "Config loaded: python={}, epochs={}, port={}",
            config.python,
            config.epochs,
            config.port
        );
        Ok(config)
    }

    /// Write the config to `path` as pretty TOML.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(path, toml::to_string_pretty(self)?)?;
        dlog_debug!("Config saved to {}", path.display());
        Ok(())
    }

    /// Reject values no external command line could mean anything with.
    pub fn validate(&self) -> Result<()> {
        if self.python.is_empty() {
            return Err(Error::Validation("python must not be empty".to_string()));
        }
        if self.epochs == 0 {
            return Err(Error::Validation("epochs must be at least 1".to_string()));
        }
        Ok(())
    }
}
