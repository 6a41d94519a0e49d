//! Statistics configuration
//!
//! Loaded from YAML; every key is optional and falls back to the defaults
//! of an A4 print profile.

use crate::query::{StatsError, StatsResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Page metrics supplied by the print layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrintProfile {
    pub paper_size: String,
    pub lines_per_page: usize,
}

impl PrintProfile {
    pub fn a4() -> Self {
        Self {
            paper_size: "a4".to_string(),
            lines_per_page: 57,
        }
    }

    pub fn us_letter() -> Self {
        Self {
            paper_size: "letter".to_string(),
            lines_per_page: 55,
        }
    }
}

impl Default for PrintProfile {
    fn default() -> Self {
        Self::a4()
    }
}

/// Knobs shared by every analysis in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatsConfig {
    pub print: PrintProfile,
    /// Scene headings without a time of day inherit the last explicit one
    pub keep_last_scene_time: bool,
    /// Number of top characters in the co-occurrence network
    pub network_size: usize,
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            print: PrintProfile::default(),
            keep_last_scene_time: true,
            network_size: 10,
        }
    }
}

impl StatsConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_print(mut self, print: PrintProfile) -> Self {
        self.print = print;
        self
    }

    pub fn with_lines_per_page(mut self, lines_per_page: usize) -> Self {
        self.print.lines_per_page = lines_per_page;
        self
    }

    pub fn with_keep_last_scene_time(mut self, keep: bool) -> Self {
        self.keep_last_scene_time = keep;
        self
    }

    pub fn with_network_size(mut self, size: usize) -> Self {
        self.network_size = size;
        self
    }

    /// Parse and validate a YAML document.
    pub fn from_yaml_str(yaml: &str) -> StatsResult<Self> {
        let config: StatsConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a YAML file.
    pub fn load(path: impl AsRef<Path>) -> StatsResult<Self> {
        let yaml = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&yaml)
    }

    pub fn validate(&self) -> StatsResult<()> {
        if self.print.lines_per_page == 0 {
            return Err(StatsError::InvalidConfig(
                "print.lines_per_page must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}
