use crate::error::{RenderError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Configuration for graph rendering
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Direction ranks are laid out in
    pub rank_direction: RankDirection,

    /// Minimum space between nodes of one rank (inches)
    pub node_separation: f64,

    /// Minimum space between ranks (inches)
    pub rank_separation: f64,

    /// Colors per node role
    pub palette: Palette,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            rank_direction: RankDirection::LeftToRight,
            node_separation: 0.5,
            rank_separation: 1.0,
            palette: Palette::default(),
        }
    }
}

impl RenderConfig {
    /// Top-to-bottom layout, better for tall context lists
    pub fn top_down() -> Self {
        Self {
            rank_direction: RankDirection::TopToBottom,
            ..Default::default()
        }
    }

    /// Tighter spacing for large projects
    pub fn compact() -> Self {
        Self {
            node_separation: 0.25,
            rank_separation: 0.5,
            ..Default::default()
        }
    }

    /// Parse a TOML document; missing keys keep their defaults
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if !(self.node_separation > 0.0) {
            return Err(RenderError::InvalidConfig(format!(
                "node_separation must be > 0, got {}",
                self.node_separation
            )));
        }

        if !(self.rank_separation > 0.0) {
            return Err(RenderError::InvalidConfig(format!(
                "rank_separation must be > 0, got {}",
                self.rank_separation
            )));
        }

        self.palette.validate()
    }
}

/// Graphviz `rankdir`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RankDirection {
    #[serde(rename = "TB")]
    TopToBottom,
    #[serde(rename = "LR")]
    LeftToRight,
    #[serde(rename = "BT")]
    BottomToTop,
    #[serde(rename = "RL")]
    RightToLeft,
}

impl RankDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TopToBottom => "TB",
            Self::LeftToRight => "LR",
            Self::BottomToTop => "BT",
            Self::RightToLeft => "RL",
        }
    }
}

impl fmt::Display for RankDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Colors used by the DOT renderer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Palette {
    pub font: String,
    pub edge: String,
    pub aggregate: String,
    pub event: String,
    pub command: String,
    pub subscriber: String,
    pub processor: String,
    pub projector: String,
    pub user_interface: String,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            font: "#343a40".to_string(),
            edge: "#343a40".to_string(),
            aggregate: "#ffec99".to_string(),
            event: "#ffc078".to_string(),
            command: "#74c0fc".to_string(),
            subscriber: "#ffa8a8".to_string(),
            processor: "#e599f7".to_string(),
            projector: "#8ce99a".to_string(),
            user_interface: "#dee2e6".to_string(),
        }
    }
}

impl Palette {
    fn validate(&self) -> Result<()> {
        let colors = [
            ("font", &self.font),
            ("edge", &self.edge),
            ("aggregate", &self.aggregate),
            ("event", &self.event),
            ("command", &self.command),
            ("subscriber", &self.subscriber),
            ("processor", &self.processor),
            ("projector", &self.projector),
            ("user_interface", &self.user_interface),
        ];

        match colors.iter().find(|(_, color)| color.trim().is_empty()) {
            Some((role, _)) => Err(RenderError::InvalidConfig(format!(
                "palette.{} must not be empty",
                role
            ))),
            None => Ok(()),
        }
    }
}
