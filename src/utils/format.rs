use crate::domain::model::ConfigDocument;
use crate::utils::error::Result;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Text syntax the compose document is rendered in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    #[serde(alias = "yml")]
    #[cfg_attr(feature = "cli", value(alias = "yml"))]
    Yaml,
    Json,
}

impl OutputFormat {
    pub fn render(&self, document: &ConfigDocument) -> Result<String> {
        match self {
            OutputFormat::Yaml => Ok(serde_yaml::to_string(document)?),
            OutputFormat::Json => {
                let mut rendered = serde_json::to_string_pretty(document)?;
                rendered.push('\n');
                Ok(rendered)
            }
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Yaml => write!(f, "yaml"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}
