//! Common utility types for lens modules
//!
//! This module provides the output format shared by every command.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Unified output format for all lens commands
///
/// Commands that don't support a particular format fall back to the closest
/// supported one instead of failing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutputFormat {
    /// Pretty table with borders (default)
    #[default]
    Table,
    /// Markdown table format
    Markdown,
    /// Labeled lines, one field per line
    Text,
    /// Compact JSON (single line per object)
    Json,
    /// Pretty-printed JSON with indentation
    JsonPretty,
    /// JSON Lines format (one JSON object per line)
    JsonLine,
    /// Pipe-separated values with header
    Psv,
}

impl OutputFormat {
    /// Check if this is a JSON variant
    pub fn is_json(&self) -> bool {
        matches!(self, Self::Json | Self::JsonPretty | Self::JsonLine)
    }

    /// Get a list of all format names for help text
    pub fn all_names() -> &'static [&'static str] {
        &[
            "table",
            "markdown",
            "text",
            "json",
            "json-pretty",
            "json-line",
            "psv",
        ]
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Table => write!(f, "table"),
            Self::Markdown => write!(f, "markdown"),
            Self::Text => write!(f, "text"),
            Self::Json => write!(f, "json"),
            Self::JsonPretty => write!(f, "json-pretty"),
            Self::JsonLine => write!(f, "json-line"),
            Self::Psv => write!(f, "psv"),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" | "pretty" => Ok(Self::Table),
            "markdown" | "md" => Ok(Self::Markdown),
            "text" | "plain" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            "json-pretty" | "jsonpretty" => Ok(Self::JsonPretty),
            "json-line" | "jsonline" | "jsonl" | "ndjson" => Ok(Self::JsonLine),
            "psv" | "pipe" => Ok(Self::Psv),
            _ => Err(format!(
                "Unknown output format '{}'. Valid formats: {}",
                s,
                Self::all_names().join(", ")
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_format_from_str() {
        assert_eq!(
            OutputFormat::from_str("pretty").unwrap(),
            OutputFormat::Table
        );
        assert_eq!(
            OutputFormat::from_str("md").unwrap(),
            OutputFormat::Markdown
        );
        assert_eq!(OutputFormat::from_str("plain").unwrap(), OutputFormat::Text);
        assert_eq!(
            OutputFormat::from_str("JSONL").unwrap(),
            OutputFormat::JsonLine
        );
        assert_eq!(OutputFormat::from_str("pipe").unwrap(), OutputFormat::Psv);

        let err = OutputFormat::from_str("yaml").unwrap_err();
        assert!(err.contains("Valid formats"));
    }

    #[test]
    fn test_output_format_display_round_trips_names() {
        for name in OutputFormat::all_names() {
            let format = OutputFormat::from_str(name).unwrap();
            assert_eq!(&format.to_string(), name);
        }
    }

    #[test]
    fn test_output_format_kinds() {
        assert!(OutputFormat::JsonPretty.is_json());
        assert!(!OutputFormat::Text.is_json());
    }
}
