//! Theme export generators
//!
//! Every generator is a pure function of the effective theme (theme colors with
//! overrides applied) and an [`ExportContext`]; nothing here touches the filesystem.

mod css;
mod html;
mod json;

pub use css::{to_css, to_scss};
pub use html::{
    canvas_html, demo_html, embed_html, render_html, style_options_json, CanvasConfig,
    HtmlVariant, EMBED_TOKEN_PLACEHOLDER,
};
pub use json::{to_json, ExportMetadata, ThemeExport};

use crate::theme::{CustomColorOverrides, Theme};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Version stamped into exported JSON metadata
pub const EXTENSION_VERSION: &str = "1.0.0";

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Unsupported export format: {0}")]
    UnsupportedFormat(String),

    #[error("Unsupported HTML variant: {0}")]
    UnsupportedVariant(String),

    #[error("No theme selected")]
    NoThemeSelected,

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Json,
    Css,
    Scss,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 3] = [ExportFormat::Json, ExportFormat::Css, ExportFormat::Scss];

    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Css => "css",
            ExportFormat::Scss => "scss",
        }
    }

    /// Upper-case name for user-facing messages ("CSS")
    pub fn label(&self) -> String {
        self.extension().to_uppercase()
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "json" => Ok(ExportFormat::Json),
            "css" => Ok(ExportFormat::Css),
            "scss" => Ok(ExportFormat::Scss),
            _ => Err(ExportError::UnsupportedFormat(s.to_string())),
        }
    }
}

/// Inputs to an export that are not part of the theme
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportContext {
    pub exported_at: DateTime<Utc>,
    pub extension_version: String,
}

impl ExportContext {
    /// Context stamped with a fixed time
    pub fn at(exported_at: DateTime<Utc>) -> Self {
        Self {
            exported_at,
            extension_version: EXTENSION_VERSION.to_string(),
        }
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.extension_version = version.into();
        self
    }
}

impl Default for ExportContext {
    fn default() -> Self {
        Self::at(Utc::now())
    }
}

/// Render `theme` with `overrides` applied in the given format
pub fn generate(
    format: ExportFormat,
    theme: &Theme,
    overrides: &CustomColorOverrides,
    ctx: &ExportContext,
) -> Result<String, ExportError> {
    let colors = overrides.apply_to(&theme.colors);
    match format {
        ExportFormat::Json => json::to_json(theme, &colors, ctx),
        ExportFormat::Css => Ok(css::to_css(theme, &colors)),
        ExportFormat::Scss => Ok(css::to_scss(theme, &colors)),
    }
}

/// Suggested file name, e.g. `ocean-blue-theme.scss`
pub fn default_file_name(theme: &Theme, format: ExportFormat) -> String {
    format!("{}-theme.{}", theme.slug(), format.extension())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::{find_theme, ColorKey};

    fn fixed_ctx() -> ExportContext {
        ExportContext::at("2024-05-01T12:00:00Z".parse().unwrap())
    }

    #[test]
    fn test_format_parsing() {
        assert_eq!("JSON".parse::<ExportFormat>().unwrap(), ExportFormat::Json);
        assert_eq!(" scss ".parse::<ExportFormat>().unwrap(), ExportFormat::Scss);
        let err = "pdf".parse::<ExportFormat>().unwrap_err();
        assert!(matches!(err, ExportError::UnsupportedFormat(ref f) if f == "pdf"));
    }

    #[test]
    fn test_default_file_names() {
        let theme = find_theme("ocean-blue").unwrap();
        assert_eq!(default_file_name(theme, ExportFormat::Json), "ocean-blue-theme.json");
        assert_eq!(default_file_name(theme, ExportFormat::Css), "ocean-blue-theme.css");
        assert_eq!(default_file_name(theme, ExportFormat::Scss), "ocean-blue-theme.scss");
    }

    #[test]
    fn test_generate_applies_overrides_in_every_format() {
        let theme = find_theme("dark-mode").unwrap();
        let mut overrides = CustomColorOverrides::new();
        overrides.insert(ColorKey::LinkColor, "#ABCDEF");

        for format in ExportFormat::ALL {
            let out = generate(format, theme, &overrides, &fixed_ctx()).unwrap();
            assert!(out.contains("#ABCDEF"), "{} export misses the override", format);
        }
    }

    #[test]
    fn test_generate_is_deterministic_for_fixed_context() {
        let theme = find_theme("teams-inspired").unwrap();
        let overrides = CustomColorOverrides::new();
        let a = generate(ExportFormat::Json, theme, &overrides, &fixed_ctx()).unwrap();
        let b = generate(ExportFormat::Json, theme, &overrides, &fixed_ctx()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_format_label() {
        assert_eq!(ExportFormat::Scss.label(), "SCSS");
        assert_eq!(ExportFormat::Css.to_string(), "css");
    }
}
