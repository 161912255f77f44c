//! Theme JSON export

use super::{ExportContext, ExportError};
use crate::theme::{Theme, ThemeCategory, ThemeColors};
use chrono::SecondsFormat;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportMetadata {
    pub exported_at: String,
    pub extension_version: String,
}

/// Document written by the JSON export
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeExport {
    pub name: String,
    pub description: String,
    pub category: ThemeCategory,
    pub colors: ThemeColors,
    pub metadata: ExportMetadata,
}

impl ThemeExport {
    pub fn new(theme: &Theme, colors: &ThemeColors, ctx: &ExportContext) -> Self {
        Self {
            name: theme.name.clone(),
            description: theme.description.clone(),
            category: theme.category,
            colors: colors.clone(),
            metadata: ExportMetadata {
                exported_at: ctx.exported_at.to_rfc3339_opts(SecondsFormat::Millis, true),
                extension_version: ctx.extension_version.clone(),
            },
        }
    }
}

/// Pretty-printed export document, 2-space indentation
pub fn to_json(theme: &Theme, colors: &ThemeColors, ctx: &ExportContext) -> Result<String, ExportError> {
    Ok(serde_json::to_string_pretty(&ThemeExport::new(theme, colors, ctx))?)
}
