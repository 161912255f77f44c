//! Webview ⇄ host message types

use super::BridgeError;
use crate::export::{CanvasConfig, HtmlVariant};
use crate::theme::{CustomColorOverrides, Theme};
use serde::{Deserialize, Serialize};

/// Messages posted by the editor webview
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "camelCase")]
pub enum WebviewMessage {
    #[serde(rename_all = "camelCase")]
    ApplyColor {
        #[serde(default)]
        color_type: Option<String>,
        #[serde(default)]
        color: Option<String>,
    },

    #[serde(rename_all = "camelCase")]
    ApplyTheme { theme_id: String },

    /// Pre-formatted JSON to save as-is
    ExportJson {
        #[serde(alias = "formattedJson")]
        data: String,
    },

    #[serde(rename_all = "camelCase")]
    ExportHtml {
        config: CanvasConfig,
        #[serde(default)]
        export_type: HtmlVariant,
        #[serde(default)]
        token_endpoint: Option<String>,
    },

    #[serde(rename_all = "camelCase")]
    PreviewHtml {
        config: CanvasConfig,
        #[serde(default)]
        export_type: HtmlVariant,
    },

    #[serde(rename_all = "camelCase")]
    ExportTheme {
        theme: Theme,
        #[serde(default)]
        custom_colors: CustomColorOverrides,
        format: String,
    },

    ShowInfo {
        #[serde(alias = "text")]
        message: String,
    },

    ShowError {
        #[serde(alias = "text")]
        message: String,
    },

    GetLogo,
    SaveTheme,
    LoadThemes,
}

impl WebviewMessage {
    /// Decode one JSON message; unknown commands are an error
    pub fn decode(raw: &str) -> Result<Self, BridgeError> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Wire name of the command
    pub fn command(&self) -> &'static str {
        match self {
            WebviewMessage::ApplyColor { .. } => "applyColor",
            WebviewMessage::ApplyTheme { .. } => "applyTheme",
            WebviewMessage::ExportJson { .. } => "exportJson",
            WebviewMessage::ExportHtml { .. } => "exportHtml",
            WebviewMessage::PreviewHtml { .. } => "previewHtml",
            WebviewMessage::ExportTheme { .. } => "exportTheme",
            WebviewMessage::ShowInfo { .. } => "showInfo",
            WebviewMessage::ShowError { .. } => "showError",
            WebviewMessage::GetLogo => "getLogo",
            WebviewMessage::SaveTheme => "saveTheme",
            WebviewMessage::LoadThemes => "loadThemes",
        }
    }

    /// Prefix for the error shown when handling this message fails
    pub fn failure_context(&self) -> &'static str {
        match self {
            WebviewMessage::ApplyColor { .. } => "Failed to apply color",
            WebviewMessage::ApplyTheme { .. } => "Failed to apply theme",
            WebviewMessage::ExportJson { .. } => "Error saving JSON",
            WebviewMessage::ExportHtml { .. } => "Error exporting HTML",
            WebviewMessage::PreviewHtml { .. } => "Error previewing HTML",
            WebviewMessage::ExportTheme { .. } => "Failed to export theme",
            _ => "Error handling webview message",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Success,
    Error,
}

/// Messages posted by the host to the webview
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "camelCase")]
pub enum HostMessage {
    LogoUri {
        uri: String,
    },
    ShowNotification {
        text: String,
        #[serde(rename = "type")]
        kind: NotificationKind,
    },
}

impl HostMessage {
    pub fn success(text: impl Into<String>) -> Self {
        HostMessage::ShowNotification {
            text: text.into(),
            kind: NotificationKind::Success,
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        HostMessage::ShowNotification {
            text: text.into(),
            kind: NotificationKind::Error,
        }
    }

    pub fn to_json(&self) -> Result<String, BridgeError> {
        Ok(serde_json::to_string(self)?)
    }
}
