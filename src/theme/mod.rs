//! Theme data model for Copilot Studio chat widgets
//!
//! A theme is a complete palette of 24 semantic color roles. Every export format
//! and the style-options projection are reprojections of this palette.
//!
//! ## Layout
//!
//! - [`catalog`]: the built-in, read-only set of themes
//! - [`selection`]: the currently selected theme plus per-key overrides

pub mod catalog;
pub mod selection;

pub use catalog::{find_theme, list_themes, search_themes};
pub use selection::{CustomColorOverrides, ThemeSelection};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ThemeError {
    #[error("Theme not found: {0}")]
    NotFound(String),

    #[error("Unknown color key: {0}")]
    UnknownColorKey(String),

    #[error("Unknown theme category: {0}")]
    UnknownCategory(String),
}

/// Gallery category a theme is listed under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeCategory {
    Default,
    Modern,
    Dark,
    Light,
    Custom,
}

impl ThemeCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ThemeCategory::Default => "default",
            ThemeCategory::Modern => "modern",
            ThemeCategory::Dark => "dark",
            ThemeCategory::Light => "light",
            ThemeCategory::Custom => "custom",
        }
    }
}

impl fmt::Display for ThemeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ThemeCategory {
    type Err = ThemeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "default" => Ok(ThemeCategory::Default),
            "modern" => Ok(ThemeCategory::Modern),
            "dark" => Ok(ThemeCategory::Dark),
            "light" => Ok(ThemeCategory::Light),
            "custom" => Ok(ThemeCategory::Custom),
            other => Err(ThemeError::UnknownCategory(other.to_string())),
        }
    }
}

/// The 24 semantic color roles of a chat theme
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeColors {
    // Bot message colors
    pub bot_message_background: String,
    pub bot_message_text: String,
    pub bot_message_border: String,

    // User message colors
    pub user_message_background: String,
    pub user_message_text: String,
    pub user_message_border: String,

    // Chat interface colors
    pub chat_background: String,
    pub chat_border: String,
    pub chat_shadow: String,

    // Input area colors
    pub input_background: String,
    pub input_text: String,
    pub input_border: String,
    pub input_placeholder: String,

    // Button colors
    pub primary_button_background: String,
    pub primary_button_text: String,
    pub primary_button_border: String,
    pub secondary_button_background: String,
    pub secondary_button_text: String,
    pub secondary_button_border: String,

    // Accent colors
    pub accent_color: String,
    pub link_color: String,
    pub error_color: String,
    pub success_color: String,
    pub warning_color: String,
}

impl ThemeColors {
    /// Read one color role
    pub fn get(&self, key: ColorKey) -> &str {
        match key {
            ColorKey::BotMessageBackground => &self.bot_message_background,
            ColorKey::BotMessageText => &self.bot_message_text,
            ColorKey::BotMessageBorder => &self.bot_message_border,
            ColorKey::UserMessageBackground => &self.user_message_background,
            ColorKey::UserMessageText => &self.user_message_text,
            ColorKey::UserMessageBorder => &self.user_message_border,
            ColorKey::ChatBackground => &self.chat_background,
            ColorKey::ChatBorder => &self.chat_border,
            ColorKey::ChatShadow => &self.chat_shadow,
            ColorKey::InputBackground => &self.input_background,
            ColorKey::InputText => &self.input_text,
            ColorKey::InputBorder => &self.input_border,
            ColorKey::InputPlaceholder => &self.input_placeholder,
            ColorKey::PrimaryButtonBackground => &self.primary_button_background,
            ColorKey::PrimaryButtonText => &self.primary_button_text,
            ColorKey::PrimaryButtonBorder => &self.primary_button_border,
            ColorKey::SecondaryButtonBackground => &self.secondary_button_background,
            ColorKey::SecondaryButtonText => &self.secondary_button_text,
            ColorKey::SecondaryButtonBorder => &self.secondary_button_border,
            ColorKey::AccentColor => &self.accent_color,
            ColorKey::LinkColor => &self.link_color,
            ColorKey::ErrorColor => &self.error_color,
            ColorKey::SuccessColor => &self.success_color,
            ColorKey::WarningColor => &self.warning_color,
        }
    }

    /// Overwrite one color role
    pub fn set(&mut self, key: ColorKey, value: impl Into<String>) {
        let slot = match key {
            ColorKey::BotMessageBackground => &mut self.bot_message_background,
            ColorKey::BotMessageText => &mut self.bot_message_text,
            ColorKey::BotMessageBorder => &mut self.bot_message_border,
            ColorKey::UserMessageBackground => &mut self.user_message_background,
            ColorKey::UserMessageText => &mut self.user_message_text,
            ColorKey::UserMessageBorder => &mut self.user_message_border,
            ColorKey::ChatBackground => &mut self.chat_background,
            ColorKey::ChatBorder => &mut self.chat_border,
            ColorKey::ChatShadow => &mut self.chat_shadow,
            ColorKey::InputBackground => &mut self.input_background,
            ColorKey::InputText => &mut self.input_text,
            ColorKey::InputBorder => &mut self.input_border,
            ColorKey::InputPlaceholder => &mut self.input_placeholder,
            ColorKey::PrimaryButtonBackground => &mut self.primary_button_background,
            ColorKey::PrimaryButtonText => &mut self.primary_button_text,
            ColorKey::PrimaryButtonBorder => &mut self.primary_button_border,
            ColorKey::SecondaryButtonBackground => &mut self.secondary_button_background,
            ColorKey::SecondaryButtonText => &mut self.secondary_button_text,
            ColorKey::SecondaryButtonBorder => &mut self.secondary_button_border,
            ColorKey::AccentColor => &mut self.accent_color,
            ColorKey::LinkColor => &mut self.link_color,
            ColorKey::ErrorColor => &mut self.error_color,
            ColorKey::SuccessColor => &mut self.success_color,
            ColorKey::WarningColor => &mut self.warning_color,
        };
        *slot = value.into();
    }

    /// Iterate over `(key, value)` pairs in canonical field order
    pub fn iter(&self) -> impl Iterator<Item = (ColorKey, &str)> + '_ {
        ColorKey::ALL.iter().map(move |key| (*key, self.get(*key)))
    }
}

/// Visual grouping of color roles, used for export section headers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorGroup {
    BotMessage,
    UserMessage,
    ChatInterface,
    InputArea,
    Buttons,
    Accent,
}

impl ColorGroup {
    pub fn title(&self) -> &'static str {
        match self {
            ColorGroup::BotMessage => "Bot Message Colors",
            ColorGroup::UserMessage => "User Message Colors",
            ColorGroup::ChatInterface => "Chat Interface Colors",
            ColorGroup::InputArea => "Input Area Colors",
            ColorGroup::Buttons => "Button Colors",
            ColorGroup::Accent => "Accent Colors",
        }
    }
}

/// Name of a single [`ThemeColors`] field
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ColorKey {
    BotMessageBackground,
    BotMessageText,
    BotMessageBorder,
    UserMessageBackground,
    UserMessageText,
    UserMessageBorder,
    ChatBackground,
    ChatBorder,
    ChatShadow,
    InputBackground,
    InputText,
    InputBorder,
    InputPlaceholder,
    PrimaryButtonBackground,
    PrimaryButtonText,
    PrimaryButtonBorder,
    SecondaryButtonBackground,
    SecondaryButtonText,
    SecondaryButtonBorder,
    AccentColor,
    LinkColor,
    ErrorColor,
    SuccessColor,
    WarningColor,
}

impl ColorKey {
    /// All keys in canonical field order
    pub const ALL: [ColorKey; 24] = [
        ColorKey::BotMessageBackground,
        ColorKey::BotMessageText,
        ColorKey::BotMessageBorder,
        ColorKey::UserMessageBackground,
        ColorKey::UserMessageText,
        ColorKey::UserMessageBorder,
        ColorKey::ChatBackground,
        ColorKey::ChatBorder,
        ColorKey::ChatShadow,
        ColorKey::InputBackground,
        ColorKey::InputText,
        ColorKey::InputBorder,
        ColorKey::InputPlaceholder,
        ColorKey::PrimaryButtonBackground,
        ColorKey::PrimaryButtonText,
        ColorKey::PrimaryButtonBorder,
        ColorKey::SecondaryButtonBackground,
        ColorKey::SecondaryButtonText,
        ColorKey::SecondaryButtonBorder,
        ColorKey::AccentColor,
        ColorKey::LinkColor,
        ColorKey::ErrorColor,
        ColorKey::SuccessColor,
        ColorKey::WarningColor,
    ];

    /// Wire name, identical to the JSON field name
    pub fn as_str(&self) -> &'static str {
        match self {
            ColorKey::BotMessageBackground => "botMessageBackground",
            ColorKey::BotMessageText => "botMessageText",
            ColorKey::BotMessageBorder => "botMessageBorder",
            ColorKey::UserMessageBackground => "userMessageBackground",
            ColorKey::UserMessageText => "userMessageText",
            ColorKey::UserMessageBorder => "userMessageBorder",
            ColorKey::ChatBackground => "chatBackground",
            ColorKey::ChatBorder => "chatBorder",
            ColorKey::ChatShadow => "chatShadow",
            ColorKey::InputBackground => "inputBackground",
            ColorKey::InputText => "inputText",
            ColorKey::InputBorder => "inputBorder",
            ColorKey::InputPlaceholder => "inputPlaceholder",
            ColorKey::PrimaryButtonBackground => "primaryButtonBackground",
            ColorKey::PrimaryButtonText => "primaryButtonText",
            ColorKey::PrimaryButtonBorder => "primaryButtonBorder",
            ColorKey::SecondaryButtonBackground => "secondaryButtonBackground",
            ColorKey::SecondaryButtonText => "secondaryButtonText",
            ColorKey::SecondaryButtonBorder => "secondaryButtonBorder",
            ColorKey::AccentColor => "accentColor",
            ColorKey::LinkColor => "linkColor",
            ColorKey::ErrorColor => "errorColor",
            ColorKey::SuccessColor => "successColor",
            ColorKey::WarningColor => "warningColor",
        }
    }

    /// Variable stem shared by the CSS and SCSS exports (`--mcs-<stem>`, `$mcs-<stem>`)
    pub fn variable_stem(&self) -> &'static str {
        match self {
            ColorKey::BotMessageBackground => "bot-message-bg",
            ColorKey::BotMessageText => "bot-message-text",
            ColorKey::BotMessageBorder => "bot-message-border",
            ColorKey::UserMessageBackground => "user-message-bg",
            ColorKey::UserMessageText => "user-message-text",
            ColorKey::UserMessageBorder => "user-message-border",
            ColorKey::ChatBackground => "chat-bg",
            ColorKey::ChatBorder => "chat-border",
            ColorKey::ChatShadow => "chat-shadow",
            ColorKey::InputBackground => "input-bg",
            ColorKey::InputText => "input-text",
            ColorKey::InputBorder => "input-border",
            ColorKey::InputPlaceholder => "input-placeholder",
            ColorKey::PrimaryButtonBackground => "primary-btn-bg",
            ColorKey::PrimaryButtonText => "primary-btn-text",
            ColorKey::PrimaryButtonBorder => "primary-btn-border",
            ColorKey::SecondaryButtonBackground => "secondary-btn-bg",
            ColorKey::SecondaryButtonText => "secondary-btn-text",
            ColorKey::SecondaryButtonBorder => "secondary-btn-border",
            ColorKey::AccentColor => "accent-color",
            ColorKey::LinkColor => "link-color",
            ColorKey::ErrorColor => "error-color",
            ColorKey::SuccessColor => "success-color",
            ColorKey::WarningColor => "warning-color",
        }
    }

    pub fn group(&self) -> ColorGroup {
        match self {
            ColorKey::BotMessageBackground | ColorKey::BotMessageText | ColorKey::BotMessageBorder => {
                ColorGroup::BotMessage
            }
            ColorKey::UserMessageBackground
            | ColorKey::UserMessageText
            | ColorKey::UserMessageBorder => ColorGroup::UserMessage,
            ColorKey::ChatBackground | ColorKey::ChatBorder | ColorKey::ChatShadow => {
                ColorGroup::ChatInterface
            }
            ColorKey::InputBackground
            | ColorKey::InputText
            | ColorKey::InputBorder
            | ColorKey::InputPlaceholder => ColorGroup::InputArea,
            ColorKey::PrimaryButtonBackground
            | ColorKey::PrimaryButtonText
            | ColorKey::PrimaryButtonBorder
            | ColorKey::SecondaryButtonBackground
            | ColorKey::SecondaryButtonText
            | ColorKey::SecondaryButtonBorder => ColorGroup::Buttons,
            ColorKey::AccentColor
            | ColorKey::LinkColor
            | ColorKey::ErrorColor
            | ColorKey::SuccessColor
            | ColorKey::WarningColor => ColorGroup::Accent,
        }
    }

    /// Human-readable label for pickers and listings
    pub fn label(&self) -> &'static str {
        match self {
            ColorKey::BotMessageBackground => "Bot Message Background",
            ColorKey::BotMessageText => "Bot Message Text",
            ColorKey::BotMessageBorder => "Bot Message Border",
            ColorKey::UserMessageBackground => "User Message Background",
            ColorKey::UserMessageText => "User Message Text",
            ColorKey::UserMessageBorder => "User Message Border",
            ColorKey::ChatBackground => "Chat Background",
            ColorKey::ChatBorder => "Chat Border",
            ColorKey::ChatShadow => "Chat Shadow",
            ColorKey::InputBackground => "Input Background",
            ColorKey::InputText => "Input Text",
            ColorKey::InputBorder => "Input Border",
            ColorKey::InputPlaceholder => "Input Placeholder",
            ColorKey::PrimaryButtonBackground => "Primary Button Background",
            ColorKey::PrimaryButtonText => "Primary Button Text",
            ColorKey::PrimaryButtonBorder => "Primary Button Border",
            ColorKey::SecondaryButtonBackground => "Secondary Button Background",
            ColorKey::SecondaryButtonText => "Secondary Button Text",
            ColorKey::SecondaryButtonBorder => "Secondary Button Border",
            ColorKey::AccentColor => "Accent",
            ColorKey::LinkColor => "Link",
            ColorKey::ErrorColor => "Error",
            ColorKey::SuccessColor => "Success",
            ColorKey::WarningColor => "Warning",
        }
    }
}

impl fmt::Display for ColorKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ColorKey {
    type Err = ThemeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ColorKey::ALL
            .iter()
            .copied()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| ThemeError::UnknownColorKey(s.to_string()))
    }
}

/// A named, complete palette
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Theme {
    pub id: String,
    pub name: String,
    pub description: String,
    pub category: ThemeCategory,
    pub colors: ThemeColors,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_custom: bool,
}

impl Theme {
    /// File-name friendly form of the theme name ("Ocean Blue" -> "ocean-blue")
    pub fn slug(&self) -> String {
        self.name
            .to_lowercase()
            .split_whitespace()
            .collect::<Vec<_>>()
            .join("-")
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t.eq_ignore_ascii_case(tag))
    }
}

/// Check for `#rgb` or `#rrggbb` notation.
///
/// Only used to warn about suspicious input; color values are otherwise stored verbatim.
pub fn is_hex_color(value: &str) -> bool {
    let Some(hex) = value.strip_prefix('#') else {
        return false;
    };
    (hex.len() == 3 || hex.len() == 6) && hex.chars().all(|c| c.is_ascii_hexdigit())
}
