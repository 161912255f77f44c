//! Chat widget style options
//!
//! A flat key/value map consumed by the preview widget and the raw JSON/HTML
//! exports. It is a second representation of visual intent next to
//! [`ThemeColors`](crate::theme::ThemeColors): theme selection pushes values into it
//! through [`project_theme_to_style_options`], direct edits never flow back.

mod projection;

pub use projection::{project_theme_to_style_options, STYLE_PROJECTION};

use crate::theme::ThemeColors;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A single style option value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StyleValue {
    Bool(bool),
    Number(serde_json::Number),
    Text(String),
}

impl StyleValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            StyleValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            StyleValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            StyleValue::Number(n) => n.as_f64(),
            _ => None,
        }
    }

    /// Parse CLI/user text: `true`/`false`, numbers, anything else as text
    pub fn parse_loose(raw: &str) -> Self {
        match raw {
            "true" => return StyleValue::Bool(true),
            "false" => return StyleValue::Bool(false),
            _ => {}
        }
        if let Ok(i) = raw.parse::<i64>() {
            return StyleValue::Number(i.into());
        }
        if let Some(n) = raw.parse::<f64>().ok().and_then(serde_json::Number::from_f64) {
            return StyleValue::Number(n);
        }
        StyleValue::Text(raw.to_string())
    }
}

impl fmt::Display for StyleValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StyleValue::Bool(b) => write!(f, "{}", b),
            StyleValue::Number(n) => write!(f, "{}", n),
            StyleValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<bool> for StyleValue {
    fn from(value: bool) -> Self {
        StyleValue::Bool(value)
    }
}

impl From<i32> for StyleValue {
    fn from(value: i32) -> Self {
        StyleValue::Number(value.into())
    }
}

impl From<i64> for StyleValue {
    fn from(value: i64) -> Self {
        StyleValue::Number(value.into())
    }
}

impl From<&str> for StyleValue {
    fn from(value: &str) -> Self {
        StyleValue::Text(value.to_string())
    }
}

impl From<String> for StyleValue {
    fn from(value: String) -> Self {
        StyleValue::Text(value)
    }
}

/// Flattened style surface of the chat widget
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StyleOptions(BTreeMap<String, StyleValue>);

impl Default for StyleOptions {
    fn default() -> Self {
        let mut options = Self::empty();

        // General
        options.set("accent", "#0078D4");
        options.set("backgroundColor", "#FFFFFF");
        options.set("primaryFont", "Segoe UI");
        options.set("monospaceFont", "Consolas");
        options.set("rootHeight", "100%");
        options.set("rootWidth", "100%");
        options.set("subtleColor", "#767676");

        // Send box
        options.set("sendBoxBackground", "#FFFFFF");
        options.set("sendBoxButtonColor", "#0078D4");
        options.set("sendBoxButtonColorOnHover", "#005A9E");
        options.set("sendBoxTextColor", "#323130");
        options.set("sendBoxPlaceholderColor", "#767676");
        options.set("sendBoxBorderTop", "solid 1px #E6E6E6");
        options.set("sendBoxHeight", 40);
        options.set("hideUploadButton", false);

        // Avatars
        options.set("avatarSize", 40);
        options.set("avatarBorderRadius", "50%");
        options.set("botAvatarBackgroundColor", "#0078D4");
        options.set("botAvatarImage", "");
        options.set("botAvatarInitials", "BOT");
        options.set("userAvatarBackgroundColor", "#F3F2F1");
        options.set("userAvatarImage", "");
        options.set("userAvatarInitials", "YOU");

        // Bubbles
        options.set("bubbleBorderRadius", 8);
        options.set("bubbleMinHeight", 40);
        options.set("bubbleBackground", "#FFFFFF");
        options.set("bubbleTextColor", "#323130");
        options.set("bubbleBorderColor", "#E1DFDD");
        options.set("bubbleFromUserBackground", "#F3F2F1");
        options.set("bubbleFromUserTextColor", "#323130");
        options.set("bubbleFromUserBorderColor", "#EDEBE9");
        options.set("bubbleFromUserBorderRadius", 8);

        // Suggested actions
        options.set("suggestedActionBackgroundColor", "#FFFFFF");
        options.set("suggestedActionBackgroundColorOnHover", "#F3F2F1");
        options.set("suggestedActionTextColor", "#0078D4");
        options.set("suggestedActionBorderColor", "#0078D4");
        options.set("suggestedActionBorderRadius", 4);
        options.set("suggestedActionBorderWidth", 1);
        options.set("suggestedActionLayout", "flow");

        // Advanced
        options.set("bubbleMessageMaxWidth", 480);
        options.set("bubbleMessageMinWidth", 120);
        options.set("paddingRegular", 10);
        options.set("fontSizeSmall", "70%");
        options.set("messageActivityWordBreak", "break-word");
        options.set("autoScrollSnapOnPage", false);
        options.set("emojiSet", true);

        options
    }
}

impl StyleOptions {
    /// Map without any baseline keys
    pub fn empty() -> Self {
        Self(BTreeMap::new())
    }

    /// Baseline options with a theme projected on top
    pub fn for_theme(colors: &ThemeColors) -> Self {
        let mut options = Self::default();
        options.apply_theme(colors);
        options
    }

    /// Set any key. Never fails; values are stored as given.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<StyleValue>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&StyleValue> {
        self.0.get(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<StyleValue> {
        self.0.remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &StyleValue)> + '_ {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Overwrite the theme-driven subset of keys, leaving everything else alone
    pub fn apply_theme(&mut self, colors: &ThemeColors) {
        self.merge(project_theme_to_style_options(colors));
    }

    /// Copy every key of `other` over this map
    pub fn merge(&mut self, other: StyleOptions) {
        self.0.extend(other.0);
    }

    /// Non-empty text value of a key
    pub fn color(&self, key: &str) -> Option<&str> {
        self.get(key)
            .and_then(StyleValue::as_str)
            .filter(|s| !s.is_empty())
    }

    /// Text value of a key, or `fallback` when missing or blank
    pub fn color_or<'a>(&'a self, key: &str, fallback: &'a str) -> &'a str {
        self.color(key).unwrap_or(fallback)
    }

    /// First non-empty text value along `keys`, or `fallback`
    pub fn lookup_chain<'a>(&'a self, keys: &[&str], fallback: &'a str) -> &'a str {
        keys.iter()
            .find_map(|key| self.color(key))
            .unwrap_or(fallback)
    }

    /// Pretty JSON with 2-space indentation
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::{find_theme, ColorKey};

    #[test]
    fn test_defaults_cover_widget_surface() {
        let options = StyleOptions::default();
        assert!(options.len() >= 40);
        assert_eq!(options.color("primaryFont"), Some("Segoe UI"));
        assert_eq!(options.get("hideUploadButton"), Some(&StyleValue::Bool(false)));
        assert_eq!(options.get("sendBoxHeight").and_then(StyleValue::as_f64), Some(40.0));
    }

    #[test]
    fn test_set_accepts_malformed_values() {
        let mut options = StyleOptions::default();
        options.set("accent", "definitely not a color");
        options.set("brandNewKey", 3);
        assert_eq!(options.color("accent"), Some("definitely not a color"));
        assert!(options.contains_key("brandNewKey"));
    }

    #[test]
    fn test_apply_theme_keeps_direct_edits_outside_projection() {
        let mut options = StyleOptions::default();
        options.set("primaryFont", "Georgia");
        options.set("avatarSize", 64);

        options.apply_theme(&find_theme("dark-mode").unwrap().colors);

        assert_eq!(options.color("primaryFont"), Some("Georgia"));
        assert_eq!(options.get("avatarSize").and_then(StyleValue::as_f64), Some(64.0));
        assert_eq!(options.color("backgroundColor"), Some("#202020"));
    }

    #[test]
    fn test_fallbacks() {
        let mut options = StyleOptions::empty();
        assert_eq!(options.color_or("bubbleBackground", "#EEE"), "#EEE");

        options.set("botMessageBackground", "#123");
        assert_eq!(
            options.lookup_chain(&["bubbleBackground", "botMessageBackground"], "#EEE"),
            "#123"
        );

        options.set("bubbleBackground", "");
        assert_eq!(options.color_or("bubbleBackground", "#EEE"), "#EEE");
    }

    #[test]
    fn test_parse_loose() {
        assert_eq!(StyleValue::parse_loose("true"), StyleValue::Bool(true));
        assert_eq!(StyleValue::parse_loose("14"), StyleValue::from(14));
        assert_eq!(StyleValue::parse_loose("#fff"), StyleValue::from("#fff"));
        assert_eq!(StyleValue::parse_loose("1.5").as_f64(), Some(1.5));
    }

    #[test]
    fn test_json_keeps_integer_numbers() {
        let mut options = StyleOptions::empty();
        options.set("fontSize", 14);
        options.set("hideUploadButton", true);
        let json = options.to_json_pretty().unwrap();
        assert_eq!(json, "{\n  \"fontSize\": 14,\n  \"hideUploadButton\": true\n}");

        let back: StyleOptions = serde_json::from_str(&json).unwrap();
        assert_eq!(back, options);
    }

    #[test]
    fn test_for_theme_layers_projection_over_defaults() {
        let theme = find_theme("dark-mode").unwrap();
        let options = StyleOptions::for_theme(&theme.colors);

        assert_eq!(options.color("accent"), Some(theme.colors.get(ColorKey::AccentColor)));
        assert_eq!(
            options.color("backgroundColor"),
            Some(theme.colors.get(ColorKey::ChatBackground))
        );
        assert_eq!(options.get("hideUploadButton"), StyleOptions::default().get("hideUploadButton"));
    }
}
