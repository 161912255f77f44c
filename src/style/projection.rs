//! Theme color → style option projection

use super::StyleOptions;
use crate::theme::{ColorKey, ThemeColors};

/// Which theme color feeds which style option.
///
/// One color may feed several options; the preview reads these keys directly, so
/// this table has to stay in step with what the widget understands.
pub const STYLE_PROJECTION: &[(&str, ColorKey)] = &[
    // Core widget properties
    ("accent", ColorKey::AccentColor),
    ("backgroundColor", ColorKey::ChatBackground),
    // Send box
    ("sendBoxBackground", ColorKey::InputBackground),
    ("sendBoxTextColor", ColorKey::InputText),
    ("sendBoxButtonColor", ColorKey::PrimaryButtonBackground),
    ("sendBoxButtonColorOnHover", ColorKey::PrimaryButtonBorder),
    ("sendBoxPlaceholderColor", ColorKey::InputPlaceholder),
    // Bot bubbles
    ("bubbleBackground", ColorKey::BotMessageBackground),
    ("bubbleTextColor", ColorKey::BotMessageText),
    ("bubbleBorderColor", ColorKey::BotMessageBorder),
    // User bubbles
    ("bubbleFromUserBackground", ColorKey::UserMessageBackground),
    ("bubbleFromUserTextColor", ColorKey::UserMessageText),
    ("bubbleFromUserBorderColor", ColorKey::UserMessageBorder),
    // Suggested actions
    ("suggestedActionBackgroundColor", ColorKey::SecondaryButtonBackground),
    ("suggestedActionBackgroundColorOnHover", ColorKey::AccentColor),
    ("suggestedActionBorderColor", ColorKey::SecondaryButtonBorder),
    ("suggestedActionTextColor", ColorKey::SecondaryButtonText),
    // Avatars
    ("botAvatarBackgroundColor", ColorKey::BotMessageBackground),
    ("userAvatarBackgroundColor", ColorKey::UserMessageBackground),
    ("subtleColor", ColorKey::InputPlaceholder),
    // Legacy message keys, still read as preview fallbacks
    ("botMessageBackground", ColorKey::BotMessageBackground),
    ("botMessageTextColor", ColorKey::BotMessageText),
    ("botMessageBorderColor", ColorKey::BotMessageBorder),
    ("userMessageBackground", ColorKey::UserMessageBackground),
    ("userMessageTextColor", ColorKey::UserMessageText),
    ("userMessageBorderColor", ColorKey::UserMessageBorder),
];

/// Values used when the palette leaves the source color blank
pub const PROJECTION_FALLBACKS: &[(&str, &str)] = &[("subtleColor", "#8A8886")];

/// Project a palette onto the theme-driven subset of style options
pub fn project_theme_to_style_options(colors: &ThemeColors) -> StyleOptions {
    let mut options = StyleOptions::empty();
    for (style_key, color_key) in STYLE_PROJECTION {
        let value = colors.get(*color_key);
        let fallback = PROJECTION_FALLBACKS
            .iter()
            .find(|(key, _)| key == style_key)
            .map(|(_, fallback)| *fallback);
        match fallback {
            Some(fallback) if value.trim().is_empty() => options.set(*style_key, fallback),
            _ => options.set(*style_key, value),
        }
    }
    options
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::{find_theme, list_themes};
    use std::collections::HashSet;

    #[test]
    fn test_projection_keys_unique() {
        let keys: HashSet<_> = STYLE_PROJECTION.iter().map(|(k, _)| *k).collect();
        assert_eq!(keys.len(), STYLE_PROJECTION.len());
    }

    #[test]
    fn test_projection_only_touches_table_keys() {
        for theme in list_themes() {
            let options = project_theme_to_style_options(&theme.colors);
            assert_eq!(options.len(), STYLE_PROJECTION.len());
            for (style_key, color_key) in STYLE_PROJECTION {
                assert_eq!(options.color(style_key), Some(theme.colors.get(*color_key)));
            }
        }
    }

    #[test]
    fn test_many_to_one_entries() {
        let colors = &find_theme("modern-purple").unwrap().colors;
        let options = project_theme_to_style_options(colors);

        assert_eq!(options.color("accent"), Some("#8E4EC6"));
        assert_eq!(options.color("suggestedActionBackgroundColorOnHover"), Some("#8E4EC6"));
        assert_eq!(options.color("bubbleBackground"), Some("#6264A7"));
        assert_eq!(options.color("botAvatarBackgroundColor"), Some("#6264A7"));
        assert_eq!(options.color("sendBoxPlaceholderColor"), Some("#767676"));
        assert_eq!(options.color("subtleColor"), Some("#767676"));
    }

    #[test]
    fn test_blank_placeholder_uses_subtle_fallback() {
        let mut colors = find_theme("ocean-blue").unwrap().colors.clone();
        colors.set(ColorKey::InputPlaceholder, "");
        let options = project_theme_to_style_options(&colors);

        assert_eq!(options.color("subtleColor"), Some("#8A8886"));
        assert_eq!(
            options.get("sendBoxPlaceholderColor").and_then(|v| v.as_str()),
            Some("")
        );
    }
}
