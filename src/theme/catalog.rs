//! Built-in theme catalog
//!
//! The catalog is built once per process and only handed out by reference.
//! Insertion order is display order; the first entry is the default selection.

use super::{Theme, ThemeCategory, ThemeColors};
use std::sync::OnceLock;

static CATALOG: OnceLock<Vec<Theme>> = OnceLock::new();

/// All built-in themes in display order
pub fn list_themes() -> &'static [Theme] {
    CATALOG.get_or_init(|| {
        vec![
            microsoft_default(),
            modern_purple(),
            dark_mode(),
            light_minimal(),
            teams_inspired(),
            ocean_blue(),
        ]
    })
}

/// Look up a theme by id. Unknown ids mean "no selection", not an error.
pub fn find_theme(id: &str) -> Option<&'static Theme> {
    list_themes().iter().find(|theme| theme.id == id)
}

/// The theme selected when nothing else has been chosen
pub fn default_theme() -> Option<&'static Theme> {
    list_themes().first()
}

/// Case-insensitive search over name, description and category.
/// A blank term returns the whole catalog.
pub fn search_themes(term: &str) -> Vec<&'static Theme> {
    let term = term.trim().to_lowercase();
    if term.is_empty() {
        return list_themes().iter().collect();
    }

    list_themes()
        .iter()
        .filter(|theme| {
            theme.name.to_lowercase().contains(&term)
                || theme.description.to_lowercase().contains(&term)
                || theme.category.as_str().contains(&term)
        })
        .collect()
}

fn tags(values: &[&str]) -> Vec<String> {
    values.iter().map(|t| t.to_string()).collect()
}

fn microsoft_default() -> Theme {
    Theme {
        id: "microsoft-default".to_string(),
        name: "Microsoft Default".to_string(),
        description: "Classic Microsoft brand colors with professional styling".to_string(),
        category: ThemeCategory::Default,
        colors: ThemeColors {
            bot_message_background: "#0078D4".into(),
            bot_message_text: "#FFFFFF".into(),
            bot_message_border: "#005A9E".into(),

            user_message_background: "#F3F2F1".into(),
            user_message_text: "#323130".into(),
            user_message_border: "#EDEBE9".into(),

            chat_background: "#FFFFFF".into(),
            chat_border: "#E1DFDD".into(),
            chat_shadow: "rgba(0, 0, 0, 0.1)".into(),

            input_background: "#FFFFFF".into(),
            input_text: "#323130".into(),
            input_border: "#8A8886".into(),
            input_placeholder: "#605E5C".into(),

            primary_button_background: "#0078D4".into(),
            primary_button_text: "#FFFFFF".into(),
            primary_button_border: "#005A9E".into(),
            secondary_button_background: "#F3F2F1".into(),
            secondary_button_text: "#323130".into(),
            secondary_button_border: "#8A8886".into(),

            accent_color: "#0078D4".into(),
            link_color: "#106EBE".into(),
            error_color: "#D13438".into(),
            success_color: "#107C10".into(),
            warning_color: "#FF8C00".into(),
        },
        tags: tags(&["microsoft", "professional", "blue", "corporate"]),
        is_custom: false,
    }
}

fn modern_purple() -> Theme {
    Theme {
        id: "modern-purple".to_string(),
        name: "Modern Purple".to_string(),
        description: "Contemporary purple theme with gradient accents".to_string(),
        category: ThemeCategory::Modern,
        colors: ThemeColors {
            bot_message_background: "#6264A7".into(),
            bot_message_text: "#FFFFFF".into(),
            bot_message_border: "#464775".into(),

            user_message_background: "#F8F7FF".into(),
            user_message_text: "#2D2D30".into(),
            user_message_border: "#E8E6FF".into(),

            chat_background: "#FAFAFA".into(),
            chat_border: "#E5E5E5".into(),
            chat_shadow: "rgba(98, 100, 167, 0.15)".into(),

            input_background: "#FFFFFF".into(),
            input_text: "#2D2D30".into(),
            input_border: "#6264A7".into(),
            input_placeholder: "#767676".into(),

            primary_button_background: "#6264A7".into(),
            primary_button_text: "#FFFFFF".into(),
            primary_button_border: "#464775".into(),
            secondary_button_background: "#F8F7FF".into(),
            secondary_button_text: "#6264A7".into(),
            secondary_button_border: "#6264A7".into(),

            accent_color: "#8E4EC6".into(),
            link_color: "#6264A7".into(),
            error_color: "#E74856".into(),
            success_color: "#10893E".into(),
            warning_color: "#F7630C".into(),
        },
        tags: tags(&["modern", "purple", "gradient", "contemporary"]),
        is_custom: false,
    }
}

fn dark_mode() -> Theme {
    Theme {
        id: "dark-mode".to_string(),
        name: "Dark Professional".to_string(),
        description: "Sleek dark theme optimized for low-light environments".to_string(),
        category: ThemeCategory::Dark,
        colors: ThemeColors {
            bot_message_background: "#4A90E2".into(),
            bot_message_text: "#FFFFFF".into(),
            bot_message_border: "#357ABD".into(),

            user_message_background: "#333333".into(),
            user_message_text: "#F5F5F5".into(),
            user_message_border: "#4A4A4A".into(),

            chat_background: "#202020".into(),
            chat_border: "#404040".into(),
            chat_shadow: "rgba(0, 0, 0, 0.3)".into(),

            input_background: "#2A2A2A".into(),
            input_text: "#F5F5F5".into(),
            input_border: "#4A90E2".into(),
            input_placeholder: "#B3B3B3".into(),

            primary_button_background: "#4A90E2".into(),
            primary_button_text: "#FFFFFF".into(),
            primary_button_border: "#357ABD".into(),
            secondary_button_background: "#333333".into(),
            secondary_button_text: "#F5F5F5".into(),
            secondary_button_border: "#666666".into(),

            accent_color: "#4A90E2".into(),
            link_color: "#5BA0F2".into(),
            error_color: "#FF6B6B".into(),
            success_color: "#4ECDC4".into(),
            warning_color: "#FFE66D".into(),
        },
        tags: tags(&["dark", "professional", "blue", "night-mode"]),
        is_custom: false,
    }
}

fn light_minimal() -> Theme {
    Theme {
        id: "light-minimal".to_string(),
        name: "Light Minimal".to_string(),
        description: "Clean and minimal light theme with subtle accents".to_string(),
        category: ThemeCategory::Light,
        colors: ThemeColors {
            bot_message_background: "#2E8B57".into(),
            bot_message_text: "#FFFFFF".into(),
            bot_message_border: "#228B22".into(),

            user_message_background: "#F8F9FA".into(),
            user_message_text: "#212529".into(),
            user_message_border: "#E9ECEF".into(),

            chat_background: "#FBFBFB".into(),
            chat_border: "#F0F0F0".into(),
            chat_shadow: "rgba(0, 0, 0, 0.05)".into(),

            input_background: "#FFFFFF".into(),
            input_text: "#212529".into(),
            input_border: "#CED4DA".into(),
            input_placeholder: "#6C757D".into(),

            primary_button_background: "#2E8B57".into(),
            primary_button_text: "#FFFFFF".into(),
            primary_button_border: "#228B22".into(),
            secondary_button_background: "#F8F9FA".into(),
            secondary_button_text: "#495057".into(),
            secondary_button_border: "#CED4DA".into(),

            accent_color: "#2E8B57".into(),
            link_color: "#20C997".into(),
            error_color: "#DC3545".into(),
            success_color: "#28A745".into(),
            warning_color: "#FFC107".into(),
        },
        tags: tags(&["light", "minimal", "clean", "green", "nature"]),
        is_custom: false,
    }
}

fn teams_inspired() -> Theme {
    Theme {
        id: "teams-inspired".to_string(),
        name: "Teams Inspired".to_string(),
        description: "Inspired by Microsoft Teams with familiar colors".to_string(),
        category: ThemeCategory::Default,
        colors: ThemeColors {
            bot_message_background: "#6264A7".into(),
            bot_message_text: "#FFFFFF".into(),
            bot_message_border: "#464775".into(),

            user_message_background: "#F3F2F1".into(),
            user_message_text: "#323130".into(),
            user_message_border: "#EDEBE9".into(),

            chat_background: "#FAF9F8".into(),
            chat_border: "#EDEBE9".into(),
            chat_shadow: "rgba(0, 0, 0, 0.08)".into(),

            input_background: "#FFFFFF".into(),
            input_text: "#323130".into(),
            input_border: "#8A8886".into(),
            input_placeholder: "#605E5C".into(),

            primary_button_background: "#6264A7".into(),
            primary_button_text: "#FFFFFF".into(),
            primary_button_border: "#464775".into(),
            secondary_button_background: "#F3F2F1".into(),
            secondary_button_text: "#323130".into(),
            secondary_button_border: "#8A8886".into(),

            accent_color: "#6264A7".into(),
            link_color: "#6264A7".into(),
            error_color: "#C4314B".into(),
            success_color: "#0F7B0F".into(),
            warning_color: "#F7630C".into(),
        },
        tags: tags(&["teams", "microsoft", "collaboration", "purple", "familiar"]),
        is_custom: false,
    }
}

fn ocean_blue() -> Theme {
    Theme {
        id: "ocean-blue".to_string(),
        name: "Ocean Blue".to_string(),
        description: "Calming ocean-inspired blue theme with wave gradients".to_string(),
        category: ThemeCategory::Modern,
        colors: ThemeColors {
            bot_message_background: "#0078D4".into(),
            bot_message_text: "#FFFFFF".into(),
            bot_message_border: "#00396A".into(),

            user_message_background: "#F0F6FF".into(),
            user_message_text: "#1B3A57".into(),
            user_message_border: "#D6E8FF".into(),

            chat_background: "#F5F9FD".into(),
            chat_border: "#E3F2FD".into(),
            chat_shadow: "rgba(0, 120, 212, 0.1)".into(),

            input_background: "#FFFFFF".into(),
            input_text: "#1B3A57".into(),
            input_border: "#0078D4".into(),
            input_placeholder: "#5A7C95".into(),

            primary_button_background: "#0078D4".into(),
            primary_button_text: "#FFFFFF".into(),
            primary_button_border: "#00396A".into(),
            secondary_button_background: "#F0F6FF".into(),
            secondary_button_text: "#0078D4".into(),
            secondary_button_border: "#0078D4".into(),

            accent_color: "#0078D4".into(),
            link_color: "#106EBE".into(),
            error_color: "#E74856".into(),
            success_color: "#0E7A0B".into(),
            warning_color: "#F7630C".into(),
        },
        tags: tags(&["ocean", "blue", "calming", "gradient", "water"]),
        is_custom: false,
    }
}
