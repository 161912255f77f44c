//! CSS custom properties and SCSS variables

use crate::theme::{ColorGroup, ColorKey, Theme, ThemeColors};

/// Keys in canonical order, split at group boundaries
fn grouped_keys() -> Vec<(ColorGroup, Vec<ColorKey>)> {
    let mut groups: Vec<(ColorGroup, Vec<ColorKey>)> = Vec::new();
    for key in ColorKey::ALL {
        match groups.last_mut() {
            Some((group, keys)) if *group == key.group() => keys.push(key),
            _ => groups.push((key.group(), vec![key])),
        }
    }
    groups
}

/// `:root { --mcs-*: ...; }` block, one declaration per color role
pub fn to_css(theme: &Theme, colors: &ThemeColors) -> String {
    let mut lines = vec![
        ":root {".to_string(),
        format!("  /* {} - {} */", theme.name, theme.description),
    ];

    for (group, keys) in grouped_keys() {
        lines.push("  ".to_string());
        lines.push(format!("  /* {} */", group.title()));
        for key in keys {
            lines.push(format!("  --mcs-{}: {};", key.variable_stem(), colors.get(key)));
        }
    }

    lines.push("}".to_string());
    lines.join("\n")
}

/// `$mcs-*: ...;` variables with `//` group headers
pub fn to_scss(theme: &Theme, colors: &ThemeColors) -> String {
    let mut lines = vec![format!("// {} - {}", theme.name, theme.description)];

    for (group, keys) in grouped_keys() {
        lines.push(String::new());
        lines.push(format!("// {}", group.title()));
        for key in keys {
            lines.push(format!("$mcs-{}: {};", key.variable_stem(), colors.get(key)));
        }
    }

    lines.join("\n")
}
