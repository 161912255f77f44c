//! Terminal palette derived from widget style options

use crate::style::StyleOptions;
use crossterm::style::Color;

/// Parse `#rgb` / `#rrggbb` into a true-color terminal color
pub fn parse_hex(value: &str) -> Option<Color> {
    let hex = value.trim().strip_prefix('#')?;
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let channel = |s: &str| u8::from_str_radix(s, 16).ok();
    match hex.len() {
        3 => {
            let mut digits = hex.chars().map(|c| c.to_string().repeat(2));
            Some(Color::Rgb {
                r: channel(&digits.next()?)?,
                g: channel(&digits.next()?)?,
                b: channel(&digits.next()?)?,
            })
        }
        6 => Some(Color::Rgb {
            r: channel(&hex[0..2])?,
            g: channel(&hex[2..4])?,
            b: channel(&hex[4..6])?,
        }),
        _ => None,
    }
}

fn resolve(style: &StyleOptions, keys: &[&str], fallback: &str) -> Color {
    parse_hex(style.lookup_chain(keys, fallback))
        .or_else(|| parse_hex(fallback))
        .unwrap_or(Color::Reset)
}

/// Colors the terminal preview paints with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub background: Color,
    pub bot_bubble: Color,
    pub bot_text: Color,
    pub user_bubble: Color,
    pub user_text: Color,
    pub send_box: Color,
    pub send_box_text: Color,
    pub send_button: Color,
    pub dim: Color,
}

impl Palette {
    /// Resolve every color along the same fallback chains the web preview uses
    pub fn from_style(style: &StyleOptions) -> Self {
        Self {
            background: resolve(style, &["backgroundColor"], "#FFFFFF"),
            bot_bubble: resolve(style, &["bubbleBackground", "botMessageBackground"], "#EBF3FC"),
            bot_text: resolve(style, &["bubbleTextColor", "botMessageTextColor"], "#0F6CBD"),
            user_bubble: resolve(
                style,
                &["bubbleFromUserBackground", "userMessageBackground"],
                "#F0F0F0",
            ),
            user_text: resolve(
                style,
                &["bubbleFromUserTextColor", "userMessageTextColor"],
                "#242424",
            ),
            send_box: resolve(style, &["sendBoxBackground"], "#FAFAFA"),
            send_box_text: resolve(style, &["sendBoxTextColor"], "#242424"),
            send_button: resolve(style, &["sendBoxButtonColor", "accent"], "#0F6CBD"),
            dim: resolve(style, &["subtleColor"], "#767676"),
        }
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::from_style(&StyleOptions::empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex() {
        assert_eq!(parse_hex("#0078D4"), Some(Color::Rgb { r: 0, g: 0x78, b: 0xD4 }));
        assert_eq!(parse_hex("#fff"), Some(Color::Rgb { r: 255, g: 255, b: 255 }));
        assert_eq!(parse_hex("rgba(0,0,0,0.1)"), None);
        assert_eq!(parse_hex("#12345"), None);
        assert_eq!(parse_hex("#GGGGGG"), None);
    }

    #[test]
    fn test_legacy_key_fallback() {
        let mut style = StyleOptions::empty();
        style.set("botMessageBackground", "#112233");
        let palette = Palette::from_style(&style);
        assert_eq!(palette.bot_bubble, Color::Rgb { r: 0x11, g: 0x22, b: 0x33 });

        style.set("bubbleBackground", "#445566");
        let palette = Palette::from_style(&style);
        assert_eq!(palette.bot_bubble, Color::Rgb { r: 0x44, g: 0x55, b: 0x66 });
    }

    #[test]
    fn test_send_button_falls_back_to_accent() {
        let mut style = StyleOptions::empty();
        style.set("accent", "#8E4EC6");
        assert_eq!(
            Palette::from_style(&style).send_button,
            Color::Rgb { r: 0x8E, g: 0x4E, b: 0xC6 }
        );
    }

    #[test]
    fn test_unparseable_value_uses_default() {
        let mut style = StyleOptions::empty();
        style.set("backgroundColor", "tomato");
        assert_eq!(Palette::from_style(&style).background, Color::Rgb { r: 255, g: 255, b: 255 });
    }
}
