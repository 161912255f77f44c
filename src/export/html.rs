//! Standalone HTML pages for a theme
//!
//! - demo: renders the widget against canned activities, opens straight from disk
//! - canvas: production custom canvas that fetches a Direct Line token at runtime
//! - embed: minimal page carrying the raw style options map

use super::ExportError;
use crate::preview::TOKEN_ENDPOINT_PLACEHOLDER;
use crate::style::StyleOptions;
use crate::theme::ThemeColors;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Token placeholder left in the embed page when no endpoint is known
pub const EMBED_TOKEN_PLACEHOLDER: &str = "{INJECT_TOKENENDPOINT}";

fn default_initials() -> String {
    "BOT".to_string()
}

/// Colors and branding baked into the demo and canvas pages
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanvasConfig {
    pub primary: String,
    pub accent: String,
    pub bot_message: String,
    pub user_message: String,
    pub background: String,
    pub send_box: String,
    #[serde(default = "default_initials")]
    pub bot_avatar_initials: String,
}

impl CanvasConfig {
    /// Derive the page config from an effective palette
    pub fn from_colors(colors: &ThemeColors, bot_avatar_initials: impl Into<String>) -> Self {
        Self {
            primary: colors.primary_button_background.clone(),
            accent: colors.accent_color.clone(),
            bot_message: colors.bot_message_background.clone(),
            user_message: colors.user_message_background.clone(),
            background: colors.chat_background.clone(),
            send_box: colors.primary_button_background.clone(),
            bot_avatar_initials: bot_avatar_initials.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HtmlVariant {
    Demo,
    #[default]
    Canvas,
}

impl HtmlVariant {
    pub fn default_file_name(&self) -> &'static str {
        match self {
            HtmlVariant::Demo => "copilot-studio-theme-demo.html",
            HtmlVariant::Canvas => "copilot-studio-canvas.html",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            HtmlVariant::Demo => "Copilot Studio Theme Demo",
            HtmlVariant::Canvas => "Copilot Studio Canvas Preview",
        }
    }
}

impl fmt::Display for HtmlVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HtmlVariant::Demo => write!(f, "demo"),
            HtmlVariant::Canvas => write!(f, "canvas"),
        }
    }
}

impl FromStr for HtmlVariant {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "demo" => Ok(HtmlVariant::Demo),
            "canvas" => Ok(HtmlVariant::Canvas),
            _ => Err(ExportError::UnsupportedVariant(s.to_string())),
        }
    }
}

/// Escape for a single-quoted JavaScript string inside a `<script>` block
fn js_string(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('\'', "\\'")
        .replace('\n', "\\n")
        .replace('\r', "\\r")
        .replace('\u{2028}', "\\u2028")
        .replace('\u{2029}', "\\u2029")
        .replace("</", "<\\/")
}

fn html_text(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Color values land in CSS declarations; cut anything that could close the rule
fn css_value(value: &str) -> String {
    value
        .chars()
        .filter(|c| !matches!(c, ';' | '{' | '}' | '<' | '>'))
        .collect()
}

fn fill(template: &str, config: &CanvasConfig) -> String {
    template
        .replace("{{primary}}", &css_value(&config.primary))
        .replace("{{accent}}", &css_value(&config.accent))
        .replace("{{background}}", &css_value(&config.background))
        .replace("{{initials_html}}", &html_text(&config.bot_avatar_initials))
        .replace("{{primary_js}}", &js_string(&config.primary))
        .replace("{{accent_js}}", &js_string(&config.accent))
        .replace("{{bot_message_js}}", &js_string(&config.bot_message))
        .replace("{{user_message_js}}", &js_string(&config.user_message))
        .replace("{{background_js}}", &js_string(&config.background))
        .replace("{{send_box_js}}", &js_string(&config.send_box))
        .replace("{{initials_js}}", &js_string(&config.bot_avatar_initials))
}

/// Demo page with three canned activities; needs no network access besides the CDN
pub fn demo_html(config: &CanvasConfig) -> String {
    fill(DEMO_TEMPLATE, config)
}

/// Production canvas. Without an endpoint the page keeps
/// [`TOKEN_ENDPOINT_PLACEHOLDER`] and refuses to start until it is replaced;
/// with one, the placeholder appears nowhere in the page.
pub fn canvas_html(config: &CanvasConfig, token_endpoint: Option<&str>) -> String {
    let endpoint = token_endpoint.map(str::trim).filter(|e| !e.is_empty());
    let (endpoint, guard, step) = match endpoint {
        Some(endpoint) => (
            endpoint.to_string(),
            String::new(),
            "Update tokenEndpointString in this HTML file".to_string(),
        ),
        None => (
            TOKEN_ENDPOINT_PLACEHOLDER.to_string(),
            format!(
                "\n                if (tokenEndpointString === '{0}') {{\n                    throw new Error('Please replace {0} with your actual Copilot Studio token endpoint.');\n                }}\n",
                TOKEN_ENDPOINT_PLACEHOLDER
            ),
            format!("Replace {} in this HTML file", TOKEN_ENDPOINT_PLACEHOLDER),
        ),
    };

    fill(CANVAS_TEMPLATE, config)
        .replace("{{endpoint_guard}}", &guard)
        .replace("{{endpoint_step}}", &html_text(&step))
        .replace("{{token_endpoint_js}}", &js_string(&endpoint))
}

pub fn render_html(variant: HtmlVariant, config: &CanvasConfig, token_endpoint: Option<&str>) -> String {
    match variant {
        HtmlVariant::Demo => demo_html(config),
        HtmlVariant::Canvas => canvas_html(config, token_endpoint),
    }
}

/// Raw style options as pretty JSON
pub fn style_options_json(style: &StyleOptions) -> Result<String, ExportError> {
    Ok(style.to_json_pretty()?)
}

/// Minimal embed page rendering the widget with `style` as-is
pub fn embed_html(style: &StyleOptions, token_endpoint: Option<&str>) -> Result<String, ExportError> {
    let endpoint = token_endpoint
        .map(str::trim)
        .filter(|e| !e.is_empty())
        .unwrap_or(EMBED_TOKEN_PLACEHOLDER);
    let options = style.to_json_pretty()?.replace("</", "<\\/");

    Ok(EMBED_TEMPLATE
        .replace("{{token_endpoint_js}}", &js_string(endpoint))
        .replace("{{style_options}}", &options))
}

const EMBED_TEMPLATE: &str = r##"<!doctype html>
<html lang="en">
  <head>
    <title>Contoso Sample Web Chat</title>
    <script crossorigin="anonymous" src="https://cdn.botframework.com/botframework-webchat/latest/webchat.js"></script>
  </head>
  <body>
    <div id="webchat"></div>
    <script>
      const tokenEndpoint = '{{token_endpoint_js}}';
      const styleOptions = {{style_options}};
      (async function () {
        const response = await fetch(tokenEndpoint);
        if (!response.ok) throw new Error('Failed to retrieve Direct Line token.');
        const { token } = await response.json();
        const directLine = window.WebChat.createDirectLine({ token });
        window.WebChat.renderWebChat({ directLine, styleOptions }, document.getElementById('webchat'));
      })();
    </script>
  </body>
</html>"##;

const DEMO_TEMPLATE: &str = r##"<!doctype html>
<html lang="en">
<head>
    <title>Copilot Studio Theme Demo</title>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">

    <style>
        html, body {
            height: 100%;
            margin: 0;
            padding: 0;
            font-family: 'Segoe UI', system-ui, -apple-system, sans-serif;
        }

        body {
            background: {{background}};
        }

        #banner {
            align-items: center;
            background: linear-gradient(135deg, {{primary}} 0%, {{accent}} 100%);
            display: flex;
            height: 60px;
            box-shadow: 0 2px 8px rgba(0, 0, 0, 0.1);
            color: white;
            padding: 0 20px;
        }

        .agent-logo {
            width: 32px;
            height: 32px;
            background: {{accent}};
            border-radius: 50%;
            display: flex;
            align-items: center;
            justify-content: center;
            color: white;
            font-weight: bold;
            font-size: 14px;
            margin-right: 12px;
            border: 2px solid rgba(255, 255, 255, 0.2);
        }

        #webchat {
            height: calc(100% - 60px);
            width: 100%;
        }
    </style>
</head>

<body>
    <div>
        <div id="banner">
            <div class="agent-logo">{{initials_html}}</div>
            <h1>Copilot Studio Theme Demo</h1>
        </div>
        <div id="webchat" role="main"></div>
    </div>

    <script crossorigin src="https://unpkg.com/react@18/umd/react.production.min.js"></script>
    <script crossorigin src="https://unpkg.com/react-dom@18/umd/react-dom.production.min.js"></script>
    <script crossorigin src="https://cdn.botframework.com/botframework-webchat/latest/webchat.js"></script>

    <script>
        const mockActivities = [
            {
                type: 'message',
                from: { id: 'bot', name: 'Copilot Studio Bot' },
                text: 'Hello! I\'m your Copilot Studio assistant. This is a demo of your custom theme.',
                timestamp: new Date().toISOString()
            },
            {
                type: 'message',
                from: { id: 'user', name: 'User' },
                text: 'The colors look great! Can you tell me more about the theme?',
                timestamp: new Date().toISOString()
            },
            {
                type: 'message',
                from: { id: 'bot', name: 'Copilot Studio Bot' },
                text: 'This theme uses your custom color palette: Primary ({{primary_js}}), Accent ({{accent_js}}), and coordinated message colors. The design follows Microsoft Copilot Studio guidelines for optimal user experience.',
                timestamp: new Date().toISOString()
            }
        ];

        const mockDirectLine = {
            activity$: {
                subscribe: () => {},
                next: () => {}
            },
            postActivity: () => ({ subscribe: () => {} }),
            end: () => {}
        };

        const styleOptions = {
            primaryColor: '{{primary_js}}',
            accentColor: '{{accent_js}}',
            bubbleBackground: '{{bot_message_js}}',
            bubbleFromUserBackground: '{{user_message_js}}',
            bubbleFromUserTextColor: '#FFFFFF',
            bubbleTextColor: '#323130',
            botAvatarBackgroundColor: '{{primary_js}}',
            botAvatarInitials: '{{initials_js}}',
            userAvatarBackgroundColor: '{{accent_js}}',
            backgroundColor: '{{background_js}}',
            sendBoxBackground: '{{background_js}}',
            sendBoxButtonColor: '{{send_box_js}}',
            sendBoxButtonColorOnFocus: '{{accent_js}}',
            sendBoxButtonColorOnHover: '{{accent_js}}',
            sendBoxTextColor: '#323130',
            fontFamily: "'Segoe UI', system-ui, -apple-system, sans-serif",
            fontSize: 14,
            hideUploadButton: true
        };

        WebChat.renderWebChat(
            {
                directLine: mockDirectLine,
                styleOptions: styleOptions,
                activities: mockActivities
            },
            document.getElementById('webchat')
        );
    </script>
</body>
</html>"##;

const CANVAS_TEMPLATE: &str = r##"<!doctype html>
<html lang="en">
<head>
    <title>Copilot Studio Custom Canvas</title>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">

    <style>
        html, body {
            height: 100%;
            margin: 0;
            padding: 0;
            font-family: 'Segoe UI', system-ui, -apple-system, sans-serif;
        }

        body {
            background: {{background}};
        }

        h1 {
            color: white;
            font-family: 'Segoe UI', system-ui, sans-serif;
            font-size: 18px;
            line-height: 24px;
            margin: 0;
            padding: 0 20px;
            font-weight: 600;
        }

        #banner {
            align-items: center;
            background: linear-gradient(135deg, {{primary}} 0%, {{accent}} 100%);
            display: flex;
            height: 60px;
            box-shadow: 0 2px 8px rgba(0, 0, 0, 0.1);
        }

        #webchat {
            height: calc(100% - 60px);
            overflow: hidden;
            position: fixed;
            top: 60px;
            width: 100%;
            background: {{background}};
        }

        .agent-logo {
            width: 32px;
            height: 32px;
            background: {{accent}};
            border-radius: 50%;
            display: flex;
            align-items: center;
            justify-content: center;
            color: white;
            font-weight: bold;
            font-size: 14px;
            margin-right: 12px;
            border: 2px solid rgba(255, 255, 255, 0.2);
        }

        .loading {
            display: flex;
            align-items: center;
            justify-content: center;
            height: 100%;
            flex-direction: column;
            color: {{primary}};
        }

        .spinner {
            width: 40px;
            height: 40px;
            border: 4px solid #f3f3f3;
            border-top: 4px solid {{primary}};
            border-radius: 50%;
            animation: spin 1s linear infinite;
            margin-bottom: 16px;
        }

        @keyframes spin {
            0% { transform: rotate(0deg); }
            100% { transform: rotate(360deg); }
        }

        .error {
            padding: 20px;
            text-align: center;
            color: #d13438;
            background: #fef7f7;
            border: 1px solid #fecaca;
            border-radius: 8px;
            margin: 20px;
        }
    </style>
</head>

<body>
    <div>
        <div id="banner">
            <div class="agent-logo">{{initials_html}}</div>
            <h1>Copilot Studio Agent</h1>
        </div>
        <div id="webchat" role="main">
            <div class="loading">
                <div class="spinner"></div>
                <p>Connecting to your Copilot Studio agent...</p>
            </div>
        </div>
    </div>

    <script crossorigin="anonymous" src="https://cdn.botframework.com/botframework-webchat/latest/webchat.js"></script>

    <script>
        (async function () {
            try {
                const styleOptions = {
                    primaryColor: '{{primary_js}}',
                    accentColor: '{{accent_js}}',

                    bubbleBackground: '{{bot_message_js}}',
                    bubbleFromUserBackground: '{{user_message_js}}',
                    bubbleFromUserTextColor: '#FFFFFF',
                    bubbleTextColor: '#323130',

                    botAvatarBackgroundColor: '{{primary_js}}',
                    botAvatarInitials: '{{initials_js}}',
                    userAvatarBackgroundColor: '{{accent_js}}',

                    backgroundColor: '{{background_js}}',
                    sendBoxBackground: '{{background_js}}',
                    sendBoxButtonColor: '{{send_box_js}}',
                    sendBoxButtonColorOnFocus: '{{accent_js}}',
                    sendBoxButtonColorOnHover: '{{accent_js}}',
                    sendBoxTextColor: '#323130',

                    fontFamily: "'Segoe UI', system-ui, -apple-system, sans-serif",
                    fontSize: 14,

                    hideUploadButton: true,
                    hideSendBox: false
                };

                // Copilot Studio: Settings -> Channels -> Email -> Token Endpoint
                const tokenEndpointString = '{{token_endpoint_js}}';
{{endpoint_guard}}

                const tokenEndpointURL = new URL(tokenEndpointString);
                const locale = document.documentElement.lang || 'en';
                const apiVersion = tokenEndpointURL.searchParams.get('api-version');

                const [directLineURL, token] = await Promise.all([
                    fetch(new URL(`/powervirtualagents/regionalchannelsettings?api-version=${apiVersion}`, tokenEndpointURL))
                        .then(response => {
                            if (!response.ok) {
                                throw new Error('Failed to retrieve regional channel settings.');
                            }
                            return response.json();
                        })
                        .then(({ channelUrlsById: { directline } }) => directline),
                    fetch(tokenEndpointURL)
                        .then(response => {
                            if (!response.ok) {
                                throw new Error('Failed to retrieve Direct Line token.');
                            }
                            return response.json();
                        })
                        .then(({ token }) => token)
                ]);

                const directLine = WebChat.createDirectLine({
                    domain: new URL('v3/directline', directLineURL),
                    token
                });

                const subscription = directLine.connectionStatus$.subscribe({
                    next(value) {
                        if (value === 2) {
                            directLine
                                .postActivity({
                                    localTimezone: Intl.DateTimeFormat().resolvedOptions().timeZone,
                                    locale,
                                    name: 'startConversation',
                                    type: 'event'
                                })
                                .subscribe();

                            subscription.unsubscribe();
                        }
                    }
                });

                WebChat.renderWebChat(
                    {
                        directLine,
                        locale,
                        styleOptions
                    },
                    document.getElementById('webchat')
                );

                document.querySelector('.loading').style.display = 'none';

            } catch (error) {
                console.error('Failed to initialize WebChat:', error);

                document.getElementById('webchat').innerHTML = `
                    <div class="error">
                        <h3>⚠️ Configuration Required</h3>
                        <p><strong>Error:</strong> ${error.message}</p>
                        <p>Please update the token endpoint in this HTML file with your actual Copilot Studio token endpoint.</p>
                        <p><strong>To get your token endpoint:</strong></p>
                        <ol style="text-align: left; display: inline-block;">
                            <li>Go to your Copilot Studio environment</li>
                            <li>Navigate to Settings → Channels</li>
                            <li>Select Email channel</li>
                            <li>Copy the Token Endpoint</li>
                            <li>{{endpoint_step}}</li>
                        </ol>
                    </div>
                `;
            }
        })();
    </script>
</body>
</html>"##;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::find_theme;

    fn config() -> CanvasConfig {
        CanvasConfig::from_colors(&find_theme("modern-purple").unwrap().colors, "MP")
    }

    #[test]
    fn test_from_colors() {
        let config = config();
        assert_eq!(config.accent, "#8E4EC6");
        assert_eq!(config.bot_message, "#6264A7");
        assert_eq!(config.bot_avatar_initials, "MP");
    }

    #[test]
    fn test_canvas_without_endpoint_keeps_placeholder() {
        let html = canvas_html(&config(), None);
        assert!(html.contains("const tokenEndpointString = 'YOUR_TOKEN_ENDPOINT_HERE';"));
        assert!(html.contains("if (tokenEndpointString === 'YOUR_TOKEN_ENDPOINT_HERE')"));
        assert!(html.contains("Please replace YOUR_TOKEN_ENDPOINT_HERE with your actual"));
        assert!(html.contains("<li>Replace YOUR_TOKEN_ENDPOINT_HERE in this HTML file</li>"));
        assert!(!html.contains("{{"));

        // Blank counts as missing
        assert_eq!(canvas_html(&config(), Some("  ")), html);
    }

    #[test]
    fn test_canvas_with_endpoint() {
        let endpoint = "https://contoso.api.powerplatform.com/token?api-version=2022-03-01-preview";
        let html = canvas_html(&config(), Some(endpoint));
        assert!(html.contains(&format!("const tokenEndpointString = '{}';", endpoint)));
        assert!(!html.contains("YOUR_TOKEN_ENDPOINT_HERE"));
        assert!(html.contains("Update tokenEndpointString in this HTML file"));
        assert!(!html.contains("{{"));
    }

    #[test]
    fn test_js_string_escapes_line_terminators() {
        let escaped = js_string("a\rb\u{2028}c\u{2029}d\ne");
        assert_eq!(escaped, "a\\rb\\u2028c\\u2029d\\ne");
        assert!(!escaped.contains('\r'));
        assert!(!escaped.contains('\u{2028}'));
        assert!(!escaped.contains('\u{2029}'));
    }

    #[test]
    fn test_canvas_embeds_colors() {
        let html = canvas_html(&config(), None);
        assert!(html.contains("linear-gradient(135deg, #6264A7 0%, #8E4EC6 100%)"));
        assert!(html.contains("bubbleBackground: '#6264A7'"));
        assert!(html.contains("<div class=\"agent-logo\">MP</div>"));
    }

    #[test]
    fn test_demo_page() {
        let html = demo_html(&config());
        assert!(html.contains("Primary (#6264A7), Accent (#8E4EC6)"));
        assert!(html.contains("directLine: mockDirectLine"));
        assert!(!html.contains("YOUR_TOKEN_ENDPOINT_HERE"));
        assert!(!html.contains("{{"));
    }

    #[test]
    fn test_values_are_escaped() {
        let mut config = config();
        config.bot_avatar_initials = "<b>'X'</b>".to_string();
        let html = demo_html(&config);
        assert!(html.contains("&lt;b&gt;'X'&lt;/b&gt;"));
        assert!(html.contains(r"botAvatarInitials: '<b>\'X\'<\/b>'"));
    }

    #[test]
    fn test_variant_names() {
        assert_eq!("demo".parse::<HtmlVariant>().unwrap(), HtmlVariant::Demo);
        assert!("pdf".parse::<HtmlVariant>().is_err());
        assert_eq!(HtmlVariant::Demo.default_file_name(), "copilot-studio-theme-demo.html");
        assert_eq!(HtmlVariant::Canvas.default_file_name(), "copilot-studio-canvas.html");
        assert_eq!(HtmlVariant::default(), HtmlVariant::Canvas);
    }

    #[test]
    fn test_embed_page() {
        let mut style = StyleOptions::empty();
        style.set("accent", "#123456");

        let html = embed_html(&style, None).unwrap();
        assert!(html.contains("const tokenEndpoint = '{INJECT_TOKENENDPOINT}';"));
        assert!(html.contains("\"accent\": \"#123456\""));

        let html = embed_html(&style, Some("https://example.com/t")).unwrap();
        assert!(html.contains("const tokenEndpoint = 'https://example.com/t';"));
        assert!(!html.contains(EMBED_TOKEN_PLACEHOLDER));
    }
}
