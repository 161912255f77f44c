//! Host-side dispatcher for webview messages

use super::{BridgeError, HostEnvironment, HostMessage, NotifyLevel, WebviewMessage};
use crate::export::{self, render_html, ExportContext, ExportFormat, HtmlVariant};
use crate::studio::ThemeStudio;
use crate::theme::is_hex_color;
use tokio::sync::mpsc;
use tracing::{debug, warn};

const LOGO_ASSET: &str = "media/icon.png";
const JSON_EXPORT_NAME: &str = "copilot-studio-theme.json";

/// Routes webview messages to the host and posts replies back
pub struct HostBridge<H> {
    host: H,
    studio: ThemeStudio,
    outbound: mpsc::UnboundedSender<HostMessage>,
    extension_version: String,
}

impl<H: HostEnvironment> HostBridge<H> {
    pub fn new(host: H, outbound: mpsc::UnboundedSender<HostMessage>) -> Self {
        Self {
            host,
            studio: ThemeStudio::new(),
            outbound,
            extension_version: export::EXTENSION_VERSION.to_string(),
        }
    }

    pub fn with_studio(mut self, studio: ThemeStudio) -> Self {
        self.studio = studio;
        self
    }

    pub fn with_extension_version(mut self, version: impl Into<String>) -> Self {
        self.extension_version = version.into();
        self
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn studio(&self) -> &ThemeStudio {
        &self.studio
    }

    /// Fire-and-forget; a closed webview just drops the message
    fn post(&self, message: HostMessage) {
        let _ = self.outbound.send(message);
    }

    /// Decode and handle one raw message. Decode failures are reported to the
    /// webview and returned.
    pub async fn handle_json(&mut self, raw: &str) -> Result<(), BridgeError> {
        match WebviewMessage::decode(raw) {
            Ok(message) => {
                self.handle(message).await;
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "rejected webview message");
                self.post(HostMessage::error(format!("Invalid message: {}", e)));
                Err(e)
            }
        }
    }

    /// Handle one message. Failures never escape: they become an error
    /// notification on the host plus an error post to the webview.
    pub async fn handle(&mut self, message: WebviewMessage) {
        let command = message.command();
        let context = message.failure_context();
        debug!(command, "handling webview message");

        if let Err(e) = self.dispatch(message).await {
            let text = format!("{}: {}", context, e);
            self.host.notify(NotifyLevel::Error, &text);
            self.post(HostMessage::error(text));
        }
    }

    async fn dispatch(&mut self, message: WebviewMessage) -> Result<(), BridgeError> {
        match message {
            WebviewMessage::ApplyColor { color_type, color } => match (color_type, color) {
                (Some(color_type), Some(color)) if !color_type.is_empty() && !color.is_empty() => {
                    if !is_hex_color(&color) {
                        warn!(color_type = %color_type, color = %color, "applying non-hex color");
                    }
                    self.studio.update_override_str(&color_type, color.as_str())?;
                    self.host
                        .notify(NotifyLevel::Info, &format!("Applied {}: {}", color_type, color));
                }
                _ => self.host.notify(
                    NotifyLevel::Warning,
                    "Invalid color data received from theme gallery",
                ),
            },

            WebviewMessage::ApplyTheme { theme_id } => {
                let name = self.studio.select_theme(&theme_id)?.name.clone();
                self.host
                    .notify(NotifyLevel::Info, &format!("Applied theme {}", name));
            }

            WebviewMessage::ExportJson { data } => {
                if let Some(path) = self.host.save_dialog(JSON_EXPORT_NAME).await {
                    self.host.write_file(&path, &data).await?;
                    self.host.notify(
                        NotifyLevel::Info,
                        &format!("Theme configuration saved to {}", path.display()),
                    );
                }
            }

            WebviewMessage::ExportHtml {
                config,
                export_type,
                token_endpoint,
            } => {
                let has_endpoint = token_endpoint
                    .as_deref()
                    .is_some_and(|e| !e.trim().is_empty());
                let html = render_html(export_type, &config, token_endpoint.as_deref());
                if let Some(path) = self.host.save_dialog(export_type.default_file_name()).await {
                    self.host.write_file(&path, &html).await?;
                    let text = match export_type {
                        HtmlVariant::Demo => format!(
                            "Demo HTML saved to {}. You can open this file directly in a browser.",
                            path.display()
                        ),
                        HtmlVariant::Canvas if !has_endpoint => format!(
                            "Production canvas saved to {}. Remember to replace YOUR_TOKEN_ENDPOINT_HERE with your actual Copilot Studio token endpoint.",
                            path.display()
                        ),
                        HtmlVariant::Canvas => {
                            format!("Production canvas saved to {}.", path.display())
                        }
                    };
                    self.host.notify(NotifyLevel::Info, &text);
                }
            }

            WebviewMessage::PreviewHtml {
                config,
                export_type,
            } => {
                let html = render_html(export_type, &config, None);
                self.host.open_document(&html, "html").await?;
                self.host.notify(
                    NotifyLevel::Info,
                    &format!(
                        "{} opened for preview. You can save this file and open it in a browser.",
                        export_type.title()
                    ),
                );
            }

            WebviewMessage::ExportTheme {
                theme,
                custom_colors,
                format,
            } => {
                let format: ExportFormat = format.parse()?;
                let ctx = ExportContext::default().with_version(self.extension_version.clone());
                let content = export::generate(format, &theme, &custom_colors, &ctx)?;

                let default_name = export::default_file_name(&theme, format);
                if let Some(path) = self.host.save_dialog(&default_name).await {
                    self.host.write_file(&path, &content).await?;
                    self.host.notify(
                        NotifyLevel::Info,
                        &format!("Theme exported as {} to {}", format.label(), path.display()),
                    );
                    self.post(HostMessage::success(format!(
                        "Theme exported successfully as {}!",
                        format.label()
                    )));
                }
            }

            WebviewMessage::ShowInfo { message } => self.host.notify(NotifyLevel::Info, &message),
            WebviewMessage::ShowError { message } => self.host.notify(NotifyLevel::Error, &message),

            WebviewMessage::GetLogo => {
                let uri = self.host.asset_uri(LOGO_ASSET);
                self.post(HostMessage::LogoUri { uri });
            }

            WebviewMessage::SaveTheme => self
                .host
                .notify(NotifyLevel::Info, "Save custom theme feature coming soon!"),
            WebviewMessage::LoadThemes => self
                .host
                .notify(NotifyLevel::Info, "Load external themes feature coming soon!"),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge::NotificationKind;
    use crate::theme::{find_theme, ColorKey};
    use async_trait::async_trait;
    use std::path::{Path, PathBuf};
    use std::sync::Mutex;
    use tempfile::TempDir;

    struct RecordingHost {
        dir: Option<TempDir>,
        notes: Mutex<Vec<(NotifyLevel, String)>>,
        opened: Mutex<Vec<String>>,
    }

    impl RecordingHost {
        fn new() -> Self {
            Self {
                dir: Some(TempDir::new().unwrap()),
                notes: Mutex::new(Vec::new()),
                opened: Mutex::new(Vec::new()),
            }
        }

        fn cancelling() -> Self {
            Self {
                dir: None,
                ..Self::new()
            }
        }

        fn notes(&self) -> Vec<(NotifyLevel, String)> {
            self.notes.lock().unwrap().clone()
        }

        fn last_note(&self) -> (NotifyLevel, String) {
            self.notes().last().cloned().unwrap()
        }
    }

    #[async_trait]
    impl HostEnvironment for RecordingHost {
        async fn save_dialog(&self, default_name: &str) -> Option<PathBuf> {
            self.dir.as_ref().map(|d| d.path().join(default_name))
        }

        async fn write_file(&self, path: &Path, contents: &str) -> Result<(), BridgeError> {
            tokio::fs::write(path, contents).await?;
            Ok(())
        }

        fn notify(&self, level: NotifyLevel, text: &str) {
            self.notes.lock().unwrap().push((level, text.to_string()));
        }

        async fn open_document(&self, contents: &str, _language: &str) -> Result<PathBuf, BridgeError> {
            self.opened.lock().unwrap().push(contents.to_string());
            Ok(PathBuf::from("untitled.html"))
        }

        fn asset_uri(&self, relative: &str) -> String {
            format!("vscode-resource://ext/{}", relative)
        }
    }

    fn bridge(host: RecordingHost) -> (HostBridge<RecordingHost>, mpsc::UnboundedReceiver<HostMessage>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (HostBridge::new(host, tx), rx)
    }

    fn export_theme(format: &str) -> WebviewMessage {
        let mut custom_colors = crate::theme::CustomColorOverrides::new();
        custom_colors.insert(ColorKey::AccentColor, "#FF0000");
        WebviewMessage::ExportTheme {
            theme: find_theme("dark-mode").unwrap().clone(),
            custom_colors,
            format: format.to_string(),
        }
    }

    #[tokio::test]
    async fn test_export_theme_writes_and_notifies() {
        let (mut bridge, mut rx) = bridge(RecordingHost::new());
        bridge.handle(export_theme("css")).await;

        let path = bridge.host().dir.as_ref().unwrap().path().join("dark-professional-theme.css");
        let css = std::fs::read_to_string(&path).unwrap();
        assert!(css.contains("--mcs-accent-color: #FF0000;"));

        let (level, text) = bridge.host().last_note();
        assert_eq!(level, NotifyLevel::Info);
        assert!(text.starts_with("Theme exported as CSS to "));
        assert_eq!(
            rx.try_recv().unwrap(),
            HostMessage::success("Theme exported successfully as CSS!")
        );
    }

    #[tokio::test]
    async fn test_unsupported_format_reports_error() {
        let (mut bridge, mut rx) = bridge(RecordingHost::new());
        bridge.handle(export_theme("pdf")).await;

        let (level, text) = bridge.host().last_note();
        assert_eq!(level, NotifyLevel::Error);
        assert_eq!(text, "Failed to export theme: Unsupported export format: pdf");
        match rx.try_recv().unwrap() {
            HostMessage::ShowNotification { kind, text: posted } => {
                assert_eq!(kind, NotificationKind::Error);
                assert_eq!(posted, text);
            }
            other => panic!("unexpected message: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_cancelled_dialog_writes_nothing() {
        let (mut bridge, mut rx) = bridge(RecordingHost::cancelling());
        bridge.handle(export_theme("json")).await;
        assert!(bridge.host().notes().is_empty());
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_apply_color_updates_overrides() {
        let (mut bridge, _rx) = bridge(RecordingHost::new());
        bridge
            .handle(WebviewMessage::ApplyColor {
                color_type: Some("chatBackground".into()),
                color: Some("#101010".into()),
            })
            .await;

        assert_eq!(
            bridge.host().last_note(),
            (NotifyLevel::Info, "Applied chatBackground: #101010".to_string())
        );
        assert_eq!(bridge.studio().overrides().get(ColorKey::ChatBackground), Some("#101010"));
    }

    #[tokio::test]
    async fn test_apply_color_missing_fields_warns() {
        let (mut bridge, _rx) = bridge(RecordingHost::new());
        bridge
            .handle(WebviewMessage::ApplyColor {
                color_type: Some("accentColor".into()),
                color: None,
            })
            .await;
        assert_eq!(bridge.host().last_note().0, NotifyLevel::Warning);
    }

    #[tokio::test]
    async fn test_apply_theme() {
        let (mut bridge, _rx) = bridge(RecordingHost::new());
        bridge
            .handle(WebviewMessage::ApplyTheme {
                theme_id: "ocean-blue".into(),
            })
            .await;
        assert_eq!(bridge.studio().selected_theme().unwrap().id, "ocean-blue");

        bridge
            .handle(WebviewMessage::ApplyTheme {
                theme_id: "missing".into(),
            })
            .await;
        assert_eq!(
            bridge.host().last_note(),
            (NotifyLevel::Error, "Failed to apply theme: Theme not found: missing".to_string())
        );
    }

    #[tokio::test]
    async fn test_export_html_variants() {
        let config = crate::export::CanvasConfig::from_colors(
            &find_theme("ocean-blue").unwrap().colors,
            "OB",
        );
        let (mut bridge, _rx) = bridge(RecordingHost::new());

        bridge
            .handle(WebviewMessage::ExportHtml {
                config: config.clone(),
                export_type: HtmlVariant::Canvas,
                token_endpoint: None,
            })
            .await;
        assert!(bridge.host().last_note().1.contains("Remember to replace YOUR_TOKEN_ENDPOINT_HERE"));

        bridge
            .handle(WebviewMessage::ExportHtml {
                config,
                export_type: HtmlVariant::Demo,
                token_endpoint: None,
            })
            .await;
        let dir = bridge.host().dir.as_ref().unwrap().path();
        assert!(dir.join("copilot-studio-canvas.html").exists());
        assert!(dir.join("copilot-studio-theme-demo.html").exists());
        assert!(bridge.host().last_note().1.starts_with("Demo HTML saved to "));
    }

    #[tokio::test]
    async fn test_preview_html_opens_document() {
        let config = crate::export::CanvasConfig::from_colors(
            &find_theme("light-minimal").unwrap().colors,
            "LM",
        );
        let (mut bridge, _rx) = bridge(RecordingHost::new());
        bridge
            .handle(WebviewMessage::PreviewHtml {
                config,
                export_type: HtmlVariant::Demo,
            })
            .await;

        assert_eq!(bridge.host().opened.lock().unwrap().len(), 1);
        assert_eq!(
            bridge.host().last_note().1,
            "Copilot Studio Theme Demo opened for preview. You can save this file and open it in a browser."
        );
    }

    #[tokio::test]
    async fn test_get_logo_posts_uri() {
        let (mut bridge, mut rx) = bridge(RecordingHost::new());
        bridge.handle(WebviewMessage::GetLogo).await;
        assert_eq!(
            rx.try_recv().unwrap(),
            HostMessage::LogoUri {
                uri: "vscode-resource://ext/media/icon.png".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_placeholder_commands() {
        let (mut bridge, _rx) = bridge(RecordingHost::new());
        bridge.handle(WebviewMessage::SaveTheme).await;
        bridge.handle(WebviewMessage::LoadThemes).await;
        let notes = bridge.host().notes();
        assert_eq!(notes[0].1, "Save custom theme feature coming soon!");
        assert_eq!(notes[1].1, "Load external themes feature coming soon!");
    }

    #[tokio::test]
    async fn test_closed_webview_does_not_fail() {
        let (mut bridge, rx) = bridge(RecordingHost::new());
        drop(rx);
        bridge.handle(WebviewMessage::GetLogo).await;
        bridge.handle(export_theme("scss")).await;
        assert_eq!(bridge.host().last_note().0, NotifyLevel::Info);
    }

    #[tokio::test]
    async fn test_handle_json_rejects_unknown_command() {
        let (mut bridge, mut rx) = bridge(RecordingHost::new());
        assert!(bridge.handle_json(r#"{"command":"nope"}"#).await.is_err());
        assert!(matches!(
            rx.try_recv().unwrap(),
            HostMessage::ShowNotification {
                kind: NotificationKind::Error,
                ..
            }
        ));
    }
}
