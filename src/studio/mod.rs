//! Editor session state
//!
//! [`ThemeStudio`] owns the theme selection and the style options the preview
//! renders from. Selecting a theme resets overrides and pushes the theme's colors
//! into the style options; every change is published on a watch channel.

use crate::export::{self, ExportContext, ExportError, ExportFormat};
use crate::style::{StyleOptions, StyleValue};
use crate::theme::{ColorKey, CustomColorOverrides, Theme, ThemeError, ThemeSelection};
use tokio::sync::watch;
use tracing::{debug, info};

pub struct ThemeStudio {
    selection: ThemeSelection,
    style: StyleOptions,
    publisher: watch::Sender<StyleOptions>,
}

impl ThemeStudio {
    /// Studio with the default catalog theme selected
    pub fn new() -> Self {
        let selection = ThemeSelection::with_default();
        let mut style = StyleOptions::default();
        if let Some(colors) = selection.effective_colors() {
            style.apply_theme(&colors);
        }
        let (publisher, _) = watch::channel(style.clone());
        Self {
            selection,
            style,
            publisher,
        }
    }

    /// Studio starting from a specific catalog theme
    pub fn with_theme(id: &str) -> Result<Self, ThemeError> {
        let mut studio = Self::new();
        studio.select_theme(id)?;
        Ok(studio)
    }

    /// Receiver for style changes; starts at the current style
    pub fn subscribe(&self) -> watch::Receiver<StyleOptions> {
        self.publisher.subscribe()
    }

    pub fn selection(&self) -> &ThemeSelection {
        &self.selection
    }

    pub fn selected_theme(&self) -> Option<&Theme> {
        self.selection.selected()
    }

    pub fn overrides(&self) -> &CustomColorOverrides {
        self.selection.overrides()
    }

    pub fn style_options(&self) -> &StyleOptions {
        &self.style
    }

    pub fn effective_theme(&self) -> Option<Theme> {
        self.selection.effective_theme()
    }

    /// Select a catalog theme: overrides are dropped and the theme's colors
    /// replace the projected style keys
    pub fn select_theme(&mut self, id: &str) -> Result<&Theme, ThemeError> {
        self.selection.select_by_id(id)?;
        if let Some(colors) = self.selection.effective_colors() {
            self.style.apply_theme(&colors);
        }
        self.publish();
        info!(theme = %id, "theme selected");
        self.selection
            .selected()
            .ok_or_else(|| ThemeError::NotFound(id.to_string()))
    }

    /// Record a color override. Style options are left as they are.
    pub fn update_override(&mut self, key: ColorKey, value: impl Into<String>) {
        self.selection.update_override(key, value);
    }

    pub fn update_override_str(&mut self, key: &str, value: impl Into<String>) -> Result<(), ThemeError> {
        self.selection.update_override_str(key, value)
    }

    pub fn clear_overrides(&mut self) {
        self.selection.clear_overrides();
    }

    /// Set a single style option. Never touches the theme or its overrides.
    pub fn set_style_option(&mut self, key: impl Into<String>, value: impl Into<StyleValue>) {
        let key = key.into();
        let value = value.into();
        debug!(key = %key, value = %value, "style option set");
        self.style.set(key, value);
        self.publish();
    }

    /// Replace the whole style map, e.g. after loading a saved session
    pub fn replace_style_options(&mut self, style: StyleOptions) {
        self.style = style;
        self.publish();
    }

    /// Render the current effective theme in an export format
    pub fn export(&self, format: ExportFormat, ctx: &ExportContext) -> Result<String, ExportError> {
        let theme = self.selection.selected().ok_or(ExportError::NoThemeSelected)?;
        export::generate(format, theme, self.selection.overrides(), ctx)
    }

    fn publish(&self) {
        self.publisher.send_replace(self.style.clone());
    }
}

impl Default for ThemeStudio {
    fn default() -> Self {
        Self::new()
    }
}
