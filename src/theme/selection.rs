//! Theme selection state
//!
//! Holds the selected theme and the user's per-key color overrides. The effective
//! theme is recomputed on every read and never stored.

use super::{catalog, ColorKey, Theme, ThemeColors, ThemeError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// Partial map of color overrides, ordered by field order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CustomColorOverrides(BTreeMap<ColorKey, String>);

impl CustomColorOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite one override. The value is stored verbatim.
    pub fn insert(&mut self, key: ColorKey, value: impl Into<String>) {
        self.0.insert(key, value.into());
    }

    pub fn get(&self, key: ColorKey) -> Option<&str> {
        self.0.get(&key).map(String::as_str)
    }

    pub fn remove(&mut self, key: ColorKey) -> Option<String> {
        self.0.remove(&key)
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ColorKey, &str)> + '_ {
        self.0.iter().map(|(k, v)| (*k, v.as_str()))
    }

    /// Apply the overrides on top of a palette; override wins key by key
    pub fn apply_to(&self, colors: &ThemeColors) -> ThemeColors {
        let mut merged = colors.clone();
        for (key, value) in self.iter() {
            merged.set(key, value);
        }
        merged
    }
}

impl FromIterator<(ColorKey, String)> for CustomColorOverrides {
    fn from_iter<I: IntoIterator<Item = (ColorKey, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Currently selected theme plus unsaved overrides
#[derive(Debug, Clone, Default)]
pub struct ThemeSelection {
    selected: Option<Theme>,
    overrides: CustomColorOverrides,
}

impl ThemeSelection {
    /// Empty selection; nothing is selected until a theme is chosen
    pub fn new() -> Self {
        Self::default()
    }

    /// Selection initialized with the first catalog entry
    pub fn with_default() -> Self {
        let mut selection = Self::new();
        if let Some(theme) = catalog::default_theme() {
            selection.select_theme(theme.clone());
        }
        selection
    }

    /// Replace the selection. Overrides are always discarded.
    pub fn select_theme(&mut self, theme: Theme) {
        debug!(
            theme = %theme.id,
            dropped_overrides = self.overrides.len(),
            "selecting theme"
        );
        self.selected = Some(theme);
        self.overrides.clear();
    }

    /// Select a catalog theme by id
    pub fn select_by_id(&mut self, id: &str) -> Result<&Theme, ThemeError> {
        let theme = catalog::find_theme(id).ok_or_else(|| ThemeError::NotFound(id.to_string()))?;
        self.select_theme(theme.clone());
        Ok(theme)
    }

    pub fn selected(&self) -> Option<&Theme> {
        self.selected.as_ref()
    }

    pub fn overrides(&self) -> &CustomColorOverrides {
        &self.overrides
    }

    /// Insert or overwrite a single override
    pub fn update_override(&mut self, key: ColorKey, value: impl Into<String>) {
        let value = value.into();
        debug!(key = %key, value = %value, "updating color override");
        self.overrides.insert(key, value);
    }

    /// String-keyed variant for wire input. Unknown keys are rejected, values are not checked.
    pub fn update_override_str(&mut self, key: &str, value: impl Into<String>) -> Result<(), ThemeError> {
        let key: ColorKey = key.parse()?;
        self.update_override(key, value);
        Ok(())
    }

    pub fn clear_overrides(&mut self) {
        self.overrides.clear();
    }

    /// Selected palette with overrides applied, or `None` when nothing is selected
    pub fn effective_colors(&self) -> Option<ThemeColors> {
        self.selected
            .as_ref()
            .map(|theme| self.overrides.apply_to(&theme.colors))
    }

    /// Selected theme with overrides applied
    pub fn effective_theme(&self) -> Option<Theme> {
        let theme = self.selected.as_ref()?;
        Some(Theme {
            colors: self.overrides.apply_to(&theme.colors),
            ..theme.clone()
        })
    }
}
