//! Copilot Theme Kit - design and export themes for the Copilot Studio chat widget
//!
//! The kit pairs a catalog of curated color themes with a live widget preview and
//! a set of exporters for turning a theme into something you can ship.
//!
//! ## Key Features
//!
//! - **Theme Catalog**: Six built-in themes, 24 semantic color roles each
//! - **Style Projection**: Map theme colors onto widget style options
//! - **Live Preview**: Debounced re-rendering against a scripted or real conversation
//! - **Exports**: JSON, CSS and SCSS stylesheets, demo pages and production canvases
//! - **Host Bridge**: JSON message protocol between an editor webview and its host

pub mod bridge;
pub mod config;
pub mod export;
pub mod preview;
pub mod studio;
pub mod style;
pub mod theme;
pub mod tui;

pub use bridge::{BridgeError, FsHost, HostBridge, HostEnvironment, HostMessage, WebviewMessage};
pub use config::{Config, ConfigBuilder, ConfigError};
pub use export::{CanvasConfig, ExportContext, ExportError, ExportFormat, HtmlVariant};
pub use preview::{
    ChatWidget, PreviewError, PreviewRenderer, PreviewState, SimulatedTransport, TransportMode,
};
pub use studio::ThemeStudio;
pub use style::{project_theme_to_style_options, StyleOptions, StyleValue};
pub use theme::{ColorKey, Theme, ThemeColors, ThemeError};
pub use tui::TerminalWidget;
