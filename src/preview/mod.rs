//! Live preview of the chat widget
//!
//! The renderer mounts a widget against a transport (scripted or real), then keeps
//! its style in sync with the [`StyleOptions`](crate::style::StyleOptions) model.
//! Style changes are coalesced by a restartable debounce timer so a burst of edits
//! produces a single re-render.
//!
//! ## States
//!
//! ```text
//! Loading ──► Mock
//!    │  └───► Loaded
//!    └──────► Error ──retry──► Loading
//! ```
//!
//! A mounted preview goes back to `Loading` when its transport is switched.

mod debounce;
mod renderer;
mod token;
mod transport;

pub use debounce::{StyleDebouncer, DEFAULT_DEBOUNCE};
pub use renderer::{ChatWidget, PreviewRenderer, TransportMode};
pub use token::{ChannelSettings, TokenClient, TokenSource, TOKEN_ENDPOINT_PLACEHOLDER};
pub use transport::{
    default_script, Activity, ConnectionState, DirectLineConnection, ScriptedTurn,
    SimulatedTransport, Speaker, Transport, DEFAULT_TURN_DELAY_MS,
};

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PreviewError {
    #[error("Failed to load chat widget: {0}")]
    WidgetLoad(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Token endpoint error: {0}")]
    TokenEndpoint(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Invalid preview transition: {from} -> {to}")]
    InvalidTransition { from: String, to: String },
}

/// Lifecycle of the preview widget
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "reason", rename_all = "lowercase")]
pub enum PreviewState {
    Loading,
    /// Mounted against the scripted transport
    Mock,
    /// Mounted against a real token-backed transport
    Loaded,
    Error(String),
}

impl PreviewState {
    pub fn name(&self) -> &'static str {
        match self {
            PreviewState::Loading => "loading",
            PreviewState::Mock => "mock",
            PreviewState::Loaded => "loaded",
            PreviewState::Error(_) => "error",
        }
    }

    /// Whether a widget is mounted and accepts style updates
    pub fn is_mounted(&self) -> bool {
        matches!(self, PreviewState::Mock | PreviewState::Loaded)
    }

    fn can_transition_to(&self, next: &PreviewState) -> bool {
        matches!(
            (self, next),
            (PreviewState::Loading, PreviewState::Mock)
                | (PreviewState::Loading, PreviewState::Loaded)
                | (PreviewState::Loading, PreviewState::Error(_))
                | (PreviewState::Error(_), PreviewState::Loading)
                // switching transport restarts the mount
                | (PreviewState::Mock, PreviewState::Loading)
                | (PreviewState::Loaded, PreviewState::Loading)
        )
    }

    /// Move to `next`, rejecting transitions the lifecycle does not allow
    pub fn transition(&mut self, next: PreviewState) -> Result<(), PreviewError> {
        if !self.can_transition_to(&next) {
            return Err(PreviewError::InvalidTransition {
                from: self.name().to_string(),
                to: next.name().to_string(),
            });
        }
        *self = next;
        Ok(())
    }
}

impl fmt::Display for PreviewState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PreviewState::Error(reason) => write!(f, "error ({})", reason),
            other => f.write_str(other.name()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_happy_path_transitions() {
        let mut state = PreviewState::Loading;
        state.transition(PreviewState::Mock).unwrap();
        assert!(state.is_mounted());
    }

    #[test]
    fn test_error_only_from_loading() {
        let mut state = PreviewState::Loading;
        state.transition(PreviewState::Loaded).unwrap();
        let err = state
            .transition(PreviewState::Error("boom".into()))
            .unwrap_err();
        assert!(matches!(err, PreviewError::InvalidTransition { .. }));
        assert_eq!(state, PreviewState::Loaded);
    }

    #[test]
    fn test_retry_goes_back_to_loading() {
        let mut state = PreviewState::Loading;
        state.transition(PreviewState::Error("offline".into())).unwrap();
        assert!(state.transition(PreviewState::Mock).is_err());
        state.transition(PreviewState::Loading).unwrap();
        state.transition(PreviewState::Mock).unwrap();
    }

    #[test]
    fn test_state_serializes_with_reason() {
        let json = serde_json::to_string(&PreviewState::Error("no token".into())).unwrap();
        assert_eq!(json, r#"{"state":"error","reason":"no token"}"#);
        let json = serde_json::to_string(&PreviewState::Mock).unwrap();
        assert_eq!(json, r#"{"state":"mock"}"#);
    }
}
