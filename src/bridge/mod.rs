//! Message bridge between the editor webview and its host
//!
//! The protocol is a closed set of JSON messages tagged by `command`. The host side
//! dispatches every variant exhaustively; replies are posted fire-and-forget.

mod handler;
mod host;
mod protocol;
mod stdio;

pub use handler::HostBridge;
pub use host::{FsHost, HostEnvironment, NotifyLevel};
pub use protocol::{HostMessage, NotificationKind, WebviewMessage};
pub use stdio::{serve, serve_stdio};

use crate::export::ExportError;
use crate::theme::ThemeError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BridgeError {
    #[error("{0}")]
    Decode(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Theme(#[from] ThemeError),

    #[error(transparent)]
    Export(#[from] ExportError),
}
