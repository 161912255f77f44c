//! Host-side capabilities the bridge relies on

use super::BridgeError;
use async_trait::async_trait;
use reqwest::Url;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotifyLevel {
    Info,
    Warning,
    Error,
}

/// What the editor host can do on behalf of the webview
#[async_trait]
pub trait HostEnvironment: Send + Sync {
    /// Ask where to save a file; `None` means the user cancelled
    async fn save_dialog(&self, default_name: &str) -> Option<PathBuf>;

    async fn write_file(&self, path: &Path, contents: &str) -> Result<(), BridgeError>;

    /// Show a message to the user
    fn notify(&self, level: NotifyLevel, text: &str);

    /// Open generated content for viewing without saving it
    async fn open_document(&self, contents: &str, language: &str) -> Result<PathBuf, BridgeError>;

    /// URI the webview can load a bundled asset from
    fn asset_uri(&self, relative: &str) -> String;
}

/// Host that saves into a fixed directory without prompting
pub struct FsHost {
    output_dir: PathBuf,
    asset_root: PathBuf,
}

impl FsHost {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        let output_dir = output_dir.into();
        Self {
            asset_root: output_dir.clone(),
            output_dir,
        }
    }

    pub fn with_asset_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.asset_root = root.into();
        self
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }
}

#[async_trait]
impl HostEnvironment for FsHost {
    async fn save_dialog(&self, default_name: &str) -> Option<PathBuf> {
        Some(self.output_dir.join(default_name))
    }

    async fn write_file(&self, path: &Path, contents: &str) -> Result<(), BridgeError> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(path, contents).await?;
        Ok(())
    }

    fn notify(&self, level: NotifyLevel, text: &str) {
        match level {
            NotifyLevel::Info => info!("{}", text),
            NotifyLevel::Warning => warn!("{}", text),
            NotifyLevel::Error => error!("{}", text),
        }
    }

    async fn open_document(&self, contents: &str, language: &str) -> Result<PathBuf, BridgeError> {
        let path = self.output_dir.join(format!("preview.{}", language));
        self.write_file(&path, contents).await?;
        Ok(path)
    }

    fn asset_uri(&self, relative: &str) -> String {
        let path = self.asset_root.join(relative);
        let absolute = if path.is_absolute() {
            path
        } else {
            std::env::current_dir()
                .map(|cwd| cwd.join(&path))
                .unwrap_or(path)
        };
        Url::from_file_path(&absolute)
            .map(|url| url.to_string())
            .unwrap_or_else(|_| absolute.display().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_save_dialog_targets_output_dir() {
        let dir = TempDir::new().unwrap();
        let host = FsHost::new(dir.path());
        let path = tokio_test::block_on(host.save_dialog("ocean-blue-theme.css")).unwrap();
        assert_eq!(path, dir.path().join("ocean-blue-theme.css"));
    }

    #[tokio::test]
    async fn test_write_file_creates_parents() {
        let dir = TempDir::new().unwrap();
        let host = FsHost::new(dir.path());
        let path = dir.path().join("nested/out.json");
        host.write_file(&path, "{}").await.unwrap();
        assert_eq!(std::fs::read_to_string(path).unwrap(), "{}");
    }

    #[tokio::test]
    async fn test_open_document_writes_preview() {
        let dir = TempDir::new().unwrap();
        let host = FsHost::new(dir.path());
        let path = host.open_document("<html></html>", "html").await.unwrap();
        assert_eq!(path.file_name().unwrap(), "preview.html");
        assert!(path.exists());
    }

    #[test]
    fn test_asset_uri_is_file_url() {
        let dir = TempDir::new().unwrap();
        let host = FsHost::new(dir.path()).with_asset_root(dir.path());
        let uri = host.asset_uri("media/icon.png");
        assert!(uri.starts_with("file://"));
        assert!(uri.ends_with("media/icon.png"));
    }
}
