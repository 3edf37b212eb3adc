use async_trait::async_trait;
use std::process::{ExitStatus, Stdio};
use tokio::process::{Child, Command};

use super::{MediaElement, HLS_MIME};
use crate::config::PlayerConfig;

/// An external player process acting as the media element.
///
/// Setting a source (re)starts the player on that URL. The process is
/// killed when the element is dropped.
pub struct ExternalPlayer {
    command: String,
    args: Vec<String>,
    native_hls: bool,
    source: Option<String>,
    child: Option<Child>,
}

impl ExternalPlayer {
    pub fn new(config: &PlayerConfig) -> Self {
        Self {
            command: config.command.clone(),
            args: config.args.clone(),
            native_hls: config.native_hls,
            source: None,
            child: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.child.is_some()
    }

    /// Wait for the player to exit. Returns `None` when no player was started.
    pub async fn wait(&mut self) -> std::io::Result<Option<ExitStatus>> {
        match self.child.as_mut() {
            Some(child) => {
                let status = child.wait().await?;
                self.child = None;
                Ok(Some(status))
            }
            None => Ok(None),
        }
    }

    fn spawn(&mut self, url: &str) {
        if let Some(mut previous) = self.child.take() {
            if let Err(e) = previous.start_kill() {
                tracing::warn!(
                    player = %self.command,
                    pid = ?previous.id(),
                    error = %e,
                    "Failed to stop previous player"
                );
            }
        }

        let spawned = Command::new(&self.command)
            .args(&self.args)
            .arg(url)
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .spawn();

        match spawned {
            Ok(child) => {
                tracing::info!(player = %self.command, pid = ?child.id(), "Player started");
                self.child = Some(child);
            }
            Err(e) => {
                tracing::warn!(player = %self.command, error = %e, "Failed to start player");
            }
        }
    }
}

#[async_trait]
impl MediaElement for ExternalPlayer {
    fn can_play_type(&self, mime: &str) -> bool {
        match mime {
            HLS_MIME => self.native_hls,
            m => m.starts_with("video/"),
        }
    }

    fn set_source(&mut self, url: &str) {
        self.source = Some(url.to_string());
        self.spawn(url);
    }

    fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    async fn finished(&mut self) {
        match self.wait().await {
            Ok(Some(status)) => tracing::info!(%status, "Player exited"),
            Ok(None) => {}
            Err(e) => tracing::warn!(error = %e, "Failed to wait for player"),
        }
    }
}
