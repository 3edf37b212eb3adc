//! Playback attachment.
//!
//! A detail view hands its playback URL and media element to [`attach`].
//! When the adaptive streaming engine is available a session is created,
//! loaded, and attached; the returned [`SessionGuard`] destroys the session
//! exactly once, on drop or on an explicit [`SessionGuard::release`].
//! Otherwise an element that plays HLS natively gets the URL directly.
//!
//! The caller owns the [`CancellationToken`] passed to [`attach`]; cancelling
//! it while the source is still loading abandons the load and destroys the
//! half-built session.

pub mod hls;
pub mod player;

use anyhow::{Context, Result};
use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use url::Url;

pub use hls::HlsEngine;
pub use player::ExternalPlayer;

/// MIME type of an HLS playlist.
pub const HLS_MIME: &str = "application/vnd.apple.mpegurl";

/// Surface that renders a stream.
#[async_trait]
pub trait MediaElement: Send {
    fn can_play_type(&self, mime: &str) -> bool;
    fn set_source(&mut self, url: &str);
    fn source(&self) -> Option<&str>;

    /// Resolves once the element stops rendering. Elements without a
    /// lifetime of their own resolve immediately.
    async fn finished(&mut self) {}
}

/// One adaptive streaming session bound to a single source.
#[async_trait]
pub trait StreamSession: Send {
    async fn load_source(&mut self, url: &str) -> Result<()>;
    fn attach_media(&mut self, element: &mut dyn MediaElement) -> Result<()>;
    /// Release network and decoder resources held by the session.
    fn destroy(&mut self);
}

/// Factory for stream sessions.
pub trait StreamingEngine: Send + Sync {
    fn is_supported(&self) -> bool;
    fn create_session(&self) -> Result<Box<dyn StreamSession>>;
}

/// Owns a live session and destroys it exactly once.
pub struct SessionGuard {
    session: Option<Box<dyn StreamSession>>,
}

impl SessionGuard {
    pub fn new(session: Box<dyn StreamSession>) -> Self {
        Self {
            session: Some(session),
        }
    }

    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    /// Destroy the session. Later calls and the eventual drop are no-ops.
    pub fn release(&mut self) {
        if let Some(mut session) = self.session.take() {
            session.destroy();
            tracing::debug!("Stream session released");
        }
    }

    fn session_mut(&mut self) -> Option<&mut (dyn StreamSession + 'static)> {
        self.session.as_deref_mut()
    }
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        self.release();
    }
}

/// Result of attaching a playback URL to a media element.
pub enum Playback {
    /// Adaptive streaming session attached; released with the guard.
    Session(SessionGuard),
    /// The element was given the URL directly.
    Native,
    /// Nothing attached: no URL, no usable path, or session setup failed.
    Unavailable,
}

impl Playback {
    pub fn is_session(&self) -> bool {
        matches!(self, Self::Session(_))
    }

    /// Release any session resources now.
    pub fn release(&mut self) {
        if let Self::Session(guard) = self {
            guard.release();
        }
    }
}

/// Resolve a playback URL against the server base.
///
/// The backend hands out signed server-relative paths
/// (`/stream/{id}/master.m3u8?expires=..&sig=..`); absolute URLs pass through.
pub fn resolve_media_url(base: &str, url: &str) -> Result<String> {
    let base = Url::parse(base).with_context(|| format!("Invalid server base URL {base}"))?;
    let resolved = base
        .join(url)
        .with_context(|| format!("Invalid playback URL {url}"))?;
    Ok(resolved.to_string())
}

/// Attach `url` to `element`. Failures are logged and reported as
/// [`Playback::Unavailable`]; there is no retry and no fallback.
pub async fn attach(
    url: Option<&str>,
    engine: &dyn StreamingEngine,
    element: &mut dyn MediaElement,
    cancel: &CancellationToken,
) -> Playback {
    let Some(url) = url else {
        return Playback::Unavailable;
    };
    if cancel.is_cancelled() {
        return Playback::Unavailable;
    }

    if engine.is_supported() {
        let session = match engine.create_session() {
            Ok(session) => session,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to create stream session");
                return Playback::Unavailable;
            }
        };
        let mut guard = SessionGuard::new(session);
        if let Some(session) = guard.session_mut() {
            let loaded = tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::debug!(url, "Stream load cancelled");
                    return Playback::Unavailable;
                }
                loaded = session.load_source(url) => loaded,
            };
            if let Err(e) = loaded {
                tracing::warn!(url, error = %e, "Failed to load stream source");
                return Playback::Unavailable;
            }
            if let Err(e) = session.attach_media(element) {
                tracing::warn!(url, error = %e, "Failed to attach stream to media element");
                return Playback::Unavailable;
            }
        }
        return Playback::Session(guard);
    }

    if element.can_play_type(HLS_MIME) {
        element.set_source(url);
        return Playback::Native;
    }

    tracing::debug!(url, "No playback path for HLS source");
    Playback::Unavailable
}
