//! Client-side HLS session.
//!
//! Fetches the master playlist, picks a variant within the configured
//! bandwidth cap, and hands the resolved variant URI to the media element.

use anyhow::{anyhow, bail, Context, Result};
use async_trait::async_trait;
use m3u8_rs::Playlist;
use url::Url;

use super::{MediaElement, StreamSession, StreamingEngine};

pub struct HlsEngine {
    client: reqwest::Client,
    enabled: bool,
    max_bandwidth: Option<u64>,
}

impl HlsEngine {
    pub fn new(client: reqwest::Client, enabled: bool, max_bandwidth: Option<u64>) -> Self {
        Self {
            client,
            enabled,
            max_bandwidth,
        }
    }
}

impl StreamingEngine for HlsEngine {
    fn is_supported(&self) -> bool {
        self.enabled
    }

    fn create_session(&self) -> Result<Box<dyn StreamSession>> {
        Ok(Box::new(HlsSession {
            client: self.client.clone(),
            max_bandwidth: self.max_bandwidth,
            destroyed: false,
            selected: None,
        }))
    }
}

pub struct HlsSession {
    client: reqwest::Client,
    max_bandwidth: Option<u64>,
    destroyed: bool,
    selected: Option<String>,
}

impl HlsSession {
    async fn fetch_playlist(&self, url: &str) -> Result<String> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .context("Failed to request playlist")?
            .error_for_status()
            .context("Playlist request rejected")?;
        Ok(response.text().await?)
    }
}

#[async_trait]
impl StreamSession for HlsSession {
    async fn load_source(&mut self, url: &str) -> Result<()> {
        if self.destroyed {
            bail!("Session already destroyed");
        }
        let body = self.fetch_playlist(url).await?;

        let stream = select_stream(url, &body, self.max_bandwidth)?;
        tracing::debug!(master = url, stream = %stream, "Resolved HLS stream");
        self.selected = Some(stream);
        Ok(())
    }

    fn attach_media(&mut self, element: &mut dyn MediaElement) -> Result<()> {
        let stream = self
            .selected
            .as_deref()
            .ok_or_else(|| anyhow!("No source loaded"))?;
        element.set_source(stream);
        Ok(())
    }

    fn destroy(&mut self) {
        self.destroyed = true;
        self.selected = None;
    }
}

/// Pick the stream to play from a playlist body fetched from `playlist_url`.
///
/// For a master playlist this is the highest-bandwidth non I-frame variant
/// not exceeding `max_bandwidth`, or the lowest one when none fits. A media
/// playlist is played as is.
pub fn select_stream(playlist_url: &str, body: &str, max_bandwidth: Option<u64>) -> Result<String> {
    let playlist = m3u8_rs::parse_playlist_res(body.as_bytes())
        .map_err(|e| anyhow!("Invalid HLS playlist: {e:?}"))?;

    let master = match playlist {
        Playlist::MediaPlaylist(_) => return Ok(playlist_url.to_string()),
        Playlist::MasterPlaylist(master) => master,
    };

    let mut variants: Vec<_> = master.variants.iter().filter(|v| !v.is_i_frame).collect();
    if variants.is_empty() {
        bail!("Master playlist has no playable variants");
    }
    variants.sort_by_key(|v| v.bandwidth);

    let chosen = match max_bandwidth {
        Some(cap) => variants
            .iter()
            .rev()
            .find(|v| v.bandwidth <= cap)
            .unwrap_or(&variants[0]),
        None => &variants[variants.len() - 1],
    };

    let base = Url::parse(playlist_url).context("Invalid playlist URL")?;
    let resolved = base
        .join(&chosen.uri)
        .with_context(|| format!("Invalid variant URI {}", chosen.uri))?;
    Ok(resolved.to_string())
}
