use tokio_util::sync::CancellationToken;

use super::ViewState;
use crate::graphql::{ApiClient, VideoDetail};
use crate::playback::{self, MediaElement, Playback, StreamingEngine};

/// Single video page with optional playback.
///
/// Any attached stream session is released by [`DetailView::unmount`] or,
/// failing that, when the view is dropped. A load still in progress is
/// abandoned through [`DetailView::cancel_handle`].
pub struct DetailView {
    client: ApiClient,
    id: String,
    media_base: Option<String>,
    state: ViewState<VideoDetail>,
    cancel: CancellationToken,
    // Declared before `element` so the session is torn down first.
    playback: Playback,
    element: Option<Box<dyn MediaElement>>,
}

impl DetailView {
    /// `id` is the decoded path segment of the route.
    pub fn new(client: ApiClient, id: impl Into<String>) -> Self {
        Self {
            client,
            id: id.into(),
            media_base: None,
            state: ViewState::Loading,
            cancel: CancellationToken::new(),
            playback: Playback::Unavailable,
            element: None,
        }
    }

    /// Base that server-relative playback paths are resolved against,
    /// normally the GraphQL endpoint.
    pub fn with_media_base(mut self, base: impl Into<String>) -> Self {
        self.media_base = Some(base.into());
        self
    }

    /// Cancelling the handle abandons a pending [`DetailView::attach`] and
    /// refuses later ones.
    pub fn cancel_handle(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn state(&self) -> &ViewState<VideoDetail> {
        &self.state
    }

    pub fn playback(&self) -> &Playback {
        &self.playback
    }

    pub async fn load(&mut self) -> &ViewState<VideoDetail> {
        self.state = ViewState::Loading;
        self.state = match self.client.video(&self.id).await {
            Ok(Some(video)) => ViewState::Ready(video),
            Ok(None) => ViewState::NotFound,
            Err(e) => {
                tracing::warn!(id = %self.id, error = %e, "Video query failed");
                ViewState::Failed(e.message())
            }
        };
        &self.state
    }

    /// Mount `element` and attach the loaded video's stream to it.
    /// Replaces (and releases) any previous attachment.
    pub async fn attach(&mut self, engine: &dyn StreamingEngine, mut element: Box<dyn MediaElement>) {
        self.unmount();
        let url = self
            .state
            .ready()
            .and_then(|video| video.playback_url.as_deref())
            .map(|url| self.media_url(url));
        self.playback =
            playback::attach(url.as_deref(), engine, element.as_mut(), &self.cancel).await;
        self.element = Some(element);
    }

    fn media_url(&self, url: &str) -> String {
        let Some(base) = self.media_base.as_deref() else {
            return url.to_string();
        };
        match playback::resolve_media_url(base, url) {
            Ok(resolved) => resolved,
            Err(e) => {
                tracing::warn!(url, error = %e, "Failed to resolve playback URL");
                url.to_string()
            }
        }
    }

    pub fn element_mut(&mut self) -> Option<&mut (dyn MediaElement + 'static)> {
        self.element.as_deref_mut()
    }

    /// Wait until the mounted element stops rendering.
    pub async fn wait_for_element(&mut self) {
        if let Some(element) = self.element.as_mut() {
            element.finished().await;
        }
    }

    /// Release the stream session and the media element.
    pub fn unmount(&mut self) {
        self.playback.release();
        self.playback = Playback::Unavailable;
        self.element = None;
    }
}

impl Drop for DetailView {
    fn drop(&mut self) {
        self.cancel.cancel();
        self.unmount();
    }
}
