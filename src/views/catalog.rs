//! Catalog browsing: server-side genre filter, client-side text search.

use std::collections::HashSet;

use super::{Route, ViewState};
use crate::graphql::{ApiClient, VideoSummary};

pub struct CatalogView {
    client: ApiClient,
    genre: Option<String>,
    query: String,
    state: ViewState<Vec<VideoSummary>>,
}

/// One grid cell.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogCard<'a> {
    pub video: &'a VideoSummary,
    pub route: Route,
}

impl CatalogView {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            genre: None,
            query: String::new(),
            state: ViewState::Loading,
        }
    }

    /// Genre passed to the list query. Empty strings mean "all genres".
    pub fn set_genre(&mut self, genre: Option<String>) {
        self.genre = genre.filter(|g| !g.is_empty());
    }

    pub fn genre(&self) -> Option<&str> {
        self.genre.as_deref()
    }

    /// Free-text filter over the fetched results. Does not re-query.
    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    pub fn state(&self) -> &ViewState<Vec<VideoSummary>> {
        &self.state
    }

    pub async fn load(&mut self) -> &ViewState<Vec<VideoSummary>> {
        self.state = ViewState::Loading;
        let result = self.client.videos(self.genre.as_deref()).await;
        if let Err(e) = &result {
            tracing::warn!(genre = ?self.genre, error = %e, "Catalog query failed");
        }
        self.state = ViewState::from_result(result);
        &self.state
    }

    /// Fetched videos after the text filter.
    pub fn items(&self) -> Vec<&VideoSummary> {
        match &self.state {
            ViewState::Ready(videos) => filter_videos(videos, &self.query),
            _ => Vec::new(),
        }
    }

    pub fn cards(&self) -> Vec<CatalogCard<'_>> {
        self.items()
            .into_iter()
            .map(|video| CatalogCard {
                video,
                route: Route::Video(video.id.clone()),
            })
            .collect()
    }

    /// Genres offered for selection, derived from the fetched list.
    pub fn genres(&self) -> Vec<String> {
        self.state
            .ready()
            .map(|videos| derive_genres(videos))
            .unwrap_or_default()
    }
}

/// Videos whose title or description contains `query`, ignoring case.
/// An empty query keeps every video.
pub fn filter_videos<'a>(videos: &'a [VideoSummary], query: &str) -> Vec<&'a VideoSummary> {
    if query.is_empty() {
        return videos.iter().collect();
    }
    let needle = query.to_lowercase();
    videos
        .iter()
        .filter(|v| v.matches_lowercase(&needle))
        .collect()
}

/// Each non-empty genre once, in first-seen order.
pub fn derive_genres(videos: &[VideoSummary]) -> Vec<String> {
    let mut seen = HashSet::new();
    videos
        .iter()
        .filter_map(|v| v.genre.as_deref())
        .filter(|g| !g.is_empty())
        .filter(|g| seen.insert(*g))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RequestError;
    use crate::testing::ScriptedTransport;
    use serde_json::json;
    use std::sync::Arc;

    fn video(id: &str, title: &str, description: Option<&str>, genre: Option<&str>) -> VideoSummary {
        VideoSummary {
            id: id.into(),
            title: title.into(),
            description: description.map(Into::into),
            duration_seconds: 60,
            thumbnail_url: None,
            genre: genre.map(Into::into),
        }
    }

    fn sample() -> Vec<VideoSummary> {
        vec![
            video("1", "Night Drive", Some("A neon thriller"), Some("Action")),
            video("2", "Quiet Fields", None, Some("Drama")),
            video("3", "Harbour", Some("Storm over the NIGHT sea"), Some("Action")),
            video("4", "Untitled", Some(""), Some("")),
            video("5", "Loose Ends", Some("b-sides"), None),
        ]
    }

    #[test]
    fn empty_query_keeps_everything() {
        let videos = sample();
        assert_eq!(filter_videos(&videos, "").len(), videos.len());
    }

    #[test]
    fn query_matches_title_or_description_case_insensitively() {
        let videos = sample();
        let ids: Vec<_> = filter_videos(&videos, "NiGhT")
            .into_iter()
            .map(|v| v.id.as_str())
            .collect();
        assert_eq!(ids, vec!["1", "3"]);
    }

    #[test]
    fn videos_without_description_match_on_title_only() {
        let videos = sample();
        let ids: Vec<_> = filter_videos(&videos, "fields")
            .into_iter()
            .map(|v| v.id.as_str())
            .collect();
        assert_eq!(ids, vec!["2"]);
        assert!(filter_videos(&videos, "zzz").is_empty());
    }

    #[test]
    fn genres_are_unique_and_skip_empty() {
        let genres = derive_genres(&sample());
        assert_eq!(genres, vec!["Action".to_string(), "Drama".to_string()]);
    }

    #[tokio::test]
    async fn load_then_filter_and_link() {
        let transport = Arc::new(ScriptedTransport::default());
        transport.push_data(json!({ "videos": serde_json::to_value(sample()).unwrap() }));
        let mut view = CatalogView::new(ApiClient::new(transport.clone()));
        view.set_genre(Some(String::new()));

        assert!(view.state().is_loading());
        view.load().await;
        view.set_query("harbour");

        let cards = view.cards();
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].route.path(), "/video/3");
        assert_eq!(view.genres(), vec!["Action", "Drama"]);
        assert_eq!(transport.requests()[0].variables, json!({}));
    }

    #[tokio::test]
    async fn genre_is_sent_to_server() {
        let transport = Arc::new(ScriptedTransport::default());
        transport.push_data(json!({ "videos": [] }));
        let mut view = CatalogView::new(ApiClient::new(transport.clone()));
        view.set_genre(Some("Drama".into()));

        view.load().await;
        assert_eq!(transport.requests()[0].variables, json!({ "genre": "Drama" }));
        assert!(view.items().is_empty());
    }

    #[tokio::test]
    async fn failure_shows_message() {
        let transport = Arc::new(ScriptedTransport::default());
        transport.push_failure(RequestError::Status {
            status: 500,
            body: String::new(),
        });
        let mut view = CatalogView::new(ApiClient::new(transport));

        let state = view.load().await.clone();
        assert_eq!(
            state,
            ViewState::Failed("Response not successful: Received status code 500".into())
        );
        assert!(view.genres().is_empty());
    }
}
