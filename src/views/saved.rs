//! Saved items. The backend offers no saved-items query, so this lists the
//! unfiltered catalog.

use super::{Route, ViewState};
use crate::graphql::{ApiClient, SavedVideo};

pub struct SavedView {
    client: ApiClient,
    state: ViewState<Vec<SavedVideo>>,
}

impl SavedView {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            state: ViewState::Loading,
        }
    }

    pub fn state(&self) -> &ViewState<Vec<SavedVideo>> {
        &self.state
    }

    pub async fn load(&mut self) -> &ViewState<Vec<SavedVideo>> {
        self.state = ViewState::Loading;
        self.state = ViewState::from_result(self.client.saved_videos().await);
        &self.state
    }

    pub fn links(&self) -> Vec<(&SavedVideo, Route)> {
        self.state
            .ready()
            .map(|videos| {
                videos
                    .iter()
                    .map(|v| (v, Route::Video(v.id.clone())))
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graphql::operations::{Operation, SavedVideos};
    use crate::testing::ScriptedTransport;
    use serde_json::json;
    use std::sync::Arc;

    #[tokio::test]
    async fn lists_unfiltered_catalog() {
        let transport = Arc::new(ScriptedTransport::default());
        transport.push_data(json!({
            "videos": [
                { "id": "1", "title": "One", "description": null, "thumbnail_url": null },
                { "id": "a b", "title": "Two", "description": "x", "thumbnail_url": null }
            ]
        }));
        let mut view = SavedView::new(ApiClient::new(transport.clone()));
        view.load().await;

        let links = view.links();
        assert_eq!(links.len(), 2);
        assert_eq!(links[1].1.path(), "/video/a%20b");

        let sent = &transport.requests()[0];
        assert_eq!(sent.query, SavedVideos::DOCUMENT);
        assert_eq!(sent.variables, json!({}));
    }
}
