//! Typed operations over a shared [`GraphqlTransport`].

use serde::de::DeserializeOwned;
use std::sync::Arc;

use super::operations::{
    Healthcheck, Me, NoVariables, Operation, Register, RegisterPayload, RegisterVariables,
    SavedVideos, TokenAuth, TokenAuthVariables, UploadVideo, VideoById, VideoVariables, Videos,
    VideosVariables,
};
use super::schema::{Account, IngestionRequest, SavedVideo, VideoDetail, VideoSummary};
use super::transport::{GraphqlRequest, GraphqlResponse, GraphqlTransport};
use crate::error::{RequestError, RequestResult};

/// Cheap to clone; clones share the same transport.
#[derive(Clone)]
pub struct ApiClient {
    transport: Arc<dyn GraphqlTransport>,
}

impl ApiClient {
    pub fn new(transport: Arc<dyn GraphqlTransport>) -> Self {
        Self { transport }
    }

    /// Run an operation. Any GraphQL error fails the whole call.
    pub async fn execute<O: Operation>(&self, variables: &O::Variables) -> RequestResult<O::Data> {
        let response = self.send::<O>(variables).await?;
        if !response.errors.is_empty() {
            return Err(RequestError::Graphql(response.errors));
        }
        decode_data(response.data)
    }

    async fn send<O: Operation>(&self, variables: &O::Variables) -> RequestResult<GraphqlResponse> {
        let request = GraphqlRequest {
            query: O::DOCUMENT.to_string(),
            operation_name: O::NAME.to_string(),
            variables: serde_json::to_value(variables)?,
        };
        self.transport.execute(&request).await
    }

    /// Exchange credentials for a token. `None` when the server returned none.
    pub async fn token_auth(&self, username: &str, password: &str) -> RequestResult<Option<String>> {
        let data = self
            .execute::<TokenAuth>(&TokenAuthVariables {
                username: username.to_string(),
                password: password.to_string(),
            })
            .await?;
        Ok(data
            .token_auth
            .and_then(|payload| payload.token)
            .filter(|token| !token.is_empty()))
    }

    /// List the catalog, optionally restricted to one genre server-side.
    pub async fn videos(&self, genre: Option<&str>) -> RequestResult<Vec<VideoSummary>> {
        let data = self
            .execute::<Videos>(&VideosVariables {
                genre: genre.map(str::to_string),
            })
            .await?;
        Ok(data.videos.unwrap_or_default())
    }

    /// Fetch one video. A `null` result is `Ok(None)` even when the server
    /// also reported an error for the missing record.
    pub async fn video(&self, id: &str) -> RequestResult<Option<VideoDetail>> {
        let response = self
            .send::<VideoById>(&VideoVariables { id: id.to_string() })
            .await?;

        let video = response
            .data
            .as_ref()
            .and_then(|data| data.get("video"))
            .filter(|value| !value.is_null())
            .cloned();

        match video {
            None => {
                if !response.errors.is_empty() {
                    tracing::debug!(id, errors = response.errors.len(), "Video lookup returned no record");
                }
                Ok(None)
            }
            Some(_) if !response.errors.is_empty() => Err(RequestError::Graphql(response.errors)),
            Some(value) => Ok(Some(serde_json::from_value(value)?)),
        }
    }

    /// Same list as the catalog; the backend exposes no saved-items query.
    pub async fn saved_videos(&self) -> RequestResult<Vec<SavedVideo>> {
        let data = self.execute::<SavedVideos>(&NoVariables {}).await?;
        Ok(data.videos.unwrap_or_default())
    }

    /// Ask the backend to ingest a file already present on its filesystem.
    /// Returns the server's `ok` acknowledgement.
    pub async fn upload_video(&self, request: &IngestionRequest) -> RequestResult<bool> {
        let data = self.execute::<UploadVideo>(request).await?;
        Ok(data
            .upload_video
            .and_then(|payload| payload.ok)
            .unwrap_or(false))
    }

    pub async fn healthcheck(&self) -> RequestResult<Option<String>> {
        let data = self.execute::<Healthcheck>(&NoVariables {}).await?;
        Ok(data.healthcheck)
    }

    /// The signed-in account, `None` when anonymous.
    pub async fn me(&self) -> RequestResult<Option<Account>> {
        let data = self.execute::<Me>(&NoVariables {}).await?;
        Ok(data.me)
    }

    pub async fn register(&self, variables: &RegisterVariables) -> RequestResult<RegisterPayload> {
        let data = self.execute::<Register>(variables).await?;
        data.register
            .ok_or_else(|| RequestError::Decode("register returned no payload".to_string()))
    }
}

fn decode_data<T: DeserializeOwned>(data: Option<serde_json::Value>) -> RequestResult<T> {
    match data {
        Some(value) if !value.is_null() => Ok(serde_json::from_value(value)?),
        _ => Err(RequestError::Decode("response contained no data".to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GraphqlError;
    use crate::testing::ScriptedTransport;
    use serde_json::json;

    fn client(transport: &Arc<ScriptedTransport>) -> ApiClient {
        ApiClient::new(transport.clone())
    }

    #[tokio::test]
    async fn videos_sends_genre_only_when_given() {
        let transport = Arc::new(ScriptedTransport::default());
        transport.push_data(json!({ "videos": [] }));
        transport.push_data(json!({ "videos": [] }));
        let api = client(&transport);

        api.videos(None).await.unwrap();
        api.videos(Some("Drama")).await.unwrap();

        let sent = transport.requests();
        assert_eq!(sent[0].operation_name, "Videos");
        assert_eq!(sent[0].variables, json!({}));
        assert_eq!(sent[1].variables, json!({ "genre": "Drama" }));
    }

    #[tokio::test]
    async fn null_video_is_not_found_even_with_errors() {
        let transport = Arc::new(ScriptedTransport::default());
        transport.push(GraphqlResponse {
            data: Some(json!({ "video": null })),
            errors: vec![GraphqlError {
                message: "Video matching query does not exist.".into(),
                path: Some(vec![json!("video")]),
            }],
        });

        let found = client(&transport).video("404").await.unwrap();
        assert_eq!(found, None);
    }

    #[tokio::test]
    async fn missing_data_is_not_found() {
        let transport = Arc::new(ScriptedTransport::default());
        transport.push(GraphqlResponse::default());
        assert_eq!(client(&transport).video("x").await.unwrap(), None);
    }

    #[tokio::test]
    async fn graphql_errors_fail_list_queries() {
        let transport = Arc::new(ScriptedTransport::default());
        transport.push_errors(&["Admin authentication required"]);

        let err = client(&transport).videos(None).await.unwrap_err();
        assert_eq!(err.message(), "Admin authentication required");
    }

    #[tokio::test]
    async fn empty_token_is_treated_as_no_token() {
        let transport = Arc::new(ScriptedTransport::default());
        transport.push_data(json!({ "tokenAuth": { "token": "" } }));
        transport.push_data(json!({ "tokenAuth": null }));
        let api = client(&transport);

        assert_eq!(api.token_auth("u", "p").await.unwrap(), None);
        assert_eq!(api.token_auth("u", "p").await.unwrap(), None);
    }

    #[tokio::test]
    async fn upload_without_ack_is_false() {
        let transport = Arc::new(ScriptedTransport::default());
        transport.push_data(json!({ "uploadVideo": { "ok": null } }));

        let request = IngestionRequest {
            title: "Pilot".into(),
            file: "/tmp/pilot.mp4".into(),
            description: None,
            genre_name: None,
        };
        assert!(!client(&transport).upload_video(&request).await.unwrap());
    }

    #[tokio::test]
    async fn anonymous_me_is_none() {
        let transport = Arc::new(ScriptedTransport::default());
        transport.push_data(json!({ "me": null }));
        assert_eq!(client(&transport).me().await.unwrap(), None);
    }
}
