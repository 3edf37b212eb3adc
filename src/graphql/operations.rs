//! GraphQL documents consumed by the client.
//!
//! Field and argument names are the backend's wire contract and must not be
//! renamed.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::schema::{Account, IngestionRequest, SavedVideo, VideoDetail, VideoSummary};

/// A named GraphQL operation with typed variables and response data.
pub trait Operation {
    type Variables: Serialize + Send + Sync;
    type Data: DeserializeOwned;

    const NAME: &'static str;
    const DOCUMENT: &'static str;
}

/// Operations without arguments.
#[derive(Debug, Default, Clone, Copy, Serialize)]
pub struct NoVariables {}

// ---- tokenAuth ----

pub struct TokenAuth;

#[derive(Debug, Clone, Serialize)]
pub struct TokenAuthVariables {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TokenAuthData {
    #[serde(rename = "tokenAuth")]
    pub token_auth: Option<TokenPayload>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TokenPayload {
    pub token: Option<String>,
}

impl Operation for TokenAuth {
    type Variables = TokenAuthVariables;
    type Data = TokenAuthData;

    const NAME: &'static str = "Login";
    const DOCUMENT: &'static str = r#"mutation Login($username: String!, $password: String!) {
  tokenAuth(username: $username, password: $password) {
    token
  }
}"#;
}

// ---- videos ----

pub struct Videos;

#[derive(Debug, Clone, Default, Serialize)]
pub struct VideosVariables {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub genre: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VideosData {
    #[serde(default)]
    pub videos: Option<Vec<VideoSummary>>,
}

impl Operation for Videos {
    type Variables = VideosVariables;
    type Data = VideosData;

    const NAME: &'static str = "Videos";
    const DOCUMENT: &'static str = r#"query Videos($genre: String) {
  videos(genre: $genre) {
    id
    title
    description
    duration_seconds
    thumbnail_url
    genre
  }
}"#;
}

// ---- video ----

pub struct VideoById;

#[derive(Debug, Clone, Serialize)]
pub struct VideoVariables {
    pub id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VideoData {
    #[serde(default)]
    pub video: Option<VideoDetail>,
}

impl Operation for VideoById {
    type Variables = VideoVariables;
    type Data = VideoData;

    const NAME: &'static str = "Video";
    const DOCUMENT: &'static str = r#"query Video($id: ID!) {
  video(id: $id) {
    id
    title
    description
    duration_seconds
    thumbnail_url
    playback_url
    genre
  }
}"#;
}

// ---- saved list ----

/// Unfiltered list with the saved-items projection. The backend has no
/// saved-items query, so this is the plain `videos` list.
pub struct SavedVideos;

#[derive(Debug, Clone, Deserialize)]
pub struct SavedVideosData {
    #[serde(default)]
    pub videos: Option<Vec<SavedVideo>>,
}

impl Operation for SavedVideos {
    type Variables = NoVariables;
    type Data = SavedVideosData;

    const NAME: &'static str = "Videos";
    const DOCUMENT: &'static str = r#"query Videos {
  videos {
    id
    title
    description
    thumbnail_url
  }
}"#;
}

// ---- uploadVideo ----

pub struct UploadVideo;

#[derive(Debug, Clone, Deserialize)]
pub struct UploadVideoData {
    #[serde(rename = "uploadVideo")]
    pub upload_video: Option<OkPayload>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OkPayload {
    #[serde(default)]
    pub ok: Option<bool>,
}

impl Operation for UploadVideo {
    type Variables = IngestionRequest;
    type Data = UploadVideoData;

    const NAME: &'static str = "UploadVideo";
    const DOCUMENT: &'static str = r#"mutation UploadVideo($title: String!, $file: String!, $description: String, $genreName: String) {
  uploadVideo(title: $title, file: $file, description: $description, genreName: $genreName) {
    ok
  }
}"#;
}

// ---- healthcheck ----

pub struct Healthcheck;

#[derive(Debug, Clone, Deserialize)]
pub struct HealthcheckData {
    pub healthcheck: Option<String>,
}

impl Operation for Healthcheck {
    type Variables = NoVariables;
    type Data = HealthcheckData;

    const NAME: &'static str = "Healthcheck";
    const DOCUMENT: &'static str = "query Healthcheck {\n  healthcheck\n}";
}

// ---- me ----

pub struct Me;

#[derive(Debug, Clone, Deserialize)]
pub struct MeData {
    pub me: Option<Account>,
}

impl Operation for Me {
    type Variables = NoVariables;
    type Data = MeData;

    const NAME: &'static str = "Me";
    const DOCUMENT: &'static str = r#"query Me {
  me {
    id
    username
    email
  }
}"#;
}

// ---- register ----

pub struct Register;

#[derive(Debug, Clone, Serialize)]
pub struct RegisterVariables {
    pub username: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RegisterData {
    pub register: Option<RegisterPayload>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RegisterPayload {
    #[serde(default)]
    pub ok: Option<bool>,
    pub user: Option<Account>,
}

impl Operation for Register {
    type Variables = RegisterVariables;
    type Data = RegisterData;

    const NAME: &'static str = "Register";
    const DOCUMENT: &'static str = r#"mutation Register($username: String!, $password: String!, $email: String) {
  register(username: $username, password: $password, email: $email) {
    ok
    user {
      id
      username
      email
    }
  }
}"#;
}
