use serde::{Deserialize, Deserializer, Serialize};

/// A catalog entry as returned by the `videos` list query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoSummary {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "zero_if_null")]
    pub duration_seconds: u64,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
    #[serde(default)]
    pub genre: Option<String>,
}

/// A single video with its optional playback locator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoDetail {
    #[serde(flatten)]
    pub summary: VideoSummary,
    /// HLS master playlist URL. Absent while the backend is still processing.
    #[serde(default)]
    pub playback_url: Option<String>,
}

/// Reduced projection used by the saved-items list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedVideo {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
}

/// Arguments of the `uploadVideo` mutation.
///
/// `file` is a path on the backend host; the media must already be there.
/// Optional fields that are `None` are left out of the payload entirely.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IngestionRequest {
    pub title: String,
    pub file: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "genreName", skip_serializing_if = "Option::is_none")]
    pub genre_name: Option<String>,
}

/// Account as exposed by `me` and `register`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub id: String,
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
}

impl VideoSummary {
    /// Case-insensitive substring match against title or description.
    /// `needle` must already be lowercase.
    pub(crate) fn matches_lowercase(&self, needle: &str) -> bool {
        self.title.to_lowercase().contains(needle)
            || self
                .description
                .as_deref()
                .is_some_and(|d| d.to_lowercase().contains(needle))
    }
}

fn zero_if_null<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    Ok(Option::<u64>::deserialize(deserializer)?.unwrap_or(0))
}
