//! In-memory doubles shared by unit tests.

use anyhow::Result;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::error::{GraphqlError, RequestError, RequestResult};
use crate::graphql::{GraphqlRequest, GraphqlResponse, GraphqlTransport};
use crate::playback::{MediaElement, StreamSession, StreamingEngine};
use crate::storage::KeyValueStore;
use crate::views::{Navigator, Route};

#[derive(Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, String>>,
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Option<String> {
        self.values.lock().get(key).cloned()
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        self.values.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Replays queued responses in order and records every request.
#[derive(Default)]
pub struct ScriptedTransport {
    responses: Mutex<VecDeque<RequestResult<GraphqlResponse>>>,
    requests: Mutex<Vec<GraphqlRequest>>,
}

impl ScriptedTransport {
    pub fn push(&self, response: GraphqlResponse) {
        self.responses.lock().push_back(Ok(response));
    }

    pub fn push_data(&self, data: serde_json::Value) {
        self.push(GraphqlResponse {
            data: Some(data),
            errors: Vec::new(),
        });
    }

    pub fn push_errors(&self, messages: &[&str]) {
        self.push(GraphqlResponse {
            data: None,
            errors: messages
                .iter()
                .map(|m| GraphqlError {
                    message: m.to_string(),
                    path: None,
                })
                .collect(),
        });
    }

    pub fn push_failure(&self, error: RequestError) {
        self.responses.lock().push_back(Err(error));
    }

    pub fn requests(&self) -> Vec<GraphqlRequest> {
        self.requests.lock().clone()
    }
}

#[async_trait]
impl GraphqlTransport for ScriptedTransport {
    async fn execute(&self, request: &GraphqlRequest) -> RequestResult<GraphqlResponse> {
        self.requests.lock().push(request.clone());
        self.responses
            .lock()
            .pop_front()
            .unwrap_or_else(|| Err(RequestError::Decode("no scripted response".into())))
    }
}

#[derive(Default)]
pub struct RecordingNavigator {
    pub routes: Mutex<Vec<Route>>,
}

impl Navigator for RecordingNavigator {
    fn push(&self, route: Route) {
        self.routes.lock().push(route);
    }
}

/// Media element double with a configurable native HLS answer.
#[derive(Default)]
pub struct FakeElement {
    pub native_hls: bool,
    pub source: Option<String>,
}

#[async_trait]
impl MediaElement for FakeElement {
    fn can_play_type(&self, mime: &str) -> bool {
        self.native_hls && mime == crate::playback::HLS_MIME
    }

    fn set_source(&mut self, url: &str) {
        self.source = Some(url.to_string());
    }

    fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }
}

/// Counts session creation and teardown.
#[derive(Default, Clone)]
pub struct CountingEngine {
    pub unsupported: bool,
    pub fail_load: bool,
    /// Loads never complete; only cancellation ends them.
    pub hang_load: bool,
    pub created: Arc<AtomicUsize>,
    pub destroyed: Arc<AtomicUsize>,
}

impl CountingEngine {
    pub fn created(&self) -> usize {
        self.created.load(Ordering::SeqCst)
    }

    pub fn destroyed(&self) -> usize {
        self.destroyed.load(Ordering::SeqCst)
    }
}

impl StreamingEngine for CountingEngine {
    fn is_supported(&self) -> bool {
        !self.unsupported
    }

    fn create_session(&self) -> Result<Box<dyn StreamSession>> {
        self.created.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(CountingSession {
            fail_load: self.fail_load,
            hang_load: self.hang_load,
            source: None,
            destroyed: self.destroyed.clone(),
        }))
    }
}

struct CountingSession {
    fail_load: bool,
    hang_load: bool,
    source: Option<String>,
    destroyed: Arc<AtomicUsize>,
}

#[async_trait]
impl StreamSession for CountingSession {
    async fn load_source(&mut self, url: &str) -> Result<()> {
        if self.hang_load {
            std::future::pending::<()>().await;
        }
        if self.fail_load {
            anyhow::bail!("manifest unavailable");
        }
        self.source = Some(url.to_string());
        Ok(())
    }

    fn attach_media(&mut self, element: &mut dyn MediaElement) -> Result<()> {
        let source = self
            .source
            .as_deref()
            .ok_or_else(|| anyhow::anyhow!("no source loaded"))?;
        element.set_source(source);
        Ok(())
    }

    fn destroy(&mut self) {
        self.destroyed.fetch_add(1, Ordering::SeqCst);
    }
}
