//! Wire-level behaviour against an in-process GraphQL stub.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::State;
use axum::http::HeaderMap;
use axum::routing::post;
use axum::{Json, Router};
use parking_lot::Mutex;
use serde_json::{json, Value};

use maxstudio::graphql::{ApiClient, HttpTransport};
use maxstudio::storage::{load_credential, FileStore, KeyValueStore, CREDENTIAL_KEY};
use maxstudio::views::login::LoginOutcome;
use maxstudio::views::{CatalogView, DetailView, HistoryNavigator, IngestView, LoginView, Route, ViewState};

#[derive(Debug, Clone)]
struct Seen {
    authorization: Option<String>,
    body: Value,
}

#[derive(Clone, Default)]
struct Stub {
    seen: Arc<Mutex<Vec<Seen>>>,
}

impl Stub {
    fn seen(&self) -> Vec<Seen> {
        self.seen.lock().clone()
    }
}

async fn graphql(State(stub): State<Stub>, headers: HeaderMap, Json(body): Json<Value>) -> Json<Value> {
    let authorization = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let operation = body["operationName"].as_str().unwrap_or_default().to_string();
    stub.seen.lock().push(Seen {
        authorization,
        body: body.clone(),
    });

    let reply = match operation.as_str() {
        "Login" => json!({ "data": { "tokenAuth": { "token": "abc.def" } } }),
        "Videos" => json!({ "data": { "videos": [
            {
                "id": "1",
                "title": "Pilot",
                "description": "First episode",
                "duration_seconds": 1500,
                "thumbnail_url": null,
                "genre": "Drama"
            },
            {
                "id": "2",
                "title": "Finale",
                "description": null,
                "duration_seconds": null,
                "thumbnail_url": null,
                "genre": "Comedy"
            }
        ] } }),
        "Video" => json!({
            "data": { "video": null },
            "errors": [{ "message": "Video matching query does not exist.", "path": ["video"] }]
        }),
        "UploadVideo" => json!({ "data": { "uploadVideo": { "ok": true } } }),
        _ => json!({ "errors": [{ "message": format!("unknown operation {operation}") }] }),
    };
    Json(reply)
}

async fn serve() -> (Stub, String) {
    let stub = Stub::default();
    let app = Router::new()
        .route("/graphql/", post(graphql))
        .with_state(stub.clone());
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind stub");
    let addr: SocketAddr = listener.local_addr().expect("stub addr");
    tokio::spawn(async move { axum::serve(listener, app).await.expect("serve stub") });
    (stub, format!("http://{addr}/graphql/"))
}

fn client(endpoint: &str, store: Arc<dyn KeyValueStore>) -> ApiClient {
    ApiClient::new(Arc::new(HttpTransport::new(endpoint, store)))
}

#[tokio::test]
async fn anonymous_requests_carry_no_authorization_header() {
    let (stub, endpoint) = serve().await;
    let dir = tempfile::tempdir().unwrap();
    let store: Arc<dyn KeyValueStore> = Arc::new(FileStore::new(dir.path().to_str().unwrap()).unwrap());

    let mut view = CatalogView::new(client(&endpoint, store));
    view.load().await;

    assert_eq!(view.items().len(), 2);
    assert_eq!(view.genres(), vec!["Drama".to_string(), "Comedy".to_string()]);
    let seen = stub.seen();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].authorization, None);
}

#[tokio::test]
async fn login_persists_token_and_later_requests_send_it() {
    let (stub, endpoint) = serve().await;
    let dir = tempfile::tempdir().unwrap();
    let store: Arc<dyn KeyValueStore> = Arc::new(FileStore::new(dir.path().to_str().unwrap()).unwrap());
    let navigator = Arc::new(HistoryNavigator::default());

    let login = LoginView::new(client(&endpoint, store.clone()), store.clone(), navigator.clone());
    login.edit(|form| form.with_username("admin").with_password("secret"));
    assert_eq!(login.submit().await, Ok(LoginOutcome::SignedIn));
    assert_eq!(navigator.current(), Some(Route::Catalog));

    // A fresh store over the same directory sees the credential.
    let reopened = FileStore::new(dir.path().to_str().unwrap()).unwrap();
    assert_eq!(load_credential(&reopened).await.as_deref(), Some("abc.def"));
    assert_eq!(reopened.get(CREDENTIAL_KEY).await.as_deref(), Some("abc.def"));

    let mut catalog = CatalogView::new(client(&endpoint, store));
    catalog.load().await;

    let seen = stub.seen();
    assert_eq!(seen.len(), 2);
    assert_eq!(seen[0].body["operationName"], "Login");
    assert_eq!(
        seen[0].body["variables"],
        json!({ "username": "admin", "password": "secret" })
    );
    assert_eq!(seen[1].authorization.as_deref(), Some("JWT abc.def"));
}

#[tokio::test]
async fn missing_video_with_errors_is_not_found() {
    let (_stub, endpoint) = serve().await;
    let store: Arc<dyn KeyValueStore> = Arc::new(maxstudio::NoopStore);

    let mut view = DetailView::new(client(&endpoint, store), "does-not-exist");
    assert_eq!(view.load().await, &ViewState::NotFound);
}

#[tokio::test]
async fn ingest_omits_empty_optional_fields() {
    let (stub, endpoint) = serve().await;
    let store: Arc<dyn KeyValueStore> = Arc::new(maxstudio::NoopStore);

    let view = IngestView::new(client(&endpoint, store));
    view.edit(|form| {
        form.with_title("Pilot")
            .with_server_path("/tmp/pilot.mp4")
            .with_description("")
            .with_genre_name("")
    });
    view.submit().await.unwrap();
    assert!(view.notice().is_some());

    let seen = stub.seen();
    assert_eq!(seen[0].body["operationName"], "UploadVideo");
    assert_eq!(
        seen[0].body["variables"],
        json!({ "title": "Pilot", "file": "/tmp/pilot.mp4" })
    );
}

#[tokio::test]
async fn unreachable_backend_fails_the_view() {
    let store: Arc<dyn KeyValueStore> = Arc::new(maxstudio::NoopStore);
    let mut view = CatalogView::new(client("http://127.0.0.1:9/graphql/", store));
    view.load().await;

    assert!(matches!(view.state(), ViewState::Failed(_)));
    assert!(view.items().is_empty());
}
