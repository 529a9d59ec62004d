use std::sync::Arc;
use folio_auth::{Credentials, HashParams};
use folio_hooks::{DefaultUserSeeder, standard_lifecycle};
use folio_model::{Document, Settings};
use folio_server::{AppState, AutoLogin, build_router};
use folio_storage::{DocumentStore, MemoryStore};
use folio_types::{CollectionSlug, DocumentId};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};

fn test_state(store: Arc<dyn DocumentStore>) -> AppState {
    let seeder = DefaultUserSeeder::new(Credentials::development(), HashParams::fast());
    AppState::new(store, standard_lifecycle(seeder))
        .with_hash_params(HashParams::fast())
        .with_auto_login(Some(AutoLogin::default()))
}

/// Spin up the HTTP server on an OS-assigned port, returning the base URL.
async fn spawn_server(state: AppState) -> String {
    let app = build_router(state);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://127.0.0.1:{}", port)
}

async fn spawn_test_server() -> (String, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    let base = spawn_server(test_state(store.clone())).await;
    (base, store)
}

async fn create(base: &str, collection: &str, body: Value) -> Document {
    let resp = reqwest::Client::new()
        .post(format!("{}/api/{}", base, collection))
        .json(&body)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 201);
    resp.json().await.unwrap()
}

// ── Settings ─────────────────────────────────────────────────────

#[tokio::test]
async fn settings_default_to_empty_lists() {
    let (base, _) = spawn_test_server().await;
    let resp = reqwest::get(format!("{}/api/globals/settings", base)).await.unwrap();
    assert_eq!(resp.status(), 200);
    let body: Settings = resp.json().await.unwrap();
    assert_eq!(body, Settings::default());
}

#[tokio::test]
async fn saving_settings_features_referenced_documents() {
    let (base, store) = spawn_test_server().await;
    let p1 = create(&base, "pages", json!({"title": "Home"})).await;
    let p2 = create(&base, "pages", json!({"title": "About"})).await;
    let other = create(&base, "pages", json!({"title": "Draft"})).await;

    let resp = reqwest::Client::new()
        .post(format!("{}/api/globals/settings", base))
        .json(&json!({"pages": [p1.id, p2.id], "users": []}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let saved: Settings = resp.json().await.unwrap();
    assert_eq!(saved.pages, vec![p1.id, p2.id]);

    for (id, featured) in [(p1.id, true), (p2.id, true), (other.id, false)] {
        let doc = store.find_by_id(CollectionSlug::Pages, id).await.unwrap().unwrap();
        assert_eq!(doc.is_featured(), featured);
    }

    let resp = reqwest::get(format!("{}/api/globals/settings", base)).await.unwrap();
    let body: Settings = resp.json().await.unwrap();
    assert_eq!(body, saved);
}

#[tokio::test]
async fn settings_with_unknown_ids_still_save() {
    let (base, _) = spawn_test_server().await;
    let ghost = DocumentId::new();
    let resp = reqwest::Client::new()
        .post(format!("{}/api/globals/settings", base))
        .json(&json!({"users": [ghost]}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Settings = resp.json().await.unwrap();
    assert_eq!(body.users, vec![ghost]);
}

#[tokio::test]
async fn malformed_settings_are_rejected() {
    let (base, store) = spawn_test_server().await;
    let resp = reqwest::Client::new()
        .post(format!("{}/api/globals/settings", base))
        .json(&json!({"pages": ["not-an-id"]}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
    let stored = store.find_global(folio_types::GlobalSlug::Settings).await.unwrap();
    assert!(stored.is_null());
}

// ── Collections ──────────────────────────────────────────────────

#[tokio::test]
async fn created_users_never_expose_credentials() {
    let (base, store) = spawn_test_server().await;
    let user = create(
        &base,
        "users",
        json!({"email": "ada@example.com", "password": "pw", "name": "Ada"}),
    )
    .await;

    assert_eq!(user.get_str("/email"), Some("ada@example.com"));
    assert_eq!(user.get_str("/name"), Some("Ada"));
    assert!(user.data.get("password").is_none());
    assert!(user.data.get("password_hash").is_none());

    let stored = store.find_by_id(CollectionSlug::Users, user.id).await.unwrap().unwrap();
    assert!(stored.get_str("/password_hash").unwrap().starts_with("$argon2id$"));

    let listed: Vec<Document> = reqwest::get(format!("{}/api/users", base))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(listed.iter().all(|d| d.data.get("password_hash").is_none()));
}

#[tokio::test]
async fn user_without_password_is_rejected() {
    let (base, _) = spawn_test_server().await;
    let resp = reqwest::Client::new()
        .post(format!("{}/api/users", base))
        .json(&json!({"email": "ada@example.com"}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
}

async fn login(base: &str, collection: &str, email: &str, password: &str) -> reqwest::Response {
    reqwest::Client::new()
        .post(format!("{}/api/{}/login", base, collection))
        .json(&json!({"email": email, "password": password}))
        .send()
        .await
        .unwrap()
}

#[tokio::test]
async fn login_with_correct_password_returns_user() {
    let (base, _) = spawn_test_server().await;
    let user = create(
        &base,
        "users",
        json!({"email": "ada@example.com", "password": "pw", "name": "Ada"}),
    )
    .await;

    let resp = login(&base, "users", " ada@example.com ", "pw").await;
    assert_eq!(resp.status(), 200);
    let body: Document = resp.json().await.unwrap();
    assert_eq!(body.id, user.id);
    assert!(body.data.get("password_hash").is_none());
}

#[tokio::test]
async fn login_with_wrong_password_is_unauthorized() {
    let (base, _) = spawn_test_server().await;
    create(&base, "users", json!({"email": "ada@example.com", "password": "pw"})).await;

    let resp = login(&base, "users", "ada@example.com", "nope").await;
    assert_eq!(resp.status(), 401);

    let resp = login(&base, "users", "grace@example.com", "pw").await;
    assert_eq!(resp.status(), 401);
}

#[tokio::test]
async fn seeded_user_logs_in_with_auto_login_credentials() {
    let store = Arc::new(MemoryStore::new());
    let state = test_state(store);
    state.lifecycle.init(state.store.as_ref()).await.unwrap();
    let base = spawn_server(state).await;

    let prefill: Value = reqwest::get(format!("{}/api/admin/auto-login", base))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let email = prefill["email"].as_str().unwrap();
    let password = prefill["password"].as_str().unwrap();

    let resp = login(&base, "users", email, password).await;
    assert_eq!(resp.status(), 200);
}

#[tokio::test]
async fn login_on_collection_without_auth_is_404() {
    let (base, _) = spawn_test_server().await;
    let resp = login(&base, "pages", "ada@example.com", "pw").await;
    assert_eq!(resp.status(), 404);
}

#[tokio::test]
async fn duplicate_email_is_conflict() {
    let (base, store) = spawn_test_server().await;
    create(&base, "users", json!({"email": "dev@payloadcms.com", "password": "a"})).await;

    let resp = reqwest::Client::new()
        .post(format!("{}/api/users", base))
        .json(&json!({"email": "dev@payloadcms.com ", "password": "b"}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 409);
    assert_eq!(store.count(CollectionSlug::Users).await, 1);
}

#[tokio::test]
async fn list_respects_limit() {
    let (base, _) = spawn_test_server().await;
    for text in ["a", "b", "c"] {
        create(&base, "media", json!({"text": text})).await;
    }
    let docs: Vec<Document> = reqwest::get(format!("{}/api/media?limit=2", base))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(docs.len(), 2);
    assert_eq!(docs[0].get_str("/text"), Some("a"));
}

#[tokio::test]
async fn get_document_by_id() {
    let (base, _) = spawn_test_server().await;
    let page = create(&base, "pages", json!({"title": "Home"})).await;

    let resp = reqwest::get(format!("{}/api/pages/{}", base, page.id)).await.unwrap();
    assert_eq!(resp.status(), 200);
    let fetched: Document = resp.json().await.unwrap();
    assert_eq!(fetched, page);

    let resp = reqwest::get(format!("{}/api/pages/{}", base, DocumentId::new())).await.unwrap();
    assert_eq!(resp.status(), 404);

    let resp = reqwest::get(format!("{}/api/pages/not-an-id", base)).await.unwrap();
    assert_eq!(resp.status(), 400);
}

#[tokio::test]
async fn unknown_collection_returns_404() {
    let (base, _) = spawn_test_server().await;
    let resp = reqwest::get(format!("{}/api/posts", base)).await.unwrap();
    assert_eq!(resp.status(), 404);
    let body: Value = resp.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().contains("posts"));
}

#[tokio::test]
async fn non_object_body_is_rejected() {
    let (base, _) = spawn_test_server().await;
    let resp = reqwest::Client::new()
        .post(format!("{}/api/pages", base))
        .json(&json!(["title"]))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
}

// ── Admin ────────────────────────────────────────────────────────

#[tokio::test]
async fn auto_login_returns_prefill() {
    let (base, _) = spawn_test_server().await;
    let resp = reqwest::get(format!("{}/api/admin/auto-login", base)).await.unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(
        body,
        json!({"email": "dev@payloadcms.com", "password": "test", "prefill_only": true})
    );
}

#[tokio::test]
async fn auto_login_disabled_returns_404() {
    let store = Arc::new(MemoryStore::new());
    let base = spawn_server(test_state(store).with_auto_login(None)).await;
    let resp = reqwest::get(format!("{}/api/admin/auto-login", base)).await.unwrap();
    assert_eq!(resp.status(), 404);
}

// ── Startup ──────────────────────────────────────────────────────

#[tokio::test]
async fn startup_seeds_then_serves_the_seeded_user() {
    let store = Arc::new(MemoryStore::new());
    let state = test_state(store.clone());
    state.lifecycle.init(state.store.as_ref()).await.unwrap();
    let base = spawn_server(state).await;

    let users: Vec<Document> = reqwest::get(format!("{}/api/users", base))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(users.len(), 1);
    assert_eq!(users[0].get_str("/email"), Some("dev@payloadcms.com"));
}

#[tokio::test]
async fn duckdb_backed_server_features_pages() {
    let dir = tempfile::tempdir().unwrap();
    let config = folio_server::config::DatabaseConfig {
        backend: folio_server::config::Backend::Duckdb,
        path: Some(dir.path().join("folio.duckdb")),
    };
    let store = config.open().unwrap();
    let base = spawn_server(test_state(store.clone())).await;

    let page = create(&base, "pages", json!({"title": "Home"})).await;
    let resp = reqwest::Client::new()
        .post(format!("{}/api/globals/settings", base))
        .json(&json!({"pages": [page.id]}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let doc = store.find_by_id(CollectionSlug::Pages, page.id).await.unwrap().unwrap();
    assert!(doc.is_featured());
}
