//! REST handlers over the document store.

use crate::AppState;
use crate::error::{ApiError, ApiResult};
use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use folio_auth::{Credentials, EMAIL_FIELD, user_document, verify_password};
use folio_model::{Document, PASSWORD_HASH_FIELD, Settings};
use folio_storage::{DocumentStore, Filter, FindQuery, StorageError};
use folio_types::{CollectionSlug, DocumentId, GlobalSlug};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::config::AutoLogin;

#[derive(Debug, Deserialize)]
pub(crate) struct ListParams {
    limit: Option<usize>,
}

fn collection_slug(name: &str) -> ApiResult<CollectionSlug> {
    name.parse()
        .map_err(|_| ApiError::NotFound(format!("collection '{name}'")))
}

fn auth_collection(state: &AppState, name: &str) -> ApiResult<CollectionSlug> {
    let collection = collection_slug(name)?;
    match state.schema.collection(collection) {
        Some(schema) if schema.auth => Ok(collection),
        _ => Err(ApiError::NotFound(format!("{collection} has no login"))),
    }
}

async fn find_by_email(
    store: &dyn DocumentStore,
    collection: CollectionSlug,
    email: &str,
) -> ApiResult<Option<Document>> {
    let query = FindQuery::filter(Filter::field_eq(EMAIL_FIELD, email)).with_limit(1);
    Ok(store.find(collection, query).await?.pop())
}

pub(crate) async fn get_settings(State(state): State<AppState>) -> ApiResult<Json<Settings>> {
    let stored = state.store.find_global(GlobalSlug::Settings).await?;
    // Stored data that no longer parses is a server-side fault.
    let settings = Settings::from_value(&stored).map_err(StorageError::from)?;
    Ok(Json(settings))
}

/// Replaces the settings global, then runs the post-change observers. The
/// write stands whatever the observers report.
pub(crate) async fn update_settings(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> ApiResult<Json<Settings>> {
    let settings = Settings::from_value(&body).map_err(|e| ApiError::BadRequest(e.to_string()))?;
    let stored = state
        .store
        .update_global(GlobalSlug::Settings, settings.to_value())
        .await?;

    let failures = state
        .lifecycle
        .after_global_change(GlobalSlug::Settings, &stored, state.store.as_ref())
        .await;
    if !failures.is_empty() {
        debug!("{} observer(s) failed after settings change", failures.len());
    }
    Ok(Json(settings))
}

pub(crate) async fn list_documents(
    State(state): State<AppState>,
    Path(collection): Path<String>,
    Query(params): Query<ListParams>,
) -> ApiResult<Json<Vec<Document>>> {
    let collection = collection_slug(&collection)?;
    let query = FindQuery {
        filter: None,
        limit: params.limit,
    };
    let docs = state.store.find(collection, query).await?;
    Ok(Json(docs.iter().map(Document::redacted).collect()))
}

pub(crate) async fn get_document(
    State(state): State<AppState>,
    Path((collection, id)): Path<(String, String)>,
) -> ApiResult<Json<Document>> {
    let collection = collection_slug(&collection)?;
    let id = DocumentId::parse(&id)
        .map_err(|_| ApiError::BadRequest(format!("invalid id '{id}'")))?;
    state
        .store
        .find_by_id(collection, id)
        .await?
        .map(|doc| Json(doc.redacted()))
        .ok_or_else(|| ApiError::NotFound(format!("{collection}/{id}")))
}

pub(crate) async fn create_document(
    State(state): State<AppState>,
    Path(collection): Path<String>,
    Json(body): Json<Value>,
) -> ApiResult<(StatusCode, Json<Document>)> {
    let collection = collection_slug(&collection)?;
    let Value::Object(mut fields) = body else {
        return Err(ApiError::BadRequest("body must be a JSON object".into()));
    };

    // Auth collections take a plaintext password and store only its hash.
    let is_auth = state
        .schema
        .collection(collection)
        .is_some_and(|schema| schema.auth);
    if is_auth {
        fields.remove(PASSWORD_HASH_FIELD);
        let credentials = Credentials::new(
            take_string(&mut fields, "email")?,
            take_string(&mut fields, "password")?,
        );
        let email = credentials.email.trim();
        if find_by_email(state.store.as_ref(), collection, email).await?.is_some() {
            return Err(ApiError::Conflict(format!("{collection} email '{email}' is taken")));
        }
        if let Value::Object(creds) = user_document(&credentials, &state.hash_params)? {
            fields.extend(creds);
        }
    }

    let doc = state.store.create(collection, Value::Object(fields)).await?;
    Ok((StatusCode::CREATED, Json(doc.redacted())))
}

/// Checks an email / password pair against an auth collection and returns
/// the matching user.
pub(crate) async fn login(
    State(state): State<AppState>,
    Path(collection): Path<String>,
    Json(credentials): Json<Credentials>,
) -> ApiResult<Json<Document>> {
    let collection = auth_collection(&state, &collection)?;
    let rejected = || ApiError::Unauthorized("invalid email or password".into());

    let email = credentials.email.trim();
    let Some(user) = find_by_email(state.store.as_ref(), collection, email).await? else {
        debug!("Login for unknown {collection} email {email}");
        return Err(rejected());
    };
    let Some(hash) = user.data.get(PASSWORD_HASH_FIELD).and_then(Value::as_str) else {
        return Err(rejected());
    };
    if !verify_password(&credentials.password, hash)? {
        debug!("Wrong password for {collection} {}", user.id);
        return Err(rejected());
    }
    Ok(Json(user.redacted()))
}

pub(crate) async fn auto_login(State(state): State<AppState>) -> ApiResult<Json<AutoLogin>> {
    state
        .auto_login
        .clone()
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("auto-login is disabled".into()))
}

fn take_string(fields: &mut serde_json::Map<String, Value>, key: &str) -> ApiResult<String> {
    match fields.remove(key) {
        Some(Value::String(s)) => Ok(s),
        _ => Err(ApiError::BadRequest(format!("'{key}' must be a string"))),
    }
}
