//! DuckDB-backed document store.
//!
//! Documents are stored as JSON text keyed by id; collection membership is a
//! plain column. Globals live in their own table, one row per slug.

use crate::error::{StorageError, StorageResult};
use crate::store::{DocumentStore, FindQuery, Filter, dedup_ids, now_millis};
use async_trait::async_trait;
use duckdb::{Connection, params};
use folio_model::Document;
use folio_types::{CollectionSlug, DocumentId, GlobalSlug};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, warn};

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS documents (
        id VARCHAR PRIMARY KEY,
        collection VARCHAR NOT NULL,
        data VARCHAR NOT NULL,
        created_at BIGINT NOT NULL,
        updated_at BIGINT NOT NULL
    );
    CREATE TABLE IF NOT EXISTS globals (
        slug VARCHAR PRIMARY KEY,
        data VARCHAR NOT NULL,
        updated_at BIGINT NOT NULL
    );
";

const SELECT_DOCUMENT: &str =
    "SELECT id, collection, data, created_at, updated_at FROM documents";

/// Open a DuckDB connection with stale WAL recovery.
///
/// If the initial open fails and a `.wal` file exists alongside the database,
/// it is removed and the open is retried once. An unclean shutdown can leave
/// such a file behind and block every later open.
pub fn open_duckdb_with_wal_recovery(path: &Path) -> StorageResult<Connection> {
    match Connection::open(path) {
        Ok(conn) => Ok(conn),
        Err(first_err) => {
            let wal_path = path.with_extension(
                path.extension()
                    .map(|ext| format!("{}.wal", ext.to_string_lossy()))
                    .unwrap_or_else(|| "wal".to_string()),
            );
            if wal_path.exists() {
                warn!(
                    "DuckDB open failed, removing stale WAL and retrying: {}",
                    wal_path.display()
                );
                if std::fs::remove_file(&wal_path).is_ok() {
                    return Connection::open(path).map_err(Into::into);
                }
            }
            Err(first_err.into())
        }
    }
}

/// Document store persisted in a DuckDB database.
pub struct DuckDbStore {
    conn: Mutex<Connection>,
}

impl DuckDbStore {
    /// Opens (or creates) the database at `path`.
    pub fn open(path: &Path) -> StorageResult<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        Self::with_connection(open_duckdb_with_wal_recovery(path)?)
    }

    /// Opens a throwaway in-memory database.
    pub fn open_in_memory() -> StorageResult<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> StorageResult<Self> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> StorageResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| StorageError::Unavailable("connection lock poisoned".into()))
    }
}

type DocumentRow = (String, String, String, i64, i64);

fn read_row(row: &duckdb::Row<'_>) -> duckdb::Result<DocumentRow> {
    Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?, row.get(4)?))
}

fn into_document(
    (id, collection, data, created_at, updated_at): DocumentRow,
) -> StorageResult<Document> {
    Ok(Document {
        id: DocumentId::parse(&id)
            .map_err(|e| StorageError::InvalidData(format!("bad id {id}: {e}")))?,
        collection: collection
            .parse()
            .map_err(|e: folio_types::Error| StorageError::InvalidData(e.to_string()))?,
        data: serde_json::from_str(&data)?,
        created_at,
        updated_at,
    })
}

fn select_by_id(
    conn: &Connection,
    collection: CollectionSlug,
    id: DocumentId,
) -> StorageResult<Option<Document>> {
    let mut stmt = conn.prepare(&format!("{SELECT_DOCUMENT} WHERE collection = ? AND id = ?"))?;
    let mut rows = stmt.query_map(params![collection.as_str(), id.to_string()], read_row)?;
    let row = rows.next().transpose()?;
    row.map(into_document).transpose()
}

#[async_trait]
impl DocumentStore for DuckDbStore {
    fn backend_name(&self) -> &'static str {
        "duckdb"
    }

    async fn find(
        &self,
        collection: CollectionSlug,
        query: FindQuery,
    ) -> StorageResult<Vec<Document>> {
        let conn = self.lock()?;
        let limit = query.limit.unwrap_or(usize::MAX);

        let mut docs = match &query.filter {
            Some(Filter::IdIn(ids)) => {
                let mut docs = Vec::with_capacity(ids.len());
                for id in dedup_ids(ids) {
                    if let Some(doc) = select_by_id(&conn, collection, id)? {
                        docs.push(doc);
                    }
                }
                docs.sort_by_key(|d| d.id);
                docs
            }
            filter => {
                let mut stmt = conn.prepare(&format!(
                    "{SELECT_DOCUMENT} WHERE collection = ? ORDER BY id"
                ))?;
                let rows = stmt.query_map(params![collection.as_str()], read_row)?;
                let mut docs = Vec::new();
                for row in rows {
                    let doc = into_document(row?)?;
                    if filter.as_ref().is_some_and(|f| !f.matches(&doc)) {
                        continue;
                    }
                    docs.push(doc);
                    if docs.len() >= limit {
                        break;
                    }
                }
                docs
            }
        };
        docs.truncate(limit);
        Ok(docs)
    }

    async fn create(
        &self,
        collection: CollectionSlug,
        data: serde_json::Value,
    ) -> StorageResult<Document> {
        if !data.is_object() {
            return Err(StorageError::InvalidData(format!(
                "{collection} document must be a JSON object"
            )));
        }

        let now = now_millis();
        let doc = Document {
            id: DocumentId::new(),
            collection,
            data,
            created_at: now,
            updated_at: now,
        };

        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO documents (id, collection, data, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?)",
            params![
                doc.id.to_string(),
                collection.as_str(),
                serde_json::to_string(&doc.data)?,
                doc.created_at,
                doc.updated_at
            ],
        )?;
        debug!("Created document {} in {}", doc.id, collection);
        Ok(doc)
    }

    async fn update(
        &self,
        collection: CollectionSlug,
        ids: &[DocumentId],
        patch: &serde_json::Value,
    ) -> StorageResult<Vec<Document>> {
        if !patch.is_object() {
            return Err(StorageError::InvalidData("patch must be a JSON object".into()));
        }

        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        let now = now_millis();
        let mut updated = Vec::new();

        for id in dedup_ids(ids) {
            let Some(mut doc) = select_by_id(&tx, collection, id)? else {
                continue;
            };
            doc.apply_patch(patch);
            doc.updated_at = now;
            tx.execute(
                "UPDATE documents SET data = ?, updated_at = ? WHERE id = ?",
                params![serde_json::to_string(&doc.data)?, doc.updated_at, doc.id.to_string()],
            )?;
            updated.push(doc);
        }

        tx.commit()?;
        debug!(
            "Updated {}/{} documents in {}",
            updated.len(),
            ids.len(),
            collection
        );
        Ok(updated)
    }

    async fn find_global(&self, slug: GlobalSlug) -> StorageResult<serde_json::Value> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare("SELECT data FROM globals WHERE slug = ?")?;
        let mut rows = stmt.query_map(params![slug.as_str()], |row| row.get::<_, String>(0))?;
        match rows.next().transpose()? {
            Some(text) => Ok(serde_json::from_str(&text)?),
            None => Ok(serde_json::Value::Null),
        }
    }

    async fn update_global(
        &self,
        slug: GlobalSlug,
        data: serde_json::Value,
    ) -> StorageResult<serde_json::Value> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT OR REPLACE INTO globals (slug, data, updated_at) VALUES (?, ?, ?)",
            params![slug.as_str(), serde_json::to_string(&data)?, now_millis()],
        )?;
        debug!("Updated global {}", slug);
        Ok(data)
    }
}
