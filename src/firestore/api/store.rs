use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::{json, Value as JsonValue};

use crate::firestore::api::document::Document;
use crate::firestore::constants::{DEFAULT_DATABASE_ID, FIRESTORE_API_URL};
use crate::firestore::error::{invalid_argument, not_found, FirestoreResult};
use crate::firestore::model::{collection_from_path, document_from_path, ResourcePath};
use crate::firestore::query::{QueryBuilder, StructuredQuery};
use crate::firestore::value::heuristics::reference_path;
use crate::firestore::value::{wrap_fields, NativeValue};
use crate::transport::{HttpTransport, RestRequest, TransportArc};

/// Document CRUD and queries against one project's default database.
///
/// Paths are slash-delimited and relative to the database root, e.g. `users/u1/posts`.
/// Every operation starts from a fresh copy of the store's base request, so query
/// parameters never leak between calls.
#[derive(Clone, Debug)]
pub struct DocumentStore {
    request: RestRequest,
    project_id: String,
}

impl DocumentStore {
    /// Store talking to the production endpoint over HTTPS.
    pub fn new(auth_token: impl Into<String>, project_id: impl Into<String>) -> FirestoreResult<Self> {
        let transport = HttpTransport::new()?;
        Ok(Self::with_transport(
            Arc::new(transport),
            FIRESTORE_API_URL,
            auth_token,
            project_id,
        ))
    }

    /// Store bound to an explicit transport and host, e.g. an emulator at
    /// `http://localhost:8080`.
    pub fn with_transport(
        transport: TransportArc,
        host: &str,
        auth_token: impl Into<String>,
        project_id: impl Into<String>,
    ) -> Self {
        let project_id = project_id.into();
        let base_url = format!(
            "{}/v1/projects/{}/databases/{}/documents",
            host.trim_end_matches('/'),
            project_id,
            DEFAULT_DATABASE_ID
        );
        Self {
            request: RestRequest::new(transport, base_url, Some(auth_token.into())),
            project_id,
        }
    }

    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    pub fn base_url(&self) -> &str {
        self.request.base_url()
    }

    /// Raw first-page response for `path`: a document body for document paths, a
    /// `{documents, nextPageToken}` page for collection paths.
    pub fn get(&self, path: &str) -> FirestoreResult<JsonValue> {
        Ok(self.request().get(&normalize(path))?)
    }

    pub fn get_document(&self, path: &str) -> FirestoreResult<Document> {
        let body = self.get(path)?;
        if body.get("fields").is_none() {
            return Err(not_found(format!("No document with `fields` found at path {path}")));
        }
        Document::from_json(&body)
    }

    /// Every document directly inside the collection at `path`.
    pub fn get_documents(&self, path: &str) -> FirestoreResult<Vec<Document>> {
        self.query(path).execute()
    }

    /// Ids of the documents in the collection at `path`, fetched with a name-only
    /// projection.
    pub fn get_document_ids(&self, path: &str) -> FirestoreResult<Vec<String>> {
        let documents = self.query(path).select("").execute()?;
        let prefix = format!("{}/", normalize(path));
        Ok(documents
            .iter()
            .map(|document| match reference_path(&document.path) {
                Some(relative) => relative.strip_prefix(&prefix).unwrap_or(relative).to_string(),
                None => document.id().to_string(),
            })
            .collect())
    }

    /// Lists the collection at `path`, following `nextPageToken` until the last page.
    pub fn list_documents(&self, path: &str) -> FirestoreResult<Vec<Document>> {
        let path = normalize(path);
        let mut documents = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut request = self.request();
            if let Some(token) = page_token.as_deref() {
                request.add_param("pageToken", token);
            }
            log::debug!("listing {path} (page token: {page_token:?})");
            let page = request.get(&path)?;

            if let Some(entries) = page.get("documents").and_then(JsonValue::as_array) {
                for entry in entries {
                    documents.push(Document::from_json(entry)?);
                }
            }

            page_token = page
                .get("nextPageToken")
                .and_then(JsonValue::as_str)
                .filter(|token| !token.is_empty())
                .map(str::to_string);
            if page_token.is_none() {
                break;
            }
        }

        Ok(documents)
    }

    /// Creates a document. When `path` ends in a document id that id is requested,
    /// otherwise the server assigns one.
    pub fn create_document(&self, path: &str, fields: &BTreeMap<String, NativeValue>) -> FirestoreResult<Document> {
        let (collection, document_id) = document_from_path(path);
        if collection.is_empty() {
            return Err(invalid_argument(format!("Cannot create a document at path '{path}'")));
        }
        let mut request = self.request();
        if !document_id.is_empty() {
            request.add_param("documentId", document_id);
        }
        let body = request.post(&collection, Some(wrap_fields(fields)))?;
        Document::from_json(&body)
    }

    /// Writes `fields` to the document at `path`.
    ///
    /// With `use_mask` only the listed fields are touched and an empty map sends no
    /// request at all (`Ok(None)`). Without it the document is replaced.
    pub fn update_document(
        &self,
        path: &str,
        fields: &BTreeMap<String, NativeValue>,
        use_mask: bool,
    ) -> FirestoreResult<Option<Document>> {
        let mut request = self.request();
        if use_mask {
            if fields.is_empty() {
                return Ok(None);
            }
            for field in fields.keys() {
                request.add_param("updateMask.fieldPaths", field.as_str());
            }
        }
        let body = request.patch(&normalize(path), Some(wrap_fields(fields)))?;
        Document::from_json(&body).map(Some)
    }

    /// Deletes the document at `path`. Subcollections are left in place.
    pub fn delete_document(&self, path: &str) -> FirestoreResult<()> {
        self.request().remove(&normalize(path))?;
        Ok(())
    }

    /// Starts a query over the collection at `path`. Executing it posts to the parent's
    /// `:runQuery` endpoint and keeps only result entries that carry a document.
    pub fn query(&self, path: &str) -> QueryBuilder<'static, Vec<Document>> {
        let (parent, collection_id) = collection_from_path(path);
        let request = self.request();
        QueryBuilder::new(collection_id, move |query: &StructuredQuery| {
            let body = json!({ "structuredQuery": query.to_json() });
            let response = request.post_method(&parent, "runQuery", Some(body))?;
            documents_from_run_query(&response)
        })
    }

    fn request(&self) -> RestRequest {
        self.request.clone()
    }
}

fn normalize(path: &str) -> String {
    ResourcePath::parse(path).canonical_string()
}

fn documents_from_run_query(response: &JsonValue) -> FirestoreResult<Vec<Document>> {
    let Some(entries) = response.as_array() else {
        return Ok(Vec::new());
    };
    entries
        .iter()
        .filter_map(|entry| entry.get("document"))
        .map(Document::from_json)
        .collect()
}
