//! # Document Store REST Client
//!
//! Keyed reads and writes plus ordered collection scans. Writes go through
//! the conditional-create path where the spec requires exactly-once
//! semantics (`documentId` create, duplicate → [`StoreError::AlreadyExists`]).

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::error::{Result, StoreError};
use crate::value::{decode_document, encode_document};

/// Default base URL for the document store API
const DEFAULT_API_BASE: &str = "https://firestore.googleapis.com/v1";

/// A collection the portal reads or writes, with the record field that
/// mirrors the document id.
#[derive(Debug, Clone, Copy)]
pub struct Collection {
    pub path: &'static str,
    pub id_field: &'static str,
}

/// `users/{uid}` profile documents
pub const USERS: Collection = Collection {
    path: "users",
    id_field: "userId",
};

/// Club catalogue
pub const CLUBS: Collection = Collection {
    path: "clubs",
    id_field: "clubId",
};

/// Event calendar, scanned ordered by start time
pub const EVENTS: Collection = Collection {
    path: "events",
    id_field: "eventId",
};

/// Club post feed, scanned ordered by creation time
pub const CLUB_POSTS: Collection = Collection {
    path: "clubPosts",
    id_field: "postId",
};

/// Sort direction for collection scans.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Ascending,
    Descending,
}

impl Direction {
    fn as_wire(&self) -> &'static str {
        match self {
            Direction::Ascending => "ASCENDING",
            Direction::Descending => "DESCENDING",
        }
    }
}

/// Connection settings for the document store.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub project_id: String,
    pub api_base: String,
}

impl StoreConfig {
    pub fn new(project_id: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            api_base: DEFAULT_API_BASE.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct WireDocument {
    name: String,
    #[serde(default)]
    fields: Map<String, Value>,
}

impl WireDocument {
    /// Trailing segment of the full resource name
    fn document_id(&self) -> &str {
        self.name.rsplit('/').next().unwrap_or(&self.name)
    }
}

#[derive(Debug, Deserialize)]
struct QueryResult {
    document: Option<WireDocument>,
}

#[derive(Debug, Default, Deserialize)]
struct StoreErrorBody {
    error: Option<StoreErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct StoreErrorDetail {
    #[serde(default)]
    message: String,
    #[serde(default)]
    status: String,
}

/// HTTP client for the document store.
pub struct StoreClient {
    client: reqwest::Client,
    config: StoreConfig,
}

impl StoreClient {
    /// Create a client with a 10 second timeout to prevent hanging the caller.
    pub fn new(config: StoreConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(10))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self { client, config }
    }

    fn documents_root(&self) -> String {
        format!(
            "{}/projects/{}/databases/(default)/documents",
            self.config.api_base, self.config.project_id
        )
    }

    fn with_bearer(
        &self,
        request: reqwest::RequestBuilder,
        bearer: Option<&str>,
    ) -> reqwest::RequestBuilder {
        match bearer {
            Some(token) => request.header("Authorization", format!("Bearer {}", token)),
            None => request,
        }
    }

    async fn error_from(response: reqwest::Response) -> StoreError {
        let status = response.status().as_u16();
        let body = response.json::<StoreErrorBody>().await.unwrap_or_default();
        let (message, code) = match body.error {
            Some(detail) => (detail.message, detail.status),
            None => (String::new(), String::new()),
        };

        match (status, code.as_str()) {
            (409, _) | (_, "ALREADY_EXISTS") => StoreError::AlreadyExists,
            (401, _) | (403, _) => StoreError::Unauthorized,
            _ => StoreError::Status { status, message },
        }
    }

    /// Fetch one document by id; a missing document is `None`, not an error.
    #[tracing::instrument(skip(self, bearer), fields(collection = collection.path, id = %id))]
    pub async fn get_document<T: DeserializeOwned>(
        &self,
        collection: &Collection,
        id: &str,
        bearer: Option<&str>,
    ) -> Result<Option<T>> {
        let url = format!("{}/{}/{}", self.documents_root(), collection.path, id);
        let response = self
            .with_bearer(self.client.get(&url), bearer)
            .send()
            .await
            .map_err(|e| StoreError::Network(e.to_string()))?;

        if response.status().as_u16() == 404 {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(Self::error_from(response).await);
        }

        let document: WireDocument = response
            .json()
            .await
            .map_err(|e| StoreError::Decode(e.to_string()))?;
        let record = decode_document(&document.fields, collection.id_field, document.document_id())?;
        Ok(Some(record))
    }

    /// Create a document with a caller-chosen id. The store itself rejects
    /// duplicates, which surfaces as [`StoreError::AlreadyExists`].
    #[tracing::instrument(skip(self, record, bearer), fields(collection = collection.path, id = %id))]
    pub async fn create_document<T: Serialize>(
        &self,
        collection: &Collection,
        id: &str,
        record: &T,
        bearer: Option<&str>,
    ) -> Result<()> {
        let url = format!(
            "{}/{}?documentId={}",
            self.documents_root(),
            collection.path,
            id
        );
        let body = encode_document(record)?;
        let response = self
            .with_bearer(self.client.post(&url), bearer)
            .json(&body)
            .send()
            .await
            .map_err(|e| StoreError::Network(e.to_string()))?;

        if response.status().is_success() {
            tracing::info!("Document created");
            Ok(())
        } else {
            Err(Self::error_from(response).await)
        }
    }

    /// Overwrite a document's fields.
    #[tracing::instrument(skip(self, record, bearer), fields(collection = collection.path, id = %id))]
    pub async fn patch_document<T: Serialize>(
        &self,
        collection: &Collection,
        id: &str,
        record: &T,
        bearer: Option<&str>,
    ) -> Result<()> {
        let url = format!("{}/{}/{}", self.documents_root(), collection.path, id);
        let body = encode_document(record)?;
        let response = self
            .with_bearer(self.client.patch(&url), bearer)
            .json(&body)
            .send()
            .await
            .map_err(|e| StoreError::Network(e.to_string()))?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(Self::error_from(response).await)
        }
    }

    /// Scan a collection ordered by one field.
    #[tracing::instrument(skip(self, bearer), fields(collection = collection.path, order_by = %order_by))]
    pub async fn run_query<T: DeserializeOwned>(
        &self,
        collection: &Collection,
        order_by: &str,
        direction: Direction,
        limit: Option<u32>,
        bearer: Option<&str>,
    ) -> Result<Vec<T>> {
        let url = format!("{}:runQuery", self.documents_root());
        let body = build_query(collection, order_by, direction, limit);
        let response = self
            .with_bearer(self.client.post(&url), bearer)
            .json(&body)
            .send()
            .await
            .map_err(|e| StoreError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Self::error_from(response).await);
        }

        let results: Vec<QueryResult> = response
            .json()
            .await
            .map_err(|e| StoreError::Decode(e.to_string()))?;

        let mut records = Vec::new();
        for result in results {
            // Result entries without a document carry only read metadata
            if let Some(document) = result.document {
                records.push(decode_document(
                    &document.fields,
                    collection.id_field,
                    document.document_id(),
                )?);
            }
        }
        Ok(records)
    }
}

fn build_query(
    collection: &Collection,
    order_by: &str,
    direction: Direction,
    limit: Option<u32>,
) -> Value {
    let mut query = json!({
        "from": [{ "collectionId": collection.path }],
        "orderBy": [{
            "field": { "fieldPath": order_by },
            "direction": direction.as_wire(),
        }],
    });
    if let Some(limit) = limit {
        query["limit"] = json!(limit);
    }
    json!({ "structuredQuery": query })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_documents_root_shape() {
        let client = StoreClient::new(StoreConfig::new("slugscene-dev"));
        assert_eq!(
            client.documents_root(),
            "https://firestore.googleapis.com/v1/projects/slugscene-dev/databases/(default)/documents"
        );
    }

    #[test]
    fn test_wire_document_id_is_trailing_segment() {
        let document = WireDocument {
            name: "projects/p/databases/(default)/documents/clubs/club123".to_string(),
            fields: Map::new(),
        };
        assert_eq!(document.document_id(), "club123");
    }

    #[test]
    fn test_build_query_orders_and_limits() {
        let body = build_query(&EVENTS, "startTime", Direction::Ascending, Some(50));

        assert_eq!(
            body["structuredQuery"]["from"][0]["collectionId"],
            "events"
        );
        assert_eq!(
            body["structuredQuery"]["orderBy"][0]["field"]["fieldPath"],
            "startTime"
        );
        assert_eq!(
            body["structuredQuery"]["orderBy"][0]["direction"],
            "ASCENDING"
        );
        assert_eq!(body["structuredQuery"]["limit"], 50);
    }

    #[test]
    fn test_build_query_without_limit() {
        let body = build_query(&CLUBS, "name", Direction::Descending, None);
        assert!(body["structuredQuery"].get("limit").is_none());
        assert_eq!(
            body["structuredQuery"]["orderBy"][0]["direction"],
            "DESCENDING"
        );
    }
}
