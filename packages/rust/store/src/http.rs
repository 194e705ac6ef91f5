//! HTTP backend for the hosted content API.
//!
//! Endpoints (all under `{base}/v{api_version}/`):
//! - `data/query/{dataset}` — GROQ query with JSON-encoded `$param`s
//! - `data/mutate/{dataset}` — `create` / `patch` mutations
//! - `assets/{images|files}/{dataset}` — raw binary uploads

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, header};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{debug, instrument};
use url::Url;

use contentseed_shared::{Result, SeedError, StoreCredentials};

use crate::{AssetUpload, DocumentStore, Fields, KeyFilter, RemoteDocument};

/// User-Agent string for store requests.
const USER_AGENT: &str = concat!("contentseed/", env!("CARGO_PKG_VERSION"));

/// Document store backed by the content HTTP API.
pub struct HttpStore {
    client: Client,
    credentials: StoreCredentials,
}

#[derive(Debug, Deserialize)]
struct QueryResponse {
    result: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct MutateResponse {
    #[serde(default)]
    results: Vec<MutationResult>,
}

#[derive(Debug, Deserialize)]
struct MutationResult {
    id: String,
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    document: UploadedDocument,
}

#[derive(Debug, Deserialize)]
struct UploadedDocument {
    #[serde(rename = "_id")]
    id: String,
}

impl HttpStore {
    /// Create a store client for the given credentials.
    pub fn new(credentials: StoreCredentials) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| SeedError::config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            credentials,
        })
    }

    fn endpoint(&self, section: &str) -> Result<Url> {
        let path = format!(
            "v{}/{section}/{}",
            self.credentials.api_version, self.credentials.dataset
        );
        self.credentials
            .base_url
            .join(&path)
            .map_err(|e| SeedError::config(format!("invalid endpoint '{path}': {e}")))
    }

    /// Send a request and decode a JSON body, classifying every failure.
    async fn send<T: serde::de::DeserializeOwned>(
        &self,
        request: RequestBuilder,
        what: &str,
    ) -> Result<T> {
        let response = request
            .bearer_auth(&self.credentials.token)
            .send()
            .await
            .map_err(|e| network_error(what, e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SeedError::from_status(
                status.as_u16(),
                format!("{what}: {}", error_message(&body)),
            ));
        }

        let body = response.bytes().await.map_err(|e| network_error(what, e))?;
        serde_json::from_slice(&body)
            .map_err(|e| SeedError::Protocol(format!("{what}: unexpected response body: {e}")))
    }

    async fn mutate(&self, mutation: Value, what: &str) -> Result<Option<String>> {
        let mut url = self.endpoint("data/mutate")?;
        url.query_pairs_mut().append_pair("returnIds", "true");

        let response: MutateResponse = self
            .send(
                self.client
                    .post(url)
                    .json(&json!({ "mutations": [mutation] })),
                what,
            )
            .await?;
        Ok(response.results.into_iter().next().map(|r| r.id))
    }
}

#[async_trait]
impl DocumentStore for HttpStore {
    #[instrument(skip_all, fields(doc_type = %doc_type, field = filter.field(), value = filter.value()))]
    async fn query(&self, doc_type: &str, filter: &KeyFilter) -> Result<Option<RemoteDocument>> {
        let groq = format!("*[_type == $type && {} == $key][0]", filter.field());
        let url = self.endpoint("data/query")?;
        let params = [
            ("query", groq),
            ("$type", Value::from(doc_type).to_string()),
            ("$key", Value::from(filter.value()).to_string()),
        ];

        let response: QueryResponse = self
            .send(self.client.get(url).query(&params), "query")
            .await?;

        match response.result {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Object(fields)) => RemoteDocument::from_fields(fields)
                .map(Some)
                .ok_or_else(|| SeedError::Protocol("query result has no _id".into())),
            Some(other) => Err(SeedError::Protocol(format!(
                "query result is not an object: {other}"
            ))),
        }
    }

    async fn create(&self, document: &Fields) -> Result<String> {
        let id = self
            .mutate(json!({ "create": document }), "create")
            .await?;
        let id = id.ok_or_else(|| SeedError::Protocol("create returned no id".into()))?;
        debug!(%id, "document created");
        Ok(id)
    }

    async fn patch(&self, id: &str, fields: &Fields) -> Result<()> {
        self.mutate(json!({ "patch": { "id": id, "set": fields } }), "patch")
            .await?;
        debug!(%id, fields = fields.len(), "document patched");
        Ok(())
    }

    async fn upload_asset(&self, upload: AssetUpload<'_>) -> Result<String> {
        let mut url = self.endpoint(&format!("assets/{}", upload.kind.endpoint()))?;
        url.query_pairs_mut().append_pair("filename", upload.filename);

        let response: UploadResponse = self
            .send(
                self.client
                    .post(url)
                    .header(header::CONTENT_TYPE, upload.content_type)
                    .body(upload.bytes.to_vec()),
                "upload",
            )
            .await?;
        Ok(response.document.id)
    }

    fn name(&self) -> &str {
        "http"
    }
}

/// Classify a transport-level failure.
///
/// Anything that went wrong before a complete response arrived (connect,
/// DNS, reset, timeout) is transient.
fn network_error(what: &str, e: reqwest::Error) -> SeedError {
    if e.is_timeout() || e.is_connect() || e.is_request() || e.is_body() {
        SeedError::Transient(format!("{what}: {e}"))
    } else {
        SeedError::Protocol(format!("{what}: {e}"))
    }
}

/// Pull a readable message out of an API error body.
fn error_message(body: &str) -> String {
    let parsed: Option<Value> = serde_json::from_str(body).ok();
    let description = parsed.as_ref().and_then(|v| {
        v.pointer("/error/description")
            .or_else(|| v.get("message"))
            .or_else(|| v.get("error"))
            .and_then(Value::as_str)
            .map(str::to_string)
    });
    description.unwrap_or_else(|| body.chars().take(200).collect())
}
