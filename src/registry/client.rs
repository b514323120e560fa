use std::time::Duration;

use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tracing::debug;
use url::Url;

use super::error::RegistryError;
use super::types::{
    GraphQlResponse, LangFilesData, LatestSchema, PresencesData, PublishedMetadata,
    PublishedPresence,
};
use super::Registry;
use crate::config::LintConfig;

const PRESENCES_QUERY: &str = "query Presences($service: StringOrStringArray) { presences(service: $service) { metadata { service version } } }";
const LANGUAGES_QUERY: &str = "query Languages { langFiles(project: \"presence\") { lang } }";

/// HTTP client for the presence registry and schema source.
#[derive(Debug, Clone)]
pub struct RegistryClient {
    http: reqwest::Client,
    registry_url: Url,
    schema_url: Url,
}

impl RegistryClient {
    pub fn new(config: &LintConfig) -> Result<Self, RegistryError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .default_headers({
                let mut headers = HeaderMap::new();
                headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
                headers
            })
            .build()
            .map_err(RegistryError::Client)?;

        Ok(Self {
            http,
            registry_url: config.registry_url.clone(),
            schema_url: config.schema_url.clone(),
        })
    }

    /// All published presences registered under `service`.
    pub async fn presences(&self, service: &str) -> Result<Vec<PublishedPresence>, RegistryError> {
        let data: PresencesData = self
            .graphql(PRESENCES_QUERY, json!({ "service": service }))
            .await?;
        debug!(service, count = data.presences.len(), "fetched published presences");
        Ok(data.presences)
    }

    /// Language tags the catalog accepts, in registry order.
    pub async fn languages(&self) -> Result<Vec<String>, RegistryError> {
        let data: LangFilesData = self.graphql(LANGUAGES_QUERY, json!({})).await?;
        debug!(count = data.lang_files.len(), "fetched language list");
        Ok(data.lang_files.into_iter().map(|f| f.lang).collect())
    }

    /// Download the current metadata schema.
    pub async fn latest_schema(&self) -> Result<LatestSchema, RegistryError> {
        let endpoint = self.schema_url.to_string();
        let resp = self
            .http
            .get(self.schema_url.clone())
            .send()
            .await
            .map_err(|source| RegistryError::Http {
                endpoint: endpoint.clone(),
                source,
            })?;

        let resp = check_status(&endpoint, resp).await?;
        let document: Value = resp
            .json()
            .await
            .map_err(|source| RegistryError::Deserialization {
                endpoint: endpoint.clone(),
                source,
            })?;

        let schema = LatestSchema::from_document(&endpoint, document);
        debug!(id = %schema.id, "fetched metadata schema");
        Ok(schema)
    }

    async fn graphql<T: DeserializeOwned>(
        &self,
        query: &str,
        variables: Value,
    ) -> Result<T, RegistryError> {
        let endpoint = self.registry_url.to_string();
        let resp = self
            .http
            .post(self.registry_url.clone())
            .json(&json!({ "query": query, "variables": variables }))
            .send()
            .await
            .map_err(|source| RegistryError::Http {
                endpoint: endpoint.clone(),
                source,
            })?;

        let resp = check_status(&endpoint, resp).await?;
        let body: GraphQlResponse<T> =
            resp.json().await.map_err(|source| RegistryError::Deserialization {
                endpoint: endpoint.clone(),
                source,
            })?;

        if !body.errors.is_empty() {
            let message = body
                .errors
                .iter()
                .map(|e| e.message.as_str())
                .collect::<Vec<_>>()
                .join("; ");
            return Err(RegistryError::Query { endpoint, message });
        }

        body.data.ok_or_else(|| RegistryError::Query {
            endpoint,
            message: "response contained no data".to_string(),
        })
    }
}

async fn check_status(
    endpoint: &str,
    resp: reqwest::Response,
) -> Result<reqwest::Response, RegistryError> {
    if resp.status().is_success() {
        return Ok(resp);
    }
    let status = resp.status().as_u16();
    let body = resp.text().await.unwrap_or_default();
    Err(RegistryError::Status {
        endpoint: endpoint.to_string(),
        status,
        body,
    })
}

impl Registry for RegistryClient {
    async fn published(&self, service: &str) -> Result<Option<PublishedMetadata>, RegistryError> {
        Ok(self
            .presences(service)
            .await?
            .into_iter()
            .map(|p| p.metadata)
            .find(|m| m.service == service))
    }
}
