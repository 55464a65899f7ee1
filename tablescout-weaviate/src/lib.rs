//! Weaviate-backed schema index for TableScout.

mod config;
mod error;
mod ingest;
pub mod mapper;

use std::fmt;

use mapper::{
    build_ddl_query, build_hybrid_query, build_neighbors_query, graphql_hit_to_neighbors,
    graphql_hits_to_ddl, graphql_hits_to_table_hits, GraphQlRequest, GraphQlResponse,
};
use serde::Deserialize;
use serde_json::Value as JsonValue;
use tablescout_core::{DdlLookup, IndexError, SchemaIndex, TableHit, TableNeighbor};

pub use config::{WeaviateIndexBuilder, DEFAULT_CLASS_NAME};
pub use error::WeaviateIndexError;
pub use ingest::IngestReport;

const FOREIGN_KEY_RELATIONSHIP: &str = "FK";
const UNKNOWN_JOIN_CONDITION: &str = "unknown";

/// Vectorizer module configured on the index class.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Vectorizer {
    #[default]
    None,
    Text2VecOpenAi,
}

impl Vectorizer {
    pub fn module_name(self) -> &'static str {
        match self {
            Vectorizer::None => "none",
            Vectorizer::Text2VecOpenAi => "text2vec-openai",
        }
    }
}

impl std::str::FromStr for Vectorizer {
    type Err = WeaviateIndexError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "none" | "" => Ok(Vectorizer::None),
            "text2vec-openai" => Ok(Vectorizer::Text2VecOpenAi),
            other => Err(WeaviateIndexError::InvalidConfig(format!(
                "unsupported vectorizer '{other}'"
            ))),
        }
    }
}

#[derive(Clone)]
pub struct WeaviateSchemaIndex {
    pub(crate) client: reqwest::Client,
    pub(crate) base_url: String,
    pub(crate) class_name: String,
    pub(crate) api_key: Option<String>,
    pub(crate) vectorizer: Vectorizer,
    pub(crate) alpha: Option<f32>,
}

impl fmt::Debug for WeaviateSchemaIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let api_key = if self.api_key.is_some() {
            "<redacted>"
        } else {
            "<none>"
        };

        f.debug_struct("WeaviateSchemaIndex")
            .field("base_url", &self.base_url)
            .field("class_name", &self.class_name)
            .field("api_key", &api_key)
            .field("vectorizer", &self.vectorizer)
            .field("alpha", &self.alpha)
            .finish()
    }
}

impl WeaviateSchemaIndex {
    pub fn builder() -> WeaviateIndexBuilder {
        WeaviateIndexBuilder::new()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    pub fn vectorizer(&self) -> Vectorizer {
        self.vectorizer
    }

    fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    pub(crate) fn request_builder(
        &self,
        method: reqwest::Method,
        path: &str,
    ) -> reqwest::RequestBuilder {
        let request = self.client.request(method, self.endpoint(path));
        if let Some(api_key) = self.api_key.as_deref() {
            request.header("Authorization", format!("Bearer {api_key}"))
        } else {
            request
        }
    }

    pub(crate) async fn send_json(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<JsonValue, WeaviateIndexError> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(self.http_error_from_response(status.as_u16(), &body));
        }

        if body.trim().is_empty() {
            return Ok(JsonValue::Null);
        }

        serde_json::from_str(&body).map_err(|err| WeaviateIndexError::InvalidResponse {
            message: format!("failed to decode weaviate response body: {err}"),
        })
    }

    /// Runs a GraphQL query and returns its `data` member.
    async fn graphql(&self, query: String) -> Result<JsonValue, WeaviateIndexError> {
        tracing::debug!(class = %self.class_name, %query, "weaviate graphql query");
        let response = self
            .send_json(
                self.request_builder(reqwest::Method::POST, "v1/graphql")
                    .json(&GraphQlRequest { query }),
            )
            .await?;

        let envelope: GraphQlResponse =
            serde_json::from_value(response).map_err(|err| WeaviateIndexError::InvalidResponse {
                message: format!("failed to decode GraphQL envelope: {err}"),
            })?;

        if let Some(first_error) = envelope.errors.first() {
            let message = first_error.message.clone();
            if is_class_not_found_message(&message) {
                return Err(WeaviateIndexError::ClassNotFound {
                    class_name: self.class_name.clone(),
                    message,
                });
            }
            return Err(WeaviateIndexError::InvalidResponse { message });
        }

        envelope
            .data
            .ok_or_else(|| WeaviateIndexError::InvalidResponse {
                message: "missing GraphQL data in response".to_string(),
            })
    }

    pub async fn search_tables(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<Vec<TableHit>, WeaviateIndexError> {
        if limit == 0 {
            return Ok(Vec::new());
        }
        let data = self
            .graphql(build_hybrid_query(&self.class_name, query, limit, self.alpha))
            .await?;
        graphql_hits_to_table_hits(&data, &self.class_name)
    }

    pub async fn fetch_ddl(
        &self,
        table_names: &[String],
        minimal: bool,
    ) -> Result<DdlLookup, WeaviateIndexError> {
        let mut distinct: Vec<&str> = Vec::new();
        for name in table_names {
            if !distinct.contains(&name.as_str()) {
                distinct.push(name.as_str());
            }
        }
        if distinct.is_empty() {
            return Ok(DdlLookup::new());
        }

        let data = self
            .graphql(build_ddl_query(&self.class_name, &distinct, minimal))
            .await?;
        let mut found = graphql_hits_to_ddl(&data, &self.class_name, minimal)?;

        // Keep the caller's order, not the backend's.
        Ok(distinct
            .into_iter()
            .filter_map(|name| found.remove(name).map(|ddl| (name, ddl)))
            .collect())
    }

    pub async fn fetch_neighbors(
        &self,
        table_name: &str,
    ) -> Result<Vec<TableNeighbor>, WeaviateIndexError> {
        let data = self
            .graphql(build_neighbors_query(&self.class_name, table_name))
            .await?;
        let Some(hit) = graphql_hit_to_neighbors(&data, &self.class_name, table_name)? else {
            return Ok(Vec::new());
        };

        let mut neighbors = Vec::new();
        for related in hit.related {
            match hit.join_hints.get(&related) {
                Some(conditions) if !conditions.is_empty() => {
                    for condition in conditions {
                        neighbors.push(TableNeighbor {
                            related_table: related.clone(),
                            relationship_type: FOREIGN_KEY_RELATIONSHIP.to_string(),
                            join_condition: condition.clone(),
                        });
                    }
                }
                _ => neighbors.push(TableNeighbor {
                    related_table: related,
                    relationship_type: FOREIGN_KEY_RELATIONSHIP.to_string(),
                    join_condition: UNKNOWN_JOIN_CONDITION.to_string(),
                }),
            }
        }
        Ok(neighbors)
    }

    fn http_error_from_response(&self, status: u16, body: &str) -> WeaviateIndexError {
        let message = weaviate_error_message(body);
        if is_class_not_found_message(&message) {
            return WeaviateIndexError::ClassNotFound {
                class_name: self.class_name.clone(),
                message,
            };
        }

        WeaviateIndexError::HttpStatus { status, message }
    }
}

#[async_trait::async_trait]
impl SchemaIndex for WeaviateSchemaIndex {
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<TableHit>, IndexError> {
        self.search_tables(query, limit)
            .await
            .map_err(IndexError::from)
    }

    async fn table_ddl(
        &self,
        table_names: &[String],
        minimal: bool,
    ) -> Result<DdlLookup, IndexError> {
        self.fetch_ddl(table_names, minimal)
            .await
            .map_err(IndexError::from)
    }

    async fn neighbors(&self, table_name: &str) -> Result<Vec<TableNeighbor>, IndexError> {
        self.fetch_neighbors(table_name)
            .await
            .map_err(IndexError::from)
    }
}

#[derive(Debug, Deserialize)]
struct WeaviateErrorEnvelope {
    #[serde(default)]
    error: Vec<WeaviateErrorMessage>,
}

#[derive(Debug, Deserialize)]
struct WeaviateErrorMessage {
    message: String,
}

pub(crate) fn weaviate_error_message(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return "unknown weaviate error".to_string();
    }

    serde_json::from_str::<WeaviateErrorEnvelope>(trimmed)
        .ok()
        .and_then(|envelope| envelope.error.into_iter().next().map(|entry| entry.message))
        .unwrap_or_else(|| trimmed.to_string())
}

fn is_class_not_found_message(message: &str) -> bool {
    let normalized = message.to_lowercase();
    (normalized.contains("class") && normalized.contains("not found"))
        || normalized.contains("cannot query field")
}
