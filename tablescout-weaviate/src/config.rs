use std::fmt;
use std::time::Duration;

use crate::{Vectorizer, WeaviateIndexError, WeaviateSchemaIndex};

pub const DEFAULT_CLASS_NAME: &str = "TableSchema";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Default, Clone)]
pub struct WeaviateIndexBuilder {
    base_url: Option<String>,
    class_name: Option<String>,
    api_key: Option<String>,
    vectorizer: Vectorizer,
    alpha: Option<f32>,
    timeout: Option<Duration>,
}

impl fmt::Debug for WeaviateIndexBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let api_key = if self.api_key.is_some() {
            "<redacted>"
        } else {
            "<none>"
        };

        f.debug_struct("WeaviateIndexBuilder")
            .field("base_url", &self.base_url)
            .field("class_name", &self.class_name)
            .field("api_key", &api_key)
            .field("vectorizer", &self.vectorizer)
            .field("alpha", &self.alpha)
            .finish()
    }
}

impl WeaviateIndexBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn base_url(mut self, value: impl Into<String>) -> Self {
        self.base_url = Some(value.into());
        self
    }

    pub fn class_name(mut self, value: impl Into<String>) -> Self {
        self.class_name = Some(value.into());
        self
    }

    pub fn api_key(mut self, value: impl Into<String>) -> Self {
        let value = value.into();
        let trimmed = value.trim();
        self.api_key = if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        };
        self
    }

    pub fn vectorizer(mut self, value: Vectorizer) -> Self {
        self.vectorizer = value;
        self
    }

    /// Hybrid weighting between keyword (0.0) and vector (1.0) ranking.
    pub fn alpha(mut self, value: f32) -> Self {
        self.alpha = Some(value);
        self
    }

    pub fn timeout(mut self, value: Duration) -> Self {
        self.timeout = Some(value);
        self
    }

    pub fn build(self) -> Result<WeaviateSchemaIndex, WeaviateIndexError> {
        let base_url = self
            .base_url
            .ok_or(WeaviateIndexError::MissingBaseUrl)?
            .trim()
            .to_string();
        if base_url.is_empty() {
            return Err(WeaviateIndexError::EmptyBaseUrl);
        }

        let class_name = self
            .class_name
            .unwrap_or_else(|| DEFAULT_CLASS_NAME.to_string())
            .trim()
            .to_string();
        validate_class_name(&class_name)?;

        if let Some(alpha) = self.alpha {
            if !(0.0..=1.0).contains(&alpha) {
                return Err(WeaviateIndexError::InvalidConfig(format!(
                    "alpha must be within 0.0..=1.0, got {alpha}"
                )));
            }
        }

        if looks_like_weaviate_cloud(&base_url) && self.api_key.is_none() {
            tracing::warn!(
                base_url = %base_url,
                "weaviate cloud URL detected without an API key; requests may fail"
            );
        }

        let client = reqwest::Client::builder()
            .timeout(self.timeout.unwrap_or(DEFAULT_TIMEOUT))
            .build()
            .map_err(WeaviateIndexError::from)?;

        Ok(WeaviateSchemaIndex {
            client,
            base_url,
            class_name,
            api_key: self.api_key,
            vectorizer: self.vectorizer,
            alpha: self.alpha,
        })
    }
}

fn validate_class_name(class_name: &str) -> Result<(), WeaviateIndexError> {
    let mut chars = class_name.chars();
    let Some(first) = chars.next() else {
        return Err(WeaviateIndexError::EmptyClassName);
    };

    if !first.is_ascii_uppercase() {
        return Err(WeaviateIndexError::InvalidClassName {
            class_name: class_name.to_string(),
            reason: "must start with an uppercase ASCII letter".to_string(),
        });
    }

    if let Some(invalid) = chars.find(|ch| !ch.is_ascii_alphanumeric() && *ch != '_') {
        return Err(WeaviateIndexError::InvalidClassName {
            class_name: class_name.to_string(),
            reason: format!("contains invalid character '{invalid}'"),
        });
    }

    Ok(())
}

fn looks_like_weaviate_cloud(base_url: &str) -> bool {
    let host = url_host(base_url);
    host == "cloud.weaviate.io"
        || host.ends_with(".cloud.weaviate.io")
        || host.ends_with(".weaviate.network")
}

/// Lower-cased host of `base_url`, without userinfo, port or IPv6 brackets.
fn url_host(base_url: &str) -> String {
    let without_scheme = base_url
        .split_once("://")
        .map_or(base_url, |(_, remainder)| remainder);
    let authority = without_scheme
        .split(['/', '?', '#'])
        .next()
        .unwrap_or_default();
    let host_port = authority.rsplit('@').next().unwrap_or_default();

    let host = if host_port.starts_with('[') {
        host_port
            .strip_prefix('[')
            .and_then(|rest| rest.split_once(']'))
            .map_or(host_port, |(ipv6, _)| ipv6)
    } else {
        host_port.split(':').next().unwrap_or_default()
    };

    host.trim_end_matches('.').to_ascii_lowercase()
}
