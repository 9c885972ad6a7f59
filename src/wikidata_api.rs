use std::collections::HashMap;

use async_trait::async_trait;
use reqwest::header::HeaderMap;
use serde_json::Value;
use tracing::debug;

use crate::{
    entity_source::EntitySource, wikidata_api_builder::WikidataApiBuilder, Config, Language,
    WikidataError,
};

/// Client for the MediaWiki action API, the SPARQL endpoint and the vector
/// search service of one Wikibase instance.
#[derive(Debug, Clone)]
pub struct WikidataApi {
    client: reqwest::Client,
    user_agent: String,
    api_url: String,
    sparql_url: String,
    vector_url: String,
    vector_api_key: Option<String>,
    max_entities_per_request: usize,
    max_concurrent_load: usize,
}

impl WikidataApi {
    /// Returns a `WikidataApiBuilder` with the Wikidata defaults.
    pub fn builder() -> WikidataApiBuilder {
        WikidataApiBuilder::default()
    }

    /// Builds a client from the process configuration.
    /// # Errors
    /// Returns an error if the action API URL is invalid.
    pub fn from_config(config: &Config) -> Result<Self, WikidataError> {
        let mut builder = Self::builder()
            .with_api_url(config.api_url())
            .with_sparql_url(config.sparql_url())
            .with_vector_url(config.vector_url())
            .with_user_agent(config.user_agent())
            .with_max_concurrent_load(config.max_concurrent_load());
        if let Some(key) = config.vector_api_key() {
            builder = builder.with_vector_api_key(key);
        }
        builder.build()
    }

    #[allow(clippy::too_many_arguments)]
    pub(crate) const fn new(
        client: reqwest::Client,
        user_agent: String,
        api_url: String,
        sparql_url: String,
        vector_url: String,
        vector_api_key: Option<String>,
        max_entities_per_request: usize,
        max_concurrent_load: usize,
    ) -> Self {
        Self {
            client,
            user_agent,
            api_url,
            sparql_url,
            vector_url,
            vector_api_key,
            max_entities_per_request,
            max_concurrent_load,
        }
    }

    /// Returns a `HeaderMap` with the user agent
    pub(crate) fn headers(&self) -> Result<HeaderMap, WikidataError> {
        let mut headers = HeaderMap::new();
        headers.insert(reqwest::header::USER_AGENT, self.user_agent.parse()?);
        Ok(headers)
    }

    /// Returns a GET `RequestBuilder` for `url` with the user agent set.
    pub(crate) fn get<S: AsRef<str>>(&self, url: S) -> Result<reqwest::RequestBuilder, WikidataError> {
        Ok(self.client.get(url.as_ref()).headers(self.headers()?))
    }

    /// Calls the action API with `params` (plus `format=json`) and returns the JSON body.
    /// # Errors
    /// Returns an error on transport failure or a non-success status.
    pub async fn action(&self, params: &[(&str, &str)]) -> Result<Value, WikidataError> {
        let request = self
            .get(&self.api_url)?
            .query(params)
            .query(&[("format", "json"), ("origin", "*")])
            .build()?;
        debug!(url = %request.url(), "action API request");
        let response = self.execute(request).await?;
        Ok(response.json().await?)
    }

    /// Executes a `reqwest::Request`. Non-success statuses become `ApiError`.
    pub async fn execute(&self, request: reqwest::Request) -> Result<reqwest::Response, WikidataError> {
        let response = self.client.execute(request).await?;
        if !response.status().is_success() {
            return Err(WikidataError::from_response(response).await);
        }
        Ok(response)
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    pub fn sparql_url(&self) -> &str {
        &self.sparql_url
    }

    pub fn vector_url(&self) -> &str {
        &self.vector_url
    }

    pub fn vector_api_key(&self) -> Option<&str> {
        self.vector_api_key.as_deref()
    }

    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    pub const fn max_entities_per_request(&self) -> usize {
        self.max_entities_per_request
    }

    pub const fn max_concurrent_load(&self) -> usize {
        self.max_concurrent_load
    }

    pub const fn client(&self) -> &reqwest::Client {
        &self.client
    }
}

#[async_trait]
impl EntitySource for WikidataApi {
    async fn fetch_entities(
        &self,
        ids: &[String],
        props: &str,
        language: &Language,
    ) -> Result<HashMap<String, Value>, WikidataError> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        let ids = ids.join("|");
        let languages = language.request_languages();
        let j = self
            .action(&[
                ("action", "wbgetentities"),
                ("ids", ids.as_str()),
                ("languages", languages.as_str()),
                ("props", props),
            ])
            .await?;
        let ret = j["entities"]
            .as_object()
            .map(|entities| {
                entities
                    .iter()
                    .filter(|(_, record)| record.get("missing").is_none())
                    .map(|(id, record)| (id.to_owned(), record.to_owned()))
                    .collect()
            })
            .unwrap_or_default();
        Ok(ret)
    }
}
