use crate::{
    config::{
        MAX_CONCURRENT_LOAD_DEFAULT, MAX_ENTITIES_PER_REQUEST, USER_AGENT, VECTOR_SEARCH_URI,
        WD_API_URI, WD_QUERY_URI,
    },
    WikidataApi, WikidataError,
};

#[derive(Debug, Default)]
pub struct WikidataApiBuilder {
    client: Option<reqwest::Client>,
    user_agent: Option<String>,
    api_url: Option<String>,
    sparql_url: Option<String>,
    vector_url: Option<String>,
    vector_api_key: Option<String>,
    max_concurrent_load: Option<usize>,
}

impl WikidataApiBuilder {
    /// Sets the action API URL, the one ending in "api.php". Default is Wikidata.
    pub fn with_api_url<S: Into<String>>(mut self, api_url: S) -> Self {
        self.api_url = Some(api_url.into());
        self
    }

    pub fn with_sparql_url<S: Into<String>>(mut self, sparql_url: S) -> Self {
        self.sparql_url = Some(sparql_url.into());
        self
    }

    pub fn with_vector_url<S: Into<String>>(mut self, vector_url: S) -> Self {
        self.vector_url = Some(vector_url.into());
        self
    }

    /// Sets the key sent as `x-api-secret` to the vector search service.
    pub fn with_vector_api_key<S: Into<String>>(mut self, key: S) -> Self {
        self.vector_api_key = Some(key.into());
        self
    }

    /// Sets the user agent. By default, the user agent is "Wikidata MCP Client; {`package_name`}/{`package_version`}"
    pub fn with_user_agent<S: Into<String>>(mut self, user_agent: S) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Sets the `reqwest::Client`. By default, a new `reqwest::Client` is created.
    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = Some(client);
        self
    }

    pub const fn with_max_concurrent_load(mut self, max_concurrent_load: usize) -> Self {
        self.max_concurrent_load = Some(max_concurrent_load);
        self
    }

    /// Builds the `WikidataApi`. The builder gets consumed by this operation.
    /// # Errors
    /// Returns an error if the action API URL is invalid.
    pub fn build(self) -> Result<WikidataApi, WikidataError> {
        let api_url = Self::validate_api_url(self.api_url.as_deref().unwrap_or(WD_API_URI))?;
        let max_concurrent_load = match self.max_concurrent_load {
            Some(0) | None => MAX_CONCURRENT_LOAD_DEFAULT,
            Some(n) => n,
        };
        Ok(WikidataApi::new(
            self.client.unwrap_or_default(),
            self.user_agent.unwrap_or_else(Self::default_user_agent),
            api_url,
            self.sparql_url.unwrap_or_else(|| WD_QUERY_URI.to_string()),
            self.vector_url
                .unwrap_or_else(|| VECTOR_SEARCH_URI.to_string())
                .trim_end_matches('/')
                .to_string(),
            self.vector_api_key.filter(|key| !key.is_empty()),
            MAX_ENTITIES_PER_REQUEST,
            max_concurrent_load,
        ))
    }

    /// Checks that the URL points at "api.php". Removes anything beyond that.
    fn validate_api_url(api_url: &str) -> Result<String, WikidataError> {
        let (base, _rest) = api_url
            .split_once("/api.php")
            .ok_or_else(|| WikidataError::ApiUrlInvalid(api_url.to_owned()))?;
        Ok(format!("{base}/api.php"))
    }

    /// Returns the default user agent, a versioned string based on `USER_AGENT`.
    fn default_user_agent() -> String {
        format!(
            "{USER_AGENT}; {}/{}",
            env!("CARGO_PKG_NAME"),
            env!("CARGO_PKG_VERSION")
        )
    }
}
