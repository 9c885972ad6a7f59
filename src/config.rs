use std::env;

/// The MediaWiki action API of Wikidata
pub const WD_API_URI: &str = "https://www.wikidata.org/w/api.php";

/// The Wikidata Query Service SPARQL endpoint
pub const WD_QUERY_URI: &str = "https://query.wikidata.org/sparql";

/// The vector similarity search service for Wikidata items and properties
pub const VECTOR_SEARCH_URI: &str = "https://wd-vectordb.wmcloud.org";

/// The default user agent
pub const USER_AGENT: &str = "Wikidata MCP Client";

/// `wbgetentities` accepts at most this many IDs per request
pub const MAX_ENTITIES_PER_REQUEST: usize = 50;

/// Number of `wbgetentities` chunks fetched in parallel
pub const MAX_CONCURRENT_LOAD_DEFAULT: usize = 5;

/// Process-wide, read-only settings. Resolved once at startup.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    api_url: String,
    sparql_url: String,
    vector_url: String,
    language: String,
    user_agent: String,
    vector_api_key: Option<String>,
    max_entities_per_request: usize,
    max_concurrent_load: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: WD_API_URI.to_string(),
            sparql_url: WD_QUERY_URI.to_string(),
            vector_url: VECTOR_SEARCH_URI.to_string(),
            language: "en".to_string(),
            user_agent: USER_AGENT.to_string(),
            vector_api_key: None,
            max_entities_per_request: MAX_ENTITIES_PER_REQUEST,
            max_concurrent_load: MAX_CONCURRENT_LOAD_DEFAULT,
        }
    }
}

impl Config {
    /// Reads the configuration from the environment, falling back to the Wikidata defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup<F: Fn(&str) -> Option<String>>(lookup: F) -> Self {
        let mut ret = Self::default();
        if let Some(url) = lookup("WIKIDATA_API_URL") {
            ret.api_url = url;
        }
        if let Some(url) = lookup("WIKIDATA_SPARQL_URL") {
            ret.sparql_url = url;
        }
        if let Some(url) = lookup("WIKIDATA_VECTORDB_URL") {
            ret.vector_url = url;
        }
        if let Some(language) = lookup("WIKIDATA_LANG") {
            ret.language = language;
        }
        if let Some(user_agent) = lookup("WIKIDATA_USER_AGENT") {
            ret.user_agent = user_agent;
        }
        ret.vector_api_key = lookup("WD_VECTORDB_API_SECRET").filter(|key| !key.is_empty());
        ret
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

    /// Returns the default language code for labels and descriptions.
    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    pub fn vector_api_key(&self) -> Option<&str> {
        self.vector_api_key.as_deref()
    }

    pub const fn max_entities_per_request(&self) -> usize {
        self.max_entities_per_request
    }

    pub const fn max_concurrent_load(&self) -> usize {
        self.max_concurrent_load
    }

    pub fn with_api_url<S: Into<String>>(mut self, url: S) -> Self {
        self.api_url = url.into();
        self
    }

    pub fn with_sparql_url<S: Into<String>>(mut self, url: S) -> Self {
        self.sparql_url = url.into();
        self
    }

    pub fn with_vector_url<S: Into<String>>(mut self, url: S) -> Self {
        self.vector_url = url.into();
        self
    }

    pub fn with_vector_api_key<S: Into<String>>(mut self, key: S) -> Self {
        self.vector_api_key = Some(key.into());
        self
    }

    /// Sets the number of chunks fetched at once. Zero means the default.
    pub fn with_max_concurrent_load(mut self, max_concurrent_load: usize) -> Self {
        self.max_concurrent_load = if max_concurrent_load == 0 {
            MAX_CONCURRENT_LOAD_DEFAULT
        } else {
            max_concurrent_load
        };
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.api_url(), WD_API_URI);
        assert_eq!(config.sparql_url(), WD_QUERY_URI);
        assert_eq!(config.language(), "en");
        assert_eq!(config.max_entities_per_request(), 50);
        assert!(config.vector_api_key().is_none());
    }

    #[test]
    fn test_config_from_lookup() {
        let vars: HashMap<&str, &str> = [
            ("WIKIDATA_API_URL", "http://localhost/w/api.php"),
            ("WIKIDATA_LANG", "de"),
            ("WD_VECTORDB_API_SECRET", "secret"),
        ]
        .into_iter()
        .collect();
        let config = Config::from_lookup(|key| vars.get(key).map(|v| v.to_string()));
        assert_eq!(config.api_url(), "http://localhost/w/api.php");
        assert_eq!(config.sparql_url(), WD_QUERY_URI);
        assert_eq!(config.language(), "de");
        assert_eq!(config.vector_api_key(), Some("secret"));
    }

    #[test]
    fn test_config_empty_api_key() {
        let config = Config::from_lookup(|key| {
            (key == "WD_VECTORDB_API_SECRET").then(String::new)
        });
        assert!(config.vector_api_key().is_none());
    }

    #[test]
    fn test_max_concurrent_load() {
        let config = Config::default().with_max_concurrent_load(2);
        assert_eq!(config.max_concurrent_load(), 2);
        let config = Config::default().with_max_concurrent_load(0);
        assert_eq!(config.max_concurrent_load(), MAX_CONCURRENT_LOAD_DEFAULT);
    }
}
