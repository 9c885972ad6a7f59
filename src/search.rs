use std::fmt;

use nutype::nutype;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::{
    entity_source::{fetch_chunked, PROPS_LABELS},
    Language, WikidataApi, WikidataError,
};

/// Header carrying the vector search API key.
pub const VECTOR_API_KEY_HEADER: &str = "x-api-secret";

#[nutype(
    validate(greater_or_equal = 1, less_or_equal = 50),
    default = 10,
    derive(Debug, Display, Clone, Copy, PartialEq, Default)
)]
pub struct SearchLimit(u16);

impl SearchLimit {
    pub fn parse(limit: u64) -> Result<Self, WikidataError> {
        u16::try_from(limit)
            .ok()
            .and_then(|limit| Self::try_new(limit).ok())
            .ok_or_else(|| WikidataError::InvalidSearchLimit(limit.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchType {
    Item,
    Property,
}

impl SearchType {
    pub const fn as_str(&self) -> &str {
        match self {
            SearchType::Item => "item",
            SearchType::Property => "property",
        }
    }

    /// Field holding the ID in vector search hits.
    const fn id_field(&self) -> &str {
        match self {
            SearchType::Item => "QID",
            SearchType::Property => "PID",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
struct SearchResultText {
    value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Default)]
struct SearchDisplay {
    label: Option<SearchResultText>,
    description: Option<SearchResultText>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
struct KeywordSearchResult {
    id: String,
    #[serde(default)]
    display: SearchDisplay,
}

/// One search hit, rendered as `"<id>: <label> — <description>"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHit {
    id: String,
    label: String,
    description: String,
}

impl SearchHit {
    pub fn new<S1: Into<String>, S2: Into<String>, S3: Into<String>>(
        id: S1,
        label: S2,
        description: S3,
    ) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            description: description.into(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn description(&self) -> &str {
        &self.description
    }
}

impl fmt::Display for SearchHit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} — {}", self.id, self.label, self.description)
    }
}

/// One hit per line.
pub fn hits_to_string(hits: &[SearchHit]) -> String {
    hits.iter()
        .map(|hit| hit.to_string())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Keyword search via `wbsearchentities`.
#[derive(Debug)]
pub struct Search {
    search_type: SearchType,
    q: String,
    language: Language,
    limit: SearchLimit,
}

impl Search {
    pub fn items<S: Into<String>>(q: S, language: Language) -> Self {
        Self::new(SearchType::Item, q, language)
    }

    pub fn properties<S: Into<String>>(q: S, language: Language) -> Self {
        Self::new(SearchType::Property, q, language)
    }

    pub fn new<S: Into<String>>(search_type: SearchType, q: S, language: Language) -> Self {
        Self {
            search_type,
            q: q.into(),
            language,
            limit: SearchLimit::default(),
        }
    }

    pub const fn with_limit(mut self, limit: SearchLimit) -> Self {
        self.limit = limit;
        self
    }

    pub async fn get(&self, api: &WikidataApi) -> Result<Vec<SearchHit>, WikidataError> {
        let limit = self.limit.to_string();
        let language = self.language.to_string();
        let j = api
            .action(&[
                ("action", "wbsearchentities"),
                ("type", self.search_type.as_str()),
                ("search", self.q.as_str()),
                ("limit", limit.as_str()),
                ("language", language.as_str()),
            ])
            .await?;
        Self::response_to_hits(j)
    }

    fn response_to_hits(j: Value) -> Result<Vec<SearchHit>, WikidataError> {
        let results: Vec<KeywordSearchResult> = match j.get("search") {
            Some(search) => serde_json::from_value(search.to_owned())?,
            None => vec![],
        };
        let ret = results
            .into_iter()
            .map(|result| {
                let text = |t: Option<SearchResultText>| t.map(|t| t.value).unwrap_or_default();
                SearchHit::new(
                    result.id,
                    text(result.display.label),
                    text(result.display.description),
                )
            })
            .collect();
        Ok(ret)
    }
}

/// Semantic search via the vector database, labelled through `wbgetentities`.
#[derive(Debug)]
pub struct VectorSearch {
    search_type: SearchType,
    q: String,
    language: Language,
    limit: SearchLimit,
}

impl VectorSearch {
    pub fn items<S: Into<String>>(q: S, language: Language) -> Self {
        Self::new(SearchType::Item, q, language)
    }

    pub fn properties<S: Into<String>>(q: S, language: Language) -> Self {
        Self::new(SearchType::Property, q, language)
    }

    pub fn new<S: Into<String>>(search_type: SearchType, q: S, language: Language) -> Self {
        Self {
            search_type,
            q: q.into(),
            language,
            limit: SearchLimit::default(),
        }
    }

    pub const fn with_limit(mut self, limit: SearchLimit) -> Self {
        self.limit = limit;
        self
    }

    /// Hits in the order of the vector database. Hits that `wbgetentities`
    /// does not know keep an empty label and description.
    pub async fn get(&self, api: &WikidataApi) -> Result<Vec<SearchHit>, WikidataError> {
        let url = format!("{}/{}/query/", api.vector_url(), self.search_type.as_str());
        let k = self.limit.to_string();
        let mut request = api
            .get(url)?
            .query(&[("query", self.q.as_str()), ("k", k.as_str())]);
        if let Some(key) = api.vector_api_key() {
            request = request.header(VECTOR_API_KEY_HEADER, key);
        }
        let response = api.execute(request.build()?).await?;
        let j: Value = response.json().await?;
        let ids = j
            .as_array()
            .map(|hits| {
                hits.iter()
                    .filter_map(|hit| hit[self.search_type.id_field()].as_str())
                    .map(|id| id.to_string())
                    .collect::<Vec<_>>()
            })
            .unwrap_or_default();
        debug!(hits = ids.len(), "vector search");
        let records = fetch_chunked(
            api,
            &ids,
            PROPS_LABELS,
            &self.language,
            api.max_entities_per_request(),
            api.max_concurrent_load(),
        )
        .await?;
        let ret = ids
            .into_iter()
            .map(|id| match records.get(&id) {
                Some(record) => SearchHit::new(
                    id.as_str(),
                    self.language.pick(&record["labels"]),
                    self.language.pick(&record["descriptions"]),
                ),
                None => SearchHit::new(id.as_str(), "", ""),
            })
            .collect();
        Ok(ret)
    }
}

/// Probes the vector search service once. Without a key, or if the service
/// cannot be reached, vector search counts as disabled.
pub async fn verify_vector_api_key(api: &WikidataApi) -> bool {
    let Some(key) = api.vector_api_key() else {
        return false;
    };
    let url = format!("{}/item/query/", api.vector_url());
    let request = match api.get(url) {
        Ok(request) => request.query(&[("query", "")]).header(VECTOR_API_KEY_HEADER, key),
        Err(e) => {
            warn!(error = %e, "cannot build vector search probe");
            return false;
        }
    };
    match request.send().await {
        Ok(response) => response.status() != reqwest::StatusCode::UNAUTHORIZED,
        Err(e) => {
            warn!(error = %e, "vector search unreachable");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn api_for(mock_server: &MockServer, key: Option<&str>) -> WikidataApi {
        let mut builder = WikidataApi::builder()
            .with_api_url(mock_server.uri() + "/w/api.php")
            .with_vector_url(mock_server.uri());
        if let Some(key) = key {
            builder = builder.with_vector_api_key(key);
        }
        builder.build().unwrap()
    }

    #[test]
    fn test_search_limit() {
        assert_eq!(SearchLimit::default().into_inner(), 10);
        assert!(SearchLimit::parse(0).is_err());
        assert!(SearchLimit::parse(51).is_err());
        assert!(SearchLimit::parse(70000).is_err());
        assert_eq!(SearchLimit::parse(50).unwrap().into_inner(), 50);
    }

    #[test]
    fn test_hits_to_string() {
        let hits = vec![
            SearchHit::new("Q42", "Douglas Adams", "English writer"),
            SearchHit::new("Q28421831", "Douglas Adams", ""),
        ];
        assert_eq!(
            hits_to_string(&hits),
            "Q42: Douglas Adams — English writer\nQ28421831: Douglas Adams — "
        );
        assert_eq!(hits_to_string(&[]), "");
    }

    #[tokio::test]
    async fn test_keyword_search() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/w/api.php"))
            .and(query_param("action", "wbsearchentities"))
            .and(query_param("search", "Douglas Adams"))
            .and(query_param("type", "item"))
            .and(query_param("limit", "2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "searchinfo": {"search": "Douglas Adams"},
                "search": [
                    {"id": "Q42", "display": {
                        "label": {"value": "Douglas Adams", "language": "en"},
                        "description": {"value": "English science fiction writer and humorist", "language": "en"}
                    }},
                    {"id": "Q28421831", "display": {"label": {"value": "Douglas Adams", "language": "en"}}}
                ],
                "success": 1
            })))
            .mount(&mock_server)
            .await;
        let api = api_for(&mock_server, None);
        let hits = Search::items("Douglas Adams", Language::parse("en").unwrap())
            .with_limit(SearchLimit::parse(2).unwrap())
            .get(&api)
            .await
            .unwrap();
        assert_eq!(hits.len(), 2);
        assert_eq!(
            hits[0].to_string(),
            "Q42: Douglas Adams — English science fiction writer and humorist"
        );
        assert_eq!(hits[1].description(), "");
    }

    #[tokio::test]
    async fn test_vector_search() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/property/query/"))
            .and(query_param("query", "residence of a person"))
            .and(query_param("k", "10"))
            .and(header(VECTOR_API_KEY_HEADER, "secret"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"PID": "P551", "similarity_score": 0.9},
                {"PID": "P9999999", "similarity_score": 0.5}
            ])))
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .and(path("/w/api.php"))
            .and(query_param("action", "wbgetentities"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "entities": {
                    "P551": {"id": "P551",
                        "labels": {"en": {"language": "en", "value": "residence"}},
                        "descriptions": {"en": {"language": "en", "value": "the place where the person is or has been, resident"}}},
                    "P9999999": {"id": "P9999999", "missing": ""}
                }
            })))
            .mount(&mock_server)
            .await;
        let api = api_for(&mock_server, Some("secret"));
        let hits = VectorSearch::properties("residence of a person", Language::parse("en").unwrap())
            .get(&api)
            .await
            .unwrap();
        assert_eq!(
            hits_to_string(&hits),
            "P551: residence — the place where the person is or has been, resident\nP9999999:  — "
        );
    }

    #[tokio::test]
    async fn test_verify_vector_api_key() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/item/query/"))
            .and(header(VECTOR_API_KEY_HEADER, "good"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .and(path("/item/query/"))
            .and(header(VECTOR_API_KEY_HEADER, "bad"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&mock_server)
            .await;
        assert!(verify_vector_api_key(&api_for(&mock_server, Some("good"))).await);
        assert!(!verify_vector_api_key(&api_for(&mock_server, Some("bad"))).await);
        assert!(!verify_vector_api_key(&api_for(&mock_server, None)).await);
    }
}
