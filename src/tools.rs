use serde::Serialize;
use serde_json::{json, Value};
use tracing::{debug, info, warn};

use crate::{
    entity_table::EntityTable,
    hierarchy::{Hierarchy, DEFAULT_MAX_DEPTH},
    render::{statement_values_to_string, statements_to_string},
    search::{hits_to_string, verify_vector_api_key, Search, SearchLimit, SearchType, VectorSearch},
    sparql::{self, DEFAULT_ROW_CAP},
    statement_parser::{ParseOptions, StatementParser},
    Config, EntityId, Language, WikidataApi, WikidataError,
};

pub const SEARCH_ITEMS: &str = "search_items";
pub const SEARCH_PROPERTIES: &str = "search_properties";
pub const VECTOR_SEARCH_ITEMS: &str = "vector_search_items";
pub const VECTOR_SEARCH_PROPERTIES: &str = "vector_search_properties";
pub const GET_STATEMENTS: &str = "get_statements";
pub const GET_STATEMENT_VALUES: &str = "get_statement_values";
pub const GET_HIERARCHY: &str = "get_instance_and_subclass_hierarchy";
pub const EXECUTE_SPARQL: &str = "execute_sparql";

/// A tool as announced by `tools/list`.
#[derive(Debug, Clone, Serialize)]
pub struct ToolDefinition {
    pub name: &'static str,
    pub description: &'static str,
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

impl ToolDefinition {
    const fn new(name: &'static str, description: &'static str, input_schema: Value) -> Self {
        Self {
            name,
            description,
            input_schema,
        }
    }
}

/// The Wikidata tools. Every tool answers with text, including for upstream
/// failures, so that an agent can read and act on the outcome.
#[derive(Debug, Clone)]
pub struct WikidataTools {
    api: WikidataApi,
    language: Language,
    vector_enabled: bool,
}

impl WikidataTools {
    pub const fn new(api: WikidataApi, language: Language, vector_enabled: bool) -> Self {
        Self {
            api,
            language,
            vector_enabled,
        }
    }

    /// Builds the API client and probes the vector search key once.
    /// # Errors
    /// Returns an error if the API URL or the default language is invalid.
    pub async fn from_config(config: &Config) -> Result<Self, WikidataError> {
        let api = WikidataApi::from_config(config)?;
        let language = Language::parse(config.language())?;
        let vector_enabled = verify_vector_api_key(&api).await;
        if !vector_enabled {
            info!("no valid vector search key, vector search tools are not registered");
        }
        Ok(Self::new(api, language, vector_enabled))
    }

    pub const fn vector_enabled(&self) -> bool {
        self.vector_enabled
    }

    pub const fn api(&self) -> &WikidataApi {
        &self.api
    }

    pub async fn search_items(&self, query: &str, lang: Option<&str>, limit: Option<u64>) -> String {
        self.keyword_search(SearchType::Item, query, lang, limit).await
    }

    pub async fn search_properties(
        &self,
        query: &str,
        lang: Option<&str>,
        limit: Option<u64>,
    ) -> String {
        self.keyword_search(SearchType::Property, query, lang, limit)
            .await
    }

    pub async fn vector_search_items(
        &self,
        query: &str,
        lang: Option<&str>,
        limit: Option<u64>,
    ) -> String {
        self.vector_search(SearchType::Item, query, lang, limit).await
    }

    pub async fn vector_search_properties(
        &self,
        query: &str,
        lang: Option<&str>,
        limit: Option<u64>,
    ) -> String {
        self.vector_search(SearchType::Property, query, lang, limit)
            .await
    }

    /// One line per statement, deprecated values left out.
    pub async fn get_statements(
        &self,
        entity_id: &str,
        include_external_ids: bool,
        lang: Option<&str>,
    ) -> String {
        to_text(
            self.statements_text(entity_id, include_external_ids, lang)
                .await,
        )
    }

    /// Every statement of one property with rank, qualifiers and references.
    pub async fn get_statement_values(
        &self,
        entity_id: &str,
        property_id: &str,
        lang: Option<&str>,
    ) -> String {
        to_text(
            self.statement_values_text(entity_id, property_id, lang)
                .await,
        )
    }

    /// Pretty-printed JSON of the P31/P279 ancestry.
    pub async fn get_instance_and_subclass_hierarchy(
        &self,
        entity_id: &str,
        max_depth: usize,
        lang: Option<&str>,
    ) -> String {
        to_text(self.hierarchy_text(entity_id, max_depth, lang).await)
    }

    /// Semicolon separated CSV of at most `row_cap` rows, or the endpoint's error text.
    pub async fn execute_sparql(&self, query: &str, row_cap: usize) -> String {
        to_text(self.sparql_text(query, row_cap).await)
    }

    /// The tools to announce. Vector search is only listed with a valid key.
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        let mut ret = vec![];
        if self.vector_enabled {
            ret.push(ToolDefinition::new(
                VECTOR_SEARCH_ITEMS,
                "Search Wikidata items (QIDs) using semantic search. Matches are based on meaning, not exact words. \
                 Returns newline-separated lines in the form `QID: label — description`.",
                search_schema("Natural-language description of the concept to find."),
            ));
            ret.push(ToolDefinition::new(
                VECTOR_SEARCH_PROPERTIES,
                "Search Wikidata properties (PIDs) using semantic search, from a natural-language description of \
                 the relationship you need. Returns newline-separated lines in the form `PID: label — description`.",
                search_schema("Natural-language description of the relationship to find."),
            ));
        }
        ret.push(ToolDefinition::new(
            SEARCH_ITEMS,
            "Search Wikidata items (QIDs) with exact text matching on labels and aliases. Useful when you already \
             know the entity you are looking for. Returns newline-separated lines in the form `QID: label — description`.",
            search_schema("Label, alias, or phrase expected to appear verbatim."),
        ));
        ret.push(ToolDefinition::new(
            SEARCH_PROPERTIES,
            "Search Wikidata properties (PIDs) with exact text matching on labels and aliases. Returns \
             newline-separated lines in the form `PID: label — description`.",
            search_schema("Label, alias, or phrase expected to appear verbatim."),
        ));
        ret.push(ToolDefinition::new(
            GET_STATEMENTS,
            "Return the direct statements (property-value pairs, with qualifiers) of an entity, one per line: \
             `Entity (QID): Property (PID): Value [ | Qualifier (PID): Value ]`. Deprecated values and references \
             are left out, use get_statement_values for those.",
            json!({
                "type": "object",
                "properties": {
                    "entity_id": {"type": "string", "description": "A QID or PID such as \"Q42\" or \"P31\"."},
                    "include_external_ids": {"type": "boolean", "default": false, "description": "Whether to include external identifiers linking to other databases."},
                    "lang": lang_schema(),
                },
                "required": ["entity_id"],
            }),
        ));
        ret.push(ToolDefinition::new(
            GET_STATEMENT_VALUES,
            "Get all values of one property of an entity, including deprecated values, ranks, qualifiers and \
             references.",
            json!({
                "type": "object",
                "properties": {
                    "entity_id": {"type": "string", "description": "A QID or PID such as \"Q42\" or \"P31\"."},
                    "property_id": {"type": "string", "description": "A PID such as \"P31\"."},
                    "lang": lang_schema(),
                },
                "required": ["entity_id", "property_id"],
            }),
        ));
        ret.push(ToolDefinition::new(
            GET_HIERARCHY,
            "Return the instance of (P31) and subclass of (P279) hierarchy of an entity as nested JSON, up to \
             max_depth levels.",
            json!({
                "type": "object",
                "properties": {
                    "entity_id": {"type": "string", "description": "A QID such as \"Q42\"."},
                    "max_depth": {"type": "integer", "minimum": 0, "default": DEFAULT_MAX_DEPTH, "description": "Number of levels to expand."},
                    "lang": lang_schema(),
                },
                "required": ["entity_id"],
            }),
        ));
        ret.push(ToolDefinition::new(
            EXECUTE_SPARQL,
            "Execute a SPARQL query against Wikidata and return up to K rows as semicolon-separated CSV. On error, \
             returns the error message.",
            json!({
                "type": "object",
                "properties": {
                    "sparql": {"type": "string", "description": "A valid SPARQL string."},
                    "K": {"type": "integer", "minimum": 0, "default": DEFAULT_ROW_CAP, "description": "Maximum number of rows to return."},
                },
                "required": ["sparql"],
            }),
        ));
        ret
    }

    /// Runs the tool `name` with JSON `args`.
    /// # Errors
    /// Fails only for an unknown tool or unusable arguments. Failures of the tool
    /// itself are part of the returned text.
    pub async fn call(&self, name: &str, args: &Value) -> Result<String, WikidataError> {
        debug!(tool = name, "tool call");
        let ret = match name {
            SEARCH_ITEMS => {
                self.search_items(
                    required_str(args, "query")?,
                    optional_str(args, "lang")?,
                    optional_u64(args, "limit")?,
                )
                .await
            }
            SEARCH_PROPERTIES => {
                self.search_properties(
                    required_str(args, "query")?,
                    optional_str(args, "lang")?,
                    optional_u64(args, "limit")?,
                )
                .await
            }
            VECTOR_SEARCH_ITEMS if self.vector_enabled => {
                self.vector_search_items(
                    required_str(args, "query")?,
                    optional_str(args, "lang")?,
                    optional_u64(args, "limit")?,
                )
                .await
            }
            VECTOR_SEARCH_PROPERTIES if self.vector_enabled => {
                self.vector_search_properties(
                    required_str(args, "query")?,
                    optional_str(args, "lang")?,
                    optional_u64(args, "limit")?,
                )
                .await
            }
            GET_STATEMENTS => {
                self.get_statements(
                    required_str(args, "entity_id")?,
                    optional_bool(args, "include_external_ids")?.unwrap_or(false),
                    optional_str(args, "lang")?,
                )
                .await
            }
            GET_STATEMENT_VALUES => {
                self.get_statement_values(
                    required_str(args, "entity_id")?,
                    required_str(args, "property_id")?,
                    optional_str(args, "lang")?,
                )
                .await
            }
            GET_HIERARCHY => {
                self.get_instance_and_subclass_hierarchy(
                    required_str(args, "entity_id")?,
                    optional_u64(args, "max_depth")?.map_or(DEFAULT_MAX_DEPTH, saturating_usize),
                    optional_str(args, "lang")?,
                )
                .await
            }
            EXECUTE_SPARQL => {
                self.execute_sparql(
                    required_str(args, "sparql")?,
                    optional_u64(args, "K")?.map_or(DEFAULT_ROW_CAP, saturating_usize),
                )
                .await
            }
            _ => return Err(WikidataError::UnknownTool(name.to_string())),
        };
        Ok(ret)
    }

    async fn keyword_search(
        &self,
        search_type: SearchType,
        query: &str,
        lang: Option<&str>,
        limit: Option<u64>,
    ) -> String {
        to_text(self.keyword_search_text(search_type, query, lang, limit).await)
    }

    async fn keyword_search_text(
        &self,
        search_type: SearchType,
        query: &str,
        lang: Option<&str>,
        limit: Option<u64>,
    ) -> Result<String, WikidataError> {
        let search =
            Search::new(search_type, query, self.language(lang)?).with_limit(search_limit(limit)?);
        Ok(hits_to_string(&search.get(&self.api).await?))
    }

    async fn vector_search(
        &self,
        search_type: SearchType,
        query: &str,
        lang: Option<&str>,
        limit: Option<u64>,
    ) -> String {
        to_text(self.vector_search_text(search_type, query, lang, limit).await)
    }

    async fn vector_search_text(
        &self,
        search_type: SearchType,
        query: &str,
        lang: Option<&str>,
        limit: Option<u64>,
    ) -> Result<String, WikidataError> {
        let search = VectorSearch::new(search_type, query, self.language(lang)?)
            .with_limit(search_limit(limit)?);
        Ok(hits_to_string(&search.get(&self.api).await?))
    }

    async fn statements_text(
        &self,
        entity_id: &str,
        include_external_ids: bool,
        lang: Option<&str>,
    ) -> Result<String, WikidataError> {
        let id = EntityId::new(entity_id)?;
        let language = self.language(lang)?;
        let options = ParseOptions::default().with_external_ids(include_external_ids);
        let mut table = self.table();
        let parsed = StatementParser::new(&self.api, &language, &options)
            .load(&[id], &mut table)
            .await?;
        Ok(match parsed.first() {
            Some(entity) => statements_to_string(entity, &table),
            None => not_found(entity_id),
        })
    }

    async fn statement_values_text(
        &self,
        entity_id: &str,
        property_id: &str,
        lang: Option<&str>,
    ) -> Result<String, WikidataError> {
        let id = EntityId::new(entity_id)?;
        let property = EntityId::new(property_id)?;
        let language = self.language(lang)?;
        let options = ParseOptions::default()
            .with_all_ranks(true)
            .with_external_ids(true)
            .with_references(true)
            .with_properties(vec![property.clone()]);
        let mut table = self.table();
        let parsed = StatementParser::new(&self.api, &language, &options)
            .load(&[id], &mut table)
            .await?;
        let Some(entity) = parsed.first() else {
            return Ok(not_found(entity_id));
        };
        let text = table
            .lookup(&property)
            .and_then(|property| statement_values_to_string(entity, property, &table));
        Ok(text.unwrap_or_else(|| {
            format!("No statement found for {entity_id} with property {property_id}")
        }))
    }

    async fn hierarchy_text(
        &self,
        entity_id: &str,
        max_depth: usize,
        lang: Option<&str>,
    ) -> Result<String, WikidataError> {
        let id = EntityId::new(entity_id)?;
        let language = self.language(lang)?;
        let hierarchy =
            Hierarchy::walk_in(self.table(), &id, max_depth, &self.api, &language).await?;
        if !hierarchy.has_root() {
            return Ok(not_found(entity_id));
        }
        Ok(serde_json::to_string_pretty(&hierarchy.to_json(max_depth))?)
    }

    async fn sparql_text(&self, query: &str, row_cap: usize) -> Result<String, WikidataError> {
        sparql::execute_sparql(&self.api, query, row_cap)
            .await?
            .to_csv()
    }

    fn language(&self, lang: Option<&str>) -> Result<Language, WikidataError> {
        match lang {
            Some(code) => Language::parse(code),
            None => Ok(self.language.clone()),
        }
    }

    /// A fresh table per call, chunked like the API client.
    fn table(&self) -> EntityTable {
        EntityTable::with_limits(
            self.api.max_entities_per_request(),
            self.api.max_concurrent_load(),
        )
    }
}

fn not_found(entity_id: &str) -> String {
    WikidataError::EntityNotFound(entity_id.to_string()).to_string()
}

/// Converts a tool outcome to the text the agent sees.
fn to_text(result: Result<String, WikidataError>) -> String {
    match result {
        Ok(text) => text,
        Err(e) if e.is_malformed_input() => e.to_string(),
        Err(e) => {
            warn!(error = %e, "tool call failed");
            format!("Wikidata is currently unavailable ({e}). Please retry later.")
        }
    }
}

fn search_limit(limit: Option<u64>) -> Result<SearchLimit, WikidataError> {
    limit.map_or_else(|| Ok(SearchLimit::default()), SearchLimit::parse)
}

fn saturating_usize(n: u64) -> usize {
    usize::try_from(n).unwrap_or(usize::MAX)
}

fn search_schema(query_description: &str) -> Value {
    json!({
        "type": "object",
        "properties": {
            "query": {"type": "string", "description": query_description},
            "lang": lang_schema(),
            "limit": {"type": "integer", "minimum": 1, "maximum": 50, "default": 10, "description": "Maximum number of results."},
        },
        "required": ["query"],
    })
}

fn lang_schema() -> Value {
    json!({"type": "string", "description": "Language code for labels and descriptions (default: 'en')."})
}

fn required_str<'a>(args: &'a Value, name: &str) -> Result<&'a str, WikidataError> {
    args[name]
        .as_str()
        .ok_or_else(|| WikidataError::missing_field(name, args))
}

/// Absent and `null` arguments are `None`.
fn optional<'a, T>(
    args: &'a Value,
    name: &str,
    f: impl Fn(&'a Value) -> Option<T>,
) -> Result<Option<T>, WikidataError> {
    match args.get(name) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => f(value)
            .map(Some)
            .ok_or_else(|| WikidataError::missing_field(name, args)),
    }
}

fn optional_str<'a>(args: &'a Value, name: &str) -> Result<Option<&'a str>, WikidataError> {
    optional(args, name, Value::as_str)
}

fn optional_bool(args: &Value, name: &str) -> Result<Option<bool>, WikidataError> {
    optional(args, name, Value::as_bool)
}

fn optional_u64(args: &Value, name: &str) -> Result<Option<u64>, WikidataError> {
    optional(args, name, Value::as_u64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn fixture(name: &str) -> Value {
        let text = std::fs::read_to_string(format!("test_data/{name}")).unwrap();
        serde_json::from_str(&text).unwrap()
    }

    fn tools_for(mock_server: &MockServer, vector_enabled: bool) -> WikidataTools {
        let api = WikidataApi::builder()
            .with_api_url(mock_server.uri() + "/w/api.php")
            .with_sparql_url(mock_server.uri() + "/sparql")
            .with_vector_url(mock_server.uri())
            .with_vector_api_key("secret")
            .build()
            .unwrap();
        WikidataTools::new(api, Language::parse("en").unwrap(), vector_enabled)
    }

    async fn douglas_adams_server() -> MockServer {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/w/api.php"))
            .and(query_param("action", "wbgetentities"))
            .respond_with(ResponseTemplate::new(200).set_body_json(fixture("Q42.json")))
            .mount(&mock_server)
            .await;
        mock_server
    }

    #[tokio::test]
    async fn test_get_statements() {
        let mock_server = douglas_adams_server().await;
        let tools = tools_for(&mock_server, false);
        let text = tools.get_statements("Q42", false, None).await;
        assert!(text.contains("Douglas Adams (Q42): instance of (P31): human (Q5)"));
        assert!(text.contains("11 Mar 1952"));
        assert!(!text.contains("12 Mar 1952"));
        assert!(!text.contains("VIAF ID (P214)"));

        let text = tools.get_statements("q42", true, None).await;
        assert!(text.contains("VIAF ID (P214)"));
    }

    #[tokio::test]
    async fn test_get_statement_values() {
        let mock_server = douglas_adams_server().await;
        let tools = tools_for(&mock_server, false);
        let text = tools.get_statement_values("Q42", "P569", None).await;
        assert!(text.starts_with("Douglas Adams (Q42): date of birth (P569): 11 Mar 1952\n  Rank: normal"));
        assert!(text.contains("  Reference 1:\n    - stated in (P248): Who's Who (Q2567271)"));
        assert!(text.ends_with("12 Mar 1952\n  Rank: deprecated"));

        let text = tools.get_statement_values("Q42", "P18", None).await;
        assert_eq!(text, "No statement found for Q42 with property P18");
    }

    #[tokio::test]
    async fn test_entity_not_found() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/w/api.php"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "entities": {"Q0": {"id": "Q0", "missing": ""}}
            })))
            .mount(&mock_server)
            .await;
        let tools = tools_for(&mock_server, false);
        assert_eq!(tools.get_statements("Q0", false, None).await, "Entity Q0 not found");
        assert_eq!(
            tools.get_statement_values("Q0", "P31", None).await,
            "Entity Q0 not found"
        );
        assert_eq!(
            tools.get_instance_and_subclass_hierarchy("Q0", 5, None).await,
            "Entity Q0 not found"
        );
    }

    #[tokio::test]
    async fn test_hierarchy() {
        let mock_server = douglas_adams_server().await;
        let tools = tools_for(&mock_server, false);
        let text = tools.get_instance_and_subclass_hierarchy("Q42", 1, None).await;
        let j: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(
            j,
            json!({
                "Douglas Adams (Q42)": {
                    "instance of (P31)": ["human (Q5)"],
                    "subclass of (P279)": []
                }
            })
        );
    }

    #[tokio::test]
    async fn test_malformed_input_is_reported() {
        let mock_server = douglas_adams_server().await;
        let tools = tools_for(&mock_server, false);
        assert_eq!(
            tools.get_statements("X1", false, None).await,
            "Unrecognized entity ID: X1"
        );
        assert_eq!(
            tools.get_statements("Q42", false, Some("12")).await,
            "Invalid language code: 12"
        );
        assert_eq!(
            tools.search_items("Douglas Adams", None, Some(0)).await,
            "Invalid search limit: 0"
        );
    }

    #[tokio::test]
    async fn test_get_statements_skips_malformed_statement() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/w/api.php"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "entities": {
                    "Q1": {
                        "id": "Q1",
                        "labels": {"en": {"language": "en", "value": "thing"}},
                        "claims": {
                            "P1": [{
                                "rank": "normal",
                                "mainsnak": {
                                    "snaktype": "value", "property": "P1", "datatype": "string",
                                    "datavalue": {"value": "good", "type": "string"}
                                }
                            }],
                            "P2": [{
                                "rank": "bogus",
                                "mainsnak": {
                                    "snaktype": "value", "property": "P2", "datatype": "string",
                                    "datavalue": {"value": "bad", "type": "string"}
                                }
                            }]
                        }
                    },
                    "P1": {"id": "P1", "labels": {"en": {"language": "en", "value": "code"}}}
                }
            })))
            .mount(&mock_server)
            .await;
        let tools = tools_for(&mock_server, false);
        let text = tools.get_statements("Q1", false, None).await;
        assert!(text.contains("thing (Q1): code (P1): good"));
        assert!(!text.contains("bad"));
        assert!(!text.contains("unavailable"));
    }

    #[tokio::test]
    async fn test_upstream_failure_becomes_text() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503).set_body_string("down"))
            .mount(&mock_server)
            .await;
        let tools = tools_for(&mock_server, false);
        let text = tools.get_statements("Q42", false, None).await;
        assert_eq!(
            text,
            "Wikidata is currently unavailable (503 Service Unavailable: down). Please retry later."
        );
    }

    #[tokio::test]
    async fn test_search_items() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/w/api.php"))
            .and(query_param("action", "wbsearchentities"))
            .and(query_param("type", "item"))
            .and(query_param("limit", "3"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "search": [{
                    "id": "Q42",
                    "display": {
                        "label": {"value": "Douglas Adams", "language": "en"},
                        "description": {"value": "English writer and humorist", "language": "en"}
                    }
                }]
            })))
            .mount(&mock_server)
            .await;
        let tools = tools_for(&mock_server, false);
        assert_eq!(
            tools.search_items("Douglas Adams", None, Some(3)).await,
            "Q42: Douglas Adams — English writer and humorist"
        );
    }

    #[tokio::test]
    async fn test_execute_sparql_error_text() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/sparql"))
            .respond_with(
                ResponseTemplate::new(400).set_body_string("Encountered \"SELEC\"\n\tat java.lang.Thread.run"),
            )
            .mount(&mock_server)
            .await;
        let tools = tools_for(&mock_server, false);
        assert_eq!(
            tools.execute_sparql("SELEC", DEFAULT_ROW_CAP).await,
            "Encountered \"SELEC\"\n"
        );
    }

    #[test]
    fn test_definitions() {
        let api = WikidataApi::builder().build().unwrap();
        let tools = WikidataTools::new(api.clone(), Language::parse("en").unwrap(), false);
        let names = tools.definitions().iter().map(|d| d.name).collect::<Vec<_>>();
        assert_eq!(
            names,
            vec![
                SEARCH_ITEMS,
                SEARCH_PROPERTIES,
                GET_STATEMENTS,
                GET_STATEMENT_VALUES,
                GET_HIERARCHY,
                EXECUTE_SPARQL
            ]
        );
        let tools = WikidataTools::new(api, Language::parse("en").unwrap(), true);
        assert_eq!(tools.definitions().len(), 8);
        assert_eq!(tools.definitions()[0].name, VECTOR_SEARCH_ITEMS);
        let j = serde_json::to_value(&tools.definitions()[0]).unwrap();
        assert_eq!(j["inputSchema"]["required"], json!(["query"]));
    }

    #[tokio::test]
    async fn test_call() {
        let mock_server = douglas_adams_server().await;
        let tools = tools_for(&mock_server, false);
        let text = tools
            .call(GET_STATEMENT_VALUES, &json!({"entity_id": "Q42", "property_id": "P31"}))
            .await
            .unwrap();
        assert!(text.starts_with("Douglas Adams (Q42): instance of (P31): human (Q5)"));

        let err = tools.call("no_such_tool", &json!({})).await.unwrap_err();
        assert!(matches!(err, WikidataError::UnknownTool(_)));
        let err = tools
            .call(VECTOR_SEARCH_ITEMS, &json!({"query": "writer"}))
            .await
            .unwrap_err();
        assert!(matches!(err, WikidataError::UnknownTool(_)));
        let err = tools.call(GET_STATEMENTS, &json!({})).await.unwrap_err();
        assert!(matches!(err, WikidataError::MissingOrInvalidField { .. }));
        let err = tools
            .call(GET_STATEMENTS, &json!({"entity_id": "Q42", "include_external_ids": "yes"}))
            .await
            .unwrap_err();
        assert!(matches!(err, WikidataError::MissingOrInvalidField { .. }));
    }
}
