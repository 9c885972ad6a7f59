use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;
use tracing::debug;

use crate::{WikidataApi, WikidataError};

/// Default number of rows returned by the SPARQL tool.
pub const DEFAULT_ROW_CAP: usize = 10;

static ENTITY_URI_RE: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r"^http://www\.wikidata\.org/entity/([A-Z]\d+)$").ok()
});

/// Replaces a Wikidata concept URI by its bare ID. Other values are kept.
pub fn shorten(value: &str) -> String {
    ENTITY_URI_RE
        .as_ref()
        .and_then(|re| re.captures(value))
        .and_then(|captures| captures.get(1))
        .map_or_else(|| value.to_string(), |id| id.as_str().to_string())
}

/// A projected SELECT result: one column per variable, URIs shortened.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SparqlResult {
    vars: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl SparqlResult {
    /// Projects a SPARQL JSON result to the `value` of each binding, keeping
    /// at most `row_cap` rows. Unbound cells are empty.
    pub fn from_json(j: &Value, row_cap: usize) -> Result<Self, WikidataError> {
        let vars = j["head"]["vars"]
            .as_array()
            .ok_or_else(|| WikidataError::missing_field("head", j))?
            .iter()
            .filter_map(|var| var.as_str())
            .map(|var| var.to_string())
            .collect::<Vec<_>>();
        let rows = j["results"]["bindings"]
            .as_array()
            .map(|bindings| {
                bindings
                    .iter()
                    .take(row_cap)
                    .map(|binding| {
                        vars.iter()
                            .map(|var| binding[var]["value"].as_str().map(shorten).unwrap_or_default())
                            .collect()
                    })
                    .collect()
            })
            .unwrap_or_default();
        Ok(Self { vars, rows })
    }

    pub fn vars(&self) -> &[String] {
        &self.vars
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Semicolon-separated CSV with a leading row-number column.
    pub fn to_csv(&self) -> Result<String, WikidataError> {
        let mut writer = csv::WriterBuilder::new()
            .delimiter(b';')
            .terminator(csv::Terminator::Any(b'\n'))
            .from_writer(vec![]);
        let mut header = vec![String::new()];
        header.extend(self.vars.iter().cloned());
        writer.write_record(&header)?;
        for (num, row) in self.rows.iter().enumerate() {
            let mut record = vec![num.to_string()];
            record.extend(row.iter().cloned());
            writer.write_record(&record)?;
        }
        let bytes = writer
            .into_inner()
            .map_err(|e| WikidataError::Io(e.into_error()))?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

/// Runs a query against the SPARQL endpoint. A 400 response becomes
/// `SparqlSyntax` carrying the endpoint's message without its stack trace.
pub async fn execute_sparql(
    api: &WikidataApi,
    query: &str,
    row_cap: usize,
) -> Result<SparqlResult, WikidataError> {
    let request = api
        .get(api.sparql_url())?
        .header(reqwest::header::ACCEPT, "application/sparql-results+json")
        .query(&[("query", query), ("format", "json")])
        .build()?;
    debug!(row_cap, "SPARQL query");
    let response = api.client().execute(request).await?;
    if response.status() == reqwest::StatusCode::BAD_REQUEST {
        let text = response.text().await?;
        let message = text.split("\tat ").next().unwrap_or_default();
        return Err(WikidataError::SparqlSyntax(message.to_string()));
    }
    if !response.status().is_success() {
        return Err(WikidataError::from_response(response).await);
    }
    let j: Value = response.json().await?;
    SparqlResult::from_json(&j, row_cap)
}
