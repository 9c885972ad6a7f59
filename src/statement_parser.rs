use serde_json::Value;
use tracing::{debug, warn};

use crate::{
    entity_source::{fetch_chunked, EntitySource, PROPS_CLAIMS},
    entity_table::{EntityRef, EntityTable},
    statement::Statement,
    DataType, EntityId, Language, WikidataError,
};

/// Which statements of an entity to keep.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParseOptions {
    all_ranks: bool,
    include_external_ids: bool,
    include_references: bool,
    properties: Option<Vec<EntityId>>,
}

impl ParseOptions {
    /// Keep deprecated statements too.
    pub const fn with_all_ranks(mut self, all_ranks: bool) -> Self {
        self.all_ranks = all_ranks;
        self
    }

    pub const fn with_external_ids(mut self, include_external_ids: bool) -> Self {
        self.include_external_ids = include_external_ids;
        self
    }

    pub const fn with_references(mut self, include_references: bool) -> Self {
        self.include_references = include_references;
        self
    }

    /// Only parse these properties, in this order.
    pub fn with_properties(mut self, properties: Vec<EntityId>) -> Self {
        self.properties = Some(properties);
        self
    }

    pub const fn all_ranks(&self) -> bool {
        self.all_ranks
    }

    pub const fn include_external_ids(&self) -> bool {
        self.include_external_ids
    }

    pub const fn include_references(&self) -> bool {
        self.include_references
    }

    pub fn properties(&self) -> Option<&[EntityId]> {
        self.properties.as_deref()
    }

    fn keeps(&self, statement: &Value) -> bool {
        if !self.all_ranks && statement["rank"].as_str() == Some("deprecated") {
            return false;
        }
        if !self.include_external_ids
            && statement["mainsnak"]["datatype"].as_str() == Some(DataType::ExternalId.as_str())
        {
            return false;
        }
        true
    }
}

/// An entity that was fetched with its claims.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedEntity {
    entity: EntityRef,
    statements: Vec<Statement>,
}

impl ParsedEntity {
    pub const fn entity(&self) -> EntityRef {
        self.entity
    }

    pub fn statements(&self) -> &[Statement] {
        &self.statements
    }

    /// Statements of one property, in claim order.
    pub fn statements_for(&self, property: EntityRef) -> Vec<&Statement> {
        self.statements
            .iter()
            .filter(|s| s.property() == property)
            .collect()
    }
}

/// Turns raw claim groups into `Statement`s, registering every entity it meets
/// in the caller's `EntityTable`.
#[derive(Clone, Copy)]
pub struct StatementParser<'a> {
    source: &'a dyn EntitySource,
    language: &'a Language,
    options: &'a ParseOptions,
}

impl std::fmt::Debug for StatementParser<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StatementParser")
            .field("language", self.language)
            .field("options", self.options)
            .finish_non_exhaustive()
    }
}

impl<'a> StatementParser<'a> {
    pub const fn new(
        source: &'a dyn EntitySource,
        language: &'a Language,
        options: &'a ParseOptions,
    ) -> Self {
        Self {
            source,
            language,
            options,
        }
    }

    /// Parses the `claims` map of one entity. A statement that cannot be
    /// decoded is logged and left out; fetch errors still fail the whole call.
    pub async fn parse_claims(
        &self,
        subject: EntityRef,
        claims: &Value,
        table: &mut EntityTable,
    ) -> Result<Vec<Statement>, WikidataError> {
        let Some(groups) = claims.as_object() else {
            return Ok(vec![]);
        };
        let keys: Vec<&str> = match self.options.properties() {
            Some(properties) => properties.iter().map(|p| p.id()).collect(),
            None => groups.keys().map(|k| k.as_str()).collect(),
        };
        let mut ret = vec![];
        for key in keys {
            let Some(group) = groups.get(key).and_then(|g| g.as_array()) else {
                continue;
            };
            for j in group.iter().filter(|j| self.options.keeps(j)) {
                let statement = Statement::from_json(
                    subject,
                    j,
                    self.options.include_references(),
                    table,
                    self.source,
                    self.language,
                )
                .await;
                match statement {
                    Ok(statement) => ret.push(statement),
                    Err(e) if e.is_statement_local() => {
                        warn!(
                            entity = %table.get(subject).id(),
                            property = key,
                            statement = j["id"].as_str().unwrap_or_default(),
                            error = %e,
                            "skipping malformed statement"
                        );
                    }
                    Err(e) => return Err(e),
                }
            }
        }
        Ok(ret)
    }

    /// Fetches `ids` with their claims and parses them. The subjects get their
    /// labels from the same records; every other entity stays a placeholder
    /// until `EntityTable::resolve_all`. Entities that do not exist are left out.
    pub async fn fetch_and_parse(
        &self,
        ids: &[EntityId],
        table: &mut EntityTable,
    ) -> Result<Vec<ParsedEntity>, WikidataError> {
        let mut unique: Vec<String> = vec![];
        for id in ids {
            let id = id.id().to_string();
            if !unique.contains(&id) {
                unique.push(id);
            }
        }
        let records = fetch_chunked(
            self.source,
            &unique,
            PROPS_CLAIMS,
            self.language,
            table.chunk_size(),
            table.max_concurrent_load(),
        )
        .await?;
        debug!(requested = unique.len(), found = records.len(), "parsing claims");
        let mut ret = vec![];
        for id in ids {
            let Some(record) = records.get(id.id()) else {
                continue;
            };
            let entity = table.get_or_create(id);
            if ret.iter().any(|p: &ParsedEntity| p.entity == entity) {
                continue;
            }
            table.resolve_from_record(entity, record, self.language);
            let statements = self.parse_claims(entity, &record["claims"], table).await?;
            ret.push(ParsedEntity { entity, statements });
        }
        Ok(ret)
    }

    /// `fetch_and_parse` followed by the single label resolution pass.
    pub async fn load(
        &self,
        ids: &[EntityId],
        table: &mut EntityTable,
    ) -> Result<Vec<ParsedEntity>, WikidataError> {
        let ret = self.fetch_and_parse(ids, table).await?;
        table.resolve_all(self.source, self.language).await?;
        Ok(ret)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{entity::UNRESOLVED, statement_value::StatementValue, testing::FixtureSource};

    fn en() -> Language {
        Language::parse("en").unwrap()
    }

    fn douglas_adams() -> FixtureSource {
        FixtureSource::from_file("Q42.json")
    }

    #[tokio::test]
    async fn test_default_options_drop_deprecated_and_external_ids() {
        let source = douglas_adams();
        let lang = en();
        let options = ParseOptions::default();
        let parser = StatementParser::new(&source, &lang, &options);
        let mut table = EntityTable::new();
        let parsed = parser.load(&[EntityId::item("Q42")], &mut table).await.unwrap();
        assert_eq!(parsed.len(), 1);
        let statements = parsed[0].statements();
        assert!(statements.iter().all(|s| !s.rank().is_deprecated()));
        assert!(statements
            .iter()
            .all(|s| s.datatype() != Some(DataType::ExternalId)));
        assert!(statements.iter().all(|s| s.references().is_empty()));
        let p569 = table.lookup(&EntityId::property("P569")).unwrap();
        assert_eq!(parsed[0].statements_for(p569).len(), 1);
    }

    #[tokio::test]
    async fn test_all_ranks_keeps_deprecated() {
        let source = douglas_adams();
        let lang = en();
        let options = ParseOptions::default()
            .with_all_ranks(true)
            .with_external_ids(true)
            .with_references(true)
            .with_properties(vec![EntityId::property("P569")]);
        let parser = StatementParser::new(&source, &lang, &options);
        let mut table = EntityTable::new();
        let parsed = parser.load(&[EntityId::item("Q42")], &mut table).await.unwrap();
        let statements = parsed[0].statements();
        assert_eq!(statements.len(), 2);
        assert!(statements.iter().any(|s| s.rank().is_deprecated()));
        assert!(statements.iter().any(|s| !s.references().is_empty()));
    }

    #[tokio::test]
    async fn test_identity_shared_across_entities() {
        let source = douglas_adams();
        let lang = en();
        let options = ParseOptions::default();
        let parser = StatementParser::new(&source, &lang, &options);
        let mut table = EntityTable::new();
        let parsed = parser
            .load(&[EntityId::item("Q42"), EntityId::item("Q5")], &mut table)
            .await
            .unwrap();
        assert_eq!(parsed.len(), 2);
        let q5 = table.lookup(&EntityId::item("Q5")).unwrap();
        // Q42 is an instance of Q5, and Q5 is a subject of its own.
        let p31 = table.lookup(&EntityId::property("P31")).unwrap();
        let value = parsed[0].statements_for(p31)[0].value().entity_ref();
        assert_eq!(value, Some(q5));
        assert_eq!(parsed[1].entity(), q5);
        assert_eq!(table.get(q5).label(), "human");
        // Claims of both, the height unit, then one label pass.
        assert_eq!(source.requests().len(), 3);
        assert!(table.iter().all(|e| !e.is_pending()));
    }

    #[tokio::test]
    async fn test_labels_back_filled() {
        let source = douglas_adams();
        let lang = en();
        let options = ParseOptions::default();
        let parser = StatementParser::new(&source, &lang, &options);
        let mut table = EntityTable::new();
        let parsed = parser.load(&[EntityId::item("Q42")], &mut table).await.unwrap();
        let subject = table.get(parsed[0].entity());
        assert_eq!(subject.label(), "Douglas Adams");
        let p106 = table.lookup(&EntityId::property("P106")).unwrap();
        assert_eq!(table.get(p106).label(), "occupation");
        let occupation = parsed[0].statements_for(p106)[0].value().entity_ref().unwrap();
        assert_eq!(table.get(occupation).label(), "novelist");
    }

    #[tokio::test]
    async fn test_absent_value_entity_keeps_placeholder() {
        let source = douglas_adams();
        let lang = en();
        let options = ParseOptions::default();
        let parser = StatementParser::new(&source, &lang, &options);
        let mut table = EntityTable::new();
        parser.load(&[EntityId::item("Q42")], &mut table).await.unwrap();
        // Q350 (Cambridge) is referenced but has no fixture record.
        let cambridge = table.lookup(&EntityId::item("Q350")).unwrap();
        assert_eq!(table.get(cambridge).label(), UNRESOLVED);
    }

    #[tokio::test]
    async fn test_missing_entity_left_out() {
        let source = douglas_adams();
        let lang = en();
        let options = ParseOptions::default();
        let parser = StatementParser::new(&source, &lang, &options);
        let mut table = EntityTable::new();
        let parsed = parser.load(&[EntityId::item("Q0")], &mut table).await.unwrap();
        assert!(parsed.is_empty());
    }

    fn string_statement(property: &str, rank: &str, value: &str) -> Value {
        serde_json::json!({
            "id": format!("Q1${property}"),
            "rank": rank,
            "type": "statement",
            "mainsnak": {
                "snaktype": "value", "property": property, "datatype": "string",
                "datavalue": {"value": value, "type": "string"}
            }
        })
    }

    #[tokio::test]
    async fn test_malformed_statement_skipped() {
        let source = FixtureSource::default();
        let lang = en();
        let options = ParseOptions::default();
        let parser = StatementParser::new(&source, &lang, &options);
        let mut table = EntityTable::new();
        let subject = table.get_or_create(&EntityId::item("Q1"));
        let claims = serde_json::json!({
            "P1": [string_statement("P1", "normal", "good")],
            "P2": [string_statement("P2", "bogus", "bad rank")],
            "X9": [string_statement("X9", "normal", "bad property")],
        });
        let statements = parser.parse_claims(subject, &claims, &mut table).await.unwrap();
        assert_eq!(statements.len(), 1);
        assert_eq!(statements[0].value(), &StatementValue::literal("good"));
    }

    #[tokio::test]
    async fn test_malformed_qualifier_skipped() {
        let source = FixtureSource::default();
        let lang = en();
        let options = ParseOptions::default();
        let parser = StatementParser::new(&source, &lang, &options);
        let mut table = EntityTable::new();
        let subject = table.get_or_create(&EntityId::item("Q1"));
        let mut statement = string_statement("P1", "normal", "good");
        statement["qualifiers"] = serde_json::json!({
            "X9": [{
                "snaktype": "value", "property": "X9", "datatype": "string",
                "datavalue": {"value": "bad", "type": "string"}
            }]
        });
        let claims = serde_json::json!({"P1": [statement]});
        let statements = parser.parse_claims(subject, &claims, &mut table).await.unwrap();
        assert_eq!(statements.len(), 1);
        assert!(statements[0].qualifiers().is_empty());
    }

    #[tokio::test]
    async fn test_transport_error_still_propagates() {
        let source = FixtureSource::default().failing();
        let lang = en();
        let options = ParseOptions::default();
        let parser = StatementParser::new(&source, &lang, &options);
        let mut table = EntityTable::new();
        let result = parser.load(&[EntityId::item("Q42")], &mut table).await;
        assert!(matches!(result, Err(WikidataError::ApiError { .. })));
    }

    #[tokio::test]
    async fn test_somevalue_qualifier() {
        let source = douglas_adams();
        let lang = en();
        let options = ParseOptions::default().with_properties(vec![EntityId::property("P735")]);
        let parser = StatementParser::new(&source, &lang, &options);
        let mut table = EntityTable::new();
        let parsed = parser.load(&[EntityId::item("Q42")], &mut table).await.unwrap();
        let qualifiers = parsed[0].statements()[0].qualifiers();
        assert_eq!(qualifiers[0].value(), &StatementValue::literal("unknown value"));
    }
}
