use serde_json::Value;

use crate::{
    entity_source::EntitySource, entity_table::EntityTable, property_value::PropertyValue,
    Language, WikidataError,
};

/// One citation of a statement.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Reference {
    parts: Vec<PropertyValue>,
    hash: String,
}

impl Reference {
    pub fn from_parts(parts: Vec<PropertyValue>) -> Self {
        Self {
            parts,
            hash: String::new(),
        }
    }

    /// Decodes one entry of a statement's `references` list.
    pub async fn from_json(
        j: &Value,
        table: &mut EntityTable,
        source: &dyn EntitySource,
        language: &Language,
    ) -> Result<Self, WikidataError> {
        let hash = j["hash"].as_str().unwrap_or_default().to_string();
        let parts =
            PropertyValue::from_snak_groups(&j["snaks"], &j["snaks-order"], table, source, language)
                .await?;
        Ok(Reference { parts, hash })
    }

    /// Returns the parts of the reference
    pub fn parts(&self) -> &[PropertyValue] {
        &self.parts
    }

    /// Returns the hash of the reference
    pub fn hash(&self) -> &str {
        &self.hash
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{statement_value::StatementValue, testing::FixtureSource, EntityId};
    use serde_json::json;

    #[tokio::test]
    async fn test_from_json() {
        let source = FixtureSource::default();
        let lang = Language::parse("en").unwrap();
        let mut table = EntityTable::new();
        let j = json!({
            "hash": "abc",
            "snaks": {
                "P248": [{
                    "snaktype": "value", "property": "P248", "datatype": "wikibase-item",
                    "datavalue": {"value": {"entity-type": "item", "id": "Q2567271"}, "type": "wikibase-entityid"}
                }],
                "P4789": [{
                    "snaktype": "value", "property": "P4789", "datatype": "external-id",
                    "datavalue": {"value": "U4994", "type": "string"}
                }]
            },
            "snaks-order": ["P248", "P4789"]
        });
        let reference = Reference::from_json(&j, &mut table, &source, &lang)
            .await
            .unwrap();
        assert_eq!(reference.hash(), "abc");
        assert_eq!(reference.parts().len(), 2);
        let stated_in = reference.parts()[0].value().entity_ref().unwrap();
        assert_eq!(table.get(stated_in).id(), &EntityId::item("Q2567271"));
        assert_eq!(reference.parts()[1].value(), &StatementValue::literal("U4994"));
    }

    #[tokio::test]
    async fn test_from_json_without_snaks() {
        let source = FixtureSource::default();
        let lang = Language::parse("en").unwrap();
        let mut table = EntityTable::new();
        let reference = Reference::from_json(&json!({"hash": "x"}), &mut table, &source, &lang)
            .await
            .unwrap();
        assert!(reference.parts().is_empty());
    }
}
