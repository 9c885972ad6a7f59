use serde_json::Value;

use crate::{
    entity_source::EntitySource,
    entity_table::{EntityRef, EntityTable},
    property_value::PropertyValue,
    reference::Reference,
    statement_value::StatementValue,
    DataType, EntityId, Language, StatementRank, WikidataError,
};

/// One claim of a subject entity, with every entity in it held as an
/// `EntityRef` into the request's `EntityTable`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    id: Option<String>,
    subject: EntityRef,
    property: EntityRef,
    datatype: Option<DataType>,
    value: StatementValue,
    rank: StatementRank,
    qualifiers: Vec<PropertyValue>,
    references: Vec<Reference>,
}

impl Statement {
    pub const fn new(subject: EntityRef, property: EntityRef, value: StatementValue) -> Self {
        Self {
            id: None,
            subject,
            property,
            datatype: None,
            value,
            rank: StatementRank::Normal,
            qualifiers: vec![],
            references: vec![],
        }
    }

    /// Decodes one `wbgetentities` statement record of `subject`.
    /// References are only decoded if `with_references` is set.
    pub async fn from_json(
        subject: EntityRef,
        j: &Value,
        with_references: bool,
        table: &mut EntityTable,
        source: &dyn EntitySource,
        language: &Language,
    ) -> Result<Self, WikidataError> {
        let rank = StatementRank::from_statement_json(j)?;
        let mainsnak = &j["mainsnak"];
        let property = mainsnak["property"]
            .as_str()
            .ok_or_else(|| WikidataError::missing_field("property", mainsnak))?;
        let property = table.get_or_create(&EntityId::new(property)?);
        let value = StatementValue::from_snak(mainsnak, table, source, language).await?;
        let qualifiers = PropertyValue::from_snak_groups(
            &j["qualifiers"],
            &j["qualifiers-order"],
            table,
            source,
            language,
        )
        .await?;
        let mut references = vec![];
        if with_references {
            for reference in j["references"].as_array().into_iter().flatten() {
                references.push(Reference::from_json(reference, table, source, language).await?);
            }
        }
        Ok(Self {
            id: j["id"].as_str().map(|s| s.to_string()),
            subject,
            property,
            datatype: mainsnak["datatype"].as_str().and_then(|d| DataType::new(d).ok()),
            value,
            rank,
            qualifiers,
            references,
        })
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub const fn subject(&self) -> EntityRef {
        self.subject
    }

    pub const fn property(&self) -> EntityRef {
        self.property
    }

    pub const fn datatype(&self) -> Option<DataType> {
        self.datatype
    }

    pub const fn value(&self) -> &StatementValue {
        &self.value
    }

    pub const fn rank(&self) -> StatementRank {
        self.rank
    }

    pub fn qualifiers(&self) -> &[PropertyValue] {
        &self.qualifiers
    }

    pub fn references(&self) -> &[Reference] {
        &self.references
    }

    pub fn with_rank(mut self, rank: StatementRank) -> Self {
        self.rank = rank;
        self
    }

    pub fn with_qualifiers(mut self, qualifiers: Vec<PropertyValue>) -> Self {
        self.qualifiers = qualifiers;
        self
    }

    pub fn with_references(mut self, references: Vec<Reference>) -> Self {
        self.references = references;
        self
    }
}
