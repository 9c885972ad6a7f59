use serde_json::Value;
use tracing::warn;

use crate::{
    entity_source::EntitySource,
    entity_table::{EntityRef, EntityTable},
    statement_value::StatementValue,
    EntityId, Language, WikidataError,
};

/// A property with its value, as used for qualifiers and reference parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyValue {
    property: EntityRef,
    value: StatementValue,
}

impl PropertyValue {
    pub const fn new(property: EntityRef, value: StatementValue) -> Self {
        Self { property, value }
    }

    /// Decodes a snak, registering its property in `table`.
    pub async fn from_snak(
        snak: &Value,
        table: &mut EntityTable,
        source: &dyn EntitySource,
        language: &Language,
    ) -> Result<Self, WikidataError> {
        let property = snak["property"]
            .as_str()
            .ok_or_else(|| WikidataError::missing_field("property", snak))?;
        let property = table.get_or_create(&EntityId::new(property)?);
        let value = StatementValue::from_snak(snak, table, source, language).await?;
        Ok(Self::new(property, value))
    }

    /// Decodes a `{"P580": [snak, ...], ...}` map, following `order` (the
    /// `qualifiers-order`/`snaks-order` list) when given. Snaks that cannot be
    /// decoded are left out.
    pub async fn from_snak_groups(
        groups: &Value,
        order: &Value,
        table: &mut EntityTable,
        source: &dyn EntitySource,
        language: &Language,
    ) -> Result<Vec<Self>, WikidataError> {
        let Some(groups) = groups.as_object() else {
            return Ok(vec![]);
        };
        let mut keys = order
            .as_array()
            .map(|order| order.iter().filter_map(|p| p.as_str()).collect::<Vec<_>>())
            .unwrap_or_default();
        for key in groups.keys() {
            if !keys.contains(&key.as_str()) {
                keys.push(key.as_str());
            }
        }
        let mut ret = vec![];
        for key in keys {
            let Some(snaks) = groups.get(key).and_then(|g| g.as_array()) else {
                continue;
            };
            for snak in snaks {
                match Self::from_snak(snak, table, source, language).await {
                    Ok(pv) => ret.push(pv),
                    Err(e) if e.is_statement_local() => {
                        warn!(property = key, error = %e, "skipping malformed snak");
                    }
                    Err(e) => return Err(e),
                }
            }
        }
        Ok(ret)
    }

    pub const fn property(&self) -> EntityRef {
        self.property
    }

    pub const fn value(&self) -> &StatementValue {
        &self.value
    }
}
