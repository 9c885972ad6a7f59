use serde_json::Value;
use tracing::warn;

use crate::{
    coordinate::Coordinate,
    entity_source::EntitySource,
    entity_table::{EntityRef, EntityTable},
    quantity::Quantity,
    time_value::format_time,
    DataType, EntityId, Language, WikidataError,
};

/// Rendering of a snak without a datavalue.
pub const EMPTY_VALUE: &str = "<empty string>";

/// Rendering of a `somevalue` snak.
pub const SOME_VALUE: &str = "unknown value";

/// Rendering of a `novalue` snak.
pub const NO_VALUE: &str = "no value";

/// A decoded snak value. Exactly one shape per value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatementValue {
    Entity(EntityRef),
    Literal(String),
    Quantity(Quantity),
}

impl StatementValue {
    pub fn literal<S: Into<String>>(s: S) -> Self {
        StatementValue::Literal(s.into())
    }

    pub const fn entity_ref(&self) -> Option<EntityRef> {
        match self {
            StatementValue::Entity(entity_ref) => Some(*entity_ref),
            _ => None,
        }
    }

    /// Decodes a snak (main snak, qualifier or reference part).
    ///
    /// Entity values are registered in `table` and stay placeholders until the
    /// table is resolved. A malformed time or quantity payload degrades to its
    /// raw sub-field instead of failing.
    pub async fn from_snak(
        snak: &Value,
        table: &mut EntityTable,
        source: &dyn EntitySource,
        language: &Language,
    ) -> Result<Self, WikidataError> {
        match snak["snaktype"].as_str() {
            Some("somevalue") => return Ok(Self::literal(SOME_VALUE)),
            Some("novalue") => return Ok(Self::literal(NO_VALUE)),
            _ => {}
        }
        let datavalue = &snak["datavalue"];
        let value = &datavalue["value"];
        if value.is_null() {
            return Ok(Self::literal(EMPTY_VALUE));
        }
        let datatype = match snak["datatype"].as_str() {
            Some(datatype) => DataType::new(datatype).ok(),
            None => datavalue["type"].as_str().and_then(|value_type| {
                DataType::from_value_type(value_type, value["entity-type"].as_str()).ok()
            }),
        };
        let Some(datatype) = datatype else {
            return Ok(Self::literal(stringify_raw(value)));
        };
        Self::from_typed_value(datatype, value, table, source, language).await
    }

    async fn from_typed_value(
        datatype: DataType,
        value: &Value,
        table: &mut EntityTable,
        source: &dyn EntitySource,
        language: &Language,
    ) -> Result<Self, WikidataError> {
        let ret = match datatype {
            datatype if datatype.is_entity_reference() => {
                match value["id"].as_str().map(EntityId::new) {
                    Some(Ok(id)) => StatementValue::Entity(table.get_or_create(&id)),
                    _ => Self::literal(stringify_raw(value)),
                }
            }
            DataType::Lexeme | DataType::Form | DataType::Sense | DataType::EntitySchema => {
                match value["id"].as_str() {
                    Some(id) => Self::literal(id),
                    None => Self::literal(stringify_raw(value)),
                }
            }
            DataType::Monolingualtext => match (value["text"].as_str(), value["language"].as_str()) {
                (Some(text), Some(code)) => Self::literal(format!("{text} (language: {code})")),
                _ => Self::literal(stringify_raw(value)),
            },
            DataType::Time => match format_time(value) {
                Ok(text) => Self::literal(text),
                Err(e) => {
                    warn!(error = %e, "undecodable time value");
                    Self::literal(stringify_raw(&value["time"]))
                }
            },
            DataType::Quantity => match Quantity::from_json(value, source, language).await {
                Ok(quantity) => StatementValue::Quantity(quantity),
                Err(e) if e.is_degradable() => {
                    warn!(error = %e, "undecodable quantity value");
                    Self::literal(stringify_raw(&value["amount"]))
                }
                Err(e) => return Err(e),
            },
            DataType::GlobeCoordinate => match Coordinate::from_json(value) {
                Ok(coordinate) => Self::literal(coordinate.to_dms()),
                Err(e) => {
                    warn!(error = %e, "undecodable globe coordinate");
                    Self::literal(stringify_raw(value))
                }
            },
            _ => Self::literal(stringify_raw(value)),
        };
        Ok(ret)
    }
}

/// Strings as they are, anything else as compact JSON.
pub fn stringify_raw(value: &Value) -> String {
    match value {
        Value::String(s) => s.to_owned(),
        Value::Null => EMPTY_VALUE.to_string(),
        other => other.to_string(),
    }
}
