use serde_json::Value;
use tracing::debug;

use crate::{
    entity_source::{EntitySource, PROPS_LABELS},
    EntityId, Language, WikidataError,
};

/// A quantity with its unit already rendered as `"<label> (<id>)"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quantity {
    amount: String,
    unit: Option<String>,
}

impl Quantity {
    pub fn new<S: Into<String>>(amount: S, unit: Option<String>) -> Self {
        Self {
            amount: amount.into(),
            unit,
        }
    }

    /// The amount with any leading `+` removed.
    pub fn amount(&self) -> &str {
        &self.amount
    }

    pub fn unit(&self) -> Option<&str> {
        self.unit.as_deref()
    }

    /// Decodes a `quantity` datavalue payload. A unit that is an entity URI is
    /// labelled with its own lookup; unit `"1"` means dimensionless.
    pub async fn from_json(
        value: &Value,
        source: &dyn EntitySource,
        language: &Language,
    ) -> Result<Self, WikidataError> {
        let amount = value["amount"]
            .as_str()
            .ok_or_else(|| WikidataError::MalformedQuantity(value.to_owned()))?;
        let amount = amount.strip_prefix('+').unwrap_or(amount);
        let unit = match value["unit"].as_str().and_then(EntityId::from_uri) {
            Some(unit_id) => Some(Self::unit_label(&unit_id, source, language).await?),
            None => None,
        };
        Ok(Self::new(amount, unit))
    }

    async fn unit_label(
        unit_id: &EntityId,
        source: &dyn EntitySource,
        language: &Language,
    ) -> Result<String, WikidataError> {
        debug!(unit = %unit_id, "resolving quantity unit");
        let ids = [unit_id.id().to_string()];
        let entities = source.fetch_entities(&ids, PROPS_LABELS, language).await?;
        let label = entities
            .get(unit_id.id())
            .map(|entity| language.pick(&entity["labels"]))
            .unwrap_or_default();
        if label.is_empty() {
            Ok(unit_id.to_string())
        } else {
            Ok(format!("{label} ({unit_id})"))
        }
    }
}

impl std::fmt::Display for Quantity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.unit {
            Some(unit) => write!(f, "{} {unit}", self.amount),
            None => f.write_str(&self.amount),
        }
    }
}
