use std::fmt;

use crate::WikidataError;

/// The prefix of concept URIs, as used in quantity units and SPARQL results.
pub const ENTITY_URI_PREFIX: &str = "http://www.wikidata.org/entity/";

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EntityId {
    Item(String),
    Property(String),
}

impl EntityId {
    /// Returns the ID of the entity.
    pub fn id(&self) -> &str {
        match self {
            EntityId::Item(id) => id,
            EntityId::Property(id) => id,
        }
    }

    /// Returns the entity type of the entity, as used by the search endpoints.
    pub const fn entity_type(&self) -> &str {
        match self {
            EntityId::Item(_) => "item",
            EntityId::Property(_) => "property",
        }
    }

    /// Creates a new entity ID from a string such as `Q42` or ` p31`.
    pub fn new<S: Into<String>>(id: S) -> Result<EntityId, WikidataError> {
        let id: String = id.into();
        let id = id.trim().to_uppercase();
        let mut chars = id.chars();
        let letter = chars.next();
        let digits = chars.as_str();
        if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(WikidataError::UnknownEntityLetter(id));
        }
        match letter {
            Some('Q') => Ok(EntityId::Item(id)),
            Some('P') => Ok(EntityId::Property(id)),
            _ => Err(WikidataError::UnknownEntityLetter(id)),
        }
    }

    /// Parses a concept URI such as `http://www.wikidata.org/entity/Q11573`.
    pub fn from_uri(uri: &str) -> Option<EntityId> {
        let id = uri.strip_prefix(ENTITY_URI_PREFIX)?;
        Self::new(id).ok()
    }

    /// Returns a new entity ID for an item.
    pub fn item<S: Into<String>>(s: S) -> EntityId {
        EntityId::Item(s.into())
    }

    /// Returns a new entity ID for a property.
    pub fn property<S: Into<String>>(s: S) -> EntityId {
        EntityId::Property(s.into())
    }

    pub const fn is_item(&self) -> bool {
        matches!(self, EntityId::Item(_))
    }

    pub const fn is_property(&self) -> bool {
        matches!(self, EntityId::Property(_))
    }
}

impl From<EntityId> for String {
    fn from(val: EntityId) -> Self {
        match val {
            EntityId::Item(id) => id,
            EntityId::Property(id) => id,
        }
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id())
    }
}
