use serde_json::Value;

use crate::{EntityId, Language};

/// Label and description of an entity that has not been looked up (yet).
pub const UNRESOLVED: &str = "UNRESOLVED";

/// `UNSEEN -> Placeholder -> Resolved`; `Missing` marks a lookup that did not
/// return the entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResolutionState {
    #[default]
    Placeholder,
    Resolved,
    Missing,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entity {
    id: EntityId,
    label: String,
    description: String,
    state: ResolutionState,
}

impl Entity {
    /// Creates an unresolved placeholder.
    pub fn placeholder(id: EntityId) -> Self {
        Self {
            id,
            label: UNRESOLVED.to_string(),
            description: UNRESOLVED.to_string(),
            state: ResolutionState::Placeholder,
        }
    }

    pub const fn id(&self) -> &EntityId {
        &self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub const fn state(&self) -> ResolutionState {
        self.state
    }

    pub const fn is_pending(&self) -> bool {
        matches!(self.state, ResolutionState::Placeholder)
    }

    /// Overwrites label and description from a `wbgetentities` record.
    /// Returns false if the entity was already resolved.
    pub fn resolve(&mut self, record: &Value, language: &Language) -> bool {
        if self.state == ResolutionState::Resolved {
            return false;
        }
        self.label = language.pick(&record["labels"]);
        self.description = language.pick(&record["descriptions"]);
        self.state = ResolutionState::Resolved;
        true
    }

    pub(crate) fn mark_missing(&mut self) {
        if self.state == ResolutionState::Placeholder {
            self.state = ResolutionState::Missing;
        }
    }

    /// `"<label> (<id>)"`
    pub fn display(&self) -> String {
        format!("{} ({})", self.label, self.id)
    }
}
