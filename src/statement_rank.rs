use std::fmt;

use crate::WikidataError;

#[derive(Debug, Clone, PartialEq, Eq, Default, Copy)]
pub enum StatementRank {
    #[default]
    Normal,
    Preferred,
    Deprecated,
}

impl StatementRank {
    /// Create a new `StatementRank` from a string
    pub fn new<S: Into<String>>(s: S) -> Result<Self, WikidataError> {
        let s = s.into();
        match s.to_lowercase().as_str() {
            "normal" => Ok(StatementRank::Normal),
            "preferred" => Ok(StatementRank::Preferred),
            "deprecated" => Ok(StatementRank::Deprecated),
            _ => Err(WikidataError::UnknownStatementRank(s)),
        }
    }

    /// Reads the `rank` field of a statement; a missing rank is normal.
    pub fn from_statement_json(j: &serde_json::Value) -> Result<Self, WikidataError> {
        j["rank"].as_str().map_or(Ok(StatementRank::Normal), Self::new)
    }

    /// Returns the `StatementRank` as a string
    pub const fn as_str(&self) -> &str {
        match self {
            StatementRank::Normal => "normal",
            StatementRank::Preferred => "preferred",
            StatementRank::Deprecated => "deprecated",
        }
    }

    pub const fn is_deprecated(&self) -> bool {
        matches!(self, StatementRank::Deprecated)
    }
}

impl fmt::Display for StatementRank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
