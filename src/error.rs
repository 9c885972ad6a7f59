use reqwest::header::InvalidHeaderValue;
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WikidataError {
    #[error("{status}: {body}")]
    ApiError {
        status: reqwest::StatusCode,
        status_text: String,
        body: String,
    },
    #[error("{0}")]
    SparqlSyntax(String),
    #[error("{0}")]
    Reqwest(#[from] reqwest::Error),
    #[error("{0}")]
    InvalidHeaderValue(#[from] InvalidHeaderValue),
    #[error("{0}")]
    SerdeJson(#[from] serde_json::Error),
    #[error("{0}")]
    Csv(#[from] csv::Error),
    #[error("{0}")]
    Io(#[from] std::io::Error),
    #[error("Malformed time value: {0}")]
    MalformedTime(String),
    #[error("Unknown time precision: {0}")]
    UnknownPrecision(u64),
    #[error("Malformed quantity value: {0}")]
    MalformedQuantity(Value),
    #[error("{}", missing_or_invalid(.field, .j))]
    MissingOrInvalidField { field: String, j: Value },
    #[error("Unrecognized entity ID: {0}")]
    UnknownEntityLetter(String),
    #[error("Invalid language code: {0}")]
    InvalidLanguage(String),
    #[error("Invalid search limit: {0}")]
    InvalidSearchLimit(String),
    #[error("No entity IDs given")]
    EmptyIdList,
    #[error("Unknown statement rank: {0}")]
    UnknownStatementRank(String),
    #[error("Unknown data type: {0}")]
    UnknownDataType(String),
    #[error("Entity {0} not found")]
    EntityNotFound(String),
    #[error("Invalid action API URL: {0}")]
    ApiUrlInvalid(String),
    #[error("Unknown tool: {0}")]
    UnknownTool(String),
}

fn missing_or_invalid(field: &str, j: &Value) -> String {
    if j.get(field).is_none() {
        format!("Missing field {field}: {j}")
    } else {
        format!("Invalid field type for {field}: {j}")
    }
}

impl WikidataError {
    /// Builds an `ApiError` from a non-success response, keeping the body text.
    pub async fn from_response(response: reqwest::Response) -> Self {
        let status = response.status();
        let status_text = status.canonical_reason().unwrap_or_default().to_owned();
        let body = response.text().await.unwrap_or_default();
        WikidataError::ApiError {
            status,
            status_text,
            body,
        }
    }

    /// Returns true for errors the caller caused and can fix by changing the request.
    pub const fn is_malformed_input(&self) -> bool {
        matches!(
            self,
            WikidataError::SparqlSyntax(_)
                | WikidataError::MalformedTime(_)
                | WikidataError::UnknownEntityLetter(_)
                | WikidataError::InvalidLanguage(_)
                | WikidataError::InvalidSearchLimit(_)
        )
    }

    /// Returns true for errors about a single bad value payload, which render as
    /// the raw payload instead of failing the statement.
    pub const fn is_degradable(&self) -> bool {
        matches!(
            self,
            WikidataError::MalformedTime(_)
                | WikidataError::UnknownPrecision(_)
                | WikidataError::MalformedQuantity(_)
                | WikidataError::MissingOrInvalidField { .. }
        )
    }

    /// Returns true for errors confined to one statement or snak. These drop
    /// that statement or snak and leave the rest of the entity intact.
    pub const fn is_statement_local(&self) -> bool {
        self.is_degradable()
            || matches!(
                self,
                WikidataError::UnknownEntityLetter(_)
                    | WikidataError::UnknownStatementRank(_)
                    | WikidataError::UnknownDataType(_)
            )
    }

    pub fn missing_field<S: Into<String>>(field: S, j: &Value) -> Self {
        WikidataError::MissingOrInvalidField {
            field: field.into(),
            j: j.to_owned(),
        }
    }
}
