use std::{collections::HashMap, sync::Mutex};

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::{
    config::MAX_ENTITIES_PER_REQUEST, entity_source::EntitySource, Language, WikidataError,
};

/// An `EntitySource` serving fixed `wbgetentities` records. Every chunk it is
/// asked for is recorded.
#[derive(Debug, Default)]
pub struct FixtureSource {
    entities: HashMap<String, Value>,
    requests: Mutex<Vec<Vec<String>>>,
    fail: bool,
}

impl FixtureSource {
    /// Loads all records of a `wbgetentities` response under `test_data/`.
    pub fn from_file(name: &str) -> Self {
        let text = std::fs::read_to_string(format!("test_data/{name}")).unwrap();
        let j: Value = serde_json::from_str(&text).unwrap();
        let mut ret = Self::default();
        for (id, record) in j["entities"].as_object().unwrap() {
            ret.entities.insert(id.to_owned(), record.to_owned());
        }
        ret
    }

    pub fn with_generated_labels(ids: &[String]) -> Self {
        ids.iter().fold(Self::default(), |source, id| {
            let label = format!("label of {id}");
            source.with_label(id, &label)
        })
    }

    pub fn with_label(self, id: &str, label: &str) -> Self {
        self.with_entity(
            id,
            json!({
                "id": id,
                "labels": {"en": {"language": "en", "value": label}},
                "descriptions": {},
            }),
        )
    }

    pub fn with_entity(mut self, id: &str, record: Value) -> Self {
        self.entities.insert(id.to_string(), record);
        self
    }

    /// Makes every request fail like an unreachable host.
    pub const fn failing(mut self) -> Self {
        self.fail = true;
        self
    }

    pub fn requests(&self) -> Vec<Vec<String>> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl EntitySource for FixtureSource {
    async fn fetch_entities(
        &self,
        ids: &[String],
        props: &str,
        _language: &Language,
    ) -> Result<HashMap<String, Value>, WikidataError> {
        assert!(ids.len() <= MAX_ENTITIES_PER_REQUEST);
        self.requests.lock().unwrap().push(ids.to_vec());
        if self.fail {
            return Err(WikidataError::ApiError {
                status: reqwest::StatusCode::SERVICE_UNAVAILABLE,
                status_text: "Service Unavailable".to_string(),
                body: String::new(),
            });
        }
        let with_claims = props.split('|').any(|p| p == "claims");
        let ret = ids
            .iter()
            .filter_map(|id| {
                let mut record = self.entities.get(id)?.to_owned();
                if !with_claims {
                    if let Some(o) = record.as_object_mut() {
                        o.remove("claims");
                    }
                }
                Some((id.to_owned(), record))
            })
            .collect();
        Ok(ret)
    }
}
