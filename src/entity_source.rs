use std::collections::HashMap;

use async_trait::async_trait;
use futures::prelude::*;
use serde_json::Value;
use tracing::debug;

use crate::{Language, WikidataError};

/// `props` for a label and description lookup.
pub const PROPS_LABELS: &str = "labels|descriptions";

/// `props` for a lookup that includes the statements.
pub const PROPS_CLAIMS: &str = "labels|descriptions|claims";

/// Anything that can return raw `wbgetentities` records.
#[async_trait]
pub trait EntitySource: Send + Sync {
    /// Fetches one chunk of entities (at most the per-request limit of the host API).
    /// Entities that do not exist are absent from the returned map.
    async fn fetch_entities(
        &self,
        ids: &[String],
        props: &str,
        language: &Language,
    ) -> Result<HashMap<String, Value>, WikidataError>;
}

/// Fetches any number of entities, `chunk_size` IDs per request and at most
/// `max_concurrent` requests in flight.
pub async fn fetch_chunked(
    source: &dyn EntitySource,
    ids: &[String],
    props: &str,
    language: &Language,
    chunk_size: usize,
    max_concurrent: usize,
) -> Result<HashMap<String, Value>, WikidataError> {
    if ids.is_empty() {
        return Ok(HashMap::new());
    }
    let chunks = ids.chunks(chunk_size.max(1)).collect::<Vec<_>>();
    debug!(ids = ids.len(), chunks = chunks.len(), props, "fetching entities");
    let futures = chunks
        .into_iter()
        .map(|chunk| source.fetch_entities(chunk, props, language))
        .collect::<Vec<_>>();
    let results = futures::stream::iter(futures)
        .buffer_unordered(max_concurrent.max(1))
        .collect::<Vec<_>>()
        .await;
    let mut ret = HashMap::new();
    for result in results {
        ret.extend(result?);
    }
    Ok(ret)
}
