use serde_json::Value;
use std::collections::HashMap;
use tracing::debug;

use crate::{
    config::{MAX_CONCURRENT_LOAD_DEFAULT, MAX_ENTITIES_PER_REQUEST},
    entity::Entity,
    entity_source::{fetch_chunked, EntitySource, PROPS_LABELS},
    EntityId, Language, WikidataError,
};

/// Index of an entity in an `EntityTable`. Every reference to the same ID
/// within one table is the same `EntityRef`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityRef(usize);

/// The per-request arena of entities met while parsing statements.
#[derive(Debug, Clone)]
pub struct EntityTable {
    entities: Vec<Entity>,
    index: HashMap<EntityId, EntityRef>,
    chunk_size: usize,
    max_concurrent_load: usize,
}

impl Default for EntityTable {
    fn default() -> Self {
        Self::new()
    }
}

impl EntityTable {
    pub fn new() -> Self {
        Self::with_limits(MAX_ENTITIES_PER_REQUEST, MAX_CONCURRENT_LOAD_DEFAULT)
    }

    /// Sets the IDs per lookup request and the number of requests in flight.
    /// Zero means the default.
    pub fn with_limits(chunk_size: usize, max_concurrent_load: usize) -> Self {
        Self {
            entities: Vec::new(),
            index: HashMap::new(),
            chunk_size: if chunk_size == 0 {
                MAX_ENTITIES_PER_REQUEST
            } else {
                chunk_size
            },
            max_concurrent_load: if max_concurrent_load == 0 {
                MAX_CONCURRENT_LOAD_DEFAULT
            } else {
                max_concurrent_load
            },
        }
    }

    pub const fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub const fn max_concurrent_load(&self) -> usize {
        self.max_concurrent_load
    }

    /// Returns the existing entry for `id`, or registers a new placeholder.
    pub fn get_or_create(&mut self, id: &EntityId) -> EntityRef {
        if let Some(entity_ref) = self.index.get(id) {
            return *entity_ref;
        }
        let entity_ref = EntityRef(self.entities.len());
        self.entities.push(Entity::placeholder(id.to_owned()));
        self.index.insert(id.to_owned(), entity_ref);
        entity_ref
    }

    pub fn lookup(&self, id: &EntityId) -> Option<EntityRef> {
        self.index.get(id).copied()
    }

    pub fn get(&self, entity_ref: EntityRef) -> &Entity {
        &self.entities[entity_ref.0]
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter()
    }

    /// Resolves one entry from a record that was fetched anyway (e.g. with its claims).
    pub fn resolve_from_record(
        &mut self,
        entity_ref: EntityRef,
        record: &Value,
        language: &Language,
    ) -> bool {
        self.entities[entity_ref.0].resolve(record, language)
    }

    /// IDs of all entries still waiting for a lookup.
    pub fn pending_ids(&self) -> Vec<String> {
        self.entities
            .iter()
            .filter(|entity| entity.is_pending())
            .map(|entity| entity.id().to_string())
            .collect()
    }

    /// Looks up labels and descriptions for every pending entry in batches and
    /// fills them in place. Entries absent from the response keep their
    /// placeholder text.
    pub async fn resolve_all(
        &mut self,
        source: &dyn EntitySource,
        language: &Language,
    ) -> Result<(), WikidataError> {
        let pending = self.pending_ids();
        if pending.is_empty() {
            return Ok(());
        }
        debug!(pending = pending.len(), "resolving entity labels");
        let records = fetch_chunked(
            source,
            &pending,
            PROPS_LABELS,
            language,
            self.chunk_size,
            self.max_concurrent_load,
        )
        .await?;
        for entity in self.entities.iter_mut().filter(|e| e.is_pending()) {
            match records.get(entity.id().id()) {
                Some(record) => {
                    entity.resolve(record, language);
                }
                None => entity.mark_missing(),
            }
        }
        Ok(())
    }

    /// Builds a table for `ids` and resolves it. At least one ID is required.
    pub async fn resolve_ids(
        ids: &[EntityId],
        source: &dyn EntitySource,
        language: &Language,
    ) -> Result<(EntityTable, Vec<EntityRef>), WikidataError> {
        if ids.is_empty() {
            return Err(WikidataError::EmptyIdList);
        }
        let mut table = EntityTable::new();
        let refs = ids.iter().map(|id| table.get_or_create(id)).collect();
        table.resolve_all(source, language).await?;
        Ok((table, refs))
    }
}
