use std::collections::HashMap;

use serde_json::{json, Map, Value};
use tracing::debug;

use crate::{
    entity_source::EntitySource,
    entity_table::{EntityRef, EntityTable},
    statement_parser::{ParseOptions, ParsedEntity, StatementParser},
    EntityId, Language, WikidataError,
};

pub const INSTANCE_OF: &str = "P31";
pub const SUBCLASS_OF: &str = "P279";

const INSTANCE_OF_KEY: &str = "instance of (P31)";
const SUBCLASS_OF_KEY: &str = "subclass of (P279)";

/// Default depth of the hierarchy tool.
pub const DEFAULT_MAX_DEPTH: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HierarchyNode {
    instance_of: Vec<EntityRef>,
    subclass_of: Vec<EntityRef>,
}

impl HierarchyNode {
    pub fn instance_of(&self) -> &[EntityRef] {
        &self.instance_of
    }

    pub fn subclass_of(&self) -> &[EntityRef] {
        &self.subclass_of
    }
}

/// The instance-of/subclass-of graph above one entity.
#[derive(Debug, Clone)]
pub struct Hierarchy {
    root: EntityRef,
    nodes: HashMap<EntityRef, HierarchyNode>,
    table: EntityTable,
}

impl Hierarchy {
    /// Breadth-first expansion from `root` along P31 and P279, fetching each
    /// node's claims at most once. Stops when no new IDs turn up or after
    /// `max_depth + 1` levels.
    pub async fn walk(
        root: &EntityId,
        max_depth: usize,
        source: &dyn EntitySource,
        language: &Language,
    ) -> Result<Self, WikidataError> {
        Self::walk_in(EntityTable::new(), root, max_depth, source, language).await
    }

    /// `walk` with a caller-supplied table, for its chunking limits.
    pub async fn walk_in(
        mut table: EntityTable,
        root: &EntityId,
        max_depth: usize,
        source: &dyn EntitySource,
        language: &Language,
    ) -> Result<Self, WikidataError> {
        let root_ref = table.get_or_create(root);
        let instance_of = table.get_or_create(&EntityId::property(INSTANCE_OF));
        let subclass_of = table.get_or_create(&EntityId::property(SUBCLASS_OF));
        let options = ParseOptions::default().with_properties(vec![
            EntityId::property(INSTANCE_OF),
            EntityId::property(SUBCLASS_OF),
        ]);
        let parser = StatementParser::new(source, language, &options);

        let mut nodes: HashMap<EntityRef, HierarchyNode> = HashMap::new();
        let mut frontier = vec![root.to_owned()];
        let mut level = 0;
        while !frontier.is_empty() && level <= max_depth {
            debug!(level, frontier = frontier.len(), "expanding hierarchy");
            let parsed = parser.fetch_and_parse(&frontier, &mut table).await?;
            let mut next: Vec<EntityRef> = vec![];
            for entity in &parsed {
                let node = HierarchyNode {
                    instance_of: targets(entity, instance_of),
                    subclass_of: targets(entity, subclass_of),
                };
                for target in node.instance_of.iter().chain(node.subclass_of.iter()) {
                    if !next.contains(target) {
                        next.push(*target);
                    }
                }
                nodes.insert(entity.entity(), node);
            }
            frontier = next
                .into_iter()
                .filter(|target| !nodes.contains_key(target))
                .map(|target| table.get(target).id().to_owned())
                .collect();
            level += 1;
        }
        Ok(Self {
            root: root_ref,
            nodes,
            table,
        })
    }

    pub const fn root(&self) -> EntityRef {
        self.root
    }

    /// False if the root entity does not exist.
    pub fn has_root(&self) -> bool {
        self.nodes.contains_key(&self.root)
    }

    pub fn node(&self, entity: EntityRef) -> Option<&HierarchyNode> {
        self.nodes.get(&entity)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub const fn table(&self) -> &EntityTable {
        &self.table
    }

    /// Nested JSON from the root, collapsing nodes at `level` 0 to their
    /// `"label (id)"` string. Targets that were never visited are left out.
    pub fn to_json(&self, level: usize) -> Value {
        self.node_to_json(self.root, level)
    }

    fn node_to_json(&self, entity: EntityRef, level: usize) -> Value {
        let key = self.table.get(entity).display();
        let Some(node) = self.nodes.get(&entity).filter(|_| level > 0) else {
            return Value::String(key);
        };
        let children = |targets: &[EntityRef]| -> Vec<Value> {
            targets
                .iter()
                .filter(|target| self.nodes.contains_key(target))
                .map(|target| self.node_to_json(*target, level - 1))
                .collect()
        };
        let mut ret = Map::new();
        ret.insert(
            key,
            json!({
                INSTANCE_OF_KEY: children(&node.instance_of),
                SUBCLASS_OF_KEY: children(&node.subclass_of),
            }),
        );
        Value::Object(ret)
    }
}

fn targets(entity: &ParsedEntity, property: EntityRef) -> Vec<EntityRef> {
    let mut ret = vec![];
    for statement in entity.statements_for(property) {
        if let Some(target) = statement.value().entity_ref() {
            if !ret.contains(&target) {
                ret.push(target);
            }
        }
    }
    ret
}
