use crate::{
    entity_table::{EntityRef, EntityTable},
    property_value::PropertyValue,
    statement::Statement,
    statement_parser::ParsedEntity,
    statement_value::StatementValue,
};

/// One value as text: entities as `"label (id)"`, quantities as
/// `"amount unit"`, literals as they are.
pub fn stringify(value: &StatementValue, table: &EntityTable) -> String {
    match value {
        StatementValue::Entity(entity) => table.get(*entity).display(),
        StatementValue::Quantity(quantity) => quantity.to_string().trim().to_string(),
        StatementValue::Literal(s) => s.to_owned(),
    }
}

pub fn stringify_all(values: &[&StatementValue], table: &EntityTable) -> String {
    values
        .iter()
        .map(|value| stringify(value, table))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Groups property values by property, in order of first appearance.
pub fn group_by_property(parts: &[PropertyValue]) -> Vec<(EntityRef, Vec<&StatementValue>)> {
    let mut ret: Vec<(EntityRef, Vec<&StatementValue>)> = vec![];
    for part in parts {
        match ret.iter_mut().find(|(p, _)| *p == part.property()) {
            Some((_, values)) => values.push(part.value()),
            None => ret.push((part.property(), vec![part.value()])),
        }
    }
    ret
}

fn statement_head(statement: &Statement, table: &EntityTable) -> String {
    format!(
        "{}: {}: {}",
        table.get(statement.subject()).display(),
        table.get(statement.property()).display(),
        stringify(statement.value(), table)
    )
}

/// `"<subject>: <property>: <value>"`, with `" | <qualifier>: <values>"` per
/// qualifier property.
pub fn statement_line(statement: &Statement, table: &EntityTable) -> String {
    let mut ret = statement_head(statement, table);
    for (property, values) in group_by_property(statement.qualifiers()) {
        ret += &format!(
            " | {}: {}",
            table.get(property).display(),
            stringify_all(&values, table)
        );
    }
    ret
}

/// One line per statement of `entity`.
pub fn statements_to_string(entity: &ParsedEntity, table: &EntityTable) -> String {
    entity
        .statements()
        .iter()
        .map(|statement| statement_line(statement, table))
        .collect::<Vec<_>>()
        .join("\n")
}

fn push_parts(out: &mut String, parts: &[PropertyValue], table: &EntityTable) {
    for (property, values) in group_by_property(parts) {
        out.push_str(&format!(
            "    - {}: {}\n",
            table.get(property).display(),
            stringify_all(&values, table)
        ));
    }
}

/// The full block of one statement: value line, rank, qualifiers and
/// numbered references.
pub fn statement_block(statement: &Statement, table: &EntityTable) -> String {
    let mut ret = statement_head(statement, table);
    ret.push('\n');
    ret.push_str(&format!("  Rank: {}\n", statement.rank()));
    if !statement.qualifiers().is_empty() {
        ret.push_str("  Qualifier:\n");
        push_parts(&mut ret, statement.qualifiers(), table);
    }
    for (num, reference) in statement.references().iter().enumerate() {
        ret.push_str(&format!("  Reference {}:\n", num + 1));
        push_parts(&mut ret, reference.parts(), table);
    }
    ret
}

/// Blocks for every statement of `property`, separated by an empty line.
/// `None` if there are no such statements.
pub fn statement_values_to_string(
    entity: &ParsedEntity,
    property: EntityRef,
    table: &EntityTable,
) -> Option<String> {
    let statements = entity.statements_for(property);
    if statements.is_empty() {
        return None;
    }
    let blocks = statements
        .iter()
        .map(|statement| statement_block(statement, table))
        .collect::<Vec<_>>();
    Some(blocks.join("\n").trim().to_string())
}
