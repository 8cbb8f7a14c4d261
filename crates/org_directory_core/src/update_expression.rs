//! Partial-update expressions for the external store.

use std::collections::BTreeMap;

/// A `SET` expression for the store's native partial-update call.
///
/// Attribute names are aliased through `#placeholders` and values through
/// `:placeholders`, so reserved words such as `name` never appear raw.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateExpression {
    pub expression: String,
    pub attribute_names: BTreeMap<String, String>,
    pub attribute_values: BTreeMap<String, String>,
}

pub fn build_update_expression(assignments: &[(&str, &str)]) -> Option<UpdateExpression> {
    if assignments.is_empty() {
        return None;
    }

    let mut clauses = Vec::with_capacity(assignments.len());
    let mut attribute_names = BTreeMap::new();
    let mut attribute_values = BTreeMap::new();
    for (position, (attribute, value)) in assignments.iter().enumerate() {
        let alias = placeholder_alias(attribute, position);
        let name_placeholder = format!("#{alias}");
        let value_placeholder = format!(":{alias}");
        clauses.push(format!("{name_placeholder} = {value_placeholder}"));
        attribute_names.insert(name_placeholder, (*attribute).to_string());
        attribute_values.insert(value_placeholder, (*value).to_string());
    }

    Some(UpdateExpression {
        expression: format!("SET {}", clauses.join(", ")),
        attribute_names,
        attribute_values,
    })
}

fn placeholder_alias(attribute: &str, position: usize) -> String {
    let sanitized: String = attribute
        .chars()
        .filter(|character| character.is_ascii_alphanumeric() || *character == '_')
        .collect();
    if sanitized.is_empty() {
        format!("field{position}")
    } else {
        sanitized
    }
}
