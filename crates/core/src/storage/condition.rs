//! Typed key, filter and write conditions.
//!
//! Conditions are plain values. The DynamoDB backend renders them to expression
//! strings with `#name` / `:value` placeholders; the in-memory backend evaluates
//! them directly against items.

use std::collections::HashMap;

use super::types::{AttrValue, Item};

/// Condition on the sort attribute of a query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SortKeyCondition {
    Equals(String),
    BeginsWith(String),
    /// Inclusive on both ends.
    Between(String, String),
    LessThan(String),
    GreaterThan(String),
}

impl SortKeyCondition {
    /// Evaluates the condition against a sort key value.
    pub fn matches(&self, value: &str) -> bool {
        match self {
            SortKeyCondition::Equals(expected) => value == expected,
            SortKeyCondition::BeginsWith(prefix) => value.starts_with(prefix.as_str()),
            SortKeyCondition::Between(low, high) => value >= low.as_str() && value <= high.as_str(),
            SortKeyCondition::LessThan(bound) => value < bound.as_str(),
            SortKeyCondition::GreaterThan(bound) => value > bound.as_str(),
        }
    }

    fn render(&self, attribute: &str, placeholders: &mut Placeholders) -> String {
        let name = placeholders.name(attribute);
        match self {
            SortKeyCondition::Equals(v) => {
                format!("{name} = {}", placeholders.value(AttrValue::S(v.clone())))
            }
            SortKeyCondition::BeginsWith(v) => {
                format!(
                    "begins_with({name}, {})",
                    placeholders.value(AttrValue::S(v.clone()))
                )
            }
            SortKeyCondition::Between(low, high) => {
                let low = placeholders.value(AttrValue::S(low.clone()));
                let high = placeholders.value(AttrValue::S(high.clone()));
                format!("{name} BETWEEN {low} AND {high}")
            }
            SortKeyCondition::LessThan(v) => {
                format!("{name} < {}", placeholders.value(AttrValue::S(v.clone())))
            }
            SortKeyCondition::GreaterThan(v) => {
                format!("{name} > {}", placeholders.value(AttrValue::S(v.clone())))
            }
        }
    }
}

/// Condition on arbitrary item attributes, used as a query filter or as the
/// guard of a conditional write.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    AttributeExists(String),
    Equals(String, AttrValue),
    BeginsWith(String, String),
    And(Vec<Condition>),
}

impl Condition {
    pub fn exists(attribute: impl Into<String>) -> Self {
        Condition::AttributeExists(attribute.into())
    }

    pub fn equals(attribute: impl Into<String>, value: impl Into<AttrValue>) -> Self {
        Condition::Equals(attribute.into(), value.into())
    }

    /// Evaluates the condition against an item. A missing item is an empty one.
    pub fn matches(&self, item: &Item) -> bool {
        match self {
            Condition::AttributeExists(name) => item.contains_key(name),
            Condition::Equals(name, value) => item.get(name) == Some(value),
            Condition::BeginsWith(name, prefix) => item
                .get(name)
                .and_then(|v| v.as_s())
                .is_some_and(|s| s.starts_with(prefix.as_str())),
            Condition::And(conditions) => conditions.iter().all(|c| c.matches(item)),
        }
    }

    /// Renders the condition to an expression string, registering placeholders.
    pub fn render(&self, placeholders: &mut Placeholders) -> String {
        match self {
            Condition::AttributeExists(name) => {
                format!("attribute_exists({})", placeholders.name(name))
            }
            Condition::Equals(name, value) => {
                let name = placeholders.name(name);
                format!("{name} = {}", placeholders.value(value.clone()))
            }
            Condition::BeginsWith(name, prefix) => {
                let name = placeholders.name(name);
                format!(
                    "begins_with({name}, {})",
                    placeholders.value(AttrValue::S(prefix.clone()))
                )
            }
            Condition::And(conditions) => conditions
                .iter()
                .map(|c| format!("({})", c.render(placeholders)))
                .collect::<Vec<_>>()
                .join(" AND "),
        }
    }
}

/// Renders a query key condition: partition equality plus optional sort condition.
pub fn render_key_condition(
    partition_attribute: &str,
    partition: &str,
    sort_attribute: &str,
    sort: Option<&SortKeyCondition>,
    placeholders: &mut Placeholders,
) -> String {
    let name = placeholders.name(partition_attribute);
    let value = placeholders.value(AttrValue::S(partition.to_string()));
    let partition_expr = format!("{name} = {value}");

    match sort {
        Some(condition) => format!(
            "{partition_expr} AND {}",
            condition.render(sort_attribute, placeholders)
        ),
        None => partition_expr,
    }
}

/// Accumulates expression attribute names and values for one request.
///
/// Names are deduplicated so the same attribute always renders to the same
/// placeholder; values always get a fresh placeholder.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Placeholders {
    names: HashMap<String, String>,
    values: HashMap<String, AttrValue>,
}

impl Placeholders {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the `#nX` placeholder for an attribute name.
    pub fn name(&mut self, attribute: &str) -> String {
        if let Some((placeholder, _)) = self.names.iter().find(|(_, name)| *name == attribute) {
            return placeholder.clone();
        }
        let placeholder = format!("#n{}", self.names.len());
        self.names.insert(placeholder.clone(), attribute.to_string());
        placeholder
    }

    /// Returns a fresh `:vX` placeholder bound to a value.
    pub fn value(&mut self, value: AttrValue) -> String {
        let placeholder = format!(":v{}", self.values.len());
        self.values.insert(placeholder.clone(), value);
        placeholder
    }

    pub fn names(&self) -> &HashMap<String, String> {
        &self.names
    }

    pub fn values(&self) -> &HashMap<String, AttrValue> {
        &self.values
    }

    pub fn into_parts(self) -> (HashMap<String, String>, HashMap<String, AttrValue>) {
        (self.names, self.values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(pairs: &[(&str, AttrValue)]) -> Item {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_sort_key_condition_matches() {
        assert!(SortKeyCondition::BeginsWith("RESERVATION".into()).matches("RESERVATION#01H"));
        assert!(!SortKeyCondition::BeginsWith("RESERVATION".into()).matches("STATION#01H"));
        assert!(SortKeyCondition::Between("A".into(), "C".into()).matches("C"));
        assert!(!SortKeyCondition::Between("A".into(), "C".into()).matches("CA"));
        assert!(SortKeyCondition::LessThan("B".into()).matches("A~"));
        assert!(SortKeyCondition::GreaterThan("B".into()).matches("B#"));
        assert!(SortKeyCondition::Equals("X".into()).matches("X"));
    }

    #[test]
    fn test_condition_matches() {
        let it = item(&[
            ("PK", AttrValue::from("STATION#1")),
            ("ItemType", AttrValue::from("station")),
        ]);

        assert!(Condition::exists("PK").matches(&it));
        assert!(!Condition::exists("GSI1PK").matches(&it));
        assert!(Condition::equals("ItemType", "station").matches(&it));
        assert!(!Condition::equals("ItemType", "measurement").matches(&it));
        assert!(Condition::And(vec![
            Condition::exists("PK"),
            Condition::BeginsWith("PK".into(), "STATION".into()),
        ])
        .matches(&it));
        assert!(!Condition::exists("PK").matches(&Item::new()));
    }

    #[test]
    fn test_render_key_condition_with_prefix() {
        let mut placeholders = Placeholders::new();
        let expr = render_key_condition(
            "PK",
            "CLUB#1",
            "SK",
            Some(&SortKeyCondition::BeginsWith("RESERVATION".into())),
            &mut placeholders,
        );

        assert_eq!(expr, "#n0 = :v0 AND begins_with(#n1, :v1)");
        assert_eq!(placeholders.names().get("#n0").unwrap(), "PK");
        assert_eq!(placeholders.names().get("#n1").unwrap(), "SK");
        assert_eq!(
            placeholders.values().get(":v1"),
            Some(&AttrValue::S("RESERVATION".to_string()))
        );
    }

    #[test]
    fn test_render_between() {
        let mut placeholders = Placeholders::new();
        let expr = render_key_condition(
            "PK",
            "STATION#1",
            "SK",
            Some(&SortKeyCondition::Between("M#a".into(), "M#b".into())),
            &mut placeholders,
        );

        assert_eq!(expr, "#n0 = :v0 AND #n1 BETWEEN :v1 AND :v2");
    }

    #[test]
    fn test_placeholder_names_are_reused() {
        let mut placeholders = Placeholders::new();
        let expr = Condition::And(vec![
            Condition::exists("PK"),
            Condition::BeginsWith("PK".into(), "STATION".into()),
        ])
        .render(&mut placeholders);

        assert_eq!(expr, "(attribute_exists(#n0)) AND (begins_with(#n0, :v0))");
        assert_eq!(placeholders.names().len(), 1);
    }
}
