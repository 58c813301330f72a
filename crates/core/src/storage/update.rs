//! Partial-update expression builder.
//!
//! Callers describe a partial update with a [`FieldPatch`]: an ordered list of
//! attributes, each absent, present with a value, or a tag map. The builder
//! turns it into the minimal list of `SET` actions and always refreshes
//! `UpdatedAt`.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use super::condition::Placeholders;
use super::error::{Result, StoreError};
use super::types::{AttrValue, Item};
use crate::keys::UPDATED_AT;
use crate::time::format_timestamp;

/// Value of a present patch field.
#[derive(Debug, Clone, PartialEq)]
pub enum PatchValue {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    /// Opaque value stored as-is (maps, lists, ...).
    Object(AttrValue),
}

impl From<PatchValue> for AttrValue {
    fn from(value: PatchValue) -> Self {
        match value {
            PatchValue::String(s) => AttrValue::S(s),
            PatchValue::Integer(i) => AttrValue::from(i),
            PatchValue::Float(f) => AttrValue::from(f),
            PatchValue::Bool(b) => AttrValue::Bool(b),
            PatchValue::Object(v) => v,
        }
    }
}

impl From<&str> for PatchValue {
    fn from(value: &str) -> Self {
        PatchValue::String(value.to_string())
    }
}

impl From<String> for PatchValue {
    fn from(value: String) -> Self {
        PatchValue::String(value)
    }
}

impl From<i64> for PatchValue {
    fn from(value: i64) -> Self {
        PatchValue::Integer(value)
    }
}

impl From<f64> for PatchValue {
    fn from(value: f64) -> Self {
        PatchValue::Float(value)
    }
}

impl From<bool> for PatchValue {
    fn from(value: bool) -> Self {
        PatchValue::Bool(value)
    }
}

impl From<AttrValue> for PatchValue {
    fn from(value: AttrValue) -> Self {
        PatchValue::Object(value)
    }
}

/// State of one attribute in a patch.
#[derive(Debug, Clone, PartialEq)]
pub enum PatchField {
    Absent,
    Present(PatchValue),
    /// Nested map updated key by key (`<field>.<key>`).
    Tags(BTreeMap<String, PatchValue>),
}

/// A sparse set of attribute changes for one item.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldPatch {
    fields: Vec<(String, PatchField)>,
}

impl FieldPatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a scalar or object field; `None` marks it absent.
    pub fn field<V: Into<PatchValue>>(mut self, name: impl Into<String>, value: Option<V>) -> Self {
        let field = match value {
            Some(v) => PatchField::Present(v.into()),
            None => PatchField::Absent,
        };
        self.fields.push((name.into(), field));
        self
    }

    /// Adds a tag-map field; `None` marks it absent.
    pub fn tags(
        mut self,
        name: impl Into<String>,
        tags: Option<BTreeMap<String, PatchValue>>,
    ) -> Self {
        let field = match tags {
            Some(tags) => PatchField::Tags(tags),
            None => PatchField::Absent,
        };
        self.fields.push((name.into(), field));
        self
    }

    pub fn fields(&self) -> &[(String, PatchField)] {
        &self.fields
    }

    /// True when no field carries a value.
    pub fn is_empty(&self) -> bool {
        self.fields.iter().all(|(_, f)| match f {
            PatchField::Absent => true,
            PatchField::Present(_) => false,
            PatchField::Tags(tags) => tags.is_empty(),
        })
    }
}

/// One `SET <path> = <value>` action.
#[derive(Debug, Clone, PartialEq)]
pub struct SetAction {
    /// Attribute path; two segments address a key inside a map attribute.
    pub path: Vec<String>,
    pub value: AttrValue,
}

/// A built partial update.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateExpression {
    pub actions: Vec<SetAction>,
    /// Instant written to `UpdatedAt` by the last action.
    pub updated_at: DateTime<Utc>,
}

/// Builds the update for a patch.
///
/// Absent fields are skipped, or set to null when `clear_absent` is true.
/// Tag maps expand into one action per key. `UpdatedAt` is always set to `now`.
pub fn build_update_expression(
    patch: &FieldPatch,
    clear_absent: bool,
    now: DateTime<Utc>,
) -> UpdateExpression {
    let mut actions = Vec::with_capacity(patch.fields.len() + 1);

    for (name, field) in &patch.fields {
        match field {
            PatchField::Present(value) => actions.push(SetAction {
                path: vec![name.clone()],
                value: value.clone().into(),
            }),
            PatchField::Tags(tags) => {
                for (key, value) in tags {
                    actions.push(SetAction {
                        path: vec![name.clone(), key.clone()],
                        value: value.clone().into(),
                    });
                }
            }
            PatchField::Absent if clear_absent => actions.push(SetAction {
                path: vec![name.clone()],
                value: AttrValue::Null,
            }),
            PatchField::Absent => {}
        }
    }

    actions.push(SetAction {
        path: vec![UPDATED_AT.to_string()],
        value: AttrValue::S(format_timestamp(now)),
    });

    UpdateExpression {
        actions,
        updated_at: now,
    }
}

impl UpdateExpression {
    /// Renders the `SET` expression, registering placeholders.
    pub fn render(&self, placeholders: &mut Placeholders) -> String {
        let assignments = self
            .actions
            .iter()
            .map(|action| {
                let path = action
                    .path
                    .iter()
                    .map(|segment| placeholders.name(segment))
                    .collect::<Vec<_>>()
                    .join(".");
                format!("{path} = {}", placeholders.value(action.value.clone()))
            })
            .collect::<Vec<_>>()
            .join(", ");
        format!("SET {assignments}")
    }

    /// Applies the actions to an item in place.
    ///
    /// A nested path requires the parent attribute to already be a map.
    pub fn apply(&self, item: &mut Item) -> Result<()> {
        for action in &self.actions {
            match action.path.as_slice() {
                [name] => {
                    item.insert(name.clone(), action.value.clone());
                }
                [parent, key] => match item.get_mut(parent) {
                    Some(AttrValue::M(map)) => {
                        map.insert(key.clone(), action.value.clone());
                    }
                    _ => {
                        return Err(StoreError::service(
                            "ValidationException",
                            format!("The document path {parent}.{key} is invalid for update"),
                        ))
                    }
                },
                path => {
                    return Err(StoreError::InvalidData(format!(
                        "Unsupported update path depth: {}",
                        path.len()
                    )))
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::parse_timestamp;
    use std::collections::HashMap;

    fn now() -> DateTime<Utc> {
        parse_timestamp("2024-03-09T10:15:30.123Z").unwrap()
    }

    fn paths(update: &UpdateExpression) -> Vec<String> {
        update.actions.iter().map(|a| a.path.join(".")).collect()
    }

    #[test]
    fn test_absent_fields_are_skipped() {
        let patch = FieldPatch::new()
            .field("Longitude", Some("7.5"))
            .field::<String>("Latitude", None);

        let update = build_update_expression(&patch, false, now());

        assert_eq!(paths(&update), vec!["Longitude", "UpdatedAt"]);
    }

    #[test]
    fn test_clear_absent_sets_null() {
        let patch = FieldPatch::new()
            .field("Longitude", Some("7.5"))
            .field::<String>("Latitude", None);

        let update = build_update_expression(&patch, true, now());

        assert_eq!(paths(&update), vec!["Longitude", "Latitude", "UpdatedAt"]);
        assert_eq!(update.actions[1].value, AttrValue::Null);
    }

    #[test]
    fn test_scalar_kinds() {
        let patch = FieldPatch::new()
            .field("Name", Some("Sion"))
            .field("Elevation", Some(482_i64))
            .field("Pressure", Some(1013.5_f64))
            .field("Active", Some(true))
            .field(
                "Meta",
                Some(AttrValue::L(vec![AttrValue::from("a"), AttrValue::from(1_i64)])),
            );

        let update = build_update_expression(&patch, false, now());
        let values: Vec<_> = update.actions.iter().map(|a| a.value.clone()).collect();

        assert_eq!(values[0], AttrValue::S("Sion".to_string()));
        assert_eq!(values[1], AttrValue::N("482".to_string()));
        assert_eq!(values[2], AttrValue::N("1013.5".to_string()));
        assert_eq!(values[3], AttrValue::Bool(true));
        assert!(matches!(values[4], AttrValue::L(_)));
    }

    #[test]
    fn test_tags_expand_per_key() {
        let mut tags = BTreeMap::new();
        tags.insert("icao".to_string(), PatchValue::from("LSGS"));
        tags.insert("name".to_string(), PatchValue::from("Sion"));
        let patch = FieldPatch::new().tags("Tags", Some(tags));

        let update = build_update_expression(&patch, false, now());

        assert_eq!(paths(&update), vec!["Tags.icao", "Tags.name", "UpdatedAt"]);
    }

    #[test]
    fn test_updated_at_uses_millisecond_iso_format() {
        let update = build_update_expression(&FieldPatch::new(), false, now());

        assert_eq!(update.actions.len(), 1);
        assert_eq!(
            update.actions[0].value,
            AttrValue::S("2024-03-09T10:15:30.123Z".to_string())
        );
        assert_eq!(update.updated_at, now());
    }

    #[test]
    fn test_render_nested_paths() {
        let mut tags = BTreeMap::new();
        tags.insert("icao".to_string(), PatchValue::from("LSGS"));
        let patch = FieldPatch::new()
            .field("Longitude", Some("7.5"))
            .tags("Tags", Some(tags));

        let update = build_update_expression(&patch, false, now());
        let mut placeholders = Placeholders::new();
        let expr = update.render(&mut placeholders);

        assert_eq!(expr, "SET #n0 = :v0, #n1.#n2 = :v1, #n3 = :v2");
        assert_eq!(placeholders.names().get("#n1").unwrap(), "Tags");
        assert_eq!(placeholders.names().get("#n2").unwrap(), "icao");
        assert_eq!(placeholders.names().get("#n3").unwrap(), "UpdatedAt");
    }

    #[test]
    fn test_apply_keeps_sibling_tags() {
        let mut existing_tags = HashMap::new();
        existing_tags.insert("name".to_string(), AttrValue::from("Sion"));
        let mut item = Item::new();
        item.insert("Tags".to_string(), AttrValue::M(existing_tags));

        let mut tags = BTreeMap::new();
        tags.insert("icao".to_string(), PatchValue::from("LSGS"));
        let update = build_update_expression(&FieldPatch::new().tags("Tags", Some(tags)), false, now());
        update.apply(&mut item).unwrap();

        let stored = item.get("Tags").unwrap().as_m().unwrap();
        assert_eq!(stored.get("name"), Some(&AttrValue::from("Sion")));
        assert_eq!(stored.get("icao"), Some(&AttrValue::from("LSGS")));
        assert!(item.contains_key("UpdatedAt"));
    }

    #[test]
    fn test_apply_nested_path_without_map_fails() {
        let mut tags = BTreeMap::new();
        tags.insert("icao".to_string(), PatchValue::from("LSGS"));
        let update = build_update_expression(&FieldPatch::new().tags("Tags", Some(tags)), false, now());

        let result = update.apply(&mut Item::new());
        assert!(matches!(result, Err(StoreError::Service { .. })));
    }

    #[test]
    fn test_patch_is_empty() {
        assert!(FieldPatch::new().is_empty());
        assert!(FieldPatch::new().field::<i64>("Temperature", None).is_empty());
        assert!(FieldPatch::new().tags("Tags", Some(BTreeMap::new())).is_empty());
        assert!(!FieldPatch::new().field("Temperature", Some(3_i64)).is_empty());
    }
}
