use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::storage::{FieldPatch, PatchValue};

use super::conversions::{LATITUDE, LONGITUDE, TAGS};

/// A weather station reporting measurements.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Station {
    #[serde(default)]
    pub id: String,
    pub longitude: String,
    pub latitude: String,
    #[serde(default)]
    pub tags: BTreeMap<String, String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Station {
    pub fn new(longitude: impl Into<String>, latitude: impl Into<String>) -> Self {
        Self {
            id: String::new(),
            longitude: longitude.into(),
            latitude: latitude.into(),
            tags: BTreeMap::new(),
            created_at: None,
            updated_at: None,
        }
    }

    pub fn with_tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags.insert(key.into(), value.into());
        self
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }
}

/// Partial update of a station. `None` leaves the attribute untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StationPatch {
    pub longitude: Option<String>,
    pub latitude: Option<String>,
    /// Tags to set; tags not named here keep their value.
    pub tags: Option<BTreeMap<String, String>>,
}

impl StationPatch {
    pub fn with_tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags
            .get_or_insert_with(BTreeMap::new)
            .insert(key.into(), value.into());
        self
    }

    /// The patch as attribute changes.
    pub fn to_field_patch(&self) -> FieldPatch {
        let tags = self.tags.as_ref().map(|tags| {
            tags.iter()
                .map(|(k, v)| (k.clone(), PatchValue::from(v.as_str())))
                .collect::<BTreeMap<_, _>>()
        });

        FieldPatch::new()
            .field(LONGITUDE, self.longitude.clone())
            .field(LATITUDE, self.latitude.clone())
            .tags(TAGS, tags)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::PatchField;

    #[test]
    fn test_patch_to_field_patch() {
        let patch = StationPatch {
            latitude: Some("46.0".to_string()),
            ..Default::default()
        }
        .with_tag("region", "valais");

        let fields = patch.to_field_patch();
        let fields = fields.fields();
        assert_eq!(fields[0], (LONGITUDE.to_string(), PatchField::Absent));
        assert_eq!(
            fields[1],
            (
                LATITUDE.to_string(),
                PatchField::Present(PatchValue::from("46.0"))
            )
        );
        match &fields[2].1 {
            PatchField::Tags(tags) => {
                assert_eq!(tags.get("region"), Some(&PatchValue::from("valais")))
            }
            other => panic!("unexpected field: {other:?}"),
        }
    }

    #[test]
    fn test_empty_patch() {
        assert!(StationPatch::default().to_field_patch().is_empty());
    }

    #[test]
    fn test_station_json() {
        let station: Station =
            serde_json::from_str(r#"{"longitude":"7.74","latitude":"46.02"}"#).unwrap();
        assert!(station.id.is_empty());
        assert!(station.tags.is_empty());
    }
}
