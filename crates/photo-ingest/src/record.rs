//! Input records
//!
//! A [`Record`] is one CSV row kept as an ordered list of `(column, value)`
//! pairs. Order matters because the row is written back out verbatim as the
//! metadata sidecar next to each image.

use serde::ser::{Serialize, SerializeMap, Serializer};

/// Column holding the record identity
pub const FIELD_ID: &str = "photo_id";
/// Column holding the image URL
pub const FIELD_IMAGE_URL: &str = "photo_image_url";
/// Column holding the author handle
pub const FIELD_AUTHOR: &str = "photographer_username";
/// Column holding the submission timestamp
pub const FIELD_SUBMITTED_AT: &str = "photo_submitted_at";
/// Column holding the free-text description
pub const FIELD_DESCRIPTION: &str = "ai_description";
/// Column holding the location country
pub const FIELD_COUNTRY: &str = "photo_location_country";

/// One immutable input row
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    fields: Vec<(String, String)>,
}

impl Record {
    /// Build a record from ordered `(column, value)` pairs
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            fields: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Raw value of a column, if the column exists
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Value of a column, treating an empty string as absent
    pub fn non_empty(&self, name: &str) -> Option<&str> {
        self.get(name).filter(|value| !value.is_empty())
    }

    /// Value of a column, or the empty string when absent
    pub fn get_or_empty(&self, name: &str) -> &str {
        self.get(name).unwrap_or_default()
    }

    pub fn id(&self) -> Option<&str> {
        self.non_empty(FIELD_ID)
    }

    pub fn image_url(&self) -> Option<&str> {
        self.non_empty(FIELD_IMAGE_URL)
    }

    /// Columns in source order
    pub fn fields(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (key, value) in &self.fields {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}
