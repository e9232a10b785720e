//! Serde-deserializable types matching catalog API responses.
//!
//! The backend makes few promises about its payloads: the list may arrive
//! bare or wrapped in an envelope, and any record field may be missing or
//! carry the wrong JSON type. Everything here decodes leniently; a field that
//! does not fit its type reads as absent.

use serde::{de::DeserializeOwned, Deserialize, Deserializer};
use serde_json::Value;

/// Deserialize into `T`, or `None` if the value has another shape
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
  D: Deserializer<'de>,
  T: DeserializeOwned,
{
  let value = Value::deserialize(deserializer)?;
  Ok(serde_json::from_value(value).ok())
}

// ============================================================================
// Envelope recovery
// ============================================================================

/// Which layout the list was found in
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PayloadShape {
  /// The payload itself is the array
  BareArray,
  /// An object carrying the array under the expected field name
  Envelope,
  /// An object whose first array-valued field was used instead
  ScannedField(String),
  /// Nothing array-like was found
  Unrecognized,
}

/// Locate the record list inside a payload.
///
/// Tries the bare array, then `field` on an envelope object, then the first
/// array-valued field of the object in document order.
pub fn extract_list<'a>(payload: &'a Value, field: &str) -> (&'a [Value], PayloadShape) {
  match payload {
    Value::Array(items) => (items.as_slice(), PayloadShape::BareArray),
    Value::Object(map) => {
      if let Some(Value::Array(items)) = map.get(field) {
        return (items.as_slice(), PayloadShape::Envelope);
      }
      map
        .iter()
        .find_map(|(key, value)| match value {
          Value::Array(items) => Some((items.as_slice(), PayloadShape::ScannedField(key.clone()))),
          _ => None,
        })
        .unwrap_or((&[][..], PayloadShape::Unrecognized))
    }
    _ => (&[][..], PayloadShape::Unrecognized),
  }
}

// ============================================================================
// Project records
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawProjectRecord {
  /// String or number; anything else reads as missing
  #[serde(default, deserialize_with = "lenient")]
  pub id: Option<Value>,
  #[serde(default, deserialize_with = "lenient")]
  pub github_full_name: Option<String>,
  #[serde(default, deserialize_with = "lenient")]
  pub stars_count: Option<u64>,
  #[serde(default, deserialize_with = "lenient")]
  pub forks_count: Option<u64>,
  #[serde(default, deserialize_with = "lenient")]
  pub contributors_count: Option<u64>,
  #[serde(default, deserialize_with = "lenient")]
  pub open_issues_count: Option<u64>,
  #[serde(default, deserialize_with = "lenient")]
  pub open_prs_count: Option<u64>,
  #[serde(default, deserialize_with = "lenient")]
  pub description: Option<String>,
  #[serde(default, deserialize_with = "lenient")]
  pub language: Option<String>,
  #[serde(default, deserialize_with = "lenient")]
  pub category: Option<String>,
  /// Kept raw so non-array values can be told apart from missing ones
  #[serde(default)]
  pub tags: Option<Value>,
}

impl RawProjectRecord {
  /// Decode one list item. Non-object items yield `None`.
  pub fn decode(value: &Value) -> Option<Self> {
    if !value.is_object() {
      return None;
    }
    serde_json::from_value(value.clone()).ok()
  }

  /// Identifier as text, if the record carries a usable one
  pub fn id_text(&self) -> Option<String> {
    match self.id.as_ref()? {
      Value::String(s) if !s.is_empty() => Some(s.clone()),
      Value::Number(n) => Some(n.to_string()),
      _ => None,
    }
  }

  /// `(owner, repo)` when `github_full_name` has the form `owner/repo`
  pub fn repo_parts(&self) -> Option<(&str, &str)> {
    let (owner, repo) = self.github_full_name.as_deref()?.trim().split_once('/')?;
    let (owner, repo) = (owner.trim(), repo.trim());
    if owner.is_empty() || repo.is_empty() || repo.contains('/') {
      return None;
    }
    Some((owner, repo))
  }

  /// Only string elements of an array-valued `tags` field
  pub fn tag_list(&self) -> Vec<String> {
    match &self.tags {
      Some(Value::Array(items)) => items
        .iter()
        .filter_map(|t| t.as_str().map(String::from))
        .collect(),
      _ => Vec::new(),
    }
  }
}

// ============================================================================
// Ecosystem records
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawEcosystemRecord {
  #[serde(default, deserialize_with = "lenient")]
  pub name: Option<String>,
  #[serde(default, deserialize_with = "lenient")]
  pub status: Option<String>,
}

impl RawEcosystemRecord {
  pub fn decode(value: &Value) -> Option<Self> {
    if !value.is_object() {
      return None;
    }
    serde_json::from_value(value.clone()).ok()
  }

  pub fn is_active(&self) -> bool {
    self.status.as_deref() == Some("active")
  }
}
