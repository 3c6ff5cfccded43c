//! # Issue Field Codec
//!
//! Jira puts the well-known issue fields and the server-defined custom fields
//! side by side in one flat `fields` object. In memory they are kept apart:
//! the fixed fields are typed struct members and the custom fields live in a
//! [`CustomFields`] map.
//!
//! Encoding writes every custom field as `{"<key>": {"value": "<text>"}}` and
//! merges those members with the non-empty fixed fields into one object.
//! Decoding reads the fixed subset with serde, then scans the same object for
//! `customfield_` keys and keeps the ones whose value has a supported shape.

use serde::de::{self, Deserializer};
use serde::ser::{self, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use tracing::trace;

use crate::consts::CUSTOM_FIELD_PREFIX;
use crate::models::{
  CustomFields, JiraComments, JiraIssueFields, JiraIssueInput, JiraIssueStatus, JiraIssueType, JiraProject,
  JiraRelease,
};

/// Deserialize a value, mapping JSON `null` to `T::default()`.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
  D: Deserializer<'de>,
  T: Default + Deserialize<'de>,
{
  Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Encode custom fields and fixed fields into one flat JSON object.
///
/// Fixed members are inserted last, so they win over a custom entry that
/// reuses a fixed key.
pub(crate) fn encode_fields<T: Serialize>(
  fixed: &T,
  custom_fields: &CustomFields,
) -> Result<Map<String, Value>, serde_json::Error> {
  let mut object = Map::new();

  for (key, value) in custom_fields {
    object.insert(key.clone(), json!({ "value": value }));
  }

  match serde_json::to_value(fixed)? {
    Value::Object(members) => object.extend(members),
    other => {
      return Err(ser::Error::custom(format!(
        "issue fields must encode to a JSON object, got {other}"
      )));
    }
  }

  Ok(object)
}

/// Extract the custom fields of a flat `fields` object.
///
/// Entries whose value has an unsupported shape are dropped.
pub(crate) fn decode_custom_fields(object: &Map<String, Value>) -> CustomFields {
  object
    .iter()
    .filter(|(key, _)| key.starts_with(CUSTOM_FIELD_PREFIX))
    .filter_map(|(key, value)| match custom_field_value(value) {
      Some(text) => Some((key.clone(), text)),
      None => {
        trace!("Skipping custom field {} with unsupported value {}", key, value);
        None
      }
    })
    .collect()
}

fn custom_field_value(value: &Value) -> Option<String> {
  match value {
    Value::Object(members) => members
      .iter()
      .filter(|(name, _)| name.starts_with("value"))
      .find_map(|(_, member)| member.as_str().map(str::to_string)),
    Value::String(text) => Some(text.clone()),
    Value::Null => Some(String::new()),
    _ => None,
  }
}

fn is_empty_str(value: &&str) -> bool {
  value.is_empty()
}

fn is_empty_slice<T>(value: &&[T]) -> bool {
  value.is_empty()
}

/// Borrowed view of the fixed fields used when encoding.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct FixedFieldsOut<'a> {
  #[serde(skip_serializing_if = "Option::is_none")]
  project: Option<&'a JiraProject>,
  #[serde(skip_serializing_if = "is_empty_str")]
  summary: &'a str,
  #[serde(rename = "issuetype", skip_serializing_if = "Option::is_none")]
  issue_type: Option<&'a JiraIssueType>,
  #[serde(skip_serializing_if = "is_empty_slice")]
  fix_versions: &'a [JiraRelease],
  #[serde(skip_serializing_if = "Option::is_none")]
  status: Option<&'a JiraIssueStatus>,
  #[serde(skip_serializing_if = "is_empty_str")]
  created: &'a str,
  #[serde(skip_serializing_if = "is_empty_str")]
  description: &'a str,
  #[serde(skip_serializing_if = "Option::is_none")]
  comment: Option<&'a JiraComments>,
}

/// The fixed fields as read from a response; unknown keys are ignored.
#[derive(Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FixedFieldsIn {
  #[serde(default)]
  project: Option<JiraProject>,
  #[serde(default, deserialize_with = "null_as_default")]
  summary: String,
  #[serde(rename = "issuetype", default)]
  issue_type: Option<JiraIssueType>,
  #[serde(default, deserialize_with = "null_as_default")]
  fix_versions: Vec<JiraRelease>,
  #[serde(default)]
  status: Option<JiraIssueStatus>,
  #[serde(default, deserialize_with = "null_as_default")]
  created: String,
  #[serde(default, deserialize_with = "null_as_default")]
  description: String,
  #[serde(default)]
  comment: Option<JiraComments>,
}

impl Serialize for JiraIssueFields {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    let fixed = FixedFieldsOut {
      project: self.project.as_ref(),
      summary: &self.summary,
      issue_type: self.issue_type.as_ref(),
      fix_versions: &self.fix_versions,
      status: self.status.as_ref(),
      created: &self.created,
      description: &self.description,
      comment: self.comment.as_ref(),
    };

    encode_fields(&fixed, &self.custom_fields)
      .map_err(<S::Error as ser::Error>::custom)?
      .serialize(serializer)
  }
}

impl Serialize for JiraIssueInput {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    let fixed = FixedFieldsOut {
      project: self.project.as_ref(),
      summary: &self.summary,
      issue_type: self.issue_type.as_ref(),
      fix_versions: &self.fix_versions,
      status: None,
      created: "",
      description: &self.description,
      comment: None,
    };

    encode_fields(&fixed, &self.custom_fields)
      .map_err(<S::Error as ser::Error>::custom)?
      .serialize(serializer)
  }
}

impl<'de> Deserialize<'de> for JiraIssueFields {
  fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
    let object = Map::<String, Value>::deserialize(deserializer)?;
    let custom_fields = decode_custom_fields(&object);
    let fixed: FixedFieldsIn =
      serde_json::from_value(Value::Object(object)).map_err(<D::Error as de::Error>::custom)?;

    Ok(Self {
      project: fixed.project,
      summary: fixed.summary,
      issue_type: fixed.issue_type,
      fix_versions: fixed.fix_versions,
      status: fixed.status,
      created: fixed.created,
      description: fixed.description,
      comment: fixed.comment,
      custom_fields,
    })
  }
}
