//! Shallow merge of partial updates and field-level diffs.
//!
//! Records and patches are compared in their JSON form, so the keys in a
//! diff are the wire (camelCase) field names.

use serde::{de::DeserializeOwned, Serialize};
use serde_json::{Map, Value};

use super::error::StoreResult;
use crate::models::{Changes, FieldChange};

fn as_object(value: Value) -> StoreResult<Map<String, Value>> {
    match value {
        Value::Object(map) => Ok(map),
        other => Err(<serde_json::Error as serde::de::Error>::custom(format!(
            "expected a JSON object, found {}",
            other
        ))
        .into()),
    }
}

/// Overlay every key present in `patch` onto `current`. Returns the merged
/// record and the keys whose value actually changed.
pub(crate) fn apply_patch<T, P>(current: &T, patch: &P) -> StoreResult<(T, Changes)>
where
    T: Serialize + DeserializeOwned,
    P: Serialize,
{
    let mut merged = as_object(serde_json::to_value(current)?)?;
    let fields = as_object(serde_json::to_value(patch)?)?;

    let mut changes = Changes::new();
    for (key, new) in fields {
        let old = merged.get(&key).cloned().unwrap_or(Value::Null);
        if old != new {
            changes.insert(
                key.clone(),
                FieldChange {
                    old,
                    new: new.clone(),
                },
            );
        }
        merged.insert(key, new);
    }

    let record = serde_json::from_value(Value::Object(merged))?;
    Ok((record, changes))
}

/// Diff two full images of the same record over the union of their keys.
pub(crate) fn diff_records<T: Serialize>(before: &T, after: &T) -> StoreResult<Changes> {
    let before = as_object(serde_json::to_value(before)?)?;
    let mut after = as_object(serde_json::to_value(after)?)?;

    let mut changes = Changes::new();
    for (key, old) in before {
        let new = after.remove(&key).unwrap_or(Value::Null);
        if old != new {
            changes.insert(key, FieldChange { old, new });
        }
    }
    for (key, new) in after {
        changes.insert(
            key,
            FieldChange {
                old: Value::Null,
                new,
            },
        );
    }
    Ok(changes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    struct Record {
        title: String,
        version: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        note: Option<String>,
    }

    #[derive(Default, Serialize)]
    #[serde(rename_all = "camelCase")]
    struct Patch {
        #[serde(skip_serializing_if = "Option::is_none")]
        title: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        version: Option<String>,
    }

    fn record() -> Record {
        Record {
            title: "QMS Manual".into(),
            version: "1.0".into(),
            note: None,
        }
    }

    #[test]
    fn unpatched_fields_are_preserved() {
        let patch = Patch {
            version: Some("2.0".into()),
            ..Default::default()
        };
        let (merged, changes) = apply_patch(&record(), &patch).unwrap();

        assert_eq!(merged.title, "QMS Manual");
        assert_eq!(merged.version, "2.0");
        assert_eq!(changes.len(), 1);
        assert_eq!(changes["version"].old, json!("1.0"));
        assert_eq!(changes["version"].new, json!("2.0"));
    }

    #[test]
    fn equal_values_are_omitted_from_changes() {
        let patch = Patch {
            title: Some("QMS Manual".into()),
            version: Some("1.1".into()),
        };
        let (_, changes) = apply_patch(&record(), &patch).unwrap();

        assert!(!changes.contains_key("title"));
        assert!(changes.contains_key("version"));
    }

    #[test]
    fn empty_patch_is_identity() {
        let (merged, changes) = apply_patch(&record(), &Patch::default()).unwrap();
        assert_eq!(merged, record());
        assert!(changes.is_empty());
    }

    #[test]
    fn diff_reports_added_optional_fields() {
        let mut after = record();
        after.note = Some("reviewed".into());
        let changes = diff_records(&record(), &after).unwrap();

        assert_eq!(changes.len(), 1);
        assert_eq!(changes["note"].old, Value::Null);
        assert_eq!(changes["note"].new, json!("reviewed"));
    }
}
