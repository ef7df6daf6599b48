use serde_json::{Map, Value};

use crate::error::VaultError;
use crate::item::{Folder, VaultItem};

/// A parsed vault export.
///
/// Holds the whole top-level object. `items` is parsed on demand and written
/// back with [`VaultDocument::set_items`]; every other key is left as loaded.
#[derive(Debug, Clone, PartialEq)]
pub struct VaultDocument {
    root: Map<String, Value>,
}

impl VaultDocument {
    pub fn from_json(text: &str) -> Result<Self, VaultError> {
        let value: Value = serde_json::from_str(text)?;
        Self::from_value(value)
    }

    pub fn from_value(value: Value) -> Result<Self, VaultError> {
        match value {
            Value::Object(root) => {
                let doc = Self { root };
                // Surface shape errors at load time rather than mid-pipeline.
                doc.items()?;
                doc.folders()?;
                Ok(doc)
            }
            _ => Err(VaultError::NotAnObject),
        }
    }

    /// Password-protected or account-encrypted export; items are ciphertext.
    pub fn is_encrypted(&self) -> bool {
        self.root.get("encrypted") == Some(&Value::Bool(true))
    }

    /// Items in export order. A missing `items` key is an empty vault.
    pub fn items(&self) -> Result<Vec<VaultItem>, VaultError> {
        let Some(raw) = self.array_field("items")? else {
            return Ok(Vec::new());
        };
        raw.iter()
            .enumerate()
            .map(|(index, value)| {
                VaultItem::try_from(value.clone())
                    .map_err(|reason| VaultError::InvalidItem { index, reason })
            })
            .collect()
    }

    /// Folders in export order. A missing `folders` key means none.
    pub fn folders(&self) -> Result<Vec<Folder>, VaultError> {
        let Some(raw) = self.array_field("folders")? else {
            return Ok(Vec::new());
        };
        raw.iter()
            .enumerate()
            .map(|(index, value)| {
                serde_json::from_value::<Folder>(value.clone()).map_err(|e| {
                    VaultError::InvalidFolder { index, reason: e.to_string() }
                })
            })
            .collect()
    }

    pub fn set_items(&mut self, items: Vec<VaultItem>) {
        let values = items.into_iter().map(Value::from).collect();
        self.root.insert("items".into(), Value::Array(values));
    }

    pub fn to_json_pretty(&self) -> Result<String, VaultError> {
        Ok(serde_json::to_string_pretty(&self.root)?)
    }

    fn array_field(&self, key: &str) -> Result<Option<&Vec<Value>>, VaultError> {
        match self.root.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Array(values)) => Ok(Some(values)),
            Some(_) => Err(VaultError::InvalidField {
                field: key.into(),
                expected: "an array",
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXPORT: &str = r#"{
  "encrypted": false,
  "folders": [
    { "id": "f1", "name": "work" }
  ],
  "items": [
    {
      "id": "a",
      "organizationId": null,
      "folderId": null,
      "type": 1,
      "name": "Example",
      "notes": null,
      "favorite": false,
      "login": {
        "uris": [{ "match": null, "uri": "https://example.com" }],
        "username": "me",
        "password": "pw",
        "totp": null
      },
      "collectionIds": null
    }
  ]
}"#;

    #[test]
    fn untouched_document_round_trips() {
        let mut doc = VaultDocument::from_json(EXPORT).unwrap();
        let items = doc.items().unwrap();
        doc.set_items(items);

        let original: Value = serde_json::from_str(EXPORT).unwrap();
        let written: Value = serde_json::from_str(&doc.to_json_pretty().unwrap()).unwrap();
        assert_eq!(original, written);

        // Key order is part of the shape, too.
        let keys: Vec<&String> = written["items"][0].as_object().unwrap().keys().collect();
        assert_eq!(keys[0], "id");
        assert_eq!(keys[1], "organizationId");
        assert_eq!(keys.last().unwrap().as_str(), "collectionIds");
    }

    #[test]
    fn folders_parsed() {
        let doc = VaultDocument::from_json(EXPORT).unwrap();
        let folders = doc.folders().unwrap();
        assert_eq!(folders, vec![Folder { id: "f1".into(), name: "work".into() }]);
    }

    #[test]
    fn encrypted_flag() {
        assert!(!VaultDocument::from_json(EXPORT).unwrap().is_encrypted());
        let encrypted = VaultDocument::from_json(r#"{"encrypted": true, "data": "2.abc"}"#).unwrap();
        assert!(encrypted.is_encrypted());
    }

    #[test]
    fn missing_sections_are_empty() {
        let doc = VaultDocument::from_json("{}").unwrap();
        assert!(doc.items().unwrap().is_empty());
        assert!(doc.folders().unwrap().is_empty());
    }

    #[test]
    fn malformed_documents_rejected() {
        assert!(matches!(VaultDocument::from_json("not json"), Err(VaultError::Json(_))));
        assert!(matches!(VaultDocument::from_json("[]"), Err(VaultError::NotAnObject)));
        assert!(matches!(
            VaultDocument::from_json(r#"{"items": {}}"#),
            Err(VaultError::InvalidField { .. })
        ));
        assert!(matches!(
            VaultDocument::from_json(r#"{"items": [{"name": "x"}]}"#),
            Err(VaultError::InvalidItem { index: 0, .. })
        ));
        assert!(matches!(
            VaultDocument::from_json(r#"{"folders": [{"id": "f"}]}"#),
            Err(VaultError::InvalidFolder { index: 0, .. })
        ));
    }
}
