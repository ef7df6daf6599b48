//! Vault items as exported: a typed view over the raw JSON object.
//!
//! Items are kept as their original `serde_json` map so every key the engine
//! does not rewrite survives the round trip unchanged, key order included.

use std::fmt;

use serde::{Deserialize, Serialize, Serializer};
use serde_json::{json, Map, Value};

/// One exported credential or secure record.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct VaultItem(Map<String, Value>);

impl TryFrom<Value> for VaultItem {
    type Error = String;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(map) => {
                let checked = match map.get("id") {
                    Some(Value::String(_)) => Ok(()),
                    Some(_) => Err("'id' must be a string".to_string()),
                    None => Err("missing 'id'".to_string()),
                };
                checked.map(|()| Self(map))
            }
            _ => Err("item must be a JSON object".into()),
        }
    }
}

impl From<VaultItem> for Value {
    fn from(item: VaultItem) -> Self {
        Value::Object(item.0)
    }
}

impl VaultItem {
    pub fn id(&self) -> &str {
        self.0.get("id").and_then(Value::as_str).unwrap_or_default()
    }

    pub fn name(&self) -> Option<&str> {
        self.0.get("name").and_then(Value::as_str)
    }

    pub fn set_name(&mut self, name: String) {
        self.0.insert("name".into(), Value::String(name));
    }

    /// Raw access to any top-level field.
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn kind(&self) -> ItemKind {
        ItemKind::from_value(self.0.get("type"))
    }

    /// The `login` block, only when it is an object.
    pub fn login(&self) -> Option<&Map<String, Value>> {
        self.0.get("login").and_then(Value::as_object)
    }

    pub fn has_login(&self) -> bool {
        self.login().is_some()
    }

    pub fn username(&self) -> Option<String> {
        self.login().and_then(|l| l.get("username")).and_then(scalar_string)
    }

    /// The password exactly as exported.
    pub fn raw_password(&self) -> Option<&Value> {
        self.login().and_then(|l| l.get("password"))
    }

    /// String-typed password, trimmed; `None` when absent, blank or not a string.
    pub fn password(&self) -> Option<&str> {
        self.raw_password()
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|p| !p.is_empty())
    }

    /// Password coerced to a trimmed string, for grouping.
    /// Non-string scalars use their JSON text; a missing or null password is empty.
    pub fn password_key(&self) -> String {
        self.raw_password()
            .and_then(scalar_string)
            .map(|p| p.trim().to_string())
            .unwrap_or_default()
    }

    /// URI strings of the login block, in export order.
    pub fn uris(&self) -> Vec<&str> {
        self.login()
            .and_then(|l| l.get("uris"))
            .and_then(Value::as_array)
            .map(|uris| {
                uris.iter()
                    .filter_map(|u| u.get("uri").and_then(Value::as_str))
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn first_uri(&self) -> Option<&str> {
        self.uris().into_iter().next()
    }

    /// Has a login block with at least one URI.
    pub fn is_reconcilable(&self) -> bool {
        self.first_uri().is_some()
    }

    /// Replace the login URIs; each is written with no explicit match mode.
    pub fn set_uris<I>(&mut self, uris: I)
    where
        I: IntoIterator<Item = String>,
    {
        let records: Vec<Value> = uris
            .into_iter()
            .map(|uri| json!({ "uri": uri, "match": null }))
            .collect();
        if let Some(Value::Object(login)) = self.0.get_mut("login") {
            login.insert("uris".into(), Value::Array(records));
        }
    }

    pub fn notes(&self) -> Option<&str> {
        self.0.get("notes").and_then(Value::as_str)
    }

    /// `None` writes an explicit `null`, matching how exports mark empty notes.
    pub fn set_notes(&mut self, notes: Option<String>) {
        let value = notes.map(Value::String).unwrap_or(Value::Null);
        self.0.insert("notes".into(), value);
    }

    pub fn folder_id(&self) -> Option<&str> {
        self.0.get("folderId").and_then(Value::as_str)
    }

    /// True when `folderId` is present and non-null.
    pub fn has_folder(&self) -> bool {
        !matches!(self.0.get("folderId"), None | Some(Value::Null))
    }

    pub fn set_folder_id(&mut self, folder_id: String) {
        self.0.insert("folderId".into(), Value::String(folder_id));
    }

    pub fn revision_date(&self) -> Option<&str> {
        self.0.get("revisionDate").and_then(Value::as_str)
    }

    pub fn creation_date(&self) -> Option<&str> {
        self.0.get("creationDate").and_then(Value::as_str)
    }

    /// Most recent `passwordHistory[].lastUsedDate`.
    pub fn last_used_date(&self) -> Option<&str> {
        self.0
            .get("passwordHistory")
            .and_then(Value::as_array)?
            .iter()
            .filter_map(|h| h.get("lastUsedDate").and_then(Value::as_str))
            .max()
    }
}

/// String form of a JSON scalar. `null` has none.
fn scalar_string(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Item type
// ---------------------------------------------------------------------------

/// Export `type` tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ItemKind {
    Login,
    SecureNote,
    Card,
    Identity,
    Other(i64),
    Unknown,
}

impl ItemKind {
    pub fn from_value(value: Option<&Value>) -> Self {
        let code = match value {
            Some(Value::Number(n)) => n.as_i64(),
            Some(Value::String(s)) => s.trim().parse().ok(),
            _ => None,
        };
        match code {
            Some(1) => Self::Login,
            Some(2) => Self::SecureNote,
            Some(3) => Self::Card,
            Some(4) => Self::Identity,
            Some(n) => Self::Other(n),
            None => Self::Unknown,
        }
    }

    /// Plural label for summaries.
    pub fn label(&self) -> String {
        match self {
            Self::Login => "Logins".into(),
            Self::SecureNote => "Secure Notes".into(),
            Self::Card => "Cards".into(),
            Self::Identity => "Identities".into(),
            Self::Other(n) => format!("Type {n}"),
            Self::Unknown => "Unknown Type".into(),
        }
    }
}

/// Serialized as its snake_case name so it can key JSON maps.
impl Serialize for ItemKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Login => write!(f, "login"),
            Self::SecureNote => write!(f, "secure_note"),
            Self::Card => write!(f, "card"),
            Self::Identity => write!(f, "identity"),
            Self::Other(n) => write!(f, "type_{n}"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

// ---------------------------------------------------------------------------
// Folder
// ---------------------------------------------------------------------------

/// A pre-existing folder. The engine only ever references these.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Folder {
    pub id: String,
    pub name: String,
}
