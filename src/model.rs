//! Record shapes exchanged with the three backing stores.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// User as stored in the document store. `_id` is the store-assigned identifier.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// Fields a client may set on a user. Unknown body fields are dropped.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UserInput {
    pub name: Option<String>,
    pub email: Option<String>,
}

impl UserInput {
    /// Cast a JSON body onto the user model. Scalars become strings, `null` leaves the
    /// field unset, objects and arrays are refused.
    pub fn from_value(body: Value) -> Result<Self, String> {
        let Value::Object(map) = body else {
            return Err("body must be a JSON object".into());
        };
        Ok(UserInput {
            name: cast_string("name", map.get("name"))?,
            email: cast_string("email", map.get("email"))?,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none()
    }
}

fn cast_string(field: &str, value: Option<&Value>) -> Result<Option<String>, String> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(Value::Bool(b)) => Ok(Some(b.to_string())),
        Some(_) => Err(format!("cast to string failed for field '{}'", field)),
    }
}

/// Product row. Serialized with the table's column names.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "PascalCase")]
#[sqlx(rename_all = "PascalCase")]
pub struct Product {
    pub id: i32,
    pub nome: String,
    pub descricao: Option<String>,
    pub preco: Decimal,
}

/// Body of product create/update. Missing fields are bound as NULL and left to the table's constraints.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ProductInput {
    #[serde(default)]
    pub nome: Option<String>,
    #[serde(default)]
    pub descricao: Option<String>,
    #[serde(default)]
    pub preco: Option<Decimal>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CreatedId {
    pub id: u64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct BucketEntry {
    pub name: String,
    pub creation_date: Option<DateTime<Utc>>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ObjectEntry {
    pub key: String,
    pub size: Option<i64>,
    pub last_modified: Option<DateTime<Utc>>,
    pub etag: Option<String>,
}

/// File taken from a multipart upload, fully buffered.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UploadedFile {
    pub file_name: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct UploadReceipt {
    pub bucket: String,
    pub key: String,
    pub etag: Option<String>,
    pub size: usize,
    pub content_type: String,
}
