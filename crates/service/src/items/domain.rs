use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::errors::ServiceError;

pub type ItemId = i64;

/// Stored item. `id` is assigned by the store and never changes.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    pub description: String,
}

/// Create/update payload. The store owns ids: a body `id` must be an integer
/// (or `null`) but its value is never used.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ItemInput {
    pub id: Option<ItemId>,
    #[serde(deserialize_with = "nullable_string")]
    pub name: String,
    #[serde(deserialize_with = "nullable_string")]
    pub description: String,
}

fn nullable_string<'de, D>(de: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(de)?.unwrap_or_default())
}

impl ItemInput {
    /// Decode the first JSON value in `body`. It must be an object (or `null`);
    /// missing fields decode to empty strings and anything after the first
    /// value is ignored.
    pub fn from_json(body: &[u8]) -> Result<Self, ServiceError> {
        let mut stream = serde_json::Deserializer::from_slice(body).into_iter::<Value>();
        let value = match stream.next() {
            Some(Ok(value)) => value,
            Some(Err(e)) => return Err(ServiceError::Decode(e.to_string())),
            None => return Err(ServiceError::Decode("empty body".into())),
        };
        match value {
            Value::Null => Ok(Self::default()),
            Value::Object(fields) => serde_json::from_value(Value::Object(fold_keys(fields)))
                .map_err(|e| ServiceError::Decode(e.to_string())),
            other => Err(ServiceError::Decode(format!("expected a JSON object, got {other}"))),
        }
    }

    /// Build the stored item; `id` always comes from the store.
    pub fn into_item(self, id: ItemId) -> Item {
        Item { id, name: self.name, description: self.description }
    }
}

/// Field names match case-insensitively (`"NAME"` sets `name`).
fn fold_keys(fields: Map<String, Value>) -> Map<String, Value> {
    fields.into_iter().map(|(k, v)| (k.to_lowercase(), v)).collect()
}

/// Parse the `id` query parameter: must be present, numeric and positive.
pub fn parse_item_id(raw: Option<&str>) -> Result<ItemId, ServiceError> {
    let raw = raw.ok_or_else(|| ServiceError::InvalidArgument("missing id".into()))?;
    match raw.parse::<ItemId>() {
        Ok(id) if id > 0 => Ok(id),
        Ok(id) => Err(ServiceError::InvalidArgument(format!("id must be positive, got {id}"))),
        Err(e) => Err(ServiceError::InvalidArgument(format!("id {raw:?}: {e}"))),
    }
}
