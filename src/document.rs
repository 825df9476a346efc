//! Documents stored by the item service.
//!
//! Both [`Item`] and [`ItemCapped`] share the same JSON shape:
//!
//! ```json
//! { "id": "6650f0c2a1b2c3d4e5f60718", "description": "LG TV", "price": 850.0 }
//! ```
//!
//! `id` is `null` until the store assigns one on first save.

use serde::{de::DeserializeOwned, Deserialize, Serialize};

/// Trait for records that live in a named collection and carry a
/// store-assigned identifier.
pub trait Document: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Collection name (maps to a collection in a document store).
    const COLLECTION: &'static str;

    fn id(&self) -> Option<&str>;

    fn set_id(&mut self, id: String);
}

/// Primary resource record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    #[serde(default)]
    pub id: Option<String>,
    pub description: String,
    pub price: f64,
}

impl Item {
    /// An unsaved item (no id yet).
    pub fn new(description: impl Into<String>, price: f64) -> Self {
        Self {
            id: None,
            description: description.into(),
            price,
        }
    }

    pub fn with_id(id: impl Into<String>, description: impl Into<String>, price: f64) -> Self {
        Self {
            id: Some(id.into()),
            description: description.into(),
            price,
        }
    }

    /// Replace the mutable fields from an update payload. The id is kept.
    pub fn apply(&mut self, payload: &ItemPayload) {
        self.description = payload.description.clone();
        self.price = payload.price;
    }
}

impl Document for Item {
    const COLLECTION: &'static str = "item";

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn set_id(&mut self, id: String) {
        self.id = Some(id);
    }
}

/// Record appended to the capped collection and relayed by the stream endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemCapped {
    #[serde(default)]
    pub id: Option<String>,
    pub description: String,
    pub price: f64,
}

impl ItemCapped {
    pub fn new(description: impl Into<String>, price: f64) -> Self {
        Self {
            id: None,
            description: description.into(),
            price,
        }
    }
}

impl Document for ItemCapped {
    const COLLECTION: &'static str = "itemCapped";

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn set_id(&mut self, id: String) {
        self.id = Some(id);
    }
}

/// Request body for create and update.
///
/// Update ignores `id`; create honours it when present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemPayload {
    #[serde(default)]
    pub id: Option<String>,
    pub description: String,
    pub price: f64,
}

impl From<ItemPayload> for Item {
    fn from(payload: ItemPayload) -> Self {
        Item {
            id: payload.id,
            description: payload.description,
            price: payload.price,
        }
    }
}

/// Generate a new 24-hex-char document id.
pub fn new_object_id() -> String {
    let mut id = uuid::Uuid::new_v4().simple().to_string();
    id.truncate(24);
    id
}
