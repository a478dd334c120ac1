use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A product descriptor as sent by the client. Its keys are opaque to the
/// service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(transparent)]
pub struct Product {
    pub attributes: Map<String, Value>,
}

impl Product {
    pub fn named(name: impl Into<String>) -> Self {
        let mut attributes = Map::new();
        attributes.insert("name".into(), Value::String(name.into()));
        Self { attributes }
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    pub fn name(&self) -> Option<&str> {
        self.attributes.get("name").and_then(Value::as_str)
    }
}

/// Stored text form of an order's product list.
///
/// Only [`ProductsBlob::encode`] and [`ProductsBlob::decode`] cross between
/// the structured list and the text kept by storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductsBlob(String);

impl ProductsBlob {
    pub fn encode(products: &[Product]) -> Result<Self, serde_json::Error> {
        serde_json::to_string(products).map(Self)
    }

    pub fn decode(&self) -> Result<Vec<Product>, serde_json::Error> {
        serde_json::from_str(&self.0)
    }

    /// Wraps text read back from storage.
    pub fn from_stored(text: String) -> Self {
        Self(text)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone)]
pub struct NewOrder {
    pub userid: i64,
    pub products: ProductsBlob,
}

/// An order row exactly as persisted.
#[derive(Debug, Clone)]
pub struct StoredOrder {
    pub id: i64,
    pub userid: i64,
    pub products: ProductsBlob,
    pub created_at: DateTime<Utc>,
}

impl StoredOrder {
    pub fn decode(self) -> Result<Order, serde_json::Error> {
        let products = self.products.decode()?;
        Ok(Order {
            id: self.id,
            userid: self.userid,
            products,
            created_at: self.created_at,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Order {
    pub id: i64,
    pub userid: i64,
    pub products: Vec<Product>,
    pub created_at: DateTime<Utc>,
}
