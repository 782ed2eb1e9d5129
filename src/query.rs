use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// How the customer wants to acquire the book
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PurchaseType {
    BuyNew,
    Rent,
}

impl PurchaseType {
    /// Translate a raw query value into a purchase type.
    ///
    /// Only strings translate; labels match case-insensitively.
    pub fn from_value(value: Option<&Value>) -> Option<Self> {
        match value? {
            Value::String(label) => Self::from_label(label),
            _ => None,
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        match label.to_lowercase().as_str() {
            "buy new" => Some(PurchaseType::BuyNew),
            "rent" => Some(PurchaseType::Rent),
            _ => None,
        }
    }

    /// Numeric identifier the catalog filter API understands
    pub fn code(&self) -> u32 {
        match self {
            PurchaseType::BuyNew => 56,
            PurchaseType::Rent => 55,
        }
    }
}

impl std::fmt::Display for PurchaseType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PurchaseType::BuyNew => write!(f, "buy new"),
            PurchaseType::Rent => write!(f, "rent"),
        }
    }
}

/// Lookup request as supplied by the caller.
///
/// Keys are tracked by presence: a query can carry `purchase_type` with a
/// value that does not translate, which is reported differently from a
/// missing key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Query {
    fields: Map<String, Value>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn isbn(mut self, isbn: impl Into<String>) -> Self {
        self.fields.insert("isbn".to_string(), Value::String(isbn.into()));
        self
    }

    pub fn purchase_type(mut self, purchase_type: impl Into<Value>) -> Self {
        self.fields
            .insert("purchase_type".to_string(), purchase_type.into());
        self
    }

    pub fn has_isbn(&self) -> bool {
        self.fields.contains_key("isbn")
    }

    pub fn has_purchase_type(&self) -> bool {
        self.fields.contains_key("purchase_type")
    }

    /// ISBN as sent in the filter; non-string values are rendered as JSON text
    pub fn isbn_value(&self) -> Option<String> {
        match self.fields.get("isbn")? {
            Value::Null => None,
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    pub fn raw_purchase_type(&self) -> Option<&Value> {
        self.fields.get("purchase_type")
    }
}

impl From<Map<String, Value>> for Query {
    fn from(fields: Map<String, Value>) -> Self {
        Self { fields }
    }
}
