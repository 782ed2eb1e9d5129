use crate::response::is_filled;
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

/// Outcome of one catalog lookup.
///
/// Holds the product attributes as returned by the catalog plus derived
/// metadata. Serializes to a single flat object where absent fields are
/// omitted.
#[derive(Debug, Clone, PartialEq)]
pub struct LookupResult {
    attributes: Map<String, Value>,
    meta_status: Option<u16>,
    meta_message: Option<String>,
    meta_errors: Option<Vec<String>>,
    present: bool,
    url_with_params: Option<String>,
}

impl LookupResult {
    pub(crate) fn new(
        attributes: Map<String, Value>,
        meta_status: Option<u16>,
        meta_message: Option<String>,
        meta_errors: Option<Vec<String>>,
        url_with_params: Option<String>,
    ) -> Self {
        let present = is_filled(attributes.get("sku"));
        Self {
            attributes,
            meta_status,
            meta_message,
            meta_errors,
            present,
            url_with_params,
        }
    }

    /// Product attribute by name
    pub fn get(&self, attribute: &str) -> Option<&Value> {
        self.attributes.get(attribute)
    }

    pub fn attributes(&self) -> &Map<String, Value> {
        &self.attributes
    }

    /// HTTP status of the catalog response
    pub fn meta_status(&self) -> Option<u16> {
        self.meta_status
    }

    /// HTTP reason phrase of the catalog response
    pub fn meta_message(&self) -> Option<&str> {
        self.meta_message.as_deref()
    }

    pub fn meta_errors(&self) -> Option<&[String]> {
        self.meta_errors.as_deref()
    }

    /// Whether the catalog returned a purchasable product
    pub fn is_present(&self) -> bool {
        self.present
    }

    /// Storefront page for the product
    pub fn url_with_params(&self) -> Option<&str> {
        self.url_with_params.as_deref()
    }

    /// Flatten into one map. Derived fields take precedence over attributes of the same name.
    pub fn to_map(&self) -> Map<String, Value> {
        let mut map = self.attributes.clone();
        if let Some(status) = self.meta_status {
            map.insert("meta_status".to_string(), Value::from(status));
        }
        if let Some(message) = &self.meta_message {
            map.insert("meta_message".to_string(), Value::from(message.clone()));
        }
        if let Some(errors) = &self.meta_errors {
            map.insert("meta_errors".to_string(), Value::from(errors.clone()));
        }
        map.insert("present".to_string(), Value::Bool(self.present));
        if let Some(url) = &self.url_with_params {
            map.insert("url_with_params".to_string(), Value::from(url.clone()));
        }
        map
    }
}

impl Serialize for LookupResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_map().serialize(serializer)
    }
}

/// Storefront URL for a product; needs the site, a `url_key` attribute and the entity id
pub fn product_url(
    site: Option<&str>,
    attributes: &Map<String, Value>,
    entity_id: Option<&str>,
    url_params: Option<&str>,
) -> Option<String> {
    let site = site?;
    let entity_id = entity_id?;
    if !is_filled(attributes.get("url_key")) {
        return None;
    }

    let url = format!("{}/catalog/product/view/id/{}", site, entity_id);
    match url_params {
        Some(params) => Some(format!("{}?{}", url, params)),
        None => Some(url),
    }
}
