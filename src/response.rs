use serde_json::{Map, Value};
use tracing::debug;

/// What a catalog response tells us, after shape checks
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizedResponse {
    /// Attributes of the matched product, empty when nothing matched
    pub attributes: Map<String, Value>,
    /// Key the product was nested under; only set when `attributes` is non-empty
    pub entity_id: Option<String>,
    /// First message of an API error envelope
    pub remote_error: Option<String>,
}

/// Decode a response body. Anything that is not valid JSON counts as no body.
pub fn decode_body(body: &[u8]) -> Option<Value> {
    match serde_json::from_slice(body) {
        Ok(value) => Some(value),
        Err(e) => {
            debug!("Response body is not JSON: {}", e);
            None
        }
    }
}

/// Extract product attributes, entity id and error message from a decoded body.
///
/// The products endpoint is expected to return at most one match for an
/// ISBN/purchase-type pair. When it returns several, the first entry in
/// document order wins.
pub fn normalize(body: Option<&Value>) -> NormalizedResponse {
    let Some(body) = body else {
        return NormalizedResponse::default();
    };

    let attributes = book_attributes(body);
    let entity_id = if attributes.is_empty() {
        None
    } else {
        body.as_object()
            .and_then(|map| map.keys().next())
            .cloned()
    };

    if let Some(map) = body.as_object() {
        if map.len() > 1 && !attributes.is_empty() {
            debug!("Catalog returned {} entries, using the first", map.len());
        }
    }

    NormalizedResponse {
        attributes,
        entity_id,
        remote_error: error_message(body),
    }
}

fn book_attributes(body: &Value) -> Map<String, Value> {
    let first = body
        .as_object()
        .and_then(|map| map.values().next())
        .and_then(Value::as_object);

    match first {
        Some(attributes) if is_filled(attributes.get("sku")) => attributes.clone(),
        _ => Map::new(),
    }
}

fn error_message(body: &Value) -> Option<String> {
    body.get("messages")?
        .get("error")?
        .as_array()?
        .first()?
        .get("message")?
        .as_str()
        .map(str::to_string)
}

/// `null`, `false` and the empty string count as absent
pub fn is_filled(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) | Some(Value::Bool(false)) => false,
        Some(Value::String(s)) => !s.is_empty(),
        Some(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_single_product() {
        let body = json!({"17": {"sku": "BK1", "url_key": "some-book", "price": "12.50"}});
        let normalized = normalize(Some(&body));

        assert_eq!(normalized.entity_id.as_deref(), Some("17"));
        assert_eq!(normalized.attributes.get("sku"), Some(&json!("BK1")));
        assert_eq!(normalized.attributes.len(), 3);
        assert_eq!(normalized.remote_error, None);
    }

    #[test]
    fn test_entry_without_sku_is_ignored() {
        let body = json!({"17": {"sku": "", "url_key": "some-book"}});
        let normalized = normalize(Some(&body));

        assert!(normalized.attributes.is_empty());
        assert_eq!(normalized.entity_id, None);
    }

    #[test]
    fn test_first_entry_in_document_order_wins() {
        let body: Value =
            serde_json::from_str(r#"{"9": {"sku": "B"}, "10": {"sku": "A"}}"#).unwrap();
        let normalized = normalize(Some(&body));

        assert_eq!(normalized.entity_id.as_deref(), Some("9"));
        assert_eq!(normalized.attributes.get("sku"), Some(&json!("B")));
    }

    #[test]
    fn test_error_envelope() {
        let body = json!({
            "messages": {"error": [
                {"code": 401, "message": "oauth_problem=token_rejected"},
                {"code": 500, "message": "second"}
            ]}
        });
        let normalized = normalize(Some(&body));

        assert!(normalized.attributes.is_empty());
        assert_eq!(normalized.entity_id, None);
        assert_eq!(
            normalized.remote_error.as_deref(),
            Some("oauth_problem=token_rejected")
        );
    }

    #[test]
    fn test_shape_mismatches_are_absent() {
        for body in [
            json!([]),
            json!("text"),
            json!({"messages": "nope"}),
            json!({"messages": {"error": []}}),
            json!({"messages": {"error": [{"message": 5}]}}),
            json!({"1": "not an object"}),
        ] {
            let normalized = normalize(Some(&body));
            assert!(normalized.attributes.is_empty());
            assert_eq!(normalized.entity_id, None);
            assert_eq!(normalized.remote_error, None);
        }

        assert_eq!(normalize(None), NormalizedResponse::default());
    }

    #[test]
    fn test_decode_body() {
        assert_eq!(decode_body(b"{\"a\": 1}"), Some(json!({"a": 1})));
        assert_eq!(decode_body(b"<html>"), None);
        assert_eq!(decode_body(b""), None);
    }
}
