pub mod config;
pub mod errors;
pub mod lookup;
pub mod query;
pub mod report;
pub mod response;
pub mod transport;

pub use config::CatalogConfig;
pub use lookup::LookupResult;
pub use query::{PurchaseType, Query};

use errors::collect_errors;
use lookup::product_url;
use response::{decode_body, normalize};
use std::sync::OnceLock;
use tracing::{debug, warn};
use transport::{oauth::OAuthTransport, product_filters, RawResponse, SignedGet, PRODUCTS_PATH};

/// Looks up books in the catalog and reports what it found.
///
/// The signed transport is built from the configuration on first use and
/// reused for every later lookup.
pub struct CatalogClient {
    config: CatalogConfig,
    transport: OnceLock<Option<Box<dyn SignedGet>>>,
}

impl CatalogClient {
    pub fn new(config: CatalogConfig) -> Self {
        Self {
            config,
            transport: OnceLock::new(),
        }
    }

    /// Use a ready-made transport instead of building one from the configuration
    pub fn with_transport(config: CatalogConfig, transport: Box<dyn SignedGet>) -> Self {
        Self {
            config,
            transport: OnceLock::from(Some(transport)),
        }
    }

    pub fn config(&self) -> &CatalogConfig {
        &self.config
    }

    /// Look up a book by ISBN and purchase type.
    ///
    /// Never fails: configuration gaps, invalid queries and remote problems
    /// all end up in the result's `meta_errors`.
    pub async fn find_by(&self, query: &Query) -> LookupResult {
        let purchase_type = PurchaseType::from_value(query.raw_purchase_type());
        let isbn = query.isbn_value();

        let response = self
            .execute(isbn.as_deref(), purchase_type.map(|p| p.code()))
            .await;

        let (status, message, body) = match response {
            Some(RawResponse {
                status,
                message,
                body,
            }) => (Some(status), message, decode_body(&body)),
            None => (None, None, None),
        };

        let normalized = normalize(body.as_ref());
        let errors = collect_errors(
            &self.config,
            query,
            purchase_type,
            normalized.remote_error.as_deref(),
        );
        let url = product_url(
            self.config.site.as_deref(),
            &normalized.attributes,
            normalized.entity_id.as_deref(),
            self.config.url_params.as_deref(),
        );

        let result = LookupResult::new(normalized.attributes, status, message, errors, url);
        debug!(
            present = result.is_present(),
            errors = result.meta_errors().map_or(0, |e| e.len()),
            "lookup finished"
        );
        result
    }

    /// Run the product query; any failure along the way means no response
    async fn execute(&self, isbn: Option<&str>, purchase_type_code: Option<u32>) -> Option<RawResponse> {
        let transport = self.transport()?;
        let filters = product_filters(isbn, purchase_type_code);

        match transport.get(PRODUCTS_PATH, &filters).await {
            Ok(response) => {
                debug!(status = response.status, "{} response", transport.name());
                Some(response)
            }
            Err(e) => {
                warn!("Catalog request failed: {}", e);
                None
            }
        }
    }

    fn transport(&self) -> Option<&dyn SignedGet> {
        self.transport
            .get_or_init(|| match OAuthTransport::from_config(&self.config) {
                Ok(transport) => Some(Box::new(transport) as Box<dyn SignedGet>),
                Err(e) => {
                    warn!("Cannot prepare signed transport: {}", e);
                    None
                }
            })
            .as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::{Arc, Mutex};
    use crate::transport::{async_trait, TransportError};

    /// Replays one canned answer and records the requests it saw
    struct FakeTransport {
        response: Option<RawResponse>,
        requests: Arc<Mutex<Vec<(String, Vec<(String, String)>)>>>,
    }

    impl FakeTransport {
        fn replying(status: u16, message: &str, body: &str) -> Self {
            Self {
                response: Some(RawResponse {
                    status,
                    message: Some(message.to_string()),
                    body: body.as_bytes().to_vec(),
                }),
                requests: Arc::default(),
            }
        }

        fn failing() -> Self {
            Self {
                response: None,
                requests: Arc::default(),
            }
        }
    }

    #[async_trait]
    impl SignedGet for FakeTransport {
        async fn get(
            &self,
            path: &str,
            params: &[(String, String)],
        ) -> Result<RawResponse, TransportError> {
            self.requests
                .lock()
                .unwrap()
                .push((path.to_string(), params.to_vec()));
            self.response
                .clone()
                .ok_or(TransportError::Signing("boom".to_string()))
        }

        fn name(&self) -> &'static str {
            "fake"
        }
    }

    fn full_config() -> CatalogConfig {
        CatalogConfig::configure(|c| {
            c.consumer_key = Some("ck".to_string());
            c.consumer_secret = Some("cs".to_string());
            c.site = Some("https://shop.test".to_string());
            c.access_key = Some("ak".to_string());
            c.access_secret = Some("as".to_string());
            c.url_params = Some("ref=lib".to_string());
        })
    }

    #[tokio::test]
    async fn test_book_found() {
        let transport =
            FakeTransport::replying(200, "OK", r#"{"17": {"sku": "BK1", "url_key": "some-book"}}"#);
        let requests = Arc::clone(&transport.requests);
        let client = CatalogClient::with_transport(full_config(), Box::new(transport));

        let query = Query::new().isbn("9780000000001").purchase_type("Rent");
        let result = client.find_by(&query).await;

        assert!(result.is_present());
        assert_eq!(result.meta_status(), Some(200));
        assert_eq!(result.meta_message(), Some("OK"));
        assert_eq!(result.meta_errors(), None);
        assert_eq!(result.get("sku"), Some(&json!("BK1")));
        assert_eq!(
            result.url_with_params(),
            Some("https://shop.test/catalog/product/view/id/17?ref=lib")
        );

        let requests = requests.lock().unwrap();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].0, "/api/rest/products");
        assert_eq!(requests[0].1, product_filters(Some("9780000000001"), Some(55)));
    }

    #[tokio::test]
    async fn test_empty_config_and_query() {
        let client = CatalogClient::new(CatalogConfig::default());
        let result = client.find_by(&Query::new()).await;

        assert!(!result.is_present());
        assert!(result.attributes().is_empty());
        assert_eq!(result.meta_status(), None);
        assert_eq!(result.meta_message(), None);
        assert_eq!(result.url_with_params(), None);
        assert_eq!(
            result.meta_errors().unwrap(),
            [
                "config.consumer_key not specified in initializer file",
                "config.consumer_secret not specified in initializer file",
                "config.site not specified in initializer file",
                "config.access_key not specified in initializer file",
                "config.access_secret not specified in initializer file",
                "Attribute isbn not specified",
                "Attribute purchase_type not specified",
                "Invalid value for attribute purchase_type",
            ]
        );
    }

    #[tokio::test]
    async fn test_transport_failure_degrades_to_no_response() {
        let client = CatalogClient::with_transport(full_config(), Box::new(FakeTransport::failing()));
        let query = Query::new().isbn("9780000000001").purchase_type("buy new");
        let result = client.find_by(&query).await;

        assert!(!result.is_present());
        assert_eq!(result.meta_status(), None);
        assert_eq!(result.meta_message(), None);
        assert_eq!(result.meta_errors(), None);
    }

    #[tokio::test]
    async fn test_remote_error_message_is_reported_last() {
        let transport = FakeTransport::replying(
            401,
            "Unauthorized",
            r#"{"messages": {"error": [{"code": 401, "message": "oauth_problem=signature_invalid"}]}}"#,
        );
        let client = CatalogClient::with_transport(full_config(), Box::new(transport));
        let query = Query::new().isbn("9780000000001").purchase_type("borrow");
        let result = client.find_by(&query).await;

        assert_eq!(result.meta_status(), Some(401));
        assert_eq!(
            result.meta_errors().unwrap(),
            [
                "Invalid value for attribute purchase_type",
                "oauth_problem=signature_invalid",
            ]
        );
    }

    #[tokio::test]
    async fn test_malformed_body_is_ignored() {
        let transport = FakeTransport::replying(502, "Bad Gateway", "<html>oops</html>");
        let client = CatalogClient::with_transport(full_config(), Box::new(transport));
        let query = Query::new().isbn("9780000000001").purchase_type("Rent");
        let result = client.find_by(&query).await;

        assert_eq!(result.meta_status(), Some(502));
        assert!(!result.is_present());
        assert_eq!(result.meta_errors(), None);
    }

    #[tokio::test]
    async fn test_incomplete_credentials_skip_the_request() {
        let mut config = full_config();
        config.access_secret = None;
        let client = CatalogClient::new(config);
        let query = Query::new().isbn("9780000000001").purchase_type("rent");

        for _ in 0..2 {
            let result = client.find_by(&query).await;
            assert_eq!(result.meta_status(), None);
            assert_eq!(
                result.meta_errors().unwrap(),
                ["config.access_secret not specified in initializer file"]
            );
        }
    }
}
