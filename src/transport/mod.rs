pub use async_trait::async_trait;

pub mod oauth;

use thiserror::Error;

/// Path of the products collection in the Magento REST API
pub const PRODUCTS_PATH: &str = "/api/rest/products";

#[derive(Error, Debug)]
pub enum TransportError {
    #[error("config.{0} is required to sign requests")]
    MissingCredential(&'static str),
    #[error("Invalid site URL: {0}")]
    InvalidSite(#[from] url::ParseError),
    #[error("Failed to create HTTP client: {0}")]
    ClientBuild(reqwest::Error),
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),
    #[error("Failed to sign request: {0}")]
    Signing(String),
}

/// Raw HTTP answer, before any decoding
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    /// Reason phrase for the status, when known
    pub message: Option<String>,
    pub body: Vec<u8>,
}

/// An authenticated GET against the catalog site
#[async_trait]
pub trait SignedGet: Send + Sync {
    /// Issue a GET for `path` with the given query parameters, in order
    async fn get(
        &self,
        path: &str,
        params: &[(String, String)],
    ) -> Result<RawResponse, TransportError>;

    /// Get the name of this transport
    fn name(&self) -> &'static str;
}

/// Equality filters selecting enabled products with the given ISBN and purchase type
pub fn product_filters(isbn: Option<&str>, purchase_type_code: Option<u32>) -> Vec<(String, String)> {
    let filters = [
        ("isbn", isbn.unwrap_or_default().to_string()),
        (
            "purchase_type",
            purchase_type_code.map(|c| c.to_string()).unwrap_or_default(),
        ),
        ("status", "1".to_string()),
    ];

    filters
        .into_iter()
        .enumerate()
        .flat_map(|(i, (attribute, eq))| {
            let n = i + 1;
            [
                (format!("filter[{}][attribute]", n), attribute.to_string()),
                (format!("filter[{}][eq]", n), eq),
            ]
        })
        .collect()
}
