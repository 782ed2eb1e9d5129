//! OAuth 1.0a (RFC 5849) signed requests with HMAC-SHA1.

use super::{async_trait, RawResponse, SignedGet, TransportError};
use crate::config::CatalogConfig;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use hmac::{Hmac, Mac};
use reqwest::header::{ACCEPT, AUTHORIZATION};
use reqwest::Client;
use sha1::Sha1;
use std::time::{Duration, SystemTime};
use tracing::debug;
use url::Url;
use uuid::Uuid;

const USER_AGENT: &str = "catalog-lookup/0.1.0";
const REQUEST_TIMEOUT_SECS: u64 = 30;
const SIGNATURE_METHOD: &str = "HMAC-SHA1";
const OAUTH_VERSION: &str = "1.0";

type HmacSha1 = Hmac<Sha1>;

/// Consumer and access-token credentials used to sign each request
#[derive(Clone)]
pub struct OAuthCredentials {
    pub consumer_key: String,
    pub consumer_secret: String,
    pub token: String,
    pub token_secret: String,
}

impl std::fmt::Debug for OAuthCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OAuthCredentials")
            .field("consumer_key", &self.consumer_key)
            .field("token", &self.token)
            .finish_non_exhaustive()
    }
}

impl OAuthCredentials {
    pub fn from_config(config: &CatalogConfig) -> Result<Self, TransportError> {
        let require = |value: &Option<String>, name: &'static str| {
            value.clone().ok_or(TransportError::MissingCredential(name))
        };

        Ok(Self {
            consumer_key: require(&config.consumer_key, "consumer_key")?,
            consumer_secret: require(&config.consumer_secret, "consumer_secret")?,
            token: require(&config.access_key, "access_key")?,
            token_secret: require(&config.access_secret, "access_secret")?,
        })
    }

    /// Build the `Authorization` header value for one request.
    ///
    /// `base_uri` must already be normalized (see [`base_string_uri`]) and
    /// `params` holds the request's query parameters.
    pub fn authorization_header(
        &self,
        method: &str,
        base_uri: &str,
        params: &[(String, String)],
        nonce: &str,
        timestamp: u64,
    ) -> Result<String, TransportError> {
        let mut oauth_params = vec![
            ("oauth_consumer_key".to_string(), self.consumer_key.clone()),
            ("oauth_nonce".to_string(), nonce.to_string()),
            ("oauth_signature_method".to_string(), SIGNATURE_METHOD.to_string()),
            ("oauth_timestamp".to_string(), timestamp.to_string()),
            ("oauth_token".to_string(), self.token.clone()),
            ("oauth_version".to_string(), OAUTH_VERSION.to_string()),
        ];

        let mut all_params = params.to_vec();
        all_params.extend(oauth_params.iter().cloned());
        let base = signature_base(method, base_uri, &all_params);
        let signature = self.sign(&base)?;
        debug!(%base, "signed request");

        oauth_params.push(("oauth_signature".to_string(), signature));
        oauth_params.sort();

        let fields: Vec<String> = oauth_params
            .iter()
            .map(|(k, v)| format!("{}=\"{}\"", encode(k), encode(v)))
            .collect();
        Ok(format!("OAuth {}", fields.join(", ")))
    }

    fn sign(&self, base: &str) -> Result<String, TransportError> {
        let key = format!(
            "{}&{}",
            encode(&self.consumer_secret),
            encode(&self.token_secret)
        );
        let mut mac = HmacSha1::new_from_slice(key.as_bytes())
            .map_err(|e| TransportError::Signing(e.to_string()))?;
        mac.update(base.as_bytes());
        Ok(STANDARD.encode(mac.finalize().into_bytes()))
    }
}

/// RFC 3986 percent-encoding: everything but unreserved characters
fn encode(s: &str) -> String {
    urlencoding::encode(s).into_owned()
}

/// Encode and join parameters as `k=v&k=v`, keeping their order
fn encode_pairs(params: &[(String, String)]) -> String {
    params
        .iter()
        .map(|(k, v)| format!("{}={}", encode(k), encode(v)))
        .collect::<Vec<_>>()
        .join("&")
}

/// Scheme, host, non-default port and path, as used in the signature base string
pub fn base_string_uri(url: &Url) -> Result<String, TransportError> {
    let host = url
        .host_str()
        .ok_or(TransportError::InvalidSite(url::ParseError::EmptyHost))?;
    let port = url.port().map(|p| format!(":{}", p)).unwrap_or_default();
    Ok(format!(
        "{}://{}{}{}",
        url.scheme(),
        host.to_lowercase(),
        port,
        url.path()
    ))
}

/// Signature base string: method, base URI and the sorted, encoded parameter set
pub fn signature_base(method: &str, base_uri: &str, params: &[(String, String)]) -> String {
    let mut encoded: Vec<(String, String)> = params
        .iter()
        .map(|(k, v)| (encode(k), encode(v)))
        .collect();
    encoded.sort();

    let normalized = encoded
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("&");

    format!(
        "{}&{}&{}",
        method.to_uppercase(),
        encode(base_uri),
        encode(&normalized)
    )
}

/// [`SignedGet`] implementation talking to the catalog over `reqwest`
pub struct OAuthTransport {
    client: Client,
    credentials: OAuthCredentials,
    site: String,
}

impl OAuthTransport {
    pub fn from_config(config: &CatalogConfig) -> Result<Self, TransportError> {
        let credentials = OAuthCredentials::from_config(config)?;
        let site = config
            .site
            .as_deref()
            .ok_or(TransportError::MissingCredential("site"))?;
        Url::parse(site)?;

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(TransportError::ClientBuild)?;

        Ok(Self {
            client,
            credentials,
            site: site.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl SignedGet for OAuthTransport {
    async fn get(
        &self,
        path: &str,
        params: &[(String, String)],
    ) -> Result<RawResponse, TransportError> {
        let url = Url::parse(&format!("{}{}", self.site, path))?;
        let base_uri = base_string_uri(&url)?;

        let nonce = Uuid::new_v4().simple().to_string();
        let timestamp = SystemTime::now()
            .duration_since(SystemTime::UNIX_EPOCH)
            .map_err(|e| TransportError::Signing(format!("system time error: {e}")))?
            .as_secs();
        let authorization =
            self.credentials
                .authorization_header("GET", &base_uri, params, &nonce, timestamp)?;

        let request_url = if params.is_empty() {
            base_uri
        } else {
            format!("{}?{}", base_uri, encode_pairs(params))
        };
        debug!(url = %request_url, "GET");

        let response = self
            .client
            .get(&request_url)
            .header(AUTHORIZATION, authorization)
            .header(ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        let body = response.bytes().await?;

        Ok(RawResponse {
            status: status.as_u16(),
            message: status.canonical_reason().map(str::to_string),
            body: body.to_vec(),
        })
    }

    fn name(&self) -> &'static str {
        "OAuth 1.0a"
    }
}
