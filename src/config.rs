use std::env;

pub const ENV_CONSUMER_KEY: &str = "CATALOG_CONSUMER_KEY";
pub const ENV_CONSUMER_SECRET: &str = "CATALOG_CONSUMER_SECRET";
pub const ENV_SITE: &str = "CATALOG_SITE";
pub const ENV_ACCESS_KEY: &str = "CATALOG_ACCESS_KEY";
pub const ENV_ACCESS_SECRET: &str = "CATALOG_ACCESS_SECRET";
pub const ENV_URL_PARAMS: &str = "CATALOG_URL_PARAMS";

/// Credentials and site settings for the catalog API.
///
/// Every field is optional: a missing setting is reported on each lookup
/// instead of failing construction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogConfig {
    pub consumer_key: Option<String>,
    pub consumer_secret: Option<String>,
    /// Base URL of the shop, e.g. `https://shop.example.com`
    pub site: Option<String>,
    pub access_key: Option<String>,
    pub access_secret: Option<String>,
    /// Appended verbatim after `?` to generated product URLs
    pub url_params: Option<String>,
}

impl CatalogConfig {
    /// Build a configuration in one initializer block
    pub fn configure(f: impl FnOnce(&mut CatalogConfig)) -> Self {
        let mut config = Self::default();
        f(&mut config);
        config
    }

    /// Read settings from `CATALOG_*` environment variables. Empty values count as unset.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let read = |name: &str| lookup(name).filter(|v| !v.is_empty());
        Self {
            consumer_key: read(ENV_CONSUMER_KEY),
            consumer_secret: read(ENV_CONSUMER_SECRET),
            site: read(ENV_SITE),
            access_key: read(ENV_ACCESS_KEY),
            access_secret: read(ENV_ACCESS_SECRET),
            url_params: read(ENV_URL_PARAMS),
        }
    }

    /// Names of unset required settings, in reporting order
    pub fn missing_settings(&self) -> Vec<&'static str> {
        [
            ("consumer_key", &self.consumer_key),
            ("consumer_secret", &self.consumer_secret),
            ("site", &self.site),
            ("access_key", &self.access_key),
            ("access_secret", &self.access_secret),
        ]
        .into_iter()
        .filter(|(_, value)| value.is_none())
        .map(|(name, _)| name)
        .collect()
    }
}
