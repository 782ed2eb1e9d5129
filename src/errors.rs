use crate::config::CatalogConfig;
use crate::query::{PurchaseType, Query};

/// Collect every configuration, validation and remote problem for one lookup.
///
/// Messages keep a fixed order so callers can match on them. Returns `None`
/// when nothing went wrong.
pub fn collect_errors(
    config: &CatalogConfig,
    query: &Query,
    purchase_type: Option<PurchaseType>,
    remote_error: Option<&str>,
) -> Option<Vec<String>> {
    let mut errors: Vec<String> = config
        .missing_settings()
        .into_iter()
        .map(|name| format!("config.{} not specified in initializer file", name))
        .collect();

    if !query.has_isbn() {
        errors.push("Attribute isbn not specified".to_string());
    }

    if !query.has_purchase_type() {
        errors.push("Attribute purchase_type not specified".to_string());
    }

    if purchase_type.is_none() {
        errors.push("Invalid value for attribute purchase_type".to_string());
    }

    if let Some(message) = remote_error {
        errors.push(message.to_string());
    }

    if errors.is_empty() {
        None
    } else {
        Some(errors)
    }
}
