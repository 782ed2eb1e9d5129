use crate::lookup::LookupResult;
use colored::Colorize;
use serde_json::Value;

/// Attributes shown first in the report, when the catalog returns them
const HEADLINE_ATTRIBUTES: [&str; 4] = ["name", "sku", "price", "url_key"];

/// Print a lookup result to stdout with colors
pub fn print(result: &LookupResult) {
    println!();
    println!("{}", "Catalog Lookup".bold());
    println!("{}", "=".repeat(50));
    println!();

    let status = match (result.meta_status(), result.meta_message()) {
        (Some(code), Some(message)) => format!("{} {}", code, message),
        (Some(code), None) => code.to_string(),
        _ => "no response".to_string(),
    };
    println!("Response: {}", status.dimmed());

    if result.is_present() {
        println!("{}", "AVAILABLE".green().bold());
    } else {
        println!("{}", "NOT AVAILABLE".yellow().bold());
    }

    if let Some(url) = result.url_with_params() {
        println!("  {}", url.cyan());
    }
    println!();

    if !result.attributes().is_empty() {
        let attributes = result.attributes();
        let headline = HEADLINE_ATTRIBUTES
            .iter()
            .filter_map(|name| attributes.get(*name).map(|v| (*name, v)));
        let rest = attributes
            .iter()
            .filter(|(name, _)| !HEADLINE_ATTRIBUTES.contains(&name.as_str()))
            .map(|(name, v)| (name.as_str(), v));

        println!("{}", format!("ATTRIBUTES ({})", attributes.len()).bold());
        for (name, value) in headline.chain(rest) {
            println!("  {:<20} {}", name.dimmed(), truncate(&display_value(value), 60));
        }
        println!();
    }

    if let Some(errors) = result.meta_errors() {
        println!("{}", format!("ERRORS ({})", errors.len()).red().bold());
        for error in errors {
            println!("  {} {}", "ERROR".red(), error);
        }
        println!();
    }
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_len - 3).collect();
        format!("{}...", head)
    }
}
