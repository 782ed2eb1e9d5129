use catalog_lookup::config::{
    ENV_ACCESS_KEY, ENV_ACCESS_SECRET, ENV_CONSUMER_KEY, ENV_CONSUMER_SECRET, ENV_SITE,
    ENV_URL_PARAMS,
};
use catalog_lookup::{report, CatalogClient, CatalogConfig, Query};
use clap::Parser;
use colored::Colorize;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(name = "catalog-lookup")]
#[command(version = "0.1.0")]
#[command(about = "Check whether a book can be bought or rented from the catalog", long_about = None)]
struct Args {
    /// ISBN of the book
    #[arg(long)]
    isbn: Option<String>,

    /// Purchase type: "buy new" or "rent"
    #[arg(long)]
    purchase_type: Option<String>,

    /// OAuth consumer key
    #[arg(long, env = ENV_CONSUMER_KEY, hide_env_values = true)]
    consumer_key: Option<String>,

    /// OAuth consumer secret
    #[arg(long, env = ENV_CONSUMER_SECRET, hide_env_values = true)]
    consumer_secret: Option<String>,

    /// Base URL of the shop
    #[arg(long, env = ENV_SITE)]
    site: Option<String>,

    /// OAuth access token
    #[arg(long, env = ENV_ACCESS_KEY, hide_env_values = true)]
    access_key: Option<String>,

    /// OAuth access token secret
    #[arg(long, env = ENV_ACCESS_SECRET, hide_env_values = true)]
    access_secret: Option<String>,

    /// Query string appended to product URLs
    #[arg(long, env = ENV_URL_PARAMS)]
    url_params: Option<String>,

    /// Print the result as JSON
    #[arg(long)]
    json: bool,

    /// Strict mode: exit with error code unless the book is available without errors
    #[arg(long, short)]
    strict: bool,

    /// Verbose output
    #[arg(long, short)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    // Initialize logging
    if args.verbose {
        tracing_subscriber::fmt()
            .with_env_filter("catalog_lookup=debug")
            .with_writer(std::io::stderr)
            .init();
    }

    let non_empty = |value: Option<String>| value.filter(|v| !v.is_empty());
    let config = CatalogConfig {
        consumer_key: non_empty(args.consumer_key),
        consumer_secret: non_empty(args.consumer_secret),
        site: non_empty(args.site),
        access_key: non_empty(args.access_key),
        access_secret: non_empty(args.access_secret),
        url_params: non_empty(args.url_params),
    };

    let mut query = Query::new();
    if let Some(isbn) = args.isbn {
        query = query.isbn(isbn);
    }
    if let Some(purchase_type) = args.purchase_type {
        query = query.purchase_type(purchase_type);
    }

    let client = CatalogClient::new(config);
    let result = client.find_by(&query).await;

    if args.json {
        match serde_json::to_string_pretty(&result) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("{} Failed to encode result: {}", "Error:".red().bold(), e);
                return ExitCode::FAILURE;
            }
        }
    } else {
        report::print(&result);
    }

    if args.strict && (result.meta_errors().is_some() || !result.is_present()) {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
