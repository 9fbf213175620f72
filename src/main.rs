mod config;
mod extract;
mod http_client;
mod models;
mod orchestrator;
mod scraper_trait;
mod scrapers;

use anyhow::Result;
use clap::Parser;
use config::Config;
use http_client::FetchTransport;
use models::{CarDetection, SearchResults};
use orchestrator::ScrapeOrchestrator;

#[derive(Parser, Debug)]
#[command(name = "carspotter")]
#[command(about = "Searches automotive listing sites for a detected vehicle", long_about = None)]
struct Args {
    /// Detected make (use "Unknown" to search without one)
    #[arg(long, default_value = "Unknown")]
    make: String,

    /// Detected model
    #[arg(long, default_value = "Unknown")]
    model: String,

    /// Detected model year
    #[arg(long)]
    year: Option<i32>,

    /// Detected body type (sedan, SUV, ...)
    #[arg(long)]
    body_type: Option<String>,

    /// Detected color
    #[arg(long)]
    color: Option<String>,

    /// Print results as JSON
    #[arg(long)]
    json: bool,

    /// Test URL fetching - fetch and print HTML from a URL
    #[arg(long)]
    test_url: Option<String>,

    /// Save HTML to file when using --test-url
    #[arg(long)]
    save_html: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Bootstrap a default config file on first run
    if !std::path::Path::new("data/config.yaml").exists() {
        eprintln!("No config file found, creating default data/config.yaml");
        Config::create_default()?;
    }

    let config = Config::load()?;

    // Initialize logging - use RUST_LOG env var if set, otherwise use config
    if std::env::var("RUST_LOG").is_ok() {
        tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .init();
    } else {
        let level = config.tracing_level.to_lowercase();
        let max_level = match level.as_str() {
            "trace" => tracing::Level::TRACE,
            "debug" => tracing::Level::DEBUG,
            "info" => tracing::Level::INFO,
            "warn" => tracing::Level::WARN,
            "error" => tracing::Level::ERROR,
            _ => {
                eprintln!("Invalid tracing level '{}', using 'info'", level);
                tracing::Level::INFO
            }
        };

        tracing_subscriber::fmt().with_max_level(max_level).init();
    }

    if let Some(url) = args.test_url {
        return test_url_fetch(&config, &url, args.save_html.as_deref()).await;
    }

    let detection = CarDetection {
        make: args.make,
        model: args.model,
        year: args.year,
        body_type: args.body_type,
        confidence: 1.0,
        color: args.color,
    };

    let orchestrator = ScrapeOrchestrator::from_config(&config);
    tracing::info!("Registered sources: {:?}", orchestrator.list_sources());

    let listings = orchestrator.search(&detection).await;
    let results = SearchResults::new(&detection, listings);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&results)?);
        return Ok(());
    }

    println!("Query: {}", results.query);
    println!("Sources used: {:?}", results.sources_used);
    println!("Found {} listings", results.total_results);
    println!("{}", "=".repeat(80));

    for (i, listing) in results.listings.iter().enumerate() {
        println!("\nListing #{}", i + 1);
        println!("Title: {}", listing.title);
        println!("Price: {}", listing.price.as_deref().unwrap_or("-"));
        println!("Make/Model: {} {}", listing.make, listing.model);
        if let Some(mileage) = &listing.mileage {
            println!("Mileage: {}", mileage);
        }
        if let Some(location) = &listing.location {
            println!("Location: {}", location);
        }
        if let Some(dealer) = &listing.dealer {
            println!("Dealer: {}", dealer);
        }
        if let Some(image_url) = &listing.image_url {
            println!("Image: {}", image_url);
        }
        println!("URL: {}", listing.listing_url);
        println!("Source: {}", listing.source);
        println!("{}", "-".repeat(80));
    }

    if results.listings.is_empty() {
        println!("No listings found. This might mean:");
        println!("  - All sources are disabled in data/config.yaml");
        println!("  - The scraper selectors need updating");
    }

    Ok(())
}

/// Test URL fetching - downloads and prints the HTML response through the
/// same transport the scrapers use. Useful when adjusting selectors.
async fn test_url_fetch(config: &Config, url: &str, save_path: Option<&str>) -> Result<()> {
    println!("Testing URL fetch: {}", url);
    println!("User-Agent: {}", config.user_agent);
    println!("{}", "=".repeat(80));

    let transport = FetchTransport::new(
        &config.user_agent,
        config.request_timeout_secs,
        config.max_concurrent_requests,
    )?;

    match transport.get_page(url).await {
        Some(body) => {
            if let Some(path) = save_path {
                std::fs::write(path, &body)?;
                println!("HTML saved to: {}", path);
            } else {
                println!("{}", body);
            }
            println!("{}", "=".repeat(80));
            println!("Total length: {} bytes", body.len());
        }
        None => {
            println!("Fetch failed - see log output above");
        }
    }

    Ok(())
}
