use crate::config::Config;
use crate::http_client::FetchTransport;
use crate::models::{CarDetection, CarListing};
use crate::scraper_trait::SourceClient;
use crate::scrapers::{AutoTraderScraper, CarsComScraper};
use chrono::Utc;
use rand::prelude::*;

/// Hard cap on the merged result set
const MAX_TOTAL_RESULTS: usize = 20;
/// Below this many real listings the response is padded with demo records
const MIN_REAL_RESULTS: usize = 5;
const DEMO_LISTING_COUNT: usize = 5;

/// Fans one detection out across all enabled source clients, merges their
/// results and pads sparse responses with demo listings.
///
/// Holds no per-search state; the shared transport is built fresh for each
/// search and torn down with it.
pub struct ScrapeOrchestrator {
    sources: Vec<Box<dyn SourceClient>>,
    user_agent: String,
    request_timeout_secs: u64,
    max_concurrent_requests: usize,
}

impl ScrapeOrchestrator {
    pub fn new(user_agent: &str, request_timeout_secs: u64, max_concurrent_requests: usize) -> Self {
        Self {
            sources: Vec::new(),
            user_agent: user_agent.to_string(),
            request_timeout_secs,
            max_concurrent_requests,
        }
    }

    /// Builds an orchestrator with the sources enabled in config registered.
    pub fn from_config(config: &Config) -> Self {
        let mut orchestrator = Self::new(
            &config.user_agent,
            config.request_timeout_secs,
            config.max_concurrent_requests,
        );

        if config.enable_autotrader {
            orchestrator.register(Box::new(AutoTraderScraper::new(&config.default_zip)));
        }
        if config.enable_cars_com {
            orchestrator.register(Box::new(CarsComScraper::new(&config.default_zip)));
        }

        tracing::info!("Initialized {} source clients", orchestrator.sources.len());
        orchestrator
    }

    pub fn register(&mut self, source: Box<dyn SourceClient>) {
        self.sources.push(source);
    }

    pub fn list_sources(&self) -> Vec<String> {
        self.sources.iter().map(|s| s.name().to_string()).collect()
    }

    /// Runs every registered source client concurrently and merges their
    /// listings in registration order. Per-source failures are logged and
    /// contribute nothing; they never cancel sibling fetches.
    pub async fn search(&self, detection: &CarDetection) -> Vec<CarListing> {
        if self.sources.is_empty() {
            tracing::warn!("No source clients enabled, returning empty result");
            return Vec::new();
        }

        let mut merged = Vec::new();

        match FetchTransport::new(
            &self.user_agent,
            self.request_timeout_secs,
            self.max_concurrent_requests,
        ) {
            Ok(transport) => {
                tracing::info!(
                    "Searching {} sources for {}",
                    self.sources.len(),
                    detection.query_string()
                );

                let tasks = self
                    .sources
                    .iter()
                    .map(|source| source.scrape(&transport, detection));
                let results = futures::future::join_all(tasks).await;

                for (source, result) in self.sources.iter().zip(results) {
                    match result {
                        Ok(mut listings) => {
                            tracing::info!("Found {} listings from {}", listings.len(), source.name());
                            merged.append(&mut listings);
                        }
                        Err(e) => {
                            tracing::error!("Source {} failed: {}", source.name(), e);
                        }
                    }
                }
            }
            Err(e) => {
                tracing::error!("Failed to build fetch transport: {}", e);
            }
        }

        if merged.len() < MIN_REAL_RESULTS {
            tracing::info!(
                "Only {} real listings collected, supplementing with demo listings",
                merged.len()
            );
            merged.extend(demo_listings());
        }

        merged.truncate(MAX_TOTAL_RESULTS);
        merged
    }
}

/// Synthetic placeholder listings used to pad sparse results so the
/// response never looks empty. Identified by source = "demo".
fn demo_listings() -> Vec<CarListing> {
    const MAKES: [&str; 7] = ["Toyota", "Honda", "Ford", "Chevrolet", "Nissan", "BMW", "Mercedes"];
    const MODELS: [&str; 7] = ["Camry", "Accord", "F-150", "Cruze", "Altima", "3 Series", "C-Class"];
    const PRICES: [&str; 5] = ["$15,999", "$22,500", "$18,750", "$28,900", "$31,200"];
    const YEARS: [i32; 5] = [2018, 2019, 2020, 2021, 2022];

    let mut rng = rand::rng();

    (0..DEMO_LISTING_COUNT)
        .map(|i| {
            let make = *MAKES.choose(&mut rng).unwrap_or(&MAKES[0]);
            let model = *MODELS.choose(&mut rng).unwrap_or(&MODELS[0]);
            let year = *YEARS.choose(&mut rng).unwrap_or(&YEARS[0]);
            let price = *PRICES.choose(&mut rng).unwrap_or(&PRICES[0]);

            CarListing {
                title: format!("{} {} {}", year, make, model),
                price: Some(price.to_string()),
                year: Some(year),
                make: make.to_string(),
                model: model.to_string(),
                mileage: Some(format!("{},000 miles", rng.random_range(15..=80))),
                location: Some("Demo Location".to_string()),
                dealer: Some("Demo Dealer".to_string()),
                image_url: None,
                listing_url: format!("https://example.com/listing/{}", i),
                source: "demo".to_string(),
                scraped_at: Utc::now(),
                similarity_score: None,
            }
        })
        .collect()
}
