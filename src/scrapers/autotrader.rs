use crate::extract;
use crate::http_client::FetchTransport;
use crate::models::{CarDetection, CarListing};
use crate::scraper_trait::SourceClient;
use anyhow::Result;
use async_trait::async_trait;
use chrono::{Datelike, Utc};
use scraper::{ElementRef, Html, Selector};

const EARLIEST_MODEL_YEAR: i32 = 1990;
const MAX_RESULTS_PER_SOURCE: usize = 10;

pub struct AutoTraderScraper {
    base_url: String,
    default_zip: String,
}

impl AutoTraderScraper {
    pub fn new(default_zip: &str) -> Self {
        Self {
            base_url: "https://www.autotrader.com".to_string(),
            default_zip: default_zip.to_string(),
        }
    }

    fn parse_page(&self, html: &str) -> Vec<CarListing> {
        let document = Html::parse_document(html);

        // Class names on the results page shift with redesigns; try the
        // patterns we have seen in the wild
        let possible_selectors = [
            "div[class*='listing-item']",
            "div[class*='inventory-listing']",
            "div[data-cmp='inventoryListing']",
        ];

        let mut found_selector = None;
        for selector_str in possible_selectors {
            if let Ok(selector) = Selector::parse(selector_str) {
                let count = document.select(&selector).count();
                if count > 0 {
                    tracing::debug!("Found {} elements with selector: {}", count, selector_str);
                    found_selector = Some(selector);
                    break;
                }
            }
        }

        let Some(listing_selector) = found_selector else {
            tracing::debug!("No listing containers found on AutoTrader results page");
            return Vec::new();
        };

        let mut listings = Vec::new();
        for (index, element) in document
            .select(&listing_selector)
            .take(MAX_RESULTS_PER_SOURCE)
            .enumerate()
        {
            match self.parse_listing(&element) {
                Some(listing) => listings.push(listing),
                None => tracing::debug!("Skipping AutoTrader element #{} - missing title or link", index + 1),
            }
        }

        listings
    }

    fn parse_listing(&self, element: &ElementRef) -> Option<CarListing> {
        let title = extract::select_text(element, &[
            "h3",
            "a[class*='title']",
            "a[class*='heading']",
            "h2",
        ])?;
        let href = extract::select_attr(element, &["a[href]"], "href")?;

        let price = extract::select_text(element, &["[class*='first-price']", "[class*='price']"])
            .and_then(|text| extract::parse_price(&text));
        let mileage = extract::select_text(element, &["[class*='mileage']"])
            .and_then(|text| extract::parse_mileage(&text));
        let location = extract::select_text(element, &["[class*='location']", "[class*='dealer']"]);
        let image_url = extract::select_attr(element, &["img[src]"], "src");

        // AutoTrader titles lead with the year, e.g. "2020 Toyota Camry LE"
        let (make, model) = extract::make_model_from_title(&title, 1);

        Some(CarListing {
            title,
            price,
            year: None,
            make,
            model,
            mileage,
            location,
            dealer: None,
            image_url,
            listing_url: extract::resolve_url(&self.base_url, &href),
            source: "autotrader".to_string(),
            scraped_at: Utc::now(),
            similarity_score: None,
        })
    }
}

#[async_trait]
impl SourceClient for AutoTraderScraper {
    fn name(&self) -> &str {
        "autotrader"
    }

    fn build_search_url(&self, detection: &CarDetection) -> String {
        let mut params: Vec<(&str, String)> = vec![
            ("listingTypes", "used,new".to_string()),
        ];

        if detection.make != "Unknown" {
            params.push(("makeCodeList", detection.make.to_uppercase()));
        }
        if detection.model != "Unknown" {
            params.push(("modelCodeList", detection.model.to_uppercase()));
        }

        params.push(("zip", self.default_zip.clone()));
        params.push(("sortBy", "relevance".to_string()));
        params.push(("numRecords", "25".to_string()));

        if let Some(year) = detection.year {
            let current_year = Utc::now().year();
            params.push(("startYear", (year - 2).max(EARLIEST_MODEL_YEAR).to_string()));
            params.push(("endYear", (year + 2).min(current_year).to_string()));
        }

        let query = params
            .iter()
            .map(|(key, value)| format!("{}={}", key, urlencoding::encode(value)))
            .collect::<Vec<_>>()
            .join("&");

        format!("{}/cars-for-sale/all-cars?{}", self.base_url, query)
    }

    async fn scrape(
        &self,
        transport: &FetchTransport,
        detection: &CarDetection,
    ) -> Result<Vec<CarListing>> {
        let url = self.build_search_url(detection);
        tracing::debug!("Scraping {}", url);

        let Some(html) = transport.get_page(&url).await else {
            return Ok(Vec::new());
        };
        tracing::debug!("Fetched AutoTrader results: {} bytes", html.len());

        Ok(self.parse_page(&html))
    }
}
