use crate::extract;
use crate::http_client::FetchTransport;
use crate::models::{CarDetection, CarListing};
use crate::scraper_trait::SourceClient;
use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use scraper::{ElementRef, Html, Selector};

const MAX_RESULTS_PER_SOURCE: usize = 10;

pub struct CarsComScraper {
    base_url: String,
    default_zip: String,
}

impl CarsComScraper {
    pub fn new(default_zip: &str) -> Self {
        Self {
            base_url: "https://www.cars.com".to_string(),
            default_zip: default_zip.to_string(),
        }
    }

    fn parse_page(&self, html: &str) -> Vec<CarListing> {
        let document = Html::parse_document(html);

        let possible_selectors = [
            "div[class*='vehicle-card']",
            "div[class*='listing']",
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
            tracing::debug!("No listing containers found on Cars.com results page");
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
                None => tracing::debug!("Skipping Cars.com element #{} - missing title or link", index + 1),
            }
        }

        listings
    }

    fn parse_listing(&self, element: &ElementRef) -> Option<CarListing> {
        let title = extract::select_text(element, &["h2", "a[class*='title']"])?;
        let href = extract::select_attr(element, &["a[href]"], "href")?;

        let price = extract::select_text(element, &["[class*='price']"])
            .and_then(|text| extract::parse_price(&text));

        // Cars.com titles start with the make, e.g. "Toyota Camry LE"
        let (make, model) = extract::make_model_from_title(&title, 0);

        Some(CarListing {
            title,
            price,
            year: None,
            make,
            model,
            mileage: None,
            location: None,
            dealer: None,
            image_url: None,
            listing_url: extract::resolve_url(&self.base_url, &href),
            source: "cars.com".to_string(),
            scraped_at: Utc::now(),
            similarity_score: None,
        })
    }
}

#[async_trait]
impl SourceClient for CarsComScraper {
    fn name(&self) -> &str {
        "cars.com"
    }

    fn build_search_url(&self, detection: &CarDetection) -> String {
        let mut params: Vec<(&str, String)> = vec![
            ("maximum_distance", "50".to_string()),
            ("page_size", "20".to_string()),
            ("sort", "best_match_desc".to_string()),
            ("stock_type", "all".to_string()),
            ("zip", self.default_zip.clone()),
        ];

        if detection.make != "Unknown" {
            params.push(("makes[]", detection.make.to_lowercase()));
        }

        let query = params
            .iter()
            .map(|(key, value)| format!("{}={}", urlencoding::encode(key), urlencoding::encode(value)))
            .collect::<Vec<_>>()
            .join("&");

        format!("{}/shopping/results/?{}", self.base_url, query)
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
        tracing::debug!("Fetched Cars.com results: {} bytes", html.len());

        Ok(self.parse_page(&html))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detection(make: &str, model: &str) -> CarDetection {
        CarDetection {
            make: make.to_string(),
            model: model.to_string(),
            year: None,
            body_type: None,
            confidence: 0.8,
            color: None,
        }
    }

    #[test]
    fn search_url_includes_lowercased_make() {
        let scraper = CarsComScraper::new("10001");
        let url = scraper.build_search_url(&detection("Toyota", "Camry"));

        assert!(url.starts_with("https://www.cars.com/shopping/results/?"));
        assert!(url.contains("makes%5B%5D=toyota"));
        assert!(url.contains("zip=10001"));
        assert!(url.contains("sort=best_match_desc"));
    }

    #[test]
    fn search_url_omits_unknown_make() {
        let scraper = CarsComScraper::new("10001");
        let url = scraper.build_search_url(&detection("Unknown", "Unknown"));
        assert!(!url.contains("makes"));
    }

    #[test]
    fn parses_vehicle_cards() {
        let scraper = CarsComScraper::new("10001");
        let html = r#"
            <html><body>
              <div class="vehicle-card">
                <h2>Honda Accord Sport</h2>
                <span class="primary-price">$18,750</span>
                <a href="/vehicledetail/456/">Details</a>
              </div>
              <div class="vehicle-card">
                <h2>No link here</h2>
              </div>
            </body></html>
        "#;

        let listings = scraper.parse_page(html);

        assert_eq!(listings.len(), 1);
        let listing = &listings[0];
        assert_eq!(listing.title, "Honda Accord Sport");
        assert_eq!(listing.price.as_deref(), Some("$18,750"));
        assert_eq!(listing.make, "Honda");
        assert_eq!(listing.model, "Accord");
        assert_eq!(listing.listing_url, "https://www.cars.com/vehicledetail/456/");
        assert_eq!(listing.source, "cars.com");
    }

    #[test]
    fn parse_handles_pages_without_containers() {
        let scraper = CarsComScraper::new("10001");
        assert!(scraper.parse_page("<html><body></body></html>").is_empty());
        assert!(scraper.parse_page("").is_empty());
    }
}
