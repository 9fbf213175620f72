use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single vehicle recognized by the vision pipeline. Used as the
/// query key for all listing searches.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CarDetection {
    pub make: String,
    pub model: String,
    pub year: Option<i32>,
    pub body_type: Option<String>,
    pub confidence: f32,
    pub color: Option<String>,
}

impl CarDetection {
    /// Human-readable query string, used for logging and result summaries.
    pub fn query_string(&self) -> String {
        match self.year {
            Some(year) => format!("{} {} {}", year, self.make, self.model),
            None => format!("{} {}", self.make, self.model),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CarListing {
    pub title: String,
    pub price: Option<String>,
    pub year: Option<i32>,
    pub make: String,
    pub model: String,
    pub mileage: Option<String>,
    pub location: Option<String>,
    pub dealer: Option<String>,
    pub image_url: Option<String>,
    pub listing_url: String,
    pub source: String,
    pub scraped_at: DateTime<Utc>,
    /// Reserved for a future image-similarity ranking pass. Always None
    /// when produced by the scrapers.
    pub similarity_score: Option<f64>,
}

impl CarListing {
    /// Synthetic placeholder records carry source = "demo" so consumers
    /// can filter them out.
    pub fn is_demo(&self) -> bool {
        self.source == "demo"
    }
}

/// Aggregate view of one search, as serialized to downstream consumers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResults {
    pub query: String,
    pub total_results: usize,
    pub listings: Vec<CarListing>,
    pub sources_used: Vec<String>,
}

impl SearchResults {
    pub fn new(detection: &CarDetection, listings: Vec<CarListing>) -> Self {
        let mut sources_used: Vec<String> = Vec::new();
        for listing in &listings {
            if !sources_used.contains(&listing.source) {
                sources_used.push(listing.source.clone());
            }
        }

        Self {
            query: detection.query_string(),
            total_results: listings.len(),
            listings,
            sources_used,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing(source: &str) -> CarListing {
        CarListing {
            title: "2020 Toyota Camry LE".to_string(),
            price: Some("$15,999".to_string()),
            year: Some(2020),
            make: "Toyota".to_string(),
            model: "Camry".to_string(),
            mileage: None,
            location: None,
            dealer: None,
            image_url: None,
            listing_url: "https://example.com/listing/1".to_string(),
            source: source.to_string(),
            scraped_at: Utc::now(),
            similarity_score: None,
        }
    }

    #[test]
    fn query_string_includes_year_when_present() {
        let detection = CarDetection {
            make: "Toyota".to_string(),
            model: "Camry".to_string(),
            year: Some(2020),
            body_type: None,
            confidence: 0.9,
            color: None,
        };
        assert_eq!(detection.query_string(), "2020 Toyota Camry");

        let no_year = CarDetection { year: None, ..detection };
        assert_eq!(no_year.query_string(), "Toyota Camry");
    }

    #[test]
    fn search_results_dedups_sources_in_order() {
        let detection = CarDetection {
            make: "Honda".to_string(),
            model: "Accord".to_string(),
            year: None,
            body_type: None,
            confidence: 1.0,
            color: None,
        };
        let results = SearchResults::new(
            &detection,
            vec![listing("autotrader"), listing("cars.com"), listing("autotrader")],
        );

        assert_eq!(results.total_results, 3);
        assert_eq!(results.sources_used, vec!["autotrader", "cars.com"]);
    }

    #[test]
    fn demo_listings_are_identifiable() {
        assert!(listing("demo").is_demo());
        assert!(!listing("autotrader").is_demo());
    }
}
