use crate::http_client::FetchTransport;
use crate::models::{CarDetection, CarListing};
use anyhow::Result;
use async_trait::async_trait;

/// Trait that all listing-source clients must implement.
///
/// A source client knows how to turn a detection into a site-specific
/// search URL and how to parse that site's result markup. New sources are
/// added by implementing this trait, not by touching the orchestrator.
#[async_trait]
pub trait SourceClient: Send + Sync {
    /// Source identifier stamped onto every listing (e.g. "autotrader")
    fn name(&self) -> &str;

    /// Builds the site-specific search URL for a detection
    fn build_search_url(&self, detection: &CarDetection) -> String;

    /// Fetches the search page through the shared transport and parses it.
    ///
    /// A failed fetch is a normal "no results" outcome (empty vec); an Err
    /// is reserved for unexpected trouble and is absorbed per-source by
    /// the orchestrator.
    async fn scrape(
        &self,
        transport: &FetchTransport,
        detection: &CarDetection,
    ) -> Result<Vec<CarListing>>;
}
