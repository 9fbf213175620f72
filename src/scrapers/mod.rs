pub mod autotrader;
pub mod carsdotcom;

pub use autotrader::AutoTraderScraper;
pub use carsdotcom::CarsComScraper;
