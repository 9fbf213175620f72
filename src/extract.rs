//! Text-extraction helpers shared across source clients.
//!
//! Listing sites expose loosely structured markup, so everything here is
//! best-effort: bad input degrades to None or "Unknown", never an error.

use scraper::{ElementRef, Selector};

/// Extract a currency-formatted price from free text (e.g., "$15,999 OBO")
pub fn parse_price(price_text: &str) -> Option<String> {
    if price_text.is_empty() {
        return None;
    }

    let compact = price_text.replace(' ', "");
    let price_regex = regex::Regex::new(r"\$\d[\d,]*").ok()?;
    price_regex
        .find(&compact)
        .map(|m| m.as_str().to_string())
}

/// Extract a mileage token from free text (e.g., "45,000 miles", "50K")
pub fn parse_mileage(mileage_text: &str) -> Option<String> {
    if mileage_text.is_empty() {
        return None;
    }

    let mileage_regex = regex::Regex::new(r"\d[\d,]*[kK]?(\s*miles?)?").ok()?;
    mileage_regex
        .find(mileage_text)
        .map(|m| m.as_str().trim().to_string())
}

/// Guess make and model from a listing title by token position.
///
/// `skip` is the number of leading tokens before the make ("2020 Toyota
/// Camry LE" needs skip = 1, "Toyota Camry LE" needs skip = 0). Titles are
/// unstructured, so this is intentionally approximate.
pub fn make_model_from_title(title: &str, skip: usize) -> (String, String) {
    let words: Vec<&str> = title.split_whitespace().collect();
    if words.len() < 2 {
        return ("Unknown".to_string(), "Unknown".to_string());
    }

    let make = words.get(skip).copied().unwrap_or("Unknown");
    let model = words.get(skip + 1).copied().unwrap_or("Unknown");
    (make.to_string(), model.to_string())
}

/// Text of the first sub-element matching any of the given selectors.
///
/// Selectors are tried in order; a missing field returns None rather
/// than failing the element.
pub fn select_text(element: &ElementRef, selectors: &[&str]) -> Option<String> {
    selectors.iter().find_map(|sel_str| {
        Selector::parse(sel_str).ok()
            .and_then(|sel| element.select(&sel).next())
            .map(|el| el.text().collect::<String>().trim().to_string())
            .filter(|text| !text.is_empty())
    })
}

/// Attribute value of the first sub-element matching any of the given selectors.
pub fn select_attr(element: &ElementRef, selectors: &[&str], attr: &str) -> Option<String> {
    selectors.iter().find_map(|sel_str| {
        Selector::parse(sel_str).ok()
            .and_then(|sel| element.select(&sel).next())
            .and_then(|el| el.value().attr(attr))
            .filter(|value| !value.is_empty())
            .map(|value| value.to_string())
    })
}

/// Resolve a possibly-relative link against a source's base URL.
pub fn resolve_url(base_url: &str, href: &str) -> String {
    if href.starts_with("http://") || href.starts_with("https://") {
        href.to_string()
    } else if href.starts_with('/') {
        format!("{}{}", base_url.trim_end_matches('/'), href)
    } else {
        format!("{}/{}", base_url.trim_end_matches('/'), href)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::Html;

    #[test]
    fn price_extracts_first_currency_token() {
        assert_eq!(parse_price("Price: $15,999 OBO"), Some("$15,999".to_string()));
        assert_eq!(parse_price("$22,500"), Some("$22,500".to_string()));
        assert_eq!(parse_price("Call for price"), None);
        assert_eq!(parse_price(""), None);
    }

    #[test]
    fn mileage_extracts_digit_groups() {
        let matched = parse_mileage("45,000 miles").expect("should match");
        assert!(matched.contains("45,000"));

        let k_suffix = parse_mileage("only 50K on the clock").expect("should match");
        assert!(k_suffix.contains("50K"));

        assert_eq!(parse_mileage(""), None);
        assert_eq!(parse_mileage("low mileage"), None);
    }

    #[test]
    fn parsers_are_idempotent() {
        let text = "Price: $15,999 OBO, 45,000 miles";
        assert_eq!(parse_price(text), parse_price(text));
        assert_eq!(parse_mileage(text), parse_mileage(text));
        assert_eq!(
            make_model_from_title("2020 Toyota Camry LE", 1),
            make_model_from_title("2020 Toyota Camry LE", 1)
        );
    }

    #[test]
    fn make_model_respects_token_offset() {
        assert_eq!(
            make_model_from_title("2020 Toyota Camry LE", 1),
            ("Toyota".to_string(), "Camry".to_string())
        );
        assert_eq!(
            make_model_from_title("Toyota Camry LE", 0),
            ("Toyota".to_string(), "Camry".to_string())
        );
        // Two tokens with an offset: model falls off the end
        assert_eq!(
            make_model_from_title("2020 Toyota", 1),
            ("Toyota".to_string(), "Unknown".to_string())
        );
    }

    #[test]
    fn make_model_degrades_on_short_titles() {
        assert_eq!(
            make_model_from_title("Bargain", 1),
            ("Unknown".to_string(), "Unknown".to_string())
        );
        assert_eq!(
            make_model_from_title("Bargain", 0),
            ("Unknown".to_string(), "Unknown".to_string())
        );
        assert_eq!(
            make_model_from_title("", 0),
            ("Unknown".to_string(), "Unknown".to_string())
        );
    }

    #[test]
    fn select_text_tries_selectors_in_order() {
        let html = Html::parse_fragment(
            "<div><h3>2019 Honda Accord</h3><span class='price'>$18,750</span></div>",
        );
        let root = html.root_element();

        assert_eq!(
            select_text(&root, &["h2", "h3"]),
            Some("2019 Honda Accord".to_string())
        );
        assert_eq!(
            select_text(&root, &["span[class*='price']"]),
            Some("$18,750".to_string())
        );
        assert_eq!(select_text(&root, &["h4", ".missing"]), None);
    }

    #[test]
    fn select_attr_skips_empty_values() {
        let html = Html::parse_fragment(
            "<div><a href=''>bad</a><img src='/thumb.jpg'></div>",
        );
        let root = html.root_element();

        assert_eq!(select_attr(&root, &["a"], "href"), None);
        assert_eq!(
            select_attr(&root, &["img"], "src"),
            Some("/thumb.jpg".to_string())
        );
    }

    #[test]
    fn resolve_url_handles_relative_and_absolute() {
        assert_eq!(
            resolve_url("https://www.autotrader.com", "/cars-for-sale/123"),
            "https://www.autotrader.com/cars-for-sale/123"
        );
        assert_eq!(
            resolve_url("https://www.cars.com/", "vehicledetail/456"),
            "https://www.cars.com/vehicledetail/456"
        );
        assert_eq!(
            resolve_url("https://www.cars.com", "https://cdn.cars.com/a.jpg"),
            "https://cdn.cars.com/a.jpg"
        );
    }
}
