//! Listing location (`?page=N`).
//!
//! The current page is kept in a `page` query parameter so a location can be
//! shared or restored. The buffer itself is never part of the location.

use std::fmt;

/// Where the listing is positioned
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListingLocation {
    pub page: usize,
}

impl ListingLocation {
    pub fn new(page: usize) -> Self {
        Self { page: page.max(1) }
    }

    /// Interpret a raw `page` parameter; missing, non-numeric or
    /// non-positive values mean page 1
    pub fn from_param(raw: Option<&str>) -> Self {
        let page = raw
            .and_then(|value| value.trim().parse::<i64>().ok())
            .filter(|page| *page > 0)
            .map(|page| usize::try_from(page).unwrap_or(usize::MAX))
            .unwrap_or(1);
        Self::new(page)
    }

    /// Parse a query string such as `?page=3&sort=name`
    pub fn parse(query: &str) -> Self {
        let query = query.trim_start_matches('?');
        let raw = query
            .split('&')
            .filter_map(|pair| pair.split_once('='))
            .find(|(key, _)| *key == "page")
            .map(|(_, value)| value);
        Self::from_param(raw)
    }
}

impl Default for ListingLocation {
    fn default() -> Self {
        Self::new(1)
    }
}

impl fmt::Display for ListingLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/?page={}", self.page)
    }
}
