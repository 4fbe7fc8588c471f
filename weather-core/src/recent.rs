//! Bounded, most-recent-first list of searched cities.

/// Maximum number of cities kept.
pub const MAX_RECENT: usize = 5;

/// Moves `city` to the front of `current`, dropping any earlier occurrence and
/// keeping at most [`MAX_RECENT`] entries.
///
/// Matching is exact on the raw query string: "paris" and "Paris" are distinct.
pub fn record(current: &[String], city: &str) -> Vec<String> {
    std::iter::once(city.to_owned())
        .chain(current.iter().filter(|c| c.as_str() != city).cloned())
        .take(MAX_RECENT)
        .collect()
}

/// Session-scoped recent searches. Lives in memory only.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecentCities {
    cities: Vec<String>,
}

impl RecentCities {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, city: &str) {
        self.cities = record(&self.cities, city);
    }

    pub fn as_slice(&self) -> &[String] {
        &self.cities
    }

    pub fn is_empty(&self) -> bool {
        self.cities.is_empty()
    }

    pub fn len(&self) -> usize {
        self.cities.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.cities.iter().map(String::as_str)
    }
}
