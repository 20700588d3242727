//! City autocomplete suggestion

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CitySuggestion {
    /// `"{latitude}_{longitude}"`
    pub id: String,
    pub name: String,
    pub country: String,
    pub country_code: String,
    pub admin1: Option<String>,
    pub admin2: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub timezone: Option<String>,
    /// `"{name}, {admin1}, {country}"`, admin1 omitted when absent
    pub display_name: String,
    pub population: u64,
}

impl CitySuggestion {
    #[must_use]
    pub fn make_id(latitude: f64, longitude: f64) -> String {
        format!("{latitude}_{longitude}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_make_id() {
        assert_eq!(CitySuggestion::make_id(51.50853, -0.12574), "51.50853_-0.12574");
        assert_eq!(CitySuggestion::make_id(10.0, 20.5), "10_20.5");
    }
}
