use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::types::payload::is_valid_path;

/// A policy configuration that cannot be loaded.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read policy config: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid policy config document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid policy config value for '{key}': {reason}")]
    Invalid { key: &'static str, reason: String },
}

/// Field paths and thresholds used by the built-in policies.
///
/// Every key is optional in the JSON form; unknown keys are rejected.
///
/// ```
/// use farerule::policy::PolicyConfig;
///
/// let config = PolicyConfig::from_json(r#"{"luxury_hotel_tier": 4}"#).unwrap();
/// assert_eq!(config.luxury_hotel_tier, 4.0);
/// assert_eq!(config.selected_price_field, "price");
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PolicyConfig {
    pub selected_price_field: String,
    /// Array of flight candidates compared by `not_cheapest_direct`.
    pub candidates_field: String,
    /// Price key inside each candidate.
    pub candidate_price_field: String,
    /// Amount the selected price may differ from the cheapest direct fare by.
    pub price_tolerance: f64,

    pub traveler_class_field: String,
    pub junior_class: String,
    pub hotel_tier_field: String,
    pub luxury_hotel_tier: f64,

    pub cabin_class_field: String,
    /// Cabin classes that need a long-haul flight or manager approval.
    pub premium_cabins: Vec<String>,
    pub flight_duration_field: String,
    pub min_business_class_hours: f64,
    pub manager_approval_field: String,

    pub max_discount_percent: f64,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            selected_price_field: "price".to_owned(),
            candidates_field: "flight_options".to_owned(),
            candidate_price_field: "price".to_owned(),
            price_tolerance: 0.0,
            traveler_class_field: "traveler.age_class".to_owned(),
            junior_class: "junior".to_owned(),
            hotel_tier_field: "hotel.star_rating".to_owned(),
            luxury_hotel_tier: 5.0,
            cabin_class_field: "cabin_class".to_owned(),
            premium_cabins: vec!["business".to_owned(), "first".to_owned()],
            flight_duration_field: "flight_duration_hours".to_owned(),
            min_business_class_hours: 6.0,
            manager_approval_field: "manager_approval".to_owned(),
            max_discount_percent: 50.0,
        }
    }
}

impl PolicyConfig {
    /// Load and validate a config from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] on I/O failure, malformed JSON, unknown keys
    /// or out-of-range values.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    /// Load and validate a config from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] on malformed JSON, unknown keys or
    /// out-of-range values.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first offending key.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let paths = [
            ("selected_price_field", &self.selected_price_field),
            ("candidates_field", &self.candidates_field),
            ("candidate_price_field", &self.candidate_price_field),
            ("traveler_class_field", &self.traveler_class_field),
            ("hotel_tier_field", &self.hotel_tier_field),
            ("cabin_class_field", &self.cabin_class_field),
            ("flight_duration_field", &self.flight_duration_field),
            ("manager_approval_field", &self.manager_approval_field),
        ];
        for (key, path) in paths {
            if !is_valid_path(path) {
                return Err(invalid(key, format!("'{path}' is not a field path")));
            }
        }

        let amounts = [
            ("price_tolerance", self.price_tolerance),
            ("luxury_hotel_tier", self.luxury_hotel_tier),
            ("min_business_class_hours", self.min_business_class_hours),
            ("max_discount_percent", self.max_discount_percent),
        ];
        for (key, amount) in amounts {
            if !amount.is_finite() || amount < 0.0 {
                return Err(invalid(key, format!("{amount} must be a non-negative number")));
            }
        }
        if self.max_discount_percent > 100.0 {
            return Err(invalid(
                "max_discount_percent",
                format!("{} exceeds 100", self.max_discount_percent),
            ));
        }
        Ok(())
    }
}

fn invalid(key: &'static str, reason: String) -> ConfigError {
    ConfigError::Invalid { key, reason }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_gives_defaults() {
        let config = PolicyConfig::from_json("{}").unwrap();
        assert_eq!(config, PolicyConfig::default());
        assert_eq!(config.hotel_tier_field, "hotel.star_rating");
        assert_eq!(config.min_business_class_hours, 6.0);
    }

    #[test]
    fn partial_override() {
        let config = PolicyConfig::from_json(
            r#"{"candidates_field": "search.results", "price_tolerance": 5}"#,
        )
        .unwrap();
        assert_eq!(config.candidates_field, "search.results");
        assert_eq!(config.price_tolerance, 5.0);
        assert_eq!(config.max_discount_percent, 50.0);
    }

    #[test]
    fn unknown_key_is_rejected() {
        let err = PolicyConfig::from_json(r#"{"luxury_tier": 4}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Json(_)));
        assert!(err.to_string().contains("luxury_tier"));
    }

    #[test]
    fn out_of_range_values_are_rejected() {
        let err = PolicyConfig::from_json(r#"{"max_discount_percent": 120}"#).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                key: "max_discount_percent",
                ..
            }
        ));

        let err = PolicyConfig::from_json(r#"{"price_tolerance": -1}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "price_tolerance", .. }));
    }

    #[test]
    fn bad_field_path_is_rejected() {
        let err = PolicyConfig::from_json(r#"{"hotel_tier_field": "hotel..stars"}"#).unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid policy config value for 'hotel_tier_field': 'hotel..stars' is not a field path"
        );
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = PolicyConfig::from_file("/nonexistent/farerule/policy.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
