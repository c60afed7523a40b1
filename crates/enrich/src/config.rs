use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::normalize::KeywordSet;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Tunable thresholds and keyword lists.
///
/// Every key is optional; missing keys fall back to the defaults below and
/// unknown keys are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnrichConfig {
    /// Upper bound (inclusive) of the "petite" / "small" band.
    pub threshold_small_max: u32,
    /// Upper bound (inclusive) of the "intermediaire" / "medium" band.
    pub threshold_medium_max: u32,
    #[serde(alias = "threshold_boutique_max")]
    pub threshold_boutique_max_rooms: u32,
    pub threshold_boutique_min_stars: f64,
    #[serde(alias = "threshold_large_rooms_min")]
    pub threshold_large_min_rooms: u32,
    #[serde(alias = "threshold_large_capacity_min")]
    pub threshold_large_min_capacity: u32,

    pub restaurant_keywords: KeywordSet,
    pub spa_keywords: KeywordSet,
    pub urban_keywords: KeywordSet,
    pub leisure_keywords: KeywordSet,
    pub leisure_type_keywords: KeywordSet,

    /// Postal-code sub-ranges that split Corsica into 2A / 2B.
    pub corsica_ranges: Vec<CorsicaRange>,
}

impl Default for EnrichConfig {
    fn default() -> Self {
        Self {
            threshold_small_max: 30,
            threshold_medium_max: 80,
            threshold_boutique_max_rooms: 25,
            threshold_boutique_min_stars: 3.0,
            threshold_large_min_rooms: 80,
            threshold_large_min_capacity: 160,
            restaurant_keywords: KeywordSet::new([
                "restaurant",
                "bistro",
                "brasserie",
                "auberge",
                "rotisserie",
                "grill",
                "gastronom",
                "table d'hote",
            ]),
            spa_keywords: KeywordSet::new([
                "spa", "thermal", "thermes", "wellness", "bien-etre", "balneo", "hammam",
            ]),
            urban_keywords: KeywordSet::new([
                "aeroport",
                "airport",
                "gare",
                "centre ville",
                "centre-ville",
                "city",
            ]),
            leisure_keywords: KeywordSet::new([
                "plage", "mer", "montagne", "ski", "lac", "golf", "domaine", "resort",
            ]),
            leisure_type_keywords: KeywordSet::new(["camping", "residence", "village"]),
            corsica_ranges: default_corsica_ranges(),
        }
    }
}

// ---------------------------------------------------------------------------
// Corsica
// ---------------------------------------------------------------------------

/// Inclusive range of 5-digit postal codes mapped to one Corsican department.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorsicaRange {
    pub from: u32,
    pub to: u32,
    pub department: String,
}

impl CorsicaRange {
    pub fn contains(&self, code: u32) -> bool {
        (self.from..=self.to).contains(&code)
    }
}

fn default_corsica_ranges() -> Vec<CorsicaRange> {
    vec![
        CorsicaRange {
            from: 20000,
            to: 20199,
            department: "2A".into(),
        },
        CorsicaRange {
            from: 20200,
            to: 20699,
            department: "2B".into(),
        },
    ]
}

// ---------------------------------------------------------------------------
// Parse + Validate
// ---------------------------------------------------------------------------

impl EnrichConfig {
    pub fn from_yaml(input: &str) -> Result<Self, ConfigError> {
        // An empty (or comment-only) document means "all defaults".
        if input.trim().is_empty() {
            return Ok(Self::default());
        }
        let value: serde_yaml::Value = serde_yaml::from_str(input)?;
        if value.is_null() {
            return Ok(Self::default());
        }
        let config: EnrichConfig = serde_yaml::from_value(value)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml(input: &str) -> Result<Self, ConfigError> {
        let config: EnrichConfig = toml::from_str(input)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from disk; `.toml` is parsed as TOML, anything else as YAML.
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let input = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let is_toml = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("toml"));
        let config = if is_toml {
            Self::from_toml(&input)?
        } else {
            Self::from_yaml(&input)?
        };
        tracing::info!(path = %path.display(), "config loaded");
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.threshold_small_max >= self.threshold_medium_max {
            return Err(ConfigError::Validation(format!(
                "threshold_small_max ({}) must be below threshold_medium_max ({})",
                self.threshold_small_max, self.threshold_medium_max
            )));
        }

        if !self.threshold_boutique_min_stars.is_finite() {
            return Err(ConfigError::Validation(
                "threshold_boutique_min_stars must be a finite number".into(),
            ));
        }

        for range in &self.corsica_ranges {
            if range.from > range.to {
                return Err(ConfigError::Validation(format!(
                    "corsica range {}-{} is reversed",
                    range.from, range.to
                )));
            }
            if range.department != "2A" && range.department != "2B" {
                return Err(ConfigError::Validation(format!(
                    "corsica range {}-{}: department must be 2A or 2B, got '{}'",
                    range.from, range.to, range.department
                )));
            }
        }

        Ok(())
    }

    /// Keyword lists under their config key names, in matching order.
    pub fn keyword_lists(&self) -> [(&'static str, &KeywordSet); 5] {
        [
            ("restaurant_keywords", &self.restaurant_keywords),
            ("spa_keywords", &self.spa_keywords),
            ("urban_keywords", &self.urban_keywords),
            ("leisure_keywords", &self.leisure_keywords),
            ("leisure_type_keywords", &self.leisure_type_keywords),
        ]
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const ORIGINAL_YAML: &str = r#"
threshold_small_max: 20
threshold_medium_max: 60
threshold_boutique_max: 30
threshold_large_rooms_min: 100
threshold_large_capacity_min: 200
restaurant_keywords:
  - Restaurant
  - Bistrot
spa_keywords: ["Spa", "Thalasso"]
"#;

    #[test]
    fn defaults_when_empty() {
        let config = EnrichConfig::from_yaml("").unwrap();
        assert_eq!(config.threshold_small_max, 30);
        assert_eq!(config.threshold_medium_max, 80);
        assert_eq!(config.threshold_boutique_max_rooms, 25);
        assert_eq!(config.threshold_boutique_min_stars, 3.0);
        assert_eq!(config.threshold_large_min_rooms, 80);
        assert_eq!(config.threshold_large_min_capacity, 160);
        assert_eq!(config.corsica_ranges.len(), 2);
        assert!(config.leisure_type_keywords.matches("camping"));
    }

    #[test]
    fn original_key_spellings_are_aliases() {
        let config = EnrichConfig::from_yaml(ORIGINAL_YAML).unwrap();
        assert_eq!(config.threshold_small_max, 20);
        assert_eq!(config.threshold_medium_max, 60);
        assert_eq!(config.threshold_boutique_max_rooms, 30);
        assert_eq!(config.threshold_large_min_rooms, 100);
        assert_eq!(config.threshold_large_min_capacity, 200);
        // keywords normalized at load
        assert_eq!(
            config.restaurant_keywords.iter().collect::<Vec<_>>(),
            vec!["restaurant", "bistrot"]
        );
        // untouched keys keep defaults
        assert!(config.urban_keywords.matches("gare"));
    }

    #[test]
    fn keyword_lists_report_deduplicated_sizes() {
        let config = EnrichConfig::from_yaml("spa_keywords: [Spa, SPA, Thalasso]\nurban_keywords: []\n").unwrap();
        let sizes: Vec<(&str, usize)> = config
            .keyword_lists()
            .iter()
            .map(|(name, set)| (*name, set.len()))
            .collect();
        assert_eq!(sizes[1], ("spa_keywords", 2));
        assert_eq!(sizes[2], ("urban_keywords", 0));
        assert_eq!(sizes[4], ("leisure_type_keywords", 3));
        let empty: Vec<&str> = config
            .keyword_lists()
            .iter()
            .filter(|(_, set)| set.is_empty())
            .map(|(name, _)| *name)
            .collect();
        assert_eq!(empty, vec!["urban_keywords"]);
    }

    #[test]
    fn unknown_keys_ignored() {
        let config = EnrichConfig::from_yaml("colour: blue\nthreshold_small_max: 10\n").unwrap();
        assert_eq!(config.threshold_small_max, 10);
    }

    #[test]
    fn malformed_yaml_is_config_error() {
        let err = EnrichConfig::from_yaml("threshold_small_max: [unclosed").unwrap_err();
        assert!(matches!(err, ConfigError::Yaml(_)));
    }

    #[test]
    fn wrong_type_is_config_error() {
        let err = EnrichConfig::from_yaml("threshold_small_max: lots").unwrap_err();
        assert!(matches!(err, ConfigError::Yaml(_)));
    }

    #[test]
    fn reject_inverted_size_thresholds() {
        let err = EnrichConfig::from_yaml("threshold_small_max: 90\n").unwrap_err();
        assert!(err.to_string().contains("threshold_small_max (90)"));
    }

    #[test]
    fn reject_bad_corsica_department() {
        let input = r#"
corsica_ranges:
  - { from: 20000, to: 20199, department: "2C" }
"#;
        let err = EnrichConfig::from_yaml(input).unwrap_err();
        assert!(err.to_string().contains("2A or 2B"));
    }

    #[test]
    fn parse_toml() {
        let input = r#"
threshold_small_max = 15
leisure_keywords = ["Plage", "Océan"]

[[corsica_ranges]]
from = 20000
to = 20190
department = "2A"
"#;
        let config = EnrichConfig::from_toml(input).unwrap();
        assert_eq!(config.threshold_small_max, 15);
        assert!(config.leisure_keywords.matches("ocean"));
        assert_eq!(config.corsica_ranges.len(), 1);
        assert_eq!(config.corsica_ranges[0].to, 20190);
    }

    #[test]
    fn from_path_dispatches_on_extension() {
        let dir = tempfile::tempdir().unwrap();
        let yaml = dir.path().join("config.yaml");
        std::fs::write(&yaml, "threshold_small_max: 12\n").unwrap();
        let toml_path = dir.path().join("config.toml");
        std::fs::write(&toml_path, "threshold_small_max = 13\n").unwrap();

        assert_eq!(EnrichConfig::from_path(&yaml).unwrap().threshold_small_max, 12);
        assert_eq!(EnrichConfig::from_path(&toml_path).unwrap().threshold_small_max, 13);

        let missing = dir.path().join("nope.yaml");
        assert!(matches!(
            EnrichConfig::from_path(&missing),
            Err(ConfigError::Read { .. })
        ));
    }
}
