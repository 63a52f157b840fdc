use serde::{Deserialize, Serialize};

use super::factors::{
    default_emission_factor, DEFAULT_AI_KG_CO2_PER_HOUR, DEFAULT_AI_WEIGHT,
    DEFAULT_GADGET_PENALTY, DEFAULT_PER_DEVICE_KWH_PER_HOUR,
};
use crate::inputs::TravelMode;

/// Tunable constants for the footprint and eco score.
///
/// Every key is optional; a missing key falls back to the built-in default.
///
/// Example YAML:
/// ```yaml
/// scoring:
///   per_device_kwh_per_hour: 0.12
///   gadget_penalty: 3
///   emission_factors:
///     bus: 0.05
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ScoringConfig {
    /// kWh drawn per device per hour of screen time (default: 0.10)
    #[serde(default)]
    pub per_device_kwh_per_hour: Option<f64>,

    /// kg CO2 per hour of AI model usage (default: 20)
    #[serde(default)]
    pub ai_kg_co2_per_hour: Option<f64>,

    /// Weight of AI emissions in the eco score (default: 0.2)
    #[serde(default)]
    pub ai_weight: Option<f64>,

    /// Eco score points lost per discarded gadget (default: 2)
    #[serde(default)]
    pub gadget_penalty: Option<f64>,

    /// Per-mode commute emission factors in kg CO2 per km
    #[serde(default)]
    pub emission_factors: Option<EmissionFactors>,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            per_device_kwh_per_hour: Some(DEFAULT_PER_DEVICE_KWH_PER_HOUR),
            ai_kg_co2_per_hour: Some(DEFAULT_AI_KG_CO2_PER_HOUR),
            ai_weight: Some(DEFAULT_AI_WEIGHT),
            gadget_penalty: Some(DEFAULT_GADGET_PENALTY),
            emission_factors: Some(EmissionFactors::default()),
        }
    }
}

impl ScoringConfig {
    pub fn per_device_kwh_per_hour(&self) -> f64 {
        self.per_device_kwh_per_hour
            .unwrap_or(DEFAULT_PER_DEVICE_KWH_PER_HOUR)
    }

    pub fn ai_kg_co2_per_hour(&self) -> f64 {
        self.ai_kg_co2_per_hour.unwrap_or(DEFAULT_AI_KG_CO2_PER_HOUR)
    }

    pub fn ai_weight(&self) -> f64 {
        self.ai_weight.unwrap_or(DEFAULT_AI_WEIGHT)
    }

    pub fn gadget_penalty(&self) -> f64 {
        self.gadget_penalty.unwrap_or(DEFAULT_GADGET_PENALTY)
    }

    pub fn emission_factor(&self, mode: TravelMode) -> f64 {
        self.emission_factors
            .as_ref()
            .and_then(|factors| factors.get(mode))
            .unwrap_or_else(|| default_emission_factor(mode))
    }
}

/// Emission factor overrides, kg CO2 per km.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct EmissionFactors {
    #[serde(default)]
    pub walk: Option<f64>,
    #[serde(default)]
    pub cycle: Option<f64>,
    #[serde(default)]
    pub bus: Option<f64>,
    #[serde(default)]
    pub petrol_bike: Option<f64>,
    #[serde(default)]
    pub electric_scooter: Option<f64>,
}

impl Default for EmissionFactors {
    fn default() -> Self {
        Self {
            walk: Some(default_emission_factor(TravelMode::Walk)),
            cycle: Some(default_emission_factor(TravelMode::Cycle)),
            bus: Some(default_emission_factor(TravelMode::Bus)),
            petrol_bike: Some(default_emission_factor(TravelMode::PetrolBike)),
            electric_scooter: Some(default_emission_factor(TravelMode::ElectricScooter)),
        }
    }
}

impl EmissionFactors {
    pub fn get(&self, mode: TravelMode) -> Option<f64> {
        match mode {
            TravelMode::Walk => self.walk,
            TravelMode::Cycle => self.cycle,
            TravelMode::Bus => self.bus,
            TravelMode::PetrolBike => self.petrol_bike,
            TravelMode::ElectricScooter => self.electric_scooter,
        }
    }

    /// Config key for a mode, used in validation messages.
    pub fn key(mode: TravelMode) -> &'static str {
        match mode {
            TravelMode::Walk => "walk",
            TravelMode::Cycle => "cycle",
            TravelMode::Bus => "bus",
            TravelMode::PetrolBike => "petrol_bike",
            TravelMode::ElectricScooter => "electric_scooter",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_scoring_config() {
        let config = ScoringConfig::default();

        assert_eq!(config.per_device_kwh_per_hour, Some(0.10));
        assert_eq!(config.ai_kg_co2_per_hour, Some(20.0));
        assert_eq!(config.ai_weight, Some(0.2));
        assert_eq!(config.gadget_penalty, Some(2.0));
        assert!(config.emission_factors.is_some());
    }

    #[test]
    fn test_scoring_config_serde_roundtrip() {
        let config = ScoringConfig::default();
        let yaml = serde_saphyr::to_string(&config).unwrap();
        let parsed: ScoringConfig = serde_saphyr::from_str(&yaml).unwrap();
        assert_eq!(config, parsed);
    }

    #[test]
    fn test_partial_scoring_config_parse() {
        let yaml = r#"
per_device_kwh_per_hour: 0.12
gadget_penalty: 3
"#;
        let config: ScoringConfig = serde_saphyr::from_str(yaml).unwrap();
        assert_eq!(config.per_device_kwh_per_hour(), 0.12);
        assert_eq!(config.gadget_penalty(), 3.0);
        // Missing keys fall back to defaults
        assert_eq!(config.ai_kg_co2_per_hour(), 20.0);
        assert_eq!(config.ai_weight(), 0.2);
        assert_eq!(config.emission_factor(TravelMode::Bus), 0.08);
    }

    #[test]
    fn test_partial_emission_factors() {
        let yaml = r#"
emission_factors:
  bus: 0.05
"#;
        let config: ScoringConfig = serde_saphyr::from_str(yaml).unwrap();
        assert_eq!(config.emission_factor(TravelMode::Bus), 0.05);
        assert_eq!(config.emission_factor(TravelMode::PetrolBike), 0.10);
        assert_eq!(config.emission_factor(TravelMode::Walk), 0.0);
    }

    #[test]
    fn test_empty_scoring_config_parse() {
        let config: ScoringConfig = serde_saphyr::from_str("{}").unwrap();
        assert!(config.per_device_kwh_per_hour.is_none());
        assert!(config.emission_factors.is_none());
        assert_eq!(config.per_device_kwh_per_hour(), 0.10);
    }

    #[test]
    fn test_unknown_key_rejected() {
        let yaml = "gadget_penalti: 3\n";
        let result: Result<ScoringConfig, _> = serde_saphyr::from_str(yaml);
        assert!(result.is_err());
    }
}
