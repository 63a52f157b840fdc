use super::config::{EmissionFactors, ScoringConfig};
use crate::inputs::TravelMode;

fn check_constant(errors: &mut Vec<String>, key: &str, value: Option<f64>) {
    if let Some(value) = value {
        if !value.is_finite() {
            errors.push(format!("{}: must be a finite number", key));
        } else if value < 0.0 {
            errors.push(format!("{}: must be non-negative (got {})", key, value));
        }
    }
}

/// Validate scoring configuration at startup.
/// Returns all validation errors at once (not just the first).
pub fn validate_scoring(config: &ScoringConfig) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    check_constant(
        &mut errors,
        "scoring.per_device_kwh_per_hour",
        config.per_device_kwh_per_hour,
    );
    check_constant(
        &mut errors,
        "scoring.ai_kg_co2_per_hour",
        config.ai_kg_co2_per_hour,
    );
    check_constant(&mut errors, "scoring.ai_weight", config.ai_weight);
    check_constant(&mut errors, "scoring.gadget_penalty", config.gadget_penalty);

    if let Some(ref factors) = config.emission_factors {
        for mode in TravelMode::ALL {
            check_constant(
                &mut errors,
                &format!("scoring.emission_factors.{}", EmissionFactors::key(mode)),
                factors.get(mode),
            );
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
