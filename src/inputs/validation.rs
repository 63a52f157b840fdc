use thiserror::Error;

use super::types::{DailyInputs, FootprintInputs};

pub const MAX_PLASTIC_WASTE_GRAMS: f64 = 500.0;
pub const MAX_ELECTRICITY_KWH: f64 = 20.0;
pub const MAX_SCREEN_TIME_HOURS: f64 = 15.0;
pub const MAX_WATER_USED_LITRES: f64 = 500.0;
pub const MAX_COMMUTE_DISTANCE_KM: f64 = 200.0;
pub const MAX_DEVICE_COUNT: u32 = 20;
pub const MAX_AI_USAGE_HOURS: f64 = 24.0;
pub const MAX_DISCARDED_GADGETS: u32 = 50;
pub const MAX_TREE_AGE_YEARS: f64 = 200.0;

#[derive(Debug, Error, PartialEq)]
pub enum InputError {
    #[error("invalid input: {}", .0.join("; "))]
    OutOfDomain(Vec<String>),
}

fn check_range(errors: &mut Vec<String>, field: &str, value: f64, min: f64, max: f64) {
    if !value.is_finite() {
        errors.push(format!("{}: must be a finite number", field));
    } else if value < min || value > max {
        errors.push(format!(
            "{}: {} is outside the allowed range {}-{}",
            field, value, min, max
        ));
    }
}

/// Check every field against its domain.
/// Returns all violations at once (not just the first).
pub fn validate_inputs(inputs: &DailyInputs) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    check_range(
        &mut errors,
        "plastic_waste_grams",
        inputs.plastic_waste_grams,
        0.0,
        MAX_PLASTIC_WASTE_GRAMS,
    );
    check_range(
        &mut errors,
        "electricity_kwh",
        inputs.electricity_kwh,
        0.0,
        MAX_ELECTRICITY_KWH,
    );
    check_range(
        &mut errors,
        "screen_time_hours",
        inputs.screen_time_hours,
        0.0,
        MAX_SCREEN_TIME_HOURS,
    );
    check_range(
        &mut errors,
        "water_used_litres",
        inputs.water_used_litres,
        0.0,
        MAX_WATER_USED_LITRES,
    );

    if let Some(ref footprint) = inputs.footprint {
        validate_footprint(footprint, &mut errors);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_footprint(footprint: &FootprintInputs, errors: &mut Vec<String>) {
    check_range(
        errors,
        "commute_distance_km",
        footprint.commute_distance_km,
        0.0,
        MAX_COMMUTE_DISTANCE_KM,
    );
    if footprint.device_count == 0 || footprint.device_count > MAX_DEVICE_COUNT {
        errors.push(format!(
            "device_count: {} is outside the allowed range 1-{}",
            footprint.device_count, MAX_DEVICE_COUNT
        ));
    }
    check_range(
        errors,
        "ai_model_usage_hours",
        footprint.ai_model_usage_hours,
        0.0,
        MAX_AI_USAGE_HOURS,
    );
    if footprint.discarded_gadgets > MAX_DISCARDED_GADGETS {
        errors.push(format!(
            "discarded_gadgets: {} is outside the allowed range 0-{}",
            footprint.discarded_gadgets, MAX_DISCARDED_GADGETS
        ));
    }
}

/// Tree age must be strictly positive: the sequestration power law is
/// undefined for negative ages.
pub fn validate_tree_age(age_years: f64) -> Result<(), String> {
    if !age_years.is_finite() {
        return Err("age_years: must be a finite number".to_string());
    }
    if age_years <= 0.0 || age_years > MAX_TREE_AGE_YEARS {
        return Err(format!(
            "age_years: {} is outside the allowed range (0, {}]",
            age_years, MAX_TREE_AGE_YEARS
        ));
    }
    Ok(())
}

impl DailyInputs {
    /// Consume the inputs, handing them back only if every field is in domain.
    pub fn validated(self) -> Result<Self, InputError> {
        validate_inputs(&self).map_err(InputError::OutOfDomain)?;
        Ok(self)
    }
}
