use serde::{Deserialize, Serialize};

use super::config::ScoringConfig;
use super::factors::ECO_SCORE_MAX;
use crate::inputs::{DailyInputs, FootprintInputs, TravelMode};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Footprint {
    pub commute_emissions_kg: f64,
    pub energy_consumed_kwh: f64,
    pub ai_emissions_kg: f64,
    /// 0-100, higher is better
    pub eco_score: f64,
}

pub fn commute_emissions(mode: TravelMode, distance_km: f64, config: &ScoringConfig) -> f64 {
    config.emission_factor(mode) * distance_km
}

pub fn device_energy(screen_time_hours: f64, device_count: u32, config: &ScoringConfig) -> f64 {
    screen_time_hours * device_count as f64 * config.per_device_kwh_per_hour()
}

pub fn ai_emissions(ai_model_usage_hours: f64, config: &ScoringConfig) -> f64 {
    ai_model_usage_hours * config.ai_kg_co2_per_hour()
}

/// Aggregate penalty score, clamped to [0, 100].
///
/// Unlike the elemental scores this one has a ceiling as well as a floor.
pub fn eco_score(
    commute_emissions_kg: f64,
    energy_consumed_kwh: f64,
    ai_emissions_kg: f64,
    discarded_gadgets: u32,
    config: &ScoringConfig,
) -> f64 {
    let penalty = commute_emissions_kg
        + energy_consumed_kwh
        + ai_emissions_kg * config.ai_weight()
        + discarded_gadgets as f64 * config.gadget_penalty();
    (ECO_SCORE_MAX - penalty).clamp(0.0, ECO_SCORE_MAX)
}

pub fn calculate_footprint(
    inputs: &DailyInputs,
    footprint: &FootprintInputs,
    config: &ScoringConfig,
) -> Footprint {
    let commute = commute_emissions(
        footprint.travel_mode,
        footprint.commute_distance_km,
        config,
    );
    let energy = device_energy(inputs.screen_time_hours, footprint.device_count, config);
    let ai = ai_emissions(footprint.ai_model_usage_hours, config);

    Footprint {
        commute_emissions_kg: commute,
        energy_consumed_kwh: energy,
        ai_emissions_kg: ai,
        eco_score: eco_score(commute, energy, ai, footprint.discarded_gadgets, config),
    }
}
