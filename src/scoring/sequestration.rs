use super::factors::{species_factor, SEQUESTRATION_EXPONENT};
use crate::inputs::TreeSpecies;

/// Estimated kg of CO2 absorbed per year by a tree: `factor × age^1.2`.
///
/// Power law, no clamping. Callers keep `age_years` positive
/// (see `validate_tree_age`).
pub fn calculate_sequestration(species: TreeSpecies, age_years: f64) -> f64 {
    species_factor(species) * age_years.powf(SEQUESTRATION_EXPONENT)
}
