//! Fixed constants and lookup tables behind the scoring formulas.

use crate::inputs::{TransportMode, TravelMode, TreeSpecies};

/// Every elemental score starts here before penalties and rewards.
pub const ELEMENT_BASELINE: f64 = 10.0;

/// Grams of plastic waste that cost one Earth point.
pub const WASTE_GRAMS_PER_POINT: f64 = 50.0;

/// Litres of water that cost one Water point.
pub const WATER_LITRES_PER_POINT: f64 = 50.0;

/// Kilowatt-hours that cost one Fire point.
pub const KWH_PER_POINT: f64 = 2.0;

pub const ECO_SCORE_MAX: f64 = 100.0;

pub const DEFAULT_PER_DEVICE_KWH_PER_HOUR: f64 = 0.10;
pub const DEFAULT_AI_KG_CO2_PER_HOUR: f64 = 20.0;
pub const DEFAULT_AI_WEIGHT: f64 = 0.2;
pub const DEFAULT_GADGET_PENALTY: f64 = 2.0;

/// Exponent of the age power law used for sequestration.
pub const SEQUESTRATION_EXPONENT: f64 = 1.2;

/// Air score for a transport mode: a lookup, not a continuous function.
pub fn air_score(mode: TransportMode) -> f64 {
    match mode {
        TransportMode::Walking | TransportMode::Cycling => 10.0,
        TransportMode::Bus => 5.0,
        TransportMode::Car | TransportMode::Bike => 3.0,
    }
}

/// Default kg of CO2 emitted per km travelled.
pub fn default_emission_factor(mode: TravelMode) -> f64 {
    match mode {
        TravelMode::Cycle | TravelMode::Walk => 0.0,
        TravelMode::Bus => 0.08,
        TravelMode::PetrolBike => 0.10,
        TravelMode::ElectricScooter => 0.02,
    }
}

/// kg of CO2 per year absorbed by a one-year-old tree of the species.
pub fn species_factor(species: TreeSpecies) -> f64 {
    match species {
        TreeSpecies::Banyan => 22.0,
        TreeSpecies::Neem => 18.0,
        TreeSpecies::IndianAlmond => 20.0,
        TreeSpecies::Peepal => 25.0,
    }
}
