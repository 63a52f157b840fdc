use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lowercase and drop separators so "Petrol Bike", "petrol-bike" and
/// "PETROL_BIKE" all compare equal.
fn normalize(s: &str) -> String {
    s.chars()
        .filter(|c| !matches!(c, ' ' | '-' | '_'))
        .flat_map(char::to_lowercase)
        .collect()
}

/// How the day's main trip was made. Drives the Air score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransportMode {
    Walking,
    Cycling,
    Bus,
    Car,
    Bike,
}

impl TransportMode {
    pub const ALL: [TransportMode; 5] = [
        TransportMode::Walking,
        TransportMode::Cycling,
        TransportMode::Bus,
        TransportMode::Car,
        TransportMode::Bike,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            TransportMode::Walking => "Walking",
            TransportMode::Cycling => "Cycling",
            TransportMode::Bus => "Bus",
            TransportMode::Car => "Car",
            TransportMode::Bike => "Bike",
        }
    }
}

impl fmt::Display for TransportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TransportMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "walking" | "walk" => Ok(TransportMode::Walking),
            "cycling" | "cycle" | "bicycle" => Ok(TransportMode::Cycling),
            "bus" => Ok(TransportMode::Bus),
            "car" => Ok(TransportMode::Car),
            "bike" | "motorbike" => Ok(TransportMode::Bike),
            _ => Err(format!(
                "unknown transport mode '{}' (expected one of: {})",
                s,
                TransportMode::ALL
                    .iter()
                    .map(|mode| mode.name().to_lowercase())
                    .collect::<Vec<_>>()
                    .join(", ")
            )),
        }
    }
}

/// Commute mode for the emissions estimate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TravelMode {
    Cycle,
    Walk,
    Bus,
    PetrolBike,
    ElectricScooter,
}

impl TravelMode {
    pub const ALL: [TravelMode; 5] = [
        TravelMode::Cycle,
        TravelMode::Walk,
        TravelMode::Bus,
        TravelMode::PetrolBike,
        TravelMode::ElectricScooter,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            TravelMode::Cycle => "Cycle",
            TravelMode::Walk => "Walk",
            TravelMode::Bus => "Bus",
            TravelMode::PetrolBike => "Petrol Bike",
            TravelMode::ElectricScooter => "Electric Scooter",
        }
    }
}

impl fmt::Display for TravelMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TravelMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "cycle" | "cycling" => Ok(TravelMode::Cycle),
            "walk" | "walking" => Ok(TravelMode::Walk),
            "bus" => Ok(TravelMode::Bus),
            "petrolbike" | "bike" => Ok(TravelMode::PetrolBike),
            "electricscooter" | "escooter" | "scooter" => Ok(TravelMode::ElectricScooter),
            _ => Err(format!(
                "unknown travel mode '{}' (expected one of: cycle, walk, bus, petrol-bike, electric-scooter)",
                s
            )),
        }
    }
}

/// Tree species with a known sequestration factor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TreeSpecies {
    Banyan,
    Neem,
    IndianAlmond,
    Peepal,
}

impl TreeSpecies {
    pub const ALL: [TreeSpecies; 4] = [
        TreeSpecies::Banyan,
        TreeSpecies::Neem,
        TreeSpecies::IndianAlmond,
        TreeSpecies::Peepal,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            TreeSpecies::Banyan => "Banyan",
            TreeSpecies::Neem => "Neem",
            TreeSpecies::IndianAlmond => "Indian Almond",
            TreeSpecies::Peepal => "Peepal",
        }
    }
}

impl fmt::Display for TreeSpecies {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TreeSpecies {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "banyan" => Ok(TreeSpecies::Banyan),
            "neem" => Ok(TreeSpecies::Neem),
            "indianalmond" | "almond" => Ok(TreeSpecies::IndianAlmond),
            "peepal" | "pipal" => Ok(TreeSpecies::Peepal),
            _ => Err(format!(
                "unknown tree species '{}' (expected one of: banyan, neem, indian-almond, peepal)",
                s
            )),
        }
    }
}

/// One day's lifestyle metrics as entered by the user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyInputs {
    pub plastic_waste_grams: f64,
    pub transport_mode: TransportMode,
    pub electricity_kwh: f64,
    pub screen_time_hours: f64,
    pub water_used_litres: f64,
    pub trees_planted_today: u32,
    /// Commute, device and gadget figures; absent when only the elemental
    /// scores are wanted.
    #[serde(default)]
    pub footprint: Option<FootprintInputs>,
}

impl Default for DailyInputs {
    fn default() -> Self {
        Self {
            plastic_waste_grams: 50.0,
            transport_mode: TransportMode::Walking,
            electricity_kwh: 5.0,
            screen_time_hours: 5.0,
            water_used_litres: 100.0,
            trees_planted_today: 0,
            footprint: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FootprintInputs {
    pub travel_mode: TravelMode,
    pub commute_distance_km: f64,
    pub device_count: u32,
    pub ai_model_usage_hours: f64,
    pub discarded_gadgets: u32,
}

impl Default for FootprintInputs {
    fn default() -> Self {
        Self {
            travel_mode: TravelMode::Walk,
            commute_distance_km: 0.0,
            device_count: 1,
            ai_model_usage_hours: 0.0,
            discarded_gadgets: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_mode_parse_case_insensitive() {
        assert_eq!("Walking".parse::<TransportMode>().unwrap(), TransportMode::Walking);
        assert_eq!("CYCLING".parse::<TransportMode>().unwrap(), TransportMode::Cycling);
        assert_eq!("walk".parse::<TransportMode>().unwrap(), TransportMode::Walking);
        assert_eq!("bus".parse::<TransportMode>().unwrap(), TransportMode::Bus);
    }

    #[test]
    fn test_transport_mode_parse_unknown() {
        let err = "train".parse::<TransportMode>().unwrap_err();
        assert!(err.contains("train"));
        assert!(err.ends_with("(expected one of: walking, cycling, bus, car, bike)"));
    }

    #[test]
    fn test_travel_mode_parse_separators() {
        assert_eq!("Petrol Bike".parse::<TravelMode>().unwrap(), TravelMode::PetrolBike);
        assert_eq!("petrol-bike".parse::<TravelMode>().unwrap(), TravelMode::PetrolBike);
        assert_eq!("electric_scooter".parse::<TravelMode>().unwrap(), TravelMode::ElectricScooter);
        assert_eq!("e-scooter".parse::<TravelMode>().unwrap(), TravelMode::ElectricScooter);
    }

    #[test]
    fn test_species_display_parse_roundtrip() {
        for species in TreeSpecies::ALL {
            let parsed: TreeSpecies = species.to_string().parse().unwrap();
            assert_eq!(parsed, species);
        }
    }

    #[test]
    fn test_default_inputs_match_form_defaults() {
        let inputs = DailyInputs::default();
        assert_eq!(inputs.plastic_waste_grams, 50.0);
        assert_eq!(inputs.transport_mode, TransportMode::Walking);
        assert_eq!(inputs.electricity_kwh, 5.0);
        assert_eq!(inputs.screen_time_hours, 5.0);
        assert_eq!(inputs.water_used_litres, 100.0);
        assert_eq!(inputs.trees_planted_today, 0);
        assert!(inputs.footprint.is_none());
    }
}
