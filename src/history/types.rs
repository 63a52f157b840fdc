use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::inputs::{DailyInputs, TransportMode};
use crate::scoring::ElementalScores;

pub const LOG_SCHEMA_VERSION: u32 = 1;

/// Column names of schema v1, in file order. The elemental Water score is
/// `WaterScore` so it does not collide with the water-used input.
pub const LOG_HEADER: [&str; 12] = [
    "Date",
    "Waste",
    "Transport",
    "Electricity",
    "Water",
    "ScreenTime",
    "Trees",
    "Earth",
    "WaterScore",
    "Fire",
    "Air",
    "Space",
];

/// One assessed day, as stored in the daily log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    #[serde(rename = "Date")]
    pub date: NaiveDate,
    #[serde(rename = "Waste")]
    pub plastic_waste_grams: f64,
    #[serde(rename = "Transport")]
    pub transport_mode: TransportMode,
    #[serde(rename = "Electricity")]
    pub electricity_kwh: f64,
    #[serde(rename = "Water")]
    pub water_used_litres: f64,
    #[serde(rename = "ScreenTime")]
    pub screen_time_hours: f64,
    #[serde(rename = "Trees")]
    pub trees_planted_today: u32,
    #[serde(rename = "Earth")]
    pub earth: f64,
    #[serde(rename = "WaterScore")]
    pub water: f64,
    #[serde(rename = "Fire")]
    pub fire: f64,
    #[serde(rename = "Air")]
    pub air: f64,
    #[serde(rename = "Space")]
    pub space: f64,
}

impl LogEntry {
    pub fn new(date: NaiveDate, inputs: &DailyInputs, scores: &ElementalScores) -> Self {
        Self {
            date,
            plastic_waste_grams: inputs.plastic_waste_grams,
            transport_mode: inputs.transport_mode,
            electricity_kwh: inputs.electricity_kwh,
            water_used_litres: inputs.water_used_litres,
            screen_time_hours: inputs.screen_time_hours,
            trees_planted_today: inputs.trees_planted_today,
            earth: scores.earth,
            water: scores.water,
            fire: scores.fire,
            air: scores.air,
            space: scores.space,
        }
    }

    pub fn scores(&self) -> ElementalScores {
        ElementalScores {
            earth: self.earth,
            water: self.water,
            fire: self.fire,
            air: self.air,
            space: self.space,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::calculate_scores;

    #[test]
    fn test_entry_copies_inputs_and_scores() {
        let inputs = DailyInputs {
            trees_planted_today: 2,
            transport_mode: TransportMode::Bus,
            ..DailyInputs::default()
        };
        let scores = calculate_scores(&inputs);
        let date = NaiveDate::from_ymd_opt(2024, 6, 5).unwrap();
        let entry = LogEntry::new(date, &inputs, &scores);

        assert_eq!(entry.date, date);
        assert_eq!(entry.transport_mode, TransportMode::Bus);
        assert_eq!(entry.trees_planted_today, 2);
        assert_eq!(entry.water_used_litres, 100.0);
        assert_eq!(entry.scores(), scores);
    }
}
