use serde::{Deserialize, Serialize};
use std::fmt;

use super::config::ScoringConfig;
use super::factors::{
    air_score, ELEMENT_BASELINE, KWH_PER_POINT, WASTE_GRAMS_PER_POINT, WATER_LITRES_PER_POINT,
};
use super::footprint::{calculate_footprint, Footprint};
use crate::inputs::DailyInputs;

/// The five sustainability dimensions, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Element {
    Earth,
    Water,
    Fire,
    Air,
    Space,
}

impl Element {
    pub const ALL: [Element; 5] = [
        Element::Earth,
        Element::Water,
        Element::Fire,
        Element::Air,
        Element::Space,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Element::Earth => "Earth",
            Element::Water => "Water",
            Element::Fire => "Fire",
            Element::Air => "Air",
            Element::Space => "Space",
        }
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One score per element. Floored at zero, never capped.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ElementalScores {
    pub earth: f64,
    pub water: f64,
    pub fire: f64,
    pub air: f64,
    pub space: f64,
}

impl ElementalScores {
    pub fn get(&self, element: Element) -> f64 {
        match element {
            Element::Earth => self.earth,
            Element::Water => self.water,
            Element::Fire => self.fire,
            Element::Air => self.air,
            Element::Space => self.space,
        }
    }

    /// (element, score) pairs in display order
    pub fn entries(&self) -> [(Element, f64); 5] {
        Element::ALL.map(|element| (element, self.get(element)))
    }
}

#[derive(Debug, Clone)]
pub struct ScoreContribution {
    pub element: Element,
    pub description: String, // e.g. "10 - 50g/50 + 1 trees"
    pub raw: f64,            // Value before the zero floor
    pub score: f64,
}

#[derive(Debug, Clone)]
pub struct ScoreResult {
    pub scores: ElementalScores,
    pub breakdown: Vec<ScoreContribution>,
}

/// Everything derived from one day's inputs, computed in a single call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assessment {
    pub scores: ElementalScores,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub footprint: Option<Footprint>,
}

/// Map daily inputs to the five elemental scores.
///
/// Inputs are not range-checked here; out-of-domain values flow through the
/// arithmetic and only the zero floor applies.
pub fn calculate_scores(inputs: &DailyInputs) -> ElementalScores {
    calculate_scores_with_breakdown(inputs).scores
}

pub fn calculate_scores_with_breakdown(inputs: &DailyInputs) -> ScoreResult {
    let mut breakdown = Vec::with_capacity(Element::ALL.len());
    let mut push = |element: Element, description: String, raw: f64| -> f64 {
        let score = raw.max(0.0);
        breakdown.push(ScoreContribution {
            element,
            description,
            raw,
            score,
        });
        score
    };

    let earth = push(
        Element::Earth,
        format!(
            "10 - {}g/{} + {} trees",
            inputs.plastic_waste_grams, WASTE_GRAMS_PER_POINT, inputs.trees_planted_today
        ),
        ELEMENT_BASELINE - inputs.plastic_waste_grams / WASTE_GRAMS_PER_POINT
            + inputs.trees_planted_today as f64,
    );

    let water = push(
        Element::Water,
        format!(
            "10 - {}L/{}",
            inputs.water_used_litres, WATER_LITRES_PER_POINT
        ),
        ELEMENT_BASELINE - inputs.water_used_litres / WATER_LITRES_PER_POINT,
    );

    let fire = push(
        Element::Fire,
        format!("10 - {}kWh/{}", inputs.electricity_kwh, KWH_PER_POINT),
        ELEMENT_BASELINE - inputs.electricity_kwh / KWH_PER_POINT,
    );

    let air = push(
        Element::Air,
        format!("transport: {}", inputs.transport_mode),
        air_score(inputs.transport_mode),
    );

    let space = push(
        Element::Space,
        format!("10 - {}h screen time", inputs.screen_time_hours),
        ELEMENT_BASELINE - inputs.screen_time_hours,
    );

    ScoreResult {
        scores: ElementalScores {
            earth,
            water,
            fire,
            air,
            space,
        },
        breakdown,
    }
}

/// Score a day: elemental scores plus, when footprint inputs are present,
/// the footprint and eco score.
pub fn assess(inputs: &DailyInputs, config: &ScoringConfig) -> Assessment {
    Assessment {
        scores: calculate_scores(inputs),
        footprint: inputs
            .footprint
            .as_ref()
            .map(|footprint| calculate_footprint(inputs, footprint, config)),
    }
}
