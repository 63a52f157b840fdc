//! Radar-chart geometry for the elemental scores.
//!
//! N categories sit on N evenly spaced spokes starting at angle 0 (the
//! positive x-axis) and going counter-clockwise. Drawing is left to callers.

use serde::Serialize;
use std::f64::consts::TAU;

use crate::scoring::{Element, ElementalScores};

/// `n` evenly spaced angles in radians over one full turn, endpoint excluded.
pub fn radar_angles(n: usize) -> Vec<f64> {
    (0..n).map(|i| TAU * i as f64 / n as f64).collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RadarVertex {
    pub label: &'static str,
    pub angle: f64,
    pub radius: f64,
    pub x: f64,
    pub y: f64,
}

impl RadarVertex {
    fn new(label: &'static str, angle: f64, radius: f64) -> Self {
        Self {
            label,
            angle,
            radius,
            x: radius * angle.cos(),
            y: radius * angle.sin(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RadarChart {
    pub vertices: Vec<RadarVertex>,
}

impl RadarChart {
    pub fn from_scores(scores: &ElementalScores) -> Self {
        let angles = radar_angles(Element::ALL.len());
        let vertices = scores
            .entries()
            .iter()
            .zip(angles)
            .map(|((element, score), angle)| RadarVertex::new(element.name(), angle, *score))
            .collect();
        Self { vertices }
    }

    /// Vertices with the first repeated at the end, ready for a closed outline.
    pub fn closed_polygon(&self) -> Vec<RadarVertex> {
        let mut points = self.vertices.clone();
        if let Some(first) = self.vertices.first() {
            points.push(first.clone());
        }
        points
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    fn sample_scores() -> ElementalScores {
        ElementalScores {
            earth: 10.0,
            water: 8.0,
            fire: 7.5,
            air: 10.0,
            space: 5.0,
        }
    }

    #[test]
    fn test_angles_evenly_spaced() {
        let angles = radar_angles(5);
        assert_eq!(angles.len(), 5);
        assert_eq!(angles[0], 0.0);
        for pair in angles.windows(2) {
            assert!((pair[1] - pair[0] - 2.0 * PI / 5.0).abs() < 1e-12);
        }
        // Endpoint excluded
        assert!(angles[4] < 2.0 * PI);
    }

    #[test]
    fn test_angles_empty() {
        assert!(radar_angles(0).is_empty());
    }

    #[test]
    fn test_vertices_follow_element_order() {
        let chart = RadarChart::from_scores(&sample_scores());
        let labels: Vec<&str> = chart.vertices.iter().map(|v| v.label).collect();
        assert_eq!(labels, vec!["Earth", "Water", "Fire", "Air", "Space"]);
        assert_eq!(chart.vertices[2].radius, 7.5);
    }

    #[test]
    fn test_first_vertex_on_x_axis() {
        let chart = RadarChart::from_scores(&sample_scores());
        let earth = &chart.vertices[0];
        assert!((earth.x - 10.0).abs() < 1e-12);
        assert!(earth.y.abs() < 1e-12);
    }

    #[test]
    fn test_closed_polygon_repeats_first() {
        let chart = RadarChart::from_scores(&sample_scores());
        let polygon = chart.closed_polygon();
        assert_eq!(polygon.len(), 6);
        assert_eq!(polygon[0], polygon[5]);
    }
}
