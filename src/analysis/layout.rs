//! Geometric topology guess for circuits without wires.
//!
//! Resistors at roughly the same height are read as one series row; rows
//! stacked vertically are read as parallel branches. The guess is never
//! used as the classification, only reported next to it.

use std::cmp::Ordering;

use serde::Serialize;

use super::{mixed_resistance, CircuitType};
use crate::circuit::ComponentId;
use crate::components::Component;

/// Guess derived from component placement.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutGuess {
    #[serde(rename = "type")]
    pub circuit_type: CircuitType,
    /// Resistors per row, top to bottom, each row left to right
    pub rows: Vec<Vec<ComponentId>>,
    pub estimated_resistance: f64,
}

/// Group resistors into rows and guess a topology.
///
/// A resistor joins the current row when its `y` lies within `tolerance` of
/// the row's first resistor. Returns `None` when there are no resistors.
pub fn guess_topology(components: &[Component], tolerance: f64) -> Option<LayoutGuess> {
    let mut resistors: Vec<&Component> = components.iter().filter(|c| c.is_resistor()).collect();
    if resistors.is_empty() {
        return None;
    }

    resistors.sort_by(|a, b| {
        match a.position.y.total_cmp(&b.position.y) {
            Ordering::Equal => a.position.x.total_cmp(&b.position.x),
            other => other,
        }
    });

    let mut rows: Vec<Vec<&Component>> = Vec::new();
    for resistor in resistors {
        match rows.last_mut() {
            Some(row) if (resistor.position.y - row[0].position.y).abs() <= tolerance => {
                row.push(resistor)
            }
            _ => rows.push(vec![resistor]),
        }
    }
    for row in &mut rows {
        row.sort_by(|a, b| a.position.x.total_cmp(&b.position.x));
    }

    let circuit_type = if rows.len() == 1 {
        CircuitType::Series
    } else if rows.iter().all(|r| r.len() == 1) {
        CircuitType::Parallel
    } else {
        CircuitType::Mixed
    };

    let values: Vec<Vec<f64>> = rows
        .iter()
        .map(|r| r.iter().map(|c| c.value).collect())
        .collect();

    Some(LayoutGuess {
        circuit_type,
        estimated_resistance: mixed_resistance(&values),
        rows: rows
            .into_iter()
            .map(|r| r.into_iter().map(|c| c.id.clone()).collect())
            .collect(),
    })
}
