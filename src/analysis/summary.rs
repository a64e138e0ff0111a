//! Electrical summary: Ohm's law, power and the analysis narrative.

use std::fmt::Write as _;

use serde::Serialize;

use super::{CircuitType, LayoutGuess, Topology};
use crate::circuit::ComponentId;
use crate::components::Component;
use crate::error::Result;

/// Placeholder rendered for quantities that were not computed.
pub const NOT_COMPUTED: &str = "—";

/// Result of analyzing a circuit.
///
/// `None` in `resistance`, `current` or `power` means "not computed" and is
/// distinct from a computed zero.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    #[serde(rename = "type")]
    pub circuit_type: CircuitType,
    pub resistance: Option<f64>,
    pub current: Option<f64>,
    pub power: Option<f64>,
    /// Source voltage, 0 without a single source
    pub voltage: f64,
    pub groups: Vec<Vec<ComponentId>>,
    pub analysis_text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub layout_hint: Option<LayoutGuess>,
}

impl AnalysisResult {
    /// Resistance formula shown next to the result.
    pub fn formula(&self) -> &'static str {
        match self.circuit_type {
            CircuitType::Series => "Series: R_total = R1 + R2 + R3 + ...",
            CircuitType::Parallel => "Parallel: 1/R_total = 1/R1 + 1/R2 + 1/R3 + ...",
            _ => "Resistance: depends on the circuit",
        }
    }

    pub fn resistance_label(&self) -> String {
        format_quantity(self.resistance, 2, "Ω")
    }

    pub fn current_label(&self) -> String {
        format_quantity(self.current, 3, "A")
    }

    pub fn power_label(&self) -> String {
        format_quantity(self.power, 2, "W")
    }

    /// Serialize to JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Render `value` with `decimals` places and a unit, or the placeholder.
pub fn format_quantity(value: Option<f64>, decimals: usize, unit: &str) -> String {
    match value {
        Some(v) => format!("{:.*} {}", decimals, v, unit),
        None => format!("{} {}", NOT_COMPUTED, unit),
    }
}

/// Current and power for a source across a resistance.
///
/// A non-positive resistance yields zero current.
pub fn ohms_law(voltage: f64, resistance: f64) -> (f64, f64) {
    let current = if resistance > 0.0 {
        voltage / resistance
    } else {
        0.0
    };
    (current, voltage * current)
}

/// Source voltage: the single source's value, otherwise 0.
fn source_voltage(components: &[Component]) -> f64 {
    let mut sources = components.iter().filter(|c| c.is_voltage_source());
    match (sources.next(), sources.next()) {
        (Some(source), None) => source.value,
        _ => 0.0,
    }
}

/// Assemble the result record for a classified circuit.
pub fn summarize(
    components: &[Component],
    topology: Topology,
    resistance: Option<f64>,
    layout_hint: Option<LayoutGuess>,
) -> AnalysisResult {
    let voltage = source_voltage(components);
    let (current, power) = match resistance {
        Some(r) => {
            let (i, p) = ohms_law(voltage, r);
            (Some(i), Some(p))
        }
        None => (None, None),
    };

    let analysis_text = narrative(components, &topology, resistance, layout_hint.as_ref());

    AnalysisResult {
        circuit_type: topology.circuit_type,
        resistance,
        current,
        power,
        voltage,
        groups: topology.groups,
        analysis_text,
        layout_hint,
    }
}

fn value_list<'a>(
    components: &[Component],
    ids: impl Iterator<Item = &'a ComponentId>,
) -> Vec<String> {
    ids.filter_map(|id| components.iter().find(|c| &c.id == id))
        .map(|c| c.value.to_string())
        .collect()
}

fn narrative(
    components: &[Component],
    topology: &Topology,
    resistance: Option<f64>,
    layout_hint: Option<&LayoutGuess>,
) -> String {
    let count = components.iter().filter(|c| c.is_resistor()).count();
    let total = format_quantity(resistance, 2, "Ω");
    let mut text = String::new();

    // Writing to a String cannot fail
    match topology.circuit_type {
        CircuitType::NoComponents => {
            text.push_str("Place at least one resistor to analyze the circuit.");
        }
        CircuitType::MultipleSources => {
            text.push_str(
                "Error: more than one voltage source. Remove the extra sources before analyzing.",
            );
        }
        CircuitType::NoConnections => {
            text.push_str("Connect the components with wires before analyzing the circuit.");
            if let Some(hint) = layout_hint {
                let _ = write!(
                    text,
                    "\n• Layout suggests {} (≈ {:.2} Ω)",
                    hint.circuit_type.label().to_lowercase(),
                    hint.estimated_resistance
                );
            }
        }
        CircuitType::DisconnectedComponents => {
            text.push_str(
                "Some resistors are not wired. Connect every component before analyzing.",
            );
        }
        CircuitType::Series => {
            let list = value_list(components, topology.groups.iter().flatten());
            let _ = writeln!(text, "SERIES CIRCUIT:");
            let _ = writeln!(text, "• {} resistors connected end to end", count);
            let _ = writeln!(text, "• Total resistance: R = {} = {}", list.join(" + "), total);
            let _ = writeln!(text, "• Same current through every component: I = V/R");
            text.push_str("• Voltage divides in proportion: V = I × R");
        }
        CircuitType::Parallel => {
            let list = value_list(components, topology.groups.iter().flatten());
            let reciprocals: Vec<String> = list.iter().map(|v| format!("1/{}", v)).collect();
            let _ = writeln!(text, "PARALLEL CIRCUIT:");
            let _ = writeln!(text, "• {} resistors connected as branches", count);
            let _ = writeln!(text, "• Total resistance: 1/R = {}", reciprocals.join(" + "));
            let _ = writeln!(text, "• R total = {}", total);
            let _ = writeln!(text, "• Same voltage across every component");
            text.push_str("• Current divides between the branches");
        }
        CircuitType::Mixed => {
            let _ = writeln!(text, "MIXED CIRCUIT (series-parallel):");
            let _ = writeln!(
                text,
                "• {} series chains combined in parallel",
                topology.groups.len()
            );
            for (i, group) in topology.groups.iter().enumerate() {
                let ids: Vec<&str> = group.iter().map(ComponentId::as_str).collect();
                let list = value_list(components, group.iter());
                let _ = writeln!(
                    text,
                    "  - Chain {}: {} ({})",
                    i + 1,
                    ids.join(" + "),
                    list.join(" + ")
                );
            }
            let _ = writeln!(text, "• R total = {}", total);
            let _ = writeln!(text, "• In series: voltage divides by resistance");
            text.push_str("• In parallel: every branch has the same voltage");
        }
        CircuitType::Complex => {
            let _ = writeln!(text, "COMPLEX CONFIGURATION:");
            let _ = writeln!(text, "• {} resistors in an advanced configuration", count);
            let _ = writeln!(text, "• Requires mesh or nodal analysis");
            text.push_str("• Use Kirchhoff's laws for a detailed analysis");
        }
    }

    text
}
