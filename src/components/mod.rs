//! Component models for circuit analysis.
//!
//! This module provides the placed circuit elements:
//! - Resistor (value in ohms)
//! - Voltage source (value in volts, at most one per valid circuit)
//!
//! Both kinds share one record shape; behavior is keyed by [`ComponentKind`].
//! Each component exposes exactly two terminals whose positions are derived
//! from the component's center, rotation and the terminal half-length.

mod geometry;

pub use geometry::{terminal_position, DEFAULT_HALF_LENGTH};

use serde::{Deserialize, Serialize};

use crate::circuit::{ComponentId, Point, Rotation, TerminalId, TerminalSide};

/// Default resistance for a freshly placed resistor, in ohms.
pub const DEFAULT_RESISTANCE: f64 = 100.0;

/// Default voltage for a freshly placed source, in volts.
pub const DEFAULT_VOLTAGE: f64 = 12.0;

/// The kind of a placed component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ComponentKind {
    #[serde(rename = "resistor")]
    Resistor,
    #[serde(rename = "voltage")]
    VoltageSource,
}

impl ComponentKind {
    /// Id prefix used when allocating component ids.
    pub fn prefix(&self) -> char {
        match self {
            ComponentKind::Resistor => 'R',
            ComponentKind::VoltageSource => 'V',
        }
    }

    /// Parse a kind from a short or long keyword (`R`, `resistor`, `V`, `voltage`).
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword.to_ascii_lowercase().as_str() {
            "r" | "res" | "resistor" => Some(Self::Resistor),
            "v" | "vs" | "voltage" | "source" | "battery" => Some(Self::VoltageSource),
            _ => None,
        }
    }

    pub fn default_value(&self) -> f64 {
        match self {
            ComponentKind::Resistor => DEFAULT_RESISTANCE,
            ComponentKind::VoltageSource => DEFAULT_VOLTAGE,
        }
    }

    /// Unit symbol of the component value.
    pub fn unit(&self) -> &'static str {
        match self {
            ComponentKind::Resistor => "Ω",
            ComponentKind::VoltageSource => "V",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ComponentKind::Resistor => "Resistor",
            ComponentKind::VoltageSource => "Voltage Source",
        }
    }
}

/// A placed circuit component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Component {
    pub id: ComponentId,
    pub kind: ComponentKind,
    /// Resistance in ohms or source voltage in volts
    pub value: f64,
    /// Center position on the canvas
    pub position: Point,
    #[serde(default)]
    pub rotation: Rotation,
}

impl Component {
    /// Create a component with the kind's default value and no rotation.
    pub fn new(id: impl Into<ComponentId>, kind: ComponentKind, position: Point) -> Self {
        Self {
            id: id.into(),
            kind,
            value: kind.default_value(),
            position,
            rotation: Rotation::Deg0,
        }
    }

    /// Create a resistor with the given resistance.
    pub fn resistor(id: impl Into<ComponentId>, ohms: f64, position: Point) -> Self {
        Self::new(id, ComponentKind::Resistor, position).with_value(ohms)
    }

    /// Create a voltage source with the given voltage.
    pub fn voltage_source(id: impl Into<ComponentId>, volts: f64, position: Point) -> Self {
        Self::new(id, ComponentKind::VoltageSource, position).with_value(volts)
    }

    pub fn with_value(mut self, value: f64) -> Self {
        self.value = value;
        self
    }

    pub fn with_rotation(mut self, rotation: Rotation) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn is_resistor(&self) -> bool {
        self.kind == ComponentKind::Resistor
    }

    pub fn is_voltage_source(&self) -> bool {
        self.kind == ComponentKind::VoltageSource
    }

    /// Get one of the two terminals of this component.
    pub fn terminal(&self, side: TerminalSide) -> TerminalId {
        TerminalId::new(self.id.clone(), side)
    }

    /// Get both terminals, A first.
    pub fn terminals(&self) -> [TerminalId; 2] {
        [self.terminal(TerminalSide::A), self.terminal(TerminalSide::B)]
    }

    /// Canvas position of a terminal for the given half-length.
    pub fn terminal_position(&self, side: TerminalSide, half_length: f64) -> Point {
        terminal_position(self.position, self.rotation, side, half_length)
    }

    /// Value formatted with its unit, e.g. `100 Ω`.
    pub fn value_label(&self) -> String {
        format!("{} {}", self.value, self.kind.unit())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let r = Component::new("R1", ComponentKind::Resistor, Point::default());
        assert_eq!(r.value, 100.0);
        let v = Component::new("V1", ComponentKind::VoltageSource, Point::default());
        assert_eq!(v.value, 12.0);
        assert!(v.is_voltage_source());
    }

    #[test]
    fn test_terminals_are_derived_from_id() {
        let r = Component::resistor("R7", 220.0, Point::new(100.0, 100.0));
        let [a, b] = r.terminals();
        assert_eq!(a.to_string(), "R7-A");
        assert_eq!(b.to_string(), "R7-B");
    }

    #[test]
    fn test_kind_keywords() {
        assert_eq!(ComponentKind::from_keyword("R"), Some(ComponentKind::Resistor));
        assert_eq!(
            ComponentKind::from_keyword("voltage"),
            Some(ComponentKind::VoltageSource)
        );
        assert_eq!(ComponentKind::from_keyword("C"), None);
    }
}
