//! Topology inference and DC analysis.
//!
//! This module turns a component list and its wires into an
//! [`AnalysisResult`]:
//!
//! 1. [`classify`] inspects the connectivity graph and assigns a
//!    [`CircuitType`], grouping resistors for the series/parallel cases
//! 2. [`equivalent_resistance`] reduces the groups to one resistance
//! 3. [`summary`] applies Ohm's law and the power law and writes the
//!    narrative text
//!
//! The wire graph is authoritative. The geometric [`layout`] heuristic only
//! runs when no wire has been drawn yet, and its guess is reported
//! separately as [`AnalysisResult::layout_hint`].
//!
//! ## Evaluation order
//!
//! ```text
//! sources > 1            -> MultipleSources
//! no resistors           -> NoComponents
//! no wires               -> NoConnections
//! unwired resistor       -> DisconnectedComponents
//! end-to-end chain       -> Series
//! two shared rails       -> Parallel
//! chains between rails   -> Mixed
//! anything else          -> Complex
//! ```

mod classify;
pub mod layout;
mod resistance;
pub mod summary;

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::circuit::{ComponentId, Connection};
use crate::components::Component;

pub use classify::classify;
pub use layout::{guess_topology, LayoutGuess};
pub use resistance::{
    equivalent_resistance, mixed_resistance, parallel_resistance, series_resistance,
};
pub use summary::AnalysisResult;

/// Default tolerance band for grouping resistors into rows by `y`.
pub const DEFAULT_ROW_TOLERANCE: f64 = 40.0;

/// Topology classification of a circuit.
///
/// `Series`, `Parallel` and `Mixed` have a computed resistance. The other
/// variants are reported states with nothing computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CircuitType {
    /// No resistor has been placed
    NoComponents,
    /// More than one voltage source is present
    MultipleSources,
    /// Components exist but no wire has been drawn
    NoConnections,
    /// At least one resistor has no wire on either terminal
    DisconnectedComponents,
    /// All resistors form one end-to-end chain
    Series,
    /// All resistors share the same two rails
    Parallel,
    /// Several series chains joined in parallel between two rails
    Mixed,
    /// Wired, but not decomposable by the rules above
    Complex,
}

impl CircuitType {
    /// True if resistance, current and power are computed for this type.
    pub fn is_solved(&self) -> bool {
        matches!(self, CircuitType::Series | CircuitType::Parallel | CircuitType::Mixed)
    }

    /// True for states that ask the user to fix the circuit.
    pub fn is_error(&self) -> bool {
        matches!(
            self,
            CircuitType::NoComponents
                | CircuitType::MultipleSources
                | CircuitType::NoConnections
                | CircuitType::DisconnectedComponents
        )
    }

    /// Human-readable name.
    pub fn label(&self) -> &'static str {
        match self {
            CircuitType::NoComponents => "No components",
            CircuitType::MultipleSources => "Error: multiple sources",
            CircuitType::NoConnections => "No connections",
            CircuitType::DisconnectedComponents => "Disconnected components",
            CircuitType::Series => "Series",
            CircuitType::Parallel => "Parallel",
            CircuitType::Mixed => "Mixed",
            CircuitType::Complex => "Complex",
        }
    }
}

impl fmt::Display for CircuitType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A classification with the resistor grouping it was derived from.
///
/// - `Series`: one group, resistors in chain order
/// - `Parallel`: one single-resistor group per branch
/// - `Mixed`: one group per series chain
/// - other types: no groups
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Topology {
    pub circuit_type: CircuitType,
    pub groups: Vec<Vec<ComponentId>>,
}

impl Topology {
    /// A classification without any grouping.
    pub fn unsolved(circuit_type: CircuitType) -> Self {
        Self {
            circuit_type,
            groups: Vec::new(),
        }
    }

    pub fn new(circuit_type: CircuitType, groups: Vec<Vec<ComponentId>>) -> Self {
        Self {
            circuit_type,
            groups,
        }
    }
}

/// Configuration for circuit analysis.
#[derive(Debug, Clone)]
pub struct AnalyzerConfig {
    /// Tolerance band (canvas units) for the layout row heuristic.
    pub row_tolerance: f64,
    /// Whether to compute a layout hint for circuits without wires.
    pub layout_hint: bool,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            row_tolerance: DEFAULT_ROW_TOLERANCE,
            layout_hint: true,
        }
    }
}

impl AnalyzerConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the row tolerance used by the layout heuristic.
    pub fn with_row_tolerance(mut self, row_tolerance: f64) -> Self {
        self.row_tolerance = row_tolerance.max(0.0);
        self
    }

    /// Enable or disable the layout hint.
    pub fn with_layout_hint(mut self, layout_hint: bool) -> Self {
        self.layout_hint = layout_hint;
        self
    }
}

/// Analyze a circuit.
///
/// This is a pure function of its inputs. Callers holding a
/// [`CircuitState`](crate::circuit::CircuitState) should use
/// [`CircuitState::analyze`](crate::circuit::CircuitState::analyze), which
/// runs the connection repair step first.
pub fn analyze(
    components: &[Component],
    connections: &[Connection],
    config: &AnalyzerConfig,
) -> AnalysisResult {
    let topology = classify(components, connections);
    let resistance = equivalent_resistance(&topology, components);

    let layout_hint = if config.layout_hint && topology.circuit_type == CircuitType::NoConnections
    {
        guess_topology(components, config.row_tolerance)
    } else {
        None
    };

    let result = summary::summarize(components, topology, resistance, layout_hint);
    debug!(
        circuit_type = %result.circuit_type,
        resistance = ?result.resistance,
        current = ?result.current,
        "analysis complete"
    );
    result
}
