//! Circuit model, editing session and connectivity graph.
//!
//! This module provides the internal representation of a circuit being
//! edited. [`CircuitState`] owns its components and wires; the
//! [`ConnectivityGraph`] is rebuilt from them before every analysis.

mod graph;
mod state;
mod types;
mod validate;

pub use graph::{ConnectivityGraph, Nets};
pub use state::{CircuitState, GRID_SIZE};
pub use types::*;
pub use validate::{validate_components, validate_kind_value, validate_value};
