//! # Resisto Core
//!
//! Topology inference and DC analysis for resistor circuits placed on a
//! grid canvas.
//!
//! This library provides:
//! - A component and wire model with an editing session
//! - A connectivity graph over component terminals
//! - Classification into series, parallel, mixed or complex topologies
//! - Equivalent resistance, current and power for the solvable cases
//! - A Wheatstone bridge balance calculator
//! - A text format for describing circuit layouts
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`components`] - Resistor and voltage source models, terminal geometry
//! - [`circuit`] - Editing session, wires and the connectivity graph
//! - [`analysis`] - Topology classifier, resistance and electrical summary
//! - [`bridge`] - Wheatstone bridge balance
//! - [`dsl`] - Parser for the layout file format
//!
//! ## Usage
//!
//! ### Native CLI
//!
//! ```bash
//! resisto analyze divider.cir
//! resisto bridge --r1 100 --r2 200 --r3 150 --rx 300
//! ```
//!
//! ### Library
//!
//! ```
//! use resisto_core::circuit::{Point, TerminalId, TerminalSide::{A, B}};
//! use resisto_core::{AnalyzerConfig, CircuitState, CircuitType, ComponentId, ComponentKind};
//!
//! let mut state = CircuitState::new();
//! let v1 = state.add_component(ComponentKind::VoltageSource, Point::new(40.0, 100.0));
//! let r1 = state.add_component(ComponentKind::Resistor, Point::new(140.0, 100.0));
//! let r2 = state.add_component(ComponentKind::Resistor, Point::new(240.0, 100.0));
//!
//! let t = |id: &ComponentId, side| TerminalId::new(id.clone(), side);
//! state.connect(t(&v1, B), t(&r1, A))?;
//! state.connect(t(&r1, B), t(&r2, A))?;
//! state.connect(t(&r2, B), t(&v1, A))?;
//!
//! let result = state.analyze(&AnalyzerConfig::default());
//! assert_eq!(result.circuit_type, CircuitType::Series);
//! assert_eq!(result.resistance, Some(200.0));
//! # Ok::<(), resisto_core::ResistoError>(())
//! ```
//!
//! ### WASM
//!
//! ```javascript
//! import { WasmCircuitEditor } from 'resisto_core';
//!
//! const editor = new WasmCircuitEditor();
//! const r1 = editor.add_resistor(120, 100);
//! const result = JSON.parse(editor.analyze());
//! ```

pub mod analysis;
pub mod bridge;
pub mod circuit;
pub mod components;
pub mod dsl;
pub mod error;

// Re-export main types for convenience
pub use analysis::{analyze, AnalysisResult, AnalyzerConfig, CircuitType};
pub use bridge::{BridgeBalance, WheatstoneBridge};
pub use circuit::{CircuitState, ComponentId, Connection};
pub use components::{Component, ComponentKind};
pub use error::{ResistoError, Result};

// WASM bindings
#[cfg(feature = "wasm")]
mod wasm;

#[cfg(feature = "wasm")]
pub use wasm::WasmCircuitEditor;
