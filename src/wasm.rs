//! WASM bindings for Resisto Core.
//!
//! This module provides JavaScript-friendly bindings for a browser canvas
//! editor. Results cross the boundary as JSON strings.
//!
//! ## Usage (JavaScript)
//!
//! ```javascript
//! import init, { WasmCircuitEditor } from 'resisto_core';
//!
//! await init();
//!
//! const editor = new WasmCircuitEditor();
//! const v1 = editor.add_voltage_source(40, 100);
//! const r1 = editor.add_resistor(140, 100);
//! const r2 = editor.add_resistor(240, 100);
//! editor.connect(`${v1}-B`, `${r1}-A`);
//! editor.connect(`${r1}-B`, `${r2}-A`);
//! editor.connect(`${r2}-B`, `${v1}-A`);
//!
//! // On every drag, edit or "calculate" click:
//! const result = JSON.parse(editor.analyze());
//! console.log(result.type, result.resistance, result.analysisText);
//! ```

use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::analysis::AnalyzerConfig;
use crate::bridge::WheatstoneBridge;
use crate::circuit::{CircuitState, ComponentId, Point, TerminalId, TerminalSide};
use crate::components::{ComponentKind, DEFAULT_HALF_LENGTH};
use crate::dsl;
use crate::error::ResistoError;

/// Initialize panic hook for better error messages in browser console.
#[wasm_bindgen(start)]
pub fn init_panic_hook() {
    console_error_panic_hook::set_once();
}

fn js_err(e: ResistoError) -> JsValue {
    JsValue::from_str(&e.to_string())
}

#[derive(Serialize)]
struct TerminalPosition {
    id: String,
    x: f64,
    y: f64,
}

/// WASM-compatible circuit editing session.
///
/// Wraps a [`CircuitState`] and the analyzer configuration.
#[wasm_bindgen]
pub struct WasmCircuitEditor {
    state: CircuitState,
    config: AnalyzerConfig,
}

impl Default for WasmCircuitEditor {
    fn default() -> Self {
        Self::new()
    }
}

#[wasm_bindgen]
impl WasmCircuitEditor {
    /// Create an empty editor.
    #[wasm_bindgen(constructor)]
    pub fn new() -> WasmCircuitEditor {
        WasmCircuitEditor {
            state: CircuitState::new(),
            config: AnalyzerConfig::default(),
        }
    }

    /// Create an editor from a layout file's text.
    #[wasm_bindgen]
    pub fn from_layout(layout: &str) -> Result<WasmCircuitEditor, JsValue> {
        let ast = dsl::parse(layout).map_err(js_err)?;
        let config = ast.analyzer_config();
        let state = CircuitState::from_ast(ast).map_err(js_err)?;
        Ok(WasmCircuitEditor { state, config })
    }

    /// Place a resistor with the default resistance. Returns its id.
    #[wasm_bindgen]
    pub fn add_resistor(&mut self, x: f64, y: f64) -> String {
        self.state
            .add_component(ComponentKind::Resistor, Point::new(x, y))
            .to_string()
    }

    /// Place a voltage source with the default voltage. Returns its id.
    #[wasm_bindgen]
    pub fn add_voltage_source(&mut self, x: f64, y: f64) -> String {
        self.state
            .add_component(ComponentKind::VoltageSource, Point::new(x, y))
            .to_string()
    }

    /// Drag a component to a new position (snapped to the grid).
    #[wasm_bindgen]
    pub fn move_component(&mut self, id: &str, x: f64, y: f64) -> Result<(), JsValue> {
        self.state
            .move_component(&ComponentId::new(id), Point::new(x, y))
            .map_err(js_err)
    }

    /// Change a component's resistance or voltage.
    #[wasm_bindgen]
    pub fn set_value(&mut self, id: &str, value: f64) -> Result<(), JsValue> {
        self.state
            .set_value(&ComponentId::new(id), value)
            .map_err(js_err)
    }

    /// Rotate a component by 90°. Returns the new rotation in degrees.
    #[wasm_bindgen]
    pub fn rotate(&mut self, id: &str) -> Result<i64, JsValue> {
        self.state
            .rotate(&ComponentId::new(id))
            .map(|r| r.degrees())
            .map_err(js_err)
    }

    /// Delete a component and its wires.
    #[wasm_bindgen]
    pub fn remove_component(&mut self, id: &str) -> Result<(), JsValue> {
        self.state
            .remove_component(&ComponentId::new(id))
            .map(|_| ())
            .map_err(js_err)
    }

    /// Wire two terminals given as `"R1-A"`-style ids.
    ///
    /// Returns `false` when the wire was a duplicate or a self-loop.
    #[wasm_bindgen]
    pub fn connect(&mut self, from: &str, to: &str) -> Result<bool, JsValue> {
        let from: TerminalId = from.parse().map_err(js_err)?;
        let to: TerminalId = to.parse().map_err(js_err)?;
        self.state.connect(from, to).map_err(js_err)
    }

    /// Remove the wire between two terminals.
    #[wasm_bindgen]
    pub fn disconnect(&mut self, a: &str, b: &str) -> Result<bool, JsValue> {
        let a: TerminalId = a.parse().map_err(js_err)?;
        let b: TerminalId = b.parse().map_err(js_err)?;
        Ok(self.state.disconnect(&a, &b))
    }

    /// Clear the canvas.
    #[wasm_bindgen]
    pub fn reset(&mut self) {
        self.state.clear();
    }

    /// Set the row tolerance for the layout hint.
    #[wasm_bindgen]
    pub fn set_row_tolerance(&mut self, tolerance: f64) {
        self.config = self.config.clone().with_row_tolerance(tolerance);
    }

    /// Number of placed components.
    #[wasm_bindgen(getter)]
    pub fn component_count(&self) -> usize {
        self.state.len()
    }

    /// Terminal positions of every component as a JSON array of
    /// `{ id, x, y }`, for hit-testing and drawing wires.
    #[wasm_bindgen]
    pub fn terminal_positions(&self) -> Result<String, JsValue> {
        let positions: Vec<TerminalPosition> = self
            .state
            .components()
            .iter()
            .flat_map(|c| {
                TerminalSide::BOTH.into_iter().map(move |side| {
                    let p = c.terminal_position(side, DEFAULT_HALF_LENGTH);
                    TerminalPosition {
                        id: c.terminal(side).to_string(),
                        x: p.x,
                        y: p.y,
                    }
                })
            })
            .collect();
        serde_json::to_string(&positions).map_err(|e| js_err(e.into()))
    }

    /// Analyze the circuit. Returns the result record as JSON.
    #[wasm_bindgen]
    pub fn analyze(&mut self) -> Result<String, JsValue> {
        let result = self.state.analyze(&self.config);
        result.to_json().map_err(js_err)
    }
}

/// Solve a Wheatstone bridge. Returns the balance report as JSON.
#[wasm_bindgen]
pub fn wheatstone(r1: f64, r2: f64, r3: f64, rx: f64) -> Result<String, JsValue> {
    let balance = WheatstoneBridge::new(r1, r2, r3, rx).map_err(js_err)?.solve();
    serde_json::to_string(&balance).map_err(|e| js_err(e.into()))
}

/// Get the library version.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
