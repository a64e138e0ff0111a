//! Editing session state.

use tracing::{debug, warn};

use super::graph::ConnectivityGraph;
use super::types::{ComponentId, Connection, Point, Rotation, TerminalId};
use super::validate::{validate_components, validate_kind_value, validate_value};
use crate::analysis::{self, AnalysisResult, AnalyzerConfig};
use crate::components::{Component, ComponentKind};
use crate::dsl::LayoutAst;
use crate::error::{ResistoError, Result};

/// Canvas grid pitch; placed and moved components snap to it.
pub const GRID_SIZE: f64 = 20.0;

/// The circuit being edited: placed components and the wires between them.
///
/// This is the only owner of the component and connection lists. Analysis
/// functions borrow them read-only; the one mutating step that runs before
/// analysis is [`prune_invalid_connections`](Self::prune_invalid_connections).
#[derive(Debug, Clone)]
pub struct CircuitState {
    /// Placed components, in placement order
    components: Vec<Component>,

    /// User-drawn wires
    connections: Vec<Connection>,

    /// Grid pitch used for snapping
    grid_size: f64,

    /// Next numeric suffix for resistor ids
    next_resistor: usize,

    /// Next numeric suffix for voltage source ids
    next_source: usize,
}

impl Default for CircuitState {
    fn default() -> Self {
        Self::new()
    }
}

impl CircuitState {
    /// Create an empty session.
    pub fn new() -> Self {
        Self {
            components: Vec::new(),
            connections: Vec::new(),
            grid_size: GRID_SIZE,
            next_resistor: 1,
            next_source: 1,
        }
    }

    /// Set the snapping grid pitch. A pitch of 0 disables snapping.
    pub fn with_grid_size(mut self, grid_size: f64) -> Self {
        self.grid_size = grid_size.max(0.0);
        self
    }

    /// Build a session from existing lists, e.g. a restored editor session.
    ///
    /// Components are validated. Self-loops and repeated wires are dropped.
    /// Wires naming unknown components are kept as-is; run
    /// [`prune_invalid_connections`](Self::prune_invalid_connections) before
    /// analysis (which [`analyze`](Self::analyze) does).
    pub fn from_parts(components: Vec<Component>, connections: Vec<Connection>) -> Result<Self> {
        validate_components(&components)?;

        let mut state = Self::new();
        state.next_resistor = next_suffix(&components, ComponentKind::Resistor);
        state.next_source = next_suffix(&components, ComponentKind::VoltageSource);
        state.components = components;

        for conn in connections {
            if conn.is_self_loop() || state.has_connection(&conn) {
                debug!(connection = %conn, "dropping redundant connection");
                continue;
            }
            state.connections.push(conn);
        }

        Ok(state)
    }

    /// Build a session from a parsed layout file.
    ///
    /// Positions are snapped to the layout's grid.
    pub fn from_ast(ast: LayoutAst) -> Result<Self> {
        let mut components = Vec::with_capacity(ast.components.len());
        let grid_size = ast.grid_size.unwrap_or(GRID_SIZE);

        for (idx, def) in ast.components.into_iter().enumerate() {
            let position = match def.position {
                Some((x, y)) => Point::new(x, y),
                // Unplaced components are laid out left to right on one row
                None => Point::new(80.0 + 120.0 * idx as f64, 100.0),
            }
            .snapped(grid_size);
            let rotation = match def.rotation {
                Some(degrees) => Rotation::from_degrees(degrees)
                    .map_err(|e| ResistoError::parse(def.line, e.to_string()))?,
                None => Rotation::Deg0,
            };
            let value = def.value.unwrap_or_else(|| def.kind.default_value());
            components.push(
                Component::new(def.id, def.kind, position)
                    .with_value(value)
                    .with_rotation(rotation),
            );
        }

        let connections = ast
            .wires
            .into_iter()
            .map(|w| Connection::new(w.from, w.to))
            .collect();

        Ok(Self::from_parts(components, connections)?.with_grid_size(grid_size))
    }

    /// All placed components, in placement order.
    pub fn components(&self) -> &[Component] {
        &self.components
    }

    /// All wires.
    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    /// Find a component by id.
    pub fn component(&self, id: &ComponentId) -> Option<&Component> {
        self.components.iter().find(|c| &c.id == id)
    }

    fn component_mut(&mut self, id: &ComponentId) -> Result<&mut Component> {
        self.components
            .iter_mut()
            .find(|c| &c.id == id)
            .ok_or_else(|| ResistoError::ComponentNotFound { id: id.to_string() })
    }

    /// Iterate over placed resistors.
    pub fn resistors(&self) -> impl Iterator<Item = &Component> {
        self.components.iter().filter(|c| c.is_resistor())
    }

    /// Iterate over placed voltage sources.
    pub fn voltage_sources(&self) -> impl Iterator<Item = &Component> {
        self.components.iter().filter(|c| c.is_voltage_source())
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    /// Place a new component with its kind's default value.
    ///
    /// The position is snapped to the grid. Returns the allocated id; ids are
    /// never reused within a session, even after deletion.
    pub fn add_component(&mut self, kind: ComponentKind, position: Point) -> ComponentId {
        let id = self.allocate_id(kind);
        let component = Component::new(id.clone(), kind, position.snapped(self.grid_size));
        debug!(id = %id, kind = ?kind, "placed component");
        self.components.push(component);
        id
    }

    /// Place a resistor with the given resistance.
    pub fn add_resistor(&mut self, ohms: f64, position: Point) -> Result<ComponentId> {
        self.add_with_value(ComponentKind::Resistor, ohms, position)
    }

    /// Place a voltage source with the given voltage.
    ///
    /// Placing a second source is allowed; analysis then reports
    /// [`CircuitType::MultipleSources`](crate::analysis::CircuitType::MultipleSources).
    pub fn add_voltage_source(&mut self, volts: f64, position: Point) -> Result<ComponentId> {
        self.add_with_value(ComponentKind::VoltageSource, volts, position)
    }

    fn add_with_value(&mut self, kind: ComponentKind, value: f64, position: Point) -> Result<ComponentId> {
        validate_kind_value(kind, value)?;
        let id = self.add_component(kind, position);
        self.component_mut(&id)?.value = value;
        Ok(id)
    }

    /// Insert a fully described component with an explicit id.
    pub fn insert_component(&mut self, component: Component) -> Result<()> {
        if self.component(&component.id).is_some() {
            return Err(ResistoError::DuplicateComponent {
                id: component.id.to_string(),
            });
        }
        validate_components(std::slice::from_ref(&component))?;
        let kind = component.kind;
        self.components.push(component);
        let next = next_suffix(&self.components, kind);
        match kind {
            ComponentKind::Resistor => self.next_resistor = self.next_resistor.max(next),
            ComponentKind::VoltageSource => self.next_source = self.next_source.max(next),
        }
        Ok(())
    }

    fn allocate_id(&mut self, kind: ComponentKind) -> ComponentId {
        loop {
            let counter = match kind {
                ComponentKind::Resistor => &mut self.next_resistor,
                ComponentKind::VoltageSource => &mut self.next_source,
            };
            let id = ComponentId::new(format!("{}{}", kind.prefix(), *counter));
            *counter += 1;
            if self.component(&id).is_none() {
                return id;
            }
        }
    }

    /// Move a component. The new position is snapped to the grid.
    pub fn move_component(&mut self, id: &ComponentId, position: Point) -> Result<()> {
        let grid = self.grid_size;
        self.component_mut(id)?.position = position.snapped(grid);
        Ok(())
    }

    /// Change a component's resistance or voltage.
    pub fn set_value(&mut self, id: &ComponentId, value: f64) -> Result<()> {
        let component = self.component_mut(id)?;
        validate_value(component, value)?;
        component.value = value;
        Ok(())
    }

    /// Rotate a component by 90°, toggling between horizontal and vertical.
    pub fn rotate(&mut self, id: &ComponentId) -> Result<Rotation> {
        let component = self.component_mut(id)?;
        component.rotation = component.rotation.toggled();
        Ok(component.rotation)
    }

    /// Delete a component and every wire touching its terminals.
    pub fn remove_component(&mut self, id: &ComponentId) -> Result<Component> {
        let idx = self
            .components
            .iter()
            .position(|c| &c.id == id)
            .ok_or_else(|| ResistoError::ComponentNotFound { id: id.to_string() })?;
        let removed = self.components.remove(idx);

        let before = self.connections.len();
        self.connections.retain(|conn| !conn.touches(id));
        debug!(
            id = %id,
            wires_removed = before - self.connections.len(),
            "removed component"
        );

        Ok(removed)
    }

    /// Wire two terminals together.
    ///
    /// Returns `Ok(false)` without adding anything when the wire would join a
    /// terminal to itself or duplicates an existing wire in either direction.
    pub fn connect(&mut self, from: TerminalId, to: TerminalId) -> Result<bool> {
        for terminal in [&from, &to] {
            if self.component(&terminal.component).is_none() {
                return Err(ResistoError::ComponentNotFound {
                    id: terminal.component.to_string(),
                });
            }
        }

        let conn = Connection::new(from, to);
        if conn.is_self_loop() || self.has_connection(&conn) {
            return Ok(false);
        }
        debug!(connection = %conn, "connected terminals");
        self.connections.push(conn);
        Ok(true)
    }

    /// Remove the wire between two terminals, in either direction.
    pub fn disconnect(&mut self, a: &TerminalId, b: &TerminalId) -> bool {
        let target = Connection::new(a.clone(), b.clone());
        let before = self.connections.len();
        self.connections.retain(|conn| !conn.same_pair(&target));
        before != self.connections.len()
    }

    fn has_connection(&self, conn: &Connection) -> bool {
        self.connections.iter().any(|c| c.same_pair(conn))
    }

    /// Remove every component and wire and restart id numbering.
    pub fn clear(&mut self) {
        self.components.clear();
        self.connections.clear();
        self.next_resistor = 1;
        self.next_source = 1;
    }

    /// Repair step: drop wires whose endpoint component no longer exists.
    ///
    /// This mutates the canonical connection list and must run before
    /// classification. Returns the number of wires removed; a second call
    /// on unchanged state removes nothing.
    pub fn prune_invalid_connections(&mut self) -> usize {
        let components = &self.components;
        let exists = |id: &ComponentId| components.iter().any(|c| &c.id == id);

        let before = self.connections.len();
        self.connections.retain(|conn| {
            let valid = exists(&conn.from.component) && exists(&conn.to.component);
            if !valid {
                warn!(connection = %conn, "pruning connection to missing component");
            }
            valid
        });
        before - self.connections.len()
    }

    /// Prune invalid wires, then build a fresh connectivity graph.
    pub fn rebuild_graph(&mut self) -> ConnectivityGraph {
        self.prune_invalid_connections();
        ConnectivityGraph::build(&self.components, &self.connections)
    }

    /// Run the repair step, then analyze the circuit.
    pub fn analyze(&mut self, config: &AnalyzerConfig) -> AnalysisResult {
        self.prune_invalid_connections();
        analysis::analyze(&self.components, &self.connections, config)
    }
}

/// Smallest numeric suffix above every existing `<prefix><n>` id of `kind`.
fn next_suffix(components: &[Component], kind: ComponentKind) -> usize {
    components
        .iter()
        .filter(|c| c.kind == kind)
        .filter_map(|c| {
            c.id.as_str()
                .strip_prefix(kind.prefix())
                .and_then(|n| n.parse::<usize>().ok())
        })
        .max()
        .map_or(1, |n| n + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(text: &str) -> TerminalId {
        text.parse().unwrap()
    }

    #[test]
    fn test_placement_snaps_and_allocates_ids() {
        let mut state = CircuitState::new();
        let r1 = state.add_component(ComponentKind::Resistor, Point::new(109.0, 31.0));
        let v1 = state.add_component(ComponentKind::VoltageSource, Point::new(0.0, 0.0));
        let r2 = state.add_component(ComponentKind::Resistor, Point::new(0.0, 0.0));

        assert_eq!(r1.as_str(), "R1");
        assert_eq!(v1.as_str(), "V1");
        assert_eq!(r2.as_str(), "R2");
        assert_eq!(state.component(&r1).unwrap().position, Point::new(100.0, 40.0));
        assert_eq!(state.component(&v1).unwrap().value, 12.0);
    }

    #[test]
    fn test_ids_are_not_reused_after_delete() {
        let mut state = CircuitState::new();
        let r1 = state.add_component(ComponentKind::Resistor, Point::default());
        let _r2 = state.add_component(ComponentKind::Resistor, Point::default());
        state.remove_component(&r1).unwrap();
        let r3 = state.add_component(ComponentKind::Resistor, Point::default());
        assert_eq!(r3.as_str(), "R3");
    }

    #[test]
    fn test_connect_suppresses_duplicates_and_self_loops() {
        let mut state = CircuitState::new();
        state.add_component(ComponentKind::Resistor, Point::default());
        state.add_component(ComponentKind::Resistor, Point::default());

        assert!(state.connect(t("R1-B"), t("R2-A")).unwrap());
        assert!(!state.connect(t("R2-A"), t("R1-B")).unwrap());
        assert!(!state.connect(t("R1-A"), t("R1-A")).unwrap());
        assert_eq!(state.connections().len(), 1);

        let err = state.connect(t("R1-A"), t("R9-A")).unwrap_err();
        assert!(matches!(err, ResistoError::ComponentNotFound { .. }));
    }

    #[test]
    fn test_remove_cascades_connections() {
        let mut state = CircuitState::new();
        state.add_component(ComponentKind::Resistor, Point::default());
        state.add_component(ComponentKind::Resistor, Point::default());
        state.add_component(ComponentKind::Resistor, Point::default());
        state.connect(t("R1-B"), t("R2-A")).unwrap();
        state.connect(t("R2-B"), t("R3-A")).unwrap();
        state.connect(t("R3-B"), t("R1-A")).unwrap();

        state.remove_component(&ComponentId::new("R2")).unwrap();
        assert_eq!(state.connections().len(), 1);
        assert!(state
            .connections()
            .iter()
            .all(|c| !c.touches(&ComponentId::new("R2"))));
    }

    #[test]
    fn test_disconnect_either_direction() {
        let mut state = CircuitState::new();
        state.add_component(ComponentKind::Resistor, Point::default());
        state.add_component(ComponentKind::Resistor, Point::default());
        state.connect(t("R1-B"), t("R2-A")).unwrap();
        assert!(state.disconnect(&t("R2-A"), &t("R1-B")));
        assert!(!state.disconnect(&t("R2-A"), &t("R1-B")));
    }

    #[test]
    fn test_prune_is_idempotent() {
        let components = vec![
            Component::resistor("R1", 100.0, Point::default()),
            Component::resistor("R2", 100.0, Point::default()),
        ];
        let connections = vec![
            Connection::new(t("R1-B"), t("R2-A")),
            Connection::new(t("R2-B"), t("R5-A")),
        ];
        let mut state = CircuitState::from_parts(components, connections).unwrap();
        assert_eq!(state.prune_invalid_connections(), 1);
        assert_eq!(state.prune_invalid_connections(), 0);
        assert_eq!(state.connections().len(), 1);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let mut state = CircuitState::new();
        assert!(state.add_resistor(-5.0, Point::default()).is_err());
        assert!(state.is_empty());
        let r1 = state.add_resistor(330.0, Point::default()).unwrap();
        assert!(state.set_value(&r1, 0.0).is_err());
        assert_eq!(state.component(&r1).unwrap().value, 330.0);
    }

    #[test]
    fn test_invalid_value_error_names_the_kind() {
        let mut state = CircuitState::new();
        let err = state.add_resistor(-5.0, Point::default()).unwrap_err();
        assert!(matches!(
            err,
            ResistoError::InvalidKindValue { kind: "Resistor", .. }
        ));
    }

    #[test]
    fn test_insert_component_bumps_id_sequence() {
        let mut state = CircuitState::new();
        state.add_component(ComponentKind::Resistor, Point::default());
        state
            .insert_component(Component::resistor("R7", 470.0, Point::new(60.0, 60.0)))
            .unwrap();

        let err = state
            .insert_component(Component::resistor("R7", 100.0, Point::default()))
            .unwrap_err();
        assert!(matches!(err, ResistoError::DuplicateComponent { ref id } if id == "R7"));
        assert_eq!(state.len(), 2);

        let next = state.add_component(ComponentKind::Resistor, Point::default());
        assert_eq!(next.as_str(), "R8");
        let v1 = state.add_component(ComponentKind::VoltageSource, Point::default());
        assert_eq!(v1.as_str(), "V1");
    }

    #[test]
    fn test_from_ast_snaps_positions() {
        let ast = crate::dsl::parse("R1 R 100 at 105 37").unwrap();
        let state = CircuitState::from_ast(ast).unwrap();
        assert_eq!(state.components()[0].position, Point::new(100.0, 40.0));

        let ast = crate::dsl::parse(".grid 50\nR1 R 100 at 105 37").unwrap();
        let state = CircuitState::from_ast(ast).unwrap();
        assert_eq!(state.components()[0].position, Point::new(100.0, 50.0));
    }

    #[test]
    fn test_rotate_toggles() {
        let mut state = CircuitState::new();
        let r1 = state.add_component(ComponentKind::Resistor, Point::default());
        assert_eq!(state.rotate(&r1).unwrap(), Rotation::Deg90);
        assert_eq!(state.rotate(&r1).unwrap(), Rotation::Deg0);
    }

    #[test]
    fn test_from_parts_continues_id_sequence() {
        let components = vec![Component::resistor("R4", 100.0, Point::default())];
        let mut state = CircuitState::from_parts(components, Vec::new()).unwrap();
        let next = state.add_component(ComponentKind::Resistor, Point::default());
        assert_eq!(next.as_str(), "R5");
    }
}
