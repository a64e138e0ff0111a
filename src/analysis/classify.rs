//! Topology classifier.
//!
//! Works on electrical nets rather than raw wires: two terminals joined by
//! any chain of wires are the same node, so a rail drawn as a star through
//! the source terminal and a rail drawn as a daisy chain classify the same.

use std::collections::{BTreeSet, HashSet};

use tracing::debug;

use super::{CircuitType, Topology};
use crate::circuit::{
    ComponentId, Connection, ConnectivityGraph, Nets, NodeId, TerminalId, TerminalSide,
};
use crate::components::Component;

/// Classify a circuit.
///
/// Tests run in a fixed order and the first match wins; see the
/// [module docs](super) for the order. Connections referencing unknown
/// components are ignored, never repaired, so the inputs are untouched.
pub fn classify(components: &[Component], connections: &[Connection]) -> Topology {
    let sources: Vec<&Component> = components.iter().filter(|c| c.is_voltage_source()).collect();
    if sources.len() > 1 {
        debug!(sources = sources.len(), "more than one voltage source");
        return Topology::unsolved(CircuitType::MultipleSources);
    }

    let resistors: Vec<&Component> = components.iter().filter(|c| c.is_resistor()).collect();
    if resistors.is_empty() {
        return Topology::unsolved(CircuitType::NoComponents);
    }

    let graph = ConnectivityGraph::build(components, connections);
    if graph.edge_count() == 0 {
        return Topology::unsolved(CircuitType::NoConnections);
    }

    let unwired: Vec<&ComponentId> = resistors
        .iter()
        .filter(|r| r.terminals().iter().all(|t| !graph.contains(t)))
        .map(|r| &r.id)
        .collect();
    if !unwired.is_empty() {
        debug!(?unwired, "resistors without any wire");
        return Topology::unsolved(CircuitType::DisconnectedComponents);
    }

    let nets = graph.nets(components);
    let view = NetView {
        graph: &graph,
        nets: &nets,
        resistors: &resistors,
        source: sources.first().copied(),
    };

    if let Some(chain) = view.series_chain() {
        debug!(?chain, "series chain");
        return Topology::new(CircuitType::Series, vec![chain]);
    }

    if view.is_parallel() {
        let branches = resistors.iter().map(|r| vec![r.id.clone()]).collect();
        debug!(branches = resistors.len(), "parallel bundle");
        return Topology::new(CircuitType::Parallel, branches);
    }

    if let Some(chains) = view.chains_between_rails() {
        if chains.len() > 1 && chains.iter().any(|c| c.len() > 1) {
            debug!(?chains, "series chains in parallel");
            return Topology::new(CircuitType::Mixed, chains);
        }
    }

    debug!("no series/parallel decomposition");
    Topology::unsolved(CircuitType::Complex)
}

/// Read-only view of the circuit in terms of nets.
struct NetView<'a> {
    graph: &'a ConnectivityGraph,
    nets: &'a Nets,
    resistors: &'a [&'a Component],
    source: Option<&'a Component>,
}

impl<'a> NetView<'a> {
    fn net(&self, terminal: &TerminalId) -> NodeId {
        // Every terminal of a known component is assigned a net
        self.nets.net(terminal).unwrap_or(NodeId(usize::MAX))
    }

    /// Unordered pair of nets spanned by a component.
    fn span(&self, component: &Component) -> (NodeId, NodeId) {
        let [a, b] = component.terminals();
        let (na, nb) = (self.net(&a), self.net(&b));
        if na <= nb {
            (na, nb)
        } else {
            (nb, na)
        }
    }

    fn is_resistor(&self, id: &ComponentId) -> bool {
        self.resistors.iter().any(|r| &r.id == id)
    }

    /// The source, if at least one of its terminals carries a wire.
    ///
    /// A wired source must close the structure; an untouched one is ignored.
    fn wired_source(&self) -> Option<&'a Component> {
        self.source
            .filter(|s| s.terminals().iter().any(|t| self.graph.contains(t)))
    }

    /// True if a wired source does not sit across `rails`.
    fn source_off_rails(&self, rails: (NodeId, NodeId)) -> bool {
        self.wired_source().is_some_and(|s| self.span(s) != rails)
    }

    /// The terminal sharing a two-terminal net with `terminal`.
    fn partner(&self, terminal: &TerminalId) -> Option<&'a TerminalId> {
        let members = self.nets.members(self.net(terminal));
        if members.len() != 2 {
            return None;
        }
        members.iter().find(|m| *m != terminal)
    }

    /// Series test.
    ///
    /// Every resistor terminal carries exactly one wire and shares its net
    /// with exactly one other terminal; no resistor is shorted onto itself;
    /// walking terminal to terminal visits every resistor in one pass. A
    /// wired source must open the chain at its B terminal and close it at A.
    /// Returns the resistors in chain order.
    fn series_chain(&self) -> Option<Vec<ComponentId>> {
        for r in self.resistors {
            let [a, b] = r.terminals();
            if self.net(&a) == self.net(&b) {
                return None;
            }
            for t in [&a, &b] {
                if self.graph.degree(t) != 1 || self.nets.size(self.net(t)) != 2 {
                    return None;
                }
            }
        }

        // Without a wired source the resistors must close a loop on their own
        let source = self.wired_source();
        let entry = match source {
            Some(source) => {
                let entry = self.partner(&source.terminal(TerminalSide::B))?;
                if !self.is_resistor(&entry.component) {
                    return None;
                }
                entry.clone()
            }
            None => self.resistors[0].terminal(TerminalSide::A),
        };

        let mut chain = Vec::with_capacity(self.resistors.len());
        let mut visited = HashSet::new();
        let mut current = entry;
        let mut exit = None;
        loop {
            if !visited.insert(current.component.clone()) {
                break;
            }
            chain.push(current.component.clone());
            match self.partner(&current.opposite()) {
                Some(next) if self.is_resistor(&next.component) => current = next.clone(),
                other => {
                    exit = other;
                    break;
                }
            }
        }

        if chain.len() != self.resistors.len() {
            return None;
        }
        match source {
            Some(source) => (exit == Some(&source.terminal(TerminalSide::A))).then_some(chain),
            None => Some(chain),
        }
    }

    /// Parallel test.
    ///
    /// Every resistor spans the same two distinct nets. A resistor placed
    /// reversed (B on the A-rail) still counts. A wired source must sit
    /// across the same rails.
    fn is_parallel(&self) -> bool {
        if self.resistors.len() < 2 {
            return false;
        }
        let rails = self.span(self.resistors[0]);
        if rails.0 == rails.1 {
            return false;
        }
        if self.resistors.iter().any(|r| self.span(r) != rails) {
            return false;
        }
        !self.source_off_rails(rails)
    }

    /// Find series chains running between exactly two rail nets.
    ///
    /// A rail is a net joining three or more terminals. Every other net a
    /// resistor touches must be a pass-through joining exactly two resistor
    /// terminals. Each resistor must lie on exactly one rail-to-rail chain.
    fn chains_between_rails(&self) -> Option<Vec<Vec<ComponentId>>> {
        let touched: BTreeSet<NodeId> = self
            .resistors
            .iter()
            .flat_map(|r| r.terminals())
            .map(|t| self.net(&t))
            .collect();

        let rails: Vec<NodeId> = touched
            .iter()
            .copied()
            .filter(|n| self.nets.size(*n) >= 3)
            .collect();
        let [start_rail, end_rail] = rails.as_slice() else {
            return None;
        };
        let (start_rail, end_rail) = (*start_rail, *end_rail);

        for net in touched.iter().filter(|n| !rails.contains(n)) {
            let members = self.nets.members(*net);
            if members.len() != 2 || members.iter().any(|m| !self.is_resistor(&m.component)) {
                return None;
            }
        }

        if self.source_off_rails((start_rail, end_rail)) {
            return None;
        }

        let mut visited = HashSet::new();
        let mut chains = Vec::new();
        let starts = self
            .nets
            .members(start_rail)
            .iter()
            .filter(|t| self.is_resistor(&t.component));

        for start in starts {
            let mut chain = Vec::new();
            let mut current = start.clone();
            loop {
                if !visited.insert(current.component.clone()) {
                    return None;
                }
                chain.push(current.component.clone());
                let exit = current.opposite();
                let net = self.net(&exit);
                if net == end_rail {
                    break;
                }
                if net == start_rail {
                    return None;
                }
                current = self.partner(&exit)?.clone();
            }
            chains.push(chain);
        }

        (visited.len() == self.resistors.len()).then_some(chains)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circuit::Point;

    fn t(text: &str) -> TerminalId {
        text.parse().unwrap()
    }

    fn wires(pairs: &[(&str, &str)]) -> Vec<Connection> {
        pairs
            .iter()
            .map(|(a, b)| Connection::new(t(a), t(b)))
            .collect()
    }

    fn circuit(resistors: &[(&str, f64)], source: Option<f64>) -> Vec<Component> {
        let mut comps: Vec<Component> = resistors
            .iter()
            .enumerate()
            .map(|(i, (id, ohms))| Component::resistor(*id, *ohms, Point::new(100.0 * i as f64, 0.0)))
            .collect();
        if let Some(volts) = source {
            comps.push(Component::voltage_source("V1", volts, Point::new(0.0, 200.0)));
        }
        comps
    }

    fn ids(names: &[&str]) -> Vec<ComponentId> {
        names.iter().map(|n| ComponentId::new(*n)).collect()
    }

    #[test]
    fn test_multiple_sources_checked_first() {
        let mut comps = circuit(&[], Some(12.0));
        comps.push(Component::voltage_source("V2", 9.0, Point::default()));
        let topology = classify(&comps, &[]);
        assert_eq!(topology.circuit_type, CircuitType::MultipleSources);
    }

    #[test]
    fn test_no_resistors_even_with_source() {
        let comps = circuit(&[], Some(12.0));
        assert_eq!(classify(&comps, &[]).circuit_type, CircuitType::NoComponents);
    }

    #[test]
    fn test_no_connections() {
        let comps = circuit(&[("R1", 100.0)], None);
        assert_eq!(classify(&comps, &[]).circuit_type, CircuitType::NoConnections);
    }

    #[test]
    fn test_unwired_resistor_is_disconnected() {
        let comps = circuit(&[("R1", 100.0), ("R2", 100.0), ("R3", 100.0)], None);
        let conns = wires(&[("R1-B", "R2-A")]);
        assert_eq!(
            classify(&comps, &conns).circuit_type,
            CircuitType::DisconnectedComponents
        );
    }

    #[test]
    fn test_series_loop_through_source() {
        let comps = circuit(&[("R1", 100.0), ("R2", 220.0), ("R3", 330.0)], Some(12.0));
        let conns = wires(&[
            ("V1-B", "R1-A"),
            ("R1-B", "R2-A"),
            ("R2-B", "R3-A"),
            ("R3-B", "V1-A"),
        ]);
        let topology = classify(&comps, &conns);
        assert_eq!(topology.circuit_type, CircuitType::Series);
        assert_eq!(topology.groups, vec![ids(&["R1", "R2", "R3"])]);
    }

    #[test]
    fn test_series_follows_wiring_not_placement() {
        let comps = circuit(&[("R1", 100.0), ("R2", 100.0), ("R3", 100.0)], Some(12.0));
        let conns = wires(&[
            ("V1-B", "R3-A"),
            ("R3-B", "R1-B"),
            ("R1-A", "R2-A"),
            ("R2-B", "V1-A"),
        ]);
        let topology = classify(&comps, &conns);
        assert_eq!(topology.circuit_type, CircuitType::Series);
        assert_eq!(topology.groups, vec![ids(&["R3", "R1", "R2"])]);
    }

    #[test]
    fn test_open_chain_is_not_series() {
        let comps = circuit(&[("R1", 100.0), ("R2", 100.0)], None);
        let conns = wires(&[("R1-B", "R2-A")]);
        assert_eq!(classify(&comps, &conns).circuit_type, CircuitType::Complex);
    }

    #[test]
    fn test_shorted_resistor_is_not_series() {
        let comps = circuit(&[("R1", 100.0)], None);
        let conns = wires(&[("R1-A", "R1-B")]);
        assert_eq!(classify(&comps, &conns).circuit_type, CircuitType::Complex);
    }

    #[test]
    fn test_two_separate_loops_are_not_series() {
        let comps = circuit(&[("R1", 1.0), ("R2", 1.0), ("R3", 1.0), ("R4", 1.0)], None);
        let conns = wires(&[
            ("R1-A", "R2-A"),
            ("R1-B", "R2-B"),
            ("R3-A", "R4-A"),
            ("R3-B", "R4-B"),
        ]);
        assert_eq!(classify(&comps, &conns).circuit_type, CircuitType::Complex);
    }

    #[test]
    fn test_parallel_daisy_chained_rails() {
        let comps = circuit(&[("R1", 100.0), ("R2", 100.0), ("R3", 100.0)], Some(12.0));
        let conns = wires(&[
            ("V1-A", "R1-A"),
            ("R1-A", "R2-A"),
            ("R2-A", "R3-A"),
            ("V1-B", "R1-B"),
            ("R1-B", "R2-B"),
            ("R2-B", "R3-B"),
        ]);
        let topology = classify(&comps, &conns);
        assert_eq!(topology.circuit_type, CircuitType::Parallel);
        assert_eq!(topology.groups.len(), 3);
    }

    #[test]
    fn test_parallel_star_wired_through_source() {
        let comps = circuit(&[("R1", 100.0), ("R2", 100.0)], Some(12.0));
        let conns = wires(&[
            ("V1-A", "R1-A"),
            ("V1-A", "R2-A"),
            ("V1-B", "R1-B"),
            ("V1-B", "R2-B"),
        ]);
        assert_eq!(classify(&comps, &conns).circuit_type, CircuitType::Parallel);
    }

    #[test]
    fn test_parallel_with_reversed_resistor() {
        let comps = circuit(&[("R1", 100.0), ("R2", 100.0), ("R3", 100.0)], None);
        let conns = wires(&[
            ("R1-A", "R2-B"),
            ("R2-B", "R3-A"),
            ("R1-B", "R2-A"),
            ("R2-A", "R3-B"),
        ]);
        assert_eq!(classify(&comps, &conns).circuit_type, CircuitType::Parallel);
    }

    #[test]
    fn test_source_off_the_rails_is_not_parallel() {
        // Source in series with a parallel pair, plus a third resistor
        let comps = circuit(&[("R1", 100.0), ("R2", 100.0), ("R3", 100.0)], Some(12.0));
        let conns = wires(&[
            ("R1-A", "R2-A"),
            ("R1-B", "R2-B"),
            ("R2-B", "R3-A"),
            ("R3-B", "V1-A"),
            ("V1-B", "R1-A"),
        ]);
        assert_eq!(classify(&comps, &conns).circuit_type, CircuitType::Complex);
    }

    #[test]
    fn test_half_wired_source_is_complex() {
        let comps = circuit(&[("R1", 100.0), ("R2", 100.0)], Some(12.0));
        // V1-B left open over a parallel pair
        let conns = wires(&[("V1-A", "R1-A"), ("R1-A", "R2-A"), ("R1-B", "R2-B")]);
        assert_eq!(classify(&comps, &conns).circuit_type, CircuitType::Complex);

        // Same open source at the end of a chain
        let conns = wires(&[("V1-B", "R1-A"), ("R1-B", "R2-A")]);
        assert_eq!(classify(&comps, &conns).circuit_type, CircuitType::Complex);
    }

    #[test]
    fn test_shorted_source_is_complex() {
        let comps = circuit(&[("R1", 100.0), ("R2", 100.0)], Some(12.0));
        let conns = wires(&[("V1-A", "V1-B"), ("R1-A", "R2-A"), ("R1-B", "R2-B")]);
        assert_eq!(classify(&comps, &conns).circuit_type, CircuitType::Complex);
    }

    #[test]
    fn test_unwired_source_leaves_resistor_loop_series() {
        let comps = circuit(&[("R1", 100.0), ("R2", 100.0)], Some(12.0));
        let conns = wires(&[("R1-A", "R2-A"), ("R1-B", "R2-B")]);
        assert_eq!(classify(&comps, &conns).circuit_type, CircuitType::Series);
    }

    #[test]
    fn test_mixed_chains_across_source() {
        let comps = circuit(
            &[("R1", 100.0), ("R2", 100.0), ("R3", 50.0), ("R4", 150.0)],
            Some(12.0),
        );
        let conns = wires(&[
            ("V1-A", "R1-A"),
            ("R1-B", "R2-A"),
            ("V1-A", "R3-A"),
            ("R3-B", "R4-A"),
            ("R2-B", "V1-B"),
            ("R4-B", "V1-B"),
        ]);
        let topology = classify(&comps, &conns);
        assert_eq!(topology.circuit_type, CircuitType::Mixed);
        assert_eq!(topology.groups, vec![ids(&["R1", "R2"]), ids(&["R3", "R4"])]);
    }

    #[test]
    fn test_mixed_chain_next_to_single_branch() {
        let comps = circuit(&[("R1", 100.0), ("R2", 100.0), ("R3", 100.0)], None);
        let conns = wires(&[
            ("R1-A", "R3-A"),
            ("R1-B", "R2-A"),
            ("R2-B", "R3-B"),
            ("R3-A", "R4-A"),
        ]);
        // R4 does not exist: that wire is ignored, leaving a closed loop
        assert_eq!(classify(&comps, &conns).circuit_type, CircuitType::Series);

        let with_rails = circuit(&[("R1", 100.0), ("R2", 100.0), ("R3", 100.0), ("R4", 100.0)], None);
        let conns = wires(&[
            ("R1-A", "R3-A"),
            ("R3-A", "R4-A"),
            ("R1-B", "R2-A"),
            ("R2-B", "R3-B"),
            ("R3-B", "R4-B"),
        ]);
        let topology = classify(&with_rails, &conns);
        assert_eq!(topology.circuit_type, CircuitType::Mixed);
        assert_eq!(topology.groups.len(), 3);
    }

    #[test]
    fn test_series_then_parallel_is_complex() {
        // R1 in series with (R2 || R3): not a parallel set of chains
        let comps = circuit(&[("R1", 100.0), ("R2", 100.0), ("R3", 100.0)], Some(12.0));
        let conns = wires(&[
            ("V1-A", "R1-A"),
            ("R1-B", "R2-A"),
            ("R1-B", "R3-A"),
            ("R2-B", "V1-B"),
            ("R3-B", "V1-B"),
        ]);
        assert_eq!(classify(&comps, &conns).circuit_type, CircuitType::Complex);
    }

    #[test]
    fn test_bridge_is_complex() {
        let comps = circuit(
            &[("R1", 100.0), ("R2", 200.0), ("R3", 150.0), ("R4", 300.0), ("R5", 10.0)],
            Some(12.0),
        );
        let conns = wires(&[
            ("V1-A", "R1-A"),
            ("V1-A", "R2-A"),
            ("R1-B", "R3-A"),
            ("R2-B", "R4-A"),
            ("R3-B", "V1-B"),
            ("R4-B", "V1-B"),
            ("R1-B", "R5-A"),
            ("R2-B", "R5-B"),
        ]);
        let topology = classify(&comps, &conns);
        assert_eq!(topology.circuit_type, CircuitType::Complex);
        assert!(topology.groups.is_empty());
    }

    #[test]
    fn test_classification_is_idempotent() {
        let comps = circuit(&[("R1", 100.0), ("R2", 100.0)], Some(12.0));
        let conns = wires(&[("V1-B", "R1-A"), ("R1-B", "R2-A"), ("R2-B", "V1-A")]);
        assert_eq!(classify(&comps, &conns), classify(&comps, &conns));
    }
}
