//! Connectivity graph over component terminals.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use tracing::trace;

use super::types::{ComponentId, Connection, NodeId, TerminalId};
use crate::components::Component;

/// Undirected wire graph over terminal identifiers.
///
/// The graph is derived state: it is built fresh from the current component
/// and connection lists before every classification and is never stored
/// alongside them.
#[derive(Debug, Clone, Default)]
pub struct ConnectivityGraph {
    /// Terminal -> terminals joined to it by a wire
    adjacency: BTreeMap<TerminalId, BTreeSet<TerminalId>>,

    /// Terminal -> number of wires touching it
    degree: BTreeMap<TerminalId, usize>,

    /// Number of distinct wires that made it into the graph
    edge_count: usize,
}

impl ConnectivityGraph {
    /// Build the graph from a connection list.
    ///
    /// Connections that reference a component not in `components` are
    /// skipped, as are self-loops and repeated unordered pairs. This does not
    /// repair the caller's list; see
    /// [`CircuitState::prune_invalid_connections`](super::CircuitState::prune_invalid_connections).
    pub fn build(components: &[Component], connections: &[Connection]) -> Self {
        let known: HashSet<&ComponentId> = components.iter().map(|c| &c.id).collect();
        let mut graph = Self::default();

        for conn in connections {
            if !known.contains(&conn.from.component) || !known.contains(&conn.to.component) {
                trace!(connection = %conn, "skipping connection to unknown component");
                continue;
            }
            if conn.is_self_loop() {
                trace!(connection = %conn, "skipping self-loop");
                continue;
            }
            graph.add_edge(&conn.from, &conn.to);
        }

        graph
    }

    fn add_edge(&mut self, a: &TerminalId, b: &TerminalId) {
        let inserted = self
            .adjacency
            .entry(a.clone())
            .or_default()
            .insert(b.clone());
        if !inserted {
            return;
        }
        self.adjacency.entry(b.clone()).or_default().insert(a.clone());
        *self.degree.entry(a.clone()).or_insert(0) += 1;
        *self.degree.entry(b.clone()).or_insert(0) += 1;
        self.edge_count += 1;
    }

    /// True if at least one wire touches the terminal.
    pub fn contains(&self, terminal: &TerminalId) -> bool {
        self.adjacency.contains_key(terminal)
    }

    /// Number of wires touching the terminal (0 if unwired).
    pub fn degree(&self, terminal: &TerminalId) -> usize {
        self.degree.get(terminal).copied().unwrap_or(0)
    }

    /// Terminals directly wired to the given one.
    pub fn neighbors<'a>(&'a self, terminal: &TerminalId) -> impl Iterator<Item = &'a TerminalId> {
        self.adjacency.get(terminal).into_iter().flatten()
    }

    /// Number of distinct wires in the graph.
    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    /// Number of terminals touched by at least one wire.
    pub fn terminal_count(&self) -> usize {
        self.adjacency.len()
    }

    pub fn is_empty(&self) -> bool {
        self.adjacency.is_empty()
    }

    /// Group every terminal of `components` into electrical nets.
    ///
    /// Two terminals share a net when a chain of wires joins them. A terminal
    /// with no wire forms a net on its own. Net ids are assigned in component
    /// order, A before B, so the mapping is deterministic.
    pub fn nets(&self, components: &[Component]) -> Nets {
        let mut nets = Nets::default();

        for terminal in components.iter().flat_map(|c| c.terminals()) {
            if nets.net_of.contains_key(&terminal) {
                continue;
            }
            let id = NodeId(nets.members.len());
            let mut members = Vec::new();
            let mut stack = vec![terminal];

            while let Some(current) = stack.pop() {
                if nets.net_of.contains_key(&current) {
                    continue;
                }
                nets.net_of.insert(current.clone(), id);
                for next in self.neighbors(&current) {
                    if !nets.net_of.contains_key(next) {
                        stack.push(next.clone());
                    }
                }
                members.push(current);
            }

            members.sort();
            nets.members.push(members);
        }

        nets
    }
}

/// Partition of terminals into electrical nets.
#[derive(Debug, Clone, Default)]
pub struct Nets {
    net_of: BTreeMap<TerminalId, NodeId>,
    members: Vec<Vec<TerminalId>>,
}

impl Nets {
    /// Net containing a terminal, if the terminal belongs to a known component.
    pub fn net(&self, terminal: &TerminalId) -> Option<NodeId> {
        self.net_of.get(terminal).copied()
    }

    /// Terminals in a net.
    pub fn members(&self, net: NodeId) -> &[TerminalId] {
        self.members.get(net.0).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of terminals in a net.
    pub fn size(&self, net: NodeId) -> usize {
        self.members(net).len()
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circuit::Point;

    fn t(text: &str) -> TerminalId {
        text.parse().unwrap()
    }

    fn wire(a: &str, b: &str) -> Connection {
        Connection::new(t(a), t(b))
    }

    fn resistors(ids: &[&str]) -> Vec<Component> {
        ids.iter()
            .map(|id| Component::resistor(*id, 100.0, Point::default()))
            .collect()
    }

    #[test]
    fn test_build_counts_degree_both_ways() {
        let comps = resistors(&["R1", "R2"]);
        let graph = ConnectivityGraph::build(&comps, &[wire("R1-B", "R2-A")]);
        assert_eq!(graph.degree(&t("R1-B")), 1);
        assert_eq!(graph.degree(&t("R2-A")), 1);
        assert_eq!(graph.degree(&t("R1-A")), 0);
        assert!(graph.neighbors(&t("R2-A")).any(|n| n == &t("R1-B")));
        assert_eq!(graph.edge_count(), 1);
    }

    #[test]
    fn test_build_rejects_self_loops_and_duplicates() {
        let comps = resistors(&["R1", "R2"]);
        let graph = ConnectivityGraph::build(
            &comps,
            &[
                wire("R1-A", "R1-A"),
                wire("R1-B", "R2-A"),
                wire("R2-A", "R1-B"),
            ],
        );
        assert_eq!(graph.edge_count(), 1);
        assert!(!graph.contains(&t("R1-A")));
        assert_eq!(graph.degree(&t("R1-B")), 1);
    }

    #[test]
    fn test_build_skips_unknown_components() {
        let comps = resistors(&["R1"]);
        let graph = ConnectivityGraph::build(&comps, &[wire("R1-B", "R9-A")]);
        assert!(graph.is_empty());
    }

    #[test]
    fn test_nets_merge_wired_terminals() {
        let comps = resistors(&["R1", "R2", "R3"]);
        let graph = ConnectivityGraph::build(
            &comps,
            &[wire("R1-A", "R2-A"), wire("R2-A", "R3-A")],
        );
        let nets = graph.nets(&comps);
        let rail = nets.net(&t("R1-A")).unwrap();
        assert_eq!(nets.net(&t("R3-A")), Some(rail));
        assert_eq!(nets.size(rail), 3);
        // Each B terminal is unwired and sits alone
        assert_eq!(nets.size(nets.net(&t("R2-B")).unwrap()), 1);
        assert_eq!(nets.len(), 4);
    }
}
