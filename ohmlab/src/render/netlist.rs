//! Electrical-graph view of a circuit.
//!
//! This module lowers a `(Circuit, CalculationResult)` pair into a small
//! graph of electrical nodes and resistor branches using petgraph. The
//! renderer walks it for layout; callers can also use it for connectivity
//! queries without re-deriving topology rules.
//!
//! Series circuits become a single loop: supply positive, one junction per
//! inter-element joint, supply negative. Parallel circuits become two rail
//! nodes with one branch edge per element.

use petgraph::graph::{DiGraph, EdgeIndex, NodeIndex};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::analyzer::compute::CalculationResult;
use crate::circuit::{Circuit, ElementId, Topology};

/// A node in the electrical graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum NetNode {
    /// Positive supply terminal.
    SupplyPositive,
    /// Negative supply terminal.
    SupplyNegative,
    /// Joint between two consecutive series elements (zero-based).
    Junction(usize),
}

impl NetNode {
    pub fn is_terminal(&self) -> bool {
        matches!(self, NetNode::SupplyPositive | NetNode::SupplyNegative)
    }

    pub fn as_junction(&self) -> Option<usize> {
        match self {
            NetNode::Junction(i) => Some(*i),
            _ => None,
        }
    }
}

/// A resistor branch between two electrical nodes, annotated with the
/// computed quantities for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BranchEdge {
    pub element: ElementId,
    /// Positional label in the schematic, `R1`..`Rn`.
    pub label: String,
    pub resistance: f64,
    pub current: f64,
    pub voltage_drop: f64,
}

/// The lowered graph plus index maps for lookups by element id.
#[derive(Debug, Clone)]
pub struct Netlist {
    graph: DiGraph<NetNode, BranchEdge>,
    branch_indices: HashMap<ElementId, EdgeIndex>,
    topology: Topology,
}

impl Netlist {
    /// Lower a circuit and its computed result into the graph form.
    ///
    /// The result must come from [`crate::analyzer::compute`] on the same
    /// circuit value; branch annotations are taken positionally.
    pub fn from_circuit(circuit: &Circuit, result: &CalculationResult) -> Self {
        let mut graph = DiGraph::new();
        let mut branch_indices = HashMap::new();

        let positive = graph.add_node(NetNode::SupplyPositive);
        let negative = graph.add_node(NetNode::SupplyNegative);

        match circuit.topology() {
            Topology::Series => {
                let mut upstream = positive;
                let last = circuit.len().saturating_sub(1);
                for (i, element) in circuit.elements().iter().enumerate() {
                    let downstream = if i == last {
                        negative
                    } else {
                        graph.add_node(NetNode::Junction(i))
                    };
                    let idx = graph.add_edge(
                        upstream,
                        downstream,
                        branch_for(element.id, i, element.resistance, result),
                    );
                    branch_indices.insert(element.id, idx);
                    upstream = downstream;
                }
            }
            Topology::Parallel => {
                for (i, element) in circuit.elements().iter().enumerate() {
                    let idx = graph.add_edge(
                        positive,
                        negative,
                        branch_for(element.id, i, element.resistance, result),
                    );
                    branch_indices.insert(element.id, idx);
                }
            }
        }

        Self {
            graph,
            branch_indices,
            topology: circuit.topology(),
        }
    }

    pub fn topology(&self) -> Topology {
        self.topology
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn branch_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Branches in schematic order (insertion order of the elements).
    pub fn branches(&self) -> impl Iterator<Item = &BranchEdge> {
        self.graph.edge_weights()
    }

    pub fn branch_for_element(&self, id: ElementId) -> Option<&BranchEdge> {
        self.branch_indices
            .get(&id)
            .and_then(|&idx| self.graph.edge_weight(idx))
    }

    /// The pair of node endpoints for an element's branch.
    pub fn branch_endpoints(&self, id: ElementId) -> Option<(&NetNode, &NetNode)> {
        let &idx = self.branch_indices.get(&id)?;
        let (a, b) = self.graph.edge_endpoints(idx)?;
        Some((self.node(a), self.node(b)))
    }

    pub fn stats(&self) -> NetlistStats {
        NetlistStats {
            node_count: self.graph.node_count(),
            branch_count: self.graph.edge_count(),
            junction_count: self
                .graph
                .node_weights()
                .filter(|n| !n.is_terminal())
                .count(),
        }
    }

    fn node(&self, idx: NodeIndex) -> &NetNode {
        self.graph.node_weight(idx).expect("index from own graph")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetlistStats {
    pub node_count: usize,
    pub branch_count: usize,
    pub junction_count: usize,
}

fn branch_for(
    id: ElementId,
    position: usize,
    resistance: f64,
    result: &CalculationResult,
) -> BranchEdge {
    BranchEdge {
        element: id,
        label: format!("R{}", position + 1),
        resistance,
        current: result.branch_currents.get(position).copied().unwrap_or(0.0),
        voltage_drop: result.voltage_drops.get(position).copied().unwrap_or(0.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::compute::compute;
    use crate::circuit::{Circuit, Topology};

    fn circuit_with(topology: Topology, ohms: &[f64]) -> Circuit {
        let mut c = Circuit::new(12.0, topology);
        for &r in ohms {
            let (next, id) = c.add_element().unwrap();
            c = next.set_resistance(id, r);
        }
        c
    }

    #[test]
    fn series_chain_has_one_junction_per_joint() {
        let circuit = circuit_with(Topology::Series, &[10.0, 20.0, 30.0]);
        let netlist = Netlist::from_circuit(&circuit, &compute(&circuit));
        let stats = netlist.stats();
        assert_eq!(stats.branch_count, 3);
        // Two terminals plus two junctions between three elements.
        assert_eq!(stats.node_count, 4);
        assert_eq!(stats.junction_count, 2);
    }

    #[test]
    fn parallel_rungs_share_the_rails() {
        let circuit = circuit_with(Topology::Parallel, &[10.0, 20.0, 30.0]);
        let netlist = Netlist::from_circuit(&circuit, &compute(&circuit));
        let stats = netlist.stats();
        assert_eq!(stats.branch_count, 3);
        assert_eq!(stats.node_count, 2);
        assert_eq!(stats.junction_count, 0);

        for element in circuit.elements() {
            let (from, to) = netlist.branch_endpoints(element.id).unwrap();
            assert_eq!(from, &NetNode::SupplyPositive);
            assert_eq!(to, &NetNode::SupplyNegative);
        }
    }

    #[test]
    fn single_series_element_spans_the_terminals() {
        let circuit = circuit_with(Topology::Series, &[10.0]);
        let netlist = Netlist::from_circuit(&circuit, &compute(&circuit));
        let id = circuit.elements()[0].id;
        let (from, to) = netlist.branch_endpoints(id).unwrap();
        assert_eq!(from, &NetNode::SupplyPositive);
        assert_eq!(to, &NetNode::SupplyNegative);
    }

    #[test]
    fn branches_carry_computed_quantities() {
        let circuit = circuit_with(Topology::Parallel, &[10.0, 20.0]);
        let result = compute(&circuit);
        let netlist = Netlist::from_circuit(&circuit, &result);

        let first = circuit.elements()[0].id;
        let branch = netlist.branch_for_element(first).unwrap();
        assert_eq!(branch.label, "R1");
        assert_eq!(branch.resistance, 10.0);
        assert_eq!(branch.current, result.branch_currents[0]);
        assert_eq!(branch.voltage_drop, 12.0);
    }

    #[test]
    fn empty_circuit_lowers_to_bare_terminals() {
        let circuit = Circuit::new(12.0, Topology::Series);
        let netlist = Netlist::from_circuit(&circuit, &compute(&circuit));
        assert_eq!(netlist.branch_count(), 0);
        assert_eq!(netlist.node_count(), 2);
    }
}
