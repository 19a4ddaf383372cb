//! Circuit model and mutation interface.
//!
//! A [`Circuit`] is a small immutable value: supply voltage, an ordered list
//! of resistive elements, and a topology. Every mutation returns a new
//! `Circuit` so derived results can always be recomputed from the current
//! value with no stale-cache hazard.

use serde::{Deserialize, Serialize};

/// Upper bound on the number of resistors a circuit holds.
pub const MAX_ELEMENTS: usize = 6;

/// Resistance assigned to a freshly added element, in ohms.
pub const DEFAULT_RESISTANCE_OHMS: f64 = 10.0;

/// Supply voltage of the default circuit, in volts.
pub const DEFAULT_SUPPLY_VOLTS: f64 = 12.0;

#[derive(Debug, thiserror::Error)]
pub enum CircuitError {
    #[error("circuit already holds the maximum of {MAX_ELEMENTS} elements")]
    CapacityExceeded,
}

/// How the elements are wired together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Topology {
    /// End-to-end: current is uniform, voltage divides by resistance.
    Series,
    /// Across the same two nodes: voltage is uniform, current divides
    /// inversely to resistance.
    Parallel,
}

impl Topology {
    pub fn label(&self) -> &'static str {
        match self {
            Topology::Series => "series",
            Topology::Parallel => "parallel",
        }
    }
}

impl std::fmt::Display for Topology {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Opaque element identifier, unique within a circuit lineage.
///
/// Ids come from a monotonic counter carried inside the circuit and are
/// never reused, so removing and re-adding elements cannot alias.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct ElementId(u64);

impl std::fmt::Display for ElementId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "e{}", self.0)
    }
}

/// A single resistor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Element {
    pub id: ElementId,
    /// Resistance in ohms. Positive for physically meaningful results; the
    /// engine evaluates non-positive values under IEEE-754 without panicking.
    pub resistance: f64,
}

/// Supply voltage plus an ordered set of resistors and a topology.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Circuit {
    supply_voltage: f64,
    topology: Topology,
    elements: Vec<Element>,
    next_id: u64,
}

impl Circuit {
    /// An empty circuit with the given supply voltage and topology.
    pub fn new(supply_voltage: f64, topology: Topology) -> Self {
        Self {
            supply_voltage,
            topology,
            elements: Vec::new(),
            next_id: 1,
        }
    }

    pub fn supply_voltage(&self) -> f64 {
        self.supply_voltage
    }

    pub fn topology(&self) -> Topology {
        self.topology
    }

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn element(&self, id: ElementId) -> Option<&Element> {
        self.elements.iter().find(|e| e.id == id)
    }

    /// Zero-based position of an element in insertion order.
    pub fn position_of(&self, id: ElementId) -> Option<usize> {
        self.elements.iter().position(|e| e.id == id)
    }

    /// Append a new element with the default resistance, returning the new
    /// circuit and the freshly allocated id.
    pub fn add_element(&self) -> Result<(Circuit, ElementId), CircuitError> {
        if self.elements.len() >= MAX_ELEMENTS {
            return Err(CircuitError::CapacityExceeded);
        }
        let id = ElementId(self.next_id);
        let mut next = self.clone();
        next.next_id += 1;
        next.elements.push(Element {
            id,
            resistance: DEFAULT_RESISTANCE_OHMS,
        });
        Ok((next, id))
    }

    /// Remove the element with the given id. Unknown ids are a silent no-op.
    pub fn remove_element(&self, id: ElementId) -> Circuit {
        let mut next = self.clone();
        next.elements.retain(|e| e.id != id);
        next
    }

    /// Replace the resistance of the element with the given id. Unknown ids
    /// are a silent no-op.
    pub fn set_resistance(&self, id: ElementId, ohms: f64) -> Circuit {
        let mut next = self.clone();
        if let Some(e) = next.elements.iter_mut().find(|e| e.id == id) {
            e.resistance = ohms;
        }
        next
    }

    pub fn set_topology(&self, topology: Topology) -> Circuit {
        let mut next = self.clone();
        next.topology = topology;
        next
    }

    pub fn set_supply_voltage(&self, volts: f64) -> Circuit {
        let mut next = self.clone();
        next.supply_voltage = volts;
        next
    }

    /// True when voltage, topology, and the element list match, ignoring the
    /// internal id counter. Useful for "mutation round-trip" comparisons.
    pub fn same_configuration(&self, other: &Circuit) -> bool {
        self.supply_voltage == other.supply_voltage
            && self.topology == other.topology
            && self.elements == other.elements
    }
}

impl Default for Circuit {
    /// The starting circuit of the lab: 12 V across 10 Ω and 20 Ω in series.
    fn default() -> Self {
        let circuit = Circuit::new(DEFAULT_SUPPLY_VOLTS, Topology::Series);
        let (circuit, _) = circuit.add_element().expect("empty circuit has room");
        let (circuit, second) = circuit.add_element().expect("one element, room for more");
        circuit.set_resistance(second, 20.0)
    }
}
