//! OhmLab - series/parallel resistor circuit study lab
//!
//! This library models small series/parallel resistor circuits, evaluates
//! them with closed-form Ohm's-law formulas, derives rule-based study notes,
//! renders an animated SVG schematic, and optionally fetches a short AI
//! study tip with a deterministic fallback.
//!
//! # Quick Start
//!
//! ```
//! use ohmlab::{compute, Circuit, Topology};
//!
//! let circuit = Circuit::default(); // 12 V across 10 Ω and 20 Ω in series
//! let result = compute(&circuit);
//! assert_eq!(result.total_resistance, 30.0);
//! assert_eq!(result.voltage_drops, vec![4.0, 8.0]);
//!
//! let parallel = circuit.set_topology(Topology::Parallel);
//! let result = compute(&parallel);
//! assert!(result.total_resistance < 10.0);
//! ```
//!
//! # Features
//!
//! - **Circuit model**: immutable mutations, monotonic element ids
//! - **Calculation engine**: total/branch currents and voltage drops
//! - **Study notes**: formula cards, the n-squared law, degenerate-value warnings
//! - **Rendering**: petgraph netlist view and animated SVG schematics
//! - **Optional AI**: Gemini/Ollama tips with a fixed fallback (used by CLI)

pub mod advisory;
pub mod analyzer;
pub mod circuit;
pub mod render;
pub mod workbench;

// Re-export main types
pub use advisory::{TipContext, TipReply, TipRouter, TipSource, FALLBACK_TIP};
pub use analyzer::compute::{compute, CalculationResult};
pub use analyzer::notes::{Note, NoteSeverity, NotesEngine};
pub use circuit::{
    Circuit, CircuitError, Element, ElementId, Topology, DEFAULT_RESISTANCE_OHMS,
    DEFAULT_SUPPLY_VOLTS, MAX_ELEMENTS,
};
pub use render::netlist::Netlist;
pub use workbench::{Action, Workbench};

/// Compute and render the schematic in one step (convenience wrapper).
pub fn schematic_svg(circuit: &Circuit) -> String {
    let result = compute(circuit);
    render::svg::render_schematic(circuit, &result)
}

/// Compute and derive study notes in one step (convenience wrapper).
pub fn study_notes(circuit: &Circuit) -> Vec<Note> {
    let result = compute(circuit);
    NotesEngine::with_default_rules().analyze(circuit, &result)
}

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{
        compute, CalculationResult, Circuit, CircuitError, Element, ElementId, Note,
        NoteSeverity, NotesEngine, Topology, Workbench,
    };
}
