//! Rule-based study notes.
//!
//! Each rule looks at a circuit and its computed result and emits short
//! educational notes: the governing formula, how current/voltage divides,
//! the n-squared law for identical resistors, and warnings about degenerate
//! configurations.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::analyzer::compute::CalculationResult;
use crate::circuit::{Circuit, ElementId, Topology};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NoteSeverity {
    Info,
    Warning,
}

/// One study note attached to the current circuit state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Note {
    pub rule_id: String,
    pub severity: NoteSeverity,
    pub message: String,
    /// Set when the note concerns one specific element.
    pub element: Option<ElementId>,
}

impl Note {
    fn info(rule_id: &str, message: impl Into<String>) -> Self {
        Self {
            rule_id: rule_id.to_string(),
            severity: NoteSeverity::Info,
            message: message.into(),
            element: None,
        }
    }

    fn warning(rule_id: &str, message: impl Into<String>) -> Self {
        Self {
            rule_id: rule_id.to_string(),
            severity: NoteSeverity::Warning,
            message: message.into(),
            element: None,
        }
    }
}

pub trait NoteRule: Send + Sync {
    fn id(&self) -> &str;
    fn check(&self, circuit: &Circuit, result: &CalculationResult) -> Vec<Note>;
}

pub struct NotesEngine {
    rules: Vec<Arc<dyn NoteRule>>,
}

impl NotesEngine {
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    pub fn with_default_rules() -> Self {
        let mut engine = Self::new();
        engine.add_rule(Arc::new(FormulaRule));
        engine.add_rule(Arc::new(DivisionRule));
        engine.add_rule(Arc::new(SquareLawRule));
        engine.add_rule(Arc::new(EmptyCircuitRule));
        engine.add_rule(Arc::new(DegenerateResistanceRule));
        engine
    }

    pub fn add_rule(&mut self, rule: Arc<dyn NoteRule>) {
        self.rules.push(rule);
    }

    pub fn analyze(&self, circuit: &Circuit, result: &CalculationResult) -> Vec<Note> {
        let mut notes = Vec::new();
        for rule in &self.rules {
            notes.extend(rule.check(circuit, result));
        }
        notes
    }
}

impl Default for NotesEngine {
    fn default() -> Self {
        Self::with_default_rules()
    }
}

/// The equivalent-resistance formula for the active topology.
struct FormulaRule;

impl NoteRule for FormulaRule {
    fn id(&self) -> &str {
        "formula"
    }

    fn check(&self, circuit: &Circuit, _result: &CalculationResult) -> Vec<Note> {
        let message = match circuit.topology() {
            Topology::Series => "R_t = R1 + R2 + ... + Rn: the total grows with every element.",
            Topology::Parallel => {
                "1/R_t = 1/R1 + 1/R2 + ...: the total shrinks with every element."
            }
        };
        vec![Note::info(self.id(), message)]
    }
}

/// Which quantity is uniform and which one divides.
struct DivisionRule;

impl NoteRule for DivisionRule {
    fn id(&self) -> &str {
        "division"
    }

    fn check(&self, circuit: &Circuit, _result: &CalculationResult) -> Vec<Note> {
        let message = match circuit.topology() {
            Topology::Series => {
                "In series the current is uniform; voltage divides in proportion to resistance."
            }
            Topology::Parallel => {
                "In parallel the voltage is uniform; current divides inversely to resistance."
            }
        };
        vec![Note::info(self.id(), message)]
    }
}

/// For n equal resistors, series and parallel totals differ by n squared.
struct SquareLawRule;

impl NoteRule for SquareLawRule {
    fn id(&self) -> &str {
        "square_law"
    }

    fn check(&self, circuit: &Circuit, _result: &CalculationResult) -> Vec<Note> {
        let n = circuit.len();
        if n < 2 {
            return Vec::new();
        }
        vec![Note::info(
            self.id(),
            format!(
                "{n} equal resistors of value R give n*R in series and R/{n} in parallel, \
                 a ratio of {}.",
                n * n
            ),
        )]
    }
}

/// An element-free circuit computes to all zeros.
struct EmptyCircuitRule;

impl NoteRule for EmptyCircuitRule {
    fn id(&self) -> &str {
        "empty_circuit"
    }

    fn check(&self, circuit: &Circuit, _result: &CalculationResult) -> Vec<Note> {
        if !circuit.is_empty() {
            return Vec::new();
        }
        vec![Note::warning(
            self.id(),
            "The circuit has no resistive elements; every quantity reads zero.",
        )]
    }
}

/// Flags elements whose resistance is not a positive finite number.
struct DegenerateResistanceRule;

impl NoteRule for DegenerateResistanceRule {
    fn id(&self) -> &str {
        "degenerate_resistance"
    }

    fn check(&self, circuit: &Circuit, _result: &CalculationResult) -> Vec<Note> {
        circuit
            .elements()
            .iter()
            .filter(|e| !(e.resistance.is_finite() && e.resistance > 0.0))
            .map(|e| Note {
                rule_id: self.id().to_string(),
                severity: NoteSeverity::Warning,
                message: format!(
                    "Element {} has a non-physical resistance of {} ohms; derived values \
                     may be infinite or undefined.",
                    e.id, e.resistance
                ),
                element: Some(e.id),
            })
            .collect()
    }
}
