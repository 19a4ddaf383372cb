//! Workbench: the owned state of one lab session.
//!
//! Holds the current [`Circuit`] together with its freshly derived
//! [`CalculationResult`] and the displayed study tip. All edits go through
//! [`Workbench::apply`], which routes a user intent through the pure
//! mutation operations, recomputes the result synchronously, and reports
//! whether the advisory tip should be refreshed.
//!
//! Tip fetches are fire-and-forget: the workbench stamps each outgoing
//! request with a correlation id and applies whichever reply arrives last.
//! A stale reply is still applied (the tip is advisory, not authoritative);
//! it is merely logged.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::advisory::provider::TipContext;
use crate::advisory::router::TipSource;
use crate::analyzer::compute::{compute, CalculationResult};
use crate::circuit::{Circuit, CircuitError, ElementId, Topology};

/// Placeholder shown until the first tip reply lands.
pub const PENDING_TIP: &str = "Fetching a study tip for this circuit...";

/// A user intent against the current circuit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Action {
    AddElement,
    RemoveElement(ElementId),
    SetResistance(ElementId, f64),
    SetTopology(Topology),
    SetSupplyVoltage(f64),
}

/// An outgoing tip request, stamped for last-write-wins bookkeeping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TipRequest {
    pub id: Uuid,
    pub context: TipContext,
}

/// A tip reply routed back to the workbench.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TipUpdate {
    pub request_id: Uuid,
    pub text: String,
    pub source: TipSource,
}

/// The currently displayed tip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TipState {
    pub text: String,
    pub source: Option<TipSource>,
    pub request_id: Option<Uuid>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Default for TipState {
    fn default() -> Self {
        Self {
            text: PENDING_TIP.to_string(),
            source: None,
            request_id: None,
            updated_at: None,
        }
    }
}

pub struct Workbench {
    circuit: Circuit,
    result: CalculationResult,
    tip: TipState,
    latest_request: Option<Uuid>,
}

impl Workbench {
    /// A workbench over the default starter circuit.
    pub fn new() -> Self {
        Self::with_circuit(Circuit::default())
    }

    pub fn with_circuit(circuit: Circuit) -> Self {
        let result = compute(&circuit);
        Self {
            circuit,
            result,
            tip: TipState::default(),
            latest_request: None,
        }
    }

    pub fn circuit(&self) -> &Circuit {
        &self.circuit
    }

    /// The result derived from the current circuit. Always in sync: it is
    /// recomputed inside every [`apply`](Self::apply).
    pub fn result(&self) -> &CalculationResult {
        &self.result
    }

    pub fn tip(&self) -> &TipState {
        &self.tip
    }

    /// Advisory snapshot of the current state.
    pub fn tip_context(&self) -> TipContext {
        TipContext {
            topology: self.circuit.topology(),
            element_count: self.circuit.len(),
            total_resistance: self.result.total_resistance,
        }
    }

    /// Apply a user intent. On success returns `Some(context)` when the
    /// (topology, element-count) pair changed and a fresh tip should be
    /// requested, `None` otherwise.
    pub fn apply(&mut self, action: Action) -> Result<Option<TipContext>, CircuitError> {
        let before = (self.circuit.topology(), self.circuit.len());

        let next = match action {
            Action::AddElement => {
                let (next, _) = self.circuit.add_element()?;
                next
            }
            Action::RemoveElement(id) => self.circuit.remove_element(id),
            Action::SetResistance(id, ohms) => self.circuit.set_resistance(id, ohms),
            Action::SetTopology(topology) => self.circuit.set_topology(topology),
            Action::SetSupplyVoltage(volts) => self.circuit.set_supply_voltage(volts),
        };

        self.result = compute(&next);
        self.circuit = next;

        let after = (self.circuit.topology(), self.circuit.len());
        if after != before {
            Ok(Some(self.tip_context()))
        } else {
            Ok(None)
        }
    }

    /// Stamp an outgoing tip request for the current state. The caller hands
    /// the request to a provider task; the reply comes back via
    /// [`apply_tip`](Self::apply_tip).
    pub fn begin_tip_request(&mut self) -> TipRequest {
        let request = TipRequest {
            id: Uuid::new_v4(),
            context: self.tip_context(),
        };
        self.latest_request = Some(request.id);
        request
    }

    /// Apply a tip reply. Last write wins: every reply overwrites the
    /// displayed tip, including replies to superseded requests.
    pub fn apply_tip(&mut self, update: TipUpdate) {
        if self.latest_request != Some(update.request_id) {
            tracing::warn!(
                "Applying stale tip reply {} (latest request is {:?})",
                update.request_id,
                self.latest_request
            );
        }
        self.tip = TipState {
            text: update.text,
            source: Some(update.source),
            request_id: Some(update.request_id),
            updated_at: Some(Utc::now()),
        };
    }
}

impl Default for Workbench {
    fn default() -> Self {
        Self::new()
    }
}
