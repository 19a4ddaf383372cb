//! Calculation engine: Ohm's-law evaluation of a circuit.
//!
//! [`compute`] is a total, deterministic function of a [`Circuit`]. It never
//! caches, never errors, and never panics: an empty circuit yields an
//! all-zero result by explicit policy, and degenerate resistances (zero,
//! negative, non-finite) flow through IEEE-754 arithmetic unchanged.

use serde::{Deserialize, Serialize};

use crate::circuit::{Circuit, Topology};

/// Derived electrical quantities for a circuit.
///
/// `branch_currents` and `voltage_drops` share the length and insertion
/// order of the circuit's element list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationResult {
    /// Equivalent resistance of the whole element set, in ohms.
    pub total_resistance: f64,
    /// Current drawn from the supply, in amperes.
    pub total_current: f64,
    /// Current through each element, in amperes.
    pub branch_currents: Vec<f64>,
    /// Voltage consumed across each element, in volts.
    pub voltage_drops: Vec<f64>,
}

impl CalculationResult {
    fn zero() -> Self {
        Self {
            total_resistance: 0.0,
            total_current: 0.0,
            branch_currents: Vec::new(),
            voltage_drops: Vec::new(),
        }
    }
}

/// Evaluate the circuit.
pub fn compute(circuit: &Circuit) -> CalculationResult {
    // Empty circuits are defined to be all-zero for both topologies. The
    // series formulas would get there on their own; the parallel reciprocal
    // would not, so the guard is explicit.
    if circuit.is_empty() {
        return CalculationResult::zero();
    }

    let voltage = circuit.supply_voltage();
    let result = match circuit.topology() {
        Topology::Series => compute_series(circuit, voltage),
        Topology::Parallel => compute_parallel(circuit, voltage),
    };

    tracing::debug!(
        "computed {} circuit: {} elements, R_t={:.4}, I_t={:.4}",
        circuit.topology(),
        circuit.len(),
        result.total_resistance,
        result.total_current
    );

    result
}

fn compute_series(circuit: &Circuit, voltage: f64) -> CalculationResult {
    let total_resistance: f64 = circuit.elements().iter().map(|e| e.resistance).sum();
    let total_current = current_through(voltage, total_resistance);

    let branch_currents = vec![total_current; circuit.len()];
    let voltage_drops = circuit
        .elements()
        .iter()
        .map(|e| total_current * e.resistance)
        .collect();

    CalculationResult {
        total_resistance,
        total_current,
        branch_currents,
        voltage_drops,
    }
}

fn compute_parallel(circuit: &Circuit, voltage: f64) -> CalculationResult {
    let inverse_total: f64 = circuit.elements().iter().map(|e| 1.0 / e.resistance).sum();
    let total_resistance = 1.0 / inverse_total;
    let total_current = current_through(voltage, total_resistance);

    let branch_currents = circuit
        .elements()
        .iter()
        .map(|e| voltage / e.resistance)
        .collect();
    let voltage_drops = vec![voltage; circuit.len()];

    CalculationResult {
        total_resistance,
        total_current,
        branch_currents,
        voltage_drops,
    }
}

/// `V / R` with the zero-resistance policy: a zero total is reported as zero
/// current rather than letting the division produce an infinity.
fn current_through(voltage: f64, total_resistance: f64) -> f64 {
    if total_resistance == 0.0 {
        0.0
    } else {
        voltage / total_resistance
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circuit::{Circuit, Topology};
    use approx::assert_relative_eq;

    fn circuit_with(voltage: f64, topology: Topology, ohms: &[f64]) -> Circuit {
        let mut c = Circuit::new(voltage, topology);
        for &r in ohms {
            let (next, id) = c.add_element().unwrap();
            c = next.set_resistance(id, r);
        }
        c
    }

    #[test]
    fn empty_circuit_is_all_zero_in_series() {
        let result = compute(&Circuit::new(12.0, Topology::Series));
        assert_eq!(result.total_resistance, 0.0);
        assert_eq!(result.total_current, 0.0);
        assert!(result.branch_currents.is_empty());
        assert!(result.voltage_drops.is_empty());
    }

    #[test]
    fn empty_circuit_is_all_zero_in_parallel() {
        let result = compute(&Circuit::new(12.0, Topology::Parallel));
        assert_eq!(result.total_resistance, 0.0);
        assert_eq!(result.total_current, 0.0);
        assert!(result.branch_currents.is_empty());
        assert!(result.voltage_drops.is_empty());
    }

    #[test]
    fn series_reference_values() {
        let result = compute(&circuit_with(12.0, Topology::Series, &[10.0, 20.0]));
        assert_eq!(result.total_resistance, 30.0);
        assert_relative_eq!(result.total_current, 0.4);
        assert_eq!(result.branch_currents.len(), 2);
        assert_relative_eq!(result.branch_currents[0], 0.4);
        assert_relative_eq!(result.branch_currents[1], 0.4);
        assert_relative_eq!(result.voltage_drops[0], 4.0);
        assert_relative_eq!(result.voltage_drops[1], 8.0);
    }

    #[test]
    fn parallel_reference_values() {
        let result = compute(&circuit_with(12.0, Topology::Parallel, &[10.0, 20.0]));
        assert_relative_eq!(result.total_resistance, 20.0 / 3.0);
        assert_relative_eq!(result.total_current, 1.8);
        assert_relative_eq!(result.branch_currents[0], 1.2);
        assert_relative_eq!(result.branch_currents[1], 0.6);
        assert_eq!(result.voltage_drops, vec![12.0, 12.0]);
    }

    #[test]
    fn compute_is_bitwise_idempotent() {
        let circuit = circuit_with(37.0, Topology::Parallel, &[3.0, 7.0, 11.0]);
        let a = compute(&circuit);
        let b = compute(&circuit);
        assert_eq!(a.total_resistance.to_bits(), b.total_resistance.to_bits());
        assert_eq!(a.total_current.to_bits(), b.total_current.to_bits());
        let bits = |v: &[f64]| v.iter().map(|x| x.to_bits()).collect::<Vec<_>>();
        assert_eq!(bits(&a.branch_currents), bits(&b.branch_currents));
        assert_eq!(bits(&a.voltage_drops), bits(&b.voltage_drops));
    }

    #[test]
    fn series_total_never_decreases_when_adding() {
        let mut c = circuit_with(12.0, Topology::Series, &[5.0]);
        let mut last = compute(&c).total_resistance;
        for r in [0.5, 2.0, 80.0] {
            let (next, id) = c.add_element().unwrap();
            c = next.set_resistance(id, r);
            let total = compute(&c).total_resistance;
            assert!(total >= last, "series total dropped: {total} < {last}");
            last = total;
        }
    }

    #[test]
    fn parallel_total_never_increases_when_adding() {
        let mut c = circuit_with(12.0, Topology::Parallel, &[5.0]);
        let mut last = compute(&c).total_resistance;
        for r in [0.5, 2.0, 80.0] {
            let (next, id) = c.add_element().unwrap();
            c = next.set_resistance(id, r);
            let total = compute(&c).total_resistance;
            assert!(total <= last, "parallel total rose: {total} > {last}");
            last = total;
        }
    }

    #[test]
    fn identical_resistors_follow_the_square_law() {
        let n = 4;
        let r = 15.0;
        let ohms = vec![r; n];
        let series = compute(&circuit_with(12.0, Topology::Series, &ohms));
        let parallel = compute(&circuit_with(12.0, Topology::Parallel, &ohms));
        assert_relative_eq!(series.total_resistance, r * n as f64);
        assert_relative_eq!(parallel.total_resistance, r / n as f64);
        assert_relative_eq!(
            series.total_resistance / parallel.total_resistance,
            (n * n) as f64
        );
    }

    #[test]
    fn zero_resistance_does_not_panic() {
        // Series: a zero-ohm element just contributes nothing to the total.
        let series = compute(&circuit_with(12.0, Topology::Series, &[0.0, 10.0]));
        assert_eq!(series.total_resistance, 10.0);
        assert_relative_eq!(series.voltage_drops[0], 0.0);

        // Parallel: the short dominates. The branch current is infinite per
        // the raw formula, the reciprocal total collapses to zero, and the
        // zero-total guard keeps the total current at zero.
        let parallel = compute(&circuit_with(12.0, Topology::Parallel, &[0.0, 10.0]));
        assert!(parallel.branch_currents[0].is_infinite());
        assert_eq!(parallel.total_resistance, 0.0);
        assert_eq!(parallel.total_current, 0.0);
    }

    #[test]
    fn negative_resistance_flows_through() {
        let result = compute(&circuit_with(12.0, Topology::Series, &[-10.0, 10.0]));
        assert_eq!(result.total_resistance, 0.0);
        assert_eq!(result.total_current, 0.0);
    }
}
