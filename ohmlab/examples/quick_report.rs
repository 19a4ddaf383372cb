//! Quick report example: evaluate a circuit and print the numbers.

use ohmlab::prelude::*;

fn main() -> Result<(), CircuitError> {
    let mut circuit = Circuit::new(12.0, Topology::Parallel);
    for ohms in [10.0, 20.0, 30.0] {
        let (next, id) = circuit.add_element()?;
        circuit = next.set_resistance(id, ohms);
    }

    let result = compute(&circuit);

    println!("Topology:         {}", circuit.topology());
    println!("Supply voltage:   {} V", circuit.supply_voltage());
    println!("Total resistance: {:.2} ohms", result.total_resistance);
    println!("Total current:    {:.2} A", result.total_current);
    println!();

    for (i, element) in circuit.elements().iter().enumerate() {
        println!(
            "R{}: {:>6.1} ohms   {:.2} A   {:.2} V",
            i + 1,
            element.resistance,
            result.branch_currents[i],
            result.voltage_drops[i],
        );
    }

    println!();
    for note in ohmlab::study_notes(&circuit) {
        println!("[{}] {}", note.rule_id, note.message);
    }

    Ok(())
}
