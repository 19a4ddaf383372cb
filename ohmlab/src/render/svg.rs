//! Animated SVG schematic renderer.
//!
//! Produces a standalone 800x500 SVG string from a circuit and its computed
//! result. Series circuits draw as a rectangular loop with resistor glyphs
//! spaced along the top edge; parallel circuits draw as two bus rails with
//! one vertical branch per element. Current flow is shown with SMIL
//! `animateMotion` particles whose period scales with the branch current.

use crate::analyzer::compute::CalculationResult;
use crate::circuit::{Circuit, Topology};

const VIEW_WIDTH: u32 = 800;
const VIEW_HEIGHT: u32 = 500;

const WIRE_COLOR: &str = "#334155";
const RESISTOR_COLOR: &str = "#eab308";
const LABEL_COLOR: &str = "#cbd5e1";
const VALUE_COLOR: &str = "#facc15";
const CURRENT_COLOR: &str = "#4ade80";
const BATTERY_COLOR: &str = "#60a5fa";
const BATTERY_FILL: &str = "#1e293b";

/// Particle speed cap; keeps the animation readable for large currents.
const MAX_PARTICLE_SPEED: f64 = 10.0;

/// Render the schematic for a circuit and its result.
///
/// The result must be the output of [`crate::analyzer::compute`] for the
/// same circuit value.
pub fn render_schematic(circuit: &Circuit, result: &CalculationResult) -> String {
    let mut svg = String::with_capacity(4096);
    svg.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" viewBox=\"0 0 {VIEW_WIDTH} {VIEW_HEIGHT}\">\n"
    ));

    match circuit.topology() {
        Topology::Series => render_series(&mut svg, circuit, result),
        Topology::Parallel => render_parallel(&mut svg, circuit, result),
    }

    svg.push_str("</svg>\n");
    svg
}

fn render_series(svg: &mut String, circuit: &Circuit, result: &CalculationResult) {
    // Loop outline and battery on the bottom edge.
    svg.push_str(&format!(
        "  <rect x=\"50\" y=\"150\" width=\"700\" height=\"200\" fill=\"none\" \
         stroke=\"{WIRE_COLOR}\" stroke-width=\"2\" stroke-dasharray=\"5,5\"/>\n"
    ));
    svg.push_str(&format!(
        "  <rect x=\"350\" y=\"340\" width=\"100\" height=\"20\" fill=\"{BATTERY_FILL}\" \
         stroke=\"{BATTERY_COLOR}\" stroke-width=\"2\" rx=\"4\"/>\n"
    ));
    svg.push_str(&format!(
        "  <text x=\"400\" y=\"355\" text-anchor=\"middle\" font-size=\"12\" \
         fill=\"{BATTERY_COLOR}\">{}V Battery</text>\n",
        circuit.supply_voltage()
    ));

    let n = circuit.len().max(1);
    for (i, element) in circuit.elements().iter().enumerate() {
        let x = 150.0 + i as f64 * (500.0 / n as f64);
        resistor_glyph(
            svg,
            x,
            150.0,
            &format!("R{}", i + 1),
            element.resistance,
            result.total_current,
        );
    }

    // One particle train around the whole loop; series current is uniform.
    let speed = particle_speed(result.total_current);
    if speed > 0.0 {
        let path = "M 50 150 L 750 150 L 750 350 L 50 350 Z";
        let period = 10.0 / speed;
        particle_train(svg, path, 15, 3.0, period);
    }
}

fn render_parallel(svg: &mut String, circuit: &Circuit, result: &CalculationResult) {
    // Bus rails.
    svg.push_str(&format!(
        "  <line x1=\"150\" y1=\"150\" x2=\"650\" y2=\"150\" stroke=\"{WIRE_COLOR}\" \
         stroke-width=\"3\"/>\n"
    ));
    svg.push_str(&format!(
        "  <line x1=\"150\" y1=\"350\" x2=\"650\" y2=\"350\" stroke=\"{WIRE_COLOR}\" \
         stroke-width=\"3\"/>\n"
    ));

    // Battery column on the left.
    svg.push_str(&format!(
        "  <path d=\"M 150 150 L 100 150 L 100 350 L 150 350\" fill=\"none\" \
         stroke=\"{WIRE_COLOR}\" stroke-width=\"2\"/>\n"
    ));
    svg.push_str(&format!(
        "  <rect x=\"60\" y=\"240\" width=\"80\" height=\"20\" fill=\"{BATTERY_FILL}\" \
         stroke=\"{BATTERY_COLOR}\" stroke-width=\"2\" rx=\"4\" \
         transform=\"rotate(-90, 100, 250)\"/>\n"
    ));
    svg.push_str(&format!(
        "  <text x=\"85\" y=\"255\" text-anchor=\"middle\" font-size=\"12\" \
         fill=\"{BATTERY_COLOR}\" transform=\"rotate(-90, 100, 250)\">{}V</text>\n",
        circuit.supply_voltage()
    ));

    let n = circuit.len().max(1);
    for (i, element) in circuit.elements().iter().enumerate() {
        let x = 200.0 + i as f64 * (400.0 / n as f64);
        let current = result.branch_currents.get(i).copied().unwrap_or(0.0);

        svg.push_str(&format!(
            "  <line x1=\"{x}\" y1=\"150\" x2=\"{x}\" y2=\"230\" stroke=\"{WIRE_COLOR}\" \
             stroke-width=\"2\"/>\n"
        ));
        svg.push_str(&format!(
            "  <line x1=\"{x}\" y1=\"270\" x2=\"{x}\" y2=\"350\" stroke=\"{WIRE_COLOR}\" \
             stroke-width=\"2\"/>\n"
        ));
        resistor_glyph(svg, x, 250.0, &format!("R{}", i + 1), element.resistance, current);

        // Branch particles; each branch animates at its own current.
        let speed = particle_speed(current);
        if speed > 0.0 {
            let path = format!("M {x} 150 L {x} 350");
            let period = 2.0 / speed;
            particle_train(svg, &path, 5, 2.5, period);
        }
    }
}

/// Zigzag resistor glyph with its label, value, and current annotations.
fn resistor_glyph(svg: &mut String, x: f64, y: f64, label: &str, ohms: f64, amps: f64) {
    svg.push_str(&format!("  <g transform=\"translate({x}, {y})\">\n"));
    svg.push_str(&format!(
        "    <path d=\"M -20 0 L -15 0 L -12 -8 L -6 8 L 0 -8 L 6 8 L 12 -8 L 15 0 L 20 0\" \
         fill=\"none\" stroke=\"{RESISTOR_COLOR}\" stroke-width=\"3\" \
         stroke-linejoin=\"round\"/>\n"
    ));
    svg.push_str(&format!(
        "    <text y=\"-25\" text-anchor=\"middle\" font-size=\"10\" \
         fill=\"{LABEL_COLOR}\">{label}</text>\n"
    ));
    svg.push_str(&format!(
        "    <text y=\"25\" text-anchor=\"middle\" font-size=\"10\" \
         fill=\"{VALUE_COLOR}\">{ohms}&#937;</text>\n"
    ));
    svg.push_str(&format!(
        "    <text y=\"40\" text-anchor=\"middle\" font-size=\"10\" \
         fill=\"{CURRENT_COLOR}\">{amps:.2}A</text>\n"
    ));
    svg.push_str("  </g>\n");
}

/// A train of `count` particles evenly staggered along `path`.
fn particle_train(svg: &mut String, path: &str, count: usize, radius: f64, period: f64) {
    svg.push_str("  <g>\n");
    for i in 0..count {
        let begin = i as f64 * (period / count as f64);
        svg.push_str(&format!(
            "    <circle r=\"{radius}\" fill=\"{CURRENT_COLOR}\">\
             <animateMotion path=\"{path}\" dur=\"{period:.3}s\" \
             repeatCount=\"indefinite\" begin=\"{begin:.3}s\"/></circle>\n"
        ));
    }
    svg.push_str("  </g>\n");
}

/// Visual flow speed for a branch current, capped for readability. Zero or
/// negative (or NaN) currents draw no particles.
fn particle_speed(current: f64) -> f64 {
    if !(current > 0.0) {
        return 0.0;
    }
    (current * 2.0).min(MAX_PARTICLE_SPEED)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::compute::compute;
    use crate::circuit::{Circuit, Topology};

    fn circuit_with(voltage: f64, topology: Topology, ohms: &[f64]) -> Circuit {
        let mut c = Circuit::new(voltage, topology);
        for &r in ohms {
            let (next, id) = c.add_element().unwrap();
            c = next.set_resistance(id, r);
        }
        c
    }

    #[test]
    fn series_schematic_has_one_glyph_per_element() {
        let circuit = circuit_with(12.0, Topology::Series, &[10.0, 20.0, 30.0]);
        let svg = render_schematic(&circuit, &compute(&circuit));
        assert!(svg.starts_with("<svg"));
        assert_eq!(svg.matches("stroke-linejoin").count(), 3);
        assert!(svg.contains("12V Battery"));
        assert!(svg.contains("R1"));
        assert!(svg.contains("R3"));
    }

    #[test]
    fn live_circuit_animates() {
        let circuit = circuit_with(12.0, Topology::Series, &[10.0, 20.0]);
        let svg = render_schematic(&circuit, &compute(&circuit));
        assert!(svg.contains("animateMotion"));
    }

    #[test]
    fn dead_circuit_draws_no_particles() {
        let circuit = circuit_with(0.0, Topology::Series, &[10.0, 20.0]);
        let svg = render_schematic(&circuit, &compute(&circuit));
        assert!(!svg.contains("animateMotion"));
    }

    #[test]
    fn parallel_branches_animate_independently() {
        let circuit = circuit_with(12.0, Topology::Parallel, &[10.0, 20.0]);
        let svg = render_schematic(&circuit, &compute(&circuit));
        // Two branches, five particles each.
        assert_eq!(svg.matches("animateMotion").count(), 10);
        assert!(svg.contains("1.20A"));
        assert!(svg.contains("0.60A"));
    }

    #[test]
    fn empty_circuit_still_renders_the_frame() {
        let circuit = Circuit::new(12.0, Topology::Parallel);
        let svg = render_schematic(&circuit, &compute(&circuit));
        assert!(svg.starts_with("<svg"));
        assert!(!svg.contains("stroke-linejoin"));
        assert!(svg.ends_with("</svg>\n"));
    }
}
