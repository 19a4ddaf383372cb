pub mod netlist;
pub mod svg;

pub use netlist::{BranchEdge, NetNode, Netlist, NetlistStats};
pub use svg::render_schematic;
