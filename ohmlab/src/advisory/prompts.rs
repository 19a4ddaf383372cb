use crate::advisory::provider::TipContext;

/// Fixed system-level instruction sent with every tip request.
pub const SYSTEM_INSTRUCTION: &str = "You are a tutor preparing students for an \
electrician certification exam. Provide short, clear, memorable exam tips.";

/// Build the tip prompt for a circuit state.
pub fn build_tip_prompt(context: &TipContext) -> String {
    format!(
        "The current circuit is wired in {}. It has {} resistor(s) and a total \
         resistance of {:.2} ohms. Based on this configuration, give one key \
         memorization tip that often appears on electrician exams. Answer in a \
         single sentence.",
        context.topology, context.element_count, context.total_resistance
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circuit::Topology;

    #[test]
    fn prompt_embeds_the_circuit_state() {
        let prompt = build_tip_prompt(&TipContext {
            topology: Topology::Parallel,
            element_count: 3,
            total_resistance: 6.6667,
        });
        assert!(prompt.contains("parallel"));
        assert!(prompt.contains("3 resistor(s)"));
        assert!(prompt.contains("6.67 ohms"));
        assert!(prompt.contains("single sentence"));
    }

    #[test]
    fn system_instruction_is_fixed_and_nonempty() {
        assert!(!SYSTEM_INSTRUCTION.is_empty());
        assert!(SYSTEM_INSTRUCTION.contains("exam"));
    }
}
