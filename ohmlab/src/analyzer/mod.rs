pub mod compute;
pub mod notes;

// Re-export for convenience
pub use compute::{compute, CalculationResult};
pub use notes::{Note, NoteRule, NoteSeverity, NotesEngine};
