// Deterministic scoring layer: score → tier → authored interpretation.
// No I/O and no LLM calls here.

pub mod bucketer;
pub mod interpretations;
