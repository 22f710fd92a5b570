// Summary generation: deterministic plan composition, prompt assembly, and the
// generation seam. All LLM calls go through llm_client via `SummaryGenerator`.

pub mod composer;
pub mod generator;
pub mod handlers;
pub mod prompts;
