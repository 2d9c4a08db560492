// Resume extraction: prompts, per-section results and the orchestrator that sequences them.
// All model calls go through the llm_client::ModelClient trait.

pub mod companies;
pub mod orchestrator;
pub mod prompts;
pub mod sections;

pub use orchestrator::ResumeExtractor;
