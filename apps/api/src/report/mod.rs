// Report generation: chapter prompts, the section pipeline, and finalization.
// All generation calls go through llm_client::TextGenerator.

pub mod chapter;
pub mod compatibility;
pub mod composer;
pub mod finalizer;
pub mod generator;
pub mod handlers;
pub mod prompts;
pub mod validator;
