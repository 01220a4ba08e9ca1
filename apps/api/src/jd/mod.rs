// Job-description pipeline: classify pasted text, extract postings from links,
// and score résumés against the result.
// Model calls go through llm_client and browser work through browser::with_session.

pub mod classifier;
pub mod extractor;
pub mod handlers;
pub mod input;
pub mod prompts;
pub mod scorer;
