// Analysis API: prompt building, the shared pipeline, and its two HTTP front ends.
// All model calls go through llm_client; nothing here talks to Gemini directly.

pub mod handlers;
pub mod pipeline;
pub mod prompts;
