// Schema Definition: the declared output shape for an analysis.
// `node` is the grammar, `analysis` the canonical tree, `gemini` the model-facing rendering.

pub mod analysis;
#[cfg(test)]
pub mod fixtures;
pub mod gemini;
pub mod node;

pub use analysis::analysis_schema;
pub use node::SchemaNode;
