// Response Normalizer: raw model text → validated analysis or a list of violations.

pub mod normalizer;
pub mod violation;

pub use normalizer::{ContentPolicy, Normalizer, Rejection};
pub use violation::{FieldPath, Severity, UpstreamStage, ValidationError, ViolationKind};
