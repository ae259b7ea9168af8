// Error/Diagnostics Reporter: turns rejections and upstream failures into operator-facing reports.

pub mod reporter;

pub use reporter::{AnalysisFailure, FailureReport, ModelAvailability, Reporter};
