use std::fmt;

use serde::{Serialize, Serializer};

/// One step from the root of a document: an object key or an array index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    Key(String),
    Index(usize),
}

/// Ordered location of a value inside the model response.
/// Displays as `$`, `$.career_roadmap.learning_plan_6_months[2].focus`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FieldPath(Vec<PathSegment>);

impl FieldPath {
    pub fn root() -> Self {
        Self::default()
    }

    pub fn key(&self, key: impl Into<String>) -> Self {
        let mut segments = self.0.clone();
        segments.push(PathSegment::Key(key.into()));
        Self(segments)
    }

    pub fn index(&self, index: usize) -> Self {
        let mut segments = self.0.clone();
        segments.push(PathSegment::Index(index));
        Self(segments)
    }

    #[cfg(test)]
    /// Builds a path from dotted keys, e.g. `FieldPath::from_keys(&["market_intel", "market_demand"])`.
    pub fn from_keys(keys: &[&str]) -> Self {
        keys.iter().fold(Self::root(), |p, k| p.key(*k))
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("$")?;
        for segment in &self.0 {
            match segment {
                PathSegment::Key(k) => write!(f, ".{k}")?,
                PathSegment::Index(i) => write!(f, "[{i}]")?,
            }
        }
        Ok(())
    }
}

impl Serialize for FieldPath {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

/// Where an upstream failure originated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UpstreamStage {
    Extraction,
    Model,
}

/// The constraint that failed, with the expected and actual data needed to explain it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum ViolationKind {
    Unparseable {
        message: String,
    },
    MissingRequiredField,
    TypeMismatch {
        expected: &'static str,
        actual: &'static str,
    },
    EnumMismatch {
        allowed: &'static [&'static str],
        actual: String,
    },
    LengthMismatch {
        expected: usize,
        actual: usize,
    },
    ForbiddenMarkup {
        marker: &'static str,
    },
    TooShort {
        required: usize,
        actual: usize,
    },
    UpstreamFailure {
        stage: UpstreamStage,
        message: String,
    },
}

impl ViolationKind {
    pub fn code(&self) -> &'static str {
        match self {
            ViolationKind::Unparseable { .. } => "unparseable",
            ViolationKind::MissingRequiredField => "missing-required-field",
            ViolationKind::TypeMismatch { .. } => "type-mismatch",
            ViolationKind::EnumMismatch { .. } => "enum-mismatch",
            ViolationKind::LengthMismatch { .. } => "length-mismatch",
            ViolationKind::ForbiddenMarkup { .. } => "forbidden-markup",
            ViolationKind::TooShort { .. } => "too-short",
            ViolationKind::UpstreamFailure { .. } => "upstream-failure",
        }
    }

    fn describe(&self) -> String {
        match self {
            ViolationKind::Unparseable { message } => {
                format!("response is not a JSON document: {message}")
            }
            ViolationKind::MissingRequiredField => "required field is missing".to_string(),
            ViolationKind::TypeMismatch { expected, actual } => {
                format!("expected {expected}, found {actual}")
            }
            ViolationKind::EnumMismatch { allowed, actual } => {
                format!("'{actual}' is not one of {}", allowed.join(", "))
            }
            ViolationKind::LengthMismatch { expected, actual } => {
                format!("expected exactly {expected} entries, found {actual}")
            }
            ViolationKind::ForbiddenMarkup { marker } => {
                format!("contains forbidden markup '{marker}'")
            }
            ViolationKind::TooShort { required, actual } => {
                format!("{actual} words, at least {required} required")
            }
            ViolationKind::UpstreamFailure { stage, message } => match stage {
                UpstreamStage::Extraction => format!("text extraction failed: {message}"),
                UpstreamStage::Model => format!("model call failed: {message}"),
            },
        }
    }
}

/// A single failed constraint at a specific path.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationError {
    pub path: FieldPath,
    #[serde(flatten)]
    pub kind: ViolationKind,
    pub severity: Severity,
    pub detail: String,
}

impl ValidationError {
    pub fn new(path: FieldPath, kind: ViolationKind) -> Self {
        let detail = kind.describe();
        Self {
            path,
            kind,
            severity: Severity::Error,
            detail,
        }
    }

    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    pub fn upstream(stage: UpstreamStage, message: impl Into<String>) -> Self {
        Self::new(
            FieldPath::root(),
            ViolationKind::UpstreamFailure {
                stage,
                message: message.into(),
            },
        )
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}
