//! Response Normalizer. Validates raw model text against a [`SchemaNode`].
//!
//! Traversal collects every violation in schema declaration order. The only
//! short-circuit is an unparseable root, which yields exactly one violation.
//! Unknown fields are tolerated and passed through untouched.

use serde::Serialize;
use serde_json::Value;

use crate::normalize::violation::{FieldPath, Severity, ValidationError, ViolationKind};
use crate::schema::node::{ArraySchema, ObjectSchema, ScalarKind, ScalarSchema, SchemaNode, BOLD_MARKER};

/// Severity applied to word-count floors. Every other kind is always an error.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ContentPolicy {
    /// `too-short` is reported as a warning and does not reject the response.
    #[default]
    Advisory,
    /// `too-short` rejects the response.
    Strict,
}

impl std::str::FromStr for ContentPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "advisory" => Ok(ContentPolicy::Advisory),
            "strict" => Ok(ContentPolicy::Strict),
            other => Err(format!("unknown content policy '{other}' (expected advisory|strict)")),
        }
    }
}

/// A response that passed validation. `value` is the parsed document, unchanged.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisResult {
    pub value: Value,
    pub warnings: Vec<ValidationError>,
}

/// A response that failed validation, with every violation found and the raw text.
#[derive(Debug, Clone, Serialize)]
pub struct Rejection {
    pub violations: Vec<ValidationError>,
    pub raw: String,
}

impl Rejection {
    pub fn is_unparseable(&self) -> bool {
        matches!(
            self.violations.as_slice(),
            [ValidationError {
                kind: ViolationKind::Unparseable { .. },
                ..
            }]
        )
    }

    pub fn errors(&self) -> impl Iterator<Item = &ValidationError> {
        self.violations.iter().filter(|v| v.is_error())
    }
}

pub struct Normalizer<'s> {
    schema: &'s SchemaNode,
    policy: ContentPolicy,
}

impl<'s> Normalizer<'s> {
    pub fn new(schema: &'s SchemaNode, policy: ContentPolicy) -> Self {
        Self { schema, policy }
    }

    pub fn normalize(&self, raw: &str) -> Result<AnalysisResult, Rejection> {
        let value: Value = match serde_json::from_str(raw) {
            Ok(v) => v,
            Err(e) => {
                return Err(Rejection {
                    violations: vec![ValidationError::new(
                        FieldPath::root(),
                        ViolationKind::Unparseable {
                            message: e.to_string(),
                        },
                    )],
                    raw: raw.to_string(),
                });
            }
        };

        let violations = self.validate(&value);
        if violations.iter().any(ValidationError::is_error) {
            return Err(Rejection {
                violations,
                raw: raw.to_string(),
            });
        }

        Ok(AnalysisResult {
            value,
            warnings: violations,
        })
    }

    /// Validates an already-parsed document. Returns every violation, errors and warnings alike.
    pub fn validate(&self, value: &Value) -> Vec<ValidationError> {
        let mut out = Vec::new();
        self.walk(value, self.schema, &FieldPath::root(), &mut out);
        out
    }

    fn walk(&self, value: &Value, node: &SchemaNode, path: &FieldPath, out: &mut Vec<ValidationError>) {
        match node {
            SchemaNode::Object(o) => self.walk_object(value, o, path, out),
            SchemaNode::Array(a) => self.walk_array(value, a, path, out),
            SchemaNode::Scalar(s) => self.check_scalar(value, s, path, out),
        }
    }

    fn walk_object(
        &self,
        value: &Value,
        schema: &ObjectSchema,
        path: &FieldPath,
        out: &mut Vec<ValidationError>,
    ) {
        let Some(map) = value.as_object() else {
            out.push(type_mismatch(path.clone(), "object", value));
            return;
        };

        for field in schema.fields() {
            let field_path = path.key(field.name);
            match map.get(field.name) {
                None => {
                    if field.required {
                        out.push(ValidationError::new(field_path, ViolationKind::MissingRequiredField));
                    }
                }
                Some(Value::Null) if !field.required => {}
                Some(v) => self.walk(v, &field.node, &field_path, out),
            }
        }
    }

    fn walk_array(
        &self,
        value: &Value,
        schema: &ArraySchema,
        path: &FieldPath,
        out: &mut Vec<ValidationError>,
    ) {
        let Some(items) = value.as_array() else {
            out.push(type_mismatch(path.clone(), "array", value));
            return;
        };

        if let Some(expected) = schema.exact_len {
            if items.len() != expected {
                out.push(ValidationError::new(
                    path.clone(),
                    ViolationKind::LengthMismatch {
                        expected,
                        actual: items.len(),
                    },
                ));
            }
        }

        for (i, item) in items.iter().enumerate() {
            self.walk(item, &schema.items, &path.index(i), out);
        }
    }

    fn check_scalar(
        &self,
        value: &Value,
        schema: &ScalarSchema,
        path: &FieldPath,
        out: &mut Vec<ValidationError>,
    ) {
        if schema.kind == ScalarKind::Integer {
            if !(value.is_i64() || value.is_u64()) {
                out.push(type_mismatch(path.clone(), schema.kind.type_name(), value));
            }
            return;
        }

        let Some(text) = value.as_str() else {
            out.push(type_mismatch(path.clone(), schema.kind.type_name(), value));
            return;
        };

        if let ScalarKind::Enum(allowed) = schema.kind {
            if !allowed.contains(&text) {
                out.push(ValidationError::new(
                    path.clone(),
                    ViolationKind::EnumMismatch {
                        allowed,
                        actual: text.to_string(),
                    },
                ));
            }
        }

        if schema.forbid_bold && text.contains(BOLD_MARKER) {
            out.push(ValidationError::new(
                path.clone(),
                ViolationKind::ForbiddenMarkup {
                    marker: BOLD_MARKER,
                },
            ));
        }

        if let Some(required) = schema.min_words {
            let actual = text.split_whitespace().count();
            if actual < required {
                let severity = match self.policy {
                    ContentPolicy::Advisory => Severity::Warning,
                    ContentPolicy::Strict => Severity::Error,
                };
                out.push(
                    ValidationError::new(path.clone(), ViolationKind::TooShort { required, actual })
                        .with_severity(severity),
                );
            }
        }
    }
}

fn type_mismatch(path: FieldPath, expected: &'static str, actual: &Value) -> ValidationError {
    ValidationError::new(
        path,
        ViolationKind::TypeMismatch {
            expected,
            actual: json_type_name(actual),
        },
    )
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_f64() => "number",
        Value::Number(_) => "integer",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::analysis::{analysis_schema, TOP_LEVEL_SECTIONS};
    use crate::schema::fixtures::{valid_analysis, words};
    use crate::schema::node::SchemaNode;
    use serde_json::json;

    fn normalizer() -> Normalizer<'static> {
        Normalizer::new(analysis_schema(), ContentPolicy::Advisory)
    }

    fn kinds(violations: &[ValidationError]) -> Vec<&'static str> {
        violations.iter().map(|v| v.kind.code()).collect()
    }

    /// Every `(path, field name)` pair declared required by the schema, depth-first.
    fn required_paths(node: &SchemaNode, value: &Value, path: Vec<String>, out: &mut Vec<Vec<String>>) {
        match node {
            SchemaNode::Object(o) => {
                for f in o.fields().iter().filter(|f| f.required) {
                    let mut child = path.clone();
                    child.push(f.name.to_string());
                    out.push(child.clone());
                    if let Some(v) = value.get(f.name) {
                        required_paths(&f.node, v, child, out);
                    }
                }
            }
            SchemaNode::Array(a) => {
                if let Some(first) = value.get(0) {
                    let mut child = path.clone();
                    child.push("0".to_string());
                    required_paths(&a.items, first, child, out);
                }
            }
            SchemaNode::Scalar(_) => {}
        }
    }

    fn remove_at(value: &mut Value, path: &[String]) {
        let (last, parents) = path.split_last().expect("non-empty path");
        let mut cursor = value;
        for segment in parents {
            cursor = match segment.parse::<usize>() {
                Ok(i) => &mut cursor[i],
                Err(_) => &mut cursor[segment.as_str()],
            };
        }
        cursor.as_object_mut().expect("object parent").remove(last);
    }

    fn field_path(path: &[String]) -> FieldPath {
        path.iter().fold(FieldPath::root(), |p, s| match s.parse::<usize>() {
            Ok(i) => p.index(i),
            Err(_) => p.key(s.as_str()),
        })
    }

    #[test]
    fn test_valid_document_passes_unchanged() {
        let input = valid_analysis();
        let result = normalizer()
            .normalize(&input.to_string())
            .expect("fixture must validate");
        assert_eq!(result.value, input);
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_renormalizing_is_idempotent() {
        let n = normalizer();
        let first = n.normalize(&valid_analysis().to_string()).unwrap();
        let serialized = serde_json::to_string_pretty(&first.value).unwrap();
        let second = n.normalize(&serialized).unwrap();
        assert!(second.warnings.is_empty());
        assert_eq!(first.value, second.value);
    }

    #[test]
    fn test_each_missing_required_field_is_reported_at_its_path() {
        let fixture = valid_analysis();
        let mut paths = Vec::new();
        required_paths(analysis_schema(), &fixture, Vec::new(), &mut paths);
        assert!(paths.len() > 60, "walk should cover the nested schema");

        for path in paths {
            let mut doc = fixture.clone();
            remove_at(&mut doc, &path);
            let rejection = normalizer()
                .normalize(&doc.to_string())
                .expect_err("missing field must reject");
            let expected = field_path(&path);
            assert!(
                rejection.violations.iter().any(|v| v.kind == ViolationKind::MissingRequiredField
                    && v.path == expected),
                "no missing-required-field at {expected}: {:?}",
                rejection.violations
            );
        }
    }

    #[test]
    fn test_missing_top_level_section() {
        for section in TOP_LEVEL_SECTIONS {
            let mut doc = valid_analysis();
            doc.as_object_mut().unwrap().remove(*section);
            let rejection = normalizer().normalize(&doc.to_string()).unwrap_err();
            assert_eq!(rejection.violations.len(), 1);
            assert_eq!(rejection.violations[0].path, FieldPath::root().key(*section));
        }
    }

    #[test]
    fn test_learning_plan_length_mismatch() {
        for count in [5usize, 7] {
            let mut doc = valid_analysis();
            doc["career_roadmap"]["learning_plan_6_months"] = json!((1..=count)
                .map(|m| json!({ "month": m, "focus": "Focus" }))
                .collect::<Vec<_>>());
            let rejection = normalizer().normalize(&doc.to_string()).unwrap_err();
            let length_errors: Vec<_> = rejection
                .violations
                .iter()
                .filter(|v| matches!(v.kind, ViolationKind::LengthMismatch { .. }))
                .collect();
            assert_eq!(length_errors.len(), 1);
            assert_eq!(
                length_errors[0].kind,
                ViolationKind::LengthMismatch {
                    expected: 6,
                    actual: count
                }
            );
            assert_eq!(
                length_errors[0].path,
                FieldPath::from_keys(&["career_roadmap", "learning_plan_6_months"])
            );
        }
    }

    #[test]
    fn test_learning_plan_of_six_has_no_length_error() {
        let violations = normalizer().validate(&valid_analysis());
        assert!(!kinds(&violations).contains(&"length-mismatch"));
    }

    #[test]
    fn test_market_demand_is_case_sensitive() {
        let mut doc = valid_analysis();
        doc["market_intel"]["market_demand"] = json!("high");
        let rejection = normalizer().normalize(&doc.to_string()).unwrap_err();
        assert_eq!(kinds(&rejection.violations), vec!["enum-mismatch"]);
        assert_eq!(
            rejection.violations[0].path,
            FieldPath::from_keys(&["market_intel", "market_demand"])
        );

        doc["market_intel"]["market_demand"] = json!("High");
        assert!(normalizer().normalize(&doc.to_string()).is_ok());
    }

    #[test]
    fn test_recruiter_decision_enum() {
        let mut doc = valid_analysis();
        doc["recruiter_review"]["decision"] = json!("Hired");
        let rejection = normalizer().normalize(&doc.to_string()).unwrap_err();
        assert_eq!(
            rejection.violations[0].kind,
            ViolationKind::EnumMismatch {
                allowed: &["Shortlisted", "Rejected", "Maybe"],
                actual: "Hired".to_string()
            }
        );
    }

    #[test]
    fn test_bold_marker_in_no_bold_field() {
        let mut doc = valid_analysis();
        doc["resume_tailoring"]["enhanced_bullets"][0]["improved"] =
            json!("Cut latency by **40%** with a new cache");
        let rejection = normalizer().normalize(&doc.to_string()).unwrap_err();
        assert_eq!(kinds(&rejection.violations), vec!["forbidden-markup"]);
        assert_eq!(
            rejection.violations[0].path,
            FieldPath::from_keys(&["resume_tailoring", "enhanced_bullets"])
                .index(0)
                .key("improved")
        );
    }

    #[test]
    fn test_bold_marker_allowed_where_not_flagged() {
        let mut doc = valid_analysis();
        doc["resume_tailoring"]["new_summary"] = json!("**Backend** engineer");
        assert!(normalizer().normalize(&doc.to_string()).is_ok());
    }

    #[test]
    fn test_unparseable_root_short_circuits() {
        let rejection = normalizer()
            .normalize("I'm sorry, I can't produce that analysis.")
            .unwrap_err();
        assert_eq!(rejection.violations.len(), 1);
        assert!(rejection.is_unparseable());
        assert!(rejection.violations[0].path.is_root());
        assert_eq!(rejection.raw, "I'm sorry, I can't produce that analysis.");
    }

    #[test]
    fn test_truncated_json_is_unparseable() {
        let mut text = valid_analysis().to_string();
        text.truncate(text.len() / 2);
        let rejection = normalizer().normalize(&text).unwrap_err();
        assert_eq!(kinds(&rejection.violations), vec!["unparseable"]);
    }

    #[test]
    fn test_short_text_is_warning_under_advisory_policy() {
        let mut doc = valid_analysis();
        doc["recruiter_review"]["honest_feedback"] = json!(words(20));
        let result = normalizer().normalize(&doc.to_string()).expect("advisory passes");
        assert_eq!(result.warnings.len(), 1);
        assert_eq!(
            result.warnings[0].kind,
            ViolationKind::TooShort {
                required: 200,
                actual: 20
            }
        );
        assert_eq!(result.warnings[0].severity, Severity::Warning);
    }

    #[test]
    fn test_short_text_rejects_under_strict_policy() {
        let mut doc = valid_analysis();
        doc["career_roadmap"]["final_advice"] = json!("Keep going.");
        let rejection = Normalizer::new(analysis_schema(), ContentPolicy::Strict)
            .normalize(&doc.to_string())
            .unwrap_err();
        assert_eq!(kinds(&rejection.violations), vec!["too-short"]);
        assert!(rejection.violations[0].is_error());
    }

    #[test]
    fn test_word_count_splits_on_whitespace_runs() {
        let mut doc = valid_analysis();
        let spaced = vec!["word"; 50].join("  \n\t ");
        doc["ats_analysis"]["explanation"]["structural_feedback"] = json!(spaced);
        let result = normalizer().normalize(&doc.to_string()).unwrap();
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_all_violations_are_collected() {
        let mut doc = valid_analysis();
        doc["market_intel"]["market_demand"] = json!("low");
        doc["recruiter_review"]["honest_feedback"] = json!(format!("{} **bold**", words(200)));
        doc.as_object_mut().unwrap().remove("interview_prep");
        doc["career_roadmap"]["learning_plan_6_months"]
            .as_array_mut()
            .unwrap()
            .pop();

        let rejection = normalizer().normalize(&doc.to_string()).unwrap_err();
        assert_eq!(
            kinds(&rejection.violations),
            vec![
                "enum-mismatch",
                "forbidden-markup",
                "missing-required-field",
                "length-mismatch"
            ]
        );
    }

    #[test]
    fn test_extra_fields_pass_through() {
        let mut doc = valid_analysis();
        doc["model_notes"] = json!({ "confidence": "high" });
        doc["candidate_info"]["location"] = json!("Remote");
        let result = normalizer().normalize(&doc.to_string()).unwrap();
        assert_eq!(result.value["model_notes"]["confidence"], "high");
        assert_eq!(result.value["candidate_info"]["location"], "Remote");
    }

    #[test]
    fn test_type_mismatches() {
        let mut doc = valid_analysis();
        doc["candidate_info"]["readiness_score"] = json!("82");
        doc["ats_analysis"]["overall_score"] = json!(78.5);
        doc["interview_prep"]["technical_questions"] = json!("one question");
        doc["candidate_info"]["name"] = Value::Null;

        let rejection = normalizer().normalize(&doc.to_string()).unwrap_err();
        let details: Vec<_> = rejection
            .violations
            .iter()
            .map(|v| (v.path.to_string(), v.detail.clone()))
            .collect();
        assert_eq!(
            details,
            vec![
                ("$.candidate_info.name".to_string(), "expected string, found null".to_string()),
                (
                    "$.candidate_info.readiness_score".to_string(),
                    "expected integer, found string".to_string()
                ),
                (
                    "$.ats_analysis.overall_score".to_string(),
                    "expected integer, found number".to_string()
                ),
                (
                    "$.interview_prep.technical_questions".to_string(),
                    "expected array, found string".to_string()
                ),
            ]
        );
    }

    #[test]
    fn test_root_must_be_object() {
        let rejection = normalizer().normalize("[1, 2, 3]").unwrap_err();
        assert_eq!(kinds(&rejection.violations), vec!["type-mismatch"]);
        assert!(!rejection.is_unparseable());
    }

    #[test]
    fn test_optional_null_is_absent() {
        let schema: SchemaNode = crate::schema::node::object()
            .required("a", crate::schema::node::string())
            .optional("b", crate::schema::node::integer())
            .into();
        let n = Normalizer::new(&schema, ContentPolicy::Strict);
        assert!(n.normalize(r#"{"a": "x", "b": null}"#).is_ok());
        assert!(n.normalize(r#"{"a": "x"}"#).is_ok());
        assert!(n.normalize(r#"{"a": "x", "b": "y"}"#).is_err());
    }

    #[test]
    fn test_content_policy_from_str() {
        assert_eq!("Strict".parse::<ContentPolicy>(), Ok(ContentPolicy::Strict));
        assert_eq!("advisory".parse::<ContentPolicy>(), Ok(ContentPolicy::Advisory));
        assert!("lenient".parse::<ContentPolicy>().is_err());
    }

    #[test]
    fn test_deterministic_output() {
        let mut doc = valid_analysis();
        doc["market_intel"]["market_demand"] = json!("medium");
        let text = doc.to_string();
        let a = normalizer().normalize(&text).unwrap_err();
        let b = normalizer().normalize(&text).unwrap_err();
        assert_eq!(a.violations, b.violations);
    }
}
