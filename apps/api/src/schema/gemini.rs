//! Renders a [`SchemaNode`] as a Gemini `responseSchema` (OpenAPI subset).
//!
//! The model is constrained with the same tree the normalizer validates against,
//! so the two cannot disagree about field names or enum values.

use serde_json::{json, Map, Value};

use crate::schema::node::{ScalarKind, ScalarSchema, SchemaNode, BOLD_MARKER};

pub fn to_response_schema(node: &SchemaNode) -> Value {
    match node {
        SchemaNode::Object(o) => {
            let properties: Map<String, Value> = o
                .fields()
                .iter()
                .map(|f| (f.name.to_string(), to_response_schema(&f.node)))
                .collect();
            let required: Vec<&str> = o.required_names().collect();
            json!({
                "type": "OBJECT",
                "properties": properties,
                "required": required,
            })
        }
        SchemaNode::Array(a) => {
            let mut schema = json!({
                "type": "ARRAY",
                "items": to_response_schema(&a.items),
            });
            if let Some(len) = a.exact_len {
                schema["minItems"] = json!(len);
                schema["maxItems"] = json!(len);
            }
            schema
        }
        SchemaNode::Scalar(s) => scalar_schema(s),
    }
}

fn scalar_schema(s: &ScalarSchema) -> Value {
    let mut schema = match s.kind {
        ScalarKind::String => json!({ "type": "STRING" }),
        ScalarKind::Integer => json!({ "type": "INTEGER" }),
        ScalarKind::Enum(values) => json!({ "type": "STRING", "enum": values }),
    };
    if let Some(description) = describe(s) {
        schema["description"] = Value::String(description);
    }
    schema
}

fn describe(s: &ScalarSchema) -> Option<String> {
    let mut parts: Vec<String> = Vec::new();
    if let Some(d) = s.description {
        parts.push(d.to_string());
    }
    if let Some(min) = s.min_words {
        parts.push(format!("Minimum {min} words."));
    }
    if s.forbid_bold {
        parts.push(format!("NO bolding ({BOLD_MARKER})."));
    }
    (!parts.is_empty()).then(|| parts.join(" "))
}
