//! Schema Node: an immutable, recursive description of an expected JSON shape.
//!
//! Nodes are built once through the small builder API below and never mutated.
//! An object's required names are always a subset of its declared fields: a field
//! is declared either `required` or `optional`, so there is no separate list to
//! drift out of sync.

/// Two-character emphasis marker forbidden in "no bold" scalars.
pub const BOLD_MARKER: &str = "**";

#[derive(Debug, Clone, PartialEq)]
pub enum SchemaNode {
    Object(ObjectSchema),
    Array(ArraySchema),
    Scalar(ScalarSchema),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: &'static str,
    pub node: SchemaNode,
    pub required: bool,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ObjectSchema {
    fields: Vec<Field>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ArraySchema {
    pub items: Box<SchemaNode>,
    /// Only the learning plan carries one.
    pub exact_len: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarKind {
    String,
    Integer,
    Enum(&'static [&'static str]),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScalarSchema {
    pub kind: ScalarKind,
    pub min_words: Option<usize>,
    pub forbid_bold: bool,
    /// Guidance forwarded to the model; never used for validation.
    pub description: Option<&'static str>,
}

// ────────────────────────────────────────────────────────────────────────────
// Builders
// ────────────────────────────────────────────────────────────────────────────

pub fn object() -> ObjectSchema {
    ObjectSchema::default()
}

pub fn array(items: impl Into<SchemaNode>) -> ArraySchema {
    ArraySchema {
        items: Box::new(items.into()),
        exact_len: None,
    }
}

pub fn string() -> ScalarSchema {
    ScalarSchema::new(ScalarKind::String)
}

pub fn integer() -> ScalarSchema {
    ScalarSchema::new(ScalarKind::Integer)
}

pub fn enumeration(values: &'static [&'static str]) -> ScalarSchema {
    ScalarSchema::new(ScalarKind::Enum(values))
}

impl ObjectSchema {
    pub fn required(mut self, name: &'static str, node: impl Into<SchemaNode>) -> Self {
        self.fields.push(Field {
            name,
            node: node.into(),
            required: true,
        });
        self
    }

    pub fn optional(mut self, name: &'static str, node: impl Into<SchemaNode>) -> Self {
        self.fields.push(Field {
            name,
            node: node.into(),
            required: false,
        });
        self
    }

    /// Fields in declaration order.
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn required_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().filter(|f| f.required).map(|f| f.name)
    }
}

impl ArraySchema {
    pub fn exact_len(mut self, len: usize) -> Self {
        self.exact_len = Some(len);
        self
    }
}

impl ScalarSchema {
    fn new(kind: ScalarKind) -> Self {
        Self {
            kind,
            min_words: None,
            forbid_bold: false,
            description: None,
        }
    }

    pub fn min_words(mut self, words: usize) -> Self {
        self.min_words = Some(words);
        self
    }

    pub fn no_bold(mut self) -> Self {
        self.forbid_bold = true;
        self
    }

    pub fn describe(mut self, description: &'static str) -> Self {
        self.description = Some(description);
        self
    }
}

impl ScalarKind {
    pub fn type_name(&self) -> &'static str {
        match self {
            ScalarKind::String | ScalarKind::Enum(_) => "string",
            ScalarKind::Integer => "integer",
        }
    }
}

impl From<ObjectSchema> for SchemaNode {
    fn from(o: ObjectSchema) -> Self {
        SchemaNode::Object(o)
    }
}

impl From<ArraySchema> for SchemaNode {
    fn from(a: ArraySchema) -> Self {
        SchemaNode::Array(a)
    }
}

impl From<ScalarSchema> for SchemaNode {
    fn from(s: ScalarSchema) -> Self {
        SchemaNode::Scalar(s)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Queries
// ────────────────────────────────────────────────────────────────────────────

impl SchemaNode {
    /// Every scalar with a word floor, as `(dotted path, min_words)` in declaration order.
    /// Array elements appear as `[]` in the path.
    pub fn word_floors(&self) -> Vec<(String, usize)> {
        let mut out = Vec::new();
        collect_word_floors(self, String::new(), &mut out);
        out
    }

    /// Dotted paths of every scalar flagged "no bold", in declaration order.
    pub fn no_bold_paths(&self) -> Vec<String> {
        let mut out = Vec::new();
        collect_no_bold(self, String::new(), &mut out);
        out
    }
}

fn child_path(parent: &str, name: &str) -> String {
    if parent.is_empty() {
        name.to_string()
    } else {
        format!("{parent}.{name}")
    }
}

fn collect_word_floors(node: &SchemaNode, path: String, out: &mut Vec<(String, usize)>) {
    match node {
        SchemaNode::Object(o) => {
            for f in o.fields() {
                collect_word_floors(&f.node, child_path(&path, f.name), out);
            }
        }
        SchemaNode::Array(a) => collect_word_floors(&a.items, format!("{path}[]"), out),
        SchemaNode::Scalar(s) => {
            if let Some(min) = s.min_words {
                out.push((path, min));
            }
        }
    }
}

fn collect_no_bold(node: &SchemaNode, path: String, out: &mut Vec<String>) {
    match node {
        SchemaNode::Object(o) => {
            for f in o.fields() {
                collect_no_bold(&f.node, child_path(&path, f.name), out);
            }
        }
        SchemaNode::Array(a) => collect_no_bold(&a.items, format!("{path}[]"), out),
        SchemaNode::Scalar(s) => {
            if s.forbid_bold {
                out.push(path);
            }
        }
    }
}
