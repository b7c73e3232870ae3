//! Schema-driven normalization of parsed model output.
//!
//! The upstream generator is non-deterministic and not bound to the shape
//! it was asked for. Normalization makes every downstream assumption
//! ("this field exists, has this type, is in this range") true by
//! construction: missing or mistyped fields are replaced by declared
//! defaults, numbers are clamped, arrays are padded and truncated. It is
//! total — any JSON value in, a conformant value out — and never fails.

use serde_json::{Map, Number, Value};

use crate::extract::BracketPreference;

/// Expected kind of a single field, plus any kind-specific policy.
#[derive(Debug, Clone)]
pub enum FieldKind {
    String,
    Number { clamp: Option<(f64, f64)> },
    Object(Shape),
    Array(ArrayPolicy),
}

/// Declarative spec for one field: the expected kind and the default
/// substituted when the incoming value is missing or mistyped.
#[derive(Debug, Clone)]
pub struct FieldSpec {
    pub kind: FieldKind,
    pub default: Value,
}

/// An object shape: ordered field-name/spec pairs.
#[derive(Debug, Clone, Default)]
pub struct Shape {
    fields: Vec<(String, FieldSpec)>,
}

/// Handling policy for array fields.
#[derive(Debug, Clone, Default)]
pub struct ArrayPolicy {
    /// Element-level normalization applied to every entry.
    pub element: Option<Box<FieldSpec>>,
    /// Arrays shorter than this are rejected wholesale in favor of the
    /// field default.
    pub min_len: Option<usize>,
    /// Arrays longer than this are truncated, keeping encounter order.
    pub max_len: Option<usize>,
    /// Pad with element defaults (and truncate) to exactly this length.
    pub pad_to: Option<usize>,
    /// Accept a bare object as a one-element array. Models sometimes
    /// collapse a requested list into a single object.
    pub wrap_single_object: bool,
}

impl FieldSpec {
    pub fn string(default: &str) -> Self {
        Self {
            kind: FieldKind::String,
            default: Value::String(default.to_string()),
        }
    }

    pub fn number(default: f64) -> Self {
        Self {
            kind: FieldKind::Number { clamp: None },
            default: json_number(default),
        }
    }

    /// Numeric field clamped to `[lo, hi]`. The default is clamped at
    /// construction so substituted values always satisfy the range.
    pub fn number_clamped(default: f64, lo: f64, hi: f64) -> Self {
        Self {
            kind: FieldKind::Number {
                clamp: Some((lo, hi)),
            },
            default: json_number(default.clamp(lo, hi)),
        }
    }

    /// Nested object field. The default is the shape's fully-defaulted
    /// rendition, so a missing sub-object still yields every sub-field.
    pub fn object(shape: Shape) -> Self {
        let default = shape.normalize(Value::Null);
        Self {
            kind: FieldKind::Object(shape),
            default,
        }
    }

    /// Array field. A `pad_to` policy defaults to that many element
    /// defaults; otherwise the default is the empty array.
    pub fn array(policy: ArrayPolicy) -> Self {
        let default = match policy.pad_to {
            Some(n) => Value::Array(vec![element_default(&policy); n]),
            None => Value::Array(Vec::new()),
        };
        Self {
            kind: FieldKind::Array(policy),
            default,
        }
    }
}

impl Shape {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(mut self, name: &str, spec: FieldSpec) -> Self {
        self.fields.push((name.to_string(), spec));
        self
    }

    /// Normalizes `value` against this shape. Unknown incoming fields pass
    /// through untouched; every declared field is overwritten with its
    /// normalized value. Non-object inputs normalize to the fully-defaulted
    /// shape.
    pub fn normalize(&self, value: Value) -> Value {
        let mut map = match value {
            Value::Object(m) => m,
            _ => Map::new(),
        };
        for (name, spec) in &self.fields {
            let incoming = map.remove(name);
            map.insert(name.clone(), normalize_field(spec, incoming));
        }
        Value::Object(map)
    }
}

/// A complete per-endpoint expectation: the root shape the model was asked
/// for, plus the bracket preference used when scanning its raw output.
#[derive(Debug, Clone)]
pub struct SchemaDescriptor {
    root: FieldSpec,
    preference: BracketPreference,
}

impl SchemaDescriptor {
    /// Object-shaped response. Scans object-first.
    pub fn object(shape: Shape) -> Self {
        Self {
            root: FieldSpec::object(shape),
            preference: BracketPreference::ObjectFirst,
        }
    }

    /// List-shaped response. Scans array-first.
    pub fn array(policy: ArrayPolicy) -> Self {
        Self {
            root: FieldSpec::array(policy),
            preference: BracketPreference::ArrayFirst,
        }
    }

    pub fn with_preference(mut self, preference: BracketPreference) -> Self {
        self.preference = preference;
        self
    }

    pub fn preference(&self) -> BracketPreference {
        self.preference
    }

    /// Total normalization: any JSON value in (including `null` and
    /// scalars), a value satisfying every declared field, type, and range
    /// constraint out. Never fails, and is idempotent.
    pub fn normalize(&self, value: Value) -> Value {
        normalize_field(&self.root, Some(value))
    }
}

/// Applies one field's policy to an optional incoming value.
pub fn normalize_field(spec: &FieldSpec, value: Option<Value>) -> Value {
    match (&spec.kind, value) {
        (FieldKind::String, Some(v @ Value::String(_))) => v,
        (FieldKind::Number { clamp }, Some(Value::Number(n))) => clamp_number(n, *clamp),
        (FieldKind::Object(shape), Some(v @ Value::Object(_))) => shape.normalize(v),
        (FieldKind::Array(policy), Some(v)) => normalize_array(spec, policy, v),
        _ => spec.default.clone(),
    }
}

fn normalize_array(spec: &FieldSpec, policy: &ArrayPolicy, value: Value) -> Value {
    let items = match value {
        Value::Array(items) => items,
        Value::Object(obj) if policy.wrap_single_object => vec![Value::Object(obj)],
        _ => return spec.default.clone(),
    };

    if items.len() < policy.min_len.unwrap_or(0) {
        return spec.default.clone();
    }

    let mut items: Vec<Value> = match &policy.element {
        Some(element) => items
            .into_iter()
            .map(|v| normalize_field(element, Some(v)))
            .collect(),
        None => items,
    };

    if let Some(max) = policy.max_len {
        items.truncate(max);
    }
    if let Some(target) = policy.pad_to {
        items.truncate(target);
        while items.len() < target {
            items.push(element_default(policy));
        }
    }

    Value::Array(items)
}

fn element_default(policy: &ArrayPolicy) -> Value {
    policy
        .element
        .as_ref()
        .map(|e| e.default.clone())
        .unwrap_or(Value::Null)
}

fn clamp_number(n: Number, clamp: Option<(f64, f64)>) -> Value {
    let Some((lo, hi)) = clamp else {
        return Value::Number(n);
    };
    let Some(x) = n.as_f64() else {
        return Value::Number(n);
    };
    if x < lo {
        json_number(lo)
    } else if x > hi {
        json_number(hi)
    } else {
        Value::Number(n)
    }
}

/// Whole-valued floats become JSON integers so clamping `150` to `[0, 100]`
/// yields `100`, not `100.0`.
fn json_number(x: f64) -> Value {
    if x.fract() == 0.0 && x >= i64::MIN as f64 && x <= i64::MAX as f64 {
        Value::Number(Number::from(x as i64))
    } else {
        Number::from_f64(x).map(Value::Number).unwrap_or(Value::Null)
    }
}
