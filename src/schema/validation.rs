//! Classification of returned attribute values against declared schemas.
//!
//! Connectors are checked leniently: undeclared attributes are reported as
//! warnings by the caller, `null` satisfies every declaration, and numeric
//! strings satisfy `int`.

use super::types::{AttributeDescriptor, AttributeType};
use crate::error::{SchemaError, SchemaResult};
use serde_json::{Map, Value};
use std::collections::{BTreeSet, HashMap};

/// A returned value that does not match its attribute declaration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaViolation {
    /// Array value for a single-valued attribute or scalar for a multi-valued one
    #[error("{attribute}: expected multi={expected} but multi={actual}")]
    Multiplicity {
        attribute: String,
        expected: bool,
        actual: bool,
    },

    /// Value of the wrong JSON type
    #[error("{attribute}: expected type '{expected}' but was '{actual}'")]
    Type {
        attribute: String,
        expected: AttributeType,
        actual: &'static str,
    },

    /// String value for an `int` attribute that does not parse as an integer
    #[error("{attribute}: failed to parse '{value}' as int")]
    IntegerFormat { attribute: String, value: String },
}

/// Declared type and multiplicity of one attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeShape {
    pub attr_type: AttributeType,
    pub multi: bool,
}

/// Attribute declarations of one schema, indexed by name.
#[derive(Debug, Clone, Default)]
pub struct AttributeIndex {
    shapes: HashMap<String, AttributeShape>,
}

impl AttributeIndex {
    /// Index `attributes`, rejecting duplicate names.
    pub fn new<A: AttributeDescriptor>(schema: &str, attributes: &[A]) -> SchemaResult<Self> {
        let mut shapes = HashMap::with_capacity(attributes.len());
        for attr in attributes {
            let shape = AttributeShape {
                attr_type: attr.attr_type().clone(),
                multi: attr.multi(),
            };
            if shapes.insert(attr.name().to_string(), shape).is_some() {
                return Err(SchemaError::duplicate_attribute(schema, attr.name()));
            }
        }
        Ok(Self { shapes })
    }

    pub fn get(&self, name: &str) -> Option<&AttributeShape> {
        self.shapes.get(name)
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// Check every attribute of one entity.
    ///
    /// Violations are returned in attribute-name order; names missing from
    /// the index are added to `undeclared`.
    pub fn check_attributes(
        &self,
        attributes: &Map<String, Value>,
        undeclared: &mut BTreeSet<String>,
    ) -> Vec<SchemaViolation> {
        let mut violations = Vec::new();
        let mut names: Vec<&String> = attributes.keys().collect();
        names.sort();
        for name in names {
            match self.get(name) {
                Some(shape) => {
                    violations.extend(check_value(name, shape, &attributes[name.as_str()]))
                }
                None => {
                    undeclared.insert(name.clone());
                }
            }
        }
        violations
    }
}

/// Check one attribute value against its declaration.
pub fn check_value(name: &str, shape: &AttributeShape, value: &Value) -> Vec<SchemaViolation> {
    let mut violations = Vec::new();
    match value {
        // null carries neither type nor multiplicity
        Value::Null => {}
        Value::Array(items) => {
            if !shape.multi {
                violations.push(SchemaViolation::Multiplicity {
                    attribute: name.to_string(),
                    expected: shape.multi,
                    actual: true,
                });
            }
            for item in items {
                if let Some(violation) = check_scalar(name, &shape.attr_type, item) {
                    violations.push(violation);
                }
            }
        }
        scalar => {
            if shape.multi {
                violations.push(SchemaViolation::Multiplicity {
                    attribute: name.to_string(),
                    expected: shape.multi,
                    actual: false,
                });
            }
            if let Some(violation) = check_scalar(name, &shape.attr_type, scalar) {
                violations.push(violation);
            }
        }
    }
    violations
}

fn check_scalar(name: &str, expected: &AttributeType, value: &Value) -> Option<SchemaViolation> {
    let type_mismatch = |actual: &'static str| SchemaViolation::Type {
        attribute: name.to_string(),
        expected: expected.clone(),
        actual,
    };

    match (value, expected) {
        (Value::Null, _) => None,
        (Value::String(_), AttributeType::String) => None,
        (Value::String(s), AttributeType::Int) => match s.trim().parse::<i64>() {
            Ok(_) => None,
            Err(_) => Some(SchemaViolation::IntegerFormat {
                attribute: name.to_string(),
                value: s.clone(),
            }),
        },
        (Value::String(_), _) => Some(type_mismatch("string")),
        (Value::Number(_), AttributeType::Int) => None,
        (Value::Number(_), _) => Some(type_mismatch("int")),
        (Value::Bool(_), AttributeType::Boolean) => None,
        (Value::Bool(_), _) => Some(type_mismatch("boolean")),
        (Value::Array(_), _) => Some(type_mismatch("array")),
        (Value::Object(_), _) => Some(type_mismatch("object")),
    }
}
