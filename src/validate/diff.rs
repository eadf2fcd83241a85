//! Structural comparison of entity representations.

use crate::schema::canonicalize_value;
use serde_json::{Map, Value};
use std::fmt;

/// One field whose values differ between two representations.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDiff {
    /// Dotted path to the field, e.g. `attributes.email`
    pub field: String,
    /// Value on the left side; `None` when absent
    pub left: Option<Value>,
    /// Value on the right side; `None` when absent
    pub right: Option<Value>,
}

impl fmt::Display for FieldDiff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} != {}",
            self.field,
            render(self.left.as_ref()),
            render(self.right.as_ref())
        )
    }
}

fn render(value: Option<&Value>) -> String {
    value.map_or_else(|| "<missing>".to_string(), Value::to_string)
}

/// Every leaf that differs between `left` and `right`, in path order.
///
/// Objects are compared key by key; any other pair of values is compared
/// whole.
pub fn structural_diff(left: &Value, right: &Value) -> Vec<FieldDiff> {
    let mut diffs = Vec::new();
    diff_into(String::new(), Some(left), Some(right), &mut diffs);
    diffs
}

fn diff_into<'v>(
    path: String,
    left: Option<&'v Value>,
    right: Option<&'v Value>,
    out: &mut Vec<FieldDiff>,
) {
    match (left, right) {
        (Some(Value::Object(l)), Some(Value::Object(r))) => {
            let mut keys: Vec<&String> = l.keys().chain(r.keys()).collect();
            keys.sort();
            keys.dedup();
            for key in keys {
                let child = if path.is_empty() {
                    key.clone()
                } else {
                    format!("{path}.{key}")
                };
                diff_into(child, l.get(key), r.get(key), out);
            }
        }
        (l, r) if l == r => {}
        (l, r) => out.push(FieldDiff {
            field: path,
            left: l.cloned(),
            right: r.cloned(),
        }),
    }
}

/// Differences on the fields present in both maps, after canonicalization.
///
/// Fields whose expected value is `null` assert nothing and are skipped.
pub fn compare_intersection(
    expected: &Map<String, Value>,
    actual: &Map<String, Value>,
) -> Vec<FieldDiff> {
    let mut diffs: Vec<FieldDiff> = expected
        .iter()
        .filter(|(_, value)| !value.is_null())
        .filter_map(|(field, value)| {
            let other = actual.get(field)?;
            let (left, right) = (canonicalize_value(value), canonicalize_value(other));
            (left != right).then(|| FieldDiff {
                field: field.clone(),
                left: Some(left),
                right: Some(right),
            })
        })
        .collect();
    diffs.sort_by(|a, b| a.field.cmp(&b.field));
    diffs
}
