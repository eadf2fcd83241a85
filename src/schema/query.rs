//! Query-time schema objects handed to list and read commands.
//!
//! Connectors may use the schema in a command's input to tailor the shape of
//! what they return; the objects built here are the `schema` input fields.

use super::spec::ConnSpec;
use serde_json::{Value, json};

/// Account schema object for `schema` inputs.
pub fn build_account_schema(spec: &ConnSpec) -> Value {
    let schema = &spec.account_schema;
    let attributes: Vec<Value> = schema
        .attributes
        .iter()
        .map(|attr| {
            json!({
                "name": attr.name,
                "type": attr.attr_type,
                "description": attr.description,
                "required": attr.required,
                "entitlement": attr.entitlement,
                "managed": attr.managed,
                "multi": attr.multi,
            })
        })
        .collect();

    json!({
        "displayAttribute": schema.display_attribute,
        "identityAttribute": schema.identity_attribute,
        "groupAttribute": schema.group_attribute,
        "attributes": attributes,
    })
}

/// Entitlement schema object for `entitlement_type`, or `None` when the
/// connector declares no schema for that type.
pub fn build_entitlement_schema(spec: &ConnSpec, entitlement_type: &str) -> Option<Value> {
    let schema = spec.entitlement_schema(entitlement_type)?;
    let attributes: Vec<Value> = schema
        .attributes
        .iter()
        .map(|attr| {
            json!({
                "name": attr.name,
                "type": attr.attr_type,
                "description": attr.description,
                "required": attr.required,
                "multi": attr.multi,
            })
        })
        .collect();

    Some(json!({
        "type": schema.entitlement_type,
        "displayAttribute": schema.display_attribute,
        "identityAttribute": schema.identity_attribute,
        "hierarchyAttribute": schema.hierarchy_attribute,
        "attributes": attributes,
    }))
}
