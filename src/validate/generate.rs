//! Test values for account creation and attribute updates.

use crate::client::{Account, AttributeChange, AttributeOp};
use crate::schema::{
    AccountCreateTemplate, AccountCreateTemplateField, AccountSchemaAttribute, AttributeType,
};
use log::debug;
use rand::Rng;
use regex_lite::Regex;
use serde_json::{Map, Value, json};
use std::sync::LazyLock;

const FIELD_TYPE_STATIC: &str = "static";
const FIELD_TYPE_GENERATOR: &str = "generator";
const GENERATOR_PASSWORD: &str = "Create Password";
const GENERATOR_ACCOUNT_ID: &str = "Create Unique Account ID";

static UNIQUE_COUNTER: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"\$\(uniqueCounter\)").ok());
static TEMPLATE_TOKEN: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"\$\(.*?\)").ok());

/// Which template fields populate a create input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldScope {
    RequiredOnly,
    All,
}

/// Build a create input from the connector's account create template.
pub fn create_input(template: &AccountCreateTemplate, scope: FieldScope) -> Map<String, Value> {
    template
        .fields
        .iter()
        .filter(|field| scope == FieldScope::All || field.required)
        .map(|field| (field.field_name().to_string(), create_field_value(field)))
        .collect()
}

/// Value for one template field.
///
/// Static fields use their literal, generator fields run the named
/// generator, everything else (including deprecated templates without a
/// `key`) falls back to a value chosen by type and name.
pub fn create_field_value(field: &AccountCreateTemplateField) -> Value {
    if field.key.is_empty() {
        return value_by_type_and_name(field);
    }

    let initial = &field.initial_value;
    match initial.value_type.as_str() {
        FIELD_TYPE_STATIC => initial.attributes.value.clone(),
        FIELD_TYPE_GENERATOR if initial.attributes.name == GENERATOR_PASSWORD => {
            json!(format!("RandomPassword.{}", random_number(65536)))
        }
        FIELD_TYPE_GENERATOR if initial.attributes.name == GENERATOR_ACCOUNT_ID => {
            json!(expand_account_id_template(&initial.attributes.template))
        }
        _ => value_by_type_and_name(field),
    }
}

/// Replace `$(uniqueCounter)` with a random number and every other `$(...)`
/// token with a generated string.
pub fn expand_account_id_template(template: &str) -> String {
    let counter = random_number(65536).to_string();
    let filler = format!("string{}", random_number(99));

    let mut expanded = template.to_string();
    if let Some(regex) = UNIQUE_COUNTER.as_ref() {
        expanded = regex.replace_all(&expanded, counter.as_str()).into_owned();
    }
    if let Some(regex) = TEMPLATE_TOKEN.as_ref() {
        expanded = regex.replace_all(&expanded, filler.as_str()).into_owned();
    }
    expanded
}

fn value_by_type_and_name(field: &AccountCreateTemplateField) -> Value {
    match field.field_type.as_str() {
        "string" => match field.field_name() {
            "email" | "name" => json!(random_email()),
            _ => json!(format!("string.{}", random_number(65536))),
        },
        "boolean" => Value::Bool(true),
        "array" => Value::Null,
        other => {
            debug!(
                "No value generator for field {:?} of type {:?}",
                field.field_name(),
                other
            );
            Value::Null
        }
    }
}

/// Identity to create an account with: the first string among `email`,
/// `username` and `name`, else a generated address.
pub fn create_identity(input: &Map<String, Value>) -> String {
    ["email", "username", "name"]
        .iter()
        .find_map(|field| input.get(*field).and_then(Value::as_str))
        .map(str::to_string)
        .unwrap_or_else(random_email)
}

/// A change that gives `attr` a new value on `account`.
///
/// Multi-valued attributes get an `Add`, single-valued ones a `Set`.
/// Integers are incremented and booleans flipped relative to the current
/// value. Returns `None` for attribute types without a generator.
pub fn attribute_change(
    account: &Account,
    attr: &AccountSchemaAttribute,
) -> Option<AttributeChange> {
    let current = account.attributes.get(&attr.name);
    let value = match &attr.attr_type {
        AttributeType::String if attr.name == "email" => json!(random_email()),
        AttributeType::String => json!(format!("string.{:x}", random_number(16_777_216))),
        AttributeType::Int => {
            let next = current.and_then(as_integer).map_or(42, |n| n.wrapping_add(1));
            json!(next)
        }
        AttributeType::Boolean => {
            let flipped = current.and_then(Value::as_bool).is_none_or(|b| !b);
            Value::Bool(flipped)
        }
        AttributeType::Other(_) => return None,
    };

    let op = if attr.multi {
        AttributeOp::Add
    } else {
        AttributeOp::Set
    };
    Some(AttributeChange::new(op, attr.name.clone(), value))
}

fn as_integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
}

fn random_email() -> String {
    format!("test.{}@example.com", random_number(65536))
}

fn random_number(upper: u32) -> u32 {
    rand::thread_rng().gen_range(0..upper)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{TemplateAttributes, TemplateInitialValue};

    fn field(key: &str, field_type: &str, required: bool) -> AccountCreateTemplateField {
        AccountCreateTemplateField {
            key: key.to_string(),
            field_type: field_type.to_string(),
            required,
            ..Default::default()
        }
    }

    fn generator(key: &str, name: &str, template: &str) -> AccountCreateTemplateField {
        AccountCreateTemplateField {
            initial_value: TemplateInitialValue {
                value_type: FIELD_TYPE_GENERATOR.to_string(),
                attributes: TemplateAttributes {
                    name: name.to_string(),
                    template: template.to_string(),
                    ..Default::default()
                },
            },
            ..field(key, "string", true)
        }
    }

    #[test]
    fn test_static_value_is_literal() {
        let mut department = field("department", "string", true);
        department.initial_value = TemplateInitialValue {
            value_type: FIELD_TYPE_STATIC.to_string(),
            attributes: TemplateAttributes {
                value: json!("Engineering"),
                ..Default::default()
            },
        };
        assert_eq!(create_field_value(&department), json!("Engineering"));
    }

    #[test]
    fn test_generators() {
        let password = create_field_value(&generator("password", GENERATOR_PASSWORD, ""));
        assert!(password.as_str().unwrap().starts_with("RandomPassword."));

        let id = create_field_value(&generator(
            "login",
            GENERATOR_ACCOUNT_ID,
            "$(firstname).$(lastname)$(uniqueCounter)",
        ));
        let id = id.as_str().unwrap();
        assert!(!id.contains("$("), "unexpanded token in {id}");
        assert!(id.starts_with("string"));
        assert!(id.chars().last().unwrap().is_ascii_digit());
    }

    #[test]
    fn test_type_fallbacks() {
        assert!(
            create_field_value(&field("email", "string", true))
                .as_str()
                .unwrap()
                .ends_with("@example.com")
        );
        assert!(
            create_field_value(&field("title", "string", true))
                .as_str()
                .unwrap()
                .starts_with("string.")
        );
        assert_eq!(create_field_value(&field("active", "boolean", true)), json!(true));
        assert_eq!(create_field_value(&field("roles", "array", true)), Value::Null);
        assert_eq!(create_field_value(&field("created", "date", true)), Value::Null);
    }

    #[test]
    fn test_deprecated_field_uses_name() {
        let deprecated = AccountCreateTemplateField {
            name: "name".to_string(),
            field_type: "string".to_string(),
            required: true,
            ..Default::default()
        };
        let template = AccountCreateTemplate {
            fields: vec![deprecated, field("title", "string", false)],
        };

        let minimal = create_input(&template, FieldScope::RequiredOnly);
        assert_eq!(minimal.len(), 1);
        assert!(minimal["name"].as_str().unwrap().ends_with("@example.com"));
        assert_eq!(create_input(&template, FieldScope::All).len(), 2);
    }

    #[test]
    fn test_create_identity_precedence() {
        let input: Map<String, Value> = serde_json::from_value(json!({
            "name": "Jane",
            "username": "jane",
        }))
        .unwrap();
        assert_eq!(create_identity(&input), "jane");

        let generated = create_identity(&Map::new());
        assert!(generated.starts_with("test.") && generated.ends_with("@example.com"));
    }

    #[test]
    fn test_attribute_change_per_type() {
        let account: Account = serde_json::from_value(json!({
            "identity": "john",
            "attributes": {"age": 41, "active": true, "level": "7"}
        }))
        .unwrap();
        let attr = |name: &str, attr_type: AttributeType, multi: bool| AccountSchemaAttribute {
            name: name.to_string(),
            attr_type,
            multi,
            writable: true,
            ..Default::default()
        };

        let age = attribute_change(&account, &attr("age", AttributeType::Int, false)).unwrap();
        assert_eq!((age.op, age.value), (AttributeOp::Set, json!(42)));

        let level = attribute_change(&account, &attr("level", AttributeType::Int, false)).unwrap();
        assert_eq!(level.value, json!(8));

        let missing =
            attribute_change(&account, &attr("score", AttributeType::Int, false)).unwrap();
        assert_eq!(missing.value, json!(42));

        let active = attribute_change(&account, &attr("active", AttributeType::Boolean, false));
        assert_eq!(active.unwrap().value, json!(false));

        let tags = attribute_change(&account, &attr("tags", AttributeType::String, true)).unwrap();
        assert_eq!(tags.op, AttributeOp::Add);

        let other = AttributeType::Other("date".to_string());
        assert!(attribute_change(&account, &attr("created", other, false)).is_none());
    }
}
