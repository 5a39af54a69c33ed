//! Conversion between JSON documents and DynamoDB attribute maps.

use std::collections::HashMap;

use aws_sdk_dynamodb::types::AttributeValue;
use serde_json::{Map, Value};

use crate::errors::UtilError;

pub type Item = HashMap<String, AttributeValue>;

/// Converts a JSON object into a table item.
///
/// # Errors
///
/// Returns an error if `document` is not a JSON object.
pub fn to_item(document: &Value) -> Result<Item, UtilError> {
    let Value::Object(fields) = document else {
        return Err(UtilError::SerializationError(
            "records must serialise to a JSON object".to_string(),
        ));
    };
    Ok(fields
        .iter()
        .map(|(name, value)| (name.clone(), to_attribute(value)))
        .collect())
}

#[must_use]
pub fn to_attribute(value: &Value) -> AttributeValue {
    match value {
        Value::Null => AttributeValue::Null(true),
        Value::Bool(b) => AttributeValue::Bool(*b),
        Value::Number(n) => AttributeValue::N(n.to_string()),
        Value::String(s) => AttributeValue::S(s.clone()),
        Value::Array(items) => AttributeValue::L(items.iter().map(to_attribute).collect()),
        Value::Object(fields) => AttributeValue::M(
            fields
                .iter()
                .map(|(name, value)| (name.clone(), to_attribute(value)))
                .collect(),
        ),
    }
}

/// Converts a table item back into a JSON object.
///
/// # Errors
///
/// Returns an error for binary attributes or malformed numbers.
pub fn from_item(item: &Item) -> Result<Value, UtilError> {
    let mut fields = Map::with_capacity(item.len());
    for (name, attribute) in item {
        fields.insert(name.clone(), from_attribute(attribute)?);
    }
    Ok(Value::Object(fields))
}

/// # Errors
///
/// Returns an error for binary attributes or malformed numbers.
pub fn from_attribute(attribute: &AttributeValue) -> Result<Value, UtilError> {
    let value = match attribute {
        AttributeValue::Null(_) => Value::Null,
        AttributeValue::Bool(b) => Value::Bool(*b),
        AttributeValue::N(n) => parse_number(n)?,
        AttributeValue::S(s) => Value::String(s.clone()),
        AttributeValue::Ss(values) => Value::Array(values.iter().cloned().map(Value::String).collect()),
        AttributeValue::Ns(values) => Value::Array(
            values
                .iter()
                .map(|n| parse_number(n))
                .collect::<Result<Vec<_>, _>>()?,
        ),
        AttributeValue::L(items) => Value::Array(
            items
                .iter()
                .map(from_attribute)
                .collect::<Result<Vec<_>, _>>()?,
        ),
        AttributeValue::M(fields) => from_item(fields)?,
        other => {
            return Err(UtilError::SerializationError(format!(
                "unsupported attribute kind: {other:?}"
            )));
        }
    };
    Ok(value)
}

fn parse_number(raw: &str) -> Result<Value, UtilError> {
    match serde_json::from_str::<Value>(raw) {
        Ok(number @ Value::Number(_)) => Ok(number),
        _ => Err(UtilError::SerializationError(format!(
            "invalid number attribute: {raw}"
        ))),
    }
}
