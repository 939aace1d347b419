//! Decoding of collaborator JSON payloads into core types.
//!
//! Entry points:
//! - [`decode_catalog`] / [`decode_product`] -- product catalog payloads
//! - [`decode_region`] -- region quota plus region usage payloads
//! - [`decode_values`] -- a JSON object of submitted form values
//! - [`parse_condition`] -- a condition expression (never fails)

use std::collections::BTreeMap;

use quickcluster_core::{
    Condition, Operator, ParameterCondition, ParameterSchema, Product, ProductCatalog, Quota,
    RegionQuota, Value, WizardValues,
};

/// Errors while decoding collaborator payloads.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InterchangeError {
    /// A payload is missing a required field.
    #[error("missing required field: '{field}'")]
    MissingField { field: String },
    /// An item of a payload is structurally invalid.
    #[error("{kind} '{id}': {message}")]
    InvalidItem {
        kind: String,
        id: String,
        message: String,
    },
    /// The payload as a whole has the wrong shape.
    #[error("invalid payload: {0}")]
    InvalidPayload(String),
}

// ── Products ────────────────────────────────────────────────────────

/// Decodes a product catalog given either as an array of products or
/// as an object keyed by product id.
pub fn decode_catalog(payload: &serde_json::Value) -> Result<ProductCatalog, InterchangeError> {
    let items: Vec<&serde_json::Value> = match payload {
        serde_json::Value::Array(arr) => arr.iter().collect(),
        serde_json::Value::Object(map) => map.values().collect(),
        _ => {
            return Err(InterchangeError::InvalidPayload(
                "product catalog must be an array or an object".to_string(),
            ))
        }
    };
    let mut catalog = ProductCatalog::new();
    for item in items {
        catalog.insert(decode_product(item)?);
    }
    Ok(catalog)
}

/// Decodes a single product.
pub fn decode_product(obj: &serde_json::Value) -> Result<Product, InterchangeError> {
    let id = required_u64(obj, "id")?;
    let name = required_str(obj, "name")?;
    let description = optional_str(obj, "description");

    let parameters = match obj.get("parameters") {
        None | Some(serde_json::Value::Null) => Vec::new(),
        Some(serde_json::Value::Array(arr)) => arr
            .iter()
            .map(|p| parse_parameter(p, id))
            .collect::<Result<Vec<_>, _>>()?,
        Some(_) => {
            return Err(item_error(id, "'parameters' must be an array"));
        }
    };

    let mut flavors = BTreeMap::new();
    if let Some(flavor_obj) = obj.get("flavors").and_then(|f| f.as_object()) {
        for (flavor, unit) in flavor_obj {
            let quota = decode_quota(unit).map_err(|e| {
                item_error(id, &format!("flavor '{}': {}", flavor, e))
            })?;
            flavors.insert(flavor.clone(), quota);
        }
    }

    let default_flavors = obj
        .get("default_flavors")
        .and_then(|d| d.as_object())
        .map(|map| {
            map.iter()
                .filter_map(|(role, f)| f.as_str().map(|f| (role.clone(), f.to_string())))
                .collect()
        })
        .unwrap_or_default();

    Ok(Product {
        id,
        name,
        description,
        parameters,
        flavors,
        default_flavors,
    })
}

fn parse_parameter(
    obj: &serde_json::Value,
    product_id: u64,
) -> Result<ParameterSchema, InterchangeError> {
    let variable = required_str(obj, "variable")
        .map_err(|_| item_error(product_id, "parameter missing 'variable'"))?;
    let name = optional_str(obj, "name").unwrap_or_else(|| variable.clone());
    let condition = obj
        .get("condition")
        .filter(|c| !c.is_null())
        .map(parse_parameter_condition);

    Ok(ParameterSchema {
        name,
        description: optional_str(obj, "description"),
        default: obj.get("default").and_then(Value::from_json),
        advanced: obj.get("advanced").and_then(|a| a.as_bool()).unwrap_or(false),
        required: obj.get("required").and_then(|r| r.as_bool()).unwrap_or(false),
        condition,
        variable,
    })
}

/// Decodes `{ "data": [...], "msg": "..." }`. The `data` list is an
/// implicit conjunction.
pub fn parse_parameter_condition(obj: &serde_json::Value) -> ParameterCondition {
    let expression = match obj.get("data") {
        Some(data) => parse_condition(data),
        None => Condition::Malformed {
            reason: "condition missing 'data'".to_string(),
        },
    };
    let message = optional_str(obj, "msg").unwrap_or_default();
    ParameterCondition {
        expression,
        message,
    }
}

/// Decodes a condition expression.
///
/// Leaves are `{"var", "op", "value"}` objects; connectives are
/// `{"and": [..]}`, `{"or": [..]}` and `{"not": node}`; a bare array is
/// a conjunction. Nodes that fit none of these become
/// [`Condition::Malformed`].
pub fn parse_condition(v: &serde_json::Value) -> Condition {
    if let Some(arr) = v.as_array() {
        return Condition::And(arr.iter().map(parse_condition).collect());
    }
    let Some(obj) = v.as_object() else {
        return malformed(format!("expected a condition object, got {}", v));
    };

    if let Some(children) = obj.get("and") {
        return match children.as_array() {
            Some(arr) => Condition::And(arr.iter().map(parse_condition).collect()),
            None => malformed("'and' must hold an array".to_string()),
        };
    }
    if let Some(children) = obj.get("or") {
        return match children.as_array() {
            Some(arr) => Condition::Or(arr.iter().map(parse_condition).collect()),
            None => malformed("'or' must hold an array".to_string()),
        };
    }
    if let Some(inner) = obj.get("not") {
        return Condition::negate(parse_condition(inner));
    }

    let Some(variable) = obj.get("var").and_then(|v| v.as_str()) else {
        return malformed(format!("leaf missing 'var': {}", v));
    };
    let op = match obj.get("op").and_then(|o| o.as_str()) {
        Some(op_str) => match Operator::parse(op_str) {
            Some(op) => op,
            None => {
                return malformed(format!("unknown operator '{}' on '{}'", op_str, variable));
            }
        },
        None => return malformed(format!("leaf on '{}' missing 'op'", variable)),
    };
    let Some(literal) = obj.get("value").and_then(Value::from_json) else {
        return malformed(format!("leaf on '{}' missing 'value'", variable));
    };
    Condition::Leaf {
        variable: variable.to_string(),
        op,
        literal,
    }
}

// ── Regions ─────────────────────────────────────────────────────────

/// Decodes a `{ num_vcpus, ram_mb, volumes_gb, num_volumes }` object.
pub fn decode_quota(v: &serde_json::Value) -> Result<Quota, InterchangeError> {
    if !v.is_object() {
        return Err(InterchangeError::InvalidPayload(format!(
            "quota must be an object, got {}",
            v
        )));
    }
    serde_json::from_value(v.clone()).map_err(|e| InterchangeError::InvalidPayload(e.to_string()))
}

/// Decodes a region (`{ "id", "user_quota" }`) together with its usage
/// payload (`{ "user_quota_usage" }`), returning the region id.
pub fn decode_region(
    region: &serde_json::Value,
    usage: &serde_json::Value,
) -> Result<(u64, RegionQuota), InterchangeError> {
    let id = required_u64(region, "id")?;
    let quota = region
        .get("user_quota")
        .filter(|q| !q.is_null())
        .ok_or_else(|| InterchangeError::MissingField {
            field: "user_quota".to_string(),
        })
        .and_then(decode_quota)?;
    let usage_baseline = usage
        .get("user_quota_usage")
        .filter(|q| !q.is_null())
        .ok_or_else(|| InterchangeError::MissingField {
            field: "user_quota_usage".to_string(),
        })
        .and_then(decode_quota)?;
    Ok((
        id,
        RegionQuota {
            quota,
            usage_baseline,
        },
    ))
}

// ── Form values ─────────────────────────────────────────────────────

/// Decodes a JSON object of submitted values. `null` entries are
/// treated as unanswered and skipped.
pub fn decode_values(v: &serde_json::Value) -> Result<WizardValues, InterchangeError> {
    let obj = v.as_object().ok_or_else(|| {
        InterchangeError::InvalidPayload("form values must be a JSON object".to_string())
    })?;
    let mut values = WizardValues::new();
    for (key, raw) in obj {
        match raw {
            serde_json::Value::Null => {}
            serde_json::Value::Object(_) => {
                return Err(InterchangeError::InvalidItem {
                    kind: "value".to_string(),
                    id: key.clone(),
                    message: "nested objects are not form values".to_string(),
                });
            }
            other => {
                if let Some(n) = unrepresentable_number(other) {
                    return Err(InterchangeError::InvalidItem {
                        kind: "value".to_string(),
                        id: key.clone(),
                        message: format!("number {} is out of range", n),
                    });
                }
                if let Some(value) = Value::from_json(other) {
                    values.insert(key.clone(), value);
                }
            }
        }
    }
    Ok(values)
}

/// First number in `v` (or its list elements) that no form value can hold.
fn unrepresentable_number(v: &serde_json::Value) -> Option<&serde_json::Number> {
    match v {
        serde_json::Value::Number(n) => Value::from_json(v).is_none().then_some(n),
        serde_json::Value::Array(items) => items.iter().find_map(unrepresentable_number),
        _ => None,
    }
}

// ── Parsing helpers ─────────────────────────────────────────────────

fn malformed(reason: String) -> Condition {
    Condition::Malformed { reason }
}

fn item_error(product_id: u64, message: &str) -> InterchangeError {
    InterchangeError::InvalidItem {
        kind: "product".to_string(),
        id: product_id.to_string(),
        message: message.to_string(),
    }
}

fn required_str(obj: &serde_json::Value, field: &str) -> Result<String, InterchangeError> {
    obj.get(field)
        .and_then(|v| v.as_str())
        .map(|s| s.to_string())
        .ok_or_else(|| InterchangeError::MissingField {
            field: field.to_string(),
        })
}

fn optional_str(obj: &serde_json::Value, field: &str) -> Option<String> {
    obj.get(field)
        .and_then(|v| v.as_str())
        .map(|s| s.to_string())
}

fn required_u64(obj: &serde_json::Value, field: &str) -> Result<u64, InterchangeError> {
    obj.get(field)
        .and_then(|v| v.as_u64())
        .ok_or_else(|| InterchangeError::MissingField {
            field: field.to_string(),
        })
}
