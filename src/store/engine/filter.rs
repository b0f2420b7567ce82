//! Filter document evaluation for the `$match` stage
//!
//! Supports implicit equality on dotted paths, the comparison operators
//! (`$eq`, `$ne`, `$gt`, `$gte`, `$lt`, `$lte`, `$in`, `$nin`), `$exists`,
//! and the logical operators `$and`, `$or` and `$nor`.

use serde_json::{Number, Value};
use std::cmp::Ordering;

use super::path;
use crate::store::error::{StoreError, StoreResult};

#[derive(Debug, Clone)]
pub(crate) enum Predicate {
    And(Vec<Predicate>),
    Or(Vec<Predicate>),
    Nor(Vec<Predicate>),
    Field {
        path: String,
        conditions: Vec<Condition>,
    },
}

#[derive(Debug, Clone)]
pub(crate) enum Condition {
    Eq(Value),
    Ne(Value),
    Gt(Value),
    Gte(Value),
    Lt(Value),
    Lte(Value),
    In(Vec<Value>),
    Nin(Vec<Value>),
    Exists(bool),
}

/// Parse a filter document into a predicate tree
pub(crate) fn parse(filter: &Value) -> StoreResult<Predicate> {
    let obj = filter
        .as_object()
        .ok_or_else(|| StoreError::invalid_filter("filter must be a document"))?;

    let mut clauses = Vec::with_capacity(obj.len());
    for (key, value) in obj {
        let clause = match key.as_str() {
            "$and" => Predicate::And(parse_clause_list(key, value)?),
            "$or" => Predicate::Or(parse_clause_list(key, value)?),
            "$nor" => Predicate::Nor(parse_clause_list(key, value)?),
            op if op.starts_with('$') => {
                return Err(StoreError::invalid_filter(format!(
                    "unknown top level operator: {}",
                    op
                )))
            }
            field => Predicate::Field {
                path: field.to_string(),
                conditions: parse_conditions(value)?,
            },
        };
        clauses.push(clause);
    }

    Ok(Predicate::And(clauses))
}

fn parse_clause_list(op: &str, value: &Value) -> StoreResult<Vec<Predicate>> {
    let items = value
        .as_array()
        .filter(|items| !items.is_empty())
        .ok_or_else(|| {
            StoreError::invalid_filter(format!("{} must be a nonempty array", op))
        })?;
    items.iter().map(parse).collect()
}

fn parse_conditions(value: &Value) -> StoreResult<Vec<Condition>> {
    let operators = match value {
        Value::Object(map) if map.keys().any(|k| k.starts_with('$')) => map,
        _ => return Ok(vec![Condition::Eq(value.clone())]),
    };

    operators
        .iter()
        .map(|(op, operand)| {
            let condition = match op.as_str() {
                "$eq" => Condition::Eq(operand.clone()),
                "$ne" => Condition::Ne(operand.clone()),
                "$gt" => Condition::Gt(operand.clone()),
                "$gte" => Condition::Gte(operand.clone()),
                "$lt" => Condition::Lt(operand.clone()),
                "$lte" => Condition::Lte(operand.clone()),
                "$in" => Condition::In(operand_list(op, operand)?),
                "$nin" => Condition::Nin(operand_list(op, operand)?),
                "$exists" => Condition::Exists(truthy(operand)),
                other => {
                    return Err(StoreError::invalid_filter(format!(
                        "unknown operator: {}",
                        other
                    )))
                }
            };
            Ok(condition)
        })
        .collect()
}

fn operand_list(op: &str, operand: &Value) -> StoreResult<Vec<Value>> {
    operand
        .as_array()
        .cloned()
        .ok_or_else(|| StoreError::invalid_filter(format!("{} needs an array", op)))
}

fn truthy(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Null => false,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        _ => true,
    }
}

impl Predicate {
    pub(crate) fn matches(&self, doc: &Value) -> bool {
        match self {
            Self::And(clauses) => clauses.iter().all(|c| c.matches(doc)),
            Self::Or(clauses) => clauses.iter().any(|c| c.matches(doc)),
            Self::Nor(clauses) => !clauses.iter().any(|c| c.matches(doc)),
            Self::Field { path, conditions } => {
                let candidates = path::collect(doc, path);
                conditions.iter().all(|c| c.matches(&candidates))
            }
        }
    }
}

impl Condition {
    fn matches(&self, candidates: &[&Value]) -> bool {
        match self {
            Self::Eq(expected) => equals_any(candidates, expected),
            Self::Ne(expected) => !equals_any(candidates, expected),
            Self::Gt(bound) => compares_any(candidates, bound, |o| o == Ordering::Greater),
            Self::Gte(bound) => compares_any(candidates, bound, |o| o != Ordering::Less),
            Self::Lt(bound) => compares_any(candidates, bound, |o| o == Ordering::Less),
            Self::Lte(bound) => compares_any(candidates, bound, |o| o != Ordering::Greater),
            Self::In(options) => options.iter().any(|v| equals_any(candidates, v)),
            Self::Nin(options) => !options.iter().any(|v| equals_any(candidates, v)),
            Self::Exists(expected) => !candidates.is_empty() == *expected,
        }
    }
}

// Array values match when equal as a whole or when any element is equal.
// A missing field equals null.
fn equals_any(candidates: &[&Value], expected: &Value) -> bool {
    if candidates.is_empty() {
        return expected.is_null();
    }
    candidates.iter().any(|candidate| {
        values_equal(candidate, expected)
            || candidate
                .as_array()
                .is_some_and(|items| items.iter().any(|item| values_equal(item, expected)))
    })
}

// Numbers compare by value across integer and float forms; embedded
// documents compare field by field in order.
fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => compare_numbers(x, y) == Some(Ordering::Equal),
        (Value::Array(x), Value::Array(y)) => {
            x.len() == y.len() && x.iter().zip(y).all(|(a, b)| values_equal(a, b))
        }
        (Value::Object(x), Value::Object(y)) => {
            x.len() == y.len()
                && x
                    .iter()
                    .zip(y)
                    .all(|((ka, va), (kb, vb))| ka == kb && values_equal(va, vb))
        }
        _ => a == b,
    }
}

fn compares_any(candidates: &[&Value], bound: &Value, accept: impl Fn(Ordering) -> bool) -> bool {
    candidates.iter().any(|candidate| match candidate {
        Value::Array(items) => items
            .iter()
            .any(|item| compare(item, bound).is_some_and(&accept)),
        other => compare(other, bound).is_some_and(&accept),
    })
}

// Only values of the same type are ordered
fn compare(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => compare_numbers(x, y),
        (Value::String(x), Value::String(y)) => Some(x.cmp(y)),
        (Value::Bool(x), Value::Bool(y)) => Some(x.cmp(y)),
        _ => None,
    }
}

// Integers compare exactly; anything involving a float goes through f64
fn compare_numbers(x: &Number, y: &Number) -> Option<Ordering> {
    match (as_integer(x), as_integer(y)) {
        (Some(x), Some(y)) => Some(x.cmp(&y)),
        _ => x.as_f64()?.partial_cmp(&y.as_f64()?),
    }
}

fn as_integer(n: &Number) -> Option<i128> {
    n.as_i64()
        .map(i128::from)
        .or_else(|| n.as_u64().map(i128::from))
}
