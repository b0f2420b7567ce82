//! Dotted field-path access on JSON documents

use serde_json::{Map, Value};

/// Resolve a dotted path through nested objects only
pub(crate) fn lookup<'a>(doc: &'a Value, path: &str) -> Option<&'a Value> {
    let mut current = doc;
    for part in path.split('.') {
        current = current.as_object()?.get(part)?;
    }
    Some(current)
}

/// Replace the value at a dotted path, creating intermediate objects as needed
pub(crate) fn set(doc: &mut Value, path: &str, value: Value) {
    let mut parts = path.split('.').peekable();
    let mut current = doc;
    while let Some(part) = parts.next() {
        let Value::Object(map) = current else {
            return;
        };
        if parts.peek().is_none() {
            map.insert(part.to_string(), value);
            return;
        }
        let child = map
            .entry(part.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        if !child.is_object() {
            *child = Value::Object(Map::new());
        }
        current = child;
    }
}

/// Collect every value reachable at a dotted path, fanning out across arrays
///
/// Numeric segments index into arrays; otherwise each object element of an
/// array is searched with the remaining path.
pub(crate) fn collect<'a>(doc: &'a Value, path: &str) -> Vec<&'a Value> {
    let parts: Vec<&str> = path.split('.').collect();
    let mut out = Vec::new();
    collect_parts(doc, &parts, &mut out);
    out
}

fn collect_parts<'a>(value: &'a Value, parts: &[&str], out: &mut Vec<&'a Value>) {
    let Some((head, rest)) = parts.split_first() else {
        out.push(value);
        return;
    };

    match value {
        Value::Object(map) => {
            if let Some(child) = map.get(*head) {
                collect_parts(child, rest, out);
            }
        }
        Value::Array(items) => {
            if let Ok(index) = head.parse::<usize>() {
                if let Some(child) = items.get(index) {
                    collect_parts(child, rest, out);
                }
            }
            for item in items.iter().filter(|item| item.is_object()) {
                collect_parts(item, parts, out);
            }
        }
        _ => {}
    }
}
