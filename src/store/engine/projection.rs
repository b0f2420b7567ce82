//! Inclusion projection over dotted field paths

use serde_json::{Map, Value};

/// Compiled inclusion projection, children kept in first-declared order
#[derive(Debug, Default)]
pub(crate) struct Projection {
    fields: Vec<(String, Node)>,
}

#[derive(Debug)]
enum Node {
    Leaf,
    Branch(Projection),
}

impl Projection {
    pub(crate) fn compile(paths: &[String]) -> Self {
        let mut root = Projection::default();
        for path in paths {
            let parts: Vec<&str> = path.split('.').collect();
            root.insert(&parts);
        }
        root
    }

    fn insert(&mut self, parts: &[&str]) {
        let Some((head, rest)) = parts.split_first() else {
            return;
        };

        let index = match self.fields.iter().position(|(name, _)| name == head) {
            Some(index) => index,
            None => {
                let node = if rest.is_empty() {
                    Node::Leaf
                } else {
                    Node::Branch(Projection::default())
                };
                self.fields.push((head.to_string(), node));
                self.fields.len() - 1
            }
        };

        if let Node::Branch(child) = &mut self.fields[index].1 {
            child.insert(rest);
        }
    }

    /// Project one document; the identity field is never carried over
    pub(crate) fn apply(&self, doc: &Value) -> Value {
        match doc {
            Value::Object(map) => Value::Object(self.apply_object(map)),
            _ => Value::Object(Map::new()),
        }
    }

    fn apply_object(&self, source: &Map<String, Value>) -> Map<String, Value> {
        let mut out = Map::new();
        for (name, node) in &self.fields {
            let Some(value) = source.get(name) else {
                continue;
            };
            match node {
                Node::Leaf => {
                    out.insert(name.clone(), value.clone());
                }
                Node::Branch(child) => {
                    if let Some(projected) = child.apply_nested(value) {
                        out.insert(name.clone(), projected);
                    }
                }
            }
        }
        out
    }

    // Sub-paths descend into objects and into every object element of an array
    fn apply_nested(&self, value: &Value) -> Option<Value> {
        match value {
            Value::Object(map) => Some(Value::Object(self.apply_object(map))),
            Value::Array(items) => Some(Value::Array(
                items
                    .iter()
                    .filter_map(|item| self.apply_nested(item))
                    .collect(),
            )),
            _ => None,
        }
    }
}
