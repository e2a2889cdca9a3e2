//! Handle extraction from arbitrarily shaped JSON.
//!
//! The walk itself knows nothing about Instagram: it visits every object
//! node of the tree with an explicit stack and hands each node to an
//! ordered list of [`ExtractionRule`]s. Keys consumed by a rule are not
//! descended into, every other value is.

use serde_json::{Map, Value};

use super::handle::Handle;

/// A field-name heuristic applied at each object node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionRule {
    /// `key` holds an array of records. For each record the first of
    /// `fields` that yields a handle is taken. The key is consumed.
    RecordList {
        key: &'static str,
        fields: &'static [&'static str],
    },
    /// A string property on the node itself.
    Field(&'static str),
}

impl ExtractionRule {
    fn apply(&self, node: &Map<String, Value>, found: &mut Vec<Handle>) {
        match *self {
            ExtractionRule::RecordList { key, fields } => {
                if let Some(Value::Array(records)) = node.get(key) {
                    found.extend(records.iter().filter_map(|r| first_handle(r, fields)));
                }
            }
            ExtractionRule::Field(key) => {
                if let Some(handle) = node.get(key).and_then(Value::as_str).and_then(Handle::parse)
                {
                    found.push(handle);
                }
            }
        }
    }

    fn consumes(&self, key: &str) -> bool {
        matches!(*self, ExtractionRule::RecordList { key: k, .. } if k == key)
    }
}

/// Instagram's export shapes: `string_list_data` records carrying
/// `{value, href, timestamp}`, plus bare `username`/`value`/`href` fields
/// found in older or alternate exports.
pub const INSTAGRAM_RULES: &[ExtractionRule] = &[
    ExtractionRule::RecordList {
        key: "string_list_data",
        fields: &["value", "href"],
    },
    ExtractionRule::Field("username"),
    ExtractionRule::Field("value"),
    ExtractionRule::Field("href"),
];

/// Collects handles from a JSON tree using a fixed rule list.
#[derive(Debug, Clone, Copy)]
pub struct HandleExtractor {
    rules: &'static [ExtractionRule],
}

impl Default for HandleExtractor {
    fn default() -> Self {
        Self::new(INSTAGRAM_RULES)
    }
}

impl HandleExtractor {
    pub fn new(rules: &'static [ExtractionRule]) -> Self {
        Self { rules }
    }

    /// Every handle found anywhere in `root`, duplicates included, in
    /// traversal order.
    pub fn extract(&self, root: &Value) -> Vec<Handle> {
        let mut found = Vec::new();
        let mut stack = vec![root];

        while let Some(node) = stack.pop() {
            match node {
                Value::Array(items) => stack.extend(items.iter().rev()),
                Value::Object(map) => {
                    for rule in self.rules {
                        rule.apply(map, &mut found);
                    }
                    let children: Vec<&Value> = map
                        .iter()
                        .filter(|(key, _)| !self.rules.iter().any(|r| r.consumes(key)))
                        .map(|(_, value)| value)
                        .collect();
                    stack.extend(children.into_iter().rev());
                }
                Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_) => {}
            }
        }

        found
    }
}

/// First handle among `fields` of an object record. Non-object records yield none.
fn first_handle(record: &Value, fields: &[&str]) -> Option<Handle> {
    match record {
        Value::Object(map) => fields
            .iter()
            .filter_map(|f| map.get(*f).and_then(Value::as_str))
            .find_map(Handle::parse),
        _ => None,
    }
}
