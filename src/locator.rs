//! Line locator
//!
//! Schema and policy checks run against decoded `serde_json` values, which
//! carry no source positions. When a check fails the locator walks the
//! parallel [`json_ast`](crate::json_ast) tree to find the line the offending
//! field is declared on.

use std::fmt;

use jsonc_parser::ast::Value;

use crate::json_ast::{ParseError, SyntaxTree, prop_key};

/// Selects a value inside the node found under a top-level key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Selector {
    /// A key of a nested object, or for arrays the first element that is
    /// either a string equal to it or an object containing it as a key.
    Key(String),
    /// Zero-based array index.
    Index(usize),
}

impl Selector {
    pub fn key(key: impl Into<String>) -> Self {
        Selector::Key(key.into())
    }

    /// Interpret a raw path segment, treating decimal integers as indices.
    pub fn parse(segment: &str) -> Self {
        match segment.parse::<usize>() {
            Ok(index) => Selector::Index(index),
            Err(_) => Selector::Key(segment.to_string()),
        }
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selector::Key(key) => f.write_str(key),
            Selector::Index(index) => write!(f, "{index}"),
        }
    }
}

/// Parse `text` and return the 1-based line where `key` (and optionally the
/// value picked by `selector` inside it) is declared.
///
/// A missing top-level key yields `Some(0)` when no selector is given so
/// callers always have a line to attach to; any other miss yields `None`.
/// The text must already be known to be valid JSON.
pub fn locate(
    text: &str,
    key: &str,
    selector: Option<&Selector>,
) -> Result<Option<usize>, ParseError> {
    let tree = SyntaxTree::parse(text)?;
    Ok(locate_in(&tree, key, selector))
}

/// Same as [`locate`] over an already parsed tree.
pub fn locate_in(tree: &SyntaxTree<'_>, key: &str, selector: Option<&Selector>) -> Option<usize> {
    let Some(member) = tree.member(key) else {
        return selector.is_none().then_some(0);
    };

    let Some(selector) = selector else {
        return Some(tree.line_of(member));
    };

    match (&member.value, selector) {
        (Value::Object(object), Selector::Key(nested)) => object
            .properties
            .iter()
            .find(|prop| prop_key(prop) == nested)
            .map(|prop| tree.line_of(prop)),
        (Value::Object(_), Selector::Index(_)) => None,
        (Value::Array(array), Selector::Index(index)) => {
            array.elements.get(*index).map(|item| tree.line_of(item))
        }
        (Value::Array(array), Selector::Key(wanted)) => array
            .elements
            .iter()
            .find(|item| element_matches(item, wanted))
            .map(|item| tree.line_of(item)),
        (literal, _) => Some(tree.line_of(literal)),
    }
}

fn element_matches(item: &Value<'_>, wanted: &str) -> bool {
    match item {
        Value::StringLit(lit) => lit.value == wanted,
        Value::Object(object) => object.properties.iter().any(|prop| prop_key(prop) == wanted),
        _ => false,
    }
}
