//! Position-annotated JSON syntax tree
//!
//! `serde_json` decodes documents without keeping any source positions, so
//! the same text is parsed a second time with `jsonc-parser`, whose AST keeps
//! a byte range on every node. Comments, trailing commas and unquoted keys
//! are rejected so the tree only ever describes strict JSON.

use jsonc_parser::ast::{ObjectProp, ObjectPropName, Value};
use jsonc_parser::common::Ranged;
use jsonc_parser::{CollectOptions, CommentCollectionStrategy, ParseOptions};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct ParseError {
    pub message: String,
    pub line: usize,
    pub column: usize,
}

/// A parsed document plus the line table needed to turn node ranges into
/// 1-based lines.
pub struct SyntaxTree<'a> {
    root: Option<Value<'a>>,
    lines: LineIndex,
}

impl<'a> SyntaxTree<'a> {
    pub fn parse(text: &'a str) -> Result<Self, ParseError> {
        let lines = LineIndex::new(text);
        let collect = CollectOptions {
            comments: CommentCollectionStrategy::Off,
            tokens: false,
        };
        let options = ParseOptions {
            allow_comments: false,
            allow_loose_object_property_names: false,
            allow_trailing_commas: false,
            ..Default::default()
        };

        let result = jsonc_parser::parse_to_ast(text, &collect, &options).map_err(|e| {
            let offset = e.range().start;
            ParseError {
                message: e.to_string(),
                line: lines.line(offset),
                column: lines.column(text, offset),
            }
        })?;

        Ok(Self {
            root: result.value,
            lines,
        })
    }

    /// First root member with the given key, in document order. A root that
    /// is not an object has no members.
    pub fn member(&self, key: &str) -> Option<&ObjectProp<'a>> {
        match self.root.as_ref()? {
            Value::Object(object) => object.properties.iter().find(|p| prop_key(p) == key),
            _ => None,
        }
    }

    /// 1-based line a node starts on. Object members start at their key.
    pub fn line_of(&self, node: &impl Ranged) -> usize {
        self.lines.line(node.range().start)
    }
}

/// Decoded key of an object member.
pub fn prop_key<'b>(prop: &'b ObjectProp<'_>) -> &'b str {
    match &prop.name {
        ObjectPropName::String(lit) => &*lit.value,
        ObjectPropName::Word(word) => word.value,
    }
}

/// Byte offsets at which each line starts.
#[derive(Debug, Clone)]
struct LineIndex {
    starts: Vec<usize>,
}

impl LineIndex {
    fn new(text: &str) -> Self {
        let starts = std::iter::once(0)
            .chain(text.match_indices('\n').map(|(i, _)| i + 1))
            .collect();
        Self { starts }
    }

    fn line(&self, offset: usize) -> usize {
        self.starts.partition_point(|start| *start <= offset)
    }

    /// 1-based column in characters.
    fn column(&self, text: &str, offset: usize) -> usize {
        let start = self.starts[self.line(offset) - 1];
        text.get(start..offset).map_or(1, |prefix| prefix.chars().count() + 1)
    }
}
