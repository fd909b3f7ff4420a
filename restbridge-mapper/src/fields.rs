//! Flatified field lists.
//!
//! REST backends commonly accept a compact description of which fields to
//! return, e.g. `id,name,friends.{id,name}`. [`FieldSet`] is the parsed
//! form (a tree of field names), [`FieldListParser`] the parsing seam, and
//! [`StandardFieldListParser`] the default grammar:
//!
//! ```text
//! list  := item (',' item)*
//! item  := name ('.' '{' list '}')?
//! name  := one or more chars other than ',' '.' '{' '}'
//! ```

use crate::error::{MapperError, MapperResult};
use std::collections::BTreeMap;
use std::iter::Peekable;
use std::str::CharIndices;

/// A nested set of field names. Leaves are fields requested as-is; children
/// are the sub-fields requested on a relationship.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldSet {
    children: BTreeMap<String, FieldSet>,
}

impl FieldSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a leaf field (builder style).
    #[must_use]
    pub fn with(mut self, name: &str) -> Self {
        self.children.entry(name.to_string()).or_default();
        self
    }

    /// Adds a field with nested sub-fields (builder style).
    #[must_use]
    pub fn with_nested(mut self, name: &str, nested: FieldSet) -> Self {
        self.children.insert(name.to_string(), nested);
        self
    }

    /// Unions `other` into this set, recursively merging sub-fields of
    /// fields present in both.
    pub fn merge(&mut self, other: FieldSet) {
        for (name, nested) in other.children {
            self.children.entry(name).or_default().merge(nested);
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.children.contains_key(name)
    }

    /// Sub-fields of `name`, if the field is present.
    pub fn get(&self, name: &str) -> Option<&FieldSet> {
        self.children.get(name)
    }

    /// Fields at this level, in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldSet)> {
        self.children.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}

/// Parses and renders flatified field lists.
///
/// A trait so the mapping table stays agnostic of the backend's exact field
/// grammar; [`StandardFieldListParser`] covers the common one.
pub trait FieldListParser: Send + Sync {
    fn parse(&self, input: &str) -> MapperResult<FieldSet>;
    fn flatify(&self, set: &FieldSet) -> String;
}

/// Default parser for the `a,b,c.{d,e}` grammar.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardFieldListParser;

impl FieldListParser for StandardFieldListParser {
    fn parse(&self, input: &str) -> MapperResult<FieldSet> {
        if input.is_empty() {
            return Ok(FieldSet::new());
        }
        let mut chars = input.char_indices().peekable();
        let set = parse_list(input, &mut chars)?;
        if let Some(&(position, c)) = chars.peek() {
            return Err(syntax(position, format!("unexpected '{c}'")));
        }
        Ok(set)
    }

    fn flatify(&self, set: &FieldSet) -> String {
        let mut out = String::new();
        flatify_into(set, &mut out);
        out
    }
}

fn syntax(position: usize, message: impl Into<String>) -> MapperError {
    MapperError::FieldSyntax {
        position,
        message: message.into(),
    }
}

/// Parses a comma-separated list. Stops (without consuming) at `}`.
fn parse_list(input: &str, chars: &mut Peekable<CharIndices>) -> MapperResult<FieldSet> {
    let mut set = FieldSet::new();
    loop {
        let (name, name_pos) = parse_name(input, chars);
        if name.is_empty() {
            return Err(syntax(name_pos, "empty field name"));
        }

        let nested = if let Some(&(dot_pos, '.')) = chars.peek() {
            chars.next();
            match chars.next() {
                Some((_, '{')) => {
                    let nested = parse_list(input, chars)?;
                    match chars.next() {
                        Some((_, '}')) => nested,
                        Some((position, c)) => {
                            return Err(syntax(position, format!("expected '}}', found '{c}'")));
                        }
                        None => return Err(syntax(input.len(), "unclosed '{'")),
                    }
                }
                _ => return Err(syntax(dot_pos, "expected '{' after '.'")),
            }
        } else {
            FieldSet::new()
        };
        // Duplicate names union their sub-fields.
        set.children.entry(name).or_default().merge(nested);

        match chars.peek() {
            Some(&(_, ',')) => {
                chars.next();
            }
            _ => return Ok(set),
        }
    }
}

/// Consumes a field name; returns it with its start position.
fn parse_name(input: &str, chars: &mut Peekable<CharIndices>) -> (String, usize) {
    let start = chars.peek().map_or(input.len(), |&(position, _)| position);
    let mut name = String::new();
    while let Some(&(_, c)) = chars.peek() {
        if matches!(c, ',' | '.' | '{' | '}') {
            break;
        }
        name.push(c);
        chars.next();
    }
    (name, start)
}

fn flatify_into(set: &FieldSet, out: &mut String) {
    let mut first = true;
    for (name, nested) in set.iter() {
        if !first {
            out.push(',');
        }
        first = false;
        out.push_str(name);
        if !nested.is_empty() {
            out.push_str(".{");
            flatify_into(nested, out);
            out.push('}');
        }
    }
}
