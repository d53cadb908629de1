//! Addressable view of a prototxt-style config file.
//!
//! The text is scanned once into a list of leaf fields, each with its full
//! block path and the byte span of its value. Lookups and edits work on those
//! spans; the original text, comments and layout are left untouched.

mod parse;

use std::fmt;
use std::ops::Range;
use std::str::FromStr;

use crate::patch::PatchError;

/// A `key: value` leaf found in the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    /// Enclosing block names, outermost first, followed by the key.
    pub path: Vec<String>,
    /// Byte range of the value text, quotes included, surrounding blanks excluded.
    pub span: Range<usize>,
}

impl Field {
    pub fn key(&self) -> &str {
        self.path.last().map(String::as_str).unwrap_or_default()
    }

    pub fn dotted_path(&self) -> String {
        self.path.join(".")
    }
}

/// Dot-separated field address, e.g. `train.batch_size`.
///
/// Matches a leaf whose key is the last segment and whose innermost enclosing
/// blocks are the preceding segments, in order. Blocks further out are not
/// constrained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldPath {
    segments: Vec<String>,
}

impl FieldPath {
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn matches(&self, field: &Field) -> bool {
        field.path.ends_with(&self.segments)
    }
}

impl FromStr for FieldPath {
    type Err = PatchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let segments: Vec<String> = s.split('.').map(|p| p.trim().to_string()).collect();
        if segments.iter().any(String::is_empty) {
            return Err(PatchError::InvalidPath(s.to_string()));
        }
        Ok(Self { segments })
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.segments.join("."))
    }
}

/// Parsed config text.
#[derive(Debug, Clone)]
pub struct ConfigDocument {
    text: String,
    fields: Vec<Field>,
}

impl ConfigDocument {
    pub fn parse(text: impl Into<String>) -> Result<Self, PatchError> {
        let text = text.into();
        let fields = parse::Parser::new(&text).run()?;
        Ok(Self { text, fields })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn into_text(self) -> String {
        self.text
    }

    /// All leaf fields in document order.
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// First field (in document order) matching `path`.
    pub fn find(&self, path: &FieldPath) -> Option<&Field> {
        self.fields.iter().find(|f| path.matches(f))
    }

    pub fn value_of(&self, field: &Field) -> &str {
        &self.text[field.span.clone()]
    }

    /// Current value text of `path`, exactly as written (quotes kept).
    pub fn get(&self, path: &FieldPath) -> Result<&str, PatchError> {
        self.find(path)
            .map(|f| self.value_of(f))
            .ok_or_else(|| PatchError::FieldNotFound {
                field: path.to_string(),
            })
    }

    /// Replaces the value of `path` with `new_value`.
    ///
    /// If the current value is quoted, the new one is quoted with the same
    /// character (backslashes and that quote escaped). Otherwise it is inserted
    /// as-is, unless it would not read back unchanged (empty, surrounding
    /// blanks, or containing `#`, `}` or an unbalanced quote), in which case it
    /// is stored double-quoted.
    pub fn set(&mut self, path: &FieldPath, new_value: &str) -> Result<(), PatchError> {
        if new_value.contains(|c: char| c == '\n' || c == '\r') {
            return Err(PatchError::InvalidValue {
                field: path.to_string(),
            });
        }
        let index = self
            .fields
            .iter()
            .position(|f| path.matches(f))
            .ok_or_else(|| PatchError::FieldNotFound {
                field: path.to_string(),
            })?;

        let first = self.value_of(&self.fields[index]).chars().next();
        match first {
            Some(q @ ('"' | '\'')) => self.splice(index, &quote(new_value, q), path),
            _ => self
                .splice(index, new_value, path)
                .or_else(|_| self.splice(index, &quote(new_value, '"'), path)),
        }
    }

    /// Swaps the value of the field at `index` for `replacement`. The document
    /// is left untouched unless the result parses and that field reads back
    /// as exactly `replacement`.
    fn splice(&mut self, index: usize, replacement: &str, path: &FieldPath) -> Result<(), PatchError> {
        let field = &self.fields[index];
        let span = field.span.clone();
        let mut text = String::with_capacity(self.text.len() + replacement.len());
        text.push_str(&self.text[..span.start]);
        text.push_str(replacement);
        text.push_str(&self.text[span.end..]);

        let doc = Self::parse(text)?;
        let intact = doc
            .fields
            .get(index)
            .is_some_and(|f| f.path == field.path && doc.value_of(f) == replacement);
        if !intact {
            return Err(PatchError::InvalidValue {
                field: path.to_string(),
            });
        }
        *self = doc;
        Ok(())
    }
}

fn quote(value: &str, q: char) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push(q);
    for c in value.chars() {
        if c == '\\' || c == q {
            out.push('\\');
        }
        out.push(c);
    }
    out.push(q);
    out
}

#[cfg(test)]
mod tests;
