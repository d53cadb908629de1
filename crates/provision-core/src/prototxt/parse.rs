//! Single-pass scanner that records every leaf field and its value span.
//!
//! Grammar accepted:
//!
//! ```text
//! document := item*
//! item     := key ':' value | key ':'? '{' item* '}'
//! value    := rest of the line, up to an unquoted '#' or '}'
//! ```
//!
//! Quoted runs inside a value (`"..."` or `'...'`, backslash escapes) are
//! opaque, so braces, colons and hashes in strings never affect structure.

use std::ops::Range;

use super::Field;
use crate::patch::PatchError;

struct Block {
    name: String,
    line: usize,
}

pub(super) struct Parser<'a> {
    src: &'a str,
    bytes: &'a [u8],
    pos: usize,
    line: usize,
    blocks: Vec<Block>,
    fields: Vec<Field>,
}

fn is_ident_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_'
}

fn is_ident(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

impl<'a> Parser<'a> {
    pub(super) fn new(src: &'a str) -> Self {
        Self {
            src,
            bytes: src.as_bytes(),
            pos: 0,
            line: 1,
            blocks: Vec::new(),
            fields: Vec::new(),
        }
    }

    pub(super) fn run(mut self) -> Result<Vec<Field>, PatchError> {
        loop {
            self.skip_trivia();
            match self.peek() {
                None => break,
                Some(b'}') => {
                    if self.blocks.pop().is_none() {
                        return Err(self.error("unmatched '}'"));
                    }
                    self.bump();
                }
                Some(b) if is_ident_start(b) => self.item()?,
                Some(_) => {
                    let c = self.src[self.pos..].chars().next().unwrap_or('?');
                    return Err(self.error(format!("unexpected character '{}'", c)));
                }
            }
        }

        if let Some(open) = self.blocks.last() {
            return Err(PatchError::Parse {
                line: open.line,
                message: format!("block '{}' is never closed", open.name),
            });
        }
        Ok(self.fields)
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn bump(&mut self) {
        if self.peek() == Some(b'\n') {
            self.line += 1;
        }
        self.pos += 1;
    }

    fn error(&self, message: impl Into<String>) -> PatchError {
        PatchError::Parse {
            line: self.line,
            message: message.into(),
        }
    }

    /// Whitespace (including newlines) and `#` comments.
    fn skip_trivia(&mut self) {
        while let Some(b) = self.peek() {
            match b {
                b' ' | b'\t' | b'\r' | b'\n' => self.bump(),
                b'#' => self.skip_comment(),
                _ => break,
            }
        }
    }

    fn skip_comment(&mut self) {
        while let Some(b) = self.peek() {
            if b == b'\n' {
                break;
            }
            self.bump();
        }
    }

    fn skip_inline_ws(&mut self) {
        while let Some(b' ' | b'\t') = self.peek() {
            self.bump();
        }
    }

    fn ident(&mut self) -> &'a str {
        let start = self.pos;
        while self.peek().is_some_and(is_ident) {
            self.bump();
        }
        &self.src[start..self.pos]
    }

    fn item(&mut self) -> Result<(), PatchError> {
        let key = self.ident();
        self.skip_inline_ws();
        let has_colon = self.peek() == Some(b':');
        if has_colon {
            self.bump();
            self.skip_inline_ws();
        }
        match self.peek() {
            Some(b'{') => {
                self.blocks.push(Block {
                    name: key.to_string(),
                    line: self.line,
                });
                self.bump();
                Ok(())
            }
            _ if has_colon => self.value(key),
            _ => Err(self.error(format!("expected ':' or '{{' after '{}'", key))),
        }
    }

    fn value(&mut self, key: &str) -> Result<(), PatchError> {
        let start = self.pos;
        let mut end = start;
        while let Some(b) = self.peek() {
            match b {
                b'\n' | b'#' | b'}' => break,
                b' ' | b'\t' | b'\r' => self.bump(),
                b'"' | b'\'' => {
                    self.quoted(b)?;
                    end = self.pos;
                }
                _ => {
                    self.bump();
                    end = self.pos;
                }
            }
        }
        if end == start {
            return Err(self.error(format!("missing value for '{}'", key)));
        }
        self.push_field(key, start..end);
        Ok(())
    }

    fn quoted(&mut self, quote: u8) -> Result<(), PatchError> {
        let line = self.line;
        self.bump();
        while let Some(b) = self.peek() {
            match b {
                b'\\' => {
                    self.bump();
                    if self.peek().is_some() {
                        self.bump();
                    }
                }
                b'\n' => break,
                b if b == quote => {
                    self.bump();
                    return Ok(());
                }
                _ => self.bump(),
            }
        }
        Err(PatchError::Parse {
            line,
            message: "unterminated string".to_string(),
        })
    }

    fn push_field(&mut self, key: &str, span: Range<usize>) {
        let mut path: Vec<String> = self.blocks.iter().map(|b| b.name.clone()).collect();
        path.push(key.to_string());
        self.fields.push(Field { path, span });
    }
}
