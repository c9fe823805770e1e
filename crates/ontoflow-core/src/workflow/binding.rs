// Copyright 2025 DataStax Inc.
//
// Licensed under the Apache License, Version 2.0 (the "License"); you may not use this file except
// in compliance with the License. You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software distributed under the License
// is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express
// or implied. See the License for the specific language governing permissions and limitations under
// the License.

//! Binding expression grammar.
//!
//! A binding expression references a stored step result:
//!
//! ```text
//! ${root.field[0].other:tag}
//! ```
//!
//! The root and each `.field` accessor are identifiers matching
//! `[A-Za-z_][A-Za-z0-9_-]*`; `[n]` accessors take a non-negative decimal
//! integer; the optional trailing `:tag` names a type annotation. Parsing is
//! a hand-rolled recursive descent over bytes, so error offsets are exact.

use std::fmt;

use thiserror::Error;

use crate::schema::TypeTag;

/// One accessor applied to a binding root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Accessor {
    Field(String),
    Index(u64),
}

/// A parsed binding expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindingPath {
    /// The `store_as` name the expression starts from.
    pub root: String,
    pub accessors: Vec<Accessor>,
    /// Optional `:tag` type annotation.
    pub annotation: Option<TypeTag>,
}

impl fmt::Display for BindingPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${{{}", self.root)?;
        for accessor in &self.accessors {
            match accessor {
                Accessor::Field(name) => write!(f, ".{name}")?,
                Accessor::Index(n) => write!(f, "[{n}]")?,
            }
        }
        if let Some(tag) = &self.annotation {
            write!(f, ":{tag}")?;
        }
        write!(f, "}}")
    }
}

/// A syntax error with the byte offset where parsing failed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message} at offset {offset}")]
pub struct ParseError {
    pub offset: usize,
    pub message: String,
}

impl ParseError {
    fn new(offset: usize, message: impl Into<String>) -> Self {
        ParseError {
            offset,
            message: message.into(),
        }
    }
}

impl BindingPath {
    /// Parse a complete binding expression. The whole input must be one
    /// `${...}` expression with no surrounding text.
    pub fn parse(input: &str) -> Result<BindingPath, ParseError> {
        let mut parser = Parser::new(input);
        parser.expect(b'$')?;
        parser.expect(b'{')?;
        let path = parser.path()?;
        parser.expect(b'}')?;
        if parser.pos < parser.bytes.len() {
            return Err(ParseError::new(
                parser.pos,
                "unexpected trailing characters",
            ));
        }
        Ok(path)
    }

    /// Scan free text for embedded `${...}` expressions.
    ///
    /// Returns each expression with the byte offset of its `$`. A malformed
    /// expression is reported as an error at its position; scanning
    /// continues after it, so one bad expression does not hide the rest.
    pub fn scan(input: &str) -> Vec<(usize, Result<BindingPath, ParseError>)> {
        let bytes = input.as_bytes();
        let mut found = Vec::new();
        let mut pos = 0;
        while pos + 1 < bytes.len() {
            if bytes[pos] != b'$' || bytes[pos + 1] != b'{' {
                pos += 1;
                continue;
            }
            let start = pos;
            let mut parser = Parser::new(input);
            parser.pos = start + 2;
            let result = parser
                .path()
                .and_then(|path| parser.expect(b'}').map(|_| path));
            match result {
                Ok(path) => {
                    found.push((start, Ok(path)));
                    pos = parser.pos;
                }
                Err(err) => {
                    found.push((start, Err(err)));
                    // Resume after the next '}' or at the error offset,
                    // whichever comes first closes the bad expression.
                    pos = match bytes[start..].iter().position(|&b| b == b'}') {
                        Some(close) => start + close + 1,
                        None => bytes.len(),
                    };
                }
            }
        }
        found
    }
}

struct Parser<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        Parser {
            bytes: input.as_bytes(),
            pos: 0,
        }
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn expect(&mut self, byte: u8) -> Result<(), ParseError> {
        match self.peek() {
            Some(b) if b == byte => {
                self.pos += 1;
                Ok(())
            }
            Some(b) => Err(ParseError::new(
                self.pos,
                format!("expected '{}', found '{}'", byte as char, b as char),
            )),
            None => Err(ParseError::new(
                self.pos,
                format!("expected '{}', found end of input", byte as char),
            )),
        }
    }

    fn path(&mut self) -> Result<BindingPath, ParseError> {
        let root = self.identifier()?;
        let mut accessors = Vec::new();
        loop {
            match self.peek() {
                Some(b'.') => {
                    self.pos += 1;
                    accessors.push(Accessor::Field(self.identifier()?));
                }
                Some(b'[') => {
                    self.pos += 1;
                    accessors.push(Accessor::Index(self.index()?));
                    self.expect(b']')?;
                }
                _ => break,
            }
        }
        let annotation = if self.peek() == Some(b':') {
            self.pos += 1;
            Some(self.annotation()?)
        } else {
            None
        };
        Ok(BindingPath {
            root,
            accessors,
            annotation,
        })
    }

    fn identifier(&mut self) -> Result<String, ParseError> {
        let start = self.pos;
        match self.peek() {
            Some(b) if b.is_ascii_alphabetic() || b == b'_' => self.pos += 1,
            _ => return Err(ParseError::new(self.pos, "expected identifier")),
        }
        while let Some(b) = self.peek()
            && (b.is_ascii_alphanumeric() || b == b'_' || b == b'-')
        {
            self.pos += 1;
        }
        // Safety of the slice: we only advanced over ASCII bytes.
        Ok(String::from_utf8_lossy(&self.bytes[start..self.pos]).into_owned())
    }

    fn index(&mut self) -> Result<u64, ParseError> {
        let start = self.pos;
        while let Some(b) = self.peek()
            && b.is_ascii_digit()
        {
            self.pos += 1;
        }
        if self.pos == start {
            return Err(ParseError::new(self.pos, "expected array index"));
        }
        let digits = String::from_utf8_lossy(&self.bytes[start..self.pos]);
        digits
            .parse()
            .map_err(|_| ParseError::new(start, "array index out of range"))
    }

    fn annotation(&mut self) -> Result<TypeTag, ParseError> {
        let start = self.pos;
        let name = self.identifier()?;
        name.parse()
            .map_err(|_| ParseError::new(start, format!("unknown type annotation '{name}'")))
    }
}
