//! Readers for the textual formats of compiled classifiers.
//!
//! All formats are line based: blank lines and lines starting with `c` are comments, every other
//! line starts with a one-letter (or one-word) tag followed by whitespace separated integers.

pub mod nnf;
pub mod sdd;
pub mod vtree;

use crate::error::{DiagramError, Result};
use std::str::{FromStr, SplitWhitespace};

/// A meaningful line of an input file.
pub(crate) struct Line<'a> {
    /// Line number, starting at 1.
    pub number: usize,
    pub tag: &'a str,
    tokens: SplitWhitespace<'a>,
}

impl<'a> Line<'a> {
    pub fn next<T: FromStr>(&mut self, what: &str) -> Result<T> {
        let tok = self
            .tokens
            .next()
            .ok_or_else(|| DiagramError::parse(self.number, format!("missing {what}")))?;
        tok.parse()
            .map_err(|_| DiagramError::parse(self.number, format!("invalid {what} \"{tok}\"")))
    }

    /// All remaining tokens, parsed as integers.
    pub fn rest<T: FromStr>(&mut self, what: &str) -> Result<Vec<T>> {
        let mut values = Vec::new();
        for tok in self.tokens.by_ref() {
            let v = tok
                .parse()
                .map_err(|_| DiagramError::parse(self.number, format!("invalid {what} \"{tok}\"")))?;
            values.push(v);
        }
        Ok(values)
    }

    pub fn end(mut self) -> Result<()> {
        match self.tokens.next() {
            None => Ok(()),
            Some(tok) => Err(DiagramError::parse(self.number, format!("unexpected token \"{tok}\""))),
        }
    }

    pub fn error(&self, message: impl Into<String>) -> DiagramError {
        DiagramError::parse(self.number, message)
    }
}

pub(crate) fn lines(input: &str) -> impl Iterator<Item = Line<'_>> {
    input.lines().enumerate().filter_map(|(i, l)| {
        let mut tokens = l.split_whitespace();
        match tokens.next() {
            None | Some("c") => None,
            Some(tag) => Some(Line {
                number: i + 1,
                tag,
                tokens,
            }),
        }
    })
}

pub(crate) fn check_count(line: usize, expected: usize, found: usize, what: &str) -> Result<()> {
    if expected != found {
        Err(DiagramError::parse(
            line,
            format!("header announces {expected} {what}, found {found}"),
        ))
    } else {
        Ok(())
    }
}
