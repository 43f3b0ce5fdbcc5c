// Copyright (c) 2025 Templated SQL LSP Team
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Position Conversion
//!
//! Full `{line, character}` translation over a raw/compiled text pair.
//!
//! [`PositionConverter`] combines the line and character mappers: the line
//! is resolved over the pair's line diff, then the character over the
//! character diff of the two corresponding lines. Diffs and line splits
//! are computed lazily and cached, so converting many positions over the
//! same pair (the diagnostics path) pays for each diff once.

use std::cell::OnceCell;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::char_map::{new_character, old_character};
use crate::error::{TextMapError, TextMapResult};
use crate::line_map::{map_line_to_new, map_line_to_old};
use crate::segment::{DiffSegment, line_segments};

/// A zero-based line/character position inside a text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextPosition {
    pub line: usize,
    pub character: usize,
}

impl TextPosition {
    pub fn new(line: usize, character: usize) -> Self {
        Self { line, character }
    }
}

/// Converts positions between an old (raw) and a new (compiled) text.
pub struct PositionConverter<'a> {
    old_text: &'a str,
    new_text: &'a str,
    old_lines: OnceCell<Vec<&'a str>>,
    new_lines: OnceCell<Vec<&'a str>>,
    segments: OnceCell<Vec<DiffSegment>>,
}

impl<'a> PositionConverter<'a> {
    pub fn new(old_text: &'a str, new_text: &'a str) -> Self {
        Self {
            old_text,
            new_text,
            old_lines: OnceCell::new(),
            new_lines: OnceCell::new(),
            segments: OnceCell::new(),
        }
    }

    fn old_lines(&self) -> &[&'a str] {
        self.old_lines
            .get_or_init(|| self.old_text.split('\n').collect())
    }

    fn new_lines(&self) -> &[&'a str] {
        self.new_lines
            .get_or_init(|| self.new_text.split('\n').collect())
    }

    fn segments(&self) -> &[DiffSegment] {
        self.segments
            .get_or_init(|| line_segments(self.old_text, self.new_text))
    }

    /// Convert a position in the new text to the corresponding position in
    /// the old text.
    ///
    /// Never fails: a line that resolves past either text maps its
    /// character against an empty line.
    pub fn convert_backward(&self, position: TextPosition) -> TextPosition {
        let line = map_line_to_old(self.segments(), position.line);

        let old_line_text = self.old_lines().get(line).copied().unwrap_or("");
        let new_line_text = self.new_lines().get(position.line).copied().unwrap_or("");
        let character = old_character(old_line_text, new_line_text, position.character);

        TextPosition { line, character }
    }

    /// Convert a position in the old text to the corresponding position in
    /// the new text.
    ///
    /// Unlike the backward direction this validates its input: callers own
    /// the old text, so a line outside it is a contract violation.
    pub fn convert_forward(&self, position: TextPosition) -> TextMapResult<TextPosition> {
        let old_lines = self.old_lines();
        if position.line >= old_lines.len() {
            return Err(TextMapError::LineOutOfRange {
                line: position.line,
                line_count: old_lines.len(),
            });
        }

        let line = map_line_to_new(self.segments(), position.line);
        let new_lines = self.new_lines();
        if line >= new_lines.len() {
            debug!(old_line = position.line, new_line = line, "forward line mapping left the new text");
            return Err(TextMapError::LineOutOfRange {
                line,
                line_count: new_lines.len(),
            });
        }

        let character = new_character(old_lines[position.line], new_lines[line], position.character);
        Ok(TextPosition { line, character })
    }
}
