// Copyright (c) 2025 Templated SQL LSP Team
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Source Spans
//!
//! Byte ranges into the compiled SQL text, as reported by the analyzer.

use serde::{Deserialize, Serialize};

/// A byte range `[start, end]` in the analyzed SQL text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Whether `offset` falls inside the span. Both endpoints count as
    /// inside: a cursor sitting directly after the last character of a
    /// reference still belongs to it.
    pub fn contains_offset(&self, offset: usize) -> bool {
        self.start <= offset && offset <= self.end
    }

    /// Whether `other` lies entirely within this span.
    pub fn contains(&self, other: Span) -> bool {
        self.start <= other.start && other.end <= self.end
    }
}
