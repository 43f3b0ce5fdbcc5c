// Copyright (c) 2025 Templated SQL LSP Team
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Diff Segments
//!
//! Run-length-encoded segments of a diff between an old and a new text.
//!
//! A segment sequence reconstructs both texts: concatenating the
//! `Equal` + `Removed` runs yields the old text's units in order, and the
//! `Equal` + `Added` runs yields the new text's units. The replay code in
//! [`crate::line_map`] and [`crate::char_map`] relies on that invariant.
//!
//! Segments are produced from [`similar`]'s diff ops. `Replace` ops are
//! expanded into a `Removed` run followed by an `Added` run, so downstream
//! replay always sees removals before the insertions that displaced them.

use serde::{Deserialize, Serialize};
use similar::{DiffOp, TextDiff};

/// The role a segment plays in the diff.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SegmentKind {
    /// Present in both texts
    Equal,

    /// Present only in the new text
    Added,

    /// Present only in the old text
    Removed,
}

/// A run of consecutive units (lines or characters) with the same role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffSegment {
    /// Role of this run
    pub kind: SegmentKind,

    /// Number of units in the run, always non-zero
    pub count: usize,
}

impl DiffSegment {
    pub fn new(kind: SegmentKind, count: usize) -> Self {
        Self { kind, count }
    }
}

/// Compute line-level diff segments between two texts.
///
/// Units are whole lines (trailing newline included), so counts are line
/// counts directly comparable to zero-based line numbers.
pub fn line_segments(old_text: &str, new_text: &str) -> Vec<DiffSegment> {
    segments_from_ops(TextDiff::from_lines(old_text, new_text).ops())
}

/// Compute character-level diff segments between two texts.
///
/// Units are characters; used for within-line mapping.
pub fn char_segments(old_text: &str, new_text: &str) -> Vec<DiffSegment> {
    segments_from_ops(TextDiff::from_chars(old_text, new_text).ops())
}

fn segments_from_ops(ops: &[DiffOp]) -> Vec<DiffSegment> {
    fn push(segments: &mut Vec<DiffSegment>, kind: SegmentKind, count: usize) {
        if count > 0 {
            segments.push(DiffSegment::new(kind, count));
        }
    }

    let mut segments = Vec::with_capacity(ops.len());

    for op in ops {
        match *op {
            DiffOp::Equal { len, .. } => push(&mut segments, SegmentKind::Equal, len),
            DiffOp::Delete { old_len, .. } => push(&mut segments, SegmentKind::Removed, old_len),
            DiffOp::Insert { new_len, .. } => push(&mut segments, SegmentKind::Added, new_len),
            DiffOp::Replace {
                old_len, new_len, ..
            } => {
                push(&mut segments, SegmentKind::Removed, old_len);
                push(&mut segments, SegmentKind::Added, new_len);
            }
        }
    }

    segments
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_texts_produce_single_equal_run() {
        let segments = line_segments("a\nb\nc\n", "a\nb\nc\n");
        assert_eq!(segments, vec![DiffSegment::new(SegmentKind::Equal, 3)]);
    }

    #[test]
    fn deletion_at_start() {
        let segments = line_segments("x\ny\na\nb\n", "a\nb\n");
        assert_eq!(
            segments,
            vec![
                DiffSegment::new(SegmentKind::Removed, 2),
                DiffSegment::new(SegmentKind::Equal, 2),
            ]
        );
    }

    #[test]
    fn insertion_at_end() {
        let segments = line_segments("a\nb\n", "a\nb\nc\nd\n");
        assert_eq!(
            segments,
            vec![
                DiffSegment::new(SegmentKind::Equal, 2),
                DiffSegment::new(SegmentKind::Added, 2),
            ]
        );
    }

    #[test]
    fn replacement_expands_to_removed_then_added() {
        let segments = line_segments("a\nx\nb\n", "a\np\nq\nb\n");
        assert_eq!(
            segments,
            vec![
                DiffSegment::new(SegmentKind::Equal, 1),
                DiffSegment::new(SegmentKind::Removed, 1),
                DiffSegment::new(SegmentKind::Added, 2),
                DiffSegment::new(SegmentKind::Equal, 1),
            ]
        );
    }

    #[test]
    fn segments_reconstruct_both_sides() {
        let old_text = "a\nb\nc\nd\n";
        let new_text = "a\nx\ny\nd\n";
        let segments = line_segments(old_text, new_text);

        let old_lines: usize = segments
            .iter()
            .filter(|s| s.kind != SegmentKind::Added)
            .map(|s| s.count)
            .sum();
        let new_lines: usize = segments
            .iter()
            .filter(|s| s.kind != SegmentKind::Removed)
            .map(|s| s.count)
            .sum();

        assert_eq!(old_lines, 4);
        assert_eq!(new_lines, 4);
    }
}
