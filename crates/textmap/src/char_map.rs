// Copyright (c) 2025 Templated SQL LSP Team
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Character Mapping
//!
//! Within-line counterpart of [`crate::line_map`]: maps a character
//! column of a compiled line back to the raw line it came from, and the
//! reverse. The replay is the same accumulator walk over character-level
//! diff segments, without the line layer's boundary rule.

use crate::segment::{SegmentKind, char_segments};

/// Map a character column of `new_line` to the corresponding column of
/// `old_line`.
pub fn old_character(old_line: &str, new_line: &str, new_character: usize) -> usize {
    let segments = char_segments(old_line, new_line);
    if segments.is_empty() {
        return new_character;
    }

    let mut old_char = 0usize;
    let mut current_char = 0usize;

    for segment in &segments {
        match segment.kind {
            SegmentKind::Removed => {
                old_char += segment.count;
            }
            SegmentKind::Added => {
                if new_character < current_char + segment.count {
                    current_char = new_character;
                } else {
                    current_char += segment.count;
                }
            }
            SegmentKind::Equal => {
                if new_character < current_char + segment.count {
                    old_char += new_character - current_char;
                    current_char = new_character;
                } else {
                    old_char += segment.count;
                    current_char += segment.count;
                }
            }
        }

        if current_char >= new_character {
            break;
        }
    }

    old_char
}

/// Map a character column of `old_line` to the corresponding column of
/// `new_line`.
pub fn new_character(old_line: &str, new_line: &str, old_character: usize) -> usize {
    let segments = char_segments(old_line, new_line);
    if segments.is_empty() {
        return old_character;
    }

    let target = old_character as i64;
    let mut new_char: i64 = 0;
    let mut current_char: i64 = 0;

    for segment in &segments {
        let count = segment.count as i64;
        match segment.kind {
            SegmentKind::Removed => current_char += count,
            SegmentKind::Added => new_char += count,
            SegmentKind::Equal => {
                if current_char + count > target {
                    new_char += target - current_char;
                    break;
                }
                current_char += count;
                new_char += count;
            }
        }
    }

    new_char.max(0) as usize
}
