// Copyright (c) 2025 Templated SQL LSP Team
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Identifier Extraction
//!
//! Finds the SQL identifier under a cursor position. Used by hover (what
//! word is the user on), completion (the typed prefix), and diagnostics
//! (the range to underline for an analyzer error position).

use tower_lsp::lsp_types::{Position, Range};

fn is_identifier_char(character: char) -> bool {
    character.is_ascii_alphanumeric() || character == '_'
}

/// The identifier range containing `position`, or an empty range at the
/// position when it is not on an identifier.
pub fn identifier_range_at(text: &str, position: Position) -> Range {
    let Some(line) = text.split('\n').nth(position.line as usize) else {
        return Range::new(position, position);
    };

    let characters: Vec<char> = line.chars().collect();
    let cursor = (position.character as usize).min(characters.len());

    // A cursor at the end of a word still belongs to it.
    let anchor = if cursor < characters.len() && is_identifier_char(characters[cursor]) {
        cursor
    } else if cursor > 0 && is_identifier_char(characters[cursor - 1]) {
        cursor - 1
    } else {
        return Range::new(position, position);
    };

    let mut start = anchor;
    while start > 0 && is_identifier_char(characters[start - 1]) {
        start -= 1;
    }
    let mut end = anchor + 1;
    while end < characters.len() && is_identifier_char(characters[end]) {
        end += 1;
    }

    Range::new(
        Position::new(position.line, start as u32),
        Position::new(position.line, end as u32),
    )
}

/// The identifier text containing `position`, if any.
pub fn identifier_at(text: &str, position: Position) -> Option<String> {
    let range = identifier_range_at(text, position);
    if range.start == range.end {
        return None;
    }

    let line = text.split('\n').nth(position.line as usize)?;
    let word: String = line
        .chars()
        .skip(range.start.character as usize)
        .take((range.end.character - range.start.character) as usize)
        .collect();
    Some(word)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_the_word_under_the_cursor() {
        let text = "select order_id from orders";
        assert_eq!(
            identifier_at(text, Position::new(0, 9)),
            Some("order_id".to_string())
        );
        assert_eq!(
            identifier_at(text, Position::new(0, 21)),
            Some("orders".to_string())
        );
    }

    #[test]
    fn cursor_at_word_end_still_matches() {
        let text = "select id";
        assert_eq!(
            identifier_at(text, Position::new(0, 9)),
            Some("id".to_string())
        );
    }

    #[test]
    fn whitespace_and_missing_lines_yield_nothing() {
        let text = "select  id\n";
        assert_eq!(identifier_at(text, Position::new(0, 7)), None);
        assert_eq!(identifier_at(text, Position::new(5, 0)), None);
    }

    #[test]
    fn range_spans_the_whole_identifier() {
        let text = "from payment_totals";
        let range = identifier_range_at(text, Position::new(0, 10));
        assert_eq!(range.start, Position::new(0, 5));
        assert_eq!(range.end, Position::new(0, 19));
    }
}
