// Copyright (c) 2025 Templated SQL LSP Team
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Completion Provider
//!
//! Builds completion items for a cursor position in the raw document.
//!
//! ## Position translation
//!
//! The analysis ran on the compiled SQL, so the raw cursor line is mapped
//! into compiled coordinates first (the compiled text is the mapping's
//! "old" side here: the raw document is a later revision of it from the
//! diff's point of view). The resulting offset drives the AST query for
//! active tables.
//!
//! ## Item sources
//!
//! - Template snippets matching the typed prefix.
//! - Columns of the tables active at the cursor.
//! - CTE names defined in the statement.

use templated_sql_lsp_resolved_ast::{AnalyzeResponse, ColumnInfo, completion_info};
use templated_sql_lsp_textmap::old_line_number;
use tower_lsp::lsp_types::{CompletionItem, CompletionItemKind, Position};

use crate::ident::identifier_at;
use crate::snippets::provide_snippets;

pub struct CompletionProvider;

impl CompletionProvider {
    /// Completion items at `position` in the raw document.
    pub fn completions(
        raw_text: &str,
        compiled_text: Option<&str>,
        analysis: Option<&AnalyzeResponse>,
        position: Position,
    ) -> Vec<CompletionItem> {
        let prefix = typed_prefix(raw_text, position);
        let mut items = provide_snippets(&prefix);

        let (Some(compiled_text), Some(analysis)) = (compiled_text, analysis) else {
            return items;
        };

        let compiled_line =
            old_line_number(compiled_text, raw_text, position.line as usize);
        let Some(offset) = offset_at(compiled_text, compiled_line, position.character as usize)
        else {
            return items;
        };

        let info = completion_info(analysis, offset);

        for table in &info.active_tables {
            let source = table.alias.as_deref().unwrap_or(table.name.as_str());
            items.extend(table.columns.iter().map(|column| {
                column_item(column, source)
            }));
        }

        // Columns of the enclosing query when no table is active here.
        if info.active_tables.is_empty() {
            if let Some(main_query) = &info.main_query {
                items.extend(
                    main_query
                        .columns
                        .iter()
                        .map(|column| column_item(column, &column.from_table)),
                );
            }
        }

        items.extend(info.with_names.iter().map(|name| CompletionItem {
            label: name.clone(),
            kind: Some(CompletionItemKind::STRUCT),
            detail: Some("Temporary table (WITH clause)".to_string()),
            sort_text: Some(format!("3{name}")),
            ..Default::default()
        }));

        items
    }
}

fn column_item(column: &ColumnInfo, source: &str) -> CompletionItem {
    CompletionItem {
        label: column.name.clone(),
        kind: Some(CompletionItemKind::FIELD),
        detail: Some(match &column.type_name {
            Some(type_name) => format!("{source} · {type_name}"),
            None => source.to_string(),
        }),
        sort_text: Some(format!("2{}", column.name)),
        ..Default::default()
    }
}

/// The identifier fragment directly before the cursor.
fn typed_prefix(text: &str, position: Position) -> String {
    if position.character == 0 {
        return String::new();
    }
    let previous = Position::new(position.line, position.character - 1);
    identifier_at(text, previous).unwrap_or_default()
}

/// Character offset of a line/column pair in `text`.
fn offset_at(text: &str, line: usize, character: usize) -> Option<usize> {
    let mut offset = 0usize;
    for (index, current) in text.split('\n').enumerate() {
        if index == line {
            let line_length = current.chars().count();
            return Some(offset + character.min(line_length));
        }
        offset += current.chars().count() + 1;
    }
    None
}
