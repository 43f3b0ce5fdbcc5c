// Copyright (c) 2025 Templated SQL LSP Team
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Template Snippet Completions
//!
//! Snippet items for the template layer, offered while the user types in
//! raw source. Only the `ref` snippet exists today; new snippets get an
//! entry in [`provide_snippets`].

use templated_sql_lsp_textmap::TextComposer;
use tower_lsp::lsp_types::{
    Command, CompletionItem, CompletionItemKind, InsertTextFormat,
};

/// Snippets matching the typed `prefix`.
pub fn provide_snippets(prefix: &str) -> Vec<CompletionItem> {
    let mut items = Vec::new();

    if "ref".starts_with(prefix) {
        let mut insert_text = TextComposer::new();
        insert_text.append("ref('$0')").prepend("{{ ").append(" }}");

        items.push(CompletionItem {
            label: "ref".to_string(),
            kind: Some(CompletionItemKind::SNIPPET),
            detail: Some("{{ ref }}".to_string()),
            sort_text: Some("1ref".to_string()),
            insert_text: Some(insert_text.compose()),
            insert_text_format: Some(InsertTextFormat::SNIPPET),
            command: Some(Command::new(
                "triggerSuggest".to_string(),
                "editor.action.triggerSuggest".to_string(),
                None,
            )),
            ..Default::default()
        });
    }

    items
}
