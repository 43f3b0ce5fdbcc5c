// Copyright (c) 2025 Templated SQL LSP Team
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Ref/SQL Conversion
//!
//! Bidirectional edits between template refs and literal table
//! references:
//!
//! - `ref_to_sql`: replace `{{ ref('model') }}` expressions with the
//!   model's fully qualified relation.
//! - `sql_to_ref`: replace literal references to known models with the
//!   equivalent `ref` expression.
//!
//! Both return edits as byte spans with replacement text; the caller
//! converts them to editor positions.

use std::ops::Range;

use templated_sql_lsp_resolved_ast::ResolvedTable;
use templated_sql_lsp_textmap::TextComposer;

use crate::manifest::ManifestModel;
use crate::template::find_refs;

/// A pending text replacement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefChange {
    pub span: Range<usize>,
    pub new_text: String,
}

/// The FROM-clause spelling of a model's relation.
pub fn from_clause(model: &ManifestModel) -> String {
    if model.database.is_empty() {
        format!("{}.{}", model.schema, model.name)
    } else {
        format!("{}.{}.{}", model.database, model.schema, model.name)
    }
}

/// Replace each `ref` expression that names a known model with the
/// model's relation.
pub fn ref_to_sql(raw_text: &str, models: &[ManifestModel]) -> Vec<RefChange> {
    find_refs(raw_text)
        .into_iter()
        .filter_map(|reference| {
            let model = models
                .iter()
                .find(|model| model.name == reference.model_name)?;
            Some(RefChange {
                span: reference.span,
                new_text: from_clause(model),
            })
        })
        .collect()
}

/// Replace each resolved table that matches a known model with a `ref`
/// expression.
pub fn sql_to_ref(resolved: &[ResolvedTable], models: &[ManifestModel]) -> Vec<RefChange> {
    resolved
        .iter()
        .filter_map(|table| {
            let model = models
                .iter()
                .find(|model| model.schema == table.schema && model.name == table.name)?;
            let mut expression = TextComposer::new();
            expression
                .append("ref('")
                .append(model.name.as_str())
                .append("')")
                .prepend("{{ ")
                .append(" }}");
            Some(RefChange {
                span: table.location.start..table.location.end,
                new_text: expression.compose(),
            })
        })
        .collect()
}
