// Copyright (c) 2025 Templated SQL LSP Team
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Hover Information Provider
//!
//! Resolves the identifier under the cursor against the document's
//! analysis result and renders a plain-text hint.
//!
//! The cursor lives in the raw templated text while the analysis was run
//! on the compiled SQL; the label is extracted from the raw text and the
//! AST query works by label rather than position, so no mapping is
//! needed here.

use templated_sql_lsp_resolved_ast::{AnalyzeResponse, HoverInfo, hover_info};
use tower_lsp::lsp_types::{Hover, HoverContents, MarkedString, Position};

use crate::ident::identifier_at;

pub struct HoverProvider;

impl HoverProvider {
    /// Hover at `position` in the raw document.
    pub fn hover(
        raw_text: &str,
        analysis: Option<&AnalyzeResponse>,
        position: Position,
    ) -> Option<Hover> {
        let analysis = analysis?;
        let label = identifier_at(raw_text, position)?;

        let info = hover_info(analysis, &label);
        let hint = Self::hint(&label, &info)?;

        Some(Hover {
            contents: HoverContents::Scalar(MarkedString::String(hint)),
            range: None,
        })
    }

    fn hint(label: &str, info: &HoverInfo) -> Option<String> {
        if let Some(output_column) = &info.output_column {
            let column = output_column.column.as_ref();
            let is_alias = column.is_some_and(|column| {
                column.table_name == "$query" || column.name != output_column.name
            });
            if is_alias {
                return Some(format!("Alias: {}", output_column.name));
            }
            let column = column?;
            return Some(format!(
                "Table: {}\nColumn: {}\nType: {}",
                column.table_name,
                column.name,
                column.type_name.as_deref().unwrap_or("unknown"),
            ));
        }

        if let Some(with_query_name) = &info.with_query_name {
            return Some(format!(
                "Temporary table introduced in a WITH clause: {with_query_name}"
            ));
        }

        if let Some(table_name) = &info.table_name {
            return Some(format!("Table: {table_name}"));
        }

        if info.is_function {
            return Some(format!("Function: {label}"));
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use templated_sql_lsp_test_utils::analyzer;

    fn analysis(statement: serde_json::Value) -> AnalyzeResponse {
        AnalyzeResponse::from_value(&analyzer::analyze_response(statement))
    }

    #[test]
    fn hovers_a_column_with_its_type() {
        let response = analysis(analyzer::simple_select());
        let raw = "select id, name from {{ ref('table1') }}";

        let hover = HoverProvider::hover(raw, Some(&response), Position::new(0, 8))
            .expect("column hover");
        let HoverContents::Scalar(MarkedString::String(hint)) = hover.contents else {
            panic!("expected plain hint");
        };
        assert_eq!(hint, "Table: table1\nColumn: id\nType: INT64");
    }

    #[test]
    fn hovers_an_aliased_column_as_an_alias() {
        // Columns synthesized by the query itself hover as aliases.
        let statement = analyzer::wrapped(
            "resolvedQueryStmtNode",
            serde_json::json!({
                "parent": { "parent": {} },
                "outputColumnList": [
                    analyzer::output_column(
                        "total",
                        analyzer::column("$query", "total", "TYPE_INT64"),
                    ),
                ],
            }),
        );
        let response = AnalyzeResponse::from_value(&analyzer::analyze_response(statement));
        let raw = "select sum(amount) as total from orders";

        let hover = HoverProvider::hover(raw, Some(&response), Position::new(0, 23))
            .expect("alias hover");
        let HoverContents::Scalar(MarkedString::String(hint)) = hover.contents else {
            panic!("expected plain hint");
        };
        assert_eq!(hint, "Alias: total");
    }

    #[test]
    fn hovers_a_cte_name() {
        let response = analysis(analyzer::with_cte_query());
        let raw = "with active_users as (select id, email from users) select id from active_users";

        let hover = HoverProvider::hover(raw, Some(&response), Position::new(0, 7))
            .expect("cte hover");
        let HoverContents::Scalar(MarkedString::String(hint)) = hover.contents else {
            panic!("expected plain hint");
        };
        assert_eq!(
            hint,
            "Temporary table introduced in a WITH clause: active_users"
        );
    }

    #[test]
    fn hovers_a_function_name() {
        let response = analysis(analyzer::function_call_query());
        let raw = "select lower(name) from table1";

        let hover = HoverProvider::hover(raw, Some(&response), Position::new(0, 9))
            .expect("function hover");
        let HoverContents::Scalar(MarkedString::String(hint)) = hover.contents else {
            panic!("expected plain hint");
        };
        assert_eq!(hint, "Function: lower");
    }

    #[test]
    fn no_analysis_or_no_match_yields_nothing() {
        let raw = "select unknown_thing from t";
        assert!(HoverProvider::hover(raw, None, Position::new(0, 8)).is_none());

        let response = analysis(analyzer::simple_select());
        assert!(
            HoverProvider::hover(raw, Some(&response), Position::new(0, 8)).is_none()
        );
    }
}
