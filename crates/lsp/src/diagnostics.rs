// Copyright (c) 2025 Templated SQL LSP Team
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Diagnostics
//!
//! Turns collaborator errors into editor diagnostics, re-anchored onto
//! the raw document:
//!
//! - **Analyzer errors** carry a `[at line:column]` position in compiled
//!   coordinates; the position is mapped backward through the text pair
//!   and the identifier there is underlined in both documents.
//! - **Template compiler errors** name a raw line directly.
//! - **Ref hints** are information diagnostics on literal references to
//!   known project models, with the replacement `ref` expression in the
//!   diagnostic data for a quick fix.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::json;
use templated_sql_lsp_resolved_ast::{AnalyzeResponse, resolved_tables};
use templated_sql_lsp_textmap::{PositionConverter, TextPosition};
use tower_lsp::lsp_types::{Diagnostic, DiagnosticSeverity, Position, Range};

use crate::ident::identifier_range_at;
use crate::manifest::ManifestModel;
use crate::refs::sql_to_ref;

/// Source tag on every diagnostic this server publishes.
pub const DIAGNOSTIC_SOURCE: &str = "Templated SQL";

/// Column up to which a whole-line error is highlighted.
const ERROR_HIGHLIGHT_LAST_CHAR: u32 = 100;

static SQL_ERROR_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)^(.*?) \[at (\d+):(\d+)\]").expect("static pattern compiles"));

static TEMPLATE_ERROR_LINE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n\s*line (\d+)\s*\n").expect("static pattern compiles"));

static TEMPLATE_ERROR_MODEL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Error in model \w+ \(([^)]+)\)").expect("static pattern compiles")
});

/// Diagnostics against both members of a text pair.
#[derive(Debug, Clone, Default)]
pub struct RawAndCompiledDiagnostics {
    pub raw: Vec<Diagnostic>,
    pub compiled: Vec<Diagnostic>,
}

pub struct DiagnosticGenerator;

impl DiagnosticGenerator {
    /// Diagnostics for an analyzer error message like
    /// `Unrecognized name: paused1; Did you mean paused? [at 9:3]`.
    pub fn sql_error_diagnostics(
        error: &str,
        raw_text: &str,
        compiled_text: &str,
    ) -> RawAndCompiledDiagnostics {
        let mut result = RawAndCompiledDiagnostics::default();

        let Some(captures) = SQL_ERROR_PATTERN.captures(error) else {
            return result;
        };
        let message = captures[1].to_string();
        let (Ok(line), Ok(character)) = (captures[2].parse::<u32>(), captures[3].parse::<u32>())
        else {
            return result;
        };

        // Analyzer positions are one-based.
        let compiled_position = Position::new(line.saturating_sub(1), character.saturating_sub(1));

        let converter = PositionConverter::new(raw_text, compiled_text);
        let raw_position = converter.convert_backward(TextPosition::new(
            compiled_position.line as usize,
            compiled_position.character as usize,
        ));
        let raw_position = Position::new(raw_position.line as u32, raw_position.character as u32);

        result
            .raw
            .push(error_diagnostic(raw_text, raw_position, &message));
        result
            .compiled
            .push(error_diagnostic(compiled_text, compiled_position, &message));
        result
    }

    /// Diagnostics for a template compiler error. The error text names
    /// the raw line when one is known; otherwise the first line is used.
    pub fn template_error_diagnostics(error: &str) -> Vec<Diagnostic> {
        let line = TEMPLATE_ERROR_LINE_PATTERN
            .captures(error)
            .and_then(|captures| captures[1].parse::<u32>().ok())
            .map(|line| line.saturating_sub(1))
            .unwrap_or(0);

        vec![Diagnostic {
            severity: Some(DiagnosticSeverity::ERROR),
            range: Range::new(
                Position::new(line, 0),
                Position::new(line, ERROR_HIGHLIGHT_LAST_CHAR),
            ),
            message: error.to_string(),
            source: Some(DIAGNOSTIC_SOURCE.to_string()),
            ..Default::default()
        }]
    }

    /// The project-relative path of the model a template error names.
    pub fn template_error_target(error: &str) -> Option<String> {
        TEMPLATE_ERROR_MODEL_PATTERN
            .captures(error)
            .map(|captures| captures[1].to_string())
    }

    /// Information diagnostics for literal references to known project
    /// models; each carries the `ref` replacement in its data.
    pub fn ref_candidate_diagnostics(
        analysis: &AnalyzeResponse,
        raw_text: &str,
        compiled_text: &str,
        models: &[ManifestModel],
    ) -> Vec<Diagnostic> {
        let resolved = resolved_tables(analysis, compiled_text);
        let changes = sql_to_ref(&resolved, models);
        if changes.is_empty() {
            return Vec::new();
        }

        let converter = PositionConverter::new(raw_text, compiled_text);
        let mut diagnostics = Vec::new();

        for change in changes {
            let compiled_start = position_at(compiled_text, change.span.start);
            let compiled_end = position_at(compiled_text, change.span.end);
            let raw_start = converter.convert_backward(compiled_start);
            let raw_end = converter.convert_backward(compiled_end);

            // Only flag references the user actually spelled out in the
            // raw document; anything else came from template expansion.
            let raw_slice = slice_between(raw_text, raw_start, raw_end);
            let compiled_slice = slice_between(compiled_text, compiled_start, compiled_end);
            if raw_slice.is_none() || raw_slice != compiled_slice {
                continue;
            }

            diagnostics.push(Diagnostic {
                severity: Some(DiagnosticSeverity::INFORMATION),
                range: Range::new(
                    Position::new(raw_start.line as u32, raw_start.character as u32),
                    Position::new(raw_end.line as u32, raw_end.character as u32),
                ),
                message: "Reference to a project model is not a ref".to_string(),
                source: Some(DIAGNOSTIC_SOURCE.to_string()),
                data: Some(json!({ "replaceText": change.new_text })),
                ..Default::default()
            });
        }

        diagnostics
    }
}

fn error_diagnostic(text: &str, position: Position, message: &str) -> Diagnostic {
    let mut range = identifier_range_at(text, position);
    if range.start == range.end {
        range.end.character += 1;
    }

    Diagnostic {
        severity: Some(DiagnosticSeverity::ERROR),
        range: extend_range_if_small(range),
        message: message.to_string(),
        source: Some(DIAGNOSTIC_SOURCE.to_string()),
        ..Default::default()
    }
}

/// A one-character highlight is easy to miss; widen it by one on each
/// side.
fn extend_range_if_small(mut range: Range) -> Range {
    if range.start.line == range.end.line && range.end.character == range.start.character + 1 {
        if range.start.character > 0 {
            range.start.character -= 1;
        }
        range.end.character += 1;
    }
    range
}

/// Line/character position of a character offset in `text`.
fn position_at(text: &str, offset: usize) -> TextPosition {
    let mut line = 0usize;
    let mut line_start = 0usize;
    for (index, character) in text.chars().enumerate() {
        if index >= offset {
            break;
        }
        if character == '\n' {
            line += 1;
            line_start = index + 1;
        }
    }
    TextPosition::new(line, offset - line_start)
}

fn slice_between(text: &str, start: TextPosition, end: TextPosition) -> Option<String> {
    let lines: Vec<&str> = text.split('\n').collect();
    if start.line != end.line {
        // Multi-line references do not occur in practice; treat them as
        // non-matching.
        return None;
    }
    let line = lines.get(start.line)?;
    let characters: Vec<char> = line.chars().collect();
    if end.character > characters.len() || start.character > end.character {
        return None;
    }
    Some(characters[start.character..end.character].iter().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use templated_sql_lsp_test_utils::fixtures;

    #[test]
    fn sql_errors_land_on_the_identifier_in_both_texts() {
        let error = "Unrecognized name: amount [at 2:8]";
        let result = DiagnosticGenerator::sql_error_diagnostics(
            error,
            fixtures::ONE_REF_RAW,
            fixtures::ONE_REF_COMPILED,
        );

        assert_eq!(result.compiled.len(), 1);
        let compiled = &result.compiled[0];
        assert_eq!(compiled.message, "Unrecognized name: amount");
        assert_eq!(compiled.range, Range::new(Position::new(1, 7), Position::new(1, 13)));

        // The raw document has the config header above, so the same
        // identifier sits five lines lower.
        let raw = &result.raw[0];
        assert_eq!(raw.range, Range::new(Position::new(6, 7), Position::new(6, 13)));
        assert_eq!(raw.severity, Some(DiagnosticSeverity::ERROR));
        assert_eq!(raw.source.as_deref(), Some(DIAGNOSTIC_SOURCE));
    }

    #[test]
    fn unparseable_analyzer_errors_produce_no_diagnostics() {
        let result = DiagnosticGenerator::sql_error_diagnostics(
            "something went wrong",
            "select 1",
            "select 1",
        );
        assert!(result.raw.is_empty());
        assert!(result.compiled.is_empty());
    }

    #[test]
    fn template_errors_highlight_the_named_line() {
        let error = "Compilation Error in model orders (models/orders.sql)\n  line 5\n  undefined macro 'payment_day_parts'";
        let diagnostics = DiagnosticGenerator::template_error_diagnostics(error);

        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].range.start, Position::new(4, 0));
        assert_eq!(
            diagnostics[0].range.end,
            Position::new(4, ERROR_HIGHLIGHT_LAST_CHAR)
        );

        assert_eq!(
            DiagnosticGenerator::template_error_target(error).as_deref(),
            Some("models/orders.sql")
        );
    }

    #[test]
    fn template_errors_without_a_line_default_to_the_top() {
        let diagnostics = DiagnosticGenerator::template_error_diagnostics("boom");
        assert_eq!(diagnostics[0].range.start, Position::new(0, 0));
    }

    #[test]
    fn extend_range_if_small_widens_single_characters() {
        let small = Range::new(Position::new(3, 5), Position::new(3, 6));
        let widened = extend_range_if_small(small);
        assert_eq!(widened, Range::new(Position::new(3, 4), Position::new(3, 7)));

        let wide = Range::new(Position::new(3, 5), Position::new(3, 9));
        assert_eq!(extend_range_if_small(wide), wide);
    }

    #[test]
    fn literal_model_references_get_a_ref_hint() {
        use templated_sql_lsp_resolved_ast::AnalyzeResponse;
        use templated_sql_lsp_test_utils::analyzer;

        let text = "select payment_id,\n       amount\nfrom analytics.jaffle_shop.stg_payments\nwhere amount > 0\n";
        let columns = [("stg_payments", "payment_id", "TYPE_INT64")];
        let statement = analyzer::wrapped(
            "resolvedQueryStmtNode",
            serde_json::json!({
                "parent": { "parent": { "parseLocationRange": { "start": 0, "end": 89 } } },
                "outputColumnList": [],
                "query": analyzer::wrapped(
                    "resolvedProjectScanNode",
                    serde_json::json!({
                        "parent": analyzer::scan_base(Some((0, 89)), &columns),
                        "inputScan": analyzer::table_scan(
                            (38, 72),
                            &columns,
                            "stg_payments",
                            "analytics.jaffle_shop.stg_payments",
                            ""
                        )
                    })
                )
            }),
        );
        let analysis =
            AnalyzeResponse::from_value(&analyzer::analyze_response(statement));
        let models = [ManifestModel {
            name: "stg_payments".to_string(),
            database: "analytics".to_string(),
            schema: "jaffle_shop".to_string(),
        }];

        // The user wrote the literal reference: hint it.
        let diagnostics =
            DiagnosticGenerator::ref_candidate_diagnostics(&analysis, text, text, &models);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].severity, Some(DiagnosticSeverity::INFORMATION));
        assert_eq!(
            diagnostics[0].range,
            Range::new(Position::new(2, 5), Position::new(2, 39))
        );
        assert_eq!(
            diagnostics[0].data,
            Some(json!({ "replaceText": "{{ ref('stg_payments') }}" }))
        );

        // The reference came from a template expansion: no hint.
        let raw = "select payment_id,\n       amount\nfrom {{ ref('stg_payments') }}\nwhere amount > 0\n";
        let diagnostics =
            DiagnosticGenerator::ref_candidate_diagnostics(&analysis, raw, text, &models);
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn position_at_walks_lines() {
        let text = "ab\ncde\nf";
        assert_eq!(position_at(text, 0), TextPosition::new(0, 0));
        assert_eq!(position_at(text, 3), TextPosition::new(1, 0));
        assert_eq!(position_at(text, 5), TextPosition::new(1, 2));
        assert_eq!(position_at(text, 7), TextPosition::new(2, 0));
    }
}
