// Copyright (c) 2025 Templated SQL LSP Team
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # AST Traversal
//!
//! Depth-first traversal over decoded [`ResolvedNode`] trees, answering
//! the three questions the language-server layer asks:
//!
//! - [`hover_info`]: classify the symbol with a given label.
//! - [`completion_info`]: find the table-reference spans active for a
//!   cursor offset, plus everything visible for suggestions.
//! - [`resolved_tables`]: list table references with schema and span.
//!
//! ## Active-table resolution
//!
//! Completion keeps a stack of "scope frames": every ranged node except
//! table and join scans opens one. When a table scan closes, its span is
//! recorded on the innermost frame whose span contains both the scan and
//! the cursor. When a frame's own node closes with recorded spans, those
//! spans are the answer — for a set operation whose branches carry no
//! spans of their own, the frame is the whole set-operation scan, so a
//! cursor anywhere in it (including on a connecting keyword) yields every
//! branch's table span together. A project-scan frame that closes around
//! the cursor with nothing recorded yields an explicitly empty set.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::kind::NodeKind;
use crate::node::{AnalyzeResponse, NodePayload, OutputColumn, ResolvedNode};
use crate::span::Span;

/// What the symbol under the cursor refers to.
///
/// Only the fields relevant to the matched node kind are populated; a
/// label matching nothing leaves every field absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HoverInfo {
    /// The output column whose name matches the label
    pub output_column: Option<OutputColumn>,

    /// Resolved table name, when the label names a table or qualifier
    pub table_name: Option<String>,

    /// CTE name, when the label names a with-query
    pub with_query_name: Option<String>,

    /// Whether the label names a catalog function call
    pub is_function: bool,
}

impl HoverInfo {
    pub fn is_empty(&self) -> bool {
        self.output_column.is_none()
            && self.table_name.is_none()
            && self.with_query_name.is_none()
            && !self.is_function
    }
}

/// A column visible for completion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnInfo {
    pub name: String,
    pub type_name: Option<String>,
    pub from_table: String,
}

/// Columns and location of a with-subquery (or of the main query).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WithSubqueryInfo {
    pub columns: Vec<ColumnInfo>,
    pub span: Option<Span>,
}

/// A table whose columns should be suggested at the cursor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActiveTableInfo {
    pub name: String,
    pub alias: Option<String>,
    pub columns: Vec<ColumnInfo>,

    /// Span of the table reference in the analyzed SQL
    pub name_span: Option<Span>,
}

/// Everything completion needs for one cursor position.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompletionInfo {
    /// Fully-qualified table name to its column names
    pub resolved_tables: BTreeMap<String, Vec<String>>,

    /// Names of all CTEs defined in the statement
    pub with_names: BTreeSet<String>,

    /// Column info per CTE
    pub with_subqueries: BTreeMap<String, WithSubqueryInfo>,

    /// Column info of the statement's main query, when it has CTEs
    pub main_query: Option<WithSubqueryInfo>,

    /// Table-reference spans active for the cursor; `Some(vec![])` means
    /// the cursor scope was resolved and holds no tables
    pub active_table_ranges: Option<Vec<Span>>,

    /// Active tables whose own span does not contain the cursor
    pub active_tables: Vec<ActiveTableInfo>,
}

/// A table reference extracted for ref-rewrite support.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedTable {
    /// Schema the reference names, as spelled in the SQL text
    pub schema: String,

    /// Bare table name
    pub name: String,

    /// Byte range of the reference in the analyzed SQL
    pub location: Span,
}

/// Traversal events; `Leave` fires after a node's children.
enum WalkEvent<'a> {
    Enter(&'a ResolvedNode),
    Leave(&'a ResolvedNode),
}

fn walk<'a>(node: &'a ResolvedNode, visit: &mut impl FnMut(WalkEvent<'a>)) {
    visit(WalkEvent::Enter(node));
    for child in &node.children {
        walk(child, visit);
    }
    visit(WalkEvent::Leave(node));
}

/// Classify the symbol whose text is `label`.
///
/// First match wins per field; unmatched fields stay absent. A response
/// without a resolved statement yields an empty result.
pub fn hover_info(response: &AnalyzeResponse, label: &str) -> HoverInfo {
    let mut info = HoverInfo::default();
    let Some(root) = &response.resolved_statement else {
        return info;
    };

    walk(root, &mut |event| {
        let WalkEvent::Enter(node) = event else {
            return;
        };
        match &node.payload {
            NodePayload::QueryStmt { output_columns } => {
                if info.output_column.is_none() {
                    info.output_column = output_columns
                        .iter()
                        .find(|column| column.name == label)
                        .cloned();
                }
                // A label that is no output column but qualifies one of
                // them is a table qualifier, not a column.
                if info.output_column.is_none()
                    && info.table_name.is_none()
                    && output_columns.iter().any(|column| {
                        column
                            .column
                            .as_ref()
                            .is_some_and(|resolved| resolved.table_name == label)
                    })
                {
                    info.table_name = Some(label.to_string());
                }
            }
            NodePayload::TableScan {
                table: Some(table), ..
            } => {
                if info.table_name.is_none()
                    && (table.full_name.as_deref() == Some(label)
                        || table.name.as_deref() == Some(label))
                {
                    info.table_name = table.resolved_name().map(str::to_string);
                }
            }
            NodePayload::FunctionCall {
                function: Some(function),
            } => {
                let short_name = function.rsplit(':').next().unwrap_or(function.as_str());
                if short_name == label {
                    info.is_function = true;
                }
            }
            _ => {
                if info.with_query_name.is_none() && node.with_query_name() == Some(label) {
                    info.with_query_name = Some(label.to_string());
                }
            }
        }
    });

    info
}

/// Resolve the table scopes active for a cursor at `offset`.
pub fn completion_info(response: &AnalyzeResponse, offset: usize) -> CompletionInfo {
    let mut info = CompletionInfo::default();
    let Some(root) = &response.resolved_statement else {
        return info;
    };

    struct ScopeFrame<'a> {
        node: &'a ResolvedNode,
        span: Span,
        ranges: Vec<Span>,
        tables: Vec<ActiveTableInfo>,
    }

    let mut stack: Vec<ScopeFrame<'_>> = Vec::new();
    let mut resolved = false;

    walk(root, &mut |event| match event {
        WalkEvent::Enter(node) => {
            match &node.payload {
                NodePayload::TableScan { table, .. } => {
                    if let Some(full_name) = table
                        .as_ref()
                        .and_then(|table| table.full_name.as_deref())
                        .filter(|name| !name.is_empty())
                    {
                        info.resolved_tables
                            .entry(full_name.to_string())
                            .or_insert_with(|| {
                                node.columns.iter().map(|column| column.name.clone()).collect()
                            });
                    }
                }
                NodePayload::WithScan => {
                    for child in &node.children {
                        if let NodePayload::WithEntry { name } = &child.payload {
                            info.with_names.insert(name.clone());
                            if !info.with_subqueries.contains_key(name) {
                                let subquery = child.children.first();
                                info.with_subqueries.insert(
                                    name.clone(),
                                    WithSubqueryInfo {
                                        columns: subquery.map(column_infos).unwrap_or_default(),
                                        span: subquery.and_then(|scan| scan.span),
                                    },
                                );
                            }
                        }
                    }
                    if info.main_query.is_none() {
                        let query = node.children.iter().find(|child| {
                            !matches!(child.payload, NodePayload::WithEntry { .. })
                        });
                        if let Some(query) = query {
                            info.main_query = Some(WithSubqueryInfo {
                                columns: column_infos(query),
                                span: query.span,
                            });
                        }
                    }
                }
                _ => {}
            }

            if !matches!(node.kind(), NodeKind::TableScan | NodeKind::JoinScan) {
                if let Some(span) = node.span {
                    stack.push(ScopeFrame {
                        node,
                        span,
                        ranges: Vec::new(),
                        tables: Vec::new(),
                    });
                }
            }
        }
        WalkEvent::Leave(node) => {
            if resolved || stack.is_empty() {
                return;
            }

            if node.kind() == NodeKind::TableScan {
                let Some(span) = node.span else {
                    return;
                };
                let frame = stack.last_mut().expect("stack checked non-empty");
                if frame.span.contains(span) && frame.span.contains_offset(offset) {
                    frame.ranges.push(span);
                    if !span.contains_offset(offset) {
                        record_active_table(frame, node);
                    }
                }
            } else if std::ptr::eq(stack.last().expect("stack checked non-empty").node, node) {
                let frame = stack.pop().expect("stack checked non-empty");
                if !frame.ranges.is_empty() {
                    info.active_table_ranges = Some(frame.ranges);
                    info.active_tables = frame.tables;
                    resolved = true;
                } else if node.kind() == NodeKind::ProjectScan && frame.span.contains_offset(offset)
                {
                    info.active_table_ranges = Some(Vec::new());
                    resolved = true;
                }
            }
        }
    });

    fn record_active_table<'a>(
        frame: &mut ScopeFrame<'a>,
        node: &'a ResolvedNode,
    ) {
        let NodePayload::TableScan {
            table: Some(table),
            alias,
        } = &node.payload
        else {
            return;
        };
        let Some(name) = table.name.as_deref().filter(|name| !name.is_empty()) else {
            return;
        };
        let duplicate = frame
            .tables
            .iter()
            .any(|known| known.name == name && known.alias.as_deref() == alias.as_deref());
        if !duplicate {
            frame.tables.push(ActiveTableInfo {
                name: name.to_string(),
                alias: alias.clone(),
                columns: column_infos(node),
                name_span: node.span,
            });
        }
    }

    info
}

/// Extract every table reference with its schema and source span.
///
/// `sql` is the analyzed (compiled) SQL text; the schema is taken from
/// the reference as spelled there, so quoting styles survive.
pub fn resolved_tables(response: &AnalyzeResponse, sql: &str) -> Vec<ResolvedTable> {
    let mut tables = Vec::new();
    let Some(root) = &response.resolved_statement else {
        return tables;
    };

    walk(root, &mut |event| {
        let WalkEvent::Enter(node) = event else {
            return;
        };
        let NodePayload::TableScan {
            table: Some(table), ..
        } = &node.payload
        else {
            return;
        };
        let Some(full_name) = table.full_name.as_deref().filter(|name| !name.is_empty()) else {
            return;
        };
        let Some(span) = node.span else {
            return;
        };
        let Some(reference) = sql.get(span.start..span.end.min(sql.len())) else {
            return;
        };

        let table_name = full_name.rsplit('.').next().unwrap_or(full_name);
        if let Some(schema) = extract_schema(reference, table_name) {
            tables.push(ResolvedTable {
                schema,
                name: table_name.to_string(),
                location: span,
            });
        }
    });

    tables
}

/// The schema segment immediately before `table_name` in a reference
/// text, quoting stripped. Absent when the reference is unqualified.
fn extract_schema(reference: &str, table_name: &str) -> Option<String> {
    let cleaned = reference.replace('`', "");
    let position = cleaned.find(table_name)?;
    let qualifier = cleaned[..position].strip_suffix('.')?;
    let schema = qualifier.rsplit('.').next().unwrap_or(qualifier);
    if schema.is_empty() {
        None
    } else {
        Some(schema.to_string())
    }
}

fn column_infos(node: &ResolvedNode) -> Vec<ColumnInfo> {
    node.columns
        .iter()
        .map(|column| ColumnInfo {
            name: column.name.clone(),
            type_name: column.type_name.clone(),
            from_table: column.table_name.clone(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extract_schema_handles_qualified_references() {
        assert_eq!(
            extract_schema("analytics.jaffle_shop.stg_payments", "stg_payments"),
            Some("jaffle_shop".to_string())
        );
        assert_eq!(
            extract_schema("`analytics`.`jaffle_shop`.`stg_payments`", "stg_payments"),
            Some("jaffle_shop".to_string())
        );
        assert_eq!(
            extract_schema("jaffle_shop.stg_payments", "stg_payments"),
            Some("jaffle_shop".to_string())
        );
    }

    #[test]
    fn extract_schema_rejects_unqualified_references() {
        assert_eq!(extract_schema("stg_payments", "stg_payments"), None);
        assert_eq!(extract_schema("", "stg_payments"), None);
    }

    #[test]
    fn empty_response_yields_empty_results() {
        let response = AnalyzeResponse::empty();
        assert!(hover_info(&response, "anything").is_empty());

        let completion = completion_info(&response, 10);
        assert!(completion.active_table_ranges.is_none());
        assert!(completion.resolved_tables.is_empty());

        assert!(resolved_tables(&response, "select 1").is_empty());
    }
}
