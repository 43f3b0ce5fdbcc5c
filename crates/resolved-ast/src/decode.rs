// Copyright (c) 2025 Templated SQL LSP Team
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Wire Decoding
//!
//! Turns the analyzer's self-describing JSON into [`ResolvedNode`] trees.
//!
//! The wire shape this decoder understands:
//!
//! - **Variant wrappers**: `{"node": "<tag>", "<tag>": {...}}`, possibly
//!   nested when the schema has abstract intermediate kinds. The wrapper
//!   chain is unwrapped to the innermost concrete node.
//! - **Base chains**: each node object may hold a `parent` object with
//!   base-class fields; `parseLocationRange` and `columnList` are taken
//!   from the nearest level that defines them.
//! - **Child slots**: fields named in [`CHILD_SLOTS`], on the node object
//!   or anywhere up its base chain. Null or absent slots are skipped.
//! - **64-bit offsets**: byte offsets arrive as JSON numbers or as
//!   decimal strings; both are accepted.
//!
//! Decoding never fails: objects that match nothing decode into generic
//! nodes with whatever children the slot table finds in them.

use serde_json::{Map, Value};
use tracing::trace;

use crate::kind::NodeKind;
use crate::node::{
    AnalyzeResponse, NodePayload, OutputColumn, ResolvedColumn, ResolvedNode, TableHandle,
};
use crate::slots::{CHILD_SLOTS, SlotArity};
use crate::span::Span;

impl AnalyzeResponse {
    /// Decode a full analyzer response.
    pub fn from_value(value: &Value) -> Self {
        let resolved_statement = value.get("resolvedStatement").and_then(decode_any);
        if resolved_statement.is_none() {
            trace!("analyzer response has no resolved statement");
        }
        Self { resolved_statement }
    }

    /// Decode a response from raw JSON text.
    pub fn from_json_str(json: &str) -> serde_json::Result<Self> {
        Ok(Self::from_value(&serde_json::from_str(json)?))
    }
}

/// Decode a value that may be a variant wrapper, a plain node object, or
/// something that is not a node at all.
fn decode_any(value: &Value) -> Option<ResolvedNode> {
    let mut object = value.as_object()?;
    let mut tag: Option<&str> = None;

    // Unwrap nested variant wrappers down to the concrete node.
    while let Some(inner_tag) = object.get("node").and_then(Value::as_str) {
        match object.get(inner_tag).and_then(Value::as_object) {
            Some(inner) => {
                tag = Some(inner_tag);
                object = inner;
            }
            None => break,
        }
    }

    Some(decode_node(tag, object))
}

fn decode_node(tag: Option<&str>, object: &Map<String, Value>) -> ResolvedNode {
    let payload = decode_payload(tag, object);

    let mut children = Vec::new();
    collect_children(object, child_slot_skips(&payload), &mut children);

    ResolvedNode {
        span: chain_span(object),
        columns: chain_columns(object),
        payload,
        children,
    }
}

fn decode_payload(tag: Option<&str>, object: &Map<String, Value>) -> NodePayload {
    let Some(tag) = tag else {
        // Unwrapped plain objects carry no discriminator; CTE entries are
        // recognized by their name attribute.
        if let Some(name) = string_field(object, "withQueryName") {
            return NodePayload::WithEntry { name };
        }
        return NodePayload::Other { tag: None };
    };

    match NodeKind::from_tag(tag) {
        NodeKind::QueryStmt => NodePayload::QueryStmt {
            output_columns: decode_output_columns(object),
        },
        NodeKind::ProjectScan => NodePayload::ProjectScan,
        NodeKind::TableScan => NodePayload::TableScan {
            table: decode_table_handle(object),
            alias: string_field(object, "alias").filter(|alias| !alias.is_empty()),
        },
        NodeKind::JoinScan => NodePayload::JoinScan,
        NodeKind::SetOperationScan => NodePayload::SetOperationScan {
            op_type: string_field(object, "opType"),
        },
        NodeKind::WithScan => NodePayload::WithScan,
        NodeKind::WithRefScan => NodePayload::WithRefScan {
            name: string_field(object, "withQueryName").unwrap_or_default(),
        },
        NodeKind::FunctionCall => NodePayload::FunctionCall {
            function: chain_function_name(object),
        },
        NodeKind::WithEntry | NodeKind::Unknown => NodePayload::Other {
            tag: Some(tag.to_string()),
        },
    }
}

/// Slots consumed as payload data rather than children.
fn child_slot_skips(payload: &NodePayload) -> &'static [&'static str] {
    match payload {
        NodePayload::QueryStmt { .. } => &["outputColumnList"],
        _ => &[],
    }
}

fn collect_children(
    object: &Map<String, Value>,
    skip: &'static [&'static str],
    children: &mut Vec<ResolvedNode>,
) {
    for slot in CHILD_SLOTS {
        if skip.contains(&slot.name) {
            continue;
        }
        let Some(value) = object.get(slot.name) else {
            continue;
        };
        if value.is_null() {
            continue;
        }
        match slot.arity {
            SlotArity::List => {
                if let Some(items) = value.as_array() {
                    children.extend(items.iter().filter_map(decode_any));
                }
            }
            SlotArity::Scalar => {
                if let Some(child) = decode_any(value) {
                    children.push(child);
                }
            }
        }
    }

    // Base-class slots are reachable only through the parent chain.
    if let Some(parent) = object.get("parent").and_then(Value::as_object) {
        collect_children(parent, skip, children);
    }
}

/// Nearest `parseLocationRange` on the object or its base chain.
fn chain_span(object: &Map<String, Value>) -> Option<Span> {
    let mut current = object;
    loop {
        if let Some(range) = current.get("parseLocationRange").and_then(Value::as_object) {
            if let (Some(start), Some(end)) = (
                offset_value(range.get("start")),
                offset_value(range.get("end")),
            ) {
                return Some(Span::new(start, end));
            }
        }
        current = current.get("parent").and_then(Value::as_object)?;
    }
}

/// Nearest `columnList` on the object or its base chain.
fn chain_columns(object: &Map<String, Value>) -> Vec<ResolvedColumn> {
    let mut current = object;
    loop {
        if let Some(list) = current.get("columnList").and_then(Value::as_array) {
            return list.iter().filter_map(decode_column).collect();
        }
        match current.get("parent").and_then(Value::as_object) {
            Some(parent) => current = parent,
            None => return Vec::new(),
        }
    }
}

/// Nearest catalog `function` name on the object or its base chain.
fn chain_function_name(object: &Map<String, Value>) -> Option<String> {
    let mut current = object;
    loop {
        if let Some(function) = current.get("function").and_then(Value::as_object) {
            if let Some(name) = string_field(function, "name") {
                return Some(name);
            }
        }
        current = current.get("parent").and_then(Value::as_object)?;
    }
}

fn decode_output_columns(object: &Map<String, Value>) -> Vec<OutputColumn> {
    let Some(list) = object.get("outputColumnList").and_then(Value::as_array) else {
        return Vec::new();
    };
    list.iter()
        .filter_map(|value| {
            let object = value.as_object()?;
            Some(OutputColumn {
                name: string_field(object, "name")?,
                column: object.get("column").and_then(decode_column),
            })
        })
        .collect()
}

fn decode_table_handle(object: &Map<String, Value>) -> Option<TableHandle> {
    let table = object.get("table")?.as_object()?;
    Some(TableHandle {
        name: string_field(table, "name"),
        full_name: string_field(table, "fullName"),
    })
}

fn decode_column(value: &Value) -> Option<ResolvedColumn> {
    let object = value.as_object()?;
    Some(ResolvedColumn {
        name: string_field(object, "name")?,
        table_name: string_field(object, "tableName").unwrap_or_default(),
        type_name: object
            .get("type")
            .and_then(|column_type| column_type.get("typeKind"))
            .and_then(type_kind_name),
    })
}

/// Friendly name for an analyzer type kind, which arrives either as an
/// enum name (`TYPE_INT64`) or as its numeric value.
fn type_kind_name(value: &Value) -> Option<String> {
    match value {
        Value::String(name) => Some(
            name.strip_prefix("TYPE_")
                .unwrap_or(name.as_str())
                .to_string(),
        ),
        Value::Number(number) => {
            let name = match number.as_u64()? {
                1 => "INT32",
                2 => "INT64",
                3 => "UINT32",
                4 => "UINT64",
                5 => "BOOL",
                6 => "FLOAT",
                7 => "DOUBLE",
                8 => "STRING",
                9 => "BYTES",
                10 => "DATE",
                19 => "TIMESTAMP",
                20 => "TIME",
                21 => "DATETIME",
                23 => "NUMERIC",
                24 => "BIGNUMERIC",
                _ => return None,
            };
            Some(name.to_string())
        }
        _ => None,
    }
}

/// A 64-bit byte offset: plain number or decimal string.
fn offset_value(value: Option<&Value>) -> Option<usize> {
    match value? {
        Value::Number(number) => number.as_u64().map(|offset| offset as usize),
        Value::String(text) => text.parse().ok(),
        _ => None,
    }
}

fn string_field(object: &Map<String, Value>, field: &str) -> Option<String> {
    object
        .get(field)
        .and_then(Value::as_str)
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn missing_statement_decodes_to_empty_response() {
        assert_eq!(
            AnalyzeResponse::from_value(&json!({})),
            AnalyzeResponse::empty()
        );
        assert_eq!(
            AnalyzeResponse::from_value(&json!({ "resolvedStatement": null })),
            AnalyzeResponse::empty()
        );
    }

    #[test]
    fn nested_variant_wrappers_unwrap_to_the_concrete_node() {
        let value = json!({
            "node": "resolvedScanBaseNode",
            "resolvedScanBaseNode": {
                "node": "resolvedTableScanNode",
                "resolvedTableScanNode": {
                    "parent": { "parent": { "parseLocationRange": { "start": 3, "end": 9 } } },
                    "table": { "name": "users", "fullName": "analytics.users" }
                }
            }
        });

        let node = decode_any(&value).expect("decodes");
        assert_eq!(node.kind(), NodeKind::TableScan);
        assert_eq!(node.span, Some(Span::new(3, 9)));
    }

    #[test]
    fn spans_accept_string_encoded_offsets() {
        let value = json!({
            "node": "resolvedProjectScanNode",
            "resolvedProjectScanNode": {
                "parent": { "parent": { "parseLocationRange": { "start": "120", "end": "185" } } }
            }
        });

        let node = decode_any(&value).expect("decodes");
        assert_eq!(node.span, Some(Span::new(120, 185)));
    }

    #[test]
    fn base_chain_columns_land_on_the_node() {
        let value = json!({
            "node": "resolvedTableScanNode",
            "resolvedTableScanNode": {
                "parent": {
                    "columnList": [
                        { "name": "id", "tableName": "users", "type": { "typeKind": "TYPE_INT64" } },
                        { "name": "email", "tableName": "users", "type": { "typeKind": 8 } }
                    ],
                    "parent": {}
                },
                "table": { "name": "users" }
            }
        });

        let node = decode_any(&value).expect("decodes");
        assert_eq!(node.columns.len(), 2);
        assert_eq!(node.columns[0].type_name.as_deref(), Some("INT64"));
        assert_eq!(node.columns[1].type_name.as_deref(), Some("STRING"));
    }

    #[test]
    fn unknown_kinds_keep_their_tag_and_children() {
        let value = json!({
            "node": "resolvedPivotScanNode",
            "resolvedPivotScanNode": {
                "parent": {},
                "inputScan": {
                    "node": "resolvedTableScanNode",
                    "resolvedTableScanNode": {
                        "parent": {},
                        "table": { "name": "users" }
                    }
                }
            }
        });

        let node = decode_any(&value).expect("decodes");
        assert_eq!(node.kind(), NodeKind::Unknown);
        assert_eq!(
            node.payload,
            NodePayload::Other {
                tag: Some("resolvedPivotScanNode".to_string())
            }
        );
        assert_eq!(node.children.len(), 1);
        assert_eq!(node.children[0].kind(), NodeKind::TableScan);
    }

    #[test]
    fn null_and_absent_slots_are_skipped() {
        let value = json!({
            "node": "resolvedProjectScanNode",
            "resolvedProjectScanNode": {
                "parent": {},
                "inputScan": null
            }
        });

        let node = decode_any(&value).expect("decodes");
        assert!(node.children.is_empty());
    }

    #[test]
    fn with_entries_are_recognized_without_a_discriminator() {
        let value = json!({
            "parent": {},
            "withQueryName": "active_users",
            "withSubquery": {
                "node": "resolvedProjectScanNode",
                "resolvedProjectScanNode": { "parent": {} }
            }
        });

        let node = decode_any(&value).expect("decodes");
        assert_eq!(node.kind(), NodeKind::WithEntry);
        assert_eq!(node.with_query_name(), Some("active_users"));
        assert_eq!(node.children.len(), 1);
    }
}
