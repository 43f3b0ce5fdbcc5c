// Copyright (c) 2025 Templated SQL LSP Team
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Analyzer Response Builders
//!
//! Builders for resolved-statement trees in the analyzer's wire shape:
//! self-describing `{"node": "<tag>", "<tag>": {...}}` wrappers, base-class
//! `parent` chains carrying `parseLocationRange` and `columnList`, and
//! list-valued child slots. The shapes mirror what the semantic analyzer
//! service returns for the queries named on each builder.

use serde_json::{Map, Value, json};

/// Wrap a statement tree into a full analyzer response.
pub fn analyze_response(statement: Value) -> Value {
    json!({ "resolvedStatement": statement })
}

/// Self-describing wrapper: `{"node": tag, tag: node}`.
pub fn wrapped(tag: &str, node: Value) -> Value {
    let mut map = Map::new();
    map.insert("node".to_string(), Value::String(tag.to_string()));
    map.insert(tag.to_string(), node);
    Value::Object(map)
}

/// A resolved column reference: `(table, name, typeKind)`.
pub fn column(table: &str, name: &str, type_kind: &str) -> Value {
    json!({
        "tableName": table,
        "name": name,
        "type": { "typeKind": type_kind }
    })
}

/// Base-class chain for scan nodes: `columnList` on the scan base,
/// `parseLocationRange` one level further up.
pub fn scan_base(span: Option<(u64, u64)>, columns: &[(&str, &str, &str)]) -> Value {
    let column_list: Vec<Value> = columns
        .iter()
        .map(|(table, name, kind)| column(table, name, kind))
        .collect();
    let grandparent = match span {
        Some((start, end)) => json!({
            "parseLocationRange": { "start": start, "end": end }
        }),
        None => json!({}),
    };
    json!({
        "parent": grandparent,
        "columnList": column_list
    })
}

/// An output column of a query statement.
pub fn output_column(name: &str, column: Value) -> Value {
    json!({
        "parent": {},
        "name": name,
        "column": column
    })
}

/// A table scan over `full_name`, spanning `span` in the compiled SQL.
pub fn table_scan(
    span: (u64, u64),
    columns: &[(&str, &str, &str)],
    name: &str,
    full_name: &str,
    alias: &str,
) -> Value {
    wrapped(
        "resolvedTableScanNode",
        json!({
            "parent": scan_base(Some(span), columns),
            "table": { "name": name, "fullName": full_name },
            "alias": alias
        }),
    )
}

/// Statement for `select id, name from project.dataset.table1` where the
/// table reference spans bytes 14..41.
pub fn simple_select() -> Value {
    let columns = [
        ("table1", "id", "TYPE_INT64"),
        ("table1", "name", "TYPE_STRING"),
    ];
    wrapped(
        "resolvedQueryStmtNode",
        json!({
            "parent": { "parent": { "parseLocationRange": { "start": 0, "end": 41 } } },
            "outputColumnList": [
                output_column("id", column("table1", "id", "TYPE_INT64")),
                output_column("name", column("table1", "name", "TYPE_STRING")),
            ],
            "query": wrapped(
                "resolvedProjectScanNode",
                json!({
                    "parent": scan_base(Some((0, 41)), &columns),
                    "inputScan": table_scan(
                        (14, 41),
                        &columns,
                        "table1",
                        "project.dataset.table1",
                        ""
                    )
                })
            )
        }),
    )
}

/// The six table-reference spans used by [`union_six_branches`].
pub const UNION_BRANCH_SPANS: [(u64, u64); 6] = [
    (14, 59),
    (97, 142),
    (176, 221),
    (256, 301),
    (335, 380),
    (414, 459),
];

/// Statement for a six-branch UNION ALL; the branch scans carry no source
/// span of their own, only the set-operation scan and the table scans do.
pub fn union_six_branches() -> Value {
    let items: Vec<Value> = UNION_BRANCH_SPANS
        .iter()
        .enumerate()
        .map(|(index, span)| {
            let table = format!("events_{index}");
            let full_name = format!("project.dataset.events_{index}");
            let columns = [("events", "event_id", "TYPE_INT64")];
            json!({
                "parent": {},
                "scan": wrapped(
                    "resolvedProjectScanNode",
                    json!({
                        "parent": scan_base(None, &columns),
                        "inputScan": table_scan(*span, &columns, &table, &full_name, "")
                    })
                )
            })
        })
        .collect();

    wrapped(
        "resolvedQueryStmtNode",
        json!({
            "parent": { "parent": {} },
            "outputColumnList": [
                output_column("event_id", column("events", "event_id", "TYPE_INT64")),
            ],
            "query": wrapped(
                "resolvedSetOperationScanNode",
                json!({
                    "parent": scan_base(Some((0, 470)), &[("events", "event_id", "TYPE_INT64")]),
                    "opType": "UNION_ALL",
                    "inputItemList": items
                })
            )
        }),
    )
}

/// Statement for `with active_users as (select ...) select ... from
/// active_users`; the CTE name appears nowhere else in the tree.
pub fn with_cte_query() -> Value {
    let cte_columns = [
        ("users", "id", "TYPE_INT64"),
        ("users", "email", "TYPE_STRING"),
    ];
    wrapped(
        "resolvedQueryStmtNode",
        json!({
            "parent": { "parent": { "parseLocationRange": { "start": 0, "end": 131 } } },
            "outputColumnList": [
                output_column("id", column("users", "id", "TYPE_INT64")),
            ],
            "query": wrapped(
                "resolvedWithScanNode",
                json!({
                    "parent": scan_base(Some((0, 131)), &cte_columns),
                    "withEntryList": [
                        {
                            "parent": {},
                            "withQueryName": "active_users",
                            "withSubquery": wrapped(
                                "resolvedProjectScanNode",
                                json!({
                                    "parent": scan_base(Some((21, 78)), &cte_columns),
                                    "inputScan": table_scan(
                                        (42, 78),
                                        &cte_columns,
                                        "users",
                                        "analytics.users",
                                        ""
                                    )
                                })
                            )
                        }
                    ],
                    "query": wrapped(
                        "resolvedProjectScanNode",
                        json!({
                            "parent": scan_base(Some((80, 131)), &cte_columns),
                            "inputScan": wrapped(
                                "resolvedWithRefScanNode",
                                json!({
                                    "parent": scan_base(Some((95, 126)), &cte_columns),
                                    "withQueryName": "active_users"
                                })
                            )
                        })
                    )
                })
            )
        }),
    )
}

/// Statement for `select lower(name) from project.dataset.table1`.
pub fn function_call_query() -> Value {
    let columns = [("table1", "name", "TYPE_STRING")];
    wrapped(
        "resolvedQueryStmtNode",
        json!({
            "parent": { "parent": { "parseLocationRange": { "start": 0, "end": 46 } } },
            "outputColumnList": [
                output_column("lowered", column("$query", "lowered", "TYPE_STRING")),
            ],
            "query": wrapped(
                "resolvedProjectScanNode",
                json!({
                    "parent": scan_base(Some((0, 46)), &columns),
                    "exprList": [
                        {
                            "parent": {},
                            "column": column("$query", "lowered", "TYPE_STRING"),
                            "expr": wrapped(
                                "resolvedFunctionCallNode",
                                json!({
                                    "parent": {
                                        "parent": { "parent": {} },
                                        "function": { "name": "ZetaSQL:lower" }
                                    },
                                    "argumentList": [
                                        wrapped(
                                            "resolvedColumnRefNode",
                                            json!({
                                                "parent": { "parent": {} },
                                                "column": column("table1", "name", "TYPE_STRING")
                                            })
                                        )
                                    ]
                                })
                            )
                        }
                    ],
                    "inputScan": table_scan(
                        (19, 46),
                        &columns,
                        "table1",
                        "project.dataset.table1",
                        ""
                    )
                })
            )
        }),
    )
}

/// Statement for `select 1`: a project scan with no table underneath.
pub fn bare_project_scan() -> Value {
    wrapped(
        "resolvedQueryStmtNode",
        json!({
            "parent": { "parent": {} },
            "outputColumnList": [
                output_column("one", column("$query", "one", "TYPE_INT64")),
            ],
            "query": wrapped(
                "resolvedProjectScanNode",
                json!({
                    "parent": scan_base(Some((0, 8)), &[("$query", "one", "TYPE_INT64")]),
                    "exprList": []
                })
            )
        }),
    )
}
