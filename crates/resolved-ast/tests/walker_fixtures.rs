// Copyright (c) 2025 Templated SQL LSP Team
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Walker behavior over analyzer-response fixtures in the wire shape the
//! semantic analyzer produces.

use templated_sql_lsp_resolved_ast::{
    AnalyzeResponse, Span, completion_info, hover_info, resolved_tables,
};
use templated_sql_lsp_test_utils::analyzer;

fn decode(statement: serde_json::Value) -> AnalyzeResponse {
    AnalyzeResponse::from_value(&analyzer::analyze_response(statement))
}

#[test]
fn hover_matches_an_output_column() {
    let response = decode(analyzer::simple_select());

    let info = hover_info(&response, "id");
    let output_column = info.output_column.expect("output column matched");
    assert_eq!(output_column.name, "id");
    let resolved = output_column.column.expect("column resolved");
    assert_eq!(resolved.table_name, "table1");
    assert_eq!(resolved.type_name.as_deref(), Some("INT64"));
    assert!(info.with_query_name.is_none());
    assert!(!info.is_function);
}

#[test]
fn hover_matches_a_table_by_full_name() {
    let response = decode(analyzer::simple_select());

    let info = hover_info(&response, "project.dataset.table1");
    assert_eq!(info.table_name.as_deref(), Some("project.dataset.table1"));
    assert!(info.output_column.is_none());
}

#[test]
fn hover_distinguishes_a_table_qualifier_from_a_column() {
    // The label names no output column, but it qualifies one of them; no
    // table scan carries the name either.
    let statement = analyzer::wrapped(
        "resolvedQueryStmtNode",
        serde_json::json!({
            "parent": { "parent": {} },
            "outputColumnList": [
                analyzer::output_column(
                    "order_id",
                    analyzer::column("src_orders", "order_id", "TYPE_INT64"),
                ),
            ],
            "query": analyzer::wrapped(
                "resolvedProjectScanNode",
                serde_json::json!({
                    "parent": analyzer::scan_base(
                        Some((0, 40)),
                        &[("src_orders", "order_id", "TYPE_INT64")]
                    ),
                    "inputScan": analyzer::table_scan(
                        (20, 40),
                        &[("src_orders", "order_id", "TYPE_INT64")],
                        "orders_v2",
                        "prod.analytics.orders_v2",
                        ""
                    )
                })
            )
        }),
    );
    let response = decode(statement);

    let info = hover_info(&response, "src_orders");
    assert_eq!(info.table_name.as_deref(), Some("src_orders"));
    assert!(info.output_column.is_none());
}

#[test]
fn hover_matches_a_cte_name_and_nothing_else() {
    let response = decode(analyzer::with_cte_query());

    let info = hover_info(&response, "active_users");
    assert_eq!(info.with_query_name.as_deref(), Some("active_users"));
    assert!(info.output_column.is_none());
    assert!(info.table_name.is_none());
    assert!(!info.is_function);
}

#[test]
fn hover_matches_a_catalog_function_without_its_namespace() {
    let response = decode(analyzer::function_call_query());

    let info = hover_info(&response, "lower");
    assert!(info.is_function);
    assert!(info.table_name.is_none());
}

#[test]
fn hover_misses_yield_an_empty_result() {
    let response = decode(analyzer::simple_select());
    assert!(hover_info(&response, "no_such_symbol").is_empty());
}

#[test]
fn completion_returns_the_single_table_range_from_anywhere_in_scope() {
    let response = decode(analyzer::simple_select());

    for offset in [0, 8, 41] {
        let info = completion_info(&response, offset);
        assert_eq!(
            info.active_table_ranges,
            Some(vec![Span::new(14, 41)]),
            "offset {offset}"
        );
    }
}

#[test]
fn completion_reports_active_tables_only_outside_their_own_span() {
    let response = decode(analyzer::simple_select());

    // Cursor in the SELECT list: the table itself is suggestible.
    let info = completion_info(&response, 8);
    assert_eq!(info.active_tables.len(), 1);
    let table = &info.active_tables[0];
    assert_eq!(table.name, "table1");
    assert_eq!(table.alias, None);
    assert_eq!(table.name_span, Some(Span::new(14, 41)));
    assert_eq!(table.columns.len(), 2);

    // Cursor inside the table reference: no self-suggestion.
    let info = completion_info(&response, 20);
    assert!(info.active_tables.is_empty());
}

#[test]
fn completion_returns_all_branch_ranges_of_a_set_operation() {
    let response = decode(analyzer::union_six_branches());
    let expected: Vec<Span> = analyzer::UNION_BRANCH_SPANS
        .iter()
        .map(|&(start, end)| Span::new(start as usize, end as usize))
        .collect();

    // Inside the second branch's SELECT list.
    let info = completion_info(&response, 100);
    assert_eq!(info.active_table_ranges, Some(expected.clone()));

    // Directly on a connecting keyword between branches.
    let info = completion_info(&response, 150);
    assert_eq!(info.active_table_ranges, Some(expected.clone()));

    // Inside the fifth branch.
    let info = completion_info(&response, 340);
    assert_eq!(info.active_table_ranges, Some(expected));
}

#[test]
fn completion_collects_resolved_tables_across_branches() {
    let response = decode(analyzer::union_six_branches());

    let info = completion_info(&response, 100);
    assert_eq!(info.resolved_tables.len(), 6);
    assert_eq!(
        info.resolved_tables["project.dataset.events_0"],
        vec!["event_id".to_string()]
    );
}

#[test]
fn completion_resolves_cte_names_and_columns() {
    let response = decode(analyzer::with_cte_query());

    let info = completion_info(&response, 50);
    assert!(info.with_names.contains("active_users"));

    let subquery = &info.with_subqueries["active_users"];
    assert_eq!(subquery.span, Some(Span::new(21, 78)));
    let column_names: Vec<&str> = subquery
        .columns
        .iter()
        .map(|column| column.name.as_str())
        .collect();
    assert_eq!(column_names, vec!["id", "email"]);

    let main_query = info.main_query.as_ref().expect("main query recorded");
    assert_eq!(main_query.span, Some(Span::new(80, 131)));
}

#[test]
fn completion_inside_a_cte_scopes_to_its_own_table() {
    let response = decode(analyzer::with_cte_query());

    let info = completion_info(&response, 50);
    assert_eq!(info.active_table_ranges, Some(vec![Span::new(42, 78)]));
}

#[test]
fn completion_over_a_tableless_projection_is_resolved_but_empty() {
    let response = decode(analyzer::bare_project_scan());

    let info = completion_info(&response, 5);
    assert_eq!(info.active_table_ranges, Some(Vec::new()));
}

#[test]
fn completion_outside_every_scope_stays_unresolved() {
    let response = decode(analyzer::simple_select());

    let info = completion_info(&response, 400);
    assert_eq!(info.active_table_ranges, None);
}

#[test]
fn resolved_tables_extract_schema_from_the_reference_text() {
    let sql = "select payment_id from analytics.jaffle_shop.stg_payments";
    let columns = [("stg_payments", "payment_id", "TYPE_INT64")];
    let statement = analyzer::wrapped(
        "resolvedQueryStmtNode",
        serde_json::json!({
            "parent": { "parent": { "parseLocationRange": { "start": 0, "end": 57 } } },
            "outputColumnList": [
                analyzer::output_column(
                    "payment_id",
                    analyzer::column("stg_payments", "payment_id", "TYPE_INT64"),
                ),
            ],
            "query": analyzer::wrapped(
                "resolvedProjectScanNode",
                serde_json::json!({
                    "parent": analyzer::scan_base(Some((0, 57)), &columns),
                    "inputScan": analyzer::table_scan(
                        (23, 57),
                        &columns,
                        "stg_payments",
                        "analytics.jaffle_shop.stg_payments",
                        ""
                    )
                })
            )
        }),
    );

    let tables = resolved_tables(&decode(statement), sql);
    assert_eq!(tables.len(), 1);
    assert_eq!(tables[0].schema, "jaffle_shop");
    assert_eq!(tables[0].name, "stg_payments");
    assert_eq!(tables[0].location, Span::new(23, 57));
}

#[test]
fn malformed_responses_yield_empty_results() {
    let response = AnalyzeResponse::from_value(&serde_json::json!({ "status": "error" }));

    assert!(hover_info(&response, "id").is_empty());
    assert_eq!(completion_info(&response, 0), Default::default());
    assert!(resolved_tables(&response, "select 1").is_empty());
}
