// Copyright (c) 2025 Templated SQL LSP Team
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Resolved Node Model
//!
//! The decoded form of the analyzer's resolved-statement tree.
//!
//! ## Design
//!
//! The wire format encodes each node's variant as a string discriminator
//! next to a field of the same name, and spreads base-class data over a
//! nested `parent` chain. Decoding flattens all of that:
//!
//! - the variant becomes an explicit sum type, [`NodePayload`], holding
//!   only the data its kind needs;
//! - the nearest source span and column list from the base chain land
//!   directly on the node;
//! - children from every slot (own and base-class) land in a single
//!   ordered `children` list.
//!
//! The tree is immutable after decoding: the traversal layer only reads.

use serde::{Deserialize, Serialize};

use crate::kind::NodeKind;
use crate::span::Span;

/// A complete analyzer response.
///
/// `resolved_statement` is absent when the analyzed document had no
/// resolvable statement (for example, while the user is mid-edit); every
/// query over such a response returns an empty result.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalyzeResponse {
    pub resolved_statement: Option<ResolvedNode>,
}

impl AnalyzeResponse {
    pub fn empty() -> Self {
        Self::default()
    }
}

/// A node of the resolved-statement tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedNode {
    /// Kind-specific data
    pub payload: NodePayload,

    /// Nearest source span from the node's base chain, if any
    pub span: Option<Span>,

    /// Output columns of the node's scan base, empty for non-scans
    pub columns: Vec<ResolvedColumn>,

    /// Child nodes from all slots, in slot-vocabulary order
    pub children: Vec<ResolvedNode>,
}

impl ResolvedNode {
    pub fn kind(&self) -> NodeKind {
        match &self.payload {
            NodePayload::QueryStmt { .. } => NodeKind::QueryStmt,
            NodePayload::ProjectScan => NodeKind::ProjectScan,
            NodePayload::TableScan { .. } => NodeKind::TableScan,
            NodePayload::JoinScan => NodeKind::JoinScan,
            NodePayload::SetOperationScan { .. } => NodeKind::SetOperationScan,
            NodePayload::WithScan => NodeKind::WithScan,
            NodePayload::WithEntry { .. } => NodeKind::WithEntry,
            NodePayload::WithRefScan { .. } => NodeKind::WithRefScan,
            NodePayload::FunctionCall { .. } => NodeKind::FunctionCall,
            NodePayload::Other { .. } => NodeKind::Unknown,
        }
    }

    /// The CTE name this node defines or references, if any.
    pub fn with_query_name(&self) -> Option<&str> {
        match &self.payload {
            NodePayload::WithEntry { name } | NodePayload::WithRefScan { name } => Some(name),
            _ => None,
        }
    }
}

/// Kind-specific node data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum NodePayload {
    /// Top-level query statement
    QueryStmt { output_columns: Vec<OutputColumn> },

    /// Projection over an input scan
    ProjectScan,

    /// Read of a named table
    TableScan {
        table: Option<TableHandle>,
        alias: Option<String>,
    },

    /// Join of two scans
    JoinScan,

    /// UNION / INTERSECT / EXCEPT combination
    SetOperationScan { op_type: Option<String> },

    /// WITH clause scan
    WithScan,

    /// A CTE definition
    WithEntry { name: String },

    /// A CTE reference
    WithRefScan { name: String },

    /// Resolved function call; `function` is the catalog name including
    /// its namespace prefix (for example `ZetaSQL:lower`)
    FunctionCall { function: Option<String> },

    /// Node kind without dedicated behavior; `tag` keeps the wire
    /// discriminator when one was present
    Other { tag: Option<String> },
}

/// Catalog identity of a scanned table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableHandle {
    pub name: Option<String>,
    pub full_name: Option<String>,
}

impl TableHandle {
    /// The preferred display name: fully qualified when known.
    pub fn resolved_name(&self) -> Option<&str> {
        self.full_name
            .as_deref()
            .filter(|name| !name.is_empty())
            .or(self.name.as_deref().filter(|name| !name.is_empty()))
    }
}

/// A column as resolved by the analyzer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedColumn {
    pub name: String,

    /// Source table of the column; the analyzer uses `$query` for
    /// columns synthesized by the query itself
    pub table_name: String,

    /// Friendly type name, when the analyzer's type kind is known
    pub type_name: Option<String>,
}

/// An output column of a query statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputColumn {
    /// Name the column is exposed under (alias when aliased)
    pub name: String,

    /// The resolved column feeding the output
    pub column: Option<ResolvedColumn>,
}
