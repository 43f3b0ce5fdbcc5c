// Copyright (c) 2025 Templated SQL LSP Team
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Node Kinds
//!
//! The node kinds the traversal layer distinguishes. The analyzer's
//! schema defines far more; every tag not listed here decodes to
//! [`NodeKind::Unknown`] and is traversed generically without any
//! kind-specific behavior.

use serde::{Deserialize, Serialize};

/// Discriminator for the node kinds with dedicated matching behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeKind {
    /// Top-level query statement with its output column list
    QueryStmt,

    /// Projection over an input scan
    ProjectScan,

    /// Read of a named table
    TableScan,

    /// Join of two scans
    JoinScan,

    /// UNION / INTERSECT / EXCEPT combination
    SetOperationScan,

    /// WITH clause scan holding CTE definitions
    WithScan,

    /// A single CTE definition inside a WITH scan
    WithEntry,

    /// Reference to a CTE defined earlier
    WithRefScan,

    /// Resolved call of a catalog function
    FunctionCall,

    /// Any node kind without dedicated behavior
    Unknown,
}

impl NodeKind {
    /// Map a wire discriminator tag to a kind.
    pub fn from_tag(tag: &str) -> NodeKind {
        match tag {
            "resolvedQueryStmtNode" => NodeKind::QueryStmt,
            "resolvedProjectScanNode" => NodeKind::ProjectScan,
            "resolvedTableScanNode" => NodeKind::TableScan,
            "resolvedJoinScanNode" => NodeKind::JoinScan,
            "resolvedSetOperationScanNode" => NodeKind::SetOperationScan,
            "resolvedWithScanNode" => NodeKind::WithScan,
            "resolvedWithRefScanNode" => NodeKind::WithRefScan,
            "resolvedFunctionCallNode" => NodeKind::FunctionCall,
            _ => NodeKind::Unknown,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_tags_resolve() {
        assert_eq!(
            NodeKind::from_tag("resolvedTableScanNode"),
            NodeKind::TableScan
        );
        assert_eq!(
            NodeKind::from_tag("resolvedWithScanNode"),
            NodeKind::WithScan
        );
    }

    #[test]
    fn unknown_tags_fall_back() {
        assert_eq!(
            NodeKind::from_tag("resolvedPivotScanNode"),
            NodeKind::Unknown
        );
    }
}
