// Copyright (c) 2025 Templated SQL LSP Team
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Templated SQL LSP - Resolved AST
//!
//! This crate models the resolved-statement tree the external SQL
//! semantic analyzer returns, and answers position/label queries over it.
//!
//! ## Overview
//!
//! The analyzer ships its result as a self-describing JSON tree: every
//! node names its own variant through a `node` discriminator, carries
//! base-class data (source span, column list) on a nested `parent` chain,
//! and holds children in named slots drawn from a fixed vocabulary.
//!
//! This crate decodes that wire shape once, into an explicit sum type
//! ([`NodePayload`]) with spans and column lists resolved onto each node,
//! so the traversal layer never probes for "which field is the real
//! node". The slot vocabulary is a schema contract with the analyzer and
//! lives in [`slots::CHILD_SLOTS`]; it needs updating when the analyzer
//! adds node kinds or slots.
//!
//! ## Queries
//!
//! - [`hover_info`]: what does the symbol with this label refer to —
//!   an output column, a table, a CTE, or a function?
//! - [`completion_info`]: which table-reference spans are active for a
//!   cursor offset, plus the tables/CTEs visible for suggestions.
//! - [`resolved_tables`]: every table reference with its schema and
//!   source span, for ref-rewrite support.
//!
//! All queries are total: a response without a resolved statement yields
//! empty results, and unknown node kinds are traversed generically and
//! otherwise ignored (forward compatibility with analyzer schema growth).

pub mod decode;
pub mod kind;
pub mod node;
pub mod slots;
pub mod span;
pub mod walker;

// Re-export commonly used types
pub use kind::NodeKind;
pub use node::{
    AnalyzeResponse, NodePayload, OutputColumn, ResolvedColumn, ResolvedNode, TableHandle,
};
pub use slots::{CHILD_SLOTS, ChildSlot, SlotArity};
pub use span::Span;
pub use walker::{
    ActiveTableInfo, ColumnInfo, CompletionInfo, HoverInfo, ResolvedTable, WithSubqueryInfo,
    completion_info, hover_info, resolved_tables,
};
