// Copyright (c) 2025 Templated SQL LSP Team
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Templated SQL LSP - Language Server Protocol
//!
//! This crate provides the LSP server for templated analytics SQL.
//!
//! ## Overview
//!
//! The server keeps two texts per open model: the raw templated source
//! the user edits and the SQL it compiles to. Template compilation and
//! semantic SQL analysis are external collaborators behind trait seams
//! ([`TemplateCompiler`], [`SqlAnalyzer`]); everything position-shaped
//! that comes back from analysis is re-anchored onto the raw text through
//! the mapping layer before it reaches the editor.
//!
//! ## Architecture
//!
//! ```text
//! Client (VS Code, etc.)
//!        │ LSP Protocol
//!        ↓
//! LSP Backend (tower-lsp)
//!   ├── Document Store        raw rope + compiled text + analysis
//!   ├── Template Scanner      template regions, refs, edit overlap
//!   ├── Hover / Completion    resolved-AST queries at the cursor
//!   └── Diagnostics           analyzer errors re-anchored to raw text
//! ```
//!
//! ## Supported LSP Features
//!
//! - textDocument/didOpen / didChange / didClose
//! - textDocument/hover
//! - textDocument/completion
//! - Published diagnostics (analyzer errors, template errors, ref hints)

pub mod analyzer;
pub mod backend;
pub mod completion;
pub mod diagnostics;
pub mod document;
pub mod hover;
pub mod ident;
pub mod manifest;
pub mod profiles;
pub mod refs;
pub mod snippets;
pub mod template;

// Re-export commonly used types
pub use analyzer::{
    AnalyzerError, CompileError, DisabledAnalyzer, PassthroughCompiler, SqlAnalyzer,
    TemplateCompiler,
};
pub use backend::LspBackend;
pub use document::{DocumentError, DocumentStore, TemplatedDocument};
pub use manifest::ManifestModel;
