// Copyright (c) 2025 Templated SQL LSP Team
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # External Collaborator Seams
//!
//! The server does not compile templates or analyze SQL itself; both are
//! external services. These traits are the full contract with them: the
//! compiler turns raw templated source into SQL text, the analyzer turns
//! SQL text into a resolved-statement tree. Inputs arrive fully
//! materialized and results come back whole; retries, timeouts, and
//! transport live behind the implementations.
//!
//! The no-op implementations ([`PassthroughCompiler`],
//! [`DisabledAnalyzer`]) back the degraded mode used when no project or
//! analyzer endpoint is configured: documents still open and template
//! diagnostics still work, while analysis-backed features stay silent.

use async_trait::async_trait;
use templated_sql_lsp_resolved_ast::AnalyzeResponse;
use thiserror::Error;

/// Errors from the SQL analyzer collaborator.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AnalyzerError {
    /// The SQL was analyzed and rejected; the message carries the
    /// analyzer's diagnostic text, including its `[at line:column]`
    /// position suffix when one is known
    #[error("SQL analysis failed: {0}")]
    Analysis(String),

    /// The analyzer could not be reached
    #[error("Analyzer is not available: {0}")]
    Unavailable(String),
}

/// Errors from the template compiler collaborator.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CompileError {
    /// The template failed to compile; the message is the compiler's
    /// error output
    #[error("Template compilation failed: {0}")]
    Compilation(String),

    /// The compiler could not be reached
    #[error("Compiler is not available: {0}")]
    Unavailable(String),
}

/// Compiles raw templated source into SQL text.
#[async_trait]
pub trait TemplateCompiler: Send + Sync {
    async fn compile(&self, raw: &str) -> Result<String, CompileError>;
}

/// Analyzes SQL text into a resolved-statement tree.
#[async_trait]
pub trait SqlAnalyzer: Send + Sync {
    async fn analyze(&self, sql: &str) -> Result<AnalyzeResponse, AnalyzerError>;
}

/// Compiler for documents without a project: output equals input.
#[derive(Debug, Default)]
pub struct PassthroughCompiler;

#[async_trait]
impl TemplateCompiler for PassthroughCompiler {
    async fn compile(&self, raw: &str) -> Result<String, CompileError> {
        Ok(raw.to_string())
    }
}

/// Analyzer used when no analyzer endpoint is configured.
#[derive(Debug, Default)]
pub struct DisabledAnalyzer;

#[async_trait]
impl SqlAnalyzer for DisabledAnalyzer {
    async fn analyze(&self, _sql: &str) -> Result<AnalyzeResponse, AnalyzerError> {
        Err(AnalyzerError::Unavailable(
            "no analyzer endpoint configured".to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn passthrough_compiler_returns_its_input() {
        let compiler = PassthroughCompiler;
        let compiled = compiler.compile("select 1").await.unwrap();
        assert_eq!(compiled, "select 1");
    }

    #[tokio::test]
    async fn disabled_analyzer_reports_unavailability() {
        let analyzer = DisabledAnalyzer;
        let error = analyzer.analyze("select 1").await.unwrap_err();
        assert!(matches!(error, AnalyzerError::Unavailable(_)));
    }
}
