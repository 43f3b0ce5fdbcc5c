// Copyright (c) 2025 Templated SQL LSP Team
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # LSP Backend Implementation
//!
//! The tower-lsp backend wiring documents, collaborators, and providers
//! together.
//!
//! ## Refresh pipeline
//!
//! Every open or relevant change runs the same pipeline:
//!
//! 1. Compile the raw source through the [`TemplateCompiler`]. A compile
//!    error becomes a raw-document diagnostic and stops the pipeline.
//! 2. Analyze the compiled SQL through the [`SqlAnalyzer`]. An analysis
//!    error is re-anchored onto the raw document; a result is cached on
//!    the document and mined for ref hints.
//! 3. Publish the accumulated raw-document diagnostics.
//!
//! An unavailable analyzer is a degraded mode, not an error: documents
//! stay open and template diagnostics keep working.

use std::sync::Arc;

use tokio::sync::RwLock;
use tower_lsp::jsonrpc::Result;
use tower_lsp::lsp_types::*;
use tower_lsp::{Client, LanguageServer};
use tracing::{debug, info, warn};

use crate::analyzer::{
    AnalyzerError, CompileError, DisabledAnalyzer, PassthroughCompiler, SqlAnalyzer,
    TemplateCompiler,
};
use crate::completion::CompletionProvider;
use crate::diagnostics::DiagnosticGenerator;
use crate::document::DocumentStore;
use crate::hover::HoverProvider;
use crate::manifest::ManifestModel;
use crate::template;

/// LSP backend implementation
///
/// Main entry point for all LSP protocol operations.
pub struct LspBackend {
    /// LSP client for sending notifications and requests
    client: Client,

    /// Document store for managing open documents
    documents: Arc<DocumentStore>,

    /// Template compiler collaborator
    compiler: Arc<dyn TemplateCompiler>,

    /// SQL analyzer collaborator
    analyzer: Arc<dyn SqlAnalyzer>,

    /// Known project models, for ref hints
    models: Arc<RwLock<Vec<ManifestModel>>>,
}

impl LspBackend {
    /// Create a backend in degraded mode: documents compile to
    /// themselves and analysis-backed features stay silent.
    pub fn new(client: Client) -> Self {
        Self::with_collaborators(
            client,
            Arc::new(PassthroughCompiler),
            Arc::new(DisabledAnalyzer),
        )
    }

    /// Create a backend with real collaborators.
    pub fn with_collaborators(
        client: Client,
        compiler: Arc<dyn TemplateCompiler>,
        analyzer: Arc<dyn SqlAnalyzer>,
    ) -> Self {
        Self {
            client,
            documents: Arc::new(DocumentStore::new()),
            compiler,
            analyzer,
            models: Arc::new(RwLock::new(Vec::new())),
        }
    }

    pub fn documents(&self) -> &DocumentStore {
        &self.documents
    }

    /// Replace the known project models.
    pub async fn set_models(&self, models: Vec<ManifestModel>) {
        *self.models.write().await = models;
    }

    /// Compile, analyze, and publish diagnostics for one document.
    async fn refresh_document(&self, uri: Url) {
        let Some(document) = self.documents.get_document(&uri).await else {
            return;
        };
        let raw_text = document.raw_text();
        let mut diagnostics: Vec<Diagnostic> = Vec::new();

        // Documents without template syntax are their own compiled SQL,
        // and a compiled text kept current by edit replay is reused.
        let compiled = if let Some(compiled) = document.compiled_text() {
            compiled.to_string()
        } else if !template::has_template_markers(&raw_text) {
            raw_text.clone()
        } else {
            match self.compiler.compile(&raw_text).await {
                Ok(compiled) => compiled,
                Err(CompileError::Compilation(message)) => {
                    warn!(%uri, "template compilation failed");
                    diagnostics.extend(DiagnosticGenerator::template_error_diagnostics(&message));
                    self.client
                        .publish_diagnostics(uri, diagnostics, None)
                        .await;
                    return;
                }
                Err(CompileError::Unavailable(reason)) => {
                    debug!(%uri, %reason, "template compiler unavailable");
                    return;
                }
            }
        };

        if let Err(error) = self.documents.set_compiled(&uri, compiled.clone()).await {
            warn!(%uri, %error, "document closed during refresh");
            return;
        }

        match self.analyzer.analyze(&compiled).await {
            Ok(analysis) => {
                let models = self.models.read().await;
                diagnostics.extend(DiagnosticGenerator::ref_candidate_diagnostics(
                    &analysis, &raw_text, &compiled, &models,
                ));
                if let Err(error) = self.documents.set_analysis(&uri, analysis).await {
                    warn!(%uri, %error, "document closed during refresh");
                    return;
                }
            }
            Err(AnalyzerError::Analysis(message)) => {
                let result =
                    DiagnosticGenerator::sql_error_diagnostics(&message, &raw_text, &compiled);
                diagnostics.extend(result.raw);
            }
            Err(AnalyzerError::Unavailable(reason)) => {
                debug!(%uri, %reason, "analyzer unavailable");
            }
        }

        self.client
            .publish_diagnostics(uri, diagnostics, None)
            .await;
    }
}

#[tower_lsp::async_trait]
impl LanguageServer for LspBackend {
    async fn initialize(&self, params: InitializeParams) -> Result<InitializeResult> {
        info!("Initializing LSP server");
        info!("Client info: {:?}", params.client_info);

        Ok(InitializeResult {
            capabilities: ServerCapabilities {
                text_document_sync: Some(TextDocumentSyncCapability::Kind(
                    TextDocumentSyncKind::INCREMENTAL,
                )),

                completion_provider: Some(CompletionOptions {
                    resolve_provider: Some(false),
                    trigger_characters: Some(vec![
                        ".".to_string(),
                        "(".to_string(),
                        " ".to_string(),
                    ]),
                    work_done_progress_options: WorkDoneProgressOptions {
                        work_done_progress: Some(false),
                    },
                    all_commit_characters: None,
                    completion_item: None,
                }),

                hover_provider: Some(HoverProviderCapability::Simple(true)),

                ..Default::default()
            },
            server_info: Some(ServerInfo {
                name: "templated-sql-lsp".to_string(),
                version: Some(env!("CARGO_PKG_VERSION").to_string()),
            }),
        })
    }

    async fn initialized(&self, _params: InitializedParams) {
        info!("LSP server initialized successfully");
    }

    async fn shutdown(&self) -> Result<()> {
        info!("Shutting down LSP server");
        Ok(())
    }

    async fn did_open(&self, params: DidOpenTextDocumentParams) {
        let doc = params.text_document;
        info!(uri = %doc.uri, version = doc.version, "Document opened");

        self.documents
            .open_document(doc.uri.clone(), doc.text, doc.version, doc.language_id)
            .await;
        self.refresh_document(doc.uri).await;
    }

    async fn did_change(&self, params: DidChangeTextDocumentParams) {
        let uri = params.text_document.uri;
        let version = params.text_document.version;

        match self
            .documents
            .apply_changes(&uri, &params.content_changes, version)
            .await
        {
            Ok(edited) => {
                debug!(%uri, version, edits = edited.len(), "Document changed");
                self.refresh_document(uri).await;
            }
            Err(error) => {
                warn!(%uri, %error, "Failed to apply document changes");
            }
        }
    }

    async fn did_close(&self, params: DidCloseTextDocumentParams) {
        let uri = params.text_document.uri;
        info!(%uri, "Document closed");

        self.documents.close_document(&uri).await;
        self.client.publish_diagnostics(uri, Vec::new(), None).await;
    }

    async fn hover(&self, params: HoverParams) -> Result<Option<Hover>> {
        let uri = params.text_document_position_params.text_document.uri;
        let position = params.text_document_position_params.position;

        let Some(document) = self.documents.get_document(&uri).await else {
            return Ok(None);
        };

        Ok(HoverProvider::hover(
            &document.raw_text(),
            document.analysis().as_deref(),
            position,
        ))
    }

    async fn completion(&self, params: CompletionParams) -> Result<Option<CompletionResponse>> {
        let uri = params.text_document_position.text_document.uri;
        let position = params.text_document_position.position;

        let Some(document) = self.documents.get_document(&uri).await else {
            return Ok(None);
        };

        let items = CompletionProvider::completions(
            &document.raw_text(),
            document.compiled_text(),
            document.analysis().as_deref(),
            position,
        );

        if items.is_empty() {
            Ok(None)
        } else {
            Ok(Some(CompletionResponse::Array(items)))
        }
    }
}
