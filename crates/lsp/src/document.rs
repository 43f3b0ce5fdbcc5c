// Copyright (c) 2025 Templated SQL LSP Team
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Document Management
//!
//! Tracks every open templated document: the raw source as a rope (for
//! cheap incremental edits), the compiled SQL the template compiler last
//! produced for it, and the analyzer response for that compiled SQL.
//!
//! Compiled text and analysis are invalidated together on every raw
//! change; the backend decides when to refresh them. Template regions are
//! re-scanned on each change so the backend can tell template edits from
//! plain SQL edits.

use std::collections::HashMap;
use std::ops::Range;
use std::sync::Arc;

use ropey::Rope;
use thiserror::Error;
use tokio::sync::RwLock;
use tower_lsp::lsp_types::{TextDocumentContentChangeEvent, Url};

use templated_sql_lsp_resolved_ast::AnalyzeResponse;
use templated_sql_lsp_textmap::{PositionConverter, TextPosition};

use crate::template::{self, TemplateRegion};

/// Character offset of a position in `text`, or `None` past its end.
fn char_offset(text: &str, position: TextPosition) -> Option<usize> {
    let mut offset = 0usize;
    for (index, line) in text.split('\n').enumerate() {
        if index == position.line {
            let length = line.chars().count();
            if position.character > length {
                return None;
            }
            return Some(offset + position.character);
        }
        offset += line.chars().count() + 1;
    }
    None
}

/// Errors that can occur during document operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DocumentError {
    /// A change range does not exist in the document
    #[error("Invalid change range {start:?}..{end:?}")]
    InvalidRange {
        start: (usize, usize),
        end: (usize, usize),
    },

    /// The document is not open
    #[error("Document not open: {0}")]
    NotFound(Url),
}

/// An open templated document.
#[derive(Debug, Clone)]
pub struct TemplatedDocument {
    uri: Url,
    language_id: String,
    version: i32,
    raw: Rope,

    /// Compiled SQL for the current raw content, when up to date
    compiled: Option<String>,

    /// Analyzer response for the compiled SQL, when up to date
    analysis: Option<Arc<AnalyzeResponse>>,

    /// Template regions of the raw text; `None` when the template layer
    /// is unbalanced and cannot be tracked
    template_regions: Option<Vec<TemplateRegion>>,
}

impl TemplatedDocument {
    pub fn new(uri: Url, content: String, version: i32, language_id: String) -> Self {
        let template_regions = template::find_regions(&content);
        Self {
            uri,
            language_id,
            version,
            raw: Rope::from_str(&content),
            compiled: None,
            analysis: None,
            template_regions,
        }
    }

    pub fn uri(&self) -> &Url {
        &self.uri
    }

    pub fn language_id(&self) -> &str {
        &self.language_id
    }

    pub fn version(&self) -> i32 {
        self.version
    }

    /// The raw templated source.
    pub fn raw_text(&self) -> String {
        self.raw.to_string()
    }

    /// The compiled SQL, when a compile has completed for this content.
    pub fn compiled_text(&self) -> Option<&str> {
        self.compiled.as_deref()
    }

    pub fn analysis(&self) -> Option<Arc<AnalyzeResponse>> {
        self.analysis.clone()
    }

    pub fn template_regions(&self) -> Option<&[TemplateRegion]> {
        self.template_regions.as_deref()
    }

    pub fn set_compiled(&mut self, compiled: String) {
        self.compiled = Some(compiled);
    }

    pub fn set_analysis(&mut self, analysis: AnalyzeResponse) {
        self.analysis = Some(Arc::new(analysis));
    }

    /// Apply LSP content changes and return the byte ranges the edits
    /// touched (in pre-change coordinates, for template-overlap checks).
    ///
    /// Edits that stay clear of every template region are replayed onto
    /// the compiled text, so plain SQL typing keeps the compiled side
    /// current without a template recompile. Edits touching a template
    /// region (or arriving while regions are untracked) drop the
    /// compiled text instead. Analysis is invalidated either way.
    pub fn apply_changes(
        &mut self,
        changes: &[TextDocumentContentChangeEvent],
        new_version: i32,
    ) -> Result<Vec<Range<usize>>, DocumentError> {
        let mut edited = Vec::with_capacity(changes.len());

        for change in changes {
            match &change.range {
                Some(range) => {
                    let start_line = range.start.line as usize;
                    let start_col = range.start.character as usize;
                    let end_line = range.end.line as usize;
                    let end_col = range.end.character as usize;

                    if start_line >= self.raw.len_lines() || end_line >= self.raw.len_lines() {
                        return Err(DocumentError::InvalidRange {
                            start: (start_line, start_col),
                            end: (end_line, end_col),
                        });
                    }

                    let start_char = self.raw.line_to_char(start_line) + start_col;
                    let end_char = self.raw.line_to_char(end_line) + end_col;
                    if start_char > end_char || end_char > self.raw.len_chars() {
                        return Err(DocumentError::InvalidRange {
                            start: (start_line, start_col),
                            end: (end_line, end_col),
                        });
                    }

                    let byte_span =
                        self.raw.char_to_byte(start_char)..self.raw.char_to_byte(end_char);
                    self.replay_change_on_compiled(
                        &byte_span,
                        TextPosition::new(start_line, start_col),
                        TextPosition::new(end_line, end_col),
                        &change.text,
                    );
                    edited.push(byte_span);

                    self.raw.remove(start_char..end_char);
                    self.raw.insert(start_char, &change.text);
                }
                None => {
                    // Full document replacement
                    edited.push(0..self.raw.len_bytes());
                    self.compiled = None;
                    self.raw = Rope::from_str(&change.text);
                }
            }
        }

        self.version = new_version;
        self.analysis = None;
        self.template_regions = template::find_regions(&self.raw_text());

        Ok(edited)
    }

    /// Mirror an edit onto the compiled text when it cannot change the
    /// template's output shape; otherwise drop the compiled text.
    fn replay_change_on_compiled(
        &mut self,
        byte_span: &Range<usize>,
        start: TextPosition,
        end: TextPosition,
        new_text: &str,
    ) {
        let Some(compiled) = self.compiled.as_ref() else {
            return;
        };
        let Some(regions) = self.template_regions.as_deref() else {
            self.compiled = None;
            return;
        };
        if template::is_template_modified(regions, std::slice::from_ref(byte_span)) {
            self.compiled = None;
            return;
        }

        let raw_before = self.raw.to_string();
        let converter = PositionConverter::new(&raw_before, compiled);
        let (Ok(compiled_start), Ok(compiled_end)) =
            (converter.convert_forward(start), converter.convert_forward(end))
        else {
            self.compiled = None;
            return;
        };
        let (Some(start_offset), Some(end_offset)) = (
            char_offset(compiled, compiled_start),
            char_offset(compiled, compiled_end),
        ) else {
            self.compiled = None;
            return;
        };
        if start_offset > end_offset {
            self.compiled = None;
            return;
        }

        let mut updated: String = compiled.chars().take(start_offset).collect();
        updated.push_str(new_text);
        updated.extend(compiled.chars().skip(end_offset));
        self.compiled = Some(updated);
    }
}

/// Store of open documents, keyed by URI.
#[derive(Debug, Default)]
pub struct DocumentStore {
    documents: RwLock<HashMap<Url, TemplatedDocument>>,
}

impl DocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn open_document(
        &self,
        uri: Url,
        content: String,
        version: i32,
        language_id: String,
    ) {
        let document = TemplatedDocument::new(uri.clone(), content, version, language_id);
        self.documents.write().await.insert(uri, document);
    }

    pub async fn close_document(&self, uri: &Url) -> Option<TemplatedDocument> {
        self.documents.write().await.remove(uri)
    }

    pub async fn get_document(&self, uri: &Url) -> Option<TemplatedDocument> {
        self.documents.read().await.get(uri).cloned()
    }

    pub async fn apply_changes(
        &self,
        uri: &Url,
        changes: &[TextDocumentContentChangeEvent],
        new_version: i32,
    ) -> Result<Vec<Range<usize>>, DocumentError> {
        let mut documents = self.documents.write().await;
        let document = documents
            .get_mut(uri)
            .ok_or_else(|| DocumentError::NotFound(uri.clone()))?;
        document.apply_changes(changes, new_version)
    }

    pub async fn set_compiled(&self, uri: &Url, compiled: String) -> Result<(), DocumentError> {
        let mut documents = self.documents.write().await;
        let document = documents
            .get_mut(uri)
            .ok_or_else(|| DocumentError::NotFound(uri.clone()))?;
        document.set_compiled(compiled);
        Ok(())
    }

    pub async fn set_analysis(
        &self,
        uri: &Url,
        analysis: AnalyzeResponse,
    ) -> Result<(), DocumentError> {
        let mut documents = self.documents.write().await;
        let document = documents
            .get_mut(uri)
            .ok_or_else(|| DocumentError::NotFound(uri.clone()))?;
        document.set_analysis(analysis);
        Ok(())
    }

    pub async fn open_count(&self) -> usize {
        self.documents.read().await.len()
    }
}
