// Copyright (c) 2025 Templated SQL LSP Team
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Error types for text mapping

use thiserror::Error;

/// Result type alias for text mapping operations
pub type TextMapResult<T> = Result<T, TextMapError>;

/// Errors that can occur while converting positions between texts
///
/// The mapping functions themselves are total; only whole-position
/// conversion can fail, and only when the caller hands in a line that does
/// not exist in the source text.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TextMapError {
    /// The requested line does not exist in the text
    #[error("Line {line} is out of range for a text with {line_count} lines")]
    LineOutOfRange { line: usize, line_count: usize },
}
