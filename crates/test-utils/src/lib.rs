// Copyright (c) 2025 Templated SQL LSP Team
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Templated SQL LSP - Test Utilities
//!
//! Shared fixtures for the workspace's tests:
//!
//! - [`fixtures`]: raw/compiled text pairs covering the template
//!   expansions the line mapper has to survive (config headers, inline
//!   refs, loop expansions, trailing template comments).
//! - [`analyzer`]: builders for analyzer-response JSON trees in the wire
//!   shape the resolved-AST decoder consumes.

pub mod analyzer;
pub mod fixtures;
