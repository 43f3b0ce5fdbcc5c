// Copyright (c) 2025 Templated SQL LSP Team
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Templated SQL LSP - Text Correspondence
//!
//! This crate maps positions between the two texts every templated model
//! has: the raw source the user edits and the compiled SQL the template
//! engine produces from it.
//!
//! ## Overview
//!
//! Analysis (diagnostics, hover targets, completion scopes) runs against
//! the compiled SQL, but everything shown to the user must land on the raw
//! source. The mapping layer answers that translation:
//!
//! - **Line mapping**: which raw line corresponds to line N of the
//!   compiled text ([`old_line_number`]) and the reverse direction
//!   ([`new_line_number`]).
//! - **Character mapping**: the same question within a single line pair
//!   ([`old_character`], [`new_character`]).
//! - **Position conversion**: full `{line, character}` translation over a
//!   text pair ([`PositionConverter`]).
//! - **Text composition**: ordered fragment assembly for generated
//!   snippet/message text ([`TextComposer`]).
//!
//! ## Design
//!
//! The diff itself is an external primitive (the [`similar`] crate); this
//! crate owns only the replay of the resulting run-length segments. The
//! replay is exposed over plain [`DiffSegment`] slices
//! ([`map_line_to_old`], [`map_line_to_new`]) so the boundary rules can be
//! tested without computing a diff.
//!
//! All functions here are pure: no I/O, no shared state, deterministic
//! output for a given input pair.

pub mod char_map;
pub mod composer;
pub mod error;
pub mod line_map;
pub mod position;
pub mod segment;

// Re-export commonly used types
pub use char_map::{new_character, old_character};
pub use composer::TextComposer;
pub use error::{TextMapError, TextMapResult};
pub use line_map::{map_line_to_new, map_line_to_old, new_line_number, old_line_number};
pub use position::{PositionConverter, TextPosition};
pub use segment::{DiffSegment, SegmentKind, char_segments, line_segments};
