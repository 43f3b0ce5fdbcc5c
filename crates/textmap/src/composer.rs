// Copyright (c) 2025 Templated SQL LSP Team
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Text Composition
//!
//! Ordered fragment assembly for generated text (snippet bodies,
//! diagnostic messages). Fragments keep their insertion order until
//! flattened, so composed output is reproducible in tests.

use std::collections::VecDeque;
use std::fmt;

/// An ordered sequence of text fragments.
///
/// Supports appending, prepending, symmetric wrapping, and conditional
/// variants of each; flattening concatenates the fragments in sequence
/// order.
#[derive(Debug, Default, Clone)]
pub struct TextComposer {
    fragments: VecDeque<String>,
}

impl TextComposer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a fragment at the end.
    pub fn append(&mut self, text: impl Into<String>) -> &mut Self {
        self.fragments.push_back(text.into());
        self
    }

    /// Add a fragment at the end when `condition` holds.
    pub fn append_if(&mut self, condition: bool, text: impl Into<String>) -> &mut Self {
        if condition {
            self.append(text);
        }
        self
    }

    /// Add a fragment at the front.
    pub fn prepend(&mut self, text: impl Into<String>) -> &mut Self {
        self.fragments.push_front(text.into());
        self
    }

    /// Add a fragment at the front when `condition` holds.
    pub fn prepend_if(&mut self, condition: bool, text: impl Into<String>) -> &mut Self {
        if condition {
            self.prepend(text);
        }
        self
    }

    /// Surround the current content with `text` on both sides.
    pub fn wrap(&mut self, text: &str) -> &mut Self {
        self.prepend(text);
        self.append(text);
        self
    }

    /// Surround the current content with `text` when `condition` holds.
    pub fn wrap_if(&mut self, condition: bool, text: &str) -> &mut Self {
        if condition {
            self.wrap(text);
        }
        self
    }

    /// Drop all fragments.
    pub fn clear(&mut self) {
        self.fragments.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    /// Flatten the fragments into a single string in sequence order.
    pub fn compose(&self) -> String {
        self.fragments.iter().map(String::as_str).collect()
    }
}

impl fmt::Display for TextComposer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for fragment in &self.fragments {
            f.write_str(fragment)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_preserves_order() {
        let mut composer = TextComposer::new();
        composer.append("select ").append("1").append(" as x");
        assert_eq!(composer.compose(), "select 1 as x");
    }

    #[test]
    fn prepend_and_wrap() {
        let mut composer = TextComposer::new();
        composer.append("ref('orders')").prepend("{{ ").append(" }}");
        assert_eq!(composer.compose(), "{{ ref('orders') }}");

        let mut quoted = TextComposer::new();
        quoted.append("orders").wrap("`");
        assert_eq!(quoted.compose(), "`orders`");
    }

    #[test]
    fn conditional_variants_are_no_ops_when_false() {
        let mut composer = TextComposer::new();
        composer
            .append("from orders")
            .append_if(false, " limit 10")
            .prepend_if(false, "explain ")
            .wrap_if(false, "(");
        assert_eq!(composer.compose(), "from orders");

        composer.append_if(true, " limit 10");
        assert_eq!(composer.compose(), "from orders limit 10");
    }

    #[test]
    fn clear_empties_the_sequence() {
        let mut composer = TextComposer::new();
        composer.append("stale");
        composer.clear();
        assert!(composer.is_empty());
        assert_eq!(composer.compose(), "");
    }
}
