// Copyright (c) 2025 Templated SQL LSP Team
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Template Region Scanning
//!
//! Finds the template layer inside a raw model: expressions (`{{ }}`),
//! statements (`{% %}`), comments (`{# #}`), and the paired block
//! constructs (`for`/`if`/`macro`/`docs` with their `end*` closers) that
//! span whole regions of the file.
//!
//! The scanner exists so the server knows when an edit can invalidate the
//! compiled SQL: an edit overlapping any template region forces a
//! recompile, edits in plain SQL do not change the template's output
//! shape.

use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;

static TEMPLATE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{[\s\S]*?\}\}|\{%[\s\S]*?%\}|\{#[\s\S]*?#\}").expect("static pattern compiles")
});

static BLOCK_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{%\s*(docs|if|for|macro)\s[\s\S]*?%\}|\{%\s*(enddocs|endif|endfor|endmacro)\s*%\}")
        .expect("static pattern compiles")
});

static REF_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\{\{\s*ref\s*\(\s*['"]([^'"]+)['"]\s*\)\s*\}\}"#).expect("static pattern compiles")
});

/// Block constructs and their closers, in matching pairs.
const BLOCK_PAIRS: [(&str, &str); 4] = [
    ("docs", "enddocs"),
    ("if", "endif"),
    ("for", "endfor"),
    ("macro", "endmacro"),
];

/// A template region as a byte range of the raw text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateRegion {
    pub span: Range<usize>,
}

/// A `ref('model')` expression in the raw text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateRef {
    pub model_name: String,
    pub span: Range<usize>,
}

/// Find every template region, including the full extent of paired
/// blocks. Returns `None` when a block closer has no matching opener;
/// such a document cannot be tracked reliably and must be recompiled on
/// every change.
pub fn find_regions(text: &str) -> Option<Vec<TemplateRegion>> {
    let mut regions = Vec::new();
    let mut open_blocks: Vec<(&str, usize)> = Vec::new();

    for found in TEMPLATE_PATTERN.find_iter(text) {
        regions.push(TemplateRegion {
            span: found.range(),
        });

        let Some(captures) = BLOCK_PATTERN.captures(found.as_str()) else {
            continue;
        };

        if let Some(opener) = captures.get(1) {
            open_blocks.push((block_pair(opener.as_str())?.0, found.start()));
        } else if let Some(closer) = captures.get(2) {
            let opener_keyword = block_pair(closer.as_str())?.0;
            let last_open = open_blocks
                .iter()
                .rposition(|(keyword, _)| *keyword == opener_keyword)?;
            let (_, block_start) = open_blocks.remove(last_open);
            regions.push(TemplateRegion {
                span: block_start..found.end(),
            });
        }
    }

    Some(regions)
}

/// Find every `ref(...)` expression with the referenced model name.
pub fn find_refs(text: &str) -> Vec<TemplateRef> {
    REF_PATTERN
        .captures_iter(text)
        .map(|captures| TemplateRef {
            model_name: captures[1].to_string(),
            span: captures.get(0).expect("whole match exists").range(),
        })
        .collect()
}

/// Cheap pre-check: can this text contain template syntax at all?
pub fn has_template_markers(text: &str) -> bool {
    text.contains('{') || text.contains('}')
}

/// Whether any edited byte range touches a template region.
pub fn is_template_modified(regions: &[TemplateRegion], edited: &[Range<usize>]) -> bool {
    edited.iter().any(|edit| {
        regions
            .iter()
            .any(|region| spans_overlap(&region.span, edit))
    })
}

fn spans_overlap(a: &Range<usize>, b: &Range<usize>) -> bool {
    a.start <= b.end && b.start <= a.end
}

/// The (opener, closer) pair a block keyword belongs to.
fn block_pair(keyword: &str) -> Option<(&'static str, &'static str)> {
    BLOCK_PAIRS
        .iter()
        .copied()
        .find(|(opener, closer)| *opener == keyword || *closer == keyword)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_expressions_statements_and_comments() {
        let text = "select {{ ref('a') }} from x {% if b %}y{% endif %} {# note #}";
        let regions = find_regions(text).expect("balanced blocks");

        // Four inline regions plus the paired if-block region.
        assert_eq!(regions.len(), 5);
        assert_eq!(&text[regions[0].span.clone()], "{{ ref('a') }}");
        assert_eq!(
            &text[regions.last().unwrap().span.clone()],
            "{# note #}"
        );
    }

    #[test]
    fn pairs_block_openers_with_their_closers() {
        let text = "{% for m in methods %}\nsum({{ m }}),\n{% endfor %}\n";
        let regions = find_regions(text).expect("balanced blocks");

        let block = regions
            .iter()
            .find(|region| region.span.start == 0 && region.span.end == text.len() - 1)
            .expect("block region covers opener through closer");
        assert!(text[block.span.clone()].starts_with("{% for"));
        assert!(text[block.span.clone()].ends_with("{% endfor %}"));
    }

    #[test]
    fn unmatched_closer_gives_up() {
        assert!(find_regions("select 1 {% endfor %}").is_none());
    }

    #[test]
    fn finds_refs_with_either_quote_style() {
        let text = "from {{ ref('stg_orders') }} join {{ ref(\"stg_payments\") }}";
        let refs = find_refs(text);
        assert_eq!(refs.len(), 2);
        assert_eq!(refs[0].model_name, "stg_orders");
        assert_eq!(refs[1].model_name, "stg_payments");
        assert_eq!(&text[refs[0].span.clone()], "{{ ref('stg_orders') }}");
    }

    #[test]
    fn template_marker_precheck() {
        assert!(has_template_markers("select {{ x }}"));
        assert!(has_template_markers("stray } brace"));
        assert!(!has_template_markers("select 1 from t"));
    }

    #[test]
    fn edit_overlap_detection() {
        let regions = find_regions("select {{ ref('a') }} from t").expect("balanced");
        assert!(is_template_modified(&regions, &[10..12]));
        assert!(!is_template_modified(&regions, &[25..28]));
    }
}
