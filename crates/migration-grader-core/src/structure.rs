//! Structured views of source text supplied by an external extractor.
//!
//! Detectors may consult a [`StructuredView`] for more precise matching
//! than line heuristics allow. Views are best-effort: a view with a
//! `parse_error` note is still usable, and an absent view is never an
//! error.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Inclusive 1-based line range within the analyzed text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineSpan {
    /// First line.
    pub start: usize,
    /// Last line.
    pub end: usize,
}

impl LineSpan {
    /// Creates a span, swapping the bounds if given out of order.
    #[must_use]
    pub fn new(start: usize, end: usize) -> Self {
        Self {
            start: start.min(end),
            end: start.max(end),
        }
    }

    /// A span covering one line.
    #[must_use]
    pub fn line(line: usize) -> Self {
        Self::new(line, line)
    }

    /// Returns true if any of `lines` falls inside the span.
    #[must_use]
    pub fn touches(&self, lines: &BTreeSet<usize>) -> bool {
        lines.range(self.start..=self.end).next().is_some()
    }
}

/// An import-like declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportDecl {
    /// Module specifier (e.g. `@acme/ui`).
    pub module: String,
    /// Named bindings (`import { A, B } from ...`).
    pub named: Vec<String>,
    /// Default binding (`import A from ...`).
    pub default: Option<String>,
    /// Lines the declaration occupies.
    #[serde(default)]
    pub span: LineSpan,
}

impl ImportDecl {
    /// Returns true if `symbol` is bound by this declaration.
    #[must_use]
    pub fn binds(&self, symbol: &str) -> bool {
        self.default.as_deref() == Some(symbol) || self.named.iter().any(|n| n == symbol)
    }
}

/// A name/value attribute on a tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    /// Attribute name.
    pub name: String,
    /// Literal value with quotes removed, or the raw expression text.
    /// `None` for bare boolean attributes.
    pub value: Option<String>,
}

/// One usage of a tag (e.g. a JSX element).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagUsage {
    /// Tag name as written (`Button`, `Menu.Item`).
    pub name: String,
    /// Attributes in source order.
    pub attributes: Vec<Attribute>,
    /// Tag names of direct element children.
    pub children: Vec<String>,
    /// Lines of the opening tag, where the attributes live.
    #[serde(default)]
    pub span: LineSpan,
}

impl TagUsage {
    /// Finds an attribute by name.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.name == name)
    }
}

/// Best-effort structural summary of a source fragment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuredView {
    /// Import declarations.
    pub imports: Vec<ImportDecl>,
    /// Tag usages.
    pub tags: Vec<TagUsage>,
    /// Non-fatal note when the text could not be parsed cleanly.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parse_error: Option<String>,
}

impl StructuredView {
    /// Returns true if the view carries no imports and no tags.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.imports.is_empty() && self.tags.is_empty()
    }

    /// Keeps only the imports and tags that overlap `lines`.
    ///
    /// Used to narrow a view of a diff fragment to what the diff itself
    /// wrote, dropping usages that only appear as surrounding context.
    pub fn retain_touching(&mut self, lines: &BTreeSet<usize>) {
        self.imports.retain(|i| i.span.touches(lines));
        self.tags.retain(|t| t.span.touches(lines));
    }

    /// Iterates over usages of the named tag.
    pub fn tags_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a TagUsage> + 'a {
        self.tags.iter().filter(move |t| t.name == name)
    }

    /// Iterates over imports of the named module.
    pub fn imports_from<'a>(
        &'a self,
        module: &'a str,
    ) -> impl Iterator<Item = &'a ImportDecl> + 'a {
        self.imports.iter().filter(move |i| i.module == module)
    }
}

/// Produces structured views from source text.
///
/// Implemented outside the core (see the `migration-grader-ts` crate).
pub trait StructureExtractor: Send + Sync {
    /// Returns a view for `text`, or `None` if `path` is not a supported
    /// file type.
    fn extract(&self, path: &str, text: &str) -> Option<StructuredView>;
}

/// Type alias for boxed extractor trait objects.
pub type ExtractorBox = Box<dyn StructureExtractor>;
