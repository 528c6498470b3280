//! TypeScript / JSX extractor using Tree-sitter.

use migration_grader_core::{
    Attribute, ImportDecl, LineSpan, StructureExtractor, StructuredView, TagUsage,
};
use tracing::debug;
use tree_sitter::{Language, Node, Parser};

/// Which grammar a file extension selects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    /// Plain TypeScript (`.ts`, `.mts`, `.cts`). Angle brackets are type
    /// assertions, so JSX is not recognized.
    TypeScript,
    /// TypeScript or JavaScript with JSX (`.tsx`, `.jsx`, `.js`, `.mjs`,
    /// `.cjs`).
    Tsx,
}

impl Dialect {
    /// Selects the dialect for `path` by extension.
    #[must_use]
    pub fn for_path(path: &str) -> Option<Self> {
        let ext = path.rsplit_once('.').map(|(_, ext)| ext)?;
        match ext.to_ascii_lowercase().as_str() {
            "ts" | "mts" | "cts" => Some(Self::TypeScript),
            "tsx" | "jsx" | "js" | "mjs" | "cjs" => Some(Self::Tsx),
            _ => None,
        }
    }
}

/// Extracts imports and JSX element usages from TypeScript and JavaScript
/// sources.
///
/// Diff fragments are rarely complete programs, so a syntax error is only
/// recorded in [`StructuredView::parse_error`]; whatever the parser
/// recovered is still reported.
pub struct TsxExtractor {
    typescript: Language,
    tsx: Language,
}

impl TsxExtractor {
    /// Creates a new extractor.
    #[must_use]
    pub fn new() -> Self {
        Self {
            typescript: tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
            tsx: tree_sitter_typescript::LANGUAGE_TSX.into(),
        }
    }

    /// Parses `source` with the grammar for `dialect`.
    #[must_use]
    pub fn analyze(&self, dialect: Dialect, source: &str) -> StructuredView {
        let language = match dialect {
            Dialect::TypeScript => &self.typescript,
            Dialect::Tsx => &self.tsx,
        };

        let mut parser = Parser::new();
        if let Err(e) = parser.set_language(language) {
            return Self::failed(format!("grammar unavailable: {e}"));
        }
        let Some(tree) = parser.parse(source, None) else {
            return Self::failed("parser produced no tree".to_string());
        };

        let src = source.as_bytes();
        let root = tree.root_node();
        let mut view = StructuredView::default();

        let mut stack = vec![root];
        while let Some(node) = stack.pop() {
            match node.kind() {
                "import_statement" => {
                    if let Some(decl) = Self::extract_import(&node, src) {
                        view.imports.push(decl);
                    }
                }
                "jsx_element" | "jsx_self_closing_element" => {
                    if let Some(tag) = Self::extract_tag(&node, src) {
                        view.tags.push(tag);
                    }
                }
                _ => {}
            }

            let mut cursor = node.walk();
            let children: Vec<Node<'_>> = node.named_children(&mut cursor).collect();
            stack.extend(children.into_iter().rev());
        }

        if root.has_error() {
            let row = Self::first_error(root).map_or(0, |n| n.start_position().row);
            view.parse_error = Some(format!("syntax error near line {}", row + 1));
        }

        view
    }

    fn failed(reason: String) -> StructuredView {
        debug!("structure extraction failed: {}", reason);
        StructuredView {
            parse_error: Some(reason),
            ..StructuredView::default()
        }
    }

    fn text<'a>(node: &Node<'_>, src: &'a [u8]) -> &'a str {
        node.utf8_text(src).unwrap_or("")
    }

    fn span(node: &Node<'_>) -> LineSpan {
        LineSpan::new(node.start_position().row + 1, node.end_position().row + 1)
    }

    fn unquote(raw: &str) -> String {
        raw.trim_matches(|c| c == '"' || c == '\'' || c == '`')
            .to_string()
    }

    fn first_error(root: Node<'_>) -> Option<Node<'_>> {
        let mut stack = vec![root];
        while let Some(node) = stack.pop() {
            if node.is_error() || node.is_missing() {
                return Some(node);
            }
            if node.has_error() {
                let mut cursor = node.walk();
                let children: Vec<Node<'_>> = node.children(&mut cursor).collect();
                stack.extend(children.into_iter().rev());
            }
        }
        None
    }

    fn extract_import(node: &Node<'_>, src: &[u8]) -> Option<ImportDecl> {
        let source = node.child_by_field_name("source")?;
        let mut decl = ImportDecl {
            module: Self::unquote(Self::text(&source, src)),
            named: Vec::new(),
            default: None,
            span: Self::span(node),
        };

        let mut cursor = node.walk();
        for child in node.named_children(&mut cursor) {
            if child.kind() != "import_clause" {
                continue;
            }
            let mut clause_cursor = child.walk();
            for part in child.named_children(&mut clause_cursor) {
                match part.kind() {
                    "identifier" => decl.default = Some(Self::text(&part, src).to_owned()),
                    "named_imports" => {
                        let mut spec_cursor = part.walk();
                        for spec in part.named_children(&mut spec_cursor) {
                            if spec.kind() != "import_specifier" {
                                continue;
                            }
                            if let Some(name) = spec.child_by_field_name("name") {
                                decl.named.push(Self::unquote(Self::text(&name, src)));
                            }
                        }
                    }
                    _ => {}
                }
            }
        }

        Some(decl)
    }

    /// The opening half of an element: itself when self-closing.
    fn opening<'t>(node: &Node<'t>) -> Option<Node<'t>> {
        match node.kind() {
            "jsx_self_closing_element" => Some(*node),
            "jsx_element" => node.child_by_field_name("open_tag"),
            _ => None,
        }
    }

    /// Tag name as written; `None` for fragments.
    fn tag_name(node: &Node<'_>, src: &[u8]) -> Option<String> {
        let name = Self::opening(node)?.child_by_field_name("name")?;
        Some(Self::text(&name, src).to_owned())
    }

    fn extract_attribute(node: &Node<'_>, src: &[u8]) -> Option<Attribute> {
        let mut cursor = node.walk();
        let mut parts = node.named_children(&mut cursor);
        let name = Self::text(&parts.next()?, src).to_owned();
        let value = parts.next().map(|value| match value.kind() {
            "string" => Self::unquote(Self::text(&value, src)),
            "jsx_expression" => Self::text(&value, src)
                .trim_start_matches('{')
                .trim_end_matches('}')
                .trim()
                .to_string(),
            _ => Self::text(&value, src).to_owned(),
        });
        Some(Attribute { name, value })
    }

    fn extract_tag(node: &Node<'_>, src: &[u8]) -> Option<TagUsage> {
        let name = Self::tag_name(node, src)?;
        let opening = Self::opening(node)?;

        let mut attributes = Vec::new();
        let mut cursor = opening.walk();
        for child in opening.named_children(&mut cursor) {
            if child.kind() == "jsx_attribute" {
                if let Some(attr) = Self::extract_attribute(&child, src) {
                    attributes.push(attr);
                }
            }
        }

        let mut children = Vec::new();
        if node.kind() == "jsx_element" {
            let mut cursor = node.walk();
            for child in node.named_children(&mut cursor) {
                if let Some(child_name) = Self::tag_name(&child, src) {
                    children.push(child_name);
                }
            }
        }

        Some(TagUsage {
            name,
            attributes,
            children,
            span: Self::span(&opening),
        })
    }
}

impl Default for TsxExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl StructureExtractor for TsxExtractor {
    fn extract(&self, path: &str, text: &str) -> Option<StructuredView> {
        let dialect = Dialect::for_path(path)?;
        Some(self.analyze(dialect, text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn analyze(src: &str) -> StructuredView {
        TsxExtractor::new().analyze(Dialect::Tsx, src)
    }

    #[test]
    fn dialect_by_extension() {
        assert_eq!(Dialect::for_path("src/a.ts"), Some(Dialect::TypeScript));
        assert_eq!(Dialect::for_path("src/App.TSX"), Some(Dialect::Tsx));
        assert_eq!(Dialect::for_path("lib/x.jsx"), Some(Dialect::Tsx));
        assert_eq!(Dialect::for_path("README.md"), None);
        assert_eq!(Dialect::for_path("Makefile"), None);
    }

    #[test]
    fn unsupported_path_has_no_view() {
        assert!(TsxExtractor::new().extract("styles.css", "a {}").is_none());
    }

    #[test]
    fn extracts_imports() {
        let v = analyze(
            "import Ui, { Button, Card as C } from '@acme/ui';\nimport \"./styles.css\";\n",
        );
        assert_eq!(v.imports.len(), 2);
        assert_eq!(v.imports[0].module, "@acme/ui");
        assert_eq!(v.imports[0].default.as_deref(), Some("Ui"));
        assert_eq!(v.imports[0].named, vec!["Button", "Card"]);
        assert_eq!(v.imports[1].module, "./styles.css");
        assert!(v.imports[1].named.is_empty());
        assert!(v.parse_error.is_none());
    }

    #[test]
    fn extracts_tags_with_attributes() {
        let v = analyze(
            "const a = (\n  <Menu theme=\"dark\" items={items} dense>\n    <Menu.Item key=\"a\" />\n  </Menu>\n);\n",
        );
        assert_eq!(v.tags.len(), 2);

        let menu = &v.tags[0];
        assert_eq!(menu.name, "Menu");
        assert_eq!(
            menu.attribute("theme").and_then(|a| a.value.as_deref()),
            Some("dark")
        );
        assert_eq!(
            menu.attribute("items").and_then(|a| a.value.as_deref()),
            Some("items")
        );
        assert!(menu.attribute("dense").is_some_and(|a| a.value.is_none()));
        assert_eq!(menu.children, vec!["Menu.Item"]);

        assert_eq!(v.tags[1].name, "Menu.Item");
        assert!(v.tags[1].children.is_empty());
    }

    #[test]
    fn spans_cover_opening_tags_and_imports() {
        let v = analyze(
            "import { Card } from '@acme/ui';\nconst a = (\n  <Card\n    theme=\"dark\"\n  >\n    <Button />\n  </Card>\n);\n",
        );
        assert_eq!(v.imports[0].span, LineSpan::line(1));
        assert_eq!(v.tags[0].span, LineSpan::new(3, 5));
        assert_eq!(v.tags[1].span, LineSpan::line(6));
    }

    #[test]
    fn fragments_are_not_tags() {
        let v = analyze("const a = <><Button /></>;\n");
        assert_eq!(v.tags.len(), 1);
        assert_eq!(v.tags[0].name, "Button");
    }

    #[test]
    fn partial_fragment_reports_parse_error() {
        let v = analyze("      <Button theme=\"dark\" onClick={save}>\n        Save\n");
        assert!(v.parse_error.is_some());
    }

    #[test]
    fn typescript_dialect_parses_generics() {
        let v = TsxExtractor::new().analyze(
            Dialect::TypeScript,
            "import { ref } from 'vue';\nconst x = <number>value;\n",
        );
        assert_eq!(v.imports.len(), 1);
        assert!(v.tags.is_empty());
        assert!(v.parse_error.is_none());
    }

    #[test]
    fn empty_source() {
        let v = analyze("");
        assert!(v.is_empty());
        assert!(v.parse_error.is_none());
    }
}
