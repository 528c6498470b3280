//! Line-level regex builders for JSX/TypeScript constructs.
//!
//! Every builder escapes its inputs, so the resulting patterns always
//! compile.

use regex::Regex;

#[allow(clippy::expect_used)]
fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("escaped pattern is valid")
}

/// Matches a JSX attribute, optionally with a specific string value.
///
/// With a value, `name="v"`, `name='v'` and `name={"v"}` all match. Without
/// one, any assignment or bare boolean usage of `name` matches.
///
/// ```
/// use migration_grader_core::utils::attribute;
///
/// let theme = attribute("theme", Some("dark"));
/// assert!(theme.is_match(r#"<Button theme="dark" />"#));
/// assert!(theme.is_match("<Button theme={'dark'}>"));
/// assert!(!theme.is_match(r#"<Button theme="light" />"#));
/// assert!(!theme.is_match(r#"<Button data-theme="dark" />"#));
/// ```
#[must_use]
pub fn attribute(name: &str, value: Option<&str>) -> Regex {
    let name = regex::escape(name);
    match value {
        Some(value) => {
            let value = regex::escape(value);
            compile(&format!(
                r#"(?:^|[\s{{(,]){name}\s*=\s*(?:"{value}"|'{value}'|\{{\s*["'`]{value}["'`]\s*\}})"#
            ))
        }
        None => compile(&format!(r"(?:^|[\s{{(,]){name}(?:\s*=|\s|/?>|$)")),
    }
}

/// Matches an opening (or self-closing) tag.
#[must_use]
pub fn opening_tag(name: &str) -> Regex {
    compile(&format!(r"<{}(?:[\s/>]|$)", regex::escape(name)))
}

/// Matches a closing tag.
#[must_use]
pub fn closing_tag(name: &str) -> Regex {
    compile(&format!(r"</{}\s*>", regex::escape(name)))
}

/// Matches an `import ... from`, side-effect `import`, or `require` of a
/// module specifier.
#[must_use]
pub fn import_from(module: &str) -> Regex {
    compile(&format!(
        r#"(?:\bfrom\s*|\bimport\s*|\brequire\(\s*)["']{}["']"#,
        regex::escape(module)
    ))
}

/// Matches a call of `name`, including calls with explicit type arguments.
/// Method calls on other receivers (`x.name(`) do not match.
#[must_use]
pub fn call(name: &str) -> Regex {
    compile(&format!(
        r"(?:^|[^\w$.]){}\s*(?:<[^<>()]*>)?\s*\(",
        regex::escape(name)
    ))
}

/// Matches `word` as a whole identifier.
#[must_use]
pub fn word(word: &str) -> Regex {
    compile(&format!(r"(?:^|[^\w$]){}(?:[^\w$]|$)", regex::escape(word)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_attribute() {
        let p = attribute("disabled", None);
        assert!(p.is_match("<Button disabled>"));
        assert!(p.is_match("<Button disabled />"));
        assert!(p.is_match("  disabled={true}"));
        assert!(!p.is_match("<Button isDisabled />"));
    }

    #[test]
    fn tags() {
        assert!(opening_tag("Card").is_match("<Card title=\"x\">"));
        assert!(opening_tag("Card").is_match("return <Card>"));
        assert!(!opening_tag("Card").is_match("<CardHeader>"));
        assert!(opening_tag("Menu.Item").is_match("<Menu.Item key=\"a\" />"));
        assert!(closing_tag("Card").is_match("</Card>"));
        assert!(!closing_tag("Card").is_match("</CardHeader>"));
    }

    #[test]
    fn imports() {
        let p = import_from("@acme/ui");
        assert!(p.is_match("import { Button } from '@acme/ui';"));
        assert!(p.is_match("import '@acme/ui';"));
        assert!(p.is_match("const ui = require(\"@acme/ui\");"));
        assert!(!p.is_match("import { Button } from '@acme/ui/legacy';"));
    }

    #[test]
    fn calls() {
        let p = call("useTheme");
        assert!(p.is_match("const t = useTheme();"));
        assert!(p.is_match("const t = useTheme<Dark>();"));
        assert!(!p.is_match("const t = ctx.useTheme();"));
        assert!(!p.is_match("const t = useThemeVars();"));
    }

    #[test]
    fn words() {
        let p = word("Button");
        assert!(p.is_match("import { Button, Card } from 'x';"));
        assert!(!p.is_match("import { IconButton } from 'x';"));
    }
}
