//! Counting helpers over structured views.

use crate::structure::StructuredView;

/// Counts usages of tag `name`.
#[must_use]
pub fn count_tags(view: &StructuredView, name: &str) -> usize {
    view.tags_named(name).count()
}

/// Counts tags carrying attribute `attr` (with `value`, if given),
/// optionally restricted to tags named `tag`.
#[must_use]
pub fn count_attribute(
    view: &StructuredView,
    tag: Option<&str>,
    attr: &str,
    value: Option<&str>,
) -> usize {
    view.tags
        .iter()
        .filter(|t| tag.map_or(true, |name| t.name == name))
        .filter(|t| {
            t.attribute(attr)
                .is_some_and(|a| value.map_or(true, |v| a.value.as_deref() == Some(v)))
        })
        .count()
}

/// Counts imports of `module`, optionally only those binding `symbol`.
#[must_use]
pub fn count_imports(view: &StructuredView, module: &str, symbol: Option<&str>) -> usize {
    view.imports_from(module)
        .filter(|i| symbol.map_or(true, |s| i.binds(s)))
        .count()
}
