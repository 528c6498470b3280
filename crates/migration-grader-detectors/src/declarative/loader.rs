//! DTO → validated definition conversion.

use super::config_dto::{
    DeclarativeConfigDto, ImportMoveDto, PropRemovalDto, RenameDto, WrapperRemovalDto,
};
use super::model::{validate_name, DetectorDefinition, DetectorId, DetectorKind, ModelError};

use migration_grader_core::Tier;
use std::collections::HashSet;

/// Errors during DTO → definition conversion.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// A field-level validation error.
    #[error("{context}: {source}")]
    Validation {
        /// Where the error occurred (e.g., "prop-removal[0].id").
        context: String,
        /// The underlying model error.
        source: ModelError,
    },

    /// Unknown tier string.
    #[error("{context}: unknown tier `{value}`, expected: basic, intermediate, advanced")]
    UnknownTier {
        /// Where the error occurred.
        context: String,
        /// The invalid value.
        value: String,
    },

    /// Two declarative detectors share an id.
    #[error("duplicate detector id `{id}`")]
    DuplicateId {
        /// The repeated id.
        id: String,
    },
}

/// Shared fields of every section entry.
struct Common<'a> {
    id: &'a str,
    tier: Option<&'a str>,
    description: Option<&'a String>,
}

/// Converts a `DeclarativeConfigDto` to validated definitions, in section
/// order.
///
/// # Errors
///
/// Returns the first error encountered during conversion.
pub fn load(dto: DeclarativeConfigDto) -> Result<Vec<DetectorDefinition>, LoadError> {
    let mut definitions = Vec::new();

    for (i, d) in dto.prop_removal.iter().enumerate() {
        definitions.push(convert_prop_removal(d, &format!("prop-removal[{i}]"))?);
    }
    for (i, d) in dto.prop_rename.iter().enumerate() {
        definitions.push(convert_rename(d, &format!("prop-rename[{i}]"), |from, to| {
            DetectorKind::PropRename { from, to }
        })?);
    }
    for (i, d) in dto.component_rename.iter().enumerate() {
        definitions.push(convert_rename(
            d,
            &format!("component-rename[{i}]"),
            |from, to| DetectorKind::ComponentRename { from, to },
        )?);
    }
    for (i, d) in dto.import_move.iter().enumerate() {
        definitions.push(convert_import_move(d, &format!("import-move[{i}]"))?);
    }
    for (i, d) in dto.call_replacement.iter().enumerate() {
        definitions.push(convert_rename(
            d,
            &format!("call-replacement[{i}]"),
            |from, to| DetectorKind::CallReplacement { from, to },
        )?);
    }
    for (i, d) in dto.wrapper_removal.iter().enumerate() {
        definitions.push(convert_wrapper_removal(d, &format!("wrapper-removal[{i}]"))?);
    }

    {
        let mut seen = HashSet::new();
        for def in &definitions {
            if !seen.insert(def.id.as_str()) {
                return Err(LoadError::DuplicateId {
                    id: def.id.to_string(),
                });
            }
        }
    }

    Ok(definitions)
}

fn name(ctx: &str, field: &'static str, value: &str) -> Result<String, LoadError> {
    validate_name(field, value).map_err(|e| LoadError::Validation {
        context: format!("{ctx}.{field}"),
        source: e,
    })
}

fn definition(
    common: &Common<'_>,
    ctx: &str,
    kind: DetectorKind,
) -> Result<DetectorDefinition, LoadError> {
    let id = DetectorId::new(common.id).map_err(|e| LoadError::Validation {
        context: format!("{ctx}.id"),
        source: e,
    })?;
    let tier = common
        .tier
        .map(|t| {
            Tier::parse(t).ok_or_else(|| LoadError::UnknownTier {
                context: format!("{ctx}.tier"),
                value: t.to_string(),
            })
        })
        .transpose()?;

    Ok(DetectorDefinition {
        id,
        tier,
        description: common.description.cloned(),
        kind,
    })
}

fn convert_prop_removal(dto: &PropRemovalDto, ctx: &str) -> Result<DetectorDefinition, LoadError> {
    let kind = DetectorKind::PropRemoval {
        prop: name(ctx, "prop", &dto.prop)?,
        value: dto.value.clone(),
        component: dto
            .component
            .as_deref()
            .map(|c| name(ctx, "component", c))
            .transpose()?,
    };
    let common = Common {
        id: &dto.id,
        tier: dto.tier.as_deref(),
        description: dto.description.as_ref(),
    };
    definition(&common, ctx, kind)
}

fn convert_rename(
    dto: &RenameDto,
    ctx: &str,
    kind: impl FnOnce(String, String) -> DetectorKind,
) -> Result<DetectorDefinition, LoadError> {
    let kind = kind(name(ctx, "from", &dto.from)?, name(ctx, "to", &dto.to)?);
    let common = Common {
        id: &dto.id,
        tier: dto.tier.as_deref(),
        description: dto.description.as_ref(),
    };
    definition(&common, ctx, kind)
}

fn convert_import_move(dto: &ImportMoveDto, ctx: &str) -> Result<DetectorDefinition, LoadError> {
    let kind = DetectorKind::ImportMove {
        symbol: dto
            .symbol
            .as_deref()
            .map(|s| name(ctx, "symbol", s))
            .transpose()?,
        from_module: name(ctx, "from", &dto.from)?,
        to_module: name(ctx, "to", &dto.to)?,
    };
    let common = Common {
        id: &dto.id,
        tier: dto.tier.as_deref(),
        description: dto.description.as_ref(),
    };
    definition(&common, ctx, kind)
}

fn convert_wrapper_removal(
    dto: &WrapperRemovalDto,
    ctx: &str,
) -> Result<DetectorDefinition, LoadError> {
    let kind = DetectorKind::WrapperRemoval {
        wrapper: name(ctx, "wrapper", &dto.wrapper)?,
    };
    let common = Common {
        id: &dto.id,
        tier: dto.tier.as_deref(),
        description: dto.description.as_ref(),
    };
    definition(&common, ctx, kind)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(toml: &str) -> Result<Vec<DetectorDefinition>, LoadError> {
        load(toml::from_str(toml).unwrap())
    }

    #[test]
    fn test_load_in_section_order() {
        let defs = parse(
            r#"
[[wrapper-removal]]
id = "wrapper-box-removed"
wrapper = "Box"

[[prop-removal]]
id = "prop-size-removed"
prop = "size"
tier = "intermediate"
"#,
        )
        .unwrap();
        assert_eq!(defs.len(), 2);
        assert_eq!(defs[0].id.as_str(), "prop-size-removed");
        assert_eq!(defs[0].tier, Some(Tier::Intermediate));
        assert_eq!(defs[1].id.as_str(), "wrapper-box-removed");
    }

    #[test]
    fn test_unknown_tier() {
        let err = parse(
            r#"
[[call-replacement]]
id = "call-x"
from = "a"
to = "b"
tier = "expert"
"#,
        )
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "call-replacement[0].tier: unknown tier `expert`, expected: basic, intermediate, advanced"
        );
    }

    #[test]
    fn test_invalid_id_context() {
        let err = parse(
            r#"
[[prop-rename]]
id = "Bad Id"
from = "a"
to = "b"
"#,
        )
        .unwrap_err();
        assert!(err.to_string().starts_with("prop-rename[0].id:"));
    }

    #[test]
    fn test_whitespace_in_name_rejected() {
        let err = parse(
            r#"
[[import-move]]
id = "import-x"
from = "@acme/ui legacy"
to = "@acme/ui"
"#,
        )
        .unwrap_err();
        assert!(matches!(err, LoadError::Validation { .. }));
    }

    #[test]
    fn test_duplicate_ids_across_sections() {
        let err = parse(
            r#"
[[prop-removal]]
id = "dup"
prop = "a"

[[wrapper-removal]]
id = "dup"
wrapper = "W"
"#,
        )
        .unwrap_err();
        assert!(matches!(err, LoadError::DuplicateId { id } if id == "dup"));
    }
}
