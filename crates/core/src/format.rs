//! Module format and type-declaration extension resolution.
//!
//! The only outside knowledge needed here is the module type declared by the
//! closest ancestor package manifest, supplied through [`ManifestLookup`].

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use tracing::debug;

use crate::error::{GenerateError, Result};

/// Import/export convention of generated JavaScript.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ModuleFormat {
    /// `import` / `export`
    #[default]
    Esm,
    /// `require` / `module.exports`
    Cjs,
}

impl ModuleFormat {
    /// Extension of the backend implementation file.
    pub fn implementation_extension(self) -> &'static str {
        match self {
            ModuleFormat::Esm => "mjs",
            ModuleFormat::Cjs => "cjs",
        }
    }

    /// The declaration extension that pins this format regardless of the
    /// surrounding package.
    pub fn specific_type_extension(self) -> TypeExtension {
        match self {
            ModuleFormat::Esm => TypeExtension::Dmts,
            ModuleFormat::Cjs => TypeExtension::Dcts,
        }
    }

    /// The lowercase name used on the command line.
    pub fn as_str(self) -> &'static str {
        match self {
            ModuleFormat::Esm => "esm",
            ModuleFormat::Cjs => "cjs",
        }
    }
}

impl fmt::Display for ModuleFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModuleFormat {
    type Err = GenerateError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "esm" => Ok(ModuleFormat::Esm),
            "cjs" => Ok(ModuleFormat::Cjs),
            other => Err(GenerateError::InvalidConfiguration(format!(
                "Invalid module format: {other}. Valid values are 'esm' or 'cjs'"
            ))),
        }
    }
}

/// Extension of the generated type declaration file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TypeExtension {
    /// `d.ts`, format taken from the surrounding package.
    #[default]
    Dts,
    /// `d.mts`, always ESM.
    Dmts,
    /// `d.cts`, always CommonJS.
    Dcts,
}

impl TypeExtension {
    /// The extension without a leading dot.
    pub fn as_str(self) -> &'static str {
        match self {
            TypeExtension::Dts => "d.ts",
            TypeExtension::Dmts => "d.mts",
            TypeExtension::Dcts => "d.cts",
        }
    }

    /// Extension to use in an import specifier that resolves to a
    /// declaration file with this extension.
    pub fn import_extension(self) -> &'static str {
        match self {
            TypeExtension::Dts => "js",
            TypeExtension::Dmts => "mjs",
            TypeExtension::Dcts => "cjs",
        }
    }
}

impl fmt::Display for TypeExtension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Finds the module format declared by the nearest ancestor manifest.
pub trait ManifestLookup {
    /// Walk upward from `start` and report the format inferred from the first
    /// readable manifest (`type: "module"` is ESM, anything else CommonJS), or
    /// `None` when no manifest exists up to the filesystem root.
    fn ancestor_format(&self, start: &Path) -> Option<ModuleFormat>;
}

/// Decide the module format of a run.
///
/// An explicit value must be `esm` or `cjs`. Without one the nearest ancestor
/// manifest decides, defaulting to ESM when there is none.
pub fn resolve_format(
    explicit: Option<&str>,
    start: &Path,
    lookup: &dyn ManifestLookup,
) -> Result<ModuleFormat> {
    if let Some(explicit) = explicit {
        return explicit.parse();
    }
    let format = lookup.ancestor_format(start).unwrap_or_default();
    debug!(start = %start.display(), %format, "Inferred module format.");
    Ok(format)
}

/// Decide the extension of the type declaration file.
///
/// The checks run in a fixed order:
/// 1. `dual_type_extension` forces `d.mts` / `d.cts`;
/// 2. and 3. without an explicit format the generic `d.ts` is used, whether
///    or not an implementation file is emitted;
/// 4. otherwise the nearest ancestor manifest decides: a matching format
///    keeps `d.ts`, a conflicting one needs the format-specific extension. With
///    no ancestor manifest an explicit format gets the specific extension.
pub fn resolve_type_extension(
    format: ModuleFormat,
    dual_type_extension: bool,
    explicit_format_given: bool,
    emits_implementation: bool,
    start: &Path,
    lookup: &dyn ManifestLookup,
) -> TypeExtension {
    if dual_type_extension {
        return format.specific_type_extension();
    }

    if !explicit_format_given {
        debug!(emits_implementation, "No explicit module format, using d.ts.");
        return TypeExtension::Dts;
    }

    match lookup.ancestor_format(start) {
        Some(ancestor) if ancestor == format => TypeExtension::Dts,
        _ => format.specific_type_extension(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    struct FixedAncestor(Option<ModuleFormat>);

    impl ManifestLookup for FixedAncestor {
        fn ancestor_format(&self, _start: &Path) -> Option<ModuleFormat> {
            self.0
        }
    }

    const NONE: FixedAncestor = FixedAncestor(None);
    const ESM_PARENT: FixedAncestor = FixedAncestor(Some(ModuleFormat::Esm));
    const CJS_PARENT: FixedAncestor = FixedAncestor(Some(ModuleFormat::Cjs));

    fn dir() -> &'static Path {
        Path::new("/work/project/client")
    }

    #[test]
    fn test_no_manifest_defaults_to_esm_and_dts() {
        let format = resolve_format(None, dir(), &NONE).unwrap();
        assert_eq!(format, ModuleFormat::Esm);
        let ext = resolve_type_extension(format, false, false, true, dir(), &NONE);
        assert_eq!(ext, TypeExtension::Dts);
    }

    #[test]
    fn test_manifest_without_module_type_is_cjs_with_dts() {
        let format = resolve_format(None, dir(), &CJS_PARENT).unwrap();
        assert_eq!(format, ModuleFormat::Cjs);
        let ext = resolve_type_extension(format, false, false, true, dir(), &CJS_PARENT);
        assert_eq!(ext, TypeExtension::Dts);
    }

    #[test]
    fn test_explicit_cjs_under_module_package_needs_dcts() {
        let format = resolve_format(Some("cjs"), dir(), &ESM_PARENT).unwrap();
        assert_eq!(format, ModuleFormat::Cjs);
        let ext = resolve_type_extension(format, false, true, true, dir(), &ESM_PARENT);
        assert_eq!(ext, TypeExtension::Dcts);
    }

    #[test]
    fn test_explicit_esm_under_commonjs_package_needs_dmts() {
        let ext = resolve_type_extension(ModuleFormat::Esm, false, true, true, dir(), &CJS_PARENT);
        assert_eq!(ext, TypeExtension::Dmts);
    }

    #[test]
    fn test_explicit_format_matching_ancestor_keeps_dts() {
        let ext = resolve_type_extension(ModuleFormat::Esm, false, true, true, dir(), &ESM_PARENT);
        assert_eq!(ext, TypeExtension::Dts);
    }

    #[test]
    fn test_explicit_format_without_ancestor_is_specific() {
        let ext = resolve_type_extension(ModuleFormat::Cjs, false, true, false, dir(), &NONE);
        assert_eq!(ext, TypeExtension::Dcts);
    }

    #[test]
    fn test_dual_flag_wins_over_everything() {
        let ext = resolve_type_extension(ModuleFormat::Esm, true, false, false, dir(), &ESM_PARENT);
        assert_eq!(ext, TypeExtension::Dmts);
        let ext = resolve_type_extension(ModuleFormat::Cjs, true, true, true, dir(), &CJS_PARENT);
        assert_eq!(ext, TypeExtension::Dcts);
    }

    #[test]
    fn test_implicit_format_is_always_dts_without_dual_flag() {
        for lookup in [&NONE, &ESM_PARENT, &CJS_PARENT] {
            for emits in [true, false] {
                let ext = resolve_type_extension(ModuleFormat::Cjs, false, false, emits, dir(), lookup);
                assert_eq!(ext, TypeExtension::Dts);
            }
        }
    }

    #[test]
    fn test_invalid_module_format_is_rejected() {
        let err = resolve_format(Some("invalid"), dir(), &NONE).unwrap_err();
        assert!(matches!(err, GenerateError::InvalidConfiguration(_)));
        assert!(err.to_string().contains("Invalid module format: invalid"));
    }

    #[test]
    fn test_extensions() {
        assert_eq!(ModuleFormat::Esm.implementation_extension(), "mjs");
        assert_eq!(ModuleFormat::Cjs.implementation_extension(), "cjs");
        assert_eq!(TypeExtension::Dcts.to_string(), "d.cts");
        assert_eq!(TypeExtension::Dts.import_extension(), "js");
    }
}
