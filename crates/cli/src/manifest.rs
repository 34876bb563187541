//! `package.json` handling: reading ancestor manifests and writing the one
//! that ships with a generated client.

use std::path::Path;

use clientgen_core::{ManifestLookup, ModuleFormat, TypeExtension};
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

const MANIFEST: &str = "package.json";

/// Looks up `package.json` files on the real filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsManifestLookup;

impl ManifestLookup for FsManifestLookup {
    fn ancestor_format(&self, start: &Path) -> Option<ModuleFormat> {
        start
            .ancestors()
            .take_while(|dir| dir.parent().is_some())
            .find_map(manifest_format)
    }
}

/// Format declared by `dir/package.json`. Missing, unreadable and unparseable
/// manifests yield `None` so the walk continues upward.
fn manifest_format(dir: &Path) -> Option<ModuleFormat> {
    let path = dir.join(MANIFEST);
    let text = std::fs::read_to_string(&path).ok()?;
    let manifest: Value = match serde_json::from_str(&text) {
        Ok(manifest) => manifest,
        Err(err) => {
            debug!(path = %path.display(), error = %err, "Skipping unparseable manifest.");
            return None;
        }
    };
    let format = if manifest.get("type").and_then(Value::as_str) == Some("module") {
        ModuleFormat::Esm
    } else {
        ModuleFormat::Cjs
    };
    debug!(path = %path.display(), %format, "Found ancestor manifest.");
    Some(format)
}

#[derive(Debug, Serialize)]
struct ClientManifest<'a> {
    name: &'a str,
    types: String,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    module_type: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    main: Option<String>,
}

/// Render the manifest written next to a generated client.
pub fn client_manifest(
    name: &str,
    format: ModuleFormat,
    type_extension: TypeExtension,
    emits_implementation: bool,
) -> Result<String, String> {
    let manifest = ClientManifest {
        name,
        types: format!("./{name}.{type_extension}"),
        module_type: (format == ModuleFormat::Esm).then_some("module"),
        main: emits_implementation
            .then(|| format!("./{name}.{}", format.implementation_extension())),
    };
    serde_json::to_string_pretty(&manifest)
        .map_err(|err| format!("Failed to serialize package.json: {err}"))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn test_nearest_manifest_wins() {
        let root = TempDir::new().unwrap();
        let nested = root.path().join("app").join("clients").join("movies");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(root.path().join(MANIFEST), r#"{ "type": "module" }"#).unwrap();
        std::fs::write(root.path().join("app").join(MANIFEST), r#"{ "name": "app" }"#).unwrap();

        assert_eq!(
            FsManifestLookup.ancestor_format(&nested),
            Some(ModuleFormat::Cjs)
        );
    }

    #[test]
    fn test_unparseable_manifest_is_skipped() {
        let root = TempDir::new().unwrap();
        let app = root.path().join("app");
        std::fs::create_dir_all(&app).unwrap();
        std::fs::write(root.path().join(MANIFEST), r#"{ "type": "module" }"#).unwrap();
        std::fs::write(app.join(MANIFEST), "{ not json").unwrap();

        assert_eq!(FsManifestLookup.ancestor_format(&app), Some(ModuleFormat::Esm));
    }

    #[test]
    fn test_esm_manifest() {
        let manifest = client_manifest("movies", ModuleFormat::Esm, TypeExtension::Dts, true).unwrap();
        assert_eq!(
            manifest,
            "{\n  \"name\": \"movies\",\n  \"types\": \"./movies.d.ts\",\n  \"type\": \"module\",\n  \"main\": \"./movies.mjs\"\n}"
        );
    }

    #[test]
    fn test_cjs_types_only_manifest() {
        let manifest =
            client_manifest("movies", ModuleFormat::Cjs, TypeExtension::Dcts, false).unwrap();
        assert_eq!(
            manifest,
            "{\n  \"name\": \"movies\",\n  \"types\": \"./movies.d.cts\"\n}"
        );
    }
}
