//! Laying out and writing the files of a generated client.

use std::path::{Path, PathBuf};

use clientgen_core::{GeneratedArtifact, GenerationOptions, Schema, print_sdl};
use serde_json::Value;
use tracing::debug;

use crate::manifest::client_manifest;

/// One file to write, relative to the output folder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputFile {
    /// File name inside the output folder.
    pub name: String,
    /// Full contents.
    pub contents: String,
}

impl OutputFile {
    fn new(name: String, contents: String) -> Self {
        Self { name, contents }
    }
}

/// Decide which files a run produces.
///
/// `document` is the decoded source, copied as `<name>.openapi.json` for
/// OpenAPI clients unless `types_only` is set.
pub fn plan_files(
    schema: &Schema,
    document: &Value,
    artifact: GeneratedArtifact,
    options: &GenerationOptions,
    types_only: bool,
) -> Result<Vec<OutputFile>, String> {
    let name = options.name.as_str();
    let type_ext = options.type_extension;
    let emits_implementation = !types_only;
    let GeneratedArtifact {
        types,
        implementation,
    } = artifact;

    let mut files = Vec::new();
    match schema {
        Schema::OpenApi(_) => {
            if !types_only {
                let json = serde_json::to_string_pretty(document)
                    .map_err(|err| format!("Failed to serialize OpenAPI document: {err}"))?;
                files.push(OutputFile::new(format!("{name}.openapi.json"), json));
            }

            if options.is_frontend {
                files.push(OutputFile::new(format!("{name}-types.{type_ext}"), types));
                if emits_implementation {
                    let ext = options.language.implementation_extension();
                    files.push(OutputFile::new(format!("{name}.{ext}"), implementation));
                }
            } else {
                files.push(OutputFile::new(format!("{name}.{type_ext}"), types));
                if emits_implementation {
                    let ext = options.module_format.implementation_extension();
                    files.push(OutputFile::new(format!("{name}.{ext}"), implementation));
                }
                if !types_only {
                    files.push(package_json(options, emits_implementation)?);
                }
            }
        }
        Schema::GraphQl(introspection) => {
            files.push(OutputFile::new(
                format!("{name}.schema.graphql"),
                print_sdl(introspection),
            ));
            files.push(OutputFile::new(format!("{name}.{type_ext}"), types));
            if emits_implementation {
                let ext = options.module_format.implementation_extension();
                files.push(OutputFile::new(format!("{name}.{ext}"), implementation));
            }
            files.push(package_json(options, emits_implementation)?);
        }
    }
    Ok(files)
}

fn package_json(options: &GenerationOptions, emits_implementation: bool) -> Result<OutputFile, String> {
    let contents = client_manifest(
        &options.name,
        options.module_format,
        options.type_extension,
        emits_implementation,
    )?;
    Ok(OutputFile::new("package.json".to_string(), contents))
}

/// Create `folder` and write every file into it.
pub async fn write_files(folder: &Path, files: &[OutputFile]) -> Result<Vec<PathBuf>, String> {
    tokio::fs::create_dir_all(folder)
        .await
        .map_err(|err| format!("Failed to create {}: {err}", folder.display()))?;

    let mut written = Vec::with_capacity(files.len());
    for file in files {
        let path = folder.join(&file.name);
        tokio::fs::write(&path, &file.contents)
            .await
            .map_err(|err| format!("Failed to write {}: {err}", path.display()))?;
        debug!(path = %path.display(), bytes = file.contents.len(), "Wrote file.");
        written.push(path);
    }
    Ok(written)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use clientgen_core::{Language, ModuleFormat, TypeExtension};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn openapi() -> (Schema, Value) {
        let document = json!({ "openapi": "3.0.0", "paths": {} });
        (Schema::from_value(document.clone()).unwrap(), document)
    }

    fn artifact() -> GeneratedArtifact {
        GeneratedArtifact {
            types: "types".to_string(),
            implementation: "impl".to_string(),
        }
    }

    fn names(files: &[OutputFile]) -> Vec<&str> {
        files.iter().map(|f| f.name.as_str()).collect()
    }

    #[test]
    fn test_backend_layout() {
        let (schema, document) = openapi();
        let mut options = GenerationOptions::new("movies");
        options.module_format = ModuleFormat::Cjs;
        options.type_extension = TypeExtension::Dcts;

        let files = plan_files(&schema, &document, artifact(), &options, false).unwrap();
        assert_eq!(
            names(&files),
            vec!["movies.openapi.json", "movies.d.cts", "movies.cjs", "package.json"]
        );
        assert_eq!(files[0].contents, "{\n  \"openapi\": \"3.0.0\",\n  \"paths\": {}\n}");
    }

    #[test]
    fn test_backend_types_only() {
        let (schema, document) = openapi();
        let options = GenerationOptions::new("movies");
        let files = plan_files(&schema, &document, artifact(), &options, true).unwrap();
        assert_eq!(names(&files), vec!["movies.d.ts"]);
    }

    #[test]
    fn test_frontend_layout() {
        let (schema, document) = openapi();
        let mut options = GenerationOptions::new("api");
        options.is_frontend = true;
        options.language = Language::Ts;

        let files = plan_files(&schema, &document, artifact(), &options, false).unwrap();
        assert_eq!(
            names(&files),
            vec!["api.openapi.json", "api-types.d.ts", "api.mts"]
        );
    }

    #[test]
    fn test_graphql_layout_always_has_manifest() {
        let document = json!({ "__schema": { "queryType": { "name": "Query" }, "types": [] } });
        let schema = Schema::from_value(document.clone()).unwrap();
        let options = GenerationOptions::new("movies");

        let files = plan_files(&schema, &document, artifact(), &options, true).unwrap();
        assert_eq!(
            names(&files),
            vec!["movies.schema.graphql", "movies.d.ts", "package.json"]
        );
    }

    #[tokio::test]
    async fn test_write_files_creates_folder() {
        let dir = tempfile::TempDir::new().unwrap();
        let folder = dir.path().join("nested").join("client");
        let files = vec![OutputFile::new("a.txt".to_string(), "hello".to_string())];

        let written = write_files(&folder, &files).await.unwrap();
        assert_eq!(written, vec![folder.join("a.txt")]);
        assert_eq!(std::fs::read_to_string(folder.join("a.txt")).unwrap(), "hello");
    }
}
