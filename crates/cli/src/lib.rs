//! Command line front end for `clientgen-core`.
//!
//! Resolves the module format of the output folder, acquires a schema from a
//! file or a running service, generates the client and writes it to disk.

pub mod fetch;
pub mod manifest;
pub mod source;
pub mod write;

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use clap::{ArgAction, Parser, ValueEnum};
use clientgen_core::{
    GenerationOptions, Language, Schema, generate, resolve_format, resolve_type_extension,
};
use serde_json::Value;
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

use crate::fetch::{Fetcher, SourceKind};
use crate::manifest::FsManifestLookup;
use crate::source::decode;
use crate::write::{plan_files, write_files};

/// Language of the frontend implementation file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum LanguageArg {
    /// Plain JavaScript (`.mjs`).
    #[default]
    Js,
    /// TypeScript (`.mts`).
    Ts,
}

impl From<LanguageArg> for Language {
    fn from(arg: LanguageArg) -> Self {
        match arg {
            LanguageArg::Js => Language::Js,
            LanguageArg::Ts => Language::Ts,
        }
    }
}

/// Generate a typed client for an OpenAPI or GraphQL service.
#[derive(Parser, Debug, Clone)]
#[command(name = "clientgen", version, about)]
pub struct Cli {
    /// URL of a running service or path to a schema file.
    pub source: String,

    /// Client name. Defaults to `client`, or `api` with `--frontend`.
    #[arg(short = 'n', long)]
    pub name: Option<String>,

    /// Output folder. Defaults to `./<name>`.
    #[arg(short = 'f', long)]
    pub folder: Option<PathBuf>,

    /// Only probe endpoints serving this kind of schema.
    #[arg(long = "type", value_enum)]
    pub schema_type: Option<SourceKind>,

    /// Shorthand for `--full-request --full-response`.
    #[arg(
        short = 'F',
        long,
        action = ArgAction::Set,
        default_value_t = true,
        num_args = 0..=1,
        default_missing_value = "true"
    )]
    pub full: bool,

    /// Group request parameters by location.
    #[arg(long)]
    pub full_request: bool,

    /// Wrap responses with status code and headers.
    #[arg(long)]
    pub full_response: bool,

    /// Comma separated header names that are never required.
    #[arg(long)]
    pub optional_headers: Option<String>,

    /// Ask the runtime to validate responses.
    #[arg(long)]
    pub validate_response: bool,

    /// Treat every object property as optional.
    #[arg(
        long,
        action = ArgAction::Set,
        default_value_t = true,
        num_args = 0..=1,
        default_missing_value = "true"
    )]
    pub props_optional: bool,

    /// Generate a browser client built on `fetch`.
    #[arg(long)]
    pub frontend: bool,

    /// Language of the frontend implementation.
    #[arg(long, value_enum, default_value_t)]
    pub language: LanguageArg,

    /// Send cookies with frontend requests.
    #[arg(long)]
    pub with_credentials: bool,

    /// Only write the type declarations.
    #[arg(long)]
    pub types_only: bool,

    /// Comment placed at the top of the types file.
    #[arg(long)]
    pub types_comment: Option<String>,

    /// JSON object of headers sent when downloading an OpenAPI document.
    #[arg(long)]
    pub url_auth_headers: Option<String>,

    /// Retry failed downloads, starting with this delay.
    #[arg(long)]
    pub retry_timeout_ms: Option<u64>,

    /// Module format of the implementation (`esm` or `cjs`).
    #[arg(long)]
    pub module: Option<String>,

    /// Use `d.mts`/`d.cts` instead of `d.ts`.
    #[arg(long)]
    pub type_extension: bool,
}

impl Cli {
    fn client_name(&self) -> String {
        match &self.name {
            Some(name) => name.clone(),
            None if self.frontend => "api".to_string(),
            None => "client".to_string(),
        }
    }

    fn optional_headers(&self) -> BTreeSet<String> {
        self.optional_headers
            .iter()
            .flat_map(|raw| raw.split(','))
            .map(str::trim)
            .filter(|h| !h.is_empty())
            .map(str::to_string)
            .collect()
    }
}

/// Run a parsed command line to completion.
pub async fn run(cli: Cli) -> Result<(), String> {
    let name = cli.client_name();
    let cwd = std::env::current_dir()
        .map_err(|err| format!("Failed to read current directory: {err}"))?;
    let folder = cwd.join(cli.folder.clone().unwrap_or_else(|| PathBuf::from(&name)));

    let lookup = FsManifestLookup;
    let module_format =
        resolve_format(cli.module.as_deref(), &folder, &lookup).map_err(|err| err.to_string())?;
    if cli.module.is_none() {
        info!("Module format detected: {module_format}");
    }
    let emits_implementation = !cli.types_only;
    let type_extension = resolve_type_extension(
        module_format,
        cli.type_extension,
        cli.module.is_some(),
        emits_implementation,
        &folder,
        &lookup,
    );

    let (schema, document, graphql_url) = acquire(&cli).await?;

    let options = GenerationOptions {
        name,
        full_request: cli.full || cli.full_request,
        full_response: cli.full || cli.full_response,
        optional_headers: cli.optional_headers(),
        validate_response: cli.validate_response,
        props_optional: cli.props_optional,
        module_format,
        is_frontend: cli.frontend,
        language: cli.language.into(),
        with_credentials: cli.with_credentials,
        types_comment: cli.types_comment.clone(),
        type_extension,
        graphql_url,
    };
    debug!(?options, "Resolved generation options.");

    let artifact = generate(&schema, &options).map_err(|err| err.to_string())?;
    let files = plan_files(&schema, &document, artifact, &options, cli.types_only)?;
    write_files(&folder, &files).await?;

    info!("Client generated successfully into {}", folder.display());
    Ok(())
}

async fn acquire(cli: &Cli) -> Result<(Schema, Value, Option<String>), String> {
    if cli.source.starts_with("http") {
        let fetcher = Fetcher::new(cli.url_auth_headers.as_deref(), cli.retry_timeout_ms)?;
        let acquired = fetcher.acquire(&cli.source, cli.schema_type).await?;
        return Ok((acquired.schema, acquired.document, acquired.graphql_url));
    }

    let (schema, document) = read_schema_file(Path::new(&cli.source)).await?;
    Ok((schema, document, None))
}

/// Read and classify a schema file.
///
/// JSON or YAML text must hold an OpenAPI document or an introspection
/// result. Anything else is tried as GraphQL SDL, in which case the returned
/// document is `null`.
pub async fn read_schema_file(path: &Path) -> Result<(Schema, Value), String> {
    info!("Trying to read schema from file {}", path.display());
    let text = tokio::fs::read_to_string(path)
        .await
        .map_err(|err| format!("Failed to read {}: {err}", path.display()))?;

    let structured = decode(&text).map_err(|err| err.to_string()).and_then(|decoded| {
        debug!(syntax = decoded.syntax(), "Decoded schema file.");
        let document = decoded.into_value();
        Schema::from_value(document.clone())
            .map(|schema| (schema, document))
            .map_err(|err| err.to_string())
    });
    match structured {
        Ok(found) => Ok(found),
        Err(reason) => {
            warn!("Error parsing OpenAPI definition: \"{reason}\". Trying with GraphQL");
            let schema = Schema::from_sdl(&text).map_err(|err| err.to_string())?;
            Ok((schema, Value::Null))
        }
    }
}

/// Run the command line and map the outcome to a process exit code.
pub async fn run_cli_async(cli: Cli) -> i32 {
    match run(cli).await {
        Ok(()) => 0,
        Err(err) => {
            error!("{err}");
            1
        }
    }
}

/// Install the stderr subscriber.
///
/// `CLIENTGEN_LOG` takes a plain level ("debug", "warn", ...) applied to the
/// clientgen crates, or a full filter spec such as "clientgen_core=trace".
pub fn init_tracing() {
    // `clientgen` prefixes both crate targets
    let filter = match std::env::var("CLIENTGEN_LOG") {
        Ok(level) if is_plain_level(&level) => format!("clientgen={level}"),
        Ok(spec) => spec,
        Err(_) => "clientgen=info".to_string(),
    };

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_filter(EnvFilter::new(filter));

    if tracing_subscriber::registry()
        .with(fmt_layer)
        .try_init()
        .is_err()
    {
        eprintln!("Warning: tracing subscriber already initialized");
    }
}

fn is_plain_level(value: &str) -> bool {
    matches!(
        value.to_ascii_lowercase().as_str(),
        "trace" | "debug" | "info" | "warn" | "error" | "off"
    )
}
