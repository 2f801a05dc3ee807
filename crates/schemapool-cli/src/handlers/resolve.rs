//! Resolve command handler

use super::utils::{compiler_config, CompilerOverrides, SchemaSource};
use crate::cli::{OutputFormat, ResolveArgs};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::logging::timing::Timer;
use crate::output::OutputWriter;
use schemapool_core::SchemaCompiler;
use std::fs;
use tracing::{debug, instrument};

/// Handle the resolve command
///
/// The root is compiled lazily; only the requested reference and whatever
/// it needs to locate are fetched.
#[instrument(skip(config, output), fields(source = %args.source, reference = %args.reference))]
pub fn handle_resolve(args: ResolveArgs, config: &Config, output: &mut OutputWriter) -> Result<()> {
    let _timer = Timer::with_details("resolve_command", &args.reference);
    if args.reference.trim().is_empty() {
        return Err(Error::invalid_args("REFERENCE must not be empty; use '#' for the root"));
    }

    let compiler_config = compiler_config(
        config,
        CompilerOverrides {
            no_meta_check: false,
            lazy: true,
            offline: args.offline,
        },
    );
    let source = SchemaSource::parse(&args.source, compiler_config.base_dir.as_deref());
    let loader = source.loader()?;

    let mut compiled = SchemaCompiler::with_config(compiler_config).compile(loader.as_ref())?;
    let resolved = compiled.resolve(&args.reference)?;
    debug!(stats = ?compiled.pool().stats(), "Resolved reference");

    if let Some(output_file) = &args.output_file {
        let content = match output.format() {
            OutputFormat::Yaml => serde_yaml::to_string(resolved.as_ref())?,
            OutputFormat::Json => serde_json::to_string(resolved.as_ref())?,
            OutputFormat::JsonPretty | OutputFormat::Human => serde_json::to_string_pretty(resolved.as_ref())?,
        };
        fs::write(output_file, content)?;
        output.success(&format!("✓ Output saved to {}", output_file.display()))?;
        return Ok(());
    }

    output.data(resolved.as_ref())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::capture::writer;
    use schemapool_core::PoolError;
    use serde_json::{json, Value};
    use tempfile::tempdir;

    const ROOT: &str = r##"{
        "definitions": {
            "address": {"$id": "#address", "type": "object"},
            "name": {"type": "string"}
        },
        "properties": {"home": {"$ref": "#address"}}
    }"##;

    fn args(source: &str, reference: &str) -> ResolveArgs {
        ResolveArgs {
            source: source.to_string(),
            reference: reference.to_string(),
            offline: true,
            output_file: None,
        }
    }

    #[test]
    fn test_resolve_pointer_and_anchor() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("root.json");
        fs::write(&path, ROOT).unwrap();
        let source = path.to_str().unwrap();

        let (mut output, buffer) = writer(OutputFormat::Json, false);
        handle_resolve(args(source, "#/definitions/name"), &Config::default(), &mut output).unwrap();
        let value: Value = serde_json::from_str(buffer.contents().trim()).unwrap();
        assert_eq!(value, json!({"type": "string"}));

        let (mut output, buffer) = writer(OutputFormat::Json, false);
        handle_resolve(args(source, "#address"), &Config::default(), &mut output).unwrap();
        let value: Value = serde_json::from_str(buffer.contents().trim()).unwrap();
        assert_eq!(value["type"], "object");
    }

    #[test]
    fn test_resolve_missing_pointer() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("root.json");
        fs::write(&path, ROOT).unwrap();

        let (mut output, _buffer) = writer(OutputFormat::Json, false);
        let err = handle_resolve(
            args(path.to_str().unwrap(), "#/definitions/missing"),
            &Config::default(),
            &mut output,
        )
        .unwrap_err();
        assert!(matches!(err, Error::Pool(PoolError::Reference(_))));
    }

    #[test]
    fn test_empty_reference_is_rejected() {
        let (mut output, _buffer) = writer(OutputFormat::Json, false);
        let err = handle_resolve(args("root.json", " "), &Config::default(), &mut output).unwrap_err();
        assert!(matches!(err, Error::InvalidArgs(_)));
    }

    #[test]
    fn test_resolve_saves_to_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("root.yaml");
        fs::write(&path, "definitions:\n  flag:\n    type: boolean\n").unwrap();
        let target = dir.path().join("flag.yaml");

        let mut resolve_args = args(path.to_str().unwrap(), "#/definitions/flag");
        resolve_args.output_file = Some(target.clone());
        let (mut output, buffer) = writer(OutputFormat::Yaml, false);
        handle_resolve(resolve_args, &Config::default(), &mut output).unwrap();

        assert_eq!(fs::read_to_string(&target).unwrap(), "type: boolean\n");
        assert!(buffer.contents().is_empty());
    }
}
