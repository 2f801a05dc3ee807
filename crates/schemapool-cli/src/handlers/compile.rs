//! Compile command handler

use super::utils::{compiler_config, CompilerOverrides, SchemaSource};
use crate::cli::CompileArgs;
use crate::config::Config;
use crate::error::Result;
use crate::logging::timing::Timer;
use crate::output::OutputWriter;
use schemapool_core::{CompiledSchema, PoolStats, SchemaCompiler};
use serde::Serialize;
use serde_json::Value;
use tracing::{info, instrument, warn};

/// What a successful compilation reports
#[derive(Debug, Serialize)]
struct CompileSummary<'a> {
    root: String,
    references: &'a [String],
    #[serde(skip_serializing_if = "Option::is_none")]
    documents: Option<Vec<&'a str>>,
    stats: PoolStats,
    warnings: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    schema: Option<&'a Value>,
}

impl<'a> CompileSummary<'a> {
    fn new(compiled: &'a CompiledSchema, args: &CompileArgs, config: &Config) -> Self {
        let pool = compiled.pool();
        let warnings = if config.output.show_walk_warnings {
            pool.warnings().iter().map(ToString::to_string).collect()
        } else {
            Vec::new()
        };

        Self {
            root: root_location(compiled),
            references: compiled.references(),
            documents: args.show_pool.then(|| pool.locators()),
            stats: pool.stats(),
            warnings,
            schema: args.show_root.then(|| compiled.root()),
        }
    }
}

/// Handle the compile command
#[instrument(skip(config, output), fields(source = %args.source))]
pub fn handle_compile(args: CompileArgs, config: &Config, output: &mut OutputWriter) -> Result<()> {
    let _timer = Timer::with_details("compile_command", &args.source);

    let compiler_config = compiler_config(
        config,
        CompilerOverrides {
            no_meta_check: args.no_meta_check,
            lazy: args.lazy,
            offline: args.offline,
        },
    );
    let source = SchemaSource::parse(&args.source, compiler_config.base_dir.as_deref());
    let loader = source.loader()?;
    output.info(&format!("Compiling schema: {}", args.source))?;

    let compiled = {
        let _compile_timer = Timer::new("schema_compilation");
        SchemaCompiler::with_config(compiler_config).compile(loader.as_ref())?
    };

    let summary = CompileSummary::new(&compiled, &args, config);
    info!(
        root = %summary.root,
        references = summary.references.len(),
        documents = compiled.pool().len(),
        "Schema compiled"
    );
    for warning in &summary.warnings {
        warn!(warning = %warning, "Reference left unresolved while walking");
    }

    if output.is_human() {
        write_human_summary(&summary, output)
    } else {
        output.data(&summary)
    }
}

fn write_human_summary(summary: &CompileSummary<'_>, output: &mut OutputWriter) -> Result<()> {
    output.success(&format!("✓ Compiled {}", summary.root))?;

    output.section("Pool Statistics")?;
    output.table(
        &["References", "Exact hits", "Pointer hits", "Loads"],
        vec![vec![
            summary.references.len().to_string(),
            summary.stats.exact_hits.to_string(),
            summary.stats.pointer_hits.to_string(),
            summary.stats.loads.to_string(),
        ]],
    )?;

    if output.is_verbose() && !summary.references.is_empty() {
        output.section("References")?;
        for reference in summary.references {
            output.writeln(&format!("  {}", reference))?;
        }
    }

    if let Some(documents) = &summary.documents {
        output.section("Pool Entries")?;
        for locator in documents {
            output.writeln(&format!("  {}", locator))?;
        }
    }

    for warning in &summary.warnings {
        output.warning(&format!("⚠ {}", warning))?;
    }

    if let Some(schema) = summary.schema {
        output.section("Root Schema")?;
        output.data(schema)?;
    }

    Ok(())
}

/// Display form of the root's reference
fn root_location(compiled: &CompiledSchema) -> String {
    let reference = compiled.root_reference();
    if reference.is_empty() {
        "#".to_string()
    } else {
        reference.to_string()
    }
}
