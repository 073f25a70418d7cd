//! CLI command implementations

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use tracing::info;

use nori_core::{
    CancellationToken, Document, ExecutorConfig, FixConfig, NoriConfig, Severity, discover_files,
    render_diff, scan_files,
};
use nori_rules::default_engine;

use crate::OutputFormat;
use crate::output;

fn load_config(config_path: Option<&Path>, paths: &[PathBuf]) -> anyhow::Result<NoriConfig> {
    match config_path {
        Some(path) => NoriConfig::load(path)
            .with_context(|| format!("failed to load configuration from '{}'", path.display())),
        None => {
            let start = paths
                .first()
                .cloned()
                .unwrap_or_else(|| PathBuf::from("."));
            Ok(NoriConfig::discover(&start)?)
        }
    }
}

fn resolve_paths(paths: &[PathBuf]) -> Vec<PathBuf> {
    if paths.is_empty() {
        vec![PathBuf::from(".")]
    } else {
        paths.to_vec()
    }
}

pub fn check(
    paths: &[PathBuf],
    config_path: Option<&Path>,
    format: OutputFormat,
    threads: Option<usize>,
    no_color: bool,
) -> anyhow::Result<ExitCode> {
    let paths = resolve_paths(paths);
    let config = load_config(config_path, &paths)?;
    let files = discover_files(&paths, &config);
    if files.is_empty() {
        println!("No .cs files found");
        return Ok(ExitCode::SUCCESS);
    }

    let engine = std::sync::Arc::new(default_engine(config)?);
    let executor_config = ExecutorConfig {
        threads: threads.unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(4)
        }),
        progress: None,
    };

    let scan_engine = std::sync::Arc::clone(&engine);
    let result = scan_files(
        files,
        &executor_config,
        &CancellationToken::new(),
        move |document| scan_engine.check(document),
    )?;

    let diagnostics: Vec<_> = result
        .files
        .iter()
        .flat_map(|f| f.diagnostics.iter().cloned())
        .collect();

    match format {
        OutputFormat::Human => {
            output::print_diagnostics(&diagnostics, no_color);
            for file_result in &result.files {
                if let Some(error) = &file_result.error {
                    eprintln!("warning: skipped '{}': {error}", file_result.file.display());
                }
            }
            output::print_summary(&diagnostics, result.files.len(), no_color);
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&diagnostics)?);
        }
    }

    let has_errors = diagnostics.iter().any(|d| d.severity == Severity::Error);
    Ok(if has_errors {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

pub fn fix(
    paths: &[PathBuf],
    config_path: Option<&Path>,
    dry_run: bool,
    apply_unsafe: bool,
) -> anyhow::Result<ExitCode> {
    let paths = resolve_paths(paths);
    let config = load_config(config_path, &paths)?;
    let files = discover_files(&paths, &config);
    if files.is_empty() {
        println!("No .cs files found");
        return Ok(ExitCode::SUCCESS);
    }

    let engine = default_engine(config)?;
    let fix_config = FixConfig {
        apply_unsafe,
        dry_run,
    };
    let mut total_applied = 0usize;
    let mut changed_files = 0usize;

    for file in &files {
        let document = match Document::load(file) {
            Ok(document) => document,
            Err(error) => {
                eprintln!("warning: skipped '{}': {error}", file.display());
                continue;
            }
        };

        let result = engine.fix_all(&document, &fix_config)?;
        if result.applied == 0 {
            continue;
        }

        total_applied += result.applied;
        changed_files += 1;

        if fix_config.dry_run {
            println!("--- {}", file.display());
            print!("{}", render_diff(document.text(), &result.text));
        } else {
            std::fs::write(file, &result.text)
                .with_context(|| format!("failed to write '{}'", file.display()))?;
            info!("fixed {} ({} fixes)", file.display(), result.applied);
        }
    }

    if dry_run {
        println!("{total_applied} fixes in {changed_files} files (dry run, nothing written)");
    } else {
        println!("Applied {total_applied} fixes in {changed_files} files");
    }
    Ok(ExitCode::SUCCESS)
}

pub fn rules(config_path: Option<&Path>) -> anyhow::Result<ExitCode> {
    let config = match config_path {
        Some(path) => NoriConfig::load(path)?,
        None => NoriConfig::discover(Path::new("."))?,
    };
    let engine = default_engine(config)?;

    for rule in engine.registry().rules() {
        let metadata = rule.metadata();
        let status = if engine.config().is_enabled(&metadata.id) {
            "enabled"
        } else {
            "disabled"
        };
        println!(
            "{} [{}] ({}) - {}",
            metadata.id, metadata.severity, status, metadata.description
        );
    }
    Ok(ExitCode::SUCCESS)
}
