//! Create command implementation.

use crate::cli::CreateArgs;
use crate::error::add_creation_context;
use crate::output::OutputFormatter;
use crate::progress::CliProgress;
use anyhow::Result;
use anyhow::bail;
use std::path::Path;
use veritar_core::NoopProgress;
use veritar_core::create_archive_with_progress;
use veritar_core::creation::CreationConfig;

pub fn execute(args: &CreateArgs, formatter: &dyn OutputFormatter, quiet: bool) -> Result<()> {
    let mut config = CreationConfig::default()
        .with_follow_symlinks(args.follow_symlinks)
        .with_include_hidden(!args.exclude_hidden)
        .with_exclude_patterns(args.exclude.clone())
        .with_manifest_path(args.manifest.clone());
    if let Some(level) = args.compression_level {
        config = config.with_compression_level(level);
    }

    let manifest_path = config.resolve_manifest_path(&args.output);
    if !args.force {
        refuse_overwrite(&args.output)?;
        refuse_overwrite(&manifest_path)?;
    }

    let report = if !quiet && CliProgress::should_show() {
        let mut progress = CliProgress::new("Creating");
        add_creation_context(
            create_archive_with_progress(&args.output, &args.sources, &config, &mut progress),
            &args.output,
        )?
    } else {
        add_creation_context(
            create_archive_with_progress(&args.output, &args.sources, &config, &mut NoopProgress),
            &args.output,
        )?
    };

    formatter.format_creation_result(&args.output, &report)?;

    Ok(())
}

fn refuse_overwrite(path: &Path) -> Result<()> {
    if path.exists() {
        bail!(
            "'{}' already exists\n\
             HINT: Use --force to overwrite it.",
            path.display()
        );
    }
    Ok(())
}
